//! Service configuration from environment variables.

/// Runtime configuration. `DATABASE_URL` is required; everything else has a
/// default. Without `GITHUB_TOKEN` the service runs against GitHub's
/// unauthenticated rate limits and falls back to the demo snapshot when they
/// are exhausted.
#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub github_token: Option<String>,
}

impl Config {
  pub fn from_env() -> Self {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let port: u16 = std::env::var("PORT")
      .unwrap_or_else(|_| "5008".into())
      .parse()
      .expect("PORT must be a valid u16");
    let github_token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    Self {
      database_url,
      port,
      github_token,
    }
  }
}
