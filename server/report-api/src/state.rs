//! Shared application state.

use crate::github::GitHubClient;
use crate::rate_limit::RateLimiter;

pub struct AppState {
  pub pool: sqlx::PgPool,
  pub github: GitHubClient,
  pub limiter: RateLimiter,
  pub github_token_configured: bool,
}
