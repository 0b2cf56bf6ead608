//! Binary entrypoint for the report API.

use axum::{routing::get, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use report_api::github::GitHubClient;
use report_api::rate_limit::RateLimiter;
use report_api::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let config = Config::from_env();

  let pool = sqlx::PgPool::connect(&config.database_url).await?;
  report_api::reports::init_schema(&pool).await?;

  let github_token_configured = config.github_token.is_some();
  let github = GitHubClient::new(config.github_token.clone())?;
  let state = Arc::new(AppState {
    pool,
    github,
    limiter: RateLimiter::new(),
    github_token_configured,
  });

  let app = Router::new()
    .route("/health", get(report_api::health))
    .route("/api/analyze", post(report_api::analyze_repo))
    .route("/api/reports/:report_id", get(report_api::get_report))
    .route("/api/reports", get(report_api::list_reports))
    .layer(CorsLayer::permissive())
    .with_state(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
  println!("report-api listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await?;

  Ok(())
}
