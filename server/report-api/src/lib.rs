//! Repo Audit Report API
//!
//! HTTP service wrapping the audit engine: fetches a GitHub repository
//! snapshot, runs the deterministic rule engine over it, and persists the
//! resulting report in PostgreSQL with a pending/done/failed lifecycle.

pub mod config;
pub mod content;
pub mod demo;
pub mod github;
pub mod handlers;
pub mod rate_limit;
pub mod reports;
pub mod state;

pub use config::Config;
pub use handlers::{analyze_repo, get_report, health, list_reports};
pub use state::AppState;
