//! Repo Audit Rule Engine — deterministic, rule-based.
//!
//! Takes a repository tree listing plus whatever file content was fetched
//! under budget, runs a battery of independent evidence-producing checks,
//! and rolls them into a 0-100 score with a tailored interview pack.
//!
//! No AI, no DB, no network; pure computation over (tree, content map).

pub mod analyzer;
pub mod code_analysis;
pub mod js_routes;
pub mod languages;
pub mod paths;
pub mod python_routes;
pub mod quality;
pub mod resolver;
pub mod security;
pub mod selector;
pub mod types;

pub use analyzer::analyze;
pub use resolver::ContentResolver;
pub use selector::select_candidates;
pub use types::{CheckResult, ContentMap, FetchStats, ReportResult, RepoSnapshot, TreeEntry};
