//! Snapshot and report types shared by the selector, producers, and evaluator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One blob in the remote tree listing. `sha` addresses content independent
/// of its path; two paths may share a sha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
  pub path: String,
  pub sha: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub size: Option<u64>,
}

/// Root key file snippet fetched ahead of the main content pass.
/// `skipped` marks an oversized file; the resolver treats it as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyFileSnippet {
  pub path: String,
  #[serde(default)]
  pub snippet: String,
  #[serde(default)]
  pub skipped: bool,
}

/// CI workflow definition snippet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowSnippet {
  pub path: String,
  #[serde(default)]
  pub snippet: String,
}

/// Everything the fetch phase learned about a repository before content
/// retrieval: the full blob tree plus a few pre-fetched snippets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoSnapshot {
  pub owner: String,
  pub name: String,
  #[serde(default)]
  pub default_branch: Option<String>,
  #[serde(default)]
  pub tree: Vec<TreeEntry>,
  #[serde(default)]
  pub key_files: Vec<KeyFileSnippet>,
  #[serde(default)]
  pub workflows: Vec<WorkflowSnippet>,
  #[serde(default)]
  pub test_folders_detected: Vec<String>,
}

impl RepoSnapshot {
  /// All blob paths, in tree listing order.
  pub fn tree_paths(&self) -> impl Iterator<Item = &str> {
    self.tree.iter().map(|e| e.path.as_str())
  }

  /// First path matching the predicate, in tree order.
  pub fn find_path(&self, pred: impl Fn(&str) -> bool) -> Option<&str> {
    self.tree_paths().find(|p| pred(p))
  }

  /// All paths matching the predicate, in tree order.
  pub fn find_paths(&self, pred: impl Fn(&str) -> bool) -> Vec<&str> {
    self.tree_paths().filter(|p| pred(p)).collect()
  }

  pub fn key_file(&self, path: &str) -> Option<&KeyFileSnippet> {
    self.key_files.iter().find(|k| k.path == path)
  }
}

/// Fetched text per path, built fresh each run and never persisted.
/// BTreeMap keeps producer iteration deterministic regardless of the order
/// fetches completed in.
pub type ContentMap = BTreeMap<String, String>;

/// How much the content fetch retrieved before hitting a budget.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FetchStats {
  pub total_files: usize,
  pub total_bytes: usize,
  pub truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Low,
  Medium,
  High,
}

/// Where in the repo a finding was observed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingEvidence {
  pub path: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_line: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_line: Option<usize>,
  #[serde(default)]
  pub snippet: String,
}

/// The atomic unit every signal producer emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
  pub title: String,
  pub severity: Severity,
  pub description: String,
  pub evidence: FindingEvidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
  Pass,
  Warn,
  Fail,
}

impl CheckStatus {
  /// Fixed point value: pass 10, warn 5, fail 0.
  pub fn points(self) -> i32 {
    match self {
      CheckStatus::Pass => 10,
      CheckStatus::Warn => 5,
      CheckStatus::Fail => 0,
    }
  }
}

/// Evidence attached to a graded check. `file` is `—` when no file applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evidence {
  pub file: String,
  pub snippet: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_line: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_line: Option<usize>,
}

impl Evidence {
  pub fn new(file: impl Into<String>, snippet: impl Into<String>) -> Self {
    Self {
      file: file.into(),
      snippet: snippet.into(),
      start_line: None,
      end_line: None,
    }
  }

  /// Evidence for a check with nothing to point at.
  pub fn none() -> Self {
    Self::new("—", "")
  }
}

/// The rule evaluator's atomic graded judgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
  pub id: String,
  pub name: String,
  pub status: CheckStatus,
  pub evidence: Evidence,
  pub recommendation: String,
  pub points: i32,
}

impl CheckResult {
  pub fn new(
    id: &str,
    name: &str,
    status: CheckStatus,
    evidence: Evidence,
    recommendation: &str,
  ) -> Self {
    Self {
      id: id.to_string(),
      name: name.to_string(),
      status,
      evidence,
      recommendation: recommendation.to_string(),
      points: status.points(),
    }
  }
}

/// A named group of checks; `score` is the exact sum of check points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResult {
  pub name: String,
  pub checks: Vec<CheckResult>,
  pub score: i32,
}

impl SectionResult {
  pub fn new(name: &str, checks: Vec<CheckResult>) -> Self {
    let score = checks.iter().map(|c| c.points).sum();
    Self {
      name: name.to_string(),
      checks,
      score,
    }
  }
}

/// Terminal artifact of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResult {
  pub overall_score: i32,
  pub sections: Vec<SectionResult>,
  pub interview_pack: Vec<String>,
}

/// One discovered HTTP endpoint, from either the AST or the heuristic detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
  pub method: String,
  pub path: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub function_name: Option<String>,
  pub file: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_line: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_line: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub snippet: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub framework: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_points_are_fixed() {
    assert_eq!(CheckStatus::Pass.points(), 10);
    assert_eq!(CheckStatus::Warn.points(), 5);
    assert_eq!(CheckStatus::Fail.points(), 0);
  }

  #[test]
  fn section_score_is_sum_of_check_points() {
    let checks = vec![
      CheckResult::new("a", "A", CheckStatus::Pass, Evidence::none(), ""),
      CheckResult::new("b", "B", CheckStatus::Warn, Evidence::none(), ""),
      CheckResult::new("c", "C", CheckStatus::Fail, Evidence::none(), ""),
    ];
    let section = SectionResult::new("S", checks);
    assert_eq!(section.score, 15);
  }

  #[test]
  fn status_serializes_lowercase() {
    assert_eq!(
      serde_json::to_string(&CheckStatus::Warn).unwrap(),
      "\"warn\""
    );
    assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
  }
}
