//! Combined static code analysis over the fetched content map:
//! languages, frameworks, endpoints, architecture hints, quality and
//! security signals, and the unified findings list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::js_routes;
use crate::languages;
use crate::python_routes;
use crate::quality::{self, QualitySignals};
use crate::security::{self, SecuritySignals};
use crate::types::{ContentMap, Endpoint, FetchStats, Finding};

/// Path-based hints about how the codebase is organized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchitectureSummary {
  pub entrypoints: Vec<String>,
  pub routers: Vec<String>,
  pub services: Vec<String>,
  pub db_related: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeAnalysis {
  pub summary_bullets: Vec<String>,
  pub language_breakdown: BTreeMap<String, usize>,
  pub frameworks_detected: Vec<String>,
  pub endpoints: Vec<Endpoint>,
  pub architecture: ArchitectureSummary,
  pub quality_signals: QualitySignals,
  pub security_signals: SecuritySignals,
  pub findings: Vec<Finding>,
}

fn architecture_summary(paths: impl Iterator<Item = impl AsRef<str>>) -> ArchitectureSummary {
  let mut summary = ArchitectureSummary::default();
  for p in paths {
    let path = p.as_ref();
    let lower = path.replace('\\', "/").to_lowercase();
    if lower.contains("main.py")
      || lower.contains("app.py")
      || lower.contains("index.js")
      || lower.contains("index.ts")
    {
      summary.entrypoints.push(path.to_string());
    }
    if lower.contains("router") || lower.contains("routes") {
      summary.routers.push(path.to_string());
    }
    if lower.contains("service") {
      summary.services.push(path.to_string());
    }
    if lower.contains("model")
      || lower.contains("database")
      || lower.contains("db")
      || lower.contains("migrate")
    {
      summary.db_related.push(path.to_string());
    }
  }
  summary.entrypoints.truncate(10);
  summary.routers.truncate(15);
  summary.services.truncate(15);
  summary.db_related.truncate(10);
  summary
}

fn language_bullet(breakdown: &BTreeMap<String, usize>) -> Option<String> {
  if breakdown.is_empty() {
    return None;
  }
  let mut entries: Vec<(&String, &usize)> = breakdown.iter().collect();
  entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
  let listed: Vec<String> = entries
    .iter()
    .take(8)
    .map(|(lang, count)| format!("{lang}: {count}"))
    .collect();
  Some(format!("Languages: {}", listed.join(", ")))
}

/// Run every signal producer over the content map and merge their output.
pub fn run_code_analysis(files: &ContentMap, stats: &FetchStats) -> CodeAnalysis {
  let language_breakdown = languages::language_breakdown(files.keys().map(|p| p.as_str()));
  let (py_endpoints, py_frameworks) = python_routes::run_fastapi_analysis(files);
  let (js_endpoints, js_frameworks) = js_routes::run_js_routes_analysis(files);
  let (quality_signals, quality_findings) = quality::run_quality_analysis(files);
  let (security_signals, security_findings) = security::run_security_analysis(files);

  let mut frameworks: Vec<String> = Vec::new();
  for f in py_frameworks.into_iter().chain(js_frameworks) {
    if !frameworks.contains(&f) {
      frameworks.push(f);
    }
  }

  let mut endpoints = py_endpoints;
  endpoints.extend(js_endpoints);

  let architecture = architecture_summary(files.keys());

  let mut summary_bullets = Vec::new();
  if let Some(bullet) = language_bullet(&language_breakdown) {
    summary_bullets.push(bullet);
  }
  if !frameworks.is_empty() {
    summary_bullets.push(format!("Frameworks: {}", frameworks.join(", ")));
  }
  summary_bullets.push(format!("Endpoints: {}", endpoints.len()));
  if stats.truncated {
    summary_bullets.push("Truncated due to limits.".to_string());
  }

  let mut findings = quality_findings;
  findings.extend(security_findings);

  CodeAnalysis {
    summary_bullets,
    language_breakdown,
    frameworks_detected: frameworks,
    endpoints,
    architecture,
    quality_signals,
    security_signals,
    findings,
  }
}
