//! JS/TS route detection: Next.js path conventions and Express call syntax.
//! Heuristic line scans only; no full parse, no execution.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ContentMap, Endpoint};

const NEXT_PAGES_PREFIX: &str = "pages/api/";
const NEXT_APP_PREFIX: &str = "app/api/";

const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs"];

lazy_static! {
  static ref EXPRESS_RE: Regex = Regex::new(
    r#"(?i)(?:router|app)\.(get|post|put|delete|patch)\s*\(\s*["']([^"']*)["']"#
  )
  .unwrap();
}

fn strip_extension(path: &str) -> &str {
  match path.rfind('.') {
    Some(idx) => &path[..idx],
    None => path,
  }
}

/// Infer a route from the file path for Next.js API conventions.
///
/// `pages/api/foo/bar.ts` -> `/api/foo/bar`; `app/api/foo/route.ts` -> `/api/foo`.
fn next_route_from_path(file_path: &str) -> Option<Endpoint> {
  let path = file_path.replace('\\', "/");
  let route = if let Some(rest) = path.strip_prefix(NEXT_PAGES_PREFIX) {
    format!("/api/{}", strip_extension(rest))
  } else if let Some(rest) = path.strip_prefix(NEXT_APP_PREFIX) {
    match rest.split_once('/') {
      Some((dir, _)) => format!("/api/{dir}"),
      None => format!("/api/{}", strip_extension(rest)),
    }
  } else {
    return None;
  };
  Some(Endpoint {
    method: "GET".to_string(),
    path: route,
    function_name: None,
    file: file_path.to_string(),
    start_line: None,
    end_line: None,
    snippet: None,
    framework: Some("Next.js".to_string()),
  })
}

fn truncate_chars(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    s.chars().take(max).collect()
  }
}

/// Line-by-line scan for `router.get("/path")` / `app.post("/path")` calls.
fn express_routes_from_content(file_path: &str, content: &str) -> Vec<Endpoint> {
  let mut out = Vec::new();
  for (i, line) in content.lines().enumerate() {
    for caps in EXPRESS_RE.captures_iter(line) {
      let method = caps
        .get(1)
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| "GET".to_string());
      let path = match caps.get(2) {
        Some(m) if !m.as_str().is_empty() => m.as_str().to_string(),
        _ => "/".to_string(),
      };
      out.push(Endpoint {
        method,
        path,
        function_name: None,
        file: file_path.to_string(),
        start_line: Some(i + 1),
        end_line: Some(i + 1),
        snippet: Some(truncate_chars(line.trim(), 300)),
        framework: Some("Express".to_string()),
      });
    }
  }
  out
}

/// Run both JS detectors over the content map. Returns (endpoints, frameworks).
pub fn run_js_routes_analysis(files: &ContentMap) -> (Vec<Endpoint>, Vec<String>) {
  let mut endpoints = Vec::new();
  let mut frameworks: Vec<String> = Vec::new();

  for (path, content) in files {
    let normalized = path.replace('\\', "/");
    if normalized.starts_with(NEXT_PAGES_PREFIX) || normalized.starts_with(NEXT_APP_PREFIX) {
      if let Some(ep) = next_route_from_path(path) {
        endpoints.push(ep);
        if !frameworks.iter().any(|f| f == "Next.js") {
          frameworks.push("Next.js".to_string());
        }
      }
    }

    if SCRIPT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
      let express = express_routes_from_content(path, content);
      if !express.is_empty() && !frameworks.iter().any(|f| f == "Express") {
        frameworks.push("Express".to_string());
      }
      endpoints.extend(express);
    }
  }

  (endpoints, frameworks)
}
