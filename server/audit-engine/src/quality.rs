//! Quality signals: lint/format/typecheck/test config presence. No execution.

use serde::{Deserialize, Serialize};

use crate::types::{ContentMap, Finding, FindingEvidence, Severity};

const LINT_CONFIG_NAMES: &[&str] = &[
  "ruff.toml",
  ".ruff.toml",
  "pyproject.toml",
  "mypy.ini",
  ".mypy.ini",
  ".eslintrc",
  ".eslintrc.js",
  ".eslintrc.json",
  ".eslintrc.yml",
  "eslint.config.js",
  ".prettierrc",
  ".prettierrc.js",
  ".prettierrc.json",
  "prettier.config.js",
];

const TEST_DIR_PREFIXES: &[&str] = &["tests/", "__tests__/", "src/test/", "src/tests/"];

const TEST_CONFIG_NAMES: &[&str] = &[
  "pytest.ini",
  "pyproject.toml",
  "jest.config.js",
  "jest.config.ts",
  "vitest.config.js",
  "vitest.config.ts",
];

/// Which quality tooling the scanned files showed evidence of.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualitySignals {
  pub lint_format: Vec<String>,
  pub typecheck: Vec<String>,
  pub test_dirs: Vec<String>,
  pub test_config: Vec<String>,
}

fn basename(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

/// Detect lint/format/typecheck/test presence across the content map.
pub fn run_quality_analysis(files: &ContentMap) -> (QualitySignals, Vec<Finding>) {
  let paths_lower: Vec<String> = files.keys().map(|p| p.replace('\\', "/").to_lowercase()).collect();

  let mut signals = QualitySignals::default();

  for p in &paths_lower {
    let base = basename(p);
    if LINT_CONFIG_NAMES.contains(&base) || LINT_CONFIG_NAMES.contains(&p.as_str()) {
      if p.contains("mypy") {
        signals.typecheck.push(p.clone());
      } else {
        signals.lint_format.push(p.clone());
      }
    }
    if TEST_CONFIG_NAMES.contains(&base) {
      signals.test_config.push(p.clone());
    }
  }

  for prefix in TEST_DIR_PREFIXES {
    let bare = prefix.trim_end_matches('/');
    if paths_lower.iter().any(|p| p == bare || p.starts_with(prefix)) {
      signals.test_dirs.push(bare.to_string());
    }
  }

  // pyproject may declare both lint and typecheck tool sections.
  if let Some(content) = files.get("pyproject.toml") {
    let lower = content.to_lowercase();
    if (lower.contains("[tool.mypy]") || lower.contains("mypy"))
      && !signals.typecheck.iter().any(|p| p == "pyproject.toml")
    {
      signals.typecheck.push("pyproject.toml".to_string());
    }
    if (lower.contains("[tool.ruff]") || lower.contains("black") || lower.contains("ruff"))
      && !signals.lint_format.iter().any(|p| p == "pyproject.toml")
    {
      signals.lint_format.push("pyproject.toml".to_string());
    }
  }

  let mut findings = Vec::new();
  let info = |title: &str, description: &str, path: &str| Finding {
    title: title.to_string(),
    severity: Severity::Info,
    description: description.to_string(),
    evidence: FindingEvidence {
      path: path.to_string(),
      start_line: None,
      end_line: None,
      snippet: String::new(),
    },
  };
  for p in signals.lint_format.iter().take(5) {
    findings.push(info("Lint/format config", "Lint or format configuration detected.", p));
  }
  for p in signals.typecheck.iter().take(3) {
    findings.push(info("Typecheck config", "Type checker configuration detected.", p));
  }
  for d in signals.test_dirs.iter().take(3) {
    findings.push(info("Test directory", "Test directory detected.", d));
  }

  (signals, findings)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn files_of(paths: &[(&str, &str)]) -> ContentMap {
    paths.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect()
  }

  #[test]
  fn lint_config_basenames_are_detected() {
    let files = files_of(&[("frontend/.eslintrc.json", "{}"), ("src/app.ts", "")]);
    let (signals, findings) = run_quality_analysis(&files);
    assert_eq!(signals.lint_format, vec!["frontend/.eslintrc.json"]);
    assert!(findings.iter().any(|f| f.title == "Lint/format config"));
  }

  #[test]
  fn mypy_config_counts_as_typecheck() {
    let files = files_of(&[("mypy.ini", "[mypy]")]);
    let (signals, _) = run_quality_analysis(&files);
    assert!(signals.lint_format.is_empty());
    assert_eq!(signals.typecheck, vec!["mypy.ini"]);
  }

  #[test]
  fn test_dirs_and_config_are_detected() {
    let files = files_of(&[
      ("tests/test_app.py", "def test(): pass"),
      ("jest.config.js", "module.exports = {}"),
    ]);
    let (signals, _) = run_quality_analysis(&files);
    assert_eq!(signals.test_dirs, vec!["tests"]);
    assert_eq!(signals.test_config, vec!["jest.config.js"]);
  }

  #[test]
  fn pyproject_markers_add_both_kinds() {
    let files = files_of(&[(
      "pyproject.toml",
      "[tool.ruff]\nline-length = 100\n[tool.mypy]\nstrict = true\n",
    )]);
    let (signals, _) = run_quality_analysis(&files);
    assert!(signals.lint_format.iter().any(|p| p == "pyproject.toml"));
    assert!(signals.typecheck.iter().any(|p| p == "pyproject.toml"));
  }

  #[test]
  fn empty_map_yields_no_signals() {
    let (signals, findings) = run_quality_analysis(&ContentMap::new());
    assert!(signals.lint_format.is_empty());
    assert!(findings.is_empty());
  }
}
