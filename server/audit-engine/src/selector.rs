//! Prioritized blob selection for the content fetch. No code execution.
//!
//! Every eligible path lands in exactly one of six ordered tiers:
//! A docs, B CI workflows, C dependency manifests, D likely entrypoints,
//! E security-relevant config, F general source. Tiers A-E are never
//! truncated; tier F alone is capped so the important files always make
//! the fetch budget even in huge repositories.

use crate::paths::{basename, is_text_candidate, should_skip};
use crate::types::TreeEntry;

/// Cap for tier F (general source) so tiers A-E always get room.
pub const MAX_TIER_F: usize = 150;

const DOC_PREFIXES: &[&str] = &["README", "CONTRIBUTING", "SECURITY", "CHANGELOG", "LICENSE"];

const MANIFEST_NAMES: &[&str] = &[
  "package.json",
  "pyproject.toml",
  "pipfile",
  "poetry.lock",
  "package-lock.json",
  "yarn.lock",
  "pnpm-lock.yaml",
  "pipfile.lock",
];

const ENTRY_NAMES: &[&str] = &[
  "main.py",
  "app.py",
  "server.py",
  "server.js",
  "server.ts",
  "index.js",
  "index.ts",
  "index.tsx",
];

const SOURCE_ROOT_PREFIXES: &[&str] = &[
  "src/",
  "app/",
  "backend/",
  "api/",
  "services/",
  "routes/",
  "routers/",
];

fn is_doc(path: &str) -> bool {
  let base = basename(path).to_uppercase();
  DOC_PREFIXES.iter().any(|p| base.starts_with(p))
}

fn is_workflow(path: &str) -> bool {
  path.starts_with(".github/workflows/") && (path.ends_with(".yml") || path.ends_with(".yaml"))
}

fn is_manifest(path: &str) -> bool {
  let base = basename(path).to_lowercase();
  if MANIFEST_NAMES.contains(&base.as_str()) {
    return true;
  }
  base.ends_with(".txt") && base.starts_with("requirements")
}

fn is_entrypoint(path: &str) -> bool {
  let lower = path.to_lowercase();
  let base = basename(&lower);
  if ENTRY_NAMES.contains(&base) {
    return true;
  }
  // A source-root prefix with at least one further directory level below it;
  // flat files directly under a source root fall through to tier F.
  SOURCE_ROOT_PREFIXES
    .iter()
    .any(|prefix| match lower.strip_prefix(prefix) {
      Some(rest) => rest.contains('/'),
      None => false,
    })
}

fn is_security_config(path: &str) -> bool {
  let base = basename(path).to_lowercase();
  if base.starts_with(".env") {
    return true;
  }
  base.starts_with("config.") && is_text_candidate(path)
}

fn is_general_source(path: &str) -> bool {
  let lower = path.to_lowercase();
  SOURCE_ROOT_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Tier index 0..6 (A..F), or None to discard.
fn tier(path: &str) -> Option<usize> {
  if is_doc(path) {
    Some(0)
  } else if is_workflow(path) {
    Some(1)
  } else if is_manifest(path) {
    Some(2)
  } else if is_entrypoint(path) {
    Some(3)
  } else if is_security_config(path) {
    Some(4)
  } else if is_general_source(path) {
    Some(5)
  } else {
    None
  }
}

/// Return the ordered, capped fetch plan for a tree listing.
///
/// Skipped paths and entries without a sha are dropped. Within each tier,
/// entries sort lexicographically by path so the plan is reproducible
/// regardless of remote listing order.
pub fn select_candidates(tree: &[TreeEntry]) -> Vec<TreeEntry> {
  let mut tiers: [Vec<&TreeEntry>; 6] = Default::default();
  for entry in tree {
    let path = entry.path.replace('\\', "/");
    if path.is_empty() || should_skip(&path) || entry.sha.is_empty() {
      continue;
    }
    if let Some(t) = tier(&path) {
      tiers[t].push(entry);
    }
  }

  for bucket in tiers.iter_mut() {
    bucket.sort_by(|a, b| a.path.cmp(&b.path));
  }
  tiers[5].truncate(MAX_TIER_F);

  tiers.iter().flat_map(|b| b.iter().map(|e| (*e).clone())).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(path: &str) -> TreeEntry {
    TreeEntry {
      path: path.to_string(),
      sha: format!("sha-{path}"),
      size: None,
    }
  }

  #[test]
  fn docs_then_ci_then_manifests() {
    let tree = vec![
      entry("package.json"),
      entry("README.md"),
      entry(".github/workflows/ci.yml"),
    ];
    let plan = select_candidates(&tree);
    let paths: Vec<&str> = plan.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["README.md", ".github/workflows/ci.yml", "package.json"]);
  }

  #[test]
  fn tier_f_is_capped_but_earlier_tiers_are_not() {
    let mut tree: Vec<TreeEntry> = (0..300).map(|i| entry(&format!("src/f{i:03}.py"))).collect();
    tree.push(entry("README.md"));
    let plan = select_candidates(&tree);
    assert_eq!(plan.len(), MAX_TIER_F + 1);
    assert_eq!(plan[0].path, "README.md");
  }

  #[test]
  fn three_hundred_flat_source_files_cap_at_150() {
    let tree: Vec<TreeEntry> = (0..300).map(|i| entry(&format!("src/f{i:03}.py"))).collect();
    let plan = select_candidates(&tree);
    assert!(plan.len() <= MAX_TIER_F);
  }

  #[test]
  fn nested_source_counts_as_entrypoint_tier() {
    let tree = vec![entry("src/api/users.py"), entry("src/util.py")];
    let plan = select_candidates(&tree);
    // Nested path sorts into tier D ahead of the flat tier F file.
    assert_eq!(plan[0].path, "src/api/users.py");
    assert_eq!(plan[1].path, "src/util.py");
  }

  #[test]
  fn skipped_paths_never_appear() {
    let tree = vec![
      entry("node_modules/x.js"),
      entry("dist/bundle.min.js"),
      entry(".git/HEAD"),
      entry("src/api/main.py"),
    ];
    let plan = select_candidates(&tree);
    let paths: Vec<&str> = plan.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["src/api/main.py"]);
  }

  #[test]
  fn entries_without_sha_are_dropped() {
    let tree = vec![TreeEntry {
      path: "README.md".into(),
      sha: String::new(),
      size: None,
    }];
    assert!(select_candidates(&tree).is_empty());
  }

  #[test]
  fn env_and_config_files_land_in_security_tier() {
    let tree = vec![entry(".env.example"), entry("config.yaml"), entry("lib/util.rb")];
    let plan = select_candidates(&tree);
    let paths: Vec<&str> = plan.iter().map(|e| e.path.as_str()).collect();
    // lib/ is not a source root, so only the security-tier files survive.
    assert_eq!(paths, vec![".env.example", "config.yaml"]);
  }

  #[test]
  fn requirements_variants_are_manifests() {
    let tree = vec![entry("requirements-dev.txt"), entry("requirements.txt")];
    let plan = select_candidates(&tree);
    assert_eq!(plan.len(), 2);
  }

  #[test]
  fn within_tier_order_is_lexicographic() {
    let tree = vec![entry("docs/CHANGELOG.md"), entry("README.md"), entry("LICENSE")];
    let plan = select_candidates(&tree);
    let paths: Vec<&str> = plan.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["LICENSE", "README.md", "docs/CHANGELOG.md"]);
  }
}
