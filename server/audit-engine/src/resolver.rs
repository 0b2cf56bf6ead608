//! Content lookup with a fixed fallback chain:
//! fetched content map -> pre-fetched key-file snippet -> absent.
//!
//! Every check battery resolves file text through this one type so none of
//! them carry their own fallback logic.

use crate::types::{ContentMap, RepoSnapshot};

pub struct ContentResolver<'a> {
  snapshot: &'a RepoSnapshot,
  content: &'a ContentMap,
}

impl<'a> ContentResolver<'a> {
  pub fn new(snapshot: &'a RepoSnapshot, content: &'a ContentMap) -> Self {
    Self { snapshot, content }
  }

  pub fn snapshot(&self) -> &'a RepoSnapshot {
    self.snapshot
  }

  pub fn content(&self) -> &'a ContentMap {
    self.content
  }

  /// Resolve text for a path, short-circuiting on the first tier that hits.
  /// An oversized (skipped) key-file snippet counts as absent.
  pub fn resolve(&self, path: &str) -> Option<&'a str> {
    if let Some(text) = self.content.get(path) {
      return Some(text.as_str());
    }
    let key_file = self.snapshot.key_file(path)?;
    if key_file.skipped {
      return None;
    }
    Some(key_file.snippet.as_str())
  }

  pub fn resolve_or_empty(&self, path: &str) -> &'a str {
    self.resolve(path).unwrap_or("")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::KeyFileSnippet;

  fn snapshot_with_key_file(path: &str, snippet: &str, skipped: bool) -> RepoSnapshot {
    RepoSnapshot {
      key_files: vec![KeyFileSnippet {
        path: path.to_string(),
        snippet: snippet.to_string(),
        skipped,
      }],
      ..Default::default()
    }
  }

  #[test]
  fn fetched_content_wins_over_key_file_snippet() {
    let snapshot = snapshot_with_key_file("README.md", "snippet tier", false);
    let mut content = ContentMap::new();
    content.insert("README.md".into(), "full content".into());
    let resolver = ContentResolver::new(&snapshot, &content);
    assert_eq!(resolver.resolve("README.md"), Some("full content"));
  }

  #[test]
  fn falls_back_to_key_file_snippet() {
    let snapshot = snapshot_with_key_file("README.md", "snippet tier", false);
    let content = ContentMap::new();
    let resolver = ContentResolver::new(&snapshot, &content);
    assert_eq!(resolver.resolve("README.md"), Some("snippet tier"));
  }

  #[test]
  fn oversized_key_file_counts_as_absent() {
    let snapshot = snapshot_with_key_file("README.md", "", true);
    let content = ContentMap::new();
    let resolver = ContentResolver::new(&snapshot, &content);
    assert_eq!(resolver.resolve("README.md"), None);
    assert_eq!(resolver.resolve_or_empty("README.md"), "");
  }

  #[test]
  fn unknown_path_is_absent() {
    let snapshot = RepoSnapshot::default();
    let content = ContentMap::new();
    let resolver = ContentResolver::new(&snapshot, &content);
    assert_eq!(resolver.resolve("missing.txt"), None);
  }
}
