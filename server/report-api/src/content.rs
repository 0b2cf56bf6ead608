//! Budgeted blob content fetch for a selection plan.
//!
//! Sequential fetch with a per-run sha -> text cache: two tree entries that
//! share a sha cost one API call. The cache lives for one analysis run only.

use std::collections::HashMap;
use std::future::Future;

use audit_engine::paths::{should_skip, MAX_FILES_FETCH, MAX_TOTAL_BYTES};
use audit_engine::{ContentMap, FetchStats, TreeEntry};

use crate::github::{truncate_bytes, GitHubClient, GitHubError};

/// Fetch text for the planned blobs until the file-count or byte budget is
/// exhausted. Individual blob failures are logged and skipped; the batch
/// itself never fails.
pub async fn batch_fetch_text(
  client: &GitHubClient,
  owner: &str,
  repo: &str,
  blobs: &[TreeEntry],
) -> (ContentMap, FetchStats) {
  fetch_plan(blobs, MAX_FILES_FETCH, MAX_TOTAL_BYTES, |sha: String| {
    async move { client.get_blob_text(owner, repo, &sha).await }
  })
  .await
}

/// Walk the plan in order, calling `fetch` once per distinct sha, and stop at
/// the file-count or byte budget. A fetch that would overflow the byte budget
/// is clipped at a char boundary and becomes the last entry.
pub async fn fetch_plan<F, Fut>(
  blobs: &[TreeEntry],
  max_files: usize,
  max_total_bytes: usize,
  mut fetch: F,
) -> (ContentMap, FetchStats)
where
  F: FnMut(String) -> Fut,
  Fut: Future<Output = Result<String, GitHubError>>,
{
  let mut cache: HashMap<String, String> = HashMap::new();
  let mut result = ContentMap::new();
  let mut total_bytes = 0usize;
  let mut truncated = false;

  for blob in blobs {
    if result.len() >= max_files || total_bytes >= max_total_bytes {
      truncated = true;
      break;
    }
    if should_skip(&blob.path) || blob.sha.is_empty() {
      continue;
    }

    let text = match cache.get(&blob.sha) {
      Some(text) => text.clone(),
      None => match fetch(blob.sha.clone()).await {
        Ok(text) => {
          cache.insert(blob.sha.clone(), text.clone());
          text
        }
        Err(e) => {
          eprintln!("content fetch: skipping {}: {}", blob.path, e);
          continue;
        }
      },
    };

    let n = text.len();
    if total_bytes + n > max_total_bytes {
      let remaining = max_total_bytes - total_bytes;
      if remaining > 0 {
        let clipped = truncate_bytes(&text, remaining);
        total_bytes += clipped.len();
        result.insert(blob.path.clone(), clipped);
      }
      truncated = true;
      break;
    }
    total_bytes += n;
    result.insert(blob.path.clone(), text);
  }

  let stats = FetchStats {
    total_files: result.len(),
    total_bytes,
    truncated,
  };
  (result, stats)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  fn entry(path: &str, sha: &str) -> TreeEntry {
    TreeEntry {
      path: path.to_string(),
      sha: sha.to_string(),
      size: None,
    }
  }

  #[tokio::test]
  async fn shared_sha_is_fetched_once() {
    let calls = Cell::new(0usize);
    let blobs = vec![entry("a/copy.py", "sha1"), entry("b/copy.py", "sha1")];

    let (map, stats) = fetch_plan(&blobs, 250, 5 * 1024 * 1024, |sha| {
      calls.set(calls.get() + 1);
      async move { Ok(format!("text for {sha}")) }
    })
    .await;

    assert_eq!(calls.get(), 1);
    assert_eq!(map.len(), 2);
    assert_eq!(map["a/copy.py"], map["b/copy.py"]);
    assert!(!stats.truncated);
  }

  #[tokio::test]
  async fn file_budget_stops_the_batch() {
    let blobs = vec![
      entry("a.py", "s1"),
      entry("b.py", "s2"),
      entry("c.py", "s3"),
    ];

    let (map, stats) =
      fetch_plan(&blobs, 2, 5 * 1024 * 1024, |_| async { Ok("x".to_string()) }).await;

    assert_eq!(map.len(), 2);
    assert!(stats.truncated);
    assert!(!map.contains_key("c.py"));
  }

  #[tokio::test]
  async fn byte_budget_clips_the_overflowing_file() {
    let blobs = vec![entry("a.py", "s1"), entry("b.py", "s2")];

    // 10 bytes fit; the second fetch overflows a 15-byte budget and is
    // clipped to the 5 remaining bytes.
    let (map, stats) = fetch_plan(&blobs, 250, 15, |_| async { Ok("0123456789".to_string()) })
      .await;

    assert_eq!(map["a.py"], "0123456789");
    assert_eq!(map["b.py"], "01234");
    assert_eq!(stats.total_bytes, 15);
    assert!(stats.truncated);
  }

  #[tokio::test]
  async fn clip_lands_on_a_char_boundary() {
    let blobs = vec![entry("a.py", "s1")];

    // "héllo" is 6 bytes; a 2-byte budget falls inside the 2-byte é.
    let (map, stats) = fetch_plan(&blobs, 250, 2, |_| async { Ok("héllo".to_string()) }).await;

    assert_eq!(map["a.py"], "h");
    assert!(stats.total_bytes <= 2);
    assert!(stats.truncated);
  }

  #[tokio::test]
  async fn skipped_paths_and_failures_do_not_consume_budget() {
    let blobs = vec![
      entry("node_modules/x.js", "s1"),
      entry("bad.py", "s2"),
      entry("good.py", "s3"),
    ];

    let (map, stats) = fetch_plan(&blobs, 250, 5 * 1024 * 1024, |sha| async move {
      if sha == "s2" {
        Err(GitHubError::Api("boom".to_string()))
      } else {
        Ok("ok".to_string())
      }
    })
    .await;

    assert_eq!(map.len(), 1);
    assert!(map.contains_key("good.py"));
    assert_eq!(stats.total_files, 1);
    assert!(!stats.truncated);
  }
}
