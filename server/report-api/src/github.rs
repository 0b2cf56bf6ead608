//! GitHub REST client: repo metadata, recursive tree listing, root key-file
//! and workflow snippets, and blob content by sha. Read-only throughout.

use std::collections::HashSet;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{header, StatusCode};
use thiserror::Error;

use audit_engine::paths::MAX_FILE_BYTES;
use audit_engine::types::{KeyFileSnippet, WorkflowSnippet};
use audit_engine::{RepoSnapshot, TreeEntry};

const API_BASE: &str = "https://api.github.com";
const TIMEOUT_SECONDS: u64 = 20;
/// Snippet ceiling (characters) for pre-fetched key files and workflows.
const SNIPPET_CHARS: usize = 4096;
/// At most this many workflow definitions get their content pre-fetched.
const MAX_WORKFLOW_SNIPPETS: usize = 3;

/// Root files fetched ahead of the main content pass. These feed the legacy
/// key-file fallback tier and keep small repos analyzable even when the
/// budgeted content fetch retrieves nothing.
const KEY_FILES_ROOT: &[&str] = &[
  "README.md",
  "package.json",
  "pnpm-lock.yaml",
  "yarn.lock",
  "package-lock.json",
  "requirements.txt",
  "pyproject.toml",
  "poetry.lock",
  "Dockerfile",
  "docker-compose.yml",
  "Makefile",
  ".env.example",
];

const TEST_FOLDER_PREFIXES: &[&str] = &["tests/", "__tests__/", "src/test/", "src/tests/"];

fn rate_limit_message(retry_after: &Option<u64>) -> String {
  match retry_after {
    Some(secs) => format!("GitHub API rate limit exceeded. Try again in {secs} seconds."),
    None => {
      "GitHub API rate limit exceeded. Try again later, or set GITHUB_TOKEN for higher limits."
        .to_string()
    }
  }
}

#[derive(Debug, Error)]
pub enum GitHubError {
  #[error("{0}")]
  InvalidUrl(String),

  #[error("Repository not found")]
  NotFound,

  #[error("{}", rate_limit_message(.retry_after))]
  RateLimited { retry_after: Option<u64> },

  #[error("{0}")]
  Api(String),
}

/// Extract (owner, name) from a github.com URL. Accepts optional `.git`
/// suffixes and deep links (`/tree/<ref>`, `/blob/<ref>/...`); everything
/// past the repo name is ignored.
pub fn parse_repo_url(url: &str) -> Result<(String, String), GitHubError> {
  let s = url.trim();
  if s.is_empty() {
    return Err(GitHubError::InvalidUrl("URL is required".into()));
  }
  let rest = s
    .strip_prefix("https://")
    .or_else(|| s.strip_prefix("http://"))
    .ok_or_else(|| GitHubError::InvalidUrl("URL must use http or https".into()))?;
  let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
  if !host.eq_ignore_ascii_case("github.com") {
    return Err(GitHubError::InvalidUrl("URL must point to github.com".into()));
  }
  let path = path.trim_matches('/');
  let path = if path.len() >= 4 && path[path.len() - 4..].eq_ignore_ascii_case(".git") {
    &path[..path.len() - 4]
  } else {
    path
  };
  let mut parts = path.split('/').filter(|p| !p.is_empty());
  match (parts.next(), parts.next()) {
    (Some(owner), Some(name)) => Ok((owner.to_string(), name.to_string())),
    _ => Err(GitHubError::InvalidUrl(
      "URL must contain owner and repo name (e.g. github.com/owner/name)".into(),
    )),
  }
}

fn retry_after(resp: &reqwest::Response) -> Option<u64> {
  resp
    .headers()
    .get(header::RETRY_AFTER)?
    .to_str()
    .ok()?
    .trim()
    .parse()
    .ok()
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, GitHubError> {
  let status = resp.status();
  if status == StatusCode::NOT_FOUND {
    return Err(GitHubError::NotFound);
  }
  if status == StatusCode::TOO_MANY_REQUESTS {
    return Err(GitHubError::RateLimited {
      retry_after: retry_after(&resp),
    });
  }
  if status == StatusCode::FORBIDDEN {
    let retry = retry_after(&resp);
    let remaining_zero = resp
      .headers()
      .get("x-ratelimit-remaining")
      .and_then(|v| v.to_str().ok())
      .map(|v| v.trim() == "0")
      .unwrap_or(false);
    if remaining_zero {
      return Err(GitHubError::RateLimited { retry_after: retry });
    }
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
      .unwrap_or_default();
    if message.to_lowercase().contains("rate limit") {
      return Err(GitHubError::RateLimited { retry_after: retry });
    }
    let detail = if message.is_empty() { "Forbidden".to_string() } else { message };
    return Err(GitHubError::Api(format!("GitHub API error: {detail}")));
  }
  if status.is_server_error() {
    return Err(GitHubError::Api("GitHub API is unavailable".into()));
  }
  if !status.is_success() {
    return Err(GitHubError::Api(format!("GitHub API error: {status}")));
  }
  Ok(resp)
}

fn decode_base64_text(raw: &str) -> String {
  // The contents API wraps base64 at 60 columns.
  let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
  match BASE64.decode(compact.as_bytes()) {
    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
    Err(_) => String::new(),
  }
}

/// Byte-bounded truncation that never splits a UTF-8 code point.
pub fn truncate_bytes(text: &str, max: usize) -> String {
  if text.len() <= max {
    return text.to_string();
  }
  let mut end = max;
  while !text.is_char_boundary(end) {
    end -= 1;
  }
  text[..end].to_string()
}

struct ContentsFile {
  snippet: String,
  skipped: bool,
}

pub struct GitHubClient {
  http: reqwest::Client,
  token: Option<String>,
}

impl GitHubClient {
  pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
    let http = reqwest::Client::builder()
      .user_agent("repo-audit-report-api")
      .timeout(Duration::from_secs(TIMEOUT_SECONDS))
      .build()
      .map_err(|e| GitHubError::Api(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { http, token })
  }

  async fn get_json(&self, url: &str) -> Result<serde_json::Value, GitHubError> {
    let mut req = self
      .http
      .get(url)
      .header(header::ACCEPT, "application/vnd.github.v3+json");
    if let Some(token) = &self.token {
      req = req.bearer_auth(token);
    }
    let resp = req
      .send()
      .await
      .map_err(|_| GitHubError::Api("GitHub API request failed".into()))?;
    let resp = check(resp).await?;
    resp
      .json()
      .await
      .map_err(|_| GitHubError::Api("GitHub API returned invalid JSON".into()))
  }

  /// Contents-API fetch for one path. Returns None on 404 or if the path is
  /// a directory; oversized files come back with `skipped` set.
  async fn contents_file(
    &self,
    owner: &str,
    name: &str,
    path: &str,
    reference: &str,
  ) -> Result<Option<ContentsFile>, GitHubError> {
    let url = format!("{API_BASE}/repos/{owner}/{name}/contents/{path}?ref={reference}");
    let obj = match self.get_json(&url).await {
      Ok(v) => v,
      Err(GitHubError::NotFound) => return Ok(None),
      Err(e) => return Err(e),
    };
    if obj.is_array() {
      return Ok(None);
    }
    let size = obj.get("size").and_then(|v| v.as_u64()).unwrap_or(0);
    if size > MAX_FILE_BYTES as u64 {
      return Ok(Some(ContentsFile {
        snippet: String::new(),
        skipped: true,
      }));
    }
    let raw = obj.get("content").and_then(|v| v.as_str()).unwrap_or("");
    let snippet: String = decode_base64_text(raw).chars().take(SNIPPET_CHARS).collect();
    Ok(Some(ContentsFile {
      snippet,
      skipped: false,
    }))
  }

  /// Resolve a repo reference into a full snapshot: default branch, blob
  /// tree, up to three workflow snippets, root key-file snippets, and
  /// detected test folders.
  pub async fn fetch_snapshot(&self, owner: &str, name: &str) -> Result<RepoSnapshot, GitHubError> {
    let repo = self.get_json(&format!("{API_BASE}/repos/{owner}/{name}")).await?;
    let default_branch = repo
      .get("default_branch")
      .and_then(|v| v.as_str())
      .map(str::to_string);
    let reference = default_branch.clone().unwrap_or_else(|| "HEAD".to_string());

    let data = self
      .get_json(&format!(
        "{API_BASE}/repos/{owner}/{name}/git/trees/{reference}?recursive=1"
      ))
      .await?;
    let mut tree = Vec::new();
    if let Some(nodes) = data.get("tree").and_then(|v| v.as_array()) {
      for node in nodes {
        if node.get("type").and_then(|v| v.as_str()) != Some("blob") {
          continue;
        }
        let Some(path) = node.get("path").and_then(|v| v.as_str()) else {
          continue;
        };
        tree.push(TreeEntry {
          path: path.to_string(),
          sha: node
            .get("sha")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
          size: node.get("size").and_then(|v| v.as_u64()),
        });
      }
    }

    let workflow_paths: Vec<String> = tree
      .iter()
      .map(|e| e.path.clone())
      .filter(|p| {
        p.starts_with(".github/workflows/") && (p.ends_with(".yml") || p.ends_with(".yaml"))
      })
      .take(MAX_WORKFLOW_SNIPPETS)
      .collect();
    let mut workflows = Vec::new();
    for path in &workflow_paths {
      if let Some(file) = self.contents_file(owner, name, path, &reference).await? {
        workflows.push(WorkflowSnippet {
          path: path.clone(),
          snippet: file.snippet,
        });
      }
    }

    let path_set: HashSet<&str> = tree.iter().map(|e| e.path.as_str()).collect();
    let mut key_files = Vec::new();
    for root_file in KEY_FILES_ROOT {
      if !path_set.contains(root_file) {
        continue;
      }
      if let Some(file) = self.contents_file(owner, name, root_file, &reference).await? {
        key_files.push(KeyFileSnippet {
          path: (*root_file).to_string(),
          snippet: file.snippet,
          skipped: file.skipped,
        });
      }
    }

    let mut test_folders_detected = Vec::new();
    for prefix in TEST_FOLDER_PREFIXES {
      let bare = prefix.trim_end_matches('/');
      if path_set
        .iter()
        .any(|p| *p == bare || p.starts_with(prefix))
      {
        test_folders_detected.push(bare.to_string());
      }
    }

    Ok(RepoSnapshot {
      owner: owner.to_string(),
      name: name.to_string(),
      default_branch,
      tree,
      key_files,
      workflows,
      test_folders_detected,
    })
  }

  /// Fetch one blob by sha and decode to text, hard-capped at the per-file
  /// byte ceiling.
  pub async fn get_blob_text(
    &self,
    owner: &str,
    repo: &str,
    sha: &str,
  ) -> Result<String, GitHubError> {
    let obj = self
      .get_json(&format!("{API_BASE}/repos/{owner}/{repo}/git/blobs/{sha}"))
      .await?;
    let raw = obj.get("content").and_then(|v| v.as_str()).unwrap_or("");
    Ok(truncate_bytes(&decode_base64_text(raw), MAX_FILE_BYTES))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_plain_repo_url() {
    let (owner, name) = parse_repo_url("https://github.com/octo/shop-api").unwrap();
    assert_eq!(owner, "octo");
    assert_eq!(name, "shop-api");
  }

  #[test]
  fn strips_git_suffix_and_deep_links() {
    let (_, name) = parse_repo_url("https://github.com/octo/shop-api.git").unwrap();
    assert_eq!(name, "shop-api");
    let (_, name) = parse_repo_url("https://github.com/octo/shop-api/tree/main/src").unwrap();
    assert_eq!(name, "shop-api");
  }

  #[test]
  fn rejects_non_github_hosts_and_schemes() {
    assert!(parse_repo_url("https://gitlab.com/octo/repo").is_err());
    assert!(parse_repo_url("git@github.com:octo/repo.git").is_err());
    assert!(parse_repo_url("github.com/octo/repo").is_err());
  }

  #[test]
  fn rejects_missing_owner_or_name() {
    assert!(parse_repo_url("https://github.com/octo").is_err());
    assert!(parse_repo_url("https://github.com/").is_err());
    assert!(parse_repo_url("   ").is_err());
  }

  #[test]
  fn rate_limit_error_message_includes_retry_hint() {
    let with_retry = GitHubError::RateLimited {
      retry_after: Some(30),
    };
    assert!(with_retry.to_string().contains("30 seconds"));
    let without = GitHubError::RateLimited { retry_after: None };
    assert!(without.to_string().contains("GITHUB_TOKEN"));
  }

  #[test]
  fn base64_with_line_wrapping_decodes() {
    // "hello world\n" wrapped the way the contents API wraps it.
    assert_eq!(decode_base64_text("aGVsbG8g\nd29ybGQK"), "hello world\n");
    assert_eq!(decode_base64_text("!!!not base64"), "");
  }

  #[test]
  fn byte_truncation_respects_char_boundaries() {
    let s = "héllo";
    let cut = truncate_bytes(s, 2);
    assert_eq!(cut, "h");
    assert_eq!(truncate_bytes(s, 100), "héllo");
  }
}
