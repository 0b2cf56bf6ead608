//! Path classification and fetch budgets. Pure predicates, no I/O.

/// Hard cap on how many blobs get content-fetched per run.
pub const MAX_FILES_FETCH: usize = 250;
/// Total byte budget across all fetched content per run.
pub const MAX_TOTAL_BYTES: usize = 5 * 1024 * 1024;
/// Per-file byte ceiling, enforced again at the blob API boundary.
pub const MAX_FILE_BYTES: usize = 200_000;

const SKIP_DIRS: &[&str] = &[
  "node_modules",
  "dist",
  "build",
  ".next",
  ".venv",
  "venv",
  ".git",
  "__pycache__",
  ".mypy_cache",
  ".ruff_cache",
  ".pytest_cache",
  ".tox",
  "target",
  "vendor",
  "coverage",
  ".coverage",
  "htmlcov",
  ".eggs",
  ".idea",
  ".vscode",
];

const SKIP_EXTS: &[&str] = &[
  ".png", ".jpg", ".jpeg", ".gif", ".webp", ".ico", ".svg", ".pdf", ".zip", ".tar", ".gz",
  ".xz", ".rar", ".7z", ".exe", ".dll", ".so", ".dylib", ".bin", ".woff", ".woff2", ".ttf",
  ".otf", ".eot", ".pyc", ".pyo", ".pyd", ".class", ".jar", ".war", ".db", ".sqlite",
  ".sqlite3", ".mp3", ".mp4", ".webm", ".mov", ".avi",
];

const SKIP_MINIFIED_SUFFIXES: &[&str] = &[".min.js", ".min.css", ".min.mjs", ".map"];

/// Last path segment, with backslashes normalized.
pub fn basename(path: &str) -> &str {
  let normalized = path.trim_end_matches(['/', '\\']);
  normalized
    .rsplit(['/', '\\'])
    .next()
    .unwrap_or(normalized)
}

/// Extension including the dot, lowercased, of the final segment.
fn extension_lower(base: &str) -> Option<String> {
  let idx = base.rfind('.')?;
  if idx == 0 {
    // dotfile like `.env`, not an extension
    return None;
  }
  Some(base[idx..].to_lowercase())
}

/// True if the path is a vendor/build/cache artifact, a binary blob, or a
/// minified/sourcemap file — anything not worth fetching or scanning.
pub fn should_skip(path: &str) -> bool {
  if path.trim().is_empty() {
    return true;
  }
  let normalized = path.replace('\\', "/");
  let trimmed = normalized.trim_matches('/');
  for part in trimmed.to_lowercase().split('/') {
    if SKIP_DIRS.contains(&part) {
      return true;
    }
    if part.ends_with(".egg-info") || part == ".egg-info" {
      return true;
    }
  }
  let base = basename(trimmed).to_lowercase();
  if let Some(ext) = extension_lower(&base) {
    if SKIP_EXTS.contains(&ext.as_str()) {
      return true;
    }
  }
  if SKIP_MINIFIED_SUFFIXES.iter().any(|s| base.ends_with(s)) {
    return true;
  }
  false
}

/// Eligible for text/content inspection.
pub fn is_text_candidate(path: &str) -> bool {
  !should_skip(path)
}
