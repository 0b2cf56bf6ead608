//! Language breakdown by file extension. No content inspection.

use std::collections::BTreeMap;

fn language_for_extension(ext: &str) -> Option<&'static str> {
  let lang = match ext {
    ".py" | ".pyi" => "Python",
    ".js" | ".jsx" | ".mjs" | ".cjs" => "JavaScript",
    ".ts" | ".tsx" => "TypeScript",
    ".vue" => "Vue",
    ".svelte" => "Svelte",
    ".rb" => "Ruby",
    ".go" => "Go",
    ".rs" => "Rust",
    ".java" => "Java",
    ".kt" => "Kotlin",
    ".scala" => "Scala",
    ".cs" => "C#",
    ".cpp" | ".hpp" => "C++",
    ".c" => "C",
    ".h" => "C/C++",
    ".php" => "PHP",
    ".swift" => "Swift",
    ".md" => "Markdown",
    ".json" => "JSON",
    ".yaml" | ".yml" => "YAML",
    ".toml" => "TOML",
    ".html" => "HTML",
    ".css" => "CSS",
    ".scss" => "SCSS",
    ".sql" => "SQL",
    ".sh" | ".bash" | ".zsh" => "Shell",
    _ => return None,
  };
  Some(lang)
}

/// Count files per language, inferred purely from extension.
/// Unknown or missing extensions bucket into "Other".
pub fn language_breakdown<'a>(paths: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
  let mut counts: BTreeMap<String, usize> = BTreeMap::new();
  for path in paths {
    let ext = match path.rfind('.') {
      Some(idx) => path[idx..].to_lowercase(),
      None => String::new(),
    };
    let lang = language_for_extension(&ext).unwrap_or("Other");
    *counts.entry(lang.to_string()).or_insert(0) += 1;
  }
  counts
}
