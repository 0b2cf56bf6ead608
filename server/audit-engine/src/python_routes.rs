//! FastAPI endpoint discovery via the Python AST. Parsing only, no execution.
//!
//! Two passes: first collect variable names bound to a `FastAPI()` or
//! `APIRouter()` constructor call, then match `@<var>.<verb>(path)` decorators
//! against only those names. A bare regex would also match arbitrary
//! `x.get(...)` attributes, hence the symbol-table pass.

use std::collections::HashSet;

use line_numbers::LinePositions;
use rustpython_parser::ast::{Constant, ExceptHandler, Expr, Mod, Stmt};
use rustpython_parser::{parse, Mode};

use crate::types::Endpoint;

const HTTP_METHODS: &[&str] = &["get", "post", "put", "delete", "patch", "head", "options"];
const ROUTER_CONSTRUCTORS: &[&str] = &["FastAPI", "APIRouter"];

const SNIPPET_MAX: usize = 500;

/// Walk every statement in the module, including nested bodies.
fn walk_stmts(stmts: &[Stmt], visit: &mut impl FnMut(&Stmt)) {
  for stmt in stmts {
    visit(stmt);
    match stmt {
      Stmt::FunctionDef(f) => walk_stmts(&f.body, visit),
      Stmt::AsyncFunctionDef(f) => walk_stmts(&f.body, visit),
      Stmt::ClassDef(c) => walk_stmts(&c.body, visit),
      Stmt::If(s) => {
        walk_stmts(&s.body, visit);
        walk_stmts(&s.orelse, visit);
      }
      Stmt::While(s) => {
        walk_stmts(&s.body, visit);
        walk_stmts(&s.orelse, visit);
      }
      Stmt::For(s) => {
        walk_stmts(&s.body, visit);
        walk_stmts(&s.orelse, visit);
      }
      Stmt::AsyncFor(s) => {
        walk_stmts(&s.body, visit);
        walk_stmts(&s.orelse, visit);
      }
      Stmt::With(s) => walk_stmts(&s.body, visit),
      Stmt::AsyncWith(s) => walk_stmts(&s.body, visit),
      Stmt::Try(s) => {
        walk_stmts(&s.body, visit);
        for handler in &s.handlers {
          let ExceptHandler::ExceptHandler(h) = handler;
          walk_stmts(&h.body, visit);
        }
        walk_stmts(&s.orelse, visit);
        walk_stmts(&s.finalbody, visit);
      }
      _ => {}
    }
  }
}

fn is_router_constructor(value: &Expr) -> bool {
  let Expr::Call(call) = value else {
    return false;
  };
  match call.func.as_ref() {
    Expr::Name(n) => ROUTER_CONSTRUCTORS.contains(&n.id.as_str()),
    Expr::Attribute(a) => ROUTER_CONSTRUCTORS.contains(&a.attr.as_str()),
    _ => false,
  }
}

/// Pass 1: names assigned from a FastAPI/APIRouter constructor call.
fn collect_app_names(body: &[Stmt]) -> HashSet<String> {
  let mut names = HashSet::new();
  walk_stmts(body, &mut |stmt| {
    if let Stmt::Assign(assign) = stmt {
      if is_router_constructor(&assign.value) {
        for target in &assign.targets {
          if let Expr::Name(n) = target {
            names.insert(n.id.to_string());
          }
        }
      }
    }
  });
  names
}

/// If the decorator is `<app_var>.<http_verb>(path)`, return (METHOD, path).
fn decorator_route(dec: &Expr, app_names: &HashSet<String>) -> Option<(String, String)> {
  let Expr::Call(call) = dec else {
    return None;
  };
  let Expr::Attribute(attr) = call.func.as_ref() else {
    return None;
  };
  let Expr::Name(var) = attr.value.as_ref() else {
    return None;
  };
  if !app_names.contains(var.id.as_str()) {
    return None;
  }
  let verb = attr.attr.as_str();
  if !HTTP_METHODS.contains(&verb) {
    return None;
  }
  let mut path = String::new();
  if let Some(Expr::Constant(c)) = call.args.first() {
    if let Constant::Str(s) = &c.value {
      path = s.clone();
    }
  }
  if path.is_empty() {
    path = "/".to_string();
  }
  Some((verb.to_uppercase(), path))
}

fn truncate_chars(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    s.chars().take(max).collect()
  }
}

/// Parse one Python source file and return its route-decorated endpoints.
/// Files that fail to parse yield no endpoints; the batch is never aborted.
pub fn extract_endpoints(file_path: &str, source: &str) -> Vec<Endpoint> {
  let body = match parse(source, Mode::Module, "<repo>") {
    Ok(Mod::Module(module)) => module.body,
    _ => return Vec::new(),
  };

  let app_names = collect_app_names(&body);
  if app_names.is_empty() {
    return Vec::new();
  }

  let positions = LinePositions::from(source);
  let lines: Vec<&str> = source.lines().collect();
  let mut endpoints = Vec::new();

  walk_stmts(&body, &mut |stmt| {
    let (name, decorators, range) = match stmt {
      Stmt::FunctionDef(f) => (f.name.as_str(), &f.decorator_list, f.range),
      Stmt::AsyncFunctionDef(f) => (f.name.as_str(), &f.decorator_list, f.range),
      _ => return,
    };
    let route = decorators.iter().find_map(|d| decorator_route(d, &app_names));
    let Some((method, path)) = route else {
      return;
    };

    let start_offset: usize = range.start().into();
    let end_offset: usize = range.end().into();
    let start_line = positions.from_offset(start_offset).as_usize() + 1;
    let end_line = positions
      .from_offset(end_offset.saturating_sub(1).min(source.len().saturating_sub(1)))
      .as_usize()
      + 1;
    let snippet = if start_line <= lines.len() {
      let end = end_line.min(lines.len());
      truncate_chars(&lines[start_line - 1..end].join("\n"), SNIPPET_MAX)
    } else {
      String::new()
    };

    endpoints.push(Endpoint {
      method,
      path,
      function_name: Some(name.to_string()),
      file: file_path.to_string(),
      start_line: Some(start_line),
      end_line: Some(end_line),
      snippet: Some(snippet),
      framework: Some("FastAPI".to_string()),
    });
  });

  endpoints
}

/// Run the decorator scan over every `.py` file in the content map.
pub fn run_fastapi_analysis(files: &crate::types::ContentMap) -> (Vec<Endpoint>, Vec<String>) {
  let mut endpoints = Vec::new();
  for (path, content) in files {
    if !path.ends_with(".py") {
      continue;
    }
    endpoints.extend(extract_endpoints(path, content));
  }
  let frameworks = if endpoints.is_empty() {
    Vec::new()
  } else {
    vec!["FastAPI".to_string()]
  };
  (endpoints, frameworks)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finds_get_root_endpoint() {
    let src = "from fastapi import FastAPI\napp = FastAPI()\n@app.get(\"/\")\ndef root(): pass\n";
    let eps = extract_endpoints("app/main.py", src);
    assert_eq!(eps.len(), 1);
    assert_eq!(eps[0].method, "GET");
    assert_eq!(eps[0].path, "/");
    assert_eq!(eps[0].function_name.as_deref(), Some("root"));
    assert_eq!(eps[0].start_line, Some(4));
  }

  #[test]
  fn finds_router_endpoints_and_async_defs() {
    let src = r#"
from fastapi import APIRouter

router = APIRouter()

@router.post("/items")
async def create_item(item: dict):
    return item

@router.delete("/items/{item_id}")
def delete_item(item_id: int):
    return {"deleted": item_id}
"#;
    let eps = extract_endpoints("app/api/items.py", src);
    assert_eq!(eps.len(), 2);
    assert_eq!(eps[0].method, "POST");
    assert_eq!(eps[0].path, "/items");
    assert_eq!(eps[1].method, "DELETE");
    assert_eq!(eps[1].path, "/items/{item_id}");
  }

  #[test]
  fn ignores_decorators_on_unknown_variables() {
    let src = "import x\nclient = x.Client()\n@client.get(\"/\")\ndef f(): pass\n";
    assert!(extract_endpoints("a.py", src).is_empty());
  }

  #[test]
  fn missing_path_argument_defaults_to_root() {
    let src = "from fastapi import FastAPI\napp = FastAPI()\n@app.get()\ndef f(): pass\n";
    let eps = extract_endpoints("a.py", src);
    assert_eq!(eps.len(), 1);
    assert_eq!(eps[0].path, "/");
  }

  #[test]
  fn unparseable_source_yields_nothing() {
    let src = "def broken(:\n  pass";
    assert!(extract_endpoints("bad.py", src).is_empty());
  }

  #[test]
  fn qualified_constructor_is_recognized() {
    let src = "import fastapi\napp = fastapi.FastAPI()\n@app.get(\"/ping\")\ndef ping(): pass\n";
    let eps = extract_endpoints("main.py", src);
    assert_eq!(eps.len(), 1);
    assert_eq!(eps[0].path, "/ping");
  }

  #[test]
  fn only_python_files_are_scanned() {
    let mut files = crate::types::ContentMap::new();
    files.insert(
      "main.ts".into(),
      "const app = FastAPI()".into(),
    );
    let (eps, frameworks) = run_fastapi_analysis(&files);
    assert!(eps.is_empty());
    assert!(frameworks.is_empty());
  }
}
