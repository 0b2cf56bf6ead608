//! Report persistence: pending/done/failed lifecycle rows in PostgreSQL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Full report row, returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDetail {
  pub id: Uuid,
  pub repo_url: String,
  pub repo_owner: Option<String>,
  pub repo_name: Option<String>,
  pub status: String,
  pub overall_score: Option<i32>,
  pub findings_json: Option<serde_json::Value>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Compact row for the listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReportListItem {
  pub id: Uuid,
  pub repo_url: String,
  pub score: Option<i32>,
  pub created_at: DateTime<Utc>,
}

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
  sqlx::query(
    r#"
    CREATE TABLE IF NOT EXISTS reports (
      id UUID PRIMARY KEY,
      repo_url TEXT NOT NULL,
      repo_owner TEXT,
      repo_name TEXT,
      status TEXT NOT NULL,
      overall_score INTEGER,
      findings_json JSONB,
      created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
      updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
  )
  .execute(pool)
  .await?;
  Ok(())
}

/// Insert a pending report and return its id. The row transitions exactly
/// once, to done or failed, and is immutable after that.
pub async fn create_pending(pool: &PgPool, repo_url: &str) -> Result<Uuid, sqlx::Error> {
  let id = Uuid::new_v4();
  sqlx::query("INSERT INTO reports (id, repo_url, status) VALUES ($1, $2, 'pending')")
    .bind(id)
    .bind(repo_url)
    .execute(pool)
    .await?;
  Ok(id)
}

pub async fn mark_failed(pool: &PgPool, id: Uuid, message: &str) -> Result<(), sqlx::Error> {
  sqlx::query(
    "UPDATE reports SET status = 'failed', findings_json = $2, updated_at = now() WHERE id = $1",
  )
  .bind(id)
  .bind(serde_json::json!({ "error": message }))
  .execute(pool)
  .await?;
  Ok(())
}

pub async fn mark_done(
  pool: &PgPool,
  id: Uuid,
  repo_owner: &str,
  repo_name: &str,
  overall_score: i32,
  findings: serde_json::Value,
) -> Result<(), sqlx::Error> {
  sqlx::query(
    r#"
    UPDATE reports SET
      status = 'done',
      repo_owner = $2,
      repo_name = $3,
      overall_score = $4,
      findings_json = $5,
      updated_at = now()
    WHERE id = $1
    "#,
  )
  .bind(id)
  .bind(repo_owner)
  .bind(repo_name)
  .bind(overall_score)
  .bind(findings)
  .execute(pool)
  .await?;
  Ok(())
}

pub async fn get_report(pool: &PgPool, id: Uuid) -> Result<Option<ReportDetail>, sqlx::Error> {
  let row = sqlx::query(
    r#"
    SELECT id, repo_url, repo_owner, repo_name, status, overall_score,
           findings_json, created_at, updated_at
    FROM reports WHERE id = $1
    "#,
  )
  .bind(id)
  .fetch_optional(pool)
  .await?;

  row
    .map(|r| {
      Ok(ReportDetail {
        id: r.try_get("id")?,
        repo_url: r.try_get("repo_url")?,
        repo_owner: r.try_get("repo_owner")?,
        repo_name: r.try_get("repo_name")?,
        status: r.try_get("status")?,
        overall_score: r.try_get("overall_score")?,
        findings_json: r.try_get("findings_json")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
      })
    })
    .transpose()
}

pub async fn list_reports(pool: &PgPool, limit: i64) -> Result<Vec<ReportListItem>, sqlx::Error> {
  let rows = sqlx::query(
    r#"
    SELECT id, repo_url, overall_score, created_at
    FROM reports ORDER BY created_at DESC LIMIT $1
    "#,
  )
  .bind(limit)
  .fetch_all(pool)
  .await?;

  rows
    .into_iter()
    .map(|r| {
      Ok(ReportListItem {
        id: r.try_get("id")?,
        repo_url: r.try_get("repo_url")?,
        score: r.try_get("overall_score")?,
        created_at: r.try_get("created_at")?,
      })
    })
    .collect()
}
