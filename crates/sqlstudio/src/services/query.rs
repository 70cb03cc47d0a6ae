//! Ad hoc SQL execution.

use serde::Serialize;
use serde_json::Value;
use sqlx::MySqlPool;

use crate::error::{Result, StudioError};
use crate::json;

/// How a statement is run: fetched for a result set, executed for an
/// affected-row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Fetch,
    Execute,
}

/// Result of an ad hoc statement.
///
/// Server-side SQL errors come back as `success: false` with `error`
/// set (HTTP 200): the console shows them inline next to the editor
/// instead of as a transport failure.
#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Strip `--` line comments so classification sees the statement, not
/// its prologue.
fn strip_line_comments(sql: &str) -> String {
    sql.lines()
        .map(|line| match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Classify a statement by its leading keyword: SELECT and SHOW return
/// rows, everything else returns an affected-row count.
pub fn classify(sql: &str) -> StatementKind {
    let cleaned = strip_line_comments(sql);
    let first = cleaned
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();
    match first.as_str() {
        "SELECT" | "SHOW" => StatementKind::Fetch,
        _ => StatementKind::Execute,
    }
}

/// Run one ad hoc statement.
pub async fn run_statement(pool: &MySqlPool, sql: &str) -> Result<QueryOutcome> {
    if sql.trim().is_empty() {
        return Err(StudioError::InvalidRequest(
            "SQL statement cannot be empty".to_string(),
        ));
    }

    match classify(sql) {
        StatementKind::Fetch => match sqlx::query(sql).fetch_all(pool).await {
            Ok(rows) => {
                let columns = rows.first().map(json::column_names).unwrap_or_default();
                let rows: Vec<Value> = rows.iter().map(json::row_to_json).collect();
                tracing::info!(returned = rows.len(), "ad hoc query fetched rows");
                Ok(QueryOutcome {
                    success: true,
                    columns: Some(columns),
                    rows: Some(rows),
                    affected_rows: None,
                    error: None,
                })
            }
            Err(sqlx::Error::Database(db)) => Ok(inline_error(db.message())),
            Err(other) => Err(other.into()),
        },
        StatementKind::Execute => match sqlx::query(sql).execute(pool).await {
            Ok(result) => {
                let affected = result.rows_affected();
                tracing::info!(affected, "ad hoc statement executed");
                Ok(QueryOutcome {
                    success: true,
                    columns: None,
                    rows: None,
                    affected_rows: Some(affected),
                    error: None,
                })
            }
            Err(sqlx::Error::Database(db)) => Ok(inline_error(db.message())),
            Err(other) => Err(other.into()),
        },
    }
}

fn inline_error(message: &str) -> QueryOutcome {
    tracing::warn!(message, "ad hoc statement rejected by server");
    QueryOutcome {
        success: false,
        columns: None,
        rows: None,
        affected_rows: None,
        error: Some(message.to_string()),
    }
}
