//! SQLite run store implementation.
//!
//! Implements `RunStore` from `toolflow-core`. Run records and node traces
//! track execution state for inspection after the fact. Trace summaries and
//! errors are stored as JSON text.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use toolflow_core::store::RunStore;
use toolflow_types::error::StoreError;
use toolflow_types::run::{NodeTrace, Run, RunStatus, TraceError, TraceStatus};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `RunStore`.
pub struct SqliteRunStore {
    pool: DatabasePool,
}

impl SqliteRunStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct RunRow {
    run_id: String,
    workflow_id: String,
    status: String,
    created_at: String,
    started_at: Option<String>,
    ended_at: Option<String>,
}

impl RunRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            run_id: row.try_get("run_id")?,
            workflow_id: row.try_get("workflow_id")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            started_at: row.try_get("started_at")?,
            ended_at: row.try_get("ended_at")?,
        })
    }

    fn into_run(self) -> Result<Run, StoreError> {
        let status: RunStatus =
            serde_json::from_value(serde_json::Value::String(self.status.clone()))
                .map_err(|_| StoreError::Query(format!("invalid run status: {}", self.status)))?;

        Ok(Run {
            run_id: parse_uuid(&self.run_id)?,
            workflow_id: parse_uuid(&self.workflow_id)?,
            status,
            created_at: parse_datetime(&self.created_at)?,
            started_at: self.started_at.as_deref().map(parse_datetime).transpose()?,
            ended_at: self.ended_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

struct TraceRow {
    node_id: String,
    tool_id: String,
    status: String,
    started_at: Option<String>,
    ended_at: Option<String>,
    input_summary: String,
    output_summary: String,
    error: Option<String>,
}

impl TraceRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            node_id: row.try_get("node_id")?,
            tool_id: row.try_get("tool_id")?,
            status: row.try_get("status")?,
            started_at: row.try_get("started_at")?,
            ended_at: row.try_get("ended_at")?,
            input_summary: row.try_get("input_summary")?,
            output_summary: row.try_get("output_summary")?,
            error: row.try_get("error")?,
        })
    }

    fn into_trace(self) -> Result<NodeTrace, StoreError> {
        let status: TraceStatus =
            serde_json::from_value(serde_json::Value::String(self.status.clone()))
                .map_err(|_| StoreError::Query(format!("invalid trace status: {}", self.status)))?;

        let input_summary = serde_json::from_str(&self.input_summary)
            .map_err(|e| StoreError::Query(format!("invalid input_summary JSON: {e}")))?;
        let output_summary = serde_json::from_str(&self.output_summary)
            .map_err(|e| StoreError::Query(format!("invalid output_summary JSON: {e}")))?;

        let error: Option<TraceError> = self
            .error
            .as_deref()
            .map(|s| {
                serde_json::from_str(s)
                    .map_err(|e| StoreError::Query(format!("invalid trace error JSON: {e}")))
            })
            .transpose()?;

        Ok(NodeTrace {
            node_id: self.node_id,
            tool_id: self.tool_id,
            status,
            started_at: self.started_at.as_deref().map(parse_datetime).transpose()?,
            ended_at: self.ended_at.as_deref().map(parse_datetime).transpose()?,
            input_summary,
            output_summary,
            error,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn run_status_str(status: RunStatus) -> Result<String, StoreError> {
    let value = serde_json::to_value(status).map_err(|e| StoreError::Query(e.to_string()))?;
    Ok(value.as_str().unwrap_or("PENDING").to_string())
}

fn trace_status_str(status: TraceStatus) -> Result<String, StoreError> {
    let value = serde_json::to_value(status).map_err(|e| StoreError::Query(e.to_string()))?;
    Ok(value.as_str().unwrap_or("PENDING").to_string())
}

// ---------------------------------------------------------------------------
// RunStore impl
// ---------------------------------------------------------------------------

impl RunStore for SqliteRunStore {
    async fn create_run(&self, run: &Run) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO runs (run_id, workflow_id, status, created_at, started_at, ended_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(run.run_id.to_string())
        .bind(run.workflow_id.to_string())
        .bind(run_status_str(run.status)?)
        .bind(format_datetime(&run.created_at))
        .bind(run.started_at.as_ref().map(format_datetime))
        .bind(run.ended_at.as_ref().map(format_datetime))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn update_run_status(&self, run_id: &Uuid, status: RunStatus) -> Result<(), StoreError> {
        let status_str = run_status_str(status)?;
        let now = format_datetime(&Utc::now());

        // RUNNING stamps started_at; terminal states stamp ended_at.
        let query = match status {
            RunStatus::Running => {
                sqlx::query("UPDATE runs SET status = ?, started_at = ? WHERE run_id = ?")
                    .bind(status_str)
                    .bind(now)
            }
            RunStatus::Success | RunStatus::Failed => {
                sqlx::query("UPDATE runs SET status = ?, ended_at = ? WHERE run_id = ?")
                    .bind(status_str)
                    .bind(now)
            }
            RunStatus::Pending => {
                sqlx::query("UPDATE runs SET status = ? WHERE run_id = ?").bind(status_str)
            }
        };

        let result = query
            .bind(run_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn record_trace(&self, run_id: &Uuid, trace: &NodeTrace) -> Result<(), StoreError> {
        let input_summary = serde_json::to_string(&trace.input_summary)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let output_summary = serde_json::to_string(&trace.output_summary)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let error = trace
            .error
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO node_traces
               (run_id, node_id, tool_id, status, started_at, ended_at,
                input_summary, output_summary, error)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(run_id, node_id) DO UPDATE SET
                 tool_id = excluded.tool_id,
                 status = excluded.status,
                 started_at = excluded.started_at,
                 ended_at = excluded.ended_at,
                 input_summary = excluded.input_summary,
                 output_summary = excluded.output_summary,
                 error = excluded.error"#,
        )
        .bind(run_id.to_string())
        .bind(&trace.node_id)
        .bind(&trace.tool_id)
        .bind(trace_status_str(trace.status)?)
        .bind(trace.started_at.as_ref().map(format_datetime))
        .bind(trace.ended_at.as_ref().map(format_datetime))
        .bind(&input_summary)
        .bind(&output_summary)
        .bind(&error)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_run(&self, run_id: &Uuid) -> Result<Option<Run>, StoreError> {
        let row = sqlx::query(
            "SELECT run_id, workflow_id, status, created_at, started_at, ended_at
             FROM runs WHERE run_id = ?",
        )
        .bind(run_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = RunRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(r.into_run()?))
            }
            None => Ok(None),
        }
    }

    async fn list_traces(&self, run_id: &Uuid) -> Result<Vec<NodeTrace>, StoreError> {
        let rows = sqlx::query(
            "SELECT node_id, tool_id, status, started_at, ended_at,
                    input_summary, output_summary, error
             FROM node_traces WHERE run_id = ? ORDER BY id ASC",
        )
        .bind(run_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut traces = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = TraceRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            traces.push(r.into_trace()?);
        }
        Ok(traces)
    }

    async fn list_runs(&self, workflow_id: &Uuid) -> Result<Vec<Run>, StoreError> {
        let rows = sqlx::query(
            "SELECT run_id, workflow_id, status, created_at, started_at, ended_at
             FROM runs WHERE workflow_id = ? ORDER BY created_at DESC",
        )
        .bind(workflow_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut runs = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = RunRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            runs.push(r.into_run()?);
        }
        Ok(runs)
    }
}
