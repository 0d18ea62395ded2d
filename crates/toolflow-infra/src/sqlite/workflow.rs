//! SQLite workflow store implementation.
//!
//! Implements `WorkflowStore` from `toolflow-core` using sqlx with split
//! read/write pools. The full workflow definition is stored as a JSON blob;
//! a few columns are duplicated for filtering and ordering.

use sqlx::Row;
use uuid::Uuid;

use toolflow_core::store::WorkflowStore;
use toolflow_types::error::StoreError;
use toolflow_types::workflow::Workflow;

use super::pool::DatabasePool;
use super::format_datetime;

/// SQLite-backed implementation of `WorkflowStore`.
pub struct SqliteWorkflowStore {
    pool: DatabasePool,
}

impl SqliteWorkflowStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct WorkflowRow {
    definition: String,
}

impl WorkflowRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            definition: row.try_get("definition")?,
        })
    }

    fn into_workflow(self) -> Result<Workflow, StoreError> {
        serde_json::from_str(&self.definition)
            .map_err(|e| StoreError::Query(format!("invalid workflow definition JSON: {e}")))
    }
}

// ---------------------------------------------------------------------------
// WorkflowStore impl
// ---------------------------------------------------------------------------

impl WorkflowStore for SqliteWorkflowStore {
    async fn save_workflow(&self, workflow: &Workflow) -> Result<(), StoreError> {
        let definition_json = serde_json::to_string(workflow)
            .map_err(|e| StoreError::Query(format!("serialize workflow: {e}")))?;

        sqlx::query(
            r#"INSERT INTO workflows (workflow_id, project_id, name, definition, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(workflow_id) DO UPDATE SET
                 project_id = excluded.project_id,
                 name = excluded.name,
                 definition = excluded.definition,
                 updated_at = excluded.updated_at"#,
        )
        .bind(workflow.workflow_id.to_string())
        .bind(&workflow.project_id)
        .bind(&workflow.name)
        .bind(&definition_json)
        .bind(format_datetime(&workflow.created_at))
        .bind(format_datetime(&workflow.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_workflow(&self, id: &Uuid) -> Result<Option<Workflow>, StoreError> {
        let row = sqlx::query("SELECT definition FROM workflows WHERE workflow_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = WorkflowRow::from_row(&row)
                    .map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(r.into_workflow()?))
            }
            None => Ok(None),
        }
    }

    async fn list_workflows(&self, project_id: &str) -> Result<Vec<Workflow>, StoreError> {
        let rows = sqlx::query(
            "SELECT definition FROM workflows WHERE project_id = ? ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut workflows = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = WorkflowRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            workflows.push(r.into_workflow()?);
        }
        Ok(workflows)
    }

    async fn delete_workflow(&self, id: &Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM workflows WHERE workflow_id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
