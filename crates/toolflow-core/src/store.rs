//! Store trait definitions.
//!
//! Defines the persistence interface for workflow definitions and run
//! records. The infrastructure layer (toolflow-infra) implements these
//! traits with SQLite; tests use in-memory implementations.

use toolflow_types::error::StoreError;
use toolflow_types::run::{NodeTrace, Run, RunStatus};
use toolflow_types::workflow::Workflow;
use uuid::Uuid;

/// Store trait for workflow definition persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait WorkflowStore: Send + Sync {
    /// Upsert a workflow definition (insert or replace by ID).
    fn save_workflow(
        &self,
        workflow: &Workflow,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Get a workflow by its UUID.
    fn get_workflow(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Workflow>, StoreError>> + Send;

    /// List all workflows for a project, newest first.
    fn list_workflows(
        &self,
        project_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Workflow>, StoreError>> + Send;

    /// Delete a workflow by ID. Returns `true` if it existed.
    fn delete_workflow(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;
}

/// Store trait for run records and node traces.
///
/// The engine writes through this trait as a run progresses: one record at
/// start, per-node trace appends, and a terminal status update at the end.
pub trait RunStore: Send + Sync {
    /// Insert a new run record.
    fn create_run(
        &self,
        run: &Run,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Update the status (and timestamps) of an existing run.
    fn update_run_status(
        &self,
        run_id: &Uuid,
        status: RunStatus,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Record a node trace, upserting by (run_id, node_id). The engine
    /// records a RUNNING trace first and overwrites it with the terminal
    /// state when the node finishes.
    fn record_trace(
        &self,
        run_id: &Uuid,
        trace: &NodeTrace,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Get a run record by ID.
    fn get_run(
        &self,
        run_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Run>, StoreError>> + Send;

    /// List traces for a run in insertion order.
    fn list_traces(
        &self,
        run_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<NodeTrace>, StoreError>> + Send;

    /// List runs for a workflow, newest first.
    fn list_runs(
        &self,
        workflow_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Run>, StoreError>> + Send;
}
