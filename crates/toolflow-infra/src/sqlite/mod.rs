//! SQLite persistence.
//!
//! Split reader/writer pools in WAL mode, with store implementations for
//! workflow definitions, run records, node traces, and uploaded files.

pub mod file;
pub mod pool;
pub mod run;
pub mod workflow;

pub use file::SqliteFileStore;
pub use pool::DatabasePool;
pub use run::SqliteRunStore;
pub use workflow::SqliteWorkflowStore;

use chrono::{DateTime, Utc};
use toolflow_types::error::StoreError;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Shared row conversion helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, StoreError> {
    s.parse::<Uuid>()
        .map_err(|e| StoreError::Query(format!("invalid UUID: {e}")))
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
