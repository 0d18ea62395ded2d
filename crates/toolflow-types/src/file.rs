//! Stored file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one uploaded file. Content lives on disk under the upload
/// directory; only metadata is persisted in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub file_id: Uuid,
    /// Original client-supplied filename, stored for display only.
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Path of the content on disk, relative to the upload directory.
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
        storage_path: impl Into<String>,
    ) -> Self {
        Self {
            file_id: Uuid::now_v7(),
            filename: filename.into(),
            content_type: content_type.into(),
            size_bytes,
            storage_path: storage_path.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the content type is an image usable in vision requests.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}
