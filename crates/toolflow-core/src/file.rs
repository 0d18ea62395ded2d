//! File storage abstraction.
//!
//! Uploaded file content is reachable from tools (e.g. vision prompts attach
//! stored images), so the trait is object-safe via `async_trait` and flows
//! through the tool execution context as `Arc<dyn FileStore>`.

use async_trait::async_trait;

use toolflow_types::error::StoreError;
use toolflow_types::file::StoredFile;
use uuid::Uuid;

/// Object-safe store for uploaded files: metadata plus content bytes.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist a new file. Implementations write content to disk and record
    /// metadata, rejecting payloads over the configured size limit.
    async fn save_file(
        &self,
        filename: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<StoredFile, StoreError>;

    /// Get file metadata by ID.
    async fn get_file(&self, file_id: &Uuid) -> Result<Option<StoredFile>, StoreError>;

    /// Read the content bytes of a stored file.
    async fn read_content(&self, file: &StoredFile) -> Result<Vec<u8>, StoreError>;

    /// Delete a file (metadata and content). Returns `true` if it existed.
    async fn delete_file(&self, file_id: &Uuid) -> Result<bool, StoreError>;

    /// List all stored files, newest first.
    async fn list_files(&self) -> Result<Vec<StoredFile>, StoreError>;
}
