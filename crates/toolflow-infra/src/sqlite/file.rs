//! SQLite-backed file store.
//!
//! Metadata lives in the `files` table; content bytes live on disk under the
//! configured upload directory, named by file ID so client-supplied filenames
//! never touch the filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use toolflow_core::file::FileStore;
use toolflow_types::config::EngineConfig;
use toolflow_types::error::StoreError;
use toolflow_types::file::StoredFile;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// File store combining SQLite metadata with on-disk content.
pub struct SqliteFileStore {
    pool: DatabasePool,
    upload_dir: PathBuf,
    max_upload_size: u64,
}

impl SqliteFileStore {
    /// Create a new store writing content under `config.upload_dir`.
    pub fn new(pool: DatabasePool, config: &EngineConfig) -> Self {
        Self {
            pool,
            upload_dir: PathBuf::from(&config.upload_dir),
            max_upload_size: config.max_upload_size,
        }
    }

    fn content_path(&self, file: &StoredFile) -> PathBuf {
        self.upload_dir.join(&file.storage_path)
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct FileRow {
    file_id: String,
    filename: String,
    content_type: String,
    size_bytes: i64,
    storage_path: String,
    created_at: String,
}

impl FileRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            file_id: row.try_get("file_id")?,
            filename: row.try_get("filename")?,
            content_type: row.try_get("content_type")?,
            size_bytes: row.try_get("size_bytes")?,
            storage_path: row.try_get("storage_path")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_file(self) -> Result<StoredFile, StoreError> {
        Ok(StoredFile {
            file_id: parse_uuid(&self.file_id)?,
            filename: self.filename,
            content_type: self.content_type,
            size_bytes: self.size_bytes as u64,
            storage_path: self.storage_path,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// Derive the on-disk name for a new file: the file ID plus the original
/// extension, if any.
fn storage_name(file_id: &Uuid, filename: &str) -> String {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{file_id}.{ext}"),
        None => file_id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// FileStore impl
// ---------------------------------------------------------------------------

#[async_trait]
impl FileStore for SqliteFileStore {
    async fn save_file(
        &self,
        filename: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<StoredFile, StoreError> {
        if content.len() as u64 > self.max_upload_size {
            return Err(StoreError::Query(format!(
                "file exceeds maximum upload size of {} bytes",
                self.max_upload_size
            )));
        }

        let file_id = Uuid::now_v7();
        let file = StoredFile {
            file_id,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes: content.len() as u64,
            storage_path: storage_name(&file_id, filename),
            created_at: Utc::now(),
        };

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| StoreError::Query(format!("create upload dir: {e}")))?;
        tokio::fs::write(self.content_path(&file), content)
            .await
            .map_err(|e| StoreError::Query(format!("write file content: {e}")))?;

        sqlx::query(
            r#"INSERT INTO files (file_id, filename, content_type, size_bytes, storage_path, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(file.file_id.to_string())
        .bind(&file.filename)
        .bind(&file.content_type)
        .bind(file.size_bytes as i64)
        .bind(&file.storage_path)
        .bind(format_datetime(&file.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        tracing::debug!(
            file_id = %file.file_id,
            size_bytes = file.size_bytes,
            "stored uploaded file"
        );
        Ok(file)
    }

    async fn get_file(&self, file_id: &Uuid) -> Result<Option<StoredFile>, StoreError> {
        let row = sqlx::query(
            "SELECT file_id, filename, content_type, size_bytes, storage_path, created_at
             FROM files WHERE file_id = ?",
        )
        .bind(file_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = FileRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(r.into_file()?))
            }
            None => Ok(None),
        }
    }

    async fn read_content(&self, file: &StoredFile) -> Result<Vec<u8>, StoreError> {
        tokio::fs::read(self.content_path(file))
            .await
            .map_err(|e| StoreError::Query(format!("read file content: {e}")))
    }

    async fn delete_file(&self, file_id: &Uuid) -> Result<bool, StoreError> {
        let Some(file) = self.get_file(file_id).await? else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM files WHERE file_id = ?")
            .bind(file_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // Content may already be gone; only surface unexpected IO failures.
        match tokio::fs::remove_file(self.content_path(&file)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Query(format!("remove file content: {e}"))),
        }

        tracing::debug!(file_id = %file.file_id, "deleted uploaded file");
        Ok(true)
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, StoreError> {
        let rows = sqlx::query(
            "SELECT file_id, filename, content_type, size_bytes, storage_path, created_at
             FROM files ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut files = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = FileRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            files.push(r.into_file()?);
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_store(dir: &tempfile::TempDir) -> SqliteFileStore {
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        let config = EngineConfig {
            upload_dir: dir.path().join("uploads").display().to_string(),
            max_upload_size: 64,
            ..EngineConfig::default()
        };
        SqliteFileStore::new(pool, &config)
    }

    #[tokio::test]
    async fn test_save_get_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir).await;

        let saved = store
            .save_file("photo.png", "image/png", b"pngbytes")
            .await
            .unwrap();
        assert_eq!(saved.size_bytes, 8);
        assert!(saved.storage_path.ends_with(".png"));
        assert!(saved.is_image());

        let loaded = store.get_file(&saved.file_id).await.unwrap().unwrap();
        assert_eq!(loaded.filename, "photo.png");
        assert_eq!(loaded.storage_path, saved.storage_path);

        let content = store.read_content(&loaded).await.unwrap();
        assert_eq!(content, b"pngbytes");
    }

    #[tokio::test]
    async fn test_oversize_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir).await;

        let big = vec![0u8; 65];
        let result = store.save_file("big.bin", "application/octet-stream", &big).await;
        assert!(matches!(result, Err(StoreError::Query(_))));
        assert!(store.list_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir).await;

        let saved = store
            .save_file("note.txt", "text/plain", b"hello")
            .await
            .unwrap();
        let path = store.content_path(&saved);
        assert!(path.exists());

        assert!(store.delete_file(&saved.file_id).await.unwrap());
        assert!(!path.exists());
        assert!(store.get_file(&saved.file_id).await.unwrap().is_none());

        // Second delete is a no-op.
        assert!(!store.delete_file(&saved.file_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_filename_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir).await;

        let saved = store
            .save_file("README", "text/plain", b"docs")
            .await
            .unwrap();
        assert_eq!(saved.storage_path, saved.file_id.to_string());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(&dir).await;

        store.save_file("a.txt", "text/plain", b"a").await.unwrap();
        store.save_file("b.txt", "text/plain", b"b").await.unwrap();

        let files = store.list_files().await.unwrap();
        assert_eq!(files.len(), 2);
        // UUIDv7 file ids are time-ordered, so created_at DESC puts b first
        // unless both files landed on the same timestamp.
        assert!(files.iter().any(|f| f.filename == "a.txt"));
        assert!(files.iter().any(|f| f.filename == "b.txt"));
    }
}
