//! File storage port - abstraction over the disk that keeps uploads.

use async_trait::async_trait;

use crate::domain::UploadedFile;
use crate::error::StorageError;

/// A storage disk. Paths are relative to the disk root and use `/` separators.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `file` inside `directory` under a generated, content-derived name.
    /// Returns the relative path, e.g. `images/<name>.jpg`.
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError>;

    /// Read a stored file.
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Check if a file exists at `path`.
    async fn exists(&self, path: &str) -> bool;

    /// Remove a stored file.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}
