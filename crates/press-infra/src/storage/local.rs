//! Local filesystem storage disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use press_core::domain::UploadedFile;
use press_core::error::StorageError;
use press_core::ports::FileStorage;

use super::{normalize, target_path};

/// Stores files below a root directory, e.g. `storage/app`.
pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = normalize(path)?;
        if relative.is_empty() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(relative.split('/').fold(self.root.clone(), |acc, s| acc.join(s)))
    }
}

fn not_found(path: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |e| match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
        _ => StorageError::Io(e),
    }
}

#[async_trait]
impl FileStorage for LocalDiskStorage {
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError> {
        let relative = target_path(directory, file)?;
        let absolute = self.absolute(&relative)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&absolute, &file.bytes).await?;

        tracing::debug!(path = %relative, bytes = file.len(), "Stored upload");
        Ok(relative)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let absolute = self.absolute(path)?;
        fs::read(&absolute).await.map_err(not_found(path))
    }

    async fn exists(&self, path: &str) -> bool {
        match self.absolute(path) {
            Ok(absolute) => fs::try_exists(&absolute).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let absolute = self.absolute(path)?;
        fs::remove_file(&absolute).await.map_err(not_found(path))
    }
}
