//! In-memory storage disk - a fake disk for tests and database-less runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use press_core::domain::UploadedFile;
use press_core::error::StorageError;
use press_core::ports::FileStorage;

use super::{normalize, target_path};

/// Files held in a map keyed by relative path. Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStorage {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored path, sorted.
    pub async fn paths(&self) -> Vec<String> {
        self.files.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl FileStorage for InMemoryStorage {
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError> {
        let path = target_path(directory, file)?;
        self.files
            .write()
            .await
            .insert(path.clone(), file.bytes.clone());
        Ok(path)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let path = normalize(path)?;
        self.files
            .read()
            .await
            .get(&path)
            .cloned()
            .ok_or(StorageError::NotFound(path))
    }

    async fn exists(&self, path: &str) -> bool {
        match normalize(path) {
            Ok(path) => self.files.read().await.contains_key(&path),
            Err(_) => false,
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let path = normalize(path)?;
        self.files
            .write()
            .await
            .remove(&path)
            .map(|_| ())
            .ok_or(StorageError::NotFound(path))
    }
}
