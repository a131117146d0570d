//! Storage disks - where uploaded files end up.

mod local;
mod memory;

pub use local::LocalDiskStorage;
pub use memory::InMemoryStorage;

use sha2::{Digest, Sha256};

use press_core::domain::UploadedFile;
use press_core::error::StorageError;

/// Name a file after the SHA-256 of its content, keeping the original extension.
pub fn hash_name(file: &UploadedFile) -> String {
    let digest = hex::encode(Sha256::digest(&file.bytes));
    match file.extension() {
        Some(ext) => format!("{digest}.{ext}"),
        None => digest,
    }
}

/// Normalize a relative storage path: `/`-separated, no empty, `.` or `..` segments.
pub(crate) fn normalize(path: &str) -> Result<String, StorageError> {
    let segments: Vec<&str> = path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();

    if segments.iter().any(|s| *s == "." || *s == ".." || s.contains(':')) {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    Ok(segments.join("/"))
}

/// Relative path a file will be stored at inside `directory`.
pub(crate) fn target_path(directory: &str, file: &UploadedFile) -> Result<String, StorageError> {
    let directory = normalize(directory)?;
    let name = hash_name(file);
    Ok(if directory.is_empty() {
        name
    } else {
        format!("{directory}/{name}")
    })
}
