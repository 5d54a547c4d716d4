//! Folder inspection service
//!
//! Validates client-supplied directory paths and lists their immediate
//! contents. Hidden entries (names starting with `.`) are never reported.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ServiceError;

/// Metadata describing a single file or subdirectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// Base name of the entry
    pub name: String,
    /// Absolute path to the entry on disk
    pub path: String,
    /// Whether the entry is a directory
    pub is_directory: bool,
    /// Size in bytes (0 for directories)
    pub size_bytes: u64,
    /// Last modification timestamp in UTC
    pub modified_at: DateTime<Utc>,
}

/// Validate a client-supplied path and resolve it to a canonical directory.
///
/// A missing path is `NotFound`; an existing path that is not a directory
/// is `InvalidState`.
pub fn resolve_directory(raw_path: &str) -> Result<PathBuf, ServiceError> {
    let path = Path::new(raw_path);

    if !path.exists() {
        return Err(ServiceError::NotFound(format!(
            "path does not exist: {raw_path}"
        )));
    }

    let canonical = path.canonicalize().map_err(|e| {
        ServiceError::InvalidState(format!("cannot resolve path: {raw_path} - {e}"))
    })?;

    if !canonical.is_dir() {
        return Err(ServiceError::InvalidState(format!(
            "path is not a directory: {raw_path}"
        )));
    }

    Ok(canonical)
}

/// List the immediate children of a directory.
///
/// Entries are sorted case-insensitively by name; hidden entries are
/// skipped; directories report `size_bytes: 0`.
pub async fn inspect_directory(raw_path: &str) -> Result<(Vec<FileInfo>, PathBuf), ServiceError> {
    let directory = resolve_directory(raw_path)?;

    let mut read_dir = fs::read_dir(&directory).await.map_err(|e| {
        ServiceError::InvalidState(format!("cannot read directory: {raw_path} - {e}"))
    })?;

    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await.map_err(|e| {
        ServiceError::InvalidState(format!("cannot read directory entry: {raw_path} - {e}"))
    })? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let entry_path = entry.path();
        entries.push(file_info(&name, &entry_path).await?);
    }

    entries.sort_by_key(|entry| entry.name.to_lowercase());

    Ok((entries, directory))
}

async fn file_info(name: &str, path: &Path) -> Result<FileInfo, ServiceError> {
    let metadata = fs::metadata(path).await.map_err(|e| {
        ServiceError::InvalidState(format!("cannot read metadata: {} - {e}", path.display()))
    })?;

    let is_directory = metadata.is_dir();
    let size_bytes = if is_directory { 0 } else { metadata.len() };
    let modified_at = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    Ok(FileInfo {
        name: name.to_string(),
        path: path.to_string_lossy().into_owned(),
        is_directory,
        size_bytes,
        modified_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_inspect_directory_lists_entries() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path();

        std::fs::write(temp_path.join("document.txt"), "hello").expect("Failed to create file");
        std::fs::create_dir(temp_path.join("nested")).expect("Failed to create subdir");

        let (entries, directory) = inspect_directory(temp_path.to_str().unwrap())
            .await
            .expect("Failed to inspect directory");

        assert!(directory.is_absolute());
        assert_eq!(entries.len(), 2);

        let file = entries.iter().find(|e| e.name == "document.txt").unwrap();
        assert!(!file.is_directory);
        assert_eq!(file.size_bytes, 5);

        let dir = entries.iter().find(|e| e.name == "nested").unwrap();
        assert!(dir.is_directory);
        assert_eq!(dir.size_bytes, 0);
    }

    #[tokio::test]
    async fn test_inspect_directory_skips_hidden_entries() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join(".secret"), "should be ignored")
            .expect("Failed to create hidden file");
        std::fs::write(temp_dir.path().join("visible.txt"), "data")
            .expect("Failed to create file");

        let (entries, _) = inspect_directory(temp_dir.path().to_str().unwrap())
            .await
            .expect("Failed to inspect directory");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "visible.txt");
    }

    #[tokio::test]
    async fn test_inspect_directory_sorts_case_insensitively() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        for name in ["Banana.txt", "apple.txt", "Cherry.txt"] {
            std::fs::write(temp_dir.path().join(name), "x").expect("Failed to create file");
        }

        let (entries, _) = inspect_directory(temp_dir.path().to_str().unwrap())
            .await
            .expect("Failed to inspect directory");

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["apple.txt", "Banana.txt", "Cherry.txt"]);
    }

    #[tokio::test]
    async fn test_inspect_directory_nonexistent_is_not_found() {
        let result = inspect_directory("/nonexistent/path/12345").await;
        match result.unwrap_err() {
            ServiceError::NotFound(_) => {}
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inspect_directory_on_file_is_invalid_state() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");
        std::fs::write(&file_path, "content").expect("Failed to create file");

        let result = inspect_directory(file_path.to_str().unwrap()).await;
        match result.unwrap_err() {
            ServiceError::InvalidState(_) => {}
            other => panic!("Expected InvalidState error, got: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_directory_canonicalizes() {
        let current_dir = std::env::current_dir().expect("Failed to get current directory");
        let resolved = resolve_directory(".").expect("Failed to resolve");
        assert_eq!(resolved, current_dir.canonicalize().unwrap());
    }
}
