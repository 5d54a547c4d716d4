//! Folder API handlers
//!
//! HTTP adapters over the folder inspection and snapshot services, plus
//! the request/response schemas for both endpoints. Handlers stay thin:
//! validated request in, one service call, serialized response out.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extract::ValidatedJson;
use crate::config::Config;
use crate::error::AppError;
use crate::services::{folders, snapshot};

// Re-export for API consumers
pub use crate::services::folders::FileInfo;

/// Client-supplied directory path to inspect
#[derive(Debug, Deserialize, Validate)]
pub struct FolderSelectionRequest {
    /// Absolute path to the directory to inspect
    #[validate(length(min = 1, message = "path must not be empty"))]
    pub path: String,
}

/// Aggregated directory listing details
#[derive(Debug, Serialize, Deserialize)]
pub struct FolderContentsResponse {
    /// Canonical directory path that was inspected
    pub directory: String,
    /// Immediate child files and directories, ordered by name
    pub entries: Vec<FileInfo>,
}

/// Parameters for generating a recursive directory snapshot
#[derive(Debug, Deserialize, Validate)]
pub struct FolderSnapshotRequest {
    /// Absolute path to the directory to snapshot
    #[validate(length(min = 1, message = "path must not be empty"))]
    pub path: String,
    /// Optional page size for chunking large snapshots into multiple files
    #[validate(range(min = 1, message = "page_size must be at least 1"))]
    pub page_size: Option<usize>,
}

/// Metadata about a written snapshot JSON file
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotPageInfo {
    /// 1-based page index
    pub page: usize,
    /// Filesystem path to the generated JSON file
    pub path: String,
    /// Number of directory entries in this page
    pub entry_count: usize,
}

/// Details about generated directory snapshots
#[derive(Debug, Serialize, Deserialize)]
pub struct FolderSnapshotResponse {
    /// Canonical directory path that was snapshotted
    pub directory: String,
    /// UTC timestamp when the snapshot was created
    pub generated_at: DateTime<Utc>,
    /// Total entries included across all pages
    pub total_entries: usize,
    /// Applied page size; null indicates a single-file snapshot
    pub page_size: Option<usize>,
    /// Number of JSON files generated for this snapshot
    pub page_count: usize,
    /// Per-file metadata for the snapshot output
    pub pages: Vec<SnapshotPageInfo>,
}

/// POST /folders/inspect - list the immediate contents of a directory
pub async fn inspect_folder(
    ValidatedJson(request): ValidatedJson<FolderSelectionRequest>,
) -> Result<Json<FolderContentsResponse>, AppError> {
    let (entries, directory) = folders::inspect_directory(&request.path).await?;

    Ok(Json(FolderContentsResponse {
        directory: directory.to_string_lossy().into_owned(),
        entries,
    }))
}

/// POST /folders/snapshot - persist a recursive directory snapshot
pub async fn snapshot_folder(
    State(config): State<Arc<Config>>,
    ValidatedJson(request): ValidatedJson<FolderSnapshotRequest>,
) -> Result<Json<FolderSnapshotResponse>, AppError> {
    let result = snapshot::snapshot_directory(&request.path, request.page_size, &config).await?;

    Ok(Json(FolderSnapshotResponse {
        directory: result.directory.to_string_lossy().into_owned(),
        generated_at: result.generated_at,
        total_entries: result.total_entries,
        page_size: result.page_size,
        page_count: result.page_count(),
        pages: result
            .pages
            .into_iter()
            .map(|page| SnapshotPageInfo {
                page: page.page,
                path: page.path.to_string_lossy().into_owned(),
                entry_count: page.entry_count,
            })
            .collect(),
    }))
}
