//! Folder snapshot service
//!
//! Traverses a directory recursively and persists its metadata as one or
//! more JSON page files under the configured snapshot directory.
//!
//! Traversal order matches the inspection service's conventions: per
//! directory level, hidden names are filtered out, then subdirectories
//! (sorted case-insensitively) are emitted before files, and subtrees are
//! visited depth-first in that order.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::config::Config;
use crate::error::ServiceError;
use crate::services::folders::resolve_directory;

/// Structured metadata describing one filesystem entry in a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Path relative to the snapshotted directory
    pub relative_path: String,
    /// Absolute path on disk
    pub absolute_path: String,
    /// Whether the entry is a directory
    pub is_directory: bool,
    /// Size in bytes (0 for directories)
    pub size_bytes: u64,
    /// Last modification timestamp in UTC
    pub modified_at: DateTime<Utc>,
}

/// One JSON page file written for a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotPage {
    /// 1-based page index
    pub page: usize,
    /// Filesystem path of the written JSON file
    pub path: PathBuf,
    /// Number of entries stored in this page
    pub entry_count: usize,
}

/// Outcome details for a directory snapshot request
#[derive(Debug)]
pub struct SnapshotResult {
    /// Canonical directory that was snapshotted
    pub directory: PathBuf,
    /// UTC timestamp shared by every page of this snapshot
    pub generated_at: DateTime<Utc>,
    /// Total entries across all pages
    pub total_entries: usize,
    /// Applied page size; `None` means a single-file snapshot
    pub page_size: Option<usize>,
    /// Per-file metadata for the written pages
    pub pages: Vec<SnapshotPage>,
}

impl SnapshotResult {
    /// Number of JSON files written for this snapshot
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// On-disk layout of a single snapshot page file
#[derive(Serialize)]
struct SnapshotDocument<'a> {
    directory: String,
    generated_at: DateTime<Utc>,
    page: usize,
    page_count: usize,
    page_size: Option<usize>,
    total_entries: usize,
    entries: &'a [SnapshotEntry],
}

/// Traverse a directory recursively and persist metadata snapshots to disk.
pub async fn snapshot_directory(
    raw_path: &str,
    page_size: Option<usize>,
    config: &Config,
) -> Result<SnapshotResult, ServiceError> {
    let directory = resolve_directory(raw_path)?;
    info!(
        path = %directory.display(),
        page_size = ?page_size,
        "starting directory snapshot"
    );

    let entries = collect_entries(&directory).await?;
    info!(
        path = %directory.display(),
        entries = entries.len(),
        "snapshot entries collected"
    );

    let generated_at = Utc::now();
    let total_entries = entries.len();
    let chunks = chunk_entries(entries, page_size);
    let page_count = chunks.len();

    let snapshot_root = ensure_snapshot_root(config).await?;
    let mut pages = Vec::with_capacity(page_count);

    for (index, chunk) in chunks.iter().enumerate() {
        let page = index + 1;
        let output_path =
            build_snapshot_path(&snapshot_root, &directory, generated_at, page, page_count);
        info!(
            path = %output_path.display(),
            page,
            page_count,
            entries = chunk.len(),
            "writing snapshot page"
        );

        let document = SnapshotDocument {
            directory: directory.to_string_lossy().into_owned(),
            generated_at,
            page,
            page_count,
            page_size,
            total_entries,
            entries: chunk,
        };
        write_snapshot_file(&output_path, &document).await?;

        pages.push(SnapshotPage {
            page,
            path: output_path,
            entry_count: chunk.len(),
        });
    }

    Ok(SnapshotResult {
        directory,
        generated_at,
        total_entries,
        page_size,
        pages,
    })
}

/// Depth-first pre-order walk: each directory contributes its (sorted)
/// subdirectories, then its (sorted) files, before the first subtree is
/// descended into.
async fn collect_entries(root: &Path) -> Result<Vec<SnapshotEntry>, ServiceError> {
    let mut entries = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(current) = pending.pop() {
        let mut read_dir = fs::read_dir(&current).await.map_err(|e| {
            ServiceError::InvalidState(format!(
                "cannot read directory: {} - {e}",
                current.display()
            ))
        })?;

        let mut subdirs: Vec<(String, PathBuf)> = Vec::new();
        let mut files: Vec<(String, PathBuf)> = Vec::new();

        while let Some(entry) = read_dir.next_entry().await.map_err(|e| {
            ServiceError::InvalidState(format!(
                "cannot read directory entry: {} - {e}",
                current.display()
            ))
        })? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let file_type = entry.file_type().await.map_err(|e| {
                ServiceError::InvalidState(format!(
                    "cannot read metadata: {} - {e}",
                    entry.path().display()
                ))
            })?;
            if file_type.is_dir() {
                subdirs.push((name, entry.path()));
            } else {
                files.push((name, entry.path()));
            }
        }

        subdirs.sort_by_key(|(name, _)| name.to_lowercase());
        files.sort_by_key(|(name, _)| name.to_lowercase());

        for (_, path) in &subdirs {
            entries.push(snapshot_entry(root, path).await?);
        }
        for (_, path) in &files {
            entries.push(snapshot_entry(root, path).await?);
        }

        // Reverse push so the lexicographically first subdirectory is
        // walked next off the stack.
        for (_, path) in subdirs.into_iter().rev() {
            pending.push(path);
        }
    }

    Ok(entries)
}

async fn snapshot_entry(root: &Path, path: &Path) -> Result<SnapshotEntry, ServiceError> {
    let metadata = fs::metadata(path).await.map_err(|e| {
        ServiceError::InvalidState(format!("cannot read metadata: {} - {e}", path.display()))
    })?;

    let relative_path = path
        .strip_prefix(root)
        .map_err(|e| {
            ServiceError::InvalidState(format!(
                "entry escaped snapshot root: {} - {e}",
                path.display()
            ))
        })?
        .to_string_lossy()
        .into_owned();

    let is_directory = metadata.is_dir();
    Ok(SnapshotEntry {
        relative_path,
        absolute_path: path.to_string_lossy().into_owned(),
        is_directory,
        size_bytes: if is_directory { 0 } else { metadata.len() },
        modified_at: metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
    })
}

fn chunk_entries(entries: Vec<SnapshotEntry>, page_size: Option<usize>) -> Vec<Vec<SnapshotEntry>> {
    let Some(size) = page_size.filter(|size| *size > 0) else {
        return vec![entries];
    };

    let chunks: Vec<Vec<SnapshotEntry>> = entries
        .chunks(size)
        .map(|chunk| chunk.to_vec())
        .collect();

    if chunks.is_empty() {
        // An empty directory still produces exactly one (empty) page.
        vec![entries]
    } else {
        chunks
    }
}

async fn ensure_snapshot_root(config: &Config) -> Result<PathBuf, ServiceError> {
    let root = PathBuf::from(&config.snapshot.dir);

    fs::create_dir_all(&root).await.map_err(|e| {
        ServiceError::Unavailable(format!(
            "cannot create snapshot directory: {} - {e}",
            root.display()
        ))
    })?;

    root.canonicalize().map_err(|e| {
        ServiceError::Unavailable(format!(
            "cannot resolve snapshot directory: {} - {e}",
            root.display()
        ))
    })
}

fn build_snapshot_path(
    snapshot_root: &Path,
    directory: &Path,
    generated_at: DateTime<Utc>,
    page: usize,
    page_count: usize,
) -> PathBuf {
    let slug = directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    let safe_slug: String = slug
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();

    let timestamp = generated_at.format("%Y%m%dT%H%M%SZ");
    let suffix = if page_count > 1 {
        format!("_p{page:03}")
    } else {
        String::new()
    };

    snapshot_root.join(format!("{safe_slug}_{timestamp}{suffix}.json"))
}

async fn write_snapshot_file(
    output_path: &Path,
    document: &SnapshotDocument<'_>,
) -> Result<(), ServiceError> {
    let payload = serde_json::to_vec_pretty(document).map_err(|e| {
        ServiceError::Unavailable(format!("cannot serialize snapshot page: {e}"))
    })?;

    fs::write(output_path, payload).await.map_err(|e| {
        ServiceError::Unavailable(format!(
            "cannot write snapshot file: {} - {e}",
            output_path.display()
        ))
    })
}
