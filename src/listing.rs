//! Document lister: directory scan → descriptive metadata records.
//!
//! Records are transient — created per listing request, never persisted —
//! and owned by the caller. Entries are sorted by filename so listings are
//! deterministic across filesystems (the storage layer's native order is
//! unspecified).

use crate::config::IngestConfig;
use crate::error::IngestError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Metadata describing one stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// The filename doubles as the record id.
    pub id: String,
    pub filename: String,
    pub file_path: PathBuf,
    /// Access URL: `{media_url}/uploads/{dir_basename}/{filename}`.
    pub file_url: String,
    /// Human-readable size, binary boundaries: `"500 B"`, `"2.0 KB"`, `"3.0 MB"`.
    pub file_size: String,
    /// Lowercased extension including the leading dot; empty when none.
    pub file_extension: String,
    /// Creation time formatted `YYYY-MM-DD HH:MM`. Creation-time semantics
    /// are platform-dependent; where the filesystem records no birth time
    /// this falls back to the modification time.
    pub upload_date: String,
    pub owner: Option<String>,
}

/// List the regular files of `directory` as [`DocumentRecord`]s.
///
/// `query`, when non-empty, is a case-insensitive substring filter on the
/// filename. Subdirectories and other non-regular entries are skipped.
///
/// The URL path segment is derived from the directory's basename even when
/// an explicit `owner` is supplied — the basename is treated as the user
/// identifier. That quirk is historical and preserved deliberately; `owner`
/// only populates the record field.
pub async fn list_documents(
    directory: impl AsRef<Path>,
    query: &str,
    owner: Option<&str>,
    config: &IngestConfig,
) -> Result<Vec<DocumentRecord>, IngestError> {
    let directory = directory.as_ref().to_path_buf();
    let query = query.to_string();
    let owner = owner.map(|s| s.to_string());
    let media_url = config.media_url.clone();

    tokio::task::spawn_blocking(move || {
        list_documents_blocking(&directory, &query, owner.as_deref(), &media_url)
    })
    .await
    .map_err(|e| IngestError::Internal(format!("Listing task panicked: {e}")))?
}

fn list_documents_blocking(
    directory: &Path,
    query: &str,
    owner: Option<&str>,
    media_url: &str,
) -> Result<Vec<DocumentRecord>, IngestError> {
    let dir_basename = directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base_url = media_url.trim_end_matches('/');
    let needle = query.to_lowercase();

    let entries = std::fs::read_dir(directory).map_err(|e| IngestError::from_io(directory, e))?;

    let mut records = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::from_io(directory, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| IngestError::from_io(&entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        if !needle.is_empty() && !filename.to_lowercase().contains(&needle) {
            continue;
        }

        let path = entry.path();
        let metadata = entry
            .metadata()
            .map_err(|e| IngestError::from_io(&path, e))?;

        records.push(DocumentRecord {
            id: filename.clone(),
            file_url: format!("{base_url}/uploads/{dir_basename}/{filename}"),
            file_size: format_size(metadata.len()),
            file_extension: extension_of(&filename),
            upload_date: format_timestamp(created_time(&metadata)),
            file_path: path,
            filename,
            owner: owner.map(|s| s.to_string()),
        });
    }

    records.sort_by(|a, b| a.filename.cmp(&b.filename));
    debug!(
        "Listed {} documents in {} (query: {:?})",
        records.len(),
        directory.display(),
        query
    );
    Ok(records)
}

/// Birth time where the platform records one, else mtime.
fn created_time(metadata: &std::fs::Metadata) -> SystemTime {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Lowercased extension with the leading dot, or empty.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Human-readable size with binary (1024-based) boundaries.
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}
