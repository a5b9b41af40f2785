//! Log folder size management
//!
//! Handles deletion of the oldest files once a folder exceeds its size budget.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::SizeAccounting;
use crate::error::{LoggerError, Result};

/// A regular file found in the log folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Full path to the file
    pub path: PathBuf,
    /// Size on disk in bytes
    pub size_bytes: u64,
    /// Last modification time
    pub modified: SystemTime,
}

/// Outcome of a pruning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Files removed, oldest first
    pub deleted: Vec<PathBuf>,
    /// Bytes still accounted to the folder after pruning
    pub remaining_bytes: u64,
    /// Files that could not be removed and were skipped
    pub failed: usize,
}

/// List every regular file directly inside `folder`
///
/// Subdirectories are ignored. Entries that disappear while listing are skipped.
pub fn list_files(folder: &Path) -> Result<Vec<FileRecord>> {
    let read_folder_err = |source| LoggerError::ReadFolder {
        path: folder.to_path_buf(),
        source,
    };

    let mut files = Vec::new();

    for entry in fs::read_dir(folder).map_err(read_folder_err)? {
        let entry = entry.map_err(read_folder_err)?;
        let path = entry.path();

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(source) => return Err(LoggerError::InspectFile { path, source }),
        };

        if !metadata.is_file() {
            continue;
        }

        files.push(FileRecord {
            path,
            size_bytes: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    Ok(files)
}

/// Delete the oldest files in `folder` until it fits within `budget_mb`
pub fn prune_folder(
    folder: &Path,
    budget_mb: u64,
    accounting: SizeAccounting,
) -> Result<PruneReport> {
    let files = list_files(folder)?;
    Ok(prune_records(files, budget_mb, accounting))
}

fn prune_records(
    mut files: Vec<FileRecord>,
    budget_mb: u64,
    accounting: SizeAccounting,
) -> PruneReport {
    let mut report = PruneReport {
        remaining_bytes: files.iter().map(|f| f.size_bytes).sum(),
        ..PruneReport::default()
    };

    if !accounting.folder_over_budget(report.remaining_bytes, budget_mb) {
        return report;
    }

    // Stable, so equal times keep listing order
    files.sort_by_key(|f| f.modified);

    for file in files {
        if !accounting.folder_over_budget(report.remaining_bytes, budget_mb) {
            break;
        }

        match fs::remove_file(&file.path) {
            Ok(()) => {
                tracing::debug!(
                    "Pruned log file {} ({} bytes)",
                    file.path.display(),
                    file.size_bytes
                );
                report.remaining_bytes -= file.size_bytes;
                report.deleted.push(file.path);
            }
            // Someone else already removed it
            Err(e) if e.kind() == ErrorKind::NotFound => {
                report.remaining_bytes -= file.size_bytes;
            }
            Err(e) => {
                tracing::warn!("Failed to prune log file {}: {}", file.path.display(), e);
                report.failed += 1;
            }
        }
    }

    report
}
