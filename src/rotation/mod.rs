//! Log file rotation and folder pruning
//!
//! [`RotationPolicy`] owns the active configuration and decides, on every
//! emission, whether the active file has to be replaced. Replacing a file also
//! prunes the folder back under its size budget.
//!
//! The policy itself is not synchronized; [`crate::Logger`] keeps it behind its
//! configuration lock.

mod naming;
mod retention;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::LoggerSettings;
use crate::error::{LoggerError, Result};

pub(crate) use naming::line_prefix;
pub use naming::log_file_path;
pub use retention::{list_files, prune_folder, FileRecord, PruneReport};

/// Result of a successful reinitialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    /// File that receives writes from now on
    pub active_file: PathBuf,
    /// What pruning did before the new file was chosen
    pub pruned: PruneReport,
}

/// Configuration plus the file currently receiving writes
#[derive(Debug, Default)]
pub struct RotationPolicy {
    settings: Option<LoggerSettings>,
    active_file: Option<PathBuf>,
}

impl RotationPolicy {
    /// Create an unconfigured policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Current settings, if configured
    pub fn settings(&self) -> Option<&LoggerSettings> {
        self.settings.as_ref()
    }

    /// File currently receiving writes, if configured
    pub fn active_file(&self) -> Option<&Path> {
        self.active_file.as_deref()
    }

    /// Replace the configuration and start a new active file
    ///
    /// Nothing is changed when this fails, including when the folder is empty.
    pub fn configure(&mut self, settings: LoggerSettings) -> Result<Rotation> {
        self.configure_at(settings, Local::now())
    }

    pub(crate) fn configure_at(
        &mut self,
        settings: LoggerSettings,
        now: DateTime<Local>,
    ) -> Result<Rotation> {
        if !settings.has_folder() {
            return Err(LoggerError::EmptyFolder);
        }

        let rotation = reinitialize(&settings, now)?;
        self.settings = Some(settings);
        self.active_file = Some(rotation.active_file.clone());
        Ok(rotation)
    }

    /// Prune the folder and switch to a freshly named active file
    ///
    /// Returns `None` when not configured.
    pub fn reinitialize(&mut self) -> Result<Option<Rotation>> {
        self.reinitialize_at(Local::now())
    }

    pub(crate) fn reinitialize_at(&mut self, now: DateTime<Local>) -> Result<Option<Rotation>> {
        let Some(settings) = &self.settings else {
            return Ok(None);
        };

        let rotation = reinitialize(settings, now)?;
        self.active_file = Some(rotation.active_file.clone());
        Ok(Some(rotation))
    }

    /// Rotate if the active file has reached its size limit
    ///
    /// Returns the rotation that happened, if any. On error the active file is
    /// left unchanged.
    pub fn before_emit(&mut self) -> Result<Option<Rotation>> {
        self.before_emit_at(Local::now())
    }

    pub(crate) fn before_emit_at(&mut self, now: DateTime<Local>) -> Result<Option<Rotation>> {
        if !self.active_file_reached_limit()? {
            return Ok(None);
        }
        self.reinitialize_at(now)
    }

    fn active_file_reached_limit(&self) -> Result<bool> {
        let (Some(settings), Some(active)) = (&self.settings, &self.active_file) else {
            return Ok(false);
        };

        match fs::metadata(active) {
            Ok(metadata) => Ok(settings
                .size_accounting
                .file_reached_limit(metadata.len(), settings.max_file_size_mb)),
            // Not written to yet
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(LoggerError::InspectFile {
                path: active.clone(),
                source,
            }),
        }
    }
}

fn reinitialize(settings: &LoggerSettings, now: DateTime<Local>) -> Result<Rotation> {
    // Recreated if someone removed it since the last rotation
    fs::create_dir_all(&settings.folder).map_err(|source| LoggerError::CreateFolder {
        path: settings.folder.clone(),
        source,
    })?;

    let pruned = prune_folder(
        &settings.folder,
        settings.max_folder_size_mb,
        settings.size_accounting,
    )?;

    let active_file = log_file_path(&settings.folder, &settings.prefix, now);
    tracing::debug!("Active log file is now {}", active_file.display());

    Ok(Rotation {
        active_file,
        pruned,
    })
}
