//! Configuration for log folders and rotation limits

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoggerError, Result};

/// Bytes in one megabyte as used by every size limit (1 MiB)
pub const MIB: u64 = 1 << 20;

const SETTINGS_FILE: &str = "config.toml";

/// How file and folder sizes are compared against their megabyte limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeAccounting {
    /// Sizes are truncated to whole megabytes before comparing.
    ///
    /// A file rotates once `floor(size / MiB) >= limit` and a folder is over
    /// budget once `floor(total / MiB) > budget`, so up to just under 1 MiB of
    /// headroom is always tolerated.
    #[default]
    WholeMegabytes,
    /// Sizes are compared in bytes against `limit * MiB`
    Exact,
}

impl SizeAccounting {
    /// Whether a file of `size_bytes` has reached a `limit_mb` file limit
    pub fn file_reached_limit(&self, size_bytes: u64, limit_mb: u64) -> bool {
        match self {
            SizeAccounting::WholeMegabytes => size_bytes / MIB >= limit_mb,
            SizeAccounting::Exact => size_bytes >= limit_mb.saturating_mul(MIB),
        }
    }

    /// Whether a folder holding `total_bytes` exceeds a `budget_mb` folder budget
    pub fn folder_over_budget(&self, total_bytes: u64, budget_mb: u64) -> bool {
        match self {
            SizeAccounting::WholeMegabytes => total_bytes / MIB > budget_mb,
            SizeAccounting::Exact => total_bytes > budget_mb.saturating_mul(MIB),
        }
    }
}

/// Where and how log files are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Folder holding the log files (`~` is expanded on load)
    #[serde(default = "default_log_folder")]
    pub folder: PathBuf,

    /// Filename prefix, files are named `<prefix>_<timestamp>.txt`
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Folder budget in megabytes (default: 100)
    #[serde(default = "default_max_folder_size_mb")]
    pub max_folder_size_mb: u64,

    /// Size in megabytes at which the active file is replaced (default: 1)
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Megabyte truncation or exact byte comparisons
    #[serde(default)]
    pub size_accounting: SizeAccounting,
}

fn default_log_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("chromalog").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn default_prefix() -> String {
    "LOG".to_string()
}

fn default_max_folder_size_mb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    1
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            folder: default_log_folder(),
            prefix: default_prefix(),
            max_folder_size_mb: default_max_folder_size_mb(),
            max_file_size_mb: default_max_file_size_mb(),
            size_accounting: SizeAccounting::default(),
        }
    }
}

impl LoggerSettings {
    /// Create settings with megabyte truncation
    pub fn new(
        folder: impl Into<PathBuf>,
        prefix: impl Into<String>,
        max_folder_size_mb: u64,
        max_file_size_mb: u64,
    ) -> Self {
        Self {
            folder: folder.into(),
            prefix: prefix.into(),
            max_folder_size_mb,
            max_file_size_mb,
            size_accounting: SizeAccounting::default(),
        }
    }

    /// Switch the size comparison mode
    pub fn with_size_accounting(mut self, accounting: SizeAccounting) -> Self {
        self.size_accounting = accounting;
        self
    }

    /// Whether the folder is usable at all
    pub fn has_folder(&self) -> bool {
        !self.folder.as_os_str().is_empty()
    }

    /// Load settings from the default settings file, or defaults if it is absent
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file_path())
    }

    /// Load settings from a TOML file, or defaults if it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| LoggerError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings: Self =
            toml::from_str(&content).map_err(|source| LoggerError::ParseSettings {
                path: path.to_path_buf(),
                source,
            })?;
        settings.folder = expand_home(&settings.folder);
        Ok(settings)
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => match shellexpand::tilde(s) {
            Cow::Borrowed(_) => path.to_path_buf(),
            Cow::Owned(expanded) => PathBuf::from(expanded),
        },
        None => path.to_path_buf(),
    }
}

/// Get the base configuration directory (<config dir>/chromalog)
/// Falls back to ./.chromalog if no config directory can be determined
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("chromalog"))
        .unwrap_or_else(|| {
            tracing::warn!("Could not determine config directory, using current directory");
            PathBuf::from(".chromalog")
        })
}

/// Get the path to the settings file
pub fn settings_file_path() -> PathBuf {
    config_dir().join(SETTINGS_FILE)
}
