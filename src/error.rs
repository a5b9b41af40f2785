//! Error types for log configuration and folder maintenance

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by configuration and rotation
///
/// Emission never returns these; failures while writing a message are
/// recorded in [`crate::Diagnostics`] instead.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The log folder argument was empty
    #[error("Log folder must not be empty")]
    EmptyFolder,

    /// The log folder did not exist and could not be created
    #[error("Failed to create log folder {}: {source}", path.display())]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log folder could not be listed
    #[error("Failed to read log folder {}: {source}", path.display())]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata of a file in the log folder could not be read
    #[error("Failed to inspect {}: {source}", path.display())]
    InspectFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file could not be read
    #[error("Failed to read settings file {}: {source}", path.display())]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file was not valid TOML for [`crate::LoggerSettings`]
    #[error("Failed to parse settings file {}: {source}", path.display())]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LoggerError>;
