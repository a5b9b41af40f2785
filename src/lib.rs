//! Chromalog - colorized console and rotating file logging
//!
//! Messages are composed through a [`MessageSink`] and written when the sink
//! goes out of scope, either to stdout wrapped in ANSI color codes, to the
//! active log file behind a microsecond timestamp, or to both. Log files are
//! named `<prefix>_<YYYY.MM.DD_HH.MM.SS>.txt`, replaced once they reach a size
//! limit, and the oldest files are deleted whenever the folder grows past its
//! budget.
//!
//! ```no_run
//! use chromalog::{Destination, PrintColor};
//!
//! chromalog::set_save_log_params("logs", "LOG", 100, 1);
//! chromalog::print(PrintColor::Green, Destination::CONSOLE_AND_FILE)
//!     .append("started worker ")
//!     .append(7)
//!     .newline();
//! ```

pub mod config;
mod diagnostics;
pub mod error;
mod logger;
pub mod print;
pub mod rotation;

use std::path::PathBuf;

pub use config::{LoggerSettings, SizeAccounting, MIB};
pub use diagnostics::Diagnostics;
pub use error::{LoggerError, Result};
pub use logger::Logger;
pub use print::{Destination, MessageSink, PrintColor};

/// Configure the global logger, see [`Logger::set_save_log_params`]
pub fn set_save_log_params(
    folder: impl Into<PathBuf>,
    prefix: impl Into<String>,
    max_folder_size_mb: u64,
    max_file_size_mb: u64,
) -> bool {
    Logger::global().set_save_log_params(folder, prefix, max_folder_size_mb, max_file_size_mb)
}

/// Start a message on the global logger, see [`Logger::print`]
pub fn print(color: PrintColor, destination: Destination) -> MessageSink {
    Logger::global().print(color, destination)
}

/// Version of this library
pub fn version() -> &'static str {
    Logger::version()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // The only test touching the global logger
    #[test]
    fn test_global_logger() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("global");

        assert!(!set_save_log_params("", "LOG", 10, 1));
        assert!(set_save_log_params(&folder, "LOG", 10, 1));

        print(PrintColor::Normal, Destination::FILE).append("global");
        print(PrintColor::Normal, Destination::DISABLED).append("hidden");

        let active = Logger::global().active_file_path().unwrap();
        assert!(active.starts_with(&folder));
        let content = std::fs::read_to_string(active).unwrap();
        assert!(content.ends_with(" global"));
        assert!(!content.contains("hidden"));
        assert!(!version().is_empty());
    }
}
