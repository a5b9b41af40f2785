//! Logger façade tying rotation and emission together

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::LoggerSettings;
use crate::diagnostics::{DiagnosticCounters, Diagnostics};
use crate::error::{LoggerError, Result};
use crate::print::{Destination, MessageSink, PrintColor};
use crate::rotation::{PruneReport, RotationPolicy};

/// Process-wide logger used by the free functions of this crate
static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// State shared by a logger and every sink it creates
pub(crate) struct Shared {
    /// Configuration lock
    policy: Mutex<RotationPolicy>,
    /// Console writer, taken after the process-wide print lock
    pub(crate) console: Mutex<Box<dyn Write + Send>>,
    pub(crate) diagnostics: DiagnosticCounters,
}

impl Shared {
    pub(crate) fn new(console: Box<dyn Write + Send>) -> Self {
        Self {
            policy: Mutex::new(RotationPolicy::new()),
            console: Mutex::new(console),
            diagnostics: DiagnosticCounters::default(),
        }
    }
}

/// Colorized console and rotating file logger
///
/// Cloning is cheap and clones share configuration, locks and counters.
/// Most programs use the single instance behind [`Logger::global`]; separate
/// instances are useful for isolated log folders and tests. Writes from all
/// instances go through one process-wide print lock.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

impl Logger {
    /// Create a logger writing console output to stdout
    pub fn new() -> Self {
        Self::with_console(io::stdout())
    }

    /// Create a logger writing console output to `console`
    pub fn with_console<W: Write + Send + 'static>(console: W) -> Self {
        Self {
            shared: Arc::new(Shared::new(Box::new(console))),
        }
    }

    /// The process-wide logger, created on first use
    ///
    /// It is never torn down; its state lives until the process exits.
    pub fn global() -> &'static Logger {
        GLOBAL.get_or_init(Logger::new)
    }

    /// Version of this library
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Apply new settings, creating the folder and starting a new active file
    ///
    /// On error the previous configuration stays in effect.
    pub fn configure(&self, settings: LoggerSettings) -> Result<()> {
        let mut policy = self.lock_policy();
        let rotation = policy.configure(settings)?;
        self.record_pruning(&rotation.pruned);
        tracing::info!("Logging to {}", rotation.active_file.display());
        Ok(())
    }

    /// Configure the log folder, prefix and size limits in megabytes
    ///
    /// Returns `false` only when `folder` is empty, in which case nothing
    /// changes. Other failures are reported through `tracing` and
    /// [`Logger::diagnostics`].
    pub fn set_save_log_params(
        &self,
        folder: impl Into<PathBuf>,
        prefix: impl Into<String>,
        max_folder_size_mb: u64,
        max_file_size_mb: u64,
    ) -> bool {
        let settings = LoggerSettings::new(folder, prefix, max_folder_size_mb, max_file_size_mb);
        match self.configure(settings) {
            Ok(()) => true,
            Err(LoggerError::EmptyFolder) => false,
            Err(e) => {
                self.shared.diagnostics.rotation_failed();
                tracing::error!("Failed to configure logging: {}", e);
                true
            }
        }
    }

    /// Start a message with the given color and destinations
    ///
    /// Rotates the active file first if it has reached its size limit. The
    /// message is written when the returned sink is dropped.
    pub fn print(&self, color: PrintColor, destination: Destination) -> MessageSink {
        let bound_file = self.before_emit();
        MessageSink::new(Arc::clone(&self.shared), color, destination, bound_file)
    }

    /// Start a console-only message
    pub fn print_console(&self, color: PrintColor) -> MessageSink {
        self.print(color, Destination::CONSOLE)
    }

    /// File currently receiving writes, if configured
    pub fn active_file_path(&self) -> Option<PathBuf> {
        self.lock_policy().active_file().map(Path::to_path_buf)
    }

    /// Settings currently in effect, if configured
    pub fn settings(&self) -> Option<LoggerSettings> {
        self.lock_policy().settings().cloned()
    }

    /// Snapshot of best-effort failure counters
    pub fn diagnostics(&self) -> Diagnostics {
        self.shared.diagnostics.snapshot()
    }

    fn before_emit(&self) -> Option<PathBuf> {
        let mut policy = self.lock_policy();

        match policy.before_emit() {
            Ok(Some(rotation)) => {
                self.record_pruning(&rotation.pruned);
                tracing::debug!("Rotated log file to {}", rotation.active_file.display());
            }
            Ok(None) => {}
            Err(e) => {
                self.shared.diagnostics.rotation_failed();
                tracing::warn!("Failed to rotate log file: {}", e);
            }
        }

        policy.active_file().map(Path::to_path_buf)
    }

    fn record_pruning(&self, report: &PruneReport) {
        if report.failed > 0 {
            self.shared.diagnostics.deletions_failed(report.failed);
        }
        if !report.deleted.is_empty() {
            tracing::info!(
                "Pruned {} old log files, {} bytes remain",
                report.deleted.len(),
                report.remaining_bytes
            );
        }
    }

    fn lock_policy(&self) -> MutexGuard<'_, RotationPolicy> {
        self.shared
            .policy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
