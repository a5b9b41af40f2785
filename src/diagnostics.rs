//! Failure counters for best-effort operations
//!
//! Emission is fire-and-forget, so failed writes, rotations and deletions are
//! counted here instead of being returned to the caller.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by a logger and its sinks
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCounters {
    console_write_failures: AtomicU64,
    file_write_failures: AtomicU64,
    rotation_failures: AtomicU64,
    deletion_failures: AtomicU64,
}

impl DiagnosticCounters {
    pub(crate) fn console_write_failed(&self) {
        self.console_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn file_write_failed(&self) {
        self.file_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn rotation_failed(&self) {
        self.rotation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn deletions_failed(&self, count: usize) {
        self.deletion_failures
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Copy the current values
    pub(crate) fn snapshot(&self) -> Diagnostics {
        Diagnostics {
            console_write_failures: self.console_write_failures.load(Ordering::Relaxed),
            file_write_failures: self.file_write_failures.load(Ordering::Relaxed),
            rotation_failures: self.rotation_failures.load(Ordering::Relaxed),
            deletion_failures: self.deletion_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a logger's failure counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Console writes or flushes that failed
    pub console_write_failures: u64,
    /// File appends that failed, including file sinks with no configured folder
    pub file_write_failures: u64,
    /// Rotations or configurations that failed on I/O
    pub rotation_failures: u64,
    /// Old log files that could not be deleted while pruning
    pub deletion_failures: u64,
}

impl Diagnostics {
    /// Total number of recorded failures
    pub fn total(&self) -> u64 {
        self.console_write_failures
            + self.file_write_failures
            + self.rotation_failures
            + self.deletion_failures
    }
}
