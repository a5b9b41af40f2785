//! Scoped message accumulator

use std::fmt::{self, Display};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;

use super::color::{PrintColor, RESET};
use super::destination::Destination;
use crate::logger::Shared;
use crate::rotation::line_prefix;

/// Print lock shared by every logger in the process
///
/// Held for the whole of a sink's console and file writes, so messages from
/// different loggers never interleave on stdout or in a shared log folder.
static PRINT_LOCK: Mutex<()> = Mutex::new(());

/// A single message being composed
///
/// Obtained from [`crate::Logger::print`]. Values are appended with
/// [`append`](Self::append) (or `write!`), and the message is written when the
/// sink is dropped. The color, destination and target file are fixed when the
/// sink is created; a rotation that happens afterwards does not redirect it.
///
/// ```no_run
/// use chromalog::{Destination, Logger, PrintColor};
///
/// let logger = Logger::global();
/// logger
///     .print(PrintColor::Red, Destination::CONSOLE_AND_FILE)
///     .append("retrying in ")
///     .append(5)
///     .append("s")
///     .newline();
/// ```
pub struct MessageSink {
    shared: Arc<Shared>,
    color: PrintColor,
    destination: Destination,
    bound_file: Option<PathBuf>,
    buffer: String,
}

impl MessageSink {
    pub(crate) fn new(
        shared: Arc<Shared>,
        color: PrintColor,
        destination: Destination,
        bound_file: Option<PathBuf>,
    ) -> Self {
        Self {
            shared,
            color,
            destination,
            bound_file,
            buffer: String::new(),
        }
    }

    /// Append the textual form of `value`
    ///
    /// Ignored when the sink was created with [`Destination::DISABLED`].
    pub fn append<T: Display>(&mut self, value: T) -> &mut Self {
        if !self.destination.is_disabled() {
            // Writing into a String cannot fail
            let _ = fmt::Write::write_fmt(&mut self.buffer, format_args!("{}", value));
        }
        self
    }

    /// Append a line break
    pub fn newline(&mut self) -> &mut Self {
        self.append('\n')
    }

    /// Write the message now instead of at the end of the scope
    pub fn close(self) {
        drop(self);
    }

    /// Color the message is written in
    pub fn color(&self) -> PrintColor {
        self.color
    }

    /// Where the message is written
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// File this sink appends to, captured when it was created
    pub fn bound_file(&self) -> Option<&Path> {
        self.bound_file.as_deref()
    }

    /// Text accumulated so far
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    fn finalize(&mut self) {
        let to_console = self.destination.writes_console();
        let to_file = self.destination.writes_file();
        if self.destination.is_disabled() || !(to_console || to_file) {
            return;
        }

        let message = std::mem::take(&mut self.buffer);

        let _print = PRINT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let mut console = self
            .shared
            .console
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if to_console {
            if let Err(e) = write_console(&mut **console, self.color, &message) {
                self.shared.diagnostics.console_write_failed();
                tracing::warn!("Failed to write log message to console: {}", e);
            }
        }

        if to_file {
            match &self.bound_file {
                Some(path) => {
                    if let Err(e) = append_to_file(path, &message) {
                        self.shared.diagnostics.file_write_failed();
                        tracing::warn!("Failed to append to {}: {}", path.display(), e);
                    }
                }
                None => {
                    self.shared.diagnostics.file_write_failed();
                    tracing::debug!("Dropped file message, no log folder configured");
                }
            }
        }
    }
}

impl Drop for MessageSink {
    fn drop(&mut self) {
        self.finalize();
    }
}

impl fmt::Write for MessageSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s);
        Ok(())
    }
}

impl fmt::Debug for MessageSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageSink")
            .field("color", &self.color)
            .field("destination", &self.destination)
            .field("bound_file", &self.bound_file)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

fn write_console(out: &mut dyn Write, color: PrintColor, message: &str) -> io::Result<()> {
    let colored = format!("{}{}{}", color.ansi_code(), message, RESET);
    out.write_all(colored.as_bytes())?;
    out.flush()
}

fn append_to_file(path: &Path, message: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let line = format!("{}{}", line_prefix(Local::now()), message);
    file.write_all(line.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Shared;
    use std::fmt::Write as _;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenConsole;

    impl Write for BrokenConsole {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn shared_with(capture: &Capture) -> Arc<Shared> {
        Arc::new(Shared::new(Box::new(capture.clone())))
    }

    #[test]
    fn test_append_chains_values() {
        let capture = Capture::default();
        let mut sink = MessageSink::new(
            shared_with(&capture),
            PrintColor::Blue,
            Destination::CONSOLE,
            None,
        );
        sink.append("x = ").append(3).append(", y = ").append(1.5);

        assert_eq!(sink.contents(), "x = 3, y = 1.5");
        assert!(capture.text().is_empty(), "nothing is written before drop");
    }

    #[test]
    fn test_console_output_is_colored_on_drop() {
        let capture = Capture::default();
        MessageSink::new(
            shared_with(&capture),
            PrintColor::Green,
            Destination::CONSOLE,
            None,
        )
        .append("THREAD")
        .newline();

        assert_eq!(capture.text(), "\x1B[32mTHREAD\n\x1B[0m");
    }

    #[test]
    fn test_write_macro_appends() {
        let capture = Capture::default();
        let mut sink = MessageSink::new(
            shared_with(&capture),
            PrintColor::Normal,
            Destination::CONSOLE,
            None,
        );
        write!(sink, "{}-{}", "a", 7).unwrap();
        sink.close();

        assert_eq!(capture.text(), "\x1B[0ma-7\x1B[0m");
    }

    #[test]
    fn test_disabled_sink_ignores_everything() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("LOG.txt");
        let capture = Capture::default();
        let shared = shared_with(&capture);

        {
            let mut sink = MessageSink::new(
                Arc::clone(&shared),
                PrintColor::Red,
                Destination::DISABLED,
                Some(path.clone()),
            );
            for i in 0..100 {
                sink.append(i);
            }
            assert!(sink.contents().is_empty());
        }

        assert!(capture.text().is_empty());
        assert!(!path.exists());
        assert_eq!(shared.diagnostics.snapshot().total(), 0);
    }

    #[test]
    fn test_file_output_has_timestamp_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("LOG.txt");
        let capture = Capture::default();

        MessageSink::new(
            shared_with(&capture),
            PrintColor::Red,
            Destination::FILE,
            Some(path.clone()),
        )
        .append("hello ")
        .append(42);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("hello 42"));
        let (stamp, message) = content.split_at(27);
        assert_eq!(message, "hello 42");
        assert!(stamp.ends_with(' '));
        chrono::NaiveDateTime::parse_from_str(stamp.trim_end(), "%Y-%m-%d %H:%M:%S%.6f")
            .unwrap();
        assert!(capture.text().is_empty(), "file-only sinks skip the console");
    }

    #[test]
    fn test_file_output_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("LOG.txt");
        let shared = shared_with(&Capture::default());

        for word in ["first", "second"] {
            MessageSink::new(
                Arc::clone(&shared),
                PrintColor::Normal,
                Destination::FILE,
                Some(path.clone()),
            )
            .append(word)
            .newline();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" first"));
        assert!(lines[1].ends_with(" second"));
    }

    #[test]
    fn test_console_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("LOG.txt");
        let capture = Capture::default();

        MessageSink::new(
            shared_with(&capture),
            PrintColor::Yellow,
            Destination::CONSOLE_AND_FILE,
            Some(path.clone()),
        )
        .append("both");

        assert_eq!(capture.text(), "\x1B[33mboth\x1B[0m");
        assert!(std::fs::read_to_string(&path).unwrap().ends_with(" both"));
    }

    #[test]
    fn test_file_without_path_is_counted() {
        let capture = Capture::default();
        let shared = shared_with(&capture);

        MessageSink::new(
            Arc::clone(&shared),
            PrintColor::Normal,
            Destination::FILE,
            None,
        )
        .append("lost");

        assert_eq!(shared.diagnostics.snapshot().file_write_failures, 1);
    }

    #[test]
    fn test_console_failure_is_counted() {
        let shared = Arc::new(Shared::new(Box::new(BrokenConsole)));

        MessageSink::new(
            Arc::clone(&shared),
            PrintColor::Normal,
            Destination::CONSOLE,
            None,
        )
        .append("nowhere");

        assert_eq!(shared.diagnostics.snapshot().console_write_failures, 1);
    }
}
