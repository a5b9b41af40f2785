//! Timestamped log file names and line prefixes

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Second-granularity stamp embedded in log file names
const FILE_STAMP_FORMAT: &str = "%Y.%m.%d_%H.%M.%S";

/// Microsecond-granularity stamp written before every file message
const LINE_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const LOG_EXTENSION: &str = "txt";

/// Generate the log file path for a rotation happening at `now`
///
/// Two rotations within the same second produce the same name.
pub fn log_file_path(folder: &Path, prefix: &str, now: DateTime<Local>) -> PathBuf {
    let timestamp = now.format(FILE_STAMP_FORMAT);
    folder.join(format!("{}_{}.{}", prefix, timestamp, LOG_EXTENSION))
}

/// Prefix written before a message in a log file, including the trailing space
pub fn line_prefix(now: DateTime<Local>) -> String {
    format!("{} ", now.format(LINE_STAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, micros: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 1, 21, h, m, s)
            .single()
            .unwrap()
            + chrono::Duration::microseconds(micros as i64)
    }

    #[test]
    fn test_log_file_path() {
        let path = log_file_path(Path::new("/tmp/logs"), "LOG", at(14, 30, 45, 0));
        assert_eq!(path, PathBuf::from("/tmp/logs/LOG_2026.01.21_14.30.45.txt"));
    }

    #[test]
    fn test_log_file_path_same_second_collides() {
        let a = log_file_path(Path::new("logs"), "APP", at(9, 0, 0, 10));
        let b = log_file_path(Path::new("logs"), "APP", at(9, 0, 0, 999_000));
        assert_eq!(a, b);
    }

    #[test]
    fn test_line_prefix_pads_microseconds() {
        assert_eq!(line_prefix(at(8, 5, 3, 42)), "2026-01-21 08:05:03.000042 ");
        assert_eq!(
            line_prefix(at(23, 59, 59, 123_456)),
            "2026-01-21 23:59:59.123456 "
        );
    }
}
