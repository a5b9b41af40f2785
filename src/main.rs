use std::thread;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use chromalog::{Destination, Logger, LoggerSettings, PrintColor};

/// Messages written by each of the two demo writers
const ITERATIONS: usize = 10_000;

fn main() -> Result<()> {
    // Library diagnostics go to stderr so they never mix with colored stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "chromalog=info".into()),
        )
        .init();

    let logger = Logger::global();

    let banner = "=================================================";
    logger.print_console(PrintColor::Normal).append(banner).newline();
    logger
        .print_console(PrintColor::Normal)
        .append("chromalog demo ")
        .append(Logger::version())
        .newline();
    logger.print_console(PrintColor::Normal).append(banner).newline();

    let settings = LoggerSettings::load().context("Failed to load logger settings")?;
    logger
        .configure(settings)
        .context("Failed to configure logging")?;

    let worker = thread::Builder::new()
        .name("demo-worker".into())
        .spawn(move || {
            for i in 0..ITERATIONS {
                logger
                    .print_console(PrintColor::Green)
                    .append("THREAD ")
                    .append(i)
                    .newline();
            }
        })
        .context("Failed to spawn worker thread")?;

    for i in 0..ITERATIONS {
        logger
            .print(PrintColor::Red, Destination::FILE)
            .append("MAIN ")
            .append(i)
            .newline();
    }

    worker
        .join()
        .map_err(|_| anyhow::anyhow!("Worker thread panicked"))?;

    let diagnostics = logger.diagnostics();
    if diagnostics.total() > 0 {
        tracing::warn!("Logging finished with failures: {:?}", diagnostics);
    }
    if let Some(path) = logger.active_file_path() {
        tracing::info!("Last log file: {}", path.display());
    }

    Ok(())
}
