//! tracing subscriber setup.
//!
//! The play mode owns the terminal, so its logs go to a file; headless runs
//! log to stderr and keep stdout for the report.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "SNAKE_LOG";

pub enum LogSink<'a> {
    File(&'a Path),
    Stderr,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_tracing(sink: LogSink<'_>) -> Result<()> {
    match sink {
        LogSink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogSink::Stderr => {
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_receives_events() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snake.log");

        init_tracing(LogSink::File(&path)).unwrap();
        tracing::info!(score = 3, "game over");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("game over"));
        assert!(written.contains("score=3"));

        // a second global subscriber is refused
        assert!(init_tracing(LogSink::Stderr).is_err());
    }

    #[test]
    fn test_unwritable_log_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("snake.log");
        assert!(init_tracing(LogSink::File(&path)).is_err());
    }
}
