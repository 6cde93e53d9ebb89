// # Run Log
//
// Append-only text log, one line per significant event of a run:
//
// ```text
// [2025-01-09 12:00:00] Successfully updated DNS to 203.0.113.5
// ```
//
// The file is opened in append mode and closed again on every call. No
// handle is held between writes, so concurrent runs only ever interleave
// whole lines.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Timestamp format of a log line, second precision, local time
const TIMESTAMP_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// Append-only run log
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create a run log writing to `path`
    ///
    /// Nothing is touched on disk until the first [`RunLog::append`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one timestamped line, creating the file if needed
    ///
    /// A filesystem failure is returned as [`Error::Log`]. Callers treat
    /// it as fatal.
    pub async fn append(&self, message: &str) -> Result<()> {
        let line = format_entry(Local::now(), message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| self.log_error(source))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|source| self.log_error(source))?;
        file.flush().await.map_err(|source| self.log_error(source))?;

        Ok(())
    }

    fn log_error(&self, source: std::io::Error) -> Error {
        Error::Log {
            path: self.path.clone(),
            source,
        }
    }
}

/// Render a log line, including the trailing newline
pub fn format_entry(timestamp: DateTime<Local>, message: &str) -> String {
    format!("{} {}\n", timestamp.format(TIMESTAMP_FORMAT), message)
}
