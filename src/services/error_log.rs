use chrono::Local;
use spot_separation::{ChannelFailure, FailureSink, TracingSink};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Timestamped, append-only error log
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line as `[YYYY-MM-DD HH:MM:SS] message`
    pub fn append(&self, message: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "[{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        )
    }

    /// Append, logging instead of failing if the file cannot be written
    pub fn record(&self, message: &str) {
        if let Err(e) = self.append(message) {
            tracing::warn!(path = %self.path.display(), %e, "Failed to write error log");
        }
    }
}

/// Failure sink that logs through tracing and appends to the error log
#[derive(Debug, Clone)]
pub struct ErrorLogSink {
    log: ErrorLog,
}

impl ErrorLogSink {
    pub fn new(log: ErrorLog) -> Self {
        Self { log }
    }
}

impl FailureSink for ErrorLogSink {
    fn record(&self, failure: &ChannelFailure) {
        TracingSink.record(failure);
        self.log.record(&format!(
            "channel {} (#{}) skipped: {}",
            failure.palette_index + 1,
            failure.color_hex,
            failure.message
        ));
    }
}
