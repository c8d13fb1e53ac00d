//! Log records and the console / session-file sinks they fan out to

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use colored::Colorize;
use parking_lot::Mutex;

use crate::error::{LogError, LogResult};
use crate::level::Level;
use crate::time;

/// Emission category of a record
///
/// Not rendered in either sink; it travels with the record so that dropped
/// records can be attributed in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Step,
    Performance,
    ElementSuccess,
    Api,
}

/// A single record, built per emission and dropped after fan-out
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub payload: Option<serde_json::Value>,
    pub category: Option<Category>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            payload: None,
            category: None,
        }
    }

    pub fn with_payload(mut self, payload: Option<serde_json::Value>) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// `[YYYY-MM-DD HH:mm:ss] [LEVEL] message`
    pub fn header(&self) -> String {
        format!(
            "[{}] [{}] {}",
            time::record_timestamp(self.timestamp),
            self.level,
            self.message
        )
    }

    fn payload_block(&self) -> LogResult<Option<String>> {
        match &self.payload {
            Some(payload) => Ok(Some(serde_json::to_string_pretty(payload)?)),
            None => Ok(None),
        }
    }

    /// Plain-text form written to the session file, newline terminated
    pub fn to_file_entry(&self) -> LogResult<String> {
        let mut entry = self.header();
        if let Some(block) = self.payload_block()? {
            entry.push('\n');
            entry.push_str(&block);
        }
        entry.push('\n');
        Ok(entry)
    }
}

/// Severity-colorized console output
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn write(&self, record: &LogRecord) -> LogResult<()> {
        let mut out = format!("{}\n", record.header().as_str().color(record.level.color()));
        if let Some(block) = record.payload_block()? {
            out.push_str(&block);
            out.push('\n');
        }

        let mut writer = self.writer.lock();
        writer
            .write_all(out.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(LogError::Console)
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

/// Append-only session log file. Never rotated or truncated.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the owning directory if it does not exist yet
    pub fn ensure_dir(&self) -> LogResult<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir).map_err(|source| LogError::FileSink {
                    path: self.path.clone(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }

    /// Append one complete entry with a single write
    pub fn write(&self, record: &LogRecord) -> LogResult<()> {
        let entry = record.to_file_entry()?;
        let _guard = self.lock.lock();

        self.ensure_dir()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(entry.as_bytes()))
            .map_err(|source| LogError::FileSink {
                path: self.path.clone(),
                source,
            })
    }
}
