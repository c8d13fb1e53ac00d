//! Error types for the logger

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to write session log {path}: {source}")]
    FileSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write console record: {0}")]
    Console(#[source] std::io::Error),

    #[error("Failed to serialize payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type LogResult<T> = Result<T, LogError>;
