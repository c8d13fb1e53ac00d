//! Error types for instrumented automation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

/// Why a subject description could not be derived from a handle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("Attribute probe failed: {0}")]
    Probe(String),

    #[error("Handle exposes no identifying attribute")]
    NoIdentifyingAttribute,
}

/// Why a failure screenshot could not be stored
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to create screenshot directory: {0}")]
    Directory(#[source] std::io::Error),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),
}
