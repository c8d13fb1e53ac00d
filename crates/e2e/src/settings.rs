//! Run configuration: logging overrides, screenshot settings and timeouts

use std::path::{Path, PathBuf};

use pagelog_logging::{LogConfig, LogOverrides, Logger, Resolver};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};

/// Screenshot behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Master switch for screenshot capture
    pub enabled: bool,

    /// Capture a screenshot when a wrapped operation fails
    pub on_failure: bool,

    /// Where screenshots are written
    pub dir: PathBuf,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_failure: true,
            dir: PathBuf::from("screenshots"),
        }
    }
}

impl ScreenshotConfig {
    pub fn captures_failures(&self) -> bool {
        self.enabled && self.on_failure
    }
}

/// Default timeouts handed to the driver when a call does not set one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Waiting for elements and load states
    pub element_ms: u64,

    /// Page navigation
    pub page_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element_ms: 30_000,
            page_ms: 60_000,
        }
    }
}

/// Run configuration as written in a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Call-site logging overrides (may name a preset)
    pub log: LogOverrides,

    /// Directory holding session log files
    pub log_dir: PathBuf,

    pub screenshot: ScreenshotConfig,

    pub timeouts: Timeouts,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log: LogOverrides::default(),
            log_dir: PathBuf::from(pagelog_logging::logger::DEFAULT_LOG_DIR),
            screenshot: ScreenshotConfig::default(),
            timeouts: Timeouts::default(),
        }
    }
}

impl RunConfig {
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    pub fn from_toml(content: &str) -> E2eResult<Self> {
        toml::from_str(content).map_err(E2eError::from)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file. A missing file yields
    /// the defaults.
    pub fn load(path: &Path) -> E2eResult<Self> {
        if !path.exists() {
            debug!("No run config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            Some("toml") => Self::from_toml(&content)?,
            other => {
                return Err(E2eError::InvalidConfig(format!(
                    "unsupported config format {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };

        info!("Loaded run config from {}", path.display());
        Ok(config)
    }

    /// Resolve against the given environment tiers
    pub fn resolve(&self, resolver: &Resolver) -> Settings {
        Settings {
            log: resolver.resolve(&self.log),
            log_dir: self.log_dir.clone(),
            screenshot: self.screenshot.clone(),
            timeouts: self.timeouts,
        }
    }
}

/// Effective configuration for one test run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log: LogConfig,
    pub log_dir: PathBuf,
    pub screenshot: ScreenshotConfig,
    pub timeouts: Timeouts,
}

impl Default for Settings {
    fn default() -> Self {
        let config = RunConfig::default();
        Self {
            log: LogConfig::default(),
            log_dir: config.log_dir,
            screenshot: config.screenshot,
            timeouts: config.timeouts,
        }
    }
}

impl Settings {
    /// Resolve a run configuration against the process environment
    pub fn from_env(config: &RunConfig) -> Self {
        config.resolve(&Resolver::from_env())
    }

    /// Session logger for `test_name` using these settings
    pub fn logger(&self, test_name: &str) -> Logger {
        Logger::new(test_name, &self.log_dir, self.log)
    }
}
