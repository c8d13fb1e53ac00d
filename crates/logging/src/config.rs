//! Logging configuration and named presets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Complete logging configuration. Every field is always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Minimum level emitted
    pub level: Level,

    /// Write records to the console sink
    pub console: bool,

    /// Write records to the session log file
    pub file: bool,

    /// Emit the performance category (elapsed milliseconds per operation)
    pub performance: bool,

    /// Emit the element-success category
    pub element_success: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            console: true,
            file: true,
            performance: false,
            element_success: false,
        }
    }
}

impl LogConfig {
    /// Overlay the fields set in `overrides`; unset fields keep their value.
    pub fn merge(self, overrides: &LogOverrides) -> Self {
        Self {
            level: overrides.level.unwrap_or(self.level),
            console: overrides.console.unwrap_or(self.console),
            file: overrides.file.unwrap_or(self.file),
            performance: overrides.performance.unwrap_or(self.performance),
            element_success: overrides.element_success.unwrap_or(self.element_success),
        }
    }
}

/// Partial configuration. `None` means "not specified at this tier".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogOverrides {
    /// Name of a preset to use in full, see [`Preset`]
    pub preset: Option<String>,
    pub level: Option<Level>,
    pub console: Option<bool>,
    pub file: Option<bool>,
    pub performance: Option<bool>,
    pub element_success: Option<bool>,
}

impl LogOverrides {
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn console(mut self, enabled: bool) -> Self {
        self.console = Some(enabled);
        self
    }

    pub fn file(mut self, enabled: bool) -> Self {
        self.file = Some(enabled);
        self
    }

    pub fn performance(mut self, enabled: bool) -> Self {
        self.performance = Some(enabled);
        self
    }

    pub fn element_success(mut self, enabled: bool) -> Self {
        self.element_success = Some(enabled);
        self
    }

    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.preset = Some(name.into());
        self
    }

    /// Layer `top` over `self`; fields set in `top` win.
    pub fn layered(&self, top: &LogOverrides) -> LogOverrides {
        LogOverrides {
            preset: top.preset.clone().or_else(|| self.preset.clone()),
            level: top.level.or(self.level),
            console: top.console.or(self.console),
            file: top.file.or(self.file),
            performance: top.performance.or(self.performance),
            element_success: top.element_success.or(self.element_success),
        }
    }

    /// True when no field (and no preset) is specified
    pub fn is_empty(&self) -> bool {
        *self == LogOverrides::default()
    }
}

impl From<LogConfig> for LogOverrides {
    fn from(config: LogConfig) -> Self {
        Self {
            preset: None,
            level: Some(config.level),
            console: Some(config.console),
            file: Some(config.file),
            performance: Some(config.performance),
            element_success: Some(config.element_success),
        }
    }
}

/// Named, complete configuration bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Everything, down to debug
    Verbose,
    /// Warnings and errors only
    Quiet,
    /// File only, no console
    Production,
    /// Detailed console output, no file
    Development,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Verbose, Preset::Quiet, Preset::Production, Preset::Development];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Verbose => "verbose",
            Preset::Quiet => "quiet",
            Preset::Production => "production",
            Preset::Development => "development",
        }
    }

    /// Look up a preset by name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Preset> {
        let name = name.trim();
        Preset::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn config(&self) -> LogConfig {
        match self {
            Preset::Verbose => LogConfig {
                level: Level::Debug,
                console: true,
                file: true,
                performance: true,
                element_success: true,
            },
            Preset::Quiet => LogConfig {
                level: Level::Warn,
                console: true,
                file: true,
                performance: false,
                element_success: false,
            },
            Preset::Production => LogConfig {
                level: Level::Info,
                console: false,
                file: true,
                performance: true,
                element_success: false,
            },
            Preset::Development => LogConfig {
                level: Level::Debug,
                console: true,
                file: false,
                performance: true,
                element_success: true,
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::from_name(s).ok_or_else(|| format!("unknown log preset: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::Info);
        assert!(config.console);
        assert!(config.file);
        assert!(!config.performance);
        assert!(!config.element_success);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let merged = LogConfig::default().merge(&LogOverrides::default().level(Level::Error).file(false));
        assert_eq!(
            merged,
            LogConfig {
                level: Level::Error,
                console: true,
                file: false,
                performance: false,
                element_success: false,
            }
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let overrides = LogOverrides::default().console(false).performance(true);
        let once = LogConfig::default().merge(&overrides);
        assert_eq!(once.merge(&overrides), once);
    }

    #[test]
    fn test_layered_top_wins() {
        let env = LogOverrides::default().console(false).level(Level::Debug);
        let explicit = LogOverrides::default().level(Level::Warn);
        let layered = env.layered(&explicit);
        assert_eq!(layered.level, Some(Level::Warn));
        assert_eq!(layered.console, Some(false));
        assert_eq!(layered.file, None);
    }

    #[test]
    fn test_quiet_preset() {
        assert_eq!(
            Preset::from_name("quiet").map(|p| p.config()),
            Some(LogConfig {
                level: Level::Warn,
                console: true,
                file: true,
                performance: false,
                element_success: false,
            })
        );
    }

    #[test]
    fn test_unknown_preset() {
        assert_eq!(Preset::from_name("loud"), None);
        assert!("Verbose".parse::<Preset>().is_err());
    }

    #[test]
    fn test_overrides_deserialize_camel_case() {
        let overrides: LogOverrides =
            serde_json::from_str(r#"{"level":"WARN","elementSuccess":true}"#).unwrap();
        assert_eq!(overrides.level, Some(Level::Warn));
        assert_eq!(overrides.element_success, Some(true));
        assert_eq!(overrides.console, None);
    }
}
