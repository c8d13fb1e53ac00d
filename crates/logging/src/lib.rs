//! Pagelog logging engine
//!
//! Session logger for browser-driven test automation:
//! - Ordered severity levels with a `NONE` minimum that silences everything
//! - Named presets and a resolver that merges call-site, environment,
//!   preset and default configuration tiers
//! - Console (colorized) and session-file sinks, written synchronously
//! - UTC+8 timestamps that do not depend on the host timezone
//! - Step, performance, element-success and API record categories

pub mod config;
pub mod error;
pub mod level;
pub mod logger;
pub mod resolver;
pub mod sink;
pub mod time;

pub use config::{LogConfig, LogOverrides, Preset};
pub use error::{LogError, LogResult};
pub use level::Level;
pub use logger::{global, install, ConfigGuard, Logger};
pub use resolver::{EnvSource, Resolver};
pub use sink::{Category, LogRecord};
