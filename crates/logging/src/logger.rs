//! Level-filtered, multi-sink logger

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde_json::Value;

use crate::config::{LogConfig, LogOverrides};
use crate::error::LogResult;
use crate::level::Level;
use crate::resolver::Resolver;
use crate::sink::{Category, ConsoleSink, FileSink, LogRecord};
use crate::time;

pub const DEFAULT_TEST_NAME: &str = "playwright";
pub const DEFAULT_LOG_DIR: &str = "logs";

static GLOBAL_LOGGER: OnceCell<Arc<Logger>> = OnceCell::new();

/// Session logger.
///
/// Holds the current configuration and one session log file. Every accepted
/// record is written synchronously before the call returns; nothing is
/// buffered. Create one per process.
#[derive(Debug)]
pub struct Logger {
    test_name: String,
    config: RwLock<LogConfig>,
    console: ConsoleSink,
    file: FileSink,
}

impl Logger {
    /// Create a logger writing `<log_dir>/<test_name>_<timestamp>.log`.
    ///
    /// The log directory is created up front when the file sink is enabled;
    /// a failure here is reported and retried on the first write.
    pub fn new(test_name: impl Into<String>, log_dir: impl AsRef<Path>, config: LogConfig) -> Self {
        let test_name = test_name.into();
        let file_name = format!("{}_{}.log", test_name, time::file_timestamp(Utc::now()));
        let file = FileSink::new(log_dir.as_ref().join(file_name));

        if config.file {
            if let Err(e) = file.ensure_dir() {
                tracing::warn!("Could not create log directory: {}", e);
            }
        }

        Self {
            test_name,
            config: RwLock::new(config),
            console: ConsoleSink::stdout(),
            file,
        }
    }

    /// Logger configured from the process environment, using the default
    /// test name and log directory
    pub fn from_env() -> Self {
        let config = Resolver::from_env().resolve(&LogOverrides::default());
        Self::new(DEFAULT_TEST_NAME, DEFAULT_LOG_DIR, config)
    }

    /// Redirect the console sink
    pub fn with_console_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.console = ConsoleSink::new(writer);
        self
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Path of the session log file
    pub fn session_path(&self) -> &Path {
        self.file.path()
    }

    pub fn config(&self) -> LogConfig {
        *self.config.read()
    }

    /// Overlay `overrides` onto the current configuration. Unspecified
    /// fields keep their current value.
    pub fn set_config(&self, overrides: &LogOverrides) {
        let mut config = self.config.write();
        *config = config.merge(overrides);
    }

    /// Replace the configuration with the built-in default merged with
    /// `overrides`
    pub fn configure(&self, overrides: &LogOverrides) {
        *self.config.write() = LogConfig::default().merge(overrides);
    }

    /// Apply `overrides` until the returned guard is dropped
    pub fn scoped(&self, overrides: &LogOverrides) -> ConfigGuard<'_> {
        let previous = self.config();
        self.set_config(overrides);
        ConfigGuard {
            logger: self,
            previous,
        }
    }

    /// Run `f` under a temporary configuration
    pub fn with_config<R>(&self, overrides: &LogOverrides, f: impl FnOnce(&Logger) -> R) -> R {
        let _guard = self.scoped(overrides);
        f(self)
    }

    pub fn should_log(&self, level: Level) -> bool {
        level.passes(self.config.read().level)
    }

    /// Emit a record, surfacing sink failures to the caller
    pub fn try_emit(&self, level: Level, message: &str, payload: Option<Value>) -> LogResult<()> {
        self.write_record(&LogRecord::new(level, message).with_payload(payload))
    }

    /// Emit a record. Sink failures are reported through `tracing`.
    pub fn emit(&self, level: Level, message: &str, payload: Option<Value>) {
        self.dispatch(LogRecord::new(level, message).with_payload(payload));
    }

    fn dispatch(&self, record: LogRecord) {
        if let Err(e) = self.write_record(&record) {
            tracing::error!(category = ?record.category, "Dropped log record: {}", e);
        }
    }

    /// Fan out to every enabled sink. A failing sink does not stop the
    /// others; the first failure is returned once all were tried.
    fn write_record(&self, record: &LogRecord) -> LogResult<()> {
        let config = self.config();
        if !record.level.passes(config.level) {
            return Ok(());
        }

        let console = if config.console { self.console.write(record) } else { Ok(()) };
        let file = if config.file { self.file.write(record) } else { Ok(()) };
        console.and(file)
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.emit(Level::Debug, message.as_ref(), None);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(Level::Info, message.as_ref(), None);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(Level::Warn, message.as_ref(), None);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(Level::Error, message.as_ref(), None);
    }

    /// Error record with a structured payload
    pub fn error_with(&self, message: impl AsRef<str>, payload: Value) {
        self.emit(Level::Error, message.as_ref(), Some(payload));
    }

    /// Mark a logical test phase
    pub fn step(&self, message: impl AsRef<str>) {
        self.categorized(Category::Step, format!("Step: {}", message.as_ref()));
    }

    /// Elapsed time of an operation; only when `performance` is enabled
    pub fn performance(&self, action: &str, elapsed_ms: u64) {
        if self.config().performance {
            self.categorized(
                Category::Performance,
                format!("Performance [{}]: {}ms", action, elapsed_ms),
            );
        }
    }

    /// Success of an element operation; only when `element_success` is
    /// enabled
    pub fn element_success(&self, message: impl AsRef<str>) {
        if self.config().element_success {
            self.categorized(Category::ElementSuccess, message.as_ref().to_string());
        }
    }

    /// API call summary. A status or response time that is present is
    /// always rendered, zero included; only `None` omits the field.
    pub fn api(&self, method: &str, url: &str, status: Option<u16>, response_time_ms: Option<u64>) {
        let mut message = format!("API {} {}", method, url);
        if let Some(status) = status {
            message.push_str(&format!(" Status: {}", status));
        }
        if let Some(ms) = response_time_ms {
            message.push_str(&format!(" Time: {}ms", ms));
        }
        self.categorized(Category::Api, message);
    }

    fn categorized(&self, category: Category, message: String) {
        self.dispatch(LogRecord::new(Level::Info, message).with_category(Some(category)));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_NAME, DEFAULT_LOG_DIR, LogConfig::default())
    }
}

/// Restores the configuration captured by [`Logger::scoped`] on drop
#[must_use = "the previous configuration is restored when the guard drops"]
pub struct ConfigGuard<'a> {
    logger: &'a Logger,
    previous: LogConfig,
}

impl Drop for ConfigGuard<'_> {
    fn drop(&mut self) {
        *self.logger.config.write() = self.previous;
    }
}

/// Install the process-wide logger. The first install wins; later calls
/// return the logger already installed.
pub fn install(logger: Logger) -> Arc<Logger> {
    GLOBAL_LOGGER.get_or_init(|| Arc::new(logger)).clone()
}

/// The process-wide logger, if one was installed
pub fn global() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER.get().cloned()
}
