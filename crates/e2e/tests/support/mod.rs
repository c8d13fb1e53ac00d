//! Scripted in-memory driver for exercising the instrumentation layer

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use pagelog_e2e::driver::{
    FillOptions, LoadState, NavigateOptions, RoleOptions, ScreenshotOptions, WaitOptions,
};
use pagelog_e2e::settings::{ScreenshotConfig, Settings};
use pagelog_e2e::{AttributeSet, AttributeSource, DescriptionError, Driver, InstrumentedPage, Target};
use pagelog_logging::{LogConfig, Logger};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DriverError(pub String);

/// Element handle with fixed probe results
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: Option<String>,
    pub attributes: AttributeSet,
    /// Every probe fails, as if the element were detached
    pub detached: bool,
}

impl FakeElement {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn with_attributes(attributes: AttributeSet) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AttributeSource for FakeElement {
    async fn text_content(&self) -> Result<Option<String>, DescriptionError> {
        if self.detached {
            return Err(DescriptionError::Probe("element is detached".into()));
        }
        Ok(self.text.clone())
    }

    async fn attributes(&self) -> Result<AttributeSet, DescriptionError> {
        if self.detached {
            return Err(DescriptionError::Probe("element is detached".into()));
        }
        Ok(self.attributes.clone())
    }
}

/// Driver that records calls and fails on demand
#[derive(Default)]
pub struct MockDriver {
    failures: Mutex<HashMap<&'static str, DriverError>>,
    screenshot_failure: Mutex<Option<DriverError>>,
    elements: Mutex<HashMap<String, FakeElement>>,
    calls: Mutex<Vec<&'static str>>,
    screenshots: Mutex<Vec<PathBuf>>,
    timeouts: Mutex<Vec<Option<u64>>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make primitive `call` fail with `message`
    pub fn fail(&self, call: &'static str, message: &str) {
        self.failures.lock().insert(call, DriverError(message.to_string()));
    }

    /// Make every screenshot fail with `message`
    pub fn fail_screenshots(&self, message: &str) {
        *self.screenshot_failure.lock() = Some(DriverError(message.to_string()));
    }

    /// Element returned by `locate_by_role` for an accessible name
    pub fn register(&self, name: &str, element: FakeElement) {
        self.elements.lock().insert(name.to_string(), element);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    /// Screenshot attempts, including failed ones
    pub fn screenshot_attempts(&self) -> Vec<PathBuf> {
        self.screenshots.lock().clone()
    }

    /// Timeouts seen by navigation and wait primitives
    pub fn timeouts(&self) -> Vec<Option<u64>> {
        self.timeouts.lock().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), DriverError> {
        self.calls.lock().push(call);
        match self.failures.lock().get(call) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Handle = FakeElement;
    type Response = u16;
    type Error = DriverError;

    async fn navigate(&self, _url: &str, options: &NavigateOptions) -> Result<u16, DriverError> {
        self.timeouts.lock().push(options.timeout_ms);
        self.record("navigate")?;
        Ok(200)
    }

    async fn locate_by_role(&self, role: &str, options: &RoleOptions) -> Result<FakeElement, DriverError> {
        self.record("locate_by_role")?;
        let name = options.name.clone().unwrap_or_default();
        let registered = self.elements.lock().get(&name).cloned();
        Ok(registered.unwrap_or_else(|| {
            FakeElement::with_attributes(AttributeSet {
                role: Some(role.to_string()),
                name: options.name.clone(),
                ..Default::default()
            })
        }))
    }

    async fn click(&self, _target: &Target<FakeElement>) -> Result<(), DriverError> {
        self.record("click")
    }

    async fn fill(
        &self,
        _target: &Target<FakeElement>,
        _value: &str,
        _options: &FillOptions,
    ) -> Result<(), DriverError> {
        self.record("fill")
    }

    async fn read_text(&self, target: &Target<FakeElement>) -> Result<String, DriverError> {
        self.record("read_text")?;
        Ok(match target {
            Target::Handle(element) => element.text.clone().unwrap_or_default(),
            Target::Selector(_) => "Welcome".to_string(),
        })
    }

    async fn wait_for_element(
        &self,
        _selector: &str,
        options: &WaitOptions,
    ) -> Result<Option<FakeElement>, DriverError> {
        self.timeouts.lock().push(options.timeout_ms);
        self.record("wait_for_element")?;
        Ok(Some(FakeElement::default()))
    }

    async fn wait_for_load_state(&self, _state: LoadState, options: &WaitOptions) -> Result<(), DriverError> {
        self.timeouts.lock().push(options.timeout_ms);
        self.record("wait_for_load_state")
    }

    async fn evaluate(&self, _script: &str, arg: Option<&Value>) -> Result<Value, DriverError> {
        self.record("evaluate")?;
        Ok(arg.cloned().unwrap_or(Value::Null))
    }

    async fn capture_screenshot(&self, path: &Path, _options: &ScreenshotOptions) -> Result<(), DriverError> {
        self.calls.lock().push("capture_screenshot");
        self.screenshots.lock().push(path.to_path_buf());

        if let Some(error) = self.screenshot_failure.lock().clone() {
            return Err(error);
        }
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| DriverError(e.to_string()))?;
        }
        std::fs::write(path, b"\x89PNG").map_err(|e| DriverError(e.to_string()))
    }
}

/// Settings rooted in `dir` with the console sink off
pub fn settings(dir: &Path, log: LogConfig) -> Settings {
    Settings {
        log: LogConfig { console: false, ..log },
        log_dir: dir.join("logs"),
        screenshot: ScreenshotConfig {
            dir: dir.join("screenshots"),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn page(dir: &Path, settings: Settings) -> InstrumentedPage<MockDriver> {
    let logger = Arc::new(Logger::new("mock", dir.join("logs"), settings.log));
    InstrumentedPage::new(MockDriver::new(), logger, settings)
}

/// Everything written to the page's session log so far
pub fn session_log(page: &InstrumentedPage<MockDriver>) -> String {
    std::fs::read_to_string(page.logger().session_path()).unwrap_or_default()
}

/// Route the crate's own `tracing` diagnostics to the test output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
