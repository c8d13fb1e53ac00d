//! Instrumented page operations
//!
//! Every primitive goes through the same envelope: a start record naming the
//! operation and its subject, timing, success / performance records, and on
//! failure a screenshot attempt plus an error record before the driver's
//! error is returned unchanged.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use pagelog_logging::{time, LogOverrides, Logger};
use serde_json::{json, Value};

use crate::capture::FailureCapture;
use crate::driver::{
    Driver, FillOptions, LoadState, NavigateOptions, RoleOptions, ScreenshotOptions, WaitOptions,
};
use crate::settings::Settings;
use crate::target::{truncate_text, Target};

/// Kinds of wrapped operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Navigate,
    LocateByRole,
    Click,
    Fill,
    Screenshot,
    WaitForElement,
    WaitForLoadState,
    ReadText,
    Evaluate,
}

impl Operation {
    /// Identifier used in failure artifact names
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Navigate => "navigate",
            Operation::LocateByRole => "locate_by_role",
            Operation::Click => "click",
            Operation::Fill => "fill",
            Operation::Screenshot => "screenshot",
            Operation::WaitForElement => "wait_for_element",
            Operation::WaitForLoadState => "wait_for_load_state",
            Operation::ReadText => "read_text",
            Operation::Evaluate => "evaluate",
        }
    }

    fn start_verb(&self) -> &'static str {
        match self {
            Operation::Navigate => "Navigating to page",
            Operation::LocateByRole => "Locating element by role",
            Operation::Click => "Clicking element",
            Operation::Fill => "Filling element",
            Operation::Screenshot => "Taking screenshot",
            Operation::WaitForElement => "Waiting for element",
            Operation::WaitForLoadState => "Waiting for load state",
            Operation::ReadText => "Reading element text",
            Operation::Evaluate => "Evaluating script",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Operation::Navigate => "Navigation",
            Operation::LocateByRole => "Role lookup",
            Operation::Click => "Click",
            Operation::Fill => "Fill",
            Operation::Screenshot => "Screenshot",
            Operation::WaitForElement => "Element wait",
            Operation::WaitForLoadState => "Load state wait",
            Operation::ReadText => "Text read",
            Operation::Evaluate => "Script evaluation",
        }
    }

    /// Label of the performance record
    pub fn performance_label(&self) -> &'static str {
        match self {
            Operation::Navigate => "page load",
            Operation::LocateByRole => "element lookup",
            Operation::Click => "element click",
            Operation::Fill => "form fill",
            Operation::Screenshot => "screenshot",
            Operation::WaitForElement => "element wait",
            Operation::WaitForLoadState => "load state wait",
            Operation::ReadText => "text read",
            Operation::Evaluate => "script evaluation",
        }
    }
}

/// Page wrapper applying logging, timing and failure capture to every
/// driver primitive
pub struct InstrumentedPage<D: Driver> {
    driver: D,
    logger: Arc<Logger>,
    settings: Settings,
    capture: FailureCapture,
}

impl<D: Driver> InstrumentedPage<D> {
    pub fn new(driver: D, logger: Arc<Logger>, settings: Settings) -> Self {
        let capture = FailureCapture::new(settings.screenshot.clone());
        Self {
            driver,
            logger,
            settings,
            capture,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the effective configuration, including the logger's
    pub fn reconfigure(&mut self, settings: Settings) {
        self.logger.set_config(&LogOverrides::from(settings.log));
        self.capture = FailureCapture::new(settings.screenshot.clone());
        self.settings = settings;
    }

    /// Mark a logical test phase
    pub fn log_step(&self, message: impl AsRef<str>) {
        self.logger.step(message);
    }

    pub async fn goto(&self, url: &str, options: NavigateOptions) -> Result<D::Response, D::Error> {
        let options = NavigateOptions {
            timeout_ms: Some(options.timeout_ms.unwrap_or(self.settings.timeouts.page_ms)),
            ..options
        };
        let detail = format!("timeout: {}ms", options.timeout_ms.unwrap_or_default());

        self.instrument(
            Operation::Navigate,
            url,
            Some(detail),
            self.driver.navigate(url, &options),
        )
        .await
    }

    pub async fn get_by_role(&self, role: &str, options: RoleOptions) -> Result<D::Handle, D::Error> {
        let subject = match &options.name {
            Some(name) => format!("role={}[name=\"{}\"]", role, name),
            None => format!("role={}", role),
        };

        self.instrument(
            Operation::LocateByRole,
            &subject,
            None,
            self.driver.locate_by_role(role, &options),
        )
        .await
    }

    pub async fn click(&self, target: impl Into<Target<D::Handle>>) -> Result<(), D::Error> {
        let target = target.into();
        let subject = target.describe().await;

        self.instrument(Operation::Click, &subject, None, self.driver.click(&target))
            .await
    }

    pub async fn fill(
        &self,
        target: impl Into<Target<D::Handle>>,
        value: &str,
        options: FillOptions,
    ) -> Result<(), D::Error> {
        let target = target.into();
        let subject = target.describe().await;

        self.instrument(
            Operation::Fill,
            &subject,
            Some(format!("value: {}", value)),
            self.driver.fill(&target, value, &options),
        )
        .await
    }

    /// Take a screenshot and return where it was written.
    ///
    /// Without an explicit path the file is
    /// `<screenshot dir>/<name>_<timestamp>.png`.
    pub async fn screenshot(&self, options: ScreenshotOptions) -> Result<PathBuf, D::Error> {
        let path = match &options.path {
            Some(path) => path.clone(),
            None => self.settings.screenshot.dir.join(format!(
                "{}_{}.png",
                options.name.as_deref().unwrap_or("screenshot"),
                time::artifact_timestamp(Utc::now())
            )),
        };
        let subject = path.display().to_string();

        self.instrument(
            Operation::Screenshot,
            &subject,
            None,
            self.driver.capture_screenshot(&path, &options),
        )
        .await?;

        Ok(path)
    }

    pub async fn wait_for_selector(
        &self,
        selector: &str,
        options: WaitOptions,
    ) -> Result<Option<D::Handle>, D::Error> {
        let options = self.with_element_timeout(options);
        let detail = format!("timeout: {}ms", options.timeout_ms.unwrap_or_default());

        self.instrument(
            Operation::WaitForElement,
            selector,
            Some(detail),
            self.driver.wait_for_element(selector, &options),
        )
        .await
    }

    pub async fn wait_for_load_state(&self, state: LoadState, options: WaitOptions) -> Result<(), D::Error> {
        let options = self.with_element_timeout(options);
        let detail = format!("timeout: {}ms", options.timeout_ms.unwrap_or_default());

        self.instrument(
            Operation::WaitForLoadState,
            state.as_str(),
            Some(detail),
            self.driver.wait_for_load_state(state, &options),
        )
        .await
    }

    pub async fn get_text(&self, target: impl Into<Target<D::Handle>>) -> Result<String, D::Error> {
        let target = target.into();
        let subject = target.describe().await;

        self.instrument(Operation::ReadText, &subject, None, self.driver.read_text(&target))
            .await
    }

    pub async fn evaluate(&self, script: &str, arg: Option<Value>) -> Result<Value, D::Error> {
        let first_line = script.trim().lines().next().unwrap_or_default();
        let subject = truncate_text(first_line);

        self.instrument(
            Operation::Evaluate,
            &subject,
            None,
            self.driver.evaluate(script, arg.as_ref()),
        )
        .await
    }

    fn with_element_timeout(&self, options: WaitOptions) -> WaitOptions {
        WaitOptions {
            timeout_ms: Some(options.timeout_ms.unwrap_or(self.settings.timeouts.element_ms)),
            ..options
        }
    }

    async fn instrument<T, F>(
        &self,
        operation: Operation,
        subject: &str,
        detail: Option<String>,
        call: F,
    ) -> Result<T, D::Error>
    where
        F: Future<Output = Result<T, D::Error>>,
    {
        match &detail {
            Some(detail) => self
                .logger
                .info(format!("{}: {}, {}", operation.start_verb(), subject, detail)),
            None => self.logger.info(format!("{}: {}", operation.start_verb(), subject)),
        }

        let start = Instant::now();
        let result = call.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(value) => {
                self.logger.element_success(format!(
                    "{} succeeded: {} ({}ms)",
                    operation.title(),
                    subject,
                    elapsed_ms
                ));
                self.logger.performance(operation.performance_label(), elapsed_ms);
                Ok(value)
            }
            Err(error) => {
                let screenshot = self
                    .capture
                    .capture(&self.driver, &self.logger, &error, operation.name())
                    .await;

                self.logger.error_with(
                    format!(
                        "{} failed: {} after {}ms",
                        operation.title(),
                        subject,
                        elapsed_ms
                    ),
                    json!({
                        "operation": operation.name(),
                        "error": error.to_string(),
                        "elapsed_ms": elapsed_ms,
                        "screenshot": screenshot.map(|p| p.display().to_string()),
                    }),
                );
                Err(error)
            }
        }
    }
}

/// Wrap a driver with settings and a fresh session logger for `test_name`
pub fn instrument<D: Driver>(driver: D, test_name: &str, settings: Settings) -> InstrumentedPage<D> {
    let logger = Arc::new(settings.logger(test_name));
    InstrumentedPage::new(driver, logger, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_are_unique() {
        let all = [
            Operation::Navigate,
            Operation::LocateByRole,
            Operation::Click,
            Operation::Fill,
            Operation::Screenshot,
            Operation::WaitForElement,
            Operation::WaitForLoadState,
            Operation::ReadText,
            Operation::Evaluate,
        ];
        let names: std::collections::HashSet<_> = all.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), all.len());
    }
}
