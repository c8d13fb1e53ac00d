//! Screenshot capture on operation failure

use std::error::Error as StdError;
use std::path::PathBuf;

use chrono::Utc;
use pagelog_logging::{time, Logger};
use serde_json::json;
use tracing::debug;

use crate::driver::{Driver, ScreenshotOptions};
use crate::error::CaptureError;
use crate::settings::ScreenshotConfig;

/// Captures a screenshot correlated to a failing operation
#[derive(Debug, Clone)]
pub struct FailureCapture {
    config: ScreenshotConfig,
}

impl FailureCapture {
    pub fn new(config: ScreenshotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenshotConfig {
        &self.config
    }

    /// Capture a screenshot for `operation` if failure capture is enabled.
    ///
    /// Returns the stored path, or `None` when disabled or when the capture
    /// itself fails. A failed capture is logged and otherwise ignored.
    pub async fn capture<D: Driver>(
        &self,
        driver: &D,
        logger: &Logger,
        error: &(dyn StdError + Send + Sync + 'static),
        operation: &str,
    ) -> Option<PathBuf> {
        if !self.config.captures_failures() {
            return None;
        }

        debug!("Capturing failure screenshot for {}: {}", operation, error);

        match self.try_capture(driver, operation).await {
            Ok(path) => {
                logger.info(format!("Failure screenshot saved: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                logger.error_with(
                    format!("Failure screenshot for {} could not be captured", operation),
                    json!({ "error": e.to_string(), "operation_error": error.to_string() }),
                );
                None
            }
        }
    }

    /// `<dir>/<operation>_failure_<timestamp>.png`
    pub fn failure_path(&self, operation: &str) -> PathBuf {
        self.config.dir.join(format!(
            "{}_failure_{}.png",
            operation,
            time::artifact_timestamp(Utc::now())
        ))
    }

    async fn try_capture<D: Driver>(&self, driver: &D, operation: &str) -> Result<PathBuf, CaptureError> {
        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(CaptureError::Directory)?;

        let path = self.failure_path(operation);
        let options = ScreenshotOptions {
            path: Some(path.clone()),
            full_page: true,
            ..Default::default()
        };

        driver
            .capture_screenshot(&path, &options)
            .await
            .map_err(|e| CaptureError::Screenshot(e.to_string()))?;

        Ok(path)
    }
}
