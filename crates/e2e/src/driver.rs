//! Capabilities consumed from the browser automation driver

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DescriptionError;
use crate::target::Target;

/// Browser automation primitives.
///
/// Implemented by an adapter over the real driver. Errors are the driver's
/// own and pass through the instrumentation layer untouched.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opaque element reference
    type Handle: AttributeSource + Send + Sync;

    /// Navigation response
    type Response: Send;

    type Error: std::error::Error + Send + Sync + 'static;

    async fn navigate(&self, url: &str, options: &NavigateOptions) -> Result<Self::Response, Self::Error>;

    async fn locate_by_role(&self, role: &str, options: &RoleOptions) -> Result<Self::Handle, Self::Error>;

    async fn click(&self, target: &Target<Self::Handle>) -> Result<(), Self::Error>;

    async fn fill(
        &self,
        target: &Target<Self::Handle>,
        value: &str,
        options: &FillOptions,
    ) -> Result<(), Self::Error>;

    async fn read_text(&self, target: &Target<Self::Handle>) -> Result<String, Self::Error>;

    async fn wait_for_element(
        &self,
        selector: &str,
        options: &WaitOptions,
    ) -> Result<Option<Self::Handle>, Self::Error>;

    async fn wait_for_load_state(&self, state: LoadState, options: &WaitOptions) -> Result<(), Self::Error>;

    async fn evaluate(&self, script: &str, arg: Option<&Value>) -> Result<Value, Self::Error>;

    async fn capture_screenshot(&self, path: &Path, options: &ScreenshotOptions) -> Result<(), Self::Error>;
}

/// Read access to the identifying properties of an element handle
#[async_trait]
pub trait AttributeSource {
    /// Visible text content, if any
    async fn text_content(&self) -> Result<Option<String>, DescriptionError>;

    async fn attributes(&self) -> Result<AttributeSet, DescriptionError>;
}

/// Identifying attributes of an element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeSet {
    pub tag: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub class_name: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigateOptions {
    pub timeout_ms: Option<u64>,
    pub wait_until: Option<LoadState>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleOptions {
    /// Accessible name to match
    pub name: Option<String>,
    pub exact: bool,
}

impl RoleOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            exact: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillOptions {
    pub timeout_ms: Option<u64>,
    pub force: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitOptions {
    pub timeout_ms: Option<u64>,
    pub state: WaitState,
}

impl WaitOptions {
    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms: Some(timeout_ms),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Load,
    DomContentLoaded,
    NetworkIdle,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotOptions {
    /// Base file name for ad hoc captures; a timestamp is appended
    pub name: Option<String>,
    /// Explicit destination, used as is
    pub path: Option<PathBuf>,
    pub full_page: bool,
}
