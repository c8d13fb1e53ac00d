//! Operation targets and their human-readable subject descriptions

use tracing::debug;

use crate::driver::{AttributeSet, AttributeSource};
use crate::error::DescriptionError;

/// Longest text kept in a text-based description, before the ellipsis
pub const MAX_TEXT_CHARS: usize = 20;

/// Label used when a handle cannot be described
pub const HANDLE_LABEL: &str = "handle object";

/// Element targeted by an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<H> {
    /// Selector string, used verbatim in logs
    Selector(String),
    /// Opaque driver handle
    Handle(H),
}

impl<H> From<&str> for Target<H> {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl<H> From<String> for Target<H> {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl<H: AttributeSource + Sync> Target<H> {
    /// Describe the target for log output. Never fails: probe errors
    /// degrade to [`HANDLE_LABEL`].
    pub async fn describe(&self) -> String {
        match self {
            Target::Selector(selector) => selector.clone(),
            Target::Handle(handle) => describe_handle(handle).await.unwrap_or_else(|e| {
                debug!("Falling back to generic handle label: {}", e);
                HANDLE_LABEL.to_string()
            }),
        }
    }
}

/// Probe a handle: text content first, then attributes in fixed order
pub async fn describe_handle<H: AttributeSource + Sync>(handle: &H) -> Result<String, DescriptionError> {
    match handle.text_content().await {
        Ok(Some(text)) if !text.trim().is_empty() => {
            return Ok(format!("\"{}\"", truncate_text(text.trim())));
        }
        Ok(_) => {}
        Err(e) => debug!("Text probe failed: {}", e),
    }

    handle
        .attributes()
        .await?
        .describe()
        .ok_or(DescriptionError::NoIdentifyingAttribute)
}

/// Cut text longer than [`MAX_TEXT_CHARS`], backing off to the last word
/// boundary when the cut lands inside a word, and mark it with `...`.
pub fn truncate_text(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_CHARS {
        return text.to_string();
    }

    let window: String = text.chars().take(MAX_TEXT_CHARS).collect();
    let cut_inside_word = text
        .chars()
        .nth(MAX_TEXT_CHARS)
        .map(|c| !c.is_whitespace())
        .unwrap_or(false);

    let boundary = window
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .last()
        .map(|(idx, c)| idx + c.len_utf8());

    let kept = match boundary {
        Some(end) if cut_inside_word => &window[..end],
        _ => window.trim_end(),
    };
    format!("{}...", kept)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl AttributeSet {
    /// Selector-like description from the first identifying attribute:
    /// placeholder, role and name, id, class, type.
    pub fn describe(&self) -> Option<String> {
        let tag = present(&self.tag).unwrap_or("element");

        if let Some(placeholder) = present(&self.placeholder) {
            return Some(format!("{}[placeholder=\"{}\"]", tag, placeholder));
        }
        if let Some(role) = present(&self.role) {
            return Some(match present(&self.name) {
                Some(name) => format!("{}[role=\"{}\"][name=\"{}\"]", tag, role, name),
                None => format!("{}[role=\"{}\"]", tag, role),
            });
        }
        if let Some(id) = present(&self.id) {
            return Some(format!("{}#{}", tag, id));
        }
        if let Some(class) = present(&self.class_name).and_then(|c| c.split_whitespace().next()) {
            return Some(format!("{}.{}", tag, class));
        }
        present(&self.input_type).map(|t| format!("{}[type=\"{}\"]", tag, t))
    }
}
