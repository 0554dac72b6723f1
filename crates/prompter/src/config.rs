//! Queue configuration.

use serde::{Deserialize, Serialize};

use crate::view::DisplayMode;

/// Settings for a [`PromptQueue`](crate::PromptQueue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Name attached to this queue's tracing output. Default: `"prompts"`.
    pub label: String,
    /// Layout used by [`PromptQueue::default_view`](crate::PromptQueue::default_view).
    /// Default: [`DisplayMode::Top`].
    pub display_mode: DisplayMode,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            label: "prompts".to_string(),
            display_mode: DisplayMode::Top,
        }
    }
}

impl QueueConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }
}
