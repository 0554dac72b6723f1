//! Read-only selection of which pending prompts a surface shows.
//!
//! | Mode | Shows |
//! |------|-------|
//! | [`DisplayMode::Top`] | only the most recent prompt |
//! | [`DisplayMode::Stack`] | every prompt, oldest first |
//! | [`DisplayMode::Reversed`] | every prompt, newest first |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prompt::Prompt;
use crate::reducer::State;

/// How a rendering surface lays out the pending prompts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Top,
    Stack,
    Reversed,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [Self::Top, Self::Stack, Self::Reversed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Stack => "stack",
            Self::Reversed => "reversed",
        }
    }

    /// The prompts to show for `state`, in display order.
    pub fn select<P, V>(self, state: &State<P, V>) -> Vec<PromptView<P, V>> {
        let stack = state.render_stack();
        match self {
            Self::Top => stack
                .first()
                .map(|prompt| PromptView {
                    prompt: prompt.clone(),
                    open: true,
                })
                .into_iter()
                .collect(),
            Self::Stack => stack.iter().rev().map(PromptView::opened).collect(),
            Self::Reversed => stack.iter().map(PromptView::opened).collect(),
        }
    }

    /// Whether a surface in this mode has anything to show.
    pub fn is_open<P, V>(self, state: &State<P, V>) -> bool {
        !state.is_empty()
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "stack" => Ok(Self::Stack),
            "reversed" => Ok(Self::Reversed),
            other => Err(format!(
                "unknown display mode '{other}' (expected top, stack, or reversed)"
            )),
        }
    }
}

/// One prompt as a surface should present it.
pub struct PromptView<P, V> {
    pub prompt: Arc<Prompt<P, V>>,
    /// Whether the surface should show its container as open.
    pub open: bool,
}

impl<P, V> PromptView<P, V> {
    fn opened(prompt: &Arc<Prompt<P, V>>) -> Self {
        Self {
            prompt: prompt.clone(),
            open: true,
        }
    }

    pub fn payload(&self) -> &P {
        self.prompt.payload()
    }

    /// Dismiss the prompt; its future resolves to `None`.
    pub fn cancel(&self) -> bool {
        self.prompt.cancel()
    }
}

impl<P, V> Clone for PromptView<P, V> {
    fn clone(&self) -> Self {
        Self {
            prompt: self.prompt.clone(),
            open: self.open,
        }
    }
}

impl<P, V> fmt::Debug for PromptView<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptView")
            .field("prompt", self.prompt.id())
            .field("open", &self.open)
            .finish()
    }
}
