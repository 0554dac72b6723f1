//! Failure outcomes of a prompt.

use thiserror::Error;

/// Why a prompt's future was rejected instead of answered.
///
/// Cancellation is not an error: a cancelled prompt resolves to `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// The rendering code explicitly failed the prompt.
    #[error("prompt rejected: {0}")]
    Rejected(String),
    /// The prompt was dropped while still pending (its queue went away).
    #[error("prompt abandoned before it was answered")]
    Abandoned,
}

impl PromptError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}
