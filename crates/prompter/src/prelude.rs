//! Convenience re-exports for code that asks for or renders prompts.
//!
//! ```ignore
//! use prompter::prelude::*;
//! ```
//!
//! The settable future primitives, the reducer, and the tracing capture
//! layer are left out; import those from their modules when needed.

pub use crate::{
    Answer, DisplayMode, Done, Prompt, PromptError, PromptFuture, PromptQueue, PromptView,
    QueueConfig, State, Subscription, global, prompt,
};
