//! Prompt identities.
//!
//! Every queue owns one [`IdGenerator`]. Identities are the decimal form of
//! a counter that is bumped before each read, so the first id is `"1"` and
//! no value is ever handed out twice by the same generator.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identity of a single prompt within its queue.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PromptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Monotonic source of [`PromptId`]s.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identity.
    pub fn next_id(&self) -> PromptId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        PromptId(n.to_string())
    }
}
