//! Library half of the `prompter-demo` binary.
//!
//! Two independent tasks ask the user questions through one
//! [`DialogQueue`](prompter_tui::DialogQueue): a yes/no confirmation and a
//! free-text name. Neither knows about the other or about the terminal;
//! the surface shows whatever is pending.

use std::io;
use std::thread;

pub mod config;
pub mod tasks;

pub use config::DemoConfig;
pub use tasks::{Entry, Transcript, confirm_rounds, name_rounds};

/// Describe why the terminal surface stopped, if it did not stop cleanly.
pub fn surface_failure(exit: thread::Result<io::Result<()>>) -> Option<String> {
    match exit {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("TUI failed: {e}")),
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Some(format!("TUI panicked: {reason}"))
        }
    }
}
