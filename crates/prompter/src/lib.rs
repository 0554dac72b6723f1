//! Ask the user for a value without blocking.
//!
//! `prompter` coordinates a queue of pending prompts between calling code
//! and whatever draws them. Calling code hands [`PromptQueue::prompt`] a
//! render closure; the closure receives a [`Done`] handle and returns an
//! opaque payload (a dialog description, a widget tree, anything). The
//! call returns a future right away. A rendering surface subscribed to the
//! queue shows the payload, and when the user answers it calls the handle,
//! which resolves the future and removes the prompt.
//!
//! ```text
//! caller ──prompt(render)──▶ PromptQueue ──dispatch(Insert)──▶ Store ──notify──▶ surface
//!   ▲                                                                              │
//!   └──────── future resolves ◀── Done::done(value) ◀──── user answers ◀──────────┘
//! ```
//!
//! # Getting started
//!
//! ```
//! use prompter::{DisplayMode, PromptQueue};
//!
//! #[derive(Debug)]
//! struct Question {
//!     text: &'static str,
//!     answer: prompter::Done<bool>,
//! }
//!
//! let queue: PromptQueue<Question, bool> = PromptQueue::new();
//! let reply = queue.prompt(|answer| Question { text: "Save changes?", answer });
//!
//! // The rendering side: show the top prompt and answer it.
//! let shown = queue.view(DisplayMode::Top);
//! assert_eq!(shown[0].payload().text, "Save changes?");
//! shown[0].payload().answer.done(true);
//!
//! assert_eq!(reply.peek(), Some(Ok(Some(true))));
//! assert_eq!(queue.pending_count(), 0);
//! ```
//!
//! # Where to find things
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`queue`] | [`PromptQueue`], the process-wide [`global`] queue and [`prompt`](fn@prompt) |
//! | [`prompt`](mod@prompt) | [`Prompt`] entities and the [`Done`] completion handle |
//! | [`store`] | [`Store`]: state, dispatch, and [`Subscription`]s |
//! | [`reducer`] | [`State`], [`Action`], and the pure [`reduce`] function |
//! | [`future`] | [`SettableFuture`] and its [`Completer`] |
//! | [`view`] | [`DisplayMode`] selection of what a surface shows |
//! | [`ui_log`] | tracing capture for surfaces that own the terminal |
//! | [`prelude`] | the handful of types most callers need |
//!
//! # Guarantees
//!
//! 1. Ids are unique within a queue and never reused.
//! 2. A prompt stays in the queue only while its future is pending.
//! 3. Completing a prompt twice has the same effect as completing it once.
//! 4. Subscribers run in registration order after every dispatch, may
//!    dispatch themselves, and may unsubscribe at any time.

pub mod config;
pub mod error;
pub mod future;
pub mod id;
pub mod prelude;
pub mod prompt;
pub mod queue;
pub mod reducer;
pub mod store;
pub mod ui_log;
pub mod view;

pub use config::QueueConfig;
pub use error::PromptError;
pub use future::{Completer, FutureStatus, SettableFuture, settable};
pub use id::{IdGenerator, PromptId};
pub use prompt::{Answer, Done, Prompt, PromptFuture};
pub use queue::{PromptQueue, global, prompt};
pub use reducer::{Action, State, reduce};
pub use store::{Listener, Store, SubscriberId, Subscription};
pub use view::{DisplayMode, PromptView};
