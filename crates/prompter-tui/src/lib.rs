//! Terminal rendering surface for [`prompter`] queues.
//!
//! Subscribes to a `PromptQueue<Dialog, String>`, draws the pending
//! dialogs (ratatui + crossterm) in the configured [`DisplayMode`], and
//! answers the focused one from the keyboard.
//!
//! # Quick start
//!
//! ```ignore
//! use prompter::PromptQueue;
//! use prompter_tui::{Dialog, TuiConfig, spawn_tui};
//!
//! let queue: PromptQueue<Dialog, String> = PromptQueue::new();
//! let handle = spawn_tui(queue.clone(), TuiConfig::default());
//!
//! let answer = queue.prompt(|done| Dialog::confirm("Ship it?", done)).await;
//! handle.join().unwrap()?;
//! ```
//!
//! # Keys
//!
//! | Key | Effect |
//! |-----|--------|
//! | Up / Down | move the choice cursor (scroll the log when idle) |
//! | typing, Backspace | edit a text dialog's input |
//! | Enter | answer the focused dialog |
//! | Esc | cancel the focused dialog (its future resolves to `None`) |
//! | `,` / Tab | toggle the log pane |
//! | `q`, Ctrl+C | quit; every still-pending prompt is cancelled |

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use prompter::ui_log::{LogBuffer, LogLine};
use prompter::{DisplayMode, PromptQueue, Subscription};
use ratatui::prelude::*;
use tracing::{debug, info};

mod app;
pub mod dialog;
mod input;
mod render;

pub use dialog::{Dialog, DialogBody};
pub use render::{log_level_style, truncate_str};

use app::App;
use input::handle_key_event;
use render::{RenderSnapshot, render};

/// The queue type this surface draws.
pub type DialogQueue = PromptQueue<Dialog, String>;

/// Configuration for the TUI.
pub struct TuiConfig {
    /// Title shown in the header bar.
    pub title: String,
    /// Which pending prompts are drawn, and in what order.
    pub display_mode: DisplayMode,
    /// Optional log buffer from [`prompter::ui_log::UiTracingLayer`].
    ///
    /// When set, the TUI drains pending lines once per tick and can show
    /// them in the log pane.
    pub log_buffer: Option<LogBuffer>,
    /// Whether the log pane starts visible.
    pub show_logs: bool,
    /// How long to wait for a key before checking the queue again.
    pub tick: Duration,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            title: "Prompts".to_string(),
            display_mode: DisplayMode::Top,
            log_buffer: None,
            show_logs: false,
            tick: Duration::from_millis(100),
        }
    }
}

/// Spawn the TUI on a dedicated OS thread.
///
/// The thread yields whatever [`run_tui`] returned.
pub fn spawn_tui(queue: DialogQueue, config: TuiConfig) -> JoinHandle<io::Result<()>> {
    std::thread::spawn(move || run_tui(queue, &config))
}

/// Run the TUI event loop (blocking). Call this from a dedicated OS thread.
///
/// Returns when the user quits or a terminal operation fails. Either way,
/// prompts still pending at that point are cancelled so no caller waits on
/// a surface that is gone.
pub fn run_tui(queue: DialogQueue, config: &TuiConfig) -> io::Result<()> {
    let (subscription, dirty) = watch(&queue);
    let result = run_terminal(&queue, config, &dirty);
    close(&queue, subscription);
    result
}

fn run_terminal(queue: &DialogQueue, config: &TuiConfig, dirty: &AtomicBool) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
        let _ = disable_raw_mode();
        return Err(e);
    }

    let result = Terminal::new(CrosstermBackend::new(stdout)).and_then(|mut terminal| {
        let result = event_loop(&mut terminal, queue, config, dirty);
        result.and(terminal.show_cursor())
    });

    // Restore the terminal even if the loop failed; the first error wins.
    let restore = disable_raw_mode()
        .and_then(|()| execute!(io::stdout(), LeaveAlternateScreen, cursor::Show));
    result.and(restore)
}

/// Stop watching `queue` and cancel whatever is still pending.
fn close(queue: &DialogQueue, subscription: Subscription<Dialog, String>) -> usize {
    subscription.unsubscribe();
    let cancelled = queue.cancel_all();
    if cancelled > 0 {
        info!(cancelled, "surface closed with prompts pending");
    }
    cancelled
}

/// Subscribe a flag that is raised on every queue change. It starts raised
/// so the first tick always draws.
fn watch(queue: &DialogQueue) -> (Subscription<Dialog, String>, Arc<AtomicBool>) {
    let dirty = Arc::new(AtomicBool::new(true));
    let flag = dirty.clone();
    let subscription = queue.subscribe(move |_| flag.store(true, Ordering::Release));
    (subscription, dirty)
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    queue: &DialogQueue,
    config: &TuiConfig,
    dirty: &AtomicBool,
) -> io::Result<()> {
    let mut app = App::new(config.show_logs);
    let mut logs: Vec<LogLine> = Vec::new();
    let mut redraw = true;

    loop {
        if app.should_quit {
            debug!("quit requested");
            return Ok(());
        }

        if let Some(ref buffer) = config.log_buffer
            && buffer.flush_into(&mut logs)
        {
            redraw |= app.show_logs;
        }

        // One queue snapshot per tick feeds focus, keys, and drawing alike.
        redraw |= dirty.swap(false, Ordering::AcqRel);
        let views = queue.view(config.display_mode);
        let focused = views.first().map(|v| v.payload());
        app.focus(focused);

        if redraw {
            let snap = RenderSnapshot {
                title: &config.title,
                mode: config.display_mode,
                pending: queue.pending_count(),
                views: &views,
                logs: &logs,
            };
            terminal.draw(|frame| render(frame, &snap, &app))?;
            redraw = false;
        }

        if event::poll(config.tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(key, &mut app, focused);
                    redraw = true;
                }
                Event::Resize(..) => redraw = true,
                _ => {}
            }
        }
    }
}
