//! Tracing capture for rendering surfaces that own the terminal.
//!
//! A surface drawing to the alternate screen cannot let `tracing` print to
//! stdout. Install [`UiTracingLayer`] instead; it appends each event at or
//! above its minimum level to a [`LogBuffer`], which the surface drains
//! once per frame. The buffer has its own mutex, so a prompt task that
//! logs never waits on the renderer.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Lines kept before the oldest are dropped.
pub const MAX_LOG_LINES: usize = 2000;
/// Lines left after a trim.
pub const LOG_TRIM_TO: usize = 1200;

/// Severity of a captured line, least severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Five-column label, padded so log panes line up.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
        }
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => Self::Trace,
            Level::DEBUG => Self::Debug,
            Level::INFO => Self::Info,
            Level::WARN => Self::Warn,
            Level::ERROR => Self::Error,
        }
    }
}

/// One captured event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub level: LogLevel,
    /// Last segment of the event's module path (`store`, `input`, ...).
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.time,
            self.level.label(),
            self.target,
            self.message
        )
    }
}

/// Drop the oldest lines once `lines` grows past [`MAX_LOG_LINES`].
pub fn trim_log(lines: &mut Vec<LogLine>) {
    if lines.len() > MAX_LOG_LINES {
        lines.drain(..lines.len() - LOG_TRIM_TO);
    }
}

/// Lines captured but not yet taken by a surface.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<LogLine>>>);

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: LogLine) {
        let mut pending = self.0.lock().unwrap_or_else(|e| e.into_inner());
        pending.push(line);
        trim_log(&mut pending);
    }

    /// Take every pending line, oldest first.
    pub fn drain(&self) -> Vec<LogLine> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Append pending lines to a surface's own history, trimming it.
    /// Returns `false` when there was nothing new.
    pub fn flush_into(&self, history: &mut Vec<LogLine>) -> bool {
        let pending = self.drain();
        if pending.is_empty() {
            return false;
        }
        history.extend(pending);
        trim_log(history);
        true
    }
}

impl fmt::Debug for LogBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.0.lock().map(|p| p.len()).unwrap_or(0);
        f.debug_struct("LogBuffer").field("pending", &pending).finish()
    }
}

/// A [`Layer`] that records events into a [`LogBuffer`].
pub struct UiTracingLayer {
    buffer: LogBuffer,
    min_level: LogLevel,
}

impl UiTracingLayer {
    /// Create the layer and the buffer it fills. Captures `DEBUG` and above.
    pub fn new() -> (Self, LogBuffer) {
        let buffer = LogBuffer::new();
        let layer = Self {
            buffer: buffer.clone(),
            min_level: LogLevel::Debug,
        };
        (layer, buffer)
    }

    /// Ignore events below `level`.
    pub fn with_min_level(mut self, level: impl Into<LogLevel>) -> Self {
        self.min_level = level.into();
        self
    }
}

impl<S> Layer<S> for UiTracingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let level = LogLevel::from(*meta.level());
        if level < self.min_level {
            return;
        }

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        self.buffer.push(LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            target: short_target(meta.target()).to_string(),
            message: fields.finish(),
        });
    }
}

fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Builds `"message {key=value, ...}"` from an event's fields.
#[derive(Default)]
struct FieldCollector {
    message: String,
    extra: Vec<String>,
}

impl FieldCollector {
    fn put(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.extra.push(format!("{}={value}", field.name()));
        }
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.extra.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.extra.join(" "),
            (false, false) => format!("{} {{{}}}", self.message, self.extra.join(", ")),
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }
}
