//! Rendering for the prompt TUI.

use prompter::ui_log::{LogLevel, LogLine};
use prompter::{DisplayMode, PromptView};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, InputMode};
use crate::dialog::{Dialog, DialogBody};

// ── Public Utilities ──────────────────────────────────────────────────

/// Truncate a string to at most `max` characters, appending "..." if
/// truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", s.get(..cut).unwrap_or(s)),
        None => s.to_string(),
    }
}

/// Map a log level to a ratatui [`Style`].
pub fn log_level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Trace => Style::default().fg(Color::DarkGray),
        LogLevel::Debug => Style::default().fg(Color::Cyan),
        LogLevel::Info => Style::default().fg(Color::Green),
        LogLevel::Warn => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

// ── Root Render ───────────────────────────────────────────────────────

/// Everything one frame needs, gathered before drawing starts.
///
/// The prompt views are `Arc` clones taken from a single queue snapshot, so
/// no queue lock is held while widgets are built.
pub(crate) struct RenderSnapshot<'a> {
    pub(crate) title: &'a str,
    pub(crate) mode: DisplayMode,
    pub(crate) pending: usize,
    pub(crate) views: &'a [PromptView<Dialog, String>],
    pub(crate) logs: &'a [LogLine],
}

pub(crate) fn render(frame: &mut Frame, snap: &RenderSnapshot<'_>, app: &App) {
    // Outer layout: [3] header | [flex] middle | [3] input bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], snap);
    render_input(frame, chunks[2], app);

    if app.show_logs {
        let mid = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_dialogs(frame, mid[0], snap.views, app);
        render_logs(frame, mid[1], snap.logs, app);
    } else {
        render_dialogs(frame, chunks[1], snap.views, app);
    }
}

// ── Header ────────────────────────────────────────────────────────────

fn render_header(frame: &mut Frame, area: Rect, snap: &RenderSnapshot<'_>) {
    let pending_style = if snap.pending > 0 {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };

    let line = Line::from(vec![
        Span::styled("Pending: ", Style::default().fg(Color::DarkGray)),
        Span::styled(snap.pending.to_string(), pending_style),
        Span::raw("   "),
        Span::styled("Mode: ", Style::default().fg(Color::DarkGray)),
        Span::styled(snap.mode.as_str(), Style::default().fg(Color::Cyan)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(format!(" {} ", snap.title));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ── Dialogs ───────────────────────────────────────────────────────────

fn render_dialogs(frame: &mut Frame, area: Rect, views: &[PromptView<Dialog, String>], app: &App) {
    if views.is_empty() {
        let idle = Paragraph::new(Line::from(Span::styled(
            "No pending prompts.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL).title(" Prompts "));
        frame.render_widget(idle, area);
        return;
    }

    // Each dialog takes the rows it needs; the rest stays blank.
    let mut constraints: Vec<Constraint> = views
        .iter()
        .map(|v| Constraint::Length(v.payload().height()))
        .collect();
    constraints.push(Constraint::Min(0));
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (view, slot) in views.iter().zip(slots.iter()) {
        if view.open {
            render_dialog(frame, *slot, view.payload(), app);
        }
    }
}

fn render_dialog(frame: &mut Frame, area: Rect, dialog: &Dialog, app: &App) {
    let focused = app.focused.as_ref() == Some(dialog.id());
    let width = area.width.saturating_sub(6) as usize;

    let lines: Vec<Line> = match &dialog.body {
        DialogBody::Choices(choices) => choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let selected = focused && i == app.cursor;
                let (marker, style) = if selected {
                    (
                        "> ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    ("  ", Style::default().fg(Color::Cyan))
                };
                Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(truncate_str(choice, width), style),
                ])
            })
            .collect(),
        DialogBody::Text { placeholder } => {
            let line = if focused && !app.input_buffer.is_empty() {
                Line::from(vec![
                    Span::raw("> "),
                    Span::raw(app.input_buffer.clone()),
                    Span::raw("\u{2588}"),
                ])
            } else {
                let cursor = if focused { "\u{2588}" } else { "" };
                Line::from(vec![
                    Span::raw("> "),
                    Span::raw(cursor),
                    Span::styled(placeholder.clone(), Style::default().fg(Color::DarkGray)),
                ])
            };
            vec![line]
        }
    };

    let border = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", truncate_str(&dialog.title, width)));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Log Pane ──────────────────────────────────────────────────────────

fn render_logs(frame: &mut Frame, area: Rect, logs: &[LogLine], app: &App) {
    let inner_height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = logs
        .iter()
        // Trace output is the per-subscriber chatter; too noisy here.
        .filter(|log| log.level != LogLevel::Trace)
        .map(|log| {
            Line::from(vec![
                Span::styled(format!("{} ", log.time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{} ", log.level.label()), log_level_style(log.level)),
                Span::styled(format!("{:<6} ", log.target), Style::default().fg(Color::Blue)),
                Span::raw(log.message.as_str()),
            ])
        })
        .collect();

    let total = lines.len();
    let scroll = total
        .saturating_sub(inner_height)
        .saturating_sub(app.log_scroll);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

// ── Input Bar ─────────────────────────────────────────────────────────

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let (hint, style) = match app.input_mode {
        InputMode::Normal => (
            "[q] quit  [,] toggle logs  [Up/Down] scroll log",
            Style::default().fg(Color::DarkGray),
        ),
        InputMode::Choose => (
            "[Up/Down] navigate  [Enter] answer  [Esc] cancel  [q] quit",
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Type => (
            "[Enter] submit  [Esc] cancel  [Ctrl+C] quit",
            Style::default().fg(Color::Green),
        ),
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {hint} "));

    let paragraph = Paragraph::new(Span::styled(status, Style::default().fg(Color::White))).block(block);
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use prompter::PromptQueue;
    use ratatui::backend::TestBackend;

    fn draw(queue: &PromptQueue<Dialog, String>, mode: DisplayMode, app: &App) -> String {
        let views = queue.view(mode);
        let snap = RenderSnapshot {
            title: "Prompts",
            mode,
            pending: queue.pending_count(),
            views: &views,
            logs: &[],
        };
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal.draw(|frame| render(frame, &snap, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn truncate_str_long() {
        assert_eq!(truncate_str("hello world", 5), "hello...");
    }

    #[test]
    fn truncate_str_respects_char_boundaries() {
        assert_eq!(truncate_str("héllo wörld", 7), "héllo w...");
        assert_eq!(truncate_str("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn log_level_style_colors() {
        assert_eq!(log_level_style(LogLevel::Info).fg, Some(Color::Green));
        assert_eq!(log_level_style(LogLevel::Warn).fg, Some(Color::Yellow));
        assert_eq!(log_level_style(LogLevel::Error).fg, Some(Color::Red));
        assert_eq!(log_level_style(LogLevel::Debug).fg, Some(Color::Cyan));
        assert_eq!(log_level_style(LogLevel::Trace).fg, Some(Color::DarkGray));
    }

    #[test]
    fn empty_queue_shows_idle_message() {
        let queue = PromptQueue::new();
        let screen = draw(&queue, DisplayMode::Top, &App::new(false));
        assert!(screen.contains("No pending prompts."));
        assert!(screen.contains("Pending: 0"));
    }

    #[test]
    fn top_mode_draws_only_newest_dialog() {
        let queue = PromptQueue::new();
        let _a = queue.prompt(|done| Dialog::confirm("Older question", done));
        let _b = queue.prompt(|done| Dialog::text("Newer question", "type here", done));

        let screen = draw(&queue, DisplayMode::Top, &App::new(false));
        assert!(screen.contains("Newer question"));
        assert!(screen.contains("type here"));
        assert!(!screen.contains("Older question"));
        assert!(screen.contains("Pending: 2"));
    }

    #[test]
    fn stack_mode_draws_oldest_first() {
        let queue = PromptQueue::new();
        let _a = queue.prompt(|done| Dialog::confirm("Older question", done));
        let _b = queue.prompt(|done| Dialog::confirm("Newer question", done));

        let screen = draw(&queue, DisplayMode::Stack, &App::new(false));
        let older = screen.find("Older question").unwrap();
        let newer = screen.find("Newer question").unwrap();
        assert!(older < newer);
        assert!(screen.contains("Mode: stack"));
    }

    #[test]
    fn focused_choice_is_marked() {
        let queue = PromptQueue::new();
        let _a = queue.prompt(|done| Dialog::choices("Pick", ["red", "green"], done));
        let mut app = App::new(false);
        app.focus(queue.state().front().map(|p| p.payload()));
        app.cursor = 1;

        let screen = draw(&queue, DisplayMode::Top, &app);
        assert!(screen.contains("> green"));
        assert!(!screen.contains("> red"));
        assert!(screen.contains("[Enter] answer"));
    }
}
