//! Key handling. Answers go straight to the focused dialog's `Done` handle.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::app::{App, InputMode};
use crate::dialog::Dialog;
use crate::render::truncate_str;

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App, focused: Option<&Dialog>) {
    // Ctrl+C always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match (app.input_mode, focused) {
        (InputMode::Choose, Some(dialog)) => handle_choose_key(key, app, dialog),
        (InputMode::Type, Some(dialog)) => handle_type_key(key, app, dialog),
        _ => handle_normal_key(key, app),
    }
}

fn handle_normal_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(',') | KeyCode::Tab => app.show_logs = !app.show_logs,
        KeyCode::Up | KeyCode::Char('k') => scroll_log(app, 3),
        KeyCode::Down | KeyCode::Char('j') => scroll_log(app, -3),
        KeyCode::PageUp => scroll_log(app, 20),
        KeyCode::PageDown => scroll_log(app, -20),
        KeyCode::End => app.log_scroll = 0, // follow tail
        _ => {}
    }
}

fn scroll_log(app: &mut App, delta: isize) {
    app.log_scroll = app.log_scroll.saturating_add_signed(delta);
}

fn handle_choose_key(key: KeyEvent, app: &mut App, dialog: &Dialog) {
    let choice_count = dialog.choice_count();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.cursor + 1 < choice_count {
                app.cursor += 1;
            }
        }
        KeyCode::Enter => {
            let Some(choice) = dialog.choice(app.cursor).map(str::to_string) else {
                return;
            };
            debug!(prompt = %dialog.id(), %choice, "choice selected");
            dialog.done.done(choice.clone());
            app.release(format!("Answered \"{}\".", truncate_str(&choice, 40)));
        }
        KeyCode::Esc => cancel(app, dialog),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(',') | KeyCode::Tab => app.show_logs = !app.show_logs,
        _ => {}
    }
}

fn handle_type_key(key: KeyEvent, app: &mut App, dialog: &Dialog) {
    match key.code {
        KeyCode::Enter => {
            let text = app.input_buffer.trim().to_string();
            if text.is_empty() {
                return;
            }
            debug!(prompt = %dialog.id(), chars = text.chars().count(), "text submitted");
            dialog.done.done(text);
            app.release("Submitted.");
        }
        KeyCode::Esc => cancel(app, dialog),
        KeyCode::Backspace => {
            app.input_buffer.pop();
        }
        KeyCode::Char(c) => app.input_buffer.push(c),
        // Navigation keys still scroll the log while typing.
        KeyCode::Up => scroll_log(app, 3),
        KeyCode::Down => scroll_log(app, -3),
        KeyCode::Tab => app.show_logs = !app.show_logs,
        _ => {}
    }
}

fn cancel(app: &mut App, dialog: &Dialog) {
    debug!(prompt = %dialog.id(), "dialog cancelled");
    dialog.done.cancel();
    app.release("Cancelled.");
}
