//! TUI-local state (not shared with the queue).

use prompter::PromptId;

use crate::dialog::Dialog;

/// Input mode for the TUI, derived from the focused dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    /// Nothing to answer. Arrow keys scroll the log, `q` quits.
    Normal,
    /// A choice dialog has focus. Arrow keys move the cursor, Enter answers.
    Choose,
    /// A text dialog has focus. Keys edit the input, Enter submits.
    Type,
}

pub(crate) struct App {
    pub(crate) input_mode: InputMode,
    pub(crate) input_buffer: String,
    /// The prompt that receives key input.
    pub(crate) focused: Option<PromptId>,
    /// Highlighted choice in [`InputMode::Choose`].
    pub(crate) cursor: usize,
    /// Whether the log pane is visible (toggled with `,` or Tab).
    pub(crate) show_logs: bool,
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    /// Status message shown in the input bar until the next answer.
    pub(crate) status_message: Option<String>,
    pub(crate) should_quit: bool,
}

impl App {
    pub(crate) fn new(show_logs: bool) -> Self {
        Self {
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            focused: None,
            cursor: 0,
            show_logs,
            log_scroll: 0,
            status_message: None,
            should_quit: false,
        }
    }

    /// Move key focus to `dialog`. Input state resets only when the focused
    /// prompt actually changes.
    pub(crate) fn focus(&mut self, dialog: Option<&Dialog>) {
        let Some(dialog) = dialog else {
            self.focused = None;
            self.input_mode = InputMode::Normal;
            self.input_buffer.clear();
            return;
        };
        if self.focused.as_ref() == Some(dialog.id()) {
            return;
        }
        self.focused = Some(dialog.id().clone());
        self.cursor = 0;
        self.input_buffer.clear();
        self.input_mode = if dialog.is_text() {
            InputMode::Type
        } else {
            InputMode::Choose
        };
    }

    /// Drop focus after the focused prompt was answered or cancelled.
    pub(crate) fn release(&mut self, status: impl Into<String>) {
        self.focused = None;
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.cursor = 0;
        self.status_message = Some(status.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompter::PromptQueue;

    fn dialogs() -> (PromptQueue<Dialog, String>, Dialog, Dialog) {
        let queue = PromptQueue::new();
        let _a = queue.prompt(|done| Dialog::confirm("first", done));
        let _b = queue.prompt(|done| Dialog::text("second", "", done));
        let state = queue.state();
        let text = state.render_stack()[0].payload().clone();
        let choice = state.render_stack()[1].payload().clone();
        (queue, choice, text)
    }

    #[test]
    fn defaults() {
        let app = App::new(false);
        assert!(!app.should_quit);
        assert!(!app.show_logs);
        assert!(app.focused.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.log_scroll, 0);
    }

    #[test]
    fn focus_picks_mode_from_body() {
        let (_queue, choice, text) = dialogs();
        let mut app = App::new(false);

        app.focus(Some(&choice));
        assert_eq!(app.input_mode, InputMode::Choose);
        assert_eq!(app.focused.as_ref(), Some(choice.id()));

        app.focus(Some(&text));
        assert_eq!(app.input_mode, InputMode::Type);

        app.focus(None);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.focused.is_none());
    }

    #[test]
    fn refocusing_same_prompt_keeps_input() {
        let (_queue, _choice, text) = dialogs();
        let mut app = App::new(false);
        app.focus(Some(&text));
        app.input_buffer.push_str("half typed");

        app.focus(Some(&text));
        assert_eq!(app.input_buffer, "half typed");
    }

    #[test]
    fn release_clears_focus_and_sets_status() {
        let (_queue, choice, _text) = dialogs();
        let mut app = App::new(false);
        app.focus(Some(&choice));
        app.cursor = 1;

        app.release("Answered.");
        assert!(app.focused.is_none());
        assert_eq!(app.cursor, 0);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Answered."));
    }
}
