//! The payload this surface knows how to draw.

use prompter::{Done, PromptId};

/// What the user is asked to provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogBody {
    /// Pick one of a fixed list. The answer is the chosen label.
    Choices(Vec<String>),
    /// Type a line of text. The placeholder shows while the input is empty.
    Text { placeholder: String },
}

/// A prompt payload for the terminal surface.
///
/// Build one inside the render closure passed to
/// [`PromptQueue::prompt`](prompter::PromptQueue::prompt), handing it the
/// closure's [`Done`] handle:
///
/// ```ignore
/// let answer = queue.prompt(|done| Dialog::confirm("Overwrite file?", done));
/// ```
#[derive(Debug, Clone)]
pub struct Dialog {
    pub title: String,
    pub body: DialogBody,
    pub done: Done<String>,
}

impl Dialog {
    pub fn choices<I, S>(title: impl Into<String>, choices: I, done: Done<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            body: DialogBody::Choices(choices.into_iter().map(Into::into).collect()),
            done,
        }
    }

    /// A yes/no question answered with `"yes"` or `"no"`.
    pub fn confirm(title: impl Into<String>, done: Done<String>) -> Self {
        Self::choices(title, ["yes", "no"], done)
    }

    pub fn text(
        title: impl Into<String>,
        placeholder: impl Into<String>,
        done: Done<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: DialogBody::Text {
                placeholder: placeholder.into(),
            },
            done,
        }
    }

    pub fn id(&self) -> &PromptId {
        self.done.id()
    }

    /// Number of selectable choices (0 for text input).
    pub fn choice_count(&self) -> usize {
        match &self.body {
            DialogBody::Choices(choices) => choices.len(),
            DialogBody::Text { .. } => 0,
        }
    }

    pub fn choice(&self, index: usize) -> Option<&str> {
        match &self.body {
            DialogBody::Choices(choices) => choices.get(index).map(String::as_str),
            DialogBody::Text { .. } => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.body, DialogBody::Text { .. })
    }

    /// Rows needed to draw this dialog, borders included.
    pub(crate) fn height(&self) -> u16 {
        let rows = match &self.body {
            DialogBody::Choices(choices) => choices.len().max(1),
            DialogBody::Text { .. } => 1,
        };
        u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2)
    }
}
