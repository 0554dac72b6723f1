//! The two demo tasks. Each asks its question `rounds` times through the
//! queue and records every answer in a shared [`Transcript`].

use std::fmt;
use std::sync::{Arc, Mutex};

use prompter::{Answer, PromptError};
use prompter_tui::{Dialog, DialogQueue};
use tracing::info;

/// One answered (or cancelled) question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub task: &'static str,
    pub round: u32,
    pub answer: Answer<String>,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let answer = self.answer.as_deref().unwrap_or("cancelled");
        write!(f, "{} #{}: {answer}", self.task, self.round)
    }
}

/// Answers collected by the demo tasks, in the order they arrived.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Arc<Mutex<Vec<Entry>>>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, task: &'static str, round: u32, answer: Answer<String>) {
        info!(
            task,
            round,
            answer = answer.as_deref().unwrap_or("cancelled"),
            "prompt answered"
        );
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Entry {
                task,
                round,
                answer,
            });
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Ask a yes/no question `rounds` times.
pub async fn confirm_rounds(
    queue: DialogQueue,
    rounds: u32,
    transcript: Transcript,
) -> Result<(), PromptError> {
    for round in 1..=rounds {
        let title = format!("Continue? ({round}/{rounds})");
        let answer = queue.prompt(|done| Dialog::confirm(title, done)).await?;
        transcript.record("confirm", round, answer);
    }
    Ok(())
}

/// Ask for a line of free text `rounds` times.
pub async fn name_rounds(
    queue: DialogQueue,
    rounds: u32,
    transcript: Transcript,
) -> Result<(), PromptError> {
    for round in 1..=rounds {
        let title = format!("What is your name? ({round}/{rounds})");
        let answer = queue
            .prompt(|done| Dialog::text(title, "type a name, Enter to submit", done))
            .await?;
        transcript.record("name", round, answer);
    }
    Ok(())
}
