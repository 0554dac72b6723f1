//! Queue state and the pure transition function over it.

use std::fmt;
use std::sync::Arc;

use crate::id::PromptId;
use crate::prompt::Prompt;

/// The pending prompts, most recently requested first.
pub struct State<P, V> {
    render_stack: Vec<Arc<Prompt<P, V>>>,
}

impl<P, V> State<P, V> {
    pub fn new() -> Self {
        Self {
            render_stack: Vec::new(),
        }
    }

    pub fn render_stack(&self) -> &[Arc<Prompt<P, V>>] {
        &self.render_stack
    }

    pub fn len(&self) -> usize {
        self.render_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.render_stack.is_empty()
    }

    /// The most recently requested prompt.
    pub fn front(&self) -> Option<&Arc<Prompt<P, V>>> {
        self.render_stack.first()
    }

    pub fn get(&self, id: &PromptId) -> Option<&Arc<Prompt<P, V>>> {
        self.render_stack.iter().find(|p| p.id() == id)
    }

    pub fn contains(&self, id: &PromptId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<PromptId> {
        self.render_stack.iter().map(|p| p.id().clone()).collect()
    }
}

impl<P, V> Default for State<P, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, V> Clone for State<P, V> {
    fn clone(&self) -> Self {
        Self {
            render_stack: self.render_stack.clone(),
        }
    }
}

impl<P, V> fmt::Debug for State<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("render_stack", &self.ids())
            .finish()
    }
}

/// A requested change to [`State`].
pub enum Action<P, V> {
    /// Put a new prompt at the front of the stack.
    Insert(Arc<Prompt<P, V>>),
    /// Drop every prompt with this id.
    Remove(PromptId),
}

impl<P, V> Action<P, V> {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Remove(_) => "remove",
        }
    }

    pub fn prompt_id(&self) -> &PromptId {
        match self {
            Self::Insert(prompt) => prompt.id(),
            Self::Remove(id) => id,
        }
    }
}

impl<P, V> fmt::Debug for Action<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(prompt) => f.debug_tuple("Insert").field(prompt.id()).finish(),
            Self::Remove(id) => f.debug_tuple("Remove").field(id).finish(),
        }
    }
}

/// Apply `action` to `state`, returning the next state.
///
/// Inserting a prompt that is already settled, or whose id is already
/// stacked, yields a state with the same contents; so does removing an id
/// that is not present.
pub fn reduce<P, V>(state: &State<P, V>, action: Action<P, V>) -> State<P, V> {
    match action {
        Action::Insert(prompt)
            if !prompt.future().is_pending() || state.contains(prompt.id()) =>
        {
            state.clone()
        }
        Action::Insert(prompt) => {
            let mut render_stack = Vec::with_capacity(state.render_stack.len() + 1);
            render_stack.push(prompt);
            render_stack.extend(state.render_stack.iter().cloned());
            State { render_stack }
        }
        Action::Remove(id) => State {
            render_stack: state
                .render_stack
                .iter()
                .filter(|p| *p.id() != id)
                .cloned()
                .collect(),
        },
    }
}
