//! Reducer logic for the to-do aggregate.
//!
//! All mutations are synchronous in-place edits; no action produces
//! effects. Invalid inputs (empty text, unknown ids) are defensive no-ops
//! so the UI stays responsive.

use std::sync::Arc;

use tido_core::SmallVec;
use tido_core::effect::EffectBuf;
use tido_core::environment::{Clock, SystemClock};
use tido_core::reducer::Reducer;

use crate::types::{TodoAction, TodoItem, TodoState};

/// Environment dependencies for the to-do reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation/completion timestamps
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Production environment backed by the system clock
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

/// Reducer for the to-do aggregate
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> EffectBuf<Self::Action> {
        match action {
            TodoAction::Add { text } => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("ignoring empty todo text");
                } else {
                    let id = state.allocate_id();
                    let item = TodoItem::new(id, text.to_owned(), env.clock.now());
                    tracing::debug!(%id, "todo added");
                    state.todos.push(item);
                }
            },

            TodoAction::Toggle { id } => {
                let now = env.clock.now();
                match state.get_mut(id) {
                    Some(todo) => todo.toggle(now),
                    None => tracing::debug!(%id, "toggle for unknown todo id ignored"),
                }
            },

            TodoAction::MarkAllCompleted => {
                let now = env.clock.now();
                for todo in &mut state.todos {
                    // Already-completed items keep their original timestamp.
                    if !todo.completed {
                        todo.complete(now);
                    }
                }
            },

            TodoAction::ClearCompleted => {
                let before = state.len();
                state.todos.retain(|t| !t.completed);
                tracing::debug!(removed = before - state.len(), "completed todos cleared");
            },

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
            },
        }

        SmallVec::new()
    }
}
