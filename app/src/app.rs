//! The TUI application: full-frame render loop, focus handling, and
//! dispatch from logical commands into store actions.
//!
//! Control flow per iteration: read a fresh state snapshot, draw the
//! whole frame from it, wait for the next terminal event, map it to a
//! [`Command`], mutate the store, loop. Mutation always lands before the
//! next draw, so the screen is never ahead of the state.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tido_runtime::Store;

use crate::keys::{Command, map_key};
use crate::layout::AppLayout;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Filter, TodoAction, TodoItem, TodoState};
use crate::widgets::{draw_input, draw_list, draw_status, draw_tabs};

/// Store specialization used by the app.
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Options passed when constructing the TUI app.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppOptions {
    /// Initial view filter
    pub filter: Filter,
    /// Plain ASCII glyphs instead of unicode
    pub ascii: bool,
}

/// Which pane currently holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusPane {
    Input,
    List,
}

/// The running TUI application.
pub struct App {
    store: TodoStore,
    focus: FocusPane,
    /// Index of the selected row within the *visible* (filtered) list.
    selected: usize,
    input_buffer: String,
    /// Cursor position in the input buffer, in chars.
    input_cursor: usize,
    ascii: bool,
    should_quit: bool,
}

impl App {
    /// Build the app and its store.
    #[must_use]
    pub fn new(options: AppOptions) -> Self {
        let store = Store::new(
            TodoState::with_filter(options.filter),
            TodoReducer::new(),
            TodoEnvironment::system(),
        );
        Self {
            store,
            focus: FocusPane::Input,
            selected: 0,
            input_buffer: String::new(),
            input_cursor: 0,
            ascii: options.ascii,
            should_quit: false,
        }
    }

    /// Run the event loop until quit, then drain the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal backend fails or the store
    /// rejects an action.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        let mut events = EventStream::new();

        while !self.should_quit {
            let snapshot = self.store.state(Clone::clone).await;
            let visible: Vec<TodoItem> = snapshot.visible().cloned().collect();
            // The list can shrink under the selection after a mutation.
            self.selected = self.selected.min(visible.len().saturating_sub(1));

            terminal.draw(|frame| {
                let layout = AppLayout::compute(frame.area());
                draw_input(
                    frame,
                    layout.input,
                    &self.input_buffer,
                    self.input_cursor,
                    self.focus == FocusPane::Input,
                    self.ascii,
                );
                draw_list(
                    frame,
                    layout.list,
                    &visible,
                    self.selected,
                    self.focus == FocusPane::List,
                    self.ascii,
                );
                draw_tabs(frame, layout.tabs, snapshot.filter, self.ascii);
                draw_status(frame, layout.status, snapshot.active_count(), self.ascii);
            })?;

            let Some(event) = events.next().await else {
                break;
            };
            match event? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    let in_input = self.focus == FocusPane::Input;
                    if let Some(command) = map_key(key, in_input) {
                        self.dispatch(command, &snapshot, &visible).await?;
                    }
                },
                // Resize and the rest just trigger the next full redraw.
                _ => {},
            }
        }

        if let Err(error) = self.store.shutdown(Duration::from_secs(1)).await {
            tracing::warn!(%error, "store did not drain cleanly");
        }
        Ok(())
    }

    async fn dispatch(
        &mut self,
        command: Command,
        snapshot: &TodoState,
        visible: &[TodoItem],
    ) -> anyhow::Result<()> {
        match command {
            Command::Quit => self.should_quit = true,
            Command::FocusInput => self.focus = FocusPane::Input,
            Command::FocusList => self.focus = FocusPane::List,

            Command::InputChar(c) => {
                let at = byte_index(&self.input_buffer, self.input_cursor);
                self.input_buffer.insert(at, c);
                self.input_cursor += 1;
            },
            Command::InputBackspace => {
                if self.input_cursor > 0 {
                    self.input_cursor -= 1;
                    let at = byte_index(&self.input_buffer, self.input_cursor);
                    self.input_buffer.remove(at);
                }
            },
            Command::InputDelete => {
                if self.input_cursor < self.input_buffer.chars().count() {
                    let at = byte_index(&self.input_buffer, self.input_cursor);
                    self.input_buffer.remove(at);
                }
            },
            Command::InputMoveCursorLeft => {
                self.input_cursor = self.input_cursor.saturating_sub(1);
            },
            Command::InputMoveCursorRight => {
                self.input_cursor = (self.input_cursor + 1).min(self.input_buffer.chars().count());
            },
            Command::InputMoveLineStart => self.input_cursor = 0,
            Command::InputMoveLineEnd => self.input_cursor = self.input_buffer.chars().count(),
            Command::Submit => {
                let text = std::mem::take(&mut self.input_buffer);
                self.input_cursor = 0;
                // The reducer trims and silently drops empty text.
                self.send(TodoAction::Add { text }).await?;
            },

            Command::SelectUp => self.selected = self.selected.saturating_sub(1),
            Command::SelectDown => {
                if !visible.is_empty() {
                    self.selected = (self.selected + 1).min(visible.len() - 1);
                }
            },
            Command::SelectTop => self.selected = 0,
            Command::SelectBottom => self.selected = visible.len().saturating_sub(1),

            Command::ToggleSelected => {
                // Resolve the row through the rendered snapshot, never
                // through raw indices into the unfiltered list.
                if let Some(todo) = visible.get(self.selected) {
                    self.send(TodoAction::Toggle { id: todo.id }).await?;
                }
            },
            Command::MarkAllCompleted => self.send(TodoAction::MarkAllCompleted).await?,
            Command::ClearCompleted => self.send(TodoAction::ClearCompleted).await?,

            Command::SetFilter(filter) => self.set_filter(filter).await?,
            Command::FilterPrev => self.set_filter(snapshot.filter.prev()).await?,
            Command::FilterNext => self.set_filter(snapshot.filter.next()).await?,
        }
        Ok(())
    }

    async fn set_filter(&mut self, filter: Filter) -> anyhow::Result<()> {
        self.selected = 0;
        self.send(TodoAction::SetFilter { filter }).await
    }

    async fn send(&self, action: TodoAction) -> anyhow::Result<()> {
        self.store.send(action).await?;
        Ok(())
    }
}

/// Byte offset of the `char_idx`-th character (buffer length when past
/// the end).
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::byte_index;

    #[test]
    fn byte_index_handles_multibyte_chars() {
        let s = "döne";
        assert_eq!(byte_index(s, 0), 0);
        assert_eq!(byte_index(s, 1), 1);
        assert_eq!(byte_index(s, 2), 3); // 'ö' is two bytes
        assert_eq!(byte_index(s, 4), s.len());
        assert_eq!(byte_index(s, 99), s.len());
    }
}
