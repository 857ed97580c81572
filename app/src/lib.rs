//! A terminal to-do list built on the tido reducer architecture.
//!
//! The domain is a single aggregate (`TodoState` + `TodoAction` +
//! `TodoReducer`, see [`types`] and [`reducer`]) owned by a
//! [`tido_runtime::Store`]; the TUI layer projects state snapshots into a
//! full-frame render and translates key events into store actions.
//!
//! # Quick Start
//!
//! ```no_run
//! use tido::{App, AppOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let terminal = ratatui::init();
//! let result = App::new(AppOptions::default()).run(terminal).await;
//! ratatui::restore();
//! result
//! # }
//! ```

pub mod app;
mod keys;
mod layout;
pub mod reducer;
pub mod types;
mod widgets;

// Re-export commonly used types
pub use app::{App, AppOptions, TodoStore};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{Filter, TodoAction, TodoId, TodoItem, TodoState};
