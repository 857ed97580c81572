//! Domain types for the to-do list.
//!
//! The whole domain is a single aggregate: an ordered list of todo items,
//! the current view filter, and a monotonic id counter. Insertion order is
//! display order for every filtered view; filtering never reorders.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a todo item
///
/// Ids are assigned monotonically by [`TodoState`] and never reused within
/// a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw counter value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// View predicate applied at render time; never mutates stored data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every todo
    #[default]
    All,
    /// Todos with `completed == false`
    Active,
    /// Todos with `completed == true`
    Completed,
}

impl Filter {
    /// All filters in tab-bar order.
    pub const ORDER: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Lowercase name, matching the navigation link text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Whether an item with the given completion flag is visible under
    /// this filter.
    #[must_use]
    pub const fn matches(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => !completed,
            Self::Completed => completed,
        }
    }

    /// The next filter in tab-bar order, saturating at the end.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active | Self::Completed => Self::Completed,
        }
    }

    /// The previous filter in tab-bar order, saturating at the start.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Completed => Self::Active,
            Self::Active | Self::All => Self::All,
        }
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    /// Total parse: unknown strings default to `All`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Text of the todo
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
    /// When the todo was completed (if completed)
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Creates a new, not-yet-completed todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Marks the todo as completed
    pub fn complete(&mut self, completed_at: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(completed_at);
    }

    /// Flips the completion flag, stamping or clearing `completed_at`
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.completed {
            self.completed = false;
            self.completed_at = None;
        } else {
            self.complete(now);
        }
    }
}

/// State of the to-do list aggregate
///
/// Owns the ordered todo sequence, the current filter, and the id counter.
/// Created empty once at application start and owned by one store for the
/// session; there is no persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoState {
    /// All todos, in insertion order
    pub todos: Vec<TodoItem>,
    /// Current view filter
    pub filter: Filter,
    /// Next id to assign; strictly monotonic, never decreases
    next_id: u64,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    /// Creates a new empty state with `filter = All`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            filter: Filter::All,
            next_id: 1,
        }
    }

    /// Creates a new empty state with the given initial filter
    #[must_use]
    pub const fn with_filter(filter: Filter) -> Self {
        Self {
            todos: Vec::new(),
            filter,
            next_id: 1,
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// True when no todos exist
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Ordered subsequence of todos matching the filter
    pub fn todos(&self, filter: Filter) -> impl Iterator<Item = &TodoItem> {
        self.todos.iter().filter(move |t| filter.matches(t.completed))
    }

    /// Ordered subsequence matching the current filter
    pub fn visible(&self) -> impl Iterator<Item = &TodoItem> {
        self.todos(self.filter)
    }

    /// Count of todos with `completed == false`
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Count of todos with `completed == true`
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns a todo by id
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: TodoId) -> Option<&mut TodoItem> {
        self.todos.iter_mut().find(|t| t.id == id)
    }

    /// Hands out the next id. The counter only ever moves forward, so ids
    /// stay unique even after deletions.
    pub(crate) fn allocate_id(&mut self) -> TodoId {
        let id = TodoId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Actions over the to-do aggregate
///
/// Every action is a total function over any state: empty text, unknown
/// ids, and empty lists are silent no-ops, never failures.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TodoAction {
    /// Append a new todo; text is trimmed, empty text is ignored
    Add {
        /// Raw text as typed
        text: String,
    },
    /// Flip the completed flag of one todo; unknown ids are ignored
    Toggle {
        /// Todo to toggle
        id: TodoId,
    },
    /// Set `completed = true` on every todo
    MarkAllCompleted,
    /// Remove every completed todo, keeping the rest in order
    ClearCompleted,
    /// Replace the current view filter
    SetFilter {
        /// Filter to switch to
        filter: Filter,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parse_is_total() {
        assert_eq!("active".parse::<Filter>(), Ok(Filter::Active));
        assert_eq!("Completed".parse::<Filter>(), Ok(Filter::Completed));
        assert_eq!("all".parse::<Filter>(), Ok(Filter::All));
        // unknown strings default to All
        assert_eq!("bogus".parse::<Filter>(), Ok(Filter::All));
        assert_eq!("".parse::<Filter>(), Ok(Filter::All));
    }

    #[test]
    fn filter_matches() {
        assert!(Filter::All.matches(true) && Filter::All.matches(false));
        assert!(Filter::Active.matches(false) && !Filter::Active.matches(true));
        assert!(Filter::Completed.matches(true) && !Filter::Completed.matches(false));
    }

    #[test]
    fn filter_tab_order_saturates() {
        assert_eq!(Filter::All.prev(), Filter::All);
        assert_eq!(Filter::All.next(), Filter::Active);
        assert_eq!(Filter::Completed.next(), Filter::Completed);
        assert_eq!(Filter::Completed.prev(), Filter::Active);
    }

    #[test]
    fn todo_item_toggle_round_trip() {
        let created = Utc::now();
        let mut item = TodoItem::new(TodoId::new(1), "Test".to_string(), created);
        assert!(!item.completed);

        let later = Utc::now();
        item.toggle(later);
        assert!(item.completed);
        assert_eq!(item.completed_at, Some(later));

        item.toggle(Utc::now());
        assert!(!item.completed);
        assert_eq!(item.completed_at, None);
    }

    #[test]
    fn state_queries_preserve_insertion_order() {
        let mut state = TodoState::new();
        for text in ["a", "b", "c"] {
            let id = state.allocate_id();
            state
                .todos
                .push(TodoItem::new(id, text.to_string(), Utc::now()));
        }
        state.todos[1].complete(Utc::now());

        let all: Vec<&str> = state.todos(Filter::All).map(|t| t.text.as_str()).collect();
        let active: Vec<&str> = state
            .todos(Filter::Active)
            .map(|t| t.text.as_str())
            .collect();
        let completed: Vec<&str> = state
            .todos(Filter::Completed)
            .map(|t| t.text.as_str())
            .collect();

        assert_eq!(all, ["a", "b", "c"]);
        assert_eq!(active, ["a", "c"]);
        assert_eq!(completed, ["b"]);
        assert_eq!(state.active_count(), 2);
        assert_eq!(state.completed_count(), 1);
    }

    #[test]
    fn allocated_ids_are_unique_after_deletion() {
        let mut state = TodoState::new();
        let first = state.allocate_id();
        state
            .todos
            .push(TodoItem::new(first, "a".to_string(), Utc::now()));
        state.todos.clear();

        let second = state.allocate_id();
        assert!(second > first);
    }
}
