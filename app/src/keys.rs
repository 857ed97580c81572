//! Key-event to command mapping.
//!
//! The dispatch table is the only place raw terminal events are
//! interpreted; everything downstream works on logical [`Command`]s, so
//! the domain is callable from any binding layer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::Filter;

/// All logical commands the TUI can perform, independent of key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Focus
    FocusInput,
    FocusList,

    // Input field editing
    InputChar(char),
    InputBackspace,
    InputDelete,
    InputMoveCursorLeft,
    InputMoveCursorRight,
    InputMoveLineStart,
    InputMoveLineEnd,
    /// Submit the input buffer as a new todo.
    Submit,

    // List navigation
    SelectUp,
    SelectDown,
    SelectTop,
    SelectBottom,

    // Mutations
    ToggleSelected,
    MarkAllCompleted,
    ClearCompleted,

    // Filter tab bar
    SetFilter(Filter),
    FilterPrev,
    FilterNext,

    // App
    Quit,
}

/// Map a raw key event to a [`Command`], depending on which pane has
/// focus.
///
/// `in_input` — true when the new-todo field holds keyboard focus; in
/// that state printable characters edit the buffer instead of triggering
/// list bindings.
#[must_use]
pub fn map_key(event: KeyEvent, in_input: bool) -> Option<Command> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    // "plain" = no modifier that would make a char a control sequence
    let plain = !ctrl && !alt;

    match event.code {
        // ── Global bindings ───────────────────────────────────────────────────
        KeyCode::Char('c') if ctrl => Some(Command::Quit),

        // ── Input field ───────────────────────────────────────────────────────
        KeyCode::Enter if in_input => Some(Command::Submit),
        KeyCode::Esc | KeyCode::Tab | KeyCode::Down if in_input => Some(Command::FocusList),
        KeyCode::Backspace if in_input => Some(Command::InputBackspace),
        KeyCode::Delete if in_input => Some(Command::InputDelete),
        KeyCode::Left if in_input => Some(Command::InputMoveCursorLeft),
        KeyCode::Right if in_input => Some(Command::InputMoveCursorRight),
        KeyCode::Home if in_input => Some(Command::InputMoveLineStart),
        KeyCode::End if in_input => Some(Command::InputMoveLineEnd),
        // Printable characters — only when no ctrl/alt modifier
        KeyCode::Char(c) if in_input && plain => Some(Command::InputChar(c)),

        // ── List pane ─────────────────────────────────────────────────────────
        _ if in_input => None,
        KeyCode::Char('q') if plain => Some(Command::Quit),
        KeyCode::Char('i') | KeyCode::Tab if plain => Some(Command::FocusInput),
        KeyCode::Up | KeyCode::Char('k') if plain => Some(Command::SelectUp),
        KeyCode::Down | KeyCode::Char('j') if plain => Some(Command::SelectDown),
        KeyCode::Char('g') if plain => Some(Command::SelectTop),
        KeyCode::Char('G') if plain => Some(Command::SelectBottom),
        KeyCode::Enter | KeyCode::Char(' ') if plain => Some(Command::ToggleSelected),
        KeyCode::Char('1') if plain => Some(Command::SetFilter(Filter::All)),
        KeyCode::Char('2') if plain => Some(Command::SetFilter(Filter::Active)),
        KeyCode::Char('3') if plain => Some(Command::SetFilter(Filter::Completed)),
        KeyCode::Left | KeyCode::Char('h') if plain => Some(Command::FilterPrev),
        KeyCode::Right | KeyCode::Char('l') if plain => Some(Command::FilterNext),
        KeyCode::Char('a') if plain => Some(Command::MarkAllCompleted),
        KeyCode::Char('x') if plain => Some(Command::ClearCompleted),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn enter_submits_only_in_input() {
        assert_eq!(map_key(key(KeyCode::Enter), true), Some(Command::Submit));
        assert_eq!(
            map_key(key(KeyCode::Enter), false),
            Some(Command::ToggleSelected)
        );
    }

    #[test]
    fn printable_chars_edit_the_buffer_in_input_focus() {
        assert_eq!(
            map_key(key(KeyCode::Char('q')), true),
            Some(Command::InputChar('q'))
        );
        assert_eq!(map_key(key(KeyCode::Char('q')), false), Some(Command::Quit));
    }

    #[test]
    fn ctrl_c_quits_from_both_panes() {
        assert_eq!(map_key(ctrl(KeyCode::Char('c')), true), Some(Command::Quit));
        assert_eq!(map_key(ctrl(KeyCode::Char('c')), false), Some(Command::Quit));
    }

    #[test]
    fn filter_bindings() {
        assert_eq!(
            map_key(key(KeyCode::Char('1')), false),
            Some(Command::SetFilter(Filter::All))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('2')), false),
            Some(Command::SetFilter(Filter::Active))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('3')), false),
            Some(Command::SetFilter(Filter::Completed))
        );
        assert_eq!(
            map_key(key(KeyCode::Right), false),
            Some(Command::FilterNext)
        );
        assert_eq!(
            map_key(key(KeyCode::Left), false),
            Some(Command::FilterPrev)
        );
    }

    #[test]
    fn modified_chars_are_ignored_in_input() {
        assert_eq!(map_key(ctrl(KeyCode::Char('z')), true), None);
    }

    #[test]
    fn tab_toggles_focus() {
        assert_eq!(map_key(key(KeyCode::Tab), true), Some(Command::FocusList));
        assert_eq!(map_key(key(KeyCode::Tab), false), Some(Command::FocusInput));
    }
}
