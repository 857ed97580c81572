//! Draw functions for the app's panes.
//!
//! Every function renders from scratch into its `Rect` each frame; there
//! is no retained widget state or diffing.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::types::{Filter, TodoItem};

// ── Character sets ────────────────────────────────────────────────────────────

fn checkbox(completed: bool, ascii: bool) -> &'static str {
    match (completed, ascii) {
        (true, true) => "[x] ",
        (false, true) => "[ ] ",
        (true, false) => "☑ ",
        (false, false) => "☐ ",
    }
}

fn selector(ascii: bool) -> &'static str {
    if ascii { "> " } else { "❯ " }
}

fn sep(ascii: bool) -> &'static str {
    if ascii { "|" } else { "│" }
}

fn border_type(ascii: bool) -> BorderType {
    if ascii {
        BorderType::Plain
    } else {
        BorderType::Rounded
    }
}

fn pane_block(title: &'static str, focused: bool, ascii: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::LightCyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(border_type(ascii))
        .border_style(border_style)
        .title(title)
}

// ── Draw functions ────────────────────────────────────────────────────────────

/// Draw the new-todo input field, placing the terminal cursor when focused.
pub fn draw_input(
    frame: &mut Frame,
    area: Rect,
    buffer: &str,
    cursor: usize,
    focused: bool,
    ascii: bool,
) {
    let block = pane_block("New todo", focused, ascii);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = if buffer.is_empty() && !focused {
        Line::from(Span::styled(
            "What needs to be done?",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::raw(buffer.to_owned()))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if focused {
        let prefix: String = buffer.chars().take(cursor).collect();
        let offset = u16::try_from(prefix.width()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(offset).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

/// Draw the todo list pane.
///
/// `selected` indexes into `todos` (the already-filtered view). The list
/// scrolls just enough to keep the selection visible.
pub fn draw_list(
    frame: &mut Frame,
    area: Rect,
    todos: &[TodoItem],
    selected: usize,
    focused: bool,
    ascii: bool,
) {
    let block = pane_block("Todos", focused, ascii);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if todos.is_empty() {
        let hint = Paragraph::new(Span::styled(
            "nothing here, press i and type to add a todo",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(hint, inner);
        return;
    }

    let height = usize::from(inner.height);
    let scroll = selected.saturating_sub(height.saturating_sub(1));

    let rows: Vec<Line<'static>> = todos
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
        .map(|(i, todo)| {
            let is_selected = i == selected;
            let marker = if is_selected { selector(ascii) } else { "  " };

            let mut text_style = Style::default();
            if todo.completed {
                text_style = text_style
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT);
            }

            let mut line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::LightCyan)),
                Span::raw(checkbox(todo.completed, ascii)),
                Span::styled(todo.text.clone(), text_style),
            ]);
            if is_selected && focused {
                line = line.style(Style::default().add_modifier(Modifier::BOLD));
            }
            line
        })
        .collect();

    frame.render_widget(Paragraph::new(rows), inner);
}

/// Draw the filter tab bar; the current filter is the marked entry, all
/// others are cleared.
pub fn draw_tabs(frame: &mut Frame, area: Rect, current: Filter, ascii: bool) {
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, filter) in Filter::ORDER.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(sep(ascii), Style::default().fg(Color::DarkGray)));
        }
        let style = if filter == current {
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", filter.as_str()), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status line: the items-left counter plus key hints.
pub fn draw_status(frame: &mut Frame, area: Rect, active_count: usize, ascii: bool) {
    let noun = if active_count == 1 { "item" } else { "items" };
    let separator = sep(ascii);

    let line = Line::from(vec![
        Span::styled(
            format!(" {active_count} {noun} left "),
            Style::default().fg(Color::White),
        ),
        Span::styled(separator, Style::default().fg(Color::DarkGray)),
        Span::styled(
            "  i:new  space:toggle  a:all-done  x:clear  1/2/3:filter  q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_glyphs() {
        assert_eq!(checkbox(true, true), "[x] ");
        assert_eq!(checkbox(false, true), "[ ] ");
        assert_ne!(checkbox(true, false), checkbox(false, false));
    }
}
