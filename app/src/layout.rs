//! Screen layout for the app: input field on top, list below, filter tab
//! bar and status line at the bottom.

use ratatui::layout::{Constraint, Layout, Rect};

/// Computed pane rectangles for one frame.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    /// New-todo input field (bordered, 3 rows)
    pub input: Rect,
    /// Todo list pane
    pub list: Rect,
    /// Filter tab bar (all / active / completed)
    pub tabs: Rect,
    /// Status line (items-left counter and key hints)
    pub status: Rect,
}

impl AppLayout {
    /// Split the frame area into the four panes.
    #[must_use]
    pub fn compute(area: Rect) -> Self {
        let [input, list, tabs, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            input,
            list,
            tabs,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panes_tile_the_frame() {
        let layout = AppLayout::compute(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.tabs.height, 1);
        assert_eq!(layout.status.height, 1);
        assert_eq!(
            layout.input.height + layout.list.height + layout.tabs.height + layout.status.height,
            24
        );
    }
}
