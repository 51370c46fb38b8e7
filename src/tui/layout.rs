//! Responsive breakpoint system for TUI layout decisions.
//!
//! Single source of truth for width thresholds - no magic numbers scattered in render code.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 80 cols: panes stack vertically, compact hints
    Compact,
    /// 80-119 cols: side-by-side panes, logs below
    Normal,
    /// 120+ cols: logs get their own column
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=79 => Breakpoint::Compact,
            80..=119 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        *self >= min
    }
}

/// Areas of the whole screen
#[derive(Debug, Clone, Copy)]
pub struct ShellAreas {
    pub title: Rect,
    pub content: Rect,
    pub logs: Rect,
    pub status: Rect,
}

/// Title on top, status at the bottom; logs beside the content when wide,
/// below it otherwise
pub fn shell_areas(area: Rect) -> ShellAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(area);

    let body = if Breakpoint::from_width(area.width).at_least(Breakpoint::Wide) {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(rows[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(7)])
            .split(rows[1])
    };

    ShellAreas {
        title: rows[0],
        content: body[0],
        logs: body[1],
        status: rows[2],
    }
}

/// Split page content into the main column (form + list) and the board
pub fn page_split(area: Rect) -> (Rect, Rect) {
    let direction = if Breakpoint::from_width(area.width).at_least(Breakpoint::Normal) {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let parts = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    (parts[0], parts[1])
}
