// Status bar component
//
// Key hints for whatever currently has focus. Narrow terminals get the
// short form.

use crate::selector::{DragState, Mode};
use crate::tui::app::{Focus, StatusContext};
use crate::tui::layout::Breakpoint;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Hints shown for a context; `compact` drops the global keys
pub fn hints(ctx: &StatusContext, compact: bool) -> String {
    let local = match ctx.focus {
        None => "↑↓ move │ Enter open",
        Some(Focus::Form) => "type │ ↑↓ field │ Enter submit",
        Some(Focus::List) => "↑↓ move │ x delete",
        Some(Focus::Cast) => "↑↓ move │ Space cast",
        Some(Focus::Board) if ctx.renaming => "type │ Enter save │ Esc cancel",
        Some(Focus::Board) => match (ctx.mode, ctx.drag) {
            (Mode::Edit, DragState::Dragging { .. }) => "↑↓ target │ Enter drop │ Esc cancel",
            (Mode::Edit, _) => "↑↓ move │ Enter rename │ d drag │ e select",
            (Mode::Select, _) => "↑↓ move │ Space toggle │ e edit",
        },
    };

    if compact {
        format!(" {}", local)
    } else {
        format!(
            " {} │ Tab focus │ F1-F3 pages │ F4 log level │ Esc home │ Ctrl+C quit",
            local
        )
    }
}

/// Render the status bar with key hints
pub fn render(f: &mut Frame, area: Rect, ctx: &StatusContext, theme: &Theme) {
    let compact = !Breakpoint::from_width(area.width).at_least(Breakpoint::Normal);
    let status = Paragraph::new(hints(ctx, compact))
        .style(Style::default().fg(theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
