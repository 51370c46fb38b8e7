// Title bar component
//
// Renders the app name, the current page and the API the front-end talks to.

use crate::pages::Route;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the title bar at the top of the screen
pub fn render(f: &mut Frame, area: Rect, route: Route, api_base: &str, theme: &Theme) {
    let title_text = match route {
        Route::Home => " 🎬 Marquee".to_string(),
        other => format!(" 🎬 Marquee ──── {}", other.title()),
    };

    let title = Paragraph::new(title_text).style(theme.title_style()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.title))
            .title_top(Line::from(format!(" {} ", api_base)).right_aligned()),
    );

    f.render_widget(title, area);
}
