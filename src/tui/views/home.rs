// Home view - menu of pages

use crate::client::CatalogApi;
use crate::pages::Route;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render<A: CatalogApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let theme = &app.theme;
    let items: Vec<ListItem> = Route::MENU
        .iter()
        .enumerate()
        .map(|(i, route)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}  ", i + 1), theme.muted_style()),
                Span::raw(route.title()),
                Span::styled(format!("  {}", route.path()), theme.muted_style()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(true))
                .title(" Catalog "),
        )
        .highlight_style(theme.selected_style())
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(app.home_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
