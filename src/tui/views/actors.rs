// Actors view
//
// Left: the new-actor form (name, new category) above the actor list.
// Right (or below on narrow terminals): the feature board, whose Select
// mode picks the tags for the actor being composed.

use super::{field_line, panel_title};
use crate::client::CatalogApi;
use crate::tui::app::{App, Field, Focus};
use crate::tui::components::board_panel::{self, BoardView};
use crate::tui::components::formatters::{format_created, truncate};
use crate::tui::components::tags::tag_spans;
use crate::tui::layout::page_split;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render<A: CatalogApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let (main, board_area) = page_split(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(main);

    render_form(f, chunks[0], app);
    render_list(f, chunks[1], app);

    let page = &app.actor_page;
    board_panel::render(
        f,
        board_area,
        BoardView {
            board: &page.board,
            selected: &page.selected_types,
            cursor: app.board_cursor,
            focused: app.focus == Focus::Board,
        },
        &app.theme,
    );
}

fn render_form<A: CatalogApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let page = &app.actor_page;
    let lines = vec![
        field_line(app, Field::ActorName, "Name", &page.name),
        field_line(app, Field::NewCategory, "New category", &app.category_input),
        Line::from(Span::styled(
            format!("{} tag(s) selected", page.selected_types.len()),
            app.theme.muted_style(),
        )),
    ];

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(app.focus == Focus::Form))
            .title(" New actor "),
    );
    f.render_widget(form, area);
}

fn render_list<A: CatalogApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let page = &app.actor_page;
    let features = page.board.items();
    let name_width = (area.width as usize / 3).max(8);

    let items: Vec<ListItem> = page
        .actors
        .items()
        .iter()
        .map(|actor| {
            let mut spans = vec![
                Span::raw(format!(
                    "{:<width$}",
                    truncate(&actor.name, name_width),
                    width = name_width
                )),
                Span::styled(
                    format!(" {}", format_created(&actor.created_at)),
                    app.theme.muted_style(),
                ),
            ];
            spans.extend(tag_spans(&actor.feature_types, features, &app.theme));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let focused = app.focus == Focus::List;
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(focused))
                .title(panel_title("Actors", page.state)),
        )
        .highlight_style(if focused {
            app.theme.selected_style()
        } else {
            Style::default()
        })
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !page.actors.is_empty() {
        state.select(Some(app.list_cursor.min(page.actors.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}
