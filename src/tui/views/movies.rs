// Movies view
//
// Left: the new-movie form, the cast picker and the movie list. Right (or
// below on narrow terminals): the feature board for the movie's tags.

use super::{field_line, panel_title};
use crate::client::CatalogApi;
use crate::tui::app::{App, Field, Focus};
use crate::tui::components::board_panel::{self, BoardView};
use crate::tui::components::formatters::truncate;
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
        .constraints([
            Constraint::Length(6),
            Constraint::Percentage(35),
            Constraint::Min(3),
        ])
        .split(main);

    render_form(f, chunks[0], app);
    render_cast(f, chunks[1], app);
    render_list(f, chunks[2], app);

    let page = &app.movie_page;
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
    let page = &app.movie_page;
    let lines = vec![
        field_line(app, Field::MovieCode, "Code", &page.code),
        field_line(app, Field::MovieName, "Name", &page.name),
        Line::from(Span::styled(
            format!(
                "{} actor(s), {} tag(s) selected",
                page.selected_actors.len(),
                page.selected_types.len()
            ),
            app.theme.muted_style(),
        )),
    ];

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(app.focus == Focus::Form))
            .title(" New movie "),
    );
    f.render_widget(form, area);
}

fn render_cast<A: CatalogApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let page = &app.movie_page;
    let focused = app.focus == Focus::Cast;

    let items: Vec<ListItem> = page
        .actors
        .items()
        .iter()
        .map(|actor| {
            let mark = if page.selected_actors.contains(actor.id) {
                "[x] "
            } else {
                "[ ] "
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, app.theme.muted_style()),
                Span::raw(truncate(&actor.name, area.width.saturating_sub(10) as usize)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(focused))
                .title(" Cast "),
        )
        .highlight_style(if focused {
            app.theme.selected_style()
        } else {
            Style::default()
        })
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !page.actors.is_empty() {
        state.select(Some(app.cast_cursor.min(page.actors.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_list<A: CatalogApi>(f: &mut Frame, area: Rect, app: &App<A>) {
    let page = &app.movie_page;
    let features = page.board.items();
    let focused = app.focus == Focus::List;

    let items: Vec<ListItem> = page
        .movies
        .items()
        .iter()
        .map(|movie| {
            let cast = movie
                .actors
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let mut spans = vec![
                Span::styled(format!("{:<8}", movie.code), app.theme.title_style()),
                Span::raw(truncate(&movie.name, (area.width as usize / 3).max(8))),
            ];
            if !cast.is_empty() {
                spans.push(Span::styled(
                    format!("  ({})", truncate(&cast, 30)),
                    app.theme.muted_style(),
                ));
            }
            spans.extend(tag_spans(&movie.feature_types, features, &app.theme));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(focused))
                .title(panel_title("Movies", page.state)),
        )
        .highlight_style(if focused {
            app.theme.selected_style()
        } else {
            Style::default()
        })
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !page.movies.is_empty() {
        state.select(Some(app.list_cursor.min(page.movies.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}
