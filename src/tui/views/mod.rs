// Views module - screen-level rendering logic
//
// Each view fills the content slot of the shell:
// - Home: menu of pages
// - Actors: actor form, actor list, feature board
// - Movies: movie form, cast picker, movie list, feature board
//
// The shell (title bar, logs panel, status bar) is drawn around every view.

mod actors;
mod home;
mod movies;

use super::app::{App, Field, Focus};
use super::components::{status_bar, title_bar};
use super::layout::shell_areas;
use crate::client::CatalogApi;
use crate::pages::{LoadState, Route};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Block;
use ratatui::Frame;

/// Main UI render function - called on every frame
pub fn draw<A: CatalogApi>(f: &mut Frame, app: &App<A>) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.bg));
    f.render_widget(bg_block, f.area());

    let shell = shell_areas(f.area());

    title_bar::render(f, shell.title, app.route, &app.api_base, &app.theme);

    match app.route {
        Route::Home => home::render(f, shell.content, app),
        Route::Actors => actors::render(f, shell.content, app),
        Route::Movies => movies::render(f, shell.content, app),
    }

    app.logs_panel
        .render(f, shell.logs, &app.log_buffer, &app.theme);
    status_bar::render(f, shell.status, &app.status_context(), &app.theme);
}

/// One labelled input line of a form, with a caret when it has the keys
fn field_line<'a, A>(app: &App<A>, field: Field, label: &'a str, value: &'a str) -> Line<'a> {
    let active = app.focus == Focus::Form && app.field == field;
    let label_style = if active {
        app.theme.title_style()
    } else {
        app.theme.muted_style()
    };
    let mut spans = vec![
        Span::styled(format!("{:<14}", label), label_style),
        Span::styled(value, Style::default().fg(app.theme.fg)),
    ];
    if active {
        spans.push(Span::styled("▏", Style::default().fg(app.theme.border_focused)));
    }
    Line::from(spans)
}

/// Block title, marked while the page is still loading
fn panel_title(name: &str, state: LoadState) -> String {
    match state {
        LoadState::Loading => format!(" {} (loading…) ", name),
        LoadState::Ready => format!(" {} ", name),
    }
}
