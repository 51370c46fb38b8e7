// TUI module - Terminal User Interface
//
// This module drives the catalog front-end in the terminal using ratatui.
// It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks)
// - Rendering the pages
// - Handing page actions to the REST client

pub mod app;
pub mod board;
pub mod components;
pub mod layout;
pub mod theme;
pub mod views;

use crate::client::{CatalogApi, HttpClient};
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::pages::Route;
use crate::selector::DragState;
use anyhow::{Context, Result};
use app::{Action, App, Focus};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop against the configured API
/// base, and restores the terminal when done.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    let api = HttpClient::new(config.api_base.clone(), &config.client)
        .context("Failed to create API client")?;
    let mut app = App::new(api, &config, log_buffer);

    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on keyboard input and a redraw tick with `tokio::select!`. A key
/// that produces an action is followed by a redraw (so optimistic updates
/// show) and then by the request itself.
async fn run_event_loop<A: CatalogApi>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        let mut pending = None;
        tokio::select! {
            key = next_key() => {
                if let Some(key) = key {
                    pending = handle_key_event(app, key);
                }
            }
            _ = tick_interval.tick() => {}
        }

        if let Some(action) = pending {
            terminal
                .draw(|f| views::draw(f, app))
                .context("Failed to draw terminal")?;
            app.perform(action).await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn next_key() -> Option<KeyEvent> {
    if event::poll(Duration::from_millis(10)).unwrap_or(false) {
        if let Ok(Event::Key(key)) = event::read() {
            return Some(key);
        }
    }
    None
}

/// Handle keyboard input
/// Layered dispatch: Global → Page
pub fn handle_key_event<A: CatalogApi>(app: &mut App<A>, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match handle_global_keys(app, &key) {
        GlobalKey::Handled(action) => action,
        GlobalKey::PassThrough => app.handle_page_key(key),
    }
}

enum GlobalKey {
    Handled(Option<Action>),
    PassThrough,
}

/// Handle global keys
/// Global keys work the same on every page, except that typing keeps
/// letters for the input.
fn handle_global_keys<A: CatalogApi>(app: &mut App<A>, key: &KeyEvent) -> GlobalKey {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            GlobalKey::Handled(None)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') if !app.is_typing() => {
            app.should_quit = true;
            GlobalKey::Handled(None)
        }
        KeyCode::F(1) => GlobalKey::Handled(app.navigate(Route::Home)),
        KeyCode::F(2) => GlobalKey::Handled(app.navigate(Route::Actors)),
        KeyCode::F(3) => GlobalKey::Handled(app.navigate(Route::Movies)),
        KeyCode::F(4) => {
            app.logs_panel.cycle_level();
            GlobalKey::Handled(None)
        }
        KeyCode::Tab if app.route != Route::Home => GlobalKey::Handled(app.cycle_focus(true)),
        KeyCode::BackTab if app.route != Route::Home => {
            GlobalKey::Handled(app.cycle_focus(false))
        }
        KeyCode::Esc if app.route != Route::Home && !board_wants_esc(app) => {
            GlobalKey::Handled(app.navigate(Route::Home))
        }
        _ => GlobalKey::PassThrough,
    }
}

/// The board uses Esc to cancel a rename or a drag
fn board_wants_esc<A: CatalogApi>(app: &App<A>) -> bool {
    app.focus == Focus::Board
        && app.board().is_some_and(|board| {
            board.selector.editing().is_some() || board.selector.drag() != DragState::Idle
        })
}
