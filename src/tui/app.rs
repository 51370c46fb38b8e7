// TUI application state
//
// Owns the page view-models and the UI-only state around them (focus,
// cursors, the category input). Key handling is synchronous and returns
// an `Action` when a request is needed; the event loop awaits `perform`.

use super::board::{BoardCursor, BoardKey};
use super::components::logs_panel::LogsPanel;
use super::theme::Theme;
use crate::client::CatalogApi;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::model::Id;
use crate::pages::{ActorPage, FeatureBoard, MoviePage, Route};
use crate::selector::{DragState, Mode, SelectorEffect};
use crossterm::event::{KeyCode, KeyEvent};

/// Which part of a page receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Form,
    List,
    Board,
    /// Actor picker on the movie page
    Cast,
}

impl Focus {
    fn cycle(route: Route) -> &'static [Focus] {
        match route {
            Route::Home => &[Focus::Form],
            Route::Actors => &[Focus::Form, Focus::Board, Focus::List],
            Route::Movies => &[Focus::Form, Focus::Cast, Focus::Board, Focus::List],
        }
    }
}

/// Text field under edit in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ActorName,
    NewCategory,
    MovieCode,
    MovieName,
}

/// Work that needs the network
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Load(Route),
    SubmitActor,
    DeleteActor(Id),
    CreateCategory,
    SubmitMovie,
    DeleteMovie(Id),
    Effect(SelectorEffect),
    /// Leaving a page mid-rename: commit on the page left, then load `to`
    Leave {
        from: Route,
        effect: SelectorEffect,
        to: Route,
    },
}

/// What the status bar needs to pick its hints
#[derive(Debug, Clone, Copy)]
pub struct StatusContext {
    /// `None` on the home menu
    pub focus: Option<Focus>,
    pub mode: Mode,
    pub drag: DragState,
    pub renaming: bool,
}

pub struct App<A> {
    pub api: A,
    pub api_base: String,
    pub route: Route,
    pub home_cursor: usize,
    pub actor_page: ActorPage,
    pub movie_page: MoviePage,
    pub focus: Focus,
    pub field: Field,
    pub category_input: String,
    pub list_cursor: usize,
    pub cast_cursor: usize,
    pub board_cursor: BoardCursor,
    /// Feature being dragged, so the cursor can follow it after the drop
    follow: Option<Id>,
    pub log_buffer: LogBuffer,
    pub logs_panel: LogsPanel,
    pub theme: Theme,
    pub should_quit: bool,
}

impl<A: CatalogApi> App<A> {
    pub fn new(api: A, config: &Config, log_buffer: LogBuffer) -> Self {
        Self {
            api,
            api_base: config.api_base.clone(),
            route: Route::Home,
            home_cursor: 0,
            actor_page: ActorPage::new(config.cache),
            movie_page: MoviePage::new(config.cache),
            focus: Focus::Form,
            field: Field::ActorName,
            category_input: String::new(),
            list_cursor: 0,
            cast_cursor: 0,
            board_cursor: BoardCursor::default(),
            follow: None,
            log_buffer,
            logs_panel: LogsPanel::new(),
            theme: Theme::default(),
            should_quit: false,
        }
    }

    /// Switch page; visiting a page reloads it
    pub fn navigate(&mut self, route: Route) -> Option<Action> {
        tracing::debug!(path = route.path(), "Navigate");
        let from = self.route;
        let blurred = self.board_mut().and_then(|board| {
            board.selector.drag_cancel();
            board.selector.commit()
        });
        self.route = route;
        self.focus = Focus::Form;
        self.field = match route {
            Route::Movies => Field::MovieCode,
            _ => Field::ActorName,
        };
        self.list_cursor = 0;
        self.cast_cursor = 0;
        self.board_cursor = BoardCursor::default();

        match (blurred, route) {
            (Some(effect), to) => Some(Action::Leave { from, effect, to }),
            (None, Route::Home) => None,
            (None, _) => Some(Action::Load(route)),
        }
    }

    /// The feature board of the current page
    pub fn board(&self) -> Option<&FeatureBoard> {
        match self.route {
            Route::Actors => Some(&self.actor_page.board),
            Route::Movies => Some(&self.movie_page.board),
            Route::Home => None,
        }
    }

    fn board_mut(&mut self) -> Option<&mut FeatureBoard> {
        match self.route {
            Route::Actors => Some(&mut self.actor_page.board),
            Route::Movies => Some(&mut self.movie_page.board),
            Route::Home => None,
        }
    }

    /// True while keys are text input (form fields or an inline rename)
    pub fn is_typing(&self) -> bool {
        match self.route {
            Route::Home => false,
            _ => {
                self.focus == Focus::Form
                    || (self.focus == Focus::Board
                        && self
                            .board()
                            .is_some_and(|b| b.selector.editing().is_some()))
            }
        }
    }

    pub fn status_context(&self) -> StatusContext {
        let selector = self.board().map(|b| &b.selector);
        StatusContext {
            focus: (self.route != Route::Home).then_some(self.focus),
            mode: selector.map(|s| s.mode()).unwrap_or_default(),
            drag: selector.map(|s| s.drag()).unwrap_or_default(),
            renaming: selector.is_some_and(|s| s.editing().is_some()),
        }
    }

    fn list_len(&self) -> usize {
        match self.route {
            Route::Actors => self.actor_page.actors.len(),
            Route::Movies => self.movie_page.movies.len(),
            Route::Home => 0,
        }
    }

    /// Move focus forward or back, blurring any rename in progress
    pub fn cycle_focus(&mut self, forward: bool) -> Option<Action> {
        let blurred = self
            .board_mut()
            .and_then(|board| board.selector.commit())
            .map(Action::Effect);

        let cycle = Focus::cycle(self.route);
        let idx = cycle.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % cycle.len()
        } else {
            (idx + cycle.len() - 1) % cycle.len()
        };
        self.focus = cycle[next];
        blurred
    }

    /// Handle a key for the current page; global keys are handled earlier
    pub fn handle_page_key(&mut self, key: KeyEvent) -> Option<Action> {
        match (self.route, self.focus) {
            (Route::Home, _) => self.home_key(key),
            (_, Focus::Form) => self.form_key(key),
            (_, Focus::List) => self.list_key(key),
            (_, Focus::Board) => self.board_key(key),
            (_, Focus::Cast) => self.cast_key(key),
        }
    }

    fn home_key(&mut self, key: KeyEvent) -> Option<Action> {
        let entries = Route::MENU.len();
        match key.code {
            KeyCode::Up => {
                self.home_cursor = self.home_cursor.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                self.home_cursor = (self.home_cursor + 1).min(entries - 1);
                None
            }
            KeyCode::Enter => self.navigate(Route::MENU[self.home_cursor]),
            KeyCode::Char('1') => self.navigate(Route::Actors),
            KeyCode::Char('2') => self.navigate(Route::Movies),
            _ => None,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.field {
            Field::ActorName => &mut self.actor_page.name,
            Field::NewCategory => &mut self.category_input,
            Field::MovieCode => &mut self.movie_page.code,
            Field::MovieName => &mut self.movie_page.name,
        }
    }

    fn form_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    Field::ActorName => Field::NewCategory,
                    Field::NewCategory => Field::ActorName,
                    Field::MovieCode => Field::MovieName,
                    Field::MovieName => Field::MovieCode,
                };
                None
            }
            KeyCode::Enter => Some(match self.field {
                Field::ActorName => Action::SubmitActor,
                Field::NewCategory => Action::CreateCategory,
                Field::MovieCode | Field::MovieName => Action::SubmitMovie,
            }),
            KeyCode::Backspace => {
                self.field_mut().pop();
                None
            }
            KeyCode::Char(c) => {
                self.field_mut().push(c);
                None
            }
            _ => None,
        }
    }

    fn list_key(&mut self, key: KeyEvent) -> Option<Action> {
        let len = self.list_len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_cursor = self.list_cursor.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.list_cursor = (self.list_cursor + 1).min(len - 1);
                }
                None
            }
            KeyCode::Delete | KeyCode::Char('x') => match self.route {
                Route::Actors => self
                    .actor_page
                    .actors
                    .items()
                    .get(self.list_cursor)
                    .map(|a| Action::DeleteActor(a.id)),
                Route::Movies => self
                    .movie_page
                    .movies
                    .items()
                    .get(self.list_cursor)
                    .map(|m| Action::DeleteMovie(m.id)),
                Route::Home => None,
            },
            _ => None,
        }
    }

    fn cast_key(&mut self, key: KeyEvent) -> Option<Action> {
        let len = self.movie_page.actors.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cast_cursor = self.cast_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.cast_cursor = (self.cast_cursor + 1).min(len - 1);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let id = self
                    .movie_page
                    .actors
                    .items()
                    .get(self.cast_cursor)
                    .map(|a| a.id);
                if let Some(id) = id {
                    self.movie_page.toggle_actor(id);
                }
            }
            _ => {}
        }
        None
    }

    fn board_key(&mut self, key: KeyEvent) -> Option<Action> {
        let mut cursor = self.board_cursor;
        let board = self.board_mut()?;
        let dragged = board.selector.drag().source();
        let result = cursor.handle_key(&mut board.selector, board.features.items(), key);

        // Show the new order right away; `perform` persists it
        if let BoardKey::Handled(Some(SelectorEffect::Reorder { features, .. })) = &result {
            board.features.replace(features.clone());
            self.follow = dragged;
        }
        self.board_cursor = cursor;

        match result {
            BoardKey::Handled(effect) => effect.map(Action::Effect),
            BoardKey::Ignored => None,
        }
    }

    /// Carry out an action against the API
    pub async fn perform(&mut self, action: Action) {
        match action {
            Action::Load(Route::Actors) => self.actor_page.load(&self.api).await,
            Action::Load(Route::Movies) => self.movie_page.load(&self.api).await,
            Action::Load(Route::Home) => {}
            Action::SubmitActor => self.actor_page.submit(&self.api).await,
            Action::DeleteActor(id) => {
                self.actor_page.delete(&self.api, id).await;
                self.clamp_list_cursor();
            }
            Action::CreateCategory => {
                let name = self.category_input.clone();
                if self.actor_page.create_category(&self.api, &name).await {
                    self.category_input.clear();
                }
            }
            Action::SubmitMovie => self.movie_page.submit(&self.api).await,
            Action::DeleteMovie(id) => {
                self.movie_page.delete(&self.api, id).await;
                self.clamp_list_cursor();
            }
            Action::Effect(effect) => {
                let moved = self.follow.take();
                self.apply_effect(self.route, effect).await;
                if let (Some(id), Some(board)) = (moved, self.board()) {
                    let features = board.features.items().to_vec();
                    self.board_cursor.focus_feature(&features, id);
                }
            }
            Action::Leave { from, effect, to } => {
                self.follow = None;
                self.apply_effect(from, effect).await;
                match to {
                    Route::Actors => self.actor_page.load(&self.api).await,
                    Route::Movies => self.movie_page.load(&self.api).await,
                    Route::Home => {}
                }
            }
        }
    }

    async fn apply_effect(&mut self, route: Route, effect: SelectorEffect) {
        match route {
            Route::Actors => self.actor_page.apply(&self.api, effect).await,
            Route::Movies => self.movie_page.apply(&self.api, effect).await,
            Route::Home => {}
        }
    }

    fn clamp_list_cursor(&mut self) {
        self.list_cursor = self.list_cursor.min(self.list_len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{actor, feature, MockApi};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App<MockApi> {
        let api = MockApi::new()
            .with_actors(vec![actor(1, "Ann"), actor(2, "Ben")])
            .with_features(vec![
                feature(5, "Genre", 1, &[(50, "Noir")]),
                feature(6, "Era", 2, &[]),
            ]);
        App::new(api, &Config::default(), LogBuffer::new())
    }

    async fn press(app: &mut App<MockApi>, code: KeyCode) {
        if let Some(action) = app.handle_page_key(key(code)) {
            app.perform(action).await;
        }
    }

    #[tokio::test]
    async fn home_menu_navigates_and_loads() {
        let mut app = app();
        press(&mut app, KeyCode::Down).await;
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(app.route, Route::Movies);
        assert_eq!(app.field, Field::MovieCode);
        assert_eq!(app.movie_page.actors.len(), 2);
    }

    #[tokio::test]
    async fn typing_a_name_and_enter_creates_actor() {
        let mut app = app();
        let load = app.navigate(Route::Actors).unwrap();
        app.perform(load).await;
        assert!(app.is_typing());

        for c in "Cleo".chars() {
            press(&mut app, KeyCode::Char(c)).await;
        }
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(app.actor_page.actors.items()[0].name, "Cleo");
        assert!(app.actor_page.name.is_empty());
    }

    #[tokio::test]
    async fn category_field_creates_category_and_clears_input() {
        let mut app = app();
        let load = app.navigate(Route::Actors).unwrap();
        app.perform(load).await;

        press(&mut app, KeyCode::Down).await;
        assert_eq!(app.field, Field::NewCategory);
        for c in "Lead".chars() {
            press(&mut app, KeyCode::Char(c)).await;
        }
        press(&mut app, KeyCode::Enter).await;

        assert!(app.category_input.is_empty());
        assert_eq!(app.actor_page.board.items().len(), 3);
    }

    #[tokio::test]
    async fn deleting_from_the_list() {
        let mut app = app();
        let load = app.navigate(Route::Actors).unwrap();
        app.perform(load).await;

        app.focus = Focus::List;
        press(&mut app, KeyCode::Down).await;
        press(&mut app, KeyCode::Char('x')).await;

        let ids: Vec<Id> = app.actor_page.actors.items().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(app.list_cursor, 0);
    }

    #[tokio::test]
    async fn board_toggle_selects_type_for_the_form() {
        let mut app = app();
        let load = app.navigate(Route::Actors).unwrap();
        app.perform(load).await;

        assert_eq!(app.cycle_focus(true), None);
        assert_eq!(app.focus, Focus::Board);
        assert!(!app.is_typing());

        press(&mut app, KeyCode::Down).await;
        press(&mut app, KeyCode::Char(' ')).await;
        assert!(app.actor_page.selected_types.contains(50));
    }

    #[tokio::test]
    async fn tabbing_away_commits_a_rename() {
        let mut app = app();
        let load = app.navigate(Route::Actors).unwrap();
        app.perform(load).await;
        app.focus = Focus::Board;

        press(&mut app, KeyCode::Char('e')).await;
        press(&mut app, KeyCode::Enter).await;
        assert!(app.is_typing());
        press(&mut app, KeyCode::Char('s')).await;

        let blurred = app.cycle_focus(true).unwrap();
        app.perform(blurred).await;
        assert_eq!(app.actor_page.board.items()[0].name, "Genres");
    }

    #[tokio::test]
    async fn leaving_a_page_commits_a_rename() {
        let mut app = app();
        let load = app.navigate(Route::Actors).unwrap();
        app.perform(load).await;
        app.focus = Focus::Board;

        press(&mut app, KeyCode::Char('e')).await;
        press(&mut app, KeyCode::Enter).await;
        press(&mut app, KeyCode::Char('s')).await;

        let leave = app.navigate(Route::Movies).unwrap();
        assert!(matches!(
            leave,
            Action::Leave {
                from: Route::Actors,
                to: Route::Movies,
                ..
            }
        ));
        app.perform(leave).await;

        assert_eq!(app.route, Route::Movies);
        assert!(app.actor_page.board.selector.editing().is_none());
        assert_eq!(app.actor_page.board.items()[0].name, "Genres");
        assert_eq!(app.movie_page.board.items()[0].name, "Genres");
    }

    #[tokio::test]
    async fn cursor_follows_a_dragged_feature() {
        let mut app = app();
        let load = app.navigate(Route::Movies).unwrap();
        app.perform(load).await;
        app.focus = Focus::Board;

        press(&mut app, KeyCode::Char('e')).await;
        press(&mut app, KeyCode::Char('d')).await;
        press(&mut app, KeyCode::Down).await;
        press(&mut app, KeyCode::Down).await;
        press(&mut app, KeyCode::Enter).await;

        let names: Vec<_> = app
            .movie_page
            .board
            .items()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Era", "Genre"]);
        assert_eq!(app.board_cursor.index(), 1);
    }
}
