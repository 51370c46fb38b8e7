//! Movie page: list, create and delete movies with cast and feature types

use super::{FeatureBoard, LoadState, SelectionSet};
use crate::cache::CollectionCache;
use crate::client::CatalogApi;
use crate::config::CacheConfig;
use crate::model::{Actor, Id, Movie, NewMovie};
use crate::selector::SelectorEffect;

#[derive(Debug, Clone)]
pub struct MoviePage {
    pub state: LoadState,
    pub movies: CollectionCache<Movie>,
    /// Actors available for casting
    pub actors: CollectionCache<Actor>,
    pub board: FeatureBoard,
    pub code: String,
    pub name: String,
    pub selected_actors: SelectionSet,
    pub selected_types: SelectionSet,
    cache: CacheConfig,
}

impl MoviePage {
    pub fn new(cache: CacheConfig) -> Self {
        Self {
            state: LoadState::Loading,
            movies: CollectionCache::new("movies"),
            actors: CollectionCache::new("actors"),
            board: FeatureBoard::new(cache),
            code: String::new(),
            name: String::new(),
            selected_actors: SelectionSet::new(),
            selected_types: SelectionSet::new(),
            cache,
        }
    }

    /// Fetch movies, actors and features in parallel (all or nothing)
    pub async fn load<A: CatalogApi>(&mut self, api: &A) {
        self.state = LoadState::Loading;
        let (movies, actors, features) =
            tokio::join!(api.list_movies(), api.list_actors(), api.list_features());

        match (movies, actors, features) {
            (Ok(movies), Ok(actors), Ok(features)) => {
                tracing::debug!(
                    movies = movies.len(),
                    actors = actors.len(),
                    features = features.len(),
                    "Movie page loaded"
                );
                self.movies.replace(movies);
                self.actors.replace(actors);
                self.board.features.replace(features);
            }
            (movies, actors, features) => {
                let errors = [movies.err(), actors.err(), features.err()];
                for e in errors.into_iter().flatten() {
                    tracing::error!(error = %e, "Failed to load movie page");
                }
                self.movies.clear();
                self.actors.clear();
                self.board.features.clear();
            }
        }
        self.state = LoadState::Ready;
    }

    pub fn toggle_actor(&mut self, id: Id) {
        self.selected_actors.toggle(id);
    }

    /// Create a movie from the form; code and name are both required
    pub async fn submit<A: CatalogApi>(&mut self, api: &A) {
        let code = self.code.trim();
        let name = self.name.trim();
        if code.is_empty() || name.is_empty() {
            return;
        }

        let new = NewMovie {
            code: code.to_string(),
            name: name.to_string(),
            actor_ids: self.selected_actors.to_vec(),
            feature_type_ids: self.selected_types.to_vec(),
        };

        match api.create_movie(&new).await {
            Ok(movie) => {
                tracing::info!(movie_id = movie.id, code = %movie.code, "Movie created");
                self.movies.prepend(movie);
                self.clear_form();
                self.movies
                    .settle(self.cache.invalidation, || api.list_movies())
                    .await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to create movie"),
        }
    }

    fn clear_form(&mut self) {
        self.code.clear();
        self.name.clear();
        self.selected_actors.clear();
        self.selected_types.clear();
    }

    pub async fn delete<A: CatalogApi>(&mut self, api: &A, id: Id) {
        match api.delete_movie(id).await {
            Ok(()) => {
                self.movies.remove(id);
                tracing::info!(movie_id = id, "Movie deleted");
                self.movies
                    .settle(self.cache.invalidation, || api.list_movies())
                    .await;
            }
            Err(e) => tracing::error!(movie_id = id, error = %e, "Failed to delete movie"),
        }
    }

    /// Execute an effect from the selector widget
    pub async fn apply<A: CatalogApi>(&mut self, api: &A, effect: SelectorEffect) {
        self.board
            .apply(api, effect, &mut self.selected_types)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{actor, feature, movie, MockApi};
    use crate::config::Invalidation;
    use serde_json::json;

    fn api() -> MockApi {
        MockApi::new()
            .with_actors(vec![actor(1, "Ingrid"), actor(2, "Humphrey")])
            .with_features(vec![feature(5, "Genre", 1, &[(50, "Noir")])])
            .with_movies(vec![movie(9, "M-9", "Notorious")])
    }

    async fn loaded(api: &MockApi, cache: CacheConfig) -> MoviePage {
        let mut page = MoviePage::new(cache);
        page.load(api).await;
        api.clear_calls();
        page
    }

    #[tokio::test]
    async fn load_fetches_three_collections() {
        let api = api();
        let page = loaded(&api, CacheConfig::default()).await;

        assert_eq!(page.state, LoadState::Ready);
        assert_eq!(page.movies.len(), 1);
        assert_eq!(page.actors.len(), 2);
        assert_eq!(page.board.items().len(), 1);
    }

    #[tokio::test]
    async fn any_failed_fetch_empties_everything() {
        let api = api();
        api.fail("GET", "/actors");
        let page = loaded(&api, CacheConfig::default()).await;

        assert_eq!(page.state, LoadState::Ready);
        assert!(page.movies.is_empty());
        assert!(page.actors.is_empty());
        assert!(page.board.items().is_empty());
    }

    #[tokio::test]
    async fn submit_requires_code_and_name() {
        let api = api();
        let mut page = loaded(&api, CacheConfig::default()).await;

        page.name = "Casablanca".into();
        page.code = "  ".into();
        page.submit(&api).await;
        assert!(api.calls().is_empty());

        page.code = "M-10".into();
        page.name = String::new();
        page.submit(&api).await;
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn submit_posts_form_and_clears_it() {
        let api = api();
        let mut page = loaded(&api, CacheConfig::default()).await;

        page.code = " M-10 ".into();
        page.name = "Casablanca".into();
        page.toggle_actor(2);
        page.toggle_actor(1);
        page.apply(&api, SelectorEffect::ToggleType(50)).await;
        page.submit(&api).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body,
            Some(json!({
                "code": "M-10",
                "name": "Casablanca",
                "actor_ids": [1, 2],
                "feature_type_ids": [50],
            }))
        );

        assert_eq!(page.movies.items()[0].name, "Casablanca");
        assert_eq!(page.movies.items()[0].actors.len(), 2);
        assert!(page.code.is_empty() && page.name.is_empty());
        assert!(page.selected_actors.is_empty() && page.selected_types.is_empty());
    }

    #[tokio::test]
    async fn refetch_policy_reloads_movies_after_delete() {
        let api = api();
        let cache = CacheConfig {
            invalidation: Invalidation::Refetch,
            ..Default::default()
        };
        let mut page = loaded(&api, cache).await;

        page.delete(&api, 9).await;

        let calls: Vec<_> = api
            .calls()
            .into_iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect();
        assert_eq!(calls, vec!["DELETE /movies/9", "GET /movies"]);
        assert!(page.movies.is_empty());
    }
}
