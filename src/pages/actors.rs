//! Actor page: list, create and delete actors; tag them with feature types

use super::{FeatureBoard, LoadState, SelectionSet};
use crate::cache::CollectionCache;
use crate::client::CatalogApi;
use crate::config::CacheConfig;
use crate::model::{Actor, Id, NewActor, NewCategory};
use crate::selector::SelectorEffect;

#[derive(Debug, Clone)]
pub struct ActorPage {
    pub state: LoadState,
    pub actors: CollectionCache<Actor>,
    pub board: FeatureBoard,
    /// Form: actor name
    pub name: String,
    /// Form: selected feature type ids
    pub selected_types: SelectionSet,
    cache: CacheConfig,
}

impl ActorPage {
    pub fn new(cache: CacheConfig) -> Self {
        Self {
            state: LoadState::Loading,
            actors: CollectionCache::new("actors"),
            board: FeatureBoard::new(cache),
            name: String::new(),
            selected_types: SelectionSet::new(),
            cache,
        }
    }

    /// Fetch actors and features in parallel
    ///
    /// Ends `Ready` either way. If either fetch fails both collections
    /// are left empty.
    pub async fn load<A: CatalogApi>(&mut self, api: &A) {
        self.state = LoadState::Loading;
        let (actors, features) = tokio::join!(api.list_actors(), api.list_features());

        match (actors, features) {
            (Ok(actors), Ok(features)) => {
                tracing::debug!(
                    actors = actors.len(),
                    features = features.len(),
                    "Actor page loaded"
                );
                self.actors.replace(actors);
                self.board.features.replace(features);
            }
            (actors, features) => {
                for e in [actors.err(), features.err()].into_iter().flatten() {
                    tracing::error!(error = %e, "Failed to load actor page");
                }
                self.actors.clear();
                self.board.features.clear();
            }
        }
        self.state = LoadState::Ready;
    }

    /// Create an actor from the form
    ///
    /// Blank names are ignored without a request. On success the new actor
    /// goes first and the form is cleared; on failure the form is kept.
    pub async fn submit<A: CatalogApi>(&mut self, api: &A) {
        let name = self.name.trim();
        if name.is_empty() {
            return;
        }

        let new = NewActor {
            name: name.to_string(),
            feature_type_ids: self.selected_types.to_vec(),
            ..Default::default()
        };

        match api.create_actor(&new).await {
            Ok(actor) => {
                tracing::info!(actor_id = actor.id, name = %actor.name, "Actor created");
                self.actors.prepend(actor);
                self.name.clear();
                self.selected_types.clear();
                self.actors
                    .settle(self.cache.invalidation, || api.list_actors())
                    .await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to create actor"),
        }
    }

    pub async fn delete<A: CatalogApi>(&mut self, api: &A, id: Id) {
        match api.delete_actor(id).await {
            Ok(()) => {
                self.actors.remove(id);
                tracing::info!(actor_id = id, "Actor deleted");
                self.actors
                    .settle(self.cache.invalidation, || api.list_actors())
                    .await;
            }
            Err(e) => tracing::error!(actor_id = id, error = %e, "Failed to delete actor"),
        }
    }

    /// Create a category, then reload features (categories live there)
    ///
    /// Returns true when the server accepted it.
    pub async fn create_category<A: CatalogApi>(&mut self, api: &A, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        let new = NewCategory {
            name: name.to_string(),
        };
        match api.create_category(&new).await {
            Ok(category) => {
                tracing::info!(category_id = category.id, name = %category.name, "Category created");
                self.board.refresh(api).await;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create category");
                false
            }
        }
    }

    /// Execute an effect from the selector widget
    pub async fn apply<A: CatalogApi>(&mut self, api: &A, effect: SelectorEffect) {
        self.board
            .apply(api, effect, &mut self.selected_types)
            .await;
    }
}
