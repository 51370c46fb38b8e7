//! Page view-models: routing, selection sets and the feature board
//!
//! Pages own their fetched collections and form state. Every user action
//! issues at most one request through a [`CatalogApi`] and updates local
//! state on success. Failures are logged and otherwise swallowed.

mod actors;
mod movies;

pub use actors::ActorPage;
pub use movies::MoviePage;

use crate::cache::CollectionCache;
use crate::client::CatalogApi;
use crate::config::CacheConfig;
use crate::model::{Feature, Id};
use crate::selector::{FeatureSelector, SelectorEffect};
use std::collections::BTreeSet;

// ─────────────────────────────────────────────────────────────────────────────
// Routing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Actors,
    Movies,
}

impl Route {
    /// Entries of the home menu
    pub const MENU: [Route; 2] = [Route::Actors, Route::Movies];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Actors => "/actors",
            Route::Movies => "/movies",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Route::Home),
            "/actors" => Some(Route::Actors),
            "/movies" => Some(Route::Movies),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Actors => "Actors",
            Route::Movies => "Movies",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page state
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
}

/// Set of selected ids for a form (no duplicates)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<Id>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present
    pub fn toggle(&mut self, id: Id) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn contains(&self, id: Id) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn to_vec(&self) -> Vec<Id> {
        self.ids.iter().copied().collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature board: features collection + selector widget
// ─────────────────────────────────────────────────────────────────────────────

/// The features collection together with the selector that edits it
#[derive(Debug, Clone)]
pub struct FeatureBoard {
    pub features: CollectionCache<Feature>,
    pub selector: FeatureSelector,
    cache: CacheConfig,
}

impl FeatureBoard {
    pub fn new(cache: CacheConfig) -> Self {
        Self {
            features: CollectionCache::new("features"),
            selector: FeatureSelector::new(),
            cache,
        }
    }

    pub fn items(&self) -> &[Feature] {
        self.features.items()
    }

    /// Reload the features collection, leaving it untouched on failure
    pub async fn refresh<A: CatalogApi>(&mut self, api: &A) {
        match api.list_features().await {
            Ok(features) => self.features.replace(features),
            Err(e) => tracing::error!(error = %e, "Failed to refresh features"),
        }
    }

    /// Carry out a selector effect
    ///
    /// Toggles go to the page's `selection`; renames and reorders go to
    /// the server.
    pub async fn apply<A: CatalogApi>(
        &mut self,
        api: &A,
        effect: SelectorEffect,
        selection: &mut SelectionSet,
    ) {
        match effect {
            SelectorEffect::ToggleType(id) => selection.toggle(id),

            SelectorEffect::RenameFeature { id, name } => {
                match api.rename_feature(id, &name).await {
                    Ok(updated) => {
                        self.features.upsert(updated);
                        self.settle(api).await;
                    }
                    Err(e) => {
                        tracing::error!(feature_id = id, error = %e, "Failed to rename feature")
                    }
                }
            }

            SelectorEffect::RenameType { id, name } => {
                match api.rename_feature_type(id, &name).await {
                    Ok(_) => {
                        self.patch_type_name(id, &name);
                        self.settle(api).await;
                    }
                    Err(e) => {
                        tracing::error!(type_id = id, error = %e, "Failed to rename feature type")
                    }
                }
            }

            SelectorEffect::Reorder { features, previous } => {
                let ids: Vec<Id> = features.iter().map(|f| f.id).collect();
                self.features.replace(previous);
                self.features.checkpoint();
                self.features.replace(features);

                match api.reorder_features(&ids).await {
                    Ok(()) => {
                        self.features.commit();
                        self.settle(api).await;
                    }
                    Err(e) if self.cache.rollback_on_failure => {
                        self.features.rollback();
                        tracing::error!(error = %e, "Failed to reorder features, order restored");
                    }
                    Err(e) => {
                        self.features.commit();
                        tracing::error!(error = %e, "Failed to reorder features");
                    }
                }
            }
        }
    }

    fn patch_type_name(&mut self, type_id: Id, name: &str) {
        let found = self
            .features
            .items()
            .iter()
            .find(|f| f.find_type(type_id).is_some())
            .map(|f| f.id);
        let Some(feature) = found.and_then(|id| self.features.get_mut(id)) else {
            return;
        };
        if let Some(ty) = feature.types.iter_mut().find(|t| t.id == type_id) {
            ty.name = name.to_string();
        }
    }

    async fn settle<A: CatalogApi>(&mut self, api: &A) {
        self.features
            .settle(self.cache.invalidation, || api.list_features())
            .await;
    }
}
