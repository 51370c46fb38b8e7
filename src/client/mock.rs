//! In-memory [`CatalogApi`] that records every call
//!
//! Used by page and selector tests to assert on the exact requests issued
//! and to inject failures for specific endpoints.

use super::{CatalogApi, ClientError, ClientResult};
use crate::model::{
    Actor, ActorRef, Category, Feature, FeatureType, Id, Movie, NewActor, NewCategory, NewFeature,
    NewFeatureType, NewMovie, Rename, ReorderFeatures, CATEGORY_FEATURE,
    CATEGORY_FEATURE_COLOR,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::future::{ready, Future};
use std::sync::{Mutex, MutexGuard};

/// Request body exactly as `HttpClient` would send it
fn wire(body: &impl Serialize) -> Value {
    serde_json::to_value(body).expect("request payloads serialize")
}

/// One recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    actors: Vec<Actor>,
    features: Vec<Feature>,
    movies: Vec<Movie>,
    next_id: Id,
    calls: Vec<Call>,
    failing: HashSet<(&'static str, String)>,
}

impl State {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn types_for(&self, ids: &[Id]) -> Vec<FeatureType> {
        self.features
            .iter()
            .flat_map(|f| f.types.iter())
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct MockApi {
    state: Mutex<State>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_actors(self, actors: Vec<Actor>) -> Self {
        self.lock().actors = actors;
        self
    }

    pub fn with_features(self, features: Vec<Feature>) -> Self {
        self.lock().features = features;
        self
    }

    pub fn with_movies(self, movies: Vec<Movie>) -> Self {
        self.lock().movies = movies;
        self
    }

    /// Make every call to `method path` answer 500
    pub fn fail(&self, method: &'static str, path: &str) {
        self.lock().failing.insert((method, path.to_string()));
    }

    pub fn recover(&self, method: &'static str, path: &str) {
        self.lock().failing.remove(&(method, path.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls other than GETs
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method != "GET")
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Server-side view of the features, for checking persisted state
    pub fn stored_features(&self) -> Vec<Feature> {
        self.lock().features.clone()
    }

    fn handle<T>(
        &self,
        method: &'static str,
        path: String,
        body: Option<Value>,
        apply: impl FnOnce(&mut State) -> ClientResult<T>,
    ) -> ClientResult<T> {
        let mut state = self.lock();
        state.calls.push(Call {
            method,
            path: path.clone(),
            body,
        });
        if state.failing.contains(&(method, path.clone())) {
            return Err(ClientError::Status {
                method,
                path,
                status: 500,
                body: r#"{"detail":"injected failure"}"#.to_string(),
            });
        }
        apply(&mut state)
    }
}

fn not_found<T>(method: &'static str, path: String) -> ClientResult<T> {
    Err(ClientError::Status {
        method,
        path,
        status: 404,
        body: String::new(),
    })
}

impl CatalogApi for MockApi {
    fn list_actors(&self) -> impl Future<Output = ClientResult<Vec<Actor>>> + Send {
        ready(self.handle("GET", "/actors".into(), None, |s| Ok(s.actors.clone())))
    }

    fn create_actor(&self, new: &NewActor) -> impl Future<Output = ClientResult<Actor>> + Send {
        let body = wire(new);
        ready(self.handle("POST", "/actors".into(), Some(body), |s| {
            let actor = Actor {
                id: s.next_id(),
                name: new.name.clone(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
                feature_types: s.types_for(&new.feature_type_ids),
            };
            s.actors.insert(0, actor.clone());
            Ok(actor)
        }))
    }

    fn delete_actor(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send {
        let path = format!("/actors/{id}");
        ready(self.handle("DELETE", path.clone(), None, |s| {
            let before = s.actors.len();
            s.actors.retain(|a| a.id != id);
            if s.actors.len() == before {
                return not_found("DELETE", path);
            }
            Ok(())
        }))
    }

    fn list_categories(&self) -> impl Future<Output = ClientResult<Vec<Category>>> + Send {
        ready(self.handle("GET", "/categories".into(), None, |s| {
            Ok(s.features
                .iter()
                .filter(|f| f.name == CATEGORY_FEATURE)
                .flat_map(|f| f.types.iter())
                .map(|t| Category {
                    id: t.id,
                    name: t.name.clone(),
                })
                .collect())
        }))
    }

    fn create_category(
        &self,
        new: &NewCategory,
    ) -> impl Future<Output = ClientResult<Category>> + Send {
        let body = wire(new);
        ready(self.handle("POST", "/categories".into(), Some(body), |s| {
            let id = s.next_id();
            let feature_idx = match s.features.iter().position(|f| f.name == CATEGORY_FEATURE) {
                Some(idx) => idx,
                None => {
                    let feature_id = s.next_id();
                    s.features.push(Feature {
                        id: feature_id,
                        name: CATEGORY_FEATURE.to_string(),
                        color: CATEGORY_FEATURE_COLOR.to_string(),
                        order: s.features.len() as i64 + 1,
                        types: Vec::new(),
                    });
                    s.features.len() - 1
                }
            };
            let feature = &mut s.features[feature_idx];
            feature.types.push(FeatureType {
                id,
                feature_id: feature.id,
                name: new.name.clone(),
                shade: Default::default(),
                position: feature.types.len() as i64 + 1,
            });
            Ok(Category {
                id,
                name: new.name.clone(),
            })
        }))
    }

    fn list_features(&self) -> impl Future<Output = ClientResult<Vec<Feature>>> + Send {
        ready(self.handle("GET", "/features".into(), None, |s| Ok(s.features.clone())))
    }

    fn create_feature(
        &self,
        new: &NewFeature,
    ) -> impl Future<Output = ClientResult<Feature>> + Send {
        let body = wire(new);
        ready(self.handle("POST", "/features".into(), Some(body), |s| {
            let feature = Feature {
                id: s.next_id(),
                name: new.name.clone(),
                color: new.color.clone(),
                order: s.features.len() as i64 + 1,
                types: Vec::new(),
            };
            s.features.push(feature.clone());
            Ok(feature)
        }))
    }

    fn rename_feature(
        &self,
        id: Id,
        name: &str,
    ) -> impl Future<Output = ClientResult<Feature>> + Send {
        let path = format!("/features/{id}");
        let body = wire(&Rename {
            name: name.to_string(),
        });
        ready(self.handle("PATCH", path.clone(), Some(body), |s| {
            match s.features.iter_mut().find(|f| f.id == id) {
                Some(feature) => {
                    feature.name = name.to_string();
                    Ok(feature.clone())
                }
                None => not_found("PATCH", path),
            }
        }))
    }

    fn delete_feature(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send {
        let path = format!("/features/{id}");
        ready(self.handle("DELETE", path.clone(), None, |s| {
            let before = s.features.len();
            s.features.retain(|f| f.id != id);
            if s.features.len() == before {
                return not_found("DELETE", path);
            }
            Ok(())
        }))
    }

    fn reorder_features(&self, ids: &[Id]) -> impl Future<Output = ClientResult<()>> + Send {
        let body = wire(&ReorderFeatures {
            feature_ids: ids.to_vec(),
        });
        ready(self.handle("POST", "/features/reorder".into(), Some(body), |s| {
            let mut reordered = Vec::with_capacity(ids.len());
            for (idx, id) in ids.iter().enumerate() {
                let Some(mut feature) = s.features.iter().find(|f| f.id == *id).cloned() else {
                    return not_found("POST", "/features/reorder".into());
                };
                feature.order = idx as i64 + 1;
                reordered.push(feature);
            }
            s.features = reordered;
            Ok(())
        }))
    }

    fn create_feature_type(
        &self,
        new: &NewFeatureType,
    ) -> impl Future<Output = ClientResult<FeatureType>> + Send {
        let body = wire(new);
        ready(self.handle("POST", "/feature-types".into(), Some(body), |s| {
            let id = s.next_id();
            let Some(feature) = s.features.iter_mut().find(|f| f.id == new.feature_id) else {
                return not_found("POST", "/feature-types".into());
            };
            let ty = FeatureType {
                id,
                feature_id: feature.id,
                name: new.name.clone(),
                shade: new.shade,
                position: feature.types.len() as i64 + 1,
            };
            feature.types.push(ty.clone());
            Ok(ty)
        }))
    }

    fn rename_feature_type(
        &self,
        id: Id,
        name: &str,
    ) -> impl Future<Output = ClientResult<FeatureType>> + Send {
        let path = format!("/feature-types/{id}");
        let body = wire(&Rename {
            name: name.to_string(),
        });
        ready(self.handle("PATCH", path.clone(), Some(body), |s| {
            let found = s
                .features
                .iter_mut()
                .flat_map(|f| f.types.iter_mut())
                .find(|t| t.id == id);
            match found {
                Some(ty) => {
                    ty.name = name.to_string();
                    Ok(ty.clone())
                }
                None => not_found("PATCH", path),
            }
        }))
    }

    fn delete_feature_type(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send {
        let path = format!("/feature-types/{id}");
        ready(self.handle("DELETE", path.clone(), None, |s| {
            for feature in &mut s.features {
                if let Some(idx) = feature.types.iter().position(|t| t.id == id) {
                    feature.types.remove(idx);
                    return Ok(());
                }
            }
            not_found("DELETE", path)
        }))
    }

    fn list_movies(&self) -> impl Future<Output = ClientResult<Vec<Movie>>> + Send {
        ready(self.handle("GET", "/movies".into(), None, |s| Ok(s.movies.clone())))
    }

    fn create_movie(&self, new: &NewMovie) -> impl Future<Output = ClientResult<Movie>> + Send {
        let body = wire(new);
        ready(self.handle("POST", "/movies".into(), Some(body), |s| {
            let actors = s
                .actors
                .iter()
                .filter(|a| new.actor_ids.contains(&a.id))
                .map(|a| ActorRef {
                    id: a.id,
                    name: a.name.clone(),
                })
                .collect();
            let movie = Movie {
                id: s.next_id(),
                code: new.code.clone(),
                name: new.name.clone(),
                created_at: "2024-01-01T00:00:00Z".to_string(),
                actors,
                feature_types: s.types_for(&new.feature_type_ids),
            };
            s.movies.insert(0, movie.clone());
            Ok(movie)
        }))
    }

    fn delete_movie(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send {
        let path = format!("/movies/{id}");
        ready(self.handle("DELETE", path.clone(), None, |s| {
            let before = s.movies.len();
            s.movies.retain(|m| m.id != id);
            if s.movies.len() == before {
                return not_found("DELETE", path);
            }
            Ok(())
        }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────────────

pub fn feature(id: Id, name: &str, order: i64, types: &[(Id, &str)]) -> Feature {
    Feature {
        id,
        name: name.to_string(),
        color: "#336699".to_string(),
        order,
        types: types
            .iter()
            .enumerate()
            .map(|(idx, (type_id, type_name))| FeatureType {
                id: *type_id,
                feature_id: id,
                name: type_name.to_string(),
                shade: Default::default(),
                position: idx as i64 + 1,
            })
            .collect(),
    }
}

pub fn actor(id: Id, name: &str) -> Actor {
    Actor {
        id,
        name: name.to_string(),
        created_at: "2023-06-01T12:00:00Z".to_string(),
        feature_types: Vec::new(),
    }
}

pub fn movie(id: Id, code: &str, name: &str) -> Movie {
    Movie {
        id,
        code: code.to_string(),
        name: name.to_string(),
        created_at: "2023-06-01T12:00:00Z".to_string(),
        actors: Vec::new(),
        feature_types: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Shade;
    use serde_json::json;

    #[tokio::test]
    async fn recorded_bodies_match_the_wire_payloads() {
        let api = MockApi::new();
        api.create_actor(&NewActor {
            name: "Ada".into(),
            feature_type_ids: vec![3],
            category_ids: vec![7],
        })
        .await
        .unwrap();
        api.create_feature_type(&NewFeatureType {
            feature_id: 1,
            name: "Noir".into(),
            shade: Shade::Dark,
        })
        .await
        .ok();

        let calls = api.calls();
        assert_eq!(
            calls[0].body,
            Some(json!({"name": "Ada", "feature_type_ids": [3], "category_ids": [7]}))
        );
        assert_eq!(
            calls[1].body,
            Some(json!({"feature_id": 1, "name": "Noir", "shade": "dark"}))
        );
    }
}
