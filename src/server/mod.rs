//! REST server for the catalog
//!
//! All endpoints live under `/api` and speak JSON. Storage calls are
//! blocking rusqlite work, so handlers hop onto the blocking pool.

mod actors;
mod error;
mod extract;
mod features;
mod movies;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::storage::{Catalog, StorageResult};
use anyhow::{Context, Result};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state for handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Run a storage call on the blocking pool
    pub(crate) async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Catalog) -> StorageResult<T> + Send + 'static,
    {
        let catalog = self.catalog.clone();
        let result = tokio::task::spawn_blocking(move || f(&catalog)).await?;
        Ok(result?)
    }
}

/// Build the `/api` router with CORS and request tracing
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/actors", get(actors::list).post(actors::create))
        .route("/actors/:id", delete(actors::remove))
        .route(
            "/categories",
            get(features::list_categories).post(features::create_category),
        )
        .route("/features", get(features::list).post(features::create))
        .route("/features/reorder", post(features::reorder))
        .route(
            "/features/:id",
            patch(features::rename).delete(features::remove),
        )
        .route("/feature-types", post(features::create_type))
        .route(
            "/feature-types/:id",
            patch(features::rename_type).delete(features::remove_type),
        )
        .route("/movies", get(movies::list).post(movies::create))
        .route("/movies/:id", delete(movies::remove));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

/// CORS for the configured origins; invalid origins are skipped with a warning
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

/// Bind `bind_addr` and serve until `shutdown_rx` fires
///
/// `ready_tx` receives the bound address (useful with port 0).
pub async fn start_server(
    catalog: Catalog,
    config: ServerConfig,
    bind_addr: SocketAddr,
    ready_tx: Option<tokio::sync::oneshot::Sender<SocketAddr>>,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let app = router(AppState::new(catalog), &config);

    tracing::info!("Starting catalog server on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read bound address")?;

    tracing::info!("Catalog server listening on {}", local_addr);
    if let Some(tx) = ready_tx {
        let _ = tx.send(local_addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Catalog server shut down gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CatalogApi, ClientError, HttpClient};
    use crate::config::ClientConfig;
    use crate::model::{
        NewActor, NewCategory, NewFeature, NewFeatureType, NewMovie, Shade, CATEGORY_FEATURE,
    };

    struct TestServer {
        client: HttpClient,
        base: String,
        shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
        }
    }

    async fn spawn() -> TestServer {
        let catalog = Catalog::open_in_memory().unwrap();
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(start_server(
            catalog,
            ServerConfig::default(),
            "127.0.0.1:0".parse().unwrap(),
            Some(ready_tx),
            shutdown_rx,
        ));

        let addr = ready_rx.await.unwrap();
        let base = format!("http://{}/api", addr);
        TestServer {
            client: HttpClient::new(base.clone(), &ClientConfig::default()).unwrap(),
            base,
            shutdown: Some(shutdown_tx),
        }
    }

    #[tokio::test]
    async fn actors_round_trip_over_http() {
        let server = spawn().await;
        let api = &server.client;

        let genre = api
            .create_feature(&NewFeature {
                name: "Genre".into(),
                color: "#336699".into(),
            })
            .await
            .unwrap();
        let noir = api
            .create_feature_type(&NewFeatureType {
                feature_id: genre.id,
                name: "Noir".into(),
                shade: Shade::Dark,
            })
            .await
            .unwrap();

        let first = api
            .create_actor(&NewActor {
                name: "Bogart".into(),
                feature_type_ids: vec![noir.id],
                ..Default::default()
            })
            .await
            .unwrap();
        let second = api
            .create_actor(&NewActor {
                name: "Bacall".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first.feature_types, vec![noir]);

        let listed: Vec<_> = api
            .list_actors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(listed, vec![second.id, first.id]);

        api.delete_actor(first.id).await.unwrap();
        let err = api.delete_actor(first.id).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn reorder_renumbers_and_rejects_partial_lists() {
        let server = spawn().await;
        let api = &server.client;

        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            let feature = api
                .create_feature(&NewFeature {
                    name: name.into(),
                    color: "#aabbcc".into(),
                })
                .await
                .unwrap();
            ids.push(feature.id);
        }

        api.reorder_features(&[ids[1], ids[2], ids[0]])
            .await
            .unwrap();
        let features = api.list_features().await.unwrap();
        let order: Vec<_> = features
            .iter()
            .map(|f| (f.name.as_str(), f.order))
            .collect();
        assert_eq!(order, vec![("B", 1), ("C", 2), ("A", 3)]);

        let err = api.reorder_features(&[ids[0]]).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn duplicate_category_is_a_bad_request_with_detail() {
        let server = spawn().await;
        let api = &server.client;

        let lead = api
            .create_category(&NewCategory {
                name: "Lead".into(),
            })
            .await
            .unwrap();
        let err = api
            .create_category(&NewCategory {
                name: "Lead".into(),
            })
            .await
            .unwrap_err();

        match err {
            ClientError::Status { status, body, .. } => {
                assert_eq!(status, 400);
                let detail: serde_json::Value = serde_json::from_str(&body).unwrap();
                assert_eq!(detail["detail"], "Category already exists");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let categories = api.list_categories().await.unwrap();
        assert_eq!(categories, vec![lead.clone()]);

        let features = api.list_features().await.unwrap();
        let reserved = features
            .iter()
            .find(|f| f.name == CATEGORY_FEATURE)
            .unwrap();
        assert_eq!(reserved.types[0].id, lead.id);
    }

    #[tokio::test]
    async fn renames_and_deletes_features_and_types() {
        let server = spawn().await;
        let api = &server.client;

        let feature = api
            .create_feature(&NewFeature {
                name: "Era".into(),
                color: "#102030".into(),
            })
            .await
            .unwrap();
        let ty = api
            .create_feature_type(&NewFeatureType {
                feature_id: feature.id,
                name: "Silent".into(),
                shade: Shade::Light,
            })
            .await
            .unwrap();

        let renamed = api.rename_feature(feature.id, "Decade").await.unwrap();
        assert_eq!(renamed.name, "Decade");
        let renamed_type = api.rename_feature_type(ty.id, "Talkie").await.unwrap();
        assert_eq!(renamed_type.name, "Talkie");

        api.delete_feature_type(ty.id).await.unwrap();
        api.delete_feature(feature.id).await.unwrap();
        assert!(api.list_features().await.unwrap().is_empty());
        assert_eq!(
            api.delete_feature(feature.id).await.unwrap_err().status(),
            Some(404)
        );
    }

    #[tokio::test]
    async fn movies_link_actors_and_ignore_unknown_ids() {
        let server = spawn().await;
        let api = &server.client;

        let actor = api
            .create_actor(&NewActor {
                name: "Cotten".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let movie = api
            .create_movie(&NewMovie {
                code: "M-1".into(),
                name: "The Third Man".into(),
                actor_ids: vec![actor.id, 4242],
                feature_type_ids: vec![777],
            })
            .await
            .unwrap();

        assert_eq!(movie.actors.len(), 1);
        assert!(movie.feature_types.is_empty());
        assert_eq!(api.list_movies().await.unwrap(), vec![movie.clone()]);

        api.delete_movie(movie.id).await.unwrap();
        assert!(api.list_movies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_answers_with_message_body() {
        let server = spawn().await;
        let actor = server
            .client
            .create_actor(&NewActor {
                name: "Lorre".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let response = reqwest::Client::new()
            .delete(format!("{}/actors/{}", server.base, actor.id))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!({"message": "Actor deleted"}));
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let server = spawn().await;
        let err = server
            .client
            .create_actor(&NewActor {
                name: "  ".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
    #[tokio::test]
    async fn feature_type_endpoints_cannot_duplicate_a_category() {
        let server = spawn().await;
        let api = &server.client;

        api.create_category(&NewCategory {
            name: "Drama".into(),
        })
        .await
        .unwrap();
        let comedy = api
            .create_category(&NewCategory {
                name: "Comedy".into(),
            })
            .await
            .unwrap();
        let reserved = api.list_features().await.unwrap()[0].id;

        let err = api
            .rename_feature_type(comedy.id, "Drama")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));

        let err = api
            .create_feature_type(&NewFeatureType {
                feature_id: reserved,
                name: "Drama".into(),
                shade: Shade::Middle,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));

        let names: Vec<_> = api
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Comedy", "Drama"]);
    }

    #[tokio::test]
    async fn malformed_requests_answer_with_detail() {
        let server = spawn().await;
        let http = reqwest::Client::new();

        let response = http
            .delete(format!("{}/actors/abc", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["detail"].is_string());

        let response = http
            .post(format!("{}/actors", server.base))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["detail"].as_str().unwrap().contains("name"));
    }
}
