//! reqwest implementation of [`CatalogApi`]

use super::{CatalogApi, ClientError, ClientResult};
use crate::config::ClientConfig;
use crate::model::{
    Actor, Category, Feature, FeatureType, Id, Movie, NewActor, NewCategory, NewFeature,
    NewFeatureType, NewMovie, Rename, ReorderFeatures,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// HTTP client bound to one API base URL (e.g. `http://127.0.0.1:8080/api`)
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base: String,
}

impl HttpClient {
    pub fn new(api_base: impl Into<String>, config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Send a request and fail on any non-2xx status
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> ClientResult<reqwest::Response> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        if status.is_success() {
            tracing::trace!(%method, path, status = status.as_u16(), "API call ok");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            method: method_name(&method),
            path: path.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None::<&()>)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.send(method, path, Some(body))
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)
    }

    /// Send and discard whatever body comes back
    async fn fire(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> ClientResult<()> {
        self.send(method, path, body).await.map(drop)
    }
}

fn method_name(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PATCH => "PATCH",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        _ => "OTHER",
    }
}

impl CatalogApi for HttpClient {
    async fn list_actors(&self) -> ClientResult<Vec<Actor>> {
        self.get("/actors").await
    }

    async fn create_actor(&self, new: &NewActor) -> ClientResult<Actor> {
        self.write(Method::POST, "/actors", new).await
    }

    async fn delete_actor(&self, id: Id) -> ClientResult<()> {
        self.fire(Method::DELETE, &format!("/actors/{id}"), None::<&()>)
            .await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.get("/categories").await
    }

    async fn create_category(&self, new: &NewCategory) -> ClientResult<Category> {
        self.write(Method::POST, "/categories", new).await
    }

    async fn list_features(&self) -> ClientResult<Vec<Feature>> {
        self.get("/features").await
    }

    async fn create_feature(&self, new: &NewFeature) -> ClientResult<Feature> {
        self.write(Method::POST, "/features", new).await
    }

    async fn rename_feature(&self, id: Id, name: &str) -> ClientResult<Feature> {
        let body = Rename {
            name: name.to_string(),
        };
        self.write(Method::PATCH, &format!("/features/{id}"), &body)
            .await
    }

    async fn delete_feature(&self, id: Id) -> ClientResult<()> {
        self.fire(Method::DELETE, &format!("/features/{id}"), None::<&()>)
            .await
    }

    async fn reorder_features(&self, ids: &[Id]) -> ClientResult<()> {
        let body = ReorderFeatures {
            feature_ids: ids.to_vec(),
        };
        self.fire(Method::POST, "/features/reorder", Some(&body))
            .await
    }

    async fn create_feature_type(&self, new: &NewFeatureType) -> ClientResult<FeatureType> {
        self.write(Method::POST, "/feature-types", new).await
    }

    async fn rename_feature_type(&self, id: Id, name: &str) -> ClientResult<FeatureType> {
        let body = Rename {
            name: name.to_string(),
        };
        self.write(Method::PATCH, &format!("/feature-types/{id}"), &body)
            .await
    }

    async fn delete_feature_type(&self, id: Id) -> ClientResult<()> {
        self.fire(Method::DELETE, &format!("/feature-types/{id}"), None::<&()>)
            .await
    }

    async fn list_movies(&self) -> ClientResult<Vec<Movie>> {
        self.get("/movies").await
    }

    async fn create_movie(&self, new: &NewMovie) -> ClientResult<Movie> {
        self.write(Method::POST, "/movies", new).await
    }

    async fn delete_movie(&self, id: Id) -> ClientResult<()> {
        self.fire(Method::DELETE, &format!("/movies/{id}"), None::<&()>)
            .await
    }
}
