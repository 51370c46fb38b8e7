// REST client - typed access to the catalog API
//
// `CatalogApi` is the seam between the front-end core (pages, selector
// effects) and the network. `HttpClient` talks to a real server through
// reqwest; tests substitute an in-memory recording implementation.

mod http;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpClient;

use crate::model::{
    Actor, Category, Feature, FeatureType, Id, Movie, NewActor, NewCategory, NewFeature,
    NewFeatureType, NewMovie,
};
use std::future::Future;
use thiserror::Error;

/// Errors returned by [`CatalogApi`] calls
///
/// Error bodies from the server are kept as raw text for logging only.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{method} {path} returned {status}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("could not decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Every endpoint of the catalog REST API
pub trait CatalogApi {
    // Actors
    fn list_actors(&self) -> impl Future<Output = ClientResult<Vec<Actor>>> + Send;
    fn create_actor(&self, new: &NewActor) -> impl Future<Output = ClientResult<Actor>> + Send;
    fn delete_actor(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send;

    // Categories
    fn list_categories(&self) -> impl Future<Output = ClientResult<Vec<Category>>> + Send;
    fn create_category(
        &self,
        new: &NewCategory,
    ) -> impl Future<Output = ClientResult<Category>> + Send;

    // Features
    fn list_features(&self) -> impl Future<Output = ClientResult<Vec<Feature>>> + Send;
    fn create_feature(&self, new: &NewFeature)
        -> impl Future<Output = ClientResult<Feature>> + Send;
    fn rename_feature(
        &self,
        id: Id,
        name: &str,
    ) -> impl Future<Output = ClientResult<Feature>> + Send;
    fn delete_feature(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send;
    /// Persist a full ordering; the response body is ignored
    fn reorder_features(&self, ids: &[Id]) -> impl Future<Output = ClientResult<()>> + Send;

    // Feature types
    fn create_feature_type(
        &self,
        new: &NewFeatureType,
    ) -> impl Future<Output = ClientResult<FeatureType>> + Send;
    fn rename_feature_type(
        &self,
        id: Id,
        name: &str,
    ) -> impl Future<Output = ClientResult<FeatureType>> + Send;
    fn delete_feature_type(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send;

    // Movies
    fn list_movies(&self) -> impl Future<Output = ClientResult<Vec<Movie>>> + Send;
    fn create_movie(&self, new: &NewMovie) -> impl Future<Output = ClientResult<Movie>> + Send;
    fn delete_movie(&self, id: Id) -> impl Future<Output = ClientResult<()>> + Send;
}
