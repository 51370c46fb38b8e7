// Movie endpoints

use super::extract::{ApiJson, ApiPath};
use super::{ApiError, AppState};
use crate::model::{Id, Message, Movie, NewMovie};
use axum::extract::State;
use axum::Json;

/// GET /api/movies - All movies, newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies = state.run(|catalog| catalog.list_movies()).await?;
    Ok(Json(movies))
}

/// POST /api/movies - Create a movie with its cast and feature types
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewMovie>,
) -> Result<Json<Movie>, ApiError> {
    let movie = state.run(move |catalog| catalog.create_movie(&new)).await?;
    tracing::info!(movie_id = movie.id, code = %movie.code, "Movie created");
    Ok(Json(movie))
}

/// DELETE /api/movies/:id
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Message>, ApiError> {
    state.run(move |catalog| catalog.delete_movie(id)).await?;
    tracing::info!(movie_id = id, "Movie deleted");
    Ok(Json(Message::new("Movie deleted")))
}
