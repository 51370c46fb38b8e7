// Actor endpoints

use super::extract::{ApiJson, ApiPath};
use super::{ApiError, AppState};
use crate::model::{Actor, Id, Message, NewActor};
use axum::extract::State;
use axum::Json;

/// GET /api/actors - All actors, newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Actor>>, ApiError> {
    let actors = state.run(|catalog| catalog.list_actors()).await?;
    Ok(Json(actors))
}

/// POST /api/actors - Create an actor
///
/// Accepts `feature_type_ids` and the legacy `category_ids`; both are
/// merged since categories are feature types.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewActor>,
) -> Result<Json<Actor>, ApiError> {
    let actor = state.run(move |catalog| catalog.create_actor(&new)).await?;
    tracing::info!(actor_id = actor.id, name = %actor.name, "Actor created");
    Ok(Json(actor))
}

/// DELETE /api/actors/:id
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Message>, ApiError> {
    state.run(move |catalog| catalog.delete_actor(id)).await?;
    tracing::info!(actor_id = id, "Actor deleted");
    Ok(Json(Message::new("Actor deleted")))
}
