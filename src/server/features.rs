// Feature, feature type and category endpoints

use super::extract::{ApiJson, ApiPath};
use super::{ApiError, AppState};
use crate::model::{
    Category, Feature, FeatureType, Id, Message, NewCategory, NewFeature, NewFeatureType, Rename,
    ReorderFeatures,
};
use axum::extract::State;
use axum::Json;

// ============================================================================
// Features
// ============================================================================

/// GET /api/features - Features by `order`, each with its types by `position`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Feature>>, ApiError> {
    let features = state.run(|catalog| catalog.list_features()).await?;
    Ok(Json(features))
}

/// POST /api/features - Create a feature, appended last
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewFeature>,
) -> Result<Json<Feature>, ApiError> {
    let feature = state.run(move |catalog| catalog.create_feature(&new)).await?;
    tracing::info!(feature_id = feature.id, name = %feature.name, "Feature created");
    Ok(Json(feature))
}

/// PATCH /api/features/:id - Rename
pub async fn rename(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<Rename>,
) -> Result<Json<Feature>, ApiError> {
    let feature = state
        .run(move |catalog| catalog.rename_feature(id, &body.name))
        .await?;
    Ok(Json(feature))
}

/// DELETE /api/features/:id - Remove a feature and its types
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Message>, ApiError> {
    state.run(move |catalog| catalog.delete_feature(id)).await?;
    tracing::info!(feature_id = id, "Feature deleted");
    Ok(Json(Message::new("Feature deleted")))
}

/// POST /api/features/reorder - Persist a complete ordering
///
/// The id list must be a permutation of all feature ids.
pub async fn reorder(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReorderFeatures>,
) -> Result<Json<Message>, ApiError> {
    let count = body.feature_ids.len();
    state
        .run(move |catalog| catalog.reorder_features(&body.feature_ids))
        .await?;
    tracing::debug!(count, "Features reordered");
    Ok(Json(Message::new("Features reordered")))
}

// ============================================================================
// Feature types
// ============================================================================

/// POST /api/feature-types - Create a type, appended last in its feature
pub async fn create_type(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewFeatureType>,
) -> Result<Json<FeatureType>, ApiError> {
    let ty = state
        .run(move |catalog| catalog.create_feature_type(&new))
        .await?;
    tracing::info!(type_id = ty.id, feature_id = ty.feature_id, "Feature type created");
    Ok(Json(ty))
}

/// PATCH /api/feature-types/:id - Rename
pub async fn rename_type(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<Rename>,
) -> Result<Json<FeatureType>, ApiError> {
    let ty = state
        .run(move |catalog| catalog.rename_feature_type(id, &body.name))
        .await?;
    Ok(Json(ty))
}

/// DELETE /api/feature-types/:id
pub async fn remove_type(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Message>, ApiError> {
    state
        .run(move |catalog| catalog.delete_feature_type(id))
        .await?;
    tracing::info!(type_id = id, "Feature type deleted");
    Ok(Json(Message::new("Feature type deleted")))
}

// ============================================================================
// Categories (types under the reserved feature)
// ============================================================================

/// GET /api/categories - Sorted by name
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.run(|catalog| catalog.list_categories()).await?;
    Ok(Json(categories))
}

/// POST /api/categories - Create a category; names are unique
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewCategory>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .run(move |catalog| catalog.create_category(&new))
        .await?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    Ok(Json(category))
}
