use axum::{extract::State, Json};
use serde_json::{json, Value};
use spotbook_core::{ReviewImageId, SpotImageId};

use crate::{
    auth::CurrentUser,
    error::{ApiError, Id},
    state::SharedState,
};

pub async fn remove_spot_image(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(image_id): Id<SpotImageId>,
) -> Result<Json<Value>, ApiError> {
    let mut tables = state.store.write().await;

    let spot_id = tables
        .spot_image(image_id)
        .map(|image| image.spot_id)
        .ok_or(ApiError::NotFound("Spot Image couldn't be found"))?;

    if tables.spot(spot_id).map(|spot| spot.owner_id) != Some(user.id) {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    tables.delete_spot_image(image_id);

    Ok(Json(json!({ "message": "Successfully deleted" })))
}

pub async fn remove_review_image(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(image_id): Id<ReviewImageId>,
) -> Result<Json<Value>, ApiError> {
    let mut tables = state.store.write().await;

    let review_id = tables
        .review_image(image_id)
        .map(|image| image.review_id)
        .ok_or(ApiError::NotFound("Review Image couldn't be found"))?;

    if tables.review(review_id).map(|review| review.user_id) != Some(user.id) {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    tables.delete_review_image(image_id);

    Ok(Json(json!({ "message": "Successfully deleted" })))
}
