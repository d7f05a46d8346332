use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use spotbook_core::{ImageDraft, Review, ReviewDraft, ReviewId, SpotId, UserId};
use tracing::info;

use crate::{
    auth::CurrentUser,
    error::{ApiError, Id, Payload},
    routes::views::ReviewView,
    state::SharedState,
};

const REVIEW_NOT_FOUND: &str = "Review couldn't be found";
const MAX_REVIEW_IMAGES: usize = 10;

pub async fn for_spot(
    State(state): State<SharedState>,
    Id(spot_id): Id<SpotId>,
) -> Result<Json<Value>, ApiError> {
    let tables = state.store.read().await;
    tables
        .spot(spot_id)
        .ok_or(ApiError::NotFound("Spot couldn't be found"))?;

    let reviews = tables
        .reviews_for_spot(spot_id)
        .into_iter()
        .map(|review| ReviewView::new(&tables, review, false))
        .collect::<Vec<_>>();

    Ok(Json(json!({ "Reviews": reviews })))
}

pub async fn current(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
) -> Json<Value> {
    let tables = state.store.read().await;

    let reviews = tables
        .reviews_by_user(user.id)
        .into_iter()
        .map(|review| ReviewView::new(&tables, review, true))
        .collect::<Vec<_>>();

    Json(json!({ "Reviews": reviews }))
}

pub async fn create(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(spot_id): Id<SpotId>,
    Payload(draft): Payload<ReviewDraft>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    draft.validate()?;

    let mut tables = state.store.write().await;

    tables
        .spot(spot_id)
        .ok_or(ApiError::NotFound("Spot couldn't be found"))?;

    if tables.review_by(user.id, spot_id).is_some() {
        return Err(ApiError::AlreadyExists {
            message: "User already has a review for this spot",
            errors: None,
        });
    }

    let review = tables.insert_review(user.id, spot_id, &draft, Utc::now());
    info!(review_id = review.id, spot_id, user_id = user.id, "review created");

    Ok((StatusCode::CREATED, Json(review)))
}

async fn authored_review(
    state: &SharedState,
    review_id: ReviewId,
    user_id: UserId,
) -> Result<(), ApiError> {
    let tables = state.store.read().await;
    let review = tables
        .review(review_id)
        .ok_or(ApiError::NotFound(REVIEW_NOT_FOUND))?;

    if review.user_id != user_id {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    Ok(())
}

pub async fn update(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(review_id): Id<ReviewId>,
    Payload(draft): Payload<ReviewDraft>,
) -> Result<Json<Review>, ApiError> {
    authored_review(&state, review_id, user.id).await?;
    draft.validate()?;

    let review = state
        .store
        .write()
        .await
        .update_review(review_id, &draft, Utc::now())
        .ok_or(ApiError::NotFound(REVIEW_NOT_FOUND))?;

    Ok(Json(review))
}

pub async fn remove(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(review_id): Id<ReviewId>,
) -> Result<Json<Value>, ApiError> {
    authored_review(&state, review_id, user.id).await?;

    state
        .store
        .write()
        .await
        .delete_review(review_id)
        .ok_or(ApiError::NotFound(REVIEW_NOT_FOUND))?;

    Ok(Json(json!({ "message": "Successfully deleted" })))
}

pub async fn add_image(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Id(review_id): Id<ReviewId>,
    Payload(draft): Payload<ImageDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    authored_review(&state, review_id, user.id).await?;
    draft.validate()?;

    let mut tables = state.store.write().await;

    if tables.review(review_id).is_none() {
        return Err(ApiError::NotFound(REVIEW_NOT_FOUND));
    }

    if tables.review_images(review_id).len() >= MAX_REVIEW_IMAGES {
        return Err(ApiError::Forbidden(
            "Maximum number of images for this resource was reached",
        ));
    }

    let image = tables.insert_review_image(review_id, &draft);

    Ok((StatusCode::CREATED, Json(json!(image))))
}
