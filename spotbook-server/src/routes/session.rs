use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};
use spotbook_core::LoginDraft;
use tracing::info;

use crate::{
    auth::{bearer_token, verify_password, MaybeUser},
    error::{ApiError, Payload},
    state::SharedState,
};

pub async fn restore(MaybeUser(user): MaybeUser) -> Json<Value> {
    Json(json!({ "user": user }))
}

pub async fn login(
    State(state): State<SharedState>,
    Payload(draft): Payload<LoginDraft>,
) -> Result<Json<Value>, ApiError> {
    draft.validate()?;

    let (user, password_hash) = state
        .store
        .read()
        .await
        .find_login(&draft.credential)
        .map(|record| (record.user.clone(), record.password_hash.clone()))
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(draft.password, password_hash).await {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.sessions.open(user.id).await;
    info!(user_id = user.id, "session opened");

    Ok(Json(json!({ "user": user, "token": token })))
}

pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.close(token).await;
    }

    Json(json!({ "message": "success" }))
}
