use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use spotbook_core::{SignupDraft, ValidationErrors};
use tracing::info;

use crate::{
    auth::hash_password,
    error::{ApiError, Payload},
    state::SharedState,
};

pub async fn signup(
    State(state): State<SharedState>,
    Payload(draft): Payload<SignupDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    draft.validate()?;

    let password_hash = hash_password(draft.password.clone(), state.hash_cost).await?;

    let user = {
        let mut tables = state.store.write().await;

        let mut taken = ValidationErrors::new();
        if tables.email_taken(&draft.email) {
            taken.add("email", "User with that email already exists");
        }
        if tables.username_taken(&draft.username) {
            taken.add("username", "User with that username already exists");
        }
        if !taken.is_empty() {
            return Err(ApiError::AlreadyExists {
                message: "User already exists",
                errors: Some(taken),
            });
        }

        tables.insert_user(&draft, password_hash)
    };

    let token = state.sessions.open(user.id).await;
    info!(user_id = user.id, username = %user.username, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user, "token": token })),
    ))
}
