use std::collections::HashMap;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use spotbook_core::{User, UserId};
use tokio::{
    sync::RwLock,
    task,
    time::{Duration, Instant},
};
use uuid::Uuid;

use crate::{error::ApiError, state::SharedState};

/// Lowest work factor bcrypt accepts. Only meant for tests.
pub const MIN_HASH_COST: u32 = 4;

/// Hashes on the blocking pool, bcrypt being deliberately slow.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .map_err(|err| ApiError::Internal(err.to_string()))
}

pub async fn verify_password(password: String, hash: String) -> bool {
    task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

struct Session {
    user_id: UserId,
    expires: Instant,
}

/// Opaque bearer tokens handed out on login and signup. They lapse after
/// `ttl`; lapsed entries are swept whenever a new session opens.
pub struct Sessions {
    ttl: Duration,
    tokens: RwLock<HashMap<String, Session>>,
}

impl Sessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            tokens: Default::default(),
        }
    }

    pub async fn open(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let now = Instant::now();

        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, session| session.expires > now);
        tokens.insert(
            token.clone(),
            Session {
                user_id,
                expires: now + self.ttl,
            },
        );

        token
    }

    pub async fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens
            .read()
            .await
            .get(token)
            .filter(|session| session.expires > Instant::now())
            .map(|session| session.user_id)
    }

    pub async fn close(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn session_user(parts: &Parts, state: &SharedState) -> Option<User> {
    let token = bearer_token(&parts.headers)?;
    let user_id = state.sessions.resolve(token).await?;
    state.store.read().await.user(user_id).cloned()
}

/// The authenticated caller. Rejects with 401 when there is none.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        session_user(parts, state)
            .await
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<SharedState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_user(parts, state).await))
    }
}
