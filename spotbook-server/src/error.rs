use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use spotbook_core::{BookingError, ConflictErrors, ValidationErrors, CONFLICT_MESSAGE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad Request")]
    Validation(ValidationErrors),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{}", CONFLICT_MESSAGE)]
    Conflict(ConflictErrors),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{message}")]
    AlreadyExists {
        message: &'static str,
        errors: Option<ValidationErrors>,
    },

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::MalformedPayload(_)
            | ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::Conflict(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if let ApiError::Internal(cause) = &self {
            tracing::error!(%cause, "request failed");
        }

        let body = match self {
            ApiError::Validation(errors)
            | ApiError::AlreadyExists {
                errors: Some(errors),
                ..
            } => json!({ "message": message, "errors": errors }),
            ApiError::Conflict(errors) => json!({ "message": message, "errors": errors }),
            ApiError::InvalidCredentials => json!({
                "message": message,
                "errors": { "credential": "The provided credentials were invalid." },
            }),
            _ => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(errors) => ApiError::Validation(errors),
            BookingError::Conflict(errors) => ApiError::Conflict(errors),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

/// `Path` whose rejections render like every other API error.
pub struct Id<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for Id<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Id(value))
    }
}

/// `Json` whose rejections render like every other API error.
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Payload(value))
    }
}
