use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing Authorization header")]
    MissingCredential,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Authenticated user no longer exists")]
    UnknownIdentity,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Email already registered")]
    AlreadyExists,

    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            // Authentication failures are surfaced uniformly so callers
            // cannot probe which check rejected them; the variants stay
            // distinct internally and in logs.
            ApiError::MissingCredential | ApiError::InvalidToken | ApiError::UnknownIdentity => {
                tracing::debug!(reason = %self, "authentication rejected");
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid or missing credentials".to_string(),
                )
            }
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ApiError::AlreadyExists => (
                StatusCode::CONFLICT,
                "Email already registered".to_string(),
            ),
            ApiError::AlreadyRegistered => (
                StatusCode::CONFLICT,
                "Already registered for this event".to_string(),
            ),
            ApiError::Internal(msg) => {
                // Don't leak internal details to the caller
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "token verification failed");
        ApiError::InvalidToken
    }
}
