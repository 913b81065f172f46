use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use partytime_shared::protocol::MessageResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    /// No session token on a protected route.
    #[error("No token provided.")]
    Unauthenticated,

    /// Token present but malformed, tampered or expired.
    #[error("Invalid token.")]
    InvalidToken,

    /// Login rejected. Unknown username and wrong password look the same.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Old password is incorrect.")]
    IncorrectPassword,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Image too large: {size} bytes (max {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Request body too large.")]
    PayloadTooLarge,

    #[error("Media storage error: {0}")]
    Media(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<partytime_store::StoreError> for ServerError {
    fn from(e: partytime_store::StoreError) -> Self {
        ServerError::Internal(e.to_string())
    }
}

// Extractor rejections carry serde and routing detail; log it, answer generically.

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(
            status = %rejection.status(),
            detail = %rejection.body_text(),
            "Rejected JSON body"
        );
        ServerError::BadRequest("Invalid request body.".to_string())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected query string");
        ServerError::BadRequest("Invalid query string.".to_string())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected path parameters");
        ServerError::NotFound("Not found.".to_string())
    }
}

impl From<MultipartRejection> for ServerError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "Rejected multipart request");
        ServerError::BadRequest("Invalid form data.".to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::Unauthenticated
            | ServerError::InvalidCredentials
            | ServerError::IncorrectPassword => (StatusCode::UNAUTHORIZED, self.to_string()),
            ServerError::InvalidToken => (StatusCode::FORBIDDEN, self.to_string()),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::ImageTooLarge { .. } | ServerError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            ServerError::Media(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not store image.".to_string(),
            ),
            ServerError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error.".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, axum::Json(MessageResponse::new(message))).into_response()
    }
}
