use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("{0}")]
    Validation(String),

    #[error("image upload failed: {0}")]
    Upload(String),

    #[error("shortcut not found")]
    NotFound,

    #[error("persistence failure")]
    Persistence(#[from] anyhow::Error),
}

impl IntoResponse for ShortcutError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ShortcutError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ShortcutError::Upload(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            ShortcutError::NotFound => (StatusCode::NOT_FOUND, "Shortcut not found".to_string()),
            ShortcutError::Persistence(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Errors surfaced by the `/api/search-icon` relay. `MissingQuery` is
/// rejected before any upstream call is made.
#[derive(Debug, Error)]
pub enum IconSearchError {
    #[error("Query is required")]
    MissingQuery,

    #[error("No icon found")]
    NotFound,

    #[error("icon search upstream failed: {0}")]
    Upstream(String),
}

impl IntoResponse for IconSearchError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            IconSearchError::MissingQuery => (StatusCode::BAD_REQUEST, "Query is required"),
            IconSearchError::NotFound => (StatusCode::NOT_FOUND, "No icon found"),
            IconSearchError::Upstream(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch icon")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
