use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned for a missing or unreadable image payload.
pub const IMAGE_REQUIRED_MESSAGE: &str = "Image data is required.";
/// Fixed message for every upstream model failure. The cause is logged, never returned.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to generate metadata from AI.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Payload too large (limit {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    /// Any failure of the model call: transport, auth, quota, timeout, reply shape.
    #[error("Upstream model failure: {0}")]
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
            ),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge { limit } => {
                tracing::warn!("Rejected request body above {limit} bytes");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "Image payload is too large.".to_string(),
                )
            }
            AppError::Upstream(cause) => {
                tracing::error!("Upstream model error: {cause}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let (status, body) = body_json(AppError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_invalid_request_passes_message_through() {
        let (status, body) =
            body_json(AppError::InvalidRequest(IMAGE_REQUIRED_MESSAGE.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Image data is required." }));
    }

    #[tokio::test]
    async fn test_upstream_cause_is_not_exposed() {
        let (status, body) =
            body_json(AppError::Upstream("invalid api key sk-secret".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to generate metadata from AI." }));
        assert!(!body.to_string().contains("sk-secret"));
    }

    #[tokio::test]
    async fn test_payload_too_large_status() {
        let (status, _) = body_json(AppError::PayloadTooLarge { limit: 10 }).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
