//! Axum route handlers for the metadata API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::errors::{AppError, IMAGE_REQUIRED_MESSAGE};
use crate::metadata::generator::{generate_metadata, GenerateSeoRequest, GenerationRequest};
use crate::metadata::parser::GenerationResult;
use crate::state::AppState;

/// POST /api/generate-seo
///
/// Sends the uploaded image to the vision model and returns title, keywords and description.
/// Bodies that cannot be read as JSON count as a missing image; oversized bodies are 413.
pub async fn handle_generate_seo(
    State(state): State<AppState>,
    body: Result<Json<GenerateSeoRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, AppError> {
    let Json(body) = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge {
                limit: state.config.max_image_bytes,
            };
        }
        debug!("Rejected request body: {rejection}");
        AppError::InvalidRequest(IMAGE_REQUIRED_MESSAGE.to_string())
    })?;

    let request = GenerationRequest::try_from(body)?;

    let result =
        generate_metadata(state.vision.as_ref(), &request, state.config.model_timeout).await?;

    Ok(Json(result))
}

/// Any method other than POST on the generation route.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
