//! Error types for moodlist-synth
//!
//! `SynthesisError` is what the engine reports to its callers; `ApiError`
//! is its HTTP rendering.

use crate::types::{CatalogError, ModelError, RequestError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Terminal failures of a synthesis call
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Rejected input (empty theme, zero target size)
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// Model call failed; the run was aborted without further attempts
    #[error("Generation failed: {0}")]
    ModelFailure(#[source] ModelError),

    /// Attempt budget spent before the target was reached
    #[error("Found {found} of {target} tracks after {attempts} attempts")]
    Exhausted {
        found: usize,
        target: usize,
        attempts: u32,
    },

    /// Playlist creation or track append failed after resolution
    #[error("Playlist creation failed: {0}")]
    MaterializeFailure(#[source] CatalogError),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or malformed bearer token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Synthesis failure, status depends on the variant
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Model pass-through failure (502)
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::Synthesis(SynthesisError::InvalidRequest(err)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string(), None)
            }
            // Provider details stay in the logs
            ApiError::Synthesis(SynthesisError::ModelFailure(_)) => (
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                "Playlist generation failed, please try again".to_string(),
                None,
            ),
            ApiError::Synthesis(SynthesisError::Exhausted {
                found,
                target,
                attempts,
            }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXHAUSTED",
                format!(
                    "Only {} of {} songs could be matched in the catalog after {} attempts",
                    found, target, attempts
                ),
                Some(json!({ "found": found, "target": target, "attempts": attempts })),
            ),
            ApiError::Synthesis(SynthesisError::MaterializeFailure(err)) => (
                StatusCode::BAD_GATEWAY,
                "MATERIALIZE_FAILED",
                format!("Playlist creation failed: {}", err),
                None,
            ),
            ApiError::Model(_) => (
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                "Model request failed".to_string(),
                None,
            ),
        };

        let mut error = json!({
            "code": error_code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
