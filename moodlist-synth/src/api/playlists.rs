//! Playlist synthesis endpoints
//!
//! Catalog-scoped routes read the user's catalog token from the
//! `Authorization: Bearer` header and pass it through as a `CatalogSession`.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult, SynthesisError};
use crate::types::{CatalogSession, PlaylistResult, ThemeRequest};
use crate::AppState;

/// Theme suggestions offered to users
pub const THEME_SUGGESTIONS: &[&str] = &["Chill Evening", "Workout Energy", "Road Trip Vibes"];

/// POST /api/playlists request
#[derive(Debug, Deserialize)]
pub struct ThemePlaylistRequest {
    pub theme: String,
    /// Falls back to the configured default size
    #[serde(default)]
    pub target_size: Option<usize>,
}

/// POST /api/recommendations request
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub sentence: String,
    #[serde(default)]
    pub target_size: Option<usize>,
}

/// POST /api/generate-playlist request
#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    #[serde(rename = "gptPrompt", default)]
    pub gpt_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Extract the catalog session from the Authorization header
fn session_from_headers(headers: &HeaderMap) -> ApiResult<CatalogSession> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("malformed Authorization header".to_string()))?;

    // Auth scheme names are case-insensitive
    let token = value
        .trim()
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("expected a Bearer token".to_string()))?;

    Ok(CatalogSession::new(token))
}

/// GET /api/suggestions
pub async fn list_suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        suggestions: THEME_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    })
}

/// POST /api/playlists
///
/// Theme → playlist through the generate/parse/resolve loop.
pub async fn create_theme_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ThemePlaylistRequest>,
) -> ApiResult<(StatusCode, Json<PlaylistResult>)> {
    let session = session_from_headers(&headers)?;
    let target_size = body.target_size.unwrap_or(state.default_target_size);
    let request = ThemeRequest::new(body.theme, target_size).map_err(SynthesisError::from)?;

    info!(theme = %request.theme(), target_size = request.target_size(), "Theme playlist requested");

    match state.synthesizer.synthesize(&request, &session).await {
        Ok(result) => Ok((StatusCode::CREATED, Json(result))),
        Err(e) => {
            state.record_error(&e).await;
            Err(e.into())
        }
    }
}

/// POST /api/recommendations
///
/// Sentence → playlist through entity extraction and catalog recommendations.
pub async fn create_recommended_playlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RecommendationRequest>,
) -> ApiResult<(StatusCode, Json<PlaylistResult>)> {
    let session = session_from_headers(&headers)?;
    let target_size = body.target_size.unwrap_or(state.default_target_size);

    match state
        .synthesizer
        .recommend(&body.sentence, target_size, &session)
        .await
    {
        Ok(result) => Ok((StatusCode::CREATED, Json(result))),
        Err(e) => {
            state.record_error(&e).await;
            Err(e.into())
        }
    }
}

/// POST /api/generate-playlist
///
/// Forwards a raw prompt to the model and returns its text.
pub async fn complete_prompt(
    State(state): State<AppState>,
    Json(body): Json<CompletionRequest>,
) -> ApiResult<Json<CompletionResponse>> {
    let prompt = body
        .gpt_prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing gptPrompt in request body".to_string()))?;

    let content = state.model.complete(&prompt).await.map_err(|e| {
        warn!(error = %e, "Model pass-through failed");
        ApiError::Model(e)
    })?;

    Ok(Json(CompletionResponse { content }))
}

/// Build playlist routes
pub fn playlist_routes() -> Router<AppState> {
    Router::new()
        .route("/api/suggestions", get(list_suggestions))
        .route("/api/playlists", post(create_theme_playlist))
        .route("/api/recommendations", post(create_recommended_playlist))
        .route("/api/generate-playlist", post(complete_prompt))
}
