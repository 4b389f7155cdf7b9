//! moodlist-synth library - mood/theme playlist synthesis
//!
//! Turns a free-text theme into a catalog playlist by asking a language
//! model for songs, parsing its reply, and resolving each suggestion
//! against the music catalog until the target size is reached.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod synthesis;
pub mod types;

pub use error::{ApiError, ApiResult, SynthesisError};
pub use synthesis::Synthesizer;

use types::ModelClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Synthesis engine
    pub synthesizer: Arc<Synthesizer>,
    /// Model client for the raw prompt pass-through
    pub model: Arc<dyn ModelClient>,
    /// Target size used when a request omits one
    pub default_target_size: usize,
    /// Service start time (for uptime)
    pub startup_time: DateTime<Utc>,
    /// Most recent synthesis failure, reported by /health
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        synthesizer: Arc<Synthesizer>,
        model: Arc<dyn ModelClient>,
        default_target_size: usize,
    ) -> Self {
        Self {
            synthesizer,
            model,
            default_target_size,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember a service-side failure for the health endpoint
    ///
    /// Rejected client input is not recorded.
    pub async fn record_error(&self, err: &SynthesisError) {
        if !matches!(
            err,
            SynthesisError::ModelFailure(_)
                | SynthesisError::Exhausted { .. }
                | SynthesisError::MaterializeFailure(_)
        ) {
            return;
        }
        tracing::warn!(error = %err, "Synthesis failed");
        *self.last_error.write().await = Some(err.to_string());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::playlist_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
