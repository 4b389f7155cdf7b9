//! Playlist synthesis engine
//!
//! Two flows share the same catalog and model collaborators:
//! - **Theme → playlist:** [`Orchestrator`] generates, parses and resolves
//!   songs, then [`PlaylistMaterializer`] creates the playlist.
//! - **Sentence → recommended playlist:** [`EntityExtractor`] →
//!   [`SeedValidator`] → [`RecommendationEngine`] → materialize.

pub mod entity_extractor;
pub mod exclusion;
pub mod materializer;
pub mod orchestrator;
pub mod prompt_builder;
pub mod recommendation;
pub mod response_parser;
pub mod seed_validator;
pub mod track_resolver;

pub use entity_extractor::EntityExtractor;
pub use exclusion::ExclusionSet;
pub use materializer::PlaylistMaterializer;
pub use orchestrator::{Orchestrator, RunReport, RunState};
pub use recommendation::RecommendationEngine;
pub use seed_validator::SeedValidator;
pub use track_resolver::TrackResolver;

use crate::error::SynthesisError;
use crate::types::{
    CatalogClient, CatalogSession, ModelClient, PlaylistResult, ResolvedTrack, Seeds,
    ThemeRequest,
};
use moodlist_common::config::SynthesisConfig;
use std::sync::Arc;
use tracing::info;

/// Track seeds taken from a partial run when topping up with recommendations
const TOP_UP_TRACK_SEEDS: usize = 2;

/// Wires the engine components to one model and one catalog
pub struct Synthesizer {
    catalog: Arc<dyn CatalogClient>,
    orchestrator: Orchestrator,
    extractor: EntityExtractor,
    validator: SeedValidator,
    recommender: RecommendationEngine,
    materializer: PlaylistMaterializer,
    recommendation_fallback: bool,
}

impl Synthesizer {
    pub fn new(
        model: Arc<dyn ModelClient>,
        catalog: Arc<dyn CatalogClient>,
        config: &SynthesisConfig,
    ) -> Self {
        Self {
            orchestrator: Orchestrator::new(
                model.clone(),
                TrackResolver::new(catalog.clone()),
                config.attempt_budget,
            ),
            extractor: EntityExtractor::new(model),
            validator: SeedValidator::new(catalog.clone()),
            recommender: RecommendationEngine::with_seed(catalog.clone(), config.random_seed),
            materializer: PlaylistMaterializer::new(catalog.clone(), config.playlist_name_max_len),
            recommendation_fallback: config.recommendation_fallback,
            catalog,
        }
    }

    /// Theme → playlist
    ///
    /// # Errors
    /// - `ModelFailure` when a model call fails (no retry)
    /// - `Exhausted` when fewer than the target size could be resolved
    /// - `MaterializeFailure` when playlist creation fails
    pub async fn synthesize(
        &self,
        request: &ThemeRequest,
        session: &CatalogSession,
    ) -> Result<PlaylistResult, SynthesisError> {
        let report = self.orchestrator.run(request, session).await?;
        let attempts = report.attempts;

        let tracks = if report.is_success() || !self.recommendation_fallback {
            report.into_tracks()?
        } else {
            self.top_up(report, session).await?
        };

        let mut result = self.materialize(request.theme(), tracks, session).await?;
        result.attempts = attempts;
        Ok(result)
    }

    /// Sentence → recommended playlist
    ///
    /// A non-empty recommendation list shorter than the target is accepted.
    ///
    /// # Errors
    /// - `InvalidRequest` for an empty sentence or zero target size
    /// - `Exhausted` when the catalog recommends nothing
    /// - `MaterializeFailure` when playlist creation fails
    pub async fn recommend(
        &self,
        sentence: &str,
        target_size: usize,
        session: &CatalogSession,
    ) -> Result<PlaylistResult, SynthesisError> {
        let request = ThemeRequest::new(sentence, target_size)?;

        let entities = self.extractor.extract(request.theme()).await;
        if entities.is_empty() {
            info!("No entities extracted, recommendations will use a fallback genre");
        }
        let seeds = self.validator.validate(&entities, session).await;
        let recommended = self
            .recommender
            .recommend(&seeds, request.target_size(), session)
            .await;

        let mut tracks: Vec<ResolvedTrack> = Vec::new();
        for track in &recommended {
            if tracks.len() >= request.target_size() {
                break;
            }
            if !tracks.iter().any(|t| t.uri == track.uri) {
                tracks.push(ResolvedTrack::from(track));
            }
        }

        if tracks.is_empty() {
            return Err(SynthesisError::Exhausted {
                found: 0,
                target: request.target_size(),
                attempts: 0,
            });
        }

        self.materialize(request.theme(), tracks, session).await
    }

    /// Fill an exhausted run with recommendations seeded by its own tracks
    async fn top_up(
        &self,
        report: RunReport,
        session: &CatalogSession,
    ) -> Result<Vec<ResolvedTrack>, SynthesisError> {
        if report.tracks.is_empty() {
            return report.into_tracks();
        }

        let target = report.target_size;
        let mut tracks = report.tracks.clone();
        let seeds = Seeds {
            track_ids: tracks
                .iter()
                .take(TOP_UP_TRACK_SEEDS)
                .map(|t| t.catalog_id.clone())
                .collect(),
            ..Default::default()
        };

        // Recommendations may overlap resolved tracks
        let recommended = self.recommender.recommend(&seeds, target, session).await;
        for track in &recommended {
            if tracks.len() >= target {
                break;
            }
            if !tracks.iter().any(|t| t.uri == track.uri) {
                tracks.push(ResolvedTrack::from(track));
            }
        }

        info!(
            before = report.tracks.len(),
            after = tracks.len(),
            target_size = target,
            "Topped up exhausted run with recommendations"
        );

        if tracks.len() < target {
            return Err(SynthesisError::Exhausted {
                found: tracks.len(),
                target,
                attempts: report.attempts,
            });
        }
        Ok(tracks)
    }

    async fn materialize(
        &self,
        theme: &str,
        tracks: Vec<ResolvedTrack>,
        session: &CatalogSession,
    ) -> Result<PlaylistResult, SynthesisError> {
        let user = self
            .catalog
            .get_me(session)
            .await
            .map_err(SynthesisError::MaterializeFailure)?;
        self.materializer
            .materialize(&user.id, theme, tracks, session)
            .await
    }
}
