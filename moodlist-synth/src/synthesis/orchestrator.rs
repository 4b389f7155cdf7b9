//! Bounded generate → parse → resolve loop
//!
//! # State Progression
//! GENERATING → PARSING → RESOLVING, looping until the target is met or the
//! attempt budget runs out. Terminal states: SUCCESS, EXHAUSTED, MODEL_FAILURE.
//!
//! # Retry Policy
//! A failed model call aborts the run immediately. An unparseable response
//! only costs one attempt. The exclusion set carries across attempts so a
//! candidate is queried at most once per run, and the next prompt asks the
//! model to avoid everything already tried.

use super::exclusion::ExclusionSet;
use super::prompt_builder;
use super::response_parser;
use super::track_resolver::TrackResolver;
use crate::error::SynthesisError;
use crate::types::{CatalogSession, ModelClient, ResolvedTrack, ThemeRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default generation attempts per run
pub const DEFAULT_ATTEMPT_BUDGET: u32 = 3;

/// Orchestrator states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Generating,
    Parsing,
    Resolving,
    Success,
    Exhausted,
    ModelFailure,
}

/// Per-attempt diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSummary {
    pub attempt: u32,
    /// Candidates parsed from the model response
    pub candidates: usize,
    /// Tracks newly accumulated in this attempt
    pub resolved: usize,
    /// Exclusion set size after the attempt
    pub excluded: usize,
}

/// Result of a run that did not hit a model failure
#[derive(Debug, Clone)]
pub struct RunReport {
    /// `Success` or `Exhausted`
    pub state: RunState,
    /// Resolved tracks in acceptance order, at most the target size
    pub tracks: Vec<ResolvedTrack>,
    pub target_size: usize,
    pub attempts: u32,
    pub exclusions: ExclusionSet,
    pub attempt_log: Vec<AttemptSummary>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.state == RunState::Success
    }

    /// The tracks of a successful run, or `Exhausted` with diagnostic counts
    pub fn into_tracks(self) -> Result<Vec<ResolvedTrack>, SynthesisError> {
        if self.is_success() {
            Ok(self.tracks)
        } else {
            Err(SynthesisError::Exhausted {
                found: self.tracks.len(),
                target: self.target_size,
                attempts: self.attempts,
            })
        }
    }
}

/// State owned by one run
struct Run {
    id: Uuid,
    state: RunState,
    exclusions: ExclusionSet,
    resolved: Vec<ResolvedTrack>,
    attempts: u32,
    attempt_log: Vec<AttemptSummary>,
}

impl Run {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RunState::Generating,
            exclusions: ExclusionSet::new(),
            resolved: Vec::new(),
            attempts: 0,
            attempt_log: Vec::new(),
        }
    }

    fn transition(&mut self, next: RunState) {
        debug!(run_id = %self.id, from = ?self.state, to = ?next, "Run state transition");
        self.state = next;
    }
}

pub struct Orchestrator {
    model: Arc<dyn ModelClient>,
    resolver: TrackResolver,
    attempt_budget: u32,
}

impl Orchestrator {
    /// Create an orchestrator; a zero budget is raised to one attempt
    pub fn new(model: Arc<dyn ModelClient>, resolver: TrackResolver, attempt_budget: u32) -> Self {
        Self {
            model,
            resolver,
            attempt_budget: attempt_budget.max(1),
        }
    }

    /// Run the retry loop for one request
    ///
    /// # Errors
    /// `SynthesisError::ModelFailure` as soon as a model call fails. Running
    /// out of attempts is not an error here; see [`RunReport::into_tracks`].
    pub async fn run(
        &self,
        request: &ThemeRequest,
        session: &CatalogSession,
    ) -> Result<RunReport, SynthesisError> {
        let target_size = request.target_size();
        let mut run = Run::new();

        info!(
            run_id = %run.id,
            theme = %request.theme(),
            target_size,
            budget = self.attempt_budget,
            "Starting synthesis run"
        );

        while run.resolved.len() < target_size && run.attempts < self.attempt_budget {
            run.attempts += 1;
            let attempt = run.attempts;
            let found_before = run.resolved.len();

            run.transition(RunState::Generating);
            let prompt = prompt_builder::build(request.theme(), target_size, run.exclusions.keys());
            let text = match self.model.complete(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    run.transition(RunState::ModelFailure);
                    warn!(run_id = %run.id, attempt, error = %e, "Model call failed, aborting run");
                    return Err(SynthesisError::ModelFailure(e));
                }
            };

            run.transition(RunState::Parsing);
            let outcome = response_parser::parse_with_strategy(&text);
            debug!(
                run_id = %run.id,
                attempt,
                candidates = outcome.candidates.len(),
                strategy = ?outcome.strategy,
                "Parsed model response"
            );

            if !outcome.candidates.is_empty() {
                run.transition(RunState::Resolving);
                for candidate in &outcome.candidates {
                    if run.resolved.len() >= target_size {
                        break;
                    }
                    let Some(track) = self
                        .resolver
                        .resolve(candidate, &mut run.exclusions, session)
                        .await
                    else {
                        continue;
                    };
                    if run.resolved.iter().any(|t| t.uri == track.uri) {
                        debug!(run_id = %run.id, uri = %track.uri, "Track already accumulated");
                        continue;
                    }
                    run.resolved.push(track);
                }
            }

            let summary = AttemptSummary {
                attempt,
                candidates: outcome.candidates.len(),
                resolved: run.resolved.len() - found_before,
                excluded: run.exclusions.len(),
            };
            info!(
                run_id = %run.id,
                attempt,
                candidates = summary.candidates,
                resolved = summary.resolved,
                total = run.resolved.len(),
                target_size,
                "Attempt finished"
            );
            run.attempt_log.push(summary);
        }

        run.resolved.truncate(target_size);
        let state = if run.resolved.len() >= target_size {
            RunState::Success
        } else {
            RunState::Exhausted
        };
        run.transition(state);

        info!(
            run_id = %run.id,
            state = ?state,
            found = run.resolved.len(),
            target_size,
            attempts = run.attempts,
            "Synthesis run finished"
        );

        Ok(RunReport {
            state,
            tracks: run.resolved,
            target_size,
            attempts: run.attempts,
            exclusions: run.exclusions,
            attempt_log: run.attempt_log,
        })
    }
}
