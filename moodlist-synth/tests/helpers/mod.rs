//! Test Helper Utilities
//!
//! Scripted collaborators for exercising the synthesis engine without
//! network access.

#![allow(dead_code)]

pub mod fake_catalog;
pub mod fake_model;

pub use fake_catalog::{query_for, track, CreatedPlaylist, FakeCatalog, TEST_USER_ID};
pub use fake_model::{numbered_list, ScriptedModel};

use moodlist_common::config::SynthesisConfig;
use moodlist_synth::types::CatalogSession;
use moodlist_synth::Synthesizer;
use std::sync::Arc;

pub fn test_session() -> CatalogSession {
    CatalogSession::new("test-access-token")
}

/// Synthesis settings with a fixed random seed
pub fn test_config() -> SynthesisConfig {
    SynthesisConfig {
        random_seed: Some(42),
        ..Default::default()
    }
}

pub fn synthesizer(
    model: &Arc<ScriptedModel>,
    catalog: &Arc<FakeCatalog>,
    config: &SynthesisConfig,
) -> Synthesizer {
    Synthesizer::new(model.clone(), catalog.clone(), config)
}
