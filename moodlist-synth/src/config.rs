//! Configuration resolution for moodlist-synth
//!
//! Provides multi-tier model API key resolution with ENV → TOML priority.

use moodlist_common::config::TomlConfig;
use moodlist_common::{Error, Result};
use tracing::{info, warn};

/// Primary environment variable for the model API key
pub const MODEL_API_KEY_ENV: &str = "MOODLIST_MODEL_API_KEY";

/// Provider's conventional variable, honoured for drop-in `.env` files
pub const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Resolve the model API key
///
/// **Priority:** `MOODLIST_MODEL_API_KEY` → `OPENROUTER_API_KEY` → TOML
pub fn resolve_model_api_key(toml_config: &TomlConfig) -> Result<String> {
    let candidates = [
        ("MOODLIST_MODEL_API_KEY", std::env::var(MODEL_API_KEY_ENV).ok()),
        ("OPENROUTER_API_KEY", std::env::var(OPENROUTER_API_KEY_ENV).ok()),
        ("TOML", toml_config.model.api_key.clone()),
    ];

    let sources: Vec<&str> = candidates
        .iter()
        .filter(|(_, key)| key.as_deref().is_some_and(is_valid_key))
        .map(|(source, _)| *source)
        .collect();

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Model API key found in multiple sources: {}. Using {}.",
            sources.join(", "),
            sources[0]
        );
    }

    for (source, key) in candidates {
        if let Some(key) = key {
            if is_valid_key(&key) {
                info!("Model API key loaded from {}", source);
                return Ok(key.trim().to_string());
            }
        }
    }

    Err(Error::Config(
        "Model API key not configured. Please configure using one of:\n\
         1. Environment: MOODLIST_MODEL_API_KEY=your-key-here\n\
         2. Environment: OPENROUTER_API_KEY=your-key-here\n\
         3. TOML config: [model] api_key = \"your-key\""
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
