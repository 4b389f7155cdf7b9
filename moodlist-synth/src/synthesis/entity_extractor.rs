//! Entity extraction for the recommendation path
//!
//! Asks the model to turn a sentence into `{artists, songs, keywords}`.
//! Never fails: model errors and unusable output produce empty entities.

use crate::types::{Entities, ModelClient};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));

pub struct EntityExtractor {
    model: Arc<dyn ModelClient>,
}

impl EntityExtractor {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    /// Extract entities from a sentence
    pub async fn extract(&self, sentence: &str) -> Entities {
        let prompt = extraction_prompt(sentence);

        let raw = match self.model.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Entity extraction model call failed");
                return Entities::default();
            }
        };

        match parse_entities(&raw) {
            Some(entities) => {
                debug!(
                    artists = entities.artists.len(),
                    songs = entities.songs.len(),
                    keywords = entities.keywords.len(),
                    "Extracted entities"
                );
                entities
            }
            None => {
                warn!(raw_len = raw.len(), "Entity extraction returned unparsable output");
                Entities::default()
            }
        }
    }
}

fn extraction_prompt(sentence: &str) -> String {
    format!(
        "Extract music entities from the sentence below.\n\
         Respond with one JSON object and nothing else, using exactly these keys:\n\
         {{\"artists\": [\"...\"], \"songs\": [\"...\"], \"keywords\": [\"...\"]}}\n\
         - artists: artist or band names mentioned\n\
         - songs: song titles mentioned\n\
         - keywords: genres, moods, or activities\n\
         Use empty arrays for anything not present.\n\
         \n\
         Sentence: {sentence}\n"
    )
}

/// Parse the model's raw text into entities
///
/// Tries the largest `{...}` span with trailing commas removed, then the
/// whole text as-is.
pub fn parse_entities(raw: &str) -> Option<Entities> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            let span = TRAILING_COMMA.replace_all(&trimmed[start..=end], "$1");
            if let Ok(entities) = serde_json::from_str::<Entities>(&span) {
                return Some(entities);
            }
        }
    }

    serde_json::from_str::<Entities>(trimmed).ok()
}
