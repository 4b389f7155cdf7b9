//! Scripted model client
//!
//! Replays a fixed queue of responses and records every prompt it receives.

use async_trait::async_trait;
use moodlist_synth::types::{ModelClient, ModelError};
use std::collections::VecDeque;
use std::sync::Mutex;

pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, error: ModelError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Api(500, "script exhausted".to_string())))
    }
}

/// Numbered `"N. Title - Artist"` list
pub fn numbered_list(songs: &[(&str, &str)]) -> String {
    songs
        .iter()
        .enumerate()
        .map(|(i, (title, artist))| format!("{}. {} - {}", i + 1, title, artist))
        .collect::<Vec<_>>()
        .join("\n")
}
