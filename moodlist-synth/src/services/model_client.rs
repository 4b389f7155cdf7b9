//! Chat-completions model client
//!
//! Talks to an OpenRouter-compatible `/chat/completions` endpoint. Each
//! prompt is sent as a single user message and the first choice's message
//! content is returned.

use crate::types::{ModelClient, ModelError};
use async_trait::async_trait;
use moodlist_common::config::ModelConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Message in a chat request
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenRouterClient {
    http_client: Client,
    completions_url: String,
    model: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(config: &ModelConfig, api_key: String) -> Result<Self, ModelError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            completions_url: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Pull the first choice's text out of a response body
    fn extract_content(response: ChatResponse) -> Result<String, ModelError> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .ok_or(ModelError::MissingMessage)?
            .content
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(content)
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending model request");

        let response = self
            .http_client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout
                } else {
                    ModelError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ModelError::Api(status.as_u16(), error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Parse(e.to_string()))?;

        let content = Self::extract_content(body)?;
        debug!(response_len = content.len(), "Model response received");
        Ok(content)
    }
}
