use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChatError, ChatResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// How long the `/api/tags` probe waits before declaring Ollama offline
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

/// Sampling parameters sent with every generation
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 1000,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsModel {
    name: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagsModel>,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    options: SamplingOptions,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            options: SamplingOptions::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the model for a single, non-streamed completion of `prompt`.
    pub async fn generate(&self, model: &str, prompt: &str) -> ChatResult<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: self.options,
        };

        debug!(%url, model, prompt_chars = prompt.chars().count(), "sending generate request");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> ChatResult<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status()));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    pub async fn is_running(&self) -> bool {
        self.list_models().await.is_ok()
    }
}
