//! Generative fallback backend
//!
//! Used only when retrieval comes back empty or fails; answers produced here
//! carry no guarantee of being grounded in retrieved context. The production
//! implementation speaks the OpenAI-compatible chat-completions protocol.

pub mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::FarmragError;
use crate::errors::Result;

/// Contract for best-effort free-text completion.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// OpenAI-compatible chat-completions client.
pub struct LlmService {
    endpoint: String,
    key: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl LlmService {
    /// Create a new LLM service from configuration
    ///
    /// # Errors
    /// - `ChatDisabled` when no API key is configured
    /// - HTTP client build errors (invalid configuration)
    pub fn new(config: &AppConfig) -> Result<Self> {
        if !config.chat_enabled() {
            return Err(FarmragError::ChatDisabled);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| FarmragError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: config.llm_endpoint().to_string(),
            key: config.llm_key().to_string(),
            model: config.llm_model().to_string(),
            client,
        })
    }
}

#[async_trait]
impl Generator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        debug!("Generating completion via {} ({})", url, self.model);

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            // Deterministic responses for consistent farming advice
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmragError::Llm(format!(
                "completion failed with status {status}: {body}"
            )));
        }

        let parsed: CompletionResponse = response.json().await?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| FarmragError::Llm("completion returned no choices".to_string()))?;

        Ok(answer)
    }
}
