//! Audio transcription client

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use reqwest::Client;
use tracing::debug;

use crate::config::AppConfig;
use crate::errors::FarmragError;
use crate::errors::Result;

/// Notice returned instead of attempting I/O when no API key is configured.
pub const TRANSCRIPTION_DISABLED_NOTICE: &str =
    "No API key configured. Audio transcription is disabled.";

/// Contract for speech-to-text transcription.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// Whisper-style transcription endpoint client (multipart file upload).
pub struct WhisperClient {
    endpoint: String,
    key: String,
    model: String,
    client: Client,
}

impl WhisperClient {
    /// Create a new transcription client from configuration
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| FarmragError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: config.audio.endpoint.clone(),
            key: config.llm_key().to_string(),
            model: config.audio.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        if self.key.trim().is_empty() {
            return Ok(TRANSCRIPTION_DISABLED_NOTICE.to_string());
        }

        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map_or_else(|| "audio".to_string(), |n| n.to_string_lossy().into_owned());
        debug!("Transcribing {} ({} bytes)", file_name, bytes.len());

        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmragError::Transcription(format!(
                "transcription failed with status {status}: {body}"
            )));
        }

        Ok(response.text().await?)
    }
}
