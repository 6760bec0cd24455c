//! Image classification and the image-to-question bridge
//!
//! Classification itself is an opaque service: an image goes in, a label and
//! confidence come out. This module holds the [`Classifier`] contract, a thin
//! HTTP implementation, and the bridge that turns a formatted prediction into
//! a synthesized chat question which re-enters the dialogue core exactly like
//! a typed message.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::FarmragError;
use crate::errors::Result;
use crate::models::Prediction;

/// Contract for image classification. Two configured instances exist: a
/// disease classifier and a generic fruit/vegetable classifier.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image_path: &Path) -> Result<Prediction>;
}

/// HTTP client posting raw image bytes to an inference endpoint that answers
/// with scored labels.
pub struct HttpClassifier {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ScoredLabel {
    label: String,
    score: f32,
}

impl HttpClassifier {
    /// Create a new classifier client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| FarmragError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image_path: &Path) -> Result<Prediction> {
        let bytes = tokio::fs::read(image_path).await?;
        debug!(
            "Classifying {} ({} bytes) via {}",
            image_path.display(),
            bytes.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmragError::Classifier(format!(
                "classification failed with status {status}: {body}"
            )));
        }

        let scored: Vec<ScoredLabel> = response.json().await?;
        let best = scored
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| FarmragError::Classifier("no labels returned".to_string()))?;

        Ok(Prediction::new(best.label, best.score))
    }
}

/// Parse a formatted prediction string, `"**Prediction: {name}** ({confidence})"`.
///
/// The confidence may carry a trailing `%`, in which case it is scaled to
/// `0.0..=1.0`. Anything that does not match the pattern is a
/// [`FarmragError::MalformedPrediction`]; callers must surface it as a
/// visible notice rather than feed malformed input into the chat.
pub fn parse_prediction(formatted: &str) -> Result<Prediction> {
    let malformed = || FarmragError::MalformedPrediction(formatted.to_string());

    let rest = formatted.strip_prefix("**Prediction: ").ok_or_else(malformed)?;
    let (label, rest) = rest.split_once("**").ok_or_else(malformed)?;
    let label = label.trim();
    if label.is_empty() {
        return Err(malformed());
    }

    let inner = rest
        .trim()
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(malformed)?;
    let (value, scale) = match inner.strip_suffix('%') {
        Some(v) => (v, 100.0),
        None => (inner, 1.0),
    };
    let confidence: f32 = value.trim().parse().map_err(|_| malformed())?;

    Ok(Prediction::new(label, confidence / scale))
}

/// Bridge a disease-classifier prediction string into a chat question.
pub fn disease_question(formatted: &str) -> Result<String> {
    let prediction = parse_prediction(formatted)?;
    Ok(format!(
        "give me description about this disease: {}",
        prediction.label
    ))
}

/// Bridge a produce-classifier label into a chat question.
#[must_use]
pub fn produce_question(label: &str) -> String {
    format!("How can I grow {label}?")
}

const TREATMENT_TIPS: &[(&str, &str)] = &[
    (
        "angular leaf spot",
        "• Remove infected leaves\n• Apply copper-based fungicides\n• Ensure proper spacing between plants\n• Avoid overhead irrigation",
    ),
    (
        "bean rust",
        "• Apply fungicides at first sign of infection\n• Plant resistant varieties\n• Remove infected plant debris\n• Rotate crops",
    ),
    (
        "healthy",
        "• Continue regular monitoring\n• Maintain balanced fertilization\n• Water appropriately\n• Practice crop rotation",
    ),
];

const DEFAULT_TIPS: &str = "• Remove infected plant material\n• Consider appropriate fungicides\n• Ensure good air circulation\n• Avoid overhead watering\n• Practice crop rotation";

/// Canned treatment recommendations, matched per disease with a partial-match
/// fallback and generic default tips.
#[must_use]
pub fn treatment_tips(disease: &str) -> &'static str {
    let lower = disease.to_lowercase();

    for (name, tips) in TREATMENT_TIPS {
        if lower == *name || lower.contains(name) {
            return tips;
        }
    }

    DEFAULT_TIPS
}
