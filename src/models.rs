//! Shared data types for the farming assistant

use serde::Deserialize;
use serde::Serialize;

/// A retrieved unit of indexed document text with source attribution.
///
/// Produced by the knowledge-base service and immutable once returned;
/// the dialogue core only reads and reformats its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// Text body of the passage
    pub body: String,
    /// Name of the document the passage came from (may be empty)
    pub source_document: String,
    /// 1-based page number within the source document, when known
    pub page_number: Option<u32>,
}

impl Passage {
    pub fn new(body: impl Into<String>, source_document: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            source_document: source_document.into(),
            page_number: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page_number = Some(page);
        self
    }
}

/// One (user, assistant) turn pair in a chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

impl Exchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Chronologically ordered chat transcript. The UI owns its lifecycle;
/// the orchestrator appends at most one exchange per call.
pub type Transcript = Vec<Exchange>;

/// Output of an image classifier: top label with its confidence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Render as the display string the UI shows above classification results.
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "**Prediction: {}** ({:.1}%)",
            self.label,
            self.confidence * 100.0
        )
    }
}

/// A pre-chunked document submitted for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestDocument {
    pub body: String,
    pub source_document: String,
    pub page_number: Option<u32>,
}
