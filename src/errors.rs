use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmragError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Chat features are disabled: no API key configured")]
    ChatDisabled,

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed prediction string: {0}")]
    MalformedPrediction(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FarmragError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FarmragError>;
