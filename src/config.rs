use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Base URL of the vector-index service.
    pub endpoint: String,
    /// Passages requested per retrieval.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Bound on every retrieval/generation call; elapsed counts as failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_top_k() -> usize {
    crate::DEFAULT_TOP_K
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub llm_endpoint: String,
    /// Empty key disables chat features (degraded mode, never an error).
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub disease_endpoint: String,
    pub produce_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    pub endpoint: String,
    #[serde(default = "default_whisper_model")]
    pub model: String,
}

fn default_whisper_model() -> String {
    "whisper-1".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub knowledge_base: KnowledgeBaseConfig,
    pub llm: LlmConfig,
    pub classifier: ClassifierConfig,
    pub audio: AudioConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::FarmragError::Io)?;

        let config: AppConfig =
            toml::from_str(&content).map_err(crate::FarmragError::TomlParsing)?;

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::FarmragError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get knowledge base endpoint
    pub fn knowledge_base_endpoint(&self) -> &str {
        &self.knowledge_base.endpoint
    }

    /// Get passages requested per retrieval
    pub fn top_k(&self) -> usize {
        self.knowledge_base.top_k
    }

    /// Get per-call timeout in seconds
    pub fn timeout_secs(&self) -> u64 {
        self.knowledge_base.timeout_secs
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Whether chat features are enabled (an LLM key is configured)
    pub fn chat_enabled(&self) -> bool {
        !self.llm.llm_key.trim().is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            knowledge_base: KnowledgeBaseConfig {
                endpoint: "http://localhost:8000".to_string(),
                top_k: default_top_k(),
                timeout_secs: default_timeout_secs(),
            },
            llm: LlmConfig {
                llm_endpoint: "http://localhost:11434".to_string(),
                llm_key: "ollama".to_string(),
                llm_model: default_llm_model(),
            },
            classifier: ClassifierConfig {
                disease_endpoint: "http://localhost:8501/classify/disease".to_string(),
                produce_endpoint: "http://localhost:8501/classify/produce".to_string(),
            },
            audio: AudioConfig {
                endpoint: "http://localhost:8502/v1/audio/transcriptions".to_string(),
                model: default_whisper_model(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [logging]
            level = "debug"
            backtrace = false

            [knowledge_base]
            endpoint = "http://kb:8000"
            top_k = 5
            timeout_secs = 10

            [llm]
            llm_endpoint = "http://llm:11434"
            llm_key = "sk-test"
            llm_model = "gpt-4"

            [classifier]
            disease_endpoint = "http://cls/disease"
            produce_endpoint = "http://cls/produce"

            [audio]
            endpoint = "http://audio/transcribe"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.top_k(), 5);
        assert_eq!(config.timeout_secs(), 10);
        assert_eq!(config.llm_model(), "gpt-4");
        assert_eq!(config.audio.model, "whisper-1");
        assert!(config.chat_enabled());
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let toml_str = r#"
            [logging]
            level = "info"
            backtrace = true

            [knowledge_base]
            endpoint = "http://kb:8000"

            [llm]
            llm_endpoint = "http://llm:11434"
            llm_key = ""

            [classifier]
            disease_endpoint = "http://cls/disease"
            produce_endpoint = "http://cls/produce"

            [audio]
            endpoint = "http://audio/transcribe"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.top_k(), crate::DEFAULT_TOP_K);
        assert_eq!(config.timeout_secs(), 30);
        assert!(!config.chat_enabled());
    }
}
