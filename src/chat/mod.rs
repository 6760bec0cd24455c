//! Conversational dialogue core
//!
//! This module carries the state machine at the heart of the assistant:
//! - Follow-up detection and query rewriting against the current topic
//! - Retrieval with source attribution
//! - An ordered fallback strategy chain (retrieval, grounded generation,
//!   sourced generation, apology)
//! - Bounded per-session conversation context
//!
//! # Examples
//!
//! ```rust,no_run
//! use farmrag::chat::ChatService;
//! use farmrag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = ChatService::from_config(&config)?;
//!
//!     let transcript = service.respond("cli", "How do I treat bean rust?", Vec::new()).await;
//!     println!("{}", transcript.last().unwrap().assistant);
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod orchestrator;
pub mod sources;
pub mod topic;

pub use context::ContextStore;
pub use context::ConversationContext;
pub use orchestrator::DialogueOrchestrator;
pub use orchestrator::Strategy;
pub use orchestrator::DISABLED_NOTICE;
pub use orchestrator::REDIRECT_MESSAGE;
pub use sources::format_sources;
pub use topic::extract_topic;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::llm::Generator;
use crate::llm::LlmService;
use crate::models::Transcript;
use crate::rag::KnowledgeBaseClient;
use crate::rag::PassageRetriever;

/// Session-keyed chat entry point: owns the orchestrator and one
/// [`ConversationContext`] per session.
pub struct ChatService {
    orchestrator: DialogueOrchestrator,
    contexts: ContextStore,
}

impl ChatService {
    /// Build from explicit collaborators (used by tests and embedders).
    pub fn new(orchestrator: DialogueOrchestrator) -> Self {
        Self {
            orchestrator,
            contexts: ContextStore::new(),
        }
    }

    /// Build the production service from configuration.
    ///
    /// A missing LLM key yields a degraded service whose every call appends a
    /// disabled-feature notice instead of attempting I/O.
    ///
    /// # Errors
    /// - HTTP client build errors (invalid endpoints)
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if !config.chat_enabled() {
            return Ok(Self::new(DialogueOrchestrator::disabled()));
        }

        let retriever: Arc<dyn PassageRetriever> =
            Arc::new(KnowledgeBaseClient::new(config.knowledge_base_endpoint())?);
        let generator: Arc<dyn Generator> = Arc::new(LlmService::new(config)?);

        Ok(Self::new(DialogueOrchestrator::new(
            retriever,
            generator,
            config.top_k(),
            Duration::from_secs(config.timeout_secs()),
        )))
    }

    /// Handle one user turn for a session, returning the updated transcript.
    pub async fn respond(
        &self,
        session: &str,
        user_message: &str,
        transcript: Transcript,
    ) -> Transcript {
        let mut ctx = self.contexts.get(session);
        let transcript = self
            .orchestrator
            .respond(&mut ctx, user_message, transcript)
            .await;
        self.contexts.put(session, ctx);
        transcript
    }

    /// Reset a session's conversation context and return an empty transcript.
    /// Bound to an explicit user action only.
    pub fn clear(&self, session: &str) -> Transcript {
        self.contexts.reset(session);
        Vec::new()
    }
}
