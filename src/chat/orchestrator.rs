//! Dialogue orchestration: per-turn branching and fallback
//!
//! Each call is one pass through a decision tree: classify the message as a
//! follow-up or a fresh query, rewrite it if needed, then work through an
//! ordered chain of named strategies until one produces a reply. Failures are
//! absorbed into assistant-visible text; `respond` never surfaces an error to
//! the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::chat::context::ConversationContext;
use crate::chat::sources::format_sources;
use crate::chat::topic::extract_topic;
use crate::chat::topic::is_farming_related;
use crate::chat::topic::is_follow_up;
use crate::chat::topic::is_off_topic;
use crate::errors::FarmragError;
use crate::errors::Result;
use crate::llm::prompts;
use crate::llm::Generator;
use crate::models::Exchange;
use crate::models::Passage;
use crate::models::Transcript;
use crate::rag::PassageRetriever;

/// Assistant turn appended when no LLM API key is configured.
pub const DISABLED_NOTICE: &str = "No LLM API key configured. Chat features are disabled.";

/// Fixed reply declining explicitly off-topic queries.
pub const REDIRECT_MESSAGE: &str = "I'm specifically designed to help with farming and \
     plant-related questions. For this topic, I recommend using a general-purpose assistant \
     or a specialized tool. Can I help you with any farming or gardening questions instead?";

/// Named fallback strategies for a fresh (non-follow-up) query, attempted in
/// order until one produces a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Answer from indexed passages, with citations attached.
    DirectRetrieval,
    /// Generate with an instruction to use only knowledge-base information.
    /// Backs up an empty retrieval result.
    GroundedGeneration,
    /// Generate with an instruction to include sources. Backs up a failed
    /// retrieval or a failed grounded generation.
    SourcedGeneration,
    /// Plain generation from the raw message. Its errors propagate to the
    /// outer fallback.
    GeneralGeneration,
    /// Fixed apology surfacing the underlying failure. Always succeeds.
    Apology,
}

/// Farming-relevant queries must answer from the indexed corpus first.
const FARMING_CHAIN: &[Strategy] = &[
    Strategy::DirectRetrieval,
    Strategy::GroundedGeneration,
    Strategy::SourcedGeneration,
    Strategy::Apology,
];

/// Queries outside the farming keyword set but not explicitly off-topic.
const GENERAL_CHAIN: &[Strategy] = &[Strategy::DirectRetrieval, Strategy::GeneralGeneration];

struct Backend {
    retriever: Arc<dyn PassageRetriever>,
    generator: Arc<dyn Generator>,
}

/// The conversational core. Stateless between calls except for the
/// [`ConversationContext`] read and written at the call boundary.
pub struct DialogueOrchestrator {
    backend: Option<Backend>,
    top_k: usize,
    call_timeout: Duration,
}

impl DialogueOrchestrator {
    pub fn new(
        retriever: Arc<dyn PassageRetriever>,
        generator: Arc<dyn Generator>,
        top_k: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            backend: Some(Backend {
                retriever,
                generator,
            }),
            top_k,
            call_timeout,
        }
    }

    /// Orchestrator for the degraded mode: no backend credentials, every call
    /// short-circuits to a disabled-feature notice without any I/O.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            backend: None,
            top_k: crate::DEFAULT_TOP_K,
            call_timeout: Duration::from_secs(30),
        }
    }

    /// Handle one user turn.
    ///
    /// Appends exactly one exchange to the transcript and records it in the
    /// conversation context; an empty message returns the transcript
    /// unchanged. Conversational failures become assistant text, never `Err`.
    pub async fn respond(
        &self,
        ctx: &mut ConversationContext,
        user_message: &str,
        mut transcript: Transcript,
    ) -> Transcript {
        if user_message.trim().is_empty() {
            return transcript;
        }

        info!("Processing chat turn: {user_message}");

        let response = match &self.backend {
            None => DISABLED_NOTICE.to_string(),
            Some(backend) => match self.dispatch(backend, ctx, user_message).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Chat turn failed, retrying with raw retrieval: {e}");
                    self.last_resort(backend, user_message, &e).await
                }
            },
        };

        ctx.record_exchange(user_message, response.clone());
        transcript.push(Exchange::new(user_message, response));
        transcript
    }

    /// Pick the branch for this turn. The follow-up branch requires an
    /// existing topic; without one, even a follow-up-shaped message is
    /// handled as a fresh query.
    async fn dispatch(
        &self,
        backend: &Backend,
        ctx: &mut ConversationContext,
        message: &str,
    ) -> Result<String> {
        if is_follow_up(message) {
            if let Some(topic) = ctx.last_topic().map(str::to_string) {
                debug!("Follow-up detected, reusing topic: {topic}");
                return Ok(self.follow_up(backend, message, &topic).await);
            }
        }

        // Extract before the strategies run, record only once they complete.
        let topic = extract_topic(message);
        let response = self.fresh_query(backend, message).await?;
        ctx.record_topic(topic);
        Ok(response)
    }

    /// Follow-up branch: rewrite against the current topic and retrieve.
    /// The topic is not re-extracted here; follow-ups reuse the existing one.
    async fn follow_up(&self, backend: &Backend, message: &str, topic: &str) -> String {
        let query = rewrite_follow_up(message, topic);
        debug!("Follow-up rewrite: '{message}' -> '{query}'");

        match self.retrieve(backend, &query).await {
            Ok(passages) if !passages.is_empty() => compose_answer(&passages),
            Ok(_) => no_more_info(topic),
            Err(e) => {
                warn!("Follow-up retrieval failed: {e}");
                no_more_info(topic)
            }
        }
    }

    /// Fresh-query branch: domain check, then the matching strategy chain.
    async fn fresh_query(&self, backend: &Backend, message: &str) -> Result<String> {
        if !is_farming_related(message) {
            if is_off_topic(message) {
                info!("Declining off-topic query");
                return Ok(REDIRECT_MESSAGE.to_string());
            }
            return self.run_chain(backend, message, GENERAL_CHAIN).await;
        }

        self.run_chain(backend, message, FARMING_CHAIN).await
    }

    /// Iterate a strategy chain, stopping at the first reply.
    async fn run_chain(
        &self,
        backend: &Backend,
        message: &str,
        chain: &[Strategy],
    ) -> Result<String> {
        let mut last_error: Option<FarmragError> = None;

        for strategy in chain {
            match strategy {
                Strategy::DirectRetrieval => match self.retrieve(backend, message).await {
                    Ok(passages) if !passages.is_empty() => {
                        return Ok(compose_answer(&passages));
                    }
                    Ok(_) => debug!("Retrieval returned no passages for: {message}"),
                    Err(e) => {
                        warn!("Retrieval failed for '{message}': {e}");
                        last_error = Some(e);
                    }
                },
                Strategy::GroundedGeneration => {
                    // Backs up an empty result only; a failed retrieval skips
                    // ahead to the sourced variant.
                    if last_error.is_some() {
                        continue;
                    }
                    match self.generate(backend, &prompts::grounded(message)).await {
                        Ok(response) => return Ok(response),
                        Err(e) => {
                            warn!("Grounded generation failed: {e}");
                            last_error = Some(e);
                        }
                    }
                }
                Strategy::SourcedGeneration => {
                    if last_error.is_none() {
                        continue;
                    }
                    match self.generate(backend, &prompts::sourced(message)).await {
                        Ok(response) => return Ok(response),
                        // Keep the earlier cause; the apology surfaces it.
                        Err(e) => warn!("Sourced generation failed: {e}"),
                    }
                }
                Strategy::GeneralGeneration => {
                    return self.generate(backend, message).await;
                }
                Strategy::Apology => {
                    let cause = last_error
                        .take()
                        .map_or_else(|| "unknown error".to_string(), |e| e.to_string());
                    return Ok(format!(
                        "I'm sorry, but I couldn't find information about this in my \
                         knowledge base. Error: {cause}"
                    ));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FarmragError::Llm("strategy chain exhausted".to_string())))
    }

    /// Outermost fallback: one last raw-query retrieval, then a fixed apology
    /// embedding the stringified cause.
    async fn last_resort(&self, backend: &Backend, message: &str, cause: &FarmragError) -> String {
        match self.retrieve(backend, message).await {
            Ok(passages) if !passages.is_empty() => compose_answer(&passages),
            _ => format!(
                "I'm sorry, but I encountered an error processing your request: {cause}. \
                 Please try rephrasing your question or asking about a farming-related topic."
            ),
        }
    }

    async fn retrieve(&self, backend: &Backend, query: &str) -> Result<Vec<Passage>> {
        match tokio::time::timeout(
            self.call_timeout,
            backend.retriever.retrieve(query, self.top_k),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FarmragError::Timeout(self.call_timeout.as_secs())),
        }
    }

    async fn generate(&self, backend: &Backend, prompt: &str) -> Result<String> {
        match tokio::time::timeout(self.call_timeout, backend.generator.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(FarmragError::Timeout(self.call_timeout.as_secs())),
        }
    }
}

/// Rewrite a follow-up message into a targeted query for the current topic.
///
/// The combined "way" + "treat" form is checked before the bare treatment
/// keywords so that "is there a way to treat ..." gets the more specific
/// rewrite instead of being shadowed by the "treat" match.
fn rewrite_follow_up(message: &str, topic: &str) -> String {
    let lower = message.to_lowercase();

    if lower.contains("way") && lower.contains("treat") {
        format!("Treatment methods for {topic}")
    } else if lower.contains("treat") || lower.contains("cure") || lower.contains("fix") {
        format!("How to treat {topic} disease")
    } else if lower.contains("prevent") {
        format!("How to prevent {topic} disease")
    } else if lower.contains("cause") {
        format!("What causes {topic} disease")
    } else {
        format!("{message} about {topic}")
    }
}

/// Compose a reply from retrieved passages: bodies joined by blank lines,
/// then one deduplicated citation line when any passage carries metadata.
fn compose_answer(passages: &[Passage]) -> String {
    let body = passages
        .iter()
        .map(|p| p.body.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    match format_sources(passages) {
        Some(sources) => format!("{body}\n\nSources: {sources}"),
        None => body,
    }
}

fn no_more_info(topic: &str) -> String {
    format!(
        "I'm sorry, but I don't have additional information about {topic} in my \
         knowledge base. Would you like to ask about something else?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_treatment_intent() {
        assert_eq!(
            rewrite_follow_up("how do I treat it", "bean rust"),
            "How to treat bean rust disease"
        );
        assert_eq!(
            rewrite_follow_up("any cure?", "bean rust"),
            "How to treat bean rust disease"
        );
    }

    #[test]
    fn test_rewrite_way_and_treat_takes_precedence() {
        assert_eq!(
            rewrite_follow_up("is there a way to treat this", "leaf spot"),
            "Treatment methods for leaf spot"
        );
    }

    #[test]
    fn test_rewrite_prevention_and_cause() {
        assert_eq!(
            rewrite_follow_up("can I prevent it", "bean rust"),
            "How to prevent bean rust disease"
        );
        assert_eq!(
            rewrite_follow_up("what causes it", "bean rust"),
            "What causes bean rust disease"
        );
    }

    #[test]
    fn test_rewrite_default_appends_topic() {
        assert_eq!(
            rewrite_follow_up("tell me more", "bean rust"),
            "tell me more about bean rust"
        );
    }

    #[test]
    fn test_compose_answer_attaches_sources() {
        let passages = vec![
            Passage::new("Rust appears as orange pustules.", "bean_guide.pdf").with_page(3),
            Passage::new("Remove infected debris.", "bean_guide.pdf").with_page(3),
        ];
        let answer = compose_answer(&passages);
        assert!(answer.starts_with("Rust appears as orange pustules.\n\nRemove infected debris."));
        assert!(answer.ends_with("Sources: bean guide, Page 3"));
    }

    #[test]
    fn test_compose_answer_without_metadata_has_no_sources_line() {
        let passages = vec![Passage::new("Water early in the day.", "")];
        assert_eq!(compose_answer(&passages), "Water early in the day.");
    }
}
