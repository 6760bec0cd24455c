//! Per-session conversation state

use std::collections::VecDeque;

use dashmap::DashMap;

use crate::HISTORY_CAPACITY;

/// Rolling state for one chat session: the last identified topic plus a
/// bounded history of (query, response) pairs.
///
/// Both sequences always have equal length and never exceed
/// [`HISTORY_CAPACITY`]; the oldest pair is evicted first.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    last_topic: Option<String>,
    previous_queries: VecDeque<String>,
    previous_responses: VecDeque<String>,
}

impl ConversationContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the current topic. A `None` leaves the existing topic alone.
    pub fn record_topic(&mut self, topic: Option<String>) {
        if let Some(topic) = topic {
            self.last_topic = Some(topic);
        }
    }

    /// Append one (query, response) pair, evicting the oldest pair when the
    /// history is full.
    pub fn record_exchange(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.previous_queries.push_back(query.into());
        self.previous_responses.push_back(response.into());

        while self.previous_queries.len() > HISTORY_CAPACITY {
            self.previous_queries.pop_front();
            self.previous_responses.pop_front();
        }
    }

    /// Clear topic and history back to the initial empty state.
    pub fn reset(&mut self) {
        self.last_topic = None;
        self.previous_queries.clear();
        self.previous_responses.clear();
    }

    #[must_use]
    pub fn last_topic(&self) -> Option<&str> {
        self.last_topic.as_deref()
    }

    #[must_use]
    pub fn previous_queries(&self) -> &VecDeque<String> {
        &self.previous_queries
    }

    #[must_use]
    pub fn previous_responses(&self) -> &VecDeque<String> {
        &self.previous_responses
    }
}

/// Session-keyed store of conversation contexts.
///
/// Contexts are cloned out for the duration of one orchestrator call and
/// written back afterwards; calls within a single session are sequential, so
/// the clone-out/write-back window is never contended.
#[derive(Debug, Default)]
pub struct ContextStore {
    sessions: DashMap<String, ConversationContext>,
}

impl ContextStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the context for a session, creating an empty one on first use.
    #[must_use]
    pub fn get(&self, session: &str) -> ConversationContext {
        self.sessions
            .get(session)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Store the context back for a session.
    pub fn put(&self, session: &str, context: ConversationContext) {
        self.sessions.insert(session.to_string(), context);
    }

    /// Reset one session to the initial empty state.
    pub fn reset(&self, session: &str) {
        self.sessions.remove(session);
    }

    /// Drop all sessions.
    pub fn reset_all(&self) {
        self.sessions.clear();
    }
}
