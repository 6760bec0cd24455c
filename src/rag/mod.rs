//! Retrieval over the indexed agronomy corpus
//!
//! The dialogue core only depends on the [`PassageRetriever`] contract:
//! ranked passages with source metadata, given a query and a result count.
//! How the index stores or scores documents is the backend's business.
//! [`KnowledgeBaseClient`] is the production implementation, a thin HTTP
//! client for the vector-index service; tests substitute their own mocks.

pub mod ingest;
pub mod retriever;

pub use retriever::KnowledgeBaseClient;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::Passage;

/// Contract for passage retrieval.
///
/// Safe to call with arbitrary free text. An empty result means nothing
/// relevant is indexed and is not an error; transport and backend failures
/// surface as `Err` and are absorbed by the orchestrator's fallback chain.
#[async_trait]
pub trait PassageRetriever: Send + Sync {
    /// Retrieve up to `k` passages ranked by relevance to `query`.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>>;
}
