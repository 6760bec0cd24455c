//! HTTP client for the vector-index service

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::FarmragError;
use crate::errors::Result;
use crate::models::IngestDocument;
use crate::models::Passage;
use crate::rag::PassageRetriever;

/// Client for the knowledge-base service exposing `/query` and `/ingest`.
pub struct KnowledgeBaseClient {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    passages: Vec<PassageRecord>,
}

#[derive(Debug, Deserialize)]
struct PassageRecord {
    text: String,
    #[serde(default)]
    source: String,
    page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct IngestRequest<'a> {
    documents: &'a [IngestDocument],
}

#[derive(Debug, Deserialize)]
struct IngestResponse {
    indexed: usize,
}

impl KnowledgeBaseClient {
    /// Create a new knowledge-base client
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

    /// Submit pre-chunked documents for indexing, returning the count indexed.
    ///
    /// # Errors
    /// - Transport failures
    /// - Non-success responses from the backend
    pub async fn ingest(&self, documents: &[IngestDocument]) -> Result<usize> {
        let url = format!("{}/ingest", self.endpoint);
        debug!("Ingesting {} documents via {}", documents.len(), url);

        let response = self
            .client
            .post(&url)
            .json(&IngestRequest { documents })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmragError::KnowledgeBase(format!(
                "ingest failed with status {status}: {body}"
            )));
        }

        let parsed: IngestResponse = response.json().await?;
        Ok(parsed.indexed)
    }
}

#[async_trait]
impl PassageRetriever for KnowledgeBaseClient {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>> {
        let url = format!("{}/query", self.endpoint);
        debug!("Retrieving {} passages for: {}", k, query);

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { query, top_k: k })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmragError::KnowledgeBase(format!(
                "query failed with status {status}: {body}"
            )));
        }

        let parsed: QueryResponse = response.json().await?;
        let passages = parsed
            .passages
            .into_iter()
            .map(|record| Passage {
                body: record.text,
                source_document: record.source,
                page_number: record.page,
            })
            .collect();

        Ok(passages)
    }
}
