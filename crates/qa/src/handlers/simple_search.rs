//! Simple search handler: pure vector similarity retrieval.

use std::sync::Arc;
use std::time::Duration;

use crate::handlers::{vector_results, RetrievalHandler};
use crate::messages;
use crate::store::VectorSearch;
use crate::types::{ProcessedQuery, QueryAnalysis, SearchResult};

/// Handler for FACTOID queries: similarity search on the pivot-language
/// query, no metadata filters. Extracted entities are ignored.
pub struct SimpleSearchHandler {
    search: Arc<dyn VectorSearch>,
    timeout: Duration,
}

impl SimpleSearchHandler {
    /// Create the handler with its vector search collaborator.
    pub fn new(search: Arc<dyn VectorSearch>, timeout: Duration) -> Self {
        Self { search, timeout }
    }
}

#[async_trait::async_trait]
impl RetrievalHandler for SimpleSearchHandler {
    fn name(&self) -> &'static str {
        "SimpleSearchHandler"
    }

    async fn retrieve(
        &self,
        query: &ProcessedQuery,
        _analysis: &QueryAnalysis,
        top_k: usize,
    ) -> Vec<SearchResult> {
        match vector_results(self.search.as_ref(), self.timeout, query, top_k).await {
            Ok(results) => {
                tracing::debug!(count = results.len(), "Simple search completed");
                results
            }
            Err(e) => {
                tracing::warn!("Simple search failed: {}", e);
                vec![SearchResult::message(messages::search_error(
                    &query.language,
                ))]
            }
        }
    }
}
