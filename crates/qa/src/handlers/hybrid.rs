//! Hybrid search handler: vector search fallback for ambiguous routing.
//!
//! Mechanically identical to the simple handler; kept as a distinct type so
//! low-confidence and analytical queries carry their own `handler_used` tag
//! in observability data.

use std::sync::Arc;
use std::time::Duration;

use crate::handlers::{vector_results, RetrievalHandler};
use crate::messages;
use crate::store::VectorSearch;
use crate::types::{ProcessedQuery, QueryAnalysis, SearchResult};

/// Handler for ANALYTICAL and UNKNOWN queries.
pub struct HybridSearchHandler {
    search: Arc<dyn VectorSearch>,
    timeout: Duration,
}

impl HybridSearchHandler {
    /// Create the handler with its vector search collaborator.
    pub fn new(search: Arc<dyn VectorSearch>, timeout: Duration) -> Self {
        Self { search, timeout }
    }
}

#[async_trait::async_trait]
impl RetrievalHandler for HybridSearchHandler {
    fn name(&self) -> &'static str {
        "HybridSearchHandler"
    }

    async fn retrieve(
        &self,
        query: &ProcessedQuery,
        _analysis: &QueryAnalysis,
        top_k: usize,
    ) -> Vec<SearchResult> {
        match vector_results(self.search.as_ref(), self.timeout, query, top_k).await {
            Ok(results) => {
                tracing::debug!(count = results.len(), "Hybrid search completed");
                results
            }
            Err(e) => {
                tracing::warn!("Hybrid search failed: {}", e);
                vec![SearchResult::message(messages::search_error(
                    &query.language,
                ))]
            }
        }
    }
}
