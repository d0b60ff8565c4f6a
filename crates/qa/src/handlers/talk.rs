//! Talk handler: static greeting/help response.

use crate::handlers::RetrievalHandler;
use crate::messages;
use crate::types::{ProcessedQuery, QueryAnalysis, SearchResult};

/// Handler for TALK queries. No backend calls.
pub struct TalkHandler;

#[async_trait::async_trait]
impl RetrievalHandler for TalkHandler {
    fn name(&self) -> &'static str {
        "TalkHandler"
    }

    async fn retrieve(
        &self,
        query: &ProcessedQuery,
        _analysis: &QueryAnalysis,
        _top_k: usize,
    ) -> Vec<SearchResult> {
        vec![SearchResult::message(messages::greeting(&query.language))]
    }
}
