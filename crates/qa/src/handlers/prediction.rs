//! Prediction handler: static redirect to historical statistics.
//!
//! No forecasting is implemented; the handler points the user at
//! statistics-style questions about past periods instead.

use crate::handlers::RetrievalHandler;
use crate::messages;
use crate::types::{ProcessedQuery, QueryAnalysis, SearchResult};

/// Handler for PREDICTION queries. No backend calls.
pub struct PredictionHandler;

#[async_trait::async_trait]
impl RetrievalHandler for PredictionHandler {
    fn name(&self) -> &'static str {
        "PredictionHandler"
    }

    async fn retrieve(
        &self,
        query: &ProcessedQuery,
        _analysis: &QueryAnalysis,
        _top_k: usize,
    ) -> Vec<SearchResult> {
        vec![SearchResult::message(messages::prediction_redirect(
            &query.language,
        ))]
    }
}
