//! Retrieval handlers: one per strategy.
//!
//! Handlers share a single contract: given the processed query and its
//! analysis, return ranked evidence. A handler never raises and never
//! returns an empty list — internal failures become a single zero-score
//! result carrying a localized message, so answer generation always has
//! something to work with.
//!
//! Dispatch is a fixed table: `HandlerSet` owns exactly one handler per
//! strategy and `for_strategy` is an exhaustive match, so adding a strategy
//! without a handler fails to compile.

pub mod attacking;
pub mod hybrid;
pub mod prediction;
pub mod simple_search;
pub mod statistics;
pub mod talk;

pub use attacking::AttackingHandler;
pub use hybrid::HybridSearchHandler;
pub use prediction::PredictionHandler;
pub use simple_search::SimpleSearchHandler;
pub use statistics::StatisticsHandler;
pub use talk::TalkHandler;

use std::time::Duration;

use crate::store::VectorSearch;
use crate::types::{ProcessedQuery, QueryAnalysis, RetrievalStrategy, SearchResult};
use tribune_core::{AppError, AppResult};

/// Common retrieval contract.
#[async_trait::async_trait]
pub trait RetrievalHandler: Send + Sync {
    /// Observability tag recorded as `handler_used` in the response.
    fn name(&self) -> &'static str;

    /// Retrieve evidence for the query.
    ///
    /// Never errors: failures are reported in-band as a single zero-score
    /// result with a message in the query's original language.
    async fn retrieve(
        &self,
        query: &ProcessedQuery,
        analysis: &QueryAnalysis,
        top_k: usize,
    ) -> Vec<SearchResult>;
}

/// The fixed strategy → handler dispatch table.
pub struct HandlerSet {
    simple: SimpleSearchHandler,
    statistics: StatisticsHandler,
    prediction: PredictionHandler,
    talk: TalkHandler,
    attacking: AttackingHandler,
    hybrid: HybridSearchHandler,
}

impl HandlerSet {
    /// Assemble the dispatch table from its handlers.
    pub fn new(
        simple: SimpleSearchHandler,
        statistics: StatisticsHandler,
        prediction: PredictionHandler,
        talk: TalkHandler,
        attacking: AttackingHandler,
        hybrid: HybridSearchHandler,
    ) -> Self {
        Self {
            simple,
            statistics,
            prediction,
            talk,
            attacking,
            hybrid,
        }
    }

    /// Select the handler for a strategy. Total by construction.
    pub fn for_strategy(&self, strategy: RetrievalStrategy) -> &dyn RetrievalHandler {
        match strategy {
            RetrievalStrategy::SimpleSearch => &self.simple,
            RetrievalStrategy::StatisticsQuery => &self.statistics,
            RetrievalStrategy::PredictionQuery => &self.prediction,
            RetrievalStrategy::StaticResponse => &self.talk,
            RetrievalStrategy::Reject => &self.attacking,
            RetrievalStrategy::HybridSearch => &self.hybrid,
        }
    }
}

/// Run a vector search on the corrected (pivot-language) query and map the
/// hits into pipeline results.
///
/// Shared by the simple and hybrid handlers, which are mechanically
/// identical and differ only in their observability tag.
pub(crate) async fn vector_results(
    search: &dyn VectorSearch,
    timeout: Duration,
    query: &ProcessedQuery,
    top_k: usize,
) -> AppResult<Vec<SearchResult>> {
    let hits = tokio::time::timeout(timeout, search.search(&query.corrected, top_k, None))
        .await
        .map_err(|_| AppError::Search("vector search timed out".to_string()))??;

    let results = hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| {
            let doc_id = hit
                .metadata
                .get("doc_id")
                .or_else(|| hit.metadata.get("id"))
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| format!("doc-{}", i + 1));

            SearchResult {
                doc_id,
                content: hit.content,
                score: hit.score,
                metadata: hit.metadata,
            }
        })
        .collect();

    Ok(results)
}
