//! Orchestration: one request through the four pipeline stages.
//!
//! The stages form a data-dependency chain — understanding must complete
//! before routing, routing before retrieval, retrieval before generation —
//! so a single request runs strictly sequentially. Across requests there is
//! no shared mutable state beyond the response cache and the pooled
//! collaborators, so callers may run many requests concurrently; batch mode
//! does exactly that under a semaphore bound.
//!
//! Dropping the future returned by [`QaPipeline::answer`] cancels whatever
//! backend call is in flight; no stage holds resources that need cleanup
//! beyond returning pooled connections.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::cache::{fingerprint, ResponseCache};
use crate::generator::{AnswerGenerator, GeneratedAnswer};
use crate::handlers::{
    AttackingHandler, HandlerSet, HybridSearchHandler, PredictionHandler, SimpleSearchHandler,
    StatisticsHandler, TalkHandler,
};
use crate::router::{describe, route};
use crate::store::{SqlStore, VectorSearch};
use crate::types::{
    Confidence, Intent, QAResponse, RetrievalResult, RetrievalStrategy, RetrievedDocument,
    SearchResult,
};
use crate::understanding::QueryUnderstanding;
use tribune_core::{AppConfig, AppResult};
use tribune_llm::LlmClient;

/// The QA pipeline: understanding → routing → retrieval → generation, with
/// a response cache in front.
pub struct QaPipeline {
    understanding: QueryUnderstanding,
    handlers: HandlerSet,
    generator: AnswerGenerator,
    cache: Arc<dyn ResponseCache>,
    cache_enabled: bool,
    cache_ttl: Duration,
    cache_prefix: String,
    default_top_k: usize,
    batch_limit: Arc<Semaphore>,
}

impl QaPipeline {
    /// Wire the pipeline from configuration and its collaborators.
    ///
    /// Collaborators are constructed once at process start and shared by
    /// reference; the pipeline holds no other cross-request state.
    pub fn new(
        config: &AppConfig,
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn VectorSearch>,
        sql: Arc<dyn SqlStore>,
        cache: Arc<dyn ResponseCache>,
    ) -> Self {
        let llm_timeout = Duration::from_secs(config.timeouts.llm_secs);
        let search_timeout = Duration::from_secs(config.timeouts.search_secs);
        let sql_timeout = Duration::from_secs(config.timeouts.sql_secs);

        let understanding = QueryUnderstanding::new(
            Arc::clone(&llm),
            &config.model,
            &config.pivot_language,
            llm_timeout,
        );

        let handlers = HandlerSet::new(
            SimpleSearchHandler::new(Arc::clone(&search), search_timeout),
            StatisticsHandler::new(
                Arc::clone(&sql),
                Arc::clone(&llm),
                &config.model,
                &config.news_table,
                llm_timeout,
                sql_timeout,
            ),
            PredictionHandler,
            TalkHandler,
            AttackingHandler,
            HybridSearchHandler::new(Arc::clone(&search), search_timeout),
        );

        let generator = AnswerGenerator::new(Arc::clone(&llm), &config.model, llm_timeout);

        Self {
            understanding,
            handlers,
            generator,
            cache,
            cache_enabled: config.cache.enabled,
            cache_ttl: Duration::from_secs(config.cache.ttl_secs),
            cache_prefix: config.cache.prefix.clone(),
            default_top_k: config.default_top_k,
            batch_limit: Arc::new(Semaphore::new(config.batch_concurrency)),
        }
    }

    /// Answer one query.
    ///
    /// # Errors
    /// `AppError::Input` for an empty query — the only error this method
    /// ever returns. Every backend failure degrades to a well-formed
    /// response instead.
    pub async fn answer(&self, query: &str, top_k: Option<usize>) -> AppResult<QAResponse> {
        let top_k = top_k.unwrap_or(self.default_top_k);

        let key = fingerprint(&self.cache_prefix, query, top_k);
        if self.cache_enabled {
            if let Some(cached) = self.cache.get(&key) {
                tracing::debug!(key = %key, "Response cache hit");
                return Ok(cached);
            }
        }

        let (processed, analysis) = self.understanding.understand(query).await?;

        let strategy = route(&analysis);
        let handler = self.handlers.for_strategy(strategy);

        tracing::info!(
            intent = analysis.intent.as_str(),
            strategy = describe(strategy),
            handler = handler.name(),
            language = %processed.language,
            "Routed query"
        );

        let search_results = handler.retrieve(&processed, &analysis, top_k).await;

        let retrieval = RetrievalResult {
            query: processed,
            analysis,
            search_results,
            handler_used: handler.name().to_string(),
        };

        let generated = match static_message(&retrieval.search_results) {
            Some(message) => GeneratedAnswer {
                answer: message.to_string(),
                sources: Vec::new(),
                confidence: static_confidence(strategy),
                key_facts: Vec::new(),
            },
            None => {
                self.generator
                    .generate(&retrieval.query, &retrieval.search_results)
                    .await
            }
        };

        let retrieved_documents: Vec<RetrievedDocument> =
            if static_message(&retrieval.search_results).is_some() {
                Vec::new()
            } else {
                retrieval
                    .search_results
                    .iter()
                    .map(RetrievedDocument::from_search_result)
                    .collect()
            };

        let response = QAResponse {
            query: retrieval.query.original,
            language: retrieval.query.language,
            intent: retrieval.analysis.intent,
            answer: generated.answer,
            sources: generated.sources,
            confidence: generated.confidence,
            key_facts: generated.key_facts,
            total_found: retrieved_documents.len(),
            retrieved_documents,
            handler_used: retrieval.handler_used,
        };

        if self.cache_enabled {
            self.cache.set(&key, response.clone(), self.cache_ttl);
        }

        Ok(response)
    }

    /// Answer a batch of queries with per-item failure isolation.
    ///
    /// Each query runs through its own pipeline invocation; the number of
    /// in-flight invocations is bounded by the configured concurrency so a
    /// large batch cannot overwhelm a rate-limited backend. A failing item
    /// is converted to an error-tagged response and never affects its
    /// siblings. Result order matches input order.
    pub async fn answer_batch(&self, queries: &[String]) -> Vec<QAResponse> {
        let futures = queries.iter().map(|query| {
            let limit = Arc::clone(&self.batch_limit);
            async move {
                // Semaphore is never closed, so acquire cannot fail
                let _permit = limit.acquire().await.expect("semaphore closed");

                match self.answer(query, None).await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::warn!("Batch item failed: {}", e);
                        error_response(query, &e.to_string())
                    }
                }
            }
        });

        join_all(futures).await
    }
}

/// Detect the degenerate single-message result handlers produce for static
/// responses and internal failures. Those messages are already the final
/// answer; running generation over them would only burn an LLM call.
fn static_message(results: &[SearchResult]) -> Option<&str> {
    match results {
        [only] if only.doc_id == "message" && only.score == 0.0 => Some(&only.content),
        _ => None,
    }
}

/// Response confidence for message-only results.
///
/// Static strategies return deterministic canned text, which is not a
/// degraded outcome; a message from a search or statistics handler is.
fn static_confidence(strategy: RetrievalStrategy) -> Confidence {
    match strategy {
        RetrievalStrategy::StaticResponse
        | RetrievalStrategy::PredictionQuery
        | RetrievalStrategy::Reject => Confidence::High,
        _ => Confidence::Low,
    }
}

/// Build the error-tagged response used for failed batch items.
fn error_response(query: &str, message: &str) -> QAResponse {
    QAResponse {
        query: query.to_string(),
        language: "en".to_string(),
        intent: Intent::Unknown,
        answer: message.to_string(),
        sources: Vec::new(),
        confidence: Confidence::Low,
        key_facts: Vec::new(),
        retrieved_documents: Vec::new(),
        total_found: 0,
        handler_used: "error".to_string(),
    }
}
