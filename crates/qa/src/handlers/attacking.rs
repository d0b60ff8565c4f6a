//! Attacking handler: security rejection.
//!
//! Routing a query here is itself the enforcement: this handler holds no
//! store references, so an ATTACKING classification can never reach the
//! vector or SQL backends. Its invocation is logged for audit — this is the
//! one handler whose execution is a signal worth alerting on.

use crate::handlers::RetrievalHandler;
use crate::messages;
use crate::types::{truncate_chars, ProcessedQuery, QueryAnalysis, SearchResult};

/// Maximum query length recorded in the audit log.
const AUDIT_CHARS: usize = 120;

/// Handler for ATTACKING queries. No backend calls, by construction.
pub struct AttackingHandler;

#[async_trait::async_trait]
impl RetrievalHandler for AttackingHandler {
    fn name(&self) -> &'static str {
        "AttackingHandler"
    }

    async fn retrieve(
        &self,
        query: &ProcessedQuery,
        analysis: &QueryAnalysis,
        _top_k: usize,
    ) -> Vec<SearchResult> {
        tracing::warn!(
            query = %truncate_chars(&query.original, AUDIT_CHARS),
            confidence = analysis.confidence,
            "Rejected query classified as attacking"
        );

        vec![SearchResult::message(messages::security_warning(
            &query.language,
        ))]
    }
}
