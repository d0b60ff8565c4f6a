//! Strategy routing: intent → retrieval strategy.
//!
//! Pure and total. No I/O, no side effects, no errors: every intent maps to
//! exactly one strategy, and ambiguous or unknown classifications fall back
//! to hybrid search.

use crate::types::{Intent, QueryAnalysis, RetrievalStrategy};

/// Map a query analysis to the retrieval strategy that will serve it.
pub fn route(analysis: &QueryAnalysis) -> RetrievalStrategy {
    match analysis.intent {
        Intent::Factoid => RetrievalStrategy::SimpleSearch,
        Intent::Statistics => RetrievalStrategy::StatisticsQuery,
        Intent::Prediction => RetrievalStrategy::PredictionQuery,
        Intent::Talk => RetrievalStrategy::StaticResponse,
        Intent::Attacking => RetrievalStrategy::Reject,
        Intent::Analytical | Intent::Unknown => RetrievalStrategy::HybridSearch,
    }
}

/// Human-readable strategy description for logs and observability.
pub fn describe(strategy: RetrievalStrategy) -> &'static str {
    match strategy {
        RetrievalStrategy::SimpleSearch => "vector similarity search over the news corpus",
        RetrievalStrategy::StatisticsQuery => "LLM-synthesized read-only SQL over article metadata",
        RetrievalStrategy::PredictionQuery => "static redirect to historical statistics",
        RetrievalStrategy::StaticResponse => "static greeting/help response",
        RetrievalStrategy::Reject => "security rejection, no backend access",
        RetrievalStrategy::HybridSearch => "vector search fallback for ambiguous queries",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueryAnalysis;

    fn analysis_with(intent: Intent) -> QueryAnalysis {
        QueryAnalysis::new(intent, Vec::new(), 0.8, Vec::new(), serde_json::Value::Null)
    }

    #[test]
    fn test_router_is_total() {
        for intent in Intent::ALL {
            // Must not panic and must produce a strategy for every intent.
            let _ = route(&analysis_with(intent));
        }
    }

    #[test]
    fn test_routing_table() {
        assert_eq!(
            route(&analysis_with(Intent::Factoid)),
            RetrievalStrategy::SimpleSearch
        );
        assert_eq!(
            route(&analysis_with(Intent::Statistics)),
            RetrievalStrategy::StatisticsQuery
        );
        assert_eq!(
            route(&analysis_with(Intent::Prediction)),
            RetrievalStrategy::PredictionQuery
        );
        assert_eq!(
            route(&analysis_with(Intent::Talk)),
            RetrievalStrategy::StaticResponse
        );
        assert_eq!(
            route(&analysis_with(Intent::Attacking)),
            RetrievalStrategy::Reject
        );
        assert_eq!(
            route(&analysis_with(Intent::Analytical)),
            RetrievalStrategy::HybridSearch
        );
    }

    #[test]
    fn test_unknown_falls_back_to_hybrid() {
        assert_eq!(
            route(&analysis_with(Intent::Unknown)),
            RetrievalStrategy::HybridSearch
        );
    }

    #[test]
    fn test_describe_covers_all_strategies() {
        for strategy in RetrievalStrategy::ALL {
            assert!(!describe(strategy).is_empty());
        }
    }
}
