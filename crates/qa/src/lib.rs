//! Question-answering pipeline over a news corpus.
//!
//! One request flows through four stages in strict sequence:
//!
//! 1. **Query understanding** — a single LLM call detects the query
//!    language, translates it into the pivot language used for retrieval,
//!    extracts entities, and classifies intent.
//! 2. **Strategy routing** — a pure total function maps the intent to a
//!    retrieval strategy.
//! 3. **Retrieval** — exactly one handler per strategy gathers evidence.
//!    Handlers never raise; failures degrade to localized error results.
//! 4. **Answer generation** — a second LLM call writes a cited answer in
//!    the user's original language.
//!
//! A fingerprint-keyed response cache sits in front of the whole pipeline.
//! The only error a caller ever sees is [`tribune_core::AppError::Input`]
//! for an empty query; every other failure degrades to a well-formed
//! response.

pub mod cache;
pub mod generator;
pub mod handlers;
mod json;
pub mod messages;
pub mod pipeline;
pub mod router;
pub mod store;
pub mod types;
pub mod understanding;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use cache::{fingerprint, MemoryCache, ResponseCache};
pub use generator::{AnswerGenerator, GeneratedAnswer};
pub use handlers::{HandlerSet, RetrievalHandler};
pub use pipeline::QaPipeline;
pub use router::{describe, route};
pub use store::{HttpVectorSearch, SearchHit, SqlStore, SqliteStore, VectorSearch};
pub use types::{
    Confidence, Entity, EntityKind, Intent, ProcessedQuery, QAResponse, QueryAnalysis,
    RetrievalResult, RetrievalStrategy, RetrievedDocument, SearchResult, SourceInfo,
};
pub use understanding::QueryUnderstanding;
