//! Data model for the QA pipeline.
//!
//! Every type here is created fresh per request and is immutable after
//! construction. Numeric confidences are clamped to [0, 1] at the
//! constructor; the response-level confidence is a closed 3-value enum.

use serde::{Deserialize, Serialize};

/// A normalized query, produced once by query understanding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedQuery {
    /// Raw text exactly as the caller sent it
    pub original: String,

    /// Lowercased and trimmed text
    pub cleaned: String,

    /// Grammar-normalized text in the retrieval pivot language
    pub corrected: String,

    /// ISO-ish language code of the *original* query.
    /// Echoed unchanged as the output language of the final response.
    pub language: String,
}

/// Closed set of entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Date,
    Money,
    Number,
    Event,
    Document,
    Other,
}

impl EntityKind {
    /// Parse an entity type label. Unknown labels map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "person" => Self::Person,
            "organization" => Self::Organization,
            "location" => Self::Location,
            "date" => Self::Date,
            "money" => Self::Money,
            "number" => Self::Number,
            "event" => Self::Event,
            "document" => Self::Document,
            _ => Self::Other,
        }
    }
}

/// A named entity extracted from the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Surface text as it appeared in the query
    pub text: String,

    /// Entity type
    #[serde(rename = "type")]
    pub kind: EntityKind,

    /// Normalized form (e.g., canonical name, ISO date)
    pub normalized: String,

    /// Extraction confidence in [0, 1]
    pub confidence: f32,
}

impl Entity {
    /// Create an entity, clamping confidence into [0, 1].
    pub fn new(
        text: impl Into<String>,
        kind: EntityKind,
        normalized: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            normalized: normalized.into(),
            confidence: clamp_unit(confidence),
        }
    }
}

/// Closed set of query intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Factoid,
    Statistics,
    Prediction,
    Talk,
    Attacking,
    Analytical,
    Unknown,
}

impl Intent {
    /// All intent values, for exhaustiveness checks in tests.
    pub const ALL: [Intent; 7] = [
        Intent::Factoid,
        Intent::Statistics,
        Intent::Prediction,
        Intent::Talk,
        Intent::Attacking,
        Intent::Analytical,
        Intent::Unknown,
    ];

    /// Parse an intent label. Unknown labels map to `Unknown`, never an error.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "FACTOID" => Self::Factoid,
            "STATISTICS" => Self::Statistics,
            "PREDICTION" => Self::Prediction,
            "TALK" => Self::Talk,
            "ATTACKING" => Self::Attacking,
            "ANALYTICAL" => Self::Analytical,
            _ => Self::Unknown,
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Factoid => "FACTOID",
            Self::Statistics => "STATISTICS",
            Self::Prediction => "PREDICTION",
            Self::Talk => "TALK",
            Self::Attacking => "ATTACKING",
            Self::Analytical => "ANALYTICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Closed set of retrieval strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetrievalStrategy {
    SimpleSearch,
    StatisticsQuery,
    PredictionQuery,
    StaticResponse,
    Reject,
    HybridSearch,
}

impl RetrievalStrategy {
    /// All strategy values, for exhaustiveness checks in tests.
    pub const ALL: [RetrievalStrategy; 6] = [
        RetrievalStrategy::SimpleSearch,
        RetrievalStrategy::StatisticsQuery,
        RetrievalStrategy::PredictionQuery,
        RetrievalStrategy::StaticResponse,
        RetrievalStrategy::Reject,
        RetrievalStrategy::HybridSearch,
    ];
}

/// Result of query understanding: classification plus extracted structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    /// Classified intent
    pub intent: Intent,

    /// Extracted entities.
    ///
    /// Currently consumed by no handler — carried as pass-through metadata
    /// reserved for entity-filtered retrieval.
    pub entities: Vec<Entity>,

    /// Classification confidence in [0, 1]
    pub confidence: f32,

    /// Keywords for observability and fallback retrieval
    pub keywords: Vec<String>,

    /// Free-form metadata; includes the original language and the
    /// pivot-translated query text
    pub metadata: serde_json::Value,
}

impl QueryAnalysis {
    /// Create an analysis, clamping confidence into [0, 1].
    pub fn new(
        intent: Intent,
        entities: Vec<Entity>,
        confidence: f32,
        keywords: Vec<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            intent,
            entities,
            confidence: clamp_unit(confidence),
            keywords,
            metadata,
        }
    }
}

/// A single piece of retrieved evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document identifier
    pub doc_id: String,

    /// Document text
    pub content: String,

    /// Similarity or relevance score, higher is better
    pub score: f32,

    /// Opaque metadata bag (category, importance, source, url, date)
    pub metadata: serde_json::Value,
}

impl SearchResult {
    /// Create a result with empty metadata.
    pub fn new(doc_id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            doc_id: doc_id.into(),
            content: content.into(),
            score,
            metadata: serde_json::Value::Null,
        }
    }

    /// Create the degenerate result handlers return on internal failure:
    /// a zero-score entry carrying a human-readable message.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            doc_id: "message".to_string(),
            content: content.into(),
            score: 0.0,
            metadata: serde_json::Value::Null,
        }
    }

    /// Read a string field from the metadata bag.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Read a numeric field from the metadata bag.
    pub fn meta_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(|v| v.as_f64())
    }
}

/// Everything the retrieval stage hands to answer generation.
#[derive(Debug, Clone)]
pub struct RetrievalResult {
    /// The processed query
    pub query: ProcessedQuery,

    /// The query analysis
    pub analysis: QueryAnalysis,

    /// Ranked evidence
    pub search_results: Vec<SearchResult>,

    /// Handler tag for observability (e.g., "SimpleSearchHandler")
    pub handler_used: String,
}

/// Response-level confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Parse a confidence label. Unknown labels degrade to `Low`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// A cited source in the final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Document identifier the citation refers to
    pub id: String,

    /// Human-readable source name
    pub name: String,

    /// Source URL, when resolvable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A retrieved document as serialized in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub doc_id: String,
    pub score: f32,
    pub category: Option<String>,
    pub importance: Option<f64>,
    pub source: Option<String>,
    pub url: Option<String>,
    /// Leading slice of the document content
    pub preview: String,
}

/// Maximum preview length in characters.
const PREVIEW_CHARS: usize = 200;

impl RetrievedDocument {
    /// Project a search result into its response representation.
    pub fn from_search_result(result: &SearchResult) -> Self {
        Self {
            doc_id: result.doc_id.clone(),
            score: result.score,
            category: result.meta_str("category").map(str::to_string),
            importance: result.meta_f64("importance"),
            source: result.meta_str("source").map(str::to_string),
            url: result.meta_str("url").map(str::to_string),
            preview: truncate_chars(&result.content, PREVIEW_CHARS),
        }
    }
}

/// The final response returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QAResponse {
    /// Original query text
    pub query: String,

    /// Language detected at ingress, echoed unchanged
    pub language: String,

    /// Classified intent
    pub intent: Intent,

    /// Natural-language answer
    pub answer: String,

    /// Cited sources
    pub sources: Vec<SourceInfo>,

    /// Response confidence
    pub confidence: Confidence,

    /// Key facts backing the answer
    pub key_facts: Vec<String>,

    /// Evidence the answer was generated from
    pub retrieved_documents: Vec<RetrievedDocument>,

    /// Number of documents retrieved
    pub total_found: usize,

    /// Handler tag, or "error" / "cache" for synthetic responses
    pub handler_used: String,
}

/// Clamp a confidence value into [0, 1]; NaN collapses to 0.
pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Truncate a string to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_parse_known_labels() {
        assert_eq!(Intent::parse("FACTOID"), Intent::Factoid);
        assert_eq!(Intent::parse("statistics"), Intent::Statistics);
        assert_eq!(Intent::parse(" attacking "), Intent::Attacking);
    }

    #[test]
    fn test_intent_parse_unknown_label() {
        assert_eq!(Intent::parse("GIBBERISH"), Intent::Unknown);
        assert_eq!(Intent::parse(""), Intent::Unknown);
    }

    #[test]
    fn test_intent_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse(intent.as_str()), intent);
        }
    }

    #[test]
    fn test_entity_kind_unknown_maps_to_other() {
        assert_eq!(EntityKind::parse("PERSON"), EntityKind::Person);
        assert_eq!(EntityKind::parse("spaceship"), EntityKind::Other);
    }

    #[test]
    fn test_entity_confidence_clamped() {
        let e = Entity::new("Bakı", EntityKind::Location, "Baku", 1.7);
        assert_eq!(e.confidence, 1.0);

        let e = Entity::new("Bakı", EntityKind::Location, "Baku", -0.3);
        assert_eq!(e.confidence, 0.0);

        let e = Entity::new("Bakı", EntityKind::Location, "Baku", f32::NAN);
        assert_eq!(e.confidence, 0.0);
    }

    #[test]
    fn test_confidence_parse_degrades_to_low() {
        assert_eq!(Confidence::parse("High"), Confidence::High);
        assert_eq!(Confidence::parse("medium"), Confidence::Medium);
        assert_eq!(Confidence::parse("certain"), Confidence::Low);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Confidence::High).unwrap(),
            "\"high\""
        );
    }

    #[test]
    fn test_intent_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&Intent::Factoid).unwrap(),
            "\"FACTOID\""
        );
    }

    #[test]
    fn test_retrieved_document_projection() {
        let result = SearchResult {
            doc_id: "doc-7".to_string(),
            content: "x".repeat(500),
            score: 0.91,
            metadata: json!({
                "category": "politics",
                "importance": 8.5,
                "source": "APA",
                "url": "https://example.com/7",
                "date": "2025-06-01",
            }),
        };

        let doc = RetrievedDocument::from_search_result(&result);
        assert_eq!(doc.doc_id, "doc-7");
        assert_eq!(doc.category.as_deref(), Some("politics"));
        assert_eq!(doc.importance, Some(8.5));
        assert_eq!(doc.preview.chars().count(), 200);
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        let s = "əəəəə";
        assert_eq!(truncate_chars(s, 3), "əəə");
        assert_eq!(truncate_chars(s, 10), s);
    }
}
