//! Query understanding: raw text → (ProcessedQuery, QueryAnalysis).
//!
//! One LLM call per query detects the source language, translates into the
//! retrieval pivot language, extracts entities, and classifies intent. The
//! model's JSON reply is an external wire format: every field is parsed
//! defensively, and any failure — timeout, transport error, unparseable
//! output — degrades to a heuristic fallback instead of propagating. The
//! only error this stage raises is `AppError::Input` for an empty query.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::json::extract_object;
use crate::types::{clamp_unit, Entity, EntityKind, Intent, ProcessedQuery, QueryAnalysis};
use tribune_core::{AppError, AppResult};
use tribune_llm::{LlmClient, LlmRequest};
use tribune_prompt::build_understanding_prompt;

/// Query understanding stage.
pub struct QueryUnderstanding {
    client: Arc<dyn LlmClient>,
    model: String,
    pivot_language: String,
    timeout: Duration,
}

impl QueryUnderstanding {
    /// Create the stage with its LLM collaborator.
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        pivot_language: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            pivot_language: pivot_language.into(),
            timeout,
        }
    }

    /// Analyze a raw query.
    ///
    /// # Errors
    /// `AppError::Input` when the query is empty or all-whitespace. No other
    /// error is ever returned.
    pub async fn understand(
        &self,
        raw_query: &str,
    ) -> AppResult<(ProcessedQuery, QueryAnalysis)> {
        if raw_query.trim().is_empty() {
            return Err(AppError::Input("query is empty".to_string()));
        }

        let prompt = match build_understanding_prompt(raw_query, &self.pivot_language) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!("Understanding prompt failed to render: {}", e);
                return Ok(self.fallback(raw_query));
            }
        };

        let request = LlmRequest::new(&self.model)
            .with_system(prompt.system)
            .with_user(prompt.user)
            .with_temperature(0.0)
            .with_json_output();

        let reply = match tokio::time::timeout(self.timeout, self.client.complete(&request)).await
        {
            Ok(Ok(response)) => response.content,
            Ok(Err(e)) => {
                tracing::warn!("Understanding call failed, using fallback: {}", e);
                return Ok(self.fallback(raw_query));
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Understanding call timed out, using fallback"
                );
                return Ok(self.fallback(raw_query));
            }
        };

        match self.parse_reply(raw_query, &reply) {
            Some(result) => Ok(result),
            None => {
                tracing::warn!("Understanding reply unparseable, using fallback");
                Ok(self.fallback(raw_query))
            }
        }
    }

    /// Parse the model's reply into the pipeline types.
    ///
    /// Returns `None` only when no JSON object can be recovered at all;
    /// individually bad fields are defaulted and bad entities dropped.
    fn parse_reply(
        &self,
        raw_query: &str,
        reply: &str,
    ) -> Option<(ProcessedQuery, QueryAnalysis)> {
        let span = extract_object(reply)?;
        let value: serde_json::Value = serde_json::from_str(span).ok()?;

        let cleaned = value
            .get("cleaned")
            .and_then(|v| v.as_str())
            .map(clean)
            .unwrap_or_else(|| clean(raw_query));

        let corrected = value
            .get("corrected")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("translated_to_pivot").and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| cleaned.clone());

        let language = value
            .get("original_language")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| detect_language(raw_query).to_string());

        let intent = value
            .get("intent")
            .and_then(|v| v.as_str())
            .map(Intent::parse)
            .unwrap_or(Intent::Unknown);

        let confidence = value
            .get("confidence")
            .and_then(|v| v.as_f64())
            .map(|v| clamp_unit(v as f32))
            .unwrap_or(0.0);

        let entities = value
            .get("entities")
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(parse_entity).collect())
            .unwrap_or_default();

        let keywords: Vec<String> = value
            .get("keywords")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|k| k.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .filter(|kw: &Vec<String>| !kw.is_empty())
            .unwrap_or_else(|| cleaned.split_whitespace().map(str::to_string).collect());

        let metadata = json!({
            "original_language": language,
            "translated_to_pivot": value
                .get("translated_to_pivot")
                .and_then(|v| v.as_str())
                .unwrap_or(&corrected),
            "reasoning": value.get("reasoning").and_then(|v| v.as_str()).unwrap_or(""),
        });

        let query = ProcessedQuery {
            original: raw_query.to_string(),
            cleaned,
            corrected,
            language,
        };

        let analysis = QueryAnalysis::new(intent, entities, confidence, keywords, metadata);

        Some((query, analysis))
    }

    /// Heuristic result used whenever the LLM cannot be consulted.
    fn fallback(&self, raw_query: &str) -> (ProcessedQuery, QueryAnalysis) {
        let cleaned = clean(raw_query);
        let keywords: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
        let language = detect_language(raw_query).to_string();

        let query = ProcessedQuery {
            original: raw_query.to_string(),
            cleaned: cleaned.clone(),
            corrected: cleaned,
            language: language.clone(),
        };

        let analysis = QueryAnalysis::new(
            Intent::Unknown,
            Vec::new(),
            0.0,
            keywords,
            json!({ "original_language": language, "fallback": true }),
        );

        (query, analysis)
    }
}

/// Normalize query text: trim and lowercase. Idempotent.
pub fn clean(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Parse one entity record; `None` drops it without affecting siblings.
fn parse_entity(value: &serde_json::Value) -> Option<Entity> {
    let text = value.get("text")?.as_str()?;
    if text.trim().is_empty() {
        return None;
    }

    let kind = value
        .get("type")
        .and_then(|v| v.as_str())
        .map(EntityKind::parse)
        .unwrap_or(EntityKind::Other);

    let normalized = value
        .get("normalized")
        .and_then(|v| v.as_str())
        .unwrap_or(text);

    let confidence = value
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as f32;

    Some(Entity::new(text, kind, normalized, confidence))
}

/// Indicator words and characters for Azerbaijani queries.
const AZ_INDICATORS: [&str; 8] = [
    "nə", "necə", "hansı", "niyə", "harada", "kim", "salam", "xəbər",
];

/// Best-effort language detection for the fallback path.
///
/// Checks Azerbaijani-specific letters and indicator words, then Cyrillic
/// script, and defaults to English.
fn detect_language(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    if lower.chars().any(|c| matches!(c, 'ə' | 'ğ' | 'ı' | 'ş')) {
        return "az";
    }

    if AZ_INDICATORS
        .iter()
        .any(|word| lower.split_whitespace().any(|w| w == *word))
    {
        return "az";
    }

    if lower.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c)) {
        return "ru";
    }

    "en"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_idempotent() {
        let once = clean("  Bakıda NƏ baş verir?  ");
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_entity_drops_malformed() {
        let good = serde_json::json!({
            "text": "Bakı", "type": "location", "normalized": "Baku", "confidence": 0.9
        });
        let missing_text = serde_json::json!({ "type": "location" });
        let blank_text = serde_json::json!({ "text": "  " });

        assert!(parse_entity(&good).is_some());
        assert!(parse_entity(&missing_text).is_none());
        assert!(parse_entity(&blank_text).is_none());
    }

    #[test]
    fn test_parse_entity_defaults() {
        let partial = serde_json::json!({ "text": "UEFA" });
        let entity = parse_entity(&partial).unwrap();
        assert_eq!(entity.kind, EntityKind::Other);
        assert_eq!(entity.normalized, "UEFA");
        assert_eq!(entity.confidence, 0.0);
    }

    #[test]
    fn test_detect_language_azerbaijani_letters() {
        assert_eq!(detect_language("2025-ci ildə ən önəmli xəbərlər"), "az");
        assert_eq!(detect_language("salam"), "az");
    }

    #[test]
    fn test_detect_language_cyrillic() {
        assert_eq!(detect_language("что случилось вчера?"), "ru");
    }

    #[test]
    fn test_detect_language_default_english() {
        assert_eq!(detect_language("what happened yesterday?"), "en");
    }

    #[tokio::test]
    async fn test_understand_keeps_good_entities_and_drops_bad() {
        let reply = r#"{
            "original_language": "az",
            "translated_to_pivot": "what is happening in baku?",
            "cleaned": "bakıda nə baş verir?",
            "corrected": "what is happening in baku?",
            "intent": "FACTOID",
            "confidence": 0.85,
            "entities": [
                {"text": "Bakı", "type": "location", "normalized": "Baku", "confidence": 0.9},
                {"type": "location"},
                {"text": "  "}
            ],
            "keywords": ["baku", "news"],
            "reasoning": "factual question"
        }"#;

        let llm = Arc::new(crate::tests::support::ScriptedLlm::new(vec![
            reply.to_string()
        ]));
        let understanding = QueryUnderstanding::new(
            Arc::clone(&llm) as Arc<dyn tribune_llm::LlmClient>,
            "test-model",
            "en",
            Duration::from_secs(5),
        );

        let (query, analysis) = understanding
            .understand("Bakıda nə baş verir?")
            .await
            .unwrap();

        assert_eq!(query.language, "az");
        assert_eq!(query.corrected, "what is happening in baku?");
        assert_eq!(analysis.intent, Intent::Factoid);
        // One malformed and one blank entity dropped, the good one kept
        assert_eq!(analysis.entities.len(), 1);
        assert_eq!(analysis.entities[0].normalized, "Baku");
        assert_eq!(analysis.keywords, vec!["baku", "news"]);
    }

    #[tokio::test]
    async fn test_understand_rejects_empty_query() {
        let llm = Arc::new(crate::tests::support::ScriptedLlm::new(vec![]));
        let understanding = QueryUnderstanding::new(
            Arc::clone(&llm) as Arc<dyn tribune_llm::LlmClient>,
            "test-model",
            "en",
            Duration::from_secs(5),
        );

        assert!(matches!(
            understanding.understand("   ").await,
            Err(tribune_core::AppError::Input(_))
        ));
        assert_eq!(llm.calls(), 0);
    }
}
