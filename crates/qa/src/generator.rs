//! Answer generation: evidence + query → cited natural-language answer.
//!
//! One LLM call per query, skipped entirely when there is no evidence — the
//! model cannot help with an empty context, so that case short-circuits to
//! a deterministic localized answer without a network round trip. The reply
//! is parsed defensively and any failure degrades to a structured error
//! answer; nothing propagates.

use std::sync::Arc;
use std::time::Duration;

use crate::json::extract_object;
use crate::messages;
use crate::types::{Confidence, ProcessedQuery, SearchResult, SourceInfo};
use tribune_llm::{LlmClient, LlmRequest};
use tribune_prompt::build_generation_prompt;

/// Output of the generation stage.
#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    /// Natural-language answer in the query's original language
    pub answer: String,

    /// Cited sources, resolved against the retrieval set where possible
    pub sources: Vec<SourceInfo>,

    /// Response confidence
    pub confidence: Confidence,

    /// Key facts backing the answer
    pub key_facts: Vec<String>,
}

impl GeneratedAnswer {
    fn fallback(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            confidence: Confidence::Low,
            key_facts: Vec::new(),
        }
    }
}

/// Answer generation stage.
pub struct AnswerGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
}

impl AnswerGenerator {
    /// Create the stage with its LLM collaborator.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            model: model.into(),
            timeout,
        }
    }

    /// Generate an answer for the query from the retrieved evidence.
    ///
    /// The answer is written in `query.language` — the originally detected
    /// language — regardless of the language the evidence is in.
    pub async fn generate(
        &self,
        query: &ProcessedQuery,
        results: &[SearchResult],
    ) -> GeneratedAnswer {
        if results.is_empty() {
            tracing::debug!("No evidence, skipping generation call");
            return GeneratedAnswer::fallback(messages::no_information(&query.language));
        }

        let context = build_context(results);

        let prompt =
            match build_generation_prompt(&query.original, &context, &query.language) {
                Ok(prompt) => prompt,
                Err(e) => {
                    tracing::warn!("Generation prompt failed to render: {}", e);
                    return GeneratedAnswer::fallback(messages::generation_error(&query.language));
                }
            };

        let request = LlmRequest::new(&self.model)
            .with_system(prompt.system)
            .with_user(prompt.user)
            .with_temperature(0.3)
            .with_json_output();

        let reply = match tokio::time::timeout(self.timeout, self.client.complete(&request)).await
        {
            Ok(Ok(response)) => response.content,
            Ok(Err(e)) => {
                tracing::warn!("Generation call failed: {}", e);
                return GeneratedAnswer::fallback(messages::generation_error(&query.language));
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Generation call timed out"
                );
                return GeneratedAnswer::fallback(messages::generation_error(&query.language));
            }
        };

        match parse_reply(&reply, results) {
            Some(answer) => answer,
            None => {
                tracing::warn!("Generation reply unparseable");
                GeneratedAnswer::fallback(messages::generation_error(&query.language))
            }
        }
    }
}

/// Build the deterministic context block submitted to the model.
///
/// Field order is stable so identical evidence always produces an identical
/// prompt: index, doc id, source, url, category, importance, date, score,
/// then content.
fn build_context(results: &[SearchResult]) -> String {
    let parts: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!(
                "[{index}] id: {id} | source: {source} | url: {url} | category: {category} | \
                 importance: {importance} | date: {date} | score: {score:.3}\n{content}",
                index = i + 1,
                id = result.doc_id,
                source = result.meta_str("source").unwrap_or("-"),
                url = result.meta_str("url").unwrap_or("-"),
                category = result.meta_str("category").unwrap_or("-"),
                importance = result
                    .meta_f64("importance")
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                date = result.meta_str("date").unwrap_or("-"),
                score = result.score,
                content = result.content,
            )
        })
        .collect();

    parts.join("\n\n---\n\n")
}

/// Parse the model reply. `None` only when no JSON object is recoverable.
fn parse_reply(reply: &str, results: &[SearchResult]) -> Option<GeneratedAnswer> {
    let span = extract_object(reply)?;
    let value: serde_json::Value = serde_json::from_str(span).ok()?;

    let answer = value.get("answer").and_then(|v| v.as_str())?.to_string();

    let sources = value
        .get("sources")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| parse_source(item, results))
                .collect()
        })
        .unwrap_or_default();

    let confidence = value
        .get("confidence")
        .and_then(|v| v.as_str())
        .map(Confidence::parse)
        .unwrap_or(Confidence::Low);

    let key_facts = value
        .get("key_facts")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|f| f.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(GeneratedAnswer {
        answer,
        sources,
        confidence,
        key_facts,
    })
}

/// Parse one cited source and resolve it against the retrieval set.
///
/// A resolvable id recovers the canonical source name and url from the
/// matching result's metadata; an unresolved citation keeps the model's
/// name with no url rather than being discarded.
fn parse_source(value: &serde_json::Value, results: &[SearchResult]) -> Option<SourceInfo> {
    let id = match value.get("id") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return None,
    };

    let claimed_name = value
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(&id)
        .to_string();

    match results.iter().find(|r| r.doc_id == id) {
        Some(result) => Some(SourceInfo {
            id,
            name: result
                .meta_str("source")
                .map(str::to_string)
                .unwrap_or(claimed_name),
            url: result.meta_str("url").map(str::to_string),
        }),
        None => Some(SourceInfo {
            id,
            name: claimed_name,
            url: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evidence() -> Vec<SearchResult> {
        vec![
            SearchResult {
                doc_id: "doc-1".to_string(),
                content: "Parliament approved the 2025 budget.".to_string(),
                score: 0.92,
                metadata: json!({
                    "source": "APA",
                    "url": "https://example.com/budget",
                    "category": "politics",
                    "importance": 9.0,
                    "date": "2025-06-01",
                }),
            },
            SearchResult::new("doc-2", "Cup final ended 2-1.", 0.55),
        ]
    }

    #[test]
    fn test_build_context_stable_field_order() {
        let context = build_context(&evidence());
        assert!(context.starts_with("[1] id: doc-1 | source: APA | url: https://example.com/budget"));
        assert!(context.contains("score: 0.920"));
        assert!(context.contains("\n\n---\n\n[2] id: doc-2 | source: - |"));
    }

    #[test]
    fn test_parse_reply_resolves_sources() {
        let reply = r#"{
            "answer": "The budget was approved.",
            "sources": [{"id": "doc-1", "name": "made-up name", "url": "bogus"}],
            "confidence": "high",
            "key_facts": ["budget approved"]
        }"#;

        let answer = parse_reply(reply, &evidence()).unwrap();
        assert_eq!(answer.confidence, Confidence::High);
        assert_eq!(answer.sources.len(), 1);
        // Canonical metadata wins over the model's claims
        assert_eq!(answer.sources[0].name, "APA");
        assert_eq!(
            answer.sources[0].url.as_deref(),
            Some("https://example.com/budget")
        );
    }

    #[test]
    fn test_parse_reply_keeps_unresolved_citation() {
        let reply = r#"{
            "answer": "ok",
            "sources": [{"id": "doc-99", "name": "Ghost Gazette"}],
            "confidence": "medium"
        }"#;

        let answer = parse_reply(reply, &evidence()).unwrap();
        assert_eq!(answer.sources[0].id, "doc-99");
        assert_eq!(answer.sources[0].name, "Ghost Gazette");
        assert!(answer.sources[0].url.is_none());
    }

    #[test]
    fn test_parse_reply_without_answer_is_none() {
        assert!(parse_reply(r#"{"sources": []}"#, &evidence()).is_none());
        assert!(parse_reply("not json", &evidence()).is_none());
    }

    #[test]
    fn test_parse_reply_defaults() {
        let answer = parse_reply(r#"{"answer": "ok"}"#, &evidence()).unwrap();
        assert_eq!(answer.confidence, Confidence::Low);
        assert!(answer.sources.is_empty());
        assert!(answer.key_facts.is_empty());
    }

    #[tokio::test]
    async fn test_no_evidence_never_calls_llm() {
        let llm = Arc::new(crate::tests::support::ScriptedLlm::new(vec![]));
        let generator = AnswerGenerator::new(
            Arc::clone(&llm) as Arc<dyn LlmClient>,
            "test-model",
            Duration::from_secs(5),
        );

        let query = crate::types::ProcessedQuery {
            original: "obscure question".to_string(),
            cleaned: "obscure question".to_string(),
            corrected: "obscure question".to_string(),
            language: "en".to_string(),
        };

        let answer = generator.generate(&query, &[]).await;

        assert_eq!(answer.answer, crate::messages::no_information("en"));
        assert_eq!(answer.confidence, Confidence::Low);
        assert!(answer.sources.is_empty());
        assert_eq!(llm.calls(), 0);
    }
}
