//! Statistics handler: two-phase NL→SQL retrieval.
//!
//! Phase one asks the LLM to synthesize a single read-only SELECT for the
//! question, given the news table schema and a few example shapes. Phase
//! two validates the statement against an allow-list and executes it on the
//! read-only store. The validation layer exists because generated SQL is
//! untrusted input; the read-only connection is the second line of defense.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::handlers::RetrievalHandler;
use crate::json::extract_object;
use crate::messages;
use crate::store::SqlStore;
use crate::types::{ProcessedQuery, QueryAnalysis, SearchResult};
use tribune_core::{AppError, AppResult};
use tribune_llm::{LlmClient, LlmRequest};
use tribune_prompt::build_sql_prompt;

/// Keywords that must not appear anywhere in a generated statement.
const FORBIDDEN_KEYWORDS: [&str; 12] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "REPLACE", "PRAGMA", "ATTACH",
    "DETACH", "VACUUM", "REINDEX",
];

/// Handler for STATISTICS queries.
pub struct StatisticsHandler {
    sql: Arc<dyn SqlStore>,
    llm: Arc<dyn LlmClient>,
    model: String,
    table: String,
    llm_timeout: Duration,
    sql_timeout: Duration,
}

impl StatisticsHandler {
    /// Create the handler with its SQL store and LLM collaborators.
    pub fn new(
        sql: Arc<dyn SqlStore>,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        table: impl Into<String>,
        llm_timeout: Duration,
        sql_timeout: Duration,
    ) -> Self {
        Self {
            sql,
            llm,
            model: model.into(),
            table: table.into(),
            llm_timeout,
            sql_timeout,
        }
    }

    /// Synthesize and execute the statement; any error bubbles to the
    /// caller in `retrieve`, which maps it to a localized message.
    async fn execute(&self, query: &ProcessedQuery) -> AppResult<Option<String>> {
        let schema = tokio::time::timeout(self.sql_timeout, self.sql.describe_schema())
            .await
            .map_err(|_| AppError::Sql("schema lookup timed out".to_string()))??;

        let prompt = build_sql_prompt(&query.corrected, &schema, &self.table)?;
        let request = LlmRequest::new(&self.model)
            .with_system(prompt.system)
            .with_user(prompt.user)
            .with_temperature(0.0)
            .with_json_output();

        let reply = tokio::time::timeout(self.llm_timeout, self.llm.complete(&request))
            .await
            .map_err(|_| AppError::Llm("SQL synthesis timed out".to_string()))??;

        let sql = extract_sql(&reply.content)
            .ok_or_else(|| AppError::Llm("no SQL statement in model reply".to_string()))?;

        validate_sql(&sql)?;

        tracing::debug!(sql = %sql, "Executing generated statistics query");

        let rows = tokio::time::timeout(self.sql_timeout, self.sql.run(&sql))
            .await
            .map_err(|_| AppError::Sql("statement execution timed out".to_string()))??;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows))
        }
    }
}

#[async_trait::async_trait]
impl RetrievalHandler for StatisticsHandler {
    fn name(&self) -> &'static str {
        "StatisticsHandler"
    }

    async fn retrieve(
        &self,
        query: &ProcessedQuery,
        _analysis: &QueryAnalysis,
        _top_k: usize,
    ) -> Vec<SearchResult> {
        match self.execute(query).await {
            Ok(Some(rows)) => {
                vec![SearchResult {
                    doc_id: "statistics".to_string(),
                    content: rows,
                    score: 1.0,
                    metadata: json!({ "source": "statistics" }),
                }]
            }
            Ok(None) => {
                tracing::debug!("Statistics query matched no rows");
                vec![SearchResult::message(messages::no_results(&query.language))]
            }
            Err(e) => {
                tracing::warn!("Statistics retrieval failed: {}", e);
                vec![SearchResult::message(messages::statistics_error(
                    &query.language,
                ))]
            }
        }
    }
}

/// Pull the SQL statement out of the model reply.
///
/// Prefers the documented `{"sql": "..."}` object; falls back to treating a
/// bare reply as SQL when it at least starts like a SELECT.
fn extract_sql(reply: &str) -> Option<String> {
    if let Some(span) = extract_object(reply) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(span) {
            if let Some(sql) = value.get("sql").and_then(|v| v.as_str()) {
                return Some(sql.trim().to_string());
            }
        }
    }

    let stripped = reply
        .trim()
        .trim_start_matches("```sql")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let upper = stripped.to_uppercase();
    if upper.starts_with("SELECT") || upper.starts_with("WITH") {
        Some(stripped.to_string())
    } else {
        None
    }
}

/// Allow-list validation for generated statements.
///
/// Accepts exactly one statement that starts with SELECT or WITH and
/// contains no write/DDL keywords.
fn validate_sql(sql: &str) -> AppResult<()> {
    let trimmed = sql.trim().trim_end_matches(';').trim();

    if trimmed.is_empty() {
        return Err(AppError::Sql("empty statement".to_string()));
    }

    if trimmed.contains(';') {
        return Err(AppError::Sql(
            "multiple statements are not allowed".to_string(),
        ));
    }

    let upper = trimmed.to_uppercase();
    if !upper.starts_with("SELECT") && !upper.starts_with("WITH") {
        let head: String = trimmed.chars().take(40).collect();
        return Err(AppError::Sql(format!(
            "only read statements are allowed, got: {}",
            head
        )));
    }

    for keyword in FORBIDDEN_KEYWORDS {
        let found = upper
            .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .any(|token| token == keyword);
        if found {
            return Err(AppError::Sql(format!(
                "forbidden keyword in statement: {}",
                keyword
            )));
        }
    }

    Ok(())
}
