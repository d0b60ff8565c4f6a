//! Downstream collaborator interfaces: vector search and the read-only
//! SQL store.
//!
//! The pipeline depends on these traits only; the implementations here are
//! the defaults wired up by the CLI. Index construction, embedding, and
//! schema migration are someone else's problem.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tribune_core::{AppError, AppResult};

/// A raw hit from the vector search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document text
    pub content: String,

    /// Similarity score, higher is better
    pub score: f32,

    /// Opaque metadata bag
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Vector similarity search over the news corpus.
#[async_trait::async_trait]
pub trait VectorSearch: Send + Sync {
    /// Search for the top-k most similar documents to the query text.
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filters: Option<&serde_json::Value>,
    ) -> AppResult<Vec<SearchHit>>;
}

/// HTTP client for a vector search service.
pub struct HttpVectorSearch {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

impl HttpVectorSearch {
    /// Create a client for the given endpoint with a request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: std::time::Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl VectorSearch for HttpVectorSearch {
    async fn search(
        &self,
        query: &str,
        top_k: usize,
        filters: Option<&serde_json::Value>,
    ) -> AppResult<Vec<SearchHit>> {
        let url = format!("{}/search", self.endpoint);
        let request = SearchRequest {
            query,
            top_k,
            filters,
        };

        tracing::debug!(top_k, "Vector search request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to reach search service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Search(format!(
                "Search service error ({}): {}",
                status, error_text
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse search response: {}", e)))?;

        Ok(body.results)
    }
}

/// Read-only relational access for statistics queries.
#[async_trait::async_trait]
pub trait SqlStore: Send + Sync {
    /// Describe the news table schema as text suitable for an LLM prompt.
    async fn describe_schema(&self) -> AppResult<String>;

    /// Execute a read-only statement and render the rows as text.
    ///
    /// Returns an empty string when the statement matched no rows.
    async fn run(&self, sql: &str) -> AppResult<String>;
}

/// SQLite-backed read-only store.
pub struct SqliteStore {
    path: PathBuf,
    table: String,
}

/// Hard cap on rendered rows regardless of what the statement asks for.
const MAX_ROWS: usize = 50;

impl SqliteStore {
    /// Create a store for the given database file and news table.
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table: table.into(),
        }
    }

    fn open_read_only(path: &Path) -> AppResult<rusqlite::Connection> {
        rusqlite::Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        )
        .map_err(|e| AppError::Sql(format!("Failed to open database: {}", e)))
    }

    fn render_value(value: rusqlite::types::ValueRef<'_>) -> String {
        use rusqlite::types::ValueRef;
        match value {
            ValueRef::Null => String::new(),
            ValueRef::Integer(i) => i.to_string(),
            ValueRef::Real(f) => f.to_string(),
            ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
            ValueRef::Blob(_) => "<blob>".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl SqlStore for SqliteStore {
    async fn describe_schema(&self) -> AppResult<String> {
        let path = self.path.clone();
        let table = self.table.clone();

        tokio::task::spawn_blocking(move || {
            let conn = Self::open_read_only(&path)?;
            let schema: String = conn
                .query_row(
                    "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [&table],
                    |row| row.get(0),
                )
                .map_err(|e| AppError::Sql(format!("Failed to read schema: {}", e)))?;
            Ok(schema)
        })
        .await
        .map_err(|e| AppError::Sql(format!("Schema task failed: {}", e)))?
    }

    async fn run(&self, sql: &str) -> AppResult<String> {
        let path = self.path.clone();
        let sql = sql.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = Self::open_read_only(&path)?;
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| AppError::Sql(format!("Failed to prepare statement: {}", e)))?;

            let column_names: Vec<String> =
                stmt.column_names().iter().map(|s| s.to_string()).collect();

            let mut rows = stmt
                .query([])
                .map_err(|e| AppError::Sql(format!("Failed to execute statement: {}", e)))?;

            let mut lines: Vec<String> = Vec::new();
            while let Some(row) = rows
                .next()
                .map_err(|e| AppError::Sql(format!("Failed to read row: {}", e)))?
            {
                let mut fields = Vec::with_capacity(column_names.len());
                for idx in 0..column_names.len() {
                    let value = row
                        .get_ref(idx)
                        .map_err(|e| AppError::Sql(format!("Failed to read column: {}", e)))?;
                    fields.push(Self::render_value(value));
                }
                lines.push(fields.join(" | "));

                if lines.len() >= MAX_ROWS {
                    break;
                }
            }

            if lines.is_empty() {
                return Ok(String::new());
            }

            let mut out = column_names.join(" | ");
            out.push('\n');
            out.push_str(&lines.join("\n"));
            Ok(out)
        })
        .await
        .map_err(|e| AppError::Sql(format!("Query task failed: {}", e)))?
    }
}
