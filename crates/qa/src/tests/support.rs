//! Test doubles for the pipeline collaborators.
//!
//! The LLM double replays scripted replies in order; the store doubles
//! count their invocations so tests can assert which backends a query
//! actually reached.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::store::{SearchHit, SqlStore, VectorSearch};
use tribune_core::{AppError, AppResult};
use tribune_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};

/// LLM double that replays scripted replies in order.
///
/// Once the script is exhausted, every call fails — which exercises the
/// pipeline's fallback paths.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Total completion calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = self
            .replies
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .ok_or_else(|| AppError::Llm("script exhausted".to_string()))?;

        Ok(LlmResponse {
            content: reply,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}

/// Vector search double that returns fixed hits and counts calls.
pub struct SpySearch {
    hits: Vec<SearchHit>,
    calls: AtomicUsize,
}

impl SpySearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl VectorSearch for SpySearch {
    async fn search(
        &self,
        _query: &str,
        _top_k: usize,
        _filters: Option<&serde_json::Value>,
    ) -> AppResult<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.hits.clone())
    }
}

/// SQL store double with fixed schema and rows, counting executions.
pub struct SpySql {
    rows: String,
    schema_calls: AtomicUsize,
    run_calls: AtomicUsize,
}

impl SpySql {
    pub fn new(rows: &str) -> Self {
        Self {
            rows: rows.to_string(),
            schema_calls: AtomicUsize::new(0),
            run_calls: AtomicUsize::new(0),
        }
    }

    pub fn run_calls(&self) -> usize {
        self.run_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.run_calls() + self.schema_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SqlStore for SpySql {
    async fn describe_schema(&self) -> AppResult<String> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        Ok("CREATE TABLE news_articles (id INTEGER, title TEXT, category TEXT, \
            importance REAL, published_at TEXT)"
            .to_string())
    }

    async fn run(&self, _sql: &str) -> AppResult<String> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.clone())
    }
}
