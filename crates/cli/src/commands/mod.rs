//! Command handlers for the Tribune CLI.

pub mod ask;
pub mod batch;

pub use ask::AskCommand;
pub use batch::BatchCommand;

use std::sync::Arc;
use std::time::Duration;

use tribune_core::{AppConfig, AppError, AppResult};
use tribune_qa::{HttpVectorSearch, MemoryCache, QaPipeline, SqliteStore};

/// Build the pipeline and its collaborators from configuration.
///
/// Collaborators are constructed once per process and shared by reference
/// into the pipeline.
pub(crate) fn build_pipeline(config: &AppConfig) -> AppResult<QaPipeline> {
    let llm = tribune_llm::create_client(
        &config.provider,
        config.endpoint.as_deref(),
        Duration::from_secs(config.timeouts.llm_secs),
    )
    .map_err(AppError::Config)?;

    let search = Arc::new(HttpVectorSearch::new(
        &config.search_endpoint,
        Duration::from_secs(config.timeouts.search_secs),
    ));

    let sql = Arc::new(SqliteStore::new(
        &config.database_path,
        &config.news_table,
    ));

    let cache = Arc::new(MemoryCache::new());

    Ok(QaPipeline::new(config, llm, search, sql, cache))
}
