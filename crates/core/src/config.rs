//! Configuration management for the Tribune QA service.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Built-in defaults
//! - Config files (tribune.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// pipeline behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider (e.g., "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// LLM endpoint override
    pub endpoint: Option<String>,

    /// Pivot language used internally for retrieval
    pub pivot_language: String,

    /// Default number of documents to retrieve per query
    pub default_top_k: usize,

    /// Pipeline timeouts
    pub timeouts: TimeoutConfig,

    /// Response cache settings
    pub cache: CacheConfig,

    /// Maximum number of in-flight pipeline invocations in batch mode
    pub batch_concurrency: usize,

    /// Vector search service endpoint
    pub search_endpoint: String,

    /// Path to the read-only news database (SQLite)
    pub database_path: PathBuf,

    /// Name of the news articles table
    pub news_table: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Per-backend timeout settings, in seconds.
///
/// Every external call the pipeline makes is bounded by one of these; on
/// timeout the stage applies its documented fallback instead of blocking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// LLM completion calls (understanding, SQL synthesis, generation)
    pub llm_secs: u64,

    /// Vector search calls
    pub search_secs: u64,

    /// SQL execution calls
    pub sql_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_secs: 60,
            search_secs: 15,
            sql_secs: 15,
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether the response cache is consulted at all
    pub enabled: bool,

    /// Entry time-to-live in seconds
    pub ttl_secs: u64,

    /// Namespace prefix for cache keys
    pub prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
            prefix: "tribune:qa".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileConfig>,
    pipeline: Option<PipelineFileConfig>,
    cache: Option<CacheConfig>,
    stores: Option<StoresFileConfig>,
    logging: Option<LoggingFileConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmFileConfig {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PipelineFileConfig {
    #[serde(rename = "pivotLanguage")]
    pivot_language: Option<String>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    #[serde(rename = "batchConcurrency")]
    batch_concurrency: Option<usize>,
    timeouts: Option<TimeoutConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoresFileConfig {
    #[serde(rename = "searchEndpoint")]
    search_endpoint: Option<String>,
    #[serde(rename = "databasePath")]
    database_path: Option<PathBuf>,
    #[serde(rename = "newsTable")]
    news_table: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingFileConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            endpoint: None,
            pivot_language: "en".to_string(),
            default_top_k: 5,
            timeouts: TimeoutConfig::default(),
            cache: CacheConfig::default(),
            batch_concurrency: 4,
            search_endpoint: "http://localhost:8801".to_string(),
            database_path: PathBuf::from("news.db"),
            news_table: "news_articles".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `TRIBUNE_CONFIG`: Path to config file
    /// - `TRIBUNE_PROVIDER`: LLM provider
    /// - `TRIBUNE_MODEL`: Model identifier
    /// - `TRIBUNE_ENDPOINT`: LLM endpoint
    /// - `TRIBUNE_SEARCH_ENDPOINT`: Vector search endpoint
    /// - `TRIBUNE_DATABASE`: News database path
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("TRIBUNE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("tribune.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("TRIBUNE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("TRIBUNE_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("TRIBUNE_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(search_endpoint) = std::env::var("TRIBUNE_SEARCH_ENDPOINT") {
            config.search_endpoint = search_endpoint;
        }

        if let Ok(database) = std::env::var("TRIBUNE_DATABASE") {
            config.database_path = PathBuf::from(database);
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
        }

        if let Some(pipeline) = config_file.pipeline {
            if let Some(pivot) = pipeline.pivot_language {
                result.pivot_language = pivot;
            }
            if let Some(top_k) = pipeline.top_k {
                result.default_top_k = top_k;
            }
            if let Some(batch) = pipeline.batch_concurrency {
                result.batch_concurrency = batch;
            }
            if let Some(timeouts) = pipeline.timeouts {
                result.timeouts = timeouts;
            }
        }

        if let Some(cache) = config_file.cache {
            result.cache = cache;
        }

        if let Some(stores) = config_file.stores {
            if let Some(endpoint) = stores.search_endpoint {
                result.search_endpoint = endpoint;
            }
            if let Some(db) = stores.database_path {
                result.database_path = db;
            }
            if let Some(table) = stores.news_table {
                result.news_table = table;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration for the active provider and pipeline settings.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.default_top_k == 0 {
            return Err(AppError::Config(
                "topK must be greater than zero".to_string(),
            ));
        }

        if self.batch_concurrency == 0 {
            return Err(AppError::Config(
                "batchConcurrency must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
