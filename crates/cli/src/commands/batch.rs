//! Batch command handler.
//!
//! Answers a file of questions, one per line, with per-item failure
//! isolation: a bad line yields an error-tagged response without affecting
//! the rest of the batch.

use clap::Args;
use std::path::PathBuf;
use tribune_core::{config::AppConfig, AppError, AppResult};

/// Answer a file of questions, one per line
#[derive(Args, Debug)]
pub struct BatchCommand {
    /// File containing one question per line
    pub file: PathBuf,

    /// Number of documents to retrieve per question (overrides configuration)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl BatchCommand {
    /// Execute the batch command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing batch command on {:?}", self.file);

        let contents = std::fs::read_to_string(&self.file)?;
        let queries: Vec<String> = contents.lines().map(str::to_string).collect();

        if queries.is_empty() {
            return Err(AppError::Input("batch file is empty".to_string()));
        }

        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.default_top_k = top_k;
        }

        let pipeline = super::build_pipeline(&config)?;
        let responses = pipeline.answer_batch(&queries).await;

        let errors = responses
            .iter()
            .filter(|r| r.handler_used == "error")
            .count();
        tracing::info!(
            total = responses.len(),
            errors,
            "Batch completed"
        );

        let json = serde_json::to_string_pretty(&responses)
            .map_err(|e| AppError::Serialization(e.to_string()))?;
        println!("{}", json);

        Ok(())
    }
}
