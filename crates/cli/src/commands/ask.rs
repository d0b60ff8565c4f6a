//! Ask command handler.
//!
//! Runs one question through the QA pipeline and prints the response.

use clap::Args;
use tribune_core::{config::AppConfig, AppError, AppResult};

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Number of documents to retrieve (overrides configuration)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output the full response as pretty JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let pipeline = super::build_pipeline(config)?;
        let response = pipeline.answer(&self.question, self.top_k).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("{}", response.answer);

            if !response.sources.is_empty() {
                println!();
                for source in &response.sources {
                    match &source.url {
                        Some(url) => println!("  - {} ({})", source.name, url),
                        None => println!("  - {}", source.name),
                    }
                }
            }

            tracing::debug!(
                handler = %response.handler_used,
                total_found = response.total_found,
                "Answer produced"
            );
        }

        Ok(())
    }
}
