//! LLM integration crate for the Tribune QA service.
//!
//! This crate provides a provider-agnostic abstraction for chat-style
//! completions. The pipeline uses it identically, with different prompts,
//! for query understanding, SQL synthesis, and answer generation; all three
//! call sites request structured JSON output.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//!
//! # Example
//! ```no_run
//! use tribune_llm::{ChatMessage, LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("llama3.2")
//!     .with_system("You are a helpful assistant.")
//!     .with_user("Hello, world!");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage, ResponseFormat};
pub use factory::create_client;
pub use providers::OllamaClient;
pub use types::ProviderType;
