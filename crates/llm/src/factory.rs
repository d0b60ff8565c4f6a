//! LLM provider factory.
//!
//! This module provides a factory for creating LLM clients based on
//! application configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use crate::types::ProviderType;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout` - Request timeout applied to every completion call
///
/// # Returns
/// A reference-counted trait object implementing `LlmClient`
///
/// # Errors
/// Returns error if the provider is unknown.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    timeout: Duration,
) -> Result<Arc<dyn LlmClient>, String> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Ollama) => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            let client = OllamaClient::with_base_url(base_url, timeout);
            Ok(Arc::new(client))
        }
        None => Err(format!("Unknown provider: {}", provider)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None, Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client(
            "ollama",
            Some("http://localhost:8080"),
            Duration::from_secs(30),
        );
        assert!(client.is_ok());
        assert_eq!(client.unwrap().provider_name(), "ollama");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None, Duration::from_secs(30)) {
            Err(err) => assert!(err.contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
