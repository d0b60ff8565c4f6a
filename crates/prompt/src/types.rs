//! Prompt types for the Tribune QA pipeline.

use serde::{Deserialize, Serialize};

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message
    pub system: String,

    /// User message
    pub user: String,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_prompt_creation() {
        let built = BuiltPrompt::new("System message", "User message");
        assert_eq!(built.system, "System message");
        assert_eq!(built.user, "User message");
    }
}
