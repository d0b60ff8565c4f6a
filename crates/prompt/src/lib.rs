//! Prompt system for the Tribune QA pipeline.
//!
//! Tribune makes three kinds of LLM calls — query understanding, NL→SQL
//! synthesis, and answer generation. Each has a fixed instruction template
//! rendered with Handlebars. The templates double as the wire contract with
//! the model: each one names the exact JSON object the model must return,
//! and the callers parse that object defensively.

pub mod builder;
pub mod templates;
pub mod types;

pub use builder::{build_generation_prompt, build_sql_prompt, build_understanding_prompt};
pub use types::BuiltPrompt;
