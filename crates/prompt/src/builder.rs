//! Prompt builder for rendering templates with variables.

use handlebars::Handlebars;
use std::collections::HashMap;

use crate::templates;
use crate::types::BuiltPrompt;
use tribune_core::{AppError, AppResult};

/// Build the query-understanding prompt.
///
/// # Arguments
/// * `query` - The raw user query
/// * `pivot_language` - Language the query is translated into for retrieval
pub fn build_understanding_prompt(query: &str, pivot_language: &str) -> AppResult<BuiltPrompt> {
    tracing::debug!(pivot_language, "Building understanding prompt");

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert("pivot_language".to_string(), pivot_language.to_string());

    let system = render_template(templates::UNDERSTANDING_SYSTEM, &variables)?;
    let user = render_template(templates::UNDERSTANDING_USER, &variables)?;

    Ok(BuiltPrompt::new(system, user))
}

/// Build the NL→SQL synthesis prompt.
///
/// # Arguments
/// * `question` - The statistics question, in the pivot language
/// * `schema` - Textual description of the news table schema
/// * `table` - Name of the news table, substituted into the few-shot examples
pub fn build_sql_prompt(question: &str, schema: &str, table: &str) -> AppResult<BuiltPrompt> {
    tracing::debug!(table, "Building SQL synthesis prompt");

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("schema".to_string(), schema.to_string());
    variables.insert("table".to_string(), table.to_string());

    let system = render_template(templates::SQL_SYSTEM, &variables)?;
    let user = render_template(templates::SQL_USER, &variables)?;

    Ok(BuiltPrompt::new(system, user))
}

/// Build the answer-generation prompt.
///
/// # Arguments
/// * `query` - The original user question
/// * `context` - Formatted evidence block built from search results
/// * `language` - Language the answer must be written in
pub fn build_generation_prompt(
    query: &str,
    context: &str,
    language: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!(language, context_bytes = context.len(), "Building generation prompt");

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert("context".to_string(), context.to_string());
    variables.insert("language".to_string(), language.to_string());

    let system = render_template(templates::GENERATION_SYSTEM, &variables)?;
    let user = render_template(templates::GENERATION_USER, &variables)?;

    Ok(BuiltPrompt::new(system, user))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
