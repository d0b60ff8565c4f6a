//! Recovery parsing for LLM JSON replies.
//!
//! Model output is an external wire format: it may be wrapped in prose or
//! code fences, or truncated mid-object. Callers extract the first balanced
//! object span and parse that, falling back when none exists.

/// Extract the first balanced `{...}` span from possibly-chatty output.
///
/// Brace counting is string-aware so braces inside JSON strings do not
/// unbalance the scan. Returns `None` for truncated or absent objects.
pub(crate) fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let text = r#"{"intent": "FACTOID"}"#;
        assert_eq!(extract_object(text), Some(text));
    }

    #[test]
    fn test_extract_from_chatty_output() {
        let text = "Sure! Here is the analysis:\n{\"intent\": \"TALK\"}\nHope that helps.";
        assert_eq!(extract_object(text), Some("{\"intent\": \"TALK\"}"));
    }

    #[test]
    fn test_extract_with_braces_in_strings() {
        let text = r#"{"reasoning": "uses {braces} inside", "intent": "FACTOID"}"#;
        assert_eq!(extract_object(text), Some(text));
    }

    #[test]
    fn test_extract_nested_objects() {
        let text = r#"{"a": {"b": 1}, "c": 2} trailing"#;
        assert_eq!(extract_object(text), Some(r#"{"a": {"b": 1}, "c": 2}"#));
    }

    #[test]
    fn test_extract_truncated_returns_none() {
        assert_eq!(extract_object(r#"{"intent": "FACT"#), None);
        assert_eq!(extract_object("no json here"), None);
    }

    #[test]
    fn test_extract_from_code_fence() {
        let text = "```json\n{\"sql\": \"SELECT 1\"}\n```";
        assert_eq!(extract_object(text), Some("{\"sql\": \"SELECT 1\"}"));
    }
}
