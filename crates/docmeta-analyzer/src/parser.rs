//! Parse LLM output into partial metadata

use crate::error::ExtractionError;
use crate::json::metadata_from_json;
use docmeta_domain::PartialMetadata;
use serde_json::Value;

/// Parse an LLM response into a partial metadata record
pub fn parse_metadata_response(response: &str) -> Result<PartialMetadata, ExtractionError> {
    // LLMs sometimes wrap JSON in markdown code blocks or surround it with prose
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str)?;

    metadata_from_json(json)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, ExtractionError> {
    let trimmed = response.trim();

    if trimmed.is_empty() {
        return Err(ExtractionError::InvalidFormat("Empty response".to_string()));
    }

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Skip the opening fence line (```json or ```) and the closing fence
        let body = rest
            .split_once('\n')
            .map(|(_, body)| body)
            .ok_or_else(|| ExtractionError::InvalidFormat("Empty code block".to_string()))?;
        // Anything after the closing fence is prose
        let body = match body.find("```") {
            Some(close) => &body[..close],
            None => body,
        };
        return Ok(body.trim());
    }

    // Tolerate prose around a single object
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(open), Some(close)) if open < close => Ok(&trimmed[open..=close]),
        _ => Ok(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmeta_domain::Value;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"{"Title": "Quarterly Report", "PageCount": 12, "Author": ["Ada"]}"#;

        let metadata = parse_metadata_response(response).unwrap();
        assert_eq!(metadata["Title"], Value::from("Quarterly Report"));
        assert_eq!(metadata["PageCount"], Value::Number(12.0));
        assert_eq!(metadata["Author"], Value::from(vec!["Ada"]));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"Title\": \"Report\"}\n```";

        let metadata = parse_metadata_response(response).unwrap();
        assert_eq!(metadata["Title"], Value::from("Report"));
    }

    #[test]
    fn test_parse_fenced_json_followed_by_prose() {
        let response = "```json\n{\"Title\": \"Report\"}\n```\nHope this helps!";

        let metadata = parse_metadata_response(response).unwrap();
        assert_eq!(metadata["Title"], Value::from("Report"));
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let response = "Here is the metadata:\n{\"Language\": \"English\"}\nLet me know!";

        let metadata = parse_metadata_response(response).unwrap();
        assert_eq!(metadata["Language"], Value::from("English"));
    }

    #[test]
    fn test_null_fields_are_kept_as_null() {
        let metadata = parse_metadata_response(r#"{"Publisher": null}"#).unwrap();
        assert_eq!(metadata["Publisher"], Value::Null);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_metadata_response("This is not JSON");
        assert!(matches!(result, Err(ExtractionError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_json_not_object() {
        let result = parse_metadata_response(r#"["Title"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(parse_metadata_response("   ").is_err());
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        let result = extract_json(response).unwrap();
        assert_eq!(result, r#"{"key": "value"}"#);
    }

    #[test]
    fn test_unterminated_fence_is_tolerated() {
        let response = "```json\n{\"key\": \"value\"}";
        let result = extract_json(response).unwrap();
        assert_eq!(result, r#"{"key": "value"}"#);
    }

    #[test]
    fn test_fence_without_body_rejected() {
        assert!(extract_json("```json").is_err());
    }
}
