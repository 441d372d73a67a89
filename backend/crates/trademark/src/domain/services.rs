//! Domain Services
//!
//! Tolerant decoding of provider output into [`GeneratedName`] records.

use crate::domain::entities::GeneratedName;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Maximum names kept from one response
pub const MAX_NAMES: usize = 10;

/// Maximum description length in characters
pub const MAX_DESCRIPTION_CHARS: usize = 100;

pub const DEFAULT_NAME: &str = "Unnamed";
pub const DEFAULT_DESCRIPTION: &str = "A creative brand name";
pub const DEFAULT_INDUSTRY: &str = "Retail";

/// Field names checked, in order, when the response is an object
const ARRAY_FIELD_ALIASES: [&str; 3] = ["trademarks", "names", "data"];

/// Bounds applied while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameLimits {
    pub max_names: usize,
    pub max_description_chars: usize,
}

impl Default for NameLimits {
    fn default() -> Self {
        Self {
            max_names: MAX_NAMES,
            max_description_chars: MAX_DESCRIPTION_CHARS,
        }
    }
}

/// Response text is not structured data at all
#[derive(Debug, thiserror::Error)]
#[error("Failed to parse OpenAI response: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// Remove Markdown code-fence markers and surrounding whitespace
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse provider output with the default [`NameLimits`]
pub fn parse_names(raw: &str) -> Result<Vec<GeneratedName>, ParseError> {
    parse_names_with(raw, &NameLimits::default())
}

/// Parse provider output into at most `limits.max_names` names
///
/// Only a syntax error is reported. Every syntactically valid document yields
/// a (possibly empty) list; missing or odd fields fall back to defaults.
pub fn parse_names_with(raw: &str, limits: &NameLimits) -> Result<Vec<GeneratedName>, ParseError> {
    let value = parse_document(&strip_code_fences(raw))?;

    let names = candidates(&value)
        .iter()
        .take(limits.max_names)
        .map(|candidate| coerce_name(candidate, limits.max_description_chars))
        .collect();

    Ok(names)
}

/// Parse JSON of any nesting depth; the stack grows on demand
fn parse_document(text: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Locate the candidate array in a parsed document
fn candidates(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        Value::Object(fields) => ARRAY_FIELD_ALIASES
            .iter()
            .find_map(|alias| fields.get(*alias).and_then(Value::as_array))
            .or_else(|| fields.values().find_map(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

fn coerce_name(candidate: &Value, max_description_chars: usize) -> GeneratedName {
    let fields = candidate.as_object();

    GeneratedName {
        name: field_text(fields, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
        description: field_text(fields, "description")
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
            .chars()
            .take(max_description_chars)
            .collect(),
        industry: field_text(fields, "industry").unwrap_or_else(|| DEFAULT_INDUSTRY.to_string()),
    }
}

/// Text for a field, or `None` when it is absent or empty-ish
///
/// Empty strings, `0`, `false` and `null` count as absent. Other numbers and
/// booleans are rendered as text; nested values as compact JSON.
fn field_text(fields: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    match fields?.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_array(count: usize) -> String {
        let items: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"name": "NAME{i}", "description": "Description {i}", "industry": "Retail"}}"#
                )
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn test_fenced_array_is_lossless() {
        let raw = format!("```json\n{}\n```", sample_array(10));
        let names = parse_names(&raw).unwrap();

        assert_eq!(names.len(), 10);
        for (i, name) in names.iter().enumerate() {
            assert_eq!(name.name, format!("NAME{i}"));
            assert_eq!(name.description, format!("Description {i}"));
            assert_eq!(name.industry, "Retail");
        }
    }

    #[test]
    fn test_wrapper_shapes_are_equivalent() {
        let array = sample_array(3);
        let bare = parse_names(&array).unwrap();
        let trademarks = parse_names(&format!(r#"{{"trademarks": {array}}}"#)).unwrap();
        let data = parse_names(&format!(r#"{{"data": {array}}}"#)).unwrap();
        let unknown = parse_names(&format!(r#"{{"meta": 1, "results": {array}}}"#)).unwrap();

        assert_eq!(bare, trademarks);
        assert_eq!(bare, data);
        assert_eq!(bare, unknown);
    }

    #[test]
    fn test_alias_wins_over_earlier_array_field() {
        let raw = r#"{"other": [{"name": "WRONG"}], "names": [{"name": "RIGHT"}]}"#;
        let names = parse_names(raw).unwrap();
        assert_eq!(names[0].name, "RIGHT");
    }

    #[test]
    fn test_truncates_to_ten() {
        let names = parse_names(&sample_array(25)).unwrap();
        assert_eq!(names.len(), MAX_NAMES);
        assert_eq!(names[9].name, "NAME9");
    }

    #[test]
    fn test_defaults_and_coercion() {
        let long = "x".repeat(250);
        let raw = format!(
            r#"[{{}}, null, 42, {{"name": 7, "description": "{long}", "industry": {{"a": 1}}}}, {{"name": "  ", "industry": false}}]"#
        );
        let names = parse_names(&raw).unwrap();
        assert_eq!(names.len(), 5);

        let defaults = GeneratedName {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            industry: DEFAULT_INDUSTRY.to_string(),
        };
        assert_eq!(names[0], defaults);
        assert_eq!(names[1], defaults);
        assert_eq!(names[2], defaults);
        assert_eq!(names[3].name, "7");
        assert_eq!(names[3].description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert_eq!(names[3].industry, r#"{"a":1}"#);
        assert_eq!(names[4], defaults);
    }

    #[test]
    fn test_description_truncation_counts_characters() {
        let desc = "é".repeat(150);
        let raw = format!(r#"[{{"name": "ÉLAN", "description": "{desc}"}}]"#);
        let names = parse_names(&raw).unwrap();
        assert_eq!(names[0].description.chars().count(), 100);
    }

    #[test]
    fn test_valid_documents_without_arrays_are_empty() {
        for raw in [
            "{}",
            "null",
            "\"just a string\"",
            "12",
            r#"{"a": {"b": {"c": [1, 2]}}}"#,
            "[]",
        ] {
            let names = parse_names(raw).unwrap();
            assert!(names.len() <= MAX_NAMES, "{raw}");
        }
        assert!(parse_names(r#"{"a": {"b": [1]}}"#).unwrap().is_empty());
    }

    #[test]
    fn test_deeply_nested_input_stays_bounded() {
        let nested = format!("{}1{}", "[".repeat(64), "]".repeat(64));
        let names = parse_names(&nested).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, DEFAULT_NAME);
    }

    #[test]
    fn test_nesting_beyond_default_recursion_limit() {
        let nested = format!("{}1{}", "[".repeat(200), "]".repeat(200));
        let names = parse_names(&nested).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, DEFAULT_NAME);

        let deep_description = format!("{}0{}", "[".repeat(130), "]".repeat(130));
        let raw = format!(r#"[{{"name": "NEXORA", "description": {deep_description}}}]"#);
        let names = parse_names(&raw).unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].name, "NEXORA");
        assert_eq!(names[0].description, "[".repeat(MAX_DESCRIPTION_CHARS));

        let wrapped = format!(r#"{{"meta": {nested}, "trademarks": [{{"name": "VELURA"}}]}}"#);
        let names = parse_names(&wrapped).unwrap();
        assert_eq!(names[0].name, "VELURA");
    }

    #[test]
    fn test_trailing_garbage_is_a_parse_error() {
        assert!(parse_names("[] trailing").is_err());
    }

    #[test]
    fn test_prose_is_a_parse_error() {
        assert!(parse_names("Here are some great names for you!").is_err());
        assert!(parse_names("").is_err());
        assert!(parse_names("```json\n[{\"name\": \n```").is_err());
    }

    #[test]
    fn test_custom_limits() {
        let limits = NameLimits {
            max_names: 2,
            max_description_chars: 5,
        };
        let names = parse_names_with(&sample_array(4), &limits).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].description, "Descr");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n[1]```"), "[1]");
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
    }
}
