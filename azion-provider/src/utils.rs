//! Conversion helpers shared by resources and data sources

use azion_core::provider::{ProviderError, ProviderResult};
use azion_core::resource::Value;

/// Parse an integer field coming from an identifier or string attribute
pub fn atoi(field: &str, s: &str) -> ProviderResult<i64> {
    s.trim().parse::<i64>().map_err(|_| {
        ProviderError::new(format!(
            "Invalid {}: expected an integer, got '{}'",
            field, s
        ))
    })
}

/// Collect the string elements of a list value
pub fn strings_from_value(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Collect the integer elements of a list value
pub fn ints_from_value(value: Option<&Value>) -> Vec<i64> {
    value
        .and_then(Value::as_list)
        .map(|items| items.iter().filter_map(Value::as_int).collect())
        .unwrap_or_default()
}

pub fn string_list_value(items: &[String]) -> Value {
    Value::List(items.iter().map(|s| Value::String(s.clone())).collect())
}

pub fn int_list_value(items: &[i64]) -> Value {
    Value::List(items.iter().map(|i| Value::Int(*i)).collect())
}

/// Parse a free-form JSON arguments attribute. An empty string means `{}`.
pub fn json_string_to_object(field: &str, s: &str) -> ProviderResult<serde_json::Value> {
    if s.trim().is_empty() {
        return Ok(serde_json::Value::Object(Default::default()));
    }
    match serde_json::from_str::<serde_json::Value>(s) {
        Ok(value @ serde_json::Value::Object(_)) => Ok(value),
        Ok(_) => Err(ProviderError::new(format!(
            "Invalid {}: expected a JSON object",
            field
        ))),
        Err(e) => Err(ProviderError::new(format!("Invalid {}: {}", field, e)).with_cause(e)),
    }
}

/// Render JSON arguments for state. Keys come out sorted; null becomes `{}`.
pub fn object_to_json_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "{}".to_string(),
        other => other.to_string(),
    }
}

/// Keep the configured JSON text when it is equivalent to what the API
/// returned, so formatting differences never show up in state.
pub fn preserve_json_string(configured: Option<&str>, remote: &serde_json::Value) -> String {
    if let Some(configured) = configured {
        let parsed = if configured.trim().is_empty() {
            Some(serde_json::Value::Object(Default::default()))
        } else {
            serde_json::from_str::<serde_json::Value>(configured).ok()
        };
        let remote_normalized = match remote {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other.clone(),
        };
        if parsed.as_ref() == Some(&remote_normalized) {
            return configured.to_string();
        }
    }
    object_to_json_string(remote)
}

/// Render a behavior target / argument as a plain string
pub fn json_scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Inverse of `json_scalar_to_string`: structured JSON stays structured,
/// anything else is sent as a string. Empty means "no argument".
pub fn string_to_json_scalar(s: &str) -> serde_json::Value {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return serde_json::Value::Null;
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            return value;
        }
    }
    serde_json::Value::String(s.to_string())
}

/// Split a composite import ID such as `appID/phase/ruleID`.
///
/// `format` documents the expected shape (e.g. `"<edge_application_id>/<phase>/<rule_id>"`)
/// and fixes the number of segments.
pub fn parse_import_id(raw: &str, format: &str) -> ProviderResult<Vec<String>> {
    let expected = format.split('/').count();
    let parts: Vec<String> = raw.trim().split('/').map(str::to_string).collect();

    if parts.len() != expected || parts.iter().any(|p| p.trim().is_empty()) {
        return Err(ProviderError::new(format!(
            "Unexpected import identifier '{}': expected {}",
            raw, format
        )));
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_atoi() {
        assert_eq!(atoi("zone_id", "42").unwrap(), 42);
        assert_eq!(atoi("zone_id", " 7 ").unwrap(), 7);
        let err = atoi("zone_id", "abc").unwrap_err();
        assert!(err.message.contains("zone_id"));
    }

    #[test]
    fn test_list_conversions() {
        let strings = Value::List(vec![Value::from("a"), Value::Int(1), Value::from("b")]);
        assert_eq!(strings_from_value(Some(&strings)), vec!["a", "b"]);
        assert_eq!(ints_from_value(Some(&strings)), vec![1]);
        assert!(strings_from_value(None).is_empty());
        assert_eq!(
            int_list_value(&[80, 443]),
            Value::List(vec![Value::Int(80), Value::Int(443)])
        );
    }

    #[test]
    fn test_json_string_to_object() {
        assert_eq!(json_string_to_object("args", "").unwrap(), json!({}));
        assert_eq!(
            json_string_to_object("args", r#"{"a": 1}"#).unwrap(),
            json!({"a": 1})
        );
        assert!(json_string_to_object("args", "[1]").is_err());
        assert!(json_string_to_object("args", "{").is_err());
    }

    #[test]
    fn test_object_to_json_string_sorted() {
        assert_eq!(object_to_json_string(&json!({"b": 1, "a": 2})), r#"{"a":2,"b":1}"#);
        assert_eq!(object_to_json_string(&serde_json::Value::Null), "{}");
    }

    #[test]
    fn test_preserve_json_string() {
        let configured = "{\n  \"b\": 1,\n  \"a\": 2\n}";
        assert_eq!(
            preserve_json_string(Some(configured), &json!({"a": 2, "b": 1})),
            configured
        );
        assert_eq!(
            preserve_json_string(Some(configured), &json!({"a": 3})),
            r#"{"a":3}"#
        );
        assert_eq!(preserve_json_string(Some(""), &serde_json::Value::Null), "");
        assert_eq!(preserve_json_string(None, &json!({})), "{}");
    }

    #[test]
    fn test_json_scalar_conversions() {
        assert_eq!(json_scalar_to_string(&json!("/index.html")), "/index.html");
        assert_eq!(json_scalar_to_string(&json!(null)), "");
        assert_eq!(json_scalar_to_string(&json!({"k": 1})), r#"{"k":1}"#);

        assert_eq!(string_to_json_scalar(""), serde_json::Value::Null);
        assert_eq!(string_to_json_scalar("abc"), json!("abc"));
        assert_eq!(string_to_json_scalar(r#"{"k":1}"#), json!({"k": 1}));
        assert_eq!(string_to_json_scalar("{broken"), json!("{broken"));
    }

    #[test]
    fn test_parse_import_id() {
        let format = "<edge_application_id>/<phase>/<rule_id>";
        assert_eq!(
            parse_import_id("1234/request/99", format).unwrap(),
            vec!["1234", "request", "99"]
        );
        assert!(parse_import_id("1234/request", format).is_err());
        assert!(parse_import_id("1234//99", format).is_err());
        assert!(parse_import_id("1/2/3/4", format).is_err());
        assert_eq!(parse_import_id("55", "<zone_id>").unwrap(), vec!["55"]);
    }
}
