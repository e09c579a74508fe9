//! String and JSON value helpers shared across the plugin.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// True when `text` parses as a JSON document.
pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

/// Normalize a parsed JSON object into a string-valued parameter map.
///
/// Documents written by loosely-typed producers carry mixed scalar types
/// in their parameter objects. Every leaf is coerced to its string
/// representation: strings pass through, numbers and booleans render as
/// their JSON text, null becomes an absent value, and nested objects or
/// arrays are stored as compact JSON text.
pub fn parameter_map(object: &Map<String, Value>) -> BTreeMap<String, Option<String>> {
    object
        .iter()
        .map(|(key, value)| (key.clone(), coerce_value(value)))
        .collect()
}

fn coerce_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_json() {
        assert!(is_json(r#"{"a": 1}"#));
        assert!(is_json("[1, 2, 3]"));
        assert!(!is_json("not json"));
        assert!(!is_json(""));
    }

    #[test]
    fn test_parameter_map_coerces_scalars() {
        let object = json!({
            "text": "value",
            "count": 42,
            "ratio": 0.5,
            "flag": true,
            "missing": null,
        });
        let map = parameter_map(object.as_object().unwrap());

        assert_eq!(map["text"], Some("value".to_string()));
        assert_eq!(map["count"], Some("42".to_string()));
        assert_eq!(map["ratio"], Some("0.5".to_string()));
        assert_eq!(map["flag"], Some("true".to_string()));
        assert_eq!(map["missing"], None);
    }

    #[test]
    fn test_parameter_map_serializes_nested_values() {
        let object = json!({
            "nested": {"a": 1},
            "list": [1, 2],
        });
        let map = parameter_map(object.as_object().unwrap());

        assert_eq!(map["nested"], Some(r#"{"a":1}"#.to_string()));
        assert_eq!(map["list"], Some("[1,2]".to_string()));
    }
}
