//! `OpaqueValue`: untyped JSON kept exactly as written.
//!
//! Numbers hold their literal text, so `1E+2` or `2.50` come back out
//! unchanged. Objects keep their source key order.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpaqueValue {
    #[default]
    Null,
    Bool(bool),
    /// The number literal as it appeared in the source.
    Number(String),
    String(String),
    Array(Vec<OpaqueValue>),
    Object(IndexMap<String, OpaqueValue>),
}

impl OpaqueValue {
    /// Looks up `key` when this is an object.
    pub fn get(&self, key: &str) -> Option<&OpaqueValue> {
        match self {
            OpaqueValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OpaqueValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The literal text of a number.
    pub fn as_number_text(&self) -> Option<&str> {
        match self {
            OpaqueValue::Number(text) => Some(text),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for OpaqueValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => OpaqueValue::Null,
            serde_json::Value::Bool(b) => OpaqueValue::Bool(b),
            serde_json::Value::Number(n) => OpaqueValue::Number(n.to_string()),
            serde_json::Value::String(s) => OpaqueValue::String(s),
            serde_json::Value::Array(items) => {
                OpaqueValue::Array(items.into_iter().map(OpaqueValue::from).collect())
            }
            serde_json::Value::Object(map) => OpaqueValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, OpaqueValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for OpaqueValue {
    fn from(s: &str) -> Self {
        OpaqueValue::String(s.to_string())
    }
}

impl From<String> for OpaqueValue {
    fn from(s: String) -> Self {
        OpaqueValue::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_from_json_values() {
        let v = OpaqueValue::from(json!({"b": [1, "x"], "a": null}));
        let keys: Vec<&String> = match &v {
            OpaqueValue::Object(map) => map.keys().collect(),
            other => panic!("expected an object, got {other:?}"),
        };
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            v.get("b"),
            Some(&OpaqueValue::Array(vec![
                OpaqueValue::Number("1".into()),
                OpaqueValue::String("x".into()),
            ]))
        );
        assert_eq!(v.get("a"), Some(&OpaqueValue::Null));
        assert_eq!(v.get("missing"), None);
    }

    #[test]
    fn numbers_compare_by_text() {
        assert_ne!(OpaqueValue::Number("1".into()), OpaqueValue::Number("1.0".into()));
        assert_eq!(OpaqueValue::Number("1e2".into()).as_number_text(), Some("1e2"));
        assert_eq!(OpaqueValue::from("s").as_str(), Some("s"));
    }
}
