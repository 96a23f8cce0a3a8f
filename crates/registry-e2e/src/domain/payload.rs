//! Open key-value payload sent verbatim to the system under test.
//!
//! Values are a tagged union so the harness can read the keys a category
//! defines with their expected types, while every other key (including
//! nested JSON it knows nothing about) is carried through untouched.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Bool(bool),
    Integer(i64),
    String(String),
    /// Anything else: floats, out-of-range integers, null, arrays, objects.
    Json(Value),
}

impl PayloadValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PayloadValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PayloadValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PayloadValue::Bool(b) => Value::Bool(*b),
            PayloadValue::Integer(n) => Value::from(*n),
            PayloadValue::String(s) => Value::String(s.clone()),
            PayloadValue::Json(v) => v.clone(),
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        PayloadValue::String(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        PayloadValue::String(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        PayloadValue::Integer(value)
    }
}

impl From<i32> for PayloadValue {
    fn from(value: i32) -> Self {
        PayloadValue::Integer(i64::from(value))
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        PayloadValue::Bool(value)
    }
}

impl From<Value> for PayloadValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => PayloadValue::Bool(b),
            Value::String(s) => PayloadValue::String(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PayloadValue::Integer(i),
                None => PayloadValue::Json(Value::Number(n)),
            },
            other => PayloadValue::Json(other),
        }
    }
}

/// Ordered payload map; iteration and serialization order is by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, PayloadValue>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<PayloadValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The value at `key` if it is a string.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PayloadValue::as_str)
    }

    /// The value at `key` if it is an integer.
    pub fn int_value(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PayloadValue::as_i64)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// JSON object holding every key, known or not.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, PayloadValue)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, PayloadValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_access_checks_value_kind() {
        let payload = Payload::new()
            .with("module_query", "aws")
            .with("current_offset", 10);
        assert_eq!(payload.str_value("module_query"), Some("aws"));
        assert_eq!(payload.int_value("current_offset"), Some(10));
        assert_eq!(payload.str_value("current_offset"), None);
        assert_eq!(payload.int_value("module_query"), None);
        assert_eq!(payload.str_value("missing"), None);
    }

    #[test]
    fn test_to_json_keeps_unknown_keys() {
        let payload = Payload::new()
            .with("provider_name", "aws")
            .with("x_trace", json!({"nested": [1, 2.5, null]}));
        assert_eq!(
            payload.to_json(),
            json!({"provider_name": "aws", "x_trace": {"nested": [1, 2.5, null]}})
        );
    }

    #[test]
    fn test_deserialize_picks_variants() {
        let payload: Payload = serde_json::from_value(json!({
            "a": "text",
            "b": -1,
            "c": true,
            "d": 1.5,
            "e": ["x"],
        }))
        .unwrap();
        assert_eq!(payload.get("a"), Some(&PayloadValue::String("text".into())));
        assert_eq!(payload.get("b"), Some(&PayloadValue::Integer(-1)));
        assert_eq!(payload.get("c"), Some(&PayloadValue::Bool(true)));
        assert_eq!(payload.get("d"), Some(&PayloadValue::Json(json!(1.5))));
        assert_eq!(payload.get("e"), Some(&PayloadValue::Json(json!(["x"]))));
    }

    #[test]
    fn test_serialize_is_key_ordered() {
        let payload = Payload::new().with("zeta", 1).with("alpha", "a");
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"alpha":"a","zeta":1}"#);
    }

    #[test]
    fn test_from_json_value_prefers_integer() {
        assert_eq!(PayloadValue::from(json!(7)), PayloadValue::Integer(7));
        assert_eq!(
            PayloadValue::from(json!(u64::MAX)),
            PayloadValue::Json(json!(u64::MAX))
        );
        assert_eq!(PayloadValue::from(json!(null)), PayloadValue::Json(Value::Null));
    }

    #[test]
    fn test_empty_payload() {
        let payload = Payload::new();
        assert!(payload.is_empty());
        assert_eq!(payload.len(), 0);
        assert_eq!(payload.to_json(), json!({}));
    }
}
