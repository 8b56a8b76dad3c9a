//! Generic value model: the tagged tree handed over by the JSON parser.
//!
//! The tree is built once per document and never mutated. Object entries keep
//! their source order so every walk over a document is deterministic.
use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

// ------------------------------- Types ------------------------------------ //

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    String(String),
    Array(Vec<JsonValue>),
    Object(IndexMap<String, JsonValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// Result of a key lookup that keeps "absent" and "explicit null" apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState<'a> {
    Absent,
    Null,
    Present(&'a JsonValue),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(s)
    }
}

// ------------------------------ Handoff ----------------------------------- //

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => {
                JsonValue::Number(OrderedFloat(n.as_f64().unwrap_or(f64::NAN)))
            }
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(xs) => {
                JsonValue::Array(xs.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(map) => JsonValue::Object(
                map.into_iter().map(|(k, v)| (k, JsonValue::from(v))).collect(),
            ),
        }
    }
}

impl JsonValue {
    /// Parse JSON text straight into a value tree.
    pub fn parse(src: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(src).map(JsonValue::from)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            JsonValue::Null => ValueKind::Null,
            JsonValue::Bool(_) => ValueKind::Bool,
            JsonValue::Number(_) => ValueKind::Number,
            JsonValue::String(_) => ValueKind::String,
            JsonValue::Array(_) => ValueKind::Array,
            JsonValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    fn mismatch(&self, expected: ValueKind) -> ValueError {
        ValueError::TypeMismatch { expected, found: self.kind() }
    }

    // ---------------------------- Scalars --------------------------------- //

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            JsonValue::Bool(b) => Ok(*b),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }

    pub fn as_f64(&self) -> Result<f64, ValueError> {
        match self {
            JsonValue::Number(n) => Ok(n.0),
            other => Err(other.mismatch(ValueKind::Number)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            JsonValue::String(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::String)),
        }
    }

    // --------------------------- Containers ------------------------------- //

    pub fn as_array(&self) -> Result<&[JsonValue], ValueError> {
        match self {
            JsonValue::Array(xs) => Ok(xs),
            other => Err(other.mismatch(ValueKind::Array)),
        }
    }

    pub fn as_object(&self) -> Result<&IndexMap<String, JsonValue>, ValueError> {
        match self {
            JsonValue::Object(map) => Ok(map),
            other => Err(other.mismatch(ValueKind::Object)),
        }
    }

    /// Element `index` of an array.
    pub fn at(&self, index: usize) -> Result<&JsonValue, ValueError> {
        let xs = self.as_array()?;
        xs.get(index)
            .ok_or(ValueError::IndexOutOfRange { index, len: xs.len() })
    }

    /// Key lookup on an object. Explicit nulls come back as `Some(Null)`;
    /// missing keys and non-objects give `None`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn lookup(&self, key: &str) -> FieldState<'_> {
        match self.get(key) {
            None => FieldState::Absent,
            Some(JsonValue::Null) => FieldState::Null,
            Some(v) => FieldState::Present(v),
        }
    }

    /// Number of elements (arrays) or entries (objects); `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            JsonValue::Array(xs) => Some(xs.len()),
            JsonValue::Object(map) => Some(map.len()),
            _ => None,
        }
    }
}

impl<'a> FieldState<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldState::Absent)
    }

    /// The value when present and non-null.
    pub fn value(self) -> Option<&'a JsonValue> {
        match self {
            FieldState::Present(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conversion_keeps_object_order() {
        let v = JsonValue::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn scalar_accessors_report_mismatch() {
        let v = JsonValue::from(json!("int"));
        assert_eq!(v.as_str().unwrap(), "int");
        assert_eq!(
            v.as_bool(),
            Err(ValueError::TypeMismatch { expected: ValueKind::Bool, found: ValueKind::String })
        );
        assert_eq!(JsonValue::from(json!(3)).as_f64().unwrap(), 3.0);
    }

    #[test]
    fn array_index_out_of_range() {
        let v = JsonValue::from(json!(["a", "b"]));
        assert_eq!(v.at(1).unwrap().as_str().unwrap(), "b");
        assert_eq!(v.at(2), Err(ValueError::IndexOutOfRange { index: 2, len: 2 }));
        assert!(matches!(
            JsonValue::Null.at(0),
            Err(ValueError::TypeMismatch { expected: ValueKind::Array, .. })
        ));
    }

    #[test]
    fn lookup_distinguishes_absent_null_and_present() {
        let v = JsonValue::from(json!({"args": null, "name": "f"}));
        assert_eq!(v.lookup("args"), FieldState::Null);
        assert_eq!(v.lookup("params"), FieldState::Absent);
        assert_eq!(v.lookup("name").value().and_then(|n| n.as_str().ok()), Some("f"));
        assert_eq!(v.get("args"), Some(&JsonValue::Null));
        assert_eq!(v.get("params"), None);
    }

    #[test]
    fn get_on_non_object_is_none() {
        assert_eq!(JsonValue::from(json!([1])).get("x"), None);
        assert_eq!(JsonValue::from(json!(1)).len(), None);
    }
}
