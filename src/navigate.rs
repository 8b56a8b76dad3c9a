//! Safe descent helpers over the value tree.
//!
//! Absence is the common case in front-end output (no `args` on a function
//! without a prototype, `block_items: null` on an empty compound, ...), so
//! nothing here returns an error; every miss is `None`.
use crate::value::JsonValue;

/// Follow `path` through successive object fields.
///
/// Stops with `None` as soon as a link is missing, not an object, or null.
pub fn resolve_chain<'a>(start: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    let mut cursor = start;
    for key in path {
        cursor = cursor.get(key)?;
        if cursor.is_null() {
            return None;
        }
    }
    if cursor.is_null() { None } else { Some(cursor) }
}

/// First element of an array, when it is a string (`names: ["unsigned", "int"]`
/// gives `"unsigned"`).
pub fn first_string_of_array(value: &JsonValue) -> Option<&str> {
    match value {
        JsonValue::Array(xs) => match xs.first() {
            Some(JsonValue::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

pub fn string_field<'a>(value: &'a JsonValue, name: &str) -> Option<&'a str> {
    match value.get(name) {
        Some(JsonValue::String(s)) => Some(s),
        _ => None,
    }
}

/// The statement sequence of a compound node.
pub fn block_items(value: &JsonValue) -> Option<&[JsonValue]> {
    match value.get("block_items") {
        Some(JsonValue::Array(xs)) => Some(xs),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decl() -> JsonValue {
        JsonValue::from(json!({
            "name": "main",
            "type": {
                "_nodetype": "FuncDecl",
                "args": null,
                "type": {
                    "_nodetype": "TypeDecl",
                    "declname": "main",
                    "type": {"_nodetype": "IdentifierType", "names": ["int"]}
                }
            }
        }))
    }

    #[test]
    fn resolves_nested_declarator() {
        let d = decl();
        let names = resolve_chain(&d, &["type", "type", "type", "names"]).unwrap();
        assert_eq!(first_string_of_array(names), Some("int"));
    }

    #[test]
    fn null_and_missing_links_stop_the_walk() {
        let d = decl();
        assert_eq!(resolve_chain(&d, &["type", "args"]), None);
        assert_eq!(resolve_chain(&d, &["type", "args", "params"]), None);
        assert_eq!(resolve_chain(&d, &["type", "nope", "names"]), None);
        // walking through a string is a miss, not a panic
        assert_eq!(resolve_chain(&d, &["name", "type"]), None);
    }

    #[test]
    fn empty_path_returns_start() {
        let d = decl();
        assert_eq!(resolve_chain(&d, &[]), Some(&d));
        assert_eq!(resolve_chain(&JsonValue::Null, &[]), None);
    }

    #[test]
    fn first_string_requires_string_head() {
        assert_eq!(first_string_of_array(&JsonValue::from(json!([]))), None);
        assert_eq!(first_string_of_array(&JsonValue::from(json!([1, "int"]))), None);
        assert_eq!(first_string_of_array(&JsonValue::from(json!("int"))), None);
        assert_eq!(
            first_string_of_array(&JsonValue::from(json!(["unsigned", "int"]))),
            Some("unsigned")
        );
    }

    #[test]
    fn block_items_requires_array() {
        assert!(block_items(&JsonValue::from(json!({"block_items": null}))).is_none());
        assert!(block_items(&JsonValue::from(json!({}))).is_none());
        assert_eq!(
            block_items(&JsonValue::from(json!({"block_items": [{}]}))).map(<[_]>::len),
            Some(1)
        );
    }
}
