//! Typed view over the object nodes of a front-end AST.
//!
//! Every node is an object carrying a `_nodetype` tag plus whatever fields that
//! kind of node has. There is no fixed schema: `AstNode` only knows about the tag
//! and the optional `coord`, everything else is looked up by name.
use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::AstError;
use crate::navigate;
use crate::value::JsonValue;

pub const NODETYPE_KEY: &str = "_nodetype";
pub const COORD_KEY: &str = "coord";

pub const UNKNOWN_KIND: &str = "Unknown";
pub const FUNC_DEF: &str = "FuncDef";
pub const IF: &str = "If";
pub const WHILE: &str = "While";
pub const FOR: &str = "For";

// `file:line[:column]`; the file part may itself contain colons.
static COORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<file>[^:].*?):(?P<line>\d+)(?::(?P<column>\d+))?$").unwrap());

// ------------------------------- Types ------------------------------------ //

#[derive(Debug, Clone, Copy)]
pub struct AstNode<'a> {
    map: &'a IndexMap<String, JsonValue>,
    raw: &'a JsonValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCoord {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

// ---------------------------- Implementation ------------------------------ //

impl<'a> AstNode<'a> {
    pub fn wrap(value: &'a JsonValue) -> Result<Self, AstError> {
        match value {
            JsonValue::Object(map) => Ok(Self { map, raw: value }),
            other => Err(AstError::NotAnObject { found: other.kind() }),
        }
    }

    /// The `_nodetype` tag, or `"Unknown"` when missing or not a string.
    pub fn kind(&self) -> &'a str {
        match self.map.get(NODETYPE_KEY) {
            Some(JsonValue::String(s)) => s,
            _ => UNKNOWN_KIND,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind() == kind
    }

    /// Raw field value, explicit null included. The tag and a string `coord`
    /// are node metadata, not fields.
    pub fn field(&self, name: &str) -> Option<&'a JsonValue> {
        if self.is_metadata(name) {
            return None;
        }
        self.map.get(name)
    }

    /// Key is present, whatever its value.
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Key is present and not null.
    pub fn has_value(&self, name: &str) -> bool {
        self.field(name).is_some_and(|v| !v.is_null())
    }

    /// Field that is itself an object node.
    pub fn child(&self, name: &str) -> Option<AstNode<'a>> {
        self.field(name).and_then(|v| AstNode::wrap(v).ok())
    }

    /// Fields in source order, metadata excluded.
    pub fn fields(self) -> impl Iterator<Item = (&'a str, &'a JsonValue)> + 'a {
        self.map
            .iter()
            .filter(move |(k, v)| {
                k.as_str() != NODETYPE_KEY
                    && !(k.as_str() == COORD_KEY && matches!(v, JsonValue::String(_)))
            })
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn coord(&self) -> Option<SourceCoord> {
        match self.map.get(COORD_KEY) {
            Some(JsonValue::String(s)) => SourceCoord::parse(s),
            _ => None,
        }
    }

    pub fn resolve(&self, path: &[&str]) -> Option<&'a JsonValue> {
        navigate::resolve_chain(self.raw, path)
    }

    pub fn as_value(&self) -> &'a JsonValue {
        self.raw
    }

    fn is_metadata(&self, name: &str) -> bool {
        name == NODETYPE_KEY
            || (name == COORD_KEY && matches!(self.map.get(COORD_KEY), Some(JsonValue::String(_))))
    }
}

impl SourceCoord {
    pub fn parse(src: &str) -> Option<Self> {
        let caps = COORD_RE.captures(src.trim())?;
        let line = caps["line"].parse().ok()?;
        let column = match caps.name("column") {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        Some(Self { file: caps["file"].to_string(), line, column })
    }
}

impl fmt::Display for SourceCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
