//! Function signature extraction from `FuncDef` nodes.
//!
//! The declarator layout is the one pycparser emits:
//!
//! ```text
//! FuncDef.decl                 Decl        { name, type }
//!   .type                      FuncDecl    { args, type }
//!     .type                    TypeDecl    { declname, type }
//!       .type                  IdentifierType { names: [..] }
//!   .type.args                 ParamList   { params: [Decl | Typename] }
//! ```
//!
//! Any link may be missing in partial input. Every miss degrades to a
//! placeholder instead of an error.
use serde::Serialize;
use tracing::trace;

use crate::ast::{AstNode, SourceCoord};
use crate::navigate::{first_string_of_array, resolve_chain, string_field};
use crate::value::JsonValue;

pub const UNKNOWN: &str = "Unknown";
/// Name given to a parameter written without an identifier (`int f(char);`).
pub const ANONYMOUS_PARAM: &str = "arg";

const RETURN_TYPE_PATH: &[&str] = &["type", "type", "type", "names"];
const ARGS_PATH: &[&str] = &["type", "args"];
const PARAM_TYPE_PATH: &[&str] = &["type", "type", "names"];

static MISSING: JsonValue = JsonValue::Null;

// ------------------------------- Types ------------------------------------ //

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: String,
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coord: Option<SourceCoord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameters {
    /// No `args` on the declarator: `int f()`.
    Unspecified,
    Declared(Vec<Parameter>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

// `null` for an unspecified list, an array otherwise.
impl Serialize for Parameters {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Parameters::Unspecified => s.serialize_none(),
            Parameters::Declared(xs) => xs.serialize(s),
        }
    }
}

impl Parameters {
    pub fn as_slice(&self) -> &[Parameter] {
        match self {
            Parameters::Unspecified => &[],
            Parameters::Declared(xs) => xs,
        }
    }

    /// True when the report should print the `NOP` marker.
    pub fn is_nop(&self) -> bool {
        self.as_slice().is_empty()
    }
}

// ---------------------------- Extraction ---------------------------------- //

/// Extract the signature of a `FuncDef` node. Never fails.
pub fn extract_signature(func_def: &AstNode<'_>) -> FunctionSignature {
    let decl = func_def.field("decl").unwrap_or(&MISSING);

    let name = match string_field(decl, "name") {
        Some(name) => name.to_string(),
        None => {
            trace!("function declaration has no name");
            UNKNOWN.to_string()
        }
    };

    let return_type = resolve_chain(decl, RETURN_TYPE_PATH)
        .and_then(first_string_of_array)
        .map(str::to_string)
        .unwrap_or_else(|| {
            trace!(function = %name, "return type chain incomplete");
            UNKNOWN.to_string()
        });

    let parameters = extract_parameters(decl, &name);
    let coord = AstNode::wrap(decl)
        .ok()
        .and_then(|d| d.coord())
        .or_else(|| func_def.coord());

    FunctionSignature { name, return_type, parameters, coord }
}

fn extract_parameters(decl: &JsonValue, function: &str) -> Parameters {
    let Some(args) = resolve_chain(decl, ARGS_PATH) else {
        return Parameters::Unspecified;
    };
    let params = match args.get("params") {
        Some(JsonValue::Array(xs)) => xs.as_slice(),
        _ => {
            trace!(function, "parameter list without params array");
            &[]
        }
    };
    Parameters::Declared(params.iter().map(|p| extract_parameter(p, function)).collect())
}

fn extract_parameter(param: &JsonValue, function: &str) -> Parameter {
    let ty = resolve_chain(param, PARAM_TYPE_PATH)
        .and_then(first_string_of_array)
        .map(str::to_string)
        .unwrap_or_else(|| {
            trace!(function, "parameter type chain incomplete");
            UNKNOWN.to_string()
        });
    let name = resolve_chain(param, &["type"])
        .and_then(|declarator| string_field(declarator, "declname"))
        .unwrap_or(ANONYMOUS_PARAM)
        .to_string();
    Parameter { name, ty }
}
