//! Structural metrics over JSON-encoded C syntax trees.
//!
//! A C front-end (pycparser's `to_dict` layout) dumps a translation unit as
//! JSON. This crate wraps that schema-less tree in a typed view, pulls out
//! every function definition's signature and counts the conditionals in its
//! body.
//!
//! Pipeline: [`input`] → [`value::JsonValue`] → [`analyzer::analyze`]
//! ([`signature`] + [`density`]) → [`report`].
pub mod analyzer;
pub mod ast;
pub mod cli;
pub mod density;
pub mod error;
pub mod input;
pub mod jq_exec;
pub mod navigate;
pub mod path_de;
pub mod report;
pub mod signature;
pub mod value;

pub use analyzer::{analyze, analyze_str, Analysis, AnalyzeOptions, FunctionReport};
pub use density::BranchPolicy;
pub use error::AnalyzeError;
pub use value::JsonValue;
