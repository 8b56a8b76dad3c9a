//! Error taxonomy.
//!
//! Only input and document failures ever surface to the caller. Gaps inside a
//! well-formed document (missing declarator links, odd bodies, ...) are absorbed
//! where they occur and never show up here.
use std::path::PathBuf;
use thiserror::Error;

use crate::value::ValueKind;

/// Failures of the typed accessors on [`crate::value::JsonValue`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AstError {
    #[error("AST node must be an object, found {found}")]
    NotAnObject { found: ValueKind },
}

/// Fatal errors of an analysis run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("cannot read {}: {source}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid input pattern `{pattern}`: {reason}")]
    GlobPattern { pattern: String, reason: String },
    #[error("malformed document ({origin}): {reason}")]
    MalformedDocument { origin: String, reason: String },
    #[error("failed to pre-process {origin}: {reason}")]
    Preprocess { origin: String, reason: String },
}

impl AnalyzeError {
    pub(crate) fn malformed(origin: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedDocument { origin: origin.into(), reason: reason.to_string() }
    }
}
