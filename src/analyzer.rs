//! Driver: one document in, one ordered list of function reports out.
use serde::Serialize;
use tracing::{debug, trace};

use crate::ast::{AstNode, FUNC_DEF};
use crate::density::{count_conditionals, BranchPolicy};
use crate::error::AnalyzeError;
use crate::signature::{extract_signature, FunctionSignature};
use crate::value::JsonValue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub policy: BranchPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionReport {
    #[serde(flatten)]
    pub signature: FunctionSignature,
    pub if_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub functions: Vec<FunctionReport>,
}

impl Analysis {
    pub fn total_functions(&self) -> usize {
        self.functions.len()
    }
}

/// Analyze a parsed translation unit. The root must be an object; its `ext`
/// entries tagged `FuncDef` are reported in array order.
pub fn analyze(root: &JsonValue, options: &AnalyzeOptions) -> Result<Analysis, AnalyzeError> {
    let root = AstNode::wrap(root).map_err(|e| AnalyzeError::malformed("root", e))?;

    let ext = match root.field("ext") {
        Some(JsonValue::Array(xs)) => xs.as_slice(),
        _ => {
            trace!(kind = root.kind(), "document has no ext array");
            &[]
        }
    };

    let functions = ext
        .iter()
        .filter_map(|entry| AstNode::wrap(entry).ok())
        .filter(|node| node.is(FUNC_DEF))
        .map(|func_def| analyze_function(&func_def, options))
        .collect();

    Ok(Analysis { functions })
}

/// Parse JSON text and analyze it.
pub fn analyze_str(src: &str, options: &AnalyzeOptions) -> Result<Analysis, AnalyzeError> {
    let root = JsonValue::parse(src).map_err(|e| AnalyzeError::malformed("input", e))?;
    analyze(&root, options)
}

pub fn analyze_function(func_def: &AstNode<'_>, options: &AnalyzeOptions) -> FunctionReport {
    let signature = extract_signature(func_def);
    let if_count = func_def
        .field("body")
        .map(|body| count_conditionals(body, options.policy))
        .unwrap_or(0);
    debug!(
        function = %signature.name,
        params = signature.parameters.as_slice().len(),
        if_count,
        "analysed function"
    );
    FunctionReport { signature, if_count }
}
