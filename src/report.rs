//! Report rendering.
use std::fmt::Write;

use serde_json::json;

use crate::analyzer::{Analysis, FunctionReport};

const SEPARATOR: &str = "--------------------------------------------";
const NOP: &str = "NOP";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable report: one block per function, then the total.
pub fn render_text(analysis: &Analysis) -> String {
    let mut out = String::new();
    for function in &analysis.functions {
        write_function(&mut out, function);
    }
    let _ = writeln!(out, "Total Functions: {}", analysis.total_functions());
    out
}

fn write_function(out: &mut String, function: &FunctionReport) {
    let sig = &function.signature;
    let _ = writeln!(out, "Function Name: {}", sig.name);
    let _ = writeln!(out, "Return Type: {}", sig.return_type);
    let _ = writeln!(out, "Parameters: ");
    if sig.parameters.is_nop() {
        let _ = writeln!(out, "\t{NOP}");
    } else {
        for param in sig.parameters.as_slice() {
            let _ = writeln!(out, "\t{} {}", param.ty, param.name);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "if count: {}", function.if_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "{SEPARATOR}");
    let _ = writeln!(out);
}

pub fn render_json(analysis: &Analysis) -> serde_json::Value {
    json!({
        "functions": analysis.functions,
        "total_functions": analysis.total_functions(),
    })
}

pub fn render(analysis: &Analysis, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(analysis),
        OutputFormat::Json => {
            let value = render_json(analysis);
            let mut out = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            out.push('\n');
            out
        }
    }
}
