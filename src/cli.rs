//! CLI: read C front-end AST dumps (JSON) → per-function report
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing::debug;

use crate::analyzer::{analyze, Analysis, AnalyzeOptions};
use crate::ast::AstNode;
use crate::density::BranchPolicy;
use crate::error::AnalyzeError;
use crate::input::{load_documents, resolve_file_path_patterns, Document, InputOptions};
use crate::navigate::string_field;
use crate::report::{render, render_json, OutputFormat};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// report function signatures and conditional density from a JSON-encoded C AST
#[derive(Parser, Debug)]
#[command(name = "c-ast-metrics", version)]
pub struct CommandLineInterface {
    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// analyse every function definition and print the report
    Report(ReportOut),
    /// list the top-level nodes of each document (kind, coordinate, name)
    Dump(DumpOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to the AST root in each document (e.g. /payload/ast)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; each output is analysed separately
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ReportOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// which branches the conditional counter descends into
    #[arg(long, value_enum, default_value_t = BranchPolicy::Targeted)]
    policy: BranchPolicy,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct DumpOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Document>, AnalyzeError> {
        let sources = resolve_file_path_patterns(&self.input)?;
        let options = InputOptions {
            json_pointer: self.json_pointer.clone(),
            jq_expr: self.jq_expr.clone(),
        };
        load_documents(&sources, &options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Report(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let documents = target.input_settings.load()?;
                let options = AnalyzeOptions { policy: target.policy };

                // documents are independent; each one is still a single pass
                let analyses = documents
                    .par_iter()
                    .map(|doc| analyze(&doc.root, &options).map_err(|e| relabel(e, &doc.origin)))
                    .collect::<Result<Vec<Analysis>, AnalyzeError>>()?;

                let output = render_all(&documents, &analyses, target.format);
                write_output(target.out.as_ref(), &output)
            }
            Command::Dump(target) => {
                let documents = target.input_settings.load()?;
                let mut output = String::new();
                for doc in &documents {
                    output.push_str(&dump_document(doc)?);
                }
                write_output(None, &output)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn relabel(error: AnalyzeError, origin: &str) -> AnalyzeError {
    match error {
        AnalyzeError::MalformedDocument { reason, .. } => {
            AnalyzeError::MalformedDocument { origin: origin.to_string(), reason }
        }
        other => other,
    }
}

fn render_all(documents: &[Document], analyses: &[Analysis], format: OutputFormat) -> String {
    match analyses {
        // a jq filter may produce no documents at all
        [] => return render(&Analysis::default(), format),
        [single] => return render(single, format),
        _ => {}
    }
    match format {
        OutputFormat::Text => documents
            .iter()
            .zip(analyses)
            .map(|(doc, analysis)| format!("==> {} <==\n{}", doc.origin, render(analysis, format)))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            let all: Vec<serde_json::Value> = documents
                .iter()
                .zip(analyses)
                .map(|(doc, analysis)| {
                    let mut value = render_json(analysis);
                    value["origin"] = serde_json::Value::from(doc.origin.clone());
                    value
                })
                .collect();
            let mut out = serde_json::to_string_pretty(&all).unwrap_or_default();
            out.push('\n');
            out
        }
    }
}

fn dump_document(doc: &Document) -> anyhow::Result<String> {
    let root = AstNode::wrap(&doc.root).map_err(|e| AnalyzeError::malformed(&doc.origin, e))?;
    let mut out = format!("==> {} ({}) <==\n", doc.origin, root.kind());
    let entries = root.field("ext").and_then(|ext| ext.as_array().ok()).unwrap_or_default();
    for (i, entry) in entries.iter().enumerate() {
        let Ok(node) = AstNode::wrap(entry) else {
            out.push_str(&format!("{i:>4}  <{}>\n", entry.kind()));
            continue;
        };
        let coord = node.coord().map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
        let name = string_field(node.as_value(), "name")
            .or_else(|| node.field("decl").and_then(|d| string_field(d, "name")))
            .unwrap_or("");
        out.push_str(&format!("{i:>4}  {:<12} {coord}  {name}\n", node.kind()));
    }
    Ok(out)
}

fn write_output(out: Option<&PathBuf>, contents: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        print!("{contents}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))?;
    debug!(path = %out.display(), "report written");
    Ok(())
}
