//! Runs the analyzer over `fixtures/cases.json` and checks every expectation.
//!
//! `cargo run -p dev-test-runner [REGEX]` runs only the cases whose name matches.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use c_ast_metrics::path_de::from_str_with_path;
use c_ast_metrics::report::render_json;
use c_ast_metrics::{analyze, AnalyzeOptions, BranchPolicy, JsonValue};
use colored::Colorize;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    name: String,
    #[serde(default)]
    policy: BranchPolicy,
    #[serde(default)]
    input: Option<Value>,
    /// relative to the fixtures directory
    #[serde(default)]
    input_file: Option<PathBuf>,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Expect {
    total_functions: usize,
    functions: Vec<ExpectedFunction>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpectedFunction {
    name: String,
    return_type: String,
    parameters: Value,
    if_count: usize,
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("fixtures")
}

fn load_input(case: &Case, dir: &Path) -> Result<Value, String> {
    match (&case.input, &case.input_file) {
        (Some(v), None) => Ok(v.clone()),
        (None, Some(file)) => {
            let path = dir.join(file);
            let src = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            serde_json::from_str(&src).map_err(|e| format!("{}: {e}", path.display()))
        }
        _ => Err("exactly one of `input` / `input_file` is required".to_string()),
    }
}

fn run_case(case: &Case, dir: &Path) -> Result<(), String> {
    let root = JsonValue::from(load_input(case, dir)?);
    let analysis = analyze(&root, &AnalyzeOptions { policy: case.policy })
        .map_err(|e| e.to_string())?;

    if analysis.total_functions() != case.expect.total_functions {
        return Err(format!(
            "total_functions: expected {}, got {}",
            case.expect.total_functions,
            analysis.total_functions()
        ));
    }

    let actual = render_json(&analysis);
    for (i, expected) in case.expect.functions.iter().enumerate() {
        let got = &actual["functions"][i];
        let checks = [
            ("name", Value::from(expected.name.clone())),
            ("return_type", Value::from(expected.return_type.clone())),
            ("parameters", expected.parameters.clone()),
            ("if_count", Value::from(expected.if_count)),
        ];
        for (field, want) in checks {
            if got[field] != want {
                return Err(format!("function #{i} {field}: expected {want}, got {}", got[field]));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = match std::env::args().nth(1).map(|p| Regex::new(&p)).transpose() {
        Ok(filter) => filter,
        Err(error) => {
            eprintln!("invalid filter: {error}");
            return ExitCode::from(2);
        }
    };

    let dir = fixtures_dir();
    let manifest = dir.join("cases.json");
    let cases = std::fs::read_to_string(&manifest)
        .map_err(|e| e.to_string())
        .and_then(|src| {
            from_str_with_path::<Vec<Case>>(&manifest.to_string_lossy(), &src).map_err(|e| e.to_string())
        });
    let cases = match cases {
        Ok(cases) => cases,
        Err(error) => {
            eprintln!("❌ failed to load {}: {error}", manifest.display());
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0usize;
    let mut ran = 0usize;
    for case in cases.iter().filter(|c| filter.as_ref().is_none_or(|rx| rx.is_match(&c.name))) {
        ran += 1;
        match run_case(case, &dir) {
            Ok(()) => eprintln!("{} {}", "✅ pass".green(), case.name),
            Err(error) => {
                failed += 1;
                eprintln!("{} {}: {error}", "❌ fail".red(), case.name);
            }
        }
    }

    eprintln!("—— {ran} cases, {failed} failed ——");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
