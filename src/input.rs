//! Loading input documents: paths, glob patterns, stdin, plus optional
//! JSON-pointer selection and jq pre-processing.
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::AnalyzeError;
use crate::value::JsonValue;

pub const STDIN_MARKER: &str = "-";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    /// JSON Pointer selecting the AST root inside each document.
    pub json_pointer: Option<String>,
    /// jq filter applied to each document; each output is analysed separately.
    pub jq_expr: Option<String>,
}

/// One analysable document and where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub origin: String,
    pub root: JsonValue,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSource {
    pub fn origin(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.to_string_lossy().to_string(),
        }
    }

    /// Raw bytes of the source. Only I/O failures are errors here; decoding
    /// is left to the JSON parser.
    pub fn read(&self) -> Result<Vec<u8>, AnalyzeError> {
        match self {
            InputSource::Stdin => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .map_err(|source| AnalyzeError::InputUnavailable {
                        path: PathBuf::from(STDIN_MARKER),
                        source,
                    })?;
                Ok(buf)
            }
            InputSource::File(path) => read_file(path),
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, AnalyzeError> {
    std::fs::read(path).map_err(|source| AnalyzeError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every source and turn it into analysable documents, in input order.
pub fn load_documents(
    sources: &[InputSource],
    options: &InputOptions,
) -> Result<Vec<Document>, AnalyzeError> {
    let mut documents = Vec::new();
    for source in sources {
        let origin = source.origin();
        let bytes = source.read()?;
        let produced = prepare_documents(&origin, &bytes, options)?;
        info!(origin = %origin, documents = produced.len(), "loaded input");
        documents.extend(produced);
    }
    Ok(documents)
}

/// Parse one source and apply the pointer/jq selection.
pub fn prepare_documents(
    origin: &str,
    bytes: &[u8],
    options: &InputOptions,
) -> Result<Vec<Document>, AnalyzeError> {
    let mut value = serde_json::from_slice::<serde_json::Value>(bytes)
        .map_err(|e| AnalyzeError::malformed(origin, e))?;

    if let Some(pointer) = options.json_pointer.as_deref() {
        value = value.pointer_mut(pointer).map(serde_json::Value::take).ok_or_else(|| {
            AnalyzeError::malformed(origin, format!("JSON pointer `{pointer}` matched nothing"))
        })?;
    }

    let values = match options.jq_expr.as_deref() {
        None => vec![value],
        Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &value).map_err(|e| {
            AnalyzeError::Preprocess { origin: origin.to_string(), reason: e.to_string() }
        })?,
    };

    let many = values.len() > 1;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, v)| Document {
            origin: if many { format!("{origin}#{i}") } else { origin.to_string() },
            root: JsonValue::from(v),
        })
        .collect())
}

/// Expand literal paths and glob patterns. `-` stands for stdin.
pub fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<InputSource>, AnalyzeError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<InputSource>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == STDIN_MARKER {
            out.push(InputSource::Stdin);
        } else if has_glob_chars(pattern) {
            let glob_error = |reason: String| AnalyzeError::GlobPattern {
                pattern: pattern.to_string(),
                reason,
            };
            let mut matched = Vec::new();
            for entry in glob::glob(pattern).map_err(|e| glob_error(e.to_string()))? {
                matched.push(entry.map_err(|e| glob_error(e.to_string()))?);
            }
            if matched.is_empty() {
                // an explicit glob that matched nothing is an unavailable input
                return Err(AnalyzeError::InputUnavailable {
                    path: PathBuf::from(pattern),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "glob pattern matched no files",
                    ),
                });
            }
            out.extend(matched.into_iter().map(InputSource::File));
        } else {
            out.push(InputSource::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{"wrapper": {"ast": {"ext": []}}}"#;

    #[test]
    fn pointer_selects_subtree() {
        let options = InputOptions { json_pointer: Some("/wrapper/ast".into()), jq_expr: None };
        let docs = prepare_documents("a.json", DOC.as_bytes(), &options).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].origin, "a.json");
        assert!(docs[0].root.get("ext").is_some());
    }

    #[test]
    fn missing_pointer_is_malformed() {
        let options = InputOptions { json_pointer: Some("/nope".into()), jq_expr: None };
        assert!(matches!(
            prepare_documents("a.json", DOC.as_bytes(), &options),
            Err(AnalyzeError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn jq_outputs_become_documents() {
        let options = InputOptions { json_pointer: None, jq_expr: Some(".wrapper.ast, .wrapper.ast".into()) };
        let docs = prepare_documents("a.json", DOC.as_bytes(), &options).unwrap();
        let origins: Vec<&str> = docs.iter().map(|d| d.origin.as_str()).collect();
        assert_eq!(origins, ["a.json#0", "a.json#1"]);
    }

    #[test]
    fn bad_text_is_malformed() {
        assert!(matches!(
            prepare_documents("a.json", b"{", &InputOptions::default()),
            Err(AnalyzeError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let err = prepare_documents("a.json", b"{\"ext\": [\"\xff\"]}", &InputOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::MalformedDocument { ref origin, .. } if origin == "a.json"));
    }

    #[test]
    fn literal_paths_and_stdin() {
        let sources = resolve_file_path_patterns(["-", "ast.json"]).unwrap();
        assert_eq!(sources, vec![InputSource::Stdin, InputSource::File("ast.json".into())]);
    }

    #[test]
    fn unmatched_glob_is_unavailable() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(matches!(err, AnalyzeError::InputUnavailable { .. }));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = InputSource::File("/definitely/not/here.json".into()).read().unwrap_err();
        assert!(matches!(err, AnalyzeError::InputUnavailable { .. }));
    }
}
