//! jq pre-processing of input documents (via jaq).
use anyhow::{anyhow, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`; every value the filter yields becomes one
/// output document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let mut it = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    while let Some(item) = it.next() {
        let v = item.map_err(|e| anyhow!("{e:?}"))?;
        // Val renders as JSON text
        let text = v.to_string();
        let value = serde_json::from_str::<Value>(&text)
            .map_err(|e| anyhow!("jq produced invalid JSON: {e}"))?;
        out.push(value);
    }
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn selects_wrapped_ast() {
        let input = json!({"meta": {"cc": "gcc"}, "ast": {"_nodetype": "FileAST", "ext": []}});
        let out = run_jaq(".ast", &input).unwrap();
        assert_eq!(out, vec![json!({"_nodetype": "FileAST", "ext": []})]);
    }

    #[test]
    fn streams_multiple_outputs() {
        let input = json!({"units": [{"ext": []}, {"ext": [1]}]});
        let out = run_jaq(".units[]", &input).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn reports_parse_errors() {
        assert!(run_jaq(".ast[", &json!({})).is_err());
    }
}
