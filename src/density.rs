//! Conditional density: how many `If` nodes a function body holds.
//!
//! Two policies, never mixed within one run:
//!
//! - `Targeted` walks the statement list and only follows the branch fields of
//!   control flow (`iftrue`/`iffalse` of `If`, `stmt` of `While`/`For`), and only
//!   when that branch is a compound with `block_items`. A bare statement as a
//!   branch body (including an `else if` written without braces) is not descended.
//! - `WalkAll` visits every object below the body through every field and counts
//!   each node tagged `If`.
use serde::{Deserialize, Serialize};

use crate::ast::{AstNode, FOR, IF, WHILE};
use crate::navigate::block_items;
use crate::value::JsonValue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BranchPolicy {
    #[default]
    Targeted,
    WalkAll,
}

/// Count the conditionals under a compound body node. A body that is not a
/// compound (or has no statement list) counts 0.
pub fn count_conditionals(body: &JsonValue, policy: BranchPolicy) -> usize {
    match policy {
        BranchPolicy::Targeted => block_items(body).map(count_block).unwrap_or(0),
        BranchPolicy::WalkAll => count_everywhere(body),
    }
}

/// Targeted count over a statement sequence.
pub fn count_block(items: &[JsonValue]) -> usize {
    items.iter().map(count_statement).sum()
}

fn count_statement(item: &JsonValue) -> usize {
    let Ok(node) = AstNode::wrap(item) else {
        return 0;
    };
    match node.kind() {
        IF => 1 + count_branch(&node, "iftrue") + count_branch(&node, "iffalse"),
        WHILE | FOR => count_branch(&node, "stmt"),
        _ => 0,
    }
}

fn count_branch(node: &AstNode<'_>, field: &str) -> usize {
    node.field(field)
        .and_then(block_items)
        .map(count_block)
        .unwrap_or(0)
}

fn count_everywhere(value: &JsonValue) -> usize {
    match value {
        JsonValue::Array(xs) => xs.iter().map(count_everywhere).sum(),
        JsonValue::Object(_) => {
            let Ok(node) = AstNode::wrap(value) else {
                return 0;
            };
            let own = usize::from(node.is(IF));
            own + node.fields().map(|(_, v)| count_everywhere(v)).sum::<usize>()
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn compound(items: Vec<Value>) -> Value {
        json!({"_nodetype": "Compound", "block_items": items})
    }

    fn if_node(iftrue: Value, iffalse: Value) -> Value {
        json!({
            "_nodetype": "If",
            "cond": {"_nodetype": "ID", "name": "x"},
            "iftrue": iftrue,
            "iffalse": iffalse
        })
    }

    fn leaf_if() -> Value {
        if_node(Value::Null, Value::Null)
    }

    fn count(body: Value, policy: BranchPolicy) -> usize {
        count_conditionals(&JsonValue::from(body), policy)
    }

    #[test]
    fn counts_both_arms() {
        let body = compound(vec![if_node(
            compound(vec![leaf_if(), leaf_if()]),
            compound(vec![leaf_if()]),
        )]);
        assert_eq!(count(body.clone(), BranchPolicy::Targeted), 4);
        assert_eq!(count(body, BranchPolicy::WalkAll), 4);
    }

    #[test]
    fn descends_into_loop_bodies() {
        let body = compound(vec![
            json!({"_nodetype": "While", "cond": {}, "stmt": compound(vec![leaf_if()])}),
            json!({"_nodetype": "For", "init": null, "stmt": compound(vec![
                leaf_if(),
                json!({"_nodetype": "While", "stmt": compound(vec![leaf_if()])}),
            ])}),
        ]);
        assert_eq!(count(body, BranchPolicy::Targeted), 3);
    }

    #[test]
    fn non_compound_branches_are_not_descended() {
        // if (a) if (b) ...;  while (c) if (d) ...;  for (;;) if (e) ...;
        let body = compound(vec![
            if_node(leaf_if(), Value::Null),
            json!({"_nodetype": "While", "stmt": leaf_if()}),
            json!({"_nodetype": "For", "stmt": leaf_if()}),
        ]);
        assert_eq!(count(body.clone(), BranchPolicy::Targeted), 1);
        assert_eq!(count(body, BranchPolicy::WalkAll), 4);
    }

    #[test]
    fn else_if_chain_without_braces() {
        let body = compound(vec![if_node(compound(vec![]), if_node(Value::Null, Value::Null))]);
        assert_eq!(count(body.clone(), BranchPolicy::Targeted), 1);
        assert_eq!(count(body, BranchPolicy::WalkAll), 2);
    }

    #[test]
    fn other_statements_are_opaque_to_targeted() {
        let body = compound(vec![
            json!({"_nodetype": "Compound", "block_items": [leaf_if()]}),
            json!({"_nodetype": "DoWhile", "stmt": compound(vec![leaf_if()])}),
            json!({"_nodetype": "Switch", "stmt": compound(vec![leaf_if()])}),
        ]);
        assert_eq!(count(body.clone(), BranchPolicy::Targeted), 0);
        assert_eq!(count(body, BranchPolicy::WalkAll), 3);
    }

    #[test]
    fn malformed_bodies_count_zero() {
        assert_eq!(count(json!(null), BranchPolicy::Targeted), 0);
        assert_eq!(count(json!({"block_items": null}), BranchPolicy::Targeted), 0);
        assert_eq!(count(json!({"block_items": {"_nodetype": "If"}}), BranchPolicy::Targeted), 0);
        assert_eq!(count(json!({"block_items": [1, "If", null]}), BranchPolicy::Targeted), 0);
        assert_eq!(count(json!("If"), BranchPolicy::WalkAll), 0);
    }

    #[test]
    fn empty_compound_with_null_items() {
        let body = compound(vec![if_node(json!({"_nodetype": "Compound", "block_items": null}), Value::Null)]);
        assert_eq!(count(body, BranchPolicy::Targeted), 1);
    }

    #[test]
    fn policy_names() {
        assert_eq!(serde_json::to_value(BranchPolicy::WalkAll).unwrap(), json!("walk-all"));
        assert_eq!(BranchPolicy::default(), BranchPolicy::Targeted);
    }
}
