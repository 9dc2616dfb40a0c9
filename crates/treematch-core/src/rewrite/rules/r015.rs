//! Rule 15: merge adjacent SUBSTR prefix tests.
//!
//! `SUBSTR(c, 1, n) = 'X' AND SUBSTR(c, n+1, m) <op> 'Y'` compares two
//! adjacent slices of `c`, which is the single comparison `c <op> 'XY'`
//! with the literals concatenated and the second conjunct's operator kept.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::{flatten, fold_left, literal_f64};
use crate::schema::Schema;

pub struct MergeSubstringPrefix;

/// One `SUBSTR(col, start, length) <op> literal` conjunct, either
/// orientation.
struct SliceTest {
    column: Node,
    start: f64,
    length: Option<f64>,
    literal: String,
    op: BinaryOp,
}

impl RewriteRule for MergeSubstringPrefix {
    fn id(&self) -> u16 {
        15
    }

    fn name(&self) -> &'static str {
        "merge-substring-prefix"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            if !matches!(node, Node::Binary { op: BinaryOp::And, .. }) {
                return Walk::Continue;
            }
            let mut conjuncts = flatten(node, BinaryOp::And);
            let mut merged_any = false;
            while let Some((eq_index, other_index, merged)) = find_merge(&conjuncts) {
                // Remove the higher index first so the lower stays valid.
                let (first, second) = if eq_index > other_index {
                    (eq_index, other_index)
                } else {
                    (other_index, eq_index)
                };
                conjuncts.remove(first);
                conjuncts.remove(second);
                conjuncts.push(merged);
                merged_any = true;
            }
            if merged_any {
                *node = fold_left(BinaryOp::And, conjuncts).expect("conjuncts remain");
                changed = true;
                return Walk::SkipChildren;
            }
            Walk::Continue
        });
        changed
    }
}

/// Finds an `=` slice test starting at 1 and a relational slice test on the
/// same column starting right after it; returns their indices and the
/// merged comparison.
fn find_merge(conjuncts: &[Node]) -> Option<(usize, usize, Node)> {
    for (eq_index, conjunct) in conjuncts.iter().enumerate() {
        let Some(prefix) = match_slice_test(conjunct) else { continue };
        if prefix.op != BinaryOp::Eq || prefix.start != 1.0 {
            continue;
        }
        let Some(prefix_length) = prefix.length else { continue };
        for (other_index, other) in conjuncts.iter().enumerate() {
            if other_index == eq_index {
                continue;
            }
            let Some(suffix) = match_slice_test(other) else { continue };
            if !matches!(
                suffix.op,
                BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte
            ) {
                continue;
            }
            if suffix.column != prefix.column {
                continue;
            }
            if prefix.start + prefix_length != suffix.start {
                continue;
            }
            let merged = Node::Binary {
                op: suffix.op,
                this: Box::new(prefix.column.clone()),
                expression: Box::new(Node::string(format!(
                    "{}{}",
                    trim_float_suffix(&prefix.literal),
                    trim_float_suffix(&suffix.literal),
                ))),
            };
            return Some((eq_index, other_index, merged));
        }
    }
    None
}

fn match_slice_test(node: &Node) -> Option<SliceTest> {
    let Node::Binary { op, this, expression } = node else { return None };
    if !matches!(
        op,
        BinaryOp::Eq | BinaryOp::Gt | BinaryOp::Gte | BinaryOp::Lt | BinaryOp::Lte
    ) {
        return None;
    }
    let (substring, literal) = if matches!(**this, Node::Substring { .. }) {
        (&**this, &**expression)
    } else if matches!(**expression, Node::Substring { .. }) {
        (&**expression, &**this)
    } else {
        return None;
    };
    let Node::Substring { this: column, start, length } = substring else { return None };
    let Node::Literal { text, .. } = literal else { return None };
    Some(SliceTest {
        column: (**column).clone(),
        start: literal_f64(start.as_deref()?)?,
        length: length.as_deref().and_then(literal_f64),
        literal: text.clone(),
        op: *op,
    })
}

/// Numeric literals re-spelled by canonicalization read back as text here;
/// `12.0` contributes `12` to the concatenation.
fn trim_float_suffix(text: &str) -> &str {
    text.strip_suffix(".0").unwrap_or(text)
}
