//! Rule 105: canonical operand order for commutative operators.
//!
//! `EQ`, `AND` and `OR` chains are flattened across associativity, sorted
//! by the expression total order, and rebuilt left-leaning.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::{flatten, fold_left};
use crate::schema::Schema;

pub struct SortCommutative;

impl RewriteRule for SortCommutative {
    fn id(&self) -> u16 {
        105
    }

    fn name(&self) -> &'static str {
        "sort-commutative"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            let Node::Binary { op: op @ (BinaryOp::Eq | BinaryOp::And | BinaryOp::Or), .. } = node
            else {
                return Walk::Continue;
            };
            let op = *op;
            let mut operands = flatten(node, op);
            operands.sort_by_cached_key(Node::sort_key);
            let rebuilt = fold_left(op, operands).expect("chain has operands");
            if *node != rebuilt {
                *node = rebuilt;
                changed = true;
            }
            Walk::Continue
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply, parse};

    fn normalized(sql: &str) -> Node {
        let mut tree = parse(sql);
        apply(&SortCommutative, &mut tree);
        tree
    }

    #[test]
    fn conjunction_order_is_canonical() {
        assert_eq!(
            normalized("SELECT emp.id FROM emp WHERE emp.a = 1 AND emp.b = 2"),
            normalized("SELECT emp.id FROM emp WHERE emp.b = 2 AND emp.a = 1"),
        );
    }

    #[test]
    fn equality_sides_are_ordered() {
        assert_eq!(
            normalized("SELECT emp.id FROM emp WHERE emp.id = 5"),
            normalized("SELECT emp.id FROM emp WHERE 5 = emp.id"),
        );
    }

    #[test]
    fn associative_chains_flatten_before_sorting() {
        assert_eq!(
            normalized("SELECT emp.id FROM emp WHERE (emp.a = 1 AND emp.b = 2) AND emp.c = 3"),
            normalized("SELECT emp.id FROM emp WHERE emp.c = 3 AND (emp.b = 2 AND emp.a = 1)"),
        );
    }
}
