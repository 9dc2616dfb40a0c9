//! Rule 18: literal IN lists expand to explicit disjunctions.
//!
//! `c IN (a, b)` ≡ `c = a OR c = b`; `c NOT IN (a, b)` ≡ `c != a AND
//! c != b`. Subquery membership belongs to rules 13 and 20.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::fold_left;
use crate::schema::Schema;

pub struct InListAsDisjunction;

impl RewriteRule for InListAsDisjunction {
    fn id(&self) -> u16 {
        18
    }

    fn name(&self) -> &'static str {
        "in-list-as-disjunction"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            // The negated form first: it consumes the inner In directly.
            if let Node::Not { this } = node {
                if let Node::In { this: column, list, query: None } = &**this {
                    if !list.is_empty() {
                        *node = expand(BinaryOp::Neq, BinaryOp::And, column, list);
                        changed = true;
                        return Walk::Continue;
                    }
                }
            }
            if let Node::In { this: column, list, query: None } = node {
                if !list.is_empty() {
                    *node = expand(BinaryOp::Eq, BinaryOp::Or, column, list);
                    changed = true;
                }
            }
            Walk::Continue
        });
        changed
    }
}

fn expand(comparison: BinaryOp, connective: BinaryOp, column: &Node, list: &[Node]) -> Node {
    let tests = list
        .iter()
        .map(|item| Node::Binary {
            op: comparison,
            this: Box::new(column.clone()),
            expression: Box::new(item.clone()),
        })
        .collect();
    fold_left(connective, tests).expect("list is nonempty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn in_list_matches_or_chain() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE id IN (1, 2, 3)"),
            canon("SELECT name FROM emp WHERE id = 1 OR id = 2 OR id = 3"),
        );
    }

    #[test]
    fn not_in_list_matches_and_chain() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE id NOT IN (1, 2)"),
            canon("SELECT name FROM emp WHERE id != 1 AND id != 2"),
        );
    }
}
