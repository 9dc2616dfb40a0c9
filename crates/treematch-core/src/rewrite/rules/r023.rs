//! Rule 23: push NOT through comparisons.
//!
//! `NOT (a = b)` ≡ `a != b` and so on for every relational operator.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct PushNotIntoComparison;

impl RewriteRule for PushNotIntoComparison {
    fn id(&self) -> u16 {
        23
    }

    fn name(&self) -> &'static str {
        "push-not-into-comparison"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            let Node::Not { this } = node else { return Walk::Continue };
            let Node::Binary { op, .. } = &**this else { return Walk::Continue };
            let Some(negated) = op.negated() else { return Walk::Continue };
            let Node::Binary { this: left, expression: right, .. } = &mut **this else {
                unreachable!();
            };
            *node = Node::Binary {
                op: negated,
                this: Box::new(left.take()),
                expression: Box::new(right.take()),
            };
            changed = true;
            Walk::Continue
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn negated_equality_is_inequality() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE NOT id = 3"),
            canon("SELECT name FROM emp WHERE id != 3"),
        );
    }

    #[test]
    fn negated_less_than_is_at_least() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE NOT id < 3"),
            canon("SELECT name FROM emp WHERE id >= 3"),
        );
    }

    #[test]
    fn not_like_is_not_rewritten() {
        assert_ne!(
            canon("SELECT name FROM emp WHERE name NOT LIKE 'a_b'"),
            canon("SELECT name FROM emp WHERE name LIKE 'a_b'"),
        );
    }
}
