//! Rule 22: `x BETWEEN a AND b` ≡ `x >= a AND x <= b`.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct BetweenAsRange;

impl RewriteRule for BetweenAsRange {
    fn id(&self) -> u16 {
        22
    }

    fn name(&self) -> &'static str {
        "between-as-range"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            if let Node::Between { this, low, high } = node {
                let column = this.take();
                *node = Node::Binary {
                    op: BinaryOp::And,
                    this: Box::new(Node::Binary {
                        op: BinaryOp::Gte,
                        this: Box::new(column.clone()),
                        expression: Box::new(low.take()),
                    }),
                    expression: Box::new(Node::Binary {
                        op: BinaryOp::Lte,
                        this: Box::new(column),
                        expression: Box::new(high.take()),
                    }),
                };
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
    use crate::test_utils::canon;

    #[test]
    fn between_matches_the_explicit_range() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE id BETWEEN 1 AND 10"),
            canon("SELECT name FROM emp WHERE id >= 1 AND id <= 10"),
        );
    }

    #[test]
    fn not_between_negates_the_range() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE id NOT BETWEEN 1 AND 10"),
            canon("SELECT name FROM emp WHERE NOT (id >= 1 AND id <= 10)"),
        );
    }
}
