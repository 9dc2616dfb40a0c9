//! Rule 7: `c IS NOT NULL` is vacuous for a NOT NULL column.
//!
//! The predicate is replaced with the canonical TRUE, which the cleanup
//! pass then folds away. Subqueries are left to their own rewrite pass.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct DropNotNullCheck;

impl RewriteRule for DropNotNullCheck {
    fn id(&self) -> u16 {
        7
    }

    fn name(&self) -> &'static str {
        "drop-not-null-check"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        let Some(where_node) = &mut select.selection else { return false };

        let mut changed = false;
        where_node.rewrite(&mut |node| {
            if matches!(node, Node::Subquery { .. }) {
                return Walk::SkipChildren;
            }
            let Node::Not { this } = node else { return Walk::Continue };
            let Node::Binary { op: BinaryOp::Is, this: column, expression } = &**this else {
                return Walk::Continue;
            };
            if !matches!(**expression, Node::Null) {
                return Walk::Continue;
            }
            let non_null = qualified_column(column)
                .is_some_and(|(table, name)| schema.is_non_null(table, name));
            if non_null {
                *node = Node::truth();
                changed = true;
                return Walk::SkipChildren;
            }
            Walk::Continue
        });
        changed
    }
}
