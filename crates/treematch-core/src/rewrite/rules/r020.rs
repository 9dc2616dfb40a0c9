//! Rule 20: self-membership subquery unwrapping.
//!
//! `c IN (SELECT c FROM t WHERE p)` — with the subquery projecting the very
//! same column from its own table — holds exactly when `p` holds, so the
//! membership test is replaced by the spliced-in inner predicate.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct UnwrapSelfInSubquery;

impl RewriteRule for UnwrapSelfInSubquery {
    fn id(&self) -> u16 {
        20
    }

    fn name(&self) -> &'static str {
        "unwrap-self-in-subquery"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        let Some(where_node) = &mut select.selection else { return false };

        let mut changed = false;
        where_node.rewrite(&mut |node| {
            if let Some(spliced) = match_self_membership(node) {
                *node = spliced;
                changed = true;
                return Walk::SkipChildren;
            }
            if matches!(node, Node::Subquery { .. }) {
                return Walk::SkipChildren;
            }
            Walk::Continue
        });
        changed
    }
}

fn match_self_membership(node: &Node) -> Option<Node> {
    let Node::In { this: column, query: Some(query), .. } = node else { return None };
    let Node::Subquery { this: inner, .. } = &**query else { return None };
    let inner = inner.as_select()?;

    let [projected] = inner.projection.as_slice() else { return None };
    if projected != &**column {
        return None;
    }
    let Node::Column { table: Some(column_table), .. } = &**column else { return None };
    let Some(Node::From { this: from }) = &inner.from else { return None };
    let Node::Table { this: from_table, .. } = &**from else { return None };
    if from_table != column_table {
        return None;
    }

    let Some(Node::Where { this: predicate }) = &inner.selection else { return None };
    Some((**predicate).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn self_membership_splices_the_inner_filter() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE id IN (SELECT id FROM emp WHERE dept_id = 2)"),
            canon("SELECT name FROM emp WHERE dept_id = 2"),
        );
    }

    #[test]
    fn membership_in_another_table_is_kept() {
        assert_ne!(
            canon("SELECT name FROM emp WHERE dept_id IN (SELECT id FROM dept WHERE name = 'x')"),
            canon("SELECT name FROM emp WHERE name = 'x'"),
        );
    }
}
