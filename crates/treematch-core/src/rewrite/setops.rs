//! Set-operation rules 21, 3 and 5, applied at a statement root after both
//! arms have been canonicalized.

use tracing::debug;

use crate::ast::{BinaryOp, Node};
use crate::rewrite::rules::helpers::qualified_column;
use crate::rewrite::RuleSet;
use crate::schema::Schema;

pub(crate) fn apply(tree: &mut Node, schema: &Schema, rules: &RuleSet) {
    if rules.contains(21) && collapse_identical_arms(tree) {
        debug!("Applied Rule 21");
    }
    if rules.contains(3) && merge_unique_column_arms(tree, schema) {
        debug!("Applied Rule 3");
    }
    if rules.contains(5) && except_as_not_in(tree, schema) {
        debug!("Applied Rule 5");
    }
}

/// Rule 21: `q INTERSECT q` and `q UNION q` collapse to `q`.
fn collapse_identical_arms(tree: &mut Node) -> bool {
    match tree {
        Node::Union { left, right, all: false } | Node::Intersect { left, right, all: false }
            if left == right =>
        {
            *tree = left.take();
            true
        }
        _ => false,
    }
}

/// Rule 3: INTERSECT/UNION of two filters over the same unique column of
/// the same table merge into one WHERE with AND/OR.
fn merge_unique_column_arms(tree: &mut Node, schema: &Schema) -> bool {
    let (left, right, connective) = match tree {
        Node::Intersect { left, right, all: false } => (left, right, BinaryOp::And),
        Node::Union { left, right, all: false } => (left, right, BinaryOp::Or),
        _ => return false,
    };
    let (Some(first), Some(second)) = (left.as_select(), right.as_select()) else {
        return false;
    };

    if first.projection.len() != 1 || first.projection != second.projection {
        return false;
    }
    let Some((table, column)) = qualified_column(&first.projection[0]) else { return false };
    if !schema.is_unique(table, column) {
        return false;
    }
    if first.from != second.from {
        return false;
    }
    let (Some(Node::Where { this: first_where }), Some(Node::Where { this: second_where })) =
        (&first.selection, &second.selection)
    else {
        return false;
    };

    let merged = Node::Binary {
        op: connective,
        this: first_where.clone(),
        expression: second_where.clone(),
    };
    let mut merged_select = left.take();
    merged_select
        .as_select_mut()
        .expect("left arm is a select")
        .selection = Some(Node::Where { this: Box::new(merged) });
    *tree = merged_select;
    true
}

/// Rule 5: `(SELECT c FROM t …) EXCEPT q` ≡ the left arm filtered by
/// `c NOT IN (q)` when `c` is unique and non-null.
fn except_as_not_in(tree: &mut Node, schema: &Schema) -> bool {
    let Node::Except { left, right, all: false } = tree else { return false };
    let Some(outer) = left.as_select() else { return false };

    let [projected] = outer.projection.as_slice() else { return false };
    let Some((table, column)) = qualified_column(projected) else { return false };
    if !schema.is_unique(table, column) || !schema.is_non_null(table, column) {
        return false;
    }

    let exclusion = Node::Not {
        this: Box::new(Node::In {
            this: Box::new(projected.clone()),
            list: Vec::new(),
            query: Some(Box::new(Node::Subquery { this: Box::new(right.take()), alias: None })),
        }),
    };
    let mut kept = left.take();
    let select = kept.as_select_mut().expect("left arm is a select");
    let filter = match select.selection.take() {
        Some(Node::Where { this }) => Node::Binary {
            op: BinaryOp::And,
            this: Box::new(exclusion),
            expression: this,
        },
        _ => exclusion,
    };
    select.selection = Some(Node::Where { this: Box::new(filter) });
    *tree = kept;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{canon, canon_matches};

    #[test]
    fn identical_arms_collapse() {
        assert_eq!(
            canon("SELECT id FROM emp INTERSECT SELECT id FROM emp"),
            canon("SELECT id FROM emp"),
        );
    }

    #[test]
    fn union_all_of_identical_arms_is_kept() {
        assert_ne!(
            canon("SELECT id FROM emp UNION ALL SELECT id FROM emp"),
            canon("SELECT id FROM emp"),
        );
    }

    #[test]
    fn intersect_of_unique_column_filters_is_a_conjunction() {
        assert!(canon_matches(
            "SELECT id FROM emp WHERE dept_id = 1 INTERSECT SELECT id FROM emp WHERE name = 'a'",
            "SELECT id FROM emp WHERE dept_id = 1 AND name = 'a'",
        ));
    }

    #[test]
    fn union_of_unique_column_filters_is_a_disjunction() {
        assert!(canon_matches(
            "SELECT id FROM emp WHERE dept_id = 1 UNION SELECT id FROM emp WHERE dept_id = 2",
            "SELECT id FROM emp WHERE dept_id = 1 OR dept_id = 2",
        ));
    }

    #[test]
    fn except_filters_via_not_in() {
        assert!(canon_matches(
            "SELECT id FROM emp EXCEPT SELECT dept_id FROM emp",
            "SELECT id FROM emp WHERE id NOT IN (SELECT dept_id FROM emp)",
        ));
    }
}
