//! Rule 13: key-membership subquery → join form.
//!
//! `FROM t2 WHERE c2 IN (SELECT c1 FROM t1 WHERE d)` filters `t2` rows by
//! key membership, which is exactly `FROM t2 JOIN t1 ON t1.c1 = t2.c2
//! WHERE d` when `t1.c1` is the primary key `t2.c2` references. The `=`
//! form against a single-row subquery rewrites the same way, provided the
//! inner filter pins a unique column.

use crate::ast::{BinaryOp, Node, Select};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct InSubqueryAsJoin;

impl RewriteRule for InSubqueryAsJoin {
    fn id(&self) -> u16 {
        13
    }

    fn name(&self) -> &'static str {
        "in-subquery-as-join"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select() else { return false };
        if !select.joins.is_empty() {
            return false;
        }
        let Some(Node::Where { this: condition }) = &select.selection else { return false };

        // The whole WHERE must be the membership predicate.
        let (outer_column, subquery, is_eq) = match &**condition {
            Node::In { this, query: Some(query), .. } => (&**this, &**query, false),
            Node::Binary { op: BinaryOp::Eq, this, expression }
                if matches!(**expression, Node::Subquery { .. }) =>
            {
                (&**this, &**expression, true)
            }
            _ => return false,
        };
        let Some((outer_table, outer_name)) = qualified_column(outer_column) else {
            return false;
        };
        let Node::Subquery { this: inner, .. } = subquery else { return false };
        let Some(inner) = inner.as_select() else { return false };
        let Some(rewrite) = plan_rewrite(inner, outer_table, outer_name, is_eq, schema) else {
            return false;
        };

        let outer_column = outer_column.clone();
        let select = tree.as_select_mut().expect("still a select");
        select.selection = Some(Node::Where { this: Box::new(rewrite.filter) });
        select.joins = vec![Node::Join {
            this: Box::new(rewrite.table),
            on: Some(Box::new(Node::Binary {
                op: BinaryOp::Eq,
                this: Box::new(rewrite.key),
                expression: Box::new(outer_column),
            })),
            side: None,
        }];
        true
    }
}

struct Rewrite {
    /// The inner table factor, promoted to a join.
    table: Node,
    /// The primary-key column of the inner table.
    key: Node,
    /// The inner WHERE body (or the canonical TRUE).
    filter: Node,
}

fn plan_rewrite(
    inner: &Select,
    outer_table: &str,
    outer_name: &str,
    is_eq: bool,
    schema: &Schema,
) -> Option<Rewrite> {
    if !inner.joins.is_empty() || inner.group.is_some() || inner.order.is_some() {
        return None;
    }
    let [inner_column] = inner.projection.as_slice() else { return None };
    let (inner_table, inner_name) = qualified_column(inner_column)?;
    let Some(Node::From { this: inner_from }) = &inner.from else { return None };
    if !matches!(&**inner_from, Node::Table { .. }) {
        return None;
    }

    if !schema.is_primary_key(inner_table, inner_name) {
        return None;
    }
    if !schema.references(outer_table, outer_name, inner_table, inner_name) {
        return None;
    }

    let filter = match &inner.selection {
        Some(Node::Where { this: inner_where }) => {
            if is_eq {
                // Single-row guarantee: the inner filter must pin a unique
                // column.
                let Node::Binary { op: BinaryOp::Eq, this, .. } = &**inner_where else {
                    return None;
                };
                let (table, name) = qualified_column(this)?;
                if !schema.is_unique(table, name) {
                    return None;
                }
            }
            (**inner_where).clone()
        }
        Some(_) => return None,
        None if is_eq => return None,
        None => Node::truth(),
    };

    Some(Rewrite {
        table: (**inner_from).clone(),
        key: inner_column.clone(),
        filter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn in_subquery_with_filter_becomes_join() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE dept_id IN (SELECT id FROM dept WHERE name = 'Sales')"),
            canon("SELECT emp.name FROM emp JOIN dept ON dept.id = emp.dept_id WHERE dept.name = 'Sales'"),
        );
    }

    #[test]
    fn eq_subquery_requires_a_unique_inner_filter() {
        assert_eq!(
            canon("SELECT name FROM emp WHERE dept_id = (SELECT id FROM dept WHERE id = 3)"),
            canon("SELECT emp.name FROM emp JOIN dept ON dept.id = emp.dept_id WHERE dept.id = 3"),
        );
        // dept.name is NOT NULL but not unique.
        assert_ne!(
            canon("SELECT name FROM emp WHERE dept_id = (SELECT id FROM dept WHERE name = 'Sales')"),
            canon("SELECT emp.name FROM emp JOIN dept ON dept.id = emp.dept_id WHERE dept.name = 'Sales'"),
        );
    }

    #[test]
    fn non_key_membership_is_left_alone() {
        assert_ne!(
            canon("SELECT name FROM emp WHERE name IN (SELECT name FROM dept)"),
            canon("SELECT emp.name FROM emp JOIN dept ON dept.name = emp.name"),
        );
    }
}
