//! Rule 19: equi-join equality propagation.
//!
//! A join predicate `t1.a = t2.b` makes the two columns interchangeable in
//! the joined rows: uniqueness and non-nullability carry across (recorded
//! in the per-call schema clone), and downstream references to the
//! right-hand column rewrite to the left-hand one. With operands already in
//! canonical order this substitutes toward the lexicographically smaller
//! reference. The join predicates themselves and nested statements are
//! left untouched.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::{flatten, qualified_column};
use crate::schema::Schema;

pub struct PropagateJoinEquality;

impl RewriteRule for PropagateJoinEquality {
    fn id(&self) -> u16 {
        19
    }

    fn name(&self) -> &'static str {
        "propagate-join-equality"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select() else { return false };

        let mut equalities = Vec::new();
        for join in &select.joins {
            let Node::Join { on: Some(on), side: None, .. } = join else { continue };
            for conjunct in flatten(on, BinaryOp::And) {
                if column_pair(&conjunct).is_some() {
                    equalities.push(conjunct);
                }
            }
        }
        if equalities.is_empty() {
            return false;
        }

        let mut changed = false;
        for equality in &equalities {
            let Some(((left_table, left_name), (right_table, right_name))) =
                column_pair(equality).map(|(l, r)| {
                    ((l.0.to_owned(), l.1.to_owned()), (r.0.to_owned(), r.1.to_owned()))
                })
            else {
                continue;
            };

            // Either side's declared properties hold for the other in the
            // joined relation.
            if schema.is_unique(&left_table, &left_name) {
                schema.mark_unique(&right_table, &right_name);
            }
            if schema.is_unique(&right_table, &right_name) {
                schema.mark_unique(&left_table, &left_name);
            }
            if schema.is_non_null(&left_table, &left_name) {
                schema.mark_non_null(&right_table, &right_name);
            }
            if schema.is_non_null(&right_table, &right_name) {
                schema.mark_non_null(&left_table, &left_name);
            }

            let Node::Binary { this: replacement, expression: target, .. } = equality else {
                continue;
            };
            if replacement == target {
                continue;
            }
            let mut root = true;
            tree.rewrite(&mut |node| {
                if root {
                    root = false;
                    return Walk::Continue;
                }
                if node.is_statement() {
                    return Walk::SkipChildren;
                }
                if equalities.iter().any(|eq| eq == node) {
                    return Walk::SkipChildren;
                }
                if node == &**target {
                    *node = (**replacement).clone();
                    changed = true;
                    return Walk::SkipChildren;
                }
                Walk::Continue
            });
        }
        changed
    }
}

fn column_pair(node: &Node) -> Option<((&str, &str), (&str, &str))> {
    let Node::Binary { op: BinaryOp::Eq, this, expression } = node else { return None };
    Some((qualified_column(this)?, qualified_column(expression)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply, canon, emp_dept_schema, parse};

    #[test]
    fn join_equality_extends_schema_properties() {
        let mut tree = parse("SELECT emp.name FROM emp JOIN dept ON emp.dept_id = dept.id");
        let mut schema = emp_dept_schema();
        assert!(!schema.is_unique("emp", "dept_id"));
        PropagateJoinEquality.apply(&mut tree, &mut schema);
        assert!(schema.is_unique("emp", "dept_id"));
        assert!(schema.is_non_null("emp", "dept_id"));
    }

    #[test]
    fn downstream_references_rewrite_to_the_left_side() {
        let mut tree = parse(
            "SELECT emp.dept_id FROM emp JOIN dept ON dept.id = emp.dept_id WHERE emp.dept_id = 3",
        );
        assert!(apply(&PropagateJoinEquality, &mut tree));
        let rendered = tree.to_string();
        assert!(rendered.starts_with("select dept.id"));
        assert!(rendered.contains("where dept.id = 3"));
        // The join predicate itself is not collapsed into a tautology.
        assert!(rendered.contains("on dept.id = emp.dept_id"));
    }

    #[test]
    fn joined_key_references_are_interchangeable() {
        assert_eq!(
            canon("SELECT dept.id FROM emp JOIN dept ON emp.dept_id = dept.id WHERE dept.id = 3"),
            canon("SELECT emp.dept_id FROM emp JOIN dept ON emp.dept_id = dept.id WHERE emp.dept_id = 3"),
        );
    }
}
