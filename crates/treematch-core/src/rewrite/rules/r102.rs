//! Rule 102: order the projection list by the expression total order.

use crate::ast::Node;
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct SortProjection;

impl RewriteRule for SortProjection {
    fn id(&self) -> u16 {
        102
    }

    fn name(&self) -> &'static str {
        "sort-projection"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        let before = select.projection.clone();
        select.projection.sort_by_cached_key(Node::sort_key);
        select.projection != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply, parse};

    #[test]
    fn orders_columns_by_rendering() {
        let mut tree = parse("SELECT emp.name, emp.id FROM emp");
        assert!(apply(&SortProjection, &mut tree));
        assert!(tree.to_string().starts_with("select emp.id, emp.name"));
    }

    #[test]
    fn aggregates_sort_after_columns_by_tag() {
        let mut tree = parse("SELECT MIN(emp.id), emp.name FROM emp");
        assert!(apply(&SortProjection, &mut tree));
        assert!(tree.to_string().starts_with("select emp.name, min(emp.id)"));
    }

    #[test]
    fn sorted_projection_is_stable() {
        let mut tree = parse("SELECT emp.id, emp.name FROM emp");
        assert!(!apply(&SortProjection, &mut tree));
    }
}
