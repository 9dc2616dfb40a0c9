//! Rule 10: `ORDER BY c LIMIT 1` with `c` projected ≡ `MIN(c)` / `MAX(c)`.
//!
//! The inverse direction of rule 1, pulled toward the aggregate form so
//! both spellings meet at the same normal form.

use crate::ast::Node;
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct OrderLimitAsMinMax;

impl RewriteRule for OrderLimitAsMinMax {
    fn id(&self) -> u16 {
        10
    }

    fn name(&self) -> &'static str {
        "order-limit-as-min-max"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        if select.from.is_none() {
            return false;
        }
        let Some(Node::Order { expressions }) = &select.order else { return false };
        let [Node::Ordered { this: order_column, desc }] = expressions.as_slice() else {
            return false;
        };
        let Some(Node::Limit { expression }) = &select.limit else { return false };
        let limit_is_one =
            matches!(&**expression, Node::Literal { text, .. } if text == "1.0");
        if !limit_is_one {
            return false;
        }

        let order_column = (**order_column).clone();
        let desc = *desc;
        let Some(position) =
            select.projection.iter().position(|item| *item == order_column)
        else {
            return false;
        };

        let aggregated = Box::new(order_column);
        select.projection[position] = if desc {
            Node::Max { this: aggregated }
        } else {
            Node::Min { this: aggregated }
        };
        select.order = None;
        select.limit = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn ascending_limit_one_becomes_min() {
        assert_eq!(
            canon("SELECT id FROM emp ORDER BY id ASC LIMIT 1"),
            canon("SELECT MIN(id) FROM emp"),
        );
    }

    #[test]
    fn descending_limit_one_becomes_max() {
        assert_eq!(
            canon("SELECT id FROM emp ORDER BY id DESC LIMIT 1"),
            canon("SELECT MAX(id) FROM emp"),
        );
    }

    #[test]
    fn unprojected_order_column_is_kept() {
        assert_ne!(
            canon("SELECT name FROM emp ORDER BY id LIMIT 1"),
            canon("SELECT MIN(name) FROM emp"),
        );
    }
}
