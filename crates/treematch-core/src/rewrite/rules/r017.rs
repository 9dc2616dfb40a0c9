//! Rule 17: `ORDER BY julianday(x)` orders like `ORDER BY x`.
//!
//! `julianday` is monotone in its argument, so the wrapper changes no
//! ordering.

use crate::ast::Node;
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct OrderByJulianday;

impl RewriteRule for OrderByJulianday {
    fn id(&self) -> u16 {
        17
    }

    fn name(&self) -> &'static str {
        "order-by-julianday"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        let Some(Node::Order { expressions }) = &mut select.order else { return false };
        let [Node::Ordered { this, .. }] = expressions.as_mut_slice() else { return false };
        let Node::Anonymous { name, expressions: args } = &mut **this else { return false };
        if name.as_str() != "julianday" || args.is_empty() {
            return false;
        }
        let argument = args[0].take();
        **this = argument;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn julianday_wrapper_is_dropped_from_order_by() {
        assert_eq!(
            canon("SELECT name FROM emp ORDER BY julianday(name)"),
            canon("SELECT name FROM emp ORDER BY name"),
        );
    }

    #[test]
    fn other_functions_keep_ordering_expressions() {
        assert_ne!(
            canon("SELECT name FROM emp ORDER BY lower(name)"),
            canon("SELECT name FROM emp ORDER BY name"),
        );
    }
}
