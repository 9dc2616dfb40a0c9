//! Rule 1: `WHERE c = (SELECT MIN(c) FROM t)` → `ORDER BY c ASC LIMIT 1`.
//!
//! Requires `c` unique in its table, a trivial subquery (single aggregate
//! over a single table, no joins) aggregating the same column, and no
//! existing ORDER BY or LIMIT. The matched equality is replaced by the
//! canonical TRUE. `MAX` is the symmetric descending form.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct MinMaxAsOrderLimit;

impl RewriteRule for MinMaxAsOrderLimit {
    fn id(&self) -> u16 {
        1
    }

    fn name(&self) -> &'static str {
        "min-max-as-order-limit"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        if select.order.is_some() || select.limit.is_some() {
            return false;
        }
        let Some(mut where_node) = select.selection.take() else { return false };

        let mut pending: Option<(Node, bool)> = None;
        where_node.rewrite(&mut |node| {
            if pending.is_some() {
                return Walk::SkipChildren;
            }
            let Node::Binary { op: BinaryOp::Eq, this, expression } = node else {
                return Walk::Continue;
            };
            let (column, subquery) = if matches!(**expression, Node::Subquery { .. }) {
                (&**this, &**expression)
            } else if matches!(**this, Node::Subquery { .. }) {
                (&**expression, &**this)
            } else {
                return Walk::Continue;
            };
            if let Some(order) = match_trivial_aggregate(column, subquery, schema) {
                pending = Some(order);
                *node = Node::truth();
                return Walk::SkipChildren;
            }
            Walk::Continue
        });

        select.selection = Some(where_node);
        let Some((column, desc)) = pending else { return false };
        select.order = Some(Node::Order {
            expressions: vec![Node::Ordered { this: Box::new(column), desc }],
        });
        select.limit = Some(Node::Limit { expression: Box::new(Node::number("1.0")) });
        true
    }
}

/// Checks that `subquery` is `(SELECT MIN(column) FROM t)` (or `MAX`) for
/// a unique `column`, returning the column and the descending flag.
fn match_trivial_aggregate(
    column: &Node,
    subquery: &Node,
    schema: &Schema,
) -> Option<(Node, bool)> {
    let Node::Subquery { this, .. } = subquery else { return None };
    let inner = this.as_select()?;
    if inner.from.is_none() || !inner.joins.is_empty() {
        return None;
    }
    let [aggregate] = inner.projection.as_slice() else { return None };
    let (aggregated, desc) = match aggregate {
        Node::Min { this } => (&**this, false),
        Node::Max { this } => (&**this, true),
        _ => return None,
    };
    if aggregated != column {
        return None;
    }
    let (table, name) = qualified_column(column)?;
    if !schema.is_unique(table, name) {
        return None;
    }
    Some((column.clone(), desc))
}
