//! Rule 104: canonical join order.
//!
//! When no join carries an explicit side, the joined relations are sorted
//! by the expression total order and every ON predicate is folded into one
//! AND chain on the first re-emitted join. Sided joins are order-sensitive
//! and left alone.

use crate::ast::{BinaryOp, Node};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::fold_left;
use crate::schema::Schema;

pub struct SortJoins;

impl RewriteRule for SortJoins {
    fn id(&self) -> u16 {
        104
    }

    fn name(&self) -> &'static str {
        "sort-joins"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        if select.joins.is_empty() {
            return false;
        }
        let Some(Node::From { this: from }) = &select.from else { return false };

        let mut tables = vec![(**from).clone()];
        let mut ons = Vec::new();
        for join in &select.joins {
            let Node::Join { this, on, side } = join else { return false };
            if side.is_some() {
                return false;
            }
            tables.push((**this).clone());
            if let Some(on) = on {
                ons.push((**on).clone());
            }
        }

        tables.sort_by_cached_key(Node::sort_key);
        ons.sort_by_cached_key(Node::sort_key);
        let combined = fold_left(BinaryOp::And, ons);

        let mut tables = tables.into_iter();
        let from = Node::From { this: Box::new(tables.next().expect("at least one table")) };
        let mut on = combined;
        let joins = tables
            .map(|table| Node::Join { this: Box::new(table), on: on.take().map(Box::new), side: None })
            .collect();

        let changed = select.from.as_ref() != Some(&from) || select.joins != joins;
        select.from = Some(from);
        select.joins = joins;
        changed
    }
}
