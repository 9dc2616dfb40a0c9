//! Rule 8: `CAST(SUM(c) AS FLOAT) / COUNT(*)` ≡ `AVG(c)` for NOT NULL `c`.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct SumOverCountAsAvg;

impl RewriteRule for SumOverCountAsAvg {
    fn id(&self) -> u16 {
        8
    }

    fn name(&self) -> &'static str {
        "sum-over-count-as-avg"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            let Some(column) = match_ratio(node, schema) else { return Walk::Continue };
            *node = Node::Avg { this: Box::new(column) };
            changed = true;
            Walk::SkipChildren
        });
        changed
    }
}

fn match_ratio(node: &Node, schema: &Schema) -> Option<Node> {
    let Node::Binary { op: BinaryOp::Div, this, expression } = node else { return None };
    let Node::Cast { this: inner, to } = &**this else { return None };
    let Node::DataType { name } = &**to else { return None };
    if name != "float" {
        return None;
    }
    let Node::Sum { this: column } = &**inner else { return None };
    let Node::Count { this: star } = &**expression else { return None };
    if !matches!(**star, Node::Star) {
        return None;
    }
    let (table, name) = qualified_column(column)?;
    if !schema.is_non_null(table, name) {
        return None;
    }
    Some((**column).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn cast_sum_ratio_is_average() {
        assert_eq!(
            canon("SELECT CAST(SUM(id) AS FLOAT) / COUNT(*) FROM emp"),
            canon("SELECT AVG(id) FROM emp"),
        );
    }

    #[test]
    fn nullable_column_keeps_the_ratio() {
        assert_ne!(
            canon("SELECT CAST(SUM(dept_id) AS FLOAT) / COUNT(*) FROM emp"),
            canon("SELECT AVG(dept_id) FROM emp"),
        );
    }
}
