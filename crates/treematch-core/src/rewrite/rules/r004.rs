//! Rule 4: grouping by a unique column makes the rest of the key redundant.
//!
//! Skipped when an ORDER BY is present, since pruning the grouping key can
//! change which columns are orderable.

use crate::ast::Node;
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct GroupByUniqueColumn;

impl RewriteRule for GroupByUniqueColumn {
    fn id(&self) -> u16 {
        4
    }

    fn name(&self) -> &'static str {
        "group-by-unique-column"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        if select.order.is_some() {
            return false;
        }
        let Some(Node::Group { expressions }) = &mut select.group else { return false };

        let unique = expressions.iter().position(|expr| {
            qualified_column(expr).is_some_and(|(table, name)| schema.is_unique(table, name))
        });
        let Some(index) = unique else { return false };
        if expressions.len() == 1 {
            return false;
        }
        let keep = expressions[index].clone();
        *expressions = vec![keep];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn unique_grouping_key_prunes_the_rest() {
        assert_eq!(
            canon("SELECT COUNT(*) FROM emp GROUP BY id, dept_id"),
            canon("SELECT COUNT(*) FROM emp GROUP BY id"),
        );
    }

    #[test]
    fn non_unique_keys_are_kept() {
        assert_ne!(
            canon("SELECT COUNT(*) FROM emp GROUP BY dept_id, name"),
            canon("SELECT COUNT(*) FROM emp GROUP BY dept_id"),
        );
    }
}
