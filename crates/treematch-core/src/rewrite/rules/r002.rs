//! Rule 2: drop DISTINCT over a unique column.
//!
//! `SELECT DISTINCT c` keeps its meaning without DISTINCT when `c` is
//! unique in its table and the query has no joins; likewise
//! `agg(DISTINCT c)` collapses to `agg(c)`.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct DropRedundantDistinct;

impl RewriteRule for DropRedundantDistinct {
    fn id(&self) -> u16 {
        2
    }

    fn name(&self) -> &'static str {
        "drop-redundant-distinct"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };
        if !select.joins.is_empty() {
            return false;
        }
        let mut changed = false;

        if select.distinct {
            let unique_projected = select.projection.iter().any(|item| {
                qualified_column(item)
                    .is_some_and(|(table, name)| schema.is_unique(table, name))
            });
            if unique_projected {
                select.distinct = false;
                changed = true;
            }
        }

        tree.rewrite(&mut |node| {
            let Node::Distinct { expressions } = node else { return Walk::Continue };
            let [column] = expressions.as_slice() else { return Walk::Continue };
            let unique = qualified_column(column)
                .is_some_and(|(table, name)| schema.is_unique(table, name));
            if unique {
                *node = column.clone();
                changed = true;
                return Walk::SkipChildren;
            }
            Walk::Continue
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn distinct_over_primary_key_is_dropped() {
        assert_eq!(
            canon("SELECT DISTINCT id FROM emp"),
            canon("SELECT id FROM emp"),
        );
    }

    #[test]
    fn distinct_over_plain_column_is_kept() {
        assert_ne!(
            canon("SELECT DISTINCT dept_id FROM emp"),
            canon("SELECT dept_id FROM emp"),
        );
    }

    #[test]
    fn count_distinct_over_unique_column_unwraps() {
        assert_eq!(
            canon("SELECT COUNT(DISTINCT id) FROM emp"),
            canon("SELECT COUNT(id) FROM emp"),
        );
    }
}
