//! Rule 6: `COUNT(c)` ≡ `COUNT(*)` when `c` can never be NULL.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct CountNonNullColumn;

impl RewriteRule for CountNonNullColumn {
    fn id(&self) -> u16 {
        6
    }

    fn name(&self) -> &'static str {
        "count-non-null-column"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            let Node::Count { this } = node else { return Walk::Continue };
            let non_null = qualified_column(this)
                .is_some_and(|(table, name)| schema.is_non_null(table, name));
            if non_null {
                *node = Node::Count { this: Box::new(Node::Star) };
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
    fn count_of_not_null_column_is_count_star() {
        assert_eq!(canon("SELECT COUNT(name) FROM emp"), canon("SELECT COUNT(*) FROM emp"));
    }

    #[test]
    fn count_of_nullable_column_is_kept() {
        assert_ne!(
            canon("SELECT COUNT(dept_id) FROM emp"),
            canon("SELECT COUNT(*) FROM emp"),
        );
    }
}
