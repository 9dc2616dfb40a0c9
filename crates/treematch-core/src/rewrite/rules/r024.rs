//! Rule 24: `IIF(c, t, f)` ≡ `CASE WHEN c THEN t ELSE f END`.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct IfAsCase;

impl RewriteRule for IfAsCase {
    fn id(&self) -> u16 {
        24
    }

    fn name(&self) -> &'static str {
        "if-as-case"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            // CASE branches are If nodes without an else slot; only the
            // standalone ternary form rewrites.
            let Node::If { cond, then, otherwise: Some(otherwise) } = node else {
                return Walk::Continue;
            };
            *node = Node::Case {
                operand: None,
                ifs: vec![Node::If {
                    cond: Box::new(cond.take()),
                    then: Box::new(then.take()),
                    otherwise: None,
                }],
                default: Some(Box::new(otherwise.take())),
            };
            changed = true;
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
    fn iif_matches_case_when() {
        assert_eq!(
            canon("SELECT IIF(dept_id = 2, 1, 0) FROM emp"),
            canon("SELECT CASE WHEN dept_id = 2 THEN 1 ELSE 0 END FROM emp"),
        );
    }
}
