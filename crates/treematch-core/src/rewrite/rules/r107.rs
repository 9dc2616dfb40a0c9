//! Rule 107: unwrap redundant parentheses.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct UnwrapParens;

impl RewriteRule for UnwrapParens {
    fn id(&self) -> u16 {
        107
    }

    fn name(&self) -> &'static str {
        "unwrap-parens"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            while let Node::Paren { this } = node {
                *node = this.take();
                changed = true;
            }
            Walk::Continue
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply, parse};

    #[test]
    fn removes_nested_parentheses() {
        let mut tree = parse("SELECT emp.id FROM emp WHERE ((emp.id = 1))");
        assert!(apply(&UnwrapParens, &mut tree));
        assert_eq!(tree.to_string(), "select emp.id from emp where emp.id = 1");
    }

    #[test]
    fn plain_predicates_are_untouched() {
        let mut tree = parse("SELECT emp.id FROM emp WHERE emp.id = 1");
        assert!(!apply(&UnwrapParens, &mut tree));
    }
}
