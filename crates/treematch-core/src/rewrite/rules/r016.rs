//! Rule 16: prefix LIKE → SUBSTR equality.
//!
//! `c LIKE 'abc%'` with the sole `%` at the end tests a fixed-length
//! prefix, i.e. `SUBSTR(c, 1, 3) = 'abc'`. This meets rule 15's slice
//! form, letting LIKE and SUBSTR spellings converge.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::format_number;
use crate::schema::Schema;

pub struct LikePrefixAsSubstring;

impl RewriteRule for LikePrefixAsSubstring {
    fn id(&self) -> u16 {
        16
    }

    fn name(&self) -> &'static str {
        "like-prefix-as-substring"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            let Node::Binary { op: BinaryOp::Like, this, expression } = node else {
                return Walk::Continue;
            };
            let Node::Literal { text, .. } = &**expression else { return Walk::Continue };
            // Exactly one wildcard, in final position.
            let Some(index) = text.find('%') else { return Walk::Continue };
            if index + 1 != text.len() {
                return Walk::Continue;
            }
            let prefix = text[..index].to_owned();
            let length = prefix.chars().count() as f64;
            *node = Node::Binary {
                op: BinaryOp::Eq,
                this: Box::new(Node::Substring {
                    this: Box::new(this.take()),
                    start: Some(Box::new(Node::number("1.0"))),
                    length: Some(Box::new(Node::number(format_number(length)))),
                }),
                expression: Box::new(Node::string(prefix)),
            };
            changed = true;
            Walk::SkipChildren
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn prefix_like_matches_substr_equality() {
        assert_eq!(
            canon("SELECT id FROM emp WHERE name LIKE 'bob%'"),
            canon("SELECT id FROM emp WHERE SUBSTR(name, 1, 3) = 'bob'"),
        );
    }

    #[test]
    fn infix_like_is_left_alone() {
        assert_ne!(
            canon("SELECT id FROM emp WHERE name LIKE '%bob%'"),
            canon("SELECT id FROM emp WHERE SUBSTR(name, 1, 3) = 'bob'"),
        );
    }
}
