//! Rule 108: drop identifier quoting.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct UnquoteIdentifiers;

impl RewriteRule for UnquoteIdentifiers {
    fn id(&self) -> u16 {
        108
    }

    fn name(&self) -> &'static str {
        "unquote-identifiers"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            if let Node::Identifier { quoted: quoted @ true, .. } = node {
                *quoted = false;
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
    fn quoted_and_bare_identifiers_converge() {
        let mut quoted = parse("SELECT \"name\" FROM \"emp\"");
        let bare = parse("SELECT name FROM emp");
        assert!(apply(&UnquoteIdentifiers, &mut quoted));
        assert_eq!(quoted, bare);
    }
}
