//! Rule 100: lowercase every identifier-like string in the tree.
//!
//! Literal values are case-sensitive data and are left alone.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct LowercaseIdentifiers;

impl RewriteRule for LowercaseIdentifiers {
    fn id(&self) -> u16 {
        100
    }

    fn name(&self) -> &'static str {
        "lowercase-identifiers"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            match node {
                Node::Literal { .. } => return Walk::SkipChildren,
                Node::Identifier { name, .. }
                | Node::Anonymous { name, .. }
                | Node::DataType { name } => {
                    let lowered = name.to_lowercase();
                    if *name != lowered {
                        *name = lowered;
                        changed = true;
                    }
                }
                _ => {}
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
    fn lowercases_identifiers_but_not_literals() {
        let mut tree = parse("SELECT Name FROM Emp WHERE Name = 'Bob'");
        assert!(apply(&LowercaseIdentifiers, &mut tree));
        let rendered = tree.to_string();
        assert!(rendered.contains("from emp"));
        assert!(rendered.contains("'Bob'"));
    }

    #[test]
    fn already_lowercase_is_a_no_op() {
        let mut tree = parse("SELECT name FROM emp");
        assert!(!apply(&LowercaseIdentifiers, &mut tree));
    }
}
