//! Rule 106: remove expression aliases.
//!
//! `expr AS x` becomes `expr`, and later references to `x` (e.g. in ORDER
//! BY) are rewritten to `expr` itself.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct RemoveAliases;

impl RewriteRule for RemoveAliases {
    fn id(&self) -> u16 {
        106
    }

    fn name(&self) -> &'static str {
        "remove-aliases"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        // Unwrap every Alias node, remembering (alias identifier, expr).
        let mut inlined: Vec<(Node, Node)> = Vec::new();
        tree.rewrite(&mut |node| {
            if let Node::Alias { this, alias } = node {
                inlined.push(((**alias).clone(), (**this).clone()));
                *node = this.take();
            }
            Walk::Continue
        });
        if inlined.is_empty() {
            return false;
        }

        // Rewrite references to the alias identifier to the expression. A
        // bare reference parses as an unqualified column over the alias
        // name.
        for (alias_ident, expr) in &inlined {
            tree.rewrite(&mut |node| {
                let is_reference = matches!(
                    node,
                    Node::Column { this, table: None } if **this == *alias_ident
                );
                if is_reference {
                    *node = expr.clone();
                    return Walk::SkipChildren;
                }
                Walk::Continue
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply, parse};

    #[test]
    fn unwraps_projection_aliases() {
        let mut tree = parse("SELECT emp.name AS n FROM emp");
        assert!(apply(&RemoveAliases, &mut tree));
        assert_eq!(tree.to_string(), "select emp.name from emp");
    }

    #[test]
    fn rewrites_order_by_references() {
        let mut tree = parse("SELECT emp.name AS n FROM emp ORDER BY n");
        assert!(apply(&RemoveAliases, &mut tree));
        assert_eq!(tree.to_string(), "select emp.name from emp order by emp.name");
    }

    #[test]
    fn unaliased_projection_is_untouched() {
        let mut tree = parse("SELECT emp.name FROM emp");
        assert!(!apply(&RemoveAliases, &mut tree));
    }
}
