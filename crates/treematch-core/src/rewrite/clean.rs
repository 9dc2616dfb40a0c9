//! Vacuous-truth cleanup, run after every rule pass.
//!
//! Rules that erase a predicate leave the canonical TRUE
//! (`EQ(Literal "1.0", Literal "1.0")`) behind; this pass collapses
//! `AND`/`OR` around it and drops `WHERE TRUE` entirely.

use crate::ast::{BinaryOp, Node, Walk};

pub(crate) fn clean_truths(tree: &mut Node) -> bool {
    let mut changed = false;
    tree.rewrite(&mut |node| {
        while collapse(node) {
            changed = true;
        }
        if let Node::Select(select) = node {
            let vacuous = matches!(
                &select.selection,
                Some(Node::Where { this }) if this.is_truth()
            );
            if vacuous {
                select.selection = None;
                changed = true;
            }
        }
        Walk::Continue
    });
    changed
}

/// One step of `AND(TRUE, x)` / `OR(x, TRUE)` collapse at this node.
fn collapse(node: &mut Node) -> bool {
    let Node::Binary { op: BinaryOp::And | BinaryOp::Or, this, expression } = node else {
        return false;
    };
    if this.is_truth() {
        *node = expression.take();
        true
    } else if expression.is_truth() {
        *node = this.take();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Select;

    fn and(left: Node, right: Node) -> Node {
        Node::Binary { op: BinaryOp::And, this: Box::new(left), expression: Box::new(right) }
    }

    #[test]
    fn collapses_nested_truths() {
        let mut tree = Node::Where {
            this: Box::new(and(Node::truth(), and(Node::truth(), Node::column("emp", "id")))),
        };
        assert!(clean_truths(&mut tree));
        assert_eq!(tree, Node::Where { this: Box::new(Node::column("emp", "id")) });
    }

    #[test]
    fn drops_vacuous_where() {
        let mut tree = Node::Select(Box::new(Select {
            projection: vec![Node::column("emp", "id")],
            selection: Some(Node::Where { this: Box::new(Node::truth()) }),
            ..Default::default()
        }));
        assert!(clean_truths(&mut tree));
        assert_eq!(tree.as_select().expect("select").selection, None);
    }

    #[test]
    fn idempotent_on_clean_trees() {
        let mut tree = Node::Where { this: Box::new(Node::column("emp", "id")) };
        assert!(!clean_truths(&mut tree));
    }
}
