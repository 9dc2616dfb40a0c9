//! Rule 9: conditional COUNT ≡ conditional SUM.
//!
//! `COUNT(CASE WHEN p THEN 1 ELSE NULL END)` counts exactly the rows where
//! `p` holds, as does `SUM(CASE WHEN p THEN 1 ELSE 0 END)`; both normalize
//! to the SUM form. The THEN branch may also be a NOT NULL column.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::qualified_column;
use crate::schema::Schema;

pub struct CountCaseAsSumCase;

impl RewriteRule for CountCaseAsSumCase {
    fn id(&self) -> u16 {
        9
    }

    fn name(&self) -> &'static str {
        "count-case-as-sum-case"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            let Some(condition) = match_conditional_count(node, schema) else {
                return Walk::Continue;
            };
            *node = Node::Sum {
                this: Box::new(Node::Case {
                    operand: None,
                    ifs: vec![Node::If {
                        cond: Box::new(condition),
                        then: Box::new(Node::number("1.0")),
                        otherwise: None,
                    }],
                    default: Some(Box::new(Node::number("0"))),
                }),
            };
            changed = true;
            Walk::SkipChildren
        });
        changed
    }
}

fn match_conditional_count(node: &Node, schema: &Schema) -> Option<Node> {
    let Node::Count { this } = node else { return None };
    let Node::Case { operand: None, ifs, default } = &**this else { return None };
    if !matches!(default.as_deref(), None | Some(Node::Null)) {
        return None;
    }
    let [Node::If { cond, then, .. }] = ifs.as_slice() else { return None };
    match &**then {
        Node::Literal { text, .. } if text == "1.0" => {}
        column @ Node::Column { .. } => {
            let (table, name) = qualified_column(column)?;
            if !schema.is_non_null(table, name) {
                return None;
            }
        }
        _ => return None,
    }
    Some((**cond).clone())
}
