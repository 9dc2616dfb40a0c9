//! Rule 103: inline table aliases.
//!
//! Every FROM/JOIN relation alias is removed and references to the alias
//! identifier are rewritten to the relation itself (its identifier for a
//! plain table, its body for a derived table), so differently-aliased but
//! otherwise identical queries converge.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::schema::Schema;

pub struct InlineTableAliases;

impl RewriteRule for InlineTableAliases {
    fn id(&self) -> u16 {
        103
    }

    fn name(&self) -> &'static str {
        "inline-table-aliases"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select_mut() else { return false };

        // Strip the aliases first, remembering (alias identifier, referent).
        let mut inlined: Vec<(Node, Node)> = Vec::new();
        let mut strip = |relation: &mut Node| {
            let (alias_slot, referent) = match relation {
                Node::Table { this, alias } => (alias, (**this).clone()),
                Node::Subquery { this, alias } => (alias, (**this).clone()),
                _ => return,
            };
            if let Some(alias) = alias_slot.take() {
                if let Node::TableAlias { this } = *alias {
                    inlined.push(((*this).clone(), referent));
                }
            }
        };
        if let Some(Node::From { this }) = &mut select.from {
            strip(this);
        }
        for join in &mut select.joins {
            if let Node::Join { this, .. } = join {
                strip(this);
            }
        }
        if inlined.is_empty() {
            return false;
        }

        for (alias_ident, referent) in &inlined {
            tree.rewrite(&mut |node| {
                if matches!(node, Node::TableAlias { .. }) {
                    return Walk::SkipChildren;
                }
                if node == alias_ident {
                    *node = referent.clone();
                    return Walk::SkipChildren;
                }
                Walk::Continue
            });
        }
        true
    }
}
