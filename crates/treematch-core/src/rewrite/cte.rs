//! Rule 26: CTE inlining.
//!
//! Every table reference to a CTE alias becomes a derived-table subquery
//! over the CTE's body, later CTE bodies included, and the WITH clause is
//! dropped. `WITH x AS (q) SELECT * FROM x` then canonicalizes exactly
//! like `SELECT * FROM (q)`.

use crate::ast::{Node, Walk};
use crate::rewrite::rules::helpers::ident_name;

pub(crate) const RULE_ID: u16 = 26;

pub(crate) fn inline_ctes(tree: &mut Node) -> bool {
    let Some(select) = tree.as_select_mut() else { return false };
    let Some(Node::With { ctes }) = select.with.take() else { return false };

    let mut remaining = ctes;
    while !remaining.is_empty() {
        let cte = remaining.remove(0);
        let Node::Cte { this: body, alias } = cte else { continue };
        let Node::TableAlias { this: alias_ident } = *alias else { continue };
        let Some(alias_name) = ident_name(&alias_ident).map(str::to_owned) else { continue };

        let mut substitute = |node: &mut Node| {
            node.rewrite(&mut |node| {
                let is_reference = matches!(
                    node,
                    Node::Table { this, .. }
                        if ident_name(this).is_some_and(|name| name == alias_name)
                );
                if is_reference {
                    *node = Node::Subquery { this: body.clone(), alias: None };
                    return Walk::SkipChildren;
                }
                Walk::Continue
            });
        };
        substitute(tree);
        for later in &mut remaining {
            if let Node::Cte { this, .. } = later {
                substitute(this);
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{canon, parse};

    #[test]
    fn cte_reference_becomes_a_derived_table() {
        assert_eq!(
            canon("WITH x AS (SELECT id FROM emp) SELECT * FROM x"),
            canon("SELECT * FROM (SELECT id FROM emp)"),
        );
    }

    #[test]
    fn later_ctes_see_earlier_ones() {
        assert_eq!(
            canon(
                "WITH x AS (SELECT id FROM emp), y AS (SELECT id FROM x) SELECT * FROM y"
            ),
            canon("SELECT * FROM (SELECT id FROM (SELECT id FROM emp))"),
        );
    }

    #[test]
    fn inlining_drops_the_with_clause() {
        let mut tree = parse("WITH x AS (SELECT id FROM emp) SELECT * FROM x");
        assert!(inline_ctes(&mut tree));
        assert!(tree.as_select().expect("select").with.is_none());
    }
}
