//! Rule 11: star expansion.
//!
//! `t.*` (and a bare `*` over plain tables) expands to the schema-declared
//! column list, so star and explicit spellings of the same projection
//! converge. Any derived or unknown table in scope leaves the star alone.

use crate::ast::Node;
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::{ident_name, scope_tables, table_name};
use crate::schema::Schema;

pub struct ExpandStar;

impl RewriteRule for ExpandStar {
    fn id(&self) -> u16 {
        11
    }

    fn name(&self) -> &'static str {
        "expand-star"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select() else { return false };

        // Table names in scope, left to right; None while any relation is
        // derived or unknown, which disables bare-star expansion.
        let scope: Option<Vec<String>> = scope_tables(select)
            .into_iter()
            .map(|table| {
                table_name(table)
                    .filter(|name| schema.has_table(name))
                    .map(str::to_owned)
            })
            .collect();

        let mut expanded = Vec::with_capacity(select.projection.len());
        let mut changed = false;
        for item in &select.projection {
            let star_table = match item {
                Node::Column { this, table } if matches!(**this, Node::Star) => {
                    table.as_deref().and_then(ident_name)
                }
                _ => {
                    expanded.push(item.clone());
                    continue;
                }
            };
            let tables: Vec<String> = match (star_table, &scope) {
                // `t.*` needs only `t` to be known.
                (Some(name), _) if schema.has_table(name) => vec![name.to_owned()],
                (None, Some(scope)) if !scope.is_empty() => scope.clone(),
                _ => {
                    expanded.push(item.clone());
                    continue;
                }
            };
            for table in tables {
                let columns = schema.columns(&table).expect("table known to schema");
                for column in columns {
                    expanded.push(Node::column(table.clone(), column.clone()));
                }
            }
            changed = true;
        }

        if changed {
            let select = tree.as_select_mut().expect("still a select");
            select.projection = expanded;
        }
        changed
    }
}
