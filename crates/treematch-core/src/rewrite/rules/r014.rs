//! Rule 14: primary/foreign-key join elimination.
//!
//! A join whose only contribution is matching a table's primary key against
//! the foreign key that references it adds no rows and no columns — unless
//! the query reads some other column of the primary table. In that case the
//! primary table is dropped and every reference to its key is rewritten to
//! the foreign key. Composite keys and sided joins are left alone.

use crate::ast::{BinaryOp, Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::{flatten, fold_left, qualified_column, table_name};
use crate::schema::Schema;

pub struct EliminateKeyJoin;

struct KeyPair {
    primary_table: String,
    primary_column: String,
    foreign_table: String,
    foreign_column: String,
    /// The matched ON conjunct, removed from the rebuilt chain.
    predicate: Node,
}

impl RewriteRule for EliminateKeyJoin {
    fn id(&self) -> u16 {
        14
    }

    fn name(&self) -> &'static str {
        "eliminate-key-join"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select() else { return false };
        if select.from.is_none() || select.joins.is_empty() || select.projection.is_empty() {
            return false;
        }

        // Dismantle the ON chains into conjuncts; any sided join disables
        // the rule.
        let mut conjuncts = Vec::new();
        for join in &select.joins {
            let Node::Join { on, side, .. } = join else { return false };
            if side.is_some() {
                return false;
            }
            if let Some(on) = on {
                conjuncts.extend(flatten(on, BinaryOp::And));
            }
        }

        let Some(pair) = conjuncts
            .iter()
            .find_map(|conjunct| match_key_pair(conjunct, schema))
        else {
            return false;
        };
        if !only_key_referenced(tree, &pair.primary_table, &pair.primary_column) {
            return false;
        }

        // Collect the surviving tables and conjuncts.
        let select = tree.as_select().expect("still a select");
        let mut tables: Vec<Node> = Vec::new();
        if let Some(Node::From { this }) = &select.from {
            tables.push((**this).clone());
        }
        for join in &select.joins {
            if let Node::Join { this, .. } = join {
                tables.push((**this).clone());
            }
        }
        let Some(position) = tables
            .iter()
            .position(|table| table_name(table) == Some(pair.primary_table.as_str()))
        else {
            return false;
        };
        tables.remove(position);
        if tables.is_empty() {
            return false;
        }
        conjuncts.retain(|conjunct| *conjunct != pair.predicate);

        // Rebuild FROM/JOIN: first surviving join carries the AND of the
        // remaining conjuncts (or the canonical TRUE when none are left).
        let select = tree.as_select_mut().expect("still a select");
        let mut tables = tables.into_iter();
        select.from = Some(Node::From { this: Box::new(tables.next().expect("nonempty")) });
        if tables.len() == 0 {
            // No join left to carry residual conjuncts; they keep filtering
            // rows from the WHERE clause instead.
            select.joins = Vec::new();
            if let Some(residual) = fold_left(BinaryOp::And, conjuncts) {
                let filter = match select.selection.take() {
                    Some(Node::Where { this }) => Node::Binary {
                        op: BinaryOp::And,
                        this,
                        expression: Box::new(residual),
                    },
                    _ => residual,
                };
                select.selection = Some(Node::Where { this: Box::new(filter) });
            }
        } else {
            let mut on = Some(fold_left(BinaryOp::And, conjuncts).unwrap_or_else(Node::truth));
            select.joins = tables
                .map(|table| Node::Join {
                    this: Box::new(table),
                    on: on.take().map(Box::new),
                    side: None,
                })
                .collect();
        }

        // Redirect every reference to the primary key onto the foreign key.
        let replacement = Node::column(pair.foreign_table.clone(), pair.foreign_column.clone());
        tree.rewrite(&mut |node| {
            let matches_key = qualified_column(node)
                .is_some_and(|(table, name)| {
                    table == pair.primary_table && name == pair.primary_column
                });
            if matches_key {
                *node = replacement.clone();
                return Walk::SkipChildren;
            }
            Walk::Continue
        });
        true
    }
}

/// Matches `t1.pk = t2.fk` (either orientation) against the schema's
/// declared key pairs, requiring a single-column primary key.
fn match_key_pair(conjunct: &Node, schema: &Schema) -> Option<KeyPair> {
    let Node::Binary { op: BinaryOp::Eq, this, expression } = conjunct else { return None };
    let (left_table, left_column) = qualified_column(this)?;
    let (right_table, right_column) = qualified_column(expression)?;

    let oriented = if schema.is_primary_key(left_table, left_column)
        && schema.references(right_table, right_column, left_table, left_column)
    {
        Some((left_table, left_column, right_table, right_column))
    } else if schema.is_primary_key(right_table, right_column)
        && schema.references(left_table, left_column, right_table, right_column)
    {
        Some((right_table, right_column, left_table, left_column))
    } else {
        None
    };
    let (primary_table, primary_column, foreign_table, foreign_column) = oriented?;
    if !schema.primary_key_is_single(primary_table) {
        return None;
    }
    Some(KeyPair {
        primary_table: primary_table.to_owned(),
        primary_column: primary_column.to_owned(),
        foreign_table: foreign_table.to_owned(),
        foreign_column: foreign_column.to_owned(),
        predicate: conjunct.clone(),
    })
}

/// True when no column of `table` other than `column` is referenced
/// anywhere in the query (nested statements keep their own scopes).
fn only_key_referenced(tree: &Node, table: &str, column: &str) -> bool {
    let mut clean = true;
    let mut root = true;
    tree.walk(&mut |node| {
        if root {
            root = false;
            return Walk::Continue;
        }
        if node.is_statement() {
            return Walk::SkipChildren;
        }
        if let Some((found_table, found_column)) = qualified_column(node) {
            if found_table == table && found_column != column {
                clean = false;
            }
            return Walk::SkipChildren;
        }
        Walk::Continue
    });
    clean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn unreferenced_primary_table_is_dropped() {
        assert_eq!(
            canon("SELECT e.name FROM emp e JOIN dept d ON e.dept_id = d.id"),
            canon("SELECT e.name FROM emp e"),
        );
    }

    #[test]
    fn referencing_the_primary_table_keeps_the_join() {
        assert_ne!(
            canon("SELECT e.name, d.name FROM emp e JOIN dept d ON e.dept_id = d.id"),
            canon("SELECT e.name FROM emp e"),
        );
    }

    #[test]
    fn primary_key_references_survive_as_foreign_key() {
        assert_eq!(
            canon("SELECT d.id FROM emp e JOIN dept d ON e.dept_id = d.id"),
            canon("SELECT dept_id FROM emp"),
        );
    }

    #[test]
    fn sided_joins_are_not_eliminated() {
        assert_ne!(
            canon("SELECT e.name FROM emp e LEFT JOIN dept d ON e.dept_id = d.id"),
            canon("SELECT e.name FROM emp e"),
        );
    }
}
