//! Rule 101: qualify unqualified column references when unambiguous.
//!
//! With a single plain table in scope every bare column is attached to it.
//! With joins, a column is attached to the unique table whose schema
//! declares it; zero or several candidates leave it unqualified. Bare `*`
//! projections are wrapped into `Column(Star)` so later star expansion sees
//! one shape; a star never picks up a table under joins.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::{column_name, table_name};
use crate::schema::Schema;

pub struct QualifyColumns;

enum Scope {
    /// Single plain table; qualify everything with it.
    Single(String),
    /// Joined plain tables; qualify by unique schema membership.
    Multi(Vec<String>),
    /// Derived table in scope; leave columns untouched.
    Opaque,
}

impl RewriteRule for QualifyColumns {
    fn id(&self) -> u16 {
        101
    }

    fn name(&self) -> &'static str {
        "qualify-columns"
    }

    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select() else { return false };
        let Some(Node::From { this: from }) = &select.from else { return false };

        let scope = if select.joins.is_empty() {
            match table_name(from) {
                Some(name) => Scope::Single(name.to_owned()),
                None => Scope::Opaque,
            }
        } else {
            let mut names = Vec::new();
            if let Some(name) = table_name(from) {
                names.push(name.to_owned());
            }
            for join in &select.joins {
                if let Node::Join { this, .. } = join {
                    if let Some(name) = table_name(this) {
                        names.push(name.to_owned());
                    }
                }
            }
            Scope::Multi(names)
        };

        let mut changed = false;
        tree.rewrite(&mut |node| match node {
            // COUNT(*) keeps its bare star.
            Node::Count { this } if matches!(**this, Node::Star) => Walk::SkipChildren,
            Node::Column { .. } => {
                changed |= qualify(node, &scope, schema);
                Walk::SkipChildren
            }
            Node::Star => {
                *node = Node::Column { this: Box::new(Node::Star), table: None };
                changed |= qualify(node, &scope, schema);
                changed = true;
                Walk::SkipChildren
            }
            _ => Walk::Continue,
        });
        changed
    }
}

fn qualify(column: &mut Node, scope: &Scope, schema: &Schema) -> bool {
    let is_star = match &*column {
        Node::Column { this, table: None } => matches!(**this, Node::Star),
        _ => return false,
    };
    let owner = match scope {
        Scope::Opaque => return false,
        Scope::Single(name) => name.clone(),
        Scope::Multi(names) => {
            if is_star {
                return false;
            }
            let Some(name) = column_name(column) else { return false };
            let owners = schema.tables_containing(names, name);
            let [owner] = owners.as_slice() else { return false };
            (*owner).clone()
        }
    };
    if let Node::Column { table, .. } = column {
        *table = Some(Box::new(Node::ident(owner)));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply, parse};

    #[test]
    fn single_table_scope_qualifies_everything() {
        let mut tree = parse("SELECT name FROM emp WHERE id = 1");
        assert!(apply(&QualifyColumns, &mut tree));
        let rendered = tree.to_string();
        assert!(rendered.contains("emp.name"));
        assert!(rendered.contains("emp.id"));
    }

    #[test]
    fn join_scope_uses_schema_membership() {
        let mut tree = parse("SELECT dept_id FROM emp JOIN dept ON emp.dept_id = dept.id");
        assert!(apply(&QualifyColumns, &mut tree));
        assert!(tree.to_string().starts_with("select emp.dept_id"));
    }

    #[test]
    fn ambiguous_columns_stay_bare() {
        // Both tables declare `name`.
        let mut tree = parse("SELECT name FROM emp JOIN dept ON emp.dept_id = dept.id");
        assert!(!apply(&QualifyColumns, &mut tree));
        assert!(tree.to_string().starts_with("select name"));
    }

    #[test]
    fn bare_star_is_wrapped_and_qualified() {
        let mut tree = parse("SELECT * FROM emp");
        assert!(apply(&QualifyColumns, &mut tree));
        assert!(tree.to_string().starts_with("select emp.*"));
    }

    #[test]
    fn derived_table_scope_keeps_columns_bare() {
        let mut tree = parse("SELECT id FROM (SELECT id FROM emp)");
        assert!(!apply(&QualifyColumns, &mut tree));
    }
}
