//! Shared pattern-matching helpers for the rule library.

use crate::ast::{BinaryOp, Node, Select};

/// `(table, column)` names of a table-qualified column reference whose both
/// parts are plain identifiers.
pub(crate) fn qualified_column(node: &Node) -> Option<(&str, &str)> {
    let Node::Column { this, table: Some(table) } = node else {
        return None;
    };
    Some((ident_name(table)?, ident_name(this)?))
}

/// Column name of any column reference, qualified or not.
pub(crate) fn column_name(node: &Node) -> Option<&str> {
    let Node::Column { this, .. } = node else { return None };
    ident_name(this)
}

pub(crate) fn ident_name(node: &Node) -> Option<&str> {
    match node {
        Node::Identifier { name, .. } => Some(name),
        _ => None,
    }
}

/// Name of a plain table factor (`Table` over an identifier). Derived
/// tables have no name.
pub(crate) fn table_name(node: &Node) -> Option<&str> {
    match node {
        Node::Table { this, .. } => ident_name(this),
        _ => None,
    }
}

/// The table factors in scope of a select: the FROM relation followed by
/// every joined relation.
pub(crate) fn scope_tables(select: &Select) -> Vec<&Node> {
    let mut tables = Vec::with_capacity(select.joins.len() + 1);
    if let Some(Node::From { this }) = &select.from {
        tables.push(&**this);
    }
    for join in &select.joins {
        if let Node::Join { this, .. } = join {
            tables.push(&**this);
        }
    }
    tables
}

/// Leaves of an associative chain of `op`, in syntactic order.
pub(crate) fn flatten(node: &Node, op: BinaryOp) -> Vec<Node> {
    match node {
        Node::Binary { op: found, this, expression } if *found == op => {
            let mut leaves = flatten(this, op);
            leaves.extend(flatten(expression, op));
            leaves
        }
        _ => vec![node.clone()],
    }
}

/// Rebuilds a left-leaning chain of `op` from `items`, in order.
pub(crate) fn fold_left(op: BinaryOp, items: Vec<Node>) -> Option<Node> {
    let mut iter = items.into_iter();
    let first = iter.next()?;
    Some(iter.fold(first, |acc, item| Node::Binary {
        op,
        this: Box::new(acc),
        expression: Box::new(item),
    }))
}

/// Numeric value of a literal, if it parses as one.
pub(crate) fn literal_f64(node: &Node) -> Option<f64> {
    match node {
        Node::Literal { text, .. } => text.parse().ok(),
        _ => None,
    }
}

/// Shortest decimal rendering of a float, the canonical numeric-literal
/// spelling (`150` → `"150.0"`, `1.5` → `"1.5"`).
pub(crate) fn format_number(value: f64) -> String {
    format!("{value:?}")
}
