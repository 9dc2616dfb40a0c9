//! Deterministic SQL-ish rendering.
//!
//! The rendered form feeds the expression total order and the verbose rule
//! traces, so it must be stable across runs and platforms. It is not
//! guaranteed to be re-parsable SQL.

use std::fmt;

use super::Node;

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Select(select) => {
                if let Some(with) = &select.with {
                    write!(f, "{with} ")?;
                }
                f.write_str("select ")?;
                if select.distinct {
                    f.write_str("distinct ")?;
                }
                write_list(f, &select.projection)?;
                if let Some(from) = &select.from {
                    write!(f, " {from}")?;
                }
                for join in &select.joins {
                    write!(f, " {join}")?;
                }
                if let Some(node) = &select.selection {
                    write!(f, " {node}")?;
                }
                if let Some(node) = &select.group {
                    write!(f, " {node}")?;
                }
                if let Some(node) = &select.having {
                    write!(f, " {node}")?;
                }
                if let Some(node) = &select.order {
                    write!(f, " {node}")?;
                }
                if let Some(node) = &select.limit {
                    write!(f, " {node}")?;
                }
                Ok(())
            }
            Node::Union { left, right, all } => {
                write!(f, "{left} union {}{right}", if *all { "all " } else { "" })
            }
            Node::Intersect { left, right, all } => {
                write!(f, "{left} intersect {}{right}", if *all { "all " } else { "" })
            }
            Node::Except { left, right, all } => {
                write!(f, "{left} except {}{right}", if *all { "all " } else { "" })
            }
            Node::From { this } => write!(f, "from {this}"),
            Node::Join { this, on, side } => {
                if let Some(side) = side {
                    write!(f, "{} ", side.sql())?;
                }
                write!(f, "join {this}")?;
                if let Some(on) = on {
                    write!(f, " on {on}")?;
                }
                Ok(())
            }
            Node::Where { this } => write!(f, "where {this}"),
            Node::Group { expressions } => {
                f.write_str("group by ")?;
                write_list(f, expressions)
            }
            Node::Having { this } => write!(f, "having {this}"),
            Node::Order { expressions } => {
                f.write_str("order by ")?;
                write_list(f, expressions)
            }
            Node::Ordered { this, desc } => {
                write!(f, "{this}{}", if *desc { " desc" } else { "" })
            }
            Node::Limit { expression } => write!(f, "limit {expression}"),
            Node::With { ctes } => {
                f.write_str("with ")?;
                write_list(f, ctes)
            }
            Node::Cte { this, alias } => write!(f, "{alias} as ({this})"),
            Node::Table { this, alias } => {
                write!(f, "{this}")?;
                if let Some(alias) = alias {
                    write!(f, " as {alias}")?;
                }
                Ok(())
            }
            Node::TableAlias { this } => write!(f, "{this}"),
            Node::Identifier { name, quoted } => {
                if *quoted {
                    write!(f, "\"{name}\"")
                } else {
                    f.write_str(name)
                }
            }
            Node::Column { this, table } => {
                if let Some(table) = table {
                    write!(f, "{table}.")?;
                }
                write!(f, "{this}")
            }
            Node::Star => f.write_str("*"),
            Node::Literal { text, is_string } => {
                if *is_string {
                    write!(f, "'{text}'")
                } else {
                    f.write_str(text)
                }
            }
            Node::Null => f.write_str("null"),
            Node::Alias { this, alias } => write!(f, "{this} as {alias}"),
            Node::Paren { this } => write!(f, "({this})"),
            Node::Subquery { this, alias } => {
                write!(f, "({this})")?;
                if let Some(alias) = alias {
                    write!(f, " as {alias}")?;
                }
                Ok(())
            }
            Node::Binary { op, this, expression } => {
                write!(f, "{this} {} {expression}", op.sql())
            }
            Node::Not { this } => write!(f, "not {this}"),
            Node::In { this, list, query } => {
                write!(f, "{this} in (")?;
                if let Some(query) = query {
                    write!(f, "{query}")?;
                } else {
                    write_list(f, list)?;
                }
                f.write_str(")")
            }
            Node::Exists { this } => write!(f, "exists {this}"),
            Node::Between { this, low, high } => {
                write!(f, "{this} between {low} and {high}")
            }
            Node::Count { this } => write!(f, "count({this})"),
            Node::Sum { this } => write!(f, "sum({this})"),
            Node::Avg { this } => write!(f, "avg({this})"),
            Node::Min { this } => write!(f, "min({this})"),
            Node::Max { this } => write!(f, "max({this})"),
            Node::Cast { this, to } => write!(f, "cast({this} as {to})"),
            Node::DataType { name } => f.write_str(name),
            Node::Substring { this, start, length } => {
                write!(f, "substr({this}")?;
                if let Some(start) = start {
                    write!(f, ", {start}")?;
                }
                if let Some(length) = length {
                    write!(f, ", {length}")?;
                }
                f.write_str(")")
            }
            Node::Case { operand, ifs, default } => {
                f.write_str("case")?;
                if let Some(operand) = operand {
                    write!(f, " {operand}")?;
                }
                for branch in ifs {
                    write!(f, " {branch}")?;
                }
                if let Some(default) = default {
                    write!(f, " else {default}")?;
                }
                f.write_str(" end")
            }
            Node::If { cond, then, otherwise } => match otherwise {
                // Standalone IIF call; inside a CASE the branch renders as
                // WHEN/THEN.
                Some(otherwise) => write!(f, "iif({cond}, {then}, {otherwise})"),
                None => write!(f, "when {cond} then {then}"),
            },
            Node::Distinct { expressions } => {
                f.write_str("distinct ")?;
                write_list(f, expressions)
            }
            Node::Anonymous { name, expressions } => {
                write!(f, "{name}(")?;
                write_list(f, expressions)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Node]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
