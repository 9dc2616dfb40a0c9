//! SQL syntax tree model.
//!
//! A query is a single [`Node`] tree of tagged variants with named slots.
//! Rewrite rules pattern-match on variants and mutate the tree in place; the
//! generic traversal helpers ([`Node::walk`], [`Node::rewrite`]) visit every
//! slot of every variant so rules never hand-roll statement traversal.
//!
//! Structural equality (`PartialEq`) is the equivalence relation the oracle
//! returns: same variant, same slots, deep and list-order-sensitive.

mod display;

/// Binary operator kinds sharing the `Binary { this, expression }` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Is,
    Like,
}

impl BinaryOp {
    /// Variant-tag name, the primary key of the expression total order.
    pub fn tag(self) -> &'static str {
        match self {
            BinaryOp::Eq => "EQ",
            BinaryOp::Neq => "NEQ",
            BinaryOp::Gt => "GT",
            BinaryOp::Gte => "GTE",
            BinaryOp::Lt => "LT",
            BinaryOp::Lte => "LTE",
            BinaryOp::And => "And",
            BinaryOp::Or => "Or",
            BinaryOp::Add => "Add",
            BinaryOp::Sub => "Sub",
            BinaryOp::Mul => "Mul",
            BinaryOp::Div => "Div",
            BinaryOp::Mod => "Mod",
            BinaryOp::Concat => "Concat",
            BinaryOp::Is => "Is",
            BinaryOp::Like => "Like",
        }
    }

    /// SQL rendering of the operator.
    pub fn sql(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "<>",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Concat => "||",
            BinaryOp::Is => "is",
            BinaryOp::Like => "like",
        }
    }

    /// The comparison that `NOT <self>` collapses to, if any.
    pub fn negated(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::Eq => Some(BinaryOp::Neq),
            BinaryOp::Neq => Some(BinaryOp::Eq),
            BinaryOp::Gt => Some(BinaryOp::Lte),
            BinaryOp::Gte => Some(BinaryOp::Lt),
            BinaryOp::Lt => Some(BinaryOp::Gte),
            BinaryOp::Lte => Some(BinaryOp::Gt),
            _ => None,
        }
    }
}

/// Explicit side of an outer join. Plain, `INNER` and `CROSS` joins carry no
/// side and are eligible for reordering and elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
    Full,
}

impl JoinSide {
    pub fn sql(self) -> &'static str {
        match self {
            JoinSide::Left => "left",
            JoinSide::Right => "right",
            JoinSide::Full => "full",
        }
    }
}

/// A `SELECT` statement's named slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub distinct: bool,
    pub projection: Vec<Node>,
    /// `From` node.
    pub from: Option<Node>,
    /// `Join` nodes, in syntactic order.
    pub joins: Vec<Node>,
    /// `Where` node.
    pub selection: Option<Node>,
    /// `Group` node.
    pub group: Option<Node>,
    /// `Having` node.
    pub having: Option<Node>,
    /// `Order` node.
    pub order: Option<Node>,
    /// `Limit` node.
    pub limit: Option<Node>,
    /// `With` node holding the CTE list.
    pub with: Option<Node>,
}

/// Descent control for [`Node::walk`] and [`Node::rewrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
}

/// A tagged tree node. Slots hold either a scalar, one child, or an ordered
/// child list.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Statements.
    Select(Box<Select>),
    Union { left: Box<Node>, right: Box<Node>, all: bool },
    Intersect { left: Box<Node>, right: Box<Node>, all: bool },
    Except { left: Box<Node>, right: Box<Node>, all: bool },
    // Clauses.
    From { this: Box<Node> },
    Join { this: Box<Node>, on: Option<Box<Node>>, side: Option<JoinSide> },
    Where { this: Box<Node> },
    Group { expressions: Vec<Node> },
    Having { this: Box<Node> },
    Order { expressions: Vec<Node> },
    Ordered { this: Box<Node>, desc: bool },
    Limit { expression: Box<Node> },
    With { ctes: Vec<Node> },
    Cte { this: Box<Node>, alias: Box<Node> },
    // Relations and atoms.
    Table { this: Box<Node>, alias: Option<Box<Node>> },
    TableAlias { this: Box<Node> },
    Identifier { name: String, quoted: bool },
    Column { this: Box<Node>, table: Option<Box<Node>> },
    Star,
    Literal { text: String, is_string: bool },
    Null,
    Alias { this: Box<Node>, alias: Box<Node> },
    Paren { this: Box<Node> },
    Subquery { this: Box<Node>, alias: Option<Box<Node>> },
    // Predicates.
    Binary { op: BinaryOp, this: Box<Node>, expression: Box<Node> },
    Not { this: Box<Node> },
    In { this: Box<Node>, list: Vec<Node>, query: Option<Box<Node>> },
    Exists { this: Box<Node> },
    Between { this: Box<Node>, low: Box<Node>, high: Box<Node> },
    // Functions and aggregates.
    Count { this: Box<Node> },
    Sum { this: Box<Node> },
    Avg { this: Box<Node> },
    Min { this: Box<Node> },
    Max { this: Box<Node> },
    Cast { this: Box<Node>, to: Box<Node> },
    DataType { name: String },
    Substring { this: Box<Node>, start: Option<Box<Node>>, length: Option<Box<Node>> },
    Case { operand: Option<Box<Node>>, ifs: Vec<Node>, default: Option<Box<Node>> },
    If { cond: Box<Node>, then: Box<Node>, otherwise: Option<Box<Node>> },
    Distinct { expressions: Vec<Node> },
    Anonymous { name: String, expressions: Vec<Node> },
}

impl Node {
    /// Variant-tag name, the primary key of the expression total order.
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Select(_) => "Select",
            Node::Union { .. } => "Union",
            Node::Intersect { .. } => "Intersect",
            Node::Except { .. } => "Except",
            Node::From { .. } => "From",
            Node::Join { .. } => "Join",
            Node::Where { .. } => "Where",
            Node::Group { .. } => "Group",
            Node::Having { .. } => "Having",
            Node::Order { .. } => "Order",
            Node::Ordered { .. } => "Ordered",
            Node::Limit { .. } => "Limit",
            Node::With { .. } => "With",
            Node::Cte { .. } => "CTE",
            Node::Table { .. } => "Table",
            Node::TableAlias { .. } => "TableAlias",
            Node::Identifier { .. } => "Identifier",
            Node::Column { .. } => "Column",
            Node::Star => "Star",
            Node::Literal { .. } => "Literal",
            Node::Null => "Null",
            Node::Alias { .. } => "Alias",
            Node::Paren { .. } => "Paren",
            Node::Subquery { .. } => "Subquery",
            Node::Binary { op, .. } => op.tag(),
            Node::Not { .. } => "Not",
            Node::In { .. } => "In",
            Node::Exists { .. } => "Exists",
            Node::Between { .. } => "Between",
            Node::Count { .. } => "Count",
            Node::Sum { .. } => "Sum",
            Node::Avg { .. } => "Avg",
            Node::Min { .. } => "Min",
            Node::Max { .. } => "Max",
            Node::Cast { .. } => "Cast",
            Node::DataType { .. } => "DataType",
            Node::Substring { .. } => "Substring",
            Node::Case { .. } => "Case",
            Node::If { .. } => "If",
            Node::Distinct { .. } => "Distinct",
            Node::Anonymous { .. } => "Anonymous",
        }
    }

    /// Key for the stable expression total order used by the reordering
    /// rules: variant tag first, then the rendered form.
    pub fn sort_key(&self) -> (&'static str, String) {
        (self.tag(), self.to_string())
    }

    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Node::Select(_) | Node::Union { .. } | Node::Intersect { .. } | Node::Except { .. }
        )
    }

    /// The canonical vacuous predicate.
    pub fn truth() -> Node {
        Node::Binary {
            op: BinaryOp::Eq,
            this: Box::new(Node::number("1.0")),
            expression: Box::new(Node::number("1.0")),
        }
    }

    /// Recognizes an equality with structurally identical sides, the shape
    /// every rule that injects a vacuous predicate emits.
    pub fn is_truth(&self) -> bool {
        matches!(
            self,
            Node::Binary { op: BinaryOp::Eq, this, expression } if this == expression
        )
    }

    pub fn number(text: impl Into<String>) -> Node {
        Node::Literal { text: text.into(), is_string: false }
    }

    pub fn string(text: impl Into<String>) -> Node {
        Node::Literal { text: text.into(), is_string: true }
    }

    pub fn ident(name: impl Into<String>) -> Node {
        Node::Identifier { name: name.into(), quoted: false }
    }

    /// A table-qualified column reference with unquoted identifiers.
    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Node {
        Node::Column {
            this: Box::new(Node::ident(name)),
            table: Some(Box::new(Node::ident(table))),
        }
    }

    /// Replaces `self` with `Null` and returns the previous value.
    pub fn take(&mut self) -> Node {
        std::mem::replace(self, Node::Null)
    }

    pub fn as_select(&self) -> Option<&Select> {
        match self {
            Node::Select(select) => Some(select),
            _ => None,
        }
    }

    pub fn as_select_mut(&mut self) -> Option<&mut Select> {
        match self {
            Node::Select(select) => Some(select),
            _ => None,
        }
    }

    /// Visits every direct child, in slot order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(&Node)) {
        match self {
            Node::Select(select) => {
                if let Some(with) = &select.with {
                    f(with);
                }
                for item in &select.projection {
                    f(item);
                }
                if let Some(from) = &select.from {
                    f(from);
                }
                for join in &select.joins {
                    f(join);
                }
                if let Some(node) = &select.selection {
                    f(node);
                }
                if let Some(node) = &select.group {
                    f(node);
                }
                if let Some(node) = &select.having {
                    f(node);
                }
                if let Some(node) = &select.order {
                    f(node);
                }
                if let Some(node) = &select.limit {
                    f(node);
                }
            }
            Node::Union { left, right, .. }
            | Node::Intersect { left, right, .. }
            | Node::Except { left, right, .. } => {
                f(left);
                f(right);
            }
            Node::From { this }
            | Node::Where { this }
            | Node::Having { this }
            | Node::TableAlias { this }
            | Node::Ordered { this, .. }
            | Node::Not { this }
            | Node::Exists { this }
            | Node::Paren { this }
            | Node::Count { this }
            | Node::Sum { this }
            | Node::Avg { this }
            | Node::Min { this }
            | Node::Max { this } => f(this),
            Node::Join { this, on, .. } => {
                f(this);
                if let Some(on) = on {
                    f(on);
                }
            }
            Node::Group { expressions }
            | Node::Order { expressions }
            | Node::Distinct { expressions }
            | Node::Anonymous { expressions, .. } => {
                for node in expressions {
                    f(node);
                }
            }
            Node::Limit { expression } => f(expression),
            Node::With { ctes } => {
                for cte in ctes {
                    f(cte);
                }
            }
            Node::Cte { this, alias } | Node::Alias { this, alias } => {
                f(this);
                f(alias);
            }
            Node::Table { this, alias } | Node::Subquery { this, alias } => {
                f(this);
                if let Some(alias) = alias {
                    f(alias);
                }
            }
            Node::Column { this, table } => {
                f(this);
                if let Some(table) = table {
                    f(table);
                }
            }
            Node::Binary { this, expression, .. } => {
                f(this);
                f(expression);
            }
            Node::In { this, list, query } => {
                f(this);
                for node in list {
                    f(node);
                }
                if let Some(query) = query {
                    f(query);
                }
            }
            Node::Between { this, low, high } => {
                f(this);
                f(low);
                f(high);
            }
            Node::Cast { this, to } => {
                f(this);
                f(to);
            }
            Node::Substring { this, start, length } => {
                f(this);
                if let Some(start) = start {
                    f(start);
                }
                if let Some(length) = length {
                    f(length);
                }
            }
            Node::Case { operand, ifs, default } => {
                if let Some(operand) = operand {
                    f(operand);
                }
                for node in ifs {
                    f(node);
                }
                if let Some(default) = default {
                    f(default);
                }
            }
            Node::If { cond, then, otherwise } => {
                f(cond);
                f(then);
                if let Some(otherwise) = otherwise {
                    f(otherwise);
                }
            }
            Node::Identifier { .. }
            | Node::Star
            | Node::Literal { .. }
            | Node::Null
            | Node::DataType { .. } => {}
        }
    }

    /// Mutable counterpart of [`Node::for_each_child`], same slot order.
    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut Node)) {
        match self {
            Node::Select(select) => {
                if let Some(with) = &mut select.with {
                    f(with);
                }
                for item in &mut select.projection {
                    f(item);
                }
                if let Some(from) = &mut select.from {
                    f(from);
                }
                for join in &mut select.joins {
                    f(join);
                }
                if let Some(node) = &mut select.selection {
                    f(node);
                }
                if let Some(node) = &mut select.group {
                    f(node);
                }
                if let Some(node) = &mut select.having {
                    f(node);
                }
                if let Some(node) = &mut select.order {
                    f(node);
                }
                if let Some(node) = &mut select.limit {
                    f(node);
                }
            }
            Node::Union { left, right, .. }
            | Node::Intersect { left, right, .. }
            | Node::Except { left, right, .. } => {
                f(left);
                f(right);
            }
            Node::From { this }
            | Node::Where { this }
            | Node::Having { this }
            | Node::TableAlias { this }
            | Node::Ordered { this, .. }
            | Node::Not { this }
            | Node::Exists { this }
            | Node::Paren { this }
            | Node::Count { this }
            | Node::Sum { this }
            | Node::Avg { this }
            | Node::Min { this }
            | Node::Max { this } => f(this),
            Node::Join { this, on, .. } => {
                f(this);
                if let Some(on) = on {
                    f(on);
                }
            }
            Node::Group { expressions }
            | Node::Order { expressions }
            | Node::Distinct { expressions }
            | Node::Anonymous { expressions, .. } => {
                for node in expressions {
                    f(node);
                }
            }
            Node::Limit { expression } => f(expression),
            Node::With { ctes } => {
                for cte in ctes {
                    f(cte);
                }
            }
            Node::Cte { this, alias } | Node::Alias { this, alias } => {
                f(this);
                f(alias);
            }
            Node::Table { this, alias } | Node::Subquery { this, alias } => {
                f(this);
                if let Some(alias) = alias {
                    f(alias);
                }
            }
            Node::Column { this, table } => {
                f(this);
                if let Some(table) = table {
                    f(table);
                }
            }
            Node::Binary { this, expression, .. } => {
                f(this);
                f(expression);
            }
            Node::In { this, list, query } => {
                f(this);
                for node in list {
                    f(node);
                }
                if let Some(query) = query {
                    f(query);
                }
            }
            Node::Between { this, low, high } => {
                f(this);
                f(low);
                f(high);
            }
            Node::Cast { this, to } => {
                f(this);
                f(to);
            }
            Node::Substring { this, start, length } => {
                f(this);
                if let Some(start) = start {
                    f(start);
                }
                if let Some(length) = length {
                    f(length);
                }
            }
            Node::Case { operand, ifs, default } => {
                if let Some(operand) = operand {
                    f(operand);
                }
                for node in ifs {
                    f(node);
                }
                if let Some(default) = default {
                    f(default);
                }
            }
            Node::If { cond, then, otherwise } => {
                f(cond);
                f(then);
                if let Some(otherwise) = otherwise {
                    f(otherwise);
                }
            }
            Node::Identifier { .. }
            | Node::Star
            | Node::Literal { .. }
            | Node::Null
            | Node::DataType { .. } => {}
        }
    }

    /// Pre-order read-only traversal. The callback controls descent.
    pub fn walk(&self, f: &mut dyn FnMut(&Node) -> Walk) {
        if f(self) == Walk::SkipChildren {
            return;
        }
        self.for_each_child(&mut |child| child.walk(f));
    }

    /// Pre-order mutating traversal. The callback may replace the node in
    /// place (`*node = …`); descent then continues into the replacement's
    /// children unless it returns [`Walk::SkipChildren`].
    pub fn rewrite(&mut self, f: &mut dyn FnMut(&mut Node) -> Walk) {
        if f(self) == Walk::SkipChildren {
            return;
        }
        self.for_each_child_mut(&mut |child| child.rewrite(f));
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0usize;
        self.walk(&mut |_| {
            count += 1;
            Walk::Continue
        });
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_is_recognized() {
        assert!(Node::truth().is_truth());
        let uneven = Node::Binary {
            op: BinaryOp::Eq,
            this: Box::new(Node::number("1.0")),
            expression: Box::new(Node::number("2.0")),
        };
        assert!(!uneven.is_truth());
    }

    #[test]
    fn sort_key_orders_by_tag_then_rendering() {
        let column = Node::column("emp", "id");
        let literal = Node::number("1.0");
        assert!(column.sort_key() < literal.sort_key());

        let a = Node::column("emp", "a");
        let b = Node::column("emp", "b");
        assert!(a.sort_key() < b.sort_key());
    }

    #[test]
    fn node_count_covers_all_slots() {
        // emp.id = 1.0 → Binary + Column + Identifier ×2 + Literal.
        let eq = Node::Binary {
            op: BinaryOp::Eq,
            this: Box::new(Node::column("emp", "id")),
            expression: Box::new(Node::number("1.0")),
        };
        assert_eq!(eq.node_count(), 5);
    }

    #[test]
    fn rewrite_replaces_nodes_in_place() {
        let mut tree = Node::Not {
            this: Box::new(Node::Between {
                this: Box::new(Node::column("emp", "id")),
                low: Box::new(Node::number("1.0")),
                high: Box::new(Node::number("2.0")),
            }),
        };
        tree.rewrite(&mut |node| {
            if matches!(node, Node::Between { .. }) {
                *node = Node::truth();
                return Walk::SkipChildren;
            }
            Walk::Continue
        });
        assert_eq!(
            tree,
            Node::Not { this: Box::new(Node::truth()) }
        );
    }
}
