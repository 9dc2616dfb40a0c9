//! Lowering from the `sqlparser` AST into the tree model.
//!
//! The lowering is total over the subset of SQL the rewrite rules reason
//! about; everything else returns [`ParseError::Unsupported`] so the caller
//! can score the pair as not equivalent instead of mis-normalizing it.

use sqlparser::ast as sp;

use crate::ast::{BinaryOp, JoinSide, Node, Select};
use crate::error::ParseError;

pub(super) fn lower_statement(statement: &sp::Statement) -> Result<Node, ParseError> {
    match statement {
        sp::Statement::Query(query) => lower_query(query),
        _ => Err(ParseError::NotAQuery),
    }
}

fn lower_query(query: &sp::Query) -> Result<Node, ParseError> {
    let sp::Query {
        with,
        body,
        order_by,
        limit_clause,
        fetch,
        locks,
        for_clause,
        ..
    } = query;
    if fetch.is_some() || !locks.is_empty() || for_clause.is_some() {
        return Err(ParseError::unsupported("query modifier"));
    }

    let with = with.as_ref().map(lower_with).transpose()?;
    let order = order_by.as_ref().map(lower_order_by).transpose()?;
    let limit = limit_clause.as_ref().map(lower_limit).transpose()?;

    let mut tree = lower_set_expr(body)?;
    if with.is_some() || order.is_some() || limit.is_some() {
        // ORDER/LIMIT/WITH are slots of the Select; a set operation has no
        // place to hang them.
        let Node::Select(select) = &mut tree else {
            return Err(ParseError::unsupported("order/limit/with on a set operation"));
        };
        select.with = with;
        select.order = order;
        select.limit = limit;
    }
    Ok(tree)
}

fn lower_set_expr(body: &sp::SetExpr) -> Result<Node, ParseError> {
    match body {
        sp::SetExpr::Select(select) => lower_select(select),
        sp::SetExpr::Query(query) => lower_query(query),
        sp::SetExpr::SetOperation { op, set_quantifier, left, right } => {
            let all = match set_quantifier {
                sp::SetQuantifier::All => true,
                sp::SetQuantifier::Distinct | sp::SetQuantifier::None => false,
                _ => return Err(ParseError::unsupported("set quantifier")),
            };
            let left = Box::new(lower_set_expr(left)?);
            let right = Box::new(lower_set_expr(right)?);
            Ok(match op {
                sp::SetOperator::Union => Node::Union { left, right, all },
                sp::SetOperator::Intersect => Node::Intersect { left, right, all },
                sp::SetOperator::Except => Node::Except { left, right, all },
                _ => return Err(ParseError::unsupported("set operator")),
            })
        }
        _ => Err(ParseError::unsupported("non-select query body")),
    }
}

fn lower_select(select: &sp::Select) -> Result<Node, ParseError> {
    let sp::Select {
        distinct,
        top,
        projection,
        into,
        from,
        lateral_views,
        prewhere,
        selection,
        group_by,
        cluster_by,
        distribute_by,
        sort_by,
        having,
        named_window,
        qualify,
        connect_by,
        ..
    } = select;
    if top.is_some()
        || into.is_some()
        || !lateral_views.is_empty()
        || prewhere.is_some()
        || !cluster_by.is_empty()
        || !distribute_by.is_empty()
        || !sort_by.is_empty()
        || !named_window.is_empty()
        || qualify.is_some()
        || connect_by.is_some()
    {
        return Err(ParseError::unsupported("select modifier"));
    }

    let distinct = match distinct {
        None => false,
        Some(sp::Distinct::Distinct) => true,
        Some(sp::Distinct::On(_)) => return Err(ParseError::unsupported("distinct on")),
    };

    let mut lowered = Select { distinct, ..Default::default() };
    for item in projection {
        lowered.projection.push(lower_select_item(item)?);
    }

    // `FROM a, b` carries later relations as ON-less joins, the same shape
    // an explicit CROSS JOIN lowers to.
    for (index, table_with_joins) in from.iter().enumerate() {
        let relation = lower_table_factor(&table_with_joins.relation)?;
        if index == 0 {
            lowered.from = Some(Node::From { this: Box::new(relation) });
        } else {
            lowered.joins.push(Node::Join { this: Box::new(relation), on: None, side: None });
        }
        for join in &table_with_joins.joins {
            lowered.joins.push(lower_join(join)?);
        }
    }

    if let Some(selection) = selection {
        lowered.selection =
            Some(Node::Where { this: Box::new(lower_expr(selection)?) });
    }
    match group_by {
        sp::GroupByExpr::Expressions(expressions, modifiers) => {
            if !modifiers.is_empty() {
                return Err(ParseError::unsupported("group by modifier"));
            }
            if !expressions.is_empty() {
                let expressions =
                    expressions.iter().map(lower_expr).collect::<Result<_, _>>()?;
                lowered.group = Some(Node::Group { expressions });
            }
        }
        sp::GroupByExpr::All(_) => return Err(ParseError::unsupported("group by all")),
    }
    if let Some(having) = having {
        lowered.having = Some(Node::Having { this: Box::new(lower_expr(having)?) });
    }

    Ok(Node::Select(Box::new(lowered)))
}

fn lower_select_item(item: &sp::SelectItem) -> Result<Node, ParseError> {
    match item {
        sp::SelectItem::UnnamedExpr(expr) => lower_expr(expr),
        sp::SelectItem::ExprWithAlias { expr, alias } => Ok(Node::Alias {
            this: Box::new(lower_expr(expr)?),
            alias: Box::new(lower_ident(alias)),
        }),
        sp::SelectItem::Wildcard(_) => Ok(Node::Star),
        sp::SelectItem::QualifiedWildcard(kind, _) => match kind {
            sp::SelectItemQualifiedWildcardKind::ObjectName(name) => Ok(Node::Column {
                this: Box::new(Node::Star),
                table: Some(Box::new(lower_object_name(name)?)),
            }),
            sp::SelectItemQualifiedWildcardKind::Expr(_) => {
                Err(ParseError::unsupported("expression-qualified wildcard"))
            }
        },
    }
}

fn lower_join(join: &sp::Join) -> Result<Node, ParseError> {
    let (constraint, side) = match &join.join_operator {
        sp::JoinOperator::Join(c) | sp::JoinOperator::Inner(c) | sp::JoinOperator::CrossJoin(c) => {
            (c, None)
        }
        sp::JoinOperator::Left(c) | sp::JoinOperator::LeftOuter(c) => (c, Some(JoinSide::Left)),
        sp::JoinOperator::Right(c) | sp::JoinOperator::RightOuter(c) => (c, Some(JoinSide::Right)),
        sp::JoinOperator::FullOuter(c) => (c, Some(JoinSide::Full)),
        _ => return Err(ParseError::unsupported("join operator")),
    };
    let on = match constraint {
        sp::JoinConstraint::On(expr) => Some(Box::new(lower_expr(expr)?)),
        sp::JoinConstraint::None => None,
        sp::JoinConstraint::Using(_) | sp::JoinConstraint::Natural => {
            return Err(ParseError::unsupported("join constraint"))
        }
    };
    Ok(Node::Join { this: Box::new(lower_table_factor(&join.relation)?), on, side })
}

fn lower_table_factor(factor: &sp::TableFactor) -> Result<Node, ParseError> {
    match factor {
        sp::TableFactor::Table { name, alias, .. } => Ok(Node::Table {
            this: Box::new(lower_object_name(name)?),
            alias: alias.as_ref().map(lower_table_alias).transpose()?.map(Box::new),
        }),
        sp::TableFactor::Derived { lateral, subquery, alias } => {
            if *lateral {
                return Err(ParseError::unsupported("lateral subquery"));
            }
            Ok(Node::Subquery {
                this: Box::new(lower_query(subquery)?),
                alias: alias.as_ref().map(lower_table_alias).transpose()?.map(Box::new),
            })
        }
        _ => Err(ParseError::unsupported("table factor")),
    }
}

fn lower_table_alias(alias: &sp::TableAlias) -> Result<Node, ParseError> {
    if !alias.columns.is_empty() {
        return Err(ParseError::unsupported("table alias column list"));
    }
    Ok(Node::TableAlias { this: Box::new(lower_ident(&alias.name)) })
}

fn lower_with(with: &sp::With) -> Result<Node, ParseError> {
    if with.recursive {
        return Err(ParseError::unsupported("recursive cte"));
    }
    let mut ctes = Vec::with_capacity(with.cte_tables.len());
    for cte in &with.cte_tables {
        if cte.from.is_some() {
            return Err(ParseError::unsupported("cte from clause"));
        }
        ctes.push(Node::Cte {
            this: Box::new(lower_query(&cte.query)?),
            alias: Box::new(lower_table_alias(&cte.alias)?),
        });
    }
    Ok(Node::With { ctes })
}

fn lower_order_by(order_by: &sp::OrderBy) -> Result<Node, ParseError> {
    let sp::OrderByKind::Expressions(expressions) = &order_by.kind else {
        return Err(ParseError::unsupported("order by all"));
    };
    let mut lowered = Vec::with_capacity(expressions.len());
    for order_expr in expressions {
        if order_expr.with_fill.is_some() {
            return Err(ParseError::unsupported("order by with fill"));
        }
        lowered.push(Node::Ordered {
            this: Box::new(lower_expr(&order_expr.expr)?),
            desc: order_expr.options.asc == Some(false),
        });
    }
    Ok(Node::Order { expressions: lowered })
}

fn lower_limit(limit_clause: &sp::LimitClause) -> Result<Node, ParseError> {
    match limit_clause {
        sp::LimitClause::LimitOffset { limit: Some(limit), offset: None, limit_by }
            if limit_by.is_empty() =>
        {
            Ok(Node::Limit { expression: Box::new(lower_expr(limit)?) })
        }
        _ => Err(ParseError::unsupported("limit clause shape")),
    }
}

fn lower_expr(expr: &sp::Expr) -> Result<Node, ParseError> {
    match expr {
        sp::Expr::Identifier(ident) => Ok(Node::Column {
            this: Box::new(lower_ident(ident)),
            table: None,
        }),
        sp::Expr::CompoundIdentifier(parts) => match parts.as_slice() {
            [table, column] => Ok(Node::Column {
                this: Box::new(lower_ident(column)),
                table: Some(Box::new(lower_ident(table))),
            }),
            _ => Err(ParseError::unsupported("multi-part identifier")),
        },
        sp::Expr::Value(value) => lower_value(&value.value),
        sp::Expr::BinaryOp { left, op, right } => Ok(Node::Binary {
            op: lower_binary_op(op)?,
            this: Box::new(lower_expr(left)?),
            expression: Box::new(lower_expr(right)?),
        }),
        sp::Expr::UnaryOp { op, expr } => match op {
            sp::UnaryOperator::Not => {
                Ok(Node::Not { this: Box::new(lower_expr(expr)?) })
            }
            sp::UnaryOperator::Plus => lower_expr(expr),
            sp::UnaryOperator::Minus => match lower_expr(expr)? {
                Node::Literal { text, is_string: false } => {
                    Ok(Node::number(format!("-{text}")))
                }
                _ => Err(ParseError::unsupported("unary minus")),
            },
            _ => Err(ParseError::unsupported("unary operator")),
        },
        sp::Expr::Nested(inner) => Ok(Node::Paren { this: Box::new(lower_expr(inner)?) }),
        sp::Expr::IsNull(inner) => Ok(Node::Binary {
            op: BinaryOp::Is,
            this: Box::new(lower_expr(inner)?),
            expression: Box::new(Node::Null),
        }),
        sp::Expr::IsNotNull(inner) => Ok(Node::Not {
            this: Box::new(Node::Binary {
                op: BinaryOp::Is,
                this: Box::new(lower_expr(inner)?),
                expression: Box::new(Node::Null),
            }),
        }),
        sp::Expr::InList { expr, list, negated } => {
            let lowered = Node::In {
                this: Box::new(lower_expr(expr)?),
                list: list.iter().map(lower_expr).collect::<Result<_, _>>()?,
                query: None,
            };
            Ok(negate_if(*negated, lowered))
        }
        sp::Expr::InSubquery { expr, subquery, negated } => {
            let lowered = Node::In {
                this: Box::new(lower_expr(expr)?),
                list: Vec::new(),
                query: Some(Box::new(Node::Subquery {
                    this: Box::new(lower_query(subquery)?),
                    alias: None,
                })),
            };
            Ok(negate_if(*negated, lowered))
        }
        sp::Expr::Between { expr, negated, low, high } => {
            let lowered = Node::Between {
                this: Box::new(lower_expr(expr)?),
                low: Box::new(lower_expr(low)?),
                high: Box::new(lower_expr(high)?),
            };
            Ok(negate_if(*negated, lowered))
        }
        sp::Expr::Like { negated, expr, pattern, escape_char, .. } => {
            if escape_char.is_some() {
                return Err(ParseError::unsupported("like escape"));
            }
            let lowered = Node::Binary {
                op: BinaryOp::Like,
                this: Box::new(lower_expr(expr)?),
                expression: Box::new(lower_expr(pattern)?),
            };
            Ok(negate_if(*negated, lowered))
        }
        sp::Expr::Exists { subquery, negated } => {
            let lowered = Node::Exists {
                this: Box::new(Node::Subquery {
                    this: Box::new(lower_query(subquery)?),
                    alias: None,
                }),
            };
            Ok(negate_if(*negated, lowered))
        }
        sp::Expr::Subquery(query) => Ok(Node::Subquery {
            this: Box::new(lower_query(query)?),
            alias: None,
        }),
        sp::Expr::Cast { kind: sp::CastKind::Cast, expr, data_type, format: None } => {
            Ok(Node::Cast {
                this: Box::new(lower_expr(expr)?),
                to: Box::new(Node::DataType { name: data_type.to_string().to_lowercase() }),
            })
        }
        sp::Expr::Case { operand, conditions, else_result, .. } => {
            let ifs = conditions
                .iter()
                .map(|when| {
                    Ok(Node::If {
                        cond: Box::new(lower_expr(&when.condition)?),
                        then: Box::new(lower_expr(&when.result)?),
                        otherwise: None,
                    })
                })
                .collect::<Result<_, ParseError>>()?;
            Ok(Node::Case {
                operand: operand.as_deref().map(lower_expr).transpose()?.map(Box::new),
                ifs,
                default: else_result.as_deref().map(lower_expr).transpose()?.map(Box::new),
            })
        }
        sp::Expr::Substring { expr, substring_from, substring_for, .. } => {
            Ok(Node::Substring {
                this: Box::new(lower_expr(expr)?),
                start: substring_from.as_deref().map(lower_expr).transpose()?.map(Box::new),
                length: substring_for.as_deref().map(lower_expr).transpose()?.map(Box::new),
            })
        }
        sp::Expr::Function(function) => lower_function(function),
        _ => Err(ParseError::unsupported(expr.to_string())),
    }
}

fn lower_function(function: &sp::Function) -> Result<Node, ParseError> {
    if function.over.is_some()
        || function.filter.is_some()
        || !function.within_group.is_empty()
        || !matches!(function.parameters, sp::FunctionArguments::None)
    {
        return Err(ParseError::unsupported("function modifier"));
    }
    let name = function.name.to_string().to_lowercase();

    let (mut args, distinct) = match &function.args {
        sp::FunctionArguments::None => (Vec::new(), false),
        sp::FunctionArguments::Subquery(query) => (
            vec![Node::Subquery { this: Box::new(lower_query(query)?), alias: None }],
            false,
        ),
        sp::FunctionArguments::List(list) => {
            if !list.clauses.is_empty() {
                return Err(ParseError::unsupported("function argument clause"));
            }
            let distinct = list.duplicate_treatment == Some(sp::DuplicateTreatment::Distinct);
            let mut args = Vec::with_capacity(list.args.len());
            for arg in &list.args {
                match arg {
                    sp::FunctionArg::Unnamed(sp::FunctionArgExpr::Expr(expr)) => {
                        args.push(lower_expr(expr)?)
                    }
                    sp::FunctionArg::Unnamed(sp::FunctionArgExpr::Wildcard) => {
                        args.push(Node::Star)
                    }
                    _ => return Err(ParseError::unsupported("function argument")),
                }
            }
            (args, distinct)
        }
    };

    let aggregate_arg = |args: Vec<Node>, distinct: bool| -> Result<Box<Node>, ParseError> {
        if distinct {
            Ok(Box::new(Node::Distinct { expressions: args }))
        } else if args.len() == 1 {
            Ok(Box::new(args.into_iter().next().expect("single argument")))
        } else {
            Err(ParseError::unsupported("aggregate arity"))
        }
    };

    match name.as_str() {
        "count" => Ok(Node::Count { this: aggregate_arg(args, distinct)? }),
        "sum" => Ok(Node::Sum { this: aggregate_arg(args, distinct)? }),
        "avg" => Ok(Node::Avg { this: aggregate_arg(args, distinct)? }),
        "min" => Ok(Node::Min { this: aggregate_arg(args, distinct)? }),
        "max" => Ok(Node::Max { this: aggregate_arg(args, distinct)? }),
        "substr" | "substring" if matches!(args.len(), 2 | 3) => {
            let length = if args.len() == 3 { Some(Box::new(args.pop().expect("length"))) } else { None };
            let start = Box::new(args.pop().expect("start"));
            Ok(Node::Substring { this: Box::new(args.pop().expect("subject")), start: Some(start), length })
        }
        "iif" if args.len() == 3 => {
            let otherwise = Box::new(args.pop().expect("else branch"));
            let then = Box::new(args.pop().expect("then branch"));
            Ok(Node::If {
                cond: Box::new(args.pop().expect("condition")),
                then,
                otherwise: Some(otherwise),
            })
        }
        _ => Ok(Node::Anonymous { name, expressions: args }),
    }
}

fn lower_value(value: &sp::Value) -> Result<Node, ParseError> {
    match value {
        sp::Value::Number(text, _) => Ok(Node::number(text.clone())),
        sp::Value::SingleQuotedString(text) | sp::Value::DoubleQuotedString(text) => {
            Ok(Node::string(text.clone()))
        }
        sp::Value::Boolean(value) => Ok(Node::number(value.to_string())),
        sp::Value::Null => Ok(Node::Null),
        _ => Err(ParseError::unsupported("literal kind")),
    }
}

fn lower_binary_op(op: &sp::BinaryOperator) -> Result<BinaryOp, ParseError> {
    Ok(match op {
        sp::BinaryOperator::Eq => BinaryOp::Eq,
        sp::BinaryOperator::NotEq => BinaryOp::Neq,
        sp::BinaryOperator::Gt => BinaryOp::Gt,
        sp::BinaryOperator::GtEq => BinaryOp::Gte,
        sp::BinaryOperator::Lt => BinaryOp::Lt,
        sp::BinaryOperator::LtEq => BinaryOp::Lte,
        sp::BinaryOperator::And => BinaryOp::And,
        sp::BinaryOperator::Or => BinaryOp::Or,
        sp::BinaryOperator::Plus => BinaryOp::Add,
        sp::BinaryOperator::Minus => BinaryOp::Sub,
        sp::BinaryOperator::Multiply => BinaryOp::Mul,
        sp::BinaryOperator::Divide => BinaryOp::Div,
        sp::BinaryOperator::Modulo => BinaryOp::Mod,
        sp::BinaryOperator::StringConcat => BinaryOp::Concat,
        _ => return Err(ParseError::unsupported("binary operator")),
    })
}

fn lower_ident(ident: &sp::Ident) -> Node {
    Node::Identifier { name: ident.value.clone(), quoted: ident.quote_style.is_some() }
}

fn lower_object_name(name: &sp::ObjectName) -> Result<Node, ParseError> {
    let [part] = name.0.as_slice() else {
        return Err(ParseError::unsupported("qualified table name"));
    };
    let ident = part
        .as_ident()
        .ok_or_else(|| ParseError::unsupported("non-identifier table name"))?;
    Ok(lower_ident(ident))
}

fn negate_if(negated: bool, node: Node) -> Node {
    if negated {
        Node::Not { this: Box::new(node) }
    } else {
        node
    }
}
