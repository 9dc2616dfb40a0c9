//! Rule 25: anti-join via LEFT JOIN … IS NULL ≡ NOT IN subquery.
//!
//! `t1 LEFT JOIN t2 ON t1.a = t2.b WHERE t2.x IS NULL` keeps exactly the
//! `t1` rows with no `t2` partner, i.e.
//! `FROM t1 WHERE t1.a NOT IN (SELECT t2.b FROM t2)`.

use crate::ast::{BinaryOp, JoinSide, Node, Select};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::{qualified_column, table_name};
use crate::schema::Schema;

pub struct LeftJoinNullAsNotIn;

impl RewriteRule for LeftJoinNullAsNotIn {
    fn id(&self) -> u16 {
        25
    }

    fn name(&self) -> &'static str {
        "left-join-null-as-not-in"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let Some(select) = tree.as_select() else { return false };
        let Some(rewrite) = match_anti_join(select) else { return false };

        let select = tree.as_select_mut().expect("still a select");
        let probe = Node::Select(Box::new(Select {
            projection: vec![rewrite.joined_column],
            from: Some(Node::From {
                this: Box::new(Node::Table {
                    this: Box::new(Node::ident(rewrite.joined_table)),
                    alias: None,
                }),
            }),
            ..Default::default()
        }));
        select.selection = Some(Node::Where {
            this: Box::new(Node::Not {
                this: Box::new(Node::In {
                    this: Box::new(rewrite.kept_column),
                    list: Vec::new(),
                    query: Some(Box::new(Node::Subquery {
                        this: Box::new(probe),
                        alias: None,
                    })),
                }),
            }),
        });
        select.joins = Vec::new();
        true
    }
}

struct AntiJoin {
    kept_column: Node,
    joined_column: Node,
    joined_table: String,
}

fn match_anti_join(select: &Select) -> Option<AntiJoin> {
    let [join] = select.joins.as_slice() else { return None };
    let Node::Join { on: Some(on), side: Some(JoinSide::Left), .. } = join else {
        return None;
    };
    let Some(Node::Where { this: condition }) = &select.selection else { return None };

    // WHERE must be a bare IS NULL over a column of the joined table.
    let Node::Binary { op: BinaryOp::Is, this: null_column, expression } = &**condition else {
        return None;
    };
    if !matches!(**expression, Node::Null) {
        return None;
    }
    let (null_table, _) = qualified_column(null_column)?;

    let Some(Node::From { this: from }) = &select.from else { return None };
    let from_table = table_name(from)?;

    let Node::Binary { op: BinaryOp::Eq, this: left, expression: right } = &**on else {
        return None;
    };
    let (left_table, _) = qualified_column(left)?;
    let (right_table, _) = qualified_column(right)?;

    let (kept, joined) = if left_table == from_table && right_table == null_table {
        (left, right)
    } else if right_table == from_table && left_table == null_table {
        (right, left)
    } else {
        return None;
    };

    Some(AntiJoin {
        kept_column: (**kept).clone(),
        joined_column: (**joined).clone(),
        joined_table: null_table.to_owned(),
    })
}
