//! Shared helpers for unit tests.

use crate::ast::Node;
use crate::parser::parse_query;
use crate::rewrite::{trees_match, RewriteRule, Rewriter, RuleSet};
use crate::schema::{Schema, TableSchema};

/// `emp(id PK, name NOT NULL, dept_id FK→dept.id); dept(id PK, name NOT NULL)`.
pub fn emp_dept_schema() -> Schema {
    let mut schema = Schema::new();
    schema.insert_table(
        "emp",
        TableSchema {
            columns: vec!["id".into(), "name".into(), "dept_id".into()],
            unique: ["id".into()].into(),
            non_null: ["id".into(), "name".into()].into(),
            primary_keys: ["id".into()].into(),
            foreign_keys: [("dept_id".into(), "dept.id".into())].into(),
        },
    );
    schema.insert_table(
        "dept",
        TableSchema {
            columns: vec!["id".into(), "name".into()],
            unique: ["id".into()].into(),
            non_null: ["id".into(), "name".into()].into(),
            primary_keys: ["id".into()].into(),
            foreign_keys: Default::default(),
        },
    );
    schema
}

pub fn parse(sql: &str) -> Node {
    parse_query(sql).expect("test query parses")
}

/// Applies one rule against a fresh emp/dept schema clone.
pub fn apply(rule: &dyn RewriteRule, tree: &mut Node) -> bool {
    let mut schema = emp_dept_schema();
    rule.apply(tree, &mut schema)
}

/// Full canonicalization under the complete rule set.
pub fn canon(sql: &str) -> Node {
    let mut tree = parse(sql);
    let mut schema = emp_dept_schema();
    Rewriter::new(RuleSet::all()).canonicalize(&mut tree, &mut schema);
    tree
}

/// Oracle verdict for two queries over the emp/dept schema.
pub fn canon_matches(a: &str, b: &str) -> bool {
    trees_match(&parse(a), &parse(b), &emp_dept_schema(), &RuleSet::all())
}
