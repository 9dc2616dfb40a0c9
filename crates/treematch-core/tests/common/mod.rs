//! Shared fixtures for integration tests.
#![allow(dead_code)]

use treematch_core::{Node, Rewriter, RuleSet, Schema, TableSchema};

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
    treematch_core::parse_query(sql).expect("test query parses")
}

pub fn canon(sql: &str) -> Node {
    canon_with(sql, &RuleSet::all())
}

pub fn canon_with(sql: &str, rules: &RuleSet) -> Node {
    let mut tree = parse(sql);
    let mut schema = emp_dept_schema();
    Rewriter::new(rules.clone()).canonicalize(&mut tree, &mut schema);
    tree
}

pub fn equivalent(pred: &str, gold: &str) -> bool {
    treematch_core::trees_match(
        &parse(pred),
        &parse(gold),
        &emp_dept_schema(),
        &RuleSet::all(),
    )
}
