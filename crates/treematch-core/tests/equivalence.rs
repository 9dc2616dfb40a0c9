//! End-to-end equivalence scenarios over the emp/dept schema.

mod common;

use common::{canon, equivalent};
use rstest::rstest;
use treematch_core::{Node, Walk};

#[rstest]
// Range expansion.
#[case(
    "SELECT name FROM emp WHERE id BETWEEN 1 AND 10",
    "SELECT name FROM emp WHERE id >= 1 AND id <= 10"
)]
// COUNT over a NOT NULL column.
#[case("SELECT COUNT(name) FROM emp", "SELECT COUNT(*) FROM emp")]
// Key-join elimination.
#[case(
    "SELECT e.name FROM emp e JOIN dept d ON e.dept_id = d.id",
    "SELECT e.name FROM emp e"
)]
// Aggregate subquery as ORDER BY … LIMIT 1.
#[case(
    "SELECT name FROM emp WHERE id = (SELECT MIN(id) FROM emp)",
    "SELECT name FROM emp ORDER BY id ASC LIMIT 1"
)]
// NOT IN list expansion with comparison negation.
#[case(
    "SELECT * FROM emp WHERE id NOT IN (1,2)",
    "SELECT * FROM emp WHERE id != 1 AND id != 2"
)]
// CTE inlining.
#[case(
    "WITH x AS (SELECT id FROM emp) SELECT * FROM x",
    "SELECT * FROM (SELECT id FROM emp)"
)]
fn equivalent_pairs(#[case] pred: &str, #[case] gold: &str) {
    assert!(equivalent(pred, gold), "{pred:?} should match {gold:?}");
}

#[rstest]
#[case("SELECT name FROM emp", "SELECT id FROM emp")]
#[case("SELECT name FROM emp WHERE id > 1", "SELECT name FROM emp WHERE id >= 1")]
#[case("SELECT COUNT(dept_id) FROM emp", "SELECT COUNT(*) FROM emp")]
#[case(
    "SELECT e.name, d.name FROM emp e JOIN dept d ON e.dept_id = d.id",
    "SELECT e.name FROM emp e"
)]
fn inequivalent_pairs(#[case] pred: &str, #[case] gold: &str) {
    assert!(!equivalent(pred, gold), "{pred:?} should not match {gold:?}");
}

/// Pure alias renaming never changes the canonical form.
#[rstest]
#[case(
    "SELECT a.name FROM emp a JOIN dept b ON a.dept_id = b.id WHERE b.name = 'x'",
    "SELECT p.name FROM emp p JOIN dept q ON p.dept_id = q.id WHERE q.name = 'x'"
)]
#[case("SELECT z.id FROM emp z ORDER BY z.id", "SELECT w.id FROM emp w ORDER BY w.id")]
fn alias_renaming_is_invisible(#[case] pred: &str, #[case] gold: &str) {
    assert_eq!(canon(pred), canon(gold));
}

/// Commutative constructs compare equal in either order.
#[rstest]
#[case(
    "SELECT name FROM emp WHERE id = 1 AND dept_id = 2",
    "SELECT name FROM emp WHERE dept_id = 2 AND id = 1"
)]
#[case(
    "SELECT name FROM emp WHERE id = 1 OR dept_id = 2",
    "SELECT name FROM emp WHERE dept_id = 2 OR id = 1"
)]
#[case("SELECT name FROM emp WHERE id = 5", "SELECT name FROM emp WHERE 5 = id")]
#[case(
    "SELECT emp.name, dept.name FROM emp JOIN dept ON emp.dept_id = dept.id",
    "SELECT dept.name, emp.name FROM dept JOIN emp ON dept.id = emp.dept_id"
)]
fn commutative_forms_converge(#[case] pred: &str, #[case] gold: &str) {
    assert_eq!(canon(pred), canon(gold));
}

/// Star expansion produces the full schema column list and no Star nodes.
#[test]
fn star_expansion_round_trip() {
    let tree = canon("SELECT * FROM emp");
    let select = match &tree {
        Node::Select(select) => select,
        other => panic!("expected a select, got {other}"),
    };
    assert_eq!(select.projection.len(), 3);

    let mut stars = 0;
    tree.walk(&mut |node| {
        if matches!(node, Node::Star) {
            stars += 1;
        }
        Walk::Continue
    });
    assert_eq!(stars, 0);
}

/// An unparsable prediction scores as not equivalent rather than erroring.
#[test]
fn unparsable_input_is_not_equivalent() {
    assert!(treematch_core::parse_query("SELEC name FORM emp").is_err());
}
