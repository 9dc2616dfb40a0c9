//! Property-style invariants of the canonicalizer.

mod common;

use common::{canon_with, emp_dept_schema, parse};
use proptest::prelude::*;
use treematch_core::{Rewriter, RuleSet};

/// A corpus of shapes the rule library acts on.
const QUERIES: &[&str] = &[
    "SELECT name FROM emp",
    "SELECT * FROM emp",
    "SELECT DISTINCT id FROM emp",
    "SELECT COUNT(name) FROM emp",
    "SELECT name FROM emp WHERE id BETWEEN 1 AND 10",
    "SELECT name FROM emp WHERE id NOT IN (1, 2, 3)",
    "SELECT name FROM emp WHERE name LIKE 'bob%'",
    "SELECT name FROM emp WHERE name IS NOT NULL",
    "SELECT e.name FROM emp e JOIN dept d ON e.dept_id = d.id",
    "SELECT e.name, d.name FROM emp e JOIN dept d ON e.dept_id = d.id",
    "SELECT name FROM emp WHERE id = (SELECT MIN(id) FROM emp)",
    "SELECT id FROM emp ORDER BY id DESC LIMIT 1",
    "SELECT name FROM emp WHERE dept_id IN (SELECT id FROM dept WHERE name = 'x')",
    "SELECT dept_id, COUNT(*) FROM emp GROUP BY dept_id",
    "SELECT COUNT(*) FROM emp GROUP BY id, dept_id",
    "WITH x AS (SELECT id FROM emp) SELECT * FROM x",
    "SELECT id FROM emp WHERE dept_id = 1 UNION SELECT id FROM emp WHERE dept_id = 2",
    "SELECT id FROM emp INTERSECT SELECT id FROM emp",
    "SELECT id FROM emp EXCEPT SELECT dept_id FROM emp",
    "SELECT e.name FROM emp e LEFT JOIN dept d ON e.dept_id = d.id WHERE d.name IS NULL",
    "SELECT CAST(SUM(id) AS FLOAT) / COUNT(*) FROM emp",
    "SELECT IIF(dept_id = 2, 1, 0) FROM emp",
    "SELECT name FROM emp ORDER BY julianday(name)",
    "SELECT SUBSTR(name, 1, 2) FROM emp WHERE SUBSTR(name, 1, 2) = 'ab' AND SUBSTR(name, 3, 1) < 'z'",
];

proptest! {
    /// Canonicalization is idempotent: a second pass is a no-op.
    #[test]
    fn canonical_form_is_a_fixed_point(index in 0..QUERIES.len()) {
        let sql = QUERIES[index];
        let once = canon_with(sql, &RuleSet::all());
        let mut twice = once.clone();
        let mut schema = emp_dept_schema();
        Rewriter::new(RuleSet::all()).canonicalize(&mut twice, &mut schema);
        prop_assert_eq!(&twice, &once, "unstable canonical form for {}", sql);
    }

    /// Idempotence holds under arbitrary rule subsets, not just the full
    /// set.
    #[test]
    fn subsets_are_idempotent_too(index in 0..QUERIES.len(), mask in any::<u64>()) {
        let sql = QUERIES[index];
        let all: Vec<u16> = (1..=26).chain(100..=108).collect();
        let subset = RuleSet::from_ids(
            all.iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1u64 << (bit % 64)) != 0)
                .map(|(_, id)| *id),
        );
        let once = canon_with(sql, &subset);
        let mut twice = once.clone();
        let mut schema = emp_dept_schema();
        Rewriter::new(subset).canonicalize(&mut twice, &mut schema);
        prop_assert_eq!(&twice, &once, "unstable canonical form for {}", sql);
    }
}

/// With no rules enabled, canonicalization is the truth-cleanup pass only,
/// which leaves an already-clean tree untouched.
#[test]
fn empty_rule_set_is_identity_on_clean_trees() {
    for sql in QUERIES {
        let tree = parse(sql);
        let mut rewritten = tree.clone();
        let mut schema = emp_dept_schema();
        Rewriter::new(RuleSet::empty()).canonicalize(&mut rewritten, &mut schema);
        assert_eq!(rewritten, tree, "empty rule set changed {sql:?}");
    }
}
