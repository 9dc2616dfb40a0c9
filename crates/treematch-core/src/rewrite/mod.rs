//! Rewrite driver and equivalence oracle.
//!
//! The driver canonicalizes one statement tree: CTEs are inlined first,
//! nested statements are canonicalized recursively, set-operation rules
//! fire once both arms are in normal form, and a SELECT root then iterates
//! the rule registry to a fixed point (with a hard cap as the safety net).
//! The oracle canonicalizes two trees against per-tree schema clones and
//! compares them structurally.

mod clean;
mod cte;
mod rule;
mod setops;
pub mod rules;

use std::collections::BTreeSet;

use tracing::debug;

use crate::ast::{Node, Walk};
use crate::schema::Schema;

pub use rule::RewriteRule;

/// The set of enabled rule ids.
///
/// Covers the registry rules (100–108, 1–25) as well as the driver-level
/// passes: 26 (CTE inlining) and the set-operation rules 21, 3 and 5. The
/// truth-cleanup pass is not a rule and always runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet(BTreeSet<u16>);

impl RuleSet {
    /// Every rule the engine knows.
    pub fn all() -> Self {
        let mut ids: BTreeSet<u16> = (1..=26).collect();
        ids.extend(100..=108);
        RuleSet(ids)
    }

    pub fn empty() -> Self {
        RuleSet(BTreeSet::new())
    }

    pub fn from_ids(ids: impl IntoIterator<Item = u16>) -> Self {
        RuleSet(ids.into_iter().collect())
    }

    pub fn contains(&self, id: u16) -> bool {
        self.0.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::all()
    }
}

/// Canonicalizing rewriter over one schema.
pub struct Rewriter {
    rules: Vec<Box<dyn RewriteRule>>,
    enabled: RuleSet,
}

impl Rewriter {
    pub fn new(enabled: RuleSet) -> Self {
        Rewriter { rules: rules::loop_rules(), enabled }
    }

    /// Rewrites `tree` into canonical form. The schema is mutated only by
    /// the equi-join propagation rule; pass a clone scoped to this call.
    pub fn canonicalize(&self, tree: &mut Node, schema: &mut Schema) {
        if self.enabled.contains(cte::RULE_ID) && cte::inline_ctes(tree) {
            debug!("Applied Rule 26");
        }

        // Nested statements first: subqueries, CTE bodies (now inlined),
        // and set-operation arms are each their own canonicalization scope.
        tree.for_each_child_mut(&mut |child| {
            child.rewrite(&mut |node| {
                if node.is_statement() {
                    debug!("processing subquery");
                    self.canonicalize(node, schema);
                    return Walk::SkipChildren;
                }
                Walk::Continue
            });
        });

        setops::apply(tree, schema, &self.enabled);

        if !matches!(tree, Node::Select(_)) {
            return;
        }
        // Fixed point, capped by the entry node count in case a rule pair
        // ever oscillates.
        let cap = tree.node_count().max(1);
        for _ in 0..cap {
            let snapshot = tree.clone();
            for rule in &self.rules {
                if self.enabled.contains(rule.id()) && rule.apply(tree, schema) {
                    debug!("Applied Rule {}", rule.id());
                }
            }
            if clean::clean_truths(tree) {
                debug!("Cleaned Trues");
            }
            if *tree == snapshot {
                break;
            }
        }
    }
}

/// Structural-equivalence oracle: canonicalizes both trees (against fresh
/// schema clones) and compares them.
pub fn trees_match(pred: &Node, gold: &Node, schema: &Schema, rules: &RuleSet) -> bool {
    let rewriter = Rewriter::new(rules.clone());

    let mut pred = pred.clone();
    let mut pred_schema = schema.clone();
    rewriter.canonicalize(&mut pred, &mut pred_schema);

    let mut gold = gold.clone();
    let mut gold_schema = schema.clone();
    rewriter.canonicalize(&mut gold, &mut gold_schema);

    debug!("Pred after applying rules: {pred}");
    debug!("Gold after applying rules: {gold}");
    pred == gold
}
