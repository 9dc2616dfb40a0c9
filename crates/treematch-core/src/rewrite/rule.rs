//! Rewrite rule trait.

use crate::ast::Node;
use crate::schema::Schema;

/// A semantics-preserving tree transformation.
///
/// Rules are pure over the tree shape: a pattern that does not match leaves
/// the tree untouched and returns `false`; rules never fail. The schema is
/// read-only for every rule except equi-join propagation, which extends the
/// per-call clone's unique/non-null sets.
pub trait RewriteRule: Send + Sync {
    /// Stable numeric id used for rule enablement and trace output.
    fn id(&self) -> u16;

    /// Short human-readable name (e.g., "between-expansion").
    fn name(&self) -> &'static str;

    /// Applies the rule in place, returning whether the tree changed.
    fn apply(&self, tree: &mut Node, schema: &mut Schema) -> bool;
}
