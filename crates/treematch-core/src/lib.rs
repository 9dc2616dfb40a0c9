//! Canonicalizing SQL tree-equivalence engine.
//!
//! Decides whether two SQL queries are semantically equivalent by
//! rewriting both into a canonical form under a library of
//! schema-aware, semantics-preserving rules and comparing the resulting
//! syntax trees structurally. Built to score text-to-SQL predictions
//! against gold queries more fairly than string comparison and more
//! cheaply than execution.

pub mod ast;
pub mod error;
pub mod parser;
pub mod preprocess;
pub mod rewrite;
pub mod schema;

pub use ast::{BinaryOp, JoinSide, Node, Select, Walk};
pub use error::{ParseError, SchemaError};
pub use parser::parse_query;
pub use preprocess::preprocess;
pub use rewrite::{trees_match, RewriteRule, Rewriter, RuleSet};
pub use schema::{Schema, TableSchema};

#[cfg(test)]
pub mod test_utils;
