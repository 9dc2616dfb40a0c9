//! Error types.
//!
//! Only the boundaries of the engine produce errors: parsing/lowering and
//! schema loading. Rewrite rules never fail — a pattern that does not match
//! leaves the tree unchanged — and the equivalence oracle maps any upstream
//! error to "not equivalent" at the call site.

use thiserror::Error;

/// Failure to turn SQL text into a query tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The SQL did not tokenize or parse.
    #[error("sql syntax error: {0}")]
    Syntax(#[from] sqlparser::parser::ParserError),

    /// The input contained no statement.
    #[error("empty statement")]
    Empty,

    /// The statement is not a query (INSERT, CREATE, …).
    #[error("not a query statement")]
    NotAQuery,

    /// The query parsed but uses a construct outside the tree model.
    #[error("unsupported construct: {0}")]
    Unsupported(String),
}

impl ParseError {
    pub(crate) fn unsupported(what: impl Into<String>) -> Self {
        ParseError::Unsupported(what.into())
    }
}

/// Failure to load schema metadata.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally valid JSON with dangling column or table indices.
    #[error("inconsistent schema entry for database {0}")]
    Malformed(String),
}
