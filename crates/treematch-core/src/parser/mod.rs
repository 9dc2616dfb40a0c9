//! Parser front-end: SQL text → [`Node`] tree.
//!
//! Parsing proper is delegated to `sqlparser` with the SQLite dialect; this
//! module owns the lowering of the parsed statement into the rewrite
//! engine's tree model.

mod lower;

use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use crate::ast::Node;
use crate::error::ParseError;

/// Parses a single query statement into a tree.
///
/// Multi-statement input is tolerated; only the first statement is kept.
/// Non-query statements and constructs outside the tree model are rejected,
/// which the evaluation loop scores as "not equivalent".
pub fn parse_query(sql: &str) -> Result<Node, ParseError> {
    let dialect = SQLiteDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;
    let statement = statements.into_iter().next().ok_or(ParseError::Empty)?;
    lower::lower_statement(&statement)
}
