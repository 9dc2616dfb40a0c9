//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// treematch - canonicalizing SQL equivalence scorer
#[derive(Parser, Debug)]
#[command(name = "treematch")]
#[command(about = "Score predicted SQL queries against gold queries", long_about = None)]
#[command(version)]
pub struct Args {
    /// File containing predicted queries, one per line; blank lines
    /// delimit conversation groups
    #[arg(long, value_name = "FILE")]
    pub pred: PathBuf,

    /// File containing gold queries, one `<sql>\t<db_id>` per line
    #[arg(long, value_name = "FILE")]
    pub gold: PathBuf,

    /// Directory holding `<db_id>/<db_id>.sqlite` database files
    #[arg(long, value_name = "DIR")]
    pub db: PathBuf,

    /// Spider-style tables.json to use as the schema source instead of
    /// SQLite introspection
    #[arg(long, value_name = "FILE")]
    pub tables: Option<PathBuf>,

    /// Which comparisons to run
    #[arg(long, value_enum, default_value = "all")]
    pub etype: EvalType,

    /// Comma-separated rewrite rule ids to enable (defaults to all)
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub rules: Vec<u16>,

    /// Print rule-application traces
    #[arg(long)]
    pub verbose: bool,
}

/// Comparison modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EvalType {
    /// Execution comparison only
    Exe,
    /// Canonical-tree comparison only
    Treematch,
    /// Both
    All,
}

impl EvalType {
    pub fn wants_tree(self) -> bool {
        matches!(self, EvalType::Treematch | EvalType::All)
    }

    pub fn wants_execution(self) -> bool {
        matches!(self, EvalType::Exe | EvalType::All)
    }
}
