//! Evaluation harness: iterates aligned (prediction, gold) pairs, scores
//! each with the canonical-tree oracle and/or execution comparison, and
//! tallies the fractions.

pub mod cli;
pub mod executor;
pub mod input;
pub mod schema;

use std::collections::HashMap;
use std::fmt::Write as _;
use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;
use treematch_core::{parse_query, preprocess, trees_match, RuleSet, Schema};

use cli::{Args, EvalType};

/// Tallies of one evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalOutcome {
    pub total: usize,
    pub tree_matches: usize,
    pub exec_matches: usize,
}

pub fn evaluate(args: &Args) -> Result<EvalOutcome> {
    let conversations = input::load_pairs(&args.pred, &args.gold)?;
    let rules = if args.rules.is_empty() {
        RuleSet::all()
    } else {
        RuleSet::from_ids(args.rules.iter().copied())
    };

    // Schema source: a Spider tables.json when given, the SQLite files
    // otherwise.
    let tables_json: Option<std::collections::BTreeMap<String, Schema>> = args
        .tables
        .as_ref()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Schema::from_tables_json(&text)
                .with_context(|| format!("parsing {}", path.display()))
        })
        .transpose()?;

    let mut connections: HashMap<String, Connection> = HashMap::new();
    let mut schemas: HashMap<String, Schema> = HashMap::new();
    let mut outcome = EvalOutcome::default();

    for (conversation_index, conversation) in conversations.iter().enumerate() {
        debug!("Conversation: {conversation_index}");
        for (utterance_index, pair) in conversation.iter().enumerate() {
            debug!("Utterance: {utterance_index}");

            let db_id = pair.db_id.as_str();
            if !connections.contains_key(db_id) {
                let path = args.db.join(db_id).join(format!("{db_id}.sqlite"));
                let connection = Connection::open(&path)
                    .with_context(|| format!("opening database {}", path.display()))?;
                connections.insert(db_id.to_owned(), connection);
            }
            let connection = &connections[db_id];
            if !schemas.contains_key(db_id) {
                let loaded = match &tables_json {
                    Some(map) => map
                        .get(db_id)
                        .cloned()
                        .with_context(|| format!("no tables.json entry for {db_id}"))?,
                    None => schema::introspect(connection)
                        .with_context(|| format!("introspecting {db_id}"))?,
                };
                schemas.insert(db_id.to_owned(), loaded);
            }
            let schema = &schemas[db_id];

            let gold = preprocess(&pair.gold, schema);
            let pred = preprocess(&pair.pred, schema);
            debug!("gold: {gold}");
            debug!("pred: {pred}");
            debug!("DB: {db_id}");

            if args.etype.wants_tree() && tree_comparison(connection, schema, &rules, &gold, &pred)
            {
                outcome.tree_matches += 1;
            }
            if args.etype.wants_execution() && executor::results_match(connection, &gold, &pred) {
                outcome.exec_matches += 1;
            }
            outcome.total += 1;
        }
    }
    Ok(outcome)
}

/// One pair through the canonical-tree oracle. Every failure mode — the
/// plan gate, parsing either side, or a panic inside the rewrite engine —
/// scores the pair as not equivalent.
fn tree_comparison(
    connection: &Connection,
    schema: &Schema,
    rules: &RuleSet,
    gold: &str,
    pred: &str,
) -> bool {
    if !executor::plan_check(connection, gold) || !executor::plan_check(connection, pred) {
        return false;
    }
    let (Ok(gold_tree), Ok(pred_tree)) = (parse_query(gold), parse_query(pred)) else {
        return false;
    };
    catch_unwind(AssertUnwindSafe(|| {
        trees_match(&pred_tree, &gold_tree, schema, rules)
    }))
    .unwrap_or(false)
}

/// Renders the final report in the `Total:`/`ETM:`/`EXE:` format.
pub fn report(outcome: &EvalOutcome, etype: EvalType) -> String {
    let fraction = |matches: usize| {
        if outcome.total == 0 {
            0.0
        } else {
            matches as f64 / outcome.total as f64
        }
    };
    let mut out = format!("Total: {}\n", outcome.total);
    if etype.wants_tree() {
        let _ = writeln!(out, "ETM: {}", fraction(outcome.tree_matches));
    }
    if etype.wants_execution() {
        let _ = writeln!(out, "EXE: {}", fraction(outcome.exec_matches));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_includes_requested_fractions_only() {
        let outcome = EvalOutcome { total: 4, tree_matches: 3, exec_matches: 2 };
        let all = report(&outcome, EvalType::All);
        assert_eq!(all, "Total: 4\nETM: 0.75\nEXE: 0.5\n");
        let tree = report(&outcome, EvalType::Treematch);
        assert_eq!(tree, "Total: 4\nETM: 0.75\n");
        let exe = report(&outcome, EvalType::Exe);
        assert_eq!(exe, "Total: 4\nEXE: 0.5\n");
    }

    #[test]
    fn empty_runs_report_zero() {
        let outcome = EvalOutcome::default();
        assert_eq!(report(&outcome, EvalType::All), "Total: 0\nETM: 0\nEXE: 0\n");
    }
}
