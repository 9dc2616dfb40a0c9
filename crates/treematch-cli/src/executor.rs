//! Query execution against the live database: the plan sanity gate and
//! the execution-based comparison signal.

use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// Best-effort check that SQLite accepts the query at all. Queries the
/// plan rather than the data so the gate stays cheap.
pub fn plan_check(conn: &Connection, sql: &str) -> bool {
    let plan = format!("EXPLAIN QUERY PLAN {sql}");
    let Ok(mut statement) = conn.prepare(&plan) else { return false };
    let Ok(mut rows) = statement.query([]) else { return false };
    rows.next().is_ok()
}

/// Runs both queries and compares their result sets, order-insensitively.
/// Any execution failure counts as a mismatch.
pub fn results_match(conn: &Connection, gold: &str, pred: &str) -> bool {
    match (run(conn, gold), run(conn, pred)) {
        (Ok(gold_rows), Ok(pred_rows)) => gold_rows == pred_rows,
        _ => false,
    }
}

fn run(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<Vec<String>>> {
    let mut statement = conn.prepare(sql)?;
    let width = statement.column_count();
    let mut rows: Vec<Vec<String>> = statement
        .query_map([], |row| {
            (0..width)
                .map(|index| Ok(render_value(row.get_ref(index)?)))
                .collect()
        })?
        .collect::<rusqlite::Result<_>>()?;
    rows.sort();
    Ok(rows)
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "null".to_owned(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => format!("{value:?}"),
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
        ValueRef::Blob(blob) => format!("{blob:?}"),
    }
}
