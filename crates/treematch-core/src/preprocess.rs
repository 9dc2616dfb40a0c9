//! Schema-aware string cleanup applied before parsing.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::Schema;

/// Normalizes quoting quirks common in generated SQL:
///
/// - backticks become double quotes;
/// - a double-quoted word that names neither a table nor any table's column
///   (case-insensitively) is reinterpreted as a single-quoted string
///   literal;
/// - bare `datetime()` calls become `datetime('now')`.
pub fn preprocess(sql: &str, schema: &Schema) -> String {
    static QUOTED: OnceLock<Regex> = OnceLock::new();
    static DATETIME: OnceLock<Regex> = OnceLock::new();

    let quoted = QUOTED.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("quoted-word pattern"));
    let datetime = DATETIME
        .get_or_init(|| Regex::new(r"(?i)\bdatetime\(\)").expect("datetime pattern"));

    let mut query = sql.replace('`', "\"");

    let words: Vec<String> = quoted
        .captures_iter(&query)
        .map(|caps| caps[1].to_owned())
        .collect();
    for word in words {
        let lowered = word.to_lowercase();
        let known = schema.has_table(&lowered) || schema.has_column_anywhere(&lowered);
        if !known {
            query = query.replace(&format!("\"{word}\""), &format!("'{word}'"));
        }
    }

    datetime.replace_all(&query, "datetime('now')").into_owned()
}
