//! SQLite schema introspection.

use anyhow::{Context, Result};
use rusqlite::Connection;
use treematch_core::{Schema, TableSchema};

/// Builds the logical schema descriptor for one database via the SQLite
/// pragmas. Table and column names are lowercased; primary keys feed the
/// unique and non-null sets; single-column unique indexes extend the
/// unique set.
pub fn introspect(conn: &Connection) -> Result<Schema> {
    let mut statement = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'")
        .context("listing tables")?;
    let names: Vec<String> = statement
        .query_map([], |row| row.get(0))
        .context("listing tables")?
        .collect::<rusqlite::Result<_>>()?;

    // (foreign table, foreign column, referenced table, referenced column
    // or None for an implicit primary-key reference)
    let mut pending_keys: Vec<(String, String, String, Option<String>)> = Vec::new();
    let mut schema = Schema::new();

    for name in &names {
        let lowered = name.to_lowercase();
        let mut table = TableSchema::default();

        let mut info = conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(name)))
            .with_context(|| format!("describing table {name}"))?;
        let columns = info.query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, i64>(3)? != 0,
                row.get::<_, i64>(5)? != 0,
            ))
        })?;
        for column in columns {
            let (column, not_null, primary) = column?;
            let column = column.to_lowercase();
            table.columns.push(column.clone());
            if not_null || primary {
                table.non_null.insert(column.clone());
            }
            if primary {
                table.unique.insert(column.clone());
                table.primary_keys.insert(column);
            }
        }

        let mut indexes = conn
            .prepare(&format!("PRAGMA index_list({})", quote_identifier(name)))
            .with_context(|| format!("listing indexes of {name}"))?;
        let unique_indexes = indexes.query_map([], |row| {
            Ok((row.get::<_, String>(1)?, row.get::<_, i64>(2)? != 0))
        })?;
        for index in unique_indexes {
            let (index, unique) = index?;
            if !unique {
                continue;
            }
            let mut info = conn
                .prepare(&format!("PRAGMA index_info({})", quote_identifier(&index)))
                .with_context(|| format!("describing index {index}"))?;
            let indexed: Vec<String> = info
                .query_map([], |row| row.get(2))?
                .collect::<rusqlite::Result<_>>()?;
            if let [column] = indexed.as_slice() {
                table.unique.insert(column.to_lowercase());
            }
        }

        let mut foreign_keys = conn
            .prepare(&format!("PRAGMA foreign_key_list({})", quote_identifier(name)))
            .with_context(|| format!("listing foreign keys of {name}"))?;
        let references = foreign_keys.query_map([], |row| {
            Ok((
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;
        for reference in references {
            let (referenced_table, from, to) = reference?;
            pending_keys.push((
                lowered.clone(),
                from.to_lowercase(),
                referenced_table.to_lowercase(),
                to.map(|column| column.to_lowercase()),
            ));
        }

        schema.insert_table(lowered, table);
    }

    // A `REFERENCES t` clause without a column names t's primary key,
    // resolvable only once every table is loaded.
    for (table, from, referenced_table, to) in pending_keys {
        let referenced_column = to.or_else(|| {
            schema.table(&referenced_table).and_then(|t| {
                if t.primary_keys.len() == 1 {
                    t.primary_keys.iter().next().cloned()
                } else {
                    None
                }
            })
        });
        if let Some(referenced_column) = referenced_column {
            schema.add_foreign_key(&table, &from, format!("{referenced_table}.{referenced_column}"));
        }
    }

    Ok(schema)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch(
            r#"
            CREATE TABLE Dept (
                Id INTEGER PRIMARY KEY,
                Name TEXT NOT NULL
            );
            CREATE TABLE Emp (
                Id INTEGER PRIMARY KEY,
                Name TEXT NOT NULL,
                Badge TEXT UNIQUE,
                Dept_Id INTEGER REFERENCES Dept(Id)
            );
            "#,
        )
        .expect("create tables");
        conn
    }

    #[test]
    fn lowercases_and_collects_constraints() {
        let schema = introspect(&test_db()).expect("introspect");
        assert!(schema.is_primary_key("emp", "id"));
        assert!(schema.is_non_null("emp", "name"));
        assert!(schema.is_unique("emp", "badge"));
        assert!(!schema.is_unique("emp", "dept_id"));
        assert_eq!(schema.foreign_key_target("emp", "dept_id"), Some("dept.id"));
    }

    #[test]
    fn implicit_foreign_key_targets_resolve_to_the_primary_key() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch(
            "CREATE TABLE a (id INTEGER PRIMARY KEY);
             CREATE TABLE b (a_ref INTEGER REFERENCES a);",
        )
        .expect("create tables");
        let schema = introspect(&conn).expect("introspect");
        assert_eq!(schema.foreign_key_target("b", "a_ref"), Some("a.id"));
    }
}
