//! Per-database schema metadata consumed by the rewrite rules.
//!
//! All table and column names are stored lowercase; lookups take lowercase
//! names. Unknown tables or columns report every property as absent, so
//! rules guard-skip rather than fail on references the schema cannot
//! resolve.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Metadata for a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Column names in declaration order.
    pub columns: Vec<String>,
    /// Columns declared unique, including primary keys.
    pub unique: BTreeSet<String>,
    /// Columns declared NOT NULL, including primary keys.
    pub non_null: BTreeSet<String>,
    /// Primary-key columns; composite if more than one.
    pub primary_keys: BTreeSet<String>,
    /// Foreign keys as `local column → "table.column"`.
    pub foreign_keys: BTreeMap<String, String>,
}

/// Schema of one database: table name → [`TableSchema`].
///
/// Read-only during rewriting except for the equi-join propagation rule,
/// which extends `unique`/`non_null` via [`Schema::mark_unique`] and
/// [`Schema::mark_non_null`]. Callers hand each canonicalization a clone so
/// those extensions never outlive a single comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    tables: BTreeMap<String, TableSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, name: impl Into<String>, table: TableSchema) {
        self.tables.insert(name.into(), table);
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&String, &TableSchema)> {
        self.tables.iter()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// True if any table declares a column with this name.
    pub fn has_column_anywhere(&self, column: &str) -> bool {
        self.tables
            .values()
            .any(|table| table.columns.iter().any(|c| c == column))
    }

    /// Names of the tables (among `candidates`) whose schema declares
    /// `column`.
    pub fn tables_containing<'a>(
        &self,
        candidates: &'a [String],
        column: &str,
    ) -> Vec<&'a String> {
        candidates
            .iter()
            .filter(|name| {
                self.table(name)
                    .is_some_and(|t| t.columns.iter().any(|c| c == column))
            })
            .collect()
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.table(table).map(|t| t.columns.as_slice())
    }

    pub fn is_unique(&self, table: &str, column: &str) -> bool {
        self.table(table).is_some_and(|t| t.unique.contains(column))
    }

    pub fn is_non_null(&self, table: &str, column: &str) -> bool {
        self.table(table).is_some_and(|t| t.non_null.contains(column))
    }

    pub fn is_primary_key(&self, table: &str, column: &str) -> bool {
        self.table(table).is_some_and(|t| t.primary_keys.contains(column))
    }

    /// True if `table` has a single-column primary key.
    pub fn primary_key_is_single(&self, table: &str) -> bool {
        self.table(table).is_some_and(|t| t.primary_keys.len() == 1)
    }

    /// The `"table.column"` a foreign key references, if declared.
    pub fn foreign_key_target(&self, table: &str, column: &str) -> Option<&str> {
        self.table(table)?.foreign_keys.get(column).map(String::as_str)
    }

    /// True if `(foreign_table, foreign_column)` is a declared foreign key
    /// referencing `(primary_table, primary_column)`.
    pub fn references(
        &self,
        foreign_table: &str,
        foreign_column: &str,
        primary_table: &str,
        primary_column: &str,
    ) -> bool {
        self.foreign_key_target(foreign_table, foreign_column)
            .is_some_and(|target| target == format!("{primary_table}.{primary_column}"))
    }

    pub fn mark_unique(&mut self, table: &str, column: &str) {
        if let Some(t) = self.tables.get_mut(table) {
            t.unique.insert(column.to_owned());
        }
    }

    pub fn mark_non_null(&mut self, table: &str, column: &str) {
        if let Some(t) = self.tables.get_mut(table) {
            t.non_null.insert(column.to_owned());
        }
    }

    pub fn add_foreign_key(&mut self, table: &str, column: &str, target: impl Into<String>) {
        if let Some(t) = self.tables.get_mut(table) {
            t.foreign_keys.insert(column.to_owned(), target.into());
        }
    }

    /// Parses a Spider-style `tables.json` document into per-database
    /// schemas keyed by `db_id`.
    ///
    /// The file declares primary and foreign keys but no unique or NOT NULL
    /// constraints, so both default to the primary-key set.
    pub fn from_tables_json(json: &str) -> Result<BTreeMap<String, Schema>, SchemaError> {
        let databases: Vec<TablesJsonDb> = serde_json::from_str(json)?;
        let mut schemas = BTreeMap::new();
        for db in databases {
            schemas.insert(db.db_id.clone(), db.into_schema()?);
        }
        Ok(schemas)
    }
}

/// One database entry of a Spider `tables.json` document.
#[derive(Debug, Deserialize)]
struct TablesJsonDb {
    db_id: String,
    table_names_original: Vec<String>,
    /// `[table index, column name]`; index -1 is the `*` pseudo-column.
    column_names_original: Vec<(i64, String)>,
    #[serde(default)]
    primary_keys: Vec<i64>,
    #[serde(default)]
    foreign_keys: Vec<(i64, i64)>,
}

impl TablesJsonDb {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        let tables: Vec<String> = self
            .table_names_original
            .iter()
            .map(|name| name.to_lowercase())
            .collect();

        // Column index → (table name, column name), skipping the `*` entry.
        let mut columns = Vec::with_capacity(self.column_names_original.len());
        for (table_index, column) in &self.column_names_original {
            if *table_index < 0 {
                columns.push(None);
                continue;
            }
            let table = tables
                .get(*table_index as usize)
                .ok_or_else(|| SchemaError::Malformed(self.db_id.clone()))?;
            columns.push(Some((table.clone(), column.to_lowercase())));
        }

        let resolve = |index: i64| -> Result<&(String, String), SchemaError> {
            columns
                .get(index as usize)
                .and_then(Option::as_ref)
                .ok_or_else(|| SchemaError::Malformed(self.db_id.clone()))
        };

        let mut schema = Schema::new();
        for table in &tables {
            schema.insert_table(table.clone(), TableSchema::default());
        }
        for entry in columns.iter().flatten() {
            let (table, column) = entry;
            if let Some(t) = schema.tables.get_mut(table) {
                t.columns.push(column.clone());
            }
        }
        for index in &self.primary_keys {
            let (table, column) = resolve(*index)?;
            if let Some(t) = schema.tables.get_mut(table.as_str()) {
                t.primary_keys.insert(column.clone());
                t.unique.insert(column.clone());
                t.non_null.insert(column.clone());
            }
        }
        for (from, to) in &self.foreign_keys {
            let (from_table, from_column) = resolve(*from)?;
            let target = {
                let (to_table, to_column) = resolve(*to)?;
                format!("{to_table}.{to_column}")
            };
            if let Some(t) = schema.tables.get_mut(from_table.as_str()) {
                t.foreign_keys.insert(from_column.clone(), target);
            }
        }
        Ok(schema)
    }
}
