//! Dialect-specific SQL generation
//!
//! Renders canonical tables as `CREATE TABLE` statements (with primary key,
//! foreign keys and indexes) and batched `INSERT` statements. Generation
//! never fails: anything that cannot be rendered is left out and reported
//! as a [`Warning`].

mod index_writer;
mod insert_writer;
mod table_writer;
mod type_writer;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dialect::Dialect;
use crate::error::Warning;
use crate::model::Table;

/// Default number of rows per INSERT statement
pub const DEFAULT_MAX_ROW: usize = 100;

/// `::type` casts as written by PostgreSQL dumps, e.g. `'x'::character varying`
static CAST_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)::[a-z_][a-z0-9_ ]*(\([0-9, ]*\))?(\[\])?").expect("valid cast regex")
});

/// Options controlling SQL generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub dialect: Dialect,
    pub include_foreign_keys: bool,
    pub include_indexes: bool,
    /// Append `DEFERRABLE INITIALLY DEFERRED` to foreign keys (PostgreSQL only)
    pub deferrable_foreign_keys: bool,
    /// Rows per INSERT statement; values below 1 are treated as 1
    pub max_row: usize,
}

impl GenerateOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Mysql,
            include_foreign_keys: true,
            include_indexes: true,
            deferrable_foreign_keys: false,
            max_row: DEFAULT_MAX_ROW,
        }
    }
}

/// Generated SQL text together with everything that was left out of it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSql {
    pub sql: String,
    pub warnings: Vec<Warning>,
}

/// Render the DDL of one table: the CREATE TABLE statement followed by any
/// standalone index and comment statements the dialect needs.
pub fn create_table(table: &Table, options: &GenerateOptions) -> GeneratedSql {
    let mut warnings = Vec::new();
    let sql = table_writer::write_table(table, options, &mut warnings);
    GeneratedSql { sql, warnings }
}

/// Render the row data of a table as INSERT statements of at most
/// `options.max_row` rows each.
pub fn insert_statements(table: &Table, options: &GenerateOptions) -> Vec<String> {
    insert_writer::write_inserts(table, options)
}

/// Render the DDL of several tables, each optionally followed by its data.
pub fn generate_script(tables: &[Table], options: &GenerateOptions, include_data: bool) -> GeneratedSql {
    let mut warnings = Vec::new();
    let mut blocks = Vec::with_capacity(tables.len());

    for table in tables {
        let mut block = table_writer::write_table(table, options, &mut warnings);
        if include_data {
            for insert in insert_writer::write_inserts(table, options) {
                block.push_str("\n\n");
                block.push_str(&insert);
            }
        }
        blocks.push(block);
    }

    GeneratedSql {
        sql: blocks.join("\n\n"),
        warnings,
    }
}

// =============================================================================
// Literal helpers shared by the writers
// =============================================================================

/// Remove `::type` cast suffixes from a default expression.
pub(crate) fn strip_casts(value: &str) -> String {
    CAST_SUFFIX.replace_all(value, "").trim().to_string()
}

/// Remove one pair of surrounding single quotes and undo doubled quotes.
pub(crate) fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

pub(crate) fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    ["true", "1", "yes", "on"]
        .iter()
        .any(|t| t.eq_ignore_ascii_case(value))
}

/// Leading integer of a literal, `0` when there is none.
pub(crate) fn coerce_integer(value: &str) -> i64 {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return n;
    }
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value[..end].parse().unwrap_or(0)
}

pub(crate) fn coerce_float(value: &str) -> String {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n.to_string(),
        _ => "0".to_string(),
    }
}

/// A plain decimal or scientific number literal.
pub(crate) fn is_numeric_literal(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        && value.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false)
}
