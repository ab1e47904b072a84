//! ddlkit: translate CREATE TABLE scripts between SQL dialects
//!
//! This library reads `CREATE TABLE` style SQL, builds a dialect-neutral
//! table model and renders it again for SQLite, MySQL/MariaDB, PostgreSQL
//! or SQL Server, including keys, indexes and batched row data.

pub mod catalog;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod util;

use std::path::Path;

pub use dialect::Dialect;
pub use error::{DdlError, Warning};
pub use generator::{
    create_table, generate_script, insert_statements, GenerateOptions, GeneratedSql,
};
pub use model::{Column, DefaultValue, ForeignKey, Index, Row, Table};
pub use parser::{parse_create_table, parse_script, ParsedScript};

/// Options for translating a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Target dialect name; unknown names fall back to MySQL rules
    pub target: String,
    pub include_foreign_keys: bool,
    pub include_indexes: bool,
    /// Emit PostgreSQL foreign keys as `DEFERRABLE INITIALLY DEFERRED`
    pub deferrable_foreign_keys: bool,
}

impl TranslateOptions {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            include_foreign_keys: true,
            include_indexes: true,
            deferrable_foreign_keys: false,
        }
    }
}

/// Result of translating a script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    /// Generated script
    pub sql: String,
    /// Tables parsed from the input, in declaration order
    pub tables: Vec<Table>,
    /// Skipped statements and everything dropped during generation
    pub warnings: Vec<Warning>,
}

/// Translate a script into the named dialect with default options.
pub fn translate(sql: &str, target: &str) -> Translation {
    translate_with(sql, &TranslateOptions::new(target))
}

/// Translate a script.
///
/// `DROP TABLE IF EXISTS` statements are kept as comments at the top of the
/// output; every parsed table follows as DDL for the target dialect.
pub fn translate_with(sql: &str, options: &TranslateOptions) -> Translation {
    let (dialect, unknown) = Dialect::resolve(&options.target);
    let mut warnings: Vec<Warning> = unknown.into_iter().collect();

    let script = parse_script(sql);
    warnings.extend(script.warnings);

    let generate = GenerateOptions {
        dialect,
        include_foreign_keys: options.include_foreign_keys,
        include_indexes: options.include_indexes,
        deferrable_foreign_keys: options.deferrable_foreign_keys,
        ..Default::default()
    };
    let generated = generate_script(&script.tables, &generate, false);
    warnings.extend(generated.warnings);

    let mut blocks = Vec::new();
    if !script.dropped_tables.is_empty() {
        let comments: Vec<String> = script
            .dropped_tables
            .iter()
            .map(|name| format!("-- DROP TABLE IF EXISTS {};", dialect.quote_table(name)))
            .collect();
        blocks.push(comments.join("\n"));
    }
    if !generated.sql.is_empty() {
        blocks.push(generated.sql);
    }

    tracing::debug!(
        dialect = %dialect,
        tables = script.tables.len(),
        warnings = warnings.len(),
        "translated script"
    );

    Translation {
        sql: blocks.join("\n\n"),
        tables: script.tables,
        warnings,
    }
}

/// Read a SQL script, accepting UTF-8 or Windows-1252 text.
pub fn read_script(path: &Path) -> Result<String, DdlError> {
    util::read_file_with_encoding_fallback(path).map_err(|source| DdlError::ScriptRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and translate a SQL script file.
pub fn translate_file(path: &Path, options: &TranslateOptions) -> Result<Translation, DdlError> {
    let sql = read_script(path)?;
    Ok(translate_with(&sql, options))
}

/// Parse a JSON array of tables and check every table's invariants.
pub fn parse_model_json(json: &str) -> Result<Vec<Table>, DdlError> {
    let tables: Vec<Table> = serde_json::from_str(json)?;
    for table in &tables {
        table.validate()?;
    }
    Ok(tables)
}

/// Load a JSON model file.
pub fn load_model(path: &Path) -> Result<Vec<Table>, DdlError> {
    let json = std::fs::read_to_string(path).map_err(|source| DdlError::ModelRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_model_json(&json)
}
