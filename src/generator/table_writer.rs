//! CREATE TABLE statement writing

use std::collections::HashSet;

use super::index_writer::{collect_indexes, write_inline_index, write_standalone_index};
use super::type_writer::render_type;
use super::{coerce_float, coerce_integer, is_truthy, strip_casts, unquote, GenerateOptions};
use crate::catalog::{is_boolean_type, is_float_type, is_integer_type};
use crate::dialect::Dialect;
use crate::error::Warning;
use crate::model::{Column, DefaultValue, ForeignKey, Table};
use crate::util::contains_ci;

/// Referential actions accepted in ON UPDATE / ON DELETE
const REFERENTIAL_ACTIONS: &[&str] = &["NO ACTION", "RESTRICT", "CASCADE", "SET NULL", "SET DEFAULT"];

/// Write the table statement and the statements that must follow it.
pub(crate) fn write_table(
    table: &Table,
    options: &GenerateOptions,
    warnings: &mut Vec<Warning>,
) -> String {
    let dialect = options.dialect;
    let primary_key = resolve_primary_key(table, warnings);
    let key_set: HashSet<&str> = primary_key.iter().map(String::as_str).collect();
    let inline_key = (primary_key.len() == 1).then(|| primary_key[0].as_str());

    let mut items: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            write_column(
                table,
                column,
                key_set.contains(column.name.as_str()),
                inline_key == Some(column.name.as_str()),
                dialect,
                warnings,
            )
        })
        .collect();

    if primary_key.len() > 1 {
        items.push(format!("PRIMARY KEY({})", dialect.quote_columns(&primary_key)));
    }

    let mut emitted_keys: Vec<&ForeignKey> = Vec::new();
    if options.include_foreign_keys {
        for fk in &table.foreign_keys {
            if let Some(clause) = write_foreign_key(table, fk, options, warnings) {
                items.push(clause);
                emitted_keys.push(fk);
            }
        }
    }

    let indexes = if options.include_indexes {
        collect_indexes(table, &primary_key, &emitted_keys, warnings)
    } else {
        Vec::new()
    };

    if dialect.inline_indexes() {
        items.extend(indexes.iter().map(|index| write_inline_index(index, dialect)));
    }

    let mut sql = String::new();
    let quoted = dialect.quote_table(&table.name);
    if dialect == Dialect::Sqlserver {
        sql.push_str(&format!("IF OBJECT_ID(N'{}', N'U') IS NULL\n", table.name.replace('\'', "''")));
        sql.push_str(&format!("CREATE TABLE {}\n(\n", quoted));
    } else {
        sql.push_str(&format!("CREATE TABLE IF NOT EXISTS {}\n(\n", quoted));
    }
    let body: Vec<String> = items.iter().map(|item| format!("\t{}", item)).collect();
    sql.push_str(&body.join(",\n"));
    sql.push_str("\n);");

    if !dialect.inline_indexes() {
        for index in &indexes {
            sql.push('\n');
            sql.push_str(&write_standalone_index(index, &table.name, dialect));
        }
    }

    if dialect == Dialect::Postgresql {
        for column in &table.columns {
            if let Some(description) = column.description.as_deref().filter(|d| !d.is_empty()) {
                sql.push_str(&format!(
                    "\nCOMMENT ON COLUMN {}.{} IS {};",
                    quoted,
                    dialect.quote_column(&column.name),
                    dialect.string_literal(description)
                ));
            }
        }
    }

    sql
}

/// Effective primary key restricted to existing columns.
fn resolve_primary_key(table: &Table, warnings: &mut Vec<Warning>) -> Vec<String> {
    let mut keys = table.effective_primary_key();
    keys.retain(|key| {
        let known = table.column(key).is_some();
        if !known {
            warnings.push(
                Warning::UnknownPrimaryKeyColumn {
                    table: table.name.clone(),
                    column: key.clone(),
                }
                .emit(),
            );
        }
        known
    });
    keys
}

// =============================================================================
// Columns
// =============================================================================

fn write_column(
    table: &Table,
    column: &Column,
    is_key: bool,
    inline_key: bool,
    dialect: Dialect,
    warnings: &mut Vec<Warning>,
) -> String {
    let mut parts = vec![
        dialect.quote_column(&column.name),
        render_type(&table.name, column, dialect, warnings),
    ];

    if inline_key {
        parts.push("PRIMARY KEY".to_string());
    }

    let default = if is_key {
        None
    } else {
        write_default(column, dialect)
    };

    if !column.nullable || is_key {
        parts.push("NOT NULL".to_string());
    } else if default.is_none() {
        parts.push("NULL".to_string());
    }

    if column.auto_increment {
        match dialect.auto_increment_keyword() {
            Some(keyword) if is_integer_type(&column.data_type) => parts.push(keyword.to_string()),
            _ => warnings.push(
                Warning::AutoIncrementOmitted {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    dialect: dialect.name().to_string(),
                }
                .emit(),
            ),
        }
    }

    if let Some(default) = default {
        parts.push(default);
    }

    if dialect.is_mysql_family() {
        if let Some(description) = column.description.as_deref().filter(|d| !d.is_empty()) {
            parts.push(format!("COMMENT {}", dialect.string_literal(description)));
        }
    }

    parts.join(" ")
}

/// The `DEFAULT ...` clause of a column, if it has one worth writing.
fn write_default(column: &Column, dialect: Dialect) -> Option<String> {
    let raw = match column.default.as_ref()? {
        DefaultValue::Null => {
            return column.nullable.then(|| "DEFAULT NULL".to_string());
        }
        DefaultValue::Literal(raw) => strip_casts(raw),
    };

    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("NULL") {
        return column.nullable.then(|| "DEFAULT NULL".to_string());
    }
    if dialect == Dialect::Sqlite && contains_ci(&raw, "now(") {
        return None;
    }

    let literal = unquote(&raw);
    let text = literal.as_deref().unwrap_or(&raw);

    let value = if is_boolean_type(&column.data_type, column.length) {
        dialect.boolean_literal(is_truthy(text)).to_string()
    } else if is_integer_type(&column.data_type) {
        coerce_integer(text).to_string()
    } else if is_float_type(&column.data_type) {
        coerce_float(text)
    } else if literal.is_some() && text.contains('\\') {
        // backslashes are escapes in MySQL and PostgreSQL string literals
        dialect.string_literal(text)
    } else {
        raw
    };
    Some(format!("DEFAULT {}", value))
}

// =============================================================================
// Foreign keys
// =============================================================================

fn write_foreign_key(
    table: &Table,
    fk: &ForeignKey,
    options: &GenerateOptions,
    warnings: &mut Vec<Warning>,
) -> Option<String> {
    let dialect = options.dialect;
    let name = fk.name_for(&table.name);

    let complete = !fk.column_name.is_empty()
        && !fk.referenced_table.trim().is_empty()
        && fk.referenced_column.len() == fk.column_name.len();
    if !complete {
        warnings.push(
            Warning::IncompleteForeignKey {
                table: table.name.clone(),
                constraint: name,
            }
            .emit(),
        );
        return None;
    }

    let mut clause = format!(
        "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
        dialect.quote_column(&name),
        dialect.quote_columns(&fk.column_name),
        dialect.quote_table(&fk.referenced_table),
        dialect.quote_columns(&fk.referenced_column)
    );

    for (keyword, action) in [("ON UPDATE", &fk.on_update), ("ON DELETE", &fk.on_delete)] {
        let Some(action) = action.as_deref() else {
            continue;
        };
        match normalize_action(action) {
            Ok(Some(action)) => clause.push_str(&format!(" {} {}", keyword, action)),
            Ok(None) => {}
            Err(()) => warnings.push(
                Warning::InvalidForeignKeyAction {
                    table: table.name.clone(),
                    constraint: name.clone(),
                    action: action.to_string(),
                }
                .emit(),
            ),
        }
    }

    if options.deferrable_foreign_keys && dialect.supports_deferrable() {
        clause.push_str(" DEFERRABLE INITIALLY DEFERRED");
    }

    Some(clause)
}

/// `Ok(None)` for an empty action, `Err` for one outside the accepted set.
fn normalize_action(action: &str) -> Result<Option<&'static str>, ()> {
    let words: Vec<&str> = action.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    let normalized = words.join(" ").to_ascii_uppercase();
    REFERENTIAL_ACTIONS
        .iter()
        .find(|a| **a == normalized)
        .map(|a| Some(*a))
        .ok_or(())
}
