//! Batched INSERT writing

use std::collections::HashSet;

use serde_json::Value;

use super::{is_numeric_literal, is_truthy, strip_casts, unquote, GenerateOptions};
use crate::catalog::{is_boolean_type, is_float_type, is_integer_type};
use crate::dialect::Dialect;
use crate::model::{Column, DefaultValue, Row, Table};
use crate::util::contains_ci;

/// One `INSERT INTO ... VALUES` statement per batch of `max_row` rows.
pub(crate) fn write_inserts(table: &Table, options: &GenerateOptions) -> Vec<String> {
    if table.data.is_empty() || table.columns.is_empty() {
        return Vec::new();
    }

    let dialect = options.dialect;
    let primary_key = table.effective_primary_key();
    let keys: HashSet<&str> = primary_key.iter().map(String::as_str).collect();
    let names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
    let header = format!(
        "INSERT INTO {} ({}) VALUES",
        dialect.quote_table(&table.name),
        dialect.quote_columns(&names)
    );

    table
        .data
        .chunks(options.max_row.max(1))
        .map(|batch| {
            let rows: Vec<String> = batch
                .iter()
                .map(|row| write_row(row, &table.columns, &keys, dialect))
                .collect();
            format!("{}\n{};", header, rows.join(",\n"))
        })
        .collect()
}

fn write_row(row: &Row, columns: &[Column], keys: &HashSet<&str>, dialect: Dialect) -> String {
    let values: Vec<String> = columns
        .iter()
        .map(|column| {
            format_value(
                row.get(&column.name),
                column,
                keys.contains(column.name.as_str()),
                dialect,
            )
        })
        .collect();
    format!("({})", values.join(", "))
}

/// Format one cell of a row as a SQL literal.
pub(crate) fn format_value(
    value: Option<&Value>,
    column: &Column,
    is_key: bool,
    dialect: Dialect,
) -> String {
    match value {
        Some(value) if !is_null_like(value, column) => format_present(value, column, dialect),
        _ if column.nullable && !is_key => "null".to_string(),
        _ => fallback_value(column, dialect),
    }
}

/// Null, blank, or the text `null` in a non-text column.
fn is_null_like(value: &Value, column: &Column) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || (!column.is_text() && s.eq_ignore_ascii_case("null"))
        }
        _ => false,
    }
}

fn format_present(value: &Value, column: &Column, dialect: Dialect) -> String {
    if is_boolean_type(&column.data_type, column.length) {
        let truthy = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
            Value::String(s) => is_truthy(s),
            _ => false,
        };
        return dialect.boolean_literal(truthy).to_string();
    }

    if is_integer_type(&column.data_type) || is_float_type(&column.data_type) {
        match value {
            Value::Number(n) => return n.to_string(),
            Value::Bool(b) => return if *b { "1" } else { "0" }.to_string(),
            Value::String(s) if is_numeric_literal(s) => return s.trim().to_string(),
            _ => {}
        }
    }

    match value {
        Value::String(s) => dialect.string_literal(s),
        other => dialect.string_literal(&other.to_string()),
    }
}

/// Value for a null-like cell in a column that cannot hold null: the
/// declared default when there is a usable one, else the type's zero.
fn fallback_value(column: &Column, dialect: Dialect) -> String {
    if let Some(DefaultValue::Literal(raw)) = &column.default {
        let raw = strip_casts(raw);
        let skip_expression = dialect == Dialect::Sqlite && contains_ci(&raw, "now(");
        match unquote(&raw) {
            Some(text) => {
                let value = Value::String(text);
                if !is_null_like(&value, column) {
                    return format_present(&value, column, dialect);
                }
            }
            None if !raw.is_empty() && !raw.eq_ignore_ascii_case("null") && !skip_expression => {
                let value = Value::String(raw.clone());
                let numeric = is_boolean_type(&column.data_type, column.length)
                    || is_integer_type(&column.data_type)
                    || is_float_type(&column.data_type);
                // unquoted defaults of other types are expressions such as CURRENT_TIMESTAMP
                return if numeric {
                    format_present(&value, column, dialect)
                } else {
                    raw
                };
            }
            None => {}
        }
    }
    zero_value(column, dialect)
}

fn zero_value(column: &Column, dialect: Dialect) -> String {
    if is_boolean_type(&column.data_type, column.length) {
        dialect.boolean_literal(false).to_string()
    } else if is_integer_type(&column.data_type) || is_float_type(&column.data_type) {
        "0".to_string()
    } else {
        "''".to_string()
    }
}
