//! Build canonical tables from parsed column and constraint fragments

use std::collections::HashSet;

use crate::error::DdlError;
use crate::parser::{TokenParsedColumn, TokenParsedConstraint, TokenParsedReference};

use super::{Column, ForeignKey, Index, Table};

/// Assemble a table from the items of one CREATE TABLE body.
///
/// Columns are kept in declaration order; a repeated column name keeps its
/// first definition. Primary key declarations flag every named column, also
/// when the declaration comes after the column. Inline `UNIQUE` and
/// `REFERENCES` clauses become an index and a foreign key.
pub fn build_table(
    name: String,
    columns: Vec<TokenParsedColumn>,
    constraints: Vec<TokenParsedConstraint>,
) -> Result<Table, DdlError> {
    if columns.is_empty() {
        return Err(DdlError::MalformedStatement {
            message: format!("table {} has no columns", name),
        });
    }

    let mut table = Table::new(name);
    let mut seen: HashSet<String> = HashSet::new();
    let mut inline_keys: Vec<String> = Vec::new();

    for parsed in columns {
        if !seen.insert(parsed.name.clone()) {
            tracing::debug!(table = %table.name, column = %parsed.name, "ignoring repeated column");
            continue;
        }

        if parsed.primary_key {
            inline_keys.push(parsed.name.clone());
        }
        if parsed.unique {
            table.indexes.push(Index {
                name: parsed.unique_name.clone(),
                columns: vec![parsed.name.clone()],
                unique: true,
            });
        }
        if let Some(reference) = &parsed.references {
            table.foreign_keys.push(foreign_key(
                parsed.references_name.clone(),
                vec![parsed.name.clone()],
                reference,
            ));
        }

        table.columns.push(column_from_parsed(parsed));
    }

    for key in inline_keys {
        table.mark_primary(&key);
    }

    for constraint in constraints {
        match constraint {
            TokenParsedConstraint::PrimaryKey { columns, .. } => {
                for key in &columns {
                    if !table.mark_primary(key) {
                        tracing::debug!(table = %table.name, column = %key, "primary key names unknown column");
                    }
                }
            }
            TokenParsedConstraint::Unique { name, columns } => {
                table.indexes.push(Index {
                    name,
                    columns,
                    unique: true,
                });
            }
            TokenParsedConstraint::Index { name, columns } => {
                table.indexes.push(Index {
                    name,
                    columns,
                    unique: false,
                });
            }
            TokenParsedConstraint::ForeignKey {
                name,
                columns,
                reference,
            } => {
                table
                    .foreign_keys
                    .push(foreign_key(name, columns, &reference));
            }
            TokenParsedConstraint::Ignored => {}
        }
    }

    Ok(table)
}

fn column_from_parsed(parsed: TokenParsedColumn) -> Column {
    Column {
        name: parsed.name,
        data_type: parsed.data_type,
        length: parsed.length,
        scale: parsed.scale,
        nullable: parsed.nullable,
        default: parsed.default,
        // set through Table::mark_primary so the key list stays in sync
        primary_key: false,
        auto_increment: parsed.auto_increment,
        values: parsed.values,
        description: parsed.comment,
    }
}

/// A reference without a column list points at the referenced table's key,
/// which is assumed to share the local column names.
fn foreign_key(
    name: Option<String>,
    columns: Vec<String>,
    reference: &TokenParsedReference,
) -> ForeignKey {
    let referenced_column = if reference.columns.is_empty() {
        columns.clone()
    } else {
        reference.columns.clone()
    };
    ForeignKey {
        name,
        column_name: columns,
        referenced_table: reference.table.clone(),
        referenced_column,
        on_update: reference.on_update.clone(),
        on_delete: reference.on_delete.clone(),
    }
}
