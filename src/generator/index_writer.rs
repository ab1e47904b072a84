//! Index collection and writing
//!
//! Indexes are identified by their signature, the sorted column list. The
//! primary key signature is registered first, then declared indexes, then
//! one supporting index per emitted foreign key. The first index of each
//! signature wins.

use std::collections::HashSet;

use crate::dialect::Dialect;
use crate::error::Warning;
use crate::model::{index_signature, ForeignKey, Index, Table};

/// Indexes to emit for a table, with resolved names.
pub(crate) fn collect_indexes(
    table: &Table,
    primary_key: &[String],
    foreign_keys: &[&ForeignKey],
    warnings: &mut Vec<Warning>,
) -> Vec<Index> {
    let mut seen: HashSet<String> = HashSet::new();
    if !primary_key.is_empty() {
        seen.insert(index_signature(primary_key));
    }

    let mut indexes = Vec::new();
    for index in &table.indexes {
        let name = index.name_for(&table.name);
        if index.columns.is_empty() {
            warnings.push(
                Warning::IncompleteIndex {
                    table: table.name.clone(),
                    index: name,
                }
                .emit(),
            );
            continue;
        }
        if !seen.insert(index_signature(&index.columns)) {
            warnings.push(
                Warning::DuplicateIndex {
                    table: table.name.clone(),
                    index: name,
                }
                .emit(),
            );
            continue;
        }
        indexes.push(Index {
            name: Some(name),
            columns: index.columns.clone(),
            unique: index.unique,
        });
    }

    for fk in foreign_keys {
        let name = supporting_index_name(table, fk);
        if !seen.insert(index_signature(&fk.column_name)) {
            tracing::debug!(table = %table.name, index = %name, "foreign key already covered by an index");
            continue;
        }
        indexes.push(Index {
            name: Some(name),
            columns: fk.column_name.clone(),
            unique: false,
        });
    }

    indexes
}

/// `fk_orders_customer` becomes `idx_orders_customer`; other names give
/// `idx_<table>_<firstColumn>`.
fn supporting_index_name(table: &Table, fk: &ForeignKey) -> String {
    match fk.name.as_deref().and_then(|n| n.strip_prefix("fk_")) {
        Some(rest) if !rest.is_empty() => format!("idx_{}", rest),
        _ => format!(
            "idx_{}_{}",
            table.name,
            fk.column_name.first().map(String::as_str).unwrap_or("")
        ),
    }
}

/// `[UNIQUE] INDEX name (cols)` inside a MySQL table body.
pub(crate) fn write_inline_index(index: &Index, dialect: Dialect) -> String {
    format!(
        "{}INDEX {} ({})",
        if index.unique { "UNIQUE " } else { "" },
        dialect.quote_column(index.name.as_deref().unwrap_or_default()),
        dialect.quote_columns(&index.columns)
    )
}

/// `CREATE [UNIQUE] INDEX [IF NOT EXISTS] name ON table (cols);`
pub(crate) fn write_standalone_index(index: &Index, table: &str, dialect: Dialect) -> String {
    format!(
        "CREATE {}INDEX {}{} ON {} ({});",
        if index.unique { "UNIQUE " } else { "" },
        if dialect.supports_index_if_not_exists() {
            "IF NOT EXISTS "
        } else {
            ""
        },
        dialect.quote_column(index.name.as_deref().unwrap_or_default()),
        dialect.quote_table(table),
        dialect.quote_columns(&index.columns)
    )
}
