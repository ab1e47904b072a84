//! Column type rendering

use crate::catalog::{is_boolean_type, TypeCatalog};
use crate::dialect::Dialect;
use crate::error::Warning;
use crate::model::Column;

/// Render the target type of a column, including any length suffix.
///
/// Unknown types fall back to the dialect's generic text type and are
/// reported as `UnsupportedType`.
pub(crate) fn render_type(
    table: &str,
    column: &Column,
    dialect: Dialect,
    warnings: &mut Vec<Warning>,
) -> String {
    let catalog = TypeCatalog::for_dialect(dialect);

    if column.is_value_set() {
        if dialect.is_mysql_family() {
            let literals: Vec<String> = column
                .values
                .iter()
                .map(|v| dialect.string_literal(v))
                .collect();
            return format!(
                "{}({})",
                column.data_type.to_ascii_lowercase(),
                literals.join(",")
            );
        }
        let (_, length) = column.effective_type();
        return match length {
            Some(n) => format!("{}({})", catalog.varchar, n),
            None => catalog.varchar.to_string(),
        };
    }

    if is_boolean_type(&column.data_type, column.length) {
        return match dialect {
            Dialect::Sqlserver => "BIT".to_string(),
            _ => "BOOLEAN".to_string(),
        };
    }

    match catalog.lookup(&column.data_type) {
        Some(target) => with_size(catalog, target, column),
        None => {
            warnings.push(
                Warning::UnsupportedType {
                    table: table.to_string(),
                    column: column.name.clone(),
                    data_type: column.data_type.clone(),
                }
                .emit(),
            );
            catalog.fallback.to_string()
        }
    }
}

fn with_size(catalog: &TypeCatalog, target: &str, column: &Column) -> String {
    // targets such as NVARCHAR(MAX) carry their own size
    if target.contains('(') {
        return target.to_string();
    }

    if catalog.is_range_type(target) {
        return match (column.length, column.scale) {
            (Some(p), Some(s)) => format!("{}({}, {})", target, p, s),
            (Some(p), None) => format!("{}({})", target, p),
            _ => target.to_string(),
        };
    }

    if catalog.is_length_type(target) {
        if let Some(n) = column.length {
            return format!("{}({})", target, n);
        }
        if let Some(default) = catalog.default_length(target) {
            return format!("{}({})", target, default);
        }
    }

    target.to_string()
}
