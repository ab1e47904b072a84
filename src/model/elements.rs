//! Canonical table model element types
//!
//! These records are dialect-neutral. The parser produces them, editors and
//! importers may build them directly, and the generator consumes them. They
//! serialize to camelCase JSON so external tools can exchange models.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::{is_text_type, is_value_set_type};
use crate::error::DdlError;

/// One row of table data, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A table definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Declared primary key, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_key: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Flag a column as part of the primary key.
    ///
    /// Returns `false` when the table has no such column.
    pub fn mark_primary(&mut self, name: &str) -> bool {
        let Some(column) = self.columns.iter_mut().find(|c| c.name == name) else {
            return false;
        };
        column.primary_key = true;
        if !self.primary_key.iter().any(|k| k == name) {
            self.primary_key.push(name.to_string());
        }
        true
    }

    /// The primary key as rendered: declared key columns first, then any
    /// other flagged columns in column order.
    pub fn effective_primary_key(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for name in &self.primary_key {
            if !keys.contains(name) {
                keys.push(name.clone());
            }
        }
        for column in self.columns.iter().filter(|c| c.primary_key) {
            if !keys.contains(&column.name) {
                keys.push(column.name.clone());
            }
        }
        keys
    }

    /// Check the structural invariants of a hand-built table.
    pub fn validate(&self) -> Result<(), DdlError> {
        let invalid = |message: String| Err(DdlError::InvalidModel { message });

        if self.name.trim().is_empty() {
            return invalid("table name is empty".to_string());
        }
        if self.columns.is_empty() {
            return invalid(format!("table {} has no columns", self.name));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return invalid(format!(
                    "table {} declares column {} twice",
                    self.name, column.name
                ));
            }
        }

        for key in &self.primary_key {
            if !seen.contains(key.as_str()) {
                return invalid(format!(
                    "primary key of {} names unknown column {}",
                    self.name, key
                ));
            }
        }

        Ok(())
    }
}

/// Declared default of a column.
///
/// A column without any DEFAULT clause has `None`; `DEFAULT NULL` is
/// `Some(DefaultValue::Null)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Null,
    Literal(String),
}

impl Serialize for DefaultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DefaultValue::Null => serializer.serialize_none(),
            DefaultValue::Literal(value) => serializer.serialize_str(value),
        }
    }
}

/// A present `default` key always yields `Some`, so JSON `null` stays
/// distinguishable from a missing key.
fn deserialize_default<'de, D>(deserializer: D) -> Result<Option<DefaultValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(Some(match value {
        None | Some(serde_json::Value::Null) => DefaultValue::Null,
        Some(serde_json::Value::String(s)) => DefaultValue::Literal(s),
        Some(other) => DefaultValue::Literal(other.to_string()),
    }))
}

fn default_true() -> bool {
    true
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// Canonical uppercase type token, e.g. `VARCHAR`
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    /// Allowed literals of an ENUM or SET column
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into().to_ascii_uppercase(),
            length: None,
            scale: None,
            nullable: true,
            default: None,
            primary_key: false,
            auto_increment: false,
            values: Vec::new(),
            description: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// ENUM or SET with a literal list.
    pub fn is_value_set(&self) -> bool {
        is_value_set_type(&self.data_type) && !self.values.is_empty()
    }

    pub fn is_text(&self) -> bool {
        is_text_type(&self.data_type)
    }

    /// Length of the longest ENUM/SET literal, in characters.
    pub fn max_value_length(&self) -> u32 {
        self.values
            .iter()
            .map(|v| v.chars().count() as u32)
            .max()
            .unwrap_or(0)
    }

    /// Type and length with value sets folded onto fixed-length text.
    ///
    /// The text form reserves two characters beyond the longest literal.
    pub fn effective_type(&self) -> (String, Option<u32>) {
        if self.is_value_set() {
            ("VARCHAR".to_string(), Some(self.max_value_length() + 2))
        } else {
            (self.data_type.clone(), self.length)
        }
    }
}

/// A foreign key constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub column_name: Vec<String>,
    #[serde(default)]
    pub referenced_table: String,
    #[serde(default)]
    pub referenced_column: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

impl ForeignKey {
    /// Constraint name, derived as `fk_<table>_<firstColumn>` when unnamed.
    pub fn name_for(&self, table: &str) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!(
                "fk_{}_{}",
                table,
                self.column_name.first().map(String::as_str).unwrap_or("")
            ),
        }
    }
}

/// An index over one or more columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    /// Index name, derived as `idx_<table>_<col1>_<col2>...` when unnamed.
    pub fn name_for(&self, table: &str) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("idx_{}_{}", table, self.columns.join("_")),
        }
    }
}

/// Order-insensitive identity of a column list.
pub fn index_signature(columns: &[String]) -> String {
    let mut sorted: Vec<&str> = columns.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(",")
}
