//! Error and warning types for ddlkit

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing or loading schemas
#[derive(Error, Debug)]
pub enum DdlError {
    #[error("Malformed CREATE TABLE statement: {message}")]
    MalformedStatement { message: String },

    #[error("Unknown SQL dialect: {name}")]
    UnknownDialect { name: String },

    #[error("Invalid table model: {message}")]
    InvalidModel { message: String },

    #[error("Failed to read SQL file: {path}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read model file: {path}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model JSON")]
    ModelJson(#[from] serde_json::Error),
}

/// Non-fatal problems collected during translation.
///
/// Anything that cannot be rendered is dropped from the output and reported
/// here instead of being emitted as broken SQL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    #[error("Skipped statement {statement} (line {line}): {message}")]
    MalformedStatement {
        statement: usize,
        line: usize,
        message: String,
    },

    #[error("Skipped unrecognized item of {table}: {item}")]
    SkippedTableItem { table: String, item: String },

    #[error("Unsupported type {data_type} for {table}.{column}, rendered as text")]
    UnsupportedType {
        table: String,
        column: String,
        data_type: String,
    },

    #[error("Dropped invalid foreign key action '{action}' on {table}.{constraint}")]
    InvalidForeignKeyAction {
        table: String,
        constraint: String,
        action: String,
    },

    #[error("Skipped incomplete foreign key {constraint} on {table}")]
    IncompleteForeignKey { table: String, constraint: String },

    #[error("Unknown dialect '{name}', using MySQL rules")]
    UnknownDialect { name: String },

    #[error("Skipped duplicate index {index} on {table}")]
    DuplicateIndex { table: String, index: String },

    #[error("Skipped index {index} on {table}: no columns")]
    IncompleteIndex { table: String, index: String },

    #[error("{dialect} has no auto-increment keyword for {table}.{column}, omitted")]
    AutoIncrementOmitted {
        table: String,
        column: String,
        dialect: String,
    },

    #[error("Primary key of {table} names unknown column {column}")]
    UnknownPrimaryKeyColumn { table: String, column: String },
}

impl Warning {
    /// Log the warning through `tracing` and hand it back for collection.
    pub fn emit(self) -> Self {
        tracing::warn!("{}", self);
        self
    }
}
