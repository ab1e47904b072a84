//! Static type catalogs.
//!
//! Each dialect owns an ordered list of `(prefix, target)` pairs. A canonical
//! type is matched by lower-casing it and taking the first entry whose prefix
//! it starts with, so every list is kept sorted by descending prefix length:
//! `timestamptz` must be tried before `timestamp`, `datetime` before `date`.

use crate::dialect::Dialect;

/// Type keywords the column reader accepts after a column name.
///
/// An item of a CREATE TABLE body whose second token is not one of these is
/// a constraint clause, not a column.
pub static TYPE_VOCABULARY: &[&str] = &[
    // integers
    "TINYINT", "SMALLINT", "MEDIUMINT", "INT", "INTEGER", "BIGINT", "INT2", "INT4", "INT8",
    "SERIAL", "SERIAL4", "SERIAL8", "SMALLSERIAL", "BIGSERIAL",
    // text
    "CHAR", "NCHAR", "CHARACTER", "VARCHAR", "NVARCHAR", "VARCHAR2", "TEXT", "TINYTEXT",
    "MEDIUMTEXT", "LONGTEXT", "NTEXT", "CLOB",
    // temporal
    "DATE", "TIME", "DATETIME", "DATETIME2", "TIMESTAMP", "TIMESTAMPTZ", "YEAR",
    // floating and fixed point
    "REAL", "FLOAT", "DOUBLE", "DECIMAL", "NUMERIC", "MONEY",
    // boolean
    "BOOLEAN", "BOOL", "BIT",
    // value sets
    "ENUM", "SET",
    // misc
    "BLOB", "LONGBLOB", "BINARY", "VARBINARY", "BYTEA", "JSON", "JSONB", "UUID",
    "UNIQUEIDENTIFIER", "XML",
];

/// Types whose values are a declared literal list.
pub static VALUE_SET_TYPES: &[&str] = &["ENUM", "SET"];

/// Check whether a word is a known column type keyword.
pub fn is_type_keyword(word: &str) -> bool {
    TYPE_VOCABULARY
        .iter()
        .any(|t| t.eq_ignore_ascii_case(word))
}

/// Fold an accepted type keyword onto its canonical name.
///
/// Returns the canonical uppercase type and whether the keyword implies an
/// auto-increment column (the serial pseudo-types).
pub fn canonical_type_name(word: &str) -> (String, bool) {
    let upper = word.to_ascii_uppercase();
    match upper.as_str() {
        "INTEGER" | "INT4" => ("INT".to_string(), false),
        "INT2" => ("SMALLINT".to_string(), false),
        "INT8" => ("BIGINT".to_string(), false),
        "BOOL" => ("BOOLEAN".to_string(), false),
        "VARCHAR2" => ("VARCHAR".to_string(), false),
        "CHARACTER" => ("CHAR".to_string(), false),
        "SERIAL" | "SERIAL4" => ("INT".to_string(), true),
        "SMALLSERIAL" => ("SMALLINT".to_string(), true),
        "SERIAL8" | "BIGSERIAL" => ("BIGINT".to_string(), true),
        _ => (upper, false),
    }
}

/// Fold a model type name onto the canonical single-token spelling.
///
/// Parsed columns are already canonical; hand-built and JSON models may
/// carry `character varying`, `double precision` or a time zone clause.
/// Serial pseudo-types are left alone since folding them would lose the
/// auto-increment flag.
pub fn fold_type_name(data_type: &str) -> String {
    let words: Vec<String> = data_type
        .split_whitespace()
        .map(|w| w.to_ascii_uppercase())
        .collect();
    let words: Vec<&str> = words.iter().map(String::as_str).collect();
    match words.as_slice() {
        ["CHARACTER" | "CHAR", "VARYING"] => "VARCHAR".to_string(),
        ["NATIONAL", "CHARACTER" | "CHAR", "VARYING"] => "NVARCHAR".to_string(),
        ["NATIONAL", "CHARACTER" | "CHAR"] => "NCHAR".to_string(),
        ["DOUBLE", "PRECISION"] => "DOUBLE".to_string(),
        ["TIMESTAMP", "WITH", "TIME", "ZONE"] => "TIMESTAMPTZ".to_string(),
        ["TIMESTAMP", "WITHOUT", "TIME", "ZONE"] => "TIMESTAMP".to_string(),
        ["TIME", "WITH" | "WITHOUT", "TIME", "ZONE"] => "TIME".to_string(),
        [single] => match canonical_type_name(single) {
            (canonical, false) => canonical,
            (_, true) => single.to_string(),
        },
        _ => words.join(" "),
    }
}

pub fn is_value_set_type(data_type: &str) -> bool {
    VALUE_SET_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(data_type))
}

// ============================================================================
// Type families
// ============================================================================

pub fn is_integer_type(data_type: &str) -> bool {
    matches!(
        fold_type_name(data_type).as_str(),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT"
    )
}

pub fn is_float_type(data_type: &str) -> bool {
    matches!(
        fold_type_name(data_type).as_str(),
        "REAL" | "FLOAT" | "DOUBLE" | "DECIMAL" | "NUMERIC" | "MONEY"
    )
}

/// BOOLEAN, or the `TINYINT(1)` / `BIT` spellings engines use for it.
pub fn is_boolean_type(data_type: &str, length: Option<u32>) -> bool {
    match fold_type_name(data_type).as_str() {
        "BOOLEAN" => true,
        "TINYINT" => length == Some(1),
        "BIT" => length.is_none() || length == Some(1),
        _ => false,
    }
}

/// Character data. Values of these types are never read as a textual `null`.
pub fn is_text_type(data_type: &str) -> bool {
    matches!(
        fold_type_name(data_type).as_str(),
        "CHAR"
            | "NCHAR"
            | "VARCHAR"
            | "NVARCHAR"
            | "TEXT"
            | "TINYTEXT"
            | "MEDIUMTEXT"
            | "LONGTEXT"
            | "NTEXT"
            | "CLOB"
            | "ENUM"
            | "SET"
    )
}

// ============================================================================
// Per-dialect catalogs
// ============================================================================

/// Immutable mapping rules for one target dialect.
#[derive(Debug)]
pub struct TypeCatalog {
    /// `(lower-case prefix, target type)`, longest prefix first.
    pub mappings: &'static [(&'static str, &'static str)],
    /// Target types rendered with a `(n)` suffix.
    pub length_types: &'static [&'static str],
    /// Target types rendered with a `(p, s)` suffix.
    pub range_types: &'static [&'static str],
    /// Length used when a length type arrives without one.
    pub default_lengths: &'static [(&'static str, &'static str)],
    /// Variable-length text type used for value sets outside MySQL.
    pub varchar: &'static str,
    /// Generic text type for unmatched input types.
    pub fallback: &'static str,
}

impl TypeCatalog {
    pub fn for_dialect(dialect: Dialect) -> &'static TypeCatalog {
        match dialect {
            Dialect::Sqlite => &SQLITE,
            Dialect::Mysql | Dialect::Mariadb => &MYSQL,
            Dialect::Postgresql => &POSTGRESQL,
            Dialect::Sqlserver => &SQLSERVER,
        }
    }

    /// Map a type onto this dialect by ordered prefix match.
    ///
    /// The type is folded first, so `character varying` never reaches the
    /// shorter `char` prefix.
    pub fn lookup(&self, data_type: &str) -> Option<&'static str> {
        let lower = fold_type_name(data_type).to_ascii_lowercase();
        self.mappings
            .iter()
            .find(|(prefix, _)| lower.starts_with(prefix))
            .map(|(_, target)| *target)
    }

    pub fn is_length_type(&self, target: &str) -> bool {
        self.length_types.contains(&target)
    }

    pub fn is_range_type(&self, target: &str) -> bool {
        self.range_types.contains(&target)
    }

    pub fn default_length(&self, target: &str) -> Option<&'static str> {
        self.default_lengths
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, len)| *len)
    }
}

static SQLITE: TypeCatalog = TypeCatalog {
    mappings: &[
        ("uniqueidentifier", "TEXT"),
        ("timestamptz", "TEXT"),
        ("mediumtext", "TEXT"),
        ("varbinary", "BLOB"),
        ("datetime2", "DATETIME"),
        ("mediumint", "INTEGER"),
        ("timestamp", "DATETIME"),
        ("longtext", "TEXT"),
        ("nvarchar", "NVARCHAR"),
        ("longblob", "BLOB"),
        ("smallint", "INTEGER"),
        ("datetime", "DATETIME"),
        ("tinytext", "TEXT"),
        ("varchar", "NVARCHAR"),
        ("decimal", "REAL"),
        ("numeric", "REAL"),
        ("boolean", "BOOLEAN"),
        ("tinyint", "INTEGER"),
        ("bigint", "INTEGER"),
        ("double", "REAL"),
        ("binary", "BLOB"),
        ("bytea", "BLOB"),
        ("float", "REAL"),
        ("money", "REAL"),
        ("nchar", "TEXT"),
        ("ntext", "TEXT"),
        ("jsonb", "TEXT"),
        ("text", "TEXT"),
        ("char", "TEXT"),
        ("real", "REAL"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("uuid", "TEXT"),
        ("blob", "BLOB"),
        ("json", "TEXT"),
        ("year", "INTEGER"),
        ("clob", "TEXT"),
        ("bit", "BOOLEAN"),
        ("int", "INTEGER"),
        ("xml", "TEXT"),
    ],
    length_types: &["NVARCHAR"],
    range_types: &[],
    default_lengths: &[],
    varchar: "NVARCHAR",
    fallback: "TEXT",
};

static MYSQL: TypeCatalog = TypeCatalog {
    mappings: &[
        ("uniqueidentifier", "CHAR(36)"),
        ("timestamptz", "TIMESTAMP"),
        ("mediumtext", "MEDIUMTEXT"),
        ("varbinary", "VARBINARY"),
        ("datetime2", "DATETIME"),
        ("mediumint", "MEDIUMINT"),
        ("timestamp", "TIMESTAMP"),
        ("longtext", "LONGTEXT"),
        ("nvarchar", "VARCHAR"),
        ("longblob", "LONGBLOB"),
        ("smallint", "SMALLINT"),
        ("datetime", "DATETIME"),
        ("tinytext", "TINYTEXT"),
        ("varchar", "VARCHAR"),
        ("decimal", "DECIMAL"),
        ("numeric", "DECIMAL"),
        ("boolean", "BOOLEAN"),
        ("tinyint", "TINYINT"),
        ("bigint", "BIGINT"),
        ("double", "DOUBLE"),
        ("binary", "BINARY"),
        ("bytea", "BLOB"),
        ("float", "FLOAT"),
        ("money", "DECIMAL"),
        ("nchar", "CHAR"),
        ("ntext", "LONGTEXT"),
        ("jsonb", "JSON"),
        ("text", "TEXT"),
        ("char", "CHAR"),
        ("real", "FLOAT"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("uuid", "CHAR(36)"),
        ("blob", "BLOB"),
        ("json", "JSON"),
        ("year", "YEAR"),
        ("clob", "LONGTEXT"),
        ("bit", "BOOLEAN"),
        ("int", "INT"),
        ("xml", "LONGTEXT"),
    ],
    length_types: &[
        "VARCHAR",
        "CHAR",
        "BINARY",
        "VARBINARY",
        "TINYINT",
        "SMALLINT",
        "MEDIUMINT",
        "INT",
        "BIGINT",
    ],
    range_types: &["DECIMAL"],
    default_lengths: &[("VARCHAR", "255"), ("VARBINARY", "255")],
    varchar: "VARCHAR",
    fallback: "TEXT",
};

static POSTGRESQL: TypeCatalog = TypeCatalog {
    mappings: &[
        ("uniqueidentifier", "UUID"),
        ("timestamptz", "TIMESTAMP WITH TIME ZONE"),
        ("mediumtext", "TEXT"),
        ("varbinary", "BYTEA"),
        ("datetime2", "TIMESTAMP WITHOUT TIME ZONE"),
        ("mediumint", "INTEGER"),
        ("timestamp", "TIMESTAMP WITHOUT TIME ZONE"),
        ("longtext", "TEXT"),
        ("nvarchar", "CHARACTER VARYING"),
        ("longblob", "BYTEA"),
        ("smallint", "SMALLINT"),
        ("datetime", "TIMESTAMP WITHOUT TIME ZONE"),
        ("tinytext", "TEXT"),
        ("varchar", "CHARACTER VARYING"),
        ("decimal", "NUMERIC"),
        ("numeric", "NUMERIC"),
        ("boolean", "BOOLEAN"),
        ("tinyint", "SMALLINT"),
        ("bigint", "BIGINT"),
        ("double", "DOUBLE PRECISION"),
        ("binary", "BYTEA"),
        ("bytea", "BYTEA"),
        ("float", "REAL"),
        ("money", "MONEY"),
        ("nchar", "CHAR"),
        ("ntext", "TEXT"),
        ("jsonb", "JSONB"),
        ("text", "TEXT"),
        ("char", "CHAR"),
        ("real", "REAL"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("uuid", "UUID"),
        ("blob", "BYTEA"),
        ("json", "JSONB"),
        ("year", "SMALLINT"),
        ("clob", "TEXT"),
        ("bit", "BOOLEAN"),
        ("int", "INTEGER"),
        ("xml", "XML"),
    ],
    length_types: &["CHARACTER VARYING", "CHAR"],
    range_types: &["NUMERIC"],
    default_lengths: &[],
    varchar: "CHARACTER VARYING",
    fallback: "TEXT",
};

static SQLSERVER: TypeCatalog = TypeCatalog {
    mappings: &[
        ("uniqueidentifier", "UNIQUEIDENTIFIER"),
        ("timestamptz", "DATETIMEOFFSET"),
        ("mediumtext", "NVARCHAR(MAX)"),
        ("varbinary", "VARBINARY"),
        ("datetime2", "DATETIME2"),
        ("mediumint", "INT"),
        ("timestamp", "DATETIME2"),
        ("longtext", "NVARCHAR(MAX)"),
        ("nvarchar", "NVARCHAR"),
        ("longblob", "VARBINARY(MAX)"),
        ("smallint", "SMALLINT"),
        ("datetime", "DATETIME2"),
        ("tinytext", "NVARCHAR(255)"),
        ("varchar", "NVARCHAR"),
        ("decimal", "DECIMAL"),
        ("numeric", "DECIMAL"),
        ("boolean", "BIT"),
        ("tinyint", "TINYINT"),
        ("bigint", "BIGINT"),
        ("double", "FLOAT"),
        ("binary", "BINARY"),
        ("bytea", "VARBINARY(MAX)"),
        ("float", "FLOAT"),
        ("money", "MONEY"),
        ("nchar", "NCHAR"),
        ("ntext", "NVARCHAR(MAX)"),
        ("jsonb", "NVARCHAR(MAX)"),
        ("text", "NVARCHAR(MAX)"),
        ("char", "NCHAR"),
        ("real", "REAL"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("uuid", "UNIQUEIDENTIFIER"),
        ("blob", "VARBINARY(MAX)"),
        ("json", "NVARCHAR(MAX)"),
        ("year", "SMALLINT"),
        ("clob", "NVARCHAR(MAX)"),
        ("bit", "BIT"),
        ("int", "INT"),
        ("xml", "XML"),
    ],
    length_types: &["NVARCHAR", "NCHAR", "BINARY", "VARBINARY"],
    range_types: &["DECIMAL"],
    default_lengths: &[("NVARCHAR", "MAX"), ("VARBINARY", "MAX")],
    varchar: "NVARCHAR",
    fallback: "NVARCHAR(MAX)",
};
