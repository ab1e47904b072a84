//! Target SQL dialects and their per-engine rendering rules.
//!
//! Everything that differs between engines but does not concern column
//! types lives here: identifier quoting, boolean and string literals, the
//! auto-increment keyword and which index syntax the engine accepts. Type
//! mapping lives in [`crate::catalog`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DdlError, Warning};

/// A target SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Sqlite,
    Mysql,
    Mariadb,
    Postgresql,
    Sqlserver,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Sqlite,
        Dialect::Mysql,
        Dialect::Mariadb,
        Dialect::Postgresql,
        Dialect::Sqlserver,
    ];

    /// Resolve a dialect name, falling back to MySQL rules for unknown names.
    pub fn resolve(name: &str) -> (Dialect, Option<Warning>) {
        match name.parse() {
            Ok(dialect) => (dialect, None),
            Err(_) => (
                Dialect::Mysql,
                Some(
                    Warning::UnknownDialect {
                        name: name.to_string(),
                    }
                    .emit(),
                ),
            ),
        }
    }

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Mariadb => "mariadb",
            Dialect::Postgresql => "postgresql",
            Dialect::Sqlserver => "sqlserver",
        }
    }

    /// MySQL and MariaDB share every rendering rule.
    #[inline]
    pub fn is_mysql_family(self) -> bool {
        matches!(self, Dialect::Mysql | Dialect::Mariadb)
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Quote a table name.
    pub fn quote_table(self, name: &str) -> String {
        match self {
            Dialect::Mysql | Dialect::Mariadb => format!("`{}`", name.replace('`', "``")),
            Dialect::Postgresql => format!("\"{}\"", name.replace('"', "\"\"")),
            Dialect::Sqlite | Dialect::Sqlserver => name.to_string(),
        }
    }

    /// Quote a column or index name. Only the MySQL family quotes these.
    pub fn quote_column(self, name: &str) -> String {
        if self.is_mysql_family() {
            format!("`{}`", name.replace('`', "``"))
        } else {
            name.to_string()
        }
    }

    /// Quote and join a column list with `", "`.
    pub fn quote_columns(self, names: &[String]) -> String {
        names
            .iter()
            .map(|n| self.quote_column(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ========================================================================
    // Literals
    // ========================================================================

    pub fn boolean_literal(self, value: bool) -> &'static str {
        match (self, value) {
            (Dialect::Postgresql, true) => "TRUE",
            (Dialect::Postgresql, false) => "FALSE",
            (_, true) => "1",
            (_, false) => "0",
        }
    }

    /// Render a text value as a string literal.
    ///
    /// Single quotes are always doubled. MySQL and PostgreSQL treat backslash
    /// as an escape character, so it is doubled there and PostgreSQL gets the
    /// `E'...'` prefix to make that explicit.
    pub fn string_literal(self, value: &str) -> String {
        let mut escaped = value.replace('\'', "''");
        match self {
            Dialect::Mysql | Dialect::Mariadb => {
                escaped = escaped.replace('\\', "\\\\");
                format!("'{}'", escaped)
            }
            Dialect::Postgresql => {
                escaped = escaped.replace('\\', "\\\\");
                format!("E'{}'", escaped)
            }
            Dialect::Sqlite | Dialect::Sqlserver => format!("'{}'", escaped),
        }
    }

    // ========================================================================
    // Capabilities
    // ========================================================================

    /// Keyword appended to an auto-increment integer column, if any.
    pub fn auto_increment_keyword(self) -> Option<&'static str> {
        match self {
            Dialect::Mysql | Dialect::Mariadb => Some("AUTO_INCREMENT"),
            Dialect::Postgresql => Some("GENERATED BY DEFAULT AS IDENTITY"),
            Dialect::Sqlserver => Some("IDENTITY(1,1)"),
            // INTEGER PRIMARY KEY already aliases the rowid
            Dialect::Sqlite => None,
        }
    }

    /// Whether indexes are declared inside the CREATE TABLE body.
    #[inline]
    pub fn inline_indexes(self) -> bool {
        self.is_mysql_family()
    }

    /// Whether `CREATE INDEX IF NOT EXISTS` is accepted.
    #[inline]
    pub fn supports_index_if_not_exists(self) -> bool {
        matches!(self, Dialect::Postgresql | Dialect::Sqlite)
    }

    /// Whether `DEFERRABLE INITIALLY DEFERRED` may follow a foreign key.
    #[inline]
    pub fn supports_deferrable(self) -> bool {
        matches!(self, Dialect::Postgresql)
    }
}

impl FromStr for Dialect {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::Mysql),
            "mariadb" => Ok(Dialect::Mariadb),
            "postgresql" | "pgsql" | "postgres" => Ok(Dialect::Postgresql),
            "sqlserver" | "mssql" => Ok(Dialect::Sqlserver),
            _ => Err(DdlError::UnknownDialect {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
