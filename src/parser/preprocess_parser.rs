//! Script preprocessing
//!
//! Normalizes an input script before it is split into statements:
//!
//! 1. Strips a UTF-8 byte order mark and converts CRLF line endings.
//! 2. Removes PostgreSQL `COLLATE pg_catalog."default"` decorations that
//!    dump tools attach to text columns.
//! 3. Turns SQL Server `GO` batch separator lines into statement
//!    terminators, so scripts without semicolons still split per batch.
//! 4. Drops MySQL `#` comment lines, which the tokenizer would read as
//!    identifiers.

use once_cell::sync::Lazy;
use regex::Regex;

static PG_DEFAULT_COLLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)[ \t]+COLLATE[ \t]+pg_catalog\."default""#).expect("valid collate regex")
});

static GO_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*GO[ \t]*;?[ \t]*$").expect("valid GO regex"));

static HASH_COMMENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*#[^\n]*$").expect("valid comment regex"));

/// Normalize a script for statement splitting.
pub fn preprocess_script(sql: &str) -> String {
    let sql = sql.strip_prefix('\u{feff}').unwrap_or(sql);
    let sql = sql.replace("\r\n", "\n");
    let sql = PG_DEFAULT_COLLATE.replace_all(&sql, "");
    let sql = GO_LINE.replace_all(&sql, ";");
    HASH_COMMENT_LINE.replace_all(&sql, "").into_owned()
}
