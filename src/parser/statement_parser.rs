//! Statement splitting and classification
//!
//! Scripts are split at the active delimiter (`;` unless a MySQL
//! `DELIMITER` directive changes it), ignoring delimiters inside quotes and
//! comments. Each statement is then classified with a short token scan:
//!
//! ```sql
//! [IF OBJECT_ID(N'name', N'U') IS NULL] CREATE [TEMPORARY] TABLE [IF NOT EXISTS] name ( ... )
//! CREATE [UNIQUE] INDEX [IF NOT EXISTS] name ON table [USING method] (col, ...)
//! COMMENT ON COLUMN table.column IS 'text'
//! DROP TABLE IF EXISTS name [, name ...]
//! ```
//!
//! Index and comment statements are attached to the tables of the same
//! script. Anything else is ignored by the translator.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::identifier_utils::unqualified_name;
use super::token_parser_base::TokenParser;
use crate::util::starts_with_ci;

/// One statement cut out of a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement {
    /// Statement text without its delimiter
    pub text: String,
    /// 1-based line the statement starts on
    pub start_line: usize,
}

/// Statement kinds the translator cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable,
    /// Standalone `CREATE INDEX`
    CreateIndex {
        table: String,
        name: String,
        columns: Vec<String>,
        unique: bool,
    },
    /// `COMMENT ON COLUMN`
    ColumnComment {
        table: String,
        column: String,
        text: String,
    },
    /// `DROP TABLE IF EXISTS` with the unqualified table names
    DropTable(Vec<String>),
    Other,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    SingleQuote,
    DoubleQuote,
    Backtick,
    LineComment,
    BlockComment,
}

/// Split a script into statements.
///
/// Empty statements (and statements consisting only of comments) are kept
/// out of the result.
pub fn split_statements(sql: &str) -> Vec<RawStatement> {
    let mut statements = Vec::new();
    let mut delimiter = ";".to_string();
    let mut state = ScanState::Normal;
    let mut current = String::new();
    let mut current_line = 1;
    let mut start_line = 1;
    let mut at_line_start = true;

    let mut push = |text: &str, line: usize| {
        if has_content(text) {
            statements.push(RawStatement {
                text: text.trim().to_string(),
                start_line: line,
            });
        }
    };

    let mut i = 0;
    while i < sql.len() {
        let rest = &sql[i..];

        // DELIMITER directives are client commands that occupy a whole line
        if state == ScanState::Normal && at_line_start {
            let trimmed = rest.trim_start_matches([' ', '\t']);
            let is_directive =
                starts_with_ci(trimmed, "DELIMITER ") || starts_with_ci(trimmed, "DELIMITER\t");
            if is_directive && !has_content(&current) {
                let line_end = rest.find('\n').unwrap_or(rest.len());
                let directive = &rest[..line_end];
                if let Some(new_delim) = directive.split_whitespace().nth(1) {
                    push(&current, start_line);
                    current.clear();
                    delimiter = new_delim.to_string();
                }
                i += line_end;
                continue;
            }
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        let len = c.len_utf8();

        if current.trim().is_empty() && !c.is_whitespace() && state == ScanState::Normal {
            start_line = current_line;
        }

        match state {
            ScanState::Normal => {
                if rest.starts_with(delimiter.as_str()) {
                    push(&current, start_line);
                    current.clear();
                    i += delimiter.len();
                    at_line_start = false;
                    continue;
                }
                if rest.starts_with("--") {
                    state = ScanState::LineComment;
                } else if rest.starts_with("/*") {
                    state = ScanState::BlockComment;
                    current.push_str("/*");
                    i += 2;
                    at_line_start = false;
                    continue;
                } else if c == '\'' {
                    state = ScanState::SingleQuote;
                } else if c == '"' {
                    state = ScanState::DoubleQuote;
                } else if c == '`' {
                    state = ScanState::Backtick;
                }
            }
            ScanState::SingleQuote => {
                // a doubled '' closes and reopens, which leaves the state unchanged
                if c == '\'' {
                    state = ScanState::Normal;
                }
            }
            ScanState::DoubleQuote => {
                if c == '"' {
                    state = ScanState::Normal;
                }
            }
            ScanState::Backtick => {
                if c == '`' {
                    state = ScanState::Normal;
                }
            }
            ScanState::LineComment => {
                if c == '\n' {
                    state = ScanState::Normal;
                }
            }
            ScanState::BlockComment => {
                if rest.starts_with("*/") {
                    state = ScanState::Normal;
                    current.push_str("*/");
                    i += 2;
                    continue;
                }
            }
        }

        current.push(c);
        if c == '\n' {
            current_line += 1;
            at_line_start = true;
        } else if !c.is_whitespace() {
            at_line_start = false;
        }
        i += len;
    }

    push(&current, start_line);
    statements
}

/// Whether a fragment holds anything besides whitespace and comments.
fn has_content(text: &str) -> bool {
    let Some(mut parser) = TokenParser::new(text) else {
        // untokenizable text is still a statement; the table parser reports it
        return !text.trim().is_empty();
    };
    parser.skip_whitespace();
    !parser.is_at_end()
}

/// Classify a statement by its leading keywords.
pub fn classify_statement(sql: &str) -> StatementKind {
    let Some(mut parser) = TokenParser::new(sql) else {
        return if looks_like_create_table(sql) {
            StatementKind::CreateTable
        } else {
            StatementKind::Other
        };
    };
    parser.skip_whitespace();
    skip_existence_guard(&mut parser);

    if parser.expect_keyword(Keyword::CREATE).is_some() {
        if parser.check_keyword(Keyword::TEMPORARY) || parser.check_word_ci("TEMP") {
            parser.advance();
            parser.skip_whitespace();
        }
        if parser.check_keyword(Keyword::TABLE) {
            return StatementKind::CreateTable;
        }
        return parse_create_index(&mut parser).unwrap_or(StatementKind::Other);
    }

    if parser.expect_keyword(Keyword::COMMENT).is_some() {
        return parse_column_comment(&mut parser).unwrap_or(StatementKind::Other);
    }

    if parser.expect_keyword(Keyword::DROP).is_some() {
        if let Some(names) = parse_drop_table_names(&mut parser) {
            return StatementKind::DropTable(names);
        }
    }

    StatementKind::Other
}

/// Skip a SQL Server `IF OBJECT_ID(...) IS NULL` guard in front of a
/// CREATE TABLE. Anything else leaves the position unchanged.
pub(super) fn skip_existence_guard(parser: &mut TokenParser) {
    if !parser.check_keyword(Keyword::IF) {
        return;
    }
    let save = parser.pos();
    parser.advance();
    parser.skip_whitespace();
    let guarded = parser.expect_word_ci("OBJECT_ID").is_some()
        && parser.check_token(&Token::LParen)
        && {
            parser.skip_parenthesized();
            parser.skip_whitespace();
            parser.expect_keyword(Keyword::IS).is_some()
                && parser.expect_keyword(Keyword::NULL).is_some()
        };
    if !guarded {
        parser.set_pos(save);
    }
}

/// Text-level fallback for statements the tokenizer rejects, so they can
/// still be reported as malformed tables rather than silently ignored.
fn looks_like_create_table(sql: &str) -> bool {
    let mut words = sql.split_whitespace();
    matches!(words.next(), Some(w) if w.eq_ignore_ascii_case("CREATE"))
        && words.take(2).any(|w| w.eq_ignore_ascii_case("TABLE"))
}

/// Parse `[UNIQUE] INDEX [IF NOT EXISTS] name ON table (cols)` after CREATE.
fn parse_create_index(parser: &mut TokenParser) -> Option<StatementKind> {
    let unique = parser.expect_keyword(Keyword::UNIQUE).is_some();
    if parser.check_word_ci("CLUSTERED") || parser.check_word_ci("NONCLUSTERED") {
        parser.advance();
        parser.skip_whitespace();
    }
    parser.expect_keyword(Keyword::INDEX)?;
    if parser.check_keyword(Keyword::IF) {
        parser.advance();
        parser.skip_whitespace();
        parser.expect_keyword(Keyword::NOT)?;
        parser.expect_keyword(Keyword::EXISTS)?;
    }
    let name = parser.parse_qualified_name()?;
    parser.skip_whitespace();
    parser.expect_keyword(Keyword::ON)?;
    let table = parser.parse_qualified_name()?;
    parser.skip_whitespace();
    if parser.expect_word_ci("USING").is_some() {
        parser.advance();
        parser.skip_whitespace();
    }
    let columns = parser.parse_identifier_list()?;
    Some(StatementKind::CreateIndex {
        table,
        name,
        columns,
        unique,
    })
}

/// Parse `ON COLUMN [schema.]table.column IS 'text'` after COMMENT.
fn parse_column_comment(parser: &mut TokenParser) -> Option<StatementKind> {
    parser.expect_keyword(Keyword::ON)?;
    parser.expect_keyword(Keyword::COLUMN)?;

    let mut parts = vec![parser.parse_identifier()?];
    while parser.check_token(&Token::Period) {
        parser.advance();
        parts.push(parser.parse_identifier()?);
    }
    parser.skip_whitespace();
    parser.expect_keyword(Keyword::IS)?;
    // E'...' arrives as a separate prefix word when the tokenizer does not fold it
    if parser.check_word_ci("E") {
        parser.advance();
    }
    let text = parser.parse_string_literal()?;

    let column = parts.pop()?;
    let table = parts.pop()?;
    Some(StatementKind::ColumnComment {
        table,
        column,
        text,
    })
}

/// Parse `TABLE IF EXISTS a [, b ...]` after the DROP keyword.
fn parse_drop_table_names(parser: &mut TokenParser) -> Option<Vec<String>> {
    parser.expect_keyword(Keyword::TABLE)?;
    parser.expect_keyword(Keyword::IF)?;
    parser.expect_keyword(Keyword::EXISTS)?;

    let mut names = Vec::new();
    loop {
        let name = parser.parse_qualified_name()?;
        names.push(unqualified_name(&name));
        parser.skip_whitespace();
        if parser.check_token(&Token::Comma) {
            parser.advance();
            parser.skip_whitespace();
        } else {
            break;
        }
    }
    Some(names)
}
