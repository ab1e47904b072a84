//! Token-based column definition parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! name TYPE[(n) | (p, s) | ('a', 'b', ...)]
//!     [NOT NULL | NULL] [PRIMARY KEY] [UNIQUE [KEY]]
//!     [DEFAULT value] [COMMENT 'text']
//!     [AUTO_INCREMENT | AUTOINCREMENT | IDENTITY[(s, i)]
//!      | GENERATED {ALWAYS | BY DEFAULT} AS IDENTITY]
//!     [[CONSTRAINT name] REFERENCES table [(col)] [ON DELETE a] [ON UPDATE a]]
//! ```
//!
//! Modifiers may appear in any order. `CHECK`, `COLLATE`, `CHARACTER SET`,
//! `UNSIGNED`, `ZEROFILL` and `ON UPDATE CURRENT_TIMESTAMP` are consumed and
//! dropped. Multi-word types are folded onto one canonical keyword
//! (`CHARACTER VARYING` is `VARCHAR`, `DOUBLE PRECISION` is `DOUBLE`).

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::constraint_parser::{parse_reference_target, TokenParsedReference};
use super::token_parser_base::TokenParser;
use crate::catalog::{canonical_type_name, is_type_keyword, is_value_set_type};
use crate::model::DefaultValue;

/// Result of parsing a column definition using tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParsedColumn {
    pub name: String,
    /// Canonical upper-case type, e.g. `VARCHAR`
    pub data_type: String,
    pub length: Option<u32>,
    pub scale: Option<u32>,
    /// ENUM/SET literals
    pub values: Vec<String>,
    pub nullable: bool,
    pub default: Option<DefaultValue>,
    pub primary_key: bool,
    pub unique: bool,
    /// Name given by `CONSTRAINT name UNIQUE`
    pub unique_name: Option<String>,
    pub auto_increment: bool,
    pub comment: Option<String>,
    pub references: Option<TokenParsedReference>,
    /// Name given by `CONSTRAINT name REFERENCES ...`
    pub references_name: Option<String>,
}

impl TokenParsedColumn {
    fn new(name: String, data_type: String) -> Self {
        Self {
            name,
            data_type,
            length: None,
            scale: None,
            values: Vec::new(),
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
            unique_name: None,
            auto_increment: false,
            comment: None,
            references: None,
            references_name: None,
        }
    }
}

/// Token-based column definition parser
pub struct ColumnTokenParser {
    base: TokenParser,
}

impl ColumnTokenParser {
    /// Create a new parser for a column definition string
    pub fn new(col_def: &str) -> Option<Self> {
        Some(Self {
            base: TokenParser::new(col_def)?,
        })
    }

    /// Parse the column definition.
    ///
    /// Returns `None` when the item does not start with a name followed by
    /// a known type keyword; such items are constraint clauses.
    pub fn parse(&mut self) -> Option<TokenParsedColumn> {
        self.base.skip_whitespace();
        let name = self.base.parse_identifier()?;
        self.base.skip_whitespace();

        let (data_type, serial) = self.parse_data_type()?;
        let mut result = TokenParsedColumn::new(name, data_type);
        result.auto_increment = serial;

        self.base.skip_whitespace();
        if self.base.check_token(&Token::LParen) {
            self.parse_type_arguments(&mut result)?;
        }

        self.parse_column_modifiers(&mut result);
        Some(result)
    }

    // ========================================================================
    // Data type
    // ========================================================================

    /// Read the type keyword, folding multi-word spellings.
    fn parse_data_type(&mut self) -> Option<(String, bool)> {
        let word = match &self.base.current_token()?.token {
            Token::Word(w) if w.quote_style.is_none() && is_type_keyword(&w.value) => {
                w.value.to_ascii_uppercase()
            }
            _ => return None,
        };
        self.base.advance();

        let save = self.base.pos();
        self.base.skip_whitespace();
        match word.as_str() {
            "CHARACTER" | "CHAR" if self.base.check_word_ci("VARYING") => {
                self.base.advance();
                return Some(("VARCHAR".to_string(), false));
            }
            "DOUBLE" if self.base.check_word_ci("PRECISION") => {
                self.base.advance();
                return Some(("DOUBLE".to_string(), false));
            }
            "TIMESTAMP" | "TIME" => {
                // precision may sit between the keyword and the zone clause
                if self.base.check_token(&Token::LParen) {
                    self.base.skip_parenthesized();
                    self.base.skip_whitespace();
                }
                if let Some(with_zone) = self.parse_time_zone_suffix() {
                    let folded = match (word.as_str(), with_zone) {
                        ("TIMESTAMP", true) => "TIMESTAMPTZ",
                        ("TIMESTAMP", false) => "TIMESTAMP",
                        _ => "TIME",
                    };
                    return Some((folded.to_string(), false));
                }
            }
            _ => {}
        }
        self.base.set_pos(save);

        Some(canonical_type_name(&word))
    }

    /// `WITH TIME ZONE` yields `Some(true)`, `WITHOUT TIME ZONE` `Some(false)`.
    fn parse_time_zone_suffix(&mut self) -> Option<bool> {
        let with_zone = if self.base.check_keyword(Keyword::WITH) {
            true
        } else if self.base.check_word_ci("WITHOUT") {
            false
        } else {
            return None;
        };
        self.base.advance();
        self.base.skip_whitespace();
        self.base.expect_word_ci("TIME")?;
        self.base.expect_word_ci("ZONE")?;
        Some(with_zone)
    }

    /// Read `(n)`, `(p, s)`, `(MAX)` or an ENUM/SET literal list.
    fn parse_type_arguments(&mut self, result: &mut TokenParsedColumn) -> Option<()> {
        self.base.expect_token(&Token::LParen)?;

        if is_value_set_type(&result.data_type) {
            loop {
                self.base.skip_whitespace();
                if let Some(value) = self.base.parse_string_literal() {
                    result.values.push(value);
                    continue;
                }
                if self.base.expect_token(&Token::RParen).is_some() {
                    return Some(());
                }
                if self.base.is_at_end() {
                    return None;
                }
                // separators
                self.base.advance();
            }
        }

        if self.base.check_word_ci("MAX") {
            self.base.advance();
            self.base.skip_whitespace();
        } else {
            result.length = self.base.parse_positive_integer();
            self.base.skip_whitespace();
            if self.base.expect_token(&Token::Comma).is_some() {
                result.scale = self.base.parse_positive_integer();
                self.base.skip_whitespace();
            }
        }

        // tolerate unexpected content such as `VARCHAR(10 CHAR)`
        while !self.base.is_at_end() && !self.base.check_token(&Token::RParen) {
            self.base.advance();
        }
        self.base.expect_token(&Token::RParen)
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Parse column modifiers in any order until the item ends.
    fn parse_column_modifiers(&mut self, result: &mut TokenParsedColumn) {
        let mut pending_constraint_name: Option<String> = None;

        loop {
            self.base.skip_whitespace();
            if self.base.is_at_end() {
                break;
            }

            if self.base.check_keyword(Keyword::NOT) {
                self.base.advance();
                self.base.skip_whitespace();
                if self.base.check_keyword(Keyword::NULL) {
                    self.base.advance();
                    result.nullable = false;
                }
                continue;
            }

            if self.base.check_keyword(Keyword::NULL) {
                self.base.advance();
                result.nullable = true;
                continue;
            }

            if self.base.check_keyword(Keyword::CONSTRAINT) {
                self.base.advance();
                self.base.skip_whitespace();
                pending_constraint_name = self.base.parse_identifier();
                continue;
            }

            if self.base.check_keyword(Keyword::PRIMARY) {
                self.base.advance();
                self.base.skip_whitespace();
                if self.base.check_keyword(Keyword::KEY) {
                    self.base.advance();
                    result.primary_key = true;
                    self.skip_sort_order();
                }
                pending_constraint_name = None;
                continue;
            }

            if self.base.check_keyword(Keyword::UNIQUE) {
                self.base.advance();
                self.base.skip_whitespace();
                if self.base.check_keyword(Keyword::KEY) {
                    self.base.advance();
                }
                result.unique = true;
                result.unique_name = pending_constraint_name.take();
                continue;
            }

            if self.base.check_keyword(Keyword::DEFAULT) {
                self.base.advance();
                self.base.skip_whitespace();
                self.parse_default_value(result);
                pending_constraint_name = None;
                continue;
            }

            if self.base.check_keyword(Keyword::COMMENT) {
                self.base.advance();
                self.base.skip_whitespace();
                result.comment = self.base.parse_string_literal();
                continue;
            }

            if self.base.check_word_ci("AUTO_INCREMENT") || self.base.check_word_ci("AUTOINCREMENT")
            {
                self.base.advance();
                result.auto_increment = true;
                continue;
            }

            if self.base.check_word_ci("IDENTITY") {
                self.base.advance();
                self.base.skip_whitespace();
                if self.base.check_token(&Token::LParen) {
                    self.base.skip_parenthesized();
                }
                result.auto_increment = true;
                continue;
            }

            if self.base.check_word_ci("GENERATED") {
                self.parse_generated(result);
                continue;
            }

            if self.base.check_keyword(Keyword::REFERENCES) {
                self.base.advance();
                result.references = parse_reference_target(&mut self.base);
                result.references_name = pending_constraint_name.take();
                continue;
            }

            if self.base.check_keyword(Keyword::CHECK) {
                self.base.advance();
                self.base.skip_whitespace();
                self.base.skip_parenthesized();
                pending_constraint_name = None;
                continue;
            }

            if self.base.check_word_ci("COLLATE") {
                self.base.advance();
                self.base.skip_whitespace();
                self.skip_name_or_string();
                continue;
            }

            if self.base.check_word_ci("CHARSET") {
                self.base.advance();
                self.base.skip_whitespace();
                self.skip_name_or_string();
                continue;
            }

            if self.base.check_word_ci("CHARACTER") {
                self.base.advance();
                self.base.skip_whitespace();
                if self.base.expect_word_ci("SET").is_some() {
                    self.skip_name_or_string();
                }
                continue;
            }

            if self.base.check_keyword(Keyword::ON) {
                // ON UPDATE CURRENT_TIMESTAMP[(n)]
                self.base.advance();
                self.base.skip_whitespace();
                if self.base.expect_keyword(Keyword::UPDATE).is_some() {
                    self.base.advance();
                    self.base.skip_whitespace();
                    if self.base.check_token(&Token::LParen) {
                        self.base.skip_parenthesized();
                    }
                }
                continue;
            }

            // UNSIGNED, ZEROFILL, SIGNED and anything unknown
            if self.base.check_token(&Token::LParen) {
                self.base.skip_parenthesized();
            } else {
                self.base.advance();
            }
        }
    }

    /// `GENERATED {ALWAYS | BY DEFAULT} AS IDENTITY [(...)]` marks the column
    /// auto-increment; `GENERATED ALWAYS AS (expr)` computed columns are skipped.
    fn parse_generated(&mut self, result: &mut TokenParsedColumn) {
        self.base.advance();
        self.base.skip_whitespace();
        if self.base.expect_word_ci("ALWAYS").is_none()
            && self.base.expect_word_ci("BY").is_some()
        {
            self.base.expect_keyword(Keyword::DEFAULT);
        }
        if self.base.expect_keyword(Keyword::AS).is_none() {
            return;
        }
        if self.base.check_word_ci("IDENTITY") {
            self.base.advance();
            self.base.skip_whitespace();
            result.auto_increment = true;
        }
        if self.base.check_token(&Token::LParen) {
            self.base.skip_parenthesized();
        }
    }

    /// Parse the value after `DEFAULT`.
    ///
    /// The value is kept as SQL text: string literals keep their quotes,
    /// bare words and zero-argument functions are upper-cased, `::type`
    /// casts are kept. `DEFAULT NULL` becomes [`DefaultValue::Null`] and a
    /// `nextval(...)` sequence default marks the column auto-increment.
    fn parse_default_value(&mut self, result: &mut TokenParsedColumn) {
        let Some(token) = self.base.current_token() else {
            return;
        };

        let mut text = match &token.token {
            Token::LParen => {
                let start = self.base.pos();
                self.base.skip_parenthesized();
                let raw = self.base.tokens_to_string(start, self.base.pos());
                strip_outer_parens(&raw).to_string()
            }
            Token::Minus | Token::Plus => {
                let sign = if matches!(token.token, Token::Minus) { "-" } else { "" };
                self.base.advance();
                self.base.skip_whitespace();
                match self.base.current_token().map(|t| &t.token) {
                    Some(Token::Number(n, _)) => {
                        let value = format!("{}{}", sign, n);
                        self.base.advance();
                        value
                    }
                    _ => return,
                }
            }
            Token::Number(n, _) => {
                let value = n.clone();
                self.base.advance();
                value
            }
            Token::SingleQuotedString(s)
            | Token::NationalStringLiteral(s)
            | Token::EscapedStringLiteral(s) => {
                let value = format!("'{}'", s.replace('\'', "''"));
                self.base.advance();
                value
            }
            Token::Word(w) if w.quote_style.is_none() => {
                let word = w.value.clone();
                self.base.advance();
                self.parse_word_default(word)
            }
            _ => {
                self.base.advance();
                return;
            }
        };

        // ::type casts, e.g. 'x'::character varying
        loop {
            let save = self.base.pos();
            self.base.skip_whitespace();
            if self.base.expect_token(&Token::DoubleColon).is_none() {
                self.base.set_pos(save);
                break;
            }
            let Some(cast) = self.base.parse_identifier() else {
                break;
            };
            text.push_str("::");
            text.push_str(&cast);
            loop {
                let save = self.base.pos();
                self.base.skip_whitespace();
                let continues = ["VARYING", "PRECISION", "WITH", "WITHOUT", "TIME", "ZONE"]
                    .iter()
                    .any(|w| self.base.check_word_ci(w));
                if !continues {
                    self.base.set_pos(save);
                    break;
                }
                if let Some(part) = self.base.parse_identifier() {
                    text.push(' ');
                    text.push_str(&part);
                }
            }
        }

        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("NULL") || starts_with_null_cast(trimmed) {
            result.default = Some(DefaultValue::Null);
        } else if trimmed.to_ascii_lowercase().starts_with("nextval(") {
            result.auto_increment = true;
            result.default = None;
        } else if !trimmed.is_empty() {
            result.default = Some(DefaultValue::Literal(trimmed.to_string()));
        }
    }

    /// A bare word default: `NULL`, `TRUE`, `CURRENT_TIMESTAMP` or a
    /// function call such as `now()` or `nextval('seq'::regclass)`.
    fn parse_word_default(&mut self, word: String) -> String {
        let save = self.base.pos();
        self.base.skip_whitespace();
        if !self.base.check_token(&Token::LParen) {
            self.base.set_pos(save);
            return word.to_ascii_uppercase();
        }

        let start = self.base.pos();
        self.base.skip_parenthesized();
        let args = self.base.tokens_to_string(start, self.base.pos());
        if args.trim_start_matches('(').trim_end_matches(')').trim().is_empty() {
            format!("{}()", word.to_ascii_uppercase())
        } else {
            format!("{}{}", word, args)
        }
    }

    fn skip_sort_order(&mut self) {
        let save = self.base.pos();
        self.base.skip_whitespace();
        if self.base.check_word_ci("ASC") || self.base.check_word_ci("DESC") {
            self.base.advance();
        } else {
            self.base.set_pos(save);
        }
    }

    fn skip_name_or_string(&mut self) {
        if self.base.parse_identifier().is_none() {
            self.base.parse_string_literal();
        }
    }
}

/// `NULL::character varying` style defaults.
fn starts_with_null_cast(text: &str) -> bool {
    text.len() > 6
        && text
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("NULL::"))
}

/// Remove redundant wrapping parentheses: `((0))` becomes `0`.
fn strip_outer_parens(text: &str) -> &str {
    let mut current = text.trim();
    while current.starts_with('(') && current.ends_with(')') && wraps_whole(current) {
        current = current[1..current.len() - 1].trim();
    }
    current
}

/// Whether the first `(` closes at the last character.
fn wraps_whole(text: &str) -> bool {
    let mut depth = 0;
    let mut in_string = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return i == text.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Parse a column definition string using tokens.
///
/// Returns `None` if the text is not a column definition.
pub fn parse_column_definition_tokens(col_def: &str) -> Option<TokenParsedColumn> {
    ColumnTokenParser::new(col_def)?.parse()
}
