//! Token-based table constraint parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! [CONSTRAINT name] PRIMARY KEY (col1, col2, ...)
//! [CONSTRAINT name] UNIQUE [KEY|INDEX] [name] (col1, ...)
//! KEY|INDEX [name] (col1, ...)
//! [CONSTRAINT name] FOREIGN KEY [name] (col1, ...)
//!     REFERENCES table [(col1, ...)] [ON DELETE action] [ON UPDATE action]
//! [CONSTRAINT name] CHECK (expr)
//! FULLTEXT|SPATIAL [KEY|INDEX] [name] (col1, ...)
//! ```
//!
//! CHECK, FULLTEXT and SPATIAL clauses are recognized so they are not
//! mistaken for columns, but carry nothing into the table model.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::token_parser_base::TokenParser;

/// Target of a `REFERENCES` clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenParsedReference {
    pub table: String,
    /// Referenced columns; empty when the clause names only the table
    pub columns: Vec<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

/// Result of parsing a table-level constraint clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenParsedConstraint {
    PrimaryKey {
        name: Option<String>,
        columns: Vec<String>,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    Index {
        name: Option<String>,
        columns: Vec<String>,
    },
    ForeignKey {
        name: Option<String>,
        columns: Vec<String>,
        reference: TokenParsedReference,
    },
    /// A recognized clause with no model counterpart (CHECK, FULLTEXT, ...)
    Ignored,
}

/// Words that open a constraint clause when they lead a table body item.
pub fn is_constraint_keyword(word: &str) -> bool {
    [
        "CONSTRAINT",
        "PRIMARY",
        "UNIQUE",
        "KEY",
        "INDEX",
        "FOREIGN",
        "CHECK",
        "FULLTEXT",
        "SPATIAL",
        "EXCLUDE",
    ]
    .iter()
    .any(|k| k.eq_ignore_ascii_case(word))
}

/// Token-based table constraint parser
pub struct ConstraintTokenParser {
    base: TokenParser,
}

impl ConstraintTokenParser {
    /// Create a new parser for one constraint clause
    pub fn new(sql: &str) -> Option<Self> {
        Some(Self {
            base: TokenParser::new(sql)?,
        })
    }

    /// Parse the clause. Returns `None` if it is not a constraint.
    pub fn parse(&mut self) -> Option<TokenParsedConstraint> {
        self.base.skip_whitespace();

        let mut name = None;
        if self.base.expect_keyword(Keyword::CONSTRAINT).is_some() {
            if !self.at_constraint_body() {
                name = self.base.parse_identifier();
                self.base.skip_whitespace();
            }
        }

        if self.base.expect_keyword(Keyword::PRIMARY).is_some() {
            self.base.expect_keyword(Keyword::KEY)?;
            self.skip_index_options();
            let columns = self.base.parse_identifier_list()?;
            return Some(TokenParsedConstraint::PrimaryKey { name, columns });
        }

        if self.base.expect_keyword(Keyword::UNIQUE).is_some() {
            if self.base.check_keyword(Keyword::KEY) || self.base.check_keyword(Keyword::INDEX) {
                self.base.advance();
                self.base.skip_whitespace();
            }
            self.skip_index_options();
            let index_name = self.parse_optional_index_name();
            let columns = self.base.parse_identifier_list()?;
            return Some(TokenParsedConstraint::Unique {
                name: index_name.or(name),
                columns,
            });
        }

        if self.base.check_keyword(Keyword::KEY) || self.base.check_keyword(Keyword::INDEX) {
            self.base.advance();
            self.base.skip_whitespace();
            let index_name = self.parse_optional_index_name();
            let columns = self.base.parse_identifier_list()?;
            return Some(TokenParsedConstraint::Index {
                name: index_name,
                columns,
            });
        }

        if self.base.expect_keyword(Keyword::FOREIGN).is_some() {
            self.base.expect_keyword(Keyword::KEY)?;
            let index_name = self.parse_optional_index_name();
            let columns = self.base.parse_identifier_list()?;
            self.base.skip_whitespace();
            self.base.expect_keyword(Keyword::REFERENCES)?;
            let reference = parse_reference_target(&mut self.base)?;
            return Some(TokenParsedConstraint::ForeignKey {
                name: name.or(index_name),
                columns,
                reference,
            });
        }

        if self.base.check_keyword(Keyword::CHECK)
            || self.base.check_word_ci("FULLTEXT")
            || self.base.check_word_ci("SPATIAL")
            || self.base.check_word_ci("EXCLUDE")
        {
            return Some(TokenParsedConstraint::Ignored);
        }

        None
    }

    /// `CONSTRAINT` directly followed by the constraint kind (unnamed).
    fn at_constraint_body(&self) -> bool {
        self.base.check_keyword(Keyword::PRIMARY)
            || self.base.check_keyword(Keyword::UNIQUE)
            || self.base.check_keyword(Keyword::FOREIGN)
            || self.base.check_keyword(Keyword::CHECK)
    }

    /// An index name before the column list, if present.
    fn parse_optional_index_name(&mut self) -> Option<String> {
        if self.base.check_token(&Token::LParen) {
            return None;
        }
        let name = self.base.parse_identifier();
        self.base.skip_whitespace();
        self.skip_index_options();
        name
    }

    /// Skip `CLUSTERED`, `NONCLUSTERED` and `USING BTREE|HASH`.
    fn skip_index_options(&mut self) {
        loop {
            if self.base.check_word_ci("CLUSTERED") || self.base.check_word_ci("NONCLUSTERED") {
                self.base.advance();
                self.base.skip_whitespace();
            } else if self.base.check_word_ci("USING") {
                self.base.advance();
                self.base.skip_whitespace();
                self.base.advance();
                self.base.skip_whitespace();
            } else {
                break;
            }
        }
    }
}

/// Parse the part of a `REFERENCES` clause after the keyword.
///
/// Shared by table-level `FOREIGN KEY` clauses and inline column references.
/// Stops at the first token that does not belong to the clause.
pub fn parse_reference_target(base: &mut TokenParser) -> Option<TokenParsedReference> {
    base.skip_whitespace();
    let table = base.parse_qualified_name()?;
    base.skip_whitespace();

    let columns = if base.check_token(&Token::LParen) {
        base.parse_identifier_list()?
    } else {
        Vec::new()
    };

    let mut reference = TokenParsedReference {
        table,
        columns,
        ..Default::default()
    };

    loop {
        base.skip_whitespace();
        if base.check_keyword(Keyword::ON) {
            let save = base.pos();
            base.advance();
            base.skip_whitespace();
            if base.expect_keyword(Keyword::DELETE).is_some() {
                reference.on_delete = parse_referential_action(base);
            } else if base.expect_keyword(Keyword::UPDATE).is_some() {
                reference.on_update = parse_referential_action(base);
            } else {
                base.set_pos(save);
                break;
            }
        } else if base.check_word_ci("MATCH") {
            base.advance();
            base.skip_whitespace();
            base.advance();
        } else if base.check_word_ci("DEFERRABLE") || base.check_word_ci("INITIALLY") {
            base.advance();
            base.skip_whitespace();
            if base.check_word_ci("DEFERRED") || base.check_word_ci("IMMEDIATE") {
                base.advance();
            }
        } else if base.check_keyword(Keyword::NOT)
            && matches!(base.peek_significant(),
                Some(Token::Word(w)) if w.value.eq_ignore_ascii_case("DEFERRABLE"))
        {
            base.advance();
            base.skip_whitespace();
            base.advance();
        } else {
            break;
        }
    }

    Some(reference)
}

/// Read an action after `ON DELETE` / `ON UPDATE`, as upper-case text.
///
/// The text is kept as written; it is validated when generating SQL.
fn parse_referential_action(base: &mut TokenParser) -> Option<String> {
    let first = match &base.current_token()?.token {
        Token::Word(w) => w.value.to_ascii_uppercase(),
        _ => return None,
    };
    base.advance();

    if first == "SET" || first == "NO" {
        base.skip_whitespace();
        if let Some(Token::Word(w)) = base.current_token().map(|t| &t.token) {
            let second = w.value.to_ascii_uppercase();
            base.advance();
            return Some(format!("{} {}", first, second));
        }
    }
    Some(first)
}
