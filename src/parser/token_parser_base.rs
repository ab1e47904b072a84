//! Base token parser providing common helper methods for DDL parsing.
//!
//! `TokenParser` owns the token stream of one statement and a cursor into it.
//! The specialized readers (`ColumnTokenParser`, `ConstraintTokenParser`,
//! `TableTokenParser`) compose it and delegate navigation:
//!
//! ```ignore
//! pub struct ColumnTokenParser {
//!     base: TokenParser,
//! }
//!
//! impl ColumnTokenParser {
//!     pub fn parse(&mut self) -> Option<TokenParsedColumn> {
//!         self.base.skip_whitespace();
//!         let name = self.base.parse_identifier()?;
//!         // ...
//!     }
//! }
//! ```
//!
//! Tokenization uses sqlparser's generic dialect, which accepts backtick and
//! double-quote delimited identifiers. SQL Server `[bracketed]` identifiers
//! arrive as bracket tokens and are reassembled by `parse_identifier`.

use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, TokenWithSpan, Tokenizer};

use super::identifier_utils::format_token_sql;

/// Base token parser with common helper methods.
pub struct TokenParser {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
}

impl TokenParser {
    /// Create a new TokenParser from a SQL string.
    ///
    /// Returns `None` if tokenization fails (e.g. an unterminated string).
    pub fn new(sql: &str) -> Option<Self> {
        let dialect = GenericDialect {};
        let tokens = Tokenizer::new(&dialect, sql)
            .tokenize_with_location()
            .ok()?;

        Some(Self { tokens, pos: 0 })
    }

    // ========================================================================
    // Position and state
    // ========================================================================

    /// Check if at end of tokens.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len() || matches!(self.tokens[self.pos].token, Token::EOF)
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    // ========================================================================
    // Token access
    // ========================================================================

    /// Get current token without consuming.
    #[inline]
    pub fn current_token(&self) -> Option<&TokenWithSpan> {
        if self.is_at_end() {
            None
        } else {
            self.tokens.get(self.pos)
        }
    }

    /// Peek at the next non-whitespace token after the current one.
    pub fn peek_significant(&self) -> Option<&Token> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .skip(1)
            .map(|t| &t.token)
            .find(|t| !matches!(t, Token::Whitespace(_)))
    }

    /// Advance to next token.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    // ========================================================================
    // Whitespace handling
    // ========================================================================

    /// Skip whitespace and comment tokens.
    pub fn skip_whitespace(&mut self) {
        while let Some(token) = self.current_token() {
            match &token.token {
                Token::Whitespace(_) => self.advance(),
                _ => break,
            }
        }
    }

    // ========================================================================
    // Token type checks
    // ========================================================================

    /// Check if current token is a specific unquoted keyword.
    #[inline]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        if let Some(token) = self.current_token() {
            matches!(&token.token, Token::Word(w) if w.keyword == keyword && w.quote_style.is_none())
        } else {
            false
        }
    }

    /// Check if current token is an unquoted word matching (case-insensitive).
    ///
    /// Used for words sqlparser does not classify as keywords, and for
    /// dialect-specific modifiers such as `AUTO_INCREMENT` or `UNSIGNED`.
    #[inline]
    pub fn check_word_ci(&self, word: &str) -> bool {
        if let Some(token) = self.current_token() {
            matches!(&token.token, Token::Word(w)
                if w.quote_style.is_none() && w.value.eq_ignore_ascii_case(word))
        } else {
            false
        }
    }

    /// Check if current token matches a specific token type (by discriminant).
    #[inline]
    pub fn check_token(&self, expected: &Token) -> bool {
        if let Some(token) = self.current_token() {
            std::mem::discriminant(&token.token) == std::mem::discriminant(expected)
        } else {
            false
        }
    }

    // ========================================================================
    // Expect methods (check and advance)
    // ========================================================================

    /// Expect a specific keyword, advancing past it and trailing whitespace.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Option<()> {
        if self.check_keyword(keyword) {
            self.advance();
            self.skip_whitespace();
            Some(())
        } else {
            None
        }
    }

    /// Expect a specific word (case-insensitive), advancing past it and
    /// trailing whitespace.
    pub fn expect_word_ci(&mut self, word: &str) -> Option<()> {
        if self.check_word_ci(word) {
            self.advance();
            self.skip_whitespace();
            Some(())
        } else {
            None
        }
    }

    /// Expect a specific token type, advancing past it and trailing whitespace.
    pub fn expect_token(&mut self, expected: &Token) -> Option<()> {
        if self.check_token(expected) {
            self.advance();
            self.skip_whitespace();
            Some(())
        } else {
            None
        }
    }

    // ========================================================================
    // Identifier parsing
    // ========================================================================

    /// Parse an identifier (bare, quoted, backticked or bracketed).
    ///
    /// Returns the identifier value without delimiters.
    pub fn parse_identifier(&mut self) -> Option<String> {
        let token = self.current_token()?;
        match &token.token {
            Token::Word(w) => {
                let name = w.value.clone();
                self.advance();
                Some(name)
            }
            Token::DoubleQuotedString(s) => {
                let name = s.clone();
                self.advance();
                Some(name)
            }
            Token::LBracket => {
                let start = self.pos;
                self.advance();
                let mut name = String::new();
                while let Some(token) = self.current_token() {
                    if matches!(token.token, Token::RBracket) {
                        self.advance();
                        return Some(name.trim().to_string());
                    }
                    name.push_str(&format_token_sql(&token.token));
                    self.advance();
                }
                self.pos = start;
                None
            }
            _ => None,
        }
    }

    /// Parse a possibly schema-qualified name, returning only the last part.
    ///
    /// `public.users`, `"db"."users"` and `[dbo].[users]` all yield `users`.
    pub fn parse_qualified_name(&mut self) -> Option<String> {
        let mut name = self.parse_identifier()?;
        loop {
            let save = self.pos;
            self.skip_whitespace();
            if !self.check_token(&Token::Period) {
                self.pos = save;
                break;
            }
            self.advance();
            self.skip_whitespace();
            match self.parse_identifier() {
                Some(part) => name = part,
                None => {
                    self.pos = save;
                    break;
                }
            }
        }
        Some(name)
    }

    /// Parse a parenthesized, comma-separated column list.
    ///
    /// Per-column prefix lengths (`name(10)`) and `ASC`/`DESC` markers are
    /// skipped. Position should be at the opening parenthesis.
    pub fn parse_identifier_list(&mut self) -> Option<Vec<String>> {
        self.expect_token(&Token::LParen)?;
        let mut names = Vec::new();
        loop {
            self.skip_whitespace();
            if self.check_token(&Token::RParen) {
                self.advance();
                break;
            }
            let name = self.parse_identifier()?;
            names.push(name);
            self.skip_whitespace();
            if self.check_token(&Token::LParen) {
                self.skip_parenthesized();
                self.skip_whitespace();
            }
            if self.check_word_ci("ASC") || self.check_word_ci("DESC") {
                self.advance();
                self.skip_whitespace();
            }
            if self.check_token(&Token::Comma) {
                self.advance();
            } else if !self.check_token(&Token::RParen) {
                return None;
            }
        }
        Some(names)
    }

    // ========================================================================
    // Literal parsing
    // ========================================================================

    /// Parse a positive integer only.
    pub fn parse_positive_integer(&mut self) -> Option<u32> {
        let token = self.current_token()?;
        match &token.token {
            Token::Number(n, _) => {
                let value = n.parse::<u32>().ok()?;
                self.advance();
                Some(value)
            }
            _ => None,
        }
    }

    /// Parse a single-quoted string literal, returning its unescaped text.
    pub fn parse_string_literal(&mut self) -> Option<String> {
        let token = self.current_token()?;
        match &token.token {
            Token::SingleQuotedString(s)
            | Token::NationalStringLiteral(s)
            | Token::EscapedStringLiteral(s) => {
                let value = s.clone();
                self.advance();
                Some(value)
            }
            _ => None,
        }
    }

    // ========================================================================
    // Token string conversion
    // ========================================================================

    /// Convert a range of tokens to SQL text.
    pub fn tokens_to_string(&self, start_pos: usize, end_pos: usize) -> String {
        self.tokens[start_pos..end_pos.min(self.tokens.len())]
            .iter()
            .map(|t| format_token_sql(&t.token))
            .collect()
    }

    // ========================================================================
    // Utility methods
    // ========================================================================

    /// Skip a parenthesized expression, handling nested parentheses.
    ///
    /// Position should be at the opening parenthesis. After this call,
    /// position will be after the closing parenthesis.
    pub fn skip_parenthesized(&mut self) {
        if !self.check_token(&Token::LParen) {
            return;
        }

        let mut depth = 0;
        while !self.is_at_end() {
            if self.check_token(&Token::LParen) {
                depth += 1;
            } else if self.check_token(&Token::RParen) {
                depth -= 1;
                if depth == 0 {
                    self.advance();
                    return;
                }
            }
            self.advance();
        }
    }

    /// Skip tokens up to the next top-level comma or the closing parenthesis
    /// of the enclosing list. Neither is consumed.
    pub fn skip_to_item_end(&mut self) {
        while !self.is_at_end() {
            if self.check_token(&Token::Comma) || self.check_token(&Token::RParen) {
                return;
            }
            if self.check_token(&Token::LParen) {
                self.skip_parenthesized();
            } else {
                self.advance();
            }
        }
    }
}
