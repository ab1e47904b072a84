//! CREATE TABLE parsing and script-level driver
//!
//! ```sql
//! CREATE [TEMPORARY] TABLE [IF NOT EXISTS] [schema.]name (
//!     column definition | constraint clause [, ...]
//! ) [table options]
//! ```
//!
//! The body is cut into top-level comma separated items. An item is read as
//! a column when its second token is a known type keyword, and as a
//! constraint clause otherwise. Items neither reader accepts are reported
//! back to the caller.

use rayon::prelude::*;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

use super::column_parser::{ColumnTokenParser, TokenParsedColumn};
use super::constraint_parser::{is_constraint_keyword, ConstraintTokenParser, TokenParsedConstraint};
use super::preprocess_parser::preprocess_script;
use super::statement_parser::{
    classify_statement, skip_existence_guard, split_statements, RawStatement, StatementKind,
};
use super::token_parser_base::TokenParser;
use crate::catalog::is_type_keyword;
use crate::error::{DdlError, Warning};
use crate::model::{build_table, Index, Table};

/// Minimum number of CREATE TABLE statements to benefit from parallel parsing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// Everything extracted from one script
#[derive(Debug, Clone, Default)]
pub struct ParsedScript {
    /// Parsed tables in declaration order
    pub tables: Vec<Table>,
    /// Tables named by `DROP TABLE IF EXISTS`, in order of appearance
    pub dropped_tables: Vec<String>,
    /// CREATE TABLE statements that could not be parsed and body items
    /// that were skipped
    pub warnings: Vec<Warning>,
}

/// Token-based CREATE TABLE parser
pub struct TableTokenParser {
    base: TokenParser,
    skipped: Vec<String>,
}

impl TableTokenParser {
    pub fn new(sql: &str) -> Option<Self> {
        Some(Self {
            base: TokenParser::new(sql)?,
            skipped: Vec::new(),
        })
    }

    /// Parse the statement into a table.
    pub fn parse(&mut self) -> Result<Table, DdlError> {
        self.base.skip_whitespace();
        self.parse_header()
            .ok_or_else(|| malformed("expected CREATE TABLE"))?;

        let name = self
            .base
            .parse_qualified_name()
            .ok_or_else(|| malformed("missing table name"))?;
        self.base.skip_whitespace();

        if self.base.expect_token(&Token::LParen).is_none() {
            return Err(malformed(format!("missing column list for table {}", name)));
        }

        let items = self
            .split_body_items()
            .ok_or_else(|| malformed(format!("unterminated column list for table {}", name)))?;

        let mut columns: Vec<TokenParsedColumn> = Vec::new();
        let mut constraints: Vec<TokenParsedConstraint> = Vec::new();
        for item in items.iter().filter(|i| !i.trim().is_empty()) {
            match parse_body_item(item) {
                Some(BodyItem::Column(column)) => columns.push(column),
                Some(BodyItem::Constraint(constraint)) => constraints.push(constraint),
                None => self.skipped.push(item.trim().to_string()),
            }
        }

        build_table(name, columns, constraints)
    }

    /// `[IF OBJECT_ID(...) IS NULL] CREATE [TEMPORARY|TEMP] TABLE [IF NOT EXISTS]`
    fn parse_header(&mut self) -> Option<()> {
        skip_existence_guard(&mut self.base);
        self.base.expect_keyword(Keyword::CREATE)?;
        if self.base.check_keyword(Keyword::TEMPORARY) || self.base.check_word_ci("TEMP") {
            self.base.advance();
            self.base.skip_whitespace();
        }
        self.base.expect_keyword(Keyword::TABLE)?;
        if self.base.check_keyword(Keyword::IF) {
            self.base.advance();
            self.base.skip_whitespace();
            self.base.expect_keyword(Keyword::NOT)?;
            self.base.expect_keyword(Keyword::EXISTS)?;
        }
        Some(())
    }

    /// Collect the text of each top-level item up to the closing parenthesis.
    ///
    /// Position should be just after the opening parenthesis.
    fn split_body_items(&mut self) -> Option<Vec<String>> {
        let mut items = Vec::new();
        loop {
            let start = self.base.pos();
            self.base.skip_to_item_end();
            if self.base.is_at_end() {
                return None;
            }
            items.push(self.base.tokens_to_string(start, self.base.pos()));
            if self.base.check_token(&Token::RParen) {
                self.base.advance();
                return Some(items);
            }
            // comma
            self.base.advance();
        }
    }
}

enum BodyItem {
    Column(TokenParsedColumn),
    Constraint(TokenParsedConstraint),
}

fn parse_body_item(item: &str) -> Option<BodyItem> {
    if column_first(item)? {
        if let Some(column) = ColumnTokenParser::new(item)?.parse() {
            return Some(BodyItem::Column(column));
        }
    }

    ConstraintTokenParser::new(item)?
        .parse()
        .map(BodyItem::Constraint)
}

/// Whether the item should be tried as a column before a constraint.
///
/// A leading constraint keyword still names a column when a type follows
/// it: `key VARCHAR(10)` is a column, `KEY idx (a)` an index.
fn column_first(item: &str) -> Option<bool> {
    let mut parser = TokenParser::new(item)?;
    parser.skip_whitespace();
    let keyword_lead = matches!(parser.current_token().map(|t| &t.token),
        Some(Token::Word(w)) if w.quote_style.is_none() && is_constraint_keyword(&w.value));
    if !keyword_lead {
        return Some(true);
    }
    parser.advance();
    parser.skip_whitespace();
    Some(matches!(parser.current_token().map(|t| &t.token),
        Some(Token::Word(w)) if w.quote_style.is_none() && is_type_keyword(&w.value)))
}

fn malformed(message: impl Into<String>) -> DdlError {
    DdlError::MalformedStatement {
        message: message.into(),
    }
}

/// Parse a single CREATE TABLE statement.
///
/// Body items that are neither a column nor a constraint are dropped; use
/// [`parse_script`] to have them reported.
pub fn parse_create_table(sql: &str) -> Result<Table, DdlError> {
    parse_statement(sql).map(|(table, _)| table)
}

/// The table plus the body items that were skipped.
fn parse_statement(sql: &str) -> Result<(Table, Vec<String>), DdlError> {
    let mut parser =
        TableTokenParser::new(sql).ok_or_else(|| malformed("statement could not be tokenized"))?;
    let table = parser.parse()?;
    Ok((table, parser.skipped))
}

/// Parse every CREATE TABLE and DROP TABLE IF EXISTS statement of a script.
///
/// A statement that fails to parse is reported in `warnings` and does not
/// affect the other statements.
pub fn parse_script(sql: &str) -> ParsedScript {
    let prepared = preprocess_script(sql);
    let statements = split_statements(&prepared);

    let mut script = ParsedScript::default();
    let mut creates: Vec<(usize, &RawStatement)> = Vec::new();
    let mut attachments: Vec<StatementKind> = Vec::new();
    for (index, statement) in statements.iter().enumerate() {
        match classify_statement(&statement.text) {
            StatementKind::CreateTable => creates.push((index, statement)),
            StatementKind::DropTable(names) => script.dropped_tables.extend(names),
            StatementKind::Other => {}
            other => attachments.push(other),
        }
    }

    let results: Vec<Result<(Table, Vec<String>), DdlError>> = if creates.len() >= PARALLEL_THRESHOLD {
        creates
            .par_iter()
            .map(|(_, statement)| parse_statement(&statement.text))
            .collect()
    } else {
        creates
            .iter()
            .map(|(_, statement)| parse_statement(&statement.text))
            .collect()
    };

    for ((index, statement), result) in creates.iter().zip(results) {
        match result {
            Ok((table, skipped)) => {
                for item in skipped {
                    script.warnings.push(
                        Warning::SkippedTableItem {
                            table: table.name.clone(),
                            item,
                        }
                        .emit(),
                    );
                }
                tracing::debug!(
                    table = %table.name,
                    columns = table.columns.len(),
                    line = statement.start_line,
                    "parsed table"
                );
                script.tables.push(table);
            }
            Err(err) => {
                let message = match err {
                    DdlError::MalformedStatement { message } => message,
                    other => other.to_string(),
                };
                script.warnings.push(
                    Warning::MalformedStatement {
                        statement: index + 1,
                        line: statement.start_line,
                        message,
                    }
                    .emit(),
                );
            }
        }
    }

    for attachment in attachments {
        attach(&mut script.tables, attachment);
    }

    script
}

/// Attach a standalone index or column comment to its table.
fn attach(tables: &mut [Table], statement: StatementKind) {
    let target = match &statement {
        StatementKind::CreateIndex { table, .. } | StatementKind::ColumnComment { table, .. } => {
            table.clone()
        }
        _ => return,
    };
    let position = tables
        .iter()
        .position(|t| t.name == target)
        .or_else(|| tables.iter().position(|t| t.name.eq_ignore_ascii_case(&target)));
    let Some(table) = position.map(|i| &mut tables[i]) else {
        tracing::debug!(table = %target, "statement refers to a table outside the script");
        return;
    };

    match statement {
        StatementKind::CreateIndex {
            name,
            columns,
            unique,
            ..
        } => table.indexes.push(Index {
            name: Some(name),
            columns,
            unique,
        }),
        StatementKind::ColumnComment { column, text, .. } => {
            match table.columns.iter_mut().find(|c| c.name == column) {
                Some(column) => column.description = Some(text),
                None => tracing::debug!(table = %target, column = %column, "comment on unknown column"),
            }
        }
        _ => {}
    }
}
