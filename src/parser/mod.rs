//! CREATE TABLE script parsing

mod column_parser;
mod constraint_parser;
mod identifier_utils;
mod preprocess_parser;
mod statement_parser;
mod table_parser;
mod token_parser_base;

pub use column_parser::{parse_column_definition_tokens, TokenParsedColumn};
pub use constraint_parser::{TokenParsedConstraint, TokenParsedReference};
pub use identifier_utils::{normalize_identifier, unqualified_name};
pub use preprocess_parser::preprocess_script;
pub use statement_parser::{classify_statement, split_statements, RawStatement, StatementKind};
pub use table_parser::{parse_create_table, parse_script, ParsedScript};
