//! Identifier and token formatting helpers shared by the parsers.

use sqlparser::tokenizer::{Token, Word};

/// Strips brackets `[]`, backticks and double quotes from an identifier.
///
/// ```ignore
/// assert_eq!(normalize_identifier("[MyTable]"), "MyTable");
/// assert_eq!(normalize_identifier("`users`"), "users");
/// ```
pub fn normalize_identifier(ident: &str) -> String {
    let trimmed = ident.trim();
    let stripped = if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        match (bytes[0], bytes[trimmed.len() - 1]) {
            (b'[', b']') | (b'"', b'"') | (b'`', b'`') => &trimmed[1..trimmed.len() - 1],
            _ => trimmed,
        }
    } else {
        trimmed
    };
    stripped.to_string()
}

/// Drops any schema qualifier: `public.users` and `"db"."users"` become `users`.
pub fn unqualified_name(name: &str) -> String {
    let mut in_quote: Option<char> = None;
    let mut last_dot = None;
    for (i, c) in name.char_indices() {
        match (in_quote, c) {
            (None, '"') | (None, '`') => in_quote = Some(c),
            (None, '[') => in_quote = Some(']'),
            (Some(q), c) if c == q => in_quote = None,
            (None, '.') => last_dot = Some(i),
            _ => {}
        }
    }
    let tail = match last_dot {
        Some(i) => &name[i + 1..],
        None => name,
    };
    normalize_identifier(tail)
}

/// Formats a word token, keeping its original quote characters.
pub fn format_word(word: &Word) -> String {
    match word.quote_style {
        Some('[') => format!("[{}]", word.value),
        Some(q) => format!("{}{}{}", q, word.value, q),
        None => word.value.clone(),
    }
}

/// Converts a token back to SQL text, doubling quotes inside string literals.
pub fn format_token_sql(token: &Token) -> String {
    match token {
        Token::Word(w) => format_word(w),
        Token::Number(n, _) => n.clone(),
        Token::SingleQuotedString(s) => format!("'{}'", s.replace('\'', "''")),
        Token::NationalStringLiteral(s) => format!("N'{}'", s.replace('\'', "''")),
        Token::DoubleQuotedString(s) => format!("\"{}\"", s),
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::Comma => ",".to_string(),
        Token::Period => ".".to_string(),
        Token::DoubleColon => "::".to_string(),
        Token::Minus => "-".to_string(),
        Token::Whitespace(ws) => ws.to_string(),
        other => other.to_string(),
    }
}
