//! SQL text helpers.
//!
//! Values are always bound as parameters, but identifiers and a few DDL
//! fragments (column datatypes, `NOT NULL`, `DEFAULT 0`) have to be spliced
//! into the statement text. This module renders identifiers the way
//! PostgreSQL's `quote_ident()` does and screens raw fragments so they
//! cannot end the statement or comment out the rest of it.

use crate::core::{PgTablesError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

static SIMPLE_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_$]*$").expect("identifier pattern is valid")
});

/// PostgreSQL reserved and type/function-name keywords; these cannot
/// appear as bare table or column names.
const RESERVED_KEYWORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant",
    "group", "having", "ilike", "in", "initially", "inner", "intersect", "into", "is",
    "isnull", "join", "lateral", "leading", "left", "like", "limit", "localtime",
    "localtimestamp", "natural", "not", "notnull", "null", "offset", "on", "only", "or",
    "order", "outer", "overlaps", "placing", "primary", "references", "returning", "right",
    "select", "session_user", "similar", "some", "symmetric", "system_user", "table",
    "tablesample", "then", "to", "trailing", "true", "union", "unique", "user", "using",
    "variadic", "verbose", "when", "where", "window", "with",
];

fn is_reserved(ident: &str) -> bool {
    RESERVED_KEYWORDS.contains(&ident)
}

/// Renders an identifier for inclusion in statement text.
///
/// Lowercase identifiers that are not reserved words are left bare; anything else
/// is wrapped in double quotes with embedded quotes doubled, so mixed-case
/// names keep their case.
///
/// # Errors
///
/// Returns `PgTablesError::Identifier` for an empty identifier or one
/// containing a NUL byte.
pub fn quote_ident(ident: &str) -> Result<String> {
    if ident.is_empty() || ident.contains('\0') {
        return Err(PgTablesError::Identifier(ident.to_string()));
    }
    if SIMPLE_IDENT.is_match(ident) && !is_reserved(ident) {
        Ok(ident.to_string())
    } else {
        Ok(format!("\"{}\"", ident.replace('"', "\"\"")))
    }
}

/// Checks a raw fragment (datatype, flag or option token) before it is
/// spliced into a statement.
///
/// # Errors
///
/// Returns `PgTablesError::Fragment` if the fragment is blank, does not
/// tokenize, contains a `;` or a comment outside string literals, or uses
/// `E'...'` or dollar-quoted strings.
pub fn check_fragment(fragment: &str) -> Result<&str> {
    let reject = |reason: &str| PgTablesError::Fragment {
        fragment: fragment.to_string(),
        reason: reason.to_string(),
    };

    if fragment.trim().is_empty() {
        return Err(reject("empty fragment"));
    }

    let dialect = PostgreSqlDialect {};
    let tokens = Tokenizer::new(&dialect, fragment)
        .tokenize()
        .map_err(|e| reject(&format!("{:?}", e)))?;

    // The tokenizer knows neither `E'...'` backslash escapes nor `$$`
    // quoting, so it can disagree with the server about where a literal
    // ends. Both are refused outright.
    let mut prev: Option<&Token> = None;
    for token in &tokens {
        match token {
            Token::SemiColon => return Err(reject("statement separator")),
            Token::Whitespace(Whitespace::SingleLineComment { .. })
            | Token::Whitespace(Whitespace::MultiLineComment { .. }) => {
                return Err(reject("comment"))
            }
            Token::SingleQuotedString(_) => {
                if let Some(Token::Word(word)) = prev {
                    if word.quote_style.is_none() && word.value.eq_ignore_ascii_case("e") {
                        return Err(reject("escape string literal"));
                    }
                }
            }
            _ if token.to_string().contains('$') => return Err(reject("dollar quoting")),
            _ => {}
        }
        prev = Some(token);
    }

    Ok(fragment)
}
