//! SQL parsing front end: placeholder normalization plus dialect-aware
//! parsing with a Postgres fallback for the generic dialect.

use crate::error::ParseError;
use crate::Dialect;
use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// Parses a query string under the given dialect.
///
/// Driver-style `%s` placeholders are rewritten to numbered `$n` parameters
/// before parsing, so queries copied straight out of application code
/// validate without edits.
pub fn parse(sql: &str, dialect: Dialect) -> Result<Vec<Statement>, ParseError> {
    let sql = normalize_placeholders(sql);
    let sqlparser_dialect = dialect.to_sqlparser_dialect();
    match Parser::parse_sql(sqlparser_dialect.as_ref(), &sql) {
        Ok(statements) => Ok(statements),
        Err(primary_err) => {
            // Parity fallback: Generic dialect frequently fails on Postgres-specific
            // operators (`?`, `->>`, `::`) commonly used in application SQL.
            if matches!(dialect, Dialect::Generic) && looks_like_postgres_syntax(&sql) {
                let postgres = PostgreSqlDialect {};
                if let Ok(statements) = Parser::parse_sql(&postgres, &sql) {
                    return Ok(statements);
                }
            }
            Err(ParseError::from(primary_err).with_dialect(dialect))
        }
    }
}

/// Rewrites `%s` placeholders to `$1`, `$2`, ... in query order.
///
/// Literal-aware: placeholders inside single-quoted strings are left alone.
fn normalize_placeholders(sql: &str) -> String {
    if !sql.contains("%s") {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut in_string = false;
    let mut next_param = 1usize;

    while let Some(c) = chars.next() {
        if c == '\'' {
            in_string = !in_string;
            out.push(c);
        } else if c == '%' && !in_string && chars.peek() == Some(&'s') {
            chars.next();
            out.push('$');
            out.push_str(&next_param.to_string());
            next_param += 1;
        } else {
            out.push(c);
        }
    }
    out
}

fn looks_like_postgres_syntax(sql: &str) -> bool {
    sql.contains("::")
        || sql.contains("->")
        || sql.contains("?|")
        || sql.contains("?&")
        || sql.contains(" ? ")
        || sql.contains(" ?\n")
        || sql.contains("? '")
        || sql.contains("?\t")
}
