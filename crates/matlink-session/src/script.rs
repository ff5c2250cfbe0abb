//! Assembly of script statements the session composes on the caller's behalf.
//!
//! The engine's string literals are single-quoted with embedded quotes
//! doubled; every name or path interpolated into a generated statement goes
//! through [`quote_literal`] so a quote in a file name cannot corrupt the
//! statement.

/// Quote a string as an engine string literal.
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Build a `save(...)` statement for a file and an optional variable list.
pub fn save_statement(file: &str, variables: &[&str]) -> String {
    let mut stmt = format!("save({}", quote_literal(file));
    for name in variables {
        stmt.push_str(", ");
        stmt.push_str(&quote_literal(name));
    }
    stmt.push(')');
    stmt
}

/// Join multiple statements into one evaluation unit, preserving order.
pub fn join_statements(statements: &[&str]) -> String {
    statements.join("\n")
}
