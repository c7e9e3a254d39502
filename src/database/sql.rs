//! SQL text helpers

/// Quote an identifier for DuckDB (`my "t"` -> `"my ""t"""`)
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for DuckDB (`it's` -> `'it''s'`)
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
