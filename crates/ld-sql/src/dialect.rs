//! Parser dialect selection

use sqlparser::dialect::{
    Dialect, DuckDbDialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
};

/// Pick the sqlparser dialect used to tokenize scripts for a dialect tag.
///
/// Unknown tags (and `"default"`) fall back to the generic dialect, which
/// understands standard quoting and comment syntax.
pub fn parser_dialect(tag: &str) -> Box<dyn Dialect> {
    match tag {
        "duckdb" => Box::new(DuckDbDialect {}),
        "postgres" | "postgresql" => Box::new(PostgreSqlDialect {}),
        "sqlite" => Box::new(SQLiteDialect {}),
        "mysql" => Box::new(MySqlDialect {}),
        _ => Box::new(GenericDialect {}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_dialect_known_tags() {
        assert!(parser_dialect("duckdb").is::<DuckDbDialect>());
        assert!(parser_dialect("postgres").is::<PostgreSqlDialect>());
        assert!(parser_dialect("sqlite").is::<SQLiteDialect>());
        assert!(parser_dialect("mysql").is::<MySqlDialect>());
    }

    #[test]
    fn test_parser_dialect_fallback() {
        assert!(parser_dialect("default").is::<GenericDialect>());
        assert!(parser_dialect("oracle").is::<GenericDialect>());
    }
}
