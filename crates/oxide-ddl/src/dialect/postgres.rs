//! PostgreSQL dialect.
//!
//! - Identifiers are quoted with `"`.
//! - `::` is the type-cast operator.
//! - `UNIQUE` is a table constraint, dropped with `DROP CONSTRAINT`.
//! - `ADD CONSTRAINT ... NOT VALID` skips validation of existing rows for
//!   FOREIGN KEY and CHECK constraints.
//! - `TABLESPACE name` may follow the column list.

use super::Dialect;
use crate::ast::Ddl;
use crate::diff::{DiffError, Differ};
use crate::lexer::Keyword;
use crate::parser::{ParseError, Parser};

/// PostgreSQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn extra_keywords(&self) -> &'static [Keyword] {
        &[Keyword::Valid]
    }

    fn cast_operators(&self) -> &'static [&'static str] {
        &["::"]
    }

    fn table_options(&self) -> &'static [&'static str] {
        &["TABLESPACE"]
    }

    fn supports_not_valid(&self) -> bool {
        true
    }

    fn supports_rename_constraint(&self) -> bool {
        true
    }

    fn supports_array_types(&self) -> bool {
        true
    }
}

/// Parses PostgreSQL DDL.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first token that does not fit the
/// grammar.
pub fn parse(sql: &str) -> Result<Ddl, ParseError> {
    Parser::new(sql, &PostgresDialect).parse()
}

/// Computes the PostgreSQL migration from `before` to `after`.
///
/// # Errors
///
/// See [`Differ::diff`].
pub fn diff(before: Option<&Ddl>, after: Option<&Ddl>) -> Result<Ddl, DiffError> {
    Differ::new(&PostgresDialect).diff(before, after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{AlterColumnStyle, UniqueStyle};

    #[test]
    fn test_postgres_dialect() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.name(), "postgres");
        assert_eq!(dialect.identifier_quote(), '"');
        assert!(dialect.is_identifier_quote('"'));
        assert!(!dialect.is_identifier_quote('`'));
        assert_eq!(dialect.unique_style(), UniqueStyle::Constraint);
        assert_eq!(dialect.alter_column_style(), AlterColumnStyle::Standard);
        assert!(dialect.supports_not_valid());
        assert!(!dialect.supports_inline_index());
    }

    #[test]
    fn test_parse_and_diff_entry_points() {
        let before = parse("CREATE TABLE t (id INT);").unwrap();
        let after = parse("CREATE TABLE t (id BIGINT);").unwrap();
        let migration = diff(Some(&before), Some(&after)).unwrap();
        assert_eq!(
            migration.to_sql(),
            "ALTER TABLE t ALTER COLUMN id SET DATA TYPE BIGINT;\n"
        );
    }
}
