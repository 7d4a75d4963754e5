//! MySQL dialect.
//!
//! - Identifiers are quoted with backticks; double quotes delimit strings
//!   and backslash escapes work inside them.
//! - `UNIQUE` constraints are unique indexes, and `INDEX`/`KEY` may be
//!   declared inside `CREATE TABLE`.
//! - `DROP INDEX` needs the table: `DROP INDEX name ON table`.
//! - Column type and nullability can only be changed by restating the whole
//!   column with `MODIFY COLUMN`.
//! - `AUTO_INCREMENT`, `UNSIGNED` and `ZEROFILL` column modifiers, and
//!   `ENGINE=...`-style table options.
//!
//! Constraint drops use `DROP CONSTRAINT`, which needs MySQL 8.0.19 or
//! later.

use super::{AlterColumnStyle, Dialect, UniqueStyle};
use crate::ast::Ddl;
use crate::diff::{DiffError, Differ};
use crate::lexer::Keyword;
use crate::parser::{ParseError, Parser};

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn extra_keywords(&self) -> &'static [Keyword] {
        &[Keyword::Modify, Keyword::AutoIncrement]
    }

    fn unique_style(&self) -> UniqueStyle {
        UniqueStyle::Index
    }

    fn supports_inline_index(&self) -> bool {
        true
    }

    fn table_options(&self) -> &'static [&'static str] {
        &[
            "ENGINE",
            "AUTO_INCREMENT",
            "DEFAULT CHARSET",
            "CHARSET",
            "DEFAULT CHARACTER SET",
            "CHARACTER SET",
            "DEFAULT COLLATE",
            "COLLATE",
            "COMMENT",
            "ROW_FORMAT",
        ]
    }

    fn alter_column_style(&self) -> AlterColumnStyle {
        AlterColumnStyle::Modify
    }

    fn drop_index_requires_table(&self) -> bool {
        true
    }

    fn type_suffixes(&self) -> &'static [&'static str] {
        &["UNSIGNED", "ZEROFILL"]
    }

    fn supports_backslash_escapes(&self) -> bool {
        true
    }
}

/// Parses MySQL DDL.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first token that does not fit the
/// grammar.
pub fn parse(sql: &str) -> Result<Ddl, ParseError> {
    Parser::new(sql, &MySqlDialect).parse()
}

/// Computes the MySQL migration from `before` to `after`.
///
/// # Errors
///
/// See [`Differ::diff`].
pub fn diff(before: Option<&Ddl>, after: Option<&Ddl>) -> Result<Ddl, DiffError> {
    Differ::new(&MySqlDialect).diff(before, after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_dialect() {
        let dialect = MySqlDialect::new();
        assert_eq!(dialect.name(), "mysql");
        assert_eq!(dialect.identifier_quote(), '`');
        assert_eq!(dialect.alter_column_style(), AlterColumnStyle::Modify);
        assert!(dialect.drop_index_requires_table());
        assert!(!dialect.supports_not_valid());
        assert!(dialect.cast_operators().is_empty());
    }

    #[test]
    fn test_engine_option_round_trip() {
        let ddl = parse(
            "CREATE TABLE `t` (`id` INT UNSIGNED AUTO_INCREMENT) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;",
        )
        .unwrap();
        assert_eq!(
            ddl.to_sql(),
            "CREATE TABLE `t` (\n    `id` INT UNSIGNED AUTO_INCREMENT\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;\n"
        );
    }
}
