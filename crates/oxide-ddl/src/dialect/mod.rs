//! SQL dialect support.
//!
//! Lexer, parser and diff engine are written once; everything that differs
//! between database families is answered by a [`Dialect`] implementation.

pub mod cockroach;
pub mod mysql;
pub mod postgres;

use core::fmt;

use crate::lexer::Keyword;

pub use cockroach::CockroachDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

/// How a dialect represents `UNIQUE` constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueStyle {
    /// A named table constraint, dropped with `DROP CONSTRAINT`.
    Constraint,
    /// A unique index, dropped with `DROP INDEX` and created with
    /// `CREATE UNIQUE INDEX`.
    Index,
}

/// How a dialect changes a column's type or nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterColumnStyle {
    /// `ALTER COLUMN c SET DATA TYPE ...` / `SET NOT NULL` / `DROP NOT NULL`.
    Standard,
    /// `MODIFY COLUMN <full definition>`.
    Modify,
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: fmt::Debug + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the quote character used when an identifier has to be
    /// quoted on output.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns true if `c` opens a quoted identifier.
    fn is_identifier_quote(&self, c: char) -> bool {
        c == self.identifier_quote()
    }

    /// Keywords that only this dialect recognises.
    fn extra_keywords(&self) -> &'static [Keyword] {
        &[]
    }

    /// Looks up a word in this dialect's keyword table.
    fn keyword(&self, word: &str) -> Option<Keyword> {
        Keyword::from_str(word)
            .filter(|kw| !kw.is_dialect_specific() || self.extra_keywords().contains(kw))
    }

    /// Type-annotation operators the lexer should recognise (`::`, `:::`).
    fn cast_operators(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns how `UNIQUE` constraints are represented.
    fn unique_style(&self) -> UniqueStyle {
        UniqueStyle::Constraint
    }

    /// Returns whether `INDEX name (...)` may appear inside `CREATE TABLE`.
    fn supports_inline_index(&self) -> bool {
        false
    }

    /// Trailing `CREATE TABLE` option names, upper-case, words separated by
    /// single spaces.
    fn table_options(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns whether `ADD CONSTRAINT ... NOT VALID` is supported.
    fn supports_not_valid(&self) -> bool {
        false
    }

    /// Returns whether `ALTER TABLE ... RENAME CONSTRAINT` is supported.
    fn supports_rename_constraint(&self) -> bool {
        false
    }

    /// Returns how column type and nullability changes are expressed.
    fn alter_column_style(&self) -> AlterColumnStyle {
        AlterColumnStyle::Standard
    }

    /// Returns whether `DROP INDEX` must name the table (`DROP INDEX i ON t`).
    fn drop_index_requires_table(&self) -> bool {
        false
    }

    /// Words that may follow a data type (`UNSIGNED`, `ZEROFILL`).
    fn type_suffixes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns whether a backslash escapes the next character in string
    /// literals.
    fn supports_backslash_escapes(&self) -> bool {
        false
    }

    /// Returns whether `TYPE[]` array types are supported.
    fn supports_array_types(&self) -> bool {
        false
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }
}

/// Looks up a built-in dialect by name.
///
/// Accepts `postgres`/`postgresql`/`pg`, `mysql`, and
/// `cockroach`/`cockroachdb`/`crdb`, case-insensitively.
#[must_use]
pub fn from_name(name: &str) -> Option<&'static dyn Dialect> {
    match name.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "pg" => Some(&PostgresDialect),
        "mysql" => Some(&MySqlDialect),
        "cockroach" | "cockroachdb" | "crdb" => Some(&CockroachDialect),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(from_name("PostgreSQL").map(|d| d.name()), Some("postgres"));
        assert_eq!(from_name("mysql").map(|d| d.name()), Some("mysql"));
        assert_eq!(from_name("crdb").map(|d| d.name()), Some("cockroach"));
        assert!(from_name("oracle").is_none());
    }

    #[test]
    fn test_dialect_specific_keywords() {
        assert_eq!(MySqlDialect.keyword("modify"), Some(Keyword::Modify));
        assert_eq!(PostgresDialect.keyword("modify"), None);
        assert_eq!(PostgresDialect.keyword("valid"), Some(Keyword::Valid));
        assert_eq!(MySqlDialect.keyword("valid"), None);
        assert_eq!(CockroachDialect.keyword("table"), Some(Keyword::Table));
    }

    #[test]
    fn test_quote_identifier_escapes() {
        assert_eq!(PostgresDialect.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(MySqlDialect.quote_identifier("order"), "`order`");
    }
}
