//! CockroachDB dialect.
//!
//! CockroachDB speaks the PostgreSQL wire grammar with a few differences
//! that matter for schema diffs:
//!
//! - `:::` is a type-annotation operator next to the `::` cast.
//! - `UNIQUE` constraints are unique indexes: they are dropped with
//!   `DROP INDEX` and re-created with `CREATE UNIQUE INDEX`.
//! - `INDEX name (...)` may be declared inside `CREATE TABLE`.

use super::{Dialect, UniqueStyle};
use crate::ast::Ddl;
use crate::diff::{DiffError, Differ};
use crate::lexer::Keyword;
use crate::parser::{ParseError, Parser};

/// CockroachDB dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct CockroachDialect;

impl CockroachDialect {
    /// Creates a new CockroachDB dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for CockroachDialect {
    fn name(&self) -> &'static str {
        "cockroach"
    }

    fn extra_keywords(&self) -> &'static [Keyword] {
        &[Keyword::Valid]
    }

    fn cast_operators(&self) -> &'static [&'static str] {
        &["::", ":::"]
    }

    fn unique_style(&self) -> UniqueStyle {
        UniqueStyle::Index
    }

    fn supports_inline_index(&self) -> bool {
        true
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

/// Parses CockroachDB DDL.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first token that does not fit the
/// grammar.
pub fn parse(sql: &str) -> Result<Ddl, ParseError> {
    Parser::new(sql, &CockroachDialect).parse()
}

/// Computes the CockroachDB migration from `before` to `after`.
///
/// # Errors
///
/// See [`Differ::diff`].
pub fn diff(before: Option<&Ddl>, after: Option<&Ddl>) -> Result<Ddl, DiffError> {
    Differ::new(&CockroachDialect).diff(before, after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cockroach_dialect() {
        let dialect = CockroachDialect::new();
        assert_eq!(dialect.name(), "cockroach");
        assert_eq!(dialect.unique_style(), UniqueStyle::Index);
        assert!(dialect.supports_inline_index());
        assert!(dialect.cast_operators().contains(&":::"));
        assert!(!dialect.drop_index_requires_table());
    }

    #[test]
    fn test_unique_becomes_index() {
        let ddl = parse("CREATE TABLE users (name STRING UNIQUE);").unwrap();
        assert_eq!(
            ddl.to_sql(),
            "CREATE TABLE users (\n    name STRING,\n    UNIQUE INDEX users_unique_name (name)\n);\n"
        );
    }
}
