//! # oxide-ddl
//!
//! A SQL DDL toolkit for PostgreSQL, MySQL and CockroachDB.
//!
//! This crate provides:
//! - A lexer and hand-written recursive descent parser for `CREATE TABLE`,
//!   `CREATE INDEX`, `ALTER TABLE`, `DROP TABLE` and `DROP INDEX`
//! - A canonical printer (`to_sql()` / `Display` on every AST node)
//! - A schema diff engine that turns two schemas into migration statements
//!
//! One lexer, parser and diff engine serve every database; the differences
//! live behind the [`Dialect`](dialect::Dialect) trait.
//!
//! ## Parsing and printing
//!
//! ```rust
//! use oxide_ddl::postgres;
//!
//! let ddl = postgres::parse("create table users (id int primary key);").unwrap();
//! assert_eq!(
//!     ddl.to_sql(),
//!     "CREATE TABLE users (\n    id INT NOT NULL,\n    CONSTRAINT users_pkey PRIMARY KEY (id)\n);\n"
//! );
//! ```
//!
//! ## Diffing
//!
//! ```rust
//! use oxide_ddl::postgres;
//!
//! let before = postgres::parse("CREATE TABLE users (id INT);").unwrap();
//! let after = postgres::parse("CREATE TABLE users (id INT, age INT DEFAULT 0);").unwrap();
//! let migration = postgres::diff(Some(&before), Some(&after)).unwrap();
//! assert_eq!(migration.to_sql(), "ALTER TABLE users ADD COLUMN age INT DEFAULT 0;\n");
//! ```

pub mod ast;
pub mod dialect;
pub mod diff;
pub mod lexer;
pub mod parser;

pub use ast::{Ddl, Statement};
pub use dialect::{cockroach, mysql, postgres, Dialect};
pub use diff::{diff, diff_sql, DiffError, DiffOptions, Differ};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};

/// Parses DDL text with the given dialect.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse(sql: &str, dialect: &dyn Dialect) -> Result<Ddl, ParseError> {
    Parser::new(sql, dialect).parse()
}
