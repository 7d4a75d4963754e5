//! DDL Parser
//!
//! A hand-written recursive descent parser. Dialect differences (keywords,
//! unique constraint style, table options, inline indexes) are answered by
//! the [`Dialect`](crate::dialect::Dialect) passed to [`Parser::new`].

mod error;
#[allow(clippy::module_inception)]
mod parser;

pub use error::ParseError;
pub use parser::Parser;
