//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer for DDL that produces a stream of tokens. Keyword
//! lookup, identifier quoting and type-cast operators come from the
//! [`Dialect`](crate::dialect::Dialect) passed to [`Lexer::new`].

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
