//! DDL tokenizer implementation.

use super::{Span, Token, TokenKind};
use crate::dialect::Dialect;

/// A lexer that tokenizes SQL input for one dialect.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// Keyword table, quoting and operator rules.
    dialect: &'a dyn Dialect,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str, dialect: &'a dyn Dialect) -> Self {
        Self {
            input,
            dialect,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Creates a token covering `start..pos`.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            &self.input[self.start..self.pos],
            Span::new(self.start, self.pos),
        )
    }

    fn has_cast_operator(&self, op: &str) -> bool {
        self.dialect.cast_operators().contains(&op)
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match self.dialect.keyword(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    /// Scans a quoted run up to the matching `quote`; a doubled quote is an
    /// escaped quote. The opening quote has already been consumed.
    fn scan_quoted(&mut self, quote: char, kind: TokenKind) -> Token {
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return self.make_token(kind);
                    }
                }
                Some('\\')
                    if kind == TokenKind::String && self.dialect.supports_backslash_escapes() =>
                {
                    self.advance();
                }
                Some(_) => {}
                None => return self.make_token(TokenKind::Illegal),
            }
        }
    }

    /// Scans a number (integer, decimal or exponent form).
    fn scan_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E')
            && self
                .peek_next()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        self.make_token(TokenKind::Number)
    }

    fn scan_line_comment(&mut self) -> Token {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        self.make_token(TokenKind::Comment)
    }

    fn scan_block_comment(&mut self) -> Token {
        self.advance(); // *
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return self.make_token(TokenKind::Comment);
                }
                Some(_) => {}
                None => return self.make_token(TokenKind::Illegal),
            }
        }
    }

    fn scan_colon(&mut self) -> Token {
        if self.peek() == Some(':') {
            if self.peek_next() == Some(':') && self.has_cast_operator(":::") {
                self.advance();
                self.advance();
                return self.make_token(TokenKind::TripleColon);
            }
            if self.has_cast_operator("::") {
                self.advance();
                return self.make_token(TokenKind::DoubleColon);
            }
        }
        self.make_token(TokenKind::Colon)
    }

    /// Scans the next token, including comments.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.pos = self.start;
                self.scan_number()
            }
            '.' => self.make_token(TokenKind::Dot),
            '+' => self.make_token(TokenKind::Plus),
            '*' => self.make_token(TokenKind::Star),
            '%' => self.make_token(TokenKind::Percent),
            '=' => self.make_token(TokenKind::Eq),
            '-' if self.peek() == Some('-') => self.scan_line_comment(),
            '-' => self.make_token(TokenKind::Minus),
            '/' if self.peek() == Some('*') => self.scan_block_comment(),
            '/' => self.make_token(TokenKind::Slash),
            ':' => self.scan_colon(),
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                }
                _ => self.make_token(TokenKind::Lt),
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' if self.peek() == Some('=') => {
                self.advance();
                self.make_token(TokenKind::NotEq)
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                self.make_token(TokenKind::Concat)
            }
            '\'' => self.scan_quoted('\'', TokenKind::String),
            c if self.dialect.is_identifier_quote(c) => {
                self.scan_quoted(c, TokenKind::QuotedIdentifier(c))
            }
            // Without ANSI quoting, double quotes delimit strings.
            '"' => self.scan_quoted('"', TokenKind::String),
            c if c.is_ascii_digit() => {
                self.pos = self.start;
                self.scan_number()
            }
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            _ => self.make_token(TokenKind::Illegal),
        }
    }

    /// Tokenizes the entire input, comments included, ending with `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
