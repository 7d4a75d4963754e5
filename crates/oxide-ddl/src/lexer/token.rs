//! Token types for the DDL lexer.

use core::fmt;

use super::Span;

/// SQL keywords recognised by the DDL grammar.
///
/// Data type names are deliberately absent: they are scanned as plain
/// identifiers and interpreted by the parser, so user-defined types and
/// dialect-specific spellings need no keyword entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Verbs
    Create,
    Alter,
    Drop,
    Add,
    Rename,
    Modify,

    // Objects
    Table,
    Index,
    Column,
    Constraint,

    // Constraints
    Primary,
    Foreign,
    Key,
    References,
    Unique,
    Check,
    Default,
    Not,
    Null,
    Valid,
    AutoIncrement,

    // Referential actions
    On,
    Delete,
    Update,
    Cascade,
    Restrict,
    No,
    Action,
    Set,

    // Clauses
    If,
    Exists,
    Asc,
    Desc,
    Using,
    Where,
    To,
    Data,
    Type,
}

impl Keyword {
    /// Looks up a keyword, ignoring ASCII case.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "ALTER" => Some(Self::Alter),
            "DROP" => Some(Self::Drop),
            "ADD" => Some(Self::Add),
            "RENAME" => Some(Self::Rename),
            "MODIFY" => Some(Self::Modify),
            "TABLE" => Some(Self::Table),
            "INDEX" => Some(Self::Index),
            "COLUMN" => Some(Self::Column),
            "CONSTRAINT" => Some(Self::Constraint),
            "PRIMARY" => Some(Self::Primary),
            "FOREIGN" => Some(Self::Foreign),
            "KEY" => Some(Self::Key),
            "REFERENCES" => Some(Self::References),
            "UNIQUE" => Some(Self::Unique),
            "CHECK" => Some(Self::Check),
            "DEFAULT" => Some(Self::Default),
            "NOT" => Some(Self::Not),
            "NULL" => Some(Self::Null),
            "VALID" => Some(Self::Valid),
            "AUTO_INCREMENT" => Some(Self::AutoIncrement),
            "ON" => Some(Self::On),
            "DELETE" => Some(Self::Delete),
            "UPDATE" => Some(Self::Update),
            "CASCADE" => Some(Self::Cascade),
            "RESTRICT" => Some(Self::Restrict),
            "NO" => Some(Self::No),
            "ACTION" => Some(Self::Action),
            "SET" => Some(Self::Set),
            "IF" => Some(Self::If),
            "EXISTS" => Some(Self::Exists),
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            "USING" => Some(Self::Using),
            "WHERE" => Some(Self::Where),
            "TO" => Some(Self::To),
            "DATA" => Some(Self::Data),
            "TYPE" => Some(Self::Type),
            _ => None,
        }
    }

    /// Canonical upper-case spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Add => "ADD",
            Self::Rename => "RENAME",
            Self::Modify => "MODIFY",
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::Column => "COLUMN",
            Self::Constraint => "CONSTRAINT",
            Self::Primary => "PRIMARY",
            Self::Foreign => "FOREIGN",
            Self::Key => "KEY",
            Self::References => "REFERENCES",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::Default => "DEFAULT",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::Valid => "VALID",
            Self::AutoIncrement => "AUTO_INCREMENT",
            Self::On => "ON",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::No => "NO",
            Self::Action => "ACTION",
            Self::Set => "SET",
            Self::If => "IF",
            Self::Exists => "EXISTS",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Using => "USING",
            Self::Where => "WHERE",
            Self::To => "TO",
            Self::Data => "DATA",
            Self::Type => "TYPE",
        }
    }

    /// Returns true if the keyword can never be used as a bare identifier.
    ///
    /// Everything else may double as a table, column or type name wherever
    /// the grammar expects one (`type TEXT`, `data JSONB`). In dialects with
    /// inline indexes, `KEY` and `INDEX` at the start of a table element
    /// still open an index, so such columns must be quoted there.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::Create
                | Self::Alter
                | Self::Drop
                | Self::Table
                | Self::Constraint
                | Self::Primary
                | Self::Foreign
                | Self::References
                | Self::Unique
                | Self::Check
                | Self::Default
                | Self::Not
                | Self::Null
                | Self::On
                | Self::Using
                | Self::Where
        )
    }

    /// Returns true if only some dialects treat this word as a keyword.
    #[must_use]
    pub const fn is_dialect_specific(&self) -> bool {
        matches!(self, Self::Modify | Self::AutoIncrement | Self::Valid)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token classification produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// SQL keyword.
    Keyword(Keyword),
    /// Bare identifier (e.g. `users`, `varchar`).
    Identifier,
    /// Quoted identifier; carries the quote character.
    QuotedIdentifier(char),
    /// String literal (e.g. `'hello'`).
    String,
    /// Numeric literal (e.g. `42`, `3.14`, `1e10`).
    Number,

    // Operators
    /// `=`
    Eq,
    /// `!=` or `<>`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `||`
    Concat,
    /// `::`
    DoubleColon,
    /// `:::`
    TripleColon,
    /// `:`
    Colon,

    // Delimiters
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,

    // Special
    /// `-- ...` or `/* ... */` comment.
    Comment,
    /// End of input.
    Eof,
    /// Unknown character or unterminated literal.
    Illegal,
}

impl TokenKind {
    /// Returns true for type-cast operators (`::`, `:::`).
    #[must_use]
    pub const fn is_cast(&self) -> bool {
        matches!(self, Self::DoubleColon | Self::TripleColon)
    }

    /// Returns true for tokens that can start or continue an expression
    /// as an operator.
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::NotEq
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
                | Self::Plus
                | Self::Minus
                | Self::Star
                | Self::Slash
                | Self::Percent
                | Self::Concat
                | Self::DoubleColon
                | Self::TripleColon
                | Self::Colon
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(kw) => write!(f, "keyword {kw}"),
            Self::Identifier | Self::QuotedIdentifier(_) => f.write_str("identifier"),
            Self::String => f.write_str("string literal"),
            Self::Number => f.write_str("number"),
            Self::Comment => f.write_str("comment"),
            Self::Eof => f.write_str("end of input"),
            Self::Illegal => f.write_str("illegal token"),
            _ => f.write_str("symbol"),
        }
    }
}

/// A token with its source text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub literal: String,
    /// Byte range in the input.
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// The keyword carried by this token, if any.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Human-readable description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => String::from("end of input"),
            kind => format!("{kind} `{}`", self.literal),
        }
    }
}
