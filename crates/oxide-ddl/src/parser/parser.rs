//! DDL parser implementation.

use tracing::trace;

use super::error::ParseError;
use crate::ast::{
    naming, AlterColumnAction, AlterTableAction, AlterTableStatement, Column, ColumnIdent,
    Constraint, CreateIndexStatement, CreateTableStatement, DataType, Ddl, Default,
    DropIndexStatement, DropTableStatement, Expr, Ident, ObjectName, ReferentialAction,
    SortOrder, Statement, TableOption,
};
use crate::dialect::{Dialect, UniqueStyle};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// Maximum parenthesis nesting inside DEFAULT, CHECK and WHERE bodies.
const MAX_EXPR_DEPTH: usize = 64;

/// Where an expression body ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprEnd {
    /// A column `DEFAULT`: ends at the next column clause, `,` or `)`.
    ColumnDefault,
    /// Runs to the end of the statement (`SET DEFAULT`, index `WHERE`).
    Statement,
    /// A parenthesised body (`CHECK (...)`): ends at the closing `)`.
    Paren,
}

/// DDL parser.
///
/// Reads `CREATE TABLE`, `CREATE [UNIQUE] INDEX`, `ALTER TABLE`,
/// `DROP TABLE` and `DROP INDEX` statements with two tokens of lookahead
/// and no backtracking. The first mismatch is returned as a [`ParseError`].
pub struct Parser<'a> {
    input: &'a str,
    dialect: &'a dyn Dialect,
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str, dialect: &'a dyn Dialect) -> Self {
        let mut lexer = Lexer::new(input, dialect);
        let current = next_significant(&mut lexer);
        let peek = next_significant(&mut lexer);
        Self {
            input,
            dialect,
            lexer,
            current,
            peek,
        }
    }

    /// Parses the whole input into a list of statements.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` for the first token that does not fit the
    /// grammar, including illegal characters and unterminated literals.
    pub fn parse(&mut self) -> Result<Ddl, ParseError> {
        let mut statements = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::Keyword(Keyword::Create) => {
                    statements.push(self.parse_create()?);
                    self.expect_statement_end()?;
                }
                TokenKind::Keyword(Keyword::Alter) => {
                    statements.extend(self.parse_alter_table()?);
                    self.expect_statement_end()?;
                }
                TokenKind::Keyword(Keyword::Drop) => {
                    statements.push(self.parse_drop()?);
                    self.expect_statement_end()?;
                }
                _ => return Err(self.error("CREATE, ALTER or DROP", "statement")),
            }
        }
        Ok(Ddl::new(statements))
    }

    // ===================================================================
    // Token helpers
    // ===================================================================

    fn advance(&mut self) -> Token {
        let next = next_significant(&mut self.lexer);
        let peek = core::mem::replace(&mut self.peek, next);
        core::mem::replace(&mut self.current, peek)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    /// Returns true if the current token is the bare word `word`.
    fn check_word(&self, word: &str) -> bool {
        self.current.kind == TokenKind::Identifier
            && self.current.literal.eq_ignore_ascii_case(word)
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        self.consume(TokenKind::Keyword(keyword))
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        expected: &str,
        context: &'static str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected, context))
        }
    }

    fn expect_keyword(
        &mut self,
        keyword: Keyword,
        context: &'static str,
    ) -> Result<(), ParseError> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(keyword.as_str(), context))
        }
    }

    fn expect_word(&mut self, word: &str, context: &'static str) -> Result<(), ParseError> {
        if self.check_word(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(word, context))
        }
    }

    fn expect_statement_end(&self) -> Result<(), ParseError> {
        if self.check(TokenKind::Semicolon) || self.check(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.error("`;`", "statement"))
        }
    }

    fn error(&self, expected: impl Into<String>, context: &'static str) -> ParseError {
        ParseError::unexpected(expected, &self.current, context, self.input)
    }

    fn parse_ident(&mut self, context: &'static str) -> Result<Ident, ParseError> {
        match self.current.kind {
            TokenKind::Identifier => Ok(Ident::new(self.advance().literal)),
            TokenKind::QuotedIdentifier(quote) => {
                Ok(Ident::from_quoted_literal(&self.advance().literal, quote))
            }
            TokenKind::Keyword(kw) if !kw.is_reserved() => Ok(Ident::new(self.advance().literal)),
            _ => Err(self.error("identifier", context)),
        }
    }

    fn parse_object_name(&mut self, context: &'static str) -> Result<ObjectName, ParseError> {
        let first = self.parse_ident(context)?;
        if self.consume(TokenKind::Dot) {
            let name = self.parse_ident(context)?;
            Ok(ObjectName::qualified(first, name))
        } else {
            Ok(ObjectName::new(first))
        }
    }

    fn parse_if_not_exists(&mut self, context: &'static str) -> Result<bool, ParseError> {
        if self.consume_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Not, context)?;
            self.expect_keyword(Keyword::Exists, context)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self, context: &'static str) -> Result<bool, ParseError> {
        if self.consume_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Exists, context)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ===================================================================
    // CREATE
    // ===================================================================

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Create, "statement")?;
        if self.consume_keyword(Keyword::Unique) {
            self.expect_keyword(Keyword::Index, "CREATE INDEX")?;
            return self.parse_create_index(true);
        }
        if self.consume_keyword(Keyword::Index) {
            return self.parse_create_index(false);
        }
        if self.consume_keyword(Keyword::Table) {
            return self.parse_create_table();
        }
        Err(self.error("TABLE or INDEX", "CREATE statement"))
    }

    fn parse_create_table(&mut self) -> Result<Statement, ParseError> {
        const CONTEXT: &str = "CREATE TABLE";

        let if_not_exists = self.parse_if_not_exists(CONTEXT)?;
        let name = self.parse_object_name("table name")?;
        self.expect(TokenKind::LeftParen, "`(`", CONTEXT)?;

        let mut columns = Vec::new();
        let mut constraints = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if self.starts_table_constraint() {
                    constraints.push(self.parse_table_constraint(&name)?);
                } else {
                    columns.push(self.parse_column_def(&name, &mut constraints)?);
                }
                if !self.consume(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "`,` or `)`", CONTEXT)?;
        let options = self.parse_table_options()?;

        force_primary_key_not_null(&mut columns, &constraints);

        trace!(
            table = %name,
            columns = columns.len(),
            constraints = constraints.len(),
            "parsed CREATE TABLE"
        );
        Ok(Statement::CreateTable(CreateTableStatement {
            if_not_exists,
            name,
            columns,
            constraints,
            options,
        }))
    }

    fn parse_create_index(&mut self, unique: bool) -> Result<Statement, ParseError> {
        const CONTEXT: &str = "CREATE INDEX";

        let if_not_exists = self.parse_if_not_exists(CONTEXT)?;
        let name = self.parse_object_name("index name")?;
        self.expect_keyword(Keyword::On, CONTEXT)?;
        let table = self.parse_object_name("table name")?;
        let using = if self.consume_keyword(Keyword::Using) {
            Some(self.parse_ident("index method")?)
        } else {
            None
        };
        let columns = self.parse_column_list("index columns")?;
        let predicate = if self.consume_keyword(Keyword::Where) {
            Some(self.parse_expr(ExprEnd::Statement, "index predicate")?.0)
        } else {
            None
        };

        Ok(Statement::CreateIndex(CreateIndexStatement {
            unique,
            if_not_exists,
            name,
            table,
            using,
            columns,
            predicate,
        }))
    }

    fn starts_table_constraint(&self) -> bool {
        match self.current.as_keyword() {
            Some(
                Keyword::Constraint
                | Keyword::Primary
                | Keyword::Foreign
                | Keyword::Unique
                | Keyword::Check,
            ) => true,
            Some(Keyword::Index | Keyword::Key) => self.dialect.supports_inline_index(),
            _ => false,
        }
    }

    /// Parses a column definition. Inline constraints are appended to
    /// `constraints`, named or with a derived name.
    fn parse_column_def(
        &mut self,
        table: &ObjectName,
        constraints: &mut Vec<Constraint>,
    ) -> Result<Column, ParseError> {
        const CONTEXT: &str = "column definition";
        let dialect = self.dialect;

        let name = self.parse_ident(CONTEXT)?;
        let data_type = self.parse_data_type()?;
        let mut column = Column::new(name, data_type);

        loop {
            let constraint_name = if self.consume_keyword(Keyword::Constraint) {
                Some(self.parse_ident("constraint name")?)
            } else {
                None
            };

            match self.current.as_keyword() {
                // Nullability, defaults and AUTO_INCREMENT are column
                // attributes and have no name to keep.
                Some(Keyword::Not | Keyword::Null | Keyword::Default | Keyword::AutoIncrement)
                    if constraint_name.is_some() =>
                {
                    return Err(self.error(
                        "PRIMARY KEY, UNIQUE, REFERENCES or CHECK",
                        "column constraint",
                    ));
                }
                Some(Keyword::Not) => {
                    self.advance();
                    self.expect_keyword(Keyword::Null, CONTEXT)?;
                    column.not_null = true;
                }
                Some(Keyword::Null) => {
                    self.advance();
                    column.not_null = false;
                }
                Some(Keyword::Default) => {
                    self.advance();
                    let (value, _) = self.parse_expr(ExprEnd::ColumnDefault, "DEFAULT expression")?;
                    column.default = Some(Default::new(value));
                }
                Some(Keyword::AutoIncrement) => {
                    self.advance();
                    column.auto_increment = true;
                }
                Some(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key, CONTEXT)?;
                    constraints.push(Constraint::PrimaryKey {
                        name: constraint_name
                            .unwrap_or_else(|| naming::primary_key(table, dialect)),
                        columns: vec![ColumnIdent::new(column.name.clone())],
                    });
                }
                Some(Keyword::Unique) => {
                    self.advance();
                    self.consume_keyword(Keyword::Key);
                    let columns = vec![ColumnIdent::new(column.name.clone())];
                    constraints.push(self.unique_constraint(constraint_name, table, columns));
                }
                Some(Keyword::References) => {
                    let columns = vec![ColumnIdent::new(column.name.clone())];
                    constraints.push(self.parse_references(constraint_name, table, columns)?);
                }
                Some(Keyword::Check) => {
                    self.advance();
                    let (expr, _) = self.parse_paren_expr("CHECK constraint")?;
                    let name = constraint_name.unwrap_or_else(|| {
                        naming::check(table, Some(column.name.name.as_str()), dialect)
                    });
                    constraints.push(Constraint::Check { name, expr });
                }
                _ => {
                    if constraint_name.is_some() {
                        return Err(self.error(
                            "PRIMARY KEY, UNIQUE, REFERENCES or CHECK",
                            "column constraint",
                        ));
                    }
                    break;
                }
            }
        }

        Ok(column)
    }

    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        const CONTEXT: &str = "data type";

        let mut name = match self.current.kind {
            TokenKind::QuotedIdentifier(_) => self.advance().literal,
            TokenKind::Identifier => self.advance().literal.to_ascii_uppercase(),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                self.advance().literal.to_ascii_uppercase()
            }
            _ => return Err(self.error("data type", CONTEXT)),
        };
        if self.consume(TokenKind::Dot) {
            let part = self.parse_ident(CONTEXT)?;
            name = format!("{name}.{}", part.raw);
        }

        match name.as_str() {
            "DOUBLE" if self.check_word("PRECISION") => {
                self.advance();
                name.push_str(" PRECISION");
            }
            "CHARACTER" | "CHAR" | "BIT" if self.check_word("VARYING") => {
                self.advance();
                name.push_str(" VARYING");
            }
            _ => {}
        }

        let params = if self.check(TokenKind::LeftParen) {
            self.parse_type_params()?
        } else {
            Vec::new()
        };

        let mut suffix = Vec::new();
        if matches!(name.as_str(), "TIME" | "TIMESTAMP")
            && (self.check_word("WITH") || self.check_word("WITHOUT"))
        {
            let with = self.advance().literal.to_ascii_uppercase();
            self.expect_word("TIME", CONTEXT)?;
            self.expect_word("ZONE", CONTEXT)?;
            suffix.push(format!("{with} TIME ZONE"));
        }
        let type_suffixes = self.dialect.type_suffixes();
        while let Some(word) = type_suffixes.iter().find(|word| self.check_word(word)) {
            self.advance();
            suffix.push((*word).to_string());
        }

        let mut array_dims = 0;
        if self.dialect.supports_array_types() {
            while self.consume(TokenKind::LeftBracket) {
                self.consume(TokenKind::Number);
                self.expect(TokenKind::RightBracket, "`]`", CONTEXT)?;
                array_dims += 1;
            }
        }

        Ok(DataType {
            name,
            params,
            suffix: if suffix.is_empty() {
                None
            } else {
                Some(suffix.join(" "))
            },
            array_dims,
        })
    }

    fn parse_type_params(&mut self) -> Result<Vec<Ident>, ParseError> {
        const CONTEXT: &str = "type parameters";

        self.expect(TokenKind::LeftParen, "`(`", CONTEXT)?;
        let mut params = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::Number | TokenKind::String | TokenKind::Identifier => {
                    params.push(Ident::new(self.advance().literal));
                }
                _ => return Err(self.error("type parameter", CONTEXT)),
            }
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen, "`,` or `)`", CONTEXT)?;
        Ok(params)
    }

    fn parse_column_list(&mut self, context: &'static str) -> Result<Vec<ColumnIdent>, ParseError> {
        self.expect(TokenKind::LeftParen, "`(`", context)?;
        let mut columns = Vec::new();
        loop {
            let ident = self.parse_ident(context)?;
            let order = if self.consume_keyword(Keyword::Desc) {
                SortOrder::Desc
            } else {
                self.consume_keyword(Keyword::Asc);
                SortOrder::Asc
            };
            columns.push(ColumnIdent { ident, order });
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen, "`,` or `)`", context)?;
        Ok(columns)
    }

    // ===================================================================
    // Constraints
    // ===================================================================

    fn parse_table_constraint(&mut self, table: &ObjectName) -> Result<Constraint, ParseError> {
        const CONTEXT: &str = "table constraint";
        let dialect = self.dialect;

        let name = if self.consume_keyword(Keyword::Constraint) {
            Some(self.parse_ident("constraint name")?)
        } else {
            None
        };

        match self.current.as_keyword() {
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key, CONTEXT)?;
                let columns = self.parse_column_list("PRIMARY KEY")?;
                Ok(Constraint::PrimaryKey {
                    name: name.unwrap_or_else(|| naming::primary_key(table, dialect)),
                    columns,
                })
            }
            Some(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key, CONTEXT)?;
                let columns = self.parse_column_list("FOREIGN KEY")?;
                self.parse_references(name, table, columns)
            }
            Some(Keyword::Unique) => {
                self.advance();
                let index_form =
                    self.consume_keyword(Keyword::Key) || self.consume_keyword(Keyword::Index);
                let index_name = if index_form && !self.check(TokenKind::LeftParen) {
                    Some(self.parse_ident("index name")?)
                } else {
                    None
                };
                let columns = self.parse_column_list("UNIQUE")?;
                Ok(self.unique_constraint(name.or(index_name), table, columns))
            }
            Some(Keyword::Check) => {
                self.advance();
                let (expr, first_column) = self.parse_paren_expr("CHECK constraint")?;
                let name =
                    name.unwrap_or_else(|| naming::check(table, first_column.as_deref(), dialect));
                Ok(Constraint::Check { name, expr })
            }
            Some(Keyword::Index | Keyword::Key) if dialect.supports_inline_index() => {
                let keyword = self.advance();
                let (index_name, columns) = self.parse_inline_index().map_err(|mut e| {
                    e.message = format!(
                        "{}; a column named `{}` must be quoted",
                        e.message, keyword.literal
                    );
                    e
                })?;
                let name = name
                    .or(index_name)
                    .unwrap_or_else(|| naming::index(table, &columns, dialect));
                Ok(Constraint::Index {
                    name,
                    unique: false,
                    columns,
                })
            }
            _ => Err(self.error("PRIMARY KEY, FOREIGN KEY, UNIQUE or CHECK", CONTEXT)),
        }
    }

    /// `[name] (cols)` after `INDEX` or `KEY` in a table body.
    fn parse_inline_index(&mut self) -> Result<(Option<Ident>, Vec<ColumnIdent>), ParseError> {
        let index_name = if self.check(TokenKind::LeftParen) {
            None
        } else {
            Some(self.parse_ident("index name")?)
        };
        let columns = self.parse_column_list("INDEX")?;
        Ok((index_name, columns))
    }

    /// Builds a `UNIQUE` constraint in the dialect's representation.
    fn unique_constraint(
        &self,
        name: Option<Ident>,
        table: &ObjectName,
        columns: Vec<ColumnIdent>,
    ) -> Constraint {
        let name = name.unwrap_or_else(|| naming::unique(table, &columns, self.dialect));
        match self.dialect.unique_style() {
            UniqueStyle::Constraint => Constraint::Unique { name, columns },
            UniqueStyle::Index => Constraint::Index {
                name,
                unique: true,
                columns,
            },
        }
    }

    fn parse_references(
        &mut self,
        name: Option<Ident>,
        table: &ObjectName,
        columns: Vec<ColumnIdent>,
    ) -> Result<Constraint, ParseError> {
        const CONTEXT: &str = "REFERENCES clause";

        self.expect_keyword(Keyword::References, CONTEXT)?;
        let ref_table = self.parse_object_name("referenced table")?;
        let ref_columns = if self.check(TokenKind::LeftParen) {
            self.parse_column_list("referenced columns")?
        } else {
            Vec::new()
        };

        let mut on_delete = None;
        let mut on_update = None;
        while self.consume_keyword(Keyword::On) {
            if self.consume_keyword(Keyword::Delete) {
                on_delete = Some(self.parse_referential_action()?);
            } else if self.consume_keyword(Keyword::Update) {
                on_update = Some(self.parse_referential_action()?);
            } else {
                return Err(self.error("DELETE or UPDATE", CONTEXT));
            }
        }

        let name = name.unwrap_or_else(|| naming::foreign_key(table, &columns, self.dialect));
        Ok(Constraint::ForeignKey {
            name,
            columns,
            ref_table,
            ref_columns,
            on_delete,
            on_update,
        })
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, ParseError> {
        const CONTEXT: &str = "referential action";

        match self.current.as_keyword() {
            Some(Keyword::Cascade) => {
                self.advance();
                Ok(ReferentialAction::Cascade)
            }
            Some(Keyword::Restrict) => {
                self.advance();
                Ok(ReferentialAction::Restrict)
            }
            Some(Keyword::No) => {
                self.advance();
                self.expect_keyword(Keyword::Action, CONTEXT)?;
                Ok(ReferentialAction::NoAction)
            }
            Some(Keyword::Set) => {
                self.advance();
                if self.consume_keyword(Keyword::Null) {
                    Ok(ReferentialAction::SetNull)
                } else if self.consume_keyword(Keyword::Default) {
                    Ok(ReferentialAction::SetDefault)
                } else {
                    Err(self.error("NULL or DEFAULT", CONTEXT))
                }
            }
            _ => Err(self.error(
                "CASCADE, RESTRICT, NO ACTION, SET NULL or SET DEFAULT",
                CONTEXT,
            )),
        }
    }

    // ===================================================================
    // Expressions and table options
    // ===================================================================

    fn parse_paren_expr(
        &mut self,
        context: &'static str,
    ) -> Result<(Expr, Option<String>), ParseError> {
        self.expect(TokenKind::LeftParen, "`(`", context)?;
        let body = self.parse_expr(ExprEnd::Paren, context)?;
        self.expect(TokenKind::RightParen, "`)`", context)?;
        Ok(body)
    }

    /// Collects an expression body as a token list. Also returns the first
    /// bare identifier that is not a function name, used to name unnamed
    /// CHECK constraints.
    fn parse_expr(
        &mut self,
        end: ExprEnd,
        context: &'static str,
    ) -> Result<(Expr, Option<String>), ParseError> {
        let mut tokens = Vec::new();
        let mut first_column = None;
        let mut depth = 0usize;

        loop {
            let top = depth == 0;
            match self.current.kind {
                TokenKind::Eof | TokenKind::Semicolon if end == ExprEnd::Paren => {
                    return Err(self.error("`)`", context));
                }
                TokenKind::Eof | TokenKind::Semicolon => break,
                TokenKind::Illegal => return Err(self.error("expression", context)),
                TokenKind::RightParen if top => break,
                TokenKind::Comma if top && end != ExprEnd::Paren => break,
                TokenKind::Keyword(kw)
                    if top
                        && end == ExprEnd::ColumnDefault
                        && !tokens.is_empty()
                        && self.ends_column_default(kw) =>
                {
                    break;
                }
                TokenKind::LeftParen | TokenKind::LeftBracket => {
                    depth += 1;
                    if depth > MAX_EXPR_DEPTH {
                        return Err(ParseError::new(
                            format!("expression nesting exceeds {MAX_EXPR_DEPTH} levels"),
                            context,
                            self.current.span,
                            self.input,
                        ));
                    }
                }
                TokenKind::RightParen | TokenKind::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }

            let token = self.advance();
            let keyword = match token.kind {
                TokenKind::Identifier => Expr::keyword(&token.literal),
                _ => None,
            };
            let ident = match (token.kind, keyword) {
                (TokenKind::Keyword(kw), _) => Ident::new(kw.as_str()),
                (_, Some(word)) => Ident::new(word),
                (TokenKind::QuotedIdentifier(quote), None) => {
                    Ident::from_quoted_literal(&token.literal, quote)
                }
                _ => Ident::new(token.literal),
            };
            let is_name = keyword.is_none()
                && matches!(
                    token.kind,
                    TokenKind::Identifier | TokenKind::QuotedIdentifier(_)
                );
            if is_name && first_column.is_none() && !self.check(TokenKind::LeftParen) {
                first_column = Some(ident.name.clone());
            }
            tokens.push(ident);
        }

        if tokens.is_empty() {
            return Err(self.error("expression", context));
        }
        Ok((Expr::new(tokens), first_column))
    }

    /// Column clause keywords that end a `DEFAULT` expression.
    fn ends_column_default(&self, keyword: Keyword) -> bool {
        match keyword {
            Keyword::Not => self.peek.kind == TokenKind::Keyword(Keyword::Null),
            Keyword::Null
            | Keyword::Default
            | Keyword::Constraint
            | Keyword::Primary
            | Keyword::Unique
            | Keyword::References
            | Keyword::Check
            | Keyword::AutoIncrement => true,
            _ => false,
        }
    }

    /// Parses trailing table options such as `ENGINE=InnoDB` or
    /// `TABLESPACE fast`. Multi-word option names are matched word by word,
    /// longest first.
    fn parse_table_options(&mut self) -> Result<Vec<TableOption>, ParseError> {
        const CONTEXT: &str = "table options";
        let known = self.dialect.table_options();

        let mut options = Vec::new();
        loop {
            let mut name = String::new();
            while let Some(word) = self.option_word() {
                let candidate = if name.is_empty() {
                    word
                } else {
                    format!("{name} {word}")
                };
                let prefix = format!("{candidate} ");
                if known
                    .iter()
                    .any(|option| *option == candidate || option.starts_with(&prefix))
                {
                    self.advance();
                    name = candidate;
                } else {
                    break;
                }
            }
            if name.is_empty() {
                break;
            }
            if !known.contains(&name.as_str()) {
                return Err(self.error("table option", CONTEXT));
            }

            let equals = self.consume(TokenKind::Eq);
            let value = match self.current.kind {
                TokenKind::QuotedIdentifier(quote) => {
                    Ident::from_quoted_literal(&self.advance().literal, quote)
                }
                TokenKind::Identifier
                | TokenKind::Keyword(_)
                | TokenKind::Number
                | TokenKind::String => Ident::new(self.advance().literal),
                _ => return Err(self.error("option value", CONTEXT)),
            };
            options.push(TableOption {
                name,
                value,
                equals,
            });
            self.consume(TokenKind::Comma);
        }
        Ok(options)
    }

    fn option_word(&self) -> Option<String> {
        match self.current.kind {
            TokenKind::Identifier | TokenKind::Keyword(_) => {
                Some(self.current.literal.to_ascii_uppercase())
            }
            _ => None,
        }
    }

    // ===================================================================
    // ALTER / DROP
    // ===================================================================

    /// Parses `ALTER TABLE`. Comma-separated actions, and constraints
    /// declared inline on an added column, become one statement each.
    fn parse_alter_table(&mut self) -> Result<Vec<Statement>, ParseError> {
        const CONTEXT: &str = "ALTER TABLE";

        self.expect_keyword(Keyword::Alter, "statement")?;
        self.expect_keyword(Keyword::Table, CONTEXT)?;
        let name = self.parse_object_name("table name")?;

        let mut statements = Vec::new();
        loop {
            for action in self.parse_alter_action(&name)? {
                statements.push(Statement::AlterTable(AlterTableStatement {
                    name: name.clone(),
                    action,
                }));
            }
            if !self.consume(TokenKind::Comma) {
                break;
            }
        }
        Ok(statements)
    }

    fn parse_alter_action(
        &mut self,
        table: &ObjectName,
    ) -> Result<Vec<AlterTableAction>, ParseError> {
        const CONTEXT: &str = "ALTER TABLE action";

        match self.current.as_keyword() {
            Some(Keyword::Add) => {
                self.advance();
                if self.consume_keyword(Keyword::Column) || !self.starts_table_constraint() {
                    return self.parse_added_column(table);
                }
                let constraint = self.parse_table_constraint(table)?;
                let not_valid = self.parse_not_valid();
                Ok(vec![AlterTableAction::AddConstraint {
                    constraint,
                    not_valid,
                }])
            }
            Some(Keyword::Drop) => {
                self.advance();
                if self.consume_keyword(Keyword::Column) {
                    let name = self.parse_ident("column name")?;
                    Ok(vec![AlterTableAction::DropColumn { name }])
                } else if self.consume_keyword(Keyword::Constraint) {
                    let name = self.parse_ident("constraint name")?;
                    Ok(vec![AlterTableAction::DropConstraint { name }])
                } else {
                    Err(self.error("COLUMN or CONSTRAINT", CONTEXT))
                }
            }
            Some(Keyword::Alter) => {
                self.advance();
                self.consume_keyword(Keyword::Column);
                let name = self.parse_ident("column name")?;
                let action = self.parse_alter_column_action()?;
                Ok(vec![AlterTableAction::AlterColumn { name, action }])
            }
            Some(Keyword::Modify) => {
                self.advance();
                self.consume_keyword(Keyword::Column);
                let start = self.current.span;
                let mut inline = Vec::new();
                let column = self.parse_column_def(table, &mut inline)?;
                if !inline.is_empty() {
                    return Err(ParseError::new(
                        "MODIFY COLUMN cannot declare constraints",
                        CONTEXT,
                        start,
                        self.input,
                    ));
                }
                Ok(vec![AlterTableAction::ModifyColumn(column)])
            }
            Some(Keyword::Rename) => {
                self.advance();
                if self.consume_keyword(Keyword::To) {
                    let to = self.parse_ident("table name")?;
                    Ok(vec![AlterTableAction::RenameTable { to }])
                } else if self.consume_keyword(Keyword::Column) {
                    let from = self.parse_ident("column name")?;
                    self.expect_keyword(Keyword::To, CONTEXT)?;
                    let to = self.parse_ident("column name")?;
                    Ok(vec![AlterTableAction::RenameColumn { from, to }])
                } else if self.consume_keyword(Keyword::Constraint) {
                    let from = self.parse_ident("constraint name")?;
                    self.expect_keyword(Keyword::To, CONTEXT)?;
                    let to = self.parse_ident("constraint name")?;
                    Ok(vec![AlterTableAction::RenameConstraint { from, to }])
                } else {
                    Err(self.error("TO, COLUMN or CONSTRAINT", CONTEXT))
                }
            }
            _ => Err(self.error("ADD, DROP, ALTER, MODIFY or RENAME", CONTEXT)),
        }
    }

    fn parse_added_column(
        &mut self,
        table: &ObjectName,
    ) -> Result<Vec<AlterTableAction>, ParseError> {
        let mut constraints = Vec::new();
        let mut column = self.parse_column_def(table, &mut constraints)?;
        if constraints
            .iter()
            .any(|c| matches!(c, Constraint::PrimaryKey { .. }))
        {
            column.not_null = true;
        }

        let mut actions = vec![AlterTableAction::AddColumn(column)];
        actions.extend(
            constraints
                .into_iter()
                .map(|constraint| AlterTableAction::AddConstraint {
                    constraint,
                    not_valid: false,
                }),
        );
        Ok(actions)
    }

    fn parse_not_valid(&mut self) -> bool {
        if self.check_keyword(Keyword::Not) && self.peek.kind == TokenKind::Keyword(Keyword::Valid)
        {
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_alter_column_action(&mut self) -> Result<AlterColumnAction, ParseError> {
        const CONTEXT: &str = "ALTER COLUMN";

        match self.current.as_keyword() {
            Some(Keyword::Set) => {
                self.advance();
                if self.consume_keyword(Keyword::Data) {
                    self.expect_keyword(Keyword::Type, CONTEXT)?;
                    Ok(AlterColumnAction::SetDataType(self.parse_data_type()?))
                } else if self.consume_keyword(Keyword::Default) {
                    let (value, _) = self.parse_expr(ExprEnd::Statement, "SET DEFAULT")?;
                    Ok(AlterColumnAction::SetDefault(Default::new(value)))
                } else if self.consume_keyword(Keyword::Not) {
                    self.expect_keyword(Keyword::Null, CONTEXT)?;
                    Ok(AlterColumnAction::SetNotNull)
                } else {
                    Err(self.error("DATA TYPE, DEFAULT or NOT NULL", CONTEXT))
                }
            }
            Some(Keyword::Type) => {
                self.advance();
                Ok(AlterColumnAction::SetDataType(self.parse_data_type()?))
            }
            Some(Keyword::Drop) => {
                self.advance();
                if self.consume_keyword(Keyword::Default) {
                    Ok(AlterColumnAction::DropDefault)
                } else if self.consume_keyword(Keyword::Not) {
                    self.expect_keyword(Keyword::Null, CONTEXT)?;
                    Ok(AlterColumnAction::DropNotNull)
                } else {
                    Err(self.error("DEFAULT or NOT NULL", CONTEXT))
                }
            }
            _ => Err(self.error("SET, TYPE or DROP", CONTEXT)),
        }
    }

    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Drop, "statement")?;

        if self.consume_keyword(Keyword::Table) {
            let if_exists = self.parse_if_exists("DROP TABLE")?;
            let name = self.parse_object_name("table name")?;
            return Ok(Statement::DropTable(DropTableStatement { if_exists, name }));
        }
        if self.consume_keyword(Keyword::Index) {
            let if_exists = self.parse_if_exists("DROP INDEX")?;
            let name = self.parse_object_name("index name")?;
            let table = if self.consume_keyword(Keyword::On) {
                Some(self.parse_object_name("table name")?)
            } else {
                None
            };
            return Ok(Statement::DropIndex(DropIndexStatement {
                if_exists,
                name,
                table,
            }));
        }
        Err(self.error("TABLE or INDEX", "DROP statement"))
    }
}

/// Returns the next token that is not a comment.
fn next_significant(lexer: &mut Lexer<'_>) -> Token {
    loop {
        let token = lexer.next_token();
        if token.kind != TokenKind::Comment {
            trace!(kind = ?token.kind, literal = %token.literal, "token");
            return token;
        }
    }
}

/// Primary key columns are implicitly `NOT NULL`.
fn force_primary_key_not_null(columns: &mut [Column], constraints: &[Constraint]) {
    for constraint in constraints {
        if let Constraint::PrimaryKey { columns: key, .. } = constraint {
            for column in columns.iter_mut() {
                if key.iter().any(|k| k.ident.name == column.name.name) {
                    column.not_null = true;
                }
            }
        }
    }
}
