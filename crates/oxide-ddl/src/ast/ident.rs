//! Identifiers and object names.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::dialect::Dialect;
use crate::lexer::Keyword;

/// An identifier as written in the source.
///
/// `raw` is what gets printed; `name` is the logical name with quotes
/// stripped and escapes resolved. Diff identity and derived constraint
/// names use `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Ident {
    /// Logical, case-preserved name.
    pub name: String,
    /// The quote character, if the identifier was quoted.
    pub quotation_mark: Option<char>,
    /// Source text, including quotes.
    pub raw: String,
}

impl Ident {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw: name.clone(),
            name,
            quotation_mark: None,
        }
    }

    /// Creates an identifier quoted with `quote`, doubling embedded quotes.
    #[must_use]
    pub fn quoted(name: impl Into<String>, quote: char) -> Self {
        let name = name.into();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        Self {
            raw: format!("{quote}{escaped}{quote}"),
            name,
            quotation_mark: Some(quote),
        }
    }

    /// Builds an identifier from a quoted token literal such as `"Order"`.
    #[must_use]
    pub fn from_quoted_literal(literal: &str, quote: char) -> Self {
        let inner = literal
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .unwrap_or(literal);
        let doubled = format!("{quote}{quote}");
        Self {
            name: inner.replace(&doubled, &quote.to_string()),
            quotation_mark: Some(quote),
            raw: literal.to_string(),
        }
    }

    /// Creates an identifier for a generated name, quoting it with the
    /// dialect's quote character when it would not lex as a bare word.
    #[must_use]
    pub fn derived(name: impl Into<String>, dialect: &dyn Dialect) -> Self {
        let name = name.into();
        if is_plain(&name, dialect) {
            Self::new(name)
        } else {
            Self::quoted(name, dialect.identifier_quote())
        }
    }

    /// Returns true if the identifier was quoted in the source.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        self.quotation_mark.is_some()
    }

    /// Returns the SQL text of the identifier.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.raw.clone()
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        self.name.clone()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Returns true if `name` can be written without quotes in `dialect`.
fn is_plain(name: &str, dialect: &dyn Dialect) -> bool {
    let starts_with_letter = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_with_letter
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !dialect.keyword(name).as_ref().is_some_and(Keyword::is_reserved)
}

/// A possibly schema-qualified name (`schema.table`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ObjectName {
    /// Optional schema qualifier.
    pub schema: Option<Ident>,
    /// The object name.
    pub name: Ident,
}

impl ObjectName {
    /// Creates an unqualified name.
    #[must_use]
    pub const fn new(name: Ident) -> Self {
        Self { schema: None, name }
    }

    /// Creates a schema-qualified name.
    #[must_use]
    pub const fn qualified(schema: Ident, name: Ident) -> Self {
        Self {
            schema: Some(schema),
            name,
        }
    }

    /// Returns the logical, unqualified name.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.name.name
    }

    /// Returns the SQL text of the name.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema.raw, self.name.raw),
            None => self.name.raw.clone(),
        }
    }

    /// Diff identity: the unqualified logical name.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        self.name.string_for_diff()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl From<Ident> for ObjectName {
    fn from(name: Ident) -> Self {
        Self::new(name)
    }
}

/// Sort order of an indexed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SortOrder {
    /// Ascending (default, never printed).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// A column reference in a key or index column list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ColumnIdent {
    /// The column.
    pub ident: Ident,
    /// Sort order.
    pub order: SortOrder,
}

impl ColumnIdent {
    /// Creates an ascending column reference.
    #[must_use]
    pub const fn new(ident: Ident) -> Self {
        Self {
            ident,
            order: SortOrder::Asc,
        }
    }

    /// Returns the SQL text, with `DESC` when descending.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self.order {
            SortOrder::Asc => self.ident.raw.clone(),
            SortOrder::Desc => format!("{} DESC", self.ident.raw),
        }
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        match self.order {
            SortOrder::Asc => self.ident.string_for_diff(),
            SortOrder::Desc => format!("{} DESC", self.ident.string_for_diff()),
        }
    }
}

/// Prints a parenthesised, comma-separated column list.
pub(crate) fn column_list_sql(columns: &[ColumnIdent]) -> String {
    let parts: Vec<String> = columns.iter().map(ColumnIdent::to_sql).collect();
    format!("({})", parts.join(", "))
}

/// Diff identity of a column list.
pub(crate) fn column_list_for_diff(columns: &[ColumnIdent]) -> String {
    let parts: Vec<String> = columns.iter().map(ColumnIdent::string_for_diff).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySqlDialect, PostgresDialect};

    #[test]
    fn test_quoted_literal_strips_and_unescapes() {
        let ident = Ident::from_quoted_literal("\"say \"\"hi\"\"\"", '"');
        assert_eq!(ident.name, "say \"hi\"");
        assert_eq!(ident.raw, "\"say \"\"hi\"\"\"");
        assert!(ident.is_quoted());
    }

    #[test]
    fn test_derived_quotes_only_when_needed() {
        assert_eq!(Ident::derived("users_pkey", &PostgresDialect).raw, "users_pkey");
        assert_eq!(
            Ident::derived("my table_pkey", &PostgresDialect).raw,
            "\"my table_pkey\""
        );
        assert_eq!(Ident::derived("my table_pkey", &MySqlDialect).raw, "`my table_pkey`");
        assert_eq!(Ident::derived("check", &PostgresDialect).raw, "\"check\"");
    }

    #[test]
    fn test_object_name_identity_ignores_schema_and_quotes() {
        let plain = ObjectName::new(Ident::new("users"));
        let qualified = ObjectName::qualified(Ident::new("public"), Ident::quoted("users", '"'));
        assert_eq!(qualified.to_sql(), "public.\"users\"");
        assert_eq!(plain.string_for_diff(), qualified.string_for_diff());
    }

    #[test]
    fn test_column_ident_omits_asc() {
        let asc = ColumnIdent::new(Ident::new("a"));
        let desc = ColumnIdent {
            ident: Ident::new("b"),
            order: SortOrder::Desc,
        };
        assert_eq!(column_list_sql(&[asc, desc]), "(a, b DESC)");
    }
}
