//! Column data types.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{Default, Ident};

/// A column data type as written, with the base name normalised to upper
/// case.
///
/// Aliases are kept apart: `INT` and `INTEGER` are different types here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DataType {
    /// Base type name, e.g. `VARCHAR`, `DOUBLE PRECISION`.
    pub name: String,
    /// Parameters inside the parentheses, e.g. `255` or `10, 2`.
    pub params: Vec<Ident>,
    /// Words after the parameter list, e.g. `WITH TIME ZONE` or `UNSIGNED`.
    pub suffix: Option<String>,
    /// Number of `[]` array dimensions.
    pub array_dims: usize,
}

impl DataType {
    /// Creates a parameterless type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            suffix: None,
            array_dims: 0,
        }
    }

    /// Adds a parameter list.
    #[must_use]
    pub fn with_params(mut self, params: Vec<Ident>) -> Self {
        self.params = params;
        self
    }

    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = self.name.clone();
        if !self.params.is_empty() {
            let params: Vec<&str> = self.params.iter().map(|p| p.raw.as_str()).collect();
            sql.push('(');
            sql.push_str(&params.join(", "));
            sql.push(')');
        }
        if let Some(suffix) = &self.suffix {
            sql.push(' ');
            sql.push_str(suffix);
        }
        for _ in 0..self.array_dims {
            sql.push_str("[]");
        }
        sql
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        self.to_sql()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Column {
    /// Column name.
    pub name: Ident,
    /// Data type.
    pub data_type: DataType,
    /// Whether the column is `NOT NULL`.
    pub not_null: bool,
    /// Default value.
    pub default: Option<Default>,
    /// Whether the column is `AUTO_INCREMENT`.
    pub auto_increment: bool,
}

impl Column {
    /// Creates a nullable column without default.
    #[must_use]
    pub const fn new(name: Ident, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            not_null: false,
            default: None,
            auto_increment: false,
        }
    }

    /// Returns the SQL text of the column definition.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name.raw, self.data_type.to_sql());
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.to_sql());
        }
        if self.auto_increment {
            sql.push_str(" AUTO_INCREMENT");
        }
        sql
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        let mut sql = format!(
            "{} {}",
            self.name.string_for_diff(),
            self.data_type.string_for_diff()
        );
        if self.not_null {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default.string_for_diff());
        }
        if self.auto_increment {
            sql.push_str(" AUTO_INCREMENT");
        }
        sql
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn test_data_type_to_sql() {
        assert_eq!(DataType::new("INT").to_sql(), "INT");
        assert_eq!(
            DataType::new("NUMERIC")
                .with_params(vec![Ident::new("10"), Ident::new("2")])
                .to_sql(),
            "NUMERIC(10, 2)"
        );
    }

    #[test]
    fn test_suffix_and_array_dims() {
        let mut ts = DataType::new("TIMESTAMP").with_params(vec![Ident::new("3")]);
        ts.suffix = Some(String::from("WITH TIME ZONE"));
        assert_eq!(ts.to_sql(), "TIMESTAMP(3) WITH TIME ZONE");

        let mut tags = DataType::new("TEXT");
        tags.array_dims = 2;
        assert_eq!(tags.to_sql(), "TEXT[][]");
    }

    #[test]
    fn test_aliases_are_distinct() {
        assert_ne!(DataType::new("INT"), DataType::new("INTEGER"));
    }

    #[test]
    fn test_column_to_sql() {
        let mut column = Column::new(Ident::new("age"), DataType::new("INT"));
        assert_eq!(column.to_sql(), "age INT");

        column.not_null = true;
        column.default = Some(Default::new(Expr::new(vec![Ident::new("0")])));
        assert_eq!(column.to_sql(), "age INT NOT NULL DEFAULT 0");
    }
}
