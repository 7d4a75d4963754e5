//! Opaque expressions for DEFAULT, CHECK and index predicates.
//!
//! Expressions are never evaluated or restructured. They are kept as the
//! token sequence the parser collected and re-joined on output with a fixed
//! spacing rule, so `age>=0` and `age >= 0` print and compare the same.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::Ident;

/// An expression kept as its token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Expr {
    /// Tokens in source order.
    pub tokens: Vec<Ident>,
}

impl Expr {
    /// Creates an expression from its tokens.
    #[must_use]
    pub const fn new(tokens: Vec<Ident>) -> Self {
        Self { tokens }
    }

    /// Returns true if the expression has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Upper-case spelling of a bare word that is an SQL operator, literal
    /// or niladic function inside expressions (`and`, `is`, `true`,
    /// `current_timestamp`), or `None` for any other word.
    #[must_use]
    pub fn keyword(word: &str) -> Option<&'static str> {
        EXPRESSION_KEYWORDS
            .iter()
            .copied()
            .find(|kw| kw.eq_ignore_ascii_case(word))
    }

    /// Returns the SQL text of the expression.
    #[must_use]
    pub fn to_sql(&self) -> String {
        join_tokens(self.tokens.iter().map(|t| t.raw.as_str()))
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        join_tokens(self.tokens.iter().map(|t| t.name.as_str()))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Expression words the DDL grammar itself never needs as keywords.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "ALL",
    "AND",
    "ANY",
    "BETWEEN",
    "CASE",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "DISTINCT",
    "ELSE",
    "END",
    "ESCAPE",
    "FALSE",
    "ILIKE",
    "IN",
    "IS",
    "LIKE",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "OR",
    "SIMILAR",
    "SOME",
    "THEN",
    "TRUE",
    "UNKNOWN",
    "WHEN",
];

fn is_cast(token: &str) -> bool {
    matches!(token, "::" | ":::")
}

fn is_operator(token: &str) -> bool {
    matches!(
        token,
        "=" | "<>" | "!=" | "<" | "<=" | ">" | ">=" | "+" | "-" | "*" | "/" | "%" | "||" | ":"
    ) || is_cast(token)
}

fn glues_right(token: &str) -> bool {
    matches!(token, "(" | "[" | ".") || is_cast(token)
}

fn glues_left(token: &str) -> bool {
    matches!(token, "(" | ")" | "[" | "]" | "," | ".") || is_cast(token)
}

/// Joins tokens with single spaces except around brackets, dots, commas,
/// casts and after unary signs.
fn join_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;
    let mut prev_unary = false;

    for token in tokens {
        let follows_operand = match prev {
            Some(p) => !(matches!(p, "(" | "[" | ",") || is_operator(p)),
            None => false,
        };
        let unary = matches!(token, "+" | "-") && !follows_operand;

        if let Some(p) = prev {
            let glued = glues_right(p) || glues_left(token) || prev_unary;
            // `-` `-` or `/` `*` side by side would start a comment.
            let opens_comment = (p.ends_with('-') && token.starts_with('-'))
                || (p.ends_with('/') && token.starts_with('*'));
            if !glued || opens_comment {
                out.push(' ');
            }
        }

        out.push_str(token);
        prev = Some(token);
        prev_unary = unary;
    }

    out
}

/// A column default value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Default {
    /// The default expression.
    pub value: Expr,
}

impl Default {
    /// Creates a default from its expression.
    #[must_use]
    pub const fn new(value: Expr) -> Self {
        Self { value }
    }

    /// Returns the SQL text of the default expression.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.value.to_sql()
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        self.value.string_for_diff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(tokens: &[&str]) -> Expr {
        Expr::new(tokens.iter().map(|t| Ident::new(*t)).collect())
    }

    #[test]
    fn test_expression_keyword_lookup() {
        assert_eq!(Expr::keyword("and"), Some("AND"));
        assert_eq!(Expr::keyword("Current_Timestamp"), Some("CURRENT_TIMESTAMP"));
        assert_eq!(Expr::keyword("age"), None);
        assert_eq!(Expr::keyword("android"), None);
    }

    #[test]
    fn test_binary_operators_are_spaced() {
        assert_eq!(expr(&["age", ">=", "0"]).to_sql(), "age >= 0");
        assert_eq!(expr(&["a", "||", "b"]).to_sql(), "a || b");
    }

    #[test]
    fn test_brackets_and_commas() {
        assert_eq!(
            expr(&["coalesce", "(", "a", ",", "b", ")"]).to_sql(),
            "coalesce(a, b)"
        );
        assert_eq!(expr(&["arr", "[", "1", "]"]).to_sql(), "arr[1]");
        assert_eq!(expr(&["s", ".", "t"]).to_sql(), "s.t");
    }

    #[test]
    fn test_casts_are_glued() {
        assert_eq!(expr(&["'a'", "::", "TEXT"]).to_sql(), "'a'::TEXT");
        assert_eq!(expr(&["now", "(", ")", ":::", "DATE"]).to_sql(), "now():::DATE");
    }

    #[test]
    fn test_unary_sign_is_glued() {
        assert_eq!(expr(&["-", "1"]).to_sql(), "-1");
        assert_eq!(expr(&["a", "-", "1"]).to_sql(), "a - 1");
        assert_eq!(expr(&["a", ">", "-", "1"]).to_sql(), "a > -1");
        assert_eq!(expr(&["f", "(", "-", "1", ")"]).to_sql(), "f(-1)");
    }

    #[test]
    fn test_double_minus_does_not_become_comment() {
        assert_eq!(expr(&["a", "-", "-", "1"]).to_sql(), "a - -1");
    }

    #[test]
    fn test_diff_identity_uses_logical_names() {
        let quoted = Expr::new(vec![
            Ident::from_quoted_literal("\"age\"", '"'),
            Ident::new(">"),
            Ident::new("0"),
        ]);
        assert_eq!(quoted.to_sql(), "\"age\" > 0");
        assert_eq!(quoted.string_for_diff(), expr(&["age", ">", "0"]).string_for_diff());
    }
}
