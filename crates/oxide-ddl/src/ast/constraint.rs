//! Table constraints and their derived names.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::ident::{column_list_for_diff, column_list_sql};
use super::{ColumnIdent, Expr, Ident, ObjectName};

/// Action taken on the referencing rows when a referenced row changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ReferentialAction {
    /// `NO ACTION`.
    NoAction,
    /// `RESTRICT`.
    Restrict,
    /// `CASCADE`.
    Cascade,
    /// `SET NULL`.
    SetNull,
    /// `SET DEFAULT`.
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A table constraint. Every constraint carries a name, either written in
/// the source or derived from the table and column names.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Constraint {
    /// `PRIMARY KEY (cols)`.
    PrimaryKey {
        /// Constraint name.
        name: Ident,
        /// Key columns.
        columns: Vec<ColumnIdent>,
    },
    /// `FOREIGN KEY (cols) REFERENCES table (cols)`.
    ForeignKey {
        /// Constraint name.
        name: Ident,
        /// Referencing columns.
        columns: Vec<ColumnIdent>,
        /// Referenced table.
        ref_table: ObjectName,
        /// Referenced columns; empty means the referenced primary key.
        ref_columns: Vec<ColumnIdent>,
        /// `ON DELETE` action.
        on_delete: Option<ReferentialAction>,
        /// `ON UPDATE` action.
        on_update: Option<ReferentialAction>,
    },
    /// `UNIQUE (cols)` as a table constraint.
    Unique {
        /// Constraint name.
        name: Ident,
        /// Unique columns.
        columns: Vec<ColumnIdent>,
    },
    /// `CHECK (expr)`.
    Check {
        /// Constraint name.
        name: Ident,
        /// The check body, without the surrounding parentheses.
        expr: Expr,
    },
    /// `[UNIQUE] INDEX name (cols)` declared inside the table. Dialects whose
    /// unique constraints are indexes use this for `UNIQUE` as well.
    Index {
        /// Index name.
        name: Ident,
        /// Whether the index is unique.
        unique: bool,
        /// Indexed columns.
        columns: Vec<ColumnIdent>,
    },
}

impl Constraint {
    /// Returns the constraint name.
    #[must_use]
    pub const fn name(&self) -> &Ident {
        match self {
            Self::PrimaryKey { name, .. }
            | Self::ForeignKey { name, .. }
            | Self::Unique { name, .. }
            | Self::Check { name, .. }
            | Self::Index { name, .. } => name,
        }
    }

    /// Returns a copy with a different name.
    #[must_use]
    pub fn with_name(&self, new_name: Ident) -> Self {
        let mut renamed = self.clone();
        match &mut renamed {
            Self::PrimaryKey { name, .. }
            | Self::ForeignKey { name, .. }
            | Self::Unique { name, .. }
            | Self::Check { name, .. }
            | Self::Index { name, .. } => *name = new_name,
        }
        renamed
    }

    /// Returns true for constraints that exist as indexes and are created
    /// and dropped with index statements.
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }

    /// Returns the column lists the constraint owns, for rewriting on
    /// column renames.
    pub(crate) fn columns_mut(&mut self) -> Vec<&mut ColumnIdent> {
        match self {
            Self::PrimaryKey { columns, .. }
            | Self::ForeignKey { columns, .. }
            | Self::Unique { columns, .. }
            | Self::Index { columns, .. } => columns.iter_mut().collect(),
            Self::Check { .. } => Vec::new(),
        }
    }

    /// Returns the SQL text of the constraint as it appears in
    /// `CREATE TABLE` or after `ALTER TABLE ... ADD`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Index {
                name,
                unique,
                columns,
            } => {
                let kind = if *unique { "UNIQUE INDEX" } else { "INDEX" };
                format!("{kind} {} {}", name.raw, column_list_sql(columns))
            }
            _ => format!("CONSTRAINT {} {}", self.name().raw, self.body_sql()),
        }
    }

    /// Returns the definition without the name.
    fn body_sql(&self) -> String {
        match self {
            Self::PrimaryKey { columns, .. } => format!("PRIMARY KEY {}", column_list_sql(columns)),
            Self::ForeignKey {
                columns,
                ref_table,
                ref_columns,
                on_delete,
                on_update,
                ..
            } => {
                let mut sql = format!(
                    "FOREIGN KEY {} REFERENCES {}",
                    column_list_sql(columns),
                    ref_table.to_sql()
                );
                if !ref_columns.is_empty() {
                    sql.push(' ');
                    sql.push_str(&column_list_sql(ref_columns));
                }
                push_actions(&mut sql, *on_delete, *on_update);
                sql
            }
            Self::Unique { columns, .. } => format!("UNIQUE {}", column_list_sql(columns)),
            Self::Check { expr, .. } => format!("CHECK ({})", expr.to_sql()),
            Self::Index {
                unique, columns, ..
            } => {
                let kind = if *unique { "UNIQUE INDEX" } else { "INDEX" };
                format!("{kind} {}", column_list_sql(columns))
            }
        }
    }

    /// Diff identity of the definition, ignoring the constraint name.
    #[must_use]
    pub fn definition_for_diff(&self) -> String {
        match self {
            Self::PrimaryKey { columns, .. } => {
                format!("PRIMARY KEY {}", column_list_for_diff(columns))
            }
            Self::ForeignKey {
                columns,
                ref_table,
                ref_columns,
                on_delete,
                on_update,
                ..
            } => {
                let mut sql = format!(
                    "FOREIGN KEY {} REFERENCES {} {}",
                    column_list_for_diff(columns),
                    ref_table.string_for_diff(),
                    column_list_for_diff(ref_columns)
                );
                push_actions(&mut sql, *on_delete, *on_update);
                sql
            }
            Self::Unique { columns, .. } => format!("UNIQUE {}", column_list_for_diff(columns)),
            Self::Check { expr, .. } => format!("CHECK ({})", expr.string_for_diff()),
            Self::Index {
                unique, columns, ..
            } => {
                let kind = if *unique { "UNIQUE INDEX" } else { "INDEX" };
                format!("{kind} {}", column_list_for_diff(columns))
            }
        }
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        format!(
            "{} {}",
            self.name().string_for_diff(),
            self.definition_for_diff()
        )
    }
}

fn push_actions(
    sql: &mut String,
    on_delete: Option<ReferentialAction>,
    on_update: Option<ReferentialAction>,
) {
    if let Some(action) = on_delete {
        sql.push_str(" ON DELETE ");
        sql.push_str(action.as_str());
    }
    if let Some(action) = on_update {
        sql.push_str(" ON UPDATE ");
        sql.push_str(action.as_str());
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Names given to constraints that are declared without one.
///
/// Multi-column lists are joined with `_`. Names that are not plain words
/// come back quoted in the dialect's style.
pub mod naming {
    use crate::ast::{ColumnIdent, Ident, ObjectName};
    use crate::dialect::Dialect;

    fn joined(columns: &[ColumnIdent]) -> String {
        let names: Vec<&str> = columns.iter().map(|c| c.ident.name.as_str()).collect();
        names.join("_")
    }

    /// `{table}_pkey`.
    #[must_use]
    pub fn primary_key(table: &ObjectName, dialect: &dyn Dialect) -> Ident {
        Ident::derived(format!("{}_pkey", table.base_name()), dialect)
    }

    /// `{table}_{cols}_fkey`.
    #[must_use]
    pub fn foreign_key(
        table: &ObjectName,
        columns: &[ColumnIdent],
        dialect: &dyn Dialect,
    ) -> Ident {
        Ident::derived(
            format!("{}_{}_fkey", table.base_name(), joined(columns)),
            dialect,
        )
    }

    /// `{table}_unique_{cols}`.
    #[must_use]
    pub fn unique(table: &ObjectName, columns: &[ColumnIdent], dialect: &dyn Dialect) -> Ident {
        Ident::derived(
            format!("{}_unique_{}", table.base_name(), joined(columns)),
            dialect,
        )
    }

    /// `{table}_{column}_check`, or `{table}_check` without a column.
    #[must_use]
    pub fn check(table: &ObjectName, column: Option<&str>, dialect: &dyn Dialect) -> Ident {
        let name = match column {
            Some(column) => format!("{}_{column}_check", table.base_name()),
            None => format!("{}_check", table.base_name()),
        };
        Ident::derived(name, dialect)
    }

    /// `{table}_{cols}_idx`.
    #[must_use]
    pub fn index(table: &ObjectName, columns: &[ColumnIdent], dialect: &dyn Dialect) -> Ident {
        Ident::derived(
            format!("{}_{}_idx", table.base_name(), joined(columns)),
            dialect,
        )
    }
}
