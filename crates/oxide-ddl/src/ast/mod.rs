//! Abstract Syntax Tree (AST) types for DDL statements.
//!
//! Every node prints itself back to canonical SQL with `to_sql()` (and
//! `Display`), and reports its diff identity with `string_for_diff()`: the
//! same text with quoting, schema qualification and source spacing
//! normalised away.

mod constraint;
mod expr;
mod ident;
mod statement;
mod types;

pub use constraint::{naming, Constraint, ReferentialAction};
pub use expr::{Default, Expr};
pub use ident::{ColumnIdent, Ident, ObjectName, SortOrder};
pub use statement::{
    AlterColumnAction, AlterTableAction, AlterTableStatement, CreateIndexStatement,
    CreateTableStatement, Ddl, DropIndexStatement, DropTableStatement, Statement, TableOption,
};
pub use types::{Column, DataType};
