//! DDL statement AST types and the canonical printer.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::ident::{column_list_for_diff, column_list_sql};
use super::{Column, ColumnIdent, Constraint, DataType, Default, Expr, Ident, ObjectName};

/// A trailing `CREATE TABLE` option such as `ENGINE=InnoDB`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TableOption {
    /// Option name, upper case (`ENGINE`, `DEFAULT CHARSET`).
    pub name: String,
    /// Option value as written.
    pub value: Ident,
    /// Whether the value was attached with `=`.
    pub equals: bool,
}

impl TableOption {
    /// Returns the SQL text of the option.
    #[must_use]
    pub fn to_sql(&self) -> String {
        if self.equals {
            format!("{}={}", self.name, self.value.raw)
        } else {
            format!("{} {}", self.name, self.value.raw)
        }
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        format!("{}={}", self.name, self.value.string_for_diff())
    }
}

/// `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CreateTableStatement {
    /// `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Table name.
    pub name: ObjectName,
    /// Column definitions.
    pub columns: Vec<Column>,
    /// Table constraints, including those declared inline on columns.
    pub constraints: Vec<Constraint>,
    /// Trailing table options.
    pub options: Vec<TableOption>,
}

impl CreateTableStatement {
    /// Looks up a column by logical name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.name == name)
    }

    /// Looks up a constraint by logical name.
    #[must_use]
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name().name == name)
    }
}

/// `DROP TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DropTableStatement {
    /// `IF EXISTS`.
    pub if_exists: bool,
    /// Table name.
    pub name: ObjectName,
}

/// `ALTER TABLE name <action>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AlterTableStatement {
    /// Table name.
    pub name: ObjectName,
    /// The change.
    pub action: AlterTableAction,
}

/// `CREATE [UNIQUE] INDEX`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CreateIndexStatement {
    /// `UNIQUE`.
    pub unique: bool,
    /// `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Index name.
    pub name: ObjectName,
    /// Indexed table.
    pub table: ObjectName,
    /// `USING method`.
    pub using: Option<Ident>,
    /// Indexed columns.
    pub columns: Vec<ColumnIdent>,
    /// Partial index predicate (`WHERE ...`).
    pub predicate: Option<Expr>,
}

/// `DROP INDEX`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DropIndexStatement {
    /// `IF EXISTS`.
    pub if_exists: bool,
    /// Index name.
    pub name: ObjectName,
    /// Table, for dialects that write `DROP INDEX name ON table`.
    pub table: Option<ObjectName>,
}

/// The change made by an `ALTER TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AlterTableAction {
    /// `RENAME TO name`.
    RenameTable {
        /// New table name.
        to: Ident,
    },
    /// `RENAME COLUMN a TO b`.
    RenameColumn {
        /// Old column name.
        from: Ident,
        /// New column name.
        to: Ident,
    },
    /// `RENAME CONSTRAINT a TO b`.
    RenameConstraint {
        /// Old constraint name.
        from: Ident,
        /// New constraint name.
        to: Ident,
    },
    /// `ADD COLUMN definition`.
    AddColumn(Column),
    /// `DROP COLUMN name`.
    DropColumn {
        /// Column name.
        name: Ident,
    },
    /// `ALTER COLUMN name ...`.
    AlterColumn {
        /// Column name.
        name: Ident,
        /// The change.
        action: AlterColumnAction,
    },
    /// `MODIFY COLUMN definition`.
    ModifyColumn(Column),
    /// `ADD constraint [NOT VALID]`.
    AddConstraint {
        /// The new constraint.
        constraint: Constraint,
        /// Skip validation of existing rows.
        not_valid: bool,
    },
    /// `DROP CONSTRAINT name`.
    DropConstraint {
        /// Constraint name.
        name: Ident,
    },
}

impl AlterTableAction {
    /// Returns the SQL text of the action.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::RenameTable { to } => format!("RENAME TO {}", to.raw),
            Self::RenameColumn { from, to } => format!("RENAME COLUMN {} TO {}", from.raw, to.raw),
            Self::RenameConstraint { from, to } => {
                format!("RENAME CONSTRAINT {} TO {}", from.raw, to.raw)
            }
            Self::AddColumn(column) => format!("ADD COLUMN {}", column.to_sql()),
            Self::DropColumn { name } => format!("DROP COLUMN {}", name.raw),
            Self::AlterColumn { name, action } => {
                format!("ALTER COLUMN {} {}", name.raw, action.to_sql())
            }
            Self::ModifyColumn(column) => format!("MODIFY COLUMN {}", column.to_sql()),
            Self::AddConstraint {
                constraint,
                not_valid,
            } => {
                if *not_valid {
                    format!("ADD {} NOT VALID", constraint.to_sql())
                } else {
                    format!("ADD {}", constraint.to_sql())
                }
            }
            Self::DropConstraint { name } => format!("DROP CONSTRAINT {}", name.raw),
        }
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        match self {
            Self::RenameTable { to } => format!("RENAME TO {}", to.name),
            Self::RenameColumn { from, to } => {
                format!("RENAME COLUMN {} TO {}", from.name, to.name)
            }
            Self::RenameConstraint { from, to } => {
                format!("RENAME CONSTRAINT {} TO {}", from.name, to.name)
            }
            Self::AddColumn(column) => format!("ADD COLUMN {}", column.string_for_diff()),
            Self::DropColumn { name } => format!("DROP COLUMN {}", name.name),
            Self::AlterColumn { name, action } => {
                format!("ALTER COLUMN {} {}", name.name, action.string_for_diff())
            }
            Self::ModifyColumn(column) => format!("MODIFY COLUMN {}", column.string_for_diff()),
            Self::AddConstraint {
                constraint,
                not_valid,
            } => format!("ADD {} NOT VALID={not_valid}", constraint.string_for_diff()),
            Self::DropConstraint { name } => format!("DROP CONSTRAINT {}", name.name),
        }
    }
}

/// The change made by `ALTER TABLE ... ALTER COLUMN`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum AlterColumnAction {
    /// `SET DATA TYPE type`.
    SetDataType(DataType),
    /// `SET DEFAULT expr`.
    SetDefault(Default),
    /// `DROP DEFAULT`.
    DropDefault,
    /// `SET NOT NULL`.
    SetNotNull,
    /// `DROP NOT NULL`.
    DropNotNull,
}

impl AlterColumnAction {
    /// Returns the SQL text of the action.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::SetDataType(data_type) => format!("SET DATA TYPE {}", data_type.to_sql()),
            Self::SetDefault(default) => format!("SET DEFAULT {}", default.to_sql()),
            Self::DropDefault => String::from("DROP DEFAULT"),
            Self::SetNotNull => String::from("SET NOT NULL"),
            Self::DropNotNull => String::from("DROP NOT NULL"),
        }
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        match self {
            Self::SetDataType(data_type) => {
                format!("SET DATA TYPE {}", data_type.string_for_diff())
            }
            Self::SetDefault(default) => format!("SET DEFAULT {}", default.string_for_diff()),
            other => other.to_sql(),
        }
    }
}

/// A DDL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Statement {
    /// `CREATE TABLE`.
    CreateTable(CreateTableStatement),
    /// `DROP TABLE`.
    DropTable(DropTableStatement),
    /// `ALTER TABLE`.
    AlterTable(AlterTableStatement),
    /// `CREATE INDEX`.
    CreateIndex(CreateIndexStatement),
    /// `DROP INDEX`.
    DropIndex(DropIndexStatement),
}

impl Statement {
    /// Returns a short description such as `CREATE TABLE users`, used in
    /// errors and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateTable(s) => format!("CREATE TABLE {}", s.name),
            Self::DropTable(s) => format!("DROP TABLE {}", s.name),
            Self::AlterTable(s) => format!("ALTER TABLE {}", s.name),
            Self::CreateIndex(s) => format!("CREATE INDEX {}", s.name),
            Self::DropIndex(s) => format!("DROP INDEX {}", s.name),
        }
    }

    /// Returns the canonical SQL text, terminated by `;` and a newline.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = match self {
            Self::CreateTable(s) => create_table_sql(s),
            Self::DropTable(s) => {
                let if_exists = if s.if_exists { "IF EXISTS " } else { "" };
                format!("DROP TABLE {if_exists}{}", s.name)
            }
            Self::AlterTable(s) => format!("ALTER TABLE {} {}", s.name, s.action.to_sql()),
            Self::CreateIndex(s) => create_index_sql(s),
            Self::DropIndex(s) => {
                let if_exists = if s.if_exists { "IF EXISTS " } else { "" };
                match &s.table {
                    Some(table) => format!("DROP INDEX {if_exists}{} ON {table}", s.name),
                    None => format!("DROP INDEX {if_exists}{}", s.name),
                }
            }
        };
        sql.push_str(";\n");
        sql
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        match self {
            Self::CreateTable(s) => {
                let mut parts: Vec<String> =
                    s.columns.iter().map(Column::string_for_diff).collect();
                parts.extend(s.constraints.iter().map(Constraint::string_for_diff));
                let options: Vec<String> =
                    s.options.iter().map(TableOption::string_for_diff).collect();
                format!(
                    "CREATE TABLE {} ({}) {}",
                    s.name.string_for_diff(),
                    parts.join(", "),
                    options.join(" ")
                )
            }
            Self::DropTable(s) => format!("DROP TABLE {}", s.name.string_for_diff()),
            Self::AlterTable(s) => format!(
                "ALTER TABLE {} {}",
                s.name.string_for_diff(),
                s.action.string_for_diff()
            ),
            Self::CreateIndex(s) => create_index_for_diff(s),
            Self::DropIndex(s) => format!("DROP INDEX {}", s.name.string_for_diff()),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

fn create_table_sql(s: &CreateTableStatement) -> String {
    let if_not_exists = if s.if_not_exists { "IF NOT EXISTS " } else { "" };
    let mut elements: Vec<String> = s.columns.iter().map(Column::to_sql).collect();
    elements.extend(s.constraints.iter().map(Constraint::to_sql));

    let mut sql = if elements.is_empty() {
        format!("CREATE TABLE {if_not_exists}{} ()", s.name)
    } else {
        format!(
            "CREATE TABLE {if_not_exists}{} (\n    {}\n)",
            s.name,
            elements.join(",\n    ")
        )
    };
    for option in &s.options {
        sql.push(' ');
        sql.push_str(&option.to_sql());
    }
    sql
}

fn create_index_sql(s: &CreateIndexStatement) -> String {
    let unique = if s.unique { "UNIQUE " } else { "" };
    let if_not_exists = if s.if_not_exists { "IF NOT EXISTS " } else { "" };
    let mut sql = format!(
        "CREATE {unique}INDEX {if_not_exists}{} ON {}",
        s.name, s.table
    );
    if let Some(using) = &s.using {
        sql.push_str(" USING ");
        sql.push_str(&using.raw);
    }
    sql.push(' ');
    sql.push_str(&column_list_sql(&s.columns));
    if let Some(predicate) = &s.predicate {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate.to_sql());
    }
    sql
}

fn create_index_for_diff(s: &CreateIndexStatement) -> String {
    let unique = if s.unique { "UNIQUE " } else { "" };
    let mut sql = format!(
        "CREATE {unique}INDEX {} ON {}",
        s.name.string_for_diff(),
        s.table.string_for_diff()
    );
    if let Some(using) = &s.using {
        sql.push_str(" USING ");
        sql.push_str(&using.name.to_ascii_uppercase());
    }
    sql.push(' ');
    sql.push_str(&column_list_for_diff(&s.columns));
    if let Some(predicate) = &s.predicate {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate.string_for_diff());
    }
    sql
}

/// An ordered list of DDL statements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Ddl {
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Ddl {
    /// Creates a DDL list from statements.
    #[must_use]
    pub const fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Returns true if there are no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Returns the canonical SQL text of all statements.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.statements.iter().map(Statement::to_sql).collect()
    }

    /// Returns the normalized identity used by the diff engine.
    #[must_use]
    pub fn string_for_diff(&self) -> String {
        let parts: Vec<String> = self
            .statements
            .iter()
            .map(Statement::string_for_diff)
            .collect();
        parts.join(";\n")
    }
}

impl fmt::Display for Ddl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> ObjectName {
        ObjectName::new(Ident::new("users"))
    }

    #[test]
    fn test_create_table_layout() {
        let mut id = Column::new(Ident::new("id"), DataType::new("INT"));
        id.not_null = true;
        let stmt = Statement::CreateTable(CreateTableStatement {
            if_not_exists: false,
            name: users(),
            columns: vec![id, Column::new(Ident::new("name"), DataType::new("TEXT"))],
            constraints: vec![Constraint::PrimaryKey {
                name: Ident::new("users_pkey"),
                columns: vec![ColumnIdent::new(Ident::new("id"))],
            }],
            options: vec![],
        });
        assert_eq!(
            stmt.to_sql(),
            "CREATE TABLE users (\n    id INT NOT NULL,\n    name TEXT,\n    CONSTRAINT users_pkey PRIMARY KEY (id)\n);\n"
        );
    }

    #[test]
    fn test_alter_table_actions() {
        let drop_default = Statement::AlterTable(AlterTableStatement {
            name: users(),
            action: AlterTableAction::AlterColumn {
                name: Ident::new("age"),
                action: AlterColumnAction::DropDefault,
            },
        });
        assert_eq!(
            drop_default.to_sql(),
            "ALTER TABLE users ALTER COLUMN age DROP DEFAULT;\n"
        );

        let rename = Statement::AlterTable(AlterTableStatement {
            name: users(),
            action: AlterTableAction::RenameColumn {
                from: Ident::new("a"),
                to: Ident::new("b"),
            },
        });
        assert_eq!(rename.to_sql(), "ALTER TABLE users RENAME COLUMN a TO b;\n");
    }

    #[test]
    fn test_index_statements() {
        let create = Statement::CreateIndex(CreateIndexStatement {
            unique: true,
            if_not_exists: false,
            name: ObjectName::new(Ident::new("users_email_idx")),
            table: users(),
            using: None,
            columns: vec![ColumnIdent {
                ident: Ident::new("email"),
                order: crate::ast::SortOrder::Desc,
            }],
            predicate: None,
        });
        assert_eq!(
            create.to_sql(),
            "CREATE UNIQUE INDEX users_email_idx ON users (email DESC);\n"
        );

        let drop = Statement::DropIndex(DropIndexStatement {
            if_exists: false,
            name: ObjectName::new(Ident::new("users_email_idx")),
            table: Some(users()),
        });
        assert_eq!(drop.to_sql(), "DROP INDEX users_email_idx ON users;\n");
    }

    #[test]
    fn test_ddl_concatenates() {
        let ddl = Ddl::new(vec![
            Statement::DropTable(DropTableStatement {
                if_exists: true,
                name: users(),
            }),
            Statement::DropTable(DropTableStatement {
                if_exists: false,
                name: ObjectName::new(Ident::new("posts")),
            }),
        ]);
        assert_eq!(ddl.to_sql(), "DROP TABLE IF EXISTS users;\nDROP TABLE posts;\n");
        assert_eq!(ddl.to_string(), ddl.to_sql());
    }
}
