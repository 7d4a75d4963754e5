//! Schema diff engine.
//!
//! Compares two parsed schemas and returns the ordered statements that turn
//! the first into the second:
//!
//! 1. Table renames requested through [`DiffOptions::rename_table`].
//! 2. Drops of tables and indexes missing from the new schema, and of
//!    indexes whose definition changed, in reverse order of the old schema.
//! 3. Creates of tables and indexes missing from the old schema, in order
//!    of the new schema.
//! 4. Alters for tables present in both and re-creates of changed
//!    indexes, in order of the new schema.
//!
//! Objects are matched by kind and logical name, ignoring quoting and
//! schema qualification. Renames are never guessed.

mod error;
mod table;

use std::collections::BTreeMap;

use tracing::debug;

pub use error::DiffError;

use self::table::TableDiff;
use crate::ast::{
    AlterTableAction, AlterTableStatement, ColumnIdent, CreateIndexStatement,
    CreateTableStatement, Ddl, DropIndexStatement, DropTableStatement, Ident, ObjectName,
    Statement,
};
use crate::dialect::Dialect;
use crate::parser::Parser;

/// Options for a diff run.
///
/// ```
/// use oxide_ddl::diff::DiffOptions;
///
/// let options = DiffOptions::new()
///     .not_valid(true)
///     .rename_table("people", "users")
///     .rename_column("users", "fullname", "name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    not_valid: bool,
    table_renames: Vec<(String, String)>,
    column_renames: Vec<ColumnRename>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnRename {
    table: String,
    from: String,
    to: String,
}

impl DiffOptions {
    /// Creates default options: no renames, constraints validated on add.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds new FOREIGN KEY and CHECK constraints as `NOT VALID` in
    /// dialects that support it.
    #[must_use]
    pub fn not_valid(mut self, enabled: bool) -> Self {
        self.not_valid = enabled;
        self
    }

    /// Treats table `from` in the old schema and table `to` in the new
    /// schema as the same table.
    #[must_use]
    pub fn rename_table(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.table_renames.push((from.into(), to.into()));
        self
    }

    /// Treats column `from` and column `to` as the same column of `table`,
    /// named as in the new schema.
    #[must_use]
    pub fn rename_column(
        mut self,
        table: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.column_renames.push(ColumnRename {
            table: table.into(),
            from: from.into(),
            to: to.into(),
        });
        self
    }
}

/// Kind and logical name of a statement that defines a schema object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ObjectKey {
    Table(String),
    Index(String),
}

fn object_key(statement: &Statement) -> Result<ObjectKey, DiffError> {
    match statement {
        Statement::CreateTable(s) => Ok(ObjectKey::Table(s.name.string_for_diff())),
        Statement::CreateIndex(s) => Ok(ObjectKey::Index(s.name.string_for_diff())),
        Statement::DropTable(_) | Statement::AlterTable(_) | Statement::DropIndex(_) => {
            Err(DiffError::not_supported(
                statement.describe(),
                "only CREATE TABLE and CREATE INDEX statements can be compared",
            ))
        }
    }
}

/// Computes migrations for one dialect.
#[derive(Debug, Clone)]
pub struct Differ<'a> {
    dialect: &'a dyn Dialect,
    options: DiffOptions,
}

impl<'a> Differ<'a> {
    /// Creates a differ with default options.
    #[must_use]
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            options: DiffOptions::default(),
        }
    }

    /// Sets the diff options.
    #[must_use]
    pub fn options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    /// Computes the statements that migrate `before` into `after`.
    ///
    /// `None` stands for an empty database: `diff(None, Some(s))` creates
    /// everything in `s`, `diff(Some(s), None)` drops it.
    ///
    /// # Errors
    ///
    /// - [`DiffError::NoDifference`] when there is nothing to do.
    /// - [`DiffError::NotSupported`] when a schema contains statements other
    ///   than `CREATE TABLE`/`CREATE INDEX`, table options change, or a
    ///   rename hint does not fit the schemas.
    pub fn diff(&self, before: Option<&Ddl>, after: Option<&Ddl>) -> Result<Ddl, DiffError> {
        let statements = match (before, after) {
            (None, None) => return Err(DiffError::NoDifference),
            (None, Some(after)) => after.statements.clone(),
            (Some(before), None) => self.drop_all(before)?,
            (Some(before), Some(after)) => {
                if before.string_for_diff() == after.string_for_diff() {
                    return Err(DiffError::NoDifference);
                }
                self.diff_schemas(before, after)?
            }
        };

        if statements.is_empty() {
            return Err(DiffError::NoDifference);
        }
        debug!(
            dialect = self.dialect.name(),
            statements = statements.len(),
            "diff complete"
        );
        Ok(Ddl::new(statements))
    }

    /// Parses both schemas with this differ's dialect, then diffs them.
    ///
    /// # Errors
    ///
    /// [`DiffError::Parse`] if either text fails to parse, otherwise as
    /// [`Differ::diff`].
    pub fn diff_sql(&self, before: Option<&str>, after: Option<&str>) -> Result<Ddl, DiffError> {
        let before = before
            .map(|sql| Parser::new(sql, self.dialect).parse())
            .transpose()?;
        let after = after
            .map(|sql| Parser::new(sql, self.dialect).parse())
            .transpose()?;
        self.diff(before.as_ref(), after.as_ref())
    }

    // ===================================================================
    // Whole-schema drop
    // ===================================================================

    fn drop_all(&self, before: &Ddl) -> Result<Vec<Statement>, DiffError> {
        let mut statements = Vec::new();
        for statement in before.statements.iter().rev() {
            object_key(statement)?;
            statements.push(self.drop_statement(statement, None));
        }
        debug!(statements = statements.len(), "dropping whole schema");
        Ok(statements)
    }

    /// The drop form of a `CREATE TABLE`/`CREATE INDEX`. `table` overrides
    /// the index's table name for `DROP INDEX ... ON`.
    fn drop_statement(&self, statement: &Statement, table: Option<&ObjectName>) -> Statement {
        match statement {
            Statement::CreateIndex(index) => Statement::DropIndex(DropIndexStatement {
                if_exists: false,
                name: index.name.clone(),
                table: self
                    .dialect
                    .drop_index_requires_table()
                    .then(|| table.unwrap_or(&index.table).clone()),
            }),
            Statement::CreateTable(CreateTableStatement { name, .. })
            | Statement::DropTable(DropTableStatement { name, .. })
            | Statement::AlterTable(AlterTableStatement { name, .. }) => {
                Statement::DropTable(DropTableStatement {
                    if_exists: false,
                    name: name.clone(),
                })
            }
            Statement::DropIndex(index) => Statement::DropIndex(index.clone()),
        }
    }

    // ===================================================================
    // Schema against schema
    // ===================================================================

    fn diff_schemas(&self, before: &Ddl, after: &Ddl) -> Result<Vec<Statement>, DiffError> {
        let table_renames = self.table_renames(before, after)?;
        let renamed = |key: ObjectKey| match key {
            ObjectKey::Table(name) => ObjectKey::Table(
                table_renames
                    .iter()
                    .find(|(from, _)| *from == name)
                    .map_or(name, |(_, to)| to.clone()),
            ),
            index @ ObjectKey::Index(_) => index,
        };

        let before_keys = before
            .statements
            .iter()
            .map(|s| object_key(s).map(renamed))
            .collect::<Result<Vec<_>, _>>()?;
        let after_keys = after
            .statements
            .iter()
            .map(object_key)
            .collect::<Result<Vec<_>, _>>()?;

        let before_by_key: BTreeMap<&ObjectKey, &Statement> =
            before_keys.iter().zip(&before.statements).collect();
        let after_by_key: BTreeMap<&ObjectKey, &Statement> =
            after_keys.iter().zip(&after.statements).collect();
        self.check_column_renames(&before_by_key, after)?;

        let mut out = Vec::new();

        // Renames
        for (from, to) in &table_renames {
            let (Some(old), Some(new)) = (
                find_table(before, from.as_str()),
                find_table(after, to.as_str()),
            ) else {
                continue;
            };
            debug!(from = %from, to = %to, "renaming table");
            out.push(alter(
                &old.name,
                AlterTableAction::RenameTable {
                    to: new.name.name.clone(),
                },
            ));
        }

        // Drops. Changed indexes lose their old form here, ahead of any
        // column or table they cover.
        for (statement, key) in before.statements.iter().zip(&before_keys).rev() {
            let dropped = match (statement, after_by_key.get(key)) {
                (_, None) => true,
                (Statement::CreateIndex(old), Some(Statement::CreateIndex(new))) => {
                    self.index_changed(old, new, &table_renames)
                }
                _ => false,
            };
            if dropped {
                let table = index_table(statement).map(|t| self.renamed_table(t, &table_renames));
                out.push(self.drop_statement(statement, table.as_ref()));
            }
        }

        // Creates
        for (statement, key) in after.statements.iter().zip(&after_keys) {
            if !before_by_key.contains_key(key) {
                out.push(statement.clone());
            }
        }

        // Alters
        for (statement, key) in after.statements.iter().zip(&after_keys) {
            let Some(old) = before_by_key.get(key) else {
                continue;
            };
            match (old, statement) {
                (Statement::CreateIndex(old), Statement::CreateIndex(new)) => {
                    if self.index_changed(old, new, &table_renames) {
                        debug!(index = %new.name, "index changed, recreating");
                        out.push(statement.clone());
                    }
                }
                (Statement::CreateTable(old), Statement::CreateTable(new)) => {
                    let diff = TableDiff {
                        dialect: self.dialect,
                        not_valid: self.options.not_valid,
                        before: old,
                        after: new,
                        renamed_from: table_renames
                            .iter()
                            .find(|(_, to)| *to == new.name.base_name())
                            .map(|(from, _)| from.as_str()),
                        column_renames: self.column_renames_for(new.name.base_name()),
                        table_renames: &table_renames,
                    };
                    out.extend(diff.statements()?);
                }
                _ => {}
            }
        }

        Ok(out)
    }

    /// Validates the table rename hints against both schemas.
    fn table_renames(&self, before: &Ddl, after: &Ddl) -> Result<Vec<(String, String)>, DiffError> {
        for (from, to) in &self.options.table_renames {
            let statement = format!("ALTER TABLE {from} RENAME TO {to}");
            if find_table(before, from).is_none() {
                return Err(DiffError::not_supported(
                    statement,
                    format!("table `{from}` does not exist in the old schema"),
                ));
            }
            if find_table(after, to).is_none() {
                return Err(DiffError::not_supported(
                    statement,
                    format!("table `{to}` does not exist in the new schema"),
                ));
            }
            if find_table(before, to).is_some() {
                return Err(DiffError::not_supported(
                    statement,
                    format!("table `{to}` already exists in the old schema"),
                ));
            }
        }
        Ok(self.options.table_renames.clone())
    }

    /// Column rename hints must name a table present in both schemas.
    fn check_column_renames(
        &self,
        before_by_key: &BTreeMap<&ObjectKey, &Statement>,
        after: &Ddl,
    ) -> Result<(), DiffError> {
        for rename in &self.options.column_renames {
            let key = ObjectKey::Table(rename.table.clone());
            if find_table(after, &rename.table).is_none() || !before_by_key.contains_key(&key) {
                return Err(DiffError::not_supported(
                    format!(
                        "ALTER TABLE {} RENAME COLUMN {} TO {}",
                        rename.table, rename.from, rename.to
                    ),
                    format!("table `{}` does not exist in both schemas", rename.table),
                ));
            }
        }
        Ok(())
    }

    fn column_renames_for(&self, table: &str) -> Vec<(&str, &str)> {
        self.options
            .column_renames
            .iter()
            .filter(|r| r.table == table)
            .map(|r| (r.from.as_str(), r.to.as_str()))
            .collect()
    }

    fn renamed_table(&self, table: &ObjectName, renames: &[(String, String)]) -> ObjectName {
        renames
            .iter()
            .find(|(from, _)| from == table.base_name())
            .map_or_else(
                || table.clone(),
                |(_, to)| ObjectName {
                    schema: table.schema.clone(),
                    name: Ident::derived(to.clone(), self.dialect),
                },
            )
    }

    /// Compares an old index, with table and column renames applied, to its
    /// new definition.
    fn index_changed(
        &self,
        old: &CreateIndexStatement,
        new: &CreateIndexStatement,
        renames: &[(String, String)],
    ) -> bool {
        let mut old = old.clone();
        old.table = self.renamed_table(&old.table, renames);
        let columns = self.column_renames_for(old.table.base_name());
        rename_columns(&mut old.columns, &columns, self.dialect);
        Statement::CreateIndex(old).string_for_diff()
            != Statement::CreateIndex(new.clone()).string_for_diff()
    }
}

/// Applies `(old, new)` column renames to a column list.
pub(crate) fn rename_columns<'c>(
    columns: impl IntoIterator<Item = &'c mut ColumnIdent>,
    renames: &[(&str, &str)],
    dialect: &dyn Dialect,
) {
    for column in columns {
        if let Some((_, to)) = renames.iter().find(|(from, _)| *from == column.ident.name) {
            column.ident = Ident::derived(*to, dialect);
        }
    }
}

fn find_table<'d>(ddl: &'d Ddl, name: &str) -> Option<&'d CreateTableStatement> {
    ddl.statements.iter().find_map(|s| match s {
        Statement::CreateTable(table) if table.name.base_name() == name => Some(table),
        _ => None,
    })
}

fn index_table(statement: &Statement) -> Option<&ObjectName> {
    match statement {
        Statement::CreateIndex(index) => Some(&index.table),
        _ => None,
    }
}

fn alter(table: &ObjectName, action: AlterTableAction) -> Statement {
    debug!(table = %table, action = %action.to_sql(), "emit");
    Statement::AlterTable(AlterTableStatement {
        name: table.clone(),
        action,
    })
}

/// Computes the statements that migrate `before` into `after` with default
/// options.
///
/// # Errors
///
/// See [`Differ::diff`].
pub fn diff(
    dialect: &dyn Dialect,
    before: Option<&Ddl>,
    after: Option<&Ddl>,
) -> Result<Ddl, DiffError> {
    Differ::new(dialect).diff(before, after)
}

/// Parses and diffs two schemas given as text.
///
/// # Errors
///
/// See [`Differ::diff_sql`].
pub fn diff_sql(
    dialect: &dyn Dialect,
    before: Option<&str>,
    after: Option<&str>,
) -> Result<Ddl, DiffError> {
    Differ::new(dialect).diff_sql(before, after)
}
