//! Diff of two versions of one table.

use tracing::{debug, warn};

use super::{rename_columns, DiffError};
use crate::ast::{
    AlterColumnAction, AlterTableAction, Column, Constraint, CreateIndexStatement,
    CreateTableStatement, Default, DropIndexStatement, Ident, ObjectName, Statement, TableOption,
};
use crate::dialect::{AlterColumnStyle, Dialect};

pub(super) struct TableDiff<'a> {
    pub(super) dialect: &'a dyn Dialect,
    pub(super) not_valid: bool,
    pub(super) before: &'a CreateTableStatement,
    pub(super) after: &'a CreateTableStatement,
    /// Old table name when the table is being renamed.
    pub(super) renamed_from: Option<&'a str>,
    /// `(old, new)` column renames for this table.
    pub(super) column_renames: Vec<(&'a str, &'a str)>,
    /// `(old, new)` table renames of the whole run.
    pub(super) table_renames: &'a [(String, String)],
}

impl TableDiff<'_> {
    pub(super) fn statements(&self) -> Result<Vec<Statement>, DiffError> {
        self.check_options()?;
        debug!(table = %self.after.name, "diffing table");

        let before_constraints = self.normalized_constraints();
        let mut out = Vec::new();

        // Constraint renames
        let mut renamed: Vec<(&Constraint, &Constraint)> = Vec::new();
        for old in &before_constraints {
            if let Some(new) = self.rename_candidate(old) {
                out.push(self.alter(AlterTableAction::RenameConstraint {
                    from: old.name().clone(),
                    to: new.name().clone(),
                }));
                renamed.push((old, new));
            }
        }
        let counterpart = |old: &Constraint| {
            renamed
                .iter()
                .find(|(o, _)| o.name() == old.name())
                .map(|(_, n)| *n)
                .or_else(|| self.after.constraint(&old.name().name))
        };
        let is_renamed_target =
            |new: &Constraint| renamed.iter().any(|(_, n)| n.name() == new.name());

        // Constraint drops
        let mut changed: Vec<&Constraint> = Vec::new();
        for old in &before_constraints {
            match counterpart(old) {
                Some(new) if new.definition_for_diff() == old.definition_for_diff() => {}
                Some(new) => {
                    debug!(constraint = %old.name(), "constraint changed, recreating");
                    out.push(self.drop_constraint(old));
                    changed.push(new);
                }
                None => out.push(self.drop_constraint(old)),
            }
        }

        // Columns
        self.column_statements(&mut out)?;

        // Constraint adds
        for new in &self.after.constraints {
            let existed = before_constraints
                .iter()
                .any(|old| old.name().name == new.name().name)
                || is_renamed_target(new);
            let was_changed = changed.iter().any(|c| c.name() == new.name());
            if !existed || was_changed {
                out.push(self.add_constraint(new));
            }
        }

        Ok(out)
    }

    fn check_options(&self) -> Result<(), DiffError> {
        let before: Vec<String> = self
            .before
            .options
            .iter()
            .map(TableOption::string_for_diff)
            .collect();
        let after: Vec<String> = self
            .after
            .options
            .iter()
            .map(TableOption::string_for_diff)
            .collect();
        if before == after {
            Ok(())
        } else {
            Err(DiffError::not_supported(
                format!("CREATE TABLE {}", self.after.name),
                format!(
                    "table options changed from `{}` to `{}`",
                    before.join(" "),
                    after.join(" ")
                ),
            ))
        }
    }

    /// Old constraints with column and table renames applied, so that they
    /// compare equal to untouched counterparts in the new table.
    fn normalized_constraints(&self) -> Vec<Constraint> {
        self.before
            .constraints
            .iter()
            .map(|constraint| {
                let mut constraint = constraint.clone();
                rename_columns(constraint.columns_mut(), &self.column_renames, self.dialect);
                if let Constraint::ForeignKey {
                    ref_table,
                    ref_columns,
                    ..
                } = &mut constraint
                {
                    if let Some((_, to)) = self
                        .table_renames
                        .iter()
                        .find(|(from, _)| from == ref_table.base_name())
                    {
                        ref_table.name = Ident::derived(to.clone(), self.dialect);
                    }
                    // References to this table itself follow its own renames.
                    if ref_table.base_name() == self.after.name.base_name() {
                        rename_columns(ref_columns.iter_mut(), &self.column_renames, self.dialect);
                    }
                }
                constraint
            })
            .collect()
    }

    /// Finds the `{new}_...` counterpart of an `{old}_...` constraint on a
    /// renamed table.
    fn rename_candidate<'c>(&'c self, old: &Constraint) -> Option<&'c Constraint> {
        let from = self.renamed_from?;
        let suffix = old.name().name.strip_prefix(from)?.strip_prefix('_')?;
        let target = format!("{}_{suffix}", self.after.name.base_name());
        if self.after.constraint(&old.name().name).is_some() {
            return None;
        }
        let new = self.after.constraint(&target)?;
        if new.definition_for_diff() != old.definition_for_diff() {
            return None;
        }
        if old.is_index() || !self.dialect.supports_rename_constraint() {
            warn!(
                constraint = %old.name(),
                target = %target,
                dialect = self.dialect.name(),
                "constraint cannot be renamed, recreating"
            );
            return None;
        }
        Some(new)
    }

    fn column_statements(&self, out: &mut Vec<Statement>) -> Result<(), DiffError> {
        for (from, to) in &self.column_renames {
            let (Some(old), Some(new)) = (self.before.column(from), self.after.column(to)) else {
                return Err(DiffError::not_supported(
                    format!(
                        "ALTER TABLE {} RENAME COLUMN {from} TO {to}",
                        self.after.name
                    ),
                    format!(
                        "column `{from}` must exist in the old table and `{to}` in the new one"
                    ),
                ));
            };
            if self.after.column(from).is_some() {
                return Err(DiffError::not_supported(
                    format!("ALTER TABLE {} RENAME COLUMN {from} TO {to}", self.after.name),
                    format!("column `{from}` still exists in the new table"),
                ));
            }
            out.push(self.alter(AlterTableAction::RenameColumn {
                from: old.name.clone(),
                to: new.name.clone(),
            }));
        }

        // Old columns under their new names.
        let before_columns: Vec<Column> = self
            .before
            .columns
            .iter()
            .map(|column| {
                let mut column = column.clone();
                if let Some((_, to)) = self
                    .column_renames
                    .iter()
                    .find(|(from, _)| *from == column.name.name)
                {
                    column.name = Ident::derived(*to, self.dialect);
                }
                column
            })
            .collect();

        for old in &before_columns {
            if self.after.column(&old.name.name).is_none() {
                out.push(self.alter(AlterTableAction::DropColumn {
                    name: old.name.clone(),
                }));
            }
        }

        for new in &self.after.columns {
            if let Some(old) = before_columns.iter().find(|c| c.name.name == new.name.name) {
                self.alter_column(old, new, out)?;
            }
        }

        for new in &self.after.columns {
            if !before_columns.iter().any(|c| c.name.name == new.name.name) {
                out.push(self.alter(AlterTableAction::AddColumn(new.clone())));
            }
        }
        Ok(())
    }

    fn alter_column(
        &self,
        old: &Column,
        new: &Column,
        out: &mut Vec<Statement>,
    ) -> Result<(), DiffError> {
        let type_changed = old.data_type.string_for_diff() != new.data_type.string_for_diff();
        let default_changed = old.default.as_ref().map(Default::string_for_diff)
            != new.default.as_ref().map(Default::string_for_diff);
        let null_changed = old.not_null != new.not_null;
        let auto_increment_changed = old.auto_increment != new.auto_increment;

        if self.dialect.alter_column_style() == AlterColumnStyle::Modify {
            if type_changed || null_changed || auto_increment_changed {
                out.push(self.alter(AlterTableAction::ModifyColumn(new.clone())));
                return Ok(());
            }
        } else {
            if auto_increment_changed {
                return Err(DiffError::not_supported(
                    format!("ALTER TABLE {} ALTER COLUMN {}", self.after.name, new.name),
                    "AUTO_INCREMENT cannot be changed in this dialect",
                ));
            }
            if type_changed {
                out.push(self.alter_column_action(
                    new,
                    AlterColumnAction::SetDataType(new.data_type.clone()),
                ));
            }
        }

        if default_changed {
            let action = new
                .default
                .clone()
                .map_or(AlterColumnAction::DropDefault, AlterColumnAction::SetDefault);
            out.push(self.alter_column_action(new, action));
        }
        if null_changed {
            let action = if new.not_null {
                AlterColumnAction::SetNotNull
            } else {
                AlterColumnAction::DropNotNull
            };
            out.push(self.alter_column_action(new, action));
        }
        Ok(())
    }

    fn alter_column_action(&self, column: &Column, action: AlterColumnAction) -> Statement {
        self.alter(AlterTableAction::AlterColumn {
            name: column.name.clone(),
            action,
        })
    }

    fn drop_constraint(&self, constraint: &Constraint) -> Statement {
        if constraint.is_index() {
            let statement = Statement::DropIndex(DropIndexStatement {
                if_exists: false,
                name: ObjectName::new(constraint.name().clone()),
                table: self
                    .dialect
                    .drop_index_requires_table()
                    .then(|| self.after.name.clone()),
            });
            debug!(statement = %statement.describe(), "emit");
            statement
        } else {
            self.alter(AlterTableAction::DropConstraint {
                name: constraint.name().clone(),
            })
        }
    }

    fn add_constraint(&self, constraint: &Constraint) -> Statement {
        match constraint {
            Constraint::Index {
                name,
                unique,
                columns,
            } => {
                let statement = Statement::CreateIndex(CreateIndexStatement {
                    unique: *unique,
                    if_not_exists: false,
                    name: ObjectName::new(name.clone()),
                    table: self.after.name.clone(),
                    using: None,
                    columns: columns.clone(),
                    predicate: None,
                });
                debug!(statement = %statement.describe(), "emit");
                statement
            }
            Constraint::ForeignKey { .. } | Constraint::Check { .. } => {
                self.alter(AlterTableAction::AddConstraint {
                    constraint: constraint.clone(),
                    not_valid: self.not_valid && self.dialect.supports_not_valid(),
                })
            }
            Constraint::PrimaryKey { .. } | Constraint::Unique { .. } => {
                self.alter(AlterTableAction::AddConstraint {
                    constraint: constraint.clone(),
                    not_valid: false,
                })
            }
        }
    }

    fn alter(&self, action: AlterTableAction) -> Statement {
        super::alter(&self.after.name, action)
    }
}
