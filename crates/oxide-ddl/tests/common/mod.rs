#![allow(dead_code)]

use oxide_ddl::ast::{CreateTableStatement, Statement};
use oxide_ddl::dialect::Dialect;
use oxide_ddl::{Ddl, DiffError, DiffOptions, Differ, ParseError, Parser};

pub fn parse(sql: &str, dialect: &dyn Dialect) -> Ddl {
    Parser::new(sql, dialect)
        .parse()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str, dialect: &dyn Dialect) -> ParseError {
    Parser::new(sql, dialect)
        .parse()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_table(sql: &str, dialect: &dyn Dialect) -> CreateTableStatement {
    let ddl = parse(sql, dialect);
    match ddl.statements.as_slice() {
        [Statement::CreateTable(table)] => table.clone(),
        other => panic!("Expected a single CREATE TABLE, got {other:?}"),
    }
}

/// Diffs two schemas and returns the migration SQL.
pub fn migrate(before: &str, after: &str, dialect: &dyn Dialect) -> String {
    migrate_with(before, after, dialect, DiffOptions::new())
}

pub fn migrate_with(
    before: &str,
    after: &str,
    dialect: &dyn Dialect,
    options: DiffOptions,
) -> String {
    let before = parse(before, dialect);
    let after = parse(after, dialect);
    let migration = Differ::new(dialect)
        .options(options)
        .diff(Some(&before), Some(&after))
        .unwrap_or_else(|e| panic!("Diff failed: {e}"));
    assert_reparses(&migration.to_sql(), dialect);
    migration.to_sql()
}

pub fn diff_err(
    before: &str,
    after: &str,
    dialect: &dyn Dialect,
    options: DiffOptions,
) -> DiffError {
    let before = parse(before, dialect);
    let after = parse(after, dialect);
    Differ::new(dialect)
        .options(options)
        .diff(Some(&before), Some(&after))
        .expect_err("Expected diff error")
}

/// Generated SQL must be accepted by the same dialect's parser.
pub fn assert_reparses(sql: &str, dialect: &dyn Dialect) {
    if let Err(e) = Parser::new(sql, dialect).parse() {
        panic!("Generated SQL does not re-parse:\n{sql}\nError: {e}");
    }
}

/// Verifies that printing is a fixed point after one pass and that the
/// printed form has the same diff identity as the input.
pub fn round_trip(sql: &str, dialect: &dyn Dialect) {
    let ast1 = parse(sql, dialect);
    let rendered1 = ast1.to_sql();
    let ast2 = parse(&rendered1, dialect);
    let rendered2 = ast2.to_sql();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    assert_eq!(ast1.string_for_diff(), ast2.string_for_diff());
}
