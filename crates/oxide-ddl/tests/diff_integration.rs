//! Integration tests for the schema diff engine.
//!
//! Each test parses two versions of a schema, diffs them and checks the
//! migration text. `migrate` also checks that the migration re-parses.

mod common;

use common::*;
use oxide_ddl::ast::Statement;
use oxide_ddl::dialect::{CockroachDialect, MySqlDialect, PostgresDialect};
use oxide_ddl::{cockroach, diff, mysql, postgres, DiffError, DiffOptions};

// =============================================================================
// Column added and removed with an inline CHECK
// =============================================================================

const USERS_V1: &str = "
CREATE TABLE users (
    id INT PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE
);";

const USERS_V2: &str = "
CREATE TABLE users (
    id INT PRIMARY KEY,
    name VARCHAR(255) NOT NULL UNIQUE,
    age INT DEFAULT 0 CHECK (age >= 0)
);";

#[test]
fn test_add_column_with_check() {
    assert_eq!(
        migrate(USERS_V1, USERS_V2, &PostgresDialect),
        "ALTER TABLE users ADD COLUMN age INT DEFAULT 0;\n\
         ALTER TABLE users ADD CONSTRAINT users_age_check CHECK (age >= 0);\n"
    );
}

#[test]
fn test_drop_column_with_check() {
    assert_eq!(
        migrate(USERS_V2, USERS_V1, &PostgresDialect),
        "ALTER TABLE users DROP CONSTRAINT users_age_check;\n\
         ALTER TABLE users DROP COLUMN age;\n"
    );
}

#[test]
fn test_widen_unique_index() {
    let before = "CREATE TABLE users (id INT PRIMARY KEY, name STRING, age INT, UNIQUE (name));";
    let after = "CREATE TABLE users (
        id INT PRIMARY KEY,
        name STRING,
        age INT,
        CONSTRAINT users_unique_name UNIQUE (name, age)
    );";
    assert_eq!(
        migrate(before, after, &CockroachDialect),
        "DROP INDEX users_unique_name;\n\
         CREATE UNIQUE INDEX users_unique_name ON users (name, age);\n"
    );
}

#[test]
fn test_widen_unique_constraint_postgres() {
    let before = "CREATE TABLE users (name TEXT, age INT, UNIQUE (name));";
    let after = "CREATE TABLE users (name TEXT, age INT, CONSTRAINT users_unique_name UNIQUE (name, age));";
    assert_eq!(
        migrate(before, after, &PostgresDialect),
        "ALTER TABLE users DROP CONSTRAINT users_unique_name;\n\
         ALTER TABLE users ADD CONSTRAINT users_unique_name UNIQUE (name, age);\n"
    );
}

// =============================================================================
// Top-level cases
// =============================================================================

#[test]
fn test_no_difference() {
    let a = postgres::parse(USERS_V2).unwrap();
    let b = postgres::parse(USERS_V2).unwrap();
    assert_eq!(postgres::diff(Some(&a), Some(&b)), Err(DiffError::NoDifference));
    assert_eq!(postgres::diff(None, None), Err(DiffError::NoDifference));
}

#[test]
fn test_formatting_differences_are_ignored() {
    let a = postgres::parse("create table users (id int primary key, \"name\" text);").unwrap();
    let b = postgres::parse("CREATE TABLE users (\n  id INT NOT NULL PRIMARY KEY,\n  name TEXT\n);")
        .unwrap();
    assert_eq!(postgres::diff(Some(&a), Some(&b)), Err(DiffError::NoDifference));
}

#[test]
fn test_expression_keyword_case_is_ignored() {
    let a = postgres::parse(
        "CREATE TABLE t (a INT, b INT, c BOOLEAN DEFAULT true, CHECK (a > 0 and b > 0));",
    )
    .unwrap();
    let b = postgres::parse(
        "CREATE TABLE t (a INT, b INT, c BOOLEAN DEFAULT TRUE, CHECK (a > 0 AND b > 0));",
    )
    .unwrap();
    assert_eq!(postgres::diff(Some(&a), Some(&b)), Err(DiffError::NoDifference));
}

#[test]
fn test_create_from_nothing() {
    let schema = postgres::parse(USERS_V1).unwrap();
    let migration = postgres::diff(None, Some(&schema)).unwrap();
    assert_eq!(migration.to_sql(), schema.to_sql());
}

#[test]
fn test_drop_everything() {
    let schema = mysql::parse(
        "CREATE TABLE a (id INT); CREATE TABLE b (id INT); CREATE INDEX b_id ON b (id);",
    )
    .unwrap();
    let migration = mysql::diff(Some(&schema), None).unwrap();
    assert_eq!(
        migration.to_sql(),
        "DROP INDEX b_id ON b;\nDROP TABLE b;\nDROP TABLE a;\n"
    );
}

#[test]
fn test_drops_then_creates_then_alters() {
    let before = "
        CREATE TABLE a (id INT);
        CREATE TABLE b (id INT);
        CREATE INDEX b_id_idx ON b (id);";
    let after = "
        CREATE TABLE a (id BIGINT);
        CREATE TABLE c (id INT);";
    assert_eq!(
        migrate(before, after, &PostgresDialect),
        "DROP INDEX b_id_idx;\n\
         DROP TABLE b;\n\
         CREATE TABLE c (\n    id INT\n);\n\
         ALTER TABLE a ALTER COLUMN id SET DATA TYPE BIGINT;\n"
    );
}

#[test]
fn test_changed_index_dropped_before_its_column() {
    let before = "CREATE TABLE t (a INT, b INT); CREATE INDEX i ON t (a, b);";
    let after = "CREATE TABLE t (a INT); CREATE INDEX i ON t (a);";
    assert_eq!(
        migrate(before, after, &PostgresDialect),
        "DROP INDEX i;\n\
         ALTER TABLE t DROP COLUMN b;\n\
         CREATE INDEX i ON t (a);\n"
    );
}

#[test]
fn test_index_moved_off_dropped_table() {
    let before = "CREATE TABLE b (x INT); CREATE INDEX i ON b (x);";
    let after = "CREATE TABLE c (x INT); CREATE INDEX i ON c (x);";
    assert_eq!(
        migrate(before, after, &MySqlDialect),
        "DROP INDEX i ON b;\n\
         DROP TABLE b;\n\
         CREATE TABLE c (\n    x INT\n);\n\
         CREATE INDEX i ON c (x);\n"
    );
}

#[test]
fn test_alter_statements_cannot_be_diffed() {
    let err = diff_err(
        "CREATE TABLE t (id INT);",
        "ALTER TABLE t ADD COLUMN a INT;",
        &PostgresDialect,
        DiffOptions::new(),
    );
    match err {
        DiffError::NotSupported { statement, .. } => assert_eq!(statement, "ALTER TABLE t"),
        other => panic!("Expected NotSupported, got {other:?}"),
    }
}

#[test]
fn test_diff_sql_reports_parse_errors() {
    let err = diff::diff_sql(
        &PostgresDialect,
        Some("CREATE TABLE t (id INT);"),
        Some("CREATE TABLE"),
    )
    .unwrap_err();
    assert!(matches!(err, DiffError::Parse(_)));
}

// =============================================================================
// Column changes
// =============================================================================

#[test]
fn test_column_changes_are_separate_statements() {
    assert_eq!(
        migrate(
            "CREATE TABLE t (a INT, b TEXT DEFAULT 'x' NOT NULL);",
            "CREATE TABLE t (a BIGINT NOT NULL DEFAULT 1, b TEXT);",
            &PostgresDialect
        ),
        "ALTER TABLE t ALTER COLUMN a SET DATA TYPE BIGINT;\n\
         ALTER TABLE t ALTER COLUMN a SET DEFAULT 1;\n\
         ALTER TABLE t ALTER COLUMN a SET NOT NULL;\n\
         ALTER TABLE t ALTER COLUMN b DROP DEFAULT;\n\
         ALTER TABLE t ALTER COLUMN b DROP NOT NULL;\n"
    );
}

#[test]
fn test_mysql_uses_modify_column() {
    assert_eq!(
        migrate(
            "CREATE TABLE t (id INT NOT NULL, name VARCHAR(50));",
            "CREATE TABLE t (id INT NOT NULL, name VARCHAR(100) NOT NULL DEFAULT 'x');",
            &MySqlDialect
        ),
        "ALTER TABLE t MODIFY COLUMN name VARCHAR(100) NOT NULL DEFAULT 'x';\n"
    );
}

#[test]
fn test_mysql_default_only_change() {
    assert_eq!(
        migrate(
            "CREATE TABLE t (name VARCHAR(50) DEFAULT 'a');",
            "CREATE TABLE t (name VARCHAR(50) DEFAULT 'b');",
            &MySqlDialect
        ),
        "ALTER TABLE t ALTER COLUMN name SET DEFAULT 'b';\n"
    );
}

#[test]
fn test_mysql_drop_index_names_table() {
    assert_eq!(
        migrate(
            "CREATE TABLE t (a INT, UNIQUE KEY t_a (a));",
            "CREATE TABLE t (a INT);",
            &MySqlDialect
        ),
        "DROP INDEX t_a ON t;\n"
    );
}

#[test]
fn test_auto_increment_change_needs_modify() {
    let before = postgres::parse("CREATE TABLE t (id INT);").unwrap();
    let mut after = before.clone();
    if let Statement::CreateTable(table) = &mut after.statements[0] {
        table.columns[0].auto_increment = true;
    }
    let err = postgres::diff(Some(&before), Some(&after)).unwrap_err();
    assert!(matches!(err, DiffError::NotSupported { .. }));

    let migration = mysql::diff(Some(&before), Some(&after)).unwrap();
    assert_eq!(
        migration.to_sql(),
        "ALTER TABLE t MODIFY COLUMN id INT AUTO_INCREMENT;\n"
    );
}

#[test]
fn test_table_option_change_is_not_supported() {
    let err = diff_err(
        "CREATE TABLE t (id INT) ENGINE=InnoDB;",
        "CREATE TABLE t (id INT) ENGINE=MyISAM;",
        &MySqlDialect,
        DiffOptions::new(),
    );
    assert!(matches!(err, DiffError::NotSupported { .. }));
}

// =============================================================================
// NOT VALID
// =============================================================================

const POSTS_V1: &str = "CREATE TABLE posts (id INT, user_id INT);";
const POSTS_V2: &str = "CREATE TABLE posts (
    id INT,
    user_id INT REFERENCES users (id),
    CHECK (id > 0)
);";

#[test]
fn test_not_valid_constraints() {
    assert_eq!(
        migrate_with(
            POSTS_V1,
            POSTS_V2,
            &PostgresDialect,
            DiffOptions::new().not_valid(true)
        ),
        "ALTER TABLE posts ADD CONSTRAINT posts_user_id_fkey FOREIGN KEY (user_id) REFERENCES users (id) NOT VALID;\n\
         ALTER TABLE posts ADD CONSTRAINT posts_id_check CHECK (id > 0) NOT VALID;\n"
    );
}

#[test]
fn test_not_valid_ignored_without_dialect_support() {
    assert_eq!(
        migrate_with(
            POSTS_V1,
            POSTS_V2,
            &MySqlDialect,
            DiffOptions::new().not_valid(true)
        ),
        "ALTER TABLE posts ADD CONSTRAINT posts_user_id_fkey FOREIGN KEY (user_id) REFERENCES users (id);\n\
         ALTER TABLE posts ADD CONSTRAINT posts_id_check CHECK (id > 0);\n"
    );
}

// =============================================================================
// Renames
// =============================================================================

#[test]
fn test_without_hints_a_rename_is_drop_and_create() {
    let migration = migrate(
        "CREATE TABLE people (id INT);",
        "CREATE TABLE users (id INT);",
        &PostgresDialect,
    );
    assert_eq!(
        migration,
        "DROP TABLE people;\nCREATE TABLE users (\n    id INT\n);\n"
    );
}

#[test]
fn test_table_and_column_rename() {
    let options = DiffOptions::new()
        .rename_table("people", "users")
        .rename_column("users", "fullname", "name");
    assert_eq!(
        migrate_with(
            "CREATE TABLE people (id INT PRIMARY KEY, fullname TEXT);",
            "CREATE TABLE users (id INT PRIMARY KEY, name TEXT);",
            &PostgresDialect,
            options
        ),
        "ALTER TABLE people RENAME TO users;\n\
         ALTER TABLE users RENAME CONSTRAINT people_pkey TO users_pkey;\n\
         ALTER TABLE users RENAME COLUMN fullname TO name;\n"
    );
}

#[test]
fn test_renamed_index_constraint_is_recreated() {
    let options = DiffOptions::new().rename_table("people", "users");
    assert_eq!(
        migrate_with(
            "CREATE TABLE people (email STRING UNIQUE);",
            "CREATE TABLE users (email STRING UNIQUE);",
            &CockroachDialect,
            options
        ),
        "ALTER TABLE people RENAME TO users;\n\
         DROP INDEX people_unique_email;\n\
         CREATE UNIQUE INDEX users_unique_email ON users (email);\n"
    );
}

#[test]
fn test_foreign_key_follows_table_rename() {
    let options = DiffOptions::new().rename_table("people", "users");
    assert_eq!(
        migrate_with(
            "CREATE TABLE people (id INT PRIMARY KEY);
             CREATE TABLE posts (author INT, CONSTRAINT posts_author_fk FOREIGN KEY (author) REFERENCES people (id));",
            "CREATE TABLE users (id INT PRIMARY KEY);
             CREATE TABLE posts (author INT, CONSTRAINT posts_author_fk FOREIGN KEY (author) REFERENCES users (id));",
            &PostgresDialect,
            options
        ),
        "ALTER TABLE people RENAME TO users;\n\
         ALTER TABLE users RENAME CONSTRAINT people_pkey TO users_pkey;\n"
    );
}

#[test]
fn test_rename_hint_validation() {
    let before = "CREATE TABLE a (id INT); CREATE TABLE b (id INT);";
    let after = "CREATE TABLE b (id INT);";
    let err = diff_err(
        before,
        after,
        &PostgresDialect,
        DiffOptions::new().rename_table("a", "b"),
    );
    match err {
        DiffError::NotSupported { reason, .. } => {
            assert_eq!(reason, "table `b` already exists in the old schema");
        }
        other => panic!("Expected NotSupported, got {other:?}"),
    }
}

#[test]
fn test_unknown_column_rename_hint() {
    let err = diff_err(
        "CREATE TABLE t (a INT);",
        "CREATE TABLE t (b INT);",
        &PostgresDialect,
        DiffOptions::new().rename_column("t", "x", "b"),
    );
    assert!(matches!(err, DiffError::NotSupported { .. }));
}

#[test]
fn test_cockroach_wrappers() {
    let before = cockroach::parse("CREATE TABLE t (id INT8);").unwrap();
    let after = cockroach::parse("CREATE TABLE t (id INT8, note STRING);").unwrap();
    let migration = cockroach::diff(Some(&before), Some(&after)).unwrap();
    assert_eq!(migration.to_sql(), "ALTER TABLE t ADD COLUMN note STRING;\n");
}
