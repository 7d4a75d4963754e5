//! Canonical printing: one pass reaches a fixed point and keeps the diff
//! identity of the input.

mod common;

use common::*;
use oxide_ddl::dialect::{CockroachDialect, MySqlDialect, PostgresDialect};
use oxide_ddl::{postgres, DiffError};

#[test]
fn test_postgres_round_trip() {
    round_trip(
        "CREATE TABLE IF NOT EXISTS app.orders (
            id BIGINT PRIMARY KEY,
            user_id INT NOT NULL REFERENCES users (id) ON DELETE CASCADE ON UPDATE SET NULL,
            total NUMERIC(10, 2) DEFAULT 0.00 CHECK (total >= 0),
            tags TEXT[],
            created_at TIMESTAMP WITH TIME ZONE DEFAULT now(),
            CONSTRAINT orders_user_total UNIQUE (user_id, total DESC)
        ) TABLESPACE fast;
        CREATE UNIQUE INDEX orders_created_idx ON app.orders USING btree (created_at DESC) WHERE total > 0;",
        &PostgresDialect,
    );
}

#[test]
fn test_mysql_round_trip() {
    round_trip(
        "CREATE TABLE `order` (
            `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
            `note` VARCHAR(20) DEFAULT 'none',
            KEY `order_note` (`note`),
            UNIQUE KEY (`note`, `id`)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;
        CREATE INDEX order_id ON `order` (id);",
        &MySqlDialect,
    );
}

#[test]
fn test_cockroach_round_trip() {
    round_trip(
        "CREATE TABLE users (
            id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
            name STRING UNIQUE,
            born DATE DEFAULT now():::DATE,
            INDEX (born DESC)
        );",
        &CockroachDialect,
    );
}

#[test]
fn test_canonical_layout() {
    let ddl = postgres::parse(
        "create table  users(id int primary key,name varchar(255) not null unique);",
    )
    .unwrap();
    assert_eq!(
        ddl.to_sql(),
        "CREATE TABLE users (\n    \
         id INT NOT NULL,\n    \
         name VARCHAR(255) NOT NULL,\n    \
         CONSTRAINT users_pkey PRIMARY KEY (id),\n    \
         CONSTRAINT users_unique_name UNIQUE (name)\n\
         );\n"
    );
    assert_eq!(ddl.to_string(), ddl.to_sql());
}

#[test]
fn test_empty_table() {
    let ddl = postgres::parse("CREATE TABLE t ();").unwrap();
    assert_eq!(ddl.to_sql(), "CREATE TABLE t ();\n");
}

#[test]
fn test_reparse_diffs_to_nothing() {
    let sql = "CREATE TABLE t (a INT CHECK (a > 0), b TEXT UNIQUE);";
    let first = postgres::parse(sql).unwrap();
    let second = postgres::parse(&first.to_sql()).unwrap();
    assert_eq!(
        postgres::diff(Some(&first), Some(&second)),
        Err(DiffError::NoDifference)
    );
}

#[test]
fn test_unary_minus_spacing() {
    let ddl = postgres::parse("CREATE TABLE t (a INT DEFAULT -1 CHECK (a > - 5));").unwrap();
    let sql = ddl.to_sql();
    assert!(sql.contains("DEFAULT -1"), "{sql}");
    assert!(sql.contains("CHECK (a > -5)"), "{sql}");
}
