//! Executes generated count queries against an in-memory SQLite database.
//!
//! Checks that the SQL text is accepted by a real engine and that the bound
//! parameters select the intended rows.

use block_guard_sql::{Operator, QueryResult, Value, sqlite};
use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) => panic!("SQLite queries expand arrays into scalar params"),
    }
}

fn run(conn: &Connection, query: &QueryResult) -> i64 {
    let params: Vec<SqlValue> = query.params.iter().map(to_sql_value).collect();
    conn.query_row(&query.sql, rusqlite::params_from_iter(params), |row| row.get(0))
        .expect("count query should execute")
}

fn seeded() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch(
        "CREATE TABLE block_tabs (
             id INTEGER PRIMARY KEY,
             tabbed_content TEXT,
             status TEXT,
             deleted_at TEXT
         );
         INSERT INTO block_tabs (tabbed_content, status, deleted_at) VALUES
             ('T1', 'published', NULL),
             ('T1', 'draft', NULL),
             ('T2', 'published', NULL),
             ('T2', 'published', NULL),
             ('T2', 'archived', '2025-01-01'),
             (NULL, 'draft', NULL);",
    )
    .expect("seed block_tabs");
    conn
}

#[test]
fn counts_children_of_one_parent() {
    let conn = seeded();
    assert_eq!(run(&conn, &sqlite("block_tabs").where_eq("tabbed_content", "T1").build()), 2);
    assert_eq!(run(&conn, &sqlite("block_tabs").where_eq("tabbed_content", "T2").build()), 3);
}

#[test]
fn unknown_parent_counts_zero() {
    let conn = seeded();
    let query = sqlite("block_tabs").where_eq("tabbed_content", "T404").build();
    assert_eq!(run(&conn, &query), 0);
}

#[test]
fn unfiltered_counts_every_row() {
    let conn = seeded();
    assert_eq!(run(&conn, &sqlite("block_tabs").build()), 6);
}

#[test]
fn combined_filters() {
    let conn = seeded();
    let query = sqlite("block_tabs")
        .where_eq("tabbed_content", "T2")
        .filter("deleted_at", Operator::Eq, Value::Null)
        .build();
    assert_eq!(run(&conn, &query), 2);

    let query = sqlite("block_tabs")
        .filter("tabbed_content", Operator::Ne, Value::Null)
        .filter(
            "status",
            Operator::In,
            Value::Array(vec!["draft".into(), "archived".into()]),
        )
        .build();
    assert_eq!(run(&conn, &query), 2);
}

#[test]
fn empty_membership_list_counts_zero() {
    let conn = seeded();
    let query = sqlite("block_tabs")
        .filter("status", Operator::In, Value::Array(vec![]))
        .build();
    assert_eq!(run(&conn, &query), 0);
}

#[test]
fn alias_names_the_result_column() {
    let conn = seeded();
    let query = sqlite("block_tabs").alias("total").build();
    let column: String = conn
        .prepare(&query.sql)
        .expect("prepare")
        .column_name(0)
        .expect("column 0")
        .to_string();
    assert_eq!(column, "total");
}

#[test]
fn integer_foreign_keys() {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch(
        "CREATE TABLE block_highlights_items (id INTEGER PRIMARY KEY, highlights INTEGER);
         INSERT INTO block_highlights_items (highlights) VALUES (1), (1), (1), (2);",
    )
    .expect("seed block_highlights_items");

    let query = sqlite("block_highlights_items").where_eq("highlights", 1_i64).build();
    assert_eq!(run(&conn, &query), 3);
}

#[test]
fn dialects_build_from_outside_the_crate() {
    use block_guard_sql::{CountBuilder, Postgres, Sqlite};

    let conn = seeded();
    let lite = CountBuilder::new(Sqlite::default(), "block_tabs")
        .where_eq("tabbed_content", "T2")
        .build();
    assert_eq!(run(&conn, &lite), 3);

    let pg = CountBuilder::new(Postgres::default(), "block_tabs")
        .where_eq("tabbed_content", "T2")
        .build();
    assert_eq!(pg.sql, "SELECT COUNT(*) AS count FROM block_tabs WHERE tabbed_content = $1");
    assert_eq!(pg.params, lite.params);
}
