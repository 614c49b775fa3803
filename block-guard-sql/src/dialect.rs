//! SQL dialect implementations for Postgres and `SQLite`.
//!
//! The count builder only needs two things from a dialect: how to spell a
//! parameter placeholder and how to spell a membership test.

use crate::Value;

/// SQL dialect trait for database-specific syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;

    /// Format an IN clause with multiple values.
    ///
    /// Returns the SQL fragment and the parameters it binds.
    fn in_clause(&self, field: &str, values: &[Value], start_idx: usize) -> (String, Vec<Value>);
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    fn in_clause(&self, field: &str, values: &[Value], start_idx: usize) -> (String, Vec<Value>) {
        // Postgres: field = ANY($1) with array parameter
        let sql = format!("{field} = ANY(${start_idx})");
        (sql, vec![Value::Array(values.to_vec())])
    }
}

/// `SQLite` dialect.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    fn in_clause(&self, field: &str, values: &[Value], start_idx: usize) -> (String, Vec<Value>) {
        // SQLite: field IN (?1, ?2, ?3) with expanded parameters
        let placeholders: Vec<String> = (0..values.len())
            .map(|i| format!("?{}", start_idx + i))
            .collect();
        let sql = format!("{} IN ({})", field, placeholders.join(", "));
        (sql, values.to_vec())
    }
}
