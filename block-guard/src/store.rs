//! Count stores: where a guard reads the current number of children.
//!
//! A host implements [`CountStore`] over its connection or transaction. The
//! query to run is described by a [`ChildCountQuery`], which renders itself as
//! parameterized SQL for Postgres or SQLite:
//!
//! ```
//! use block_guard::{ChildCountQuery, ParentKey};
//!
//! let parent = ParentKey::from("H1");
//! let query = ChildCountQuery::new("block_highlights_items", "highlights", &parent);
//! let sql = query.to_postgres();
//! assert_eq!(
//!     sql.sql,
//!     "SELECT COUNT(*) AS count FROM block_highlights_items WHERE highlights = $1"
//! );
//! ```
//!
//! [`MemoryStore`] is an in-memory implementation for tests.

use crate::error::QueryError;
use block_guard_sql::{QueryResult, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifier of a parent record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParentKey {
    /// Integer primary key.
    Int(i64),
    /// String primary key (UUID, slug, ...).
    Str(String),
}

impl ParentKey {
    /// The key as a bound SQL parameter.
    #[must_use]
    pub fn to_sql_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::Int(*n),
            Self::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ParentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParentKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for ParentKey {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for ParentKey {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ParentKey {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// `SELECT COUNT(*) FROM <table> WHERE <foreign_key> = <parent>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildCountQuery<'a> {
    table: &'a str,
    foreign_key: &'a str,
    parent: &'a ParentKey,
}

impl<'a> ChildCountQuery<'a> {
    /// Describe a count of `table` rows whose `foreign_key` equals `parent`.
    #[must_use]
    pub const fn new(table: &'a str, foreign_key: &'a str, parent: &'a ParentKey) -> Self {
        Self {
            table,
            foreign_key,
            parent,
        }
    }

    /// Child table.
    #[must_use]
    pub const fn table(&self) -> &'a str {
        self.table
    }

    /// Foreign-key column on the child table.
    #[must_use]
    pub const fn foreign_key(&self) -> &'a str {
        self.foreign_key
    }

    /// Parent being counted.
    #[must_use]
    pub const fn parent(&self) -> &'a ParentKey {
        self.parent
    }

    /// Render for Postgres (`$1` placeholder).
    ///
    /// # Panics
    ///
    /// Panics if the table or foreign key is not a valid SQL identifier.
    #[must_use]
    pub fn to_postgres(&self) -> QueryResult {
        block_guard_sql::postgres(self.table)
            .where_eq(self.foreign_key, self.parent.to_sql_value())
            .build()
    }

    /// Render for SQLite (`?1` placeholder).
    ///
    /// # Panics
    ///
    /// Panics if the table or foreign key is not a valid SQL identifier.
    #[must_use]
    pub fn to_sqlite(&self) -> QueryResult {
        block_guard_sql::sqlite(self.table)
            .where_eq(self.foreign_key, self.parent.to_sql_value())
            .build()
    }
}

/// Reads child counts for a guard.
///
/// Implementations run the count on the host's current connection or
/// transaction and block until it completes.
pub trait CountStore {
    /// Number of children matching `query`.
    fn count(&self, query: &ChildCountQuery<'_>) -> Result<i64, QueryError>;
}

impl<T: CountStore + ?Sized> CountStore for &T {
    fn count(&self, query: &ChildCountQuery<'_>) -> Result<i64, QueryError> {
        (**self).count(query)
    }
}

impl<T: CountStore + ?Sized> CountStore for Box<T> {
    fn count(&self, query: &ChildCountQuery<'_>) -> Result<i64, QueryError> {
        (**self).count(query)
    }
}

type CountKey = (String, String, ParentKey);

/// In-memory [`CountStore`].
///
/// Unknown parents count as zero, as `COUNT(*)` over no rows would. A failure
/// set with [`fail_with`](Self::fail_with) is returned by every query until
/// cleared.
///
/// ```
/// use block_guard::{ChildCountQuery, CountStore, MemoryStore, ParentKey};
///
/// let store = MemoryStore::new().with_count("block_tabs", "tabbed_content", "T1", 3);
/// let parent = ParentKey::from("T1");
/// let query = ChildCountQuery::new("block_tabs", "tabbed_content", &parent);
/// assert_eq!(store.count(&query), Ok(3));
/// assert_eq!(store.queries(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    counts: Mutex<HashMap<CountKey, i64>>,
    failure: Mutex<Option<QueryError>>,
    queries: AtomicUsize,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_count`](Self::set_count).
    #[must_use]
    pub fn with_count(
        self,
        table: &str,
        foreign_key: &str,
        parent: impl Into<ParentKey>,
        count: i64,
    ) -> Self {
        self.set_count(table, foreign_key, parent, count);
        self
    }

    /// Set the number of children stored for a parent.
    pub fn set_count(&self, table: &str, foreign_key: &str, parent: impl Into<ParentKey>, count: i64) {
        lock(&self.counts).insert(
            (table.to_string(), foreign_key.to_string(), parent.into()),
            count,
        );
    }

    /// Make every following query fail with `err`.
    pub fn fail_with(&self, err: QueryError) {
        *lock(&self.failure) = Some(err);
    }

    /// Undo [`fail_with`](Self::fail_with).
    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    /// Number of queries received so far, failed ones included.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl CountStore for MemoryStore {
    fn count(&self, query: &ChildCountQuery<'_>) -> Result<i64, QueryError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = lock(&self.failure).clone() {
            return Err(err);
        }
        let key = (
            query.table().to_string(),
            query.foreign_key().to_string(),
            query.parent().clone(),
        );
        Ok(lock(&self.counts).get(&key).copied().unwrap_or(0))
    }
}

// Poisoning is ignored: each critical section is a single read or insert
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryErrorKind;

    #[test]
    fn parent_key_conversions() {
        assert_eq!(ParentKey::from(7_i64), ParentKey::Int(7));
        assert_eq!(ParentKey::from(7_i32), ParentKey::Int(7));
        assert_eq!(ParentKey::from("H1"), ParentKey::Str("H1".into()));
        assert_eq!(ParentKey::from(String::from("H1")).to_string(), "H1");
        assert_eq!(ParentKey::Int(-4).to_string(), "-4");
        assert_eq!(ParentKey::Int(9).to_sql_value(), Value::Int(9));
        assert_eq!(
            ParentKey::from("T1").to_sql_value(),
            Value::String("T1".into())
        );
    }

    #[test]
    fn query_renders_per_dialect() {
        let parent = ParentKey::Int(12);
        let query = ChildCountQuery::new("block_tabs", "tabbed_content", &parent);

        let pg = query.to_postgres();
        assert_eq!(
            pg.sql,
            "SELECT COUNT(*) AS count FROM block_tabs WHERE tabbed_content = $1"
        );
        assert_eq!(pg.params, vec![Value::Int(12)]);

        let lite = query.to_sqlite();
        assert_eq!(
            lite.sql,
            "SELECT COUNT(*) AS count FROM block_tabs WHERE tabbed_content = ?1"
        );
        assert_eq!(lite.params, pg.params);
    }

    #[test]
    #[should_panic(expected = "Invalid SQL")]
    fn query_rejects_bad_identifiers() {
        let parent = ParentKey::Int(1);
        let _ = ChildCountQuery::new("block_tabs; --", "tabbed_content", &parent).to_postgres();
    }

    #[test]
    fn memory_store_counts() {
        let store = MemoryStore::new()
            .with_count("block_highlights_items", "highlights", "H1", 5)
            .with_count("block_highlights_items", "highlights", 2_i64, 4);

        let h1 = ParentKey::from("H1");
        let two = ParentKey::Int(2);
        let other = ParentKey::from("H9");
        let count = |p: &ParentKey| store.count(&ChildCountQuery::new("block_highlights_items", "highlights", p));

        assert_eq!(count(&h1), Ok(5));
        assert_eq!(count(&two), Ok(4));
        assert_eq!(count(&other), Ok(0));
        assert_eq!(store.queries(), 3);
    }

    #[test]
    fn memory_store_separates_tables() {
        let store = MemoryStore::new().with_count("block_tabs", "tabbed_content", "X", 3);
        let x = ParentKey::from("X");
        assert_eq!(
            store.count(&ChildCountQuery::new("block_highlights_items", "highlights", &x)),
            Ok(0)
        );
    }

    #[test]
    fn memory_store_failure_injection() {
        let store = MemoryStore::new().with_count("block_tabs", "tabbed_content", "T1", 2);
        let t1 = ParentKey::from("T1");
        let query = ChildCountQuery::new("block_tabs", "tabbed_content", &t1);

        store.fail_with(QueryError::connection("refused"));
        let err = store.count(&query).unwrap_err();
        assert_eq!(err.kind(), QueryErrorKind::Connection);

        store.clear_failure();
        assert_eq!(store.count(&query), Ok(2));
        assert_eq!(store.queries(), 2);
    }

    #[test]
    fn set_count_overwrites() {
        let store = MemoryStore::new();
        store.set_count("block_tabs", "tabbed_content", "T1", 2);
        store.set_count("block_tabs", "tabbed_content", "T1", 4);
        let t1 = ParentKey::from("T1");
        assert_eq!(
            store.count(&ChildCountQuery::new("block_tabs", "tabbed_content", &t1)),
            Ok(4)
        );
    }

    #[test]
    fn references_and_boxes_are_stores() {
        fn count_via(store: impl CountStore) -> Result<i64, QueryError> {
            let p = ParentKey::Int(1);
            store.count(&ChildCountQuery::new("block_tabs", "tabbed_content", &p))
        }
        let store = MemoryStore::new().with_count("block_tabs", "tabbed_content", 1_i64, 3);
        assert_eq!(count_via(&store), Ok(3));
        let boxed: Box<dyn CountStore> = Box::new(store);
        assert_eq!(count_via(&boxed), Ok(3));
    }
}
