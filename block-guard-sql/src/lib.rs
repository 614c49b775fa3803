// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs
#![allow(clippy::missing_panics_doc)] // Identifier panics are documented per method
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builders return Self
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
// Identifier bytes are indexed after the emptiness check
#![allow(clippy::indexing_slicing)]

//! # block-guard-sql - COUNT(*) queries for child-count guards
//!
//! Renders the one query a child-count guard issues: the number of rows in a
//! child table whose foreign key points at a given parent.
//!
//! ```
//! # use block_guard_sql::prelude::*;
//! let result = postgres("block_highlights_items")
//!     .where_eq("highlights", "H1")
//!     .build();
//!
//! assert_eq!(
//!     result.sql,
//!     "SELECT COUNT(*) AS count FROM block_highlights_items WHERE highlights = $1"
//! );
//! assert_eq!(result.params, vec![Value::String("H1".into())]);
//! ```
//!
//! ## `SQLite` Dialect
//!
//! ```
//! # use block_guard_sql::prelude::*;
//! let result = sqlite("block_tabs").where_eq("tabbed_content", 7_i64).build();
//! assert!(result.sql.ends_with("tabbed_content = ?1"));
//! ```
//!
//! ## Supported Operators
//!
//! | Operator | Postgres | `SQLite` |
//! |----------|----------|----------|
//! | `Eq` | `f = $1` / `f IS NULL` | `f = ?1` / `f IS NULL` |
//! | `Ne` | `f != $1` / `f IS NOT NULL` | `f != ?1` / `f IS NOT NULL` |
//! | `In` | `f = ANY($1)` | `f IN (?1, ?2, ...)` |
//!
//! Table, column and alias names are validated as SQL identifiers; values are
//! always bound as parameters.

mod count;
mod dialect;
mod filter;
mod types;
mod validate;

pub use count::{CountBuilder, DEFAULT_COUNT_ALIAS};
pub use dialect::{Dialect, Postgres, Sqlite};
pub use types::{Filter, Operator, QueryResult, Value};
pub use validate::{MAX_IDENTIFIER_LENGTH, assert_valid_sql_identifier, is_valid_sql_identifier};

/// Build a count query for Postgres.
///
/// # Panics
///
/// Panics if the table name is not a valid SQL identifier.
pub fn postgres(table: &str) -> CountBuilder<Postgres> {
    CountBuilder::new(Postgres, table)
}

/// Build a count query for `SQLite`.
///
/// # Panics
///
/// Panics if the table name is not a valid SQL identifier.
pub fn sqlite(table: &str) -> CountBuilder<Sqlite> {
    CountBuilder::new(Sqlite, table)
}

/// Prelude module for convenient imports.
///
/// ```
/// use block_guard_sql::prelude::*;
/// let result = postgres("block_tabs").build();
/// assert_eq!(result.sql, "SELECT COUNT(*) AS count FROM block_tabs");
/// ```
pub mod prelude {
    pub use crate::{
        CountBuilder, Dialect, Filter, Operator, Postgres, QueryResult, Sqlite, Value,
        is_valid_sql_identifier, postgres, sqlite,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
