//! `SELECT COUNT(*)` builder.

use crate::dialect::Dialect;
use crate::filter::build_condition;
use crate::types::{Filter, Operator, QueryResult, Value};
use crate::validate::assert_valid_sql_identifier;

/// Default column alias for the count result.
pub const DEFAULT_COUNT_ALIAS: &str = "count";

/// Builder for `SELECT COUNT(*) AS <alias> FROM <table> [WHERE ...]`.
///
/// Filters are joined with `AND` in the order they were added.
#[derive(Debug, Clone)]
pub struct CountBuilder<D: Dialect> {
    dialect: D,
    table: String,
    alias: String,
    filters: Vec<Filter>,
}

impl<D: Dialect> CountBuilder<D> {
    /// Create a new count builder for the given table.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            alias: DEFAULT_COUNT_ALIAS.to_string(),
            filters: Vec::new(),
        }
    }

    /// Rename the count column.
    ///
    /// # Panics
    ///
    /// Panics if the alias is not a valid SQL identifier.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        assert_valid_sql_identifier(&alias, "count alias");
        self.alias = alias;
        self
    }

    /// Add a filter condition.
    ///
    /// # Panics
    ///
    /// Panics if the field name is not a valid SQL identifier.
    pub fn filter(mut self, field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        let field = field.into();
        assert_valid_sql_identifier(&field, "filter field");
        self.filters.push(Filter {
            field,
            op,
            value: value.into(),
        });
        self
    }

    /// Shorthand for `.filter(field, Operator::Eq, value)`.
    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, Operator::Eq, value)
    }

    /// The table this query counts rows of.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Build the SQL query and parameters.
    pub fn build(self) -> QueryResult {
        let mut sql = format!("SELECT COUNT(*) AS {} FROM {}", self.alias, self.table);
        let mut params = Vec::new();
        let mut param_idx = 1usize;

        if !self.filters.is_empty() {
            let mut conditions = Vec::with_capacity(self.filters.len());
            for filter in &self.filters {
                let (condition, new_params, new_idx) =
                    build_condition(&self.dialect, filter, param_idx);
                conditions.push(condition);
                params.extend(new_params);
                param_idx = new_idx;
            }
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        QueryResult { sql, params }
    }
}
