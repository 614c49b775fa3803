//! Core types shared by the count builder and the dialects.

/// Comparison operators supported in count filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Operator {
    /// Equal: `=` (or `IS NULL` against [`Value::Null`])
    Eq,
    /// Not equal: `!=` (or `IS NOT NULL` against [`Value::Null`])
    Ne,
    /// Membership: `= ANY($n)` on Postgres, `IN (?n, ...)` on `SQLite`
    In,
}

impl Operator {
    /// SQL spelling of a plain comparison.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::In => "IN",
        }
    }
}

/// SQL parameter values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL`
    Null,
    /// Boolean parameter
    Bool(bool),
    /// Integer parameter (also used for integer primary keys)
    Int(i64),
    /// Floating point parameter
    Float(f64),
    /// Text parameter (also used for uuid/string primary keys)
    String(String),
    /// Array parameter (Postgres `ANY`) or list to expand (`SQLite` `IN`)
    Array(Vec<Value>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// One `field <op> value` condition of a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name, validated as an SQL identifier.
    pub field: String,
    /// Comparison operator.
    pub op: Operator,
    /// Right-hand side value.
    pub value: Value,
}

/// Query result with SQL string and parameters.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "QueryResult must be used to execute the query"]
pub struct QueryResult {
    /// Parameterized SQL text.
    pub sql: String,
    /// Parameters, in placeholder order.
    pub params: Vec<Value>,
}
