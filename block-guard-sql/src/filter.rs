//! WHERE-clause condition rendering.

use crate::dialect::Dialect;
use crate::types::{Filter, Operator, Value};

/// Render a single filter condition.
///
/// Returns the SQL fragment, the parameters it binds and the next free
/// placeholder index.
pub(crate) fn build_condition<D: Dialect>(
    dialect: &D,
    filter: &Filter,
    start_idx: usize,
) -> (String, Vec<Value>, usize) {
    let field = &filter.field;
    let idx = start_idx;

    match (filter.op, &filter.value) {
        // NULL handling
        (Operator::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], idx),
        (Operator::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], idx),

        // An empty membership list can never match
        (Operator::In, Value::Array(values)) if values.is_empty() => {
            ("1 = 0".to_string(), vec![], idx)
        },
        (Operator::In, Value::Array(values)) => {
            let (sql, params) = dialect.in_clause(field, values, idx);
            let new_idx = idx + params.len();
            (sql, params, new_idx)
        },
        // A scalar membership test is an equality test
        (Operator::In, value) => {
            let sql = format!("{} = {}", field, dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },

        (op, value) => {
            let sql = format!("{} {} {}", field, op.as_sql(), dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
    }
}
