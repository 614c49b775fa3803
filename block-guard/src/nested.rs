//! Nested-edit sets: the create/update/delete part of a payload that touches
//! a one-to-many child relation.
//!
//! ```json
//! {"items": {"create": [{"label": "Fast"}], "update": [{"id": 4}], "delete": [7, 9]}}
//! ```

use crate::constants::{NESTED_CREATE_KEY, NESTED_DELETE_KEY, NESTED_UPDATE_KEY};
use crate::payload::Payload;
use miniserde::json::{Number, Value};

/// Borrowed view of one nested-edit set.
///
/// Missing members are empty. Members that are present but not arrays (a
/// string, a number, an object) also count as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedEditSet<'a> {
    create: &'a [Value],
    update: &'a [Value],
    delete: &'a [Value],
}

impl<'a> NestedEditSet<'a> {
    /// Read the edit set stored under `field`.
    ///
    /// Returns `None` when the payload does not touch the relation: the field
    /// is missing or holds `null`, `false`, `0` or `""`. Any other value is an
    /// edit set; a value that is not an object (e.g. a bare list of ids) is an
    /// edit set with no creates, updates or deletes.
    #[must_use]
    pub fn from_payload(payload: &'a Payload, field: &str) -> Option<Self> {
        let value = payload.get(field)?;
        if is_falsy(value) {
            return None;
        }
        Some(Self::from_value(value))
    }

    /// View an arbitrary JSON value as an edit set.
    #[must_use]
    pub fn from_value(value: &'a Value) -> Self {
        let Value::Object(obj) = value else {
            return Self::default();
        };
        let member = |key: &str| match obj.get(key) {
            Some(Value::Array(arr)) => arr.as_slice(),
            _ => &[],
        };
        Self {
            create: member(NESTED_CREATE_KEY),
            update: member(NESTED_UPDATE_KEY),
            delete: member(NESTED_DELETE_KEY),
        }
    }

    /// New child records, in payload order.
    #[must_use]
    pub fn to_create(&self) -> &'a [Value] {
        self.create
    }

    /// Existing children being modified, in payload order.
    #[must_use]
    pub fn to_update(&self) -> &'a [Value] {
        self.update
    }

    /// Identifiers of children being removed, in payload order.
    #[must_use]
    pub fn to_delete(&self) -> &'a [Value] {
        self.delete
    }

    /// Whether the set lists no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// JavaScript-style falsiness, as used by hosts to decide "not provided".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(Number::U64(n)) => *n == 0,
        Value::Number(Number::I64(n)) => *n == 0,
        Value::Number(Number::F64(n)) => *n == 0.0 || n.is_nan(),
        _ => false,
    }
}
