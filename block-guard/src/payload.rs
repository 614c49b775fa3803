//! Mutation payloads.
//!
//! A payload is the JSON object a host pipeline is about to persist. Guards
//! only read it; whatever comes in goes back out untouched.
//!
//! ```
//! use block_guard::Payload;
//!
//! let payload = Payload::parse(br#"{"title":"Why us","items":{"create":[{"label":"Fast"}]}}"#)
//!     .unwrap();
//! assert!(payload.contains_key("items"));
//! assert_eq!(payload.len(), 2);
//! ```

use crate::constants::{MAX_PAYLOAD_DEPTH, max_payload_size};
use miniserde::json::{Object, Value};
use std::fmt;

/// Error returned by [`Payload::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PayloadError {
    /// Input is larger than the configured limit.
    TooLarge {
        /// Input size in bytes
        size: usize,
        /// Accepted maximum in bytes
        limit: usize,
    },
    /// Input nests deeper than [`MAX_PAYLOAD_DEPTH`].
    TooDeep {
        /// Accepted maximum depth
        limit: usize,
    },
    /// Input is not valid UTF-8.
    InvalidUtf8,
    /// Input is not valid JSON.
    Invalid,
    /// Input is valid JSON but not an object.
    NotAnObject,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { size, limit } => {
                write!(f, "payload is {size} bytes, limit is {limit}")
            },
            Self::TooDeep { limit } => write!(f, "payload nests deeper than {limit} levels"),
            Self::InvalidUtf8 => f.write_str("payload is not valid UTF-8"),
            Self::Invalid => f.write_str("payload is not valid JSON"),
            Self::NotAnObject => f.write_str("payload must be a JSON object"),
        }
    }
}

impl std::error::Error for PayloadError {}

/// The JSON object a mutation would persist.
#[derive(Clone)]
pub struct Payload {
    fields: Object,
}

impl Payload {
    /// An empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: Object::new(),
        }
    }

    /// Parse a payload from request bytes.
    ///
    /// Rejects input over [`max_payload_size`], nested deeper than
    /// [`MAX_PAYLOAD_DEPTH`], that is not UTF-8, not JSON, or not an object.
    pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
        let limit = max_payload_size();
        if data.len() > limit {
            return Err(PayloadError::TooLarge {
                size: data.len(),
                limit,
            });
        }
        if depth_exceeds(data, MAX_PAYLOAD_DEPTH) {
            return Err(PayloadError::TooDeep {
                limit: MAX_PAYLOAD_DEPTH,
            });
        }
        let text = std::str::from_utf8(data).map_err(|_| PayloadError::InvalidUtf8)?;
        let value: Value = miniserde::json::from_str(text).map_err(|_| PayloadError::Invalid)?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(PayloadError::NotAnObject),
        }
    }

    /// Set a field, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Look up a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether a top-level field is present (even if `null`).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the underlying object.
    #[must_use]
    pub fn as_object(&self) -> &Object {
        &self.fields
    }

    /// Take the underlying object.
    #[must_use]
    pub fn into_object(self) -> Object {
        self.fields
    }

    /// Serialize to compact JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(&Value::Object(self.fields.clone()))
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Object> for Payload {
    fn from(fields: Object) -> Self {
        Self { fields }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").field(&self.to_json()).finish()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

/// Byte-level nesting check, run before handing input to the parser.
fn depth_exceeds(data: &[u8], limit: usize) -> bool {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escape = false;

    for &byte in data {
        if escape {
            escape = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escape = true,
            b'"' => in_string = !in_string,
            b'[' | b'{' if !in_string => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            },
            b']' | b'}' if !in_string => depth = depth.saturating_sub(1),
            _ => {},
        }
    }
    false
}
