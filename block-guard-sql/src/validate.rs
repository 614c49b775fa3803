//! Identifier validation for table and column names.
//!
//! Count queries interpolate table, column and alias names directly into the
//! SQL text, so every identifier is checked before it reaches a builder.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid identifier:
/// - starts with an ASCII letter or underscore
/// - continues with ASCII letters, digits or underscores
/// - is 1 to 63 bytes long
///
/// This is a `const fn`, so identifiers known at compile time can be checked
/// inside `const` items:
///
/// ```
/// use block_guard_sql::is_valid_sql_identifier;
///
/// const TABLE: &str = "block_tabs";
/// const _: () = assert!(is_valid_sql_identifier(TABLE));
///
/// assert!(is_valid_sql_identifier("tabbed_content"));
/// assert!(!is_valid_sql_identifier("block-tabs"));
/// assert!(!is_valid_sql_identifier("9lives"));
/// assert!(!is_valid_sql_identifier("tabs; DROP TABLE x"));
/// ```
#[inline]
#[must_use]
pub const fn is_valid_sql_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let first = bytes[0];
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return false;
    }

    let mut i = 1;
    while i < bytes.len() {
        let b = bytes[i];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return false;
        }
        i += 1;
    }
    true
}

/// Assert that a string is a valid SQL identifier.
///
/// # Panics
///
/// Panics with a descriptive message if the identifier is invalid. Identifiers
/// come from code, not from user input, so a bad one is a programmer error.
///
/// ```should_panic
/// use block_guard_sql::assert_valid_sql_identifier;
///
/// assert_valid_sql_identifier("items; --", "table");
/// ```
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': must start with letter/underscore, \
         contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    );
}
