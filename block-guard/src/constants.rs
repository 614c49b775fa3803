//! Centralized constants for the block-guard crate.
//!
//! Guard parameters are fixed at build time. Process-wide limits can be tuned
//! through environment variables, read once and cached.
//!
//! # Environment Variables
//!
//! | Variable                        | Default          | Description                          |
//! |---------------------------------|------------------|--------------------------------------|
//! | `BLOCK_GUARD_LOG`               | `info`           | Minimum log level (`debug`..`off`)   |
//! | `BLOCK_GUARD_MAX_PAYLOAD_SIZE`  | 1 MB (1,000,000) | Largest payload `Payload::parse` accepts |
//!
//! ## Example
//!
//! ```bash
//! # Verbose guard decisions, 256KB payload cap
//! BLOCK_GUARD_LOG=debug
//! BLOCK_GUARD_MAX_PAYLOAD_SIZE=256000
//! ```

use std::sync::OnceLock;

// ============================================================================
// TIME CONSTANTS (log timestamps)
// ============================================================================

/// Seconds in a day (24 * 60 * 60).
pub const SECONDS_PER_DAY: u64 = 86400;

/// Seconds in an hour (60 * 60).
pub const SECONDS_PER_HOUR: u64 = 3600;

/// Seconds in a minute.
pub const SECONDS_PER_MINUTE: u64 = 60;

// ============================================================================
// PIPELINE EVENTS
// ============================================================================

/// Filter event fired before an item is created.
pub const EVENT_ITEMS_CREATE: &str = "items.create";

/// Filter event fired before an item is updated.
pub const EVENT_ITEMS_UPDATE: &str = "items.update";

/// Payload key holding new child records inside a nested-edit set.
pub const NESTED_CREATE_KEY: &str = "create";

/// Payload key holding modified child references inside a nested-edit set.
pub const NESTED_UPDATE_KEY: &str = "update";

/// Payload key holding removed child identifiers inside a nested-edit set.
pub const NESTED_DELETE_KEY: &str = "delete";

// ============================================================================
// HIGHLIGHTS GUARD
// ============================================================================

/// Parent collection of highlight blocks.
pub const HIGHLIGHTS_COLLECTION: &str = "block_highlights";

/// Child relation table holding highlight items.
pub const HIGHLIGHTS_ITEMS_TABLE: &str = "block_highlights_items";

/// Foreign key on highlight items pointing at their block.
pub const HIGHLIGHTS_FOREIGN_KEY: &str = "highlights";

/// Nested-edit key for highlight items in a mutation payload.
pub const HIGHLIGHTS_NESTED_FIELD: &str = "items";

/// Fewest highlight items a block may have.
pub const MIN_HIGHLIGHT_ITEMS: i64 = 3;

/// Most highlight items a block may have.
pub const MAX_HIGHLIGHT_ITEMS: i64 = 5;

// ============================================================================
// TABBED CONTENT GUARD
// ============================================================================

/// Parent collection of tabbed-content blocks.
pub const TABBED_CONTENT_COLLECTION: &str = "block_tabbed_content";

/// Child relation table holding tabs.
pub const TABS_TABLE: &str = "block_tabs";

/// Foreign key on tabs pointing at their block.
pub const TABS_FOREIGN_KEY: &str = "tabbed_content";

/// Nested-edit key for tabs in a mutation payload.
pub const TABS_NESTED_FIELD: &str = "tabs";

/// Fewest tabs a block may have.
pub const MIN_TABS: i64 = 2;

/// Most tabs a block may have.
pub const MAX_TABS: i64 = 4;

// ============================================================================
// PAYLOAD LIMITS
// ============================================================================

/// Default maximum payload size (1MB) - prevents memory exhaustion.
const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1_000_000;

/// Maximum payload nesting depth accepted by `Payload::parse`.
///
/// Block payloads nest a handful of levels (block -> nested set -> child ->
/// child fields); 32 leaves room for rich-text children without letting a
/// hostile body recurse the parser.
pub const MAX_PAYLOAD_DEPTH: usize = 32;

/// Environment variable holding the maximum payload size in bytes.
pub const MAX_PAYLOAD_SIZE_ENV: &str = "BLOCK_GUARD_MAX_PAYLOAD_SIZE";

/// Cached max payload size from environment.
static MAX_PAYLOAD_SIZE_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the maximum accepted payload size in bytes.
///
/// Reads `BLOCK_GUARD_MAX_PAYLOAD_SIZE` on first call and falls back to 1MB if
/// it is unset, unparsable or zero. The value is cached for the lifetime of
/// the process.
#[inline]
pub fn max_payload_size() -> usize {
    *MAX_PAYLOAD_SIZE_CACHE.get_or_init(|| {
        parse_size(std::env::var(MAX_PAYLOAD_SIZE_ENV).ok().as_deref())
    })
}

fn parse_size(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(DEFAULT_MAX_PAYLOAD_SIZE)
}

// ============================================================================
// LOGGING
// ============================================================================

/// Environment variable holding the minimum log level.
pub const LOG_LEVEL_ENV: &str = "BLOCK_GUARD_LOG";

#[cfg(test)]
mod tests {
    use super::*;
    use block_guard_sql::is_valid_sql_identifier;

    #[test]
    fn guard_bounds_are_ordered() {
        const { assert!(MIN_HIGHLIGHT_ITEMS <= MAX_HIGHLIGHT_ITEMS) };
        const { assert!(MIN_TABS <= MAX_TABS) };
    }

    #[test]
    fn table_names_are_sql_identifiers() {
        for ident in [
            HIGHLIGHTS_ITEMS_TABLE,
            HIGHLIGHTS_FOREIGN_KEY,
            TABS_TABLE,
            TABS_FOREIGN_KEY,
        ] {
            assert!(is_valid_sql_identifier(ident), "{ident}");
        }
    }

    #[test]
    fn payload_size_parsing() {
        assert_eq!(parse_size(None), DEFAULT_MAX_PAYLOAD_SIZE);
        assert_eq!(parse_size(Some("256000")), 256_000);
        assert_eq!(parse_size(Some(" 42 ")), 42);
        assert_eq!(parse_size(Some("0")), DEFAULT_MAX_PAYLOAD_SIZE);
        assert_eq!(parse_size(Some("lots")), DEFAULT_MAX_PAYLOAD_SIZE);
        assert_eq!(parse_size(Some("-1")), DEFAULT_MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn env_var_names() {
        assert_eq!(MAX_PAYLOAD_SIZE_ENV, "BLOCK_GUARD_MAX_PAYLOAD_SIZE");
        assert_eq!(LOG_LEVEL_ENV, "BLOCK_GUARD_LOG");
        assert!(MAX_PAYLOAD_SIZE_ENV.starts_with("BLOCK_GUARD_"));
    }

    #[test]
    fn max_payload_size_is_positive() {
        assert!(max_payload_size() > 0);
    }
}
