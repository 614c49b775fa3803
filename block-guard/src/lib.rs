// =============================================================================
// CRATE-LEVEL QUALITY LINTS
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
#![allow(clippy::doc_markdown)] // Table and column names in docs
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::return_self_not_must_use)] // Builders return Self
#![allow(clippy::missing_errors_doc)] // Error variants are documented on the types
#![allow(clippy::module_name_repetitions)] // GuardError in guard modules etc.

//! block-guard - child-count guards for CMS block collections
//!
//! # Overview
//!
//! Some content blocks only make sense with a certain number of children: a
//! highlights block shows 3 to 5 items, a tabbed-content block 2 to 4 tabs.
//! Children are edited through the parent with nested-edit sets:
//!
//! ```json
//! {"items": {"create": [{"label": "Fast"}], "update": [{"id": 4}], "delete": [7]}}
//! ```
//!
//! Before such a mutation is persisted, a [`NestedCountValidator`] projects
//! the child count the parent would end up with and rejects the mutation if
//! it falls outside the guard's bounds.
//!
//! # Architecture
//!
//! ```text
//! host pipeline ──► HookRegistry ──► GuardHook ──► NestedCountValidator
//!                                                    │   │
//!                                  NestedEditSet ◄───┘   └──► CountStore ──► SQL
//!                                  (payload field)            (first parent)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use block_guard::prelude::*;
//!
//! let store = MemoryStore::new().with_count("block_highlights_items", "highlights", "H1", 5);
//! let keys = [ParentKey::from("H1")];
//! let ctx = ValidationContext::update("block_highlights", &keys, &store);
//!
//! let payload = Payload::parse(br#"{"items":{"delete":[1,2,3]}}"#).unwrap();
//! let err = guards::highlights().validate(payload, &ctx).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Block highlights must have at least 3 items. Current: 5, After changes: 2"
//! );
//! ```
//!
//! # Failure Policy
//!
//! A guard that cannot read the current child count logs the failure at
//! `error` level and lets the mutation through. Two concurrent updates of the
//! same parent may both read the same baseline; serializing them is up to the
//! host's storage layer.
//!
//! # Modules
//!
//! - [`guards`] - The highlights and tabbed-content guards
//! - [`hook`] - Filter hooks and the registry that runs them
//! - [`log`] - Structured JSON logging to stderr
//! - [`constants`] - Guard parameters and environment limits

pub mod constants;
pub mod guards;
pub mod hook;
pub mod log;

mod bounds;
mod context;
mod error;
mod nested;
mod payload;
mod store;
mod validator;

pub use bounds::CountBounds;
pub use context::ValidationContext;
pub use error::{GuardError, HookError, QueryError, QueryErrorKind};
pub use hook::{Event, Filter, GuardHook, HookRegistry, Meta, UnknownEvent};
pub use nested::NestedEditSet;
pub use payload::{Payload, PayloadError};
pub use store::{ChildCountQuery, CountStore, MemoryStore, ParentKey};
pub use validator::{GuardSpec, NestedCountValidator, Verdict};

/// Prelude for hosts wiring guards into a pipeline.
pub mod prelude {
    pub use crate::guards;
    pub use crate::{
        ChildCountQuery, CountBounds, CountStore, Event, GuardError, HookError, HookRegistry,
        MemoryStore, Meta, NestedCountValidator, ParentKey, Payload, QueryError,
        ValidationContext, Verdict,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================

#[cfg(test)]
mod api_contracts {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    // ========================================================================
    // Guards
    // ========================================================================

    // Validators are plain parameters: shared across threads, passed by value
    assert_impl_all!(crate::NestedCountValidator: Copy, Clone, std::fmt::Debug, Send, Sync);
    assert_impl_all!(crate::GuardSpec: Copy, Clone, std::fmt::Debug, PartialEq, Send, Sync);
    assert_impl_all!(crate::CountBounds: Copy, Eq, std::hash::Hash);
    assert_impl_all!(crate::GuardHook: Copy, Send, Sync);

    // ========================================================================
    // Pipeline types
    // ========================================================================

    assert_impl_all!(crate::Payload: Clone, std::fmt::Debug, std::fmt::Display, Default);
    assert_impl_all!(crate::ParentKey: Clone, Eq, std::hash::Hash, Send, Sync);
    assert_impl_all!(crate::Event: Copy, Eq, std::hash::Hash, std::str::FromStr);
    assert_impl_all!(crate::Meta: Clone, std::fmt::Debug);
    assert_impl_all!(crate::MemoryStore: Send, Sync, Default, std::fmt::Debug);
    assert_impl_all!(crate::HookRegistry<crate::MemoryStore>: Send, Sync, Default);

    // Stores hold a connection; they are borrowed, never cloned by the guard
    assert_not_impl_any!(crate::MemoryStore: Clone);

    // ========================================================================
    // Error types
    // ========================================================================

    assert_impl_all!(crate::GuardError: std::error::Error, Clone, PartialEq, Send, Sync);
    assert_impl_all!(crate::QueryError: std::error::Error, Clone, PartialEq, Send, Sync);
    assert_impl_all!(crate::HookError: std::error::Error, From<crate::GuardError>, Send, Sync);
    assert_impl_all!(crate::PayloadError: std::error::Error, Clone, Eq);
    assert_impl_all!(crate::Verdict: Clone, PartialEq);
}
