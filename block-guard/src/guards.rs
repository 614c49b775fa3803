//! The two block guards.
//!
//! | Guard | Collection | Children | Bounds |
//! |-------|------------|----------|--------|
//! | [`HIGHLIGHTS`] | `block_highlights` | `block_highlights_items.highlights` via `items` | 3..=5 |
//! | [`TABBED_CONTENT`] | `block_tabbed_content` | `block_tabs.tabbed_content` via `tabs` | 2..=4 |

use crate::bounds::CountBounds;
use crate::constants::{
    HIGHLIGHTS_COLLECTION, HIGHLIGHTS_FOREIGN_KEY, HIGHLIGHTS_ITEMS_TABLE,
    HIGHLIGHTS_NESTED_FIELD, MAX_HIGHLIGHT_ITEMS, MAX_TABS, MIN_HIGHLIGHT_ITEMS, MIN_TABS,
    TABBED_CONTENT_COLLECTION, TABS_FOREIGN_KEY, TABS_NESTED_FIELD, TABS_TABLE,
};
use crate::hook::{Event, GuardHook, HookRegistry};
use crate::log;
use crate::store::CountStore;
use crate::validator::{GuardSpec, NestedCountValidator};

/// Highlight blocks keep 3 to 5 items.
pub const HIGHLIGHTS: GuardSpec = GuardSpec::new(
    "highlights",
    HIGHLIGHTS_COLLECTION,
    HIGHLIGHTS_ITEMS_TABLE,
    HIGHLIGHTS_FOREIGN_KEY,
    HIGHLIGHTS_NESTED_FIELD,
    CountBounds::new(MIN_HIGHLIGHT_ITEMS, MAX_HIGHLIGHT_ITEMS),
    "Block highlights",
    "items",
);

/// Tabbed-content blocks keep 2 to 4 tabs.
pub const TABBED_CONTENT: GuardSpec = GuardSpec::new(
    "tabbed_content",
    TABBED_CONTENT_COLLECTION,
    TABS_TABLE,
    TABS_FOREIGN_KEY,
    TABS_NESTED_FIELD,
    CountBounds::new(MIN_TABS, MAX_TABS),
    "Block tabbed content",
    "tabs",
);

/// Validator for [`HIGHLIGHTS`].
#[must_use]
pub const fn highlights() -> NestedCountValidator {
    NestedCountValidator::new(HIGHLIGHTS)
}

/// Validator for [`TABBED_CONTENT`].
#[must_use]
pub const fn tabbed_content() -> NestedCountValidator {
    NestedCountValidator::new(TABBED_CONTENT)
}

/// Every guard.
#[must_use]
pub const fn all() -> [NestedCountValidator; 2] {
    [highlights(), tabbed_content()]
}

/// Install every guard on both create and update.
pub fn register_all<S: CountStore + ?Sized>(registry: &mut HookRegistry<S>) {
    for validator in all() {
        register(registry, validator);
    }
}

/// Install one validator on both create and update.
pub fn register<S: CountStore + ?Sized>(
    registry: &mut HookRegistry<S>,
    validator: NestedCountValidator,
) {
    for event in Event::ALL {
        registry.filter(event, GuardHook::new(validator, event));
    }
    let spec = validator.spec();
    log!(info, "guard registered",
        guard: spec.name(),
        collection: spec.collection(),
        min: spec.bounds().min(),
        max: spec.bounds().max()
    );
}
