//! Per-invocation view handed to a validator.

use crate::store::{CountStore, ParentKey};

/// Everything a validator may look at besides the payload: which collection
/// is being written, which parents are affected, and where to count children.
///
/// Create mutations have no affected parents; update mutations have at least
/// one.
#[derive(Debug)]
pub struct ValidationContext<'a, S: ?Sized> {
    collection: &'a str,
    keys: &'a [ParentKey],
    store: &'a S,
}

impl<S: ?Sized> Clone for ValidationContext<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for ValidationContext<'_, S> {}

impl<'a, S: CountStore + ?Sized> ValidationContext<'a, S> {
    /// Context for a create: no parent exists yet.
    #[must_use]
    pub const fn create(collection: &'a str, store: &'a S) -> Self {
        Self {
            collection,
            keys: &[],
            store,
        }
    }

    /// Context for an update of `keys`.
    #[must_use]
    pub const fn update(collection: &'a str, keys: &'a [ParentKey], store: &'a S) -> Self {
        Self {
            collection,
            keys,
            store,
        }
    }

    /// Collection being written.
    #[must_use]
    pub const fn collection(&self) -> &'a str {
        self.collection
    }

    /// Affected parents, in the order the host listed them.
    #[must_use]
    pub const fn keys(&self) -> &'a [ParentKey] {
        self.keys
    }

    /// The parent whose children form the baseline.
    ///
    /// Only the first affected parent is counted; `None` on create.
    #[must_use]
    pub fn first_key(&self) -> Option<&'a ParentKey> {
        self.keys.first()
    }

    /// Whether this is a create (no affected parents).
    #[must_use]
    pub const fn is_create(&self) -> bool {
        self.keys.is_empty()
    }

    /// Store bound to the host's connection.
    #[must_use]
    pub const fn store(&self) -> &'a S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn create_has_no_keys() {
        let store = MemoryStore::new();
        let ctx = ValidationContext::create("block_tabbed_content", &store);
        assert!(ctx.is_create());
        assert!(ctx.first_key().is_none());
        assert_eq!(ctx.collection(), "block_tabbed_content");
    }

    #[test]
    fn update_counts_first_key() {
        let store = MemoryStore::new();
        let keys = [ParentKey::from("H1"), ParentKey::from("H2")];
        let ctx = ValidationContext::update("block_highlights", &keys, &store);
        assert!(!ctx.is_create());
        assert_eq!(ctx.first_key(), Some(&ParentKey::from("H1")));
        assert_eq!(ctx.keys().len(), 2);
    }

    #[test]
    fn update_with_empty_keys_behaves_as_create() {
        let store = MemoryStore::new();
        let ctx = ValidationContext::update("block_highlights", &[], &store);
        assert!(ctx.is_create());
    }

    #[test]
    fn works_with_trait_objects() {
        let store = MemoryStore::new();
        let dyn_store: &dyn CountStore = &store;
        let ctx = ValidationContext::create("block_highlights", dyn_store);
        let copy = ctx;
        assert_eq!(copy.collection(), ctx.collection());
    }
}
