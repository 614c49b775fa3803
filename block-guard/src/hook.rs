//! Before-persist filter hooks.
//!
//! A [`HookRegistry`] models the host's mutation pipeline: hooks are
//! registered per [`Event`] and run in registration order before an item is
//! persisted. Each hook gets the payload, returns it (possibly changed), or
//! aborts the mutation with a [`HookError`].
//!
//! ```
//! use block_guard::{Event, HookRegistry, MemoryStore, Meta, Payload, guards};
//!
//! let mut registry = HookRegistry::<MemoryStore>::new();
//! guards::register_all(&mut registry);
//!
//! let store = MemoryStore::new();
//! let payload = Payload::parse(br#"{"items":{"create":[{},{},{},{}]}}"#).unwrap();
//! let meta = Meta::new("block_highlights");
//! assert!(registry.run(Event::Create, payload, &meta, &store).is_ok());
//! ```

use crate::constants::{EVENT_ITEMS_CREATE, EVENT_ITEMS_UPDATE};
use crate::context::ValidationContext;
use crate::error::HookError;
use crate::payload::Payload;
use crate::store::{CountStore, ParentKey};
use crate::validator::NestedCountValidator;
use std::fmt;
use std::str::FromStr;

/// Pipeline event a filter hook runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// `items.create`
    Create,
    /// `items.update`
    Update,
}

impl Event {
    /// Both events, create first.
    pub const ALL: [Self; 2] = [Self::Create, Self::Update];

    /// Event name as hosts spell it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => EVENT_ITEMS_CREATE,
            Self::Update => EVENT_ITEMS_UPDATE,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event name that is neither `items.create` nor `items.update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent(pub String);

impl fmt::Display for UnknownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event '{}'", self.0)
    }
}

impl std::error::Error for UnknownEvent {}

impl FromStr for Event {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EVENT_ITEMS_CREATE => Ok(Self::Create),
            EVENT_ITEMS_UPDATE => Ok(Self::Update),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// What the pipeline knows about the mutation besides its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    /// Collection being written.
    pub collection: String,
    /// Items being updated; empty on create.
    pub keys: Vec<ParentKey>,
}

impl Meta {
    /// Meta for a mutation on `collection` with no keys.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            keys: Vec::new(),
        }
    }

    /// Set the affected keys.
    #[must_use]
    pub fn with_keys<K: Into<ParentKey>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// A before-persist hook.
pub trait Filter<S: ?Sized> {
    /// Return the payload to persist, or abort the mutation.
    fn apply(&self, payload: Payload, meta: &Meta, store: &S) -> Result<Payload, HookError>;
}

impl<S, F> Filter<S> for F
where
    S: ?Sized,
    F: Fn(Payload, &Meta, &S) -> Result<Payload, HookError>,
{
    fn apply(&self, payload: Payload, meta: &Meta, store: &S) -> Result<Payload, HookError> {
        self(payload, meta, store)
    }
}

type BoxedFilter<S> = Box<dyn Filter<S> + Send + Sync>;

/// Ordered filter hooks per event.
pub struct HookRegistry<S: ?Sized> {
    hooks: Vec<(Event, BoxedFilter<S>)>,
}

impl<S: ?Sized> HookRegistry<S> {
    /// A registry with no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register `hook` to run on `event`, after any hooks already registered.
    pub fn filter(&mut self, event: Event, hook: impl Filter<S> + Send + Sync + 'static) -> &mut Self {
        self.hooks.push((event, Box::new(hook)));
        self
    }

    /// Number of hooks registered for `event`.
    #[must_use]
    pub fn count(&self, event: Event) -> usize {
        self.hooks.iter().filter(|(e, _)| *e == event).count()
    }

    /// Total number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook for `event` in order, threading the payload through.
    ///
    /// Stops at the first hook that fails.
    pub fn run(
        &self,
        event: Event,
        payload: Payload,
        meta: &Meta,
        store: &S,
    ) -> Result<Payload, HookError> {
        self.hooks
            .iter()
            .filter(|(e, _)| *e == event)
            .try_fold(payload, |payload, (_, hook)| hook.apply(payload, meta, store))
    }
}

impl<S: ?Sized> Default for HookRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for HookRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("create", &self.count(Event::Create))
            .field("update", &self.count(Event::Update))
            .finish()
    }
}

/// Runs a [`NestedCountValidator`] as a filter hook.
///
/// Acts only on the validator's parent collection. On create the baseline is
/// 0 whatever keys the meta carries.
#[derive(Debug, Clone, Copy)]
pub struct GuardHook {
    validator: NestedCountValidator,
    event: Event,
}

impl GuardHook {
    /// Hook for `validator` on `event`.
    #[must_use]
    pub const fn new(validator: NestedCountValidator, event: Event) -> Self {
        Self { validator, event }
    }

    /// The wrapped validator.
    #[must_use]
    pub const fn validator(&self) -> &NestedCountValidator {
        &self.validator
    }

    /// Event this hook was built for.
    #[must_use]
    pub const fn event(&self) -> Event {
        self.event
    }
}

impl<S: CountStore + ?Sized> Filter<S> for GuardHook {
    fn apply(&self, payload: Payload, meta: &Meta, store: &S) -> Result<Payload, HookError> {
        let spec = self.validator.spec();
        if meta.collection != spec.collection() {
            return Ok(payload);
        }
        let ctx = match self.event {
            Event::Create => ValidationContext::create(&meta.collection, store),
            Event::Update => ValidationContext::update(&meta.collection, &meta.keys, store),
        };
        self.validator
            .validate(payload, &ctx)
            .map_err(HookError::Rejected)
    }
}
