//! The pending-count validator.
//!
//! Given a mutation payload, a validator works out how many children the
//! parent would have once the payload is persisted and rejects the payload if
//! that number falls outside its bounds:
//!
//! ```text
//! projected = baseline + |create| + |update| - |delete|
//! ```
//!
//! The baseline is 0 for a create and the stored child count of the first
//! affected parent for an update. A failing count query is logged and the
//! payload passes.

use crate::bounds::CountBounds;
use crate::context::ValidationContext;
use crate::error::{GuardError, QueryError};
use crate::log;
use crate::nested::NestedEditSet;
use crate::payload::Payload;
use crate::store::{ChildCountQuery, CountStore};
use block_guard_sql::is_valid_sql_identifier;

/// Parameters of one child-count guard.
///
/// Table and column names are checked when the spec is built; in a `const`
/// an invalid name fails compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSpec {
    name: &'static str,
    collection: &'static str,
    child_table: &'static str,
    foreign_key: &'static str,
    nested_field: &'static str,
    bounds: CountBounds,
    subject: &'static str,
    unit: &'static str,
}

impl GuardSpec {
    /// Describe a guard.
    ///
    /// `subject` and `unit` only appear in rejection messages
    /// ("`subject` must have at least 3 `unit`").
    ///
    /// # Panics
    ///
    /// Panics if `child_table` or `foreign_key` is not a valid SQL identifier.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn new(
        name: &'static str,
        collection: &'static str,
        child_table: &'static str,
        foreign_key: &'static str,
        nested_field: &'static str,
        bounds: CountBounds,
        subject: &'static str,
        unit: &'static str,
    ) -> Self {
        assert!(
            is_valid_sql_identifier(child_table),
            "guard child table is not a valid SQL identifier"
        );
        assert!(
            is_valid_sql_identifier(foreign_key),
            "guard foreign key is not a valid SQL identifier"
        );
        Self {
            name,
            collection,
            child_table,
            foreign_key,
            nested_field,
            bounds,
            subject,
            unit,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Parent collection the guard protects.
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        self.collection
    }

    /// Table holding the children.
    #[must_use]
    pub const fn child_table(&self) -> &'static str {
        self.child_table
    }

    /// Column on the child table referencing the parent.
    #[must_use]
    pub const fn foreign_key(&self) -> &'static str {
        self.foreign_key
    }

    /// Payload field holding the nested-edit set.
    #[must_use]
    pub const fn nested_field(&self) -> &'static str {
        self.nested_field
    }

    /// Allowed child counts.
    #[must_use]
    pub const fn bounds(&self) -> CountBounds {
        self.bounds
    }

    /// Block kind used in rejection messages.
    #[must_use]
    pub const fn subject(&self) -> &'static str {
        self.subject
    }

    /// Child unit used in rejection messages.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        self.unit
    }
}

/// How a payload got through [`NestedCountValidator::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Verdict {
    /// The payload does not touch the guarded relation.
    Untouched,
    /// The baseline could not be read; the payload passes unchecked.
    FailedOpen(QueryError),
    /// The projected count is within bounds.
    Passed {
        /// Children stored before the mutation
        baseline: i64,
        /// Children after the mutation
        projected: i64,
    },
}

impl Verdict {
    /// Whether the bounds were actually evaluated.
    #[must_use]
    pub const fn was_checked(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

/// Enforces a [`GuardSpec`] on pending mutations.
///
/// Holds no state between calls; one validator can be shared freely.
///
/// ```
/// use block_guard::{MemoryStore, Payload, ParentKey, ValidationContext, guards};
///
/// let store = MemoryStore::new().with_count("block_tabs", "tabbed_content", "T1", 2);
/// let keys = [ParentKey::from("T1")];
/// let ctx = ValidationContext::update("block_tabbed_content", &keys, &store);
///
/// let payload = Payload::parse(br#"{"tabs":{"create":[{},{},{}]}}"#).unwrap();
/// let err = guards::tabbed_content().validate(payload, &ctx).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Block tabbed content cannot have more than 4 tabs. Current: 2, After changes: 5"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedCountValidator {
    spec: GuardSpec,
}

impl NestedCountValidator {
    /// Validator for `spec`.
    #[must_use]
    pub const fn new(spec: GuardSpec) -> Self {
        Self { spec }
    }

    /// The guard parameters.
    #[must_use]
    pub const fn spec(&self) -> &GuardSpec {
        &self.spec
    }

    /// Let `payload` through unchanged, or reject it.
    pub fn validate<S: CountStore + ?Sized>(
        &self,
        payload: Payload,
        ctx: &ValidationContext<'_, S>,
    ) -> Result<Payload, GuardError> {
        self.check(&payload, ctx)?;
        Ok(payload)
    }

    /// Decide on `payload` and report how it passed.
    ///
    /// Issues at most one count query, and none when the payload carries no
    /// nested-edit set for this guard.
    pub fn check<S: CountStore + ?Sized>(
        &self,
        payload: &Payload,
        ctx: &ValidationContext<'_, S>,
    ) -> Result<Verdict, GuardError> {
        let Some(edits) = NestedEditSet::from_payload(payload, self.spec.nested_field) else {
            return Ok(Verdict::Untouched);
        };

        let baseline = match self.baseline(ctx) {
            Ok(n) => n,
            Err(err) => {
                log!(error, "baseline count query failed",
                    guard: self.spec.name,
                    collection: ctx.collection(),
                    parent: ctx.first_key().map(ToString::to_string).unwrap_or_default(),
                    error: &err
                );
                return Ok(Verdict::FailedOpen(err));
            },
        };

        let projected = Self::project(baseline, &edits);
        let bounds = self.spec.bounds;

        if projected < bounds.min() {
            let err = GuardError::below_minimum(
                self.spec.subject,
                self.spec.unit,
                bounds.min(),
                baseline,
                projected,
            );
            self.log_rejection(&err);
            return Err(err);
        }
        if projected > bounds.max() {
            let err = GuardError::above_maximum(
                self.spec.subject,
                self.spec.unit,
                bounds.max(),
                baseline,
                projected,
            );
            self.log_rejection(&err);
            return Err(err);
        }

        log!(debug, "child count within bounds",
            guard: self.spec.name,
            baseline: baseline,
            projected: projected
        );
        Ok(Verdict::Passed {
            baseline,
            projected,
        })
    }

    /// Children stored before the mutation: 0 on create, otherwise the count
    /// for the first affected parent.
    pub fn baseline<S: CountStore + ?Sized>(
        &self,
        ctx: &ValidationContext<'_, S>,
    ) -> Result<i64, QueryError> {
        let Some(parent) = ctx.first_key() else {
            return Ok(0);
        };
        let query = ChildCountQuery::new(self.spec.child_table, self.spec.foreign_key, parent);
        ctx.store().count(&query)
    }

    /// `baseline + |create| + |update| - |delete|`.
    ///
    /// Updates are counted even though they modify existing children.
    /// Saturates instead of overflowing.
    #[must_use]
    pub fn project(baseline: i64, edits: &NestedEditSet<'_>) -> i64 {
        baseline
            .saturating_add(len_i64(edits.to_create()))
            .saturating_add(len_i64(edits.to_update()))
            .saturating_sub(len_i64(edits.to_delete()))
    }

    fn log_rejection(&self, err: &GuardError) {
        log!(warn, "child count out of bounds",
            guard: self.spec.name,
            constraint: err.constraint(),
            limit: err.min_or_max(),
            baseline: err.baseline(),
            projected: err.projected()
        );
    }
}

fn len_i64<T>(items: &[T]) -> i64 {
    i64::try_from(items.len()).unwrap_or(i64::MAX)
}
