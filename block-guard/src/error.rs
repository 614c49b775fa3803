//! Error types for guards, count stores and hooks.

use std::fmt;

/// A pending mutation would leave a parent with too few or too many children.
///
/// The message is user visible and names the block kind, the child unit, the
/// violated bound and both counts.
///
/// # Example
///
/// ```
/// use block_guard::GuardError;
///
/// let err = GuardError::below_minimum("Block highlights", "items", 3, 5, 2);
/// assert_eq!(
///     err.to_string(),
///     "Block highlights must have at least 3 items. Current: 5, After changes: 2"
/// );
/// assert_eq!(err.constraint(), "min");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GuardError {
    /// Projected count is below the minimum.
    BelowMinimum {
        /// Block kind, e.g. "Block highlights"
        subject: &'static str,
        /// Child unit, e.g. "items"
        unit: &'static str,
        /// Fewest children allowed
        min: i64,
        /// Children stored before the mutation
        baseline: i64,
        /// Children after the mutation
        projected: i64,
    },

    /// Projected count is above the maximum.
    AboveMaximum {
        /// Block kind, e.g. "Block tabbed content"
        subject: &'static str,
        /// Child unit, e.g. "tabs"
        unit: &'static str,
        /// Most children allowed
        max: i64,
        /// Children stored before the mutation
        baseline: i64,
        /// Children after the mutation
        projected: i64,
    },
}

impl GuardError {
    /// Create an error for a minimum violation.
    #[inline]
    #[must_use]
    pub const fn below_minimum(
        subject: &'static str,
        unit: &'static str,
        min: i64,
        baseline: i64,
        projected: i64,
    ) -> Self {
        Self::BelowMinimum {
            subject,
            unit,
            min,
            baseline,
            projected,
        }
    }

    /// Create an error for a maximum violation.
    #[inline]
    #[must_use]
    pub const fn above_maximum(
        subject: &'static str,
        unit: &'static str,
        max: i64,
        baseline: i64,
        projected: i64,
    ) -> Self {
        Self::AboveMaximum {
            subject,
            unit,
            max,
            baseline,
            projected,
        }
    }

    /// The violated bound.
    #[inline]
    #[must_use]
    pub const fn min_or_max(&self) -> i64 {
        match self {
            Self::BelowMinimum { min, .. } => *min,
            Self::AboveMaximum { max, .. } => *max,
        }
    }

    /// Children stored before the mutation.
    #[inline]
    #[must_use]
    pub const fn baseline(&self) -> i64 {
        match self {
            Self::BelowMinimum { baseline, .. } | Self::AboveMaximum { baseline, .. } => *baseline,
        }
    }

    /// Children the mutation would leave.
    #[inline]
    #[must_use]
    pub const fn projected(&self) -> i64 {
        match self {
            Self::BelowMinimum { projected, .. } | Self::AboveMaximum { projected, .. } => {
                *projected
            },
        }
    }

    /// `"min"` or `"max"`.
    #[inline]
    #[must_use]
    pub const fn constraint(&self) -> &'static str {
        match self {
            Self::BelowMinimum { .. } => "min",
            Self::AboveMaximum { .. } => "max",
        }
    }

    /// Block kind named in the message.
    #[inline]
    #[must_use]
    pub const fn subject(&self) -> &'static str {
        match self {
            Self::BelowMinimum { subject, .. } | Self::AboveMaximum { subject, .. } => *subject,
        }
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowMinimum {
                subject,
                unit,
                min,
                baseline,
                projected,
            } => write!(
                f,
                "{subject} must have at least {min} {unit}. Current: {baseline}, After changes: {projected}"
            ),
            Self::AboveMaximum {
                subject,
                unit,
                max,
                baseline,
                projected,
            } => write!(
                f,
                "{subject} cannot have more than {max} {unit}. Current: {baseline}, After changes: {projected}"
            ),
        }
    }
}

impl std::error::Error for GuardError {}

/// What went wrong while counting children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum QueryErrorKind {
    /// The datastore could not be reached.
    Connection,
    /// The query was rejected (unknown table, bad column, ...).
    Malformed,
    /// The surrounding transaction is no longer usable.
    Transaction,
    /// Anything else.
    Other,
}

impl QueryErrorKind {
    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Malformed => "malformed query",
            Self::Transaction => "transaction",
            Self::Other => "query",
        }
    }
}

/// A count query failed.
///
/// Guards never surface this to the caller: they log it and let the mutation
/// through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    kind: QueryErrorKind,
    message: String,
}

impl QueryError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The datastore could not be reached.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Connection, message)
    }

    /// The query was rejected by the datastore.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Malformed, message)
    }

    /// The surrounding transaction failed.
    #[must_use]
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Transaction, message)
    }

    /// Any other failure.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Other, message)
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> QueryErrorKind {
        self.kind
    }

    /// Datastore-provided detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for QueryError {}

/// A hook aborted the mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HookError {
    /// A child-count guard rejected the payload.
    Rejected(GuardError),
    /// Any other hook refused the mutation.
    Failed {
        /// Name of the hook
        hook: String,
        /// Reason shown to the caller
        message: String,
    },
}

impl HookError {
    /// Abort from a hook that is not a child-count guard.
    #[must_use]
    pub fn failed(hook: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            hook: hook.into(),
            message: message.into(),
        }
    }

    /// The guard rejection, if that is what this is.
    #[must_use]
    pub const fn as_guard_error(&self) -> Option<&GuardError> {
        match self {
            Self::Rejected(err) => Some(err),
            Self::Failed { .. } => None,
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(err) => err.fmt(f),
            Self::Failed { hook, message } => write!(f, "{hook}: {message}"),
        }
    }
}

impl std::error::Error for HookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rejected(err) => Some(err),
            Self::Failed { .. } => None,
        }
    }
}

impl From<GuardError> for HookError {
    fn from(err: GuardError) -> Self {
        Self::Rejected(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn below_minimum_message() {
        let err = GuardError::below_minimum("Block highlights", "items", 3, 5, 2);
        assert_eq!(
            err.to_string(),
            "Block highlights must have at least 3 items. Current: 5, After changes: 2"
        );
    }

    #[test]
    fn above_maximum_message() {
        let err = GuardError::above_maximum("Block tabbed content", "tabs", 4, 2, 5);
        assert_eq!(
            err.to_string(),
            "Block tabbed content cannot have more than 4 tabs. Current: 2, After changes: 5"
        );
    }

    #[test]
    fn negative_projection_is_reported_as_is() {
        let err = GuardError::below_minimum("Block tabbed content", "tabs", 2, 0, -3);
        assert!(err.to_string().ends_with("Current: 0, After changes: -3"));
    }

    #[test]
    fn accessors() {
        let low = GuardError::below_minimum("Block highlights", "items", 3, 5, 2);
        assert_eq!(low.min_or_max(), 3);
        assert_eq!(low.baseline(), 5);
        assert_eq!(low.projected(), 2);
        assert_eq!(low.constraint(), "min");
        assert_eq!(low.subject(), "Block highlights");

        let high = GuardError::above_maximum("Block tabbed content", "tabs", 4, 2, 5);
        assert_eq!(high.min_or_max(), 4);
        assert_eq!(high.constraint(), "max");
    }

    #[test]
    fn query_error_display() {
        assert_eq!(
            QueryError::connection("refused").to_string(),
            "connection error: refused"
        );
        assert_eq!(
            QueryError::malformed("no such table: block_tabs").to_string(),
            "malformed query error: no such table: block_tabs"
        );
        let err = QueryError::transaction("aborted");
        assert_eq!(err.kind(), QueryErrorKind::Transaction);
        assert_eq!(err.message(), "aborted");
    }

    #[test]
    fn hook_error_wraps_guard_error() {
        let guard = GuardError::above_maximum("Block tabbed content", "tabs", 4, 2, 5);
        let err = HookError::from(guard.clone());
        assert_eq!(err.to_string(), guard.to_string());
        assert_eq!(err.as_guard_error(), Some(&guard));
        assert!(err.source().is_some());
    }

    #[test]
    fn hook_error_failed() {
        let err = HookError::failed("slug-check", "slug already taken");
        assert_eq!(err.to_string(), "slug-check: slug already taken");
        assert!(err.as_guard_error().is_none());
        assert!(err.source().is_none());
    }
}
