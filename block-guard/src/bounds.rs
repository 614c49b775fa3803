//! Inclusive child-count bounds.

/// `min..=max` on the number of children a parent may have.
///
/// `min <= max` is checked on construction; in a `const` the check happens at
/// compile time.
///
/// ```
/// use block_guard::CountBounds;
///
/// const TABS: CountBounds = CountBounds::new(2, 4);
/// assert!(TABS.contains(2));
/// assert!(TABS.contains(4));
/// assert!(!TABS.contains(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountBounds {
    min: i64,
    max: i64,
}

impl CountBounds {
    /// Create bounds.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        assert!(min <= max, "count bounds require min <= max");
        Self { min, max }
    }

    /// Create bounds, or `None` if `min > max`.
    #[must_use]
    pub const fn try_new(min: i64, max: i64) -> Option<Self> {
        if min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Fewest children allowed.
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min
    }

    /// Most children allowed.
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Whether `count` is within bounds. Both ends pass.
    #[must_use]
    pub const fn contains(&self, count: i64) -> bool {
        self.min <= count && count <= self.max
    }
}
