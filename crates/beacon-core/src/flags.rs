//! Feature flag lookup.

use std::collections::BTreeSet;

/// Name of the flag that exposes the row-level "Test" action.
pub const TEST_ACTION_FLAG: &str = "insights.integrations.test";

/// Boolean feature flag lookup by name.
///
/// Unknown flags are reported as disabled.
pub trait FeatureFlags: Send + Sync {
    /// Returns whether the named flag is enabled.
    fn is_enabled(&self, name: &str) -> bool;
}

/// A fixed set of enabled flags.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StaticFlags {
    enabled: BTreeSet<String>,
}

impl StaticFlags {
    /// Creates an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the named flag.
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.enabled.insert(name.into());
        self
    }
}

impl<S: Into<String>> FromIterator<S> for StaticFlags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl FeatureFlags for StaticFlags {
    fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_flag_is_disabled() {
        let flags = StaticFlags::new();
        assert!(!flags.is_enabled(TEST_ACTION_FLAG));

        let flags = flags.with_flag(TEST_ACTION_FLAG);
        assert!(flags.is_enabled(TEST_ACTION_FLAG));
        assert!(!flags.is_enabled("insights.integrations.other"));
    }
}
