//! Encoding-promotion limits.
//!
//! Each container starts in a compact encoding and promotes to its general
//! one when a size or content threshold is crossed. The thresholds are
//! process-wide configuration, read on every potentially-promoting
//! mutation, so changing them at runtime affects only future mutations;
//! promotion itself is one-way.

use serde::{Deserialize, Serialize};

/// Thresholds controlling when a container leaves its compact encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLimits {
    /// Int-set cardinality above which a set promotes to the hash encoding
    /// (default: 512).
    pub set_max_intset_entries: usize,

    /// Packed-list length at which a push promotes to the linked encoding
    /// (default: 128).
    pub list_max_ziplist_entries: usize,

    /// Byte length above which a pushed raw value promotes the list
    /// (default: 64).
    pub list_max_ziplist_value: usize,
}

impl Default for CollectionLimits {
    fn default() -> Self {
        CollectionLimits {
            set_max_intset_entries: 512,
            list_max_ziplist_entries: 128,
            list_max_ziplist_value: 64,
        }
    }
}

impl CollectionLimits {
    /// Limits with small values for testing promotion boundaries without
    /// building hundreds of elements.
    pub fn with_small_limits() -> Self {
        CollectionLimits {
            set_max_intset_entries: 4,
            list_max_ziplist_entries: 4,
            list_max_ziplist_value: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = CollectionLimits::default();
        assert_eq!(limits.set_max_intset_entries, 512);
        assert_eq!(limits.list_max_ziplist_entries, 128);
        assert_eq!(limits.list_max_ziplist_value, 64);
    }

    #[test]
    fn test_small_limits_are_smaller() {
        let small = CollectionLimits::with_small_limits();
        let default = CollectionLimits::default();
        assert!(small.set_max_intset_entries < default.set_max_intset_entries);
        assert!(small.list_max_ziplist_entries < default.list_max_ziplist_entries);
        assert!(small.list_max_ziplist_value < default.list_max_ziplist_value);
    }
}
