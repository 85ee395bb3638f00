//! Error handling for the allocopt collections
//!
//! Every structural failure a container can report is a variant of
//! [`AllocOptError`]. They are programming-contract violations: they propagate
//! straight to the caller and never leave a container half-updated.

use thiserror::Error;

/// Main error type for the allocopt collections
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocOptError {
    /// Indexer or slice access outside `[0, len)`
    #[error("Index out of range: index {index}, len {len}")]
    IndexOutOfRange {
        /// The invalid index
        index: usize,
        /// The logical length at the time of access
        len: usize,
    },

    /// Unconditional peek/pop on an empty container
    #[error("Collection is empty: {container}")]
    EmptyCollection {
        /// Name of the container that was accessed
        container: &'static str,
    },

    /// `add` on a key that is already present
    #[error("An entry with the same key already exists")]
    DuplicateKey,

    /// Indexer get on a dictionary for an absent key
    #[error("The given key was not present")]
    KeyNotFound,

    /// Dereferencing a stale arena handle
    #[error("Node invalidated: slot {index} was freed or reused")]
    NodeInvalidated {
        /// Slot index the handle points at
        index: usize,
    },

    /// Enumerator version mismatch detected mid-iteration
    #[error("Collection was modified during enumeration: expected version {expected}, found {actual}")]
    ConcurrentModification {
        /// Version captured when the enumerator was created
        expected: u64,
        /// Version observed on the next step
        actual: u64,
    },

    /// Requested capacity exceeds the representable maximum
    #[error("Capacity overflow: requested {requested}, max {max}")]
    CapacityOverflow {
        /// Capacity that was asked for
        requested: usize,
        /// Largest capacity the container can represent
        max: usize,
    },

    /// Operation not meaningful for this container
    #[error("Not supported: {operation}")]
    NotSupported {
        /// Description of the unsupported operation
        operation: &'static str,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl AllocOptError {
    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an empty collection error
    pub fn empty(container: &'static str) -> Self {
        Self::EmptyCollection { container }
    }

    /// Create a node invalidated error
    pub fn node_invalidated(index: usize) -> Self {
        Self::NodeInvalidated { index }
    }

    /// Create a concurrent modification error
    pub fn concurrent_modification(expected: u64, actual: u64) -> Self {
        Self::ConcurrentModification { expected, actual }
    }

    /// Create a capacity overflow error
    pub fn capacity_overflow(requested: usize, max: usize) -> Self {
        Self::CapacityOverflow { requested, max }
    }

    /// Create a not supported error
    pub fn not_supported(operation: &'static str) -> Self {
        Self::NotSupported { operation }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this error reports misuse of a container
    ///
    /// Everything except configuration problems is a contract violation.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "bounds",
            Self::EmptyCollection { .. } => "empty",
            Self::DuplicateKey => "duplicate_key",
            Self::KeyNotFound => "key_not_found",
            Self::NodeInvalidated { .. } => "stale_handle",
            Self::ConcurrentModification { .. } => "concurrent_modification",
            Self::CapacityOverflow { .. } => "capacity",
            Self::NotSupported { .. } => "unsupported",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AllocOptError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, len: usize) -> Result<()> {
    if index >= len {
        Err(AllocOptError::index_out_of_range(index, len))
    } else {
        Ok(())
    }
}

/// Assert that `start..end` is a valid range within `len`
#[inline]
pub fn check_range(start: usize, end: usize, len: usize) -> Result<()> {
    if start > end {
        return Err(AllocOptError::index_out_of_range(start, end));
    }
    if end > len {
        return Err(AllocOptError::index_out_of_range(end, len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AllocOptError::index_out_of_range(3, 2);
        assert_eq!(err.category(), "bounds");
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_bounds_checking() {
        assert!(check_bounds(5, 10).is_ok());
        assert!(check_bounds(10, 10).is_err());
        assert!(check_bounds(15, 10).is_err());
    }

    #[test]
    fn test_range_checking() {
        assert!(check_range(2, 8, 10).is_ok());
        assert!(check_range(8, 2, 10).is_err()); // start > end
        assert!(check_range(2, 15, 10).is_err()); // end > len
    }

    #[test]
    fn test_edge_case_range_checking() {
        assert!(check_range(0, 0, 0).is_ok());
        assert!(check_range(5, 5, 5).is_ok());
        assert!(check_range(usize::MAX, 0, 10).is_err());
        assert!(check_bounds(0, 0).is_err());
    }

    #[test]
    fn test_all_error_categories() {
        let cases = [
            (AllocOptError::index_out_of_range(1, 0), "bounds"),
            (AllocOptError::empty("Deque"), "empty"),
            (AllocOptError::DuplicateKey, "duplicate_key"),
            (AllocOptError::KeyNotFound, "key_not_found"),
            (AllocOptError::node_invalidated(7), "stale_handle"),
            (
                AllocOptError::concurrent_modification(1, 2),
                "concurrent_modification",
            ),
            (AllocOptError::capacity_overflow(10, 5), "capacity"),
            (AllocOptError::not_supported("Stack::remove"), "unsupported"),
            (AllocOptError::configuration("bad"), "config"),
        ];

        for (err, category) in cases {
            assert_eq!(err.category(), category);
        }
    }

    #[test]
    fn test_configuration_is_not_contract_violation() {
        assert!(!AllocOptError::configuration("load factor").is_contract_violation());
        assert!(AllocOptError::KeyNotFound.is_contract_violation());
    }

    #[test]
    fn test_error_display() {
        let err = AllocOptError::index_out_of_range(10, 5);
        let display = format!("{}", err);
        assert!(display.contains("Index out of range"));
        assert!(display.contains("10"));
        assert!(display.contains("5"));

        let err = AllocOptError::concurrent_modification(3, 4);
        let display = format!("{}", err);
        assert!(display.contains("modified during enumeration"));

        let err = AllocOptError::empty("Queue");
        assert!(format!("{}", err).contains("Queue"));
    }
}
