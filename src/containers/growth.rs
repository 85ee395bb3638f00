//! Shared capacity growth rule for contiguous backing arrays.

use crate::config::{Config, GrowthConfig};
use crate::error::{AllocOptError, Result};
use std::mem;

/// Capacity of the first allocation made by an empty container.
pub const MIN_CAPACITY: usize = 4;

/// Sizing rule applied whenever a backing array runs out of room.
///
/// An empty array jumps straight to `max(min_capacity, required)`; a
/// non-empty one doubles, bounded by the maximum, and never returns less than
/// what was asked for. Nothing ever shrinks implicitly; only explicit
/// `trim_excess` calls reallocate downward.
///
/// # Examples
///
/// ```rust
/// use allocopt::GrowthPolicy;
///
/// let policy = GrowthPolicy::new();
/// assert_eq!(policy.next_capacity::<u64>(0, 1).unwrap(), 4);
/// assert_eq!(policy.next_capacity::<u64>(4, 5).unwrap(), 8);
/// assert_eq!(policy.next_capacity::<u64>(4, 100).unwrap(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrowthPolicy {
    min_capacity: usize,
    max_capacity: usize,
}

impl GrowthPolicy {
    /// Default policy: first allocation of 4, no ceiling beyond what the
    /// element type can address.
    pub const fn new() -> Self {
        Self {
            min_capacity: MIN_CAPACITY,
            max_capacity: usize::MAX,
        }
    }

    /// Build a policy from a validated [`GrowthConfig`].
    pub fn from_config(config: &GrowthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            min_capacity: config.min_capacity,
            max_capacity: config.max_capacity,
        })
    }

    /// Build a policy from explicit limits.
    pub fn with_limits(min_capacity: usize, max_capacity: usize) -> Result<Self> {
        Self::from_config(&GrowthConfig {
            min_capacity,
            max_capacity,
        })
    }

    /// Capacity of the first allocation.
    #[inline]
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Configured ceiling, before the element-size limit is applied.
    #[inline]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Largest capacity an array of `T` may reach under this policy.
    ///
    /// Zero-sized types are only bounded by the configured maximum.
    #[inline]
    pub fn max_for<T>(&self) -> usize {
        match mem::size_of::<T>() {
            0 => self.max_capacity,
            size => self.max_capacity.min(isize::MAX as usize / size),
        }
    }

    /// Same policy with the ceiling lowered to `limit`.
    ///
    /// Used by containers whose links are narrower than `usize`.
    pub(crate) fn clamped(&self, limit: usize) -> Self {
        Self {
            min_capacity: self.min_capacity.min(limit),
            max_capacity: self.max_capacity.min(limit),
        }
    }

    /// Capacity to allocate when `required` slots are needed and `current`
    /// are available.
    ///
    /// # Errors
    ///
    /// `CapacityOverflow` when `required` is beyond [`max_for`](Self::max_for).
    pub fn next_capacity<T>(&self, current: usize, required: usize) -> Result<usize> {
        let max = self.max_for::<T>();
        if required > max {
            return Err(AllocOptError::capacity_overflow(required, max));
        }

        if current == 0 {
            return Ok(self.min_capacity.max(required).min(max));
        }

        Ok(current.saturating_mul(2).min(max).max(required))
    }

    /// `len + additional` with overflow reported as `CapacityOverflow`.
    #[inline]
    pub(crate) fn required<T>(&self, len: usize, additional: usize) -> Result<usize> {
        len.checked_add(additional)
            .ok_or_else(|| AllocOptError::capacity_overflow(usize::MAX, self.max_for::<T>()))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_allocation() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity::<u32>(0, 0).unwrap(), 4);
        assert_eq!(policy.next_capacity::<u32>(0, 1).unwrap(), 4);
        assert_eq!(policy.next_capacity::<u32>(0, 9).unwrap(), 9);
    }

    #[test]
    fn test_doubling() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.next_capacity::<u32>(4, 5).unwrap(), 8);
        assert_eq!(policy.next_capacity::<u32>(8, 9).unwrap(), 16);
        assert_eq!(policy.next_capacity::<u32>(8, 40).unwrap(), 40);
    }

    #[test]
    fn test_bounded_by_max() {
        let policy = GrowthPolicy::with_limits(4, 10).unwrap();
        assert_eq!(policy.next_capacity::<u32>(8, 9).unwrap(), 10);
        assert_eq!(policy.next_capacity::<u32>(8, 10).unwrap(), 10);

        let err = policy.next_capacity::<u32>(10, 11).unwrap_err();
        assert_eq!(err, AllocOptError::capacity_overflow(11, 10));
    }

    #[test]
    fn test_element_size_limit() {
        let policy = GrowthPolicy::new();
        let max = policy.max_for::<u64>();
        assert_eq!(max, isize::MAX as usize / 8);
        assert!(policy.next_capacity::<u64>(4, max + 1).is_err());
        assert_eq!(policy.next_capacity::<u64>(max / 2 + 1, max).unwrap(), max);
    }

    #[test]
    fn test_zero_sized_types() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.max_for::<()>(), usize::MAX);
        assert!(policy.next_capacity::<()>(usize::MAX / 2 + 1, usize::MAX).is_ok());
    }

    #[test]
    fn test_min_capacity_respects_max() {
        let policy = GrowthPolicy::with_limits(8, 8).unwrap().clamped(3);
        assert_eq!(policy.next_capacity::<u8>(0, 1).unwrap(), 3);
        assert!(policy.next_capacity::<u8>(3, 4).is_err());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        assert!(GrowthPolicy::with_limits(0, 10).is_err());
        assert!(GrowthPolicy::with_limits(10, 5).is_err());
    }

    #[test]
    fn test_required_overflow() {
        let policy = GrowthPolicy::new();
        assert_eq!(policy.required::<u8>(3, 4).unwrap(), 7);
        assert!(matches!(
            policy.required::<u8>(usize::MAX, 1),
            Err(AllocOptError::CapacityOverflow { .. })
        ));
    }
}
