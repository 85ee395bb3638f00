//! Uniform element-container surface.

use crate::error::Result;

/// Operations shared by every single-element container.
///
/// `add` and `remove` are fallible so containers for which one of them has no
/// meaning (taking an arbitrary element out of a stack or queue) can report
/// `NotSupported` instead of silently doing something surprising.
pub trait Collection<T> {
    /// Number of elements.
    fn len(&self) -> usize;

    /// `true` when there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every element.
    fn clear(&mut self);

    /// Whether an element equal to `item` is present.
    fn contains(&self, item: &T) -> bool;

    /// Add `item`. Returns `false` only when the container rejected it as a
    /// duplicate.
    fn add(&mut self, item: T) -> Result<bool>;

    /// Remove one element equal to `item`. Returns whether one was found.
    fn remove(&mut self, item: &T) -> Result<bool>;
}
