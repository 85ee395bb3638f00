//! Deque: double-ended queue facade over [`RingBuffer`].

use super::collection::Collection;
use super::cursor::Versioned;
use super::growth::GrowthPolicy;
use super::ring_buffer::{IntoIter, Iter, IterMut, RingBuffer, TwoPartSlice};
use crate::error::{AllocOptError, Result};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Double-ended queue with O(1) amortized operations at both ends.
///
/// Single-element `dequeue_*` and `peek_*` fail with `EmptyCollection` on an
/// empty deque; the counted `dequeue_*_n` forms clamp instead.
///
/// # Examples
///
/// ```rust
/// use allocopt::Deque;
///
/// let mut deque = Deque::new();
/// deque.enqueue_last(2)?;
/// deque.enqueue_first(1)?;
/// deque.enqueue_range_last(&[3, 4, 5])?;
/// assert_eq!(deque.dequeue_first()?, 1);
/// assert_eq!(deque.dequeue_last_n(10), 4);
/// assert!(deque.dequeue_last().is_err());
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Deque<T> {
    ring: RingBuffer<T>,
}

impl<T> Deque<T> {
    const NAME: &'static str = "Deque";

    /// Create an empty deque without allocating.
    pub fn new() -> Self {
        Self {
            ring: RingBuffer::new(),
        }
    }

    /// Create an empty deque with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            ring: RingBuffer::with_capacity(capacity)?,
        })
    }

    /// Create an empty deque with a custom growth policy.
    pub fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            ring: RingBuffer::with_growth(growth),
        }
    }

    /// Number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Whether the deque is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Prepend at the front, growing if full.
    pub fn enqueue_first(&mut self, item: T) -> Result<()> {
        self.ring.enqueue_first(item)
    }

    /// Append at the back, growing if full.
    pub fn enqueue_last(&mut self, item: T) -> Result<()> {
        self.ring.enqueue_last(item)
    }

    /// Prepend clones of `items`; `items[0]` becomes the front.
    pub fn enqueue_range_first(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.ring.enqueue_range_first(items)
    }

    /// Append clones of `items` in order.
    pub fn enqueue_range_last(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.ring.enqueue_range_last(items)
    }

    /// Move a collection to the front, keeping its order.
    pub fn extend_first<I: IntoIterator<Item = T>>(&mut self, items: I) -> Result<()> {
        self.ring.extend_first(items)
    }

    /// Move a collection to the back.
    pub fn extend_last<I: IntoIterator<Item = T>>(&mut self, items: I) -> Result<()> {
        self.ring.extend_last(items)
    }

    /// Remove the front element, `EmptyCollection` when empty.
    pub fn dequeue_first(&mut self) -> Result<T> {
        self.ring
            .try_dequeue_first()
            .ok_or_else(|| AllocOptError::empty(Self::NAME))
    }

    /// Remove the back element, `EmptyCollection` when empty.
    pub fn dequeue_last(&mut self) -> Result<T> {
        self.ring
            .try_dequeue_last()
            .ok_or_else(|| AllocOptError::empty(Self::NAME))
    }

    /// Remove the front element if any.
    pub fn try_dequeue_first(&mut self) -> Option<T> {
        self.ring.try_dequeue_first()
    }

    /// Remove the back element if any.
    pub fn try_dequeue_last(&mut self) -> Option<T> {
        self.ring.try_dequeue_last()
    }

    /// Remove up to `count` elements from the front; returns how many went.
    pub fn dequeue_first_n(&mut self, count: usize) -> usize {
        self.ring.dequeue_first_n(count)
    }

    /// Remove up to `count` elements from the back; returns how many went.
    pub fn dequeue_last_n(&mut self, count: usize) -> usize {
        self.ring.dequeue_last_n(count)
    }

    /// Front element, `EmptyCollection` when empty.
    pub fn peek_first(&self) -> Result<&T> {
        self.ring
            .try_peek_first()
            .ok_or_else(|| AllocOptError::empty(Self::NAME))
    }

    /// Back element, `EmptyCollection` when empty.
    pub fn peek_last(&self) -> Result<&T> {
        self.ring
            .try_peek_last()
            .ok_or_else(|| AllocOptError::empty(Self::NAME))
    }

    /// Front element if any.
    pub fn try_peek_first(&self) -> Option<&T> {
        self.ring.try_peek_first()
    }

    /// Back element if any.
    pub fn try_peek_last(&self) -> Option<&T> {
        self.ring.try_peek_last()
    }

    /// Mutable front element if any.
    pub fn try_peek_first_mut(&mut self) -> Option<&mut T> {
        self.ring.try_peek_first_mut()
    }

    /// Mutable back element if any.
    pub fn try_peek_last_mut(&mut self) -> Option<&mut T> {
        self.ring.try_peek_last_mut()
    }

    /// First `count` elements as a possibly-wrapped view.
    pub fn peek_first_n(&self, count: usize) -> Result<TwoPartSlice<'_, T>> {
        self.ring.peek_first_n(count)
    }

    /// Last `count` elements, front to back, as a possibly-wrapped view.
    pub fn peek_last_n(&self, count: usize) -> Result<TwoPartSlice<'_, T>> {
        self.ring.peek_last_n(count)
    }

    /// The first `count` elements, `None` if fewer are stored.
    pub fn try_peek_first_n(&self, count: usize) -> Option<TwoPartSlice<'_, T>> {
        self.ring.try_peek_first_n(count)
    }

    /// The last `count` elements, `None` if fewer are stored.
    pub fn try_peek_last_n(&self, count: usize) -> Option<TwoPartSlice<'_, T>> {
        self.ring.try_peek_last_n(count)
    }

    /// Element at logical position `index` from the front.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.ring.get(index)
    }

    /// Mutable element at logical position `index` from the front.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.ring.get_mut(index)
    }

    /// Linear search for `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.ring.contains(item)
    }

    /// Position of the first element matching `key` under `eq`.
    pub fn position_by<Q: ?Sized, F>(&self, key: &Q, eq: F) -> Option<usize>
    where
        F: FnMut(&T, &Q) -> bool,
    {
        self.ring.position_by(key, eq)
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Grow to at least `capacity` slots. Returns the new capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        self.ring.ensure_capacity(capacity)
    }

    /// Shrink the allocation to the current length.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.ring.trim_excess()
    }

    /// Contents front to back as at most two slices.
    pub fn as_slices(&self) -> TwoPartSlice<'_, T> {
        self.ring.as_slices()
    }

    /// Rotate the storage so the contents form one slice.
    pub fn make_contiguous(&mut self) -> Result<&mut [T]> {
        self.ring.make_contiguous()
    }

    /// Iterate front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        self.ring.iter()
    }

    /// Mutable iteration front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.ring.iter_mut()
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Versioned for Deque<T> {
    type Item = T;

    fn version(&self) -> u64 {
        self.ring.version()
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        self.ring.item_at(position)
    }
}

impl<T: PartialEq> Collection<T> for Deque<T> {
    fn len(&self) -> usize {
        self.ring.len()
    }

    fn clear(&mut self) {
        self.ring.clear();
    }

    fn contains(&self, item: &T) -> bool {
        self.ring.contains(item)
    }

    fn add(&mut self, item: T) -> Result<bool> {
        self.ring.enqueue_last(item)?;
        Ok(true)
    }

    fn remove(&mut self, _item: &T) -> Result<bool> {
        Err(AllocOptError::not_supported("Deque::remove"))
    }
}

impl<T> Index<usize> for Deque<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.ring[index]
    }
}

impl<T> IndexMut<usize> for Deque<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.ring[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            ring: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Deque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.ring.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Deque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
