//! Queue: FIFO facade over [`RingBuffer`].

use super::collection::Collection;
use super::cursor::Versioned;
use super::growth::GrowthPolicy;
use super::ring_buffer::{IntoIter, Iter, RingBuffer, TwoPartSlice};
use crate::error::{AllocOptError, Result};
use std::fmt;

/// First-in first-out queue.
///
/// `dequeue` fails with `EmptyCollection` on an empty queue while
/// `dequeue_n` clamps to whatever is available and never fails.
///
/// # Examples
///
/// ```rust
/// use allocopt::Queue;
///
/// let mut queue = Queue::new();
/// queue.enqueue_range(&[1, 2, 3])?;
/// assert_eq!(queue.dequeue()?, 1);
/// assert_eq!(queue.dequeue_n(5), 2);
/// assert!(queue.dequeue().is_err());
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Queue<T> {
    ring: RingBuffer<T>,
}

impl<T> Queue<T> {
    const NAME: &'static str = "Queue";

    /// Create an empty queue without allocating.
    pub fn new() -> Self {
        Self {
            ring: RingBuffer::new(),
        }
    }

    /// Create an empty queue with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            ring: RingBuffer::with_capacity(capacity)?,
        })
    }

    /// Create an empty queue with a custom growth policy.
    pub fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            ring: RingBuffer::with_growth(growth),
        }
    }

    /// Number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Add to the back.
    pub fn enqueue(&mut self, item: T) -> Result<()> {
        self.ring.enqueue_last(item)
    }

    /// Add clones of `items` to the back in order.
    pub fn enqueue_range(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.ring.enqueue_range_last(items)
    }

    /// Move a collection to the back.
    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) -> Result<()> {
        self.ring.extend_last(items)
    }

    /// Take the front element.
    pub fn dequeue(&mut self) -> Result<T> {
        self.ring
            .try_dequeue_first()
            .ok_or_else(|| AllocOptError::empty(Self::NAME))
    }

    /// Remove the oldest element if any.
    pub fn try_dequeue(&mut self) -> Option<T> {
        self.ring.try_dequeue_first()
    }

    /// Drop up to `count` front elements; returns how many went.
    pub fn dequeue_n(&mut self, count: usize) -> usize {
        self.ring.dequeue_first_n(count)
    }

    /// Oldest element, `EmptyCollection` when empty.
    pub fn peek(&self) -> Result<&T> {
        self.ring
            .try_peek_first()
            .ok_or_else(|| AllocOptError::empty(Self::NAME))
    }

    /// Oldest element if any.
    pub fn try_peek(&self) -> Option<&T> {
        self.ring.try_peek_first()
    }

    /// The next `count` elements to be dequeued.
    pub fn peek_n(&self, count: usize) -> Result<TwoPartSlice<'_, T>> {
        self.ring.peek_first_n(count)
    }

    /// The `count` oldest elements, `None` if fewer are queued.
    pub fn try_peek_n(&self, count: usize) -> Option<TwoPartSlice<'_, T>> {
        self.ring.try_peek_first_n(count)
    }

    /// Linear search for `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.ring.contains(item)
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Grow to at least `capacity` slots.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        self.ring.ensure_capacity(capacity)
    }

    /// Shrink the allocation to the current length.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.ring.trim_excess()
    }

    /// Iterate in dequeue order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.ring.iter()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Versioned for Queue<T> {
    type Item = T;

    fn version(&self) -> u64 {
        self.ring.version()
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        self.ring.item_at(position)
    }
}

impl<T: PartialEq> Collection<T> for Queue<T> {
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
        Err(AllocOptError::not_supported("Queue::remove"))
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            ring: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.ring.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = Queue::new();
        for i in 0..100 {
            queue.enqueue(i).unwrap();
            if i % 3 == 0 {
                queue.dequeue().unwrap();
            }
        }
        let rest: Vec<i32> = queue.iter().copied().collect();
        let mut sorted = rest.clone();
        sorted.sort();
        assert_eq!(rest, sorted);
        assert_eq!(rest.len(), 66);
    }

    #[test]
    fn test_dequeue_asymmetry() {
        let mut queue: Queue<u8> = Queue::new();
        assert_eq!(queue.dequeue().unwrap_err(), AllocOptError::empty("Queue"));
        assert_eq!(queue.dequeue_n(10), 0);

        queue.enqueue_range(&[1, 2]).unwrap();
        assert_eq!(queue.dequeue_n(10), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_peek_n() {
        let queue: Queue<i32> = (0..5).collect();
        assert_eq!(queue.peek().unwrap(), &0);
        assert_eq!(queue.peek_n(3).unwrap().to_vec(), vec![0, 1, 2]);
        assert!(queue.try_peek_n(6).is_none());
    }

    #[test]
    fn test_cursor_fail_fast() {
        let mut queue: Queue<i32> = (0..3).collect();
        let mut cursor = queue.cursor();
        cursor.next(&queue).unwrap();
        queue.dequeue().unwrap();
        assert!(cursor.next(&queue).is_err());
    }
}
