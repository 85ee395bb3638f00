//! Stack: LIFO facade over [`DynamicArray`].

use super::collection::Collection;
use super::cursor::Versioned;
use super::dynamic_array::DynamicArray;
use super::growth::GrowthPolicy;
use crate::error::{AllocOptError, Result};
use std::fmt;
use std::iter::Rev;
use std::slice;

/// Last-in first-out stack.
///
/// Enumeration runs from the top of the stack down.
///
/// # Examples
///
/// ```rust
/// use allocopt::Stack;
///
/// let mut stack = Stack::new();
/// stack.push(1)?;
/// stack.push(2)?;
/// stack.push(3)?;
/// assert_eq!(stack.peek()?, &3);
/// assert_eq!(stack.pop_n(2), 2);
/// assert_eq!(stack.pop()?, 1);
/// assert!(stack.pop().is_err());
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Stack<T> {
    items: DynamicArray<T>,
}

impl<T> Stack<T> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            items: DynamicArray::new(),
        }
    }

    /// Create an empty stack with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            items: DynamicArray::with_capacity(capacity)?,
        })
    }

    /// Create an empty stack with a custom growth policy.
    pub fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            items: DynamicArray::with_growth(growth),
        }
    }

    /// Number of stacked elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocated slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Push onto the top.
    pub fn push(&mut self, item: T) -> Result<()> {
        self.items.push(item)
    }

    /// Push clones of `items` in order; the last one ends on top.
    pub fn push_range(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.items.extend_from_slice(items)
    }

    /// Pop the top element, `EmptyCollection` if there is none.
    pub fn pop(&mut self) -> Result<T> {
        self.items.pop().ok_or_else(|| AllocOptError::empty("Stack"))
    }

    /// Pop the top element if there is one.
    pub fn try_pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Pop up to `count` elements; never fails on an empty stack.
    /// Returns how many were removed.
    pub fn pop_n(&mut self, count: usize) -> usize {
        let removed = count.min(self.items.len());
        self.items.truncate(self.items.len() - removed);
        removed
    }

    /// Top element, `EmptyCollection` if there is none.
    pub fn peek(&self) -> Result<&T> {
        self.try_peek().ok_or_else(|| AllocOptError::empty("Stack"))
    }

    /// Top element if there is one.
    pub fn try_peek(&self) -> Option<&T> {
        self.items.as_slice().last()
    }

    /// Mutable top element if there is one.
    pub fn try_peek_mut(&mut self) -> Option<&mut T> {
        self.items.as_mut_slice().last_mut()
    }

    /// The top `count` elements, bottom-most first.
    ///
    /// Fails with `IndexOutOfRange` when fewer than `count` are stored.
    pub fn peek_n(&self, count: usize) -> Result<&[T]> {
        self.try_peek_n(count)
            .ok_or_else(|| AllocOptError::index_out_of_range(count, self.len()))
    }

    /// The top `count` elements if at least that many are stored.
    pub fn try_peek_n(&self, count: usize) -> Option<&[T]> {
        let slice = self.items.as_slice();
        let start = slice.len().checked_sub(count)?;
        Some(&slice[start..])
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether any element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.iter().any(|x| x == item)
    }

    /// Grow to at least `capacity`; returns the new capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        self.items.ensure_capacity(capacity)
    }

    /// Shrink the allocation to the current length.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.items.trim_excess()
    }

    /// Elements bottom to top.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Iterate from the top down.
    pub fn iter(&self) -> Rev<slice::Iter<'_, T>> {
        self.items.iter().rev()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Versioned for Stack<T> {
    type Item = T;

    fn version(&self) -> u64 {
        self.items.version()
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        let slice = self.items.as_slice();
        let index = slice.len().checked_sub(position + 1)?;
        Some((&slice[index], position + 1))
    }
}

impl<T: PartialEq> Collection<T> for Stack<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn contains(&self, item: &T) -> bool {
        Stack::contains(self, item)
    }

    fn add(&mut self, item: T) -> Result<bool> {
        self.push(item)?;
        Ok(true)
    }

    fn remove(&mut self, _item: &T) -> Result<bool> {
        Err(AllocOptError::not_supported("Stack::remove"))
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Pushes in iteration order, so the last element ends on top.
impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
