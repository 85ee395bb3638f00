//! List: indexable growable sequence facade over [`DynamicArray`].

use super::collection::Collection;
use super::cursor::Versioned;
use super::dynamic_array::{DynamicArray, IntoIter};
use super::growth::GrowthPolicy;
use crate::error::Result;
use std::ops::{Index, IndexMut};
use std::slice;

/// Growable list with positional insert/remove and value search.
///
/// # Examples
///
/// ```rust
/// use allocopt::List;
///
/// let mut list = List::new();
/// list.add("b")?;
/// list.insert(0, "a")?;
/// list.add("c")?;
/// assert_eq!(list.index_of(&"c"), Some(2));
/// assert!(list.remove(&"b"));
/// assert_eq!(list.as_slice(), &["a", "c"]);
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct List<T> {
    items: DynamicArray<T>,
}

impl<T> List<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            items: DynamicArray::new(),
        }
    }

    /// Create an empty list with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            items: DynamicArray::with_capacity(capacity)?,
        })
    }

    /// Create an empty list with a custom growth policy.
    pub fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            items: DynamicArray::with_growth(growth),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current allocation size in elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Append an element.
    pub fn add(&mut self, item: T) -> Result<()> {
        self.items.push(item)
    }

    /// Insert at `index` (`index == len` appends).
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        self.items.insert(index, item)
    }

    /// Remove and return the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.items.remove_at(index)
    }

    /// Remove `count` elements starting at `index`.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        self.items.remove_range(index, count)
    }

    /// Remove every element matching `predicate`; returns how many went.
    pub fn remove_all<F: FnMut(&T) -> bool>(&mut self, predicate: F) -> usize {
        self.items.remove_all(predicate)
    }

    /// Remove the first element equal to `item`.
    pub fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(item) {
            Some(index) => self.items.remove_at(index).is_ok(),
            None => false,
        }
    }

    /// Position of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|x| x == item)
    }

    /// Position of the last element equal to `item`.
    pub fn last_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().rposition(|x| x == item)
    }

    /// Whether any element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(item).is_some()
    }

    /// Element at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.as_slice().get(index)
    }

    /// Mutable element at `index`, if any.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.as_mut_slice().get_mut(index)
    }

    /// Element at `index` or `IndexOutOfRange`.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        self.items.at(index)
    }

    /// Replace the element at `index`, returning the old value.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        self.items.set(index, item)
    }

    /// Reverse the order of the elements in place.
    pub fn reverse(&mut self) {
        self.items.as_mut_slice().reverse();
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Append clones of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.items.extend_from_slice(items)
    }

    /// Grow to at least `capacity`; returns the new capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        self.items.ensure_capacity(capacity)
    }

    /// Shrink the allocation to the current length.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.items.trim_excess()
    }

    /// Elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.items.as_mut_slice()
    }

    /// Iterate in index order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate mutably in index order.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Versioned for List<T> {
    type Item = T;

    fn version(&self) -> u64 {
        self.items.version()
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        self.items.item_at(position)
    }
}

impl<T: PartialEq> Collection<T> for List<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn contains(&self, item: &T) -> bool {
        List::contains(self, item)
    }

    fn add(&mut self, item: T) -> Result<bool> {
        self.items.push(item)?;
        Ok(true)
    }

    fn remove(&mut self, item: &T) -> Result<bool> {
        Ok(List::remove(self, item))
    }
}

impl<T> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for List<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for List<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocOptError;

    #[test]
    fn test_add_insert_remove() {
        let mut list = List::new();
        list.add(1).unwrap();
        list.add(3).unwrap();
        list.insert(1, 2).unwrap();
        assert_eq!(list.as_slice(), &[1, 2, 3]);

        assert!(list.remove(&2));
        assert!(!list.remove(&2));
        assert_eq!(list.remove_at(0).unwrap(), 1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_search() {
        let list: List<i32> = vec![5, 1, 5, 2].into();
        assert_eq!(list.index_of(&5), Some(0));
        assert_eq!(list.last_index_of(&5), Some(2));
        assert_eq!(list.index_of(&9), None);
        assert!(list.contains(&2));
    }

    #[test]
    fn test_reverse_and_index() {
        let mut list: List<i32> = (1..=4).collect();
        list.reverse();
        assert_eq!(list[0], 4);
        list[0] = 40;
        assert_eq!(list.as_slice(), &[40, 3, 2, 1]);
        assert_eq!(list.at(9).unwrap_err(), AllocOptError::index_out_of_range(9, 4));
        assert!(list.get(9).is_none());
    }

    #[test]
    fn test_cursor_detects_mutation() {
        let mut list: List<i32> = (0..3).collect();
        let mut cursor = list.cursor();
        assert_eq!(cursor.next(&list).unwrap(), Some(&0));
        list.remove_at(0).unwrap();
        assert!(matches!(
            cursor.next(&list),
            Err(AllocOptError::ConcurrentModification { .. })
        ));
    }

    #[test]
    fn test_collection_trait() {
        let mut list = List::new();
        assert!(Collection::add(&mut list, 7).unwrap());
        assert!(Collection::contains(&list, &7));
        assert!(Collection::remove(&mut list, &7).unwrap());
        assert!(Collection::is_empty(&list));
    }
}
