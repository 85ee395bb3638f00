//! Set: unique values over [`HashTable`] with set algebra
//!
//! The algebra helpers never build a second hash structure for the other
//! sequence. They mark slot indices of `self` in a [`SlotBitmap`] sized to the
//! table's slot count and valid for the one call only.

use super::bitmap::SlotBitmap;
use super::comparer::{DefaultComparer, EqualityComparer, SetComparer};
use super::table::{Entry, HashTable, IntoIter, Iter};
use crate::config::HashTableConfig;
use crate::containers::{Collection, Versioned};
use crate::error::Result;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

/// Unordered set of unique values.
///
/// # Examples
///
/// ```rust
/// use allocopt::Set;
///
/// let mut a: Set<u32> = (1..=4).collect();
/// assert!(!a.add(3)?);
///
/// a.union_with([5, 6])?;
/// a.except_with(&[1, 2]);
/// assert!(a.set_equals(&[3, 4, 5, 6]));
/// assert!(a.is_subset_of(0..10));
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
#[derive(Clone)]
pub struct Set<T, C = DefaultComparer> {
    table: HashTable<T, SetComparer<C>>,
}

impl<T: Hash + Eq> Set<T> {
    /// Create an empty set without allocating.
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer::new())
    }

    /// Create an empty set sized for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut set = Self::new();
        set.ensure_capacity(capacity)?;
        Ok(set)
    }
}

impl<T, C: EqualityComparer<T>> Set<T, C> {
    /// Create an empty set that hashes and compares through `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            table: HashTable::with_comparer(SetComparer::new(comparer)),
        }
    }

    /// Create an empty set tuned by `config`.
    pub fn with_config(comparer: C, config: &HashTableConfig) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_config(SetComparer::new(comparer), config)?,
        })
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Elements that fit before the next rehash.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// The value comparer.
    pub fn comparer(&self) -> &C {
        self.table.comparer().inner()
    }

    /// The underlying table, for occupancy statistics.
    pub fn table(&self) -> &HashTable<T, SetComparer<C>> {
        &self.table
    }

    /// Add `value`; returns false if an equal value was already present.
    pub fn add(&mut self, value: T) -> Result<bool> {
        match self.table.entry(&value) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value)?;
                Ok(true)
            }
        }
    }

    /// Whether `value` is a member.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.table.contains(value)
    }

    /// The stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.table.get(value)
    }

    /// Remove `value`; returns whether it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.table.remove(value).is_some()
    }

    /// Remove and return the stored value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.table.remove(value)
    }

    /// Keep only the values for which `keep` returns true.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, keep: F) -> usize {
        self.table.retain(keep)
    }

    /// Remove every element, keeping the buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Make room for `capacity` elements without rehashing.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        self.table.ensure_capacity(capacity)
    }

    /// Compact the entry array and shrink the buckets to fit.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.table.trim_excess()
    }

    /// Iterate members in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.table.iter()
    }

    // ---- mutating algebra -------------------------------------------------

    /// Add every value of `other`.
    pub fn union_with<I: IntoIterator<Item = T>>(&mut self, other: I) -> Result<()> {
        for value in other {
            self.add(value)?;
        }
        Ok(())
    }

    /// Remove every value of `other`.
    pub fn except_with<I>(&mut self, other: I)
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        for value in other {
            if self.is_empty() {
                return;
            }
            self.table.remove(value.borrow());
        }
    }

    /// Keep only values also present in `other`.
    pub fn intersect_with<I>(&mut self, other: I)
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        if self.is_empty() {
            return;
        }
        let mut keep = SlotBitmap::new(self.table.slot_count());
        for value in other {
            if let Some(index) = self.table.find(value.borrow()) {
                keep.set(index);
            }
        }
        if keep.count_ones() == self.len() {
            return;
        }
        for index in 0..self.table.slot_count() {
            if !keep.get(index) && self.table.slot_value(index).is_some() {
                self.table.remove_slot(index);
            }
        }
    }

    /// Keep values present in exactly one of `self` and `other`.
    ///
    /// Duplicates in `other` count once: a value added by this call is not
    /// removed again by a later duplicate.
    pub fn symmetric_except_with<I: IntoIterator<Item = T>>(&mut self, other: I) -> Result<()> {
        let mut added = SlotBitmap::new(self.table.slot_count());
        let mut doomed = SlotBitmap::new(self.table.slot_count());
        for value in other {
            match self.table.entry(&value) {
                Entry::Occupied(entry) => {
                    if !added.get(entry.index()) {
                        doomed.set(entry.index());
                    }
                }
                Entry::Vacant(slot) => {
                    added.set(slot.insert_slot(value)?);
                }
            }
        }
        if doomed.count_ones() > 0 {
            for index in 0..self.table.slot_count() {
                if doomed.get(index) {
                    self.table.remove_slot(index);
                }
            }
        }
        Ok(())
    }

    // ---- predicates -------------------------------------------------------

    /// Distinct slots of `self` hit by `other`, and how many values of
    /// `other` were absent from `self`.
    fn survey<I>(&self, other: I) -> (usize, usize)
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut found = SlotBitmap::new(self.table.slot_count());
        let mut missing = 0;
        for value in other {
            match self.table.find(value.borrow()) {
                Some(index) => {
                    found.set(index);
                }
                None => missing += 1,
            }
        }
        (found.count_ones(), missing)
    }

    /// Every value of `self` is in `other`.
    pub fn is_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        if self.is_empty() {
            return true;
        }
        let (found, _) = self.survey(other);
        found == self.len()
    }

    /// Subset of `other`, and `other` has a value `self` lacks.
    pub fn is_proper_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let (found, missing) = self.survey(other);
        found == self.len() && missing > 0
    }

    /// Every value of `other` is in `self`.
    pub fn is_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        other.into_iter().all(|value| self.contains(value.borrow()))
    }

    /// Superset of `other`, and `self` has a value `other` lacks.
    pub fn is_proper_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        if self.is_empty() {
            return false;
        }
        let (found, missing) = self.survey(other);
        missing == 0 && found < self.len()
    }

    /// `self` and `other` share at least one value.
    pub fn overlaps<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        !self.is_empty() && other.into_iter().any(|value| self.contains(value.borrow()))
    }

    /// `self` and `other` hold the same distinct values.
    pub fn set_equals<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let (found, missing) = self.survey(other);
        missing == 0 && found == self.len()
    }
}

impl<T, C: EqualityComparer<T> + Default> Default for Set<T, C> {
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<T, C> Versioned for Set<T, C> {
    type Item = T;

    fn version(&self) -> u64 {
        self.table.version()
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        self.table.item_at(position)
    }
}

impl<T, C: EqualityComparer<T>> Collection<T> for Set<T, C> {
    fn len(&self) -> usize {
        self.table.len()
    }

    fn clear(&mut self) {
        self.table.clear();
    }

    fn contains(&self, item: &T) -> bool {
        self.table.contains(item)
    }

    fn add(&mut self, item: T) -> Result<bool> {
        Set::add(self, item)
    }

    fn remove(&mut self, item: &T) -> Result<bool> {
        Ok(Set::remove(self, item))
    }
}

impl<T, C: EqualityComparer<T>> PartialEq for Set<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && other.iter().all(|value| self.contains(value))
    }
}

impl<T, C: EqualityComparer<T>> Eq for Set<T, C> {}

impl<T: fmt::Debug, C: EqualityComparer<T>> fmt::Debug for Set<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: EqualityComparer<T> + Default> FromIterator<T> for Set<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        if let Err(e) = set.union_with(iter) {
            panic!("{}", e);
        }
        set
    }
}

impl<T, C> IntoIterator for Set<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.table.into_iter()
    }
}

impl<'a, T, C: EqualityComparer<T>> IntoIterator for &'a Set<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocOptError;

    fn sorted(set: &Set<i32>) -> Vec<i32> {
        let mut values: Vec<i32> = set.iter().copied().collect();
        values.sort();
        values
    }

    #[test]
    fn test_add_contains_remove() {
        let mut set = Set::new();
        assert!(set.add(1).unwrap());
        assert!(!set.add(1).unwrap());
        assert!(set.contains(&1));
        assert_eq!(set.get(&1), Some(&1));
        assert!(set.remove(&1));
        assert!(!set.remove(&1));
        assert!(set.is_empty());
        assert!(set.add(1).unwrap());
        assert_eq!(set.take(&1), Some(1));
    }

    #[test]
    fn test_union_then_superset() {
        let mut a: Set<i32> = (0..5).collect();
        let b = vec![3, 4, 5, 6, 6];
        a.union_with(b.iter().copied()).unwrap();
        assert!(a.is_superset_of(&b));
        assert_eq!(sorted(&a), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_intersect_keeps_only_shared() {
        let mut a: Set<i32> = (0..10).collect();
        let b = [5, 7, 7, 42];
        a.intersect_with(&b);
        assert_eq!(sorted(&a), vec![5, 7]);
        assert!(a.iter().all(|v| b.contains(v)));

        a.intersect_with(std::iter::empty::<i32>());
        assert!(a.is_empty());
    }

    #[test]
    fn test_except_with() {
        let mut a: Set<i32> = (0..6).collect();
        a.except_with([1, 3, 5, 7]);
        assert_eq!(sorted(&a), vec![0, 2, 4]);
    }

    #[test]
    fn test_symmetric_except_with_duplicates() {
        let mut a: Set<i32> = (0..4).collect();
        a.symmetric_except_with(vec![2, 3, 4, 4, 5, 2]).unwrap();
        assert_eq!(sorted(&a), vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_subset_predicates() {
        let a: Set<i32> = (0..3).collect();
        assert!(a.is_subset_of(0..3));
        assert!(!a.is_proper_subset_of(0..3));
        assert!(a.is_proper_subset_of(0..4));
        assert!(!a.is_subset_of(1..10));

        assert!(a.is_superset_of(0..2));
        assert!(a.is_proper_superset_of(0..2));
        assert!(!a.is_proper_superset_of(0..3));
        assert!(!a.is_superset_of(0..4));

        let empty: Set<i32> = Set::new();
        assert!(empty.is_subset_of(std::iter::empty::<i32>()));
        assert!(empty.is_proper_subset_of([1]));
        assert!(!empty.is_proper_superset_of(std::iter::empty::<i32>()));
    }

    #[test]
    fn test_overlaps_and_equality() {
        let a: Set<i32> = (0..3).collect();
        assert!(a.overlaps([9, 2]));
        assert!(!a.overlaps([9, 10]));
        assert!(a.set_equals([2, 1, 0, 0]));
        assert!(!a.set_equals([0, 1]));
        assert!(!a.set_equals([0, 1, 2, 3]));

        let b: Set<i32> = (0..3).rev().collect();
        assert_eq!(a, b);
        assert!(a.set_equals(&b) && b.set_equals(&a));
        assert!(a.set_equals(&a));
    }

    #[test]
    fn test_algebra_after_churn_uses_slot_indices() {
        let mut a: Set<i32> = (0..20).collect();
        for i in 0..10 {
            a.remove(&i);
        }
        // free slots are on the chain; the bitmap still addresses by slot
        a.intersect_with(15..30);
        assert_eq!(sorted(&a), (15..20).collect::<Vec<_>>());
        a.symmetric_except_with(18..22).unwrap();
        assert_eq!(sorted(&a), vec![15, 16, 17, 20, 21]);
    }

    #[test]
    fn test_collection_and_cursor() {
        let mut set: Set<i32> = Set::new();
        assert!(Collection::add(&mut set, 1).unwrap());
        assert!(Collection::remove(&mut set, &1).unwrap());
        assert!(!Collection::remove(&mut set, &1).unwrap());

        set.union_with(0..3).unwrap();
        let mut cursor = set.cursor();
        cursor.next(&set).unwrap();
        set.add(10).unwrap();
        assert!(matches!(
            cursor.next(&set),
            Err(AllocOptError::ConcurrentModification { .. })
        ));
    }
}
