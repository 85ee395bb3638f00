//! Dictionary: key/value map over [`HashTable`]
//!
//! Entries are stored as `(K, V)` pairs and probed by key alone through
//! [`PairComparer`].

use super::comparer::{DefaultComparer, EqualityComparer, PairComparer};
use super::table::{self, Entry, HashTable};
use crate::config::HashTableConfig;
use crate::containers::Versioned;
use crate::error::{AllocOptError, Result};
use std::fmt;
use std::hash::Hash;
use std::ops::Index;

/// Unordered map from unique keys to values.
///
/// `add` rejects a present key with `DuplicateKey`; `try_add` reports it as
/// `false`; `insert` overwrites.
///
/// # Examples
///
/// ```rust
/// use allocopt::{AllocOptError, Dictionary};
///
/// let mut ages = Dictionary::new();
/// ages.add("ada", 36)?;
/// assert_eq!(ages.add("ada", 37), Err(AllocOptError::DuplicateKey));
/// assert!(!ages.try_add("ada", 37)?);
/// assert_eq!(ages.insert("ada", 37)?, Some(36));
///
/// *ages.get_or_add_with("alan", || 41)? += 1;
/// assert_eq!(ages[&"alan"], 42);
/// assert_eq!(ages.get_or_err(&"grace"), Err(AllocOptError::KeyNotFound));
/// # Ok::<(), AllocOptError>(())
/// ```
#[derive(Clone)]
pub struct Dictionary<K, V, C = DefaultComparer> {
    table: HashTable<(K, V), PairComparer<C>>,
}

impl<K: Hash + Eq, V> Dictionary<K, V> {
    /// Create an empty dictionary without allocating.
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer::new())
    }

    /// Create an empty dictionary sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut dict = Self::new();
        dict.ensure_capacity(capacity)?;
        Ok(dict)
    }
}

impl<K, V, C: EqualityComparer<K>> Dictionary<K, V, C> {
    /// Create an empty dictionary comparing keys through `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            table: HashTable::with_comparer(PairComparer::new(comparer)),
        }
    }

    /// Create an empty dictionary tuned by `config`.
    pub fn with_config(comparer: C, config: &HashTableConfig) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_config(PairComparer::new(comparer), config)?,
        })
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the dictionary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries that fit before the next rehash.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// The key comparer.
    pub fn comparer(&self) -> &C {
        self.table.comparer().inner()
    }

    /// The underlying table, for occupancy statistics.
    pub fn table(&self) -> &HashTable<(K, V), PairComparer<C>> {
        &self.table
    }

    /// Add a new entry.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` when `key` is already present; the dictionary is left
    /// unchanged.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.try_add(key, value)? {
            Ok(())
        } else {
            Err(AllocOptError::DuplicateKey)
        }
    }

    /// Add a new entry unless `key` is present; returns whether it was added.
    pub fn try_add(&mut self, key: K, value: V) -> Result<bool> {
        match self.table.entry(&key) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert((key, value))?;
                Ok(true)
            }
        }
    }

    /// Set the value for `key`, returning the one it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.table.entry(&key) {
            Entry::Occupied(mut entry) => Ok(Some(std::mem::replace(&mut entry.get_mut().1, value))),
            Entry::Vacant(slot) => {
                slot.insert((key, value))?;
                Ok(None)
            }
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key).map(|(_, v)| v)
    }

    /// Value stored under `key`, `KeyNotFound` if absent.
    pub fn get_or_err(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(AllocOptError::KeyNotFound)
    }

    /// Mutable value for `key`. Not a structural change.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key).map(|(_, v)| v)
    }

    /// Stored key and value for `key`.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.table.get(key).map(|(k, v)| (k, v))
    }

    /// Value under `key`, inserting `make()` first if absent.
    pub fn get_or_add_with<F>(&mut self, key: K, make: F) -> Result<&mut V>
    where
        F: FnOnce() -> V,
    {
        let entry = match self.table.entry(&key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(slot) => slot.insert((key, make()))?,
        };
        Ok(&mut entry.1)
    }

    /// Whether `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Linear scan for a value.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.remove(key).map(|(_, v)| v)
    }

    /// Remove `key`, returning the stored key and value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.table.remove(key)
    }

    /// Keep only entries for which `keep` returns true.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.table.retain(|(k, v)| keep(k, v))
    }

    /// Remove every entry, keeping the buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Make room for `capacity` entries without rehashing.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        self.table.ensure_capacity(capacity)
    }

    /// Compact the entry array and shrink the buckets to fit.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.table.trim_excess()
    }

    /// Iterate `(key, value)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Iterate pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Keys in slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Values in slot order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Mutable values in slot order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }
}

impl<K, V, C: EqualityComparer<K> + Default> Default for Dictionary<K, V, C> {
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<K, V, C> Versioned for Dictionary<K, V, C> {
    type Item = (K, V);

    fn version(&self) -> u64 {
        self.table.version()
    }

    fn item_at(&self, position: usize) -> Option<(&(K, V), usize)> {
        self.table.item_at(position)
    }
}

impl<K, V, C: EqualityComparer<K>> Index<&K> for Dictionary<K, V, C> {
    type Output = V;

    /// # Panics
    ///
    /// When `key` is absent.
    fn index(&self, key: &K) -> &V {
        match self.get_or_err(key) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<K, V: PartialEq, C: EqualityComparer<K>> PartialEq for Dictionary<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| v == ov))
    }
}

impl<K, V: Eq, C: EqualityComparer<K>> Eq for Dictionary<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C: EqualityComparer<K>> fmt::Debug for Dictionary<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Later pairs overwrite earlier ones with the same key.
impl<K, V, C: EqualityComparer<K> + Default> FromIterator<(K, V)> for Dictionary<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::default();
        for (key, value) in iter {
            if let Err(e) = dict.insert(key, value) {
                panic!("{}", e);
            }
        }
        dict
    }
}

impl<K, V, C> IntoIterator for Dictionary<K, V, C> {
    type Item = (K, V);
    type IntoIter = table::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<'a, K, V, C: EqualityComparer<K>> IntoIterator for &'a Dictionary<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    inner: table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    inner: table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (&*k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over keys.
pub struct Keys<'a, K, V> {
    inner: table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over values.
pub struct Values<'a, K, V> {
    inner: table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Iterator over mutable values.
pub struct ValuesMut<'a, K, V> {
    inner: table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove_scenario() {
        let mut dict = Dictionary::new();
        dict.add("a", 1).unwrap();
        dict.add("b", 2).unwrap();
        assert_eq!(dict.remove(&"a"), Some(1));
        assert_eq!(dict.get(&"a"), None);
        assert_eq!(dict.get(&"b"), Some(&2));
        assert!(!dict.contains_key(&"a"));
        dict.add("a", 3).unwrap();
        assert_eq!(dict.get(&"a"), Some(&3));
    }

    #[test]
    fn test_duplicate_key_leaves_value() {
        let mut dict = Dictionary::new();
        dict.add(1, "one").unwrap();
        let err = dict.add(1, "uno").unwrap_err();
        assert_eq!(err, AllocOptError::DuplicateKey);
        assert_eq!(err.category(), "duplicate_key");
        assert_eq!(dict[&1], "one");
        assert!(!dict.try_add(1, "uno").unwrap());
        assert!(dict.try_add(2, "two").unwrap());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.insert("k", 1).unwrap(), None);
        assert_eq!(dict.insert("k", 2).unwrap(), Some(1));
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get_key_value(&"k"), Some((&"k", &2)));
    }

    #[test]
    fn test_missing_key_errors() {
        let dict: Dictionary<u32, u32> = Dictionary::new();
        assert_eq!(dict.get_or_err(&7), Err(AllocOptError::KeyNotFound));
    }

    #[test]
    #[should_panic(expected = "not present")]
    fn test_index_panics_on_missing_key() {
        let dict: Dictionary<u32, u32> = Dictionary::new();
        let _ = dict[&7];
    }

    #[test]
    fn test_get_or_add_with() {
        let mut counts: Dictionary<char, usize> = Dictionary::new();
        for c in "abracadabra".chars() {
            *counts.get_or_add_with(c, || 0).unwrap() += 1;
        }
        assert_eq!(counts[&'a'], 5);
        assert_eq!(counts[&'b'], 2);
        assert_eq!(counts[&'c'], 1);
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn test_views() {
        let mut dict: Dictionary<u32, u32> = (0..10).map(|i| (i, i * 10)).collect();
        let mut keys: Vec<u32> = dict.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        for v in dict.values_mut() {
            *v += 1;
        }
        assert!(dict.contains_value(&91));
        assert!(!dict.contains_value(&90));

        for (k, v) in dict.iter_mut() {
            *v = *k;
        }
        assert!(dict.iter().all(|(k, v)| k == v));
        assert_eq!(dict.values().sum::<u32>(), 45);
    }

    #[test]
    fn test_remove_entry_and_retain() {
        let mut dict: Dictionary<u32, String> = (0..6).map(|i| (i, i.to_string())).collect();
        assert_eq!(dict.remove_entry(&3), Some((3, "3".to_string())));
        assert_eq!(dict.retain(|k, _| k % 2 == 0), 2);
        let mut left: Vec<u32> = dict.keys().copied().collect();
        left.sort();
        assert_eq!(left, vec![0, 2, 4]);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Dictionary<u32, u32> = (0..5).map(|i| (i, i)).collect();
        let b: Dictionary<u32, u32> = (0..5).rev().map(|i| (i, i)).collect();
        let c: Dictionary<u32, u32> = (0..5).map(|i| (i, i + 1)).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_cursor_fail_fast() {
        let mut dict: Dictionary<u32, u32> = (0..3).map(|i| (i, i)).collect();
        let mut cursor = dict.cursor();
        assert!(cursor.next(&dict).unwrap().is_some());

        // overwriting a value is not structural
        dict.insert(0, 100).unwrap();
        assert!(cursor.next(&dict).is_ok());

        dict.remove(&1);
        assert!(matches!(
            cursor.next(&dict),
            Err(AllocOptError::ConcurrentModification { .. })
        ));
    }
}
