//! HashTable: chained hash table over a single entry array
//!
//! Entries live in one [`DynamicArray`]; each bucket holds the index of the
//! first entry of its chain and entries link to the next one through a `u32`.
//! Removed entries go onto an intrusive free chain (threaded through the same
//! link field) and are recycled by later inserts. Rehashing only rebuilds the
//! bucket array and relinks; entries never move except in
//! [`trim_excess`](HashTable::trim_excess).
//!
//! The table is generic over an [`EntryComparer`] so the same engine serves
//! whole-value entries ([`Set`](super::Set)) and `(K, V)` entries probed by key
//! ([`Dictionary`](super::Dictionary)).

use super::comparer::{DefaultComparer, EntryComparer, SetComparer};
use crate::config::hash_table::DEFAULT_LOAD_FACTOR;
use crate::config::{BucketSizing, Config, HashTableConfig};
use crate::containers::arena::{MAX_SLOTS, NIL};
use crate::containers::dynamic_array::{self, DynamicArray};
use crate::containers::{GrowthPolicy, Versioned};
use crate::error::{AllocOptError, Result};
use std::fmt;
use std::slice;

/// Prime bucket counts, each roughly double the previous one
const PRIMES: &[usize] = &[
    5, 11, 23, 47, 97, 199, 409, 823, 1741, 3469, 6949, 14033, 28411, 57557, 116731, 236897,
    480881, 976369, 1982627, 4026031, 8175383, 16601593, 33712729, 68460391, 139022417,
    282312799, 573292817, 1164186217, 2147483647, 4294967291,
];

/// Smallest power-of-two bucket array
const MIN_POW2_BUCKETS: usize = 4;

/// Smallest listed prime `>= n`, falling back to the next power of two past
/// the table.
fn next_prime(n: usize) -> Option<usize> {
    match PRIMES.iter().find(|&&p| p >= n) {
        Some(&p) => Some(p),
        None => n.checked_next_power_of_two(),
    }
}

#[inline]
fn reduce(hash: u64, buckets: usize, sizing: BucketSizing) -> usize {
    match sizing {
        BucketSizing::Prime => (hash % buckets as u64) as usize,
        BucketSizing::PowerOfTwo => hash as usize & (buckets - 1),
    }
}

#[derive(Clone)]
struct Slot<T> {
    hash: u64,
    /// Chain successor while occupied, next free slot while free.
    next: u32,
    value: Option<T>,
}

impl<T> Slot<T> {
    #[inline]
    fn live(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unreachable!("live entry points at a free slot"),
        }
    }

    #[inline]
    fn live_mut(&mut self) -> &mut T {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!("live entry points at a free slot"),
        }
    }
}

/// Chained hash table with free-slot recycling.
///
/// # Examples
///
/// ```rust
/// use allocopt::hash_map::{Entry, HashTable};
///
/// let mut table: HashTable<u64> = HashTable::new();
/// match table.entry(&7) {
///     Entry::Vacant(slot) => {
///         slot.insert(7)?;
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
/// assert!(table.contains(&7));
/// assert_eq!(table.remove(&7), Some(7));
/// assert_eq!(table.free_count(), 1);
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
#[derive(Clone)]
pub struct HashTable<T, E = SetComparer<DefaultComparer>> {
    buckets: Vec<u32>,
    slots: DynamicArray<Slot<T>>,
    free: u32,
    free_count: usize,
    len: usize,
    /// Entry count that triggers the next rehash.
    threshold: usize,
    version: u64,
    load_factor: f64,
    sizing: BucketSizing,
    reuse_free_slots: bool,
    comparer: E,
}

impl<T, E: EntryComparer<T> + Default> HashTable<T, E> {
    /// Create an empty table without allocating.
    pub fn new() -> Self {
        Self::with_comparer(E::default())
    }
}

impl<T, E: EntryComparer<T>> HashTable<T, E> {
    /// Create an empty table using `comparer`, with default tuning.
    pub fn with_comparer(comparer: E) -> Self {
        Self {
            buckets: Vec::new(),
            slots: DynamicArray::with_growth(GrowthPolicy::new().clamped(MAX_SLOTS)),
            free: NIL,
            free_count: 0,
            len: 0,
            threshold: 0,
            version: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
            sizing: BucketSizing::Prime,
            reuse_free_slots: true,
            comparer,
        }
    }

    /// Create a table tuned by `config`, pre-sized to its initial capacity.
    pub fn with_config(comparer: E, config: &HashTableConfig) -> Result<Self> {
        config.validate()?;
        let growth = GrowthPolicy::from_config(&config.growth)?.clamped(MAX_SLOTS);
        let mut table = Self {
            slots: DynamicArray::with_growth(growth),
            load_factor: config.load_factor,
            sizing: config.bucket_sizing,
            reuse_free_slots: config.reuse_free_slots,
            ..Self::with_comparer(comparer)
        };
        table.ensure_capacity(config.initial_capacity)?;
        log::debug!(
            "hash table configured: {} buckets, load factor {}, {} sizing",
            table.bucket_count(),
            table.load_factor,
            table.sizing
        );
        Ok(table)
    }

    /// Live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries the slot array holds before it reallocates.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Length of the bucket array.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Slots on the free chain.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free_count
    }

    /// Slots handed out so far, live or free.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Current `len / bucket_count`.
    pub fn load_factor(&self) -> f64 {
        if self.buckets.is_empty() {
            0.0
        } else {
            self.len as f64 / self.buckets.len() as f64
        }
    }

    /// Load factor past which the bucket array is grown.
    #[inline]
    pub fn max_load_factor(&self) -> f64 {
        self.load_factor
    }

    /// The entry comparer.
    #[inline]
    pub fn comparer(&self) -> &E {
        &self.comparer
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        reduce(hash, self.buckets.len(), self.sizing)
    }

    fn find_hashed(&self, hash: u64, key: &E::Key) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let mut link = self.buckets[self.bucket_of(hash)];
        while link != NIL {
            let slot = &self.slots[link as usize];
            if slot.hash == hash
                && matches!(&slot.value, Some(v) if self.comparer.equals_by_key(v, key))
            {
                return Some(link as usize);
            }
            link = slot.next;
        }
        None
    }

    /// Slot index holding `key`.
    pub(crate) fn find(&self, key: &E::Key) -> Option<usize> {
        self.find_hashed(self.comparer.hash_key(key), key)
    }

    /// Live entry at slot `index`.
    pub(crate) fn slot_value(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|slot| slot.value.as_ref())
    }

    /// Entry stored under `key`.
    pub fn get(&self, key: &E::Key) -> Option<&T> {
        self.find(key).map(|index| self.slots[index].live())
    }

    /// Mutable entry stored under `key`. The entry's key must not change.
    pub fn get_mut(&mut self, key: &E::Key) -> Option<&mut T> {
        let index = self.find(key)?;
        Some(self.slots[index].live_mut())
    }

    /// Whether an entry with `key` exists.
    #[inline]
    pub fn contains(&self, key: &E::Key) -> bool {
        self.find(key).is_some()
    }

    /// Look up `key`, yielding either the live entry or a slot to fill.
    pub fn entry(&mut self, key: &E::Key) -> Entry<'_, T, E> {
        let hash = self.comparer.hash_key(key);
        match self.find_hashed(hash, key) {
            Some(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Store `value`, replacing and returning an entry with the same key.
    pub fn insert(&mut self, value: T) -> Result<Option<T>> {
        let hash = self.comparer.hash_entry(&value);
        match self.find_hashed(hash, self.comparer.key_of(&value)) {
            Some(index) => Ok(self.slots[index].value.replace(value)),
            None => {
                self.insert_hashed(hash, value)?;
                Ok(None)
            }
        }
    }

    fn insert_hashed(&mut self, hash: u64, value: T) -> Result<usize> {
        let required = self.len + 1;
        if required > self.threshold {
            let target = required.max(self.threshold.saturating_mul(2));
            let count = self.bucket_count_for(target)?;
            self.rehash(count, required);
        }

        let index = self.alloc(hash, value)?;
        let bucket = self.bucket_of(hash);
        self.slots[index].next = self.buckets[bucket];
        self.buckets[bucket] = index as u32;
        self.len += 1;
        self.bump();
        Ok(index)
    }

    fn alloc(&mut self, hash: u64, value: T) -> Result<usize> {
        if self.reuse_free_slots && self.free != NIL {
            let index = self.free as usize;
            let slot = &mut self.slots[index];
            self.free = slot.next;
            slot.hash = hash;
            slot.value = Some(value);
            self.free_count -= 1;
            return Ok(index);
        }

        let index = self.slots.len();
        if index >= MAX_SLOTS {
            return Err(AllocOptError::capacity_overflow(index + 1, MAX_SLOTS));
        }
        self.slots.push(Slot {
            hash,
            next: NIL,
            value: Some(value),
        })?;
        Ok(index)
    }

    /// Remove and return the entry stored under `key`.
    pub fn remove(&mut self, key: &E::Key) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let hash = self.comparer.hash_key(key);
        let bucket = self.bucket_of(hash);
        let mut prev = NIL;
        let mut link = self.buckets[bucket];
        while link != NIL {
            let slot = &self.slots[link as usize];
            let next = slot.next;
            if slot.hash == hash
                && matches!(&slot.value, Some(v) if self.comparer.equals_by_key(v, key))
            {
                self.unlink(bucket, prev, next);
                return self.release(link as usize);
            }
            prev = link;
            link = next;
        }
        None
    }

    /// Remove the live entry at slot `index`.
    pub(crate) fn remove_slot(&mut self, index: usize) -> Option<T> {
        let (bucket, next) = match self.slots.get(index) {
            Some(slot) if slot.value.is_some() => (self.bucket_of(slot.hash), slot.next),
            _ => return None,
        };
        let mut prev = NIL;
        let mut link = self.buckets[bucket];
        while link != NIL && link as usize != index {
            prev = link;
            link = self.slots[link as usize].next;
        }
        if link == NIL {
            return None;
        }
        self.unlink(bucket, prev, next);
        self.release(index)
    }

    #[inline]
    fn unlink(&mut self, bucket: usize, prev: u32, next: u32) {
        if prev == NIL {
            self.buckets[bucket] = next;
        } else {
            self.slots[prev as usize].next = next;
        }
    }

    fn release(&mut self, index: usize) -> Option<T> {
        let free = self.free;
        let slot = &mut self.slots[index];
        let value = slot.value.take();
        slot.next = free;
        self.free = index as u32;
        self.free_count += 1;
        self.len -= 1;
        self.bump();
        value
    }

    /// Keep only entries for which `keep` returns true. Returns how many
    /// were removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        for index in 0..self.slots.len() {
            let doomed = matches!(&self.slots[index].value, Some(v) if !keep(v));
            if doomed && self.remove_slot(index).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Drop every entry. The bucket array keeps its size.
    pub fn clear(&mut self) {
        if self.slots.is_empty() {
            return;
        }
        self.slots.clear();
        self.buckets.fill(NIL);
        self.free = NIL;
        self.free_count = 0;
        self.len = 0;
        self.bump();
    }

    /// Size buckets and slots so `capacity` entries fit without rehashing.
    /// Returns the resulting slot capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        if capacity > MAX_SLOTS {
            return Err(AllocOptError::capacity_overflow(capacity, MAX_SLOTS));
        }
        if capacity > self.threshold {
            let count = self.bucket_count_for(capacity)?;
            self.rehash(count, capacity);
        }
        self.slots.ensure_capacity(capacity)
    }

    /// Compact live entries to the front of the slot array, release the
    /// unused tail and resize the buckets to fit the current length.
    pub fn trim_excess(&mut self) -> Result<()> {
        if self.free_count > 0 {
            self.slots.remove_all(|slot| slot.value.is_none());
            self.free = NIL;
            self.free_count = 0;
            self.bump();
        }
        self.slots.trim_excess()?;

        let count = if self.len == 0 {
            0
        } else {
            self.bucket_count_for(self.len)?
        };
        self.rehash(count, self.len);
        Ok(())
    }

    fn bucket_count_for(&self, entries: usize) -> Result<usize> {
        let raw = ((entries as f64 / self.load_factor).ceil() as usize).max(entries);
        let count = match self.sizing {
            BucketSizing::Prime => next_prime(raw),
            BucketSizing::PowerOfTwo => raw.max(MIN_POW2_BUCKETS).checked_next_power_of_two(),
        };
        count.ok_or_else(|| AllocOptError::capacity_overflow(raw, usize::MAX))
    }

    /// Replace the bucket array with `count` empty buckets and relink every
    /// live entry.
    fn rehash(&mut self, count: usize, required: usize) {
        let old = self.buckets.len();
        self.buckets = vec![NIL; count];
        self.threshold = if count == 0 {
            0
        } else {
            ((count as f64 * self.load_factor) as usize).max(required)
        };

        let buckets = &mut self.buckets;
        let sizing = self.sizing;
        if count > 0 {
            for (index, slot) in self.slots.iter_mut().enumerate() {
                if slot.value.is_some() {
                    let bucket = reduce(slot.hash, count, sizing);
                    slot.next = buckets[bucket];
                    buckets[bucket] = index as u32;
                }
            }
        }

        log::trace!(
            "hash table rehash: {} -> {} buckets, {} entries, threshold {}",
            old,
            count,
            self.len,
            self.threshold
        );
    }

    /// Iterate live entries in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Mutable iteration in slot order. Keys must not change.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            remaining: self.len,
            slots: self.slots.iter_mut(),
        }
    }
}

impl<T, E: EntryComparer<T> + Default> Default for HashTable<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, E: EntryComparer<T>> fmt::Debug for HashTable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, E> Versioned for HashTable<T, E> {
    type Item = T;

    fn version(&self) -> u64 {
        self.version
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        let rest = self.slots.get(position..)?;
        let offset = rest.iter().position(|slot| slot.value.is_some())?;
        let value = rest[offset].value.as_ref()?;
        Some((value, position + offset + 1))
    }
}

/// Result of [`HashTable::entry`].
pub enum Entry<'a, T, E> {
    /// The key is present.
    Occupied(OccupiedEntry<'a, T, E>),
    /// The key is absent.
    Vacant(VacantEntry<'a, T, E>),
}

/// A live entry found by [`HashTable::entry`].
pub struct OccupiedEntry<'a, T, E> {
    table: &'a mut HashTable<T, E>,
    index: usize,
}

impl<'a, T, E: EntryComparer<T>> OccupiedEntry<'a, T, E> {
    /// Slot index of the entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The stored entry.
    pub fn get(&self) -> &T {
        self.table.slots[self.index].live()
    }

    /// Mutable access. The key must not change.
    pub fn get_mut(&mut self) -> &mut T {
        self.table.slots[self.index].live_mut()
    }

    /// Mutable access to the entry for the table's lifetime.
    pub fn into_mut(self) -> &'a mut T {
        let index = self.index;
        let table = self.table;
        table.slots[index].live_mut()
    }

    /// Remove the entry from the table.
    pub fn remove(self) -> T {
        match self.table.remove_slot(self.index) {
            Some(value) => value,
            None => unreachable!("occupied entry vanished"),
        }
    }
}

/// A missing key located by [`HashTable::entry`].
pub struct VacantEntry<'a, T, E> {
    table: &'a mut HashTable<T, E>,
    hash: u64,
}

impl<'a, T, E: EntryComparer<T>> VacantEntry<'a, T, E> {
    /// Store `value`, whose key must be the one that was looked up.
    pub fn insert(self, value: T) -> Result<&'a mut T> {
        debug_assert_eq!(self.table.comparer.hash_entry(&value), self.hash);
        let table = self.table;
        let index = table.insert_hashed(self.hash, value)?;
        Ok(table.slots[index].live_mut())
    }

    /// Store `value` and return the slot index it landed in.
    pub(crate) fn insert_slot(self, value: T) -> Result<usize> {
        self.table.insert_hashed(self.hash, value)
    }
}

/// Borrowing iterator over live entries.
pub struct Iter<'a, T> {
    slots: slice::Iter<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while self.remaining > 0 {
            if let Some(value) = self.slots.next()?.value.as_ref() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Mutable iterator over live entries.
pub struct IterMut<'a, T> {
    slots: slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        while self.remaining > 0 {
            if let Some(value) = self.slots.next()?.value.as_mut() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// Owning iterator over live entries.
pub struct IntoIter<T> {
    slots: dynamic_array::IntoIter<Slot<T>>,
    remaining: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.remaining > 0 {
            if let Some(value) = self.slots.next()?.value {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T, E> IntoIterator for HashTable<T, E> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            remaining: self.len,
            slots: self.slots.into_iter(),
        }
    }
}

impl<'a, T, E: EntryComparer<T>> IntoIterator for &'a HashTable<T, E> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
