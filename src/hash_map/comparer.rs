//! Equality comparers for the hash table engine
//!
//! [`EqualityComparer`] is the user-facing seam: hashing plus equality for one
//! type. [`EntryComparer`] adapts it to the table's stored entry type and adds
//! the by-key probe mode, so a `(K, V)` entry can be looked up with a `&K`
//! alone. [`SetComparer`] stores whole values, [`PairComparer`] stores pairs
//! keyed by their first component.

use std::fmt;
use std::hash::{BuildHasher, Hash};

/// Hashing and equality for `T`.
///
/// Implementations must keep `equals(a, b) => hash(a) == hash(b)`.
pub trait EqualityComparer<T: ?Sized> {
    /// Whether `a` and `b` are the same key.
    fn equals(&self, a: &T, b: &T) -> bool;

    /// Hash of `value`.
    fn hash(&self, value: &T) -> u64;
}

/// `Hash + Eq` comparer backed by a [`BuildHasher`], `ahash` by default.
#[derive(Clone, Default)]
pub struct DefaultComparer<S = ahash::RandomState> {
    hasher: S,
}

impl<S> DefaultComparer<S> {
    /// Comparer hashing through `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }

    /// The underlying hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }
}

impl DefaultComparer {
    /// Comparer with a freshly seeded `ahash` state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> fmt::Debug for DefaultComparer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultComparer").finish_non_exhaustive()
    }
}

impl<T, S> EqualityComparer<T> for DefaultComparer<S>
where
    T: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        self.hasher.hash_one(value)
    }
}

/// Dual-mode comparer between stored entries of type `T` and probe keys.
///
/// Full mode compares two entries, by-key mode compares an entry with a key
/// projected out of some other entry or supplied by the caller.
pub trait EntryComparer<T> {
    /// Probe key type.
    type Key: ?Sized;

    /// Project the key of a stored entry.
    fn key_of<'a>(&self, entry: &'a T) -> &'a Self::Key;

    /// Hash of a probe key.
    fn hash_key(&self, key: &Self::Key) -> u64;

    /// Whether `entry` is stored under `key`.
    fn equals_by_key(&self, entry: &T, key: &Self::Key) -> bool;

    /// Whether two entries share a key.
    fn equals_full(&self, a: &T, b: &T) -> bool {
        self.equals_by_key(a, self.key_of(b))
    }

    /// Hash of a stored entry, consistent with [`hash_key`](Self::hash_key).
    fn hash_entry(&self, entry: &T) -> u64 {
        self.hash_key(self.key_of(entry))
    }
}

/// Entries are their own keys.
#[derive(Debug, Clone, Default)]
pub struct SetComparer<C> {
    inner: C,
}

impl<C> SetComparer<C> {
    /// Wrap a value comparer.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped value comparer.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<T, C: EqualityComparer<T>> EntryComparer<T> for SetComparer<C> {
    type Key = T;

    #[inline]
    fn key_of<'a>(&self, entry: &'a T) -> &'a T {
        entry
    }

    #[inline]
    fn hash_key(&self, key: &T) -> u64 {
        self.inner.hash(key)
    }

    #[inline]
    fn equals_by_key(&self, entry: &T, key: &T) -> bool {
        self.inner.equals(entry, key)
    }
}

/// `(K, V)` entries keyed by `K`.
#[derive(Debug, Clone, Default)]
pub struct PairComparer<C> {
    inner: C,
}

impl<C> PairComparer<C> {
    /// Wrap a key comparer.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped key comparer.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<K, V, C: EqualityComparer<K>> EntryComparer<(K, V)> for PairComparer<C> {
    type Key = K;

    #[inline]
    fn key_of<'a>(&self, entry: &'a (K, V)) -> &'a K {
        &entry.0
    }

    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.inner.hash(key)
    }

    #[inline]
    fn equals_by_key(&self, entry: &(K, V), key: &K) -> bool {
        self.inner.equals(&entry.0, key)
    }
}
