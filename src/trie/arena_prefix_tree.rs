//! ArenaPrefixTree: sequence map over an index arena
//!
//! Same contract as [`PrefixTree`](super::PrefixTree), but every node is a
//! slot in one [`DynamicArray`] linked by `u32` indices:
//!
//! - slot 0 is the root and is never freed
//! - children form a singly linked sibling chain, new children are prepended
//! - a free slot reuses its `parent` link as the free-chain pointer
//! - the end-of-sequence marker lives in the slot's version word next to the
//!   occupied bit, so marking or unmarking a node never invalidates handles
//!
//! [`TrieNode`] handles are generation checked like
//! [`ListNode`](crate::ListNode): once a node is pruned its handle fails with
//! `NodeInvalidated`, even after the slot is reused.

use crate::containers::arena::{next_arena_id, Handle, SlotVersion, MAX_SLOTS, NIL};
use crate::containers::DynamicArray;
use crate::error::{AllocOptError, Result};
use crate::hash_map::{DefaultComparer, EqualityComparer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

const ROOT: u32 = 0;

/// Weak handle to a node of an [`ArenaPrefixTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrieNode(Handle);

impl TrieNode {
    /// Slot index the node occupies in the backing array.
    pub fn index(&self) -> usize {
        self.0.index as usize
    }
}

#[derive(Clone)]
struct Slot<K, V> {
    key: Option<K>,
    value: Option<V>,
    /// Parent while occupied, next free slot while free.
    parent: u32,
    first_child: u32,
    next_sibling: u32,
    version: SlotVersion,
}

impl<K, V> Slot<K, V> {
    fn root() -> Self {
        Self {
            key: None,
            value: None,
            parent: NIL,
            first_child: NIL,
            next_sibling: NIL,
            version: SlotVersion::FREE.occupy(),
        }
    }
}

/// Map from sequences of `K` to `V` stored in a slot arena.
///
/// # Examples
///
/// ```rust
/// use allocopt::ArenaPrefixTree;
///
/// let mut tree = ArenaPrefixTree::new();
/// tree.try_add("tea".chars(), 1)?;
/// tree.try_add("ten".chars(), 2)?;
///
/// let te = tree.find("te".chars()).unwrap();
/// assert!(!tree.is_end(te)?);
/// assert_eq!(tree.children(te)?.count(), 2);
///
/// let ten = tree.find("ten".chars()).unwrap();
/// assert!(tree.remove("ten".chars()));
/// assert!(tree.value(ten).is_err());
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
pub struct ArenaPrefixTree<K, V, C = DefaultComparer> {
    slots: DynamicArray<Slot<K, V>>,
    free: u32,
    len: usize,
    nodes: usize,
    arena: u64,
    comparer: C,
}

impl<K: Hash + Eq, V> ArenaPrefixTree<K, V> {
    /// Create an empty tree holding only the root.
    ///
    /// # Panics
    ///
    /// Panics if the root slot cannot be allocated.
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer::new())
    }

    /// Create an empty tree with room for `capacity` nodes besides the root.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut tree = Self::new();
        let slots = capacity
            .checked_add(1)
            .ok_or_else(|| AllocOptError::capacity_overflow(capacity, MAX_SLOTS))?;
        tree.ensure_capacity(slots)?;
        Ok(tree)
    }
}

impl<K, V, C: EqualityComparer<K>> ArenaPrefixTree<K, V, C> {
    /// Create an empty tree comparing elements through `comparer`.
    ///
    /// # Panics
    ///
    /// Panics if the root slot cannot be allocated.
    pub fn with_comparer(comparer: C) -> Self {
        let mut slots = DynamicArray::new();
        if let Err(e) = slots.push(Slot::root()) {
            panic!("{}", e);
        }
        Self {
            slots,
            free: NIL,
            len: 0,
            nodes: 0,
            arena: next_arena_id(),
            comparer,
        }
    }

    /// Stored sequences.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no sequence is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live nodes below the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Slots in use or on the free chain, root included.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Allocated slots, the root included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// The element comparer.
    #[inline]
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    #[inline]
    fn slot(&self, index: u32) -> &Slot<K, V> {
        &self.slots[index as usize]
    }

    #[inline]
    fn slot_mut(&mut self, index: u32) -> &mut Slot<K, V> {
        &mut self.slots[index as usize]
    }

    #[inline]
    fn handle(&self, index: u32) -> TrieNode {
        TrieNode(Handle::new(self.arena, index, self.slot(index).version))
    }

    fn resolve(&self, node: TrieNode) -> Result<u32> {
        let current = self.slots.get(node.index()).map(|slot| slot.version);
        node.0.resolve(self.arena, current).map(|index| index as u32)
    }

    // ---- handle navigation --------------------------------------------------

    /// Handle to the root node.
    pub fn root(&self) -> TrieNode {
        self.handle(ROOT)
    }

    /// Whether `node` still refers to a live node of this tree.
    pub fn is_valid(&self, node: TrieNode) -> bool {
        self.resolve(node).is_ok()
    }

    /// Element leading to `node`, `None` for the root.
    pub fn key(&self, node: TrieNode) -> Result<Option<&K>> {
        let index = self.resolve(node)?;
        Ok(self.slot(index).key.as_ref())
    }

    /// Value of the sequence ending at `node`.
    pub fn value(&self, node: TrieNode) -> Result<Option<&V>> {
        let index = self.resolve(node)?;
        Ok(self.slot(index).value.as_ref())
    }

    /// Mutable value stored at `node`, `None` unless it ends a sequence.
    pub fn value_mut(&mut self, node: TrieNode) -> Result<Option<&mut V>> {
        let index = self.resolve(node)?;
        Ok(self.slot_mut(index).value.as_mut())
    }

    /// Whether a stored sequence ends at `node`.
    pub fn is_end(&self, node: TrieNode) -> Result<bool> {
        let index = self.resolve(node)?;
        Ok(self.slot(index).version.is_end())
    }

    /// Parent of `node`, `None` for the root.
    pub fn parent(&self, node: TrieNode) -> Result<Option<TrieNode>> {
        let index = self.resolve(node)?;
        let parent = self.slot(index).parent;
        Ok((parent != NIL).then(|| self.handle(parent)))
    }

    /// Children of `node`, most recently added first.
    pub fn children(&self, node: TrieNode) -> Result<Children<'_, K, V, C>> {
        let index = self.resolve(node)?;
        Ok(Children {
            tree: self,
            next: self.slot(index).first_child,
        })
    }

    /// Child of `node` reached by `key`.
    pub fn child(&self, node: TrieNode, key: &K) -> Result<Option<TrieNode>> {
        let index = self.resolve(node)?;
        Ok(self.child_of(index, key).map(|child| self.handle(child)))
    }

    fn child_of(&self, parent: u32, key: &K) -> Option<u32> {
        let mut child = self.slot(parent).first_child;
        while child != NIL {
            let slot = self.slot(child);
            if matches!(&slot.key, Some(k) if self.comparer.equals(k, key)) {
                return Some(child);
            }
            child = slot.next_sibling;
        }
        None
    }

    fn locate<I>(&self, seq: I) -> Option<u32>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let mut node = ROOT;
        for key in seq {
            node = self.child_of(node, key.borrow())?;
        }
        Some(node)
    }

    /// Node reached by `seq`, whether or not a sequence ends there.
    pub fn find<I>(&self, seq: I) -> Option<TrieNode>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.locate(seq).map(|index| self.handle(index))
    }

    // ---- slot management --------------------------------------------------

    fn alloc(&mut self, key: K, parent: u32, next_sibling: u32) -> Result<u32> {
        if self.free != NIL {
            let index = self.free;
            let slot = self.slot_mut(index);
            let next_free = slot.parent;
            slot.key = Some(key);
            slot.parent = parent;
            slot.first_child = NIL;
            slot.next_sibling = next_sibling;
            slot.version = slot.version.occupy();
            self.free = next_free;
            return Ok(index);
        }

        let index = self.slots.len();
        if index >= MAX_SLOTS {
            return Err(AllocOptError::capacity_overflow(index + 1, MAX_SLOTS));
        }
        self.slots.push(Slot {
            key: Some(key),
            value: None,
            parent,
            first_child: NIL,
            next_sibling,
            version: SlotVersion::FREE.occupy(),
        })?;
        Ok(index as u32)
    }

    fn release(&mut self, index: u32) {
        let free = self.free;
        let slot = self.slot_mut(index);
        slot.version = slot.version.release();
        slot.key = None;
        slot.value = None;
        slot.first_child = NIL;
        slot.next_sibling = NIL;
        slot.parent = free;
        self.free = index;
        self.nodes -= 1;
    }

    fn add_child(&mut self, parent: u32, key: K) -> Result<u32> {
        let sibling = self.slot(parent).first_child;
        let index = self.alloc(key, parent, sibling)?;
        self.slot_mut(parent).first_child = index;
        self.nodes += 1;
        Ok(index)
    }

    fn unlink(&mut self, parent: u32, index: u32) {
        let next = self.slot(index).next_sibling;
        let mut prev = self.slot(parent).first_child;
        if prev == index {
            self.slot_mut(parent).first_child = next;
            return;
        }
        while self.slot(prev).next_sibling != index {
            prev = self.slot(prev).next_sibling;
        }
        self.slot_mut(prev).next_sibling = next;
    }

    /// Free `index` and its ancestors while they neither end a sequence nor
    /// have children. The root always stays.
    fn prune(&mut self, mut index: u32) {
        while index != ROOT {
            let slot = self.slot(index);
            if slot.version.is_end() || slot.first_child != NIL {
                break;
            }
            let parent = slot.parent;
            self.unlink(parent, index);
            self.release(index);
            index = parent;
        }
    }

    fn descend_or_create<I>(&mut self, seq: I) -> Result<u32>
    where
        I: IntoIterator<Item = K>,
    {
        let mut node = ROOT;
        for key in seq {
            node = match self.child_of(node, &key) {
                Some(child) => child,
                None => match self.add_child(node, key) {
                    Ok(child) => child,
                    Err(e) => {
                        self.prune(node);
                        return Err(e);
                    }
                },
            };
        }
        Ok(node)
    }

    fn mark(&mut self, index: u32, value: V) -> Option<V> {
        let slot = self.slot_mut(index);
        let old = slot.value.replace(value);
        slot.version = slot.version.with_end(true);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    fn unmark(&mut self, index: u32) -> Option<V> {
        let slot = self.slot_mut(index);
        let value = slot.value.take()?;
        slot.version = slot.version.with_end(false);
        self.len -= 1;
        self.prune(index);
        Some(value)
    }

    // ---- sequence operations ----------------------------------------------

    /// Node at the end of `seq`, creating the path as needed and marking it
    /// with `V::default()` if no sequence ended there yet.
    pub fn get_or_add<I>(&mut self, seq: I) -> Result<TrieNode>
    where
        I: IntoIterator<Item = K>,
        V: Default,
    {
        let index = self.descend_or_create(seq)?;
        if !self.slot(index).version.is_end() {
            self.mark(index, V::default());
        }
        Ok(self.handle(index))
    }

    /// Store `seq` unless present; returns whether it was added.
    pub fn try_add<I>(&mut self, seq: I, value: V) -> Result<bool>
    where
        I: IntoIterator<Item = K>,
    {
        let index = self.descend_or_create(seq)?;
        if self.slot(index).version.is_end() {
            return Ok(false);
        }
        self.mark(index, value);
        Ok(true)
    }

    /// Store `seq` with `value`, returning the value it replaced.
    pub fn insert<I>(&mut self, seq: I, value: V) -> Result<Option<V>>
    where
        I: IntoIterator<Item = K>,
    {
        let index = self.descend_or_create(seq)?;
        Ok(self.mark(index, value))
    }

    /// Value stored for `seq`.
    pub fn get<I>(&self, seq: I) -> Option<&V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let index = self.locate(seq)?;
        self.slot(index).value.as_ref()
    }

    /// Mutable value stored for `seq`.
    pub fn get_mut<I>(&mut self, seq: I) -> Option<&mut V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let index = self.locate(seq)?;
        self.slot_mut(index).value.as_mut()
    }

    /// Whether exactly `seq` is stored.
    pub fn contains<I>(&self, seq: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.locate(seq)
            .is_some_and(|index| self.slot(index).version.is_end())
    }

    /// Whether some stored sequence starts with `prefix`.
    pub fn contains_prefix<I>(&self, prefix: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.locate(prefix).is_some_and(|index| {
            let slot = self.slot(index);
            slot.version.is_end() || slot.first_child != NIL
        })
    }

    /// Remove `seq`; returns whether it was stored.
    pub fn remove<I>(&mut self, seq: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        self.take(seq).is_some()
    }

    /// Remove `seq` and return its value, pruning nodes left without purpose.
    pub fn take<I>(&mut self, seq: I) -> Option<V>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        let index = self.locate(seq)?;
        self.unmark(index)
    }

    /// Remove the sequence ending at `node`. `Ok(None)` if none ends there.
    pub fn remove_node(&mut self, node: TrieNode) -> Result<Option<V>> {
        let index = self.resolve(node)?;
        Ok(self.unmark(index))
    }

    /// Remove every sequence. Outstanding handles, the root's included, stop
    /// resolving.
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        let root = self.slot_mut(ROOT);
        root.value = None;
        root.first_child = NIL;
        root.version = root.version.with_end(false);
        self.free = NIL;
        self.len = 0;
        self.nodes = 0;
        self.arena = next_arena_id();
    }

    /// Grow the slot array to hold at least `capacity` slots, the root
    /// included, as counted by [`capacity`](Self::capacity). Never shrinks.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        if capacity > MAX_SLOTS {
            return Err(AllocOptError::capacity_overflow(capacity, MAX_SLOTS));
        }
        self.slots.ensure_capacity(capacity)
    }

    /// Release spare capacity past the last slot. Live slots never move.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.slots.trim_excess()
    }

    /// Depth-first iteration over `(sequence, value)`.
    pub fn iter(&self) -> Iter<'_, K, V, C>
    where
        K: Clone,
    {
        Iter {
            tree: self,
            stack: vec![(ROOT, 0)],
            path: Vec::new(),
            remaining: self.len,
        }
    }
}

impl<K: Hash + Eq, V> Default for ArenaPrefixTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for ArenaPrefixTree<K, V, C> {
    /// The copy is a separate arena: handles into `self` do not resolve in it.
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            free: self.free,
            len: self.len,
            nodes: self.nodes,
            arena: next_arena_id(),
            comparer: self.comparer.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for ArenaPrefixTree<K, V, C>
where
    K: fmt::Debug + Clone,
    V: fmt::Debug,
    C: EqualityComparer<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Children of an [`ArenaPrefixTree`] node.
pub struct Children<'a, K, V, C> {
    tree: &'a ArenaPrefixTree<K, V, C>,
    next: u32,
}

impl<K, V, C: EqualityComparer<K>> Iterator for Children<'_, K, V, C> {
    type Item = TrieNode;

    fn next(&mut self) -> Option<TrieNode> {
        if self.next == NIL {
            return None;
        }
        let index = self.next;
        self.next = self.tree.slot(index).next_sibling;
        Some(self.tree.handle(index))
    }
}

/// Depth-first iterator over an [`ArenaPrefixTree`].
pub struct Iter<'a, K, V, C> {
    tree: &'a ArenaPrefixTree<K, V, C>,
    stack: Vec<(u32, usize)>,
    path: Vec<K>,
    remaining: usize,
}

impl<'a, K: Clone, V, C: EqualityComparer<K>> Iterator for Iter<'a, K, V, C> {
    type Item = (Vec<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some((index, depth)) = self.stack.pop() {
            let slot = tree.slot(index);
            if depth > 0 {
                self.path.truncate(depth - 1);
                if let Some(key) = &slot.key {
                    self.path.push(key.clone());
                }
            }
            let mut child = slot.first_child;
            while child != NIL {
                self.stack.push((child, depth + 1));
                child = tree.slot(child).next_sibling;
            }
            if let Some(value) = &slot.value {
                self.remaining -= 1;
                return Some((self.path.clone(), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V, C: EqualityComparer<K>> ExactSizeIterator for Iter<'_, K, V, C> {}
