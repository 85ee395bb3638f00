//! ArenaLinkedList: doubly linked list stored in one contiguous slot array
//!
//! Nodes are slots in a [`DynamicArray`] linked by `u32` indices. Internally
//! the chain is circular (`first.prev` is the last node) so both ends are
//! reachable in O(1); walks stop when they come back around to `first`.
//! Removed slots are threaded onto a free chain through their `next` field
//! and reused by later inserts.
//!
//! Handles ([`ListNode`]) carry the slot's version stamp. Reusing a slot
//! advances its generation, so a handle to a removed node is rejected with
//! `NodeInvalidated` even after the index has a new occupant.

use super::arena::{next_arena_id, Handle, SlotVersion, MAX_SLOTS, NIL};
use super::collection::Collection;
use super::cursor::Versioned;
use super::dynamic_array::DynamicArray;
use super::growth::GrowthPolicy;
use crate::error::{AllocOptError, Result};
use std::fmt;

/// Weak handle to a node of an [`ArenaLinkedList`].
///
/// Copyable and never owning; every dereference goes through the list and is
/// revalidated there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListNode(Handle);

impl ListNode {
    /// Slot index the node occupies in the backing array.
    pub fn index(&self) -> usize {
        self.0.index as usize
    }
}

#[derive(Clone)]
struct Slot<T> {
    value: Option<T>,
    prev: u32,
    /// Successor while occupied, next free slot while free.
    next: u32,
    version: SlotVersion,
}

/// Linked list over an index arena with generation-checked node handles.
///
/// # Examples
///
/// ```rust
/// use allocopt::ArenaLinkedList;
///
/// let mut list = ArenaLinkedList::new();
/// let b = list.add_last("b")?;
/// let a = list.add_before(b, "a")?;
/// list.add_after(b, "c")?;
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
/// assert_eq!(list.prev(a)?, None);
///
/// list.remove_node(b)?;
/// let d = list.add_last("d")?; // reuses b's slot
/// assert_eq!(d.index(), b.index());
/// assert!(list.value(b).is_err());
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
pub struct ArenaLinkedList<T> {
    slots: DynamicArray<Slot<T>>,
    first: u32,
    free: u32,
    len: usize,
    version: u64,
    arena: u64,
}

impl<T> ArenaLinkedList<T> {
    /// Create an empty list without allocating.
    pub fn new() -> Self {
        Self::with_growth(GrowthPolicy::new())
    }

    /// Create an empty list whose slot array grows by `growth`.
    pub fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            slots: DynamicArray::with_growth(growth.clamped(MAX_SLOTS)),
            first: NIL,
            free: NIL,
            len: 0,
            version: 0,
            arena: next_arena_id(),
        }
    }

    /// Create an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut list = Self::new();
        list.ensure_capacity(capacity)?;
        Ok(list)
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots the backing array can hold before growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Slots in use or on the free chain.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn handle(&self, index: u32) -> ListNode {
        ListNode(Handle::new(self.arena, index, self.slots[index as usize].version))
    }

    fn resolve(&self, node: ListNode) -> Result<u32> {
        let current = self.slots.get(node.index()).map(|slot| slot.version);
        node.0.resolve(self.arena, current).map(|index| index as u32)
    }

    #[inline]
    fn slot(&self, index: u32) -> &Slot<T> {
        &self.slots[index as usize]
    }

    #[inline]
    fn slot_mut(&mut self, index: u32) -> &mut Slot<T> {
        &mut self.slots[index as usize]
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Whether `node` still refers to a live node of this list.
    pub fn is_valid(&self, node: ListNode) -> bool {
        self.resolve(node).is_ok()
    }

    /// Head node.
    pub fn first(&self) -> Option<ListNode> {
        (self.first != NIL).then(|| self.handle(self.first))
    }

    /// Tail node.
    pub fn last(&self) -> Option<ListNode> {
        (self.first != NIL).then(|| self.handle(self.slot(self.first).prev))
    }

    /// Successor of `node`, `None` at the tail.
    pub fn next(&self, node: ListNode) -> Result<Option<ListNode>> {
        let index = self.resolve(node)?;
        let next = self.slot(index).next;
        Ok((next != self.first).then(|| self.handle(next)))
    }

    /// Predecessor of `node`, `None` at the head.
    pub fn prev(&self, node: ListNode) -> Result<Option<ListNode>> {
        let index = self.resolve(node)?;
        if index == self.first {
            return Ok(None);
        }
        Ok(Some(self.handle(self.slot(index).prev)))
    }

    /// Value stored at `node`.
    pub fn value(&self, node: ListNode) -> Result<&T> {
        let index = self.resolve(node)?;
        self.slot(index)
            .value
            .as_ref()
            .ok_or_else(|| AllocOptError::node_invalidated(index as usize))
    }

    /// Mutable value stored at `node`.
    pub fn value_mut(&mut self, node: ListNode) -> Result<&mut T> {
        let index = self.resolve(node)?;
        self.slot_mut(index)
            .value
            .as_mut()
            .ok_or_else(|| AllocOptError::node_invalidated(index as usize))
    }

    // ---- slot management --------------------------------------------------

    fn alloc(&mut self, value: T) -> Result<u32> {
        if self.free != NIL {
            let index = self.free;
            let slot = self.slot_mut(index);
            let next_free = slot.next;
            slot.value = Some(value);
            slot.version = slot.version.occupy();
            self.free = next_free;
            return Ok(index);
        }

        let index = self.slots.len();
        if index >= MAX_SLOTS {
            return Err(AllocOptError::capacity_overflow(index + 1, MAX_SLOTS));
        }
        self.slots.push(Slot {
            value: Some(value),
            prev: NIL,
            next: NIL,
            version: SlotVersion::FREE.occupy(),
        })?;
        Ok(index as u32)
    }

    fn release(&mut self, index: u32) -> Option<T> {
        let free = self.free;
        let slot = self.slot_mut(index);
        slot.version = slot.version.release();
        slot.prev = NIL;
        slot.next = free;
        self.free = index;
        self.slot_mut(index).value.take()
    }

    fn link_between(&mut self, index: u32, prev: u32, next: u32) {
        {
            let slot = self.slot_mut(index);
            slot.prev = prev;
            slot.next = next;
        }
        self.slot_mut(prev).next = index;
        self.slot_mut(next).prev = index;
    }

    fn inserted(&mut self, index: u32) -> ListNode {
        self.len += 1;
        self.bump();
        self.handle(index)
    }

    // ---- insertion ----------------------------------------------------------

    /// Append at the tail.
    pub fn add_last(&mut self, value: T) -> Result<ListNode> {
        let index = self.alloc(value)?;
        if self.first == NIL {
            self.link_between(index, index, index);
            self.first = index;
        } else {
            let last = self.slot(self.first).prev;
            self.link_between(index, last, self.first);
        }
        Ok(self.inserted(index))
    }

    /// Prepend at the head.
    pub fn add_first(&mut self, value: T) -> Result<ListNode> {
        let node = self.add_last(value)?;
        // In a circular chain the slot after the tail is the head.
        self.first = node.0.index;
        Ok(node)
    }

    /// Insert directly after `node`.
    pub fn add_after(&mut self, node: ListNode, value: T) -> Result<ListNode> {
        let at = self.resolve(node)?;
        let index = self.alloc(value)?;
        let next = self.slot(at).next;
        self.link_between(index, at, next);
        Ok(self.inserted(index))
    }

    /// Insert directly before `node`.
    pub fn add_before(&mut self, node: ListNode, value: T) -> Result<ListNode> {
        let at = self.resolve(node)?;
        let index = self.alloc(value)?;
        let prev = self.slot(at).prev;
        self.link_between(index, prev, at);
        if at == self.first {
            self.first = index;
        }
        Ok(self.inserted(index))
    }

    // ---- removal ------------------------------------------------------------

    /// Unlink `node` and return its value. The slot goes to the free chain.
    pub fn remove_node(&mut self, node: ListNode) -> Result<T> {
        let index = self.resolve(node)?;
        if self.len == 1 {
            self.first = NIL;
        } else {
            let (prev, next) = {
                let slot = self.slot(index);
                (slot.prev, slot.next)
            };
            self.slot_mut(prev).next = next;
            self.slot_mut(next).prev = prev;
            if index == self.first {
                self.first = next;
            }
        }
        self.len -= 1;
        self.bump();
        self.release(index)
            .ok_or_else(|| AllocOptError::node_invalidated(index as usize))
    }

    /// Remove the first node whose value equals `value`.
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.find(value) {
            Some(node) => self.remove_node(node).is_ok(),
            None => false,
        }
    }

    /// Remove and return the head value.
    pub fn remove_first(&mut self) -> Option<T> {
        let node = self.first()?;
        self.remove_node(node).ok()
    }

    /// Remove and return the tail value.
    pub fn remove_last(&mut self) -> Option<T> {
        let node = self.last()?;
        self.remove_node(node).ok()
    }

    /// Drop every node. Every outstanding handle becomes invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.first = NIL;
        self.free = NIL;
        self.len = 0;
        self.bump();
        // A fresh identity rejects handles into the old slots even once the
        // indices are handed out again.
        self.arena = next_arena_id();
    }

    // ---- search -------------------------------------------------------------

    /// First node holding `value`, walking from the head.
    pub fn find(&self, value: &T) -> Option<ListNode>
    where
        T: PartialEq,
    {
        self.find_index(value, false).map(|index| self.handle(index))
    }

    /// Last node holding `value`, walking from the tail.
    pub fn find_last(&self, value: &T) -> Option<ListNode>
    where
        T: PartialEq,
    {
        self.find_index(value, true).map(|index| self.handle(index))
    }

    fn find_index(&self, value: &T, backward: bool) -> Option<u32>
    where
        T: PartialEq,
    {
        if self.first == NIL {
            return None;
        }
        let start = if backward {
            self.slot(self.first).prev
        } else {
            self.first
        };
        let mut index = start;
        loop {
            let slot = self.slot(index);
            if slot.value.as_ref() == Some(value) {
                return Some(index);
            }
            index = if backward { slot.prev } else { slot.next };
            if index == start {
                return None;
            }
        }
    }

    /// Whether any node's value equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find_index(value, false).is_some()
    }

    // ---- capacity -----------------------------------------------------------

    /// Grow the slot array to hold at least `capacity` slots.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        if capacity > MAX_SLOTS {
            return Err(AllocOptError::capacity_overflow(capacity, MAX_SLOTS));
        }
        self.slots.ensure_capacity(capacity)
    }

    /// Release unused capacity past the last slot ever used. Live slots never
    /// move, so outstanding handles stay valid.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.slots.trim_excess()
    }

    /// Iterate head to tail; `.rev()` walks tail to head.
    pub fn iter(&self) -> Iter<'_, T> {
        let back = if self.first == NIL {
            NIL
        } else {
            self.slot(self.first).prev
        };
        Iter {
            list: self,
            front: self.first,
            back,
            remaining: self.len,
        }
    }
}

impl<T> Default for ArenaLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ArenaLinkedList<T> {
    /// The copy is a different arena: handles from `self` are not valid on it.
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            first: self.first,
            free: self.free,
            len: self.len,
            version: 0,
            arena: next_arena_id(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ArenaLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArenaLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> FromIterator<T> for ArenaLinkedList<T> {
    /// # Panics
    ///
    /// When more than `u32::MAX - 1` values are supplied.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            if let Err(e) = list.add_last(value) {
                panic!("{}", e);
            }
        }
        list
    }
}

impl<T> Versioned for ArenaLinkedList<T> {
    type Item = T;

    fn version(&self) -> u64 {
        self.version
    }

    fn cursor_start(&self) -> usize {
        self.first as usize
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        if position == NIL as usize {
            return None;
        }
        let slot = self.slots.get(position)?;
        let value = slot.value.as_ref()?;
        let next = if slot.next == self.first { NIL } else { slot.next };
        Some((value, next as usize))
    }
}

impl<T: PartialEq> Collection<T> for ArenaLinkedList<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        ArenaLinkedList::clear(self);
    }

    fn contains(&self, item: &T) -> bool {
        ArenaLinkedList::contains(self, item)
    }

    fn add(&mut self, item: T) -> Result<bool> {
        self.add_last(item)?;
        Ok(true)
    }

    fn remove(&mut self, item: &T) -> Result<bool> {
        Ok(ArenaLinkedList::remove(self, item))
    }
}

impl<'a, T> IntoIterator for &'a ArenaLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Borrowing iterator over an [`ArenaLinkedList`].
pub struct Iter<'a, T> {
    list: &'a ArenaLinkedList<T>,
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.list.slot(self.front);
        self.front = slot.next;
        self.remaining -= 1;
        slot.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.list.slot(self.back);
        self.back = slot.prev;
        self.remaining -= 1;
        slot.value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Clone>(list: &ArenaLinkedList<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn test_add_at_both_ends() {
        let mut list = ArenaLinkedList::new();
        list.add_last(2).unwrap();
        list.add_first(1).unwrap();
        list.add_last(3).unwrap();
        list.add_first(0).unwrap();
        assert_eq!(values(&list), vec![0, 1, 2, 3]);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert_eq!(list.value(list.first().unwrap()).unwrap(), &0);
        assert_eq!(list.value(list.last().unwrap()).unwrap(), &3);
    }

    #[test]
    fn test_add_before_and_after() {
        let mut list = ArenaLinkedList::new();
        let mid = list.add_last("m").unwrap();
        list.add_before(mid, "a").unwrap();
        let z = list.add_after(mid, "z").unwrap();
        list.add_after(z, "zz").unwrap();
        assert_eq!(values(&list), vec!["a", "m", "z", "zz"]);
        assert_eq!(list.value(list.first().unwrap()).unwrap(), &"a");
    }

    #[test]
    fn test_walk_terminates_at_ends() {
        let list: ArenaLinkedList<i32> = (0..4).collect();
        let mut node = list.first().unwrap();
        let mut seen = vec![*list.value(node).unwrap()];
        while let Some(next) = list.next(node).unwrap() {
            seen.push(*list.value(next).unwrap());
            node = next;
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(node, list.last().unwrap());

        let mut back = Vec::new();
        let mut cur = Some(node);
        while let Some(n) = cur {
            back.push(*list.value(n).unwrap());
            cur = list.prev(n).unwrap();
        }
        assert_eq!(back, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut list = ArenaLinkedList::new();
        let a = list.add_last(1).unwrap();
        list.add_last(2).unwrap();
        assert_eq!(list.remove_node(a).unwrap(), 1);

        let b = list.add_last(3).unwrap();
        assert_eq!(b.index(), a.index());
        assert!(!list.is_valid(a));
        assert_eq!(list.value(a).unwrap_err(), AllocOptError::node_invalidated(a.index()));
        assert!(list.next(a).is_err());
        assert!(list.prev(a).is_err());
        assert!(list.remove_node(a).is_err());
        assert!(list.add_after(a, 9).is_err());
        assert_eq!(list.value(b).unwrap(), &3);
        assert_eq!(values(&list), vec![2, 3]);
    }

    #[test]
    fn test_handles_survive_growth() {
        let mut list = ArenaLinkedList::new();
        let first = list.add_last(0).unwrap();
        let nodes: Vec<ListNode> = (1..100).map(|i| list.add_last(i).unwrap()).collect();
        assert!(list.capacity() >= 100);
        assert_eq!(list.value(first).unwrap(), &0);
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(list.value(*node).unwrap(), &(i as i32 + 1));
        }
    }

    #[test]
    fn test_free_chain_reuse_order() {
        let mut list: ArenaLinkedList<i32> = (0..5).collect();
        let slots = list.slot_count();
        list.remove(&1);
        list.remove(&3);
        list.add_last(10).unwrap();
        list.add_last(11).unwrap();
        assert_eq!(list.slot_count(), slots);
        assert_eq!(values(&list), vec![0, 2, 4, 10, 11]);
        list.add_last(12).unwrap();
        assert_eq!(list.slot_count(), slots + 1);
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut list: ArenaLinkedList<i32> = (0..3).collect();
        let head = list.first().unwrap();
        list.clear();
        assert!(list.is_empty());
        assert!(list.first().is_none());

        let fresh = list.add_last(7).unwrap();
        assert_eq!(fresh.index(), head.index());
        assert!(list.value(head).is_err());
        assert_eq!(list.value(fresh).unwrap(), &7);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut a = ArenaLinkedList::new();
        let mut b = ArenaLinkedList::new();
        let node = a.add_last(1).unwrap();
        b.add_last(1).unwrap();
        assert!(b.value(node).is_err());

        let copy = a.clone();
        assert!(copy.value(node).is_err());
        assert_eq!(copy, a);
    }

    #[test]
    fn test_find_and_remove() {
        let mut list: ArenaLinkedList<i32> = vec![1, 2, 1, 3].into_iter().collect();
        let first = list.find(&1).unwrap();
        let last = list.find_last(&1).unwrap();
        assert_ne!(first, last);
        assert!(list.find(&9).is_none());

        assert!(list.remove(&1));
        assert_eq!(values(&list), vec![2, 1, 3]);
        assert!(list.contains(&1));
        assert_eq!(list.remove_first(), Some(2));
        assert_eq!(list.remove_last(), Some(3));
        assert_eq!(list.remove_last(), Some(1));
        assert_eq!(list.remove_last(), None);
    }

    #[test]
    fn test_remove_head_moves_first() {
        let mut list: ArenaLinkedList<i32> = (0..3).collect();
        let head = list.first().unwrap();
        list.remove_node(head).unwrap();
        assert_eq!(list.value(list.first().unwrap()).unwrap(), &1);
        assert_eq!(list.prev(list.first().unwrap()).unwrap(), None);
    }

    #[test]
    fn test_cursor_fail_fast() {
        let mut list: ArenaLinkedList<i32> = (0..3).collect();
        let mut cursor = list.cursor();
        assert_eq!(cursor.collect_remaining(&list).unwrap(), vec![&0, &1, &2]);

        let mut cursor = list.cursor();
        cursor.next(&list).unwrap();
        let node = list.last().unwrap();
        *list.value_mut(node).unwrap() = 20;
        // value writes are not structural
        assert_eq!(cursor.next(&list).unwrap(), Some(&1));
        list.add_first(-1).unwrap();
        assert!(matches!(
            cursor.next(&list),
            Err(AllocOptError::ConcurrentModification { .. })
        ));
    }

    #[test]
    fn test_shrink_keeps_handles() {
        let mut list = ArenaLinkedList::with_capacity(64).unwrap();
        let a = list.add_last(1).unwrap();
        let b = list.add_last(2).unwrap();
        list.remove_node(a).unwrap();
        list.shrink_to_fit().unwrap();
        assert_eq!(list.capacity(), 2);
        assert_eq!(list.value(b).unwrap(), &2);
    }
}
