//! RingBuffer: wrap-around buffer underlying Deque and Queue
//!
//! The logical sequence starts at `head` and continues for `len` slots,
//! wrapping at the end of the allocation; `tail` is the slot one past the
//! last element. `head == tail` means either empty or full, told apart by
//! `len`.
//!
//! Growth always normalizes the window: appends copy it to offset 0, prepends
//! copy it to an offset that leaves exactly the needed room in front, so the
//! new elements land without wrapping.

use super::cursor::Versioned;
use super::growth::GrowthPolicy;
use super::raw_buf::RawBuf;
use crate::error::{AllocOptError, Result};
use std::fmt;
use std::iter::Chain;
use std::mem;
use std::ops::{Index, IndexMut, Range};
use std::ptr;
use std::slice;

/// Which end of the window new elements are headed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Front,
    Back,
}

/// Double-ended ring buffer.
///
/// # Examples
///
/// ```rust
/// use allocopt::RingBuffer;
///
/// let mut ring = RingBuffer::with_capacity(4)?;
/// ring.enqueue_last(2)?;
/// ring.enqueue_last(3)?;
/// ring.enqueue_first(1)?;
/// assert_eq!(ring.dequeue_last()?, 3);
///
/// let view = ring.peek_first_n(2)?;
/// assert_eq!(view.to_vec(), vec![1, 2]);
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
pub struct RingBuffer<T> {
    buf: RawBuf<T>,
    head: usize,
    tail: usize,
    len: usize,
    version: u64,
    growth: GrowthPolicy,
}

impl<T> RingBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Create an empty ring buffer without allocating.
    pub fn new() -> Self {
        Self::with_growth(GrowthPolicy::new())
    }

    /// Create an empty ring buffer with a custom growth policy.
    pub fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            buf: RawBuf::new(),
            head: 0,
            tail: 0,
            len: 0,
            version: 0,
            growth,
        }
    }

    /// Create an empty ring buffer with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut ring = Self::new();
        let max = ring.growth.max_for::<T>();
        if capacity > max {
            return Err(AllocOptError::capacity_overflow(capacity, max));
        }
        ring.buf = RawBuf::with_capacity(capacity)?;
        Ok(ring)
    }

    /// Number of queued elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Structural version; changes on every mutation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ---- index arithmetic -------------------------------------------------

    /// `index + n` modulo capacity, for `index < cap` and `n <= cap`.
    #[inline]
    fn wrap_add(&self, index: usize, n: usize) -> usize {
        let room = self.capacity() - index;
        if n < room {
            index + n
        } else {
            n - room
        }
    }

    /// `index - n` modulo capacity, for `index < cap` and `n <= cap`.
    #[inline]
    fn wrap_sub(&self, index: usize, n: usize) -> usize {
        if n <= index {
            index - n
        } else {
            self.capacity() - (n - index)
        }
    }

    /// Physical slot ranges backing logical positions `start..start + count`.
    /// The second range is empty unless the run wraps.
    fn segments(&self, start: usize, count: usize) -> (Range<usize>, Range<usize>) {
        if count == 0 {
            return (0..0, 0..0);
        }
        let first = self.wrap_add(self.head, start);
        let first_len = count.min(self.capacity() - first);
        (first..first + first_len, 0..count - first_len)
    }

    fn segment_slice(&self, range: Range<usize>) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr().add(range.start), range.len()) }
    }

    fn segment_slice_mut(&mut self, range: Range<usize>) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().add(range.start), range.len()) }
    }

    unsafe fn drop_segment(&mut self, range: Range<usize>) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.ptr().add(range.start),
                range.len(),
            ));
        }
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    // ---- growth -----------------------------------------------------------

    /// Make room for `additional` more elements headed for `end`.
    fn reserve_for(&mut self, additional: usize, end: End) -> Result<()> {
        let required = self.growth.required::<T>(self.len, additional)?;
        if required <= self.capacity() {
            return Ok(());
        }
        let new_cap = self.growth.next_capacity::<T>(self.capacity(), required)?;
        let offset = match end {
            End::Back => 0,
            End::Front => additional,
        };
        self.relocate(new_cap, offset)
    }

    /// Move the window into a fresh allocation of `new_cap` slots starting at
    /// physical `offset`. Requires `offset + len <= new_cap`.
    fn relocate(&mut self, new_cap: usize, offset: usize) -> Result<()> {
        debug_assert!(offset + self.len <= new_cap || Self::IS_ZST);
        let old_cap = self.capacity();

        if Self::IS_ZST {
            self.head = 0;
            self.tail = self.len;
            return Ok(());
        }

        if offset == 0 && self.head == 0 && self.len <= new_cap {
            // Window already starts at slot 0: resize in place.
            self.buf.realloc(new_cap)?;
        } else {
            let mut fresh = RawBuf::with_capacity(new_cap)?;
            let (a, b) = self.segments(0, self.len);
            unsafe {
                self.buf.move_to(a.start, &mut fresh, offset, a.len());
                self.buf.move_to(b.start, &mut fresh, offset + a.len(), b.len());
            }
            self.buf = fresh;
        }

        self.head = offset;
        self.tail = if new_cap == 0 {
            0
        } else {
            self.wrap_add(offset, self.len)
        };
        log::trace!(
            "RingBuffer<{}>: capacity {} -> {} (window at {})",
            std::any::type_name::<T>(),
            old_cap,
            new_cap,
            offset
        );
        Ok(())
    }

    /// Grow so that at least `capacity` elements fit. Never shrinks.
    /// Returns the resulting capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        if capacity > self.capacity() {
            let new_cap = self.growth.next_capacity::<T>(self.capacity(), capacity)?;
            self.relocate(new_cap, 0)?;
            self.bump();
        }
        Ok(self.capacity())
    }

    /// Reallocate down to exactly `len` slots.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.trim_excess_to(self.len)
    }

    /// Reallocate to exactly `capacity` slots, which must hold every element.
    pub fn trim_excess_to(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.len {
            return Err(AllocOptError::index_out_of_range(capacity, self.len));
        }
        if capacity < self.capacity() {
            self.relocate(capacity, 0)?;
            self.bump();
        }
        Ok(())
    }

    /// Rotate the window so it starts at slot 0 and return it as one slice.
    pub fn make_contiguous(&mut self) -> Result<&mut [T]> {
        if self.head != 0 {
            self.relocate(self.capacity(), 0)?;
            self.bump();
        }
        let len = self.len;
        Ok(self.segment_slice_mut(0..len))
    }

    // ---- peeking ----------------------------------------------------------

    /// First element if any.
    pub fn try_peek_first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Last element if any.
    pub fn try_peek_last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// First element, `EmptyCollection` when empty.
    pub fn peek_first(&self) -> Result<&T> {
        self.try_peek_first()
            .ok_or_else(|| AllocOptError::empty("RingBuffer"))
    }

    /// Last element, `EmptyCollection` when empty.
    pub fn peek_last(&self) -> Result<&T> {
        self.try_peek_last()
            .ok_or_else(|| AllocOptError::empty("RingBuffer"))
    }

    /// Mutable first element if any.
    pub fn try_peek_first_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Mutable last element if any.
    pub fn try_peek_last_mut(&mut self) -> Option<&mut T> {
        let last = self.len.checked_sub(1)?;
        self.get_mut(last)
    }

    /// View of the first `count` elements, or `None` if there are fewer.
    pub fn try_peek_first_n(&self, count: usize) -> Option<TwoPartSlice<'_, T>> {
        if count > self.len {
            return None;
        }
        Some(self.view(0, count))
    }

    /// View of the last `count` elements in front-to-back order, or `None` if
    /// there are fewer.
    pub fn try_peek_last_n(&self, count: usize) -> Option<TwoPartSlice<'_, T>> {
        if count > self.len {
            return None;
        }
        Some(self.view(self.len - count, count))
    }

    /// View of the first `count` elements; `IndexOutOfRange` if there are
    /// fewer.
    pub fn peek_first_n(&self, count: usize) -> Result<TwoPartSlice<'_, T>> {
        self.try_peek_first_n(count)
            .ok_or_else(|| AllocOptError::index_out_of_range(count, self.len))
    }

    /// View of the last `count` elements; `IndexOutOfRange` if there are
    /// fewer.
    pub fn peek_last_n(&self, count: usize) -> Result<TwoPartSlice<'_, T>> {
        self.try_peek_last_n(count)
            .ok_or_else(|| AllocOptError::index_out_of_range(count, self.len))
    }

    fn view(&self, start: usize, count: usize) -> TwoPartSlice<'_, T> {
        let (a, b) = self.segments(start, count);
        TwoPartSlice {
            first: self.segment_slice(a),
            second: self.segment_slice(b),
        }
    }

    /// Whole window as a two-part view.
    pub fn as_slices(&self) -> TwoPartSlice<'_, T> {
        self.view(0, self.len)
    }

    /// Whole window as two mutable slices.
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (a, b) = self.segments(0, self.len);
        let ptr = self.buf.ptr();
        unsafe {
            (
                slice::from_raw_parts_mut(ptr.add(a.start), a.len()),
                slice::from_raw_parts_mut(ptr.add(b.start), b.len()),
            )
        }
    }

    /// Element at logical position `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let slot = self.wrap_add(self.head, index);
        Some(unsafe { &*self.buf.slot(slot) })
    }

    /// Mutable element at logical position `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let slot = self.wrap_add(self.head, index);
        Some(unsafe { &mut *self.buf.slot(slot) })
    }

    /// Element at `index` or `IndexOutOfRange`.
    pub fn at(&self, index: usize) -> Result<&T> {
        self.get(index)
            .ok_or_else(|| AllocOptError::index_out_of_range(index, self.len))
    }

    // ---- enqueue ----------------------------------------------------------

    /// Append at the back.
    pub fn enqueue_last(&mut self, item: T) -> Result<()> {
        self.reserve_for(1, End::Back)?;
        unsafe { self.buf.slot(self.tail).write(item) };
        self.tail = self.wrap_add(self.tail, 1);
        self.len += 1;
        self.bump();
        Ok(())
    }

    /// Prepend at the front.
    pub fn enqueue_first(&mut self, item: T) -> Result<()> {
        if self.len == 0 {
            return self.enqueue_last(item);
        }
        self.reserve_for(1, End::Front)?;
        self.head = self.wrap_sub(self.head, 1);
        unsafe { self.buf.slot(self.head).write(item) };
        self.len += 1;
        self.bump();
        Ok(())
    }

    /// Append clones of `items` at the back, in order.
    pub fn enqueue_range_last(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        if items.is_empty() {
            return Ok(());
        }
        self.reserve_for(items.len(), End::Back)?;
        for item in items {
            unsafe { self.buf.slot(self.tail).write(item.clone()) };
            self.tail = self.wrap_add(self.tail, 1);
            self.len += 1;
        }
        self.bump();
        Ok(())
    }

    /// Prepend clones of `items` so that `items[0]` becomes the new front.
    pub fn enqueue_range_first(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        if self.len == 0 {
            return self.enqueue_range_last(items);
        }
        if items.is_empty() {
            return Ok(());
        }
        self.reserve_for(items.len(), End::Front)?;
        for item in items.iter().rev() {
            let head = self.wrap_sub(self.head, 1);
            unsafe { self.buf.slot(head).write(item.clone()) };
            self.head = head;
            self.len += 1;
        }
        self.bump();
        Ok(())
    }

    /// Move every element of `iter` to the back (collect, then at most two
    /// bulk copies).
    pub fn extend_last<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<()> {
        let mut items: Vec<T> = iter.into_iter().collect();
        let count = items.len();
        if count == 0 {
            return Ok(());
        }
        self.reserve_for(count, End::Back)?;

        let first_len = count.min(self.capacity() - self.tail);
        unsafe {
            let src = items.as_ptr();
            let dst = self.buf.ptr();
            if !Self::IS_ZST {
                ptr::copy_nonoverlapping(src, dst.add(self.tail), first_len);
                ptr::copy_nonoverlapping(src.add(first_len), dst, count - first_len);
            }
            items.set_len(0);
        }
        self.tail = self.wrap_add(self.tail, count);
        self.len += count;
        self.bump();
        Ok(())
    }

    /// Move every element of `iter` to the front, keeping their order, so the
    /// first yielded element becomes the new front.
    pub fn extend_first<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<()> {
        if self.len == 0 {
            return self.extend_last(iter);
        }
        let mut items: Vec<T> = iter.into_iter().collect();
        let count = items.len();
        if count == 0 {
            return Ok(());
        }
        self.reserve_for(count, End::Front)?;

        let new_head = self.wrap_sub(self.head, count);
        let first_len = count.min(self.capacity() - new_head);
        unsafe {
            let src = items.as_ptr();
            let dst = self.buf.ptr();
            if !Self::IS_ZST {
                ptr::copy_nonoverlapping(src, dst.add(new_head), first_len);
                ptr::copy_nonoverlapping(src.add(first_len), dst, count - first_len);
            }
            items.set_len(0);
        }
        self.head = new_head;
        self.len += count;
        self.bump();
        Ok(())
    }

    // ---- dequeue ----------------------------------------------------------

    /// Remove the front element if any.
    pub fn try_dequeue_first(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = unsafe { self.buf.slot(self.head).read() };
        self.head = self.wrap_add(self.head, 1);
        self.len -= 1;
        self.after_removal();
        Some(item)
    }

    /// Remove the back element if any.
    pub fn try_dequeue_last(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.tail = self.wrap_sub(self.tail, 1);
        let item = unsafe { self.buf.slot(self.tail).read() };
        self.len -= 1;
        self.after_removal();
        Some(item)
    }

    /// Remove the front element, `EmptyCollection` when empty.
    pub fn dequeue_first(&mut self) -> Result<T> {
        self.try_dequeue_first()
            .ok_or_else(|| AllocOptError::empty("RingBuffer"))
    }

    /// Remove the back element, `EmptyCollection` when empty.
    pub fn dequeue_last(&mut self) -> Result<T> {
        self.try_dequeue_last()
            .ok_or_else(|| AllocOptError::empty("RingBuffer"))
    }

    /// Drop up to `count` elements from the front. Never fails; clamps to the
    /// available count. Returns how many were removed.
    pub fn dequeue_first_n(&mut self, count: usize) -> usize {
        let count = count.min(self.len);
        if count == self.len {
            self.clear();
            return count;
        }
        let (a, b) = self.segments(0, count);
        self.head = self.wrap_add(self.head, count);
        self.len -= count;
        self.bump();
        unsafe {
            self.drop_segment(a);
            self.drop_segment(b);
        }
        count
    }

    /// Drop up to `count` elements from the back. Never fails; clamps to the
    /// available count. Returns how many were removed.
    pub fn dequeue_last_n(&mut self, count: usize) -> usize {
        let count = count.min(self.len);
        if count == self.len {
            self.clear();
            return count;
        }
        let (a, b) = self.segments(self.len - count, count);
        self.tail = self.wrap_sub(self.tail, count);
        self.len -= count;
        self.bump();
        unsafe {
            self.drop_segment(a);
            self.drop_segment(b);
        }
        count
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        let (a, b) = self.segments(0, self.len);
        self.head = 0;
        self.tail = 0;
        self.len = 0;
        self.bump();
        if mem::needs_drop::<T>() {
            unsafe {
                self.drop_segment(a);
                self.drop_segment(b);
            }
        }
    }

    fn after_removal(&mut self) {
        if self.len == 0 {
            self.head = 0;
            self.tail = 0;
        }
        self.bump();
    }

    // ---- search & iteration -----------------------------------------------

    /// Whether any element equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|x| x == item)
    }

    /// Logical position of the first element matching `key` under `eq`.
    ///
    /// Lets a buffer of records be probed by a key type without building a
    /// full record to compare against.
    pub fn position_by<Q: ?Sized, F>(&self, key: &Q, mut eq: F) -> Option<usize>
    where
        F: FnMut(&T, &Q) -> bool,
    {
        self.iter().position(|item| eq(item, key))
    }

    /// Iterate front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        let view = self.as_slices();
        Iter {
            inner: view.first.iter().chain(view.second.iter()),
        }
    }

    /// Iterate mutably front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (first, second) = self.as_mut_slices();
        IterMut {
            inner: first.iter_mut().chain(second.iter_mut()),
        }
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            let (a, b) = self.segments(0, self.len);
            unsafe {
                self.drop_segment(a);
                self.drop_segment(b);
            }
        }
    }
}

impl<T> Versioned for RingBuffer<T> {
    type Item = T;

    fn version(&self) -> u64 {
        self.version
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        self.get(position).map(|item| (item, position + 1))
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.at(index) {
            Ok(item) => item,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("{}", AllocOptError::index_out_of_range(index, len)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RingBuffer<T> {}

impl<T: Clone> Clone for RingBuffer<T> {
    /// # Panics
    ///
    /// Only if the allocator cannot provide a buffer for a copy.
    fn clone(&self) -> Self {
        let mut copy = match Self::with_capacity(self.len) {
            Ok(copy) => copy,
            Err(e) => panic!("{}", e),
        };
        copy.growth = self.growth;
        for item in self.iter() {
            unsafe { copy.buf.slot(copy.tail).write(item.clone()) };
            copy.len += 1;
            copy.tail = copy.wrap_add(copy.tail, 1);
        }
        copy
    }
}

impl<T> FromIterator<T> for RingBuffer<T> {
    /// # Panics
    ///
    /// On `CapacityOverflow`, like `Vec` does.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = Self::new();
        if let Err(e) = ring.extend_last(iter) {
            panic!("{}", e);
        }
        ring
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for RingBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { ring: self }
    }
}

/// Possibly-wrapped view of a run of ring-buffer elements.
///
/// Borrowing the buffer keeps the view valid; any mutation needs the borrow
/// back first.
#[derive(Debug, PartialEq, Eq)]
pub struct TwoPartSlice<'a, T> {
    /// Elements up to the end of the allocation.
    pub first: &'a [T],
    /// Elements continuing from slot 0, empty unless the run wraps.
    pub second: &'a [T],
}

impl<T> Clone for TwoPartSlice<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TwoPartSlice<'_, T> {}

impl<'a, T> TwoPartSlice<'a, T> {
    /// Total element count.
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// Whether both parts are empty.
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }

    /// Whether the run is split across the end of the allocation.
    pub fn is_wrapped(&self) -> bool {
        !self.second.is_empty()
    }

    /// Element at position `index` of the run.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index < self.first.len() {
            self.first.get(index)
        } else {
            self.second.get(index - self.first.len())
        }
    }

    /// Iterate the first part then the second.
    pub fn iter(&self) -> Chain<slice::Iter<'a, T>, slice::Iter<'a, T>> {
        self.first.iter().chain(self.second.iter())
    }

    /// Copy the run into a vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.first);
        out.extend_from_slice(self.second);
        out
    }
}

/// Borrowing front-to-back iterator.
pub struct Iter<'a, T> {
    inner: Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Mutable front-to-back iterator.
pub struct IterMut<'a, T> {
    inner: Chain<slice::IterMut<'a, T>, slice::IterMut<'a, T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// Owning front-to-back iterator.
pub struct IntoIter<T> {
    ring: RingBuffer<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.ring.try_dequeue_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.ring.len(), Some(self.ring.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.ring.try_dequeue_last()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::rc::Rc;

    fn contents<T: Clone>(ring: &RingBuffer<T>) -> Vec<T> {
        ring.iter().cloned().collect()
    }

    /// Ring of capacity `cap` whose window starts at physical `head`.
    fn rotated(cap: usize, head: usize, values: &[i32]) -> RingBuffer<i32> {
        assert!(!values.is_empty() && head < cap && values.len() <= cap);
        let mut ring = RingBuffer::with_capacity(cap).unwrap();
        for _ in 0..head {
            ring.enqueue_last(-1).unwrap();
        }
        ring.enqueue_last(values[0]).unwrap();
        assert_eq!(ring.dequeue_first_n(head), head);
        ring.enqueue_range_last(&values[1..]).unwrap();
        ring
    }

    #[test]
    fn test_grow_on_enqueue_first_scenario() {
        let mut ring = RingBuffer::with_capacity(4).unwrap();
        for i in 1..=4 {
            ring.enqueue_last(i).unwrap();
        }
        assert_eq!(ring.capacity(), 4);

        ring.enqueue_first(0).unwrap();
        assert_eq!(contents(&ring), vec![0, 1, 2, 3, 4]);
        assert!(ring.capacity() >= 5);
    }

    #[test]
    fn test_wrap_around() {
        let mut ring = RingBuffer::with_capacity(4).unwrap();
        ring.enqueue_last(1).unwrap();
        ring.enqueue_last(2).unwrap();
        ring.enqueue_last(3).unwrap();
        assert_eq!(ring.dequeue_first().unwrap(), 1);
        assert_eq!(ring.dequeue_first().unwrap(), 2);
        ring.enqueue_last(4).unwrap();
        ring.enqueue_last(5).unwrap();
        ring.enqueue_last(6).unwrap();
        assert_eq!(ring.capacity(), 4);
        assert!(ring.as_slices().is_wrapped());
        assert_eq!(contents(&ring), vec![3, 4, 5, 6]);

        ring.enqueue_last(7).unwrap();
        assert_eq!(contents(&ring), vec![3, 4, 5, 6, 7]);
        assert!(!ring.as_slices().is_wrapped());
    }

    #[test]
    fn test_enqueue_first_wraps_backwards() {
        let mut ring = RingBuffer::with_capacity(4).unwrap();
        ring.enqueue_last(2).unwrap();
        ring.enqueue_first(1).unwrap();
        ring.enqueue_first(0).unwrap();
        assert_eq!(contents(&ring), vec![0, 1, 2]);
        assert_eq!(ring.peek_first().unwrap(), &0);
        assert_eq!(ring.peek_last().unwrap(), &2);
        assert_eq!(ring.dequeue_last().unwrap(), 2);
        assert_eq!(ring.dequeue_last().unwrap(), 1);
        assert_eq!(ring.dequeue_last().unwrap(), 0);
        assert!(ring.dequeue_last().is_err());
    }

    #[test]
    fn test_empty_errors() {
        let mut ring: RingBuffer<i32> = RingBuffer::new();
        assert_eq!(ring.dequeue_first().unwrap_err(), AllocOptError::empty("RingBuffer"));
        assert!(ring.peek_first().is_err());
        assert!(ring.peek_last().is_err());
        assert_eq!(ring.try_dequeue_last(), None);
        assert_eq!(ring.dequeue_first_n(5), 0);
        assert_eq!(ring.dequeue_last_n(5), 0);
    }

    #[test]
    fn test_range_enqueue_last_wraps() {
        let mut ring = rotated(8, 6, &[0]);
        ring.enqueue_range_last(&[1, 2, 3, 4]).unwrap();
        assert_eq!(ring.capacity(), 8);
        let view = ring.as_slices();
        assert_eq!(view.first, &[0, 1]);
        assert_eq!(view.second, &[2, 3, 4]);
    }

    #[test]
    fn test_range_enqueue_first_keeps_order() {
        let mut ring = RingBuffer::with_capacity(8).unwrap();
        ring.enqueue_range_last(&[10, 11]).unwrap();
        ring.enqueue_range_first(&[1, 2, 3]).unwrap();
        assert_eq!(contents(&ring), vec![1, 2, 3, 10, 11]);
        assert_eq!(ring.capacity(), 8);

        ring.enqueue_range_first(&[-3, -2, -1, 0]).unwrap();
        assert_eq!(contents(&ring), vec![-3, -2, -1, 0, 1, 2, 3, 10, 11]);
        assert_eq!(ring.capacity(), 16);
    }

    #[test]
    fn test_range_enqueue_grows_once() {
        let mut ring = RingBuffer::with_capacity(2).unwrap();
        ring.enqueue_last(0).unwrap();
        let items: Vec<i32> = (1..=20).collect();
        ring.enqueue_range_last(&items).unwrap();
        assert_eq!(ring.capacity(), 21);
        assert_eq!(contents(&ring), (0..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_extend_moves_in_bulk() {
        let mut ring = rotated(8, 5, &[100]);
        ring.extend_last([101]).unwrap();
        ring.extend_first([98, 99]).unwrap();
        assert_eq!(contents(&ring), vec![98, 99, 100, 101]);

        ring.extend_first(0..10).unwrap();
        let mut expected: Vec<i32> = (0..10).collect();
        expected.extend([98, 99, 100, 101]);
        assert_eq!(contents(&ring), expected);

        let mut strings: RingBuffer<String> = RingBuffer::new();
        strings.extend_last(["b".to_string(), "c".to_string()]).unwrap();
        strings.extend_first(["a".to_string()]).unwrap();
        assert_eq!(contents(&strings), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dequeue_n_clamps() {
        let mut ring: RingBuffer<i32> = (0..10).collect();
        assert_eq!(ring.dequeue_first_n(3), 3);
        assert_eq!(ring.dequeue_last_n(2), 2);
        assert_eq!(contents(&ring), vec![3, 4, 5, 6, 7]);
        assert_eq!(ring.dequeue_last_n(100), 5);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_dequeue_n_drops_wrapped_elements() {
        let marker = Rc::new(());
        let mut ring = RingBuffer::with_capacity(4).unwrap();
        for _ in 0..3 {
            ring.enqueue_last(marker.clone()).unwrap();
        }
        ring.dequeue_first_n(2);
        for _ in 0..3 {
            ring.enqueue_last(marker.clone()).unwrap();
        }
        assert!(ring.as_slices().is_wrapped());
        assert_eq!(Rc::strong_count(&marker), 5);

        assert_eq!(ring.dequeue_first_n(3), 3);
        assert_eq!(Rc::strong_count(&marker), 2);
        drop(ring);
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn test_peek_n_views() {
        let ring = rotated(4, 2, &[1, 2, 3, 4]);
        let first = ring.peek_first_n(3).unwrap();
        assert!(first.is_wrapped());
        assert_eq!(first.to_vec(), vec![1, 2, 3]);
        assert_eq!(first.get(2), Some(&3));

        let last = ring.peek_last_n(2).unwrap();
        assert_eq!(last.to_vec(), vec![3, 4]);
        assert!(!last.is_wrapped());

        assert!(ring.try_peek_first_n(5).is_none());
        assert_eq!(
            ring.peek_last_n(5).unwrap_err(),
            AllocOptError::index_out_of_range(5, 4)
        );
        assert!(ring.peek_first_n(0).unwrap().is_empty());
    }

    #[test]
    fn test_capacity_control() {
        let mut ring = rotated(4, 3, &[1, 2, 3]);
        assert_eq!(ring.ensure_capacity(3).unwrap(), 4);
        assert_eq!(ring.ensure_capacity(6).unwrap(), 8);
        assert_eq!(contents(&ring), vec![1, 2, 3]);

        ring.trim_excess().unwrap();
        assert_eq!(ring.capacity(), 3);
        assert_eq!(contents(&ring), vec![1, 2, 3]);
        assert!(ring.trim_excess_to(2).is_err());

        ring.dequeue_first().unwrap();
        ring.enqueue_last(4).unwrap();
        assert!(ring.as_slices().is_wrapped());
        assert_eq!(ring.make_contiguous().unwrap(), &[2, 3, 4]);
    }

    #[test]
    fn test_index_and_position_by() {
        let mut ring = rotated(4, 3, &[1, 2, 3]);
        assert_eq!(ring[2], 3);
        ring[0] = 10;
        assert_eq!(ring.get(0), Some(&10));
        assert_eq!(ring.position_by(&3, |item, key| item == key), Some(2));
        assert!(ring.contains(&2));
        assert_eq!(ring.at(3).unwrap_err(), AllocOptError::index_out_of_range(3, 3));
    }

    #[test]
    fn test_matches_vecdeque_under_churn() {
        let mut ring = RingBuffer::new();
        let mut model = VecDeque::new();
        for i in 0..500i32 {
            match i % 7 {
                0 | 3 => {
                    ring.enqueue_first(i).unwrap();
                    model.push_front(i);
                }
                1 | 4 | 5 => {
                    ring.enqueue_last(i).unwrap();
                    model.push_back(i);
                }
                2 => assert_eq!(ring.try_dequeue_first(), model.pop_front()),
                _ => assert_eq!(ring.try_dequeue_last(), model.pop_back()),
            }
            assert_eq!(ring.len(), model.len());
        }
        assert!(ring.iter().eq(model.iter()));
        assert!(ring.iter().rev().eq(model.iter().rev()));
    }

    #[test]
    fn test_version_and_cursor() {
        let mut ring: RingBuffer<i32> = (0..4).collect();
        let mut cursor = ring.cursor();
        assert_eq!(cursor.next(&ring).unwrap(), Some(&0));
        ring.enqueue_first(-1).unwrap();
        assert!(matches!(
            cursor.next(&ring),
            Err(AllocOptError::ConcurrentModification { .. })
        ));
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut ring = RingBuffer::new();
        for _ in 0..100 {
            ring.enqueue_last(()).unwrap();
            ring.enqueue_first(()).unwrap();
        }
        assert_eq!(ring.len(), 200);
        assert_eq!(ring.dequeue_first_n(150), 150);
        assert_eq!(ring.iter().count(), 50);
    }

    #[test]
    fn test_clone_and_into_iter() {
        let ring = rotated(4, 3, &[1, 2, 3]);
        let copy = ring.clone();
        assert_eq!(ring, copy);
        let collected: Vec<i32> = copy.into_iter().rev().collect();
        assert_eq!(collected, vec![3, 2, 1]);
    }
}
