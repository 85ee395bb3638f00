//! DynamicArray: contiguous growable buffer underlying List and Stack
//!
//! Elements live in one [`RawBuf`] allocation in logical order. Growth goes
//! through the container's [`GrowthPolicy`] and uses `realloc`, so the
//! allocator can often extend in place instead of copying.

use super::cursor::Versioned;
use super::growth::GrowthPolicy;
use super::raw_buf::RawBuf;
use crate::error::{check_bounds, check_range, AllocOptError, Result};
use std::fmt;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice;

/// Contiguous growable array with explicit growth policy and a structural
/// version counter.
///
/// # Examples
///
/// ```rust
/// use allocopt::DynamicArray;
///
/// let mut array = DynamicArray::new();
/// array.push(1)?;
/// array.push(2)?;
/// array.insert(0, 0)?;
/// assert_eq!(array.as_slice(), &[0, 1, 2]);
///
/// let removed = array.remove_all(|&x| x % 2 == 0);
/// assert_eq!(removed, 2);
/// assert_eq!(array.as_slice(), &[1]);
/// # Ok::<(), allocopt::AllocOptError>(())
/// ```
pub struct DynamicArray<T> {
    buf: RawBuf<T>,
    len: usize,
    version: u64,
    growth: GrowthPolicy,
}

impl<T> DynamicArray<T> {
    /// Create an empty array without allocating.
    #[inline]
    pub fn new() -> Self {
        Self::with_growth(GrowthPolicy::new())
    }

    /// Create an empty array that grows according to `growth`.
    #[inline]
    pub fn with_growth(growth: GrowthPolicy) -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
            version: 0,
            growth,
        }
    }

    /// Create an empty array with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut array = Self::new();
        array.ensure_capacity_exact(capacity)?;
        Ok(array)
    }

    /// Take ownership of the contents of a `Vec` (collect-then-copy).
    pub fn from_vec(mut items: Vec<T>) -> Result<Self> {
        let mut array = Self::with_capacity(items.len())?;
        unsafe {
            ptr::copy_nonoverlapping(items.as_ptr(), array.buf.ptr(), items.len());
            array.len = items.len();
            items.set_len(0);
        }
        Ok(array)
    }

    /// Number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the array is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current allocation can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Growth policy used when the array runs out of room.
    #[inline]
    pub fn growth_policy(&self) -> &GrowthPolicy {
        &self.growth
    }

    /// Live elements as a slice (the span view).
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// Live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Checked access returning `IndexOutOfRange` on a bad index.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        check_bounds(index, self.len)?;
        Ok(unsafe { &*self.buf.slot(index) })
    }

    /// Checked mutable access.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        check_bounds(index, self.len)?;
        Ok(unsafe { &mut *self.buf.slot(index) })
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        let slot = self.at_mut(index)?;
        let old = mem::replace(slot, value);
        self.bump();
        Ok(old)
    }

    /// Append an element, growing if needed.
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == self.capacity() {
            self.grow_for(1)?;
        }
        unsafe { self.buf.slot(self.len).write(value) };
        self.len += 1;
        self.bump();
        Ok(())
    }

    /// Insert `value` at `index`, shifting the tail right.
    ///
    /// `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(AllocOptError::index_out_of_range(index, self.len));
        }
        if self.len == self.capacity() {
            self.grow_for(1)?;
        }
        unsafe {
            let p = self.buf.slot(index);
            ptr::copy(p, p.add(1), self.len - index);
            p.write(value);
        }
        self.len += 1;
        self.bump();
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the tail left.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        check_bounds(index, self.len)?;
        let value = unsafe {
            let p = self.buf.slot(index);
            let value = p.read();
            ptr::copy(p.add(1), p, self.len - index - 1);
            value
        };
        self.len -= 1;
        self.bump();
        Ok(value)
    }

    /// Remove `count` elements starting at `index`.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        let end = index
            .checked_add(count)
            .ok_or_else(|| AllocOptError::index_out_of_range(index, self.len))?;
        check_range(index, end, self.len)?;
        if count == 0 {
            return Ok(());
        }

        let old_len = self.len;
        // Drop glue may panic; the tail is leaked rather than double-dropped.
        self.len = index;
        self.bump();
        unsafe {
            let base = self.buf.ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(index), count));
            ptr::copy(base.add(end), base.add(index), old_len - end);
        }
        self.len = old_len - count;
        Ok(())
    }

    /// Remove every element matching `predicate` in a single left-compaction
    /// pass. Survivors keep their relative order. Returns the removed count.
    pub fn remove_all<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let len = self.len;
        let base = self.buf.ptr();
        self.len = 0;

        let mut compact = Compaction {
            array: self,
            base,
            read: 0,
            write: 0,
            len,
        };

        while compact.read < compact.len {
            unsafe {
                let current = compact.base.add(compact.read);
                if predicate(&*current) {
                    compact.read += 1;
                    ptr::drop_in_place(current);
                } else {
                    if compact.read != compact.write {
                        ptr::copy_nonoverlapping(current, compact.base.add(compact.write), 1);
                    }
                    compact.write += 1;
                    compact.read += 1;
                }
            }
        }

        let removed = compact.len - compact.write;
        drop(compact);
        if removed > 0 {
            self.bump();
        }
        removed
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.bump();
        Some(unsafe { self.buf.slot(self.len).read() })
    }

    /// Drop everything past `len`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        self.len = len;
        self.bump();
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr().add(len), tail));
        }
    }

    /// Remove every element, keeping the allocation.
    ///
    /// Constant time for element types without drop glue; otherwise every
    /// element is dropped so nothing it owns outlives the call.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        self.bump();
        if mem::needs_drop::<T>() {
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr(), len));
            }
        }
    }

    /// Grow so that at least `capacity` elements fit. Never shrinks.
    /// Returns the resulting capacity.
    pub fn ensure_capacity(&mut self, capacity: usize) -> Result<usize> {
        if capacity > self.capacity() {
            let new_cap = self.growth.next_capacity::<T>(self.capacity(), capacity)?;
            self.reallocate(new_cap)?;
        }
        Ok(self.capacity())
    }

    fn ensure_capacity_exact(&mut self, capacity: usize) -> Result<()> {
        if capacity > self.capacity() {
            let max = self.growth.max_for::<T>();
            if capacity > max {
                return Err(AllocOptError::capacity_overflow(capacity, max));
            }
            self.reallocate(capacity)?;
        }
        Ok(())
    }

    /// Reallocate down to exactly `len` slots.
    pub fn trim_excess(&mut self) -> Result<()> {
        self.trim_excess_to(self.len)
    }

    /// Reallocate to exactly `capacity` slots, which must hold every live
    /// element.
    pub fn trim_excess_to(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.len {
            return Err(AllocOptError::index_out_of_range(capacity, self.len));
        }
        if capacity < self.capacity() {
            self.reallocate(capacity)?;
        }
        Ok(())
    }

    /// Append clones of every element of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let required = self.growth.required::<T>(self.len, items.len())?;
        if required > self.capacity() {
            self.grow_for(items.len())?;
        }
        for item in items {
            unsafe { self.buf.slot(self.len).write(item.clone()) };
            self.len += 1;
        }
        self.bump();
        Ok(())
    }

    /// Iterate over the live elements.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over the live elements.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    fn grow_for(&mut self, additional: usize) -> Result<()> {
        let required = self.growth.required::<T>(self.len, additional)?;
        let new_cap = self.growth.next_capacity::<T>(self.capacity(), required)?;
        self.reallocate(new_cap)
    }

    fn reallocate(&mut self, new_cap: usize) -> Result<()> {
        let old_cap = self.capacity();
        self.buf.realloc(new_cap)?;
        log::trace!(
            "DynamicArray<{}>: capacity {} -> {}",
            std::any::type_name::<T>(),
            old_cap,
            new_cap
        );
        Ok(())
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Keeps the array consistent if the predicate or a destructor panics
/// mid-compaction: the unvisited tail is shifted down behind the survivors.
struct Compaction<'a, T> {
    array: &'a mut DynamicArray<T>,
    base: *mut T,
    read: usize,
    write: usize,
    len: usize,
}

impl<T> Drop for Compaction<'_, T> {
    fn drop(&mut self) {
        let rest = self.len - self.read;
        if rest > 0 && self.read != self.write {
            unsafe { ptr::copy(self.base.add(self.read), self.base.add(self.write), rest) };
        }
        self.array.len = self.write + rest;
    }
}

impl<T> Versioned for DynamicArray<T> {
    type Item = T;

    #[inline]
    fn version(&self) -> u64 {
        self.version
    }

    fn item_at(&self, position: usize) -> Option<(&T, usize)> {
        self.as_slice().get(position).map(|item| (item, position + 1))
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr(), self.len));
            }
        }
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for DynamicArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(item) => item,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> IndexMut<usize> for DynamicArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(item) => item,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: Clone> Clone for DynamicArray<T> {
    /// # Panics
    ///
    /// Only if the allocator cannot provide a second buffer of the same size.
    fn clone(&self) -> Self {
        let mut copy = match Self::with_capacity(self.len) {
            Ok(copy) => copy,
            Err(e) => panic!("{}", e),
        };
        copy.growth = self.growth;
        for item in self.as_slice() {
            unsafe { copy.buf.slot(copy.len).write(item.clone()) };
            copy.len += 1;
        }
        copy
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        match Self::from_vec(iter.into_iter().collect()) {
            Ok(array) => array,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let array = ManuallyDrop::new(self);
        IntoIter {
            buf: unsafe { ptr::read(&array.buf) },
            front: 0,
            back: array.len,
        }
    }
}

/// Owning iterator over a [`DynamicArray`].
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    front: usize,
    back: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let item = unsafe { self.buf.ptr().add(self.front).read() };
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(unsafe { self.buf.ptr().add(self.back).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let rest = self.back - self.front;
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.ptr().add(self.front),
                rest,
            ));
        }
    }
}
