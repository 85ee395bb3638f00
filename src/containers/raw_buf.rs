//! Uninitialized backing storage shared by the contiguous containers.
//!
//! `RawBuf` owns an allocation and nothing else: it never reads, writes or
//! drops elements. Callers track which slots are initialized.

use crate::error::{AllocOptError, Result};
use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

// Safety: RawBuf owns its allocation exactly like Box<[MaybeUninit<T>]>
unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Empty buffer. Zero-sized types report unbounded capacity.
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            _marker: PhantomData,
        }
    }

    /// Buffer with exactly `cap` slots.
    pub(crate) fn with_capacity(cap: usize) -> Result<Self> {
        let mut buf = Self::new();
        buf.realloc(cap)?;
        Ok(buf)
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be within capacity.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index < self.cap);
        unsafe { self.ptr.as_ptr().add(index) }
    }

    fn layout(cap: usize) -> Result<Layout> {
        Layout::array::<T>(cap).map_err(|_| {
            AllocOptError::capacity_overflow(cap, isize::MAX as usize / mem::size_of::<T>().max(1))
        })
    }

    /// Resize the allocation to exactly `new_cap` slots, keeping the bytes of
    /// the first `min(old, new)` slots in place.
    ///
    /// The caller must have moved or dropped anything stored at or beyond
    /// `new_cap`. A no-op for zero-sized types.
    pub(crate) fn realloc(&mut self, new_cap: usize) -> Result<()> {
        if Self::IS_ZST || new_cap == self.cap {
            return Ok(());
        }

        if new_cap == 0 {
            self.release();
            return Ok(());
        }

        let new_layout = Self::layout(new_cap)?;
        let raw = if self.cap == 0 {
            unsafe { alloc::alloc(new_layout) }
        } else {
            let old_layout = Self::layout(self.cap)?;
            unsafe { alloc::realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_layout.size()) }
        };

        self.ptr = match NonNull::new(raw as *mut T) {
            Some(ptr) => ptr,
            None => alloc::handle_alloc_error(new_layout),
        };
        self.cap = new_cap;
        Ok(())
    }

    /// Copy `count` slots starting at `src` in `self` to `dst` in `other`.
    ///
    /// # Safety
    ///
    /// Both ranges must be within the respective capacities; the source slots
    /// are logically moved out.
    #[inline]
    pub(crate) unsafe fn move_to(&self, src: usize, other: &mut RawBuf<T>, dst: usize, count: usize) {
        if count == 0 || Self::IS_ZST {
            return;
        }
        unsafe {
            ptr::copy_nonoverlapping(self.ptr().add(src), other.ptr().add(dst), count);
        }
    }

    fn release(&mut self) {
        if !Self::IS_ZST && self.cap > 0 {
            if let Ok(layout) = Self::layout(self.cap) {
                unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) };
            }
        }
        self.ptr = NonNull::dangling();
        if !Self::IS_ZST {
            self.cap = 0;
        }
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let buf: RawBuf<u64> = RawBuf::new();
        assert_eq!(buf.capacity(), 0);

        let zst: RawBuf<()> = RawBuf::new();
        assert_eq!(zst.capacity(), usize::MAX);
    }

    #[test]
    fn test_realloc_preserves_prefix() {
        let mut buf: RawBuf<u32> = RawBuf::with_capacity(4).unwrap();
        for i in 0..4 {
            unsafe { buf.slot(i).write(i as u32 * 10) };
        }

        buf.realloc(16).unwrap();
        assert_eq!(buf.capacity(), 16);
        for i in 0..4 {
            assert_eq!(unsafe { buf.slot(i).read() }, i as u32 * 10);
        }

        buf.realloc(2).unwrap();
        assert_eq!(buf.capacity(), 2);
        assert_eq!(unsafe { buf.slot(1).read() }, 10);

        buf.realloc(0).unwrap();
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_move_to() {
        let src: RawBuf<u16> = RawBuf::with_capacity(4).unwrap();
        for i in 0..4 {
            unsafe { src.slot(i).write(i as u16) };
        }
        let mut dst: RawBuf<u16> = RawBuf::with_capacity(8).unwrap();
        unsafe { src.move_to(2, &mut dst, 5, 2) };
        assert_eq!(unsafe { dst.slot(5).read() }, 2);
        assert_eq!(unsafe { dst.slot(6).read() }, 3);
    }

    #[test]
    fn test_overflowing_layout() {
        let result = RawBuf::<u64>::with_capacity(usize::MAX);
        assert!(matches!(result, Err(AllocOptError::CapacityOverflow { .. })));
    }
}
