//! Fail-fast enumeration through detached cursors.
//!
//! Borrowing iterators (`iter()`) cannot observe a mutation, the borrow
//! checker rules that out. A [`Cursor`] is the other enumeration mode: it
//! holds only a captured version and a position, so the container stays
//! mutable between steps and every step re-checks the version.

use crate::error::{AllocOptError, Result};

/// A container whose structural mutations bump a version counter and whose
/// elements can be addressed by an enumeration position.
pub trait Versioned {
    /// Element type yielded by enumeration.
    type Item;

    /// Current structural version. Any mutation that adds, removes or
    /// relocates elements changes it.
    fn version(&self) -> u64;

    /// Position of the first element.
    fn cursor_start(&self) -> usize {
        0
    }

    /// Element at `position` together with the position that follows it, or
    /// `None` once enumeration is exhausted.
    fn item_at(&self, position: usize) -> Option<(&Self::Item, usize)>;

    /// Start a detached enumeration at the current version.
    fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }
}

/// Detached enumerator state.
///
/// # Examples
///
/// ```rust
/// use allocopt::{List, Versioned, AllocOptError};
///
/// let mut list: List<i32> = (1..=3).collect();
/// let mut cursor = list.cursor();
/// assert_eq!(cursor.next(&list).unwrap(), Some(&1));
///
/// list.add(4).unwrap();
/// assert!(matches!(
///     cursor.next(&list),
///     Err(AllocOptError::ConcurrentModification { .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    version: u64,
    position: usize,
    exhausted: bool,
}

impl Cursor {
    /// Capture `source`'s version and start position.
    pub fn new<S: Versioned + ?Sized>(source: &S) -> Self {
        Self {
            version: source.version(),
            position: source.cursor_start(),
            exhausted: false,
        }
    }

    /// Version captured at creation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Advance and return the next element of `source`.
    ///
    /// # Errors
    ///
    /// `ConcurrentModification` whenever `source` was structurally modified
    /// after this cursor was created. The cursor stays failed; request a new
    /// one to restart.
    pub fn next<'a, S: Versioned + ?Sized>(&mut self, source: &'a S) -> Result<Option<&'a S::Item>> {
        let actual = source.version();
        if actual != self.version {
            return Err(AllocOptError::concurrent_modification(self.version, actual));
        }

        if self.exhausted {
            return Ok(None);
        }

        match source.item_at(self.position) {
            Some((item, next)) => {
                self.position = next;
                Ok(Some(item))
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    /// Drain the remaining elements into a vector, failing on the first
    /// version mismatch.
    pub fn collect_remaining<'a, S: Versioned + ?Sized>(
        &mut self,
        source: &'a S,
    ) -> Result<Vec<&'a S::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next(source)? {
            items.push(item);
        }
        Ok(items)
    }
}
