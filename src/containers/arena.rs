//! Slot bookkeeping shared by the arena-indexed containers.
//!
//! Every arena slot carries a 32-bit version word:
//!
//! ```text
//!  31                               2   1   0
//! +----------------------------------+---+---+
//! |           generation             |END|OCC|
//! +----------------------------------+---+---+
//! ```
//!
//! `OCC` is set while the slot holds a live node. `END` is only used by the
//! prefix tree to mark the last node of a stored sequence. The generation
//! advances every time a slot is reoccupied, so a handle minted for an earlier
//! occupant never matches again.

use crate::error::{AllocOptError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// Link value meaning "no slot".
pub(crate) const NIL: u32 = u32::MAX;

/// Largest slot count addressable with `u32` links.
pub(crate) const MAX_SLOTS: usize = NIL as usize;

const OCCUPIED: u32 = 0b01;
const END: u32 = 0b10;
const FLAGS: u32 = OCCUPIED | END;
const GENERATION_STEP: u32 = 0b100;

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Fresh identity for a newly created arena.
pub(crate) fn next_arena_id() -> u64 {
    NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SlotVersion(u32);

impl SlotVersion {
    pub(crate) const FREE: Self = Self(0);

    #[inline]
    pub(crate) fn is_occupied(self) -> bool {
        self.0 & OCCUPIED != 0
    }

    #[inline]
    pub(crate) fn is_end(self) -> bool {
        self.0 & END != 0
    }

    /// Version for the next occupant of a free slot.
    #[inline]
    pub(crate) fn occupy(self) -> Self {
        Self((self.0 & !FLAGS).wrapping_add(GENERATION_STEP) | OCCUPIED)
    }

    /// Version of the slot once its occupant is gone.
    #[inline]
    pub(crate) fn release(self) -> Self {
        Self(self.0 & !FLAGS)
    }

    #[inline]
    pub(crate) fn with_end(self, end: bool) -> Self {
        if end {
            Self(self.0 | END)
        } else {
            Self(self.0 & !END)
        }
    }

    /// Identity part of the version: everything but the end marker.
    #[inline]
    pub(crate) fn stamp(self) -> u32 {
        self.0 & !END
    }
}

/// Weak reference into an arena: identity of the arena, slot index and the
/// stamp of the occupant it was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle {
    pub(crate) arena: u64,
    pub(crate) index: u32,
    pub(crate) stamp: u32,
}

impl Handle {
    #[inline]
    pub(crate) fn new(arena: u64, index: u32, version: SlotVersion) -> Self {
        Self {
            arena,
            index,
            stamp: version.stamp(),
        }
    }

    /// Slot index if the handle belongs to `arena` and still matches
    /// `current`.
    #[inline]
    pub(crate) fn resolve(&self, arena: u64, current: Option<SlotVersion>) -> Result<usize> {
        match current {
            Some(version)
                if self.arena == arena && version.is_occupied() && version.stamp() == self.stamp =>
            {
                Ok(self.index as usize)
            }
            _ => Err(AllocOptError::node_invalidated(self.index as usize)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_transitions() {
        let free = SlotVersion::FREE;
        assert!(!free.is_occupied());

        let live = free.occupy();
        assert!(live.is_occupied());
        assert!(!live.is_end());

        let released = live.release();
        assert!(!released.is_occupied());
        assert_ne!(released.stamp(), live.stamp());

        let reused = released.occupy();
        assert!(reused.is_occupied());
        assert_ne!(reused.stamp(), live.stamp());
    }

    #[test]
    fn test_end_flag_does_not_change_stamp() {
        let live = SlotVersion::FREE.occupy();
        let ended = live.with_end(true);
        assert!(ended.is_end());
        assert_eq!(ended.stamp(), live.stamp());
        assert!(!ended.with_end(false).is_end());
        assert!(!ended.release().is_end());
    }

    #[test]
    fn test_generation_wraps() {
        let v = SlotVersion(u32::MAX & !FLAGS).occupy();
        assert!(v.is_occupied());
        assert_eq!(v.0, OCCUPIED);
    }

    #[test]
    fn test_handle_resolution() {
        let arena = next_arena_id();
        let version = SlotVersion::FREE.occupy();
        let handle = Handle::new(arena, 3, version);

        assert_eq!(handle.resolve(arena, Some(version)).unwrap(), 3);
        assert_eq!(handle.resolve(arena, Some(version.with_end(true))).unwrap(), 3);
        assert!(handle.resolve(arena, Some(version.release())).is_err());
        assert!(handle.resolve(arena, Some(version.release().occupy())).is_err());
        assert!(handle.resolve(arena + 1, Some(version)).is_err());
        assert_eq!(
            handle.resolve(arena, None).unwrap_err(),
            AllocOptError::node_invalidated(3)
        );
    }

    #[test]
    fn test_arena_ids_are_unique() {
        let a = next_arena_id();
        let b = next_arena_id();
        assert_ne!(a, b);
    }
}
