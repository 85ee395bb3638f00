//! Transient visited-set over hash table slot indices.
//!
//! Sized to the table's slot count, not its length, and only meaningful until
//! the table is next mutated. Set algebra builds one per call.

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Debug, Clone, Default)]
pub(crate) struct SlotBitmap {
    words: Vec<u64>,
    ones: usize,
}

impl SlotBitmap {
    pub(crate) fn new(slots: usize) -> Self {
        Self {
            words: vec![0; slots.div_ceil(WORD_BITS)],
            ones: 0,
        }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .map_or(false, |word| word & (1 << (index % WORD_BITS)) != 0)
    }

    /// Mark `index`; returns true if it was not marked before. Grows when the
    /// table gained slots since the bitmap was sized.
    pub(crate) fn set(&mut self, index: usize) -> bool {
        let word = index / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1 << (index % WORD_BITS);
        let fresh = self.words[word] & mask == 0;
        if fresh {
            self.words[word] |= mask;
            self.ones += 1;
        }
        fresh
    }

    /// Number of marked slots.
    #[inline]
    pub(crate) fn count_ones(&self) -> usize {
        self.ones
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut bits = SlotBitmap::new(100);
        assert!(!bits.get(63));
        assert!(bits.set(63));
        assert!(!bits.set(63));
        assert!(bits.set(64));
        assert!(bits.get(63) && bits.get(64));
        assert!(!bits.get(65));
        assert_eq!(bits.count_ones(), 2);
    }

    #[test]
    fn test_grows_past_initial_size() {
        let mut bits = SlotBitmap::new(0);
        assert!(!bits.get(500));
        assert!(bits.set(500));
        assert!(bits.get(500));
        assert_eq!(bits.count_ones(), 1);
    }
}
