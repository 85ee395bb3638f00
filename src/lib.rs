//! # allocopt: Allocation-Conscious Collections
//!
//! Low-level container types with explicit control over allocation, resizing
//! and iteration cost.
//!
//! ## Key Features
//!
//! - **Growable arrays**: [`List`] and [`Stack`] over a contiguous
//!   [`DynamicArray`] with a configurable [`GrowthPolicy`]
//! - **Ring buffers**: [`Deque`] and [`Queue`] over a wrap-around
//!   [`RingBuffer`] with two-part slice views
//! - **Open-addressing hash tables**: [`Set`] and [`Dictionary`] share one
//!   [`HashTable`] engine with free-list slot recycling and a dual-mode
//!   (full value or key-only) comparer
//! - **Arena-indexed structures**: [`ArenaLinkedList`] and [`ArenaPrefixTree`]
//!   address nodes by generation-tagged indices instead of pointers
//! - **Fail-fast enumeration**: detached [`Cursor`]s detect structural
//!   modification through per-container version counters
//!
//! ## Quick Start
//!
//! ```rust
//! use allocopt::{ArenaLinkedList, Deque, Dictionary, PrefixTree, Set};
//!
//! # fn main() -> allocopt::Result<()> {
//! let mut deque = Deque::with_capacity(4)?;
//! for i in 1..=4 {
//!     deque.enqueue_last(i)?;
//! }
//! deque.enqueue_first(0)?;
//! assert_eq!(deque.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
//!
//! let mut dict = Dictionary::new();
//! dict.add("a", 1)?;
//! dict.add("b", 2)?;
//! dict.remove(&"a");
//! assert_eq!(dict.get(&"a"), None);
//! assert_eq!(dict.get(&"b"), Some(&2));
//!
//! let mut set: Set<u32> = (0..10).collect();
//! set.intersect_with(5u32..20);
//! assert_eq!(set.len(), 5);
//!
//! let mut list = ArenaLinkedList::new();
//! let node = list.add_last("x")?;
//! list.remove_node(node)?;
//! assert!(list.value(node).is_err());
//!
//! let mut trie = PrefixTree::new();
//! trie.try_add("cat".chars(), ());
//! trie.try_add("car".chars(), ());
//! trie.remove("cat".chars());
//! assert!(trie.contains_prefix("ca".chars()));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod containers;
pub mod error;
pub mod hash_map;
pub mod trie;

#[cfg(feature = "serialize")]
mod serde_impls;

pub use config::{BucketSizing, Config, GrowthConfig, HashTableConfig};
pub use containers::{
    ArenaLinkedList, Collection, Cursor, Deque, DynamicArray, GrowthPolicy, List, ListNode,
    Queue, RingBuffer, Stack, TwoPartSlice, Versioned,
};
pub use error::{AllocOptError, Result};
pub use hash_map::{
    DefaultComparer, Dictionary, EntryComparer, EqualityComparer, HashTable, PairComparer, Set,
    SetComparer,
};
pub use trie::{ArenaPrefixTree, PrefixNode, PrefixTree, TrieNode};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version banner)
pub fn init() {
    log::debug!("Initializing allocopt v{}", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        init();
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_info() {
        assert!(VERSION.contains('.'));
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2);
    }

    #[test]
    fn test_re_exports() {
        let _list = List::<i32>::new();
        let _deque = Deque::<i32>::new();
        let _set = Set::<i32>::new();
        let _dict = Dictionary::<i32, i32>::new();
        let _trie = ArenaPrefixTree::<u8, ()>::new();

        let _err = AllocOptError::KeyNotFound;
        assert!(std::any::type_name::<Result<()>>().contains("AllocOptError"));
    }

    #[test]
    fn test_multiple_init_calls() {
        init();
        init();
    }
}
