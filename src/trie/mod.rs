//! Prefix trees over sequences of arbitrary elements
//!
//! Two layouts with the same contract:
//! - `PrefixTree`: nodes own their children directly
//! - `ArenaPrefixTree`: nodes live in one slot array and are addressed by
//!   generation-checked [`TrieNode`] handles
//!
//! Both compare elements through an [`EqualityComparer`](crate::EqualityComparer)
//! and prune the branch of a removed sequence up to the first ancestor that
//! still ends another sequence or has other children.

pub mod arena_prefix_tree;
pub mod prefix_tree;

pub use arena_prefix_tree::{ArenaPrefixTree, TrieNode};
pub use prefix_tree::{PrefixNode, PrefixTree};
