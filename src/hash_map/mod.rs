//! Hash-based collections
//!
//! One engine, two facades:
//! - `HashTable`: chained table over a single entry array with free-slot
//!   recycling, generic over a dual-mode `EntryComparer`
//! - `Set`: unique values plus set algebra
//! - `Dictionary`: key/value pairs probed by key

mod bitmap;
pub mod comparer;
pub mod dictionary;
pub mod set;
pub mod table;

pub use comparer::{DefaultComparer, EntryComparer, EqualityComparer, PairComparer, SetComparer};
pub use dictionary::Dictionary;
pub use set::Set;
pub use table::{Entry, HashTable, OccupiedEntry, VacantEntry};
