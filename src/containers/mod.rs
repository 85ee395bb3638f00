//! Growable containers over contiguous storage
//!
//! ## Sequential containers
//!
//! - **`DynamicArray<T>`** - realloc-backed growable array, the base of `List` and `Stack`
//! - **`List<T>`** - indexable list with search and bulk removal
//! - **`Stack<T>`** - LIFO facade
//!
//! ## Circular containers
//!
//! - **`RingBuffer<T>`** - two-ended circular buffer with wrapped views
//! - **`Deque<T>`** / **`Queue<T>`** - facades over the ring buffer
//!
//! ## Arena containers
//!
//! - **`ArenaLinkedList<T>`** - doubly linked list in one slot array with
//!   generation-checked [`ListNode`] handles
//!
//! Every container bumps a version counter on structural change; a detached
//! [`Cursor`] checks it on every step.

pub(crate) mod arena;
pub mod arena_list;
pub mod collection;
pub mod cursor;
pub mod deque;
pub mod dynamic_array;
pub mod growth;
pub mod list;
pub mod queue;
pub(crate) mod raw_buf;
pub mod ring_buffer;
pub mod stack;

pub use arena_list::{ArenaLinkedList, ListNode};
pub use collection::Collection;
pub use cursor::{Cursor, Versioned};
pub use deque::Deque;
pub use dynamic_array::DynamicArray;
pub use growth::GrowthPolicy;
pub use list::List;
pub use queue::Queue;
pub use ring_buffer::{RingBuffer, TwoPartSlice};
pub use stack::Stack;
