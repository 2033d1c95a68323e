//! # packset
//!
//! An exact (non-probabilistic) set-membership cache for fixed-width byte
//! values, packed into a single contiguous byte arena.
//!
//! The cache is an insert-only binary search tree encoded directly inside
//! one pre-allocated buffer instead of a graph of heap-allocated nodes:
//!
//! - **One allocation**: the arena is sized and zeroed at construction and
//!   never grows, so memory use is bounded up front.
//! - **Compressed pointers**: child links are slot indices encoded in the
//!   fewest whole bytes that can address the configured capacity — one byte
//!   up to 256 slots, two up to 65536, and so on.
//! - **Exact answers**: unlike a Bloom filter, `recall` never reports a
//!   false positive or false negative.
//! - **Persistence**: a populated cache can be written to any byte sink and
//!   reloaded later; only the distinct values are stored, since insertion
//!   order determines the tree shape.
//!
//! Values must all share one fixed byte width; callers with variable-length
//! data should hash or truncate it first. The tree is never rebalanced, so
//! inserting values in sorted order degrades lookups to linear time —
//! hashing before insertion also sidesteps that.
//!
//! ## Example
//!
//! ```rust
//! use packset::Cache;
//!
//! let cache = Cache::new128(1024);
//!
//! cache.insert(&[7u8; 16]).unwrap();
//! assert!(cache.recall(&[7u8; 16]).unwrap());
//! assert!(!cache.recall(&[9u8; 16]).unwrap());
//! assert_eq!(cache.len(), 1);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
mod error;
mod node;

pub use cache::Cache;
pub use error::{Error, Result};

#[cfg(test)]
mod proptests;
