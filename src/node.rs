//! Node layout and addressing arithmetic for the packed arena.
//!
//! A node is not a separate object — it is a byte-offset view into the
//! arena: a fixed-width value followed by a left and a right child index,
//! each `index_len` bytes wide, big-endian, unsigned. A node occupies
//! exactly `node_len = value_len + 2 * index_len` bytes at offset
//! `slot * node_len`.
//!
//! # Invariants
//! - Slot 0 holds the first value ever inserted and is the tree root, so
//!   no real child can legitimately be slot 0; index 0 is therefore the
//!   reserved no-child sentinel. This is why the arena must be
//!   zero-initialized at construction.
//! - `index_len` is the smallest whole-byte width whose bits can address
//!   every slot number in `[0, capacity)`. It is 0 when `capacity <= 1`:
//!   a one-slot tree can never have a child, and a zero-width index
//!   always decodes to the sentinel.

use std::ops::Range;

/// The reserved child index meaning "no child".
pub(crate) const NO_CHILD: usize = 0;

/// Which child link of a node to follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// Fixed per-cache node geometry: value width and child-index width.
///
/// Both widths are decided at construction and never change, so every
/// slot offset is a pure function of the slot number.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeLayout {
    value_len: usize,
    index_len: usize,
}

impl NodeLayout {
    pub(crate) fn new(value_len: usize, capacity: usize) -> Self {
        Self {
            value_len,
            index_len: index_len_for(capacity),
        }
    }

    #[inline]
    pub(crate) fn value_len(&self) -> usize {
        self.value_len
    }

    /// Length of one node slot, in bytes.
    #[inline]
    pub(crate) fn node_len(&self) -> usize {
        self.value_len + 2 * self.index_len
    }

    /// Byte range of the value field of the node at `slot`.
    #[inline]
    pub(crate) fn value_range(&self, slot: usize) -> Range<usize> {
        let start = slot * self.node_len();
        start..start + self.value_len
    }

    #[inline]
    fn index_range(&self, slot: usize, side: Side) -> Range<usize> {
        let mut start = slot * self.node_len() + self.value_len;
        if side == Side::Right {
            start += self.index_len;
        }
        start..start + self.index_len
    }

    /// Reads the child index on `side` of the node at `slot`.
    ///
    /// Returns [`NO_CHILD`] when the link has never been written.
    #[inline]
    pub(crate) fn child(&self, arena: &[u8], slot: usize, side: Side) -> usize {
        decode_index(&arena[self.index_range(slot, side)])
    }

    /// Writes the child index on `side` of the node at `slot`.
    #[inline]
    pub(crate) fn set_child(&self, arena: &mut [u8], slot: usize, side: Side, target: usize) {
        encode_index(&mut arena[self.index_range(slot, side)], target);
    }
}

/// Smallest whole-byte width that can address every slot in
/// `[0, capacity)`.
pub(crate) fn index_len_for(capacity: usize) -> usize {
    if capacity <= 1 {
        return 0;
    }
    let bits = usize::BITS - (capacity - 1).leading_zeros();
    bits.div_ceil(8) as usize
}

/// Decodes a big-endian unsigned integer of `bytes.len()` bytes.
///
/// Zero-width slices decode to 0, which is the no-child sentinel.
#[inline]
fn decode_index(bytes: &[u8]) -> usize {
    let mut value = 0usize;
    for &b in bytes {
        value = (value << 8) | b as usize;
    }
    value
}

/// Encodes `value` big-endian into `bytes.len()` bytes.
#[inline]
fn encode_index(bytes: &mut [u8], value: usize) {
    debug_assert!(
        bytes.len() >= 8 || value < 1usize << (8 * bytes.len()),
        "index {value} does not fit in {} bytes",
        bytes.len()
    );
    let mut v = value;
    for b in bytes.iter_mut().rev() {
        *b = v as u8;
        v >>= 8;
    }
}
