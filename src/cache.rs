//! The packed binary-search-tree membership cache.

use std::cmp::Ordering;
use std::io::{Read, Write};

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::node::{NodeLayout, Side, NO_CHILD};

/// Mutable state guarded by the cache's lock: the arena and the number
/// of occupied slots. The occupied slots are always the contiguous
/// prefix `[0, length)` of the arena, claimed in insertion order.
struct State {
    arena: Vec<u8>,
    length: usize,
}

/// An exact set-membership cache for fixed-width byte values, stored as
/// an insert-only binary search tree packed into one byte arena.
///
/// The arena is allocated and zeroed once at construction and never
/// resized; `capacity * node_len` bytes is the cache's entire memory
/// footprint. Values are ordered by byte-lexicographic comparison, and
/// child links are slot indices sized to the capacity (see
/// [`size`](Cache::size)).
///
/// There is no delete operation and the tree is never rebalanced:
/// inserting values in sorted order degrades traversal depth to O(n).
/// Callers with adversarial or sorted inputs should hash values before
/// inserting them.
///
/// # Concurrency
///
/// All methods take `&self`; one reader-writer lock guards the arena and
/// length together. [`insert`](Cache::insert) and [`load`](Cache::load)
/// hold the write lock for their full duration, while
/// [`recall`](Cache::recall), [`last`](Cache::last),
/// [`full`](Cache::full), [`len`](Cache::len), and
/// [`save`](Cache::save) share the read lock. This diverges from the
/// reference behavior this crate reimplements, which left readers
/// unsynchronized and could tear a read that raced a writer; here
/// readers always observe a fully-written tree.
pub struct Cache {
    layout: NodeLayout,
    capacity: usize,
    state: RwLock<State>,
}

impl Cache {
    /// Creates a cache holding up to `capacity` values of `value_bits`
    /// bits each.
    ///
    /// Allocates and zeroes the entire arena up front; a cache cannot
    /// exist without its arena, so allocation failure aborts via the
    /// global allocator rather than returning an error.
    pub fn new(value_bits: u32, capacity: u32) -> Self {
        let capacity = capacity as usize;
        let layout = NodeLayout::new((value_bits / 8) as usize, capacity);
        Self {
            layout,
            capacity,
            state: RwLock::new(State {
                arena: vec![0u8; capacity * layout.node_len()],
                length: 0,
            }),
        }
    }

    /// Creates a cache holding up to `capacity` 128-bit values.
    pub fn new128(capacity: u32) -> Self {
        Self::new(128, capacity)
    }

    /// Inserts a value. Inserting a value that is already present is a
    /// silent no-op, not an error.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if `value` is not exactly
    /// [`value_len`](Cache::value_len) bytes, [`Error::CacheFull`] if
    /// every slot is occupied (even when the value is already present).
    pub fn insert(&self, value: &[u8]) -> Result<()> {
        self.check_len(value)?;
        let mut state = self.state.write();
        self.insert_locked(&mut state, value)
    }

    /// Insertion descent. Caller must hold the write lock.
    fn insert_locked(&self, state: &mut State, value: &[u8]) -> Result<()> {
        if state.length == self.capacity {
            return Err(Error::CacheFull {
                capacity: self.capacity,
            });
        }

        // First value ever: it becomes the root at slot 0. Writing it
        // directly (instead of comparing against the zeroed slot) keeps
        // the all-zero value insertable like any other.
        if state.length == 0 {
            let range = self.layout.value_range(0);
            state.arena[range].copy_from_slice(value);
            state.length = 1;
            return Ok(());
        }

        let mut slot = 0;
        loop {
            let side = match value.cmp(&state.arena[self.layout.value_range(slot)]) {
                Ordering::Equal => return Ok(()),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            let child = self.layout.child(&state.arena, slot, side);
            if child == NO_CHILD {
                // Append-only: new nodes always claim the next free
                // slot, and a written slot is never moved.
                let next = state.length;
                let range = self.layout.value_range(next);
                state.arena[range].copy_from_slice(value);
                self.layout.set_child(&mut state.arena, slot, side, next);
                state.length += 1;
                return Ok(());
            }
            slot = child;
        }
    }

    /// Returns whether a value has been inserted.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if `value` is not exactly
    /// [`value_len`](Cache::value_len) bytes.
    pub fn recall(&self, value: &[u8]) -> Result<bool> {
        self.check_len(value)?;
        let state = self.state.read();
        if state.length == 0 {
            return Ok(false);
        }

        let mut slot = 0;
        loop {
            let side = match value.cmp(&state.arena[self.layout.value_range(slot)]) {
                Ordering::Equal => return Ok(true),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            let child = self.layout.child(&state.arena, slot, side);
            if child == NO_CHILD {
                return Ok(false);
            }
            slot = child;
        }
    }

    /// Returns the most recently inserted value, or `None` if the cache
    /// is empty.
    pub fn last(&self) -> Option<Vec<u8>> {
        let state = self.state.read();
        if state.length == 0 {
            return None;
        }
        Some(state.arena[self.layout.value_range(state.length - 1)].to_vec())
    }

    /// Returns whether every slot is occupied.
    pub fn full(&self) -> bool {
        self.state.read().length == self.capacity
    }

    /// Returns the number of values currently cached.
    pub fn len(&self) -> usize {
        self.state.read().length
    }

    /// Returns whether no values have been cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the size of the underlying arena, in bytes.
    pub fn size(&self) -> usize {
        self.capacity * self.layout.node_len()
    }

    /// Returns the maximum number of values the cache can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured value width, in bytes.
    pub fn value_len(&self) -> usize {
        self.layout.value_len()
    }

    /// Writes all cached values to `writer` in insertion order, after a
    /// header recording the value width and count.
    ///
    /// The format is `[u32 BE value_len][u32 BE count]` followed by
    /// `count` raw values — no padding, checksum, or version tag. Only
    /// the distinct values are written, not the tree topology; replaying
    /// them in order through [`load`](Cache::load) reproduces the shape.
    ///
    /// # Errors
    ///
    /// Any error from `writer` is propagated verbatim and aborts the
    /// save at the point of failure.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        let state = self.state.read();
        writer.write_all(&(self.layout.value_len() as u32).to_be_bytes())?;
        writer.write_all(&(state.length as u32).to_be_bytes())?;
        for slot in 0..state.length {
            writer.write_all(&state.arena[self.layout.value_range(slot)])?;
        }
        Ok(())
    }

    /// Counterpart to [`save`](Cache::save): reads a header and values
    /// from `reader` and inserts each value in stored order.
    ///
    /// Loading into an empty cache reproduces the saved tree; loading
    /// into a non-empty cache merges the two value sets, with duplicates
    /// silently coalescing.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] if the stored value width differs from
    /// this cache's, [`Error::CacheFull`] if the stored count exceeds
    /// the remaining free slots, and any `reader` error verbatim. An
    /// error mid-stream aborts immediately: values already inserted
    /// remain, with no rollback.
    pub fn load<R: Read>(&self, reader: &mut R) -> Result<()> {
        let mut header = [0u8; 4];
        reader.read_exact(&mut header)?;
        let value_len = u32::from_be_bytes(header) as usize;
        reader.read_exact(&mut header)?;
        let count = u32::from_be_bytes(header) as usize;

        let mut state = self.state.write();
        if value_len != self.layout.value_len() {
            return Err(Error::LengthMismatch {
                expected: self.layout.value_len(),
                actual: value_len,
            });
        }
        if count > self.capacity - state.length {
            return Err(Error::CacheFull {
                capacity: self.capacity,
            });
        }

        let mut value = vec![0u8; value_len];
        for _ in 0..count {
            reader.read_exact(&mut value)?;
            self.insert_locked(&mut state, &value)?;
        }
        Ok(())
    }

    fn check_len(&self, value: &[u8]) -> Result<()> {
        if value.len() != self.layout.value_len() {
            return Err(Error::LengthMismatch {
                expected: self.layout.value_len(),
                actual: value.len(),
            });
        }
        Ok(())
    }
}
