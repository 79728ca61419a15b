//! Per-entry metadata for the heap-ordered policies.
//!
//! | Policy | Metadata   | Heap order                                  |
//! |--------|------------|---------------------------------------------|
//! | LFU    | `LfuMeta`  | `(frequency, seq)` ascending                |
//! | DLFU   | `DlfuMeta` | `(priority, seq)` ascending                 |
//!
//! `seq` is a per-cache counter stamped on every insert or overwrite. It breaks
//! ties so that among equal frequencies or priorities the entry written longest
//! ago is evicted first.

use crate::heap::HeapEntry;
use core::cmp::Ordering;
use std::time::Instant;

/// Metadata for LFU entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LfuMeta {
    /// Number of reads since the entry was last written, plus one.
    pub(crate) frequency: u64,
    pub(crate) seq: u64,
    pub(crate) heap_index: usize,
}

impl LfuMeta {
    #[inline]
    pub(crate) fn new(seq: u64) -> Self {
        Self {
            frequency: 1,
            seq,
            heap_index: 0,
        }
    }

    /// Increments the frequency counter and returns the new value.
    #[inline]
    pub(crate) fn increment(&mut self) -> u64 {
        self.frequency = self.frequency.saturating_add(1);
        self.frequency
    }

    /// Resets the entry to a fresh write: frequency 1 under a new sequence.
    #[inline]
    pub(crate) fn reset(&mut self, seq: u64) {
        self.frequency = 1;
        self.seq = seq;
    }
}

impl HeapEntry for LfuMeta {
    #[inline]
    fn heap_index(&self) -> usize {
        self.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, index: usize) {
        self.heap_index = index;
    }

    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        (self.frequency, self.seq) < (other.frequency, other.seq)
    }
}

/// Metadata for DLFU entries.
///
/// `expires_at` is `None` when the TTL is too large to represent as an
/// [`Instant`]; such entries never expire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DlfuMeta {
    pub(crate) priority: f64,
    pub(crate) expires_at: Option<Instant>,
    pub(crate) seq: u64,
    pub(crate) heap_index: usize,
}

impl DlfuMeta {
    #[inline]
    pub(crate) fn new(priority: f64, expires_at: Option<Instant>, seq: u64) -> Self {
        Self {
            priority,
            expires_at,
            seq,
            heap_index: 0,
        }
    }

    /// An entry is expired once `now` is strictly past its expiry instant.
    #[inline]
    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }
}

impl HeapEntry for DlfuMeta {
    #[inline]
    fn heap_index(&self) -> usize {
        self.heap_index
    }

    #[inline]
    fn set_heap_index(&mut self, index: usize) {
        self.heap_index = index;
    }

    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        match self.priority.total_cmp(&other.priority) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.seq < other.seq,
        }
    }
}
