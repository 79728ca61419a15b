//! Binary min-heap whose entries track their own position.
//!
//! Entries are stored in a [`SlotArena`]; the heap itself is a vector of
//! [`SlotId`] handles. Every structural change (push, pop, swap, removal)
//! writes the new array position back into the moved entry through
//! [`HeapEntry::set_heap_index`], so an entry whose priority changed can be
//! re-heapified in O(log n) from its handle alone.
//!
//! ```text
//!   order: [ s3 | s0 | s7 | s1 ]        entries (arena):
//!            0    1    2    3           s0 -> { heap_index: 1, .. }
//!                                       s1 -> { heap_index: 3, .. }
//!                                       s3 -> { heap_index: 0, .. }
//!                                       s7 -> { heap_index: 2, .. }
//! ```

use crate::arena::{SlotArena, SlotId};
use core::fmt;

/// An element that can live in an [`IndexedMinHeap`].
pub(crate) trait HeapEntry {
    /// Current position of the entry in the heap array.
    fn heap_index(&self) -> usize;

    /// Records a new position. Called by the heap on every move.
    fn set_heap_index(&mut self, index: usize);

    /// Returns `true` if `self` must sit closer to the root than `other`.
    fn precedes(&self, other: &Self) -> bool;
}

pub(crate) struct IndexedMinHeap<T> {
    entries: SlotArena<T>,
    order: Vec<SlotId>,
}

impl<T: HeapEntry> IndexedMinHeap<T> {
    pub(crate) fn with_capacity(cap: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(cap),
            order: Vec::with_capacity(cap),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.entries.get(id)
    }

    /// Mutable access to an entry.
    ///
    /// Changing the entry's ordering key must be followed by [`fix`](Self::fix).
    #[inline]
    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.entries.get_mut(id)
    }

    /// Returns the minimum entry without removing it.
    pub(crate) fn peek(&self) -> Option<&T> {
        self.order.first().and_then(|&id| self.entries.get(id))
    }

    pub(crate) fn push(&mut self, mut value: T) -> SlotId {
        let index = self.order.len();
        value.set_heap_index(index);
        let id = self.entries.insert(value);
        self.order.push(id);
        self.sift_up(index);
        id
    }

    /// Removes and returns the minimum entry.
    pub(crate) fn pop(&mut self) -> Option<T> {
        let last = self.len().checked_sub(1)?;
        self.swap(0, last);
        let id = self.order.pop()?;
        if !self.is_empty() {
            self.sift_down(0);
        }
        self.entries.remove(id)
    }

    /// Restores heap order after the entry at `id` changed its ordering key.
    pub(crate) fn fix(&mut self, id: SlotId) {
        if let Some(entry) = self.entries.get(id) {
            let index = entry.heap_index();
            if !self.sift_down(index) {
                self.sift_up(index);
            }
        }
    }

    /// Removes the entry at `id` from any position in the heap.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        let index = self.entries.get(id)?.heap_index();
        let last = self.order.len() - 1;
        if index != last {
            self.swap(index, last);
            self.order.pop();
            if !self.sift_down(index) {
                self.sift_up(index);
            }
        } else {
            self.order.pop();
        }
        self.entries.remove(id)
    }

    /// Keeps only the entries for which `keep` returns `true` and rebuilds the
    /// heap in O(n). Returns the entries that were dropped.
    pub(crate) fn retain<F>(&mut self, mut keep: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut dropped = Vec::new();
        let order = core::mem::take(&mut self.order);
        for id in order {
            if keep(&self.entries[id]) {
                self.order.push(id);
            } else if let Some(entry) = self.entries.remove(id) {
                dropped.push(entry);
            }
        }
        self.heapify();
        dropped
    }

    /// Applies `f` to every entry, then rebuilds the heap in O(n).
    pub(crate) fn update_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        for &id in &self.order {
            f(&mut self.entries[id]);
        }
        self.heapify();
    }

    /// Drops all entries by replacing the underlying storage.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.order = Vec::new();
    }

    /// Iterates entries in arbitrary order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.entries[self.order[i]].precedes(&self.entries[self.order[j]])
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.order.swap(i, j);
        let (a, b) = (self.order[i], self.order[j]);
        self.entries[a].set_heap_index(i);
        self.entries[b].set_heap_index(j);
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    /// Returns `true` if the entry moved.
    fn sift_down(&mut self, start: usize) -> bool {
        let len = self.order.len();
        let mut index = start;
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, index) {
                break;
            }
            self.swap(index, child);
            index = child;
        }
        index > start
    }

    fn heapify(&mut self) {
        for (index, &id) in self.order.iter().enumerate() {
            self.entries[id].set_heap_index(index);
        }
        for index in (0..self.order.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    /// Checks that every parent precedes its children and every entry knows its
    /// own position.
    #[cfg(test)]
    pub(crate) fn validate(&self) {
        assert_eq!(self.entries.len(), self.order.len());
        for (index, &id) in self.order.iter().enumerate() {
            assert_eq!(self.entries[id].heap_index(), index, "stale heap index");
            if index > 0 {
                assert!(
                    !self.less(index, (index - 1) / 2),
                    "child at {index} precedes its parent"
                );
            }
        }
    }
}

impl<T> fmt::Debug for IndexedMinHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedMinHeap")
            .field("len", &self.order.len())
            .finish()
    }
}
