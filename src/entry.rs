//! Cache entry shared by the bounded policies.
//!
//! Every bounded cache stores its data as a `CacheEntry<K, V, M>`: the key and
//! value plus whatever per-entry bookkeeping the policy needs in `M`.
//!
//! | Policy | Metadata     | Stored in           |
//! |--------|--------------|---------------------|
//! | LRU    | `()`         | [`List`](crate::list::List) |
//! | LFU    | [`LfuMeta`]  | [`IndexedMinHeap`]  |
//! | DLFU   | [`DlfuMeta`] | [`IndexedMinHeap`]  |
//!
//! The key is kept next to the value so that an entry popped from the list or
//! heap can be removed from the key index without a reverse lookup.
//!
//! [`LfuMeta`]: crate::meta::LfuMeta
//! [`DlfuMeta`]: crate::meta::DlfuMeta
//! [`IndexedMinHeap`]: crate::heap::IndexedMinHeap

use crate::heap::HeapEntry;
use core::fmt;

/// Key, value and policy metadata for one cached item.
pub(crate) struct CacheEntry<K, V, M = ()> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) metadata: M,
}

impl<K, V> CacheEntry<K, V> {
    /// Creates an entry without policy metadata.
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Self {
        Self::with_metadata(key, value, ())
    }
}

impl<K, V, M> CacheEntry<K, V, M> {
    #[inline]
    pub(crate) fn with_metadata(key: K, value: V, metadata: M) -> Self {
        Self {
            key,
            value,
            metadata,
        }
    }

    /// Consumes the entry, returning the key and value.
    #[inline]
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V, M: HeapEntry> HeapEntry for CacheEntry<K, V, M> {
    #[inline]
    fn heap_index(&self) -> usize {
        self.metadata.heap_index()
    }

    #[inline]
    fn set_heap_index(&mut self, index: usize) {
        self.metadata.set_heap_index(index);
    }

    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        self.metadata.precedes(&other.metadata)
    }
}

impl<K, V, M: fmt::Debug> fmt::Debug for CacheEntry<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
