//! Arena-backed doubly linked list.
//!
//! Nodes live in a [`SlotArena`] and link to each other through [`SlotId`]
//! handles, so a node can be detached and re-attached in O(1) given only its
//! handle. The front of the list is the most recently attached node.

use crate::arena::{SlotArena, SlotId};
use core::fmt;

/// A node in the doubly linked list.
#[derive(Clone)]
pub(crate) struct ListEntry<T> {
    val: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl<T> ListEntry<T> {
    #[inline]
    pub(crate) fn get_value(&self) -> &T {
        &self.val
    }
}

/// A doubly linked list with O(1) push, splice and removal by handle.
///
/// # Examples
///
/// ```ignore
/// let mut list = List::with_capacity(3);
/// let a = list.add(10);
/// let _b = list.add(20);
/// list.move_to_front(a);
/// assert_eq!(list.remove_last(), Some(20));
/// ```
#[derive(Clone)]
pub(crate) struct List<T> {
    nodes: SlotArena<ListEntry<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> List<T> {
    /// Creates an empty list with room for `cap` nodes before reallocating.
    pub(crate) fn with_capacity(cap: usize) -> List<T> {
        List {
            nodes: SlotArena::with_capacity(cap),
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Adds a value to the front of the list and returns its handle.
    pub(crate) fn add(&mut self, v: T) -> SlotId {
        let node = self.nodes.insert(ListEntry {
            val: v,
            prev: None,
            next: None,
        });
        self.attach(node);
        node
    }

    /// Removes the node at `node` and returns its value.
    ///
    /// Returns `None` if the handle does not refer to a live node.
    pub(crate) fn remove(&mut self, node: SlotId) -> Option<T> {
        self.nodes.get(node)?;
        self.detach(node);
        self.nodes.remove(node).map(|entry| entry.val)
    }

    /// Removes the last (least recently attached) node.
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    /// Moves a node to the front of the list.
    pub(crate) fn move_to_front(&mut self, node: SlotId) {
        if self.head == Some(node) {
            return;
        }
        self.detach(node);
        self.attach(node);
    }

    /// Replaces the value stored at `node`, returning the old one.
    pub(crate) fn update(&mut self, node: SlotId, v: T) -> Option<T> {
        self.nodes
            .get_mut(node)
            .map(|entry| core::mem::replace(&mut entry.val, v))
    }

    #[inline]
    pub(crate) fn get_value(&self, node: SlotId) -> Option<&T> {
        self.nodes.get(node).map(ListEntry::get_value)
    }

    /// Clears the list by replacing its storage.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates values from front (most recent) to back.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Links a detached node in after the head.
    fn attach(&mut self, node: SlotId) {
        let old_head = self.head;
        {
            let entry = &mut self.nodes[node];
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(head) => self.nodes[head].prev = Some(node),
            None => self.tail = Some(node),
        }
        self.head = Some(node);
    }

    /// Unlinks a node from its neighbours without freeing its slot.
    fn detach(&mut self, node: SlotId) {
        let (prev, next) = {
            let entry = &mut self.nodes[node];
            (entry.prev.take(), entry.next.take())
        };
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => {
                debug_assert_eq!(self.head, Some(node), "unlinked node is not the head");
                self.head = next;
            }
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => {
                debug_assert_eq!(self.tail, Some(node), "unlinked node is not the tail");
                self.tail = prev;
            }
        }
    }
}

impl<T> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List").field("length", &self.len()).finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    cursor: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.cursor?;
        let entry = self.list.nodes.get(node)?;
        self.cursor = entry.next;
        self.remaining -= 1;
        Some(&entry.val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
