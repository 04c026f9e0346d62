//! LRU List Module
//!
//! Recency-ordered doubly linked list of cache entries.
//!
//! Nodes live in an arena of slots and link to each other by slot index, so the
//! list has no ownership cycles. Freed slots are recycled through a free list,
//! which keeps every live node at a stable index the hash index can point to.
//!
//! - Head = Most recently used
//! - Tail = Least recently used

use crate::cache::entry::CacheEntry;

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
#[derive(Debug, Default)]
pub(crate) struct LruList {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl LruList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    /// Returns the entry stored at `idx`.
    ///
    /// Panics if `idx` is not a live slot; callers only pass indices taken from
    /// the hash index or from walking the list.
    pub fn entry(&self, idx: usize) -> &CacheEntry {
        &self.node(idx).entry
    }

    pub fn entry_mut(&mut self, idx: usize) -> &mut CacheEntry {
        &mut self.node_mut(idx).entry
    }

    /// Slot following `idx` towards the tail.
    pub fn next_of(&self, idx: usize) -> Option<usize> {
        self.node(idx).next
    }

    #[cfg(test)]
    pub fn prev_of(&self, idx: usize) -> Option<usize> {
        self.node(idx).prev
    }

    // == Push Front ==
    /// Links a new entry as the most recently used and returns its slot.
    pub fn push_front(&mut self, entry: CacheEntry) -> usize {
        let node = Node {
            entry,
            prev: None,
            next: self.head,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => self.node_mut(old_head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Promotes an entry to the most recently used position.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);

        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => self.node_mut(old_head).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    // == Remove ==
    /// Unlinks the entry at `idx`, frees its slot and returns the entry.
    pub fn remove(&mut self, idx: usize) -> CacheEntry {
        self.unlink(idx);
        self.len -= 1;
        self.free.push(idx);
        match self.slots[idx].take() {
            Some(node) => node.entry,
            None => unreachable!("slot {} was checked live by unlink", idx),
        }
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        let idx = self.tail?;
        Some(self.remove(idx))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Detaches a node from its neighbours, leaving its own links cleared.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };

        match (prev, next) {
            // sole entry
            (None, None) => {
                self.head = None;
                self.tail = None;
            }
            // head
            (None, Some(next)) => {
                self.head = Some(next);
                self.node_mut(next).prev = None;
            }
            // tail
            (Some(prev), None) => {
                self.tail = Some(prev);
                self.node_mut(prev).next = None;
            }
            // interior
            (Some(prev), Some(next)) => {
                self.node_mut(prev).next = Some(next);
                self.node_mut(next).prev = Some(prev);
            }
        }

        let node = self.node_mut(idx);
        node.prev = None;
        node.next = None;
    }

    fn node(&self, idx: usize) -> &Node {
        match self.slots.get(idx) {
            Some(Some(node)) => node,
            _ => panic!("LRU list slot {} is not live", idx),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node {
        match self.slots.get_mut(idx) {
            Some(Some(node)) => node,
            _ => panic!("LRU list slot {} is not live", idx),
        }
    }
}

pub(crate) struct Iter<'a> {
    list: &'a LruList,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a CacheEntry);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.node(idx);
        self.cursor = node.next;
        Some((idx, &node.entry))
    }
}
