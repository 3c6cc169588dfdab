//! Indexed binary min-heap with in-place updates and arbitrary removal.
//!
//! A priority queue whose entries keep track of their own position in the
//! backing array. Every swap rewrites the positions of both nodes involved,
//! so an entry reached through its [`SlotId`] handle can be re-sifted
//! ([`fix`](IndexedMinHeap::fix)) or removed ([`remove`](IndexedMinHeap::remove))
//! in O(log n) without scanning.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                        IndexedMinHeap Layout                                │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐    │
//! │   │  nodes: SlotArena<HeapNode<T>>   (owns items, stable handles)     │    │
//! │   │                                                                   │    │
//! │   │    ┌────────┬──────────────┬───────┐                             │    │
//! │   │    │ SlotId │ item         │ pos   │                             │    │
//! │   │    ├────────┼──────────────┼───────┤                             │    │
//! │   │    │   0    │ (0, seq=1)   │   0   │                             │    │
//! │   │    │   1    │ (1, seq=2)   │   2   │                             │    │
//! │   │    │   2    │ (0, seq=3)   │   1   │                             │    │
//! │   │    └────────┴──────────────┴───────┘                             │    │
//! │   └───────────────────────────────────────────────────────────────────┘    │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐    │
//! │   │  order: Vec<SlotId>   (implicit binary tree, min at index 0)      │    │
//! │   │                                                                   │    │
//! │   │    index:   0      1      2                                       │    │
//! │   │           [ #0 ] [ #2 ] [ #1 ]                                    │    │
//! │   │                                                                   │    │
//! │   │    nodes[order[i]].pos == i   for every i                         │    │
//! │   └───────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! Fix Flow
//! ────────
//!   fix(#1) after its item became smaller:
//!     1. pos = nodes[#1].pos          (O(1), no search)
//!     2. sift up while smaller than parent
//!     3. otherwise sift down while larger than a child
//!
//! Remove Flow
//! ───────────
//!   remove(#2):
//!     1. pos = nodes[#2].pos
//!     2. swap order[pos] with order[last], shrink order
//!     3. free #2's slot
//!     4. fix the element moved into pos (skipped if #2 was last)
//! ```
//!
//! ## Operations
//!
//! | Operation     | Description                              | Complexity |
//! |---------------|------------------------------------------|------------|
//! | `peek_min`    | Handle and item at the root              | O(1)       |
//! | `insert`      | Append, sift up                          | O(log n)   |
//! | `extract_min` | Remove the root                          | O(log n)   |
//! | `fix`         | Restore order after an external change   | O(log n)   |
//! | `remove`      | Remove an arbitrary entry by handle      | O(log n)   |
//! | `get`         | Item by handle                           | O(1)       |
//!
//! ## Example Usage
//!
//! ```
//! use advertizer::ds::IndexedMinHeap;
//!
//! let mut heap = IndexedMinHeap::new();
//! let a = heap.insert(5);
//! let _b = heap.insert(3);
//! let c = heap.insert(8);
//!
//! assert_eq!(heap.peek_min().map(|(_, v)| *v), Some(3));
//!
//! // Lower c's priority in place, then restore heap order
//! if let Some(item) = heap.get_mut(c) {
//!     *item = 1;
//! }
//! heap.fix(c);
//! assert_eq!(heap.peek_min().map(|(_, v)| *v), Some(1));
//!
//! // Remove from the middle by handle
//! assert_eq!(heap.remove(a), Some(5));
//! assert_eq!(heap.extract_min(), Some(1));
//! assert_eq!(heap.extract_min(), Some(3));
//! assert_eq!(heap.extract_min(), None);
//! ```
//!
//! ## Thread Safety
//!
//! `IndexedMinHeap` is not thread-safe. Wrap in a mutex for concurrent access.
use crate::ds::slot_arena::{SlotArena, SlotId};
#[cfg(any(test, debug_assertions))]
use crate::error::InvariantError;

#[derive(Debug)]
struct HeapNode<T> {
    item: T,
    pos: usize,
}

/// Binary min-heap addressed by stable [`SlotId`] handles.
///
/// Items are ordered by `T: Ord`; the smallest item sits at the root. Callers
/// that mutate an item through [`get_mut`](Self::get_mut) in a way that
/// changes its ordering must call [`fix`](Self::fix) before the next heap
/// operation.
#[derive(Debug)]
pub struct IndexedMinHeap<T> {
    nodes: SlotArena<HeapNode<T>>,
    order: Vec<SlotId>,
}

impl<T: Ord> IndexedMinHeap<T> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self {
            nodes: SlotArena::new(),
            order: Vec::new(),
        }
    }

    /// Creates an empty heap with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotArena::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Reserves capacity for at least `additional` more items.
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.order.reserve(additional);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if `id` refers to an item currently in the heap.
    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        self.nodes.contains(id)
    }

    /// Returns the handle and item at the root without removing it.
    ///
    /// # Example
    ///
    /// ```
    /// use advertizer::ds::IndexedMinHeap;
    ///
    /// let mut heap = IndexedMinHeap::new();
    /// assert!(heap.peek_min().is_none());
    ///
    /// let id = heap.insert("a");
    /// heap.insert("b");
    /// assert_eq!(heap.peek_min(), Some((id, &"a")));
    /// assert_eq!(heap.len(), 2);
    /// ```
    pub fn peek_min(&self) -> Option<(SlotId, &T)> {
        let id = *self.order.first()?;
        Some((id, &self.nodes[id].item))
    }

    /// Inserts `item` and returns its handle.
    pub fn insert(&mut self, item: T) -> SlotId {
        let pos = self.order.len();
        let id = self.nodes.insert(HeapNode { item, pos });
        self.order.push(id);
        self.sift_up(pos);
        id
    }

    /// Removes and returns the smallest item.
    pub fn extract_min(&mut self) -> Option<T> {
        let id = *self.order.first()?;
        self.remove(id)
    }

    /// Re-establishes heap order around `id` after its item changed.
    ///
    /// Returns `false` if `id` is not in the heap.
    ///
    /// # Example
    ///
    /// ```
    /// use advertizer::ds::IndexedMinHeap;
    ///
    /// let mut heap = IndexedMinHeap::new();
    /// let low = heap.insert(1);
    /// heap.insert(2);
    /// heap.insert(3);
    ///
    /// *heap.get_mut(low).unwrap() = 10;
    /// assert!(heap.fix(low));
    /// assert_eq!(heap.peek_min().map(|(_, v)| *v), Some(2));
    /// ```
    pub fn fix(&mut self, id: SlotId) -> bool {
        match self.nodes.get(id) {
            Some(node) => {
                let pos = node.pos;
                self.fix_at(pos);
                true
            },
            None => false,
        }
    }

    /// Removes the item behind `id` from an arbitrary position.
    ///
    /// Returns `None` if `id` is not in the heap, including handles whose
    /// item was already removed and whose slot now holds another item.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let pos = self.nodes.get(id)?.pos;
        let last = self.order.len() - 1;
        if pos != last {
            self.swap(pos, last);
        }
        self.order.pop();
        let node = self.nodes.remove(id)?;
        if pos != last {
            self.fix_at(pos);
        }
        Some(node.item)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.item)
    }

    /// Mutable access to an item. Call [`fix`](Self::fix) afterwards if the
    /// change affects ordering.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id).map(|node| &mut node.item)
    }

    /// Returns the current index of `id` in the backing array.
    pub fn position(&self, id: SlotId) -> Option<usize> {
        self.nodes.get(id).map(|node| node.pos)
    }

    /// Iterates items in backing-array order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.order.iter().map(|&id| (id, &self.nodes[id].item))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
    }

    /// Validates heap order and position bookkeeping (debug/test builds only).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.nodes.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "arena holds {} nodes but heap order has {}",
                self.nodes.len(),
                self.order.len()
            )));
        }
        for (i, &id) in self.order.iter().enumerate() {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("heap index {} is vacant", i)))?;
            if node.pos != i {
                return Err(InvariantError::new(format!(
                    "slot {} records position {}, found at {}",
                    id.index(),
                    node.pos,
                    i
                )));
            }
            if i > 0 && self.less(i, (i - 1) / 2) {
                return Err(InvariantError::new(format!(
                    "heap order violated between index {} and its parent {}",
                    i,
                    (i - 1) / 2
                )));
            }
        }
        Ok(())
    }

    fn fix_at(&mut self, pos: usize) {
        if !self.sift_up(pos) {
            self.sift_down(pos);
        }
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.nodes[self.order[i]].item < self.nodes[self.order[j]].item
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.order.swap(i, j);
        let a = self.order[i];
        let b = self.order[j];
        self.nodes[a].pos = i;
        self.nodes[b].pos = j;
    }

    /// Returns `true` if the element moved.
    fn sift_up(&mut self, mut pos: usize) -> bool {
        let start = pos;
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos != start
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.order.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, pos) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }
}

impl<T: Ord> Default for IndexedMinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
