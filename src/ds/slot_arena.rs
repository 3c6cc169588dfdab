//! Generational slot arena with stable handles.
//!
//! Owns values in a `Vec` of slots and hands out [`SlotId`] handles that
//! stay valid until the value is removed. Freed slots are recycled through a
//! free list; each slot carries a generation that is bumped on removal, so a
//! handle kept past its removal never resolves to the value that later
//! reuses the slot.
//!
//! [`IndexedMinHeap`](crate::ds::IndexedMinHeap) stores its nodes here so
//! that reordering the heap never moves the nodes themselves.
//!
//! ## Example Usage
//!
//! ```
//! use advertizer::ds::SlotArena;
//!
//! let mut arena = SlotArena::new();
//! let a = arena.insert("a");
//! let b = arena.insert("b");
//!
//! assert_eq!(arena.get(a), Some(&"a"));
//! assert_eq!(arena.remove(a), Some("a"));
//! assert_eq!(arena.get(a), None);
//!
//! // Freed slot is reused, but the old handle stays dead
//! let c = arena.insert("c");
//! assert_eq!(c.index(), a.index());
//! assert_ne!(c, a);
//! assert_eq!(arena.get(a), None);
//! assert_eq!(arena[b], "b");
//! ```
use std::ops::{Index, IndexMut};

/// Stable handle to a value stored in a [`SlotArena`].
///
/// Pairs the slot index with the slot's generation at insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u32,
}

impl SlotId {
    /// Returns the raw slot index. Indices are reused; generations are not.
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

/// Vec-backed arena with free-list slot reuse and generation-checked handles.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` and returns its handle. O(1) amortized.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            return SlotId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            value: Some(value),
            generation: 0,
        });
        SlotId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Takes the value out of `id`'s slot and retires the handle.
    ///
    /// Returns `None` for vacant slots and for handles from an earlier
    /// generation.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slot_mut(id).and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Drops every value. Handles issued before the clear stay dead.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index);
        }
        self.len = 0;
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics if `id` is vacant or stale.
impl<T> Index<SlotId> for SlotArena<T> {
    type Output = T;

    fn index(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("vacant slot {} (generation {})", id.index, id.generation),
        }
    }
}

/// Panics if `id` is vacant or stale.
impl<T> IndexMut<SlotId> for SlotArena<T> {
    fn index_mut(&mut self, id: SlotId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("vacant slot {} (generation {})", id.index, id.generation),
        }
    }
}
