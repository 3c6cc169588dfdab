pub mod indexed_heap;
pub mod slot_arena;

pub use indexed_heap::IndexedMinHeap;
pub use slot_arena::{SlotArena, SlotId};
