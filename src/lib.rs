//! advertizer: round-based FIFO re-advertisement with a bounded number of
//! emissions per item.
//!
//! [`Advertizer`](policy::advertizer::Advertizer) hands tracked items back to
//! the caller one at a time, draining every item of a round in push order
//! before starting the next round, and drops each item after
//! `max_advertisements` emissions. It sits on an
//! [`IndexedMinHeap`](ds::IndexedMinHeap) whose entries track their own
//! array position, so refresh and removal stay O(log n).

pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
