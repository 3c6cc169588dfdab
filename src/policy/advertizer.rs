//! Round-based FIFO advertizer with a bounded number of emissions per item.
//!
//! Each tracked item is advertized (handed back to the caller) once per
//! round. All items of round `r` are emitted, in the order they were last
//! pushed, before any item enters round `r + 1`. An item is dropped for good
//! when it has been advertized `max_advertisements` times; pushing a known id
//! again refreshes it and restarts its count from zero.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                        Advertizer<K, V> Layout                              │
//! │                                                                             │
//! │   ┌─────────────────────────────┐     ┌─────────────────────────────────┐  │
//! │   │ index: FxHashMap<K, SlotId> │     │ heap: IndexedMinHeap<Entry>     │  │
//! │   │                             │     │                                 │  │
//! │   │   id ──────► SlotId ────────┼────►│   Entry { id, payload,          │  │
//! │   │                             │     │           count, seq }          │  │
//! │   │   "a" → #0                  │     │   ordered by (count, seq)       │  │
//! │   │   "b" → #1                  │     │                                 │  │
//! │   │   "c" → #2                  │     │          (0, 3) #2              │  │
//! │   │                             │     │          /      \               │  │
//! │   └─────────────────────────────┘     │    (1, 1) #0   (1, 2) #1        │  │
//! │                                       └─────────────────────────────────┘  │
//! │                                                                             │
//! │   max_advertisements: usize      seq: u64 (bumped once per push)           │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! Advertize Flow
//! ──────────────
//!   advertize():
//!     1. Peek the root (smallest (count, seq))
//!     2. count + 1 == max?  → remove from heap and index, return owned
//!                              (Advertisement::Last)
//!     3. otherwise          → count += 1, fix(slot), return borrowed
//!                              (Advertisement::Repeat)
//!
//! Push Flow
//! ─────────
//!   push(id, payload):
//!     seq += 1
//!     known id → replace payload, count = 0, seq = seq, fix(slot)
//!     new id   → heap.insert(Entry { count: 0, seq }), index[id] = slot
//! ```
//!
//! ## Per-Item Lifecycle
//!
//! ```text
//!   absent ──push──► count=0 ──adv──► count=1 ──adv──► … count=max-1 ──adv──► absent
//!                       ▲                │                   │
//!                       └──────push──────┴───────push────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation          | Description                                   | Complexity |
//! |--------------------|-----------------------------------------------|------------|
//! | `push`             | Insert or refresh an item                     | O(log n)   |
//! | `advertize`        | Emit the next item, expire it on its last run | O(log n)   |
//! | `remove`           | Drop an item by id                            | O(log n)   |
//! | `peek`             | Next item without emitting it                 | O(1)       |
//! | `get`              | Payload by id                                 | O(1)       |
//! | `advertize_count`  | Times advertized since last push              | O(1)       |
//! | `len`              | Number of tracked items                       | O(1)       |
//!
//! ## Example Usage
//!
//! ```
//! use advertizer::policy::advertizer::Advertizer;
//!
//! let mut adv = Advertizer::new(2);
//! adv.push(0u64, "zero");
//! adv.push(1, "one");
//!
//! let seen: Vec<(u64, &str)> = std::iter::from_fn(|| adv.advertize().map(|a| a.into_owned()))
//!     .collect();
//! assert_eq!(seen, vec![(0, "zero"), (1, "one"), (0, "zero"), (1, "one")]);
//! assert!(adv.is_empty());
//! ```
//!
//! ## Thread Safety
//!
//! `Advertizer` is not thread-safe. Callers sharing one across threads must
//! wrap the whole structure in a mutex or confine it to a single task.
use std::cmp::Ordering;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IndexedMinHeap, SlotId};
use crate::error::ConfigError;
#[cfg(any(test, debug_assertions))]
use crate::error::InvariantError;

/// Counters for advertizer activity.
#[cfg(feature = "metrics")]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct AdvertizerMetrics {
    /// Pushes of a previously unseen id.
    pub pushes: u64,
    /// Pushes of an id already tracked.
    pub refreshes: u64,
    /// Successful `advertize` calls, final ones included.
    pub advertisements: u64,
    /// Items dropped on their final advertisement.
    pub expirations: u64,
    /// Items dropped through `remove`.
    pub removals: u64,
    /// `advertize` calls on an empty advertizer.
    pub empty_advertizes: u64,
}

#[cfg(feature = "metrics")]
impl std::fmt::Display for AdvertizerMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AdvertizerMetrics {{ pushes: {}, refreshes: {}, advertisements: {}, \
             expirations: {}, removals: {}, empty_advertizes: {} }}",
            self.pushes,
            self.refreshes,
            self.advertisements,
            self.expirations,
            self.removals,
            self.empty_advertizes,
        )
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    id: K,
    payload: V,
    /// Advertisements since the last push.
    count: usize,
    seq: u64,
}

impl<K, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.seq == other.seq
    }
}

impl<K, V> Eq for Entry<K, V> {}

impl<K, V> PartialOrd for Entry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, V> Ord for Entry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.count.cmp(&other.count) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            ordering => ordering,
        }
    }
}

/// Result of a successful [`Advertizer::advertize`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum Advertisement<'a, K, V> {
    /// The item stays queued for a later round.
    Repeat {
        id: &'a K,
        payload: &'a V,
        /// Advertisements since the last push, this one included.
        count: usize,
    },
    /// This was the item's final advertisement; it is no longer tracked.
    Last { id: K, payload: V },
}

impl<K, V> Advertisement<'_, K, V> {
    pub fn id(&self) -> &K {
        match self {
            Self::Repeat { id, .. } => *id,
            Self::Last { id, .. } => id,
        }
    }

    pub fn payload(&self) -> &V {
        match self {
            Self::Repeat { payload, .. } => *payload,
            Self::Last { payload, .. } => payload,
        }
    }

    /// Returns `true` if the item was dropped by this advertisement.
    pub fn is_last(&self) -> bool {
        matches!(self, Self::Last { .. })
    }

    /// Converts into an owned `(id, payload)` pair, cloning borrowed parts.
    pub fn into_owned(self) -> (K, V)
    where
        K: Clone,
        V: Clone,
    {
        match self {
            Self::Repeat { id, payload, .. } => (id.clone(), payload.clone()),
            Self::Last { id, payload } => (id, payload),
        }
    }
}

/// Advertizes tracked items in round-based FIFO order, at most
/// `max_advertisements` times each.
///
/// # Type Parameters
///
/// - `K`: Item identity, must be `Clone + Eq + Hash`
/// - `V`: Opaque payload, never inspected
///
/// # Example
///
/// ```
/// use advertizer::policy::advertizer::{Advertisement, Advertizer};
///
/// let mut adv = Advertizer::new(3);
/// adv.push(7u64, "seven");
///
/// match adv.advertize() {
///     Some(Advertisement::Repeat { id, count, .. }) => {
///         assert_eq!(*id, 7);
///         assert_eq!(count, 1);
///     },
///     other => panic!("unexpected {:?}", other),
/// }
/// assert_eq!(adv.remaining(&7), Some(2));
/// ```
#[derive(Debug)]
pub struct Advertizer<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Maps id to its heap handle
    index: FxHashMap<K, SlotId>,
    heap: IndexedMinHeap<Entry<K, V>>,
    max_advertisements: usize,
    /// Last sequence number handed out
    seq: u64,
    #[cfg(feature = "metrics")]
    metrics: AdvertizerMetrics,
}

impl<K, V> Advertizer<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an advertizer that emits each item at most
    /// `max_advertisements` times.
    ///
    /// # Panics
    ///
    /// Panics if `max_advertisements` is zero. See [`try_new`](Self::try_new).
    pub fn new(max_advertisements: usize) -> Self {
        match Self::try_new(max_advertisements) {
            Ok(adv) => adv,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like [`new`](Self::new), pre-sizing storage for `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `max_advertisements` is zero.
    pub fn with_capacity(max_advertisements: usize, capacity: usize) -> Self {
        match Self::try_with_capacity(max_advertisements, capacity) {
            Ok(adv) => adv,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates an advertizer, returning an error on invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_advertisements` is zero.
    pub fn try_new(max_advertisements: usize) -> Result<Self, ConfigError> {
        Self::try_with_capacity(max_advertisements, 0)
    }

    /// Creates a pre-sized advertizer, returning an error on invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_advertisements` is zero.
    pub fn try_with_capacity(
        max_advertisements: usize,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        if max_advertisements == 0 {
            return Err(ConfigError::new(
                "max_advertisements must be greater than zero",
            ));
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            heap: IndexedMinHeap::with_capacity(capacity),
            max_advertisements,
            seq: 0,
            #[cfg(feature = "metrics")]
            metrics: AdvertizerMetrics::default(),
        })
    }

    /// Reserves room for at least `additional` more items.
    pub fn reserve(&mut self, additional: usize) {
        self.index.reserve(additional);
        self.heap.reserve(additional);
    }

    /// Returns the configured number of advertisements per item.
    #[inline]
    pub fn max_advertisements(&self) -> usize {
        self.max_advertisements
    }

    /// Returns the number of tracked items.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the payload tracked for `id`.
    pub fn get(&self, id: &K) -> Option<&V> {
        let slot = *self.index.get(id)?;
        self.heap.get(slot).map(|entry| &entry.payload)
    }

    /// Returns how many times `id` has been advertized since its last push.
    pub fn advertize_count(&self, id: &K) -> Option<usize> {
        let slot = *self.index.get(id)?;
        self.heap.get(slot).map(|entry| entry.count)
    }

    /// Returns how many more advertisements `id` will get, the final one
    /// included.
    pub fn remaining(&self, id: &K) -> Option<usize> {
        self.advertize_count(id)
            .map(|count| self.max_advertisements - count)
    }

    /// Inserts a new item or refreshes a tracked one.
    ///
    /// A refreshed item gets the new payload, its count reset to zero and a
    /// fresh sequence number, so it queues behind every other item already
    /// waiting in round zero.
    ///
    /// # Example
    ///
    /// ```
    /// use advertizer::policy::advertizer::Advertizer;
    ///
    /// let mut adv = Advertizer::new(2);
    /// adv.push(1u64, "one");
    /// adv.push(2, "two");
    /// adv.advertize();
    /// assert_eq!(adv.advertize_count(&1), Some(1));
    ///
    /// adv.push(1, "one again");
    /// assert_eq!(adv.advertize_count(&1), Some(0));
    /// assert_eq!(adv.get(&1), Some(&"one again"));
    /// assert_eq!(adv.len(), 2);
    ///
    /// // 2 was pushed before the refresh, so it goes first
    /// assert_eq!(adv.advertize().map(|a| *a.id()), Some(2));
    /// assert_eq!(adv.advertize().map(|a| *a.id()), Some(1));
    /// ```
    pub fn push(&mut self, id: K, payload: V) {
        self.seq = self.seq.wrapping_add(1);
        let seq = self.seq;

        if let Some(&slot) = self.index.get(&id) {
            if let Some(entry) = self.heap.get_mut(slot) {
                entry.payload = payload;
                entry.count = 0;
                entry.seq = seq;
            }
            self.heap.fix(slot);
            #[cfg(feature = "metrics")]
            {
                self.metrics.refreshes += 1;
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(slot = slot.index(), seq, "advertizer entry refreshed");
            return;
        }

        let slot = self.heap.insert(Entry {
            id: id.clone(),
            payload,
            count: 0,
            seq,
        });
        self.index.insert(id, slot);
        #[cfg(feature = "metrics")]
        {
            self.metrics.pushes += 1;
        }
    }

    /// Emits the next item.
    ///
    /// Returns `None` when nothing is tracked. On an item's final
    /// advertisement it is removed and returned by value
    /// ([`Advertisement::Last`]); otherwise its count is bumped, it moves
    /// behind its round-mates and is returned by reference
    /// ([`Advertisement::Repeat`]).
    ///
    /// # Example
    ///
    /// ```
    /// use advertizer::policy::advertizer::Advertizer;
    ///
    /// let mut adv = Advertizer::new(2);
    /// adv.push(0u64, "zero");
    ///
    /// assert!(!adv.advertize().unwrap().is_last());
    /// assert!(adv.advertize().unwrap().is_last());
    /// assert!(adv.advertize().is_none());
    /// ```
    pub fn advertize(&mut self) -> Option<Advertisement<'_, K, V>> {
        let Some((slot, count)) = self.heap.peek_min().map(|(slot, entry)| (slot, entry.count))
        else {
            #[cfg(feature = "metrics")]
            {
                self.metrics.empty_advertizes += 1;
            }
            return None;
        };

        #[cfg(feature = "metrics")]
        {
            self.metrics.advertisements += 1;
        }

        if count + 1 >= self.max_advertisements {
            let entry = self.heap.remove(slot)?;
            self.index.remove(&entry.id);
            #[cfg(feature = "metrics")]
            {
                self.metrics.expirations += 1;
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(
                slot = slot.index(),
                seq = entry.seq,
                advertisements = count + 1,
                "advertizer entry expired"
            );
            return Some(Advertisement::Last {
                id: entry.id,
                payload: entry.payload,
            });
        }

        if let Some(entry) = self.heap.get_mut(slot) {
            entry.count += 1;
        }
        self.heap.fix(slot);
        let entry = self.heap.get(slot)?;
        Some(Advertisement::Repeat {
            id: &entry.id,
            payload: &entry.payload,
            count: entry.count,
        })
    }

    /// Returns the item the next [`advertize`](Self::advertize) would emit,
    /// without changing anything.
    pub fn peek(&self) -> Option<(&K, &V)> {
        self.heap
            .peek_min()
            .map(|(_, entry)| (&entry.id, &entry.payload))
    }

    /// Stops tracking `id` and returns its payload.
    ///
    /// # Example
    ///
    /// ```
    /// use advertizer::policy::advertizer::Advertizer;
    ///
    /// let mut adv = Advertizer::new(10);
    /// adv.push(0u64, 0);
    /// adv.push(1, 1);
    ///
    /// assert_eq!(adv.remove(&1), Some(1));
    /// assert_eq!(adv.remove(&1), None);
    /// assert_eq!(adv.len(), 1);
    /// ```
    pub fn remove(&mut self, id: &K) -> Option<V> {
        let slot = self.index.remove(id)?;
        let entry = self.heap.remove(slot)?;
        #[cfg(feature = "metrics")]
        {
            self.metrics.removals += 1;
        }
        Some(entry.payload)
    }

    /// Iterates tracked items in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.heap
            .iter()
            .map(|(_, entry)| (&entry.id, &entry.payload))
    }

    /// Drops every tracked item.
    ///
    /// The sequence counter is not reset, so items pushed afterwards still
    /// order after anything pushed before.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(dropped = self.index.len(), "advertizer cleared");
        self.index.clear();
        self.heap.clear();
    }

    /// Returns activity counters if the `metrics` feature is enabled.
    #[cfg(feature = "metrics")]
    #[inline]
    pub fn metrics(&self) -> &AdvertizerMetrics {
        &self.metrics
    }

    /// Resets activity counters to zero.
    #[cfg(feature = "metrics")]
    #[inline]
    pub fn reset_metrics(&mut self) {
        self.metrics = AdvertizerMetrics::default();
    }

    /// Validates index/heap agreement and count bounds (debug/test builds only).
    #[cfg(any(test, debug_assertions))]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.heap.check_invariants()?;

        if self.index.len() != self.heap.len() {
            return Err(InvariantError::new(format!(
                "index has {} ids but heap holds {} entries",
                self.index.len(),
                self.heap.len()
            )));
        }

        for (id, &slot) in &self.index {
            let entry = self.heap.get(slot).ok_or_else(|| {
                InvariantError::new(format!("index points at vacant slot {}", slot.index()))
            })?;
            if entry.id != *id {
                return Err(InvariantError::new(format!(
                    "slot {} holds a different id than the index maps to it",
                    slot.index()
                )));
            }
            if entry.count >= self.max_advertisements {
                return Err(InvariantError::new(format!(
                    "slot {} advertized {} times, limit is {}",
                    slot.index(),
                    entry.count,
                    self.max_advertisements
                )));
            }
            if entry.seq > self.seq {
                return Err(InvariantError::new(format!(
                    "slot {} has seq {} ahead of counter {}",
                    slot.index(),
                    entry.seq,
                    self.seq
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_ids(adv: &mut Advertizer<u64, &'static str>) -> Vec<u64> {
        let mut ids = Vec::new();
        while let Some(a) = adv.advertize() {
            ids.push(*a.id());
        }
        ids
    }

    #[test]
    fn zero_max_is_rejected() {
        let err = Advertizer::<u64, ()>::try_new(0).unwrap_err();
        assert!(err.message().contains("max_advertisements"));
        assert!(Advertizer::<u64, ()>::try_with_capacity(0, 16).is_err());
        assert!(Advertizer::<u64, ()>::try_new(1).is_ok());
    }

    #[test]
    #[should_panic(expected = "max_advertisements")]
    fn new_panics_on_zero_max() {
        let _ = Advertizer::<u64, ()>::new(0);
    }

    #[test]
    fn empty_advertize_returns_none() {
        let mut adv: Advertizer<u64, &str> = Advertizer::new(3);
        assert!(adv.advertize().is_none());
        assert!(adv.peek().is_none());
        assert_eq!(adv.len(), 0);
    }

    #[test]
    fn rounds_drain_in_fifo_order() {
        let mut adv = Advertizer::new(2);
        for (id, name) in [(0u64, "zero"), (1, "one"), (2, "two"), (3, "three")] {
            adv.push(id, name);
        }
        assert_eq!(drain_ids(&mut adv), vec![0, 1, 2, 3, 0, 1, 2, 3]);
        assert!(adv.is_empty());
    }

    #[test]
    fn refresh_mid_sequence_extends_life() {
        let mut adv = Advertizer::new(2);
        adv.push(0u64, "zero");
        adv.push(1, "one");
        adv.push(2, "two");
        adv.push(3, "three");

        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(adv.advertize().unwrap().into_owned());
        }
        assert_eq!(
            seen,
            vec![
                (0, "zero"),
                (1, "one"),
                (2, "two"),
                (3, "three"),
                (0, "zero"),
                (1, "one"),
            ]
        );

        adv.push(1, "one again");

        let mut rest = Vec::new();
        while let Some(a) = adv.advertize() {
            rest.push(a.into_owned());
        }
        assert_eq!(
            rest,
            vec![(1, "one again"), (2, "two"), (3, "three"), (1, "one again")]
        );
        assert!(adv.advertize().is_none());
    }

    #[test]
    fn refresh_resets_round_without_touching_others() {
        let mut adv = Advertizer::new(10);
        for id in 0u64..4 {
            adv.push(id, "");
        }
        for i in 0..12 {
            assert_eq!(adv.advertize().map(|a| *a.id()), Some(i % 4));
        }

        adv.push(1, "");
        adv.push(2, "");
        assert_eq!(adv.advertize_count(&0), Some(3));
        assert_eq!(adv.advertize_count(&1), Some(0));

        let ids: Vec<u64> = (0..8)
            .map(|_| *adv.advertize().unwrap().id())
            .collect();
        assert_eq!(ids, vec![1, 2, 1, 2, 1, 2, 0, 3]);
        adv.check_invariants().unwrap();
    }

    #[test]
    fn max_one_advertizes_each_item_once() {
        let mut adv = Advertizer::new(1);
        adv.push(5u64, "five");
        adv.push(6, "six");
        let first = adv.advertize().unwrap();
        assert!(first.is_last());
        assert_eq!(first.into_owned(), (5, "five"));
        assert_eq!(drain_ids(&mut adv), vec![6]);
    }

    #[test]
    fn repeat_reports_count_and_last_transfers_payload() {
        let mut adv = Advertizer::new(3);
        adv.push(9u64, String::from("nine"));

        match adv.advertize() {
            Some(Advertisement::Repeat { id, payload, count }) => {
                assert_eq!(*id, 9);
                assert_eq!(payload, "nine");
                assert_eq!(count, 1);
            },
            other => panic!("expected repeat, got {:?}", other),
        }
        assert_eq!(adv.remaining(&9), Some(2));

        assert!(matches!(
            adv.advertize(),
            Some(Advertisement::Repeat { count: 2, .. })
        ));
        match adv.advertize() {
            Some(Advertisement::Last { id, payload }) => {
                assert_eq!(id, 9);
                assert_eq!(payload, "nine");
            },
            other => panic!("expected last, got {:?}", other),
        }
        assert!(!adv.contains(&9));
        assert_eq!(adv.remaining(&9), None);
    }

    #[test]
    fn remove_returns_payload_and_updates_len() {
        let mut adv = Advertizer::new(10);
        adv.push(0u64, 0);
        adv.push(1, 1);

        assert_eq!(adv.remove(&1), Some(1));
        assert_eq!(adv.len(), 1);
        assert_eq!(adv.remove(&42), None);
        assert_eq!(adv.len(), 1);
        adv.check_invariants().unwrap();
    }

    #[test]
    fn remove_then_push_behaves_like_fresh_insert() {
        let mut adv = Advertizer::new(3);
        adv.push(0u64, "a");
        adv.push(1, "b");
        adv.advertize();
        adv.advertize();

        assert_eq!(adv.remove(&0), Some("a"));
        adv.push(0, "a2");
        assert_eq!(adv.advertize_count(&0), Some(0));
        assert_eq!(adv.peek(), Some((&0, &"a2")));
        assert_eq!(drain_ids(&mut adv), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn peek_matches_next_advertize() {
        let mut adv = Advertizer::new(2);
        adv.push(3u64, "c");
        adv.push(1, "a");
        adv.push(2, "b");
        for _ in 0..6 {
            let peeked = adv.peek().map(|(id, _)| *id);
            let got = adv.advertize().map(|a| *a.id());
            assert_eq!(peeked, got);
        }
        assert!(adv.peek().is_none());
    }

    #[test]
    fn clear_keeps_sequence_monotonic() {
        let mut adv = Advertizer::with_capacity(2, 8);
        adv.push(1u64, "one");
        adv.push(2, "two");
        adv.clear();
        assert!(adv.is_empty());
        assert!(adv.advertize().is_none());

        adv.push(2, "two");
        adv.push(1, "one");
        assert_eq!(drain_ids(&mut adv), vec![2, 1, 2, 1]);
        adv.check_invariants().unwrap();
    }

    #[test]
    fn reserve_then_push_keeps_order() {
        let mut adv = Advertizer::new(1);
        adv.push(1u64, "one");
        adv.reserve(128);
        adv.push(2, "two");
        assert_eq!(drain_ids(&mut adv), vec![1, 2]);
        adv.check_invariants().unwrap();
    }

    #[test]
    fn iter_visits_every_item() {
        let mut adv = Advertizer::new(4);
        for id in 0u64..5 {
            adv.push(id, id * 10);
        }
        let mut pairs: Vec<(u64, u64)> = adv.iter().map(|(k, v)| (*k, *v)).collect();
        pairs.sort();
        assert_eq!(pairs, (0..5).map(|i| (i, i * 10)).collect::<Vec<_>>());
        assert_eq!(adv.max_advertisements(), 4);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_activity() {
        let mut adv = Advertizer::new(2);
        adv.push(1u64, ());
        adv.push(2, ());
        adv.push(1, ());
        // 2 first (older seq), then 1 twice: repeat, then last
        assert_eq!(adv.advertize().map(|a| *a.id()), Some(2));
        assert_eq!(adv.remove(&2), Some(()));
        assert!(!adv.advertize().unwrap().is_last());
        assert!(adv.advertize().unwrap().is_last());
        assert!(adv.advertize().is_none());

        let m = adv.metrics();
        assert_eq!(m.pushes, 2);
        assert_eq!(m.refreshes, 1);
        assert_eq!(m.advertisements, 3);
        assert_eq!(m.expirations, 1);
        assert_eq!(m.removals, 1);
        assert_eq!(m.empty_advertizes, 1);
        assert!(m.to_string().contains("refreshes: 1"));

        adv.reset_metrics();
        assert_eq!(adv.metrics(), &AdvertizerMetrics::default());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Push(u64, u32),
            Advertize,
            Remove(u64),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u64..20, any::<u32>()).prop_map(|(k, v)| Op::Push(k, v)),
                Just(Op::Advertize),
                Just(Op::Advertize),
                (0u64..20).prop_map(Op::Remove),
            ]
        }

        /// Linear-scan reference: (id, payload, count, seq).
        #[derive(Default)]
        struct Model {
            entries: Vec<(u64, u32, usize, u64)>,
            seq: u64,
        }

        impl Model {
            fn push(&mut self, id: u64, payload: u32) {
                self.seq += 1;
                match self.entries.iter_mut().find(|e| e.0 == id) {
                    Some(e) => *e = (id, payload, 0, self.seq),
                    None => self.entries.push((id, payload, 0, self.seq)),
                }
            }

            fn advertize(&mut self, max: usize) -> Option<(u64, u32, bool)> {
                let idx = (0..self.entries.len())
                    .min_by_key(|&i| (self.entries[i].2, self.entries[i].3))?;
                let (id, payload, count, _) = self.entries[idx];
                if count + 1 >= max {
                    self.entries.swap_remove(idx);
                    Some((id, payload, true))
                } else {
                    self.entries[idx].2 += 1;
                    Some((id, payload, false))
                }
            }

            fn remove(&mut self, id: u64) -> Option<u32> {
                let idx = self.entries.iter().position(|e| e.0 == id)?;
                Some(self.entries.swap_remove(idx).1)
            }
        }

        proptest! {
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_matches_reference_model(
                max in 1usize..5,
                ops in prop::collection::vec(op_strategy(), 0..200)
            ) {
                let mut adv: Advertizer<u64, u32> = Advertizer::new(max);
                let mut model = Model::default();

                for op in ops {
                    match op {
                        Op::Push(k, v) => {
                            adv.push(k, v);
                            model.push(k, v);
                        },
                        Op::Advertize => {
                            let got = adv
                                .advertize()
                                .map(|a| (*a.id(), *a.payload(), a.is_last()));
                            prop_assert_eq!(got, model.advertize(max));
                        },
                        Op::Remove(k) => {
                            prop_assert_eq!(adv.remove(&k), model.remove(k));
                        },
                    }
                    adv.check_invariants().unwrap();
                    prop_assert_eq!(adv.len(), model.entries.len());
                }
            }

            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_each_id_advertized_at_most_max_times(
                max in 1usize..6,
                ids in prop::collection::vec(0u64..50, 0..60)
            ) {
                let mut adv = Advertizer::new(max);
                for id in &ids {
                    adv.push(*id, ());
                }

                let mut counts: FxHashMap<u64, usize> = FxHashMap::default();
                let mut finished: Vec<u64> = Vec::new();
                while let Some(a) = adv.advertize() {
                    let id = *a.id();
                    prop_assert!(!finished.contains(&id));
                    let c = counts.entry(id).or_default();
                    *c += 1;
                    prop_assert!(*c <= max);
                    if a.is_last() {
                        prop_assert_eq!(*c, max);
                        finished.push(id);
                    }
                }
                prop_assert!(counts.values().all(|&c| c == max));
            }
        }
    }
}
