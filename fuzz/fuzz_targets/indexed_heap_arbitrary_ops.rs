#![no_main]

use advertizer::ds::{IndexedMinHeap, SlotId};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on IndexedMinHeap
//
// Tracks live handles alongside the heap and checks extract order against
// the smallest tracked value.
fuzz_target!(|data: &[u8]| {
    let mut heap: IndexedMinHeap<u8> = IndexedMinHeap::new();
    let mut live: Vec<(SlotId, u8)> = Vec::new();

    let mut idx = 0;
    while idx + 1 < data.len() {
        let op = data[idx] % 4;
        let arg = data[idx + 1];

        match op {
            0 => {
                let id = heap.insert(arg);
                live.push((id, arg));
            }
            1 => {
                let expected = live.iter().map(|(_, v)| *v).min();
                assert_eq!(heap.extract_min(), expected);
                if let Some(pos) = live.iter().position(|(id, _)| !heap.contains(*id)) {
                    live.swap_remove(pos);
                }
            }
            2 => {
                if !live.is_empty() {
                    let i = usize::from(arg) % live.len();
                    let (id, _) = live[i];
                    if let Some(v) = heap.get_mut(id) {
                        *v = arg;
                    }
                    assert!(heap.fix(id));
                    live[i].1 = arg;
                }
            }
            3 => {
                if !live.is_empty() {
                    let i = usize::from(arg) % live.len();
                    let (id, v) = live.swap_remove(i);
                    assert_eq!(heap.remove(id), Some(v));
                    assert!(!heap.fix(id));
                }
            }
            _ => unreachable!(),
        }

        assert_eq!(heap.len(), live.len());
        #[cfg(debug_assertions)]
        heap.check_invariants().unwrap();

        idx += 2;
    }
});
