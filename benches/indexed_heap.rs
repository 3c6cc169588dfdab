use advertizer::ds::{IndexedMinHeap, SlotId};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_insert_extract(c: &mut Criterion) {
    c.bench_function("indexed_heap_insert_extract", |b| {
        b.iter(|| {
            let mut heap = IndexedMinHeap::with_capacity(1024);
            for i in (0..1024u64).rev() {
                heap.insert(black_box(i));
            }
            while let Some(v) = heap.extract_min() {
                black_box(v);
            }
        })
    });
}

fn bench_fix(c: &mut Criterion) {
    c.bench_function("indexed_heap_fix", |b| {
        let mut heap = IndexedMinHeap::with_capacity(1024);
        let ids: Vec<SlotId> = (0..1024u64).map(|i| heap.insert(i)).collect();
        let mut bump = 1024u64;
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 131) % ids.len();
            if let Some(v) = heap.get_mut(ids[i]) {
                bump += 1;
                *v = bump;
            }
            heap.fix(ids[i]);
        })
    });
}

criterion_group!(benches, bench_insert_extract, bench_fix);
criterion_main!(benches);
