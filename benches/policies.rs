//! Replay throughput of the three replacement policies.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pagesim::{ClockPolicy, LruPolicy, PageId, RandomPolicy, ReplacementPolicy};

const FRAMES: usize = 64;
const ACCESSES: usize = 10_000;
const PAGES: u64 = 512;

/// A locality-skewed access stream: most touches land in a small hot
/// set, the rest scatter over the full page range.
fn synthetic_events(seed: u64) -> Vec<(PageId, bool)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let hot = PAGES / 10 + 1;

    (0..ACCESSES)
        .map(|_| {
            let page = if rng.gen_bool(0.9) {
                rng.gen_range(0..hot)
            } else {
                rng.gen_range(0..PAGES)
            };
            (PageId::new(page), rng.gen_bool(0.25))
        })
        .collect()
}

fn replay<P: ReplacementPolicy>(mut mmu: P, events: &[(PageId, bool)]) -> P {
    for &(page, is_write) in events {
        mmu.access(page, is_write).unwrap();
    }
    mmu
}

fn bench_policies(c: &mut Criterion) {
    let events = synthetic_events(42);
    let mut group = c.benchmark_group("replay_10k");

    group.bench_function("rand", |b| {
        b.iter_batched(
            || RandomPolicy::with_seed(FRAMES, 7).unwrap(),
            |mmu| replay(mmu, &events),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("lru", |b| {
        b.iter_batched(
            || LruPolicy::new(FRAMES).unwrap(),
            |mmu| replay(mmu, &events),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("clock", |b| {
        b.iter_batched(
            || ClockPolicy::new(FRAMES).unwrap(),
            |mmu| replay(mmu, &events),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);
