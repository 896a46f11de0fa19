//! Benchmarks for order selection.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use harp::arp::{order::pattern_index, select_next, sequence_length, ArpOrder};
use rand::{rngs::SmallRng, SeedableRng};

pub fn bench_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/order");
    let mut rng = SmallRng::seed_from_u64(1);

    for held_count in [3usize, 16, 128] {
        group.bench_with_input(
            BenchmarkId::new("up_down_walk", held_count),
            &held_count,
            |b, &n| {
                let len = sequence_length(ArpOrder::UpDown, n);
                b.iter(|| {
                    let mut acc = 0;
                    for step in 0..len {
                        acc += pattern_index(ArpOrder::UpDown, black_box(step), n);
                    }
                    acc
                })
            },
        );

        group.bench_with_input(BenchmarkId::new("random", held_count), &held_count, |b, &n| {
            let mut previous = None;
            b.iter(|| {
                let selection = select_next(ArpOrder::Random, 0, black_box(n), previous, &mut rng);
                if let harp::arp::Selection::Single(index) = selection {
                    previous = Some(index);
                }
                selection
            })
        });
    }

    group.finish();
}
