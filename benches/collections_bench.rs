//! Benchmarks for the allocopt collections against their `std` counterparts
//!
//! - Deque vs VecDeque (two-ended churn with wrap-around)
//! - Dictionary vs HashMap (insert, lookup, remove/reinsert churn)
//! - Set algebra vs HashSet
//! - ArenaLinkedList vs VecDeque at the ends, plus handle-based middle inserts
//! - PrefixTree vs ArenaPrefixTree vs BTreeSet<Vec<u8>>

use allocopt::{ArenaLinkedList, ArenaPrefixTree, Deque, Dictionary, PrefixTree, Set};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::time::Duration;

// =============================================================================
// BENCHMARK CONFIGURATION
// =============================================================================

const SIZES: &[usize] = &[100, 1_000, 10_000];

fn random_keys(count: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen()).collect()
}

fn random_words(count: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(3..12);
            (0..len).map(|_| rng.gen_range(b'a'..=b'z')).collect()
        })
        .collect()
}

// =============================================================================
// RING BUFFER
// =============================================================================

fn bench_deque_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("deque_churn");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    for &size in SIZES {
        group.throughput(Throughput::Elements(size as u64 * 2));

        group.bench_with_input(BenchmarkId::new("std::VecDeque", size), &size, |b, &size| {
            b.iter(|| {
                let mut deque = VecDeque::new();
                for i in 0..size {
                    if i % 2 == 0 {
                        deque.push_front(black_box(i));
                    } else {
                        deque.push_back(black_box(i));
                    }
                }
                while let Some(v) = deque.pop_front() {
                    black_box(v);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("Deque", size), &size, |b, &size| {
            b.iter(|| {
                let mut deque = Deque::new();
                for i in 0..size {
                    if i % 2 == 0 {
                        deque.enqueue_first(black_box(i)).unwrap();
                    } else {
                        deque.enqueue_last(black_box(i)).unwrap();
                    }
                }
                while let Some(v) = deque.try_dequeue_first() {
                    black_box(v);
                }
            });
        });
    }
    group.finish();
}

// =============================================================================
// HASH TABLE
// =============================================================================

fn bench_dictionary_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary_insert");
    for &size in SIZES {
        let keys = random_keys(size, 1);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("std::HashMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = HashMap::new();
                for &k in keys {
                    map.insert(black_box(k), k);
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("Dictionary", size), &keys, |b, keys| {
            b.iter(|| {
                let mut dict = Dictionary::new();
                for &k in keys {
                    dict.insert(black_box(k), k).unwrap();
                }
                black_box(dict)
            });
        });
    }
    group.finish();
}

fn bench_dictionary_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary_lookup");
    for &size in SIZES {
        let keys = random_keys(size, 2);
        let map: HashMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        let dict: Dictionary<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("std::HashMap", size), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(map.get(k));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("Dictionary", size), &keys, |b, keys| {
            b.iter(|| {
                for k in keys {
                    black_box(dict.get(k));
                }
            });
        });
    }
    group.finish();
}

fn bench_dictionary_free_list_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary_remove_reinsert");
    let keys = random_keys(10_000, 3);

    group.bench_function("std::HashMap", |b| {
        let mut map: HashMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| {
            for &k in keys.iter().step_by(3) {
                map.remove(&k);
            }
            for &k in keys.iter().step_by(3) {
                map.insert(k, k);
            }
        });
    });

    group.bench_function("Dictionary", |b| {
        let mut dict: Dictionary<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        b.iter(|| {
            for &k in keys.iter().step_by(3) {
                dict.remove(&k);
            }
            for &k in keys.iter().step_by(3) {
                dict.insert(k, k).unwrap();
            }
        });
    });
    group.finish();
}

fn bench_set_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_intersect");
    let a = random_keys(10_000, 4);
    let mut b_keys = random_keys(5_000, 5);
    b_keys.extend_from_slice(&a[..5_000]);

    group.bench_function("std::HashSet", |b| {
        b.iter(|| {
            let mut set: HashSet<u64> = a.iter().copied().collect();
            let other: HashSet<u64> = b_keys.iter().copied().collect();
            set.retain(|k| other.contains(k));
            black_box(set.len())
        });
    });

    group.bench_function("Set", |b| {
        b.iter(|| {
            let mut set: Set<u64> = a.iter().copied().collect();
            set.intersect_with(&b_keys);
            black_box(set.len())
        });
    });
    group.finish();
}

// =============================================================================
// ARENA STRUCTURES
// =============================================================================

fn bench_arena_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_list");
    for &size in SIZES {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("std::VecDeque", size), &size, |b, &size| {
            b.iter(|| {
                let mut list = VecDeque::new();
                for i in 0..size {
                    list.push_back(black_box(i));
                }
                while list.pop_front().is_some() {}
            });
        });

        group.bench_with_input(BenchmarkId::new("ArenaLinkedList", size), &size, |b, &size| {
            b.iter(|| {
                let mut list = ArenaLinkedList::new();
                for i in 0..size {
                    list.add_last(black_box(i)).unwrap();
                }
                while list.remove_first().is_some() {}
            });
        });

        group.bench_with_input(
            BenchmarkId::new("ArenaLinkedList/add_after", size),
            &size,
            |b, &size| {
                b.iter(|| {
                    let mut list = ArenaLinkedList::new();
                    let anchor = list.add_last(0).unwrap();
                    for i in 0..size {
                        list.add_after(anchor, black_box(i)).unwrap();
                    }
                    black_box(list.len())
                });
            },
        );
    }
    group.finish();
}

fn bench_prefix_trees(c: &mut Criterion) {
    let mut group = c.benchmark_group("prefix_tree_insert");
    for &size in SIZES {
        let words = random_words(size, 6);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("std::BTreeSet", size), &words, |b, words| {
            b.iter(|| {
                let set: BTreeSet<Vec<u8>> = words.iter().cloned().collect();
                black_box(set.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("PrefixTree", size), &words, |b, words| {
            b.iter(|| {
                let mut tree = PrefixTree::new();
                for word in words {
                    tree.try_add(word.iter().copied(), ());
                }
                black_box(tree.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("ArenaPrefixTree", size), &words, |b, words| {
            b.iter(|| {
                let mut tree = ArenaPrefixTree::new();
                for word in words {
                    tree.try_add(word.iter().copied(), ()).unwrap();
                }
                black_box(tree.len())
            });
        });
    }
    group.finish();
}

criterion_group!(
    collection_benches,
    bench_deque_churn,
    bench_dictionary_insert,
    bench_dictionary_lookup,
    bench_dictionary_free_list_churn,
    bench_set_algebra,
    bench_arena_list,
    bench_prefix_trees
);
criterion_main!(collection_benches);
