//! Sort throughput against the standard library sorts, and intrusive list sorting.
//!
//! Run with: cargo bench
//!
//! Set `SORT_TEST_SEED` to benchmark the same inputs across runs.

use criterion::{black_box, criterion_group, BatchSize, BenchmarkId, Criterion, Throughput};

use sort_test_tools::patterns;
use stdkit::intrusive::{Link, Linkable, List};
use stdkit::sort;

const SIZES: [usize; 4] = [20, 1_000, 10_000, 1_000_000];

type PatternFn = fn(usize) -> Vec<i32>;

fn pattern_fns() -> [(&'static str, PatternFn); 6] {
    [
        ("random", patterns::random),
        ("random_d20", |len| patterns::random_uniform(len, 0..20)),
        ("random_zipf", |len| patterns::random_zipf(len, 1.0)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saw_mixed", |len| patterns::saw_ascending(len, (len / 100).max(1))),
    ]
}

fn bench_slice_sorts(c: &mut Criterion) {
    let sorts: [(&str, fn(&mut [i32])); 4] = [
        ("stdkit_introsort", |v| sort::sort(v)),
        ("stdkit_stable", |v| sort::stable_sort(v)),
        ("std_unstable", |v| v.sort_unstable()),
        ("std_stable", |v| v.sort()),
    ];

    for (pattern_name, pattern_fn) in pattern_fns() {
        let mut group = c.benchmark_group(format!("sort-i32-{pattern_name}"));

        for len in SIZES {
            let input = pattern_fn(len);
            group.throughput(Throughput::Elements(len as u64));

            for (sort_name, sort_fn) in sorts {
                group.bench_with_input(BenchmarkId::new(sort_name, len), &input, |b, input| {
                    b.iter_batched_ref(
                        || input.clone(),
                        |v| sort_fn(black_box(v.as_mut_slice())),
                        BatchSize::LargeInput,
                    );
                });
            }
        }

        group.finish();
    }
}

fn bench_stable_capacity(c: &mut Criterion) {
    let len = 100_000;
    let input = patterns::random(len);

    let mut group = c.benchmark_group("stable-capacity-i32-random");
    group.throughput(Throughput::Elements(len as u64));

    for capacity in [0, 64, 4_096, len / 2] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &input, |b, input| {
            b.iter_batched_ref(
                || input.clone(),
                |v| {
                    let v = black_box(v.as_mut_slice());
                    sort::stable_sort_in(v, capacity, stdkit::Global, |a, b| a < b);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

struct Node {
    key: i32,
    link: Link,
}

impl Linkable for Node {
    fn link(&self) -> &Link {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link {
        &mut self.link
    }
}

fn linked_nodes(keys: &[i32]) -> (Vec<Node>, List<Node>) {
    let mut storage: Vec<Node> = keys
        .iter()
        .map(|&key| Node {
            key,
            link: Link::new(),
        })
        .collect();

    let mut list = List::new();
    for index in 0..storage.len() {
        list.push_back(&mut storage, index);
    }
    (storage, list)
}

fn bench_list_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("list-sort-random");

    for len in [1_000, 100_000] {
        let keys = patterns::random(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::from_parameter(len), &keys, |b, keys| {
            b.iter_batched_ref(
                || linked_nodes(keys),
                |(storage, list)| list.sort_by_key(storage, |node| node.key),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn pin_thread_to_core() {
    // Core 0 tends to be busiest with interrupts, use the last one.
    let Some(core) = core_affinity::get_core_ids().and_then(|ids| ids.last().copied()) else {
        eprintln!("Could not query core ids, running unpinned");
        return;
    };

    if !core_affinity::set_for_current(core) {
        eprintln!("Failed to pin to core {}, running unpinned", core.id);
    }
}

criterion_group!(benches, bench_slice_sorts, bench_stable_capacity, bench_list_sort);

fn main() {
    pin_thread_to_core();

    benches();

    Criterion::default().configure_from_args().final_summary();
}
