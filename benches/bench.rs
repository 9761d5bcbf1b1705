use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use powersort_comp::{patterns, powersort, timsort, SortConfig};

const GALLOPING: SortConfig = SortConfig {
    galloping: true,
    four_way_merge: false,
    min_run_length: 1,
};

const FOUR_WAY: SortConfig = SortConfig {
    galloping: false,
    four_way_merge: true,
    min_run_length: 1,
};

const MIN_RUN_24: SortConfig = SortConfig {
    galloping: false,
    four_way_merge: false,
    min_run_length: 24,
};

#[inline(never)]
fn bench_sort(
    c: &mut Criterion,
    test_size: usize,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
    bench_name: &str,
    sort_func: impl Fn(&mut [i32]),
) {
    let batch_size = if test_size > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    };

    c.bench_function(&format!("{bench_name}-{pattern_name}-{test_size}"), |b| {
        b.iter_batched(
            || pattern_provider(test_size),
            |mut test_data| sort_func(black_box(test_data.as_mut_slice())),
            batch_size,
        )
    });
}

fn bench_patterns(c: &mut Criterion) {
    // Fresh values per batch; a fixed seed would hand adaptive sorts the
    // same run structure over and over.
    patterns::disable_fixed_seed();

    let pattern_providers: Vec<(&str, fn(usize) -> Vec<i32>)> = vec![
        ("random", patterns::random),
        ("random_dups", |size| patterns::random_uniform(size, 0..16)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saw_mixed", |size| patterns::saw_mixed(size, 32)),
        ("pipe_organ", patterns::pipe_organ),
    ];

    for &(pattern_name, ref pattern_provider) in &pattern_providers {
        for test_size in [20usize, 1_000, 100_000] {
            bench_sort(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                "powersort",
                |v| {
                    powersort::sort(v);
                },
            );
            bench_sort(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                "powersort_galloping",
                |v| {
                    powersort::sort_with_config(v, &GALLOPING);
                },
            );
            bench_sort(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                "powersort_four_way",
                |v| {
                    powersort::sort_with_config(v, &FOUR_WAY);
                },
            );
            bench_sort(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                "powersort_min_run",
                |v| {
                    powersort::sort_with_config(v, &MIN_RUN_24);
                },
            );
            bench_sort(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                "timsort_rules",
                |v| {
                    timsort::sort(v);
                },
            );
            bench_sort(
                c,
                test_size,
                pattern_name,
                pattern_provider,
                "rust_std_stable",
                |v| {
                    v.sort();
                },
            );
        }
    }
}

criterion_group!(benches, bench_patterns);
criterion_main!(benches);
