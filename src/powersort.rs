//! The powersort driver.
//!
//! Keeps a stack of pending runs whose boundary powers increase strictly
//! from bottom to top. Each newly detected run first collapses the stack:
//! while its boundary power against the current top is less than or equal
//! to the top's stored power, the topmost pending runs are merged. The
//! low-power boundaries (the ones near the global midpoint) are thereby
//! resolved early while high-power boundaries wait, which keeps the total
//! merge work near the optimum for the run lengths actually present.

use std::cmp::Ordering;
use std::mem;

use crate::merge::MergeEngine;
use crate::power;
use crate::run::{self, Run};
use crate::{SortConfig, SortStats};

sort_impl!("powersort_stable");

/// Sorts the slice with the default configuration.
///
/// Stable and adaptive: consumes pre-existing ascending runs wholesale, so
/// already-sorted input costs a single detection scan and zero merges.
#[inline]
pub fn sort<T>(v: &mut [T])
where
    T: Ord,
{
    sort_with_config(v, &SortConfig::default());
}

/// Sorts the slice with a comparator function and the default configuration.
#[inline]
pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_by_with_config(v, compare, &SortConfig::default());
}

/// Sorts the slice under `config` and reports the observed counters.
#[inline]
pub fn sort_with_config<T>(v: &mut [T], config: &SortConfig) -> SortStats
where
    T: Ord,
{
    sort_by_with_config(v, |a, b| a.cmp(b), config)
}

/// Sorts the slice with a comparator under `config` and reports the
/// observed counters.
///
/// The comparator must be a total order. A panicking comparator aborts the
/// sort and unwinds to the caller; the slice is then some permutation of
/// its input, with every element present exactly once.
#[inline]
pub fn sort_by_with_config<T, F>(v: &mut [T], mut compare: F, config: &SortConfig) -> SortStats
where
    F: FnMut(&T, &T) -> Ordering,
{
    powersort(v, &mut |a, b| compare(a, b) == Ordering::Less, config)
}

fn powersort<T, F>(v: &mut [T], is_less: &mut F, config: &SortConfig) -> SortStats
where
    F: FnMut(&T, &T) -> bool,
{
    let n = v.len();

    // Sorting has no meaningful behavior on zero-sized types, and one
    // element is one trivial run.
    if mem::size_of::<T>() == 0 || n < 2 {
        return SortStats {
            merge_cost: 0,
            peak_stack_height: usize::from(n > 0),
        };
    }

    let mut engine = MergeEngine::new(config.galloping);
    let mut runs: Vec<Run> = Vec::new();
    let mut peak = 0;

    let mut i = 0;
    while i < n {
        let detected = run::extend_run_by(v, i, is_less);
        let j = run::provide_min_run(v, i, detected, config.min_run_length, is_less);

        let mut next = Run {
            start: i,
            len: j - i,
            power: 0,
        };
        if let Some(top) = runs.last().copied() {
            // The boundary power is fixed against the run that was on top
            // when this run appeared, before any collapse happens.
            let p = power::power(&top, &next, n);
            while runs.last().map_or(false, |top| p <= top.power) {
                collapse_step(v, &mut runs, &mut engine, config, is_less);
            }
            next.power = p;
        }

        runs.push(next);
        peak = usize::max(peak, runs.len());
        i = j;
    }

    // Input exhausted: drain the stack down to a single run.
    while runs.len() >= 2 {
        collapse_step(v, &mut runs, &mut engine, config, is_less);
    }

    debug_assert!(runs.len() == 1 && runs[0].start == 0 && runs[0].len == n);

    SortStats {
        merge_cost: engine.merge_cost,
        peak_stack_height: peak,
    }
}

/// One collapse step: merges the topmost pending runs, four at a time when
/// the option is on and enough are pending, the top pair otherwise.
fn collapse_step<T, F>(
    v: &mut [T],
    runs: &mut Vec<Run>,
    engine: &mut MergeEngine<T>,
    config: &SortConfig,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    if config.four_way_merge && runs.len() >= 4 {
        merge_top_four(v, runs, engine, is_less);
    } else {
        merge_top_two(v, runs, engine, is_less);
    }
}

fn merge_top_two<T, F>(
    v: &mut [T],
    runs: &mut Vec<Run>,
    engine: &mut MergeEngine<T>,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    assert!(runs.len() >= 2, "two-way collapse needs two pending runs");

    let z = runs.pop().unwrap();
    let y = runs.pop().unwrap();
    runs.push(engine.merge_two(v, y, z, is_less));
}

fn merge_top_four<T, F>(
    v: &mut [T],
    runs: &mut Vec<Run>,
    engine: &mut MergeEngine<T>,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    assert!(runs.len() >= 4, "four-way collapse needs four pending runs");

    let d = runs.pop().unwrap();
    let c = runs.pop().unwrap();
    let b = runs.pop().unwrap();
    let a = runs.pop().unwrap();
    runs.push(engine.merge_four(v, a, b, c, d, is_less));
}
