//! Adaptive stable sorting built around the powersort merge policy.
//!
//! The `powersort` module carries the real implementation: natural runs are
//! detected in the input and merged according to boundary "powers" that
//! approximate the optimal merge tree for the run profile at hand. The
//! `timsort` module carries the classic rule-based policy, kept only as a
//! comparison baseline. `patterns` provides the shared input generators for
//! tests and benchmarks.
//!
//! Both policies report their observable counters (total merge cost and peak
//! run-stack height) through [`SortStats`].

macro_rules! sort_impl {
    ($name:expr) => {
        pub struct SortImpl;

        impl crate::Sort for SortImpl {
            fn name() -> String {
                $name.into()
            }

            #[inline]
            fn sort<T>(arr: &mut [T])
            where
                T: Ord,
            {
                sort(arr);
            }

            #[inline]
            fn sort_by<T, F>(arr: &mut [T], compare: F)
            where
                F: FnMut(&T, &T) -> std::cmp::Ordering,
            {
                sort_by(arr, compare);
            }
        }
    };
}

pub mod patterns;
pub mod powersort;
pub mod timsort;

mod merge;
mod power;
mod run;

pub use crate::power::{power, power_reference};
pub use crate::run::{extend_run, Run};

/// Uniform handle over the sort implementations in this crate, so tests and
/// benchmarks can be instantiated per policy.
pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering;
}

/// Per-call options for the powersort policy.
#[derive(Clone, Copy, Debug)]
pub struct SortConfig {
    /// Use the adaptive galloping fast path in two-way merges: once one side
    /// has won seven consecutive picks, the merge switches to an
    /// exponential-then-binary search and bulk copy. Affects performance
    /// only, never the resulting order.
    pub galloping: bool,
    /// Collapse four pending runs in a single pass whenever at least four
    /// are on the stack.
    pub four_way_merge: bool,
    /// Runs shorter than this are extended via binary insertion sort before
    /// being pushed. 1 leaves natural runs as found.
    pub min_run_length: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            galloping: false,
            four_way_merge: false,
            min_run_length: 1,
        }
    }
}

/// Counters observed over one completed sort call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Elements moved across all merges; each merge contributes its merged
    /// length.
    pub merge_cost: u64,
    /// Largest number of pending runs the stack ever held, sampled after
    /// every push.
    pub peak_stack_height: usize,
}
