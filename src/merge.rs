//! Stable run merging through a reusable scratch buffer.
//!
//! Every merge moves the whole span into the scratch buffer and merges it
//! back into the sequence, so the write side never overtakes an unread
//! element. Panic safety hangs on [`MergeHole`]: the moment the span is
//! copied out, the hole owns the parked elements and its `Drop` writes every
//! unconsumed one back into the sequence. A comparator panic therefore
//! leaves the sequence a permutation of its input with each element owned
//! exactly once, and normal completion uses the very same drop to flush the
//! bulk remainder.

use std::mem;
use std::ptr;

use crate::run::Run;

/// Consecutive picks one side must win before a merge switches to galloping.
pub(crate) const GALLOP_THRESHOLD: u32 = 7;

/// Owner of the scratch buffer and the merge-cost counter.
///
/// The scratch `Vec` is kept at length zero so destructors never run on the
/// shallow copies parked in it; only its capacity matters, and the capacity
/// grows monotonically to the largest merge performed so far. Scratch
/// contents are meaningful only within a single merge call. One engine may
/// be reused across any number of sequential sorts, but never shared
/// between concurrent ones.
pub(crate) struct MergeEngine<T> {
    scratch: Vec<T>,
    pub(crate) merge_cost: u64,
    galloping: bool,
}

impl<T> MergeEngine<T> {
    pub(crate) fn new(galloping: bool) -> Self {
        Self {
            scratch: Vec::new(),
            merge_cost: 0,
            galloping,
        }
    }

    fn scratch_ptr(&mut self, required: usize) -> *mut T {
        if self.scratch.capacity() < required {
            // len is 0, so this reserves the full merge width.
            self.scratch.reserve(required);
        }
        self.scratch.as_mut_ptr()
    }

    /// Merges the adjacent runs `y` and `z` into one, stably: on equal
    /// elements the left run wins. The merged run inherits `y.power`.
    pub(crate) fn merge_two<F>(&mut self, v: &mut [T], y: Run, z: Run, is_less: &mut F) -> Run
    where
        F: FnMut(&T, &T) -> bool,
    {
        debug_assert!(mem::size_of::<T>() != 0);
        assert!(
            y.len > 0 && z.len > 0 && z.start == y.start + y.len && z.start + z.len <= v.len(),
            "two-way merge needs two adjacent non-empty runs"
        );

        let merged_len = y.len + z.len;
        let buf = self.scratch_ptr(merged_len);
        let galloping = self.galloping;

        // SAFETY: `buf` holds capacity for `merged_len` elements and cannot
        // alias `v`. The span is moved out wholesale; from that point the
        // hole owns the parked elements and restores every unconsumed one,
        // whether the merge finishes or `is_less` panics.
        unsafe {
            let span = v.as_mut_ptr().add(y.start);
            ptr::copy_nonoverlapping(span, buf, merged_len);

            let mid = buf.add(y.len) as *const T;
            let end = buf.add(merged_len) as *const T;
            let mut hole = MergeHole {
                segments: [
                    (buf as *const T, mid),
                    (mid, end),
                    (end, end),
                    (end, end),
                ],
                dest: span,
            };

            let mut left_streak = 0u32;
            let mut right_streak = 0u32;

            loop {
                let (l, l_end) = hole.segments[0];
                let (r, r_end) = hole.segments[1];
                if l == l_end || r == r_end {
                    break;
                }

                if galloping && left_streak >= GALLOP_THRESHOLD {
                    // The left side keeps winning: move every remaining left
                    // element `<= *r` in one pass, keeping ties on the left.
                    let chunk = gallop_right(&*r, l, l_end.offset_from(l) as usize, is_less);
                    hole.copy_from_segment(0, chunk);
                    left_streak = 0;
                    right_streak = 0;
                    continue;
                }
                if galloping && right_streak >= GALLOP_THRESHOLD {
                    // Mirror image: move every right element strictly
                    // `< *l` in one pass.
                    let chunk = gallop_left(&*l, r, r_end.offset_from(r) as usize, is_less);
                    hole.copy_from_segment(1, chunk);
                    left_streak = 0;
                    right_streak = 0;
                    continue;
                }

                if is_less(&*r, &*l) {
                    hole.copy_from_segment(1, 1);
                    right_streak += 1;
                    left_streak = 0;
                } else {
                    hole.copy_from_segment(0, 1);
                    left_streak += 1;
                    right_streak = 0;
                }
            }

            // Flushes whichever side is unconsumed.
            drop(hole);
        }

        self.merge_cost += merged_len as u64;

        Run {
            start: y.start,
            len: merged_len,
            power: y.power,
        }
    }

    /// Merges four pairwise-adjacent runs in one output pass. Each step
    /// scans the active heads left to right and strict comparison decides
    /// replacement, so among equal heads the leftmost source run wins; that
    /// makes the result identical to three sequential two-way merges.
    /// The merged run inherits `a.power`.
    pub(crate) fn merge_four<F>(
        &mut self,
        v: &mut [T],
        a: Run,
        b: Run,
        c: Run,
        d: Run,
        is_less: &mut F,
    ) -> Run
    where
        F: FnMut(&T, &T) -> bool,
    {
        debug_assert!(mem::size_of::<T>() != 0);
        assert!(
            a.len > 0
                && b.len > 0
                && c.len > 0
                && d.len > 0
                && b.start == a.start + a.len
                && c.start == b.start + b.len
                && d.start == c.start + c.len
                && d.start + d.len <= v.len(),
            "four-way merge needs four adjacent non-empty runs"
        );

        let merged_len = a.len + b.len + c.len + d.len;
        let buf = self.scratch_ptr(merged_len);

        // SAFETY: same contract as `merge_two`; the hole owns all four
        // parked segments.
        unsafe {
            let span = v.as_mut_ptr().add(a.start);
            ptr::copy_nonoverlapping(span, buf, merged_len);

            let g1 = buf.add(a.len) as *const T;
            let g2 = buf.add(a.len + b.len) as *const T;
            let g3 = buf.add(a.len + b.len + c.len) as *const T;
            let end = buf.add(merged_len) as *const T;
            let mut hole = MergeHole {
                segments: [(buf as *const T, g1), (g1, g2), (g2, g3), (g3, end)],
                dest: span,
            };

            loop {
                let mut best = usize::MAX;
                let mut active = 0;
                for idx in 0..4 {
                    let (head, seg_end) = hole.segments[idx];
                    if head == seg_end {
                        continue;
                    }
                    active += 1;
                    if best == usize::MAX || is_less(&*head, &*hole.segments[best].0) {
                        best = idx;
                    }
                }
                if active <= 1 {
                    // The hole bulk-copies the last segment on drop.
                    break;
                }
                hole.copy_from_segment(best, 1);
            }

            drop(hole);
        }

        self.merge_cost += merged_len as u64;

        Run {
            start: a.start,
            len: merged_len,
            power: a.power,
        }
    }
}

/// Unconsumed scratch segments of an in-flight merge, in output order,
/// plus the next write position in the sequence buffer.
///
/// On drop, every remaining element is copied back out in segment order.
struct MergeHole<T> {
    segments: [(*const T, *const T); 4],
    dest: *mut T,
}

impl<T> MergeHole<T> {
    /// Moves `count` elements from the front of `segments[idx]` to `dest`.
    unsafe fn copy_from_segment(&mut self, idx: usize, count: usize) {
        let (start, end) = self.segments[idx];
        debug_assert!(count <= end.offset_from(start) as usize);
        ptr::copy_nonoverlapping(start, self.dest, count);
        self.segments[idx].0 = start.add(count);
        self.dest = self.dest.add(count);
    }
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: segments are live parked elements in the scratch buffer
        // and `dest` has exactly as much room left as they occupy.
        unsafe {
            for idx in 0..self.segments.len() {
                let (start, end) = self.segments[idx];
                let len = end.offset_from(start) as usize;
                ptr::copy_nonoverlapping(start, self.dest, len);
                self.dest = self.dest.add(len);
            }
        }
    }
}

/// First index in `seg[..len]` whose element is `> key`; everything before
/// it is `<= key` and may be bulk-copied while keeping equal elements on
/// the left side.
unsafe fn gallop_right<T, F>(key: &T, seg: *const T, len: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    exponential_search(seg, len, &mut |elem| !is_less(key, elem))
}

/// First index in `seg[..len]` whose element is `>= key`; everything before
/// it is strictly `< key`.
unsafe fn gallop_left<T, F>(key: &T, seg: *const T, len: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    exponential_search(seg, len, &mut |elem| is_less(elem, key))
}

/// Partition point of `pred` over `seg[..len]`: `pred` holds for a prefix
/// and the returned index is the first element it does not hold for.
/// Probes at exponentially growing offsets, then binary-searches the last
/// doubling interval.
unsafe fn exponential_search<T, F>(seg: *const T, len: usize, pred: &mut F) -> usize
where
    F: FnMut(&T) -> bool,
{
    let mut bound = 1;
    while bound < len && pred(&*seg.add(bound - 1)) {
        bound <<= 1;
    }

    let mut lo = bound / 2;
    let mut hi = usize::min(bound, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(&*seg.add(mid)) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
