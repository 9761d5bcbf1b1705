//! Run-boundary priorities for the powersort merge policy.
//!
//! Nearly-Optimal Mergesorts: Fast, Practical Sorting Methods That Optimally
//! Adapt to Existing Runs by J. Ian Munro and Sebastian Wild.
//!
//! Picture the array as the number line from 0 to 1 and take the midpoint of
//! each run as a fraction of the total length. The boundary between two
//! adjacent runs is assigned the number of leading binary digits shared by
//! the two midpoint fractions, plus one; equivalently, the exponent of the
//! simplest dyadic fraction lying between them. A boundary near the global
//! midpoint diverges immediately and gets a small power; a boundary buried
//! deep inside one half shares many leading digits and gets a large one.
//! The driver merges small-power boundaries eagerly and defers large ones,
//! which is what keeps the total merge work near the optimal merge tree for
//! the run profile at hand.

use crate::run::Run;

/// Power of the boundary between the adjacent runs `run1` and `run2` of a
/// sequence of total length `n`, computed in pure integer arithmetic.
///
/// Works on scaled midpoint numerators `a = 2*i1 + n1` and
/// `b = a + n1 + n2` (both twice the respective midpoint). Each iteration
/// inspects one binary digit: values past `n` are rotated down by `n`,
/// which preserves the fractional comparison, and the first iteration where
/// `b` crosses `n` while `a` does not is the divergence point. `u64`
/// intermediates keep `2 * n` representable for any supported sequence
/// length.
pub fn power(run1: &Run, run2: &Run, n: usize) -> u32 {
    debug_assert!(run2.start == run1.start + run1.len, "runs must be adjacent");

    let n = n as u64;
    let mut a = 2 * run1.start as u64 + run1.len as u64;
    let mut b = a + run1.len as u64 + run2.len as u64;

    let mut l = 0u32;
    loop {
        l += 1;
        if a >= n {
            assert!(b >= a, "power rotation produced b < a, driver bookkeeping is corrupt");
            a -= n;
            b -= n;
        } else if b >= n {
            return l;
        }
        a *= 2;
        b *= 2;
    }
}

/// Floating-point reference form of [`power`]: the literal transcription of
/// the definition, testing `floor(m1 * 2^l) == floor(m2 * 2^l)` on the
/// midpoint fractions until they diverge.
///
/// Kept public so the integer form can be differentially tested against it;
/// the two must agree on every valid input.
pub fn power_reference(run1: &Run, run2: &Run, n: usize) -> u32 {
    let m1 = (run1.start as f64 + run1.len as f64 / 2.0) / n as f64;
    let m2 = (run2.start as f64 + run2.len as f64 / 2.0) / n as f64;

    let mut l = 0u32;
    while (m1 * f64::powi(2.0, l as i32)).floor() == (m2 * f64::powi(2.0, l as i32)).floor() {
        l += 1;
    }
    l
}
