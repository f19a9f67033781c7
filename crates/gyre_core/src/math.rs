//! # Branchless Arithmetic
//!
//! Small integer helpers used by the group compaction loops and by the
//! combination registry.
//!
//! `min`/`max` select through a sign mask instead of a comparison branch.
//! They are exact as long as both operands are below `isize::MAX`, which
//! always holds for buffer offsets.

/// Returns `1` when `value` is negative, `0` otherwise.
#[inline]
#[must_use]
pub const fn sign_mask(value: isize) -> usize {
    (value as usize) >> (usize::BITS - 1)
}

/// Returns the smaller of `a` and `b` without branching.
#[inline]
#[must_use]
pub const fn min(a: usize, b: usize) -> usize {
    let mask = sign_mask(a.wrapping_sub(b) as isize);
    a * mask + b * (1 - mask)
}

/// Returns the larger of `a` and `b` without branching.
#[inline]
#[must_use]
pub const fn max(a: usize, b: usize) -> usize {
    let mask = sign_mask(a.wrapping_sub(b) as isize);
    a * (1 - mask) + b * mask
}

/// Returns the highest power of two that is less than or equal to `x`.
///
/// `0` maps to `0`.
#[inline]
#[must_use]
pub const fn highest_power_of_two_in(mut x: u32) -> u32 {
    x |= x >> 1;
    x |= x >> 2;
    x |= x >> 4;
    x |= x >> 8;
    x |= x >> 16;
    x ^ (x >> 1)
}

/// Enumerates every non-empty sub-combination of `items`.
///
/// Combinations are produced from the largest (all items) down to single
/// items; within one size they follow lexicographic index order. A set of
/// `n` items yields `2^n - 1` combinations.
///
/// # Example
///
/// ```rust
/// use gyre_core::math::combinations;
///
/// let combs = combinations(&[1, 2, 3]);
/// assert_eq!(combs.len(), 7);
/// assert_eq!(combs[0], vec![1, 2, 3]);
/// assert_eq!(combs[6], vec![3]);
/// ```
#[must_use]
pub fn combinations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity((1usize << n) - 1);
    let mut cursor: Vec<usize> = Vec::with_capacity(n);

    for k in (1..=n).rev() {
        cursor.clear();
        cursor.extend(0..k);
        loop {
            out.push(cursor.iter().map(|&i| items[i]).collect());

            // Rightmost slot that can still advance
            let Some(pivot) = (0..k).rev().find(|&i| cursor[i] < n - k + i) else {
                break;
            };
            cursor[pivot] += 1;
            for j in pivot + 1..k {
                cursor[j] = cursor[j - 1] + 1;
            }
        }
    }

    out
}
