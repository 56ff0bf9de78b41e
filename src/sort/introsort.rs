//! Introspective quicksort: median-of-3/9 pivots, three-way partitioning, and a heapsort
//! fallback once the partition budget runs out.

use std::ops::Range;

use tracing::debug;

use super::insertion::insertion_sort_shift_left;
use super::{IntrosortStats, INSERTION_SORT_THRESHOLD, MEDIAN_OF_NINE_THRESHOLD};
use crate::algorithm::heapsort;

/// Sorts `v` with introsort, *O*(*n* \* log(*n*)) worst-case.
///
/// The budget starts at `v.len()` and shrinks to three quarters at every partition step. Each
/// step costs at most two comparisons per element, and the budget reaches zero after about
/// `log(n) / log(4/3)` steps on any path, after which the remaining sub-slice is heapsorted.
#[inline]
pub(crate) fn introsort<T, F>(v: &mut [T], is_less: &mut F, stats: &mut IntrosortStats)
where
    F: FnMut(&T, &T) -> bool,
{
    let ideal = v.len();
    quicksort(v, ideal, 0, is_less, stats);
}

/// Sorts `v` recursively.
///
/// `ideal` is the remaining partition budget. If zero, this function will immediately switch to
/// heapsort. Only the shorter side of each partition is handled by recursion, the longer side
/// continues in the loop, so the stack depth stays logarithmic even on adversarial input.
fn quicksort<'a, T, F>(
    mut v: &'a mut [T],
    mut ideal: usize,
    mut depth: u32,
    is_less: &mut F,
    stats: &mut IntrosortStats,
) where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let len = v.len();

        if len <= INSERTION_SORT_THRESHOLD {
            insertion_sort_shift_left(v, 1, is_less);
            return;
        }

        // If too many bad pivot choices were made, simply fall back to heapsort in order to
        // guarantee `O(N x log(N))` worst-case.
        if ideal == 0 {
            debug!(len, depth, "partition budget exhausted, finishing with heapsort");
            stats.heapsort_fallbacks += 1;
            heapsort(v, is_less);
            return;
        }

        ideal = (ideal >> 1) + (ideal >> 2);
        depth += 1;
        stats.max_depth = stats.max_depth.max(depth);

        let pivot_pos = choose_pivot(v, is_less);
        let equal = partition(v, pivot_pos, is_less);

        // Split the slice into `left`, the run equal to the pivot, and `right`.
        let (left, rest) = v.split_at_mut(equal.start);
        let right = &mut rest[equal.len()..];

        if left.len() < right.len() {
            quicksort(left, ideal, depth, is_less, stats);
            v = right;
        } else {
            quicksort(right, ideal, depth, is_less, stats);
            v = left;
        }
    }
}

/// Reorders `v` so that `v[index]` holds the element a full sort would put there, everything
/// before it is not ordered after it, and everything after it is not ordered before it.
pub(crate) fn select<'a, T, F>(mut v: &'a mut [T], mut index: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let mut ideal = v.len();

    loop {
        let len = v.len();

        if len <= INSERTION_SORT_THRESHOLD {
            insertion_sort_shift_left(v, 1, is_less);
            return;
        }

        if ideal == 0 {
            debug!(len, "selection budget exhausted, finishing with heapsort");
            heapsort(v, is_less);
            return;
        }

        ideal = (ideal >> 1) + (ideal >> 2);

        let pivot_pos = choose_pivot(v, is_less);
        let equal = partition(v, pivot_pos, is_less);

        if index < equal.start {
            v = v.split_at_mut(equal.start).0;
        } else if index >= equal.end {
            index -= equal.end;
            v = v.split_at_mut(equal.end).1;
        } else {
            // `index` landed in the run of elements equal to the pivot.
            return;
        }
    }
}

/// Selects a pivot from `v`.
///
/// Uses the median of the first, middle and last element, or for longer slices the compact
/// pseudo-median of 9: the median of the medians of three groups of three, sampled around the
/// start, the middle and the end.
fn choose_pivot<T, F: FnMut(&T, &T) -> bool>(v: &[T], is_less: &mut F) -> usize {
    let len = v.len();
    debug_assert!(len >= 8);

    let mid = len / 2;
    if len > MEDIAN_OF_NINE_THRESHOLD {
        let step = len / 8;
        let a = median3(v, 0, step, 2 * step, is_less);
        let b = median3(v, mid - step, mid, mid + step, is_less);
        let c = median3(v, len - 1 - 2 * step, len - 1 - step, len - 1, is_less);
        median3(v, a, b, c, is_less)
    } else {
        median3(v, 0, mid, len - 1, is_less)
    }
}

/// Calculates the position of the median of `v[a]`, `v[b]` and `v[c]`.
#[inline(always)]
fn median3<T, F: FnMut(&T, &T) -> bool>(
    v: &[T],
    a: usize,
    b: usize,
    c: usize,
    is_less: &mut F,
) -> usize {
    // Compiler tends to make this branchless when sensible, and avoids the
    // third comparison when not.
    let x = is_less(&v[a], &v[b]);
    let y = is_less(&v[a], &v[c]);
    if x == y {
        // If x=y=0 then b, c <= a. In this case we want to return max(b, c).
        // If x=y=1 then a < b, c. In this case we want to return min(b, c).
        // By toggling the outcome of b < c using XOR x we get this behavior.
        let z = is_less(&v[b], &v[c]);
        if z ^ x {
            c
        } else {
            b
        }
    } else {
        // Either c <= a < b or b <= a < c, thus a is our median.
        a
    }
}

/// Three-way partition of `v` around `v[pivot]`.
///
/// On return `v[..r.start]` is ordered before the pivot, `v[r.clone()]` is equivalent to it
/// (and starts with the pivot itself), and `v[r.end..]` is ordered after it. Runs of
/// duplicates are thereby taken out of the active region in a single pass.
///
/// If `is_less` does not implement a strict weak order the resulting order is unspecified, but
/// all original elements remain in `v`. The same holds if `is_less` panics.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
fn partition<T, F>(v: &mut [T], pivot: usize, is_less: &mut F) -> Range<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    // Place the pivot at the beginning of slice.
    v.swap(0, pivot);
    let (pivot, rest) = v.split_at_mut(1);
    let pivot = &pivot[0];

    // rest[..lt] < pivot, rest[lt..i] == pivot, rest[i..gt] unknown, rest[gt..] > pivot.
    let mut lt = 0;
    let mut i = 0;
    let mut gt = rest.len();
    while i < gt {
        if is_less(&rest[i], pivot) {
            rest.swap(lt, i);
            lt += 1;
            i += 1;
        } else if is_less(pivot, &rest[i]) {
            gt -= 1;
            rest.swap(i, gt);
        } else {
            i += 1;
        }
    }

    // Place the pivot between the lesser elements and its equals.
    v.swap(0, lt);

    lt..gt + 1
}
