//! Comparison sorts over slices.
//!
//! All `_by` variants take a strict weak ordering `is_less(a, b)`, which returns `true` if `a`
//! must be placed before `b`. If the ordering is not a strict weak order the resulting order is
//! unspecified, but every element of the input is still present exactly once. The same holds
//! if `is_less` panics; the panic propagates to the caller after the slice has been restored to
//! a permutation of its input and any scratch memory has been released.

mod insertion;
mod introsort;
mod merge;
mod stable;

pub use merge::{merge, merge_by};

use std::mem::{self, size_of};

use crate::algorithm::{make_heap_by, sift_down, sort_heap_by};
use crate::scratch::{Global, RawAllocator};

/// Slices of up to this length are sorted with insertion sort, and the sorts switch to it once
/// a sub-slice has shrunk to this length.
pub const INSERTION_SORT_THRESHOLD: usize = 32;

/// Slices longer than this pick their quicksort pivot as the pseudo-median of 9 instead of the
/// median of 3.
pub const MEDIAN_OF_NINE_THRESHOLD: usize = 40;

/// Counters collected by [`introsort_stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntrosortStats {
    /// Calls to the comparator.
    pub comparisons: u64,
    /// Deepest chain of partition steps on any path through the input.
    pub max_depth: u32,
    /// Sub-slices that exhausted their partition budget and were heapsorted.
    pub heapsort_fallbacks: u32,
}

// --- Insertion sort ---

/// Sorts the slice with insertion sort.
///
/// Stable, in-place, *O*(*n*^2) worst-case and *O*(*n*) on sorted input. Intended for short or
/// nearly sorted slices.
#[inline]
pub fn insertion_sort<T: Ord>(v: &mut [T]) {
    insertion_sort_by(v, |a, b| a.lt(b));
}

/// Sorts the slice with insertion sort, ordered by `is_less`.
#[inline]
pub fn insertion_sort_by<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    insertion::insertion_sort_shift_left(v, 1, &mut is_less);
}

// --- Unstable sort ---

/// Sorts the slice, but might not preserve the order of equal elements.
///
/// This sort is unstable (i.e., may reorder equal elements), in-place
/// (i.e., does not allocate), and *O*(*n* \* log(*n*)) worst-case.
///
/// # Current implementation
///
/// The algorithm is an introsort. Quicksort with a median-of-3 pivot, or a pseudo-median of 9
/// for longer slices, and three-way partitioning, so that runs of equal elements are removed
/// from further partitioning in one step. Every partition step shrinks a budget that starts at
/// the slice length to three quarters, and a sub-slice that runs out of budget is finished with
/// heapsort. Short sub-slices are finished with insertion sort.
///
/// # Examples
///
/// ```
/// let mut v = [5, 3, 8, 1, 9, 2];
///
/// stdkit::sort::sort(&mut v);
/// assert!(v == [1, 2, 3, 5, 8, 9]);
/// ```
#[inline]
pub fn sort<T: Ord>(v: &mut [T]) {
    sort_by(v, |a, b| a.lt(b));
}

/// Sorts the slice with a comparator function, but might not preserve the order of equal
/// elements.
///
/// This sort is unstable (i.e., may reorder equal elements), in-place
/// (i.e., does not allocate), and *O*(*n* \* log(*n*)) worst-case.
///
/// The comparator must define a strict weak ordering: `is_less(a, a)` is always `false`, and
/// `is_less` is transitive, as is its induced equivalence `!is_less(a, b) && !is_less(b, a)`.
///
/// # Examples
///
/// ```
/// let mut v = [5, 3, 8, 1, 9, 2];
///
/// // reverse sorting
/// stdkit::sort::sort_by(&mut v, |a, b| a > b);
/// assert!(v == [9, 8, 5, 3, 2, 1]);
/// ```
pub fn sort_by<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    // Arrays of zero-sized types are always all-equal, and thus sorted.
    if size_of::<T>() == 0 || v.len() < 2 {
        return;
    }

    let mut stats = IntrosortStats::default();
    introsort::introsort(v, &mut is_less, &mut stats);
}

/// Sorts the slice by the key extracted with `f`, unstably.
#[inline]
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    sort_by(v, |a, b| f(a).lt(&f(b)));
}

/// Sorts the slice like [`sort_by`] and reports what the introsort did.
///
/// The counters make the worst-case guarantee observable: the number of comparisons stays
/// within a constant factor of `n * log2(n)` and `max_depth` within a constant factor of
/// `log2(n)` for every input.
pub fn introsort_stats<T, F>(v: &mut [T], mut is_less: F) -> IntrosortStats
where
    F: FnMut(&T, &T) -> bool,
{
    let mut stats = IntrosortStats::default();
    if size_of::<T>() == 0 || v.len() < 2 {
        return stats;
    }

    let mut comparisons = 0u64;
    let mut counting = |a: &T, b: &T| {
        comparisons += 1;
        is_less(a, b)
    };
    introsort::introsort(v, &mut counting, &mut stats);

    stats.comparisons = comparisons;
    stats
}

// --- Stable sort ---

/// Sorts the slice, preserving the order of equal elements.
///
/// This sort is stable (i.e., does not reorder equal elements) and *O*(*n* \* log(*n*))
/// worst-case.
///
/// # Current implementation
///
/// A merge sort that acquires a scratch buffer of half the slice length from the global
/// allocator. Short slices are insertion sorted without allocating. See [`stable_sort_in`] to
/// bound the scratch memory or to supply a different allocator.
///
/// # Examples
///
/// ```
/// let mut v = [(1, "a"), (2, "b"), (1, "c")];
///
/// stdkit::sort::stable_sort_by_key(&mut v, |p| p.0);
/// assert!(v == [(1, "a"), (1, "c"), (2, "b")]);
/// ```
#[inline]
pub fn stable_sort<T: Ord>(v: &mut [T]) {
    stable_sort_by(v, |a, b| a.lt(b));
}

/// Sorts the slice with a comparator function, preserving the order of equal elements.
#[inline]
pub fn stable_sort_by<T, F>(v: &mut [T], is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let capacity = v.len() - v.len() / 2;
    stable_sort_in(v, capacity, Global, is_less);
}

/// Sorts the slice by the key extracted with `f`, preserving the order of equal elements.
#[inline]
pub fn stable_sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    stable_sort_by(v, |a, b| f(a).lt(&f(b)));
}

/// Sorts the slice stably with a scratch buffer of at most `capacity` elements taken from
/// `alloc`.
///
/// Any capacity is accepted, including zero. With at least half the slice length the sort runs
/// in *O*(*n* \* log(*n*)); with less, merges that do not fit are split by block rotations,
/// trading moves for memory down to *O*(*n* \* log(*n*)^2) without any buffer.
///
/// The buffer is acquired once per call and released before returning. Allocation failure is
/// fatal.
pub fn stable_sort_in<T, F, A>(v: &mut [T], capacity: usize, alloc: A, mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
    A: RawAllocator,
{
    stable::stable_sort(v, capacity, alloc, &mut is_less);
}

/// Stably merges the sorted runs `v[..mid]` and `v[mid..]`.
///
/// # Panics
///
/// Panics if `mid > v.len()`.
#[inline]
pub fn inplace_merge<T: Ord>(v: &mut [T], mid: usize) {
    inplace_merge_by(v, mid, |a, b| a.lt(b));
}

/// Stably merges the runs `v[..mid]` and `v[mid..]`, both sorted by `is_less`.
///
/// Buffers the shorter run, a scratch buffer of at most `v.len() / 2` elements.
#[inline]
pub fn inplace_merge_by<T, F>(v: &mut [T], mid: usize, is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    inplace_merge_in(v, mid, usize::MAX, Global, is_less);
}

/// [`inplace_merge_by`] with a scratch buffer of at most `capacity` elements from `alloc`.
pub fn inplace_merge_in<T, F, A>(v: &mut [T], mid: usize, capacity: usize, alloc: A, mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
    A: RawAllocator,
{
    stable::inplace_merge(v, mid, capacity, alloc, &mut is_less);
}

// --- Partial ordering ---

/// Returns `true` if the slice is sorted.
#[inline]
pub fn is_sorted<T: Ord>(v: &[T]) -> bool {
    is_sorted_by(v, |a, b| a.lt(b))
}

/// Returns `true` if no element is ordered before its predecessor under `is_less`.
#[inline]
pub fn is_sorted_by<T, F>(v: &[T], is_less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    is_sorted_until_by(v, is_less) == v.len()
}

/// Length of the longest sorted prefix.
#[inline]
pub fn is_sorted_until<T: Ord>(v: &[T]) -> usize {
    is_sorted_until_by(v, |a, b| a.lt(b))
}

/// Length of the longest prefix sorted by `is_less`.
pub fn is_sorted_until_by<T, F>(v: &[T], mut is_less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    (1..v.len())
        .find(|&i| is_less(&v[i], &v[i - 1]))
        .unwrap_or(v.len())
}

/// Sorts the `mid` smallest elements into `v[..mid]`; the order of `v[mid..]` is unspecified.
///
/// # Panics
///
/// Panics if `mid > v.len()`.
#[inline]
pub fn partial_sort<T: Ord>(v: &mut [T], mid: usize) {
    partial_sort_by(v, mid, |a, b| a.lt(b));
}

/// [`partial_sort`] ordered by `is_less`: heap selection over `v[mid..]` followed by a heap
/// sort of `v[..mid]`, *O*(*n* \* log(*mid*)).
pub fn partial_sort_by<T, F>(v: &mut [T], mid: usize, mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(mid <= v.len(), "partial sort point {mid} out of range for length {}", v.len());

    if mid == 0 {
        return;
    }

    let (head, tail) = v.split_at_mut(mid);
    make_heap_by(head, &mut is_less);
    for x in tail.iter_mut() {
        if is_less(x, &head[0]) {
            mem::swap(x, &mut head[0]);
            sift_down(head, 0, &mut is_less);
        }
    }
    sort_heap_by(head, &mut is_less);
}

/// Reorders the slice so that `v[index]` is the element a full sort would place there.
///
/// Elements before `index` are not greater and elements after it are not less than `v[index]`.
///
/// # Panics
///
/// Panics if `index >= v.len()`.
#[inline]
pub fn nth_element<T: Ord>(v: &mut [T], index: usize) {
    nth_element_by(v, index, |a, b| a.lt(b));
}

/// [`nth_element`] ordered by `is_less`, an introselect with the same partitioning and
/// heapsort fallback as [`sort_by`]. *O*(*n*) on average, *O*(*n* \* log(*n*)) worst-case.
pub fn nth_element_by<T, F>(v: &mut [T], index: usize, mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(index < v.len(), "index {index} out of range for length {}", v.len());

    if size_of::<T>() == 0 {
        return;
    }

    introsort::select(v, index, &mut is_less);
}
