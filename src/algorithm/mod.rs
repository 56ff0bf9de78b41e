//! Slice algorithms: linear search, binary search, set operations, comparisons.
//!
//! Positions are returned as indices into the input. A search that finds nothing returns the
//! length of the searched slice, the one-past-the-end position, so results compose with
//! slicing (`&v[find(v, &x)..]` is always valid).
//!
//! Comparators follow the strict weak ordering convention used by the sort module:
//! `is_less(a, b)` returns `true` if `a` is ordered before `b`.
//!
//! None of these functions allocate. Panics raised by user closures propagate unchanged.

mod endian;
mod heap;

pub use endian::{endian_swap, endian_swap_slice, to_big_endian, to_little_endian, EndianSwap};
pub use heap::{
    is_heap, is_heap_by, is_heap_until, is_heap_until_by, make_heap, make_heap_by, pop_heap,
    pop_heap_by, push_heap, push_heap_by, sort_heap, sort_heap_by,
};

pub(crate) use heap::{heapsort, sift_down};

use std::ops::Range;

// --- Linear search ---

/// Position of the first element equal to `value`.
#[inline]
pub fn find<T: PartialEq>(v: &[T], value: &T) -> usize {
    find_if(v, |x| x == value)
}

/// Position of the first element for which `pred` returns `true`.
#[inline]
pub fn find_if<T, P>(v: &[T], mut pred: P) -> usize
where
    P: FnMut(&T) -> bool,
{
    v.iter().position(|x| pred(x)).unwrap_or(v.len())
}

/// Position of the first element for which `pred` returns `false`.
#[inline]
pub fn find_if_not<T, P>(v: &[T], mut pred: P) -> usize
where
    P: FnMut(&T) -> bool,
{
    find_if(v, |x| !pred(x))
}

/// Position of the first element that is equal to its successor.
#[inline]
pub fn adjacent_find<T: PartialEq>(v: &[T]) -> usize {
    adjacent_find_by(v, |a, b| a == b)
}

/// Position of the first element `v[i]` for which `pred(&v[i], &v[i + 1])` holds.
pub fn adjacent_find_by<T, P>(v: &[T], mut pred: P) -> usize
where
    P: FnMut(&T, &T) -> bool,
{
    v.windows(2)
        .position(|w| pred(&w[0], &w[1]))
        .unwrap_or(v.len())
}

/// Position of the first element of `v` that is equal to any element of `candidates`.
#[inline]
pub fn find_first_of<T: PartialEq>(v: &[T], candidates: &[T]) -> usize {
    find_first_of_by(v, candidates, |a, b| a == b)
}

/// Position of the first element `x` of `v` with `pred(x, c)` for some `c` in `candidates`.
pub fn find_first_of_by<T, U, P>(v: &[T], candidates: &[U], mut pred: P) -> usize
where
    P: FnMut(&T, &U) -> bool,
{
    find_if(v, |x| candidates.iter().any(|c| pred(x, c)))
}

/// Returns `true` if `pred` holds for every element. Vacuously `true` for an empty slice.
#[inline]
pub fn all_of<T, P>(v: &[T], pred: P) -> bool
where
    P: FnMut(&T) -> bool,
{
    find_if_not(v, pred) == v.len()
}

/// Returns `true` if `pred` holds for at least one element.
#[inline]
pub fn any_of<T, P>(v: &[T], pred: P) -> bool
where
    P: FnMut(&T) -> bool,
{
    find_if(v, pred) != v.len()
}

/// Returns `true` if `pred` holds for no element.
#[inline]
pub fn none_of<T, P>(v: &[T], pred: P) -> bool
where
    P: FnMut(&T) -> bool,
{
    find_if(v, pred) == v.len()
}

/// Number of elements equal to `value`.
#[inline]
pub fn count<T: PartialEq>(v: &[T], value: &T) -> usize {
    count_if(v, |x| x == value)
}

/// Number of elements for which `pred` holds.
#[inline]
pub fn count_if<T, P>(v: &[T], mut pred: P) -> usize
where
    P: FnMut(&T) -> bool,
{
    v.iter().filter(|x| pred(x)).count()
}

// --- Sub-sequence search ---

/// Start of the first occurrence of `needle` in `haystack`, or `haystack.len()`.
///
/// An empty needle is found at position 0.
#[inline]
pub fn search<T: PartialEq>(haystack: &[T], needle: &[T]) -> usize {
    search_by(haystack, needle, |a, b| a == b)
}

/// Start of the first occurrence of `needle` in `haystack` under the equivalence `pred`.
pub fn search_by<T, U, P>(haystack: &[T], needle: &[U], mut pred: P) -> usize
where
    P: FnMut(&T, &U) -> bool,
{
    if needle.is_empty() {
        return 0;
    }
    if needle.len() > haystack.len() {
        return haystack.len();
    }

    (0..=haystack.len() - needle.len())
        .find(|&start| {
            haystack[start..start + needle.len()]
                .iter()
                .zip(needle)
                .all(|(a, b)| pred(a, b))
        })
        .unwrap_or(haystack.len())
}

/// Start of the first run of `n` consecutive elements equal to `value`, or `v.len()`.
///
/// A run of length 0 is found at position 0.
pub fn search_n<T: PartialEq>(v: &[T], n: usize, value: &T) -> usize {
    if n == 0 {
        return 0;
    }

    let mut run_start = 0;
    let mut run_len = 0;
    for (i, x) in v.iter().enumerate() {
        if x == value {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len == n {
                return run_start;
            }
        } else {
            run_len = 0;
        }
    }

    v.len()
}

/// Start of the last occurrence of `needle` in `haystack`, or `haystack.len()`.
///
/// An empty needle is reported as not found.
pub fn find_end<T: PartialEq>(haystack: &[T], needle: &[T]) -> usize {
    if needle.is_empty() || needle.len() > haystack.len() {
        return haystack.len();
    }

    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&start| haystack[start..start + needle.len()] == *needle)
        .unwrap_or(haystack.len())
}

// --- Pairwise comparison ---

/// First position at which `a` and `b` differ, bounded by the shorter length.
#[inline]
pub fn mismatch<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    mismatch_by(a, b, |x, y| x == y)
}

/// First position `i` at which `pred(&a[i], &b[i])` fails, bounded by the shorter length.
pub fn mismatch_by<T, U, P>(a: &[T], b: &[U], mut pred: P) -> usize
where
    P: FnMut(&T, &U) -> bool,
{
    a.iter()
        .zip(b)
        .position(|(x, y)| !pred(x, y))
        .unwrap_or(a.len().min(b.len()))
}

/// Returns `true` if both ranges have the same length and equal elements.
#[inline]
pub fn equal<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    equal_by(a, b, |x, y| x == y)
}

/// Returns `true` if both ranges have the same length and `pred` holds pairwise.
///
/// Slices know their length, so a length mismatch is rejected without calling `pred`.
pub fn equal_by<T, U, P>(a: &[T], b: &[U], mut pred: P) -> bool
where
    P: FnMut(&T, &U) -> bool,
{
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).all(|(x, y)| pred(x, y))
}

/// Returns `true` if `a` is lexicographically less than `b`.
#[inline]
pub fn lexicographical_compare<T: PartialOrd>(a: &[T], b: &[T]) -> bool {
    lexicographical_compare_by(a, b, |x, y| x < y)
}

/// Returns `true` if `a` is lexicographically less than `b` under `is_less`.
///
/// Stops at the first pair that is ordered either way. A proper prefix is less than the
/// longer sequence.
pub fn lexicographical_compare_by<T, F>(a: &[T], b: &[T], mut is_less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    for (x, y) in a.iter().zip(b) {
        if is_less(x, y) {
            return true;
        }
        if is_less(y, x) {
            return false;
        }
    }

    a.len() < b.len()
}

/// Byte specialization of [`lexicographical_compare`], a single memory compare.
#[inline]
pub fn lexicographical_compare_bytes(a: &[u8], b: &[u8]) -> bool {
    // Slice ordering on `u8` lowers to `memcmp` followed by a length comparison.
    a < b
}

// --- Binary search ---

/// First position in the sorted `v` whose element is not less than `value`.
#[inline]
pub fn lower_bound<T: Ord>(v: &[T], value: &T) -> usize {
    lower_bound_by(v, value, |a, b| a.lt(b))
}

/// First position in `v` whose element is not ordered before `value` under `is_less`.
///
/// `v` must be partitioned with respect to `is_less(elem, value)`, which holds for any range
/// sorted by `is_less`.
pub fn lower_bound_by<T, F>(v: &[T], value: &T, mut is_less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut first = 0;
    let mut count = v.len();
    while count > 0 {
        let step = count / 2;
        let mid = first + step;
        if is_less(&v[mid], value) {
            first = mid + 1;
            count -= step + 1;
        } else {
            count = step;
        }
    }
    first
}

/// First position in the sorted `v` whose element is greater than `value`.
#[inline]
pub fn upper_bound<T: Ord>(v: &[T], value: &T) -> usize {
    upper_bound_by(v, value, |a, b| a.lt(b))
}

/// First position in `v` whose element `value` is ordered before under `is_less`.
pub fn upper_bound_by<T, F>(v: &[T], value: &T, mut is_less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut first = 0;
    let mut count = v.len();
    while count > 0 {
        let step = count / 2;
        let mid = first + step;
        if !is_less(value, &v[mid]) {
            first = mid + 1;
            count -= step + 1;
        } else {
            count = step;
        }
    }
    first
}

/// The range of positions in the sorted `v` holding elements equivalent to `value`.
#[inline]
pub fn equal_range<T: Ord>(v: &[T], value: &T) -> Range<usize> {
    equal_range_by(v, value, |a, b| a.lt(b))
}

/// The range of positions in `v` holding elements equivalent to `value` under `is_less`.
pub fn equal_range_by<T, F>(v: &[T], value: &T, mut is_less: F) -> Range<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    let start = lower_bound_by(v, value, &mut is_less);
    let end = start + upper_bound_by(&v[start..], value, &mut is_less);
    start..end
}

/// Returns `true` if the sorted `v` contains an element equivalent to `value`.
#[inline]
pub fn binary_search<T: Ord>(v: &[T], value: &T) -> bool {
    binary_search_by(v, value, |a, b| a.lt(b))
}

/// Returns `true` if `v` contains an element equivalent to `value` under `is_less`.
pub fn binary_search_by<T, F>(v: &[T], value: &T, mut is_less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    let pos = lower_bound_by(v, value, &mut is_less);
    pos != v.len() && !is_less(value, &v[pos])
}

// --- Sorted range set operations ---

/// Appends to `out` the elements of the sorted `a` that are not present in the sorted `b`.
///
/// Multiplicities are respected: an element occurring `m` times in `a` and `n` times in `b` is
/// emitted `m - n` times when `m > n`.
#[inline]
pub fn set_difference<T, E>(a: &[T], b: &[T], out: &mut E)
where
    T: Ord + Clone,
    E: Extend<T>,
{
    set_difference_by(a, b, out, |x, y| x.lt(y));
}

/// [`set_difference`] under `is_less`, a single forward pass in *O*(*n* + *m*).
pub fn set_difference_by<T, E, F>(a: &[T], b: &[T], out: &mut E, mut is_less: F)
where
    T: Clone,
    E: Extend<T>,
    F: FnMut(&T, &T) -> bool,
{
    let mut i = 0;
    let mut j = 0;
    while i < a.len() {
        if j == b.len() {
            out.extend(a[i..].iter().cloned());
            return;
        }

        if is_less(&a[i], &b[j]) {
            out.extend(Some(a[i].clone()));
            i += 1;
        } else {
            if !is_less(&b[j], &a[i]) {
                i += 1;
            }
            j += 1;
        }
    }
}

// --- Extrema ---

/// Position of the first smallest element, `None` if `v` is empty.
#[inline]
pub fn min_element<T: Ord>(v: &[T]) -> Option<usize> {
    min_element_by(v, |a, b| a.lt(b))
}

/// Position of the first element no other element is ordered before.
pub fn min_element_by<T, F>(v: &[T], mut is_less: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    if v.is_empty() {
        return None;
    }

    let mut best = 0;
    for i in 1..v.len() {
        if is_less(&v[i], &v[best]) {
            best = i;
        }
    }
    Some(best)
}

/// Position of the first largest element, `None` if `v` is empty.
#[inline]
pub fn max_element<T: Ord>(v: &[T]) -> Option<usize> {
    max_element_by(v, |a, b| a.lt(b))
}

/// Position of the first element not ordered before any other element.
pub fn max_element_by<T, F>(v: &[T], mut is_less: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> bool,
{
    if v.is_empty() {
        return None;
    }

    let mut best = 0;
    for i in 1..v.len() {
        if is_less(&v[best], &v[i]) {
            best = i;
        }
    }
    Some(best)
}

/// Positions of the first smallest and the last largest element, `None` if `v` is empty.
#[inline]
pub fn minmax_element<T: Ord>(v: &[T]) -> Option<(usize, usize)> {
    minmax_element_by(v, |a, b| a.lt(b))
}

/// [`minmax_element`] under `is_less`.
///
/// Processes elements in pairs, using at most `3 * (n / 2) + 1` comparisons. Returns the
/// first minimum and the last maximum.
pub fn minmax_element_by<T, F>(v: &[T], mut is_less: F) -> Option<(usize, usize)>
where
    F: FnMut(&T, &T) -> bool,
{
    if v.is_empty() {
        return None;
    }

    let mut min = 0;
    let mut max = 0;
    let mut i = 1;
    while i + 1 < v.len() {
        let (lo, hi) = if is_less(&v[i + 1], &v[i]) {
            (i + 1, i)
        } else {
            (i, i + 1)
        };
        if is_less(&v[lo], &v[min]) {
            min = lo;
        }
        if !is_less(&v[hi], &v[max]) {
            max = hi;
        }
        i += 2;
    }

    if i < v.len() {
        if is_less(&v[i], &v[min]) {
            min = i;
        }
        if !is_less(&v[i], &v[max]) {
            max = i;
        }
    }

    Some((min, max))
}
