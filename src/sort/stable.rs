//! Buffer-bounded stable merge sort.
//!
//! The scratch buffer may be anywhere between empty and half the input. Sub-slices that fit
//! into it are sorted by a bottom-up merge sort that ping-pongs between the slice and the
//! buffer. Larger sub-slices are halved recursively and the halves are merged with
//! [`merge_adaptive`], which buffers the shorter run when it fits and otherwise splits the merge
//! around a rotation until it does.

use std::mem::{self, size_of};
use std::ptr;

use super::insertion::{insertion_sort_shift_left, CopyOnDrop};
use super::merge::{merge_buffered, merge_into};
use super::INSERTION_SORT_THRESHOLD;
use crate::algorithm::{lower_bound_by, upper_bound_by};
use crate::scratch::{RawAllocator, ScratchBuffer};

/// Sorts `v` stably using a scratch buffer of at most `capacity` elements from `alloc`.
pub(crate) fn stable_sort<T, F, A>(v: &mut [T], capacity: usize, alloc: A, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
    A: RawAllocator,
{
    // Sorting has no meaningful behavior on zero-sized types.
    if size_of::<T>() == 0 {
        return;
    }

    let len = v.len();
    if len < 2 {
        return;
    }

    // Short slices get sorted in-place via insertion sort to avoid allocations.
    if len <= INSERTION_SORT_THRESHOLD {
        insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    // The buffer only ever holds shallow copies of elements of `v`. Its logical length stays
    // zero, so its destructor never runs element destructors on those copies, whether the sort
    // returns or `is_less` panics.
    let mut buf = ScratchBuffer::<T, A>::acquire_in(capacity.min(len), alloc);
    let cap = buf.capacity();

    // SAFETY: `spare_ptr` is valid for `cap` writes and does not overlap `v`.
    unsafe {
        stable_sort_rec(v, buf.spare_ptr(), cap, is_less);
    }
}

/// Stably merges the sorted runs `v[..mid]` and `v[mid..]` with a scratch buffer of at most
/// `capacity` elements from `alloc`.
pub(crate) fn inplace_merge<T, F, A>(
    v: &mut [T],
    mid: usize,
    capacity: usize,
    alloc: A,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
    A: RawAllocator,
{
    assert!(mid <= v.len(), "merge point {mid} out of range for length {}", v.len());

    if size_of::<T>() == 0 || mid == 0 || mid == v.len() {
        return;
    }

    let shorter = mid.min(v.len() - mid);
    let mut buf = ScratchBuffer::<T, A>::acquire_in(capacity.min(shorter), alloc);
    let cap = buf.capacity();

    // SAFETY: `spare_ptr` is valid for `cap` writes and does not overlap `v`.
    unsafe {
        merge_adaptive(v, mid, buf.spare_ptr(), cap, is_less);
    }
}

/// # Safety
///
/// `buf` must be valid for `cap` writes and must not overlap `v`.
unsafe fn stable_sort_rec<T, F>(v: &mut [T], buf: *mut T, cap: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len <= INSERTION_SORT_THRESHOLD {
        insertion_sort_shift_left(v, 1, is_less);
        return;
    }

    // SAFETY: See function safety.
    unsafe {
        if len <= cap {
            buffered_merge_sort(v, buf, is_less);
            return;
        }

        let mid = len / 2;
        stable_sort_rec(&mut v[..mid], buf, cap, is_less);
        stable_sort_rec(&mut v[mid..], buf, cap, is_less);
        merge_adaptive(v, mid, buf, cap, is_less);
    }
}

/// Bottom-up merge sort: insertion sorted runs of `INSERTION_SORT_THRESHOLD` elements, then
/// passes of doubling width that alternate between `v` and `buf` as source.
///
/// # Safety
///
/// `buf` must be valid for `v.len()` writes and must not overlap `v`.
unsafe fn buffered_merge_sort<T, F>(v: &mut [T], buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    for run in v.chunks_mut(INSERTION_SORT_THRESHOLD) {
        insertion_sort_shift_left(run, 1, is_less);
    }

    let v_base = v.as_mut_ptr();
    let mut width = INSERTION_SORT_THRESHOLD;
    let mut in_buf = false;

    while width < len {
        // SAFETY: Source and destination are distinct allocations of `len` elements. A pass
        // reading from `v` leaves it untouched, so a panic there needs no repair. A pass reading
        // from `buf` overwrites `v`; until it completes `buf` holds the only complete set of
        // elements, and the guard copies them back if `is_less` panics.
        unsafe {
            let (src, dst) = if in_buf {
                (buf as *const T, v_base)
            } else {
                (v_base as *const T, buf)
            };

            let restore = in_buf.then(|| CopyOnDrop {
                src: buf,
                dst: v_base,
                len,
            });

            let mut start = 0;
            while start < len {
                let mid = (start + width).min(len);
                let end = (start + 2 * width).min(len);
                merge_into(
                    src.add(start),
                    mid - start,
                    src.add(mid),
                    end - mid,
                    dst.add(start),
                    is_less,
                );
                start = end;
            }

            mem::forget(restore);
        }

        in_buf = !in_buf;
        width *= 2;
    }

    if in_buf {
        // SAFETY: The last pass left the sorted elements in `buf`.
        unsafe { ptr::copy_nonoverlapping(buf, v_base, len) };
    }
}

/// Stably merges the sorted runs `v[..mid]` and `v[mid..]` with `cap` elements of scratch.
///
/// If the shorter run fits in the buffer it is merged directly. Otherwise the longer run is cut
/// in half, the matching cut in the other run is found by binary search, and the two middle
/// blocks are swapped with [`buffered_rotate`], leaving two independent, smaller merges.
///
/// # Safety
///
/// `buf` must be valid for `cap` writes and must not overlap `v`.
unsafe fn merge_adaptive<T, F>(v: &mut [T], mid: usize, buf: *mut T, cap: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let left_len = mid;
    let right_len = len - mid;

    if left_len == 0 || right_len == 0 {
        return;
    }

    // The runs are already in order.
    if !is_less(&v[mid], &v[mid - 1]) {
        return;
    }

    if len == 2 {
        v.swap(0, 1);
        return;
    }

    // SAFETY: See function safety.
    unsafe {
        if left_len.min(right_len) <= cap {
            merge_buffered(v, mid, buf, is_less);
            return;
        }

        let (left_cut, right_cut) = if left_len > right_len {
            let left_cut = left_len / 2;
            let right_cut = mid + lower_bound_by(&v[mid..], &v[left_cut], &mut *is_less);
            (left_cut, right_cut)
        } else {
            let right_cut = mid + right_len / 2;
            let left_cut = upper_bound_by(&v[..mid], &v[right_cut], &mut *is_less);
            (left_cut, right_cut)
        };

        let moved = buffered_rotate(&mut v[left_cut..right_cut], mid - left_cut, buf, cap);
        let new_mid = left_cut + moved;

        let (left, right) = v.split_at_mut(new_mid);
        merge_adaptive(left, left_cut, buf, cap, is_less);
        merge_adaptive(right, mid - left_cut, buf, cap, is_less);
    }
}

/// Rotates `v` so that `v[mid..]` comes before `v[..mid]`, returning the new position of the
/// former `v[0]`.
///
/// The shorter block is parked in `buf` when it fits, turning the rotation into three block
/// copies. Otherwise the rotation is done in-place by three reversals.
///
/// # Safety
///
/// `buf` must be valid for `cap` writes and must not overlap `v`.
unsafe fn buffered_rotate<T>(v: &mut [T], mid: usize, buf: *mut T, cap: usize) -> usize {
    let len = v.len();
    let left_len = mid;
    let right_len = len - mid;

    if left_len == 0 || right_len == 0 {
        return right_len;
    }

    let v_base = v.as_mut_ptr();

    // SAFETY: No user code runs between the copies, so every element is owned exactly once
    // when this returns. The buffer is only used when the block fits into `cap`.
    unsafe {
        if right_len <= left_len && right_len <= cap {
            ptr::copy_nonoverlapping(v_base.add(mid), buf, right_len);
            ptr::copy(v_base, v_base.add(right_len), left_len);
            ptr::copy_nonoverlapping(buf, v_base, right_len);
        } else if left_len <= cap {
            ptr::copy_nonoverlapping(v_base, buf, left_len);
            ptr::copy(v_base.add(mid), v_base, right_len);
            ptr::copy_nonoverlapping(buf, v_base.add(right_len), left_len);
        } else {
            v[..mid].reverse();
            v[mid..].reverse();
            v.reverse();
        }
    }

    right_len
}
