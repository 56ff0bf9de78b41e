//! Merge primitives.
//!
//! [`merge`] and [`merge_by`] combine two separate sorted slices into a sink. The raw primitives
//! below operate inside a single slice, with one run moved out into a scratch buffer so the
//! destination can alias the other run: [`merge_forward`] fills the slice from the front,
//! [`merge_backward`] from the back.

use std::ptr;

/// Appends the merge of the sorted slices `a` and `b` to `out`.
#[inline]
pub fn merge<T, E>(a: &[T], b: &[T], out: &mut E)
where
    T: Ord + Clone,
    E: Extend<T>,
{
    merge_by(a, b, out, |x, y| x.lt(y));
}

/// Appends the merge of `a` and `b`, both sorted by `is_less`, to `out`.
///
/// Stable: of two equivalent elements the one from `a` is emitted first.
pub fn merge_by<T, E, F>(a: &[T], b: &[T], out: &mut E, mut is_less: F)
where
    T: Clone,
    E: Extend<T>,
    F: FnMut(&T, &T) -> bool,
{
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        if is_less(&b[j], &a[i]) {
            out.extend(Some(b[j].clone()));
            j += 1;
        } else {
            out.extend(Some(a[i].clone()));
            i += 1;
        }
    }

    out.extend(a[i..].iter().cloned());
    out.extend(b[j..].iter().cloned());
}

/// Merges the sorted runs `left[..left_len]` and `right[..right_len]` into `dst`.
///
/// Elements are copied bitwise. Ownership bookkeeping, including what happens when `is_less`
/// panics, is the responsibility of the caller.
///
/// # Safety
///
/// Both runs must be valid for reads, `dst` valid for `left_len + right_len` writes, and `dst`
/// must not overlap either run.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) unsafe fn merge_into<T, F>(
    left: *const T,
    left_len: usize,
    right: *const T,
    right_len: usize,
    dst: *mut T,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    // SAFETY: The loop keeps `l <= left_end`, `r <= right_end` and writes exactly one element
    // per consumed input, so `d` never passes `dst + left_len + right_len`.
    unsafe {
        let left_end = left.add(left_len);
        let right_end = right.add(right_len);
        let mut l = left;
        let mut r = right;
        let mut d = dst;

        while l < left_end && r < right_end {
            let take_right = is_less(&*r, &*l);
            let src = if take_right { r } else { l };
            ptr::copy_nonoverlapping(src, d, 1);
            r = r.add(take_right as usize);
            l = l.add(!take_right as usize);
            d = d.add(1);
        }

        let rest = left_end.offset_from(l) as usize;
        ptr::copy_nonoverlapping(l, d, rest);
        d = d.add(rest);
        ptr::copy_nonoverlapping(r, d, right_end.offset_from(r) as usize);
    }
}

/// Merges the sorted runs `v[..mid]` and `v[mid..]`, moving the left run into `buf` and filling
/// `v` front to back.
///
/// # Safety
///
/// `buf` must be valid for `mid` writes and must not overlap `v`.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) unsafe fn merge_forward<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(mid <= len);

    // SAFETY: `hole.dst` trails `right` by the number of left elements still in the buffer, so
    // every write lands in a slot whose element has already been moved out.
    unsafe {
        let v_base = v.as_mut_ptr();
        ptr::copy_nonoverlapping(v_base, buf, mid);

        let mut hole = MergeForward {
            start: buf,
            end: buf.add(mid),
            dst: v_base,
        };
        let mut right = v_base.add(mid);
        let right_end = v_base.add(len);

        while hole.start < hole.end && right < right_end {
            // Ties go to the left run, which keeps the merge stable.
            let take_right = is_less(&*right, &*hole.start);
            let src = if take_right { right } else { hole.start };
            ptr::copy_nonoverlapping(src, hole.dst, 1);
            hole.start = hole.start.add(!take_right as usize);
            right = right.add(take_right as usize);
            hole.dst = hole.dst.add(1);
        }

        // `hole` gets dropped and copies what is left of the buffered run into place.
    }
}

/// Merges the sorted runs `v[..mid]` and `v[mid..]`, moving the right run into `buf` and
/// filling `v` back to front.
///
/// # Safety
///
/// `buf` must be valid for `v.len() - mid` writes and must not overlap `v`.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) unsafe fn merge_backward<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(mid <= len);

    // SAFETY: `hole.dst_end` leads `left_end` by the number of right elements still in the
    // buffer, so every write lands in a slot whose element has already been moved out.
    unsafe {
        let v_base = v.as_mut_ptr();
        ptr::copy_nonoverlapping(v_base.add(mid), buf, len - mid);

        let mut hole = MergeBackward {
            start: buf,
            end: buf.add(len - mid),
            dst_end: v_base.add(len),
        };
        let mut left_end = v_base.add(mid);

        while v_base < left_end && hole.start < hole.end {
            let l = left_end.sub(1);
            let r = hole.end.sub(1);

            // Ties go to the right run, which keeps the merge stable.
            let take_left = is_less(&*r, &*l);
            let src = if take_left { l } else { r };
            hole.dst_end = hole.dst_end.sub(1);
            ptr::copy_nonoverlapping(src, hole.dst_end, 1);
            left_end = left_end.sub(take_left as usize);
            hole.end = hole.end.sub(!take_left as usize);
        }

        // `hole` gets dropped and copies what is left of the buffered run into place.
    }
}

/// Merges `v[..mid]` and `v[mid..]` by buffering the shorter run.
///
/// # Safety
///
/// `buf` must be valid for `min(mid, v.len() - mid)` writes and must not overlap `v`.
#[inline]
pub(crate) unsafe fn merge_buffered<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    // SAFETY: See function safety, each variant buffers exactly the shorter run.
    unsafe {
        if mid <= v.len() - mid {
            merge_forward(v, mid, buf, is_less);
        } else {
            merge_backward(v, mid, buf, is_less);
        }
    }
}

// When dropped, copies the range `start..end` into `dst..`.
struct MergeForward<T> {
    start: *mut T,
    end: *mut T,
    dst: *mut T,
}

impl<T> Drop for MergeForward<T> {
    fn drop(&mut self) {
        // SAFETY: `T` is not a zero-sized type, and these are pointers into a slice's elements.
        unsafe {
            let len = self.end.offset_from(self.start) as usize;
            ptr::copy_nonoverlapping(self.start, self.dst, len);
        }
    }
}

// When dropped, copies the range `start..end` into `..dst_end`.
struct MergeBackward<T> {
    start: *mut T,
    end: *mut T,
    dst_end: *mut T,
}

impl<T> Drop for MergeBackward<T> {
    fn drop(&mut self) {
        // SAFETY: `T` is not a zero-sized type, and these are pointers into a slice's elements.
        unsafe {
            let len = self.end.offset_from(self.start) as usize;
            ptr::copy_nonoverlapping(self.start, self.dst_end.sub(len), len);
        }
    }
}
