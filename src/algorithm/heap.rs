//! Binary max-heap operations over slices.
//!
//! The heap is stored implicitly: the children of `v[i]` are `v[2 * i + 1]` and `v[2 * i + 2]`,
//! and no child is ordered after its parent under `is_less`. `v[0]` is therefore a greatest
//! element.

/// Inserts `v[len - 1]` into the heap `v[..len - 1]`.
#[inline]
pub fn push_heap<T: Ord>(v: &mut [T]) {
    push_heap_by(v, |a, b| a.lt(b));
}

/// Inserts `v[len - 1]` into the heap `v[..len - 1]` ordered by `is_less`.
pub fn push_heap_by<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if v.len() < 2 {
        return;
    }

    sift_up(v, v.len() - 1, &mut is_less);
}

/// Moves the greatest element to `v[len - 1]` and restores the heap on `v[..len - 1]`.
#[inline]
pub fn pop_heap<T: Ord>(v: &mut [T]) {
    pop_heap_by(v, |a, b| a.lt(b));
}

/// Moves the greatest element under `is_less` to `v[len - 1]` and restores the heap on
/// `v[..len - 1]`.
pub fn pop_heap_by<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    v.swap(0, len - 1);
    sift_down(&mut v[..len - 1], 0, &mut is_less);
}

/// Rearranges `v` into a heap.
#[inline]
pub fn make_heap<T: Ord>(v: &mut [T]) {
    make_heap_by(v, |a, b| a.lt(b));
}

/// Rearranges `v` into a heap ordered by `is_less`, in *O*(*n*).
pub fn make_heap_by<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    for node in (0..v.len() / 2).rev() {
        sift_down(v, node, &mut is_less);
    }
}

/// Turns the heap `v` into an ascending sorted slice.
#[inline]
pub fn sort_heap<T: Ord>(v: &mut [T]) {
    sort_heap_by(v, |a, b| a.lt(b));
}

/// Turns the heap `v` ordered by `is_less` into a sorted slice by repeated
/// [`pop_heap_by`], in *O*(*n* \* log(*n*)).
pub fn sort_heap_by<T, F>(v: &mut [T], mut is_less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    for end in (2..=v.len()).rev() {
        pop_heap_by(&mut v[..end], &mut is_less);
    }
}

/// Returns `true` if `v` is a heap.
#[inline]
pub fn is_heap<T: Ord>(v: &[T]) -> bool {
    is_heap_by(v, |a, b| a.lt(b))
}

/// Returns `true` if `v` is a heap ordered by `is_less`.
#[inline]
pub fn is_heap_by<T, F>(v: &[T], is_less: F) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    is_heap_until_by(v, is_less) == v.len()
}

/// Length of the longest prefix of `v` that is a heap.
#[inline]
pub fn is_heap_until<T: Ord>(v: &[T]) -> usize {
    is_heap_until_by(v, |a, b| a.lt(b))
}

/// Length of the longest prefix of `v` that is a heap ordered by `is_less`.
pub fn is_heap_until_by<T, F>(v: &[T], mut is_less: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    (1..v.len())
        .find(|&child| is_less(&v[(child - 1) / 2], &v[child]))
        .unwrap_or(v.len())
}

/// Sorts `v` with heapsort, *O*(*n* \* log(*n*)) worst-case and in-place.
///
/// This is the fallback of the introsort once its partition budget is exhausted.
#[inline]
pub(crate) fn heapsort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    make_heap_by(v, &mut *is_less);
    sort_heap_by(v, &mut *is_less);
}

/// Moves `v[node]` towards the root until its parent is not ordered before it.
fn sift_up<T, F>(v: &mut [T], mut node: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    while node > 0 {
        let parent = (node - 1) / 2;
        if !is_less(&v[parent], &v[node]) {
            break;
        }
        v.swap(parent, node);
        node = parent;
    }
}

// This binary heap respects the invariant `parent >= child`.
#[inline]
pub(crate) fn sift_down<T, F>(v: &mut [T], mut node: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    loop {
        // Children of `node`.
        let mut child = 2 * node + 1;
        if child >= len {
            break;
        }

        // Choose the greater child.
        if child + 1 < len {
            child += is_less(&v[child], &v[child + 1]) as usize;
        }

        // Stop if the invariant holds at `node`.
        if !is_less(&v[node], &v[child]) {
            break;
        }

        v.swap(node, child);
        node = child;
    }
}
