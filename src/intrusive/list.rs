use std::array;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use super::link::{BaseHook, Hook, Link, NodeRef};

/// Whether cursors are validated against their list on every use.
const CHECKED_CURSORS: bool = cfg!(any(debug_assertions, feature = "checked-cursors"));

/// Sorting uses one bin per power of two, enough for any list that fits in memory.
const SORT_BINS: usize = usize::BITS as usize;

/// Process-unique identity of a [`List`], carried by its cursors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListId(u64);

impl ListId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ListId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A position in a [`List`]: one of its elements, or its end.
///
/// A cursor stays valid until the list it came from removes any element, by erasing, popping,
/// clearing, swapping, or giving nodes away in a splice or merge. Inserting, reversing and
/// sorting in place keep cursors valid. With debug assertions or the `checked-cursors` feature,
/// using an invalidated cursor panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    at: NodeRef,
    list: ListId,
    epoch: u64,
}

impl Cursor {
    #[inline]
    pub fn node(&self) -> NodeRef {
        self.at
    }

    /// Storage index of the element, `None` at the end.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.at.index()
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.at == NodeRef::Sentinel
    }
}

/// Doubly-linked list threaded through elements that live in caller-owned storage.
///
/// The list holds only its sentinel, the element count, and the bookkeeping for cursor
/// validation. Every operation takes the storage slice, and elements are named by their index
/// in it. The hook `H` selects which [`Link`] of `T` this list uses.
///
/// A list never owns, moves or drops its elements. Dropping a list that still has elements
/// leaves their links set; reuse such elements only after [`List::clear`].
///
/// # Storage invariant
///
/// A list must always be used with the same storage slice, and an element may only be linked
/// into one list per hook. Violations are caught by debug assertions where that is cheap and
/// otherwise leave the affected lists in an unspecified, but memory-safe, state.
///
/// # Example
///
/// ```
/// use stdkit::intrusive::{Link, Linkable, List};
///
/// struct Job {
///     prio: u32,
///     link: Link,
/// }
///
/// impl Linkable for Job {
///     fn link(&self) -> &Link {
///         &self.link
///     }
///
///     fn link_mut(&mut self) -> &mut Link {
///         &mut self.link
///     }
/// }
///
/// let mut jobs: Vec<Job> = [3, 1, 2].map(|prio| Job { prio, link: Link::new() }).into();
/// let mut queue: List<Job> = List::new();
///
/// for index in 0..jobs.len() {
///     queue.push_back(&mut jobs, index);
/// }
/// queue.sort_by_key(&mut jobs, |job| job.prio);
///
/// let order: Vec<usize> = queue.iter(&jobs).map(|(index, _)| index).collect();
/// assert_eq!(order, [1, 2, 0]);
/// ```
pub struct List<T, H = BaseHook> {
    sentinel: Link,
    len: usize,
    id: ListId,
    epoch: u64,
    _marker: PhantomData<fn() -> (T, H)>,
}

impl<T, H> List<T, H> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            sentinel: Link::ring(),
            len: 0,
            id: ListId::next(),
            epoch: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn id(&self) -> ListId {
        self.id
    }

    /// Cursor at the end of the list, one past the back element.
    #[inline]
    pub fn end(&self) -> Cursor {
        self.cursor_at(NodeRef::Sentinel)
    }

    /// Cursor at the front element, or the end if the list is empty.
    #[inline]
    pub fn cursor_front(&self) -> Cursor {
        self.cursor_at(self.sentinel.next.unwrap_or(NodeRef::Sentinel))
    }

    /// Cursor at the back element, or the end if the list is empty.
    #[inline]
    pub fn cursor_back(&self) -> Cursor {
        self.cursor_at(self.sentinel.prev.unwrap_or(NodeRef::Sentinel))
    }

    #[inline]
    fn cursor_at(&self, at: NodeRef) -> Cursor {
        Cursor {
            at,
            list: self.id,
            epoch: self.epoch,
        }
    }

    #[inline]
    fn orphan_cursors(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Resolves `cursor`, panicking if it is known to be invalid.
    #[inline]
    #[track_caller]
    fn resolve(&self, cursor: Cursor) -> NodeRef {
        if CHECKED_CURSORS {
            assert!(
                cursor.list == self.id,
                "cursor of list {:?} used with list {:?}",
                cursor.list,
                self.id
            );
            assert!(
                cursor.epoch == self.epoch,
                "cursor orphaned by a removal from list {:?}",
                self.id
            );
        }
        cursor.at
    }

    /// An empty list that shares the identity of `self`, for internal bookkeeping.
    fn scratch_list(&self) -> Self {
        Self {
            sentinel: Link::ring(),
            len: 0,
            id: self.id,
            epoch: 0,
            _marker: PhantomData,
        }
    }
}

impl<T, H> Default for List<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H> fmt::Debug for List<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

#[cold]
#[track_caller]
fn not_linked(at: NodeRef) -> ! {
    panic!("{at:?} is not linked into a list")
}

// --- Ring primitives ---
//
// These take the sentinel separately from the list so that two lists can be relinked against
// one storage slice without borrowing either list as a whole.

impl<T, H: Hook<T>> List<T, H> {
    #[inline]
    fn link_ref<'a>(sentinel: &'a Link, storage: &'a [T], at: NodeRef) -> &'a Link {
        match at {
            NodeRef::Sentinel => sentinel,
            NodeRef::Element(index) => H::link(&storage[index]),
        }
    }

    #[inline]
    fn link_mut<'a>(sentinel: &'a mut Link, storage: &'a mut [T], at: NodeRef) -> &'a mut Link {
        match at {
            NodeRef::Sentinel => sentinel,
            NodeRef::Element(index) => H::link_mut(&mut storage[index]),
        }
    }

    #[inline]
    #[track_caller]
    fn next_of(sentinel: &Link, storage: &[T], at: NodeRef) -> NodeRef {
        match Self::link_ref(sentinel, storage, at).next {
            Some(next) => next,
            None => not_linked(at),
        }
    }

    #[inline]
    #[track_caller]
    fn prev_of(sentinel: &Link, storage: &[T], at: NodeRef) -> NodeRef {
        match Self::link_ref(sentinel, storage, at).prev {
            Some(prev) => prev,
            None => not_linked(at),
        }
    }

    /// Takes the chain `first..=last` out of the ring of `sentinel` and closes the gap.
    ///
    /// The chain keeps its inner links; its outer ends are left for [`Self::attach`] to
    /// overwrite.
    #[track_caller]
    fn detach(sentinel: &mut Link, storage: &mut [T], first: NodeRef, last: NodeRef) {
        let before = Self::prev_of(sentinel, storage, first);
        let after = Self::next_of(sentinel, storage, last);
        Self::link_mut(sentinel, storage, before).next = Some(after);
        Self::link_mut(sentinel, storage, after).prev = Some(before);
    }

    /// Links the chain `first..=last` into the ring of `sentinel` in front of `pos`.
    #[track_caller]
    fn attach(sentinel: &mut Link, storage: &mut [T], pos: NodeRef, first: NodeRef, last: NodeRef) {
        let before = Self::prev_of(sentinel, storage, pos);
        Self::link_mut(sentinel, storage, before).next = Some(first);
        Self::link_mut(sentinel, storage, first).prev = Some(before);
        Self::link_mut(sentinel, storage, last).next = Some(pos);
        Self::link_mut(sentinel, storage, pos).prev = Some(last);
    }

    /// Moves the `count` nodes `first..=last` of `src` in front of `pos` in `self`.
    fn transfer(
        &mut self,
        storage: &mut [T],
        pos: NodeRef,
        src: &mut Self,
        first: NodeRef,
        last: NodeRef,
        count: usize,
    ) {
        Self::detach(&mut src.sentinel, storage, first, last);
        Self::attach(&mut self.sentinel, storage, pos, first, last);
        src.len -= count;
        self.len += count;
        src.orphan_cursors();
    }

    /// Moves every node of `src` in front of `pos` in `self`.
    fn transfer_all(&mut self, storage: &mut [T], pos: NodeRef, src: &mut Self) {
        if src.is_empty() {
            return;
        }

        let first = Self::next_of(&src.sentinel, storage, NodeRef::Sentinel);
        let last = Self::prev_of(&src.sentinel, storage, NodeRef::Sentinel);
        let count = src.len;
        self.transfer(storage, pos, src, first, last, count);
    }

    fn link_before(&mut self, storage: &mut [T], pos: NodeRef, index: usize) -> Cursor {
        debug_assert!(
            !H::link(&storage[index]).is_linked(),
            "element {index} is already linked into a list"
        );

        let elem = NodeRef::Element(index);
        Self::attach(&mut self.sentinel, storage, pos, elem, elem);
        self.len += 1;
        self.cursor_at(elem)
    }

    /// Unlinks the element at `index`, returning the node that followed it.
    #[track_caller]
    fn unlink(&mut self, storage: &mut [T], index: usize) -> NodeRef {
        let elem = NodeRef::Element(index);
        let next = Self::next_of(&self.sentinel, storage, elem);
        Self::detach(&mut self.sentinel, storage, elem, elem);
        H::link_mut(&mut storage[index]).reset();
        self.len -= 1;
        self.orphan_cursors();
        next
    }

    /// Panics unless the element at `index` is linked into this list.
    ///
    /// Every list ends in a sentinel, so the walk from `index` ends at the back of whichever list
    /// holds it. That back is compared with ours. *O*(*n*).
    #[track_caller]
    fn assert_member(&self, storage: &[T], index: usize) {
        let mut last = NodeRef::Element(index);
        let mut seen = 1;
        let member = loop {
            let next = Self::next_of(&self.sentinel, storage, last);
            if next == NodeRef::Sentinel {
                break self.sentinel.prev == Some(last);
            }
            if seen >= self.len {
                break false;
            }
            last = next;
            seen += 1;
        };
        assert!(member, "element {index} is not linked into list {:?}", self.id);
    }
}

// --- Access ---

impl<T, H: Hook<T>> List<T, H> {
    pub fn front<'a>(&self, storage: &'a [T]) -> Option<&'a T> {
        self.cursor_front().index().map(|index| &storage[index])
    }

    pub fn back<'a>(&self, storage: &'a [T]) -> Option<&'a T> {
        self.cursor_back().index().map(|index| &storage[index])
    }

    /// Cursor at the element at `index`, which must be linked into this list.
    ///
    /// With cursor checks enabled, membership is verified by a walk to the end of the list.
    #[track_caller]
    pub fn cursor_of(&self, storage: &[T], index: usize) -> Cursor {
        if CHECKED_CURSORS {
            self.assert_member(storage, index);
        }
        self.cursor_at(NodeRef::Element(index))
    }

    /// Cursor after `cursor`. The end is followed by the front, the list is a ring.
    #[track_caller]
    pub fn next(&self, storage: &[T], cursor: Cursor) -> Cursor {
        let at = self.resolve(cursor);
        self.cursor_at(Self::next_of(&self.sentinel, storage, at))
    }

    /// Cursor before `cursor`. The front is preceded by the end.
    #[track_caller]
    pub fn prev(&self, storage: &[T], cursor: Cursor) -> Cursor {
        let at = self.resolve(cursor);
        self.cursor_at(Self::prev_of(&self.sentinel, storage, at))
    }

    /// Element at `cursor`, `None` at the end.
    #[track_caller]
    pub fn get<'a>(&self, storage: &'a [T], cursor: Cursor) -> Option<&'a T> {
        let at = self.resolve(cursor);
        at.index().map(|index| &storage[index])
    }

    /// Element at `cursor`, `None` at the end.
    ///
    /// Modifying the link record this list uses through the returned reference corrupts the
    /// list.
    #[track_caller]
    pub fn get_mut<'a>(&self, storage: &'a mut [T], cursor: Cursor) -> Option<&'a mut T> {
        let at = self.resolve(cursor);
        at.index().map(move |index| &mut storage[index])
    }

    /// Whether the element at `index` is linked into this list. *O*(*n*).
    pub fn contains(&self, storage: &[T], index: usize) -> bool {
        self.iter(storage).any(|(linked, _)| linked == index)
    }

    /// Front to back iterator over `(index, element)` pairs.
    pub fn iter<'a>(&'a self, storage: &'a [T]) -> Iter<'a, T, H> {
        Iter {
            sentinel: &self.sentinel,
            storage,
            front: self.sentinel.next.unwrap_or(NodeRef::Sentinel),
            back: self.sentinel.prev.unwrap_or(NodeRef::Sentinel),
            remaining: self.len,
            _hook: PhantomData,
        }
    }

    /// Walks the ring in both directions and checks it against the element count.
    pub fn is_well_formed(&self, storage: &[T]) -> bool {
        let walk = |step: fn(&Link) -> Option<NodeRef>| {
            let mut at = NodeRef::Sentinel;
            for visited in 0..=self.len {
                match step(Self::link_ref(&self.sentinel, storage, at)) {
                    Some(NodeRef::Sentinel) => return visited == self.len,
                    Some(NodeRef::Element(index)) if index < storage.len() => {
                        at = NodeRef::Element(index);
                    }
                    _ => return false,
                }
            }
            false
        };

        walk(|link| link.next) && walk(|link| link.prev)
    }
}

// --- Linking and unlinking ---

impl<T, H: Hook<T>> List<T, H> {
    /// Links the unlinked element at `index` at the front.
    pub fn push_front(&mut self, storage: &mut [T], index: usize) -> Cursor {
        let front = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel);
        self.link_before(storage, front, index)
    }

    /// Links the unlinked element at `index` at the back.
    pub fn push_back(&mut self, storage: &mut [T], index: usize) -> Cursor {
        self.link_before(storage, NodeRef::Sentinel, index)
    }

    /// Links the unlinked element at `index` in front of `pos`, returning a cursor to it.
    ///
    /// Cursors stay valid.
    #[track_caller]
    pub fn insert(&mut self, storage: &mut [T], pos: Cursor, index: usize) -> Cursor {
        let pos = self.resolve(pos);
        self.link_before(storage, pos, index)
    }

    /// Unlinks the element at `cursor`, returning a cursor to the element that followed it.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end.
    #[track_caller]
    pub fn erase(&mut self, storage: &mut [T], cursor: Cursor) -> Cursor {
        let NodeRef::Element(index) = self.resolve(cursor) else {
            panic!("cannot erase the end of list {:?}", self.id);
        };
        let next = self.unlink(storage, index);
        self.cursor_at(next)
    }

    /// Unlinks the element at `index`, which must be linked into this list.
    ///
    /// With cursor checks enabled, membership is verified by a walk to the end of the list.
    #[track_caller]
    pub fn erase_element(&mut self, storage: &mut [T], index: usize) -> Cursor {
        if CHECKED_CURSORS {
            self.assert_member(storage, index);
        }
        let next = self.unlink(storage, index);
        self.cursor_at(next)
    }

    /// Unlinks the front element and returns its index.
    pub fn pop_front(&mut self, storage: &mut [T]) -> Option<usize> {
        let index = self.cursor_front().index()?;
        self.unlink(storage, index);
        Some(index)
    }

    /// Unlinks the back element and returns its index.
    pub fn pop_back(&mut self, storage: &mut [T]) -> Option<usize> {
        let index = self.cursor_back().index()?;
        self.unlink(storage, index);
        Some(index)
    }

    /// Unlinks every element.
    pub fn clear(&mut self, storage: &mut [T]) {
        let mut at = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel);
        while let NodeRef::Element(index) = at {
            let link = H::link_mut(&mut storage[index]);
            at = match link.next {
                Some(next) => next,
                None => not_linked(at),
            };
            link.reset();
        }

        trace!(list = ?self.id, len = self.len, "cleared list");
        self.sentinel = Link::ring();
        self.len = 0;
        self.orphan_cursors();
    }

    /// Unlinks every element for which `pred` returns `true`, returning how many.
    pub fn remove_if<P>(&mut self, storage: &mut [T], mut pred: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut at = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel);
        while let NodeRef::Element(index) = at {
            at = if pred(&storage[index]) {
                removed += 1;
                self.unlink(storage, index)
            } else {
                Self::next_of(&self.sentinel, storage, at)
            };
        }
        removed
    }

    /// Unlinks every element equal to `value`, returning how many.
    pub fn remove(&mut self, storage: &mut [T], value: &T) -> usize
    where
        T: PartialEq,
    {
        self.remove_if(storage, |elem| elem == value)
    }

    /// Unlinks every element equal to the one before it, returning how many.
    pub fn unique(&mut self, storage: &mut [T]) -> usize
    where
        T: PartialEq,
    {
        self.unique_by(storage, |a, b| a == b)
    }

    /// Unlinks every element for which `same(kept, elem)` holds, where `kept` is the closest
    /// preceding element that was not unlinked. Returns how many were unlinked.
    pub fn unique_by<F>(&mut self, storage: &mut [T], mut same: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let NodeRef::Element(mut kept) = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel)
        else {
            return 0;
        };

        let mut removed = 0;
        let mut at = Self::next_of(&self.sentinel, storage, NodeRef::Element(kept));
        while let NodeRef::Element(index) = at {
            if same(&storage[kept], &storage[index]) {
                removed += 1;
                at = self.unlink(storage, index);
            } else {
                kept = index;
                at = Self::next_of(&self.sentinel, storage, at);
            }
        }
        removed
    }

    /// Exchanges the elements of two lists. Invalidates the cursors of both.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.sentinel, &mut other.sentinel);
        mem::swap(&mut self.len, &mut other.len);
        self.orphan_cursors();
        other.orphan_cursors();
    }
}

// --- Splicing ---

impl<T, H: Hook<T>> List<T, H> {
    /// Moves all elements of `other` in front of `pos`. *O*(1).
    #[track_caller]
    pub fn splice(&mut self, storage: &mut [T], pos: Cursor, other: &mut Self) {
        let pos = self.resolve(pos);
        let moved = other.len;
        self.transfer_all(storage, pos, other);
        trace!(from = ?other.id, to = ?self.id, moved, "spliced list");
    }

    /// Moves the element at `it` in `other` in front of `pos`. *O*(1).
    ///
    /// # Panics
    ///
    /// Panics if `it` is the end of `other`.
    #[track_caller]
    pub fn splice_one(&mut self, storage: &mut [T], pos: Cursor, other: &mut Self, it: Cursor) {
        let pos = self.resolve(pos);
        let at = other.resolve(it);
        assert!(at != NodeRef::Sentinel, "cannot splice the end of list {:?}", other.id);
        self.transfer(storage, pos, other, at, at, 1);
    }

    /// Moves the elements `first..last` of `other` in front of `pos`.
    ///
    /// Relinking is *O*(1); counting the moved elements is *O*(*k*).
    ///
    /// # Panics
    ///
    /// Panics if `last` is not reachable from `first` without passing the end of `other`.
    #[track_caller]
    pub fn splice_range(
        &mut self,
        storage: &mut [T],
        pos: Cursor,
        other: &mut Self,
        first: Cursor,
        last: Cursor,
    ) {
        let pos = self.resolve(pos);
        let first = other.resolve(first);
        let last = other.resolve(last);
        if first == last {
            return;
        }

        let mut count = 0;
        let mut at = first;
        while at != last {
            assert!(
                at != NodeRef::Sentinel,
                "splice range end is not reachable from its start in list {:?}",
                other.id
            );
            count += 1;
            at = Self::next_of(&other.sentinel, storage, at);
        }

        let tail = Self::prev_of(&other.sentinel, storage, last);
        self.transfer(storage, pos, other, first, tail, count);
        trace!(from = ?other.id, to = ?self.id, moved = count, "spliced range");
    }
}

// --- Ordering ---

impl<T, H: Hook<T>> List<T, H> {
    /// Reverses the order of the elements by moving each to the front. Cursors stay valid.
    pub fn reverse(&mut self, storage: &mut [T]) {
        if self.len < 2 {
            return;
        }

        let front = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel);
        let mut at = Self::next_of(&self.sentinel, storage, front);
        while at != NodeRef::Sentinel {
            let next = Self::next_of(&self.sentinel, storage, at);
            let head = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel);
            Self::detach(&mut self.sentinel, storage, at, at);
            Self::attach(&mut self.sentinel, storage, head, at, at);
            at = next;
        }
    }

    /// Merges the sorted list `other` into the sorted list `self`, leaving `other` empty.
    #[inline]
    pub fn merge(&mut self, storage: &mut [T], other: &mut Self)
    where
        T: Ord,
    {
        self.merge_by(storage, other, |a, b| a.lt(b));
    }

    /// Merges `other` into `self`, both sorted by `is_less`, leaving `other` empty.
    ///
    /// Stable: of two equivalent elements the one from `self` comes first. Elements of `other`
    /// are moved in runs, one splice per run, *O*(*n* + *m*).
    pub fn merge_by<F>(&mut self, storage: &mut [T], other: &mut Self, mut is_less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let moved = other.len;
        self.merge_impl(storage, other, &mut is_less);
        trace!(from = ?other.id, to = ?self.id, moved, "merged lists");
    }

    /// Merges `other` into `self`, both sorted by the key extracted with `f`.
    #[inline]
    pub fn merge_by_key<K, F>(&mut self, storage: &mut [T], other: &mut Self, mut f: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.merge_by(storage, other, |a, b| f(a).lt(&f(b)));
    }

    fn merge_impl<F>(&mut self, storage: &mut [T], other: &mut Self, is_less: &mut F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut a = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel);
        let mut b = Self::next_of(&other.sentinel, storage, NodeRef::Sentinel);

        while let NodeRef::Element(b_index) = b {
            let NodeRef::Element(a_index) = a else {
                // `self` is exhausted, the rest of `other` goes to the back.
                self.transfer_all(storage, NodeRef::Sentinel, other);
                break;
            };

            if !is_less(&storage[b_index], &storage[a_index]) {
                a = Self::next_of(&self.sentinel, storage, a);
                continue;
            }

            // Collect the run of `other` that belongs in front of `a`.
            let mut last = b;
            let mut count = 1;
            let mut after = Self::next_of(&other.sentinel, storage, b);
            while let NodeRef::Element(index) = after {
                if !is_less(&storage[index], &storage[a_index]) {
                    break;
                }
                last = after;
                count += 1;
                after = Self::next_of(&other.sentinel, storage, after);
            }

            self.transfer(storage, a, other, b, last, count);
            b = after;
        }

        other.orphan_cursors();
    }

    /// Sorts the list stably, relinking only.
    #[inline]
    pub fn sort(&mut self, storage: &mut [T])
    where
        T: Ord,
    {
        self.sort_by(storage, |a, b| a.lt(b));
    }

    /// Sorts the list stably by `is_less`, *O*(*n* \* log(*n*)).
    ///
    /// Elements are taken off the front one at a time and carried through a row of bins, where
    /// bin `i` holds either nothing or a sorted run of `2^i` elements. A carried run merges with
    /// every occupied bin it meets and settles in the first empty one. At the end the bins are
    /// merged from smallest to largest. Elements are never moved in storage. Cursors stay valid.
    pub fn sort_by<F>(&mut self, storage: &mut [T], mut is_less: F)
    where
        F: FnMut(&T, &T) -> bool,
    {
        if self.len < 2 {
            return;
        }

        trace!(list = ?self.id, len = self.len, "sorting list");

        // Moving nodes through the bins steps the epoch, but cursors into `self` stay good.
        let epoch = self.epoch;
        let mut carry = self.scratch_list();
        let mut bins: [Self; SORT_BINS] = array::from_fn(|_| self.scratch_list());
        let mut fill = 0;

        while !self.is_empty() {
            let node = Self::next_of(&self.sentinel, storage, NodeRef::Sentinel);
            carry.transfer(storage, NodeRef::Sentinel, self, node, node, 1);

            let mut i = 0;
            while i < fill && !bins[i].is_empty() {
                // Bin `i` holds earlier elements than `carry`, merging into it keeps stability.
                bins[i].merge_impl(storage, &mut carry, &mut is_less);
                mem::swap(&mut carry, &mut bins[i]);
                i += 1;
            }
            mem::swap(&mut carry, &mut bins[i]);
            if i == fill {
                fill += 1;
            }
        }

        for i in 1..fill {
            let (lower, upper) = bins.split_at_mut(i);
            upper[0].merge_impl(storage, &mut lower[i - 1], &mut is_less);
        }

        self.transfer_all(storage, NodeRef::Sentinel, &mut bins[fill - 1]);
        self.epoch = epoch;
    }

    /// Sorts the list stably by the key extracted with `f`.
    #[inline]
    pub fn sort_by_key<K, F>(&mut self, storage: &mut [T], mut f: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.sort_by(storage, |a, b| f(a).lt(&f(b)));
    }
}

/// Iterator over the `(index, element)` pairs of a [`List`], see [`List::iter`].
pub struct Iter<'a, T, H = BaseHook> {
    sentinel: &'a Link,
    storage: &'a [T],
    front: NodeRef,
    back: NodeRef,
    remaining: usize,
    _hook: PhantomData<fn() -> H>,
}

impl<T, H> Clone for Iter<'_, T, H> {
    fn clone(&self) -> Self {
        Self {
            sentinel: self.sentinel,
            storage: self.storage,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            _hook: PhantomData,
        }
    }
}

impl<'a, T, H: Hook<T>> Iterator for Iter<'a, T, H> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.front.index()?;
        self.front = List::<T, H>::next_of(self.sentinel, self.storage, self.front);
        self.remaining -= 1;
        Some((index, &self.storage[index]))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, H: Hook<T>> DoubleEndedIterator for Iter<'_, T, H> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let index = self.back.index()?;
        self.back = List::<T, H>::prev_of(self.sentinel, self.storage, self.back);
        self.remaining -= 1;
        Some((index, &self.storage[index]))
    }
}

impl<T, H: Hook<T>> ExactSizeIterator for Iter<'_, T, H> {}

impl<T, H: Hook<T>> FusedIterator for Iter<'_, T, H> {}
