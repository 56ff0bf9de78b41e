use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use rand::prelude::*;
use sort_test_tools::patterns;
use stdkit::intrusive::{Link, Linkable, List, NodeRef};

#[derive(Debug)]
struct Node {
    val: i32,
    link: Link,
}

impl Linkable for Node {
    fn link(&self) -> &Link {
        &self.link
    }

    fn link_mut(&mut self) -> &mut Link {
        &mut self.link
    }
}

fn nodes(vals: &[i32]) -> Vec<Node> {
    vals.iter()
        .map(|&val| Node {
            val,
            link: Link::new(),
        })
        .collect()
}

/// A list holding every node of `storage`, in storage order.
fn linked(storage: &mut [Node]) -> List<Node> {
    let mut list = List::new();
    for index in 0..storage.len() {
        list.push_back(storage, index);
    }
    list
}

fn values(list: &List<Node>, storage: &[Node]) -> Vec<i32> {
    list.iter(storage).map(|(_, node)| node.val).collect()
}

fn indices(list: &List<Node>, storage: &[Node]) -> Vec<usize> {
    list.iter(storage).map(|(index, _)| index).collect()
}

#[test]
fn erase_middle() {
    let mut storage = nodes(&[1, 2, 3]);
    let mut list = linked(&mut storage);

    let b = list.cursor_of(&storage, 1);
    let next = list.erase(&mut storage, b);

    assert_eq!(list.len(), 2);
    assert_eq!(values(&list, &storage), [1, 3]);
    assert_eq!(list.get(&storage, next).map(|n| n.val), Some(3));
    assert!(!storage[1].link.is_linked());
    assert_eq!(storage[1].link.next(), None);
    assert_eq!(storage[1].link.prev(), None);
    assert!(list.is_well_formed(&storage));
}

#[test]
fn push_pop_both_ends() {
    let mut storage = nodes(&[10, 20, 30, 40]);
    let mut list: List<Node> = List::new();

    assert!(list.is_empty());
    assert!(list.front(&storage).is_none());
    assert_eq!(list.pop_front(&mut storage), None);
    assert!(list.cursor_front().is_end());

    list.push_back(&mut storage, 1);
    list.push_front(&mut storage, 0);
    list.push_back(&mut storage, 2);
    list.push_front(&mut storage, 3);
    assert_eq!(values(&list, &storage), [40, 10, 20, 30]);
    assert_eq!(list.front(&storage).map(|n| n.val), Some(40));
    assert_eq!(list.back(&storage).map(|n| n.val), Some(30));

    assert_eq!(list.pop_back(&mut storage), Some(2));
    assert_eq!(list.pop_front(&mut storage), Some(3));
    assert_eq!(values(&list, &storage), [10, 20]);
    assert!(!storage[2].link.is_linked());
    assert!(!storage[3].link.is_linked());

    // Popped elements can be linked again.
    list.push_back(&mut storage, 3);
    assert_eq!(values(&list, &storage), [10, 20, 40]);
    assert!(list.is_well_formed(&storage));
}

#[test]
fn insert_keeps_cursors() {
    let mut storage = nodes(&[1, 2, 3, 4]);
    let mut list: List<Node> = List::new();

    let end = list.end();
    let one = list.insert(&mut storage, end, 0);
    let three = list.insert(&mut storage, end, 2);
    let two = list.insert(&mut storage, three, 1);
    list.insert(&mut storage, one, 3);

    assert_eq!(values(&list, &storage), [4, 1, 2, 3]);
    assert_eq!(list.get(&storage, one).map(|n| n.val), Some(1));
    assert_eq!(list.get(&storage, two).map(|n| n.val), Some(2));
    assert_eq!(list.get(&storage, three).map(|n| n.val), Some(3));
    assert_eq!(list.get(&storage, end).map(|n| n.val), None);
}

#[test]
fn navigate_ring() {
    let mut storage = nodes(&[1, 2, 3]);
    let list = linked(&mut storage);

    let mut at = list.cursor_front();
    let mut seen = Vec::new();
    while !at.is_end() {
        seen.push(list.get(&storage, at).map(|n| n.val));
        at = list.next(&storage, at);
    }
    assert_eq!(seen, [Some(1), Some(2), Some(3)]);

    assert_eq!(list.next(&storage, list.end()), list.cursor_front());
    assert_eq!(list.prev(&storage, list.cursor_front()), list.end());
    assert_eq!(list.prev(&storage, list.end()), list.cursor_back());
    assert_eq!(list.cursor_back().node(), NodeRef::Element(2));
    assert_eq!(list.cursor_front().index(), Some(0));
}

#[test]
fn get_mut_through_cursor() {
    let mut storage = nodes(&[1, 2, 3]);
    let list = linked(&mut storage);

    let mid = list.cursor_of(&storage, 1);
    if let Some(node) = list.get_mut(&mut storage, mid) {
        node.val = 20;
    }
    assert_eq!(values(&list, &storage), [1, 20, 3]);
}

#[test]
#[cfg_attr(not(any(debug_assertions, feature = "checked-cursors")), ignore)]
#[should_panic(expected = "orphaned")]
fn orphaned_cursor_panics() {
    let mut storage = nodes(&[1, 2, 3]);
    let mut list = linked(&mut storage);

    let c = list.cursor_of(&storage, 2);
    list.erase_element(&mut storage, 0);

    // The cursor points at a node that is still linked, but it predates the removal.
    list.get(&storage, c);
}

#[test]
#[cfg_attr(not(any(debug_assertions, feature = "checked-cursors")), ignore)]
#[should_panic(expected = "used with list")]
fn foreign_cursor_panics() {
    let mut storage = nodes(&[1, 2]);
    let mut a: List<Node> = List::new();
    let b: List<Node> = List::new();
    a.push_back(&mut storage, 0);

    let foreign = b.end();
    a.insert(&mut storage, foreign, 1);
}

fn two_lists(storage: &mut [Node]) -> (List<Node>, List<Node>) {
    let mut a: List<Node> = List::new();
    let mut b: List<Node> = List::new();
    a.push_back(storage, 0);
    a.push_back(storage, 1);
    b.push_back(storage, 2);
    b.push_back(storage, 3);
    (a, b)
}

#[test]
#[cfg_attr(not(any(debug_assertions, feature = "checked-cursors")), ignore)]
#[should_panic(expected = "is not linked into list")]
fn erase_element_of_other_list_panics() {
    let mut storage = nodes(&[1, 2, 3, 4]);
    let (mut a, _b) = two_lists(&mut storage);

    a.erase_element(&mut storage, 2);
}

#[test]
#[cfg_attr(not(any(debug_assertions, feature = "checked-cursors")), ignore)]
#[should_panic(expected = "is not linked into list")]
fn cursor_of_element_in_other_list_panics() {
    let mut storage = nodes(&[1, 2, 3, 4]);
    let (a, b) = two_lists(&mut storage);

    let _ = b.cursor_of(&storage, 3);
    let _ = a.cursor_of(&storage, 3);
}

#[test]
#[cfg_attr(not(any(debug_assertions, feature = "checked-cursors")), ignore)]
fn failed_membership_check_leaves_lists_intact() {
    let mut storage = nodes(&[1, 2, 3, 4]);
    let (mut a, mut b) = two_lists(&mut storage);

    let res = panic::catch_unwind(AssertUnwindSafe(|| a.erase_element(&mut storage, 3)));
    assert!(res.is_err());
    assert_eq!(values(&a, &storage), [1, 2]);
    assert_eq!(values(&b, &storage), [3, 4]);
    assert!(a.is_well_formed(&storage));
    assert!(b.is_well_formed(&storage));

    let empty: List<Node> = List::new();
    let res = panic::catch_unwind(AssertUnwindSafe(|| empty.cursor_of(&storage, 0)));
    assert!(res.is_err());

    b.erase_element(&mut storage, 2);
    a.erase_element(&mut storage, 1);
    assert_eq!(values(&a, &storage), [1]);
    assert_eq!(values(&b, &storage), [4]);
}

#[test]
#[cfg_attr(not(debug_assertions), ignore)]
#[should_panic(expected = "already linked")]
fn insert_linked_element_panics() {
    let mut storage = nodes(&[1, 2]);
    let _a = linked(&mut storage);

    let mut b: List<Node> = List::new();
    b.push_back(&mut storage, 0);
}

#[test]
#[should_panic(expected = "cannot erase the end")]
fn erase_end_panics() {
    let mut storage = nodes(&[1]);
    let mut list = linked(&mut storage);
    let end = list.end();
    list.erase(&mut storage, end);
}

#[test]
fn splice_whole_list_keeps_identity() {
    let mut storage = nodes(&[1, 2, 3, 4, 5, 6]);
    let mut a: List<Node> = List::new();
    let mut b: List<Node> = List::new();
    for index in 0..3 {
        a.push_back(&mut storage, index);
    }
    for index in 3..6 {
        b.push_back(&mut storage, index);
    }

    let before: HashSet<*const Node> = storage.iter().map(|n| n as *const Node).collect();

    let pos = a.cursor_of(&storage, 1);
    a.splice(&mut storage, pos, &mut b);

    assert_eq!(values(&a, &storage), [1, 4, 5, 6, 2, 3]);
    assert_eq!(indices(&a, &storage), [0, 3, 4, 5, 1, 2]);
    assert_eq!(a.len(), 6);
    assert!(b.is_empty());
    assert_eq!(b.iter(&storage).count(), 0);
    assert!(a.is_well_formed(&storage));
    assert!(b.is_well_formed(&storage));

    let after: HashSet<*const Node> = a
        .iter(&storage)
        .map(|(_, n)| n as *const Node)
        .collect();
    assert_eq!(before, after);

    // Splicing an empty list is a no-op.
    let end = a.end();
    a.splice(&mut storage, end, &mut b);
    assert_eq!(a.len(), 6);
}

#[test]
fn splice_one_and_range() {
    let mut storage = nodes(&[1, 2, 3, 4, 5, 6, 7]);
    let mut a: List<Node> = List::new();
    let mut b: List<Node> = List::new();
    a.push_back(&mut storage, 0);
    for index in 1..7 {
        b.push_back(&mut storage, index);
    }

    let it = b.cursor_of(&storage, 3);
    let end = a.end();
    a.splice_one(&mut storage, end, &mut b, it);
    assert_eq!(values(&a, &storage), [1, 4]);
    assert_eq!(values(&b, &storage), [2, 3, 5, 6, 7]);

    // Source cursors are orphaned by the splice, take fresh ones.
    let first = b.cursor_of(&storage, 2);
    let last = b.cursor_of(&storage, 5);
    let pos = a.cursor_of(&storage, 3);
    a.splice_range(&mut storage, pos, &mut b, first, last);
    assert_eq!(values(&a, &storage), [1, 3, 5, 4]);
    assert_eq!(values(&b, &storage), [2, 6, 7]);
    assert_eq!((a.len(), b.len()), (4, 3));

    // Up to the end of the source.
    let first = b.cursor_of(&storage, 5);
    let last = b.end();
    let end = a.end();
    a.splice_range(&mut storage, end, &mut b, first, last);
    assert_eq!(values(&a, &storage), [1, 3, 5, 4, 6, 7]);
    assert_eq!(values(&b, &storage), [2]);

    // Empty range.
    let first = b.cursor_front();
    let end = a.end();
    a.splice_range(&mut storage, end, &mut b, first, first);
    assert_eq!(b.len(), 1);

    assert!(a.is_well_formed(&storage));
    assert!(b.is_well_formed(&storage));
}

#[test]
#[should_panic(expected = "not reachable")]
fn splice_range_backwards_panics() {
    let mut storage = nodes(&[1, 2, 3]);
    let mut a: List<Node> = List::new();
    let mut b = linked(&mut storage);

    let first = b.cursor_of(&storage, 2);
    let last = b.cursor_of(&storage, 0);
    let end = a.end();
    a.splice_range(&mut storage, end, &mut b, first, last);
}

#[test]
fn merge_is_stable() {
    let mut storage = nodes(&[1, 3, 3, 7, 0, 3, 4, 9, 9]);
    let mut a: List<Node> = List::new();
    let mut b: List<Node> = List::new();
    for index in 0..4 {
        a.push_back(&mut storage, index);
    }
    for index in 4..9 {
        b.push_back(&mut storage, index);
    }

    a.merge_by_key(&mut storage, &mut b, |n| n.val);

    assert_eq!(values(&a, &storage), [0, 1, 3, 3, 3, 4, 7, 9, 9]);
    // The 3s from `a` come before the 3 from `b`.
    assert_eq!(indices(&a, &storage), [4, 0, 1, 2, 5, 6, 3, 7, 8]);
    assert!(b.is_empty());
    assert_eq!(a.len(), 9);
    assert!(a.is_well_formed(&storage));
    assert!(b.is_well_formed(&storage));

    // Merging into an empty list takes everything.
    let mut c: List<Node> = List::new();
    c.merge_by_key(&mut storage, &mut a, |n| n.val);
    assert_eq!(c.len(), 9);
    assert!(a.is_empty());
}

#[test]
fn sort_is_stable_and_keeps_cursors() {
    let mut rng = StdRng::seed_from_u64(patterns::random_init_seed());

    for len in [0, 1, 2, 3, 10, 100, 1_000, 4_097] {
        let vals = patterns::random_uniform(len, 0..(len as i32 / 3).max(1));
        let mut storage = nodes(&vals);
        let mut list = linked(&mut storage);

        let tracked = (len > 0).then(|| rng.gen_range(0..len));
        let cursor = tracked.map(|index| list.cursor_of(&storage, index));

        list.sort_by_key(&mut storage, |n| n.val);

        let mut expected: Vec<usize> = (0..len).collect();
        expected.sort_by_key(|&index| vals[index]);
        assert_eq!(indices(&list, &storage), expected, "len {len}");
        assert_eq!(list.len(), len);
        assert!(list.is_well_formed(&storage));

        if let (Some(index), Some(cursor)) = (tracked, cursor) {
            assert_eq!(list.get(&storage, cursor).map(|n| n.val), Some(vals[index]));
        }
    }
}

#[test]
fn sort_descending() {
    let mut storage = nodes(&[5, 3, 8, 1, 9, 2]);
    let mut list = linked(&mut storage);

    list.sort_by(&mut storage, |a, b| a.val > b.val);
    assert_eq!(values(&list, &storage), [9, 8, 5, 3, 2, 1]);
}

#[test]
fn remove_and_unique() {
    let mut storage = nodes(&[1, 1, 2, 3, 3, 3, 1, 4, 4]);
    let mut list = linked(&mut storage);

    assert_eq!(list.unique_by(&mut storage, |a, b| a.val == b.val), 4);
    assert_eq!(values(&list, &storage), [1, 2, 3, 1, 4]);
    assert!(!storage[1].link.is_linked());

    assert_eq!(list.remove_if(&mut storage, |n| n.val == 1), 2);
    assert_eq!(values(&list, &storage), [2, 3, 4]);
    assert_eq!(list.remove_if(&mut storage, |n| n.val > 100), 0);

    assert_eq!(list.remove_if(&mut storage, |_| true), 3);
    assert!(list.is_empty());
    assert!(storage.iter().all(|n| !n.link.is_linked()));
    assert!(list.is_well_formed(&storage));

    let mut empty: List<Node> = List::new();
    assert_eq!(empty.unique_by(&mut storage, |a, b| a.val == b.val), 0);
}

#[test]
fn reverse_in_place() {
    for len in [0, 1, 2, 7] {
        let vals: Vec<i32> = (0..len).collect();
        let mut storage = nodes(&vals);
        let mut list = linked(&mut storage);
        let front = list.cursor_front();

        list.reverse(&mut storage);

        let expected: Vec<i32> = vals.iter().rev().copied().collect();
        assert_eq!(values(&list, &storage), expected);
        assert!(list.is_well_formed(&storage));
        if len > 0 {
            assert_eq!(list.get(&storage, front).map(|n| n.val), Some(0));
        }
    }
}

#[test]
fn contains_clear_swap() {
    let mut storage = nodes(&[1, 2, 3, 4]);
    let mut a: List<Node> = List::new();
    let mut b: List<Node> = List::new();
    a.push_back(&mut storage, 0);
    a.push_back(&mut storage, 1);
    b.push_back(&mut storage, 2);

    assert!(a.contains(&storage, 1));
    assert!(!a.contains(&storage, 2));
    assert!(!a.contains(&storage, 3));

    a.swap(&mut b);
    assert_eq!(values(&a, &storage), [3]);
    assert_eq!(values(&b, &storage), [1, 2]);
    assert!(a.is_well_formed(&storage));
    assert!(b.is_well_formed(&storage));

    b.clear(&mut storage);
    assert!(b.is_empty());
    assert!(!storage[0].link.is_linked());
    assert!(!storage[1].link.is_linked());
    assert!(b.is_well_formed(&storage));

    b.push_back(&mut storage, 0);
    assert_eq!(values(&b, &storage), [1]);
}

#[test]
fn iter_both_ends() {
    let mut storage = nodes(&[1, 2, 3, 4, 5]);
    let list = linked(&mut storage);

    let mut iter = list.iter(&storage);
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next().map(|(_, n)| n.val), Some(1));
    assert_eq!(iter.next_back().map(|(_, n)| n.val), Some(5));
    assert_eq!(iter.len(), 3);

    let rest: Vec<i32> = iter.clone().map(|(_, n)| n.val).collect();
    assert_eq!(rest, [2, 3, 4]);
    let rest_rev: Vec<i32> = iter.rev().map(|(_, n)| n.val).collect();
    assert_eq!(rest_rev, [4, 3, 2]);

    let back_to_front: Vec<usize> = list.iter(&storage).rev().map(|(index, _)| index).collect();
    assert_eq!(back_to_front, [4, 3, 2, 1, 0]);
}

#[test]
fn cloned_link_is_unlinked() {
    let mut storage = nodes(&[1, 2]);
    let _list = linked(&mut storage);

    assert!(storage[0].link.is_linked());
    let copy = storage[0].link.clone();
    assert!(!copy.is_linked());
}

// --- Member hooks ---

#[derive(Debug)]
struct Task {
    prio: u32,
    deadline: u32,
    by_prio: Link,
    by_deadline: Link,
}

stdkit::member_hook!(PrioHook = Task, by_prio);
stdkit::member_hook!(DeadlineHook = Task, by_deadline);

#[test]
fn member_hooks_thread_independent_lists() {
    let mut tasks: Vec<Task> = [(3, 30), (1, 20), (2, 10)]
        .into_iter()
        .map(|(prio, deadline)| Task {
            prio,
            deadline,
            by_prio: Link::new(),
            by_deadline: Link::new(),
        })
        .collect();

    let mut by_prio: List<Task, PrioHook> = List::new();
    let mut by_deadline: List<Task, DeadlineHook> = List::new();
    for index in 0..tasks.len() {
        by_prio.push_back(&mut tasks, index);
        by_deadline.push_back(&mut tasks, index);
    }

    by_prio.sort_by_key(&mut tasks, |t| t.prio);
    by_deadline.sort_by_key(&mut tasks, |t| t.deadline);

    let prio_order: Vec<usize> = by_prio.iter(&tasks).map(|(index, _)| index).collect();
    let deadline_order: Vec<usize> = by_deadline.iter(&tasks).map(|(index, _)| index).collect();
    assert_eq!(prio_order, [1, 2, 0]);
    assert_eq!(deadline_order, [2, 1, 0]);

    // Leaving one list does not affect membership in the other.
    by_prio.erase_element(&mut tasks, 2);
    assert!(!tasks[2].by_prio.is_linked());
    assert!(tasks[2].by_deadline.is_linked());
    assert_eq!(by_deadline.len(), 3);
    assert!(by_prio.is_well_formed(&tasks));
    assert!(by_deadline.is_well_formed(&tasks));
}
