use std::cmp::Ordering;

use stdkit::scratch::Global;

mod introsort {
    use super::*;

    struct SortImpl {}

    impl sort_test_tools::Sort for SortImpl {
        fn name() -> String {
            "stdkit_introsort_unstable".into()
        }

        fn sort<T>(arr: &mut [T])
        where
            T: Ord,
        {
            stdkit::sort::sort(arr);
        }

        fn sort_by<T, F>(arr: &mut [T], mut compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
        {
            stdkit::sort::sort_by(arr, |a, b| compare(a, b) == Ordering::Less);
        }
    }

    sort_test_tools::instantiate_sort_tests!(SortImpl);
}

// Quadratic, far too slow for the large sizes.
#[cfg(not(feature = "large_test_sizes"))]
mod insertion {
    use super::*;

    struct SortImpl {}

    impl sort_test_tools::Sort for SortImpl {
        fn name() -> String {
            "stdkit_insertion_stable".into()
        }

        fn sort<T>(arr: &mut [T])
        where
            T: Ord,
        {
            stdkit::sort::insertion_sort(arr);
        }

        fn sort_by<T, F>(arr: &mut [T], mut compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
        {
            stdkit::sort::insertion_sort_by(arr, |a, b| compare(a, b) == Ordering::Less);
        }
    }

    sort_test_tools::instantiate_sort_tests!(SortImpl);
    sort_test_tools::instantiate_stable_sort_tests!(SortImpl);
}

mod stable {
    use super::*;

    struct SortImpl {}

    impl sort_test_tools::Sort for SortImpl {
        fn name() -> String {
            "stdkit_merge_stable".into()
        }

        fn sort<T>(arr: &mut [T])
        where
            T: Ord,
        {
            stdkit::sort::stable_sort(arr);
        }

        fn sort_by<T, F>(arr: &mut [T], mut compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
        {
            stdkit::sort::stable_sort_by(arr, |a, b| compare(a, b) == Ordering::Less);
        }
    }

    sort_test_tools::instantiate_sort_tests!(SortImpl);
    sort_test_tools::instantiate_stable_sort_tests!(SortImpl);
}

// Merges that do not fit the buffer are split by rotations.
mod stable_small_buffer {
    use super::*;

    const CAPACITY: usize = 8;

    struct SortImpl {}

    impl sort_test_tools::Sort for SortImpl {
        fn name() -> String {
            "stdkit_merge_stable_cap_8".into()
        }

        fn sort<T>(arr: &mut [T])
        where
            T: Ord,
        {
            stdkit::sort::stable_sort_in(arr, CAPACITY, Global, |a, b| a.lt(b));
        }

        fn sort_by<T, F>(arr: &mut [T], mut compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
        {
            stdkit::sort::stable_sort_in(arr, CAPACITY, Global, |a, b| {
                compare(a, b) == Ordering::Less
            });
        }
    }

    sort_test_tools::instantiate_sort_tests!(SortImpl);
    sort_test_tools::instantiate_stable_sort_tests!(SortImpl);
}

// Every merge falls back to in-place rotations.
mod stable_no_buffer {
    use super::*;

    struct SortImpl {}

    impl sort_test_tools::Sort for SortImpl {
        fn name() -> String {
            "stdkit_merge_stable_cap_0".into()
        }

        fn sort<T>(arr: &mut [T])
        where
            T: Ord,
        {
            stdkit::sort::stable_sort_in(arr, 0, Global, |a, b| a.lt(b));
        }

        fn sort_by<T, F>(arr: &mut [T], mut compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
        {
            stdkit::sort::stable_sort_in(arr, 0, Global, |a, b| compare(a, b) == Ordering::Less);
        }
    }

    sort_test_tools::instantiate_sort_tests!(SortImpl);
    sort_test_tools::instantiate_stable_sort_tests!(SortImpl);
}
