//! Shared test suite for slice sorts.
//!
//! A sort under test implements [`Sort`], and [`instantiate_sort_tests!`] expands to one
//! `#[test]` per generic test in [`tests`]. Stable sorts additionally get the stability tests
//! from [`instantiate_stable_sort_tests!`].
//!
//! Random inputs are derived from a seed that is printed once per test binary. Set
//! `SORT_TEST_SEED` to reproduce a failing run.

use std::cmp::Ordering;

pub mod patterns;

#[doc(hidden)]
pub use paste;

pub trait Sort {
    fn name() -> String;

    fn sort<T>(arr: &mut [T])
    where
        T: Ord;

    fn sort_by<T, F>(arr: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering;
}

#[doc(hidden)]
#[macro_export]
macro_rules! instantiate_sort_test_inner {
    ($sort_impl:ty, $test_fn_name:ident) => {
        $crate::paste::paste! {
            #[test]
            fn [<sort_ $test_fn_name>]() {
                $crate::tests::$test_fn_name::<$sort_impl>();
            }
        }
    };
}

#[macro_export]
macro_rules! instantiate_sort_tests {
    ($sort_impl:ty) => {
        $crate::instantiate_sort_test_inner!($sort_impl, basic);
        $crate::instantiate_sort_test_inner!($sort_impl, fixed_seed);
        $crate::instantiate_sort_test_inner!($sort_impl, random);
        $crate::instantiate_sort_test_inner!($sort_impl, random_type_u64);
        $crate::instantiate_sort_test_inner!($sort_impl, random_type_string);
        $crate::instantiate_sort_test_inner!($sort_impl, random_type_large_val);
        $crate::instantiate_sort_test_inner!($sort_impl, random_narrow);
        $crate::instantiate_sort_test_inner!($sort_impl, random_zipf);
        $crate::instantiate_sort_test_inner!($sort_impl, all_equal);
        $crate::instantiate_sort_test_inner!($sort_impl, ascending);
        $crate::instantiate_sort_test_inner!($sort_impl, descending);
        $crate::instantiate_sort_test_inner!($sort_impl, saw_ascending);
        $crate::instantiate_sort_test_inner!($sort_impl, saw_descending);
        $crate::instantiate_sort_test_inner!($sort_impl, pipe_organ);
        $crate::instantiate_sort_test_inner!($sort_impl, median3_killer);
        $crate::instantiate_sort_test_inner!($sort_impl, int_edge);
        $crate::instantiate_sort_test_inner!($sort_impl, sort_by_reverse);
        $crate::instantiate_sort_test_inner!($sort_impl, zero_sized);
        $crate::instantiate_sort_test_inner!($sort_impl, panic_retain_original_set);
        $crate::instantiate_sort_test_inner!($sort_impl, panic_drops_each_once);
        $crate::instantiate_sort_test_inner!($sort_impl, violate_ord_retain_original_set);
        $crate::instantiate_sort_test_inner!($sort_impl, observable_is_less);
    };
}

#[macro_export]
macro_rules! instantiate_stable_sort_tests {
    ($sort_impl:ty) => {
        $crate::instantiate_sort_test_inner!($sort_impl, stability);
        $crate::instantiate_sort_test_inner!($sort_impl, stability_narrow);
        $crate::instantiate_sort_test_inner!($sort_impl, stability_with_patterns);
    };
}
