//! Ordering policies for sorted collections.
//!
//! A collection never calls [`Ord`] directly; it asks the [`Compare`] value it
//! was constructed with. [`Natural`] is the default, and any closure of the
//! shape `Fn(&T, &T) -> Ordering` works as a policy too.
//!
//! # Examples
//!
//! ```
//! use sorted_lists::{BTreeList, BTreeListConfig};
//!
//! // Order strings by length, then alphabetically.
//! let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len()).then(a.cmp(b));
//! let mut words: BTreeList<&str, _> = BTreeList::with_comparator(BTreeListConfig::default(), by_len).unwrap();
//! for w in ["pear", "fig", "banana", "kiwi"] {
//!     words.add(w).unwrap();
//! }
//! assert_eq!(words.iter().copied().collect::<Vec<_>>(), ["fig", "kiwi", "pear", "banana"]);
//! ```

use core::cmp::Ordering;

/// A total order over `T`.
///
/// Implementations must be consistent: `compare(a, b)` must be the reverse
/// of `compare(b, a)`, and the relation must be transitive. A policy that
/// breaks these rules will not cause memory unsafety, but lookups and rank
/// queries on the collection using it return unspecified results.
pub trait Compare<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another ordering policy.
///
/// ```
/// use sorted_lists::compare::{Compare, Natural, Reverse};
/// use core::cmp::Ordering;
///
/// assert_eq!(Reverse(Natural).compare(&1, &2), Ordering::Greater);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn sort_with<C: Compare<i32>>(compare: &C, values: &mut [i32]) {
        values.sort_by(|a, b| compare.compare(a, b));
    }

    #[test]
    fn policies_agree_with_std_orderings() {
        let mut values = [3, -1, 7, 0, 7];

        sort_with(&Natural, &mut values);
        assert_eq!(values, [-1, 0, 3, 7, 7]);

        sort_with(&Reverse(Natural), &mut values);
        assert_eq!(values, [7, 7, 3, 0, -1]);

        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs()).then(a.cmp(b));
        sort_with(&by_abs, &mut values);
        assert_eq!(values, [0, -1, 3, 7, 7]);
    }
}
