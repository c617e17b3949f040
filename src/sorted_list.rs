//! The contract shared by every sorted collection in this crate.
//!
//! [`BTreeList`](crate::BTreeList) and [`SortedVec`](crate::SortedVec) make
//! different trade-offs between insertion and indexing cost, but behave
//! identically through this trait, so client code (benchmarks included) can
//! be written once against `impl SortedList<T>`.

use core::iter::Rev;
use core::ops::Range;

use crate::error::{Error, Result};

/// Asymptotic cost of positional access on a collection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IndexingSpeed {
    /// O(1)
    Constant,
    /// O(log n)
    Logarithmic,
    /// O(n)
    Linear,
}

/// A collection kept in ascending order under its ordering policy, addressable by rank.
///
/// Ranks are zero-based positions in sorted order. When duplicates are
/// allowed, equal elements occupy consecutive ranks.
///
/// # Examples
///
/// ```
/// use sorted_lists::{BTreeList, SortedList, SortedVec};
///
/// fn median<L: SortedList<i32>>(list: &L) -> Option<&i32> {
///     list.get(list.len() / 2)
/// }
///
/// let tree: BTreeList<i32> = [9, 1, 5].into();
/// let vec: SortedVec<i32> = [9, 1, 5].into();
/// assert_eq!(median(&tree), Some(&5));
/// assert_eq!(median(&vec), Some(&5));
/// ```
pub trait SortedList<T> {
    /// Iterator over a contiguous run of ranks, in ascending order.
    type Iter<'a>: DoubleEndedIterator<Item = &'a T> + ExactSizeIterator
    where
        Self: 'a,
        T: 'a;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if the collection holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether elements comparing equal to an existing element may be added.
    fn allows_duplicates(&self) -> bool;

    /// Cost of [`get`](Self::get) and the other rank-based operations.
    fn indexing_speed(&self) -> IndexingSpeed;

    /// Returns the element of rank `index`, or `None` if out of range.
    fn get(&self, index: usize) -> Option<&T>;

    /// Returns the element of rank `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len,
        })
    }

    /// The smallest element.
    fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// The largest element.
    fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns `Ok(rank)` of `value` if present, else `Err(rank)` where it would be inserted.
    ///
    /// With duplicates allowed, the rank of the earliest equal element is returned.
    fn index_of(&self, value: &T) -> core::result::Result<usize, usize>;

    /// Returns `true` if an element equal to `value` is present.
    fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_ok()
    }

    /// Inserts `value` at its sorted position.
    ///
    /// Returns `Ok(false)` without modifying the collection if `value` is
    /// already present and duplicates are not allowed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the collection is read-only.
    fn add(&mut self, value: T) -> Result<bool>;

    /// Removes one element equal to `value`, returning whether one was found.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the collection is read-only.
    fn remove(&mut self, value: &T) -> Result<bool>;

    /// Removes and returns the element of rank `index`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the collection is read-only,
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    fn remove_at(&mut self, index: usize) -> Result<T>;

    /// Removes every element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the collection is read-only.
    fn clear(&mut self) -> Result<()>;

    /// Iterates over all elements in ascending order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Iterates over the elements of ranks `range.start..range.end`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] unless `range.start <= range.end <= len()`.
    fn enumerate_range(&self, range: Range<usize>) -> Result<Self::Iter<'_>>;

    /// Iterates from rank `index` to the end.
    ///
    /// `index == len()` yields an empty iterator.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index > len()`.
    fn enumerate_from_index(&self, index: usize) -> Result<Self::Iter<'_>> {
        self.enumerate_range(index..self.len())
    }

    /// Iterates from rank `index` back to the first element, in descending order.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    fn enumerate_backwards_from_index(&self, index: usize) -> Result<Rev<Self::Iter<'_>>> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange {
                index,
                len,
            });
        }
        Ok(self.enumerate_range(0..index + 1)?.rev())
    }

    /// Iterates over every element greater than or equal to `value`, in ascending order.
    fn enumerate_from(&self, value: &T) -> Self::Iter<'_>;

    /// Iterates over every element less than or equal to `value`, in descending order.
    fn enumerate_backwards_from(&self, value: &T) -> Rev<Self::Iter<'_>>;

    /// Rank of the first element greater than `value`; `len()` if there is none.
    fn first_index_greater_than(&self, value: &T) -> usize;

    /// Rank of the last element less than `value`, or `None` if there is none.
    fn last_index_less_than(&self, value: &T) -> Option<usize>;
}

pub(crate) fn check_range(range: &Range<usize>, len: usize) -> Result<()> {
    if range.end > len {
        return Err(Error::IndexOutOfRange {
            index: range.end,
            len,
        });
    }
    if range.start > range.end {
        return Err(Error::IndexOutOfRange {
            index: range.start,
            len,
        });
    }
    Ok(())
}
