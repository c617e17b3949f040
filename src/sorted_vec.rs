//! A sorted collection backed by one contiguous vector.

use alloc::vec::Vec;
use core::fmt;
use core::iter::Rev;
use core::ops::Range;
use core::slice;

use crate::compare::{Compare, Natural};
use crate::error::{Error, READ_ONLY, Result};
use crate::sorted_list::{IndexingSpeed, SortedList, check_range};
use crate::tracing_helpers::debug_log;

/// A sorted collection stored in a single [`Vec`].
///
/// Positional access is O(1) and lookups are a binary search, but every
/// insertion or removal shifts the tail of the vector, so mutation is O(n).
/// For large collections under steady mutation prefer
/// [`BTreeList`](crate::BTreeList), which behaves identically through
/// [`SortedList`].
///
/// # Examples
///
/// ```
/// use sorted_lists::{SortedList, SortedVec};
///
/// let mut list = SortedVec::new();
/// list.add(3).unwrap();
/// list.add(1).unwrap();
/// assert!(!list.add(3).unwrap());
///
/// assert_eq!(list.as_slice(), [1, 3]);
/// assert_eq!(list.index_of(&2), Err(1));
/// ```
pub struct SortedVec<T, C = Natural> {
    items: Vec<T>,
    compare: C,
    allows_duplicates: bool,
    read_only: bool,
}

impl<T: Ord> SortedVec<T> {
    /// Creates an empty list ordered by [`Ord`] that rejects duplicates.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> SortedVec<T, C> {
    /// Creates an empty list ordered by `compare` that rejects duplicates.
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        SortedVec {
            items: Vec::new(),
            compare,
            allows_duplicates: false,
            read_only: false,
        }
    }

    /// The elements in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns `true` if mutations are rejected.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Freezes or unfreezes the list.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl<T, C: Compare<T>> SortedVec<T, C> {
    /// Allows or forbids duplicate elements from now on.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] when
    /// forbidding duplicates while the list already holds some.
    pub fn set_allows_duplicates(&mut self, allows_duplicates: bool) -> Result<()> {
        if !allows_duplicates && self.items.windows(2).any(|w| self.compare.compare(&w[0], &w[1]).is_eq()) {
            debug_log!("rejected disabling duplicates");
            return Err(Error::InvalidOperation("collection contains duplicates"));
        }
        self.allows_duplicates = allows_duplicates;
        Ok(())
    }

    /// Number of elements strictly less than `value`.
    fn lower_bound(&self, value: &T) -> usize {
        self.items.partition_point(|item| self.compare.compare(item, value).is_lt())
    }

    /// Number of elements less than or equal to `value`.
    fn upper_bound(&self, value: &T) -> usize {
        self.items.partition_point(|item| self.compare.compare(item, value).is_le())
    }

    fn insert(&mut self, value: T) -> bool {
        let at = self.upper_bound(&value);
        if !self.allows_duplicates && at > 0 && self.compare.compare(&self.items[at - 1], &value).is_eq() {
            return false;
        }
        self.items.insert(at, value);
        true
    }
}

impl<T, C: Compare<T>> SortedList<T> for SortedVec<T, C> {
    type Iter<'a>
        = slice::Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn allows_duplicates(&self) -> bool {
        self.allows_duplicates
    }

    fn indexing_speed(&self) -> IndexingSpeed {
        IndexingSpeed::Constant
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    fn index_of(&self, value: &T) -> core::result::Result<usize, usize> {
        let at = self.lower_bound(value);
        match self.items.get(at) {
            Some(item) if self.compare.compare(item, value).is_eq() => Ok(at),
            _ => Err(at),
        }
    }

    fn add(&mut self, value: T) -> Result<bool> {
        if self.read_only {
            return Err(READ_ONLY);
        }
        Ok(self.insert(value))
    }

    fn remove(&mut self, value: &T) -> Result<bool> {
        if self.read_only {
            return Err(READ_ONLY);
        }
        match self.index_of(value) {
            Ok(at) => {
                self.items.remove(at);
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    fn remove_at(&mut self, index: usize) -> Result<T> {
        if self.read_only {
            return Err(READ_ONLY);
        }
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange {
                index,
                len,
            });
        }
        Ok(self.items.remove(index))
    }

    fn clear(&mut self) -> Result<()> {
        if self.read_only {
            return Err(READ_ONLY);
        }
        self.items.clear();
        Ok(())
    }

    fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    fn enumerate_range(&self, range: Range<usize>) -> Result<slice::Iter<'_, T>> {
        check_range(&range, self.items.len())?;
        Ok(self.items[range].iter())
    }

    fn enumerate_from(&self, value: &T) -> slice::Iter<'_, T> {
        self.items[self.lower_bound(value)..].iter()
    }

    fn enumerate_backwards_from(&self, value: &T) -> Rev<slice::Iter<'_, T>> {
        self.items[..self.upper_bound(value)].iter().rev()
    }

    fn first_index_greater_than(&self, value: &T) -> usize {
        self.upper_bound(value)
    }

    fn last_index_less_than(&self, value: &T) -> Option<usize> {
        self.lower_bound(value).checked_sub(1)
    }
}

impl<T: Clone, C: Clone> Clone for SortedVec<T, C> {
    fn clone(&self) -> Self {
        SortedVec {
            items: self.items.clone(),
            compare: self.compare.clone(),
            allows_duplicates: self.allows_duplicates,
            read_only: self.read_only,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedVec<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: Ord> Default for SortedVec<T> {
    fn default() -> Self {
        SortedVec::new()
    }
}

impl<T: PartialEq, C> PartialEq for SortedVec<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq, C> Eq for SortedVec<T, C> {}

impl<T: Ord> FromIterator<T> for SortedVec<T> {
    /// Collects into a list that rejects duplicates; later equal elements are dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items: Vec<T> = iter.into_iter().collect();
        // Stable, so the first of each run of equal elements survives the dedup.
        items.sort();
        items.dedup();
        SortedVec {
            items,
            ..SortedVec::new()
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for SortedVec<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T, C: Compare<T>> Extend<T> for SortedVec<T, C> {
    /// # Panics
    ///
    /// Panics if the list is read-only.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        assert!(!self.read_only, "cannot extend a read-only collection");
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T, C> IntoIterator for &'a SortedVec<T, C> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.items.iter()
    }
}
