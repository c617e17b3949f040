use core::fmt;
use core::iter::Rev;
use core::ops::Range;

use crate::compare::{Compare, Natural};
use crate::error::{Error, READ_ONLY, Result};
use crate::raw::{Bias, RawBTree};
use crate::sorted_list::{IndexingSpeed, SortedList, check_range};
use crate::tracing_helpers::debug_log;

mod config;
mod iter;
mod order_statistic;

pub use config::{BTreeListConfig, DEFAULT_NODE_CAPACITY};
pub use iter::Iter;

/// A sorted list based on an indexable B-tree.
///
/// Elements live in fixed-capacity leaves chained left to right; internal
/// nodes cache the first element of each child and count the elements below
/// them. Lookups, insertions, removals and positional access ([`get`],
/// [`remove_at`], [`index_of`]) are all O(log n), and iteration walks the
/// leaf chain at O(1) amortized per element.
///
/// Elements are ordered by the [`Compare`] policy the list was built with,
/// [`Natural`] by default. Duplicates are rejected unless enabled through
/// [`BTreeListConfig::with_duplicates`] or [`set_allows_duplicates`].
///
/// It is a logic error for an element to be modified in such a way that its
/// ordering relative to any other element changes while it is in the list.
/// The behavior resulting from such a logic error is not specified, but will
/// not result in undefined behavior.
///
/// [`get`]: BTreeList::get
/// [`remove_at`]: BTreeList::remove_at
/// [`index_of`]: BTreeList::index_of
/// [`set_allows_duplicates`]: BTreeList::set_allows_duplicates
///
/// # Examples
///
/// ```
/// use sorted_lists::{BTreeList, Rank};
///
/// let mut scores = BTreeList::new();
/// for score in [85, 100, 92] {
///     scores.add(score).unwrap();
/// }
///
/// // The median, by rank.
/// assert_eq!(scores.get(1), Some(&92));
/// assert_eq!(scores[Rank(2)], 100);
///
/// // Where a value is, or would be.
/// assert_eq!(scores.index_of(&100), Ok(2));
/// assert_eq!(scores.index_of(&90), Err(1));
///
/// // Everything from 90 up.
/// assert_eq!(scores.enumerate_from(&90).copied().collect::<Vec<_>>(), [92, 100]);
/// ```
pub struct BTreeList<T, C = Natural> {
    tree: RawBTree<T, C>,
    allows_duplicates: bool,
    read_only: bool,
}

impl<T: Ord> BTreeList<T> {
    /// Makes a new, empty `BTreeList` with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::BTreeList;
    ///
    /// let mut list = BTreeList::new();
    /// list.add(1).unwrap();
    /// assert_eq!(list.len(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let config = BTreeListConfig::new();
        BTreeList {
            tree: RawBTree::new(config.node_capacity, Natural),
            allows_duplicates: config.allows_duplicates,
            read_only: false,
        }
    }

    /// Makes a new, empty `BTreeList` ordered by [`Ord`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `config.node_capacity <= 2`.
    pub fn with_config(config: BTreeListConfig) -> Result<Self> {
        Self::with_comparator(config, Natural)
    }
}

impl<T, C> BTreeList<T, C> {
    /// Makes a new, empty `BTreeList` ordered by `compare`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `config.node_capacity <= 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::{BTreeList, BTreeListConfig};
    /// use sorted_lists::compare::{Natural, Reverse};
    ///
    /// let mut list = BTreeList::with_comparator(BTreeListConfig::default(), Reverse(Natural)).unwrap();
    /// list.extend([1, 3, 2]);
    /// assert_eq!(list.first(), Some(&3));
    ///
    /// let bad = BTreeListConfig::default().with_node_capacity(2);
    /// assert!(BTreeList::<i32>::with_config(bad).is_err());
    /// ```
    pub fn with_comparator(config: BTreeListConfig, compare: C) -> Result<Self> {
        config.validate()?;
        Ok(BTreeList {
            tree: RawBTree::new(config.node_capacity, compare),
            allows_duplicates: config.allows_duplicates,
            read_only: false,
        })
    }

    /// Returns the number of elements in the list. O(1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the list contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries per node.
    #[must_use]
    pub fn node_capacity(&self) -> usize {
        self.tree.node_capacity()
    }

    #[must_use]
    pub fn allows_duplicates(&self) -> bool {
        self.allows_duplicates
    }

    /// Returns `true` if mutations are rejected.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Freezes or unfreezes the list.
    ///
    /// While frozen, [`add`](Self::add), [`remove`](Self::remove),
    /// [`remove_at`](Self::remove_at) and [`clear`](Self::clear) fail with
    /// [`Error::InvalidOperation`].
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns the element of rank `index`, or `None` if out of range. O(log n).
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::BTreeList;
    ///
    /// let list = BTreeList::from([10, 20, 30]);
    /// assert_eq!(list.get(1), Some(&20));
    /// assert_eq!(list.get(3), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.tree.get(index)
    }

    /// Returns the element of rank `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        self.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Returns the smallest element. O(1).
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Removes and returns the element of rank `index`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the list is read-only,
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::BTreeList;
    ///
    /// let mut list = BTreeList::from([1, 2, 3]);
    /// assert_eq!(list.remove_at(0), Ok(1));
    /// assert!(list.remove_at(2).is_err());
    /// ```
    pub fn remove_at(&mut self, index: usize) -> Result<T>
    where
        T: Clone,
        C: Compare<T>,
    {
        if self.read_only {
            debug_log!("rejected remove_at on read-only list");
            return Err(READ_ONLY);
        }
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange {
                index,
                len,
            });
        }
        let (leaf, position) = self.tree.leaf_at(index);
        Ok(self.tree.remove_at(leaf, position))
    }

    /// Removes every element, keeping the configuration. O(1) in the tree's
    /// height; the nodes are dropped with their elements.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the list is read-only.
    pub fn clear(&mut self) -> Result<()> {
        if self.read_only {
            debug_log!("rejected clear on read-only list");
            return Err(READ_ONLY);
        }
        self.tree.clear();
        Ok(())
    }

    /// Iterates over all elements in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::BTreeList;
    ///
    /// let list = BTreeList::from([3, 1, 2]);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        let front = (self.tree.first_leaf(), 0);
        Iter::new(self.tree.nodes(), front, self.tree.end(), self.len())
    }

    /// Iterates over the elements of ranks `range.start..range.end`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] unless `range.start <= range.end <= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::BTreeList;
    ///
    /// let list: BTreeList<i32> = (0..10).collect();
    /// assert_eq!(list.enumerate_range(3..6).unwrap().copied().collect::<Vec<_>>(), [3, 4, 5]);
    /// assert!(list.enumerate_range(3..11).is_err());
    /// ```
    pub fn enumerate_range(&self, range: Range<usize>) -> Result<Iter<'_, T>> {
        let len = self.len();
        check_range(&range, len)?;
        if range.is_empty() {
            let anchor = (self.tree.first_leaf(), 0);
            return Ok(Iter::new(self.tree.nodes(), anchor, anchor, 0));
        }
        let front = self.tree.leaf_at(range.start);
        let back = if range.end == len { self.tree.end() } else { self.tree.leaf_at(range.end) };
        Ok(Iter::new(self.tree.nodes(), front, back, range.len()))
    }

    /// Iterates from rank `index` to the end.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index > len()`.
    pub fn enumerate_from_index(&self, index: usize) -> Result<Iter<'_, T>> {
        self.enumerate_range(index..self.len())
    }

    /// Iterates from rank `index` down to the first element.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::BTreeList;
    ///
    /// let list = BTreeList::from([1, 2, 3, 4]);
    /// let down: Vec<_> = list.enumerate_backwards_from_index(2).unwrap().copied().collect();
    /// assert_eq!(down, [3, 2, 1]);
    /// ```
    pub fn enumerate_backwards_from_index(&self, index: usize) -> Result<Rev<Iter<'_, T>>> {
        let len = self.len();
        if index >= len {
            return Err(Error::IndexOutOfRange {
                index,
                len,
            });
        }
        Ok(self.enumerate_range(0..index + 1)?.rev())
    }
}

impl<T: Clone, C: Compare<T>> BTreeList<T, C> {
    /// Allows or forbids duplicate elements from now on.
    ///
    /// Enabling always succeeds. Disabling scans the list once.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] when forbidding duplicates while two
    /// elements in the list compare equal; the setting is left unchanged.
    pub fn set_allows_duplicates(&mut self, allows_duplicates: bool) -> Result<()> {
        if !allows_duplicates && self.allows_duplicates && self.tree.has_adjacent_duplicates() {
            debug_log!("rejected disabling duplicates");
            return Err(Error::InvalidOperation("collection contains duplicates"));
        }
        self.allows_duplicates = allows_duplicates;
        Ok(())
    }

    /// Returns `Ok(rank)` of `value` if present, else `Err(rank)` where it would be inserted.
    ///
    /// With duplicates allowed, the rank of the earliest equal element is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::{BTreeList, BTreeListConfig};
    ///
    /// let mut list = BTreeList::with_config(BTreeListConfig::default().with_duplicates(true)).unwrap();
    /// list.extend([5, 3, 5, 5, 1]);
    /// assert_eq!(list.index_of(&5), Ok(2));
    /// assert_eq!(list.index_of(&4), Err(2));
    /// ```
    pub fn index_of(&self, value: &T) -> core::result::Result<usize, usize> {
        let bias = if self.allows_duplicates { Bias::Earliest } else { Bias::Any };
        let location = self.tree.find(value, bias);
        let rank = self.tree.root_index_of(location.leaf, location.index);
        if location.found { Ok(rank) } else { Err(rank) }
    }

    /// Returns `true` if an element equal to `value` is present.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.tree.find(value, Bias::Any).found
    }

    /// Inserts `value` at its sorted position.
    ///
    /// Returns `Ok(false)` without modifying the list if `value` is already
    /// present and duplicates are not allowed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the list is read-only.
    pub fn add(&mut self, value: T) -> Result<bool> {
        if self.read_only {
            debug_log!("rejected add on read-only list");
            return Err(READ_ONLY);
        }
        Ok(self.insert(value))
    }

    fn insert(&mut self, value: T) -> bool {
        let location = self.tree.find(&value, Bias::Any);
        if location.found && !self.allows_duplicates {
            return false;
        }
        self.tree.insert_at(value, location.leaf, location.index);
        true
    }

    /// Removes one element equal to `value`, returning whether one was found.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperation`] if the list is read-only.
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        if self.read_only {
            debug_log!("rejected remove on read-only list");
            return Err(READ_ONLY);
        }
        let location = self.tree.find(value, Bias::Any);
        if location.found {
            self.tree.remove_at(location.leaf, location.index);
        }
        Ok(location.found)
    }

    /// Iterates over every element greater than or equal to `value`, in ascending order.
    pub fn enumerate_from(&self, value: &T) -> Iter<'_, T> {
        let location = self.tree.find(value, Bias::Earliest);
        let rank = self.tree.root_index_of(location.leaf, location.index);
        Iter::new(
            self.tree.nodes(),
            (location.leaf, location.index),
            self.tree.end(),
            self.len() - rank,
        )
    }

    /// Iterates over every element less than or equal to `value`, in descending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::BTreeList;
    ///
    /// let list = BTreeList::from([10, 20, 30]);
    /// assert_eq!(list.enumerate_backwards_from(&25).copied().collect::<Vec<_>>(), [20, 10]);
    /// assert_eq!(list.enumerate_backwards_from(&5).next(), None);
    /// ```
    pub fn enumerate_backwards_from(&self, value: &T) -> Rev<Iter<'_, T>> {
        let location = self.tree.find(value, Bias::Latest);
        let end = location.index + usize::from(location.found);
        let remaining = self.tree.root_index_of(location.leaf, end);
        Iter::new(self.tree.nodes(), (self.tree.first_leaf(), 0), (location.leaf, end), remaining).rev()
    }

    /// Rank of the first element greater than `value`; `len()` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_lists::{BTreeList, BTreeListConfig};
    ///
    /// let mut list = BTreeList::with_config(BTreeListConfig::default().with_duplicates(true)).unwrap();
    /// list.extend([1, 4, 4, 4, 9]);
    /// assert_eq!(list.first_index_greater_than(&4), 4);
    /// assert_eq!(list.last_index_less_than(&4), Some(0));
    /// assert_eq!(list.last_index_less_than(&1), None);
    /// ```
    #[must_use]
    pub fn first_index_greater_than(&self, value: &T) -> usize {
        let location = self.tree.find(value, Bias::Latest);
        let rank = self.tree.root_index_of(location.leaf, location.index);
        rank + usize::from(location.found)
    }

    /// Rank of the last element less than `value`, or `None` if there is none.
    #[must_use]
    pub fn last_index_less_than(&self, value: &T) -> Option<usize> {
        let location = self.tree.find(value, Bias::Earliest);
        self.tree.root_index_of(location.leaf, location.index).checked_sub(1)
    }
}

impl<T: Clone, C: Compare<T>> SortedList<T> for BTreeList<T, C> {
    type Iter<'a>
        = Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        BTreeList::len(self)
    }

    fn allows_duplicates(&self) -> bool {
        self.allows_duplicates
    }

    fn indexing_speed(&self) -> IndexingSpeed {
        IndexingSpeed::Logarithmic
    }

    fn get(&self, index: usize) -> Option<&T> {
        BTreeList::get(self, index)
    }

    fn first(&self) -> Option<&T> {
        BTreeList::first(self)
    }

    fn last(&self) -> Option<&T> {
        BTreeList::last(self)
    }

    fn index_of(&self, value: &T) -> core::result::Result<usize, usize> {
        BTreeList::index_of(self, value)
    }

    fn contains(&self, value: &T) -> bool {
        BTreeList::contains(self, value)
    }

    fn add(&mut self, value: T) -> Result<bool> {
        BTreeList::add(self, value)
    }

    fn remove(&mut self, value: &T) -> Result<bool> {
        BTreeList::remove(self, value)
    }

    fn remove_at(&mut self, index: usize) -> Result<T> {
        BTreeList::remove_at(self, index)
    }

    fn clear(&mut self) -> Result<()> {
        BTreeList::clear(self)
    }

    fn iter(&self) -> Iter<'_, T> {
        BTreeList::iter(self)
    }

    fn enumerate_range(&self, range: Range<usize>) -> Result<Iter<'_, T>> {
        BTreeList::enumerate_range(self, range)
    }

    fn enumerate_from(&self, value: &T) -> Iter<'_, T> {
        BTreeList::enumerate_from(self, value)
    }

    fn enumerate_backwards_from(&self, value: &T) -> Rev<Iter<'_, T>> {
        BTreeList::enumerate_backwards_from(self, value)
    }

    fn first_index_greater_than(&self, value: &T) -> usize {
        BTreeList::first_index_greater_than(self, value)
    }

    fn last_index_less_than(&self, value: &T) -> Option<usize> {
        BTreeList::last_index_less_than(self, value)
    }
}

impl<T: Clone, C: Clone> Clone for BTreeList<T, C> {
    fn clone(&self) -> Self {
        BTreeList {
            tree: self.tree.clone(),
            allows_duplicates: self.allows_duplicates,
            read_only: self.read_only,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BTreeList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Ord> Default for BTreeList<T> {
    fn default() -> Self {
        BTreeList::new()
    }
}

impl<T: PartialEq, C> PartialEq for BTreeList<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for BTreeList<T, C> {}

impl<T: Ord + Clone> FromIterator<T> for BTreeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = BTreeList::new();
        list.extend(iter);
        list
    }
}

impl<T: Ord + Clone, const N: usize> From<[T; N]> for BTreeList<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T: Clone, C: Compare<T>> Extend<T> for BTreeList<T, C> {
    /// Adds every element, skipping duplicates unless they are allowed.
    ///
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

impl<'a, T, C> IntoIterator for &'a BTreeList<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
