use core::ops::Index;

use super::BTreeList;
use crate::Rank;

/// Indexes into the list by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use sorted_lists::{BTreeList, Rank};
///
/// let list = BTreeList::from([10, 20, 30]);
/// assert_eq!(list[Rank(1)], 20);
/// ```
impl<T, C> Index<Rank> for BTreeList<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get(rank.0).expect("index out of bounds")
    }
}
