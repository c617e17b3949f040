/// A zero-based rank into the sorted order of a list.
///
/// Wrapping the position keeps `list[Rank(i)]` visibly distinct from a
/// lookup by value.
///
/// # Examples
///
/// ```
/// use sorted_lists::{BTreeList, Rank};
///
/// let list = BTreeList::from(["b", "a"]);
/// assert_eq!(list[Rank(0)], "a");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
