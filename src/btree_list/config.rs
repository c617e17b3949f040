use crate::error::{Error, Result};

/// Node capacity used by [`BTreeListConfig::default`].
pub const DEFAULT_NODE_CAPACITY: usize = 128;

/// Construction parameters for a [`BTreeList`](crate::BTreeList).
///
/// # Examples
///
/// ```
/// use sorted_lists::{BTreeList, BTreeListConfig};
///
/// let config = BTreeListConfig::default().with_node_capacity(16).with_duplicates(true);
/// let list: BTreeList<u32> = BTreeList::with_config(config).unwrap();
/// assert_eq!(list.node_capacity(), 16);
/// assert!(list.allows_duplicates());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BTreeListConfig {
    /// Maximum number of entries per node. Must be greater than 2.
    pub node_capacity: usize,
    /// Whether elements comparing equal may coexist.
    pub allows_duplicates: bool,
}

impl BTreeListConfig {
    /// The default configuration: capacity [`DEFAULT_NODE_CAPACITY`], no duplicates.
    #[must_use]
    pub const fn new() -> Self {
        BTreeListConfig {
            node_capacity: DEFAULT_NODE_CAPACITY,
            allows_duplicates: false,
        }
    }

    #[must_use]
    pub const fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    #[must_use]
    pub const fn with_duplicates(mut self, allows_duplicates: bool) -> Self {
        self.allows_duplicates = allows_duplicates;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.node_capacity <= 2 {
            return Err(Error::InvalidArgument("node capacity must be greater than 2"));
        }
        Ok(())
    }
}

impl Default for BTreeListConfig {
    fn default() -> Self {
        BTreeListConfig::new()
    }
}
