use alloc::vec::Vec;
use core::cmp::Ordering;

use super::arena::NodeId;
use crate::compare::Compare;

/// A B-tree node.
///
/// Leaves hold elements; internal nodes hold one pivot per child, where
/// `keys[i]` is a copy of the first element under `children[i]`. Nodes at the
/// same depth are chained through `prev`/`next` regardless of which parent
/// they hang from.
#[derive(Clone)]
pub(crate) struct Node<T> {
    keys: Vec<T>,
    // `None` for leaves.
    children: Option<Vec<NodeId>>,
    parent: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    // Number of elements stored in the leaves below this node.
    total: usize,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted.
    NotFound(usize),
}

impl<T> Node<T> {
    /// Creates an empty leaf with room for `capacity` keys.
    pub(crate) fn new_leaf(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            children: None,
            parent: None,
            prev: None,
            next: None,
            total: 0,
        }
    }

    /// Creates an empty internal node with room for `capacity` children.
    pub(crate) fn new_internal(capacity: usize) -> Self {
        Self {
            children: Some(Vec::with_capacity(capacity)),
            ..Self::new_leaf(capacity)
        }
    }

    /// Creates an empty node of the same kind as `self`.
    pub(crate) fn new_sibling(&self, capacity: usize) -> Self {
        if self.is_leaf() { Self::new_leaf(capacity) } else { Self::new_internal(capacity) }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub(crate) fn is_internal(&self) -> bool {
        self.children.is_some()
    }

    /// Number of live keys (leaf) or children (internal).
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub(crate) fn set_prev(&mut self, prev: Option<NodeId>) {
        self.prev = prev;
    }

    pub(crate) fn next(&self) -> Option<NodeId> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<NodeId>) {
        self.next = next;
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &T {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[T] {
        &self.keys
    }

    /// Child ids of an internal node, `None` for a leaf.
    pub(crate) fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> NodeId {
        self.children.as_ref().expect("expected internal node")[index]
    }

    /// Index of `child` among this node's children.
    pub(crate) fn position_of(&self, child: NodeId) -> usize {
        self.children
            .as_ref()
            .and_then(|children| children.iter().position(|&c| c == child))
            .expect("child is not linked under this parent")
    }

    /// Binary-searches the live keys. With duplicates, any matching index may be returned.
    #[inline]
    pub(crate) fn search<C: Compare<T>>(&self, key: &T, compare: &C) -> SearchResult {
        match self.keys.binary_search_by(|k| compare.compare(k, key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Returns true if the key at `index` compares equal to `key`.
    #[inline]
    pub(crate) fn key_equals<C: Compare<T>>(&self, index: usize, key: &T, compare: &C) -> bool {
        compare.compare(&self.keys[index], key) == Ordering::Equal
    }

    /// Inserts a key into a leaf at the given position.
    pub(crate) fn insert_key(&mut self, index: usize, key: T) {
        debug_assert!(self.is_leaf(), "insert_key on internal node");
        self.keys.insert(index, key);
    }

    /// Removes and returns the key at the given position of a leaf.
    pub(crate) fn remove_key(&mut self, index: usize) -> T {
        debug_assert!(self.is_leaf(), "remove_key on internal node");
        self.keys.remove(index)
    }

    /// Overwrites a pivot.
    pub(crate) fn set_key(&mut self, index: usize, key: T) {
        self.keys[index] = key;
    }

    /// Inserts a pivot and its child at the given position.
    pub(crate) fn insert_child(&mut self, index: usize, pivot: T, child: NodeId) {
        self.keys.insert(index, pivot);
        self.children.as_mut().expect("expected internal node").insert(index, child);
    }

    /// Appends a pivot and its child.
    pub(crate) fn push_child(&mut self, pivot: T, child: NodeId) {
        self.keys.push(pivot);
        self.children.as_mut().expect("expected internal node").push(child);
    }

    /// Removes a pivot and its child at the given position.
    pub(crate) fn remove_child(&mut self, index: usize) -> (T, NodeId) {
        let pivot = self.keys.remove(index);
        let child = self.children.as_mut().expect("expected internal node").remove(index);
        (pivot, child)
    }

    /// Detaches `count` entries starting at `start`; children come along for internal nodes.
    pub(crate) fn drain_entries(&mut self, start: usize, count: usize) -> (Vec<T>, Option<Vec<NodeId>>) {
        let range = start..start + count;
        let keys = self.keys.drain(range.clone()).collect();
        let children = self.children.as_mut().map(|children| children.drain(range).collect());
        (keys, children)
    }

    /// Splices entries produced by [`drain_entries`](Self::drain_entries) in at `index`.
    pub(crate) fn splice_entries(&mut self, index: usize, keys: Vec<T>, children: Option<Vec<NodeId>>) {
        self.keys.splice(index..index, keys);
        match (self.children.as_mut(), children) {
            (Some(own), Some(moved)) => {
                own.splice(index..index, moved);
            }
            (None, None) => {}
            _ => panic!("entries moved between a leaf and an internal node"),
        }
    }

    /// Resets this node to an unlinked, empty leaf.
    pub(crate) fn reset(&mut self) {
        self.keys.clear();
        self.children = None;
        self.parent = None;
        self.prev = None;
        self.next = None;
        self.total = 0;
    }
}
