use super::arena::{Arena, NodeId};
use super::node::{Node, SearchResult};
use crate::compare::Compare;
use crate::tracing_helpers::{debug_log, trace_log};

/// Which end of a run of equal keys a search should resolve to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Bias {
    /// The earliest (lowest ranked) equal key.
    Earliest,
    /// Whichever equal key the binary search lands on.
    Any,
    /// The latest (highest ranked) equal key.
    Latest,
}

/// Outcome of [`RawBTree::find`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Location {
    pub(crate) leaf: NodeId,
    /// Position of the match, or of the insertion point, inside `leaf`.
    pub(crate) index: usize,
    pub(crate) found: bool,
}

/// The indexable B-tree behind `BTreeList`.
///
/// Every node carries the number of elements below it, so positional access
/// and rank computation walk one root-to-leaf path. Nodes at each depth are
/// chained left to right; the leaf chain starts at `first`, which is
/// allocated with the tree and never freed.
#[derive(Clone)]
pub(crate) struct RawBTree<T, C> {
    nodes: Arena<Node<T>>,
    root: NodeId,
    first: NodeId,
    node_capacity: usize,
    compare: C,
}

impl<T, C> RawBTree<T, C> {
    /// Creates an empty tree. `node_capacity` must exceed 2.
    pub(crate) fn new(node_capacity: usize, compare: C) -> Self {
        debug_assert!(node_capacity > 2, "node capacity must be greater than 2");
        let mut nodes = Arena::new();
        let first = nodes.alloc(Node::new_leaf(node_capacity));
        Self {
            nodes,
            root: first,
            first,
            node_capacity,
            compare,
        }
    }

    /// Number of elements in the tree.
    pub(crate) fn len(&self) -> usize {
        self.nodes.get(self.root).total()
    }

    pub(crate) fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<T>> {
        &self.nodes
    }

    /// The anchor leaf at the head of the leaf chain.
    pub(crate) fn first_leaf(&self) -> NodeId {
        self.first
    }

    /// Drops every element and node except the anchor leaf, which becomes the root again.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear_except(self.first);
        self.nodes.get_mut(self.first).reset();
        self.root = self.first;
        debug_log!("cleared tree");
    }

    /// Locates the leaf holding the element of rank `position`, and the position inside it.
    ///
    /// `position` must be less than [`len`](Self::len).
    pub(crate) fn leaf_at(&self, mut position: usize) -> (NodeId, usize) {
        debug_assert!(position < self.len(), "leaf_at: rank {position} outside tree of {}", self.len());
        let mut current = self.root;
        while let Some(children) = self.nodes.get(current).children() {
            let mut index = 0;
            while index + 1 < children.len() {
                let size = self.nodes.get(children[index]).total();
                if position < size {
                    break;
                }
                position -= size;
                index += 1;
            }
            current = children[index];
        }
        (current, position)
    }

    /// Converts a position inside `leaf` to a rank by summing the sizes of everything to its left.
    pub(crate) fn root_index_of(&self, leaf: NodeId, index: usize) -> usize {
        let mut rank = index;
        let mut current = leaf;
        while let Some(parent) = self.nodes.get(current).parent() {
            let siblings = self.nodes.get(parent).children().expect("parent is internal");
            for &sibling in siblings.iter().take_while(|&&sibling| sibling != current) {
                rank += self.nodes.get(sibling).total();
            }
            current = parent;
        }
        rank
    }

    /// The last leaf and its key count, i.e. the position just past the last element.
    pub(crate) fn end(&self) -> (NodeId, usize) {
        let mut current = self.root;
        while let Some(children) = self.nodes.get(current).children() {
            current = *children.last().expect("internal node has children");
        }
        (current, self.nodes.get(current).key_count())
    }

    /// Returns the element of rank `position`, if any.
    pub(crate) fn get(&self, position: usize) -> Option<&T> {
        if position >= self.len() {
            return None;
        }
        let (leaf, index) = self.leaf_at(position);
        Some(self.nodes.get(leaf).key(index))
    }

    /// Returns the first element, read straight off the anchor leaf.
    pub(crate) fn first(&self) -> Option<&T> {
        self.nodes.get(self.first).keys().first()
    }

    /// Returns the last element.
    pub(crate) fn last(&self) -> Option<&T> {
        let (leaf, _) = self.end();
        self.nodes.get(leaf).keys().last()
    }

    /// Bumps the totals of `id` and all its ancestors by one, up or down.
    fn add_to_totals(&mut self, id: NodeId, increment: bool) {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.nodes.get_mut(current);
            let total = if increment { node.total() + 1 } else { node.total() - 1 };
            node.set_total(total);
            cursor = node.parent();
        }
    }

    /// Collapses internal roots with a single child until the root has siblings below it.
    fn collapse_root(&mut self) {
        loop {
            let root = self.nodes.get(self.root);
            if root.is_leaf() || root.key_count() != 1 {
                return;
            }
            let child = root.child(0);
            let old_root = self.root;
            self.nodes.get_mut(child).set_parent(None);
            self.nodes.free(old_root);
            self.root = child;
            debug_log!(root = ?child, "collapsed root");
        }
    }
}

impl<T: Clone, C: Compare<T>> RawBTree<T, C> {
    /// Finds `key`, descending from the root.
    ///
    /// On a miss, `index` is the insertion point in the returned leaf, so
    /// [`root_index_of`](Self::root_index_of) of the result is the number of
    /// elements strictly less than `key`. On a hit, `bias` picks the end of
    /// the run of equal keys; runs may cross node boundaries.
    pub(crate) fn find(&self, key: &T, bias: Bias) -> Location {
        let mut current = self.root;
        let mut search = self.nodes.get(current).search(key, &self.compare);
        while self.nodes.get(current).is_internal() {
            let index = match search {
                SearchResult::Found(index) => {
                    let (node, index) = self.move_to_duplicates_boundary(key, bias, current, index);
                    current = node;
                    index
                }
                // Descend into the child whose pivot is the greatest one below `key`.
                SearchResult::NotFound(index) => index.saturating_sub(1),
            };
            current = self.nodes.get(current).child(index);
            search = self.nodes.get(current).search(key, &self.compare);
        }

        match search {
            SearchResult::Found(index) => {
                let (leaf, index) = self.move_to_duplicates_boundary(key, bias, current, index);
                Location {
                    leaf,
                    index,
                    found: true,
                }
            }
            SearchResult::NotFound(index) => Location {
                leaf: current,
                index,
                found: false,
            },
        }
    }

    /// Walks from a matching key to the requested end of its run of duplicates,
    /// following sibling links when the run continues in a neighbouring node.
    fn move_to_duplicates_boundary(&self, key: &T, bias: Bias, mut node: NodeId, mut index: usize) -> (NodeId, usize) {
        match bias {
            Bias::Any => {}
            Bias::Earliest => loop {
                let current = self.nodes.get(node);
                while index > 0 && current.key_equals(index - 1, key, &self.compare) {
                    index -= 1;
                }
                if index > 0 {
                    break;
                }
                let Some(prev) = current.prev() else {
                    break;
                };
                let prev_node = self.nodes.get(prev);
                match prev_node.key_count().checked_sub(1) {
                    Some(last) if prev_node.key_equals(last, key, &self.compare) => {
                        node = prev;
                        index = last;
                    }
                    _ => break,
                }
            },
            Bias::Latest => loop {
                let current = self.nodes.get(node);
                while index + 1 < current.key_count() && current.key_equals(index + 1, key, &self.compare) {
                    index += 1;
                }
                if index + 1 < current.key_count() {
                    break;
                }
                let Some(next) = current.next() else {
                    break;
                };
                let next_node = self.nodes.get(next);
                if next_node.key_count() > 0 && next_node.key_equals(0, key, &self.compare) {
                    node = next;
                    index = 0;
                } else {
                    break;
                }
            },
        }
        (node, index)
    }

    /// Inserts `key` at `index` of `leaf`, as located by [`find`](Self::find).
    pub(crate) fn insert_at(&mut self, key: T, mut leaf: NodeId, mut index: usize) {
        if self.ensure_space(leaf) {
            // The upper half of the leaf now lives in its new right sibling.
            let count = self.nodes.get(leaf).key_count();
            if index > count {
                index -= count;
                leaf = self.nodes.get(leaf).next().expect("split leaf has a right sibling");
            }
        }

        self.nodes.get_mut(leaf).insert_key(index, key);
        self.ensure_parent_key(leaf, index);
        self.add_to_totals(leaf, true);
    }

    /// Removes and returns the key at `index` of `leaf`, then rebalances.
    pub(crate) fn remove_at(&mut self, leaf: NodeId, index: usize) -> T {
        self.add_to_totals(leaf, false);
        let key = self.nodes.get_mut(leaf).remove_key(index);
        if self.nodes.get(leaf).key_count() > 0 {
            self.ensure_parent_key(leaf, index);
        }
        self.merge(leaf);
        key
    }

    /// Returns true if any two neighbouring elements compare equal.
    pub(crate) fn has_adjacent_duplicates(&self) -> bool {
        let mut previous: Option<&T> = None;
        let mut cursor = Some(self.first);
        while let Some(id) = cursor {
            let leaf = self.nodes.get(id);
            for key in leaf.keys() {
                if previous.is_some_and(|p| self.compare.compare(p, key).is_eq()) {
                    return true;
                }
                previous = Some(key);
            }
            cursor = leaf.next();
        }
        false
    }

    /// Splits `id` if it is full, making room for one more entry.
    ///
    /// Returns true if a split happened; the upper half of the entries then
    /// lives in the node's new right sibling.
    fn ensure_space(&mut self, id: NodeId) -> bool {
        if self.nodes.get(id).key_count() < self.node_capacity {
            return false;
        }

        self.ensure_parent(id);
        let parent = self.nodes.get(id).parent().expect("ensure_parent links a parent");
        self.ensure_space(parent);
        // Splitting the parent may have moved `id` under the parent's new sibling.
        let parent = self.nodes.get(id).parent().expect("ensure_parent links a parent");

        let node = self.nodes.get(id);
        let count = node.key_count();
        let half = count / 2;
        let pivot = node.key(half).clone();
        let old_next = node.next();
        let mut sibling = node.new_sibling(self.node_capacity);
        sibling.set_parent(Some(parent));
        sibling.set_prev(Some(id));
        sibling.set_next(old_next);

        let sibling_id = self.nodes.alloc(sibling);
        if let Some(old_next) = old_next {
            self.nodes.get_mut(old_next).set_prev(Some(sibling_id));
        }
        self.nodes.get_mut(id).set_next(Some(sibling_id));

        let position = self.nodes.get(parent).position_of(id);
        self.nodes.get_mut(parent).insert_child(position + 1, pivot, sibling_id);
        self.move_entries(id, half, sibling_id, 0, count - half);
        trace_log!(node = ?id, sibling = ?sibling_id, "split node");
        true
    }

    /// Gives a parentless (root) node a new root above it.
    fn ensure_parent(&mut self, id: NodeId) {
        let node = self.nodes.get(id);
        if node.parent().is_some() {
            return;
        }

        let mut parent = Node::new_internal(self.node_capacity);
        parent.push_child(node.key(0).clone(), id);
        parent.set_total(node.total());
        let parent_id = self.nodes.alloc(parent);
        self.nodes.get_mut(id).set_parent(Some(parent_id));
        self.root = parent_id;
        debug_log!(root = ?parent_id, "grew new root");
    }

    /// Moves `count` entries from `source[source_index..]` into `target` at
    /// `target_index`, fixing parent links, totals and pivots.
    ///
    /// `source` and `target` must sit at the same depth; they need not share a parent.
    fn move_entries(&mut self, source: NodeId, source_index: usize, target: NodeId, target_index: usize, count: usize) {
        let (keys, children) = self.nodes.get_mut(source).drain_entries(source_index, count);
        let moved = match &children {
            None => count,
            Some(children) => {
                let mut moved = 0;
                for &child in children {
                    let child = self.nodes.get_mut(child);
                    child.set_parent(Some(target));
                    moved += child.total();
                }
                moved
            }
        };
        self.nodes.get_mut(target).splice_entries(target_index, keys, children);
        debug_assert!(self.nodes.get(target).key_count() <= self.node_capacity, "node over capacity");

        // Both paths climb in lockstep and meet at the closest common ancestor.
        let mut source_cursor = Some(source);
        let mut target_cursor = Some(target);
        while let (Some(s), Some(t)) = (source_cursor, target_cursor) {
            if s == t {
                break;
            }
            let source_node = self.nodes.get_mut(s);
            source_node.set_total(source_node.total() - moved);
            source_cursor = source_node.parent();
            let target_node = self.nodes.get_mut(t);
            target_node.set_total(target_node.total() + moved);
            target_cursor = target_node.parent();
        }

        self.ensure_parent_key(source, source_index);
        self.ensure_parent_key(target, target_index);
    }

    /// Refreshes ancestor pivots after the key at `index` of `id` changed.
    ///
    /// Only position 0 is mirrored in the parent, and the change keeps
    /// propagating while the node is its parent's first child.
    fn ensure_parent_key(&mut self, mut id: NodeId, mut index: usize) {
        while index == 0 {
            let node = self.nodes.get(id);
            let (Some(parent), Some(first)) = (node.parent(), node.keys().first()) else {
                return;
            };
            let first = first.clone();
            index = self.nodes.get(parent).position_of(id);
            self.nodes.get_mut(parent).set_key(index, first);
            id = parent;
        }
    }

    /// Restores the fill invariant of `id` after entries were taken from it.
    ///
    /// An empty node with a left neighbour is unlinked; otherwise an underfull
    /// node pulls entries from its right neighbour, or folds into its left
    /// neighbour when it is the last node of its level. The anchor leaf has no
    /// left neighbour and is therefore never unlinked.
    fn merge(&mut self, id: NodeId) {
        let node = self.nodes.get(id);
        let Some(parent) = node.parent() else {
            self.collapse_root();
            return;
        };

        let count = node.key_count();
        let prev = node.prev();
        let next = node.next();
        if count == 0 {
            if let Some(prev) = prev {
                self.unlink(id, parent, prev);
                self.merge(parent);
                return;
            }
        } else if count >= self.node_capacity / 2 {
            return;
        }

        if let Some(next) = next {
            let available = self.nodes.get(next).key_count();
            let combined = count + available;
            let pulled = if combined > self.node_capacity { available - combined / 2 } else { available };
            self.move_entries(next, 0, id, count, pulled);
            trace_log!(node = ?id, from = ?next, pulled, "rebalanced from right sibling");
            self.merge(next);
        } else if let Some(prev) = prev {
            let prev_count = self.nodes.get(prev).key_count();
            if prev_count + count <= self.node_capacity {
                self.move_entries(id, 0, prev, prev_count, count);
                trace_log!(node = ?id, into = ?prev, "folded into left sibling");
                self.merge(id);
            }
        } else {
            debug_assert!(count > 0, "only node at its depth must be the root");
        }
    }

    /// Detaches an empty node from its parent and from its level's chain, then frees it.
    fn unlink(&mut self, id: NodeId, parent: NodeId, prev: NodeId) {
        debug_assert_eq!(self.nodes.get(id).total(), 0, "unlinking a non-empty node");
        let next = self.nodes.get(id).next();
        self.nodes.get_mut(prev).set_next(next);
        if let Some(next) = next {
            self.nodes.get_mut(next).set_prev(Some(prev));
        }

        let position = self.nodes.get(parent).position_of(id);
        self.nodes.get_mut(parent).remove_child(position);
        self.ensure_parent_key(parent, position);
        self.nodes.free(id);
        trace_log!(node = ?id, "unlinked empty node");
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::Natural;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<T: Clone + core::fmt::Debug, C: Compare<T>> RawBTree<T, C> {
        /// Validates the structural invariants of the tree, panicking with every violation found.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            let root = self.nodes.get(self.root);
            if root.parent().is_some() {
                errors.push("root has a parent".into());
            }
            if root.is_internal() && root.key_count() < 2 {
                errors.push(format!("internal root has {} children", root.key_count()));
            }

            let mut levels: Vec<Vec<NodeId>> = Vec::new();
            let mut live = 0;
            self.validate_node(self.root, 0, &mut levels, &mut live, &mut errors);

            if live != self.nodes.len() {
                errors.push(format!("arena holds {} nodes, tree reaches {}", self.nodes.len(), live));
            }
            if levels.last().and_then(|leaves| leaves.first()) != Some(&self.first) {
                errors.push("anchor leaf is not the first leaf".into());
            }
            for (depth, level) in levels.iter().enumerate() {
                self.validate_chain(depth, level, &mut errors);
            }

            let mut previous: Option<&T> = None;
            for id in levels.last().into_iter().flatten() {
                for key in self.nodes.get(*id).keys() {
                    if previous.is_some_and(|p| self.compare.compare(p, key).is_gt()) {
                        errors.push(format!("leaf keys out of order at {key:?}"));
                    }
                    previous = Some(key);
                }
            }

            assert!(errors.is_empty(), "tree invariants violated:\n{}", errors.join("\n"));
        }

        fn validate_node(
            &self,
            id: NodeId,
            depth: usize,
            levels: &mut Vec<Vec<NodeId>>,
            live: &mut usize,
            errors: &mut Vec<String>,
        ) -> usize {
            *live += 1;
            if levels.len() <= depth {
                levels.push(Vec::new());
            }
            levels[depth].push(id);

            let node = self.nodes.get(id);
            if node.key_count() > self.node_capacity {
                errors.push(format!("{id:?} holds {} entries, capacity {}", node.key_count(), self.node_capacity));
            }
            if id != self.root {
                if node.key_count() == 0 {
                    errors.push(format!("{id:?} is empty but not the root"));
                }
                if node.next().is_some() && node.key_count() < self.node_capacity / 2 {
                    errors.push(format!("{id:?} is below half capacity with {} entries", node.key_count()));
                }
            }

            let total = match node.children() {
                None => node.key_count(),
                Some(children) => {
                    let mut total = 0;
                    for (i, &child) in children.iter().enumerate() {
                        let child_node = self.nodes.get(child);
                        if child_node.parent() != Some(id) {
                            errors.push(format!("{child:?} does not point back to parent {id:?}"));
                        }
                        match self.first_key_below(child) {
                            Some(first) if self.compare.compare(first, node.key(i)).is_eq() => {}
                            first => errors.push(format!(
                                "{id:?} pivot {i} is {:?}, first key below is {first:?}",
                                node.key(i)
                            )),
                        }
                        total += self.validate_node(child, depth + 1, levels, live, errors);
                    }
                    total
                }
            };

            if node.total() != total {
                errors.push(format!("{id:?} total is {}, counted {total}", node.total()));
            }
            total
        }

        fn first_key_below(&self, mut id: NodeId) -> Option<&T> {
            while let Some(children) = self.nodes.get(id).children() {
                id = *children.first()?;
            }
            self.nodes.get(id).keys().first()
        }

        fn validate_chain(&self, depth: usize, level: &[NodeId], errors: &mut Vec<String>) {
            for (i, &id) in level.iter().enumerate() {
                let node = self.nodes.get(id);
                let expected_prev = i.checked_sub(1).map(|p| level[p]);
                let expected_next = level.get(i + 1).copied();
                if node.prev() != expected_prev {
                    errors.push(format!("depth {depth}: {id:?} prev is {:?}, expected {expected_prev:?}", node.prev()));
                }
                if node.next() != expected_next {
                    errors.push(format!("depth {depth}: {id:?} next is {:?}, expected {expected_next:?}", node.next()));
                }
            }
        }

        fn collect(&self) -> Vec<T> {
            let mut out = Vec::with_capacity(self.len());
            let mut cursor = Some(self.first);
            while let Some(id) = cursor {
                out.extend(self.nodes.get(id).keys().iter().cloned());
                cursor = self.nodes.get(id).next();
            }
            out
        }
    }

    fn tree(capacity: usize) -> RawBTree<i32, Natural> {
        RawBTree::new(capacity, Natural)
    }

    fn insert(tree: &mut RawBTree<i32, Natural>, key: i32) {
        let location = tree.find(&key, Bias::Any);
        tree.insert_at(key, location.leaf, location.index);
    }

    fn remove(tree: &mut RawBTree<i32, Natural>, key: i32) -> bool {
        let location = tree.find(&key, Bias::Any);
        if location.found {
            tree.remove_at(location.leaf, location.index);
        }
        location.found
    }

    fn rank(tree: &RawBTree<i32, Natural>, key: i32, bias: Bias) -> (bool, usize) {
        let location = tree.find(&key, bias);
        (location.found, tree.root_index_of(location.leaf, location.index))
    }

    #[test]
    fn ascending_inserts_split_and_stay_balanced() {
        let mut t = tree(4);
        for key in 0..200 {
            insert(&mut t, key);
            t.validate_invariants();
        }
        assert_eq!(t.len(), 200);
        assert_eq!(t.collect(), (0..200).collect::<Vec<_>>());
        for position in 0..200 {
            let (leaf, index) = t.leaf_at(position);
            assert_eq!(*t.nodes.get(leaf).key(index), i32::try_from(position).unwrap());
            assert_eq!(t.root_index_of(leaf, index), position);
        }
    }

    #[test]
    fn descending_removals_collapse_back_to_the_anchor() {
        let mut t = tree(3);
        let anchor = t.first_leaf();
        for key in (0..100).rev() {
            insert(&mut t, key);
        }
        t.validate_invariants();

        for key in 0..100 {
            assert!(remove(&mut t, key));
            t.validate_invariants();
        }
        assert_eq!(t.len(), 0);
        assert_eq!(t.root, anchor);
        assert_eq!(t.nodes.len(), 1);
    }

    #[test]
    fn clear_keeps_only_the_anchor() {
        let mut t = tree(5);
        let anchor = t.first_leaf();
        for key in 0..500 {
            insert(&mut t, key * 7 % 500);
        }
        t.clear();
        t.validate_invariants();
        assert_eq!(t.len(), 0);
        assert_eq!(t.root, anchor);
        assert_eq!(t.first(), None);

        insert(&mut t, 3);
        assert_eq!(t.first(), Some(&3));
        assert_eq!(t.last(), Some(&3));
    }

    #[test]
    fn duplicate_runs_spanning_many_leaves_resolve_to_their_ends() {
        let mut t = tree(4);
        for key in [1, 2, 3, 9, 9] {
            insert(&mut t, key);
        }
        for _ in 0..40 {
            insert(&mut t, 5);
        }
        t.validate_invariants();

        assert_eq!(rank(&t, 5, Bias::Earliest), (true, 3));
        assert_eq!(rank(&t, 5, Bias::Latest), (true, 42));
        assert_eq!(rank(&t, 4, Bias::Earliest), (false, 3));
        assert_eq!(rank(&t, 6, Bias::Latest), (false, 43));
        assert!(t.has_adjacent_duplicates());
    }

    #[test]
    fn end_points_past_the_last_element() {
        let mut t = tree(4);
        assert_eq!(t.end(), (t.first_leaf(), 0));
        for key in 0..50 {
            insert(&mut t, key);
        }
        let (leaf, count) = t.end();
        assert_eq!(t.nodes.get(leaf).next(), None);
        assert_eq!(t.nodes.get(leaf).key(count - 1), &49);
        assert_eq!(t.root_index_of(leaf, count), 50);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        RemoveAt(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0i32..300).prop_map(Op::Insert),
            2 => (0i32..300).prop_map(Op::Remove),
            1 => any::<usize>().prop_map(Op::RemoveAt),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_under_random_operations(
            capacity in 3usize..9,
            ops in prop::collection::vec(op_strategy(), 0..400),
        ) {
            let mut t = tree(capacity);
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        insert(&mut t, key);
                        let at = model.partition_point(|&k| k < key);
                        model.insert(at, key);
                    }
                    Op::Remove(key) => {
                        let removed = remove(&mut t, key);
                        let position = model.iter().position(|&k| k == key);
                        prop_assert_eq!(removed, position.is_some());
                        if let Some(position) = position {
                            model.remove(position);
                        }
                    }
                    Op::RemoveAt(which) => {
                        if model.is_empty() {
                            continue;
                        }
                        let position = which % model.len();
                        let (leaf, index) = t.leaf_at(position);
                        prop_assert_eq!(t.remove_at(leaf, index), model.remove(position));
                    }
                }
                t.validate_invariants();
                prop_assert_eq!(t.len(), model.len());
            }

            prop_assert_eq!(t.collect(), model.clone());
            for key in 0..300 {
                let lower = model.partition_point(|&k| k < key);
                let upper = model.partition_point(|&k| k <= key);
                let found = lower < upper;
                prop_assert_eq!(rank(&t, key, Bias::Earliest), (found, lower));
                let expected_latest = if found { upper - 1 } else { lower };
                prop_assert_eq!(rank(&t, key, Bias::Latest), (found, expected_latest));
            }
        }
    }
}
