use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Arena, Node, NodeId};

/// An iterator over a run of consecutive ranks of a [`BTreeList`](crate::BTreeList).
///
/// Created by [`BTreeList::iter`](crate::BTreeList::iter) and the other
/// `enumerate_*` methods. Both ends walk the linked leaves, so each step is
/// O(1) amortized and the tree is never re-descended. The iterator borrows
/// the list, which therefore cannot change while it is alive.
///
/// # Examples
///
/// ```
/// use sorted_lists::BTreeList;
///
/// let list = BTreeList::from([3, 1, 2]);
/// let mut iter = list.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.len(), 1);
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    nodes: &'a Arena<Node<T>>,
    // Leaf and position of the next element from the front.
    front: (NodeId, usize),
    // Leaf and position one past the next element from the back.
    back: (NodeId, usize),
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a Arena<Node<T>>, front: (NodeId, usize), back: (NodeId, usize), remaining: usize) -> Self {
        Iter {
            nodes,
            front,
            back,
            remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let (leaf, index) = self.front;
            let node = self.nodes.get(leaf);
            if index < node.key_count() {
                self.front.1 += 1;
                self.remaining -= 1;
                return Some(node.key(index));
            }
            self.front = (node.next()?, 0);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        loop {
            let (leaf, end) = self.back;
            if end > 0 {
                self.back.1 -= 1;
                self.remaining -= 1;
                return Some(self.nodes.get(leaf).key(end - 1));
            }
            let prev = self.nodes.get(leaf).prev()?;
            self.back = (prev, self.nodes.get(prev).key_count());
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
