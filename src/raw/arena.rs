use alloc::vec::Vec;
use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawId = u16;
#[cfg(not(test))]
type RawId = u32;

/// Stable address of a node slot inside an [`Arena`].
///
/// Parent, child and sibling edges are all stored as `NodeId`s, so none of
/// them own the node they point at; the arena does.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct NodeId(NonZero<RawId>);

impl NodeId {
    pub(crate) const MAX: usize = (RawId::MAX - 1) as usize;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`NodeId::from_index()` - `index` > `NodeId::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((index + 1) as RawId) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_index())
    }
}

/// Slot storage for tree nodes with a free list for reuse.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.to_index()] = Some(element);
            id
        } else {
            assert!(
                self.slots.len() <= NodeId::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                NodeId::MAX
            );
            self.slots.push(Some(element));
            NodeId::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        self.slots[id.to_index()].as_ref().expect("`Arena::get()` - `id` is vacant!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.slots[id.to_index()].as_mut().expect("`Arena::get_mut()` - `id` is vacant!")
    }

    /// Drops the element in `id` and returns the slot to the free list.
    pub(crate) fn free(&mut self, id: NodeId) {
        let element = self.slots[id.to_index()].take().expect("`Arena::free()` - `id` is vacant!");
        self.free.push(id);
        drop(element);
    }

    /// Drops every element except the one in `keep`, which stays addressable by the same id.
    pub(crate) fn clear_except(&mut self, keep: NodeId) {
        let index = keep.to_index();
        let kept = self.slots[index].take().expect("`Arena::clear_except()` - `keep` is vacant!");
        self.slots.clear();
        self.free.clear();
        self.slots.resize_with(index + 1, || None);
        self.slots[index] = Some(kept);
        self.free.extend((0..index).rev().map(NodeId::from_index));
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // The niche keeps `Option<NodeId>` links as small as the id itself.
    assert_eq_size!(NodeId, Option<NodeId>);
    assert_eq_size!(NodeId, RawId);

    #[test]
    #[should_panic(expected = "`NodeId::from_index()` - `index` > `NodeId::MAX`!")]
    fn invalid_node_id() {
        let _ = NodeId::from_index(NodeId::MAX + 1);
    }

    #[test]
    fn clear_except_keeps_id_stable() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        let c = arena.alloc(3);

        arena.clear_except(b);
        assert_eq!(arena.len(), 1);
        assert_eq!(*arena.get(b), 2);

        // Vacated slots are handed out again before the arena grows.
        let reused: Vec<NodeId> = (0..2).map(|v| arena.alloc(v)).collect();
        assert_eq!(reused, [a, c]);
        assert_eq!(arena.len(), 3);
    }

    proptest! {
        #[test]
        fn node_id_round_trip(index in 0..=NodeId::MAX) {
            prop_assert_eq!(NodeId::from_index(index).to_index(), index);
        }

        #[test]
        fn arena_tracks_live_slots(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(NodeId, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let id = arena.alloc(value);
                        prop_assert!(model.iter().all(|&(live, _)| live != id));
                        model.push((id, value));
                    }
                    Operation::Set(which, value) => {
                        if model.is_empty() {
                            continue;
                        }
                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Free(which) => {
                        if model.is_empty() {
                            continue;
                        }
                        let index = which % model.len();
                        arena.free(model[index].0);
                        model.swap_remove(index);
                    }
                    Operation::ClearExcept(which) => {
                        if model.is_empty() {
                            continue;
                        }
                        let kept = model[which % model.len()];
                        arena.clear_except(kept.0);
                        model.clear();
                        model.push(kept);
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                for &(id, value) in &model {
                    prop_assert_eq!(*arena.get(id), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        Set(usize, u32),
        Free(usize),
        ClearExcept(usize),
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::Set(which, value)),
            8 => any::<usize>().prop_map(Operation::Free),
            1 => any::<usize>().prop_map(Operation::ClearExcept),
        ]
    }
}
