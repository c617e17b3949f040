mod arena;
mod btree;
mod node;

pub(crate) use arena::{Arena, NodeId};
pub(crate) use btree::{Bias, RawBTree};
pub(crate) use node::Node;
