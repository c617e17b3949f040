//! Rank-indexed sorted collections for Rust.
//!
//! This crate provides sorted lists that can be addressed both by value and
//! by rank (zero-based position in sorted order), behind one trait,
//! [`SortedList`]:
//!
//! - [`BTreeList`] - an indexable B-tree: O(log n) insertion, removal,
//!   lookup and positional access, with O(1) amortized iteration over linked
//!   leaves
//! - [`SortedVec`] - a single sorted vector: O(1) positional access, O(n)
//!   insertion
//!
//! # Example
//!
//! ```
//! use sorted_lists::{BTreeList, BTreeListConfig, Rank};
//!
//! let config = BTreeListConfig::default().with_duplicates(true);
//! let mut latencies = BTreeList::with_config(config).unwrap();
//! for ms in [12, 7, 31, 7, 18] {
//!     latencies.add(ms).unwrap();
//! }
//!
//! // Rank queries (O(log n))
//! assert_eq!(latencies[Rank(2)], 12); // the median
//! assert_eq!(latencies.index_of(&7), Ok(0)); // earliest of the duplicates
//! assert_eq!(latencies.first_index_greater_than(&7), 2);
//!
//! // Value-bounded iteration
//! let slow: Vec<_> = latencies.enumerate_from(&15).copied().collect();
//! assert_eq!(slow, [18, 31]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - only requires `alloc`
//! - **Pluggable ordering** - any [`Compare`] policy, including closures
//! - **`tracing`** (optional) - emits structural events (root growth and
//!   collapse, splits, merges) through the `tracing` crate
//!
//! # Implementation
//!
//! The B-tree keeps all elements in leaves; internal nodes cache the first
//! element of each child for descent and count the elements below them, so
//! rank and position convert into each other along one root-to-leaf path.
//! Nodes live in an arena and refer to each other by index.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod tracing_helpers;

mod order_statistic;
mod raw;

pub mod btree_list;
pub mod compare;
pub mod error;
pub mod sorted_list;
pub mod sorted_vec;

pub use btree_list::{BTreeList, BTreeListConfig};
pub use compare::{Compare, Natural};
pub use error::{Error, Result};
pub use order_statistic::Rank;
pub use sorted_list::{IndexingSpeed, SortedList};
pub use sorted_vec::SortedVec;
