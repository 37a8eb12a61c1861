//! In-memory multi-way search tree over byte keys.
//!
//! `BTreeIndex` keeps byte-string keys in unsigned lexicographic order and
//! exposes two mutations: [`BTreeIndex::insert`] (upsert) and
//! [`BTreeIndex::delete`] (remove if present). Overflowing nodes are split
//! at their midpoint; underfull nodes are reclaimed, merged into a
//! neighbour, or, at the root, collapsed into their only child.
//!
//! Nodes live in a compact arena and refer to each other by [`NodeId`], so
//! the parent back-reference never participates in ownership.

mod compact_arena;
mod construction;
mod delete_operations;
mod error;
mod insert_operations;
mod node;
mod tree_structure;
mod types;
mod validation;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::TreeConfig;
pub use error::{InitResult, ModifyResult, TreeError, TreeResult};
pub use types::{
    BTreeIndex, Descent, Item, Node, NodeId, BRANCH_MIN_ITEMS, LEAF_MIN_ITEMS, MAX_CHILDREN,
    MAX_LEAF_ITEMS, NULL_NODE,
};
