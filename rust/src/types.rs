//! Core types and data structures for BTreeIndex.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the tree implementation.

use crate::compact_arena::CompactArena;
use crate::construction::TreeConfig;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Maximum number of items a leaf holds before it is split.
pub const MAX_LEAF_ITEMS: usize = 4;

/// Maximum number of children an internal node holds before it is split.
pub const MAX_CHILDREN: usize = 5;

/// Minimum number of items in a non-root leaf.
pub const LEAF_MIN_ITEMS: usize = 1;

/// Minimum number of items in a non-root internal node.
pub const BRANCH_MIN_ITEMS: usize = 2;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Sentinel used for "no node", e.g. the parent of the root.
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory multi-way search tree over byte keys.
///
/// Keys and values are arbitrary byte sequences. Keys are ordered by
/// unsigned lexicographic comparison. The tree grows by splitting
/// overflowing nodes and shrinks by removing emptied nodes, merging
/// underfull ones into a neighbour and collapsing a single-child root.
///
/// # Examples
///
/// ```
/// use bytetree::BTreeIndex;
///
/// let mut index = BTreeIndex::new();
/// index.insert("apple", "red");
/// index.insert("banana", "yellow");
/// index.insert("apple", "green");
/// assert_eq!(index.len(), 2);
///
/// index.delete(b"banana");
/// index.delete(b"banana");
/// assert_eq!(index.len(), 1);
/// ```
#[derive(Debug)]
pub struct BTreeIndex {
    /// Occupancy limits in effect for this tree.
    pub(crate) config: TreeConfig,
    /// The root node of the tree.
    pub(crate) root: NodeId,
    /// Arena storage for every live node.
    pub(crate) arena: CompactArena<Node>,
}

/// A key/value pair stored in a node.
///
/// Internal nodes store one item per child whose key is that child's
/// separator; their values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub(crate) key: Vec<u8>,
    pub(crate) value: Vec<u8>,
}

/// A tree vertex. Leaves hold data items, internal nodes hold separator
/// items and own their children.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// True if the node stores data items and has no children.
    pub(crate) is_leaf: bool,
    /// Sorted items; separators for internal nodes.
    pub(crate) items: Vec<Item>,
    /// Owned children, one per separator item. Empty for leaves.
    pub(crate) children: Vec<NodeId>,
    /// Non-owning back-reference, `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
    /// Separator under which this node is registered in its parent.
    pub(crate) key: Vec<u8>,
}

/// Outcome of walking from the root towards the leaf responsible for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descent {
    /// The leaf whose range covers the key.
    pub leaf: NodeId,
    /// Whether some internal separator matched the key exactly.
    pub separator_hit: bool,
    /// Whether the leaf holds an item with the key.
    pub exists: bool,
}
