//! Construction and initialization logic for BTreeIndex and nodes.
//!
//! This module holds the occupancy configuration, its validation, and
//! the constructors for the tree and its nodes.

use crate::compact_arena::CompactArena;
use crate::error::{InitResult, TreeError};
use crate::types::{
    BTreeIndex, Node, NodeId, BRANCH_MIN_ITEMS, LEAF_MIN_ITEMS, MAX_CHILDREN, MAX_LEAF_ITEMS, NULL_NODE,
};

/// Occupancy limits for a tree.
///
/// The defaults reproduce the classic policy of this index: leaves split
/// above 4 items, internal nodes split above 5 children, and the minimum
/// occupancy is asymmetric (1 item per leaf, 2 per internal node).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// A leaf holding more items than this is split.
    pub max_leaf_items: usize,
    /// An internal node with more children than this is split.
    pub max_children: usize,
    /// Minimum items in a non-root leaf.
    pub leaf_min_items: usize,
    /// Minimum items in a non-root internal node.
    pub branch_min_items: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_leaf_items: MAX_LEAF_ITEMS,
            max_children: MAX_CHILDREN,
            leaf_min_items: LEAF_MIN_ITEMS,
            branch_min_items: BRANCH_MIN_ITEMS,
        }
    }
}

impl TreeConfig {
    /// Check that splits and merges under these limits keep every node
    /// at or above its minimum.
    pub fn validate(&self) -> InitResult<()> {
        if self.leaf_min_items < 1 {
            return Err(TreeError::invalid_config(
                "leaf_min_items",
                "must be at least 1 so emptied leaves are reclaimed",
            ));
        }
        if self.branch_min_items < 2 {
            return Err(TreeError::invalid_config(
                "branch_min_items",
                "must be at least 2 so single-child nodes are merged",
            ));
        }
        // Splitting max + 1 entries at the midpoint leaves (max + 1) / 2 on the left.
        if (self.max_leaf_items + 1) / 2 < self.leaf_min_items {
            return Err(TreeError::invalid_config(
                "max_leaf_items",
                &format!(
                    "{} cannot be split into halves of at least {} items",
                    self.max_leaf_items + 1,
                    self.leaf_min_items
                ),
            ));
        }
        if (self.max_children + 1) / 2 < self.branch_min_items {
            return Err(TreeError::invalid_config(
                "max_children",
                &format!(
                    "{} cannot be split into halves of at least {} children",
                    self.max_children + 1,
                    self.branch_min_items
                ),
            ));
        }
        Ok(())
    }

    /// Minimum items a non-root node of the given kind must hold.
    pub fn min_items(&self, is_leaf: bool) -> usize {
        if is_leaf {
            self.leaf_min_items
        } else {
            self.branch_min_items
        }
    }
}

impl BTreeIndex {
    /// Create an empty tree with the default occupancy limits.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytetree::BTreeIndex;
    ///
    /// let index = BTreeIndex::new();
    /// assert!(index.is_empty());
    /// assert!(index.is_leaf_root());
    /// ```
    pub fn new() -> Self {
        Self::from_valid_config(TreeConfig::default())
    }

    /// Create an empty tree with custom occupancy limits.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytetree::{BTreeIndex, TreeConfig};
    ///
    /// let config = TreeConfig { max_leaf_items: 8, max_children: 9, ..TreeConfig::default() };
    /// assert!(BTreeIndex::with_config(config).is_ok());
    ///
    /// let broken = TreeConfig { branch_min_items: 1, ..TreeConfig::default() };
    /// assert!(BTreeIndex::with_config(broken).is_err());
    /// ```
    pub fn with_config(config: TreeConfig) -> InitResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: TreeConfig) -> Self {
        let mut arena = CompactArena::new();
        let root = arena.allocate(Node::new_leaf(NULL_NODE));

        Self {
            config,
            root,
            arena,
        }
    }

    /// The occupancy limits of this tree.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }
}

impl Default for BTreeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Creates an empty leaf owned by `parent`.
    pub(crate) fn new_leaf(parent: NodeId) -> Self {
        Self {
            is_leaf: true,
            parent,
            ..Self::default()
        }
    }

    /// Creates an empty internal node owned by `parent`.
    pub(crate) fn new_branch(parent: NodeId) -> Self {
        Self {
            is_leaf: false,
            parent,
            ..Self::default()
        }
    }
}
