//! Tree structure operations for BTreeIndex.
//!
//! Descent from the root to a leaf, sibling lookups used by rebalancing,
//! size queries, node counting and clearing.

use crate::compact_arena::CompactArenaStats;
use crate::types::{BTreeIndex, Descent, Node, NodeId, NULL_NODE};

// ============================================================================
// TREE NAVIGATION
// ============================================================================

impl BTreeIndex {
    /// Walk from the root to the leaf whose range covers `key`.
    ///
    /// Descent never modifies the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytetree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new();
    /// for key in ["a", "b", "c", "d", "e"] {
    ///     index.insert(key, key);
    /// }
    ///
    /// let found = index.descend(b"d");
    /// assert!(found.exists);
    /// assert!(!index.descend(b"x").exists);
    /// ```
    pub fn descend(&self, key: &[u8]) -> Descent {
        self.descend_from(self.root, key)
    }

    /// Walk from `start` to the leaf covering `key`, recording whether a
    /// separator matched exactly on the way down.
    pub(crate) fn descend_from(&self, start: NodeId, key: &[u8]) -> Descent {
        let mut current = start;
        let mut separator_hit = false;

        loop {
            let node = &self.arena[current];
            if node.is_leaf {
                let (_, exists) = node.lower_bound(key);
                return Descent {
                    leaf: current,
                    separator_hit,
                    exists,
                };
            }

            let (slot, exact) = node.route(key);
            separator_hit |= exact;
            current = node.children[slot];
        }
    }

    // ============================================================================
    // SIBLING LOOKUPS
    // ============================================================================

    /// Position of `id` among its parent's children, or `None` for the root.
    pub(crate) fn position_in_parent(&self, id: NodeId) -> Option<usize> {
        let node = &self.arena[id];
        let parent = self.arena.get(node.parent)?;
        Some(parent.child_index(&node.key))
    }

    /// The sibling directly to the right of `id`.
    pub(crate) fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let index = self.position_in_parent(id)?;
        let parent = &self.arena[self.arena[id].parent];
        parent.children.get(index + 1).copied()
    }

    /// The sibling directly to the left of `id`.
    pub(crate) fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let index = self.position_in_parent(id)?.checked_sub(1)?;
        let parent = &self.arena[self.arena[id].parent];
        parent.children.get(index).copied()
    }

    // ============================================================================
    // INSPECTION
    // ============================================================================

    /// Id of the current root node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Borrow a node by id, if it is live.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Returns the number of items stored in leaves.
    pub fn len(&self) -> usize {
        self.len_recursive(self.root)
    }

    fn len_recursive(&self, id: NodeId) -> usize {
        let node = &self.arena[id];
        if node.is_leaf {
            node.items.len()
        } else {
            node.children
                .iter()
                .map(|&child| self.len_recursive(child))
                .sum()
        }
    }

    /// Returns true if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.arena[self.root].is_leaf
    }

    /// Number of levels from the root down to the leaves.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.root;
        while let Some(&first) = self.arena[current].children.first() {
            current = first;
            depth += 1;
        }
        depth
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Count the leaf and internal nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    fn count_nodes_recursive(&self, id: NodeId) -> (usize, usize) {
        let node = &self.arena[id];
        if node.is_leaf {
            return (1, 0);
        }
        node.children
            .iter()
            .map(|&child| self.count_nodes_recursive(child))
            .fold((0, 1), |(leaves, branches), (l, b)| (leaves + l, branches + b))
    }

    /// Clear all items, leaving a single empty root leaf.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.allocate(Node::new_leaf(NULL_NODE));
    }

    // ============================================================================
    // ARENA STATISTICS
    // ============================================================================

    /// Get statistics for the node arena.
    pub fn arena_stats(&self) -> CompactArenaStats {
        self.arena.stats()
    }

    /// Get the number of free node slots in the arena.
    pub fn free_node_count(&self) -> usize {
        self.arena.free_count()
    }

    /// Get the number of allocated nodes in the arena.
    pub fn allocated_node_count(&self) -> usize {
        self.arena.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(keys: &[&str]) -> BTreeIndex {
        let mut tree = BTreeIndex::new();
        for key in keys {
            tree.insert(*key, *key);
        }
        tree
    }

    #[test]
    fn test_descend_on_root_leaf() {
        let tree = tree_with(&["b", "c"]);
        let found = tree.descend(b"b");
        assert_eq!(found.leaf, tree.root_id());
        assert!(found.exists);
        assert!(!found.separator_hit);
        assert!(!tree.descend(b"a").exists);
    }

    #[test]
    fn test_descend_routes_left_of_lower_bound() {
        // Leaves [a b] and [c d e] under separators [a c].
        let tree = tree_with(&["a", "b", "c", "d", "e"]);
        let root = tree.node(tree.root_id()).map(|node| node.children().to_vec());
        let children = root.unwrap_or_default();
        assert_eq!(children.len(), 2);

        assert_eq!(tree.descend(b"b").leaf, children[0]);
        assert_eq!(tree.descend(b"bz").leaf, children[0]);
        assert_eq!(tree.descend(b"0").leaf, children[0]);
        assert_eq!(tree.descend(b"z").leaf, children[1]);

        let exact = tree.descend(b"c");
        assert_eq!(exact.leaf, children[1]);
        assert!(exact.separator_hit);
        assert!(exact.exists);
    }

    #[test]
    fn test_sibling_lookups() {
        let tree = tree_with(&["a", "b", "c", "d", "e"]);
        let children = tree.arena[tree.root].children.clone();

        assert_eq!(tree.next_sibling(children[0]), Some(children[1]));
        assert_eq!(tree.next_sibling(children[1]), None);
        assert_eq!(tree.prev_sibling(children[1]), Some(children[0]));
        assert_eq!(tree.prev_sibling(children[0]), None);
        assert_eq!(tree.position_in_parent(tree.root), None);
    }

    #[test]
    fn test_counts_and_clear() {
        let mut tree = tree_with(&["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.count_nodes_in_tree(), (3, 1));
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.allocated_node_count(), 4);

        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.is_leaf_root());
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.allocated_node_count(), 1);
    }
}
