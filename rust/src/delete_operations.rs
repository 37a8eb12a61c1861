//! DELETE operations for BTreeIndex.
//!
//! Removal of an item followed by rebalancing: reclaiming emptied nodes,
//! merging underfull nodes into a neighbour and collapsing a root that
//! is left with a single child.

use tracing::{debug, trace};

use crate::types::{BTreeIndex, NodeId};

impl BTreeIndex {
    /// Remove the item with `key`. A missing key is silently ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytetree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new();
    /// index.insert("a", "1");
    /// index.delete(b"a");
    /// index.delete(b"a");
    /// index.delete(b"never-inserted");
    /// assert!(index.is_empty());
    /// ```
    pub fn delete(&mut self, key: &[u8]) {
        let descent = self.descend(key);
        if !descent.exists {
            return;
        }

        if self.arena[descent.leaf].remove_item(key).is_some() {
            self.rebalance(descent.leaf);
        }
    }

    /// Restore minimum occupancy from `id` upwards.
    pub(crate) fn rebalance(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            current = self.rebalance_node(id);
        }
    }

    /// Apply the first matching rebalance rule to `id`. Returns the
    /// ancestor that must be rebalanced next, if any.
    fn rebalance_node(&mut self, id: NodeId) -> Option<NodeId> {
        let node = &self.arena[id];
        if node.items.len() >= self.config.min_items(node.is_leaf) {
            return None;
        }

        if node.is_root() {
            if !node.is_leaf && node.children.len() == 1 {
                self.collapse_root();
            }
            return None;
        }

        let parent = node.parent;
        if node.items.is_empty() {
            self.remove_emptied(id);
        } else {
            self.merge_with_sibling(id);
        }
        Some(parent)
    }

    /// Unregister an empty node from its parent and free it.
    fn remove_emptied(&mut self, id: NodeId) {
        let Some(node) = self.arena.deallocate(id) else {
            return;
        };

        let parent = &mut self.arena[node.parent];
        parent.remove_item(&node.key);
        parent.remove_child(id);

        trace!(node = id, parent = node.parent, "removed emptied node");
    }

    /// Fold `id` together with an adjacent sibling. The first child
    /// absorbs its right neighbour; any other child is absorbed by its
    /// left neighbour.
    fn merge_with_sibling(&mut self, id: NodeId) {
        let Some(position) = self.position_in_parent(id) else {
            return;
        };

        let pair = if position == 0 {
            self.next_sibling(id).map(|right| (id, right))
        } else {
            self.prev_sibling(id).map(|left| (left, id))
        };
        let Some((survivor, absorbed)) = pair else {
            return;
        };

        self.absorb(survivor, absorbed);
        self.split_if_overfull(survivor);
    }

    /// Append `absorbed`'s children and items to `survivor` and unlink
    /// `absorbed` from the shared parent. `absorbed` must be the right
    /// neighbour of `survivor`, whichever of the two was underfull.
    fn absorb(&mut self, survivor: NodeId, absorbed: NodeId) {
        let Some(mut right) = self.arena.deallocate(absorbed) else {
            return;
        };

        for &child in &right.children {
            self.arena[child].parent = survivor;
        }

        // The first child of `absorbed` may hold keys below its own
        // separator. Once it sits at a non-zero index it must be
        // registered under the key that routed into `absorbed`.
        if let Some(&first_child) = right.children.first() {
            self.arena[first_child].key = right.key.clone();
            if let Some(first) = right.items.first_mut() {
                first.key = right.key.clone();
            }
        }

        let left = &mut self.arena[survivor];
        left.children.append(&mut right.children);
        left.items.append(&mut right.items);

        let parent = &mut self.arena[right.parent];
        parent.remove_item(&right.key);
        parent.remove_child(absorbed);

        trace!(
            survivor,
            absorbed,
            parent = right.parent,
            "merged sibling nodes"
        );
    }

    /// The root absorbs its only child: leaf status, items and children.
    fn collapse_root(&mut self) {
        let root = self.root;
        let Some(&only_child) = self.arena[root].children.first() else {
            return;
        };
        let Some(child) = self.arena.deallocate(only_child) else {
            return;
        };

        for &grandchild in &child.children {
            self.arena[grandchild].parent = root;
        }

        let node = &mut self.arena[root];
        node.is_leaf = child.is_leaf;
        node.items = child.items;
        node.children = child.children;

        debug!(root, absorbed = only_child, "collapsed root into its only child");
    }
}
