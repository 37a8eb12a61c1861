//! INSERT operations for BTreeIndex.
//!
//! Upsert into the covering leaf, node splitting, and tree growth when
//! the root itself splits.

use tracing::{debug, trace};

use crate::types::{BTreeIndex, Descent, Item, Node, NodeId, NULL_NODE};

impl BTreeIndex {
    /// Insert a key/value pair, overwriting the value if the key exists.
    ///
    /// Never fails. A new item may overflow its leaf, which splits the
    /// leaf and, transitively, any ancestor that ends up with too many
    /// children.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytetree::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new();
    /// index.insert(b"k".as_slice(), b"v1".as_slice());
    /// index.insert(b"k".as_slice(), b"v2".as_slice());
    /// assert_eq!(index.len(), 1);
    /// assert_eq!(index.slice(), vec![(&b"k"[..], &b"v2"[..])]);
    /// ```
    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let Descent { leaf, .. } = self.descend(&key);

        if self.arena[leaf].upsert(key, value.into()) {
            self.split_if_overfull(leaf);
        }
    }

    /// Split `id` at its midpoint if it holds more entries than allowed.
    /// Leaves are measured in items, internal nodes in children.
    pub(crate) fn split_if_overfull(&mut self, id: NodeId) -> bool {
        let node = &self.arena[id];
        let (count, limit) = if node.is_leaf {
            (node.items.len(), self.config.max_leaf_items)
        } else {
            (node.children.len(), self.config.max_children)
        };

        if count > limit {
            self.split(id, count / 2);
            true
        } else {
            false
        }
    }

    /// Move everything at or past `at` into a new right sibling of `id`.
    fn split(&mut self, id: NodeId, at: usize) {
        debug_assert!(
            at > 0 && at < self.arena[id].items.len(),
            "split point {} leaves an empty half in node {}",
            at,
            id
        );
        if self.arena[id].parent == NULL_NODE {
            self.grow_root(id);
        }

        let parent = self.arena[id].parent;
        let position = self.arena[parent].child_index(&self.arena[id].key);
        self.lower_leftmost_separator(id, position);

        let node = &mut self.arena[id];
        let moved_items = node.items.split_off(at);
        let moved_children = if node.is_leaf {
            Vec::new()
        } else {
            node.children.split_off(at.min(node.children.len()))
        };
        let separator = moved_items[0].key.clone();

        let mut sibling = if node.is_leaf {
            Node::new_leaf(parent)
        } else {
            Node::new_branch(parent)
        };
        sibling.key = separator.clone();
        sibling.items = moved_items;
        let sibling_id = self.arena.allocate(sibling);

        for &child in &moved_children {
            self.arena[child].parent = sibling_id;
        }
        self.arena[sibling_id].children = moved_children;
        self.arena[parent].register_child_after(position, &separator, sibling_id);

        trace!(
            node = id,
            sibling = sibling_id,
            parent,
            at,
            "split node"
        );

        self.split_if_overfull(parent);
    }

    /// The leftmost child accepts keys below its separator. Before a split
    /// registers a sibling after it, pull that separator down to the
    /// node's first key so the parent's separators stay ordered.
    fn lower_leftmost_separator(&mut self, id: NodeId, position: usize) {
        let node = &self.arena[id];
        let Some(first) = node.items.first() else {
            return;
        };
        if first.key >= node.key {
            return;
        }

        let lowered = first.key.clone();
        let parent = node.parent;
        if let Some(entry) = self.arena[parent].items.get_mut(position) {
            entry.key = lowered.clone();
        }
        self.arena[id].key = lowered;
    }

    /// Put a new internal root above `id`, registering `id` under its
    /// first key.
    fn grow_root(&mut self, id: NodeId) {
        let separator = self.arena[id]
            .items
            .first()
            .map(|item| item.key.clone())
            .unwrap_or_default();

        let mut root = Node::new_branch(NULL_NODE);
        root.items.push(Item::separator(&separator));
        root.children.push(id);
        let root_id = self.arena.allocate(root);

        let node = &mut self.arena[id];
        node.parent = root_id;
        node.key = separator;
        self.root = root_id;

        debug!(root = root_id, old_root = id, "tree grew a new root");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of(tree: &BTreeIndex, id: NodeId) -> Vec<Vec<u8>> {
        tree.arena[id]
            .items
            .iter()
            .map(|item| item.key.clone())
            .collect()
    }

    #[test]
    fn test_insert_into_empty_root() {
        let mut tree = BTreeIndex::new();
        tree.insert("k", "v");
        assert_eq!(keys_of(&tree, tree.root), vec![b"k".to_vec()]);
        assert!(tree.is_leaf_root());
    }

    #[test]
    fn test_fifth_item_splits_root_leaf_at_midpoint() {
        let mut tree = BTreeIndex::new();
        for key in ["a", "b", "c", "d"] {
            tree.insert(key, key);
        }
        assert!(tree.is_leaf_root());

        tree.insert("e", "e");
        assert!(!tree.is_leaf_root());

        let root = &tree.arena[tree.root];
        assert_eq!(root.children.len(), 2);
        assert_eq!(keys_of(&tree, root.children[0]), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(
            keys_of(&tree, root.children[1]),
            vec![b"c".to_vec(), b"d".to_vec(), b"e".to_vec()]
        );
        assert_eq!(keys_of(&tree, tree.root), vec![b"a".to_vec(), b"c".to_vec()]);
        for &child in &root.children {
            assert_eq!(tree.arena[child].parent, tree.root);
        }
    }

    #[test]
    fn test_sibling_registered_directly_after_split_node() {
        let mut tree = BTreeIndex::new();
        for key in ["b", "d", "f", "h", "j"] {
            tree.insert(key, key);
        }
        // Leaves [b d] [f h j]; filling the left leaf must split it in place.
        for key in ["a", "c", "e"] {
            tree.insert(key, key);
        }
        assert!(tree.check_invariants());
        let separators = keys_of(&tree, tree.root);
        let mut sorted = separators.clone();
        sorted.sort();
        assert_eq!(separators, sorted);
    }

    #[test]
    fn test_leftmost_separator_lowered_before_split() {
        let mut tree = BTreeIndex::new();
        for key in ["m", "n", "o", "p", "q"] {
            tree.insert(key, key);
        }
        // All of these route into the leftmost leaf below separator "m".
        for key in ["a", "b", "c", "d"] {
            tree.insert(key, key);
        }
        assert_eq!(tree.arena[tree.root].items[0].key, b"a".to_vec());
        assert!(tree.check_invariants());
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn test_branch_split_when_children_exceed_limit() {
        let mut tree = BTreeIndex::new();
        for i in 0u8..40 {
            tree.insert(vec![i], vec![i]);
        }
        assert!(tree.depth() >= 3);
        assert!(tree.check_invariants());
        for &child in &tree.arena[tree.root].children {
            assert!(tree.arena[child].children.len() <= 5);
        }
    }

    #[test]
    fn test_upsert_does_not_split() {
        let mut tree = BTreeIndex::new();
        for key in ["a", "b", "c", "d"] {
            tree.insert(key, "old");
        }
        tree.insert("c", "new");
        assert!(tree.is_leaf_root());
        assert_eq!(tree.arena[tree.root].items[2].value, b"new".to_vec());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "leaves an empty half")]
    fn test_split_at_zero_is_rejected() {
        let mut tree = BTreeIndex::new();
        for key in ["a", "b", "c"] {
            tree.insert(key, key);
        }
        let root = tree.root;
        tree.split(root, 0);
    }
}
