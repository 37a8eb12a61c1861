//! Node-level operations for BTreeIndex.
//!
//! Searching, sorted insertion and removal of items, and the child
//! bookkeeping used by split and rebalance.

use crate::types::{Item, Node, NodeId, NULL_NODE};

impl Item {
    /// Creates an item from a key and a value.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a separator item carrying only a key.
    pub(crate) fn separator(key: &[u8]) -> Self {
        Self {
            key: key.to_vec(),
            value: Vec::new(),
        }
    }

    /// The item's key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The item's value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl Node {
    // ============================================================================
    // ACCESSORS
    // ============================================================================

    /// True if the node stores data items directly.
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// True if the node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent == NULL_NODE
    }

    /// Sorted items held by this node.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Children owned by this node, in key order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, or `NULL_NODE` for the root.
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Separator key this node is registered under in its parent.
    pub fn separator_key(&self) -> &[u8] {
        &self.key
    }

    /// Returns the number of items in this node.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this node holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ============================================================================
    // SEARCH
    // ============================================================================

    /// Index of the first item whose key is not less than `key`, and
    /// whether that item matches exactly.
    pub(crate) fn lower_bound(&self, key: &[u8]) -> (usize, bool) {
        let index = self.items.partition_point(|item| item.key.as_slice() < key);
        let exact = self
            .items
            .get(index)
            .is_some_and(|item| item.key.as_slice() == key);
        (index, exact)
    }

    /// Child slot that covers `key`.
    ///
    /// An exact separator hit routes to that slot; otherwise the key
    /// belongs to the child left of the lower bound.
    pub(crate) fn route(&self, key: &[u8]) -> (usize, bool) {
        let (index, exact) = self.lower_bound(key);
        if !exact && index > 0 {
            (index - 1, false)
        } else {
            (index, exact)
        }
    }

    // ============================================================================
    // ITEM MUTATION
    // ============================================================================

    /// Insert or overwrite an item. Returns true if a new item was added.
    pub(crate) fn upsert(&mut self, key: Vec<u8>, value: Vec<u8>) -> bool {
        if self.items.is_empty() {
            self.items.push(Item { key, value });
            return true;
        }

        match self.items.binary_search_by(|item| item.key.as_slice().cmp(key.as_slice())) {
            Ok(index) => {
                self.items[index].value = value;
                false
            }
            Err(index) => {
                self.items.insert(index, Item { key, value });
                true
            }
        }
    }

    /// Remove the item with exactly `key`, if any.
    pub(crate) fn remove_item(&mut self, key: &[u8]) -> Option<Item> {
        match self.lower_bound(key) {
            (index, true) => Some(self.items.remove(index)),
            _ => None,
        }
    }

    // ============================================================================
    // CHILD BOOKKEEPING
    // ============================================================================

    /// Position of a child among this node's children, found by searching
    /// the child's separator key in this node's items.
    pub(crate) fn child_index(&self, separator: &[u8]) -> usize {
        self.lower_bound(separator).0
    }

    /// Unlink a child by identity. Returns false if it was not a child.
    pub(crate) fn remove_child(&mut self, child: NodeId) -> bool {
        match self.children.iter().position(|&id| id == child) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Register `child` under `separator` directly after slot `after`.
    pub(crate) fn register_child_after(&mut self, after: usize, separator: &[u8], child: NodeId) {
        let slot = (after + 1).min(self.children.len());
        self.children.insert(slot, child);
        self.items.insert(slot.min(self.items.len()), Item::separator(separator));
    }
}
