//! Validation and debugging utilities for BTreeIndex.
//!
//! This module contains invariant checking, the checked `try_*`
//! mutations, and helpers for inspecting the tree in tests.

use crate::error::{ModifyResult, TreeError, TreeResult};
use crate::types::{BTreeIndex, NodeId, NULL_NODE};

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl BTreeIndex {
    /// Check if the tree maintains its structural invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants_detailed().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> TreeResult<()> {
        if !self.arena.contains(self.root) {
            return Err(TreeError::arena_error(
                "Root lookup",
                &format!("root {} is not allocated", self.root),
            ));
        }
        let root = &self.arena[self.root];
        if root.parent != NULL_NODE {
            return Err(TreeError::corrupted_tree(
                "Root",
                &format!("root {} has parent {}", self.root, root.parent),
            ));
        }
        if !root.is_leaf && root.children.len() < 2 {
            return Err(TreeError::corrupted_tree(
                "Root",
                &format!("internal root has {} children", root.children.len()),
            ));
        }

        let mut leaf_depth = None;
        self.check_node(self.root, None, None, 1, &mut leaf_depth)?;
        self.check_arena_tree_consistency()
    }

    /// Every allocated node must be reachable from the root, and every
    /// free slot must be accounted for.
    fn check_arena_tree_consistency(&self) -> TreeResult<()> {
        let (leaves, branches) = self.count_nodes_in_tree();
        let stats = self.arena_stats();
        let allocated = stats.allocated_count;
        if leaves + branches != allocated {
            return Err(TreeError::arena_error(
                "Arena consistency check",
                &format!(
                    "{} nodes in tree vs {} in arena",
                    leaves + branches,
                    allocated
                ),
            ));
        }
        if stats.allocated_count + stats.free_count > stats.total_capacity {
            return Err(TreeError::arena_error(
                "Arena consistency check",
                &format!(
                    "{} allocated and {} free slots exceed capacity {}",
                    stats.allocated_count, stats.free_count, stats.total_capacity
                ),
            ));
        }
        Ok(())
    }

    /// Recursively check a node and its subtree. Keys in the subtree must
    /// lie in `[min_key, max_key)`.
    fn check_node(
        &self,
        id: NodeId,
        min_key: Option<&[u8]>,
        max_key: Option<&[u8]>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> TreeResult<()> {
        let node = self.arena.get(id).ok_or_else(|| {
            TreeError::arena_error("Node lookup", &format!("node {} is not allocated", id))
        })?;
        let is_root = id == self.root;

        if let Some(pair) = node.items.windows(2).find(|pair| pair[0].key >= pair[1].key) {
            return Err(TreeError::data_integrity(
                "Item order",
                &format!("node {} has {:?} before {:?}", id, pair[0].key, pair[1].key),
            ));
        }

        if !is_root && node.items.len() < self.config.min_items(node.is_leaf) {
            return Err(TreeError::data_integrity(
                "Occupancy",
                &format!("node {} holds only {} items", id, node.items.len()),
            ));
        }

        if node.is_leaf {
            if !node.children.is_empty() {
                return Err(TreeError::corrupted_tree(
                    "Leaf",
                    &format!("leaf {} owns {} children", id, node.children.len()),
                ));
            }
            if node.items.len() > self.config.max_leaf_items {
                return Err(TreeError::data_integrity(
                    "Occupancy",
                    &format!("leaf {} holds {} items", id, node.items.len()),
                ));
            }
            if let (Some(min), Some(first)) = (min_key, node.items.first()) {
                if first.key.as_slice() < min {
                    return Err(TreeError::data_integrity(
                        "Key range",
                        &format!("leaf {} starts below its separator", id),
                    ));
                }
            }
            if let (Some(max), Some(last)) = (max_key, node.items.last()) {
                if last.key.as_slice() >= max {
                    return Err(TreeError::data_integrity(
                        "Key range",
                        &format!("leaf {} ends past the next separator", id),
                    ));
                }
            }

            return match *leaf_depth {
                None => {
                    *leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected == depth => Ok(()),
                Some(expected) => Err(TreeError::corrupted_tree(
                    "Balance",
                    &format!("leaf {} at depth {} but others at {}", id, depth, expected),
                )),
            };
        }

        if node.children.len() != node.items.len() || node.children.is_empty() {
            return Err(TreeError::corrupted_tree(
                "Branch",
                &format!(
                    "node {} has {} separators for {} children",
                    id,
                    node.items.len(),
                    node.children.len()
                ),
            ));
        }
        if node.children.len() > self.config.max_children {
            return Err(TreeError::data_integrity(
                "Occupancy",
                &format!("node {} has {} children", id, node.children.len()),
            ));
        }

        for (i, &child_id) in node.children.iter().enumerate() {
            let child = self.arena.get(child_id).ok_or_else(|| {
                TreeError::arena_error("Child lookup", &format!("child {} of {} is missing", child_id, id))
            })?;
            if child.parent != id {
                return Err(TreeError::corrupted_tree(
                    "Parent link",
                    &format!("child {} of {} points at {}", child_id, id, child.parent),
                ));
            }
            if child.key != node.items[i].key {
                return Err(TreeError::corrupted_tree(
                    "Separator",
                    &format!("child {} is registered under a different key", child_id),
                ));
            }

            let child_min = if i == 0 {
                min_key
            } else {
                Some(node.items[i].key.as_slice())
            };
            let child_max = node
                .items
                .get(i + 1)
                .map(|item| item.key.as_slice())
                .or(max_key);
            self.check_node(child_id, child_min, child_max, depth + 1, leaf_depth)?;
        }

        Ok(())
    }

    /// Alias for check_invariants_detailed (for test compatibility).
    pub fn validate(&self) -> TreeResult<()> {
        self.check_invariants_detailed()
    }

    // ============================================================================
    // CHECKED MUTATIONS
    // ============================================================================

    /// Insert with invariant validation before and after.
    pub fn try_insert(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> ModifyResult<()> {
        self.validate_for_operation("insert")?;
        self.insert(key, value);
        self.validate_for_operation("insert")
    }

    /// Delete with invariant validation before and after.
    pub fn try_delete(&mut self, key: &[u8]) -> ModifyResult<()> {
        self.validate_for_operation("delete")?;
        self.delete(key);
        self.validate_for_operation("delete")
    }

    /// Check if tree is in a valid state for operations
    pub fn validate_for_operation(&self, operation: &str) -> ModifyResult<()> {
        self.check_invariants_detailed().map_err(|e| {
            TreeError::data_integrity(operation, &format!("Validation for {}: {}", operation, e))
        })
    }

    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Returns all key-value pairs in leaf order (for testing/debugging).
    pub fn slice(&self) -> Vec<(&[u8], &[u8])> {
        let mut items = Vec::new();
        self.collect_items(self.root, &mut items);
        items
    }

    fn collect_items<'a>(&'a self, id: NodeId, items: &mut Vec<(&'a [u8], &'a [u8])>) {
        let node = &self.arena[id];
        if node.is_leaf {
            items.extend(
                node.items
                    .iter()
                    .map(|item| (item.key.as_slice(), item.value.as_slice())),
            );
        } else {
            for &child in &node.children {
                self.collect_items(child, items);
            }
        }
    }

    /// Returns the sizes of all leaf nodes (for testing/debugging).
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        self.collect_leaf_sizes(self.root, &mut sizes);
        sizes
    }

    fn collect_leaf_sizes(&self, id: NodeId, sizes: &mut Vec<usize>) {
        let node = &self.arena[id];
        if node.is_leaf {
            sizes.push(node.items.len());
        } else {
            for &child in &node.children {
                self.collect_leaf_sizes(child, sizes);
            }
        }
    }

    /// Render the tree one node per line, children indented below parents.
    pub fn format_tree(&self) -> String {
        let mut out = String::new();
        self.format_node(self.root, 0, &mut out);
        out
    }

    fn format_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let node = &self.arena[id];
        let keys: Vec<String> = node
            .items
            .iter()
            .map(|item| String::from_utf8_lossy(&item.key).into_owned())
            .collect();

        if node.is_leaf {
            out.push_str(&format!("{}Leaf[id={}]: {:?}\n", indent, id, keys));
        } else {
            out.push_str(&format!(
                "{}Branch[id={}]: {:?}, {} children\n",
                indent,
                id,
                keys,
                node.children.len()
            ));
            for &child in &node.children {
                self.format_node(child, depth + 1, out);
            }
        }
    }
}
