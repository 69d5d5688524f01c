//! Reorders top-level documentation sections by registry priority terms.

use crate::tree::FileTreeNode;
use tracing::debug;

/// Reorder top-level nodes so that sections matching earlier priority terms come first.
///
/// Each node is assigned to the first term it contains (case-insensitive
/// substring of its name). Nodes sharing a term keep their original relative
/// order inside that term's slot. Unmatched nodes follow, also in original order.
/// An empty term list returns the tree unchanged.
pub fn prioritize(tree: Vec<FileTreeNode>, priority_terms: &[String]) -> Vec<FileTreeNode> {
    if priority_terms.is_empty() {
        return tree;
    }

    let terms: Vec<String> = priority_terms.iter().map(|t| t.to_lowercase()).collect();
    let mut slots: Vec<Vec<FileTreeNode>> = vec![Vec::new(); terms.len()];
    let mut remaining = Vec::new();

    for node in tree {
        let name = node.name.to_lowercase();
        match terms.iter().position(|term| name.contains(term.as_str())) {
            Some(idx) => slots[idx].push(node),
            None => remaining.push(node),
        }
    }

    let prioritized: Vec<FileTreeNode> = slots.into_iter().flatten().collect();
    debug!(
        prioritized = prioritized.len(),
        remaining = remaining.len(),
        "Applied priority ordering"
    );
    prioritized.into_iter().chain(remaining).collect()
}
