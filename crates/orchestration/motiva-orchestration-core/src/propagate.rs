//! Propagation walking: find the descendants an ancestor's label intent
//! reaches, skipping transparent wrappers without letting them consume a
//! stagger slot or disturb document order.

use crate::ids::NodeId;

/// Minimal tree view the walker needs. The engine implements this over its
/// node store; tests can implement it over fixtures.
pub trait TreeView {
    /// Rendered children in document order.
    fn children(&self, node: NodeId) -> &[NodeId];
    /// Whether the node declares an animation intent of its own (explicit
    /// target or variant labels). Such nodes are opaque boundaries.
    fn has_own_intent(&self, node: NodeId) -> bool;
    /// Whether the node holds state propagation should land on: an own
    /// variant table or owned value channels.
    fn owns_state(&self, node: NodeId) -> bool;
}

/// A node is transparent iff it declares no intent and owns no state; its
/// children stay part of the parent's flattened sequence in order.
pub fn is_transparent<T: TreeView + ?Sized>(tree: &T, node: NodeId) -> bool {
    !tree.has_own_intent(node) && !tree.owns_state(node)
}

/// Collect the flattened leaf sequence under `parent`: a pre-order walk
/// that skips transparent nodes as structural entries, splicing their
/// children in place, and stops at nodes with their own intent.
pub fn flatten_leaves<T: TreeView + ?Sized>(tree: &T, parent: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    flatten_into(tree, parent, &mut leaves);
    leaves
}

fn flatten_into<T: TreeView + ?Sized>(tree: &T, parent: NodeId, out: &mut Vec<NodeId>) {
    for &child in tree.children(parent) {
        if tree.has_own_intent(child) {
            // The child's own intent wins; propagation stops for this branch.
            continue;
        }
        if tree.owns_state(child) {
            out.push(child);
        } else {
            flatten_into(tree, child, out);
        }
    }
}
