//! Eviction policy: picks the cheapest set of leaves and folds them upward.

use tracing::{debug, trace};

use crate::{nodes::NodeId, IpTree, Tally};

/// A node whose children would be folded into it by the next prune.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PruneCandidate<V, const N: usize> {
    /// Prefix of the node; bits past `depth` are zero.
    pub prefix: [u8; N],
    /// Prefix length in bits.
    pub depth: usize,
    /// The node's value including the children about to be folded.
    pub total: V,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Best {
    pub(crate) node: NodeId,
    pub(crate) depth: usize,
}

impl<V: Tally, const N: usize> IpTree<V, N> {
    #[inline]
    fn is_leaf(&self, id: Option<NodeId>) -> bool {
        id.map_or(true, |c| !self.arena.get(c).has_children())
    }

    /// Finds the node whose children should be folded away, searching below
    /// `id` (which sits at `depth`).
    ///
    /// - every present child is a leaf: `id` itself
    /// - one child, or one leaf and one inner child: descend into the inner one
    /// - two inner children: the better candidate of both sides, i.e. the one
    ///   with the lower total, then the deeper one, then the 1-branch
    ///
    /// Panics if `id` has no children.
    pub(crate) fn find_best_to_collapse(&self, id: NodeId, depth: usize) -> Best {
        let node = self.arena.get(id);
        assert!(
            node.has_children(),
            "find_best_to_collapse called on a childless node"
        );

        let [c0, c1] = node.children;
        match (c0, c1) {
            _ if self.is_leaf(c0) && self.is_leaf(c1) => Best { node: id, depth },
            (Some(c), None) | (None, Some(c)) => self.find_best_to_collapse(c, depth + 1),
            (Some(zero), Some(one)) => {
                if self.is_leaf(c0) {
                    return self.find_best_to_collapse(one, depth + 1);
                }
                if self.is_leaf(c1) {
                    return self.find_best_to_collapse(zero, depth + 1);
                }

                let best0 = self.find_best_to_collapse(zero, depth + 1);
                let best1 = self.find_best_to_collapse(one, depth + 1);
                let sum0 = self.arena.total_value(best0.node);
                let sum1 = self.arena.total_value(best1.node);
                if sum0 < sum1 {
                    best0
                } else if sum1 < sum0 {
                    best1
                } else if best0.depth > best1.depth {
                    best0
                } else {
                    best1
                }
            }
            (None, None) => unreachable!("childless node passed the assertion"),
        }
    }

    /// Folds every child of `id` into it, dropping them from the cache first.
    ///
    /// Panics if a child still has children of its own.
    pub(crate) fn collapse(&mut self, id: NodeId) {
        for bit in [false, true] {
            if let Some(child) = self.arena.get(id).child(bit) {
                self.cache.invalidate(child);
            }
            if let Some((child, value)) = self.arena.remove_leaf_child(id, bit) {
                self.arena.get_mut(id).add_exclusive(value);
                self.node_count -= 1;
                self.pruned += 1;
                trace!(target: "iptree::prune", ?child, ?value, "folded leaf into parent");
            }
        }
        self.arena.mark_dirty(id);
    }

    /// The node the next [`prune_one`](IpTree::prune_one) would collapse.
    pub fn prune_candidate(&self) -> Option<PruneCandidate<V, N>> {
        let root = self.arena.root();
        if !self.arena.get(root).has_children() {
            return None;
        }
        let best = self.find_best_to_collapse(root, 0);
        let (prefix, depth) = self.prefix_of(best.node);
        debug_assert_eq!(depth, best.depth);
        Some(PruneCandidate {
            prefix,
            depth,
            total: self.arena.total_value(best.node),
        })
    }

    /// Collapses one node. Returns `false` when there is nothing left to
    /// prune, i.e. the root has no children.
    pub fn prune_one(&mut self) -> bool {
        let root = self.arena.root();
        if !self.arena.get(root).has_children() {
            return false;
        }
        let best = self.find_best_to_collapse(root, 0);
        trace!(target: "iptree::prune", node = ?best.node, depth = best.depth, "collapsing");
        self.collapse(best.node);
        true
    }

    /// Once the tree holds `limit` nodes, prunes until it is down to the
    /// configured share of `limit` or nothing more can be pruned.
    pub fn enforce_capacity(&mut self, limit: usize) {
        if self.node_count < limit {
            return;
        }
        let target = self.config.prune_target(limit);
        debug!(
            target: "iptree::prune",
            node_count = self.node_count,
            limit,
            target,
            "node budget reached"
        );
        while self.node_count > target {
            if !self.prune_one() {
                debug!(
                    target: "iptree::prune",
                    node_count = self.node_count,
                    target,
                    "nothing left to prune"
                );
                break;
            }
        }
    }
}
