use std::fmt::Display;

use crate::display::{format_prefix, is_ipv4};
use crate::nodes::{NodeArena, NodeId};
use crate::{bits, Tally};

/// One prefix holding a nonzero exclusive value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramEntry<V, const N: usize> {
    /// Bits past `depth` are zero.
    pub prefix: [u8; N],
    /// Prefix length in bits.
    pub depth: usize,
    /// Exclusive value of the node, never double-counting its descendants.
    pub value: V,
}

impl<V: Tally, const N: usize> HistogramEntry<V, N> {
    pub fn is_ipv4(&self) -> bool {
        is_ipv4(&self.prefix)
    }

    /// The prefix as `a.b.c.d/len` or IPv6 text.
    pub fn prefix_string(&self) -> String {
        format_prefix(&self.prefix, self.depth)
    }
}

impl<V: Tally, const N: usize> Display for HistogramEntry<V, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  count={}", self.prefix_string(), self.value)
    }
}

#[cfg(feature = "serde")]
impl<V: Tally + serde::Serialize, const N: usize> serde::Serialize for HistogramEntry<V, N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("HistogramEntry", 3)?;
        s.serialize_field("prefix", &self.prefix[..])?;
        s.serialize_field("depth", &self.depth)?;
        s.serialize_field("value", &self.value)?;
        s.end()
    }
}

/// Callback for a depth-first walk over every node of a tree.
///
/// Nodes are visited parent first, 0-branch before 1-branch.
pub trait TreeVisitor<V, const N: usize> {
    fn visit_node(&mut self, prefix: &[u8; N], depth: usize, exclusive: V, children: usize);
}

pub(crate) struct HistogramCollector<V, const N: usize> {
    pub(crate) entries: Vec<HistogramEntry<V, N>>,
}

impl<V: Tally, const N: usize> TreeVisitor<V, N> for HistogramCollector<V, N> {
    fn visit_node(&mut self, prefix: &[u8; N], depth: usize, exclusive: V, _children: usize) {
        if !exclusive.is_zero() {
            self.entries.push(HistogramEntry {
                prefix: *prefix,
                depth,
                value: exclusive,
            });
        }
    }
}

/// Walks the arena from the root, rebuilding each node's prefix on the way
/// down. Depth never exceeds the key width `N * 8`.
pub(crate) fn walk<V: Tally, const N: usize>(
    arena: &NodeArena<V>,
    visitor: &mut impl TreeVisitor<V, N>,
) {
    let max_depth = N * 8;
    let mut stack: Vec<(NodeId, usize, [u8; N])> = vec![(arena.root(), 0, [0; N])];

    while let Some((id, depth, prefix)) = stack.pop() {
        let node = arena.get(id);
        visitor.visit_node(&prefix, depth, node.exclusive_value(), node.child_count());

        if depth >= max_depth {
            continue;
        }
        if let Some(one) = node.child(true) {
            let mut p1 = prefix;
            bits::set_bit(&mut p1, depth);
            stack.push((one, depth + 1, p1));
        }
        if let Some(zero) = node.child(false) {
            stack.push((zero, depth + 1, prefix));
        }
    }
}
