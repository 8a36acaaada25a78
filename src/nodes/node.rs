use crate::Tally;

/// Stable index of a node inside a [`NodeArena`](super::NodeArena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn new(idx: usize) -> Self {
        Self(idx)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// One prefix of the trie.
///
/// A node owns its (up to two) children through the arena; the parent link is
/// a plain index and never keeps anything alive.
/// If `exclusive > 0` and both children are absent, the node is terminal: it
/// is either a full-width key or carries the folded history of pruned leaves.
#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: [Option<NodeId>; 2],
    exclusive: V,
    dirty: bool,
}

impl<V: Tally> Node<V> {
    pub(crate) fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            children: [None, None],
            exclusive: V::default(),
            dirty: false,
        }
    }

    #[inline]
    pub(crate) fn exclusive_value(&self) -> V {
        self.exclusive
    }

    #[inline]
    pub(crate) fn child(&self, bit: bool) -> Option<NodeId> {
        self.children[bit as usize]
    }

    #[inline]
    pub(crate) fn child_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }

    #[inline]
    pub(crate) fn has_children(&self) -> bool {
        self.children[0].is_some() || self.children[1].is_some()
    }

    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.exclusive.is_positive() && !self.has_children()
    }

    #[inline]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Only touches this node; ancestors are marked by the arena.
    #[inline]
    pub(crate) fn add_exclusive(&mut self, value: V) {
        self.exclusive += value;
    }

    #[inline]
    pub(crate) fn set_dirty_flag(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
