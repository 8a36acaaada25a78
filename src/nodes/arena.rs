use crate::Tally;

use super::{Node, NodeId};

/// Slot storage for trie nodes.
///
/// The root always lives in slot 0. Released slots go to a free list and are
/// handed out again by [`NodeArena::alloc`], so the arena never grows beyond
/// the peak number of live nodes.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<V> {
    slots: Vec<Node<V>>,
    free: Vec<NodeId>,
}

impl<V: Tally> NodeArena<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: vec![Node::new(None)],
            free: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<V> {
        &self.slots[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.slots[id.index()]
    }

    fn alloc(&mut self, parent: NodeId) -> NodeId {
        let node = Node::new(Some(parent));
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = node;
                id
            }
            None => {
                self.slots.push(node);
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Returns the `bit` child of `id`, creating it if absent. The flag is
    /// `true` when a node was allocated.
    pub(crate) fn child_or_insert(&mut self, id: NodeId, bit: bool) -> (NodeId, bool) {
        if let Some(child) = self.get(id).child(bit) {
            return (child, false);
        }
        let child = self.alloc(id);
        self.get_mut(id).children[bit as usize] = Some(child);
        (child, true)
    }

    /// Detaches the `bit` child of `id` and frees its slot, returning the
    /// child's exclusive value. Panics if the child still has children.
    pub(crate) fn remove_leaf_child(&mut self, id: NodeId, bit: bool) -> Option<(NodeId, V)> {
        let child = self.get_mut(id).children[bit as usize].take()?;
        let node = self.get(child);
        assert!(
            !node.has_children(),
            "only childless nodes can be folded into their parent"
        );
        let value = node.exclusive_value();
        self.slots[child.index()] = Node::new(None);
        self.free.push(child);
        Some((child, value))
    }

    /// Adds `value` to the node and marks it and its ancestors dirty, stopping
    /// at the first ancestor that is already dirty.
    pub(crate) fn add(&mut self, id: NodeId, value: V) {
        self.get_mut(id).add_exclusive(value);
        self.mark_dirty(id);
    }

    pub(crate) fn mark_dirty(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let node = self.get_mut(c);
            if node.is_dirty() {
                break;
            }
            node.set_dirty_flag(true);
            cur = node.parent;
        }
    }

    pub(crate) fn clear_dirty(&mut self) {
        for node in self.slots.iter_mut() {
            node.set_dirty_flag(false);
        }
    }

    /// Exclusive value of `id` plus that of every descendant.
    pub(crate) fn total_value(&self, id: NodeId) -> V {
        let mut sum = V::default();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let node = self.get(cur);
            sum += node.exclusive_value();
            stack.extend(node.children.iter().flatten());
        }
        sum
    }

    /// Live nodes holding a value and no children. Free slots are reset, so
    /// they never count.
    pub(crate) fn terminal_count(&self) -> usize {
        self.slots.iter().filter(|n| n.is_terminal()).count()
    }

    /// Number of slots ever allocated, live or free, including the root.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}
