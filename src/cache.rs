use crate::nodes::NodeId;

/// Default number of cache slots.
pub const DEFAULT_CACHE_SLOTS: usize = 4;

#[derive(Clone, Copy, Debug)]
struct CacheSlot<const N: usize> {
    addr: [u8; N],
    len: usize,
    /// `None` means the slot is not in use.
    node: Option<NodeId>,
}

impl<const N: usize> CacheSlot<N> {
    const EMPTY: Self = Self {
        addr: [0; N],
        len: 0,
        node: None,
    };
}

/// Tiny round-robin cache from a raw key to the node it resolved to.
///
/// Bursts of packets from one flow hit the same few keys over and over, so a
/// handful of slots with a linear scan is enough; replacement simply overwrites
/// the slot under the cursor.
#[derive(Debug)]
pub(crate) struct LookupCache<const N: usize> {
    slots: Vec<CacheSlot<N>>,
    next: usize,
    hits: u64,
    misses: u64,
}

impl<const N: usize> LookupCache<N> {
    pub(crate) fn new(slots: usize) -> Self {
        Self {
            slots: vec![CacheSlot::EMPTY; slots],
            next: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub(crate) fn lookup(&mut self, addr: &[u8]) -> Option<NodeId> {
        let found = self
            .slots
            .iter()
            .find(|s| s.node.is_some() && s.len == addr.len() && &s.addr[..s.len] == addr)
            .and_then(|s| s.node);
        match found {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        found
    }

    pub(crate) fn insert_or_replace(&mut self, addr: &[u8], node: NodeId) {
        debug_assert!(addr.len() <= N);
        if self.slots.is_empty() {
            return;
        }
        let slot = &mut self.slots[self.next];
        slot.addr = [0; N];
        slot.addr[..addr.len()].copy_from_slice(addr);
        slot.len = addr.len();
        slot.node = Some(node);
        self.next = (self.next + 1) % self.slots.len();
    }

    /// Empties every slot that points at `node`. Must run before the node's
    /// arena slot is released, otherwise a later hit would land on whatever
    /// node reuses the slot.
    pub(crate) fn invalidate(&mut self, node: NodeId) {
        for slot in self.slots.iter_mut().filter(|s| s.node == Some(node)) {
            slot.node = None;
        }
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits
    }

    pub(crate) fn misses(&self) -> u64 {
        self.misses
    }
}
