use std::fmt::Display;

use crate::{
    bits,
    cache::LookupCache,
    config::TreeConfig,
    error::TreeError,
    histogram::{self, HistogramCollector, HistogramEntry, TreeVisitor},
    nodes::{NodeArena, NodeId},
    stats::{CacheStats, TreeStats},
    Tally,
};

/// A node-bounded binary trie tallying `V` per prefix of `N`-byte keys.
///
/// Every distinct key walks down to its own full-width leaf. Once the tree
/// holds `max_nodes` nodes, the next insertion first folds the least valuable,
/// most specific leaves into their parents until the tree is back under the
/// prune target, so totals are kept and only prefix precision is lost.
///
/// The tree is deliberately not `Clone`; use [`IpTree::deep_clone`] or
/// [`IpTree::rebuild_from`].
///
/// # Examples
///
/// ```
/// use iptree::Ip4Tree;
///
/// let mut tree = Ip4Tree::new(1_000);
/// tree.add(&[10, 0, 0, 1], 1);
/// tree.add(&[10, 0, 0, 1], 1);
/// tree.add(&[10, 0, 0, 2], 5);
///
/// assert_eq!(tree.total(), 7);
/// let histogram = tree.histogram();
/// assert_eq!(histogram.len(), 2);
/// assert_eq!(histogram[0].prefix_string(), "10.0.0.1");
/// assert_eq!(histogram[0].value, 2);
/// ```
pub struct IpTree<V, const N: usize> {
    pub(crate) arena: NodeArena<V>,
    pub(crate) cache: LookupCache<N>,
    pub(crate) config: TreeConfig,
    pub(crate) node_count: usize,
    pub(crate) inserted: u64,
    pub(crate) pruned: u64,
}

/// IPv4 addresses, counted in `u64`.
pub type Ip4Tree = IpTree<u64, 4>;

/// IPv6 addresses (and IPv4 addresses given as 4-byte keys), counted in `u64`.
pub type Ip6Tree = IpTree<u64, 16>;

impl<V: Tally, const N: usize> IpTree<V, N> {
    /// Creates an empty tree holding at most about `max_nodes` nodes.
    pub fn new(max_nodes: usize) -> Self {
        Self::build(TreeConfig::default().max_nodes(max_nodes))
    }

    /// Creates an empty tree from a full [`TreeConfig`].
    ///
    /// Fails with [`TreeError::InvalidConfig`] when the config does not
    /// validate.
    pub fn with_config(config: TreeConfig) -> Result<Self, TreeError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TreeConfig) -> Self {
        IpTree {
            arena: NodeArena::new(),
            cache: LookupCache::new(config.cache_slots),
            config,
            node_count: 0,
            inserted: 0,
            pruned: 0,
        }
    }

    /// Adds `value` to the node for `key`.
    ///
    /// Keys longer than `N` bytes are truncated to `N`; shorter keys tally at
    /// a shorter prefix, which lets IPv4 and IPv6 keys share one tree.
    pub fn add(&mut self, key: &[u8], value: V) {
        self.enforce_capacity(self.config.max_nodes);

        let key = &key[..key.len().min(N)];
        if let Some(id) = self.cache.lookup(key) {
            self.arena.add(id, value);
            return;
        }

        let id = self.walk_or_create(key, key.len() * 8);
        self.arena.add(id, value);
        self.cache.insert_or_replace(key, id);
    }

    /// Follows the first `depth` bits of `addr`, creating missing nodes.
    fn walk_or_create(&mut self, addr: &[u8], depth: usize) -> NodeId {
        let mut cur = self.arena.root();
        for i in 0..depth {
            let (next, created) = self.arena.child_or_insert(cur, bits::bit(addr, i));
            if created {
                self.node_count += 1;
                self.inserted += 1;
            }
            cur = next;
        }
        cur
    }

    /// Rebuilds the prefix and depth of `id` by following parent links.
    pub(crate) fn prefix_of(&self, id: NodeId) -> ([u8; N], usize) {
        let mut path = Vec::new();
        let mut cur = id;
        while let Some(parent) = self.arena.get(cur).parent {
            path.push(self.arena.get(parent).child(true) == Some(cur));
            cur = parent;
        }

        let mut prefix = [0u8; N];
        for (depth, is_one) in path.iter().rev().enumerate() {
            if *is_one {
                bits::set_bit(&mut prefix, depth);
            }
        }
        (prefix, path.len())
    }

    /// Sum of every value ever added.
    pub fn total(&self) -> V {
        self.arena.total_value(self.arena.root())
    }

    /// Live nodes, not counting the root.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The node budget; the next insertion prunes once it is reached.
    pub fn max_nodes(&self) -> usize {
        self.config.max_nodes
    }

    /// Nodes ever created by insertions, including ones pruned since.
    pub fn inserted_count(&self) -> u64 {
        self.inserted
    }

    /// Nodes ever folded into their parent.
    pub fn pruned_count(&self) -> u64 {
        self.pruned
    }

    /// The configuration the tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Every prefix holding a nonzero exclusive value. The values sum to
    /// [`IpTree::total`].
    pub fn histogram(&self) -> Vec<HistogramEntry<V, N>> {
        let mut collector = HistogramCollector {
            entries: Vec::new(),
        };
        self.visit(&mut collector);
        collector.entries
    }

    /// Runs `visitor` over every node, parent first, 0-branch first.
    pub fn visit(&self, visitor: &mut impl TreeVisitor<V, N>) {
        histogram::walk(&self.arena, visitor);
    }

    /// Lookup cache hits and misses since the tree was created.
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.cache.hits(),
            misses: self.cache.misses(),
        }
    }

    /// Snapshot of every counter, with a `Display` report.
    ///
    /// Computing the total walks the whole tree.
    ///
    /// ```
    /// use iptree::Ip4Tree;
    ///
    /// let mut tree = Ip4Tree::new(1_000);
    /// tree.add(&[10, 0, 0, 1], 1);
    /// tree.add(&[10, 0, 0, 1], 1);
    ///
    /// let stats = tree.stats();
    /// assert_eq!(stats.cache.hits, 1);
    /// assert_eq!(stats.node_count, 32);
    /// assert!(stats.to_string().starts_with("cache_hits: 1\n"));
    /// ```
    pub fn stats(&self) -> TreeStats<V> {
        TreeStats {
            node_count: self.node_count,
            max_nodes: self.config.max_nodes,
            terminal_nodes: self.arena.terminal_count(),
            inserted: self.inserted,
            pruned: self.pruned,
            total: self.total(),
            cache: self.cache_stats(),
            arena_slots: self.arena.capacity(),
        }
    }

    /// Whether any value changed since the tree was created or last
    /// [`mark_clean`](IpTree::mark_clean)ed.
    pub fn is_modified(&self) -> bool {
        self.arena.get(self.arena.root()).is_dirty()
    }

    /// Clears the modified flag on every node.
    pub fn mark_clean(&mut self) {
        self.arena.clear_dirty();
    }

    /// An independent copy with the same nodes, values and counters.
    ///
    /// The copy starts with an empty lookup cache and zeroed cache counters.
    pub fn deep_clone(&self) -> Self {
        IpTree {
            arena: self.arena.clone(),
            cache: LookupCache::new(self.config.cache_slots),
            config: self.config,
            node_count: self.node_count,
            inserted: self.inserted,
            pruned: self.pruned,
        }
    }

    /// Builds a tree holding exactly the given histogram entries.
    ///
    /// The result reports the same histogram and total as the tree the entries
    /// came from. No pruning happens while rebuilding, so the new tree may
    /// start above `config.max_nodes`; the next [`add`](IpTree::add) prunes it.
    ///
    /// # Examples
    ///
    /// ```
    /// use iptree::{Ip4Tree, TreeConfig};
    ///
    /// let mut tree = Ip4Tree::new(100);
    /// tree.add(&[192, 168, 0, 1], 3);
    /// tree.add(&[192, 168, 0, 2], 4);
    /// tree.prune_one();
    ///
    /// let copy = Ip4Tree::rebuild_from(*tree.config(), &tree.histogram()).unwrap();
    /// assert_eq!(copy.histogram(), tree.histogram());
    /// assert_eq!(copy.total(), 7);
    /// ```
    pub fn rebuild_from(
        config: TreeConfig,
        histogram: &[HistogramEntry<V, N>],
    ) -> Result<Self, TreeError> {
        let mut tree = Self::with_config(config)?;
        for entry in histogram {
            if entry.depth > N * 8 {
                return Err(TreeError::DepthOutOfRange {
                    depth: entry.depth,
                    max: N * 8,
                });
            }
            let id = tree.walk_or_create(&entry.prefix, entry.depth);
            tree.arena.add(id, entry.value);
        }
        Ok(tree)
    }
}

impl<V: Tally, const N: usize> Display for IpTree<V, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let histogram = self.histogram();
        writeln!(
            f,
            "nodes: {}  histogram size: {}",
            self.node_count,
            histogram.len()
        )?;
        for entry in histogram.iter() {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
