use std::fmt::Display;

use crate::Tally;

/// Lookup cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Share of lookups served from the cache, `0.0` before the first lookup.
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}

/// Point-in-time view of a tree's bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TreeStats<V> {
    pub node_count: usize,
    pub max_nodes: usize,
    /// Childless nodes holding a value: full-width keys and folded leaves.
    pub terminal_nodes: usize,
    /// Nodes ever created by insertions.
    pub inserted: u64,
    /// Nodes folded into their parent by the pruner.
    pub pruned: u64,
    pub total: V,
    pub cache: CacheStats,
    /// Arena slots held, live or free, including the root.
    pub arena_slots: usize,
}

impl<V> TreeStats<V> {
    /// The pruner could not bring the tree back under its budget.
    pub fn over_capacity(&self) -> bool {
        self.node_count > self.max_nodes
    }
}

impl<V: Tally> Display for TreeStats<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "cache_hits: {}", self.cache.hits)?;
        writeln!(f, "cache_misses: {}", self.cache.misses)?;
        writeln!(f, "nodes: {} (max {})", self.node_count, self.max_nodes)?;
        writeln!(f, "terminal nodes: {}", self.terminal_nodes)?;
        writeln!(f, "inserted: {}", self.inserted)?;
        writeln!(f, "pruned: {}", self.pruned)?;
        if self.over_capacity() {
            writeln!(f, "total: {} (over capacity)", self.total)?;
        } else {
            writeln!(f, "total: {}", self.total)?;
        }
        Ok(())
    }
}
