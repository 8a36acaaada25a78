use std::fmt::Display;

use crate::{
    bits,
    display::format_prefix,
    error::TreeError,
    histogram::HistogramEntry,
    stats::{CacheStats, TreeStats},
    IpTree, Tally, TreeConfig,
};

/// Width of each half of a pair key.
pub const PAIR_HALF_BYTES: usize = 16;

/// Width of the interleaved key.
pub const PAIR_KEY_BYTES: usize = PAIR_HALF_BYTES * 2;

/// One histogram entry of a pair tree, split back into its two addresses.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PairEntry<V> {
    pub first: [u8; PAIR_HALF_BYTES],
    pub first_depth: usize,
    pub second: [u8; PAIR_HALF_BYTES],
    pub second_depth: usize,
    pub value: V,
}

impl<V: Tally> Display for PairEntry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}  count={}",
            format_prefix(&self.first, self.first_depth),
            format_prefix(&self.second, self.second_depth),
            self.value
        )
    }
}

/// Splits an interleaved prefix of `depth` combined bits into the prefixes of
/// the two original keys.
///
/// The first key owns the even bits, so it gets the extra bit when `depth` is
/// odd: the depths come out as `(depth + 1) / 2` and `depth / 2`.
pub fn un_pair(
    prefix: &[u8],
    depth: usize,
) -> ([u8; PAIR_HALF_BYTES], usize, [u8; PAIR_HALF_BYTES], usize) {
    let mut first = [0u8; PAIR_HALF_BYTES];
    let mut second = [0u8; PAIR_HALF_BYTES];
    let width = (prefix.len() * 8).min(PAIR_KEY_BYTES * 8);
    bits::deinterleave(prefix, width, &mut first, &mut second);
    (first, depth / 2 + depth % 2, second, depth / 2)
}

/// Tallies pairs of addresses (e.g. flow source and destination) jointly.
///
/// Both addresses are bit-interleaved into one 32-byte key, so pruning
/// shortens both prefixes together, one bit at a time.
///
/// # Examples
///
/// ```
/// use iptree::IpPairTree;
///
/// let mut tree = IpPairTree::<u64>::new(10_000);
/// tree.add_pair(&[10, 0, 0, 1], &[10, 0, 0, 2], 1).unwrap();
/// tree.add_pair(&[10, 0, 0, 1], &[10, 0, 0, 2], 1).unwrap();
///
/// let entries = tree.pair_histogram();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].to_string(), "10.0.0.1 10.0.0.2  count=2");
/// ```
pub struct IpPairTree<V = u64> {
    inner: IpTree<V, PAIR_KEY_BYTES>,
}

impl<V: Tally> IpPairTree<V> {
    pub fn new(max_nodes: usize) -> Self {
        Self {
            inner: IpTree::new(max_nodes),
        }
    }

    pub fn with_config(config: TreeConfig) -> Result<Self, TreeError> {
        Ok(Self {
            inner: IpTree::with_config(config)?,
        })
    }

    /// Adds `value` for the pair `(first, second)`. Both keys must have the
    /// same length, at most 16 bytes.
    pub fn add_pair(&mut self, first: &[u8], second: &[u8], value: V) -> Result<(), TreeError> {
        if first.len() != second.len() {
            return Err(TreeError::PairLengthMismatch {
                first: first.len(),
                second: second.len(),
            });
        }
        if first.len() > PAIR_HALF_BYTES {
            return Err(TreeError::PairKeyTooLong {
                len: first.len(),
                max: PAIR_HALF_BYTES,
            });
        }

        let mut key = [0u8; PAIR_KEY_BYTES];
        bits::interleave(first, second, &mut key);
        self.inner.add(&key[..first.len() * 2], value);
        Ok(())
    }

    pub fn pair_histogram(&self) -> Vec<PairEntry<V>> {
        self.inner
            .histogram()
            .iter()
            .map(|e| {
                let (first, first_depth, second, second_depth) = un_pair(&e.prefix, e.depth);
                PairEntry {
                    first,
                    first_depth,
                    second,
                    second_depth,
                    value: e.value,
                }
            })
            .collect()
    }

    /// The raw interleaved histogram.
    pub fn histogram(&self) -> Vec<HistogramEntry<V, PAIR_KEY_BYTES>> {
        self.inner.histogram()
    }

    pub fn total(&self) -> V {
        self.inner.total()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache_stats()
    }

    pub fn stats(&self) -> TreeStats<V> {
        self.inner.stats()
    }

    /// The underlying single-key tree.
    pub fn as_tree(&self) -> &IpTree<V, PAIR_KEY_BYTES> {
        &self.inner
    }

    pub fn as_tree_mut(&mut self) -> &mut IpTree<V, PAIR_KEY_BYTES> {
        &mut self.inner
    }
}

impl<V: Tally> Display for IpPairTree<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.pair_histogram();
        writeln!(
            f,
            "nodes: {}  histogram size: {}",
            self.inner.node_count(),
            entries.len()
        )?;
        for entry in entries.iter() {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
