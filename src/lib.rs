#![doc = include_str!("../README.md")]
#![allow(clippy::comparison_chain)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bits;
mod cache;
mod config;
mod display;
mod error;
mod histogram;
mod nodes;
mod pair;
mod prune;
mod stats;
mod tree;
mod value;

#[cfg(test)]
mod tests;

pub use cache::DEFAULT_CACHE_SLOTS;
pub use config::{TreeConfig, DEFAULT_MAX_NODES, DEFAULT_PRUNE_TARGET_PERCENT};
pub use display::{format_prefix, is_ipv4};
pub use error::TreeError;
pub use histogram::{HistogramEntry, TreeVisitor};
pub use pair::{un_pair, IpPairTree, PairEntry, PAIR_HALF_BYTES, PAIR_KEY_BYTES};
pub use prune::PruneCandidate;
pub use stats::{CacheStats, TreeStats};
pub use tree::{Ip4Tree, Ip6Tree, IpTree};
pub use value::Tally;
