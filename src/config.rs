use crate::cache::DEFAULT_CACHE_SLOTS;
use crate::error::TreeError;

/// Node budget used when the host does not configure one.
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// After hitting the node budget, prune down to this share of it.
pub const DEFAULT_PRUNE_TARGET_PERCENT: u8 = 90;

/// Construction parameters for an [`IpTree`](crate::IpTree).
///
/// # Examples
///
/// ```
/// use iptree::{Ip4Tree, TreeConfig};
///
/// let config = TreeConfig::default()
///     .max_nodes(10_000)
///     .cache_slots(8)
///     .prune_target_percent(75);
/// let tree = Ip4Tree::with_config(config).unwrap();
/// assert_eq!(tree.max_nodes(), 10_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
    pub max_nodes: usize,
    /// Zero disables the lookup cache.
    pub cache_slots: usize,
    pub prune_target_percent: u8,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            cache_slots: DEFAULT_CACHE_SLOTS,
            prune_target_percent: DEFAULT_PRUNE_TARGET_PERCENT,
        }
    }
}

impl TreeConfig {
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn cache_slots(mut self, cache_slots: usize) -> Self {
        self.cache_slots = cache_slots;
        self
    }

    pub fn prune_target_percent(mut self, percent: u8) -> Self {
        self.prune_target_percent = percent;
        self
    }

    /// Hosts pass the node budget as a signed setting; anything not positive
    /// falls back to [`DEFAULT_MAX_NODES`].
    pub fn from_max_nodes_setting(setting: i64) -> Self {
        let max_nodes = if setting <= 0 {
            DEFAULT_MAX_NODES
        } else {
            usize::try_from(setting).unwrap_or(usize::MAX)
        };
        Self::default().max_nodes(max_nodes)
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        if self.prune_target_percent == 0 || self.prune_target_percent > 100 {
            return Err(TreeError::InvalidConfig(
                "prune_target_percent must be within 1..=100",
            ));
        }
        Ok(())
    }

    /// Node count that capacity enforcement prunes down to.
    pub(crate) fn prune_target(&self, limit: usize) -> usize {
        limit.saturating_mul(self.prune_target_percent as usize) / 100
    }
}
