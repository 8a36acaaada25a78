use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Errors returned by the fallible tree operations.
///
/// Broken internal invariants are not reported here; they panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The two halves of a pair key differ in length.
    PairLengthMismatch { first: usize, second: usize },
    /// A pair key half is wider than the pair tree can interleave.
    PairKeyTooLong { len: usize, max: usize },
    /// A histogram entry claims more bits than the key width.
    DepthOutOfRange { depth: usize, max: usize },
    /// The configuration cannot be used to build a tree.
    InvalidConfig(&'static str),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::PairLengthMismatch { first, second } => write!(
                f,
                "pair keys must have equal length, got {} and {} bytes",
                first, second
            ),
            TreeError::PairKeyTooLong { len, max } => {
                write!(f, "pair key of {} bytes exceeds {} bytes", len, max)
            }
            TreeError::DepthOutOfRange { depth, max } => {
                write!(f, "prefix depth {} exceeds key width of {} bits", depth, max)
            }
            TreeError::InvalidConfig(reason) => write!(f, "invalid tree config: {}", reason),
        }
    }
}

impl Error for TreeError {}
