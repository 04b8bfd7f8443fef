//! Error handling and result types for the B+ tree.
//!
//! Recoverable failures (capacity exhaustion, handle-space exhaustion, an
//! out-of-range handle or index, an invalid state transition) are surfaced
//! through [`BPlusTreeError`]. Invariant violations that indicate a bug in
//! the tree itself are `assert!`/`debug_assert!`, not `Result` — see the
//! module-level docs on `crate::validation` for the distinction.

use std::fmt;

/// Error type for B+ tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BPlusTreeError {
    /// A bounded-array operation was asked to exceed its fixed capacity.
    CapacityExceeded,
    /// The node arena would need to mint the `INVALID` handle.
    HandleSpaceExhausted,
    /// A handle dereference or indexed accessor was given an index at or
    /// past the current size.
    OutOfRange,
    /// An operation's precondition on tree shape was violated (e.g.
    /// `shrink` called while the root is a leaf).
    InvalidState(&'static str),
    /// The requested key is not present in the tree.
    KeyNotFound,
    /// The requested node capacity is too small to satisfy the derived
    /// minimum fill for its kind.
    InvalidCapacity { capacity: usize, min_required: usize },
}

impl fmt::Display for BPlusTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BPlusTreeError::CapacityExceeded => write!(f, "bounded array capacity exceeded"),
            BPlusTreeError::HandleSpaceExhausted => {
                write!(f, "node arena has no more handles to mint")
            }
            BPlusTreeError::OutOfRange => write!(f, "index out of range"),
            BPlusTreeError::InvalidState(why) => write!(f, "invalid tree state: {why}"),
            BPlusTreeError::KeyNotFound => write!(f, "key not found in tree"),
            BPlusTreeError::InvalidCapacity {
                capacity,
                min_required,
            } => write!(
                f,
                "fan-out {capacity} is invalid (minimum required: {min_required})"
            ),
        }
    }
}

impl std::error::Error for BPlusTreeError {}

/// Result type used throughout the crate's public API.
pub type BTreeResult<T> = Result<T, BPlusTreeError>;

/// Result of a key lookup.
pub type KeyResult<T> = Result<T, BPlusTreeError>;

/// Result of a tree-modifying operation.
pub type ModifyResult<T> = Result<T, BPlusTreeError>;

/// Result of tree construction.
pub type InitResult<T> = Result<T, BPlusTreeError>;
