//! Error types for set, index and trie operations.

use thiserror::Error;

/// Error variants shared by every structure in the crate.
///
/// Out-of-range access and range mismatches are programmer errors: they are
/// reported before any state is touched, so the receiver is unchanged when
/// one of these comes back.
#[derive(Debug, Error)]
pub enum Error {
    /// A bit index or domain value outside `[start, end)`.
    #[error("value {value} is out of range [{start}, {end})")]
    IndexOutOfRange { value: i64, start: i64, end: i64 },

    /// Block-wise algebra between two sets over different ranges.
    #[error(
        "sets are over different ranges: (offset {}, length {}) vs (offset {}, length {})",
        .left.0, .left.1, .right.0, .right.1
    )]
    RangeMismatch { left: (i64, usize), right: (i64, usize) },

    /// A payload was supplied for a key that already carries one.
    #[error("an item with the key {0:?} has already been added")]
    DuplicateKey(String),

    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn out_of_range(value: i64, start: i64, end: i64) -> Self {
        Error::IndexOutOfRange { value, start, end }
    }
}

/// A specialized Result type for packset operations.
pub type Result<T> = std::result::Result<T, Error>;
