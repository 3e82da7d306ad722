//! Error types for matrix profile and motif computation.

use thiserror::Error;

/// Result type alias for matrix profile operations.
pub type Result<T> = std::result::Result<T, MotifError>;

/// Errors that can occur while computing a matrix profile or extracting motifs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotifError {
    /// Window length outside `[2, n/2]`.
    #[error("invalid window length {m}: must satisfy 2 <= m <= {max}")]
    InvalidWindow { m: usize, max: usize },

    /// Series too short for any comparison.
    #[error("insufficient data: need at least {needed} points, got {got}")]
    InsufficientLength { needed: usize, got: usize },

    /// The window starting at `index` has zero variance.
    ///
    /// Absorbed internally by the bounded fallback distance; never returned
    /// from the public matrix profile or motif APIs.
    #[error("window at index {index} has zero variance")]
    DegenerateWindow { index: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Matrix profile does not belong to the series it was handed with.
    #[error("matrix profile mismatch: expected {expected}, got {got}")]
    ProfileMismatch { expected: usize, got: usize },

    /// The computation observed its cancellation flag.
    #[error("computation cancelled")]
    Cancelled,
}
