//! Error types for buffer generation, configuration and validation.

use thiserror::Error;

use crate::validation::Mismatch;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the benchmark core.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter failed validation before any allocation happened.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// The allocator could not provide the raw region, or no aligned
    /// address fit inside the reserved slack.
    #[error("allocation failure: could not obtain {requested} bytes at alignment {alignment}")]
    AllocationFailure {
        /// Raw bytes requested from the allocator.
        requested: usize,
        /// Requested start alignment.
        alignment: usize,
    },

    /// Scalar and vectorized kernels disagreed. Always fatal.
    #[error("{0}")]
    CorrectnessMismatch(Box<Mismatch>),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Whether this error is a kernel correctness defect.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Error::CorrectnessMismatch(_))
    }
}
