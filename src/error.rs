//! Error types for allocation operations

use thiserror::Error;

/// Result type for allocation operations
pub type AllocResult<T> = std::result::Result<T, AllocError>;

/// Allocation errors
///
/// Every fallible path in the crate reports one of these variants. Precondition
/// violations (releasing a foreign block, double release) are undefined
/// behavior by contract and are not represented here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The underlying system could not supply memory
    #[error("out of memory: requested {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Requested element count exceeds what the adapter can address
    #[error("requested {requested} elements exceeds maximum {max}")]
    ExceedsMax { requested: usize, max: usize },

    /// Invalid size-class or pool configuration
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl AllocError {
    /// Create an out of memory error
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create an element-count overflow error
    pub fn exceeds_max(requested: usize, max: usize) -> Self {
        Self::ExceedsMax { requested, max }
    }

    /// Create a configuration error
    pub fn invalid_config(reason: &'static str) -> Self {
        Self::InvalidConfig { reason }
    }
}
