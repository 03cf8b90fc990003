//! Error types for the object pool

use std::collections::TryReserveError;

use thiserror::Error;

/// Failures surfaced by capacity-hinted and source-populated rents.
///
/// The pool itself never fails to rent or take back an instance; these are
/// the container-level failures it passes through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Container cannot grow to hold {requested} elements")]
    CapacityOverflow {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("Key already present in mapping: {0}")]
    DuplicateKey(String),
}

impl PoolError {
    pub(crate) fn capacity_overflow(requested: usize, source: TryReserveError) -> Self {
        Self::CapacityOverflow { requested, source }
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
