//! Error kinds surfaced by the core.

use thiserror::Error;

/// Failure reported by a route store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not serve the request.
    #[error("route store unavailable: {0}")]
    Unavailable(String),
    /// The record handed to `insert` failed validation.
    #[error("invalid route: {0}")]
    InvalidRecord(String),
}

/// Errors returned by proximity, recommendation and statistics queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Caller supplied malformed numeric input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Passed through from the store without interpretation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
