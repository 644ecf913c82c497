//! Engine error types.
//!
//! Query-time hard failures are limited to input-shape validation: a query
//! without a usable merchandise code cannot be classified. Everything else
//! a caller might treat as "failure" — no rule matched, ambiguous match,
//! unresolved annex reference — is an expected result state and lives on
//! [`MatchResult`](crate::MatchResult) or
//! [`SnapshotDiagnostics`](crate::SnapshotDiagnostics) instead.

use thiserror::Error;

use ctrib_core::CanonicalizationError;

/// Errors that can occur in the matching engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The product query failed shape validation.
    #[error("invalid query: {detail}")]
    InvalidQuery { detail: String },

    /// Snapshot fingerprinting failed during canonicalization.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
