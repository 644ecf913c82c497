//! # Error Hierarchy
//!
//! Structured error types for the classification stack, built with
//! `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Each error variant carries enough diagnostic context (the rejected input,
//! the expected format) that an operator can diagnose a bad government
//! payload without re-running the load under a debugger.

use thiserror::Error;

/// Top-level error type for the ctrib stack.
#[derive(Error, Debug)]
pub enum CtribError {
    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Canonicalization failure during digest computation.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Rates and amounts must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Merchandise code does not normalize to a valid NCM/NBS digit string.
    #[error("invalid merchandise code: \"{value}\" ({reason})")]
    InvalidMerchandiseCode {
        /// The input that failed normalization.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Rule identifier is empty or whitespace-only.
    #[error("invalid rule id: must be non-empty")]
    InvalidRuleId,

    /// Annex identifier is out of range for an annex number.
    #[error("invalid annex id: {0} (expected a non-negative integer)")]
    InvalidAnnexId(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrib_error_validation_display() {
        let inner = ValidationError::InvalidRuleId;
        let err = CtribError::Validation(inner);
        assert!(format!("{err}").contains("validation error"));
    }

    #[test]
    fn ctrib_error_canonicalization_display() {
        let inner = CanonicalizationError::FloatRejected(0.6);
        let err = CtribError::Canonicalization(inner);
        assert!(format!("{err}").contains("canonicalization error"));
    }

    #[test]
    fn canonicalization_error_float_rejected() {
        let err = CanonicalizationError::FloatRejected(3.14);
        let msg = format!("{err}");
        assert!(msg.contains("float values are not permitted"));
        assert!(msg.contains("3.14"));
    }

    #[test]
    fn validation_error_invalid_merchandise_code() {
        let err = ValidationError::InvalidMerchandiseCode {
            value: "ABC".to_string(),
            reason: "no digits after normalization",
        };
        let msg = format!("{err}");
        assert!(msg.contains("ABC"));
        assert!(msg.contains("no digits"));
    }

    #[test]
    fn validation_error_invalid_annex_id() {
        let err = ValidationError::InvalidAnnexId(-3);
        assert!(format!("{err}").contains("-3"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = CtribError::from(io_err);
        assert!(format!("{err}").contains("access denied"));
    }

    #[test]
    fn all_error_types_are_debug() {
        let e1 = CtribError::Validation(ValidationError::InvalidRuleId);
        let e2 = CanonicalizationError::FloatRejected(0.0);
        let e3 = ValidationError::InvalidAnnexId(-1);
        assert!(!format!("{e1:?}").is_empty());
        assert!(!format!("{e2:?}").is_empty());
        assert!(!format!("{e3:?}").is_empty());
    }
}
