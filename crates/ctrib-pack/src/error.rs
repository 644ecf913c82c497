//! Ingestion-specific error types.
//!
//! Structured errors for payload loading and record validation. Record-level
//! variants carry the record's position in the payload so operators can find
//! the offending row in a multi-thousand-entry government table.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum PackError {
    /// A rule record failed shape validation and was skipped.
    #[error("malformed rule record at index {index}: {detail}")]
    MalformedRule { index: usize, detail: String },

    /// An annex record failed shape validation and was skipped.
    #[error("malformed annex record at index {index}: {detail}")]
    MalformedAnnex { index: usize, detail: String },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Payload has an unexpected top-level shape.
    #[error("unexpected payload shape at {path}: {detail}")]
    UnexpectedPayloadShape { path: PathBuf, detail: String },

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic serde_json error (not file-specific).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for ingestion operations.
pub type PackResult<T> = Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_rule_display() {
        let err = PackError::MalformedRule {
            index: 4,
            detail: "missing id".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("index 4"));
        assert!(msg.contains("missing id"));
    }

    #[test]
    fn malformed_annex_display() {
        let err = PackError::MalformedAnnex {
            index: 0,
            detail: "missing merchandise code".to_string(),
        };
        assert!(format!("{err}").contains("merchandise code"));
    }

    #[test]
    fn file_not_found_display() {
        let err = PackError::FileNotFound {
            path: PathBuf::from("/tmp/missing.json"),
        };
        assert!(format!("{err}").contains("/tmp/missing.json"));
    }

    #[test]
    fn unexpected_payload_shape_display() {
        let err = PackError::UnexpectedPayloadShape {
            path: PathBuf::from("rules.json"),
            detail: "expected an array".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("rules.json"));
        assert!(msg.contains("expected an array"));
    }

    #[test]
    fn validation_display() {
        let err = PackError::Validation("empty manifest".to_string());
        assert!(format!("{err}").contains("empty manifest"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = PackError::from(io_err);
        assert!(format!("{err}").contains("access denied"));
    }

    #[test]
    fn pack_result_alias_works() {
        let ok: PackResult<u32> = Ok(7);
        assert_eq!(ok.unwrap(), 7);

        let err: PackResult<u32> = Err(PackError::Validation("bad".to_string()));
        assert!(err.is_err());
    }
}
