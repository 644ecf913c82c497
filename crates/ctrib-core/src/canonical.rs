//! # Canonical Serialization
//!
//! Defines [`CanonicalBytes`], the sole construction path for bytes used in
//! digest computation across the stack.
//!
//! The inner `Vec<u8>` is private: the only way to obtain `CanonicalBytes`
//! is [`CanonicalBytes::new()`], which applies the coercion pipeline before
//! serialization. Snapshot fingerprints are compared across independent
//! loads of the same government tables, so the byte form must not depend on
//! field order, timezone spelling, or float formatting quirks.
//!
//! ## Coercion Rules
//!
//! 1. Reject floats — rates and amounts must be strings or integers.
//! 2. Normalize RFC 3339 datetimes to UTC with `Z` suffix, seconds precision.
//! 3. Sort object keys lexicographically.
//! 4. Compact separators (no whitespace).

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by canonical JSON serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::FloatRejected`] if the value
    /// contains a float anywhere in its tree, or
    /// [`CanonicalizationError::SerializationFailed`] on serde failure.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_value(value)?;
        Ok(Self(serde_json::to_vec(&coerced)?))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively apply the coercion rules to a JSON value.
///
/// serde_json's default `Map` is backed by a BTreeMap, so rebuilding the
/// object tree here yields lexicographically sorted keys on output.
fn coerce_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                // as_f64 cannot fail for an f64-backed number
                return Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or(f64::NAN),
                ));
            }
            Ok(Value::Number(n))
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(items) => {
            let coerced: Result<Vec<_>, _> = items.into_iter().map(coerce_value).collect();
            Ok(Value::Array(coerced?))
        }
        Value::String(s) => {
            if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                let utc = dt.with_timezone(&chrono::Utc);
                Ok(Value::String(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string()))
            } else {
                Ok(Value::String(s))
            }
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_floats() {
        let err = CanonicalBytes::new(&json!({"rate": 0.6}));
        assert!(matches!(
            err,
            Err(CanonicalizationError::FloatRejected(_))
        ));
    }

    #[test]
    fn accepts_integers_and_strings() {
        let bytes = CanonicalBytes::new(&json!({"annex": 1, "code": "100630"})).unwrap();
        assert!(!bytes.as_bytes().is_empty());
    }

    #[test]
    fn output_is_compact_with_sorted_keys() {
        let bytes = CanonicalBytes::new(&json!({"b": 2, "a": 1})).unwrap();
        assert_eq!(bytes.as_bytes(), br#"{"a":1,"b":2}"#);
    }

    #[test]
    fn normalizes_datetimes_to_utc_seconds() {
        let bytes =
            CanonicalBytes::new(&json!({"at": "2026-01-15T03:00:00.123-03:00"})).unwrap();
        assert_eq!(
            bytes.as_bytes(),
            br#"{"at":"2026-01-15T06:00:00Z"}"#
        );
    }

    #[test]
    fn non_datetime_strings_pass_through() {
        let bytes = CanonicalBytes::new(&json!({"code": "1006.30.21"})).unwrap();
        assert_eq!(bytes.as_bytes(), br#"{"code":"1006.30.21"}"#);
    }

    #[test]
    fn deterministic_across_calls() {
        let value = json!({"rules": [["R1", "000001", 1]], "annexes": [[1, "100630"]]});
        let a = CanonicalBytes::new(&value).unwrap();
        let b = CanonicalBytes::new(&value).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn nested_float_rejected() {
        let err = CanonicalBytes::new(&json!({"outer": {"inner": [1, 2.5]}}));
        assert!(err.is_err());
    }
}
