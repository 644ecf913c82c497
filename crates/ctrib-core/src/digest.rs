//! # Content Digests
//!
//! [`ContentDigest`] fingerprints a loaded snapshot so operators can verify
//! that two independent loads ingested the same government tables.
//!
//! A digest can only be computed from [`CanonicalBytes`][crate::CanonicalBytes],
//! which guarantees every fingerprint in the system was produced from
//! properly canonicalized data.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A SHA-256 content digest, serialized as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// The raw 32-byte digest value.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering of the digest.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a digest from a 64-character lowercase hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let hi = (chunk[0] as char).to_digit(16)?;
            let lo = (chunk[1] as char).to_digit(16)?;
            bytes[i] = ((hi << 4) | lo) as u8;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentDigest::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom("expected 64 lowercase hex characters"))
    }
}

/// Compute the SHA-256 digest of canonical bytes.
pub fn sha256_digest(canonical: &CanonicalBytes) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    ContentDigest(hasher.finalize().into())
}

/// Convenience: compute the digest and return its hex form directly.
pub fn sha256_hex(canonical: &CanonicalBytes) -> String {
    sha256_digest(canonical).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn digest_is_deterministic() {
        let canonical = CanonicalBytes::new(&json!({"a": 1})).unwrap();
        assert_eq!(sha256_digest(&canonical), sha256_digest(&canonical));
    }

    #[test]
    fn digest_changes_with_content() {
        let a = CanonicalBytes::new(&json!({"a": 1})).unwrap();
        let b = CanonicalBytes::new(&json!({"a": 2})).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn hex_is_64_lowercase_chars() {
        let canonical = CanonicalBytes::new(&json!([])).unwrap();
        let hex = sha256_hex(&canonical);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn from_hex_roundtrips() {
        let canonical = CanonicalBytes::new(&json!({"x": "y"})).unwrap();
        let digest = sha256_digest(&canonical);
        assert_eq!(ContentDigest::from_hex(&digest.to_hex()), Some(digest));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("zz").is_none());
        assert!(ContentDigest::from_hex(&"A".repeat(64)).is_none());
    }

    #[test]
    fn serializes_as_hex_string() {
        let canonical = CanonicalBytes::new(&json!(1)).unwrap();
        let digest = sha256_digest(&canonical);
        let value = serde_json::to_value(digest).unwrap();
        assert_eq!(value.as_str().unwrap().len(), 64);

        let back: ContentDigest = serde_json::from_value(value).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn display_carries_algorithm_prefix() {
        let canonical = CanonicalBytes::new(&json!(null)).unwrap();
        let digest = sha256_digest(&canonical);
        assert!(format!("{digest}").starts_with("sha256:"));
    }
}
