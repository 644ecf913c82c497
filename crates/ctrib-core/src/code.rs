//! # Merchandise Classification Codes
//!
//! [`MerchandiseCode`] wraps an NCM or NBS code. Government tables write
//! these with dot separators (`"1006.30.21"`), upstream catalogs sometimes
//! without (`"10063021"`), so the constructor normalizes to the bare digit
//! string and all matching operates on that form.
//!
//! NCM codes are hierarchical: the first 2 digits are the chapter, 4 the
//! position, 6 the subposition, 8 the full item. NBS service codes run to
//! 9 digits. An annex entry may carry a coarser prefix than a product's
//! full code, which is what makes longest-prefix matching meaningful.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Separator characters tolerated in raw code input.
const SEPARATORS: &[char] = &['.', '-', '/', ' '];

/// Maximum digit length accepted (NBS service codes).
const MAX_DIGITS: usize = 9;
/// Minimum digit length accepted (NCM chapter level).
const MIN_DIGITS: usize = 2;

/// A normalized NCM/NBS merchandise classification code.
///
/// Equality, ordering, and hashing are defined over the normalized digit
/// string, so `"1006.30.21"` and `"10063021"` compare equal. The original
/// input is retained for display in diagnostics.
#[derive(Debug, Clone)]
pub struct MerchandiseCode {
    raw: String,
    digits: String,
}

impl MerchandiseCode {
    /// Create a merchandise code from raw input, normalizing separators.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMerchandiseCode`] when the input
    /// contains characters other than digits and separators, or when the
    /// normalized digit string is shorter than the chapter level (2) or
    /// longer than an NBS code (9).
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let mut digits = String::with_capacity(raw.len());
        for c in raw.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if !SEPARATORS.contains(&c) {
                return Err(ValidationError::InvalidMerchandiseCode {
                    value: raw,
                    reason: "contains non-digit, non-separator characters",
                });
            }
        }
        if digits.len() < MIN_DIGITS {
            return Err(ValidationError::InvalidMerchandiseCode {
                value: raw,
                reason: "fewer than 2 digits after normalization",
            });
        }
        if digits.len() > MAX_DIGITS {
            return Err(ValidationError::InvalidMerchandiseCode {
                value: raw,
                reason: "more than 9 digits after normalization",
            });
        }
        Ok(Self { raw, digits })
    }

    /// The normalized digit string.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The original input, separators included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Number of digits in the normalized form (the hierarchy level).
    pub fn level(&self) -> usize {
        self.digits.len()
    }

    /// Whether this code falls under the given digit prefix.
    ///
    /// The prefix must already be a bare digit string; an empty prefix
    /// matches nothing.
    pub fn has_prefix(&self, prefix_digits: &str) -> bool {
        !prefix_digits.is_empty() && self.digits.starts_with(prefix_digits)
    }

    /// Iterate this code's digit prefixes, longest first.
    ///
    /// `"10063021"` yields `"10063021"`, `"1006302"`, … down to `"1"`.
    /// Longest-prefix lookups probe these in order against an index.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        (1..=self.digits.len()).rev().map(move |n| &self.digits[..n])
    }

    /// Strip separators from an arbitrary pattern string, keeping digits.
    ///
    /// Used for condition values that carry a code prefix; unlike
    /// [`MerchandiseCode::new`] this drops any non-digit character rather
    /// than rejecting, and returns the (possibly empty) digit string.
    pub fn normalize_pattern(pattern: &str) -> String {
        pattern.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

impl PartialEq for MerchandiseCode {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for MerchandiseCode {}

impl std::hash::Hash for MerchandiseCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
    }
}

impl PartialOrd for MerchandiseCode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MerchandiseCode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.digits.cmp(&other.digits)
    }
}

impl fmt::Display for MerchandiseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digits)
    }
}

impl Serialize for MerchandiseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.digits)
    }
}

impl<'de> Deserialize<'de> for MerchandiseCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MerchandiseCode::new(s).map_err(serde::de::Error::custom)
    }
}
