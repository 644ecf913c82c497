//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers in the classification stack.
//! Each identifier is a distinct type — you cannot pass an [`AnnexId`]
//! where a [`RuleId`] is expected.
//!
//! ## Validation
//!
//! [`RuleId`] validates non-emptiness at construction; government rule
//! codes arrive both as zero-padded strings (`"000001"`) and as bare
//! integers, so a numeric constructor is provided. [`AnnexId`] validates
//! range. [`SnapshotId`] is UUID-based and always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Identifier of a government classification rule.
///
/// Opaque within the engine: ordering is lexicographic over the stored
/// string, used only to keep candidate listings deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
    /// Create a rule identifier from a string, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRuleId`] when the trimmed input
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidRuleId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Create a rule identifier from a numeric wire value.
    ///
    /// Upstream tables mix `"000001"`-style codes with bare integers; the
    /// integer form is kept as its decimal string.
    pub fn from_numeric(value: i64) -> Self {
        Self(value.to_string())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an annex group (`nroAnexo` in the government tables).
///
/// Many annex rows share one annex id; rules reference the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnexId(u32);

impl AnnexId {
    /// Create an annex identifier from a wire integer, validating range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAnnexId`] for negative values or
    /// values that do not fit an annex number.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidAnnexId(value))
    }

    /// The underlying annex number.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AnnexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a built rule/annex snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Create a new random snapshot identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a snapshot identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
