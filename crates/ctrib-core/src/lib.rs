//! # ctrib-core — Foundational Types for the Classification Stack
//!
//! This crate is the bedrock of the ctrib stack. It defines the domain
//! primitives used by every other crate in the workspace and depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** [`RuleId`], [`AnnexId`],
//!    [`MerchandiseCode`], [`SnapshotId`] — all newtypes with validated
//!    constructors. No bare strings for identifiers or classification codes.
//!
//! 2. **`CanonicalBytes` newtype.** All digest computation flows through
//!    [`CanonicalBytes::new()`]. No raw `serde_json::to_vec()` for digests,
//!    so two loads of the same government tables always fingerprint the same.
//!
//! 3. **Normalization at the boundary.** A merchandise code is normalized to
//!    its digit form exactly once, at construction. Everything downstream
//!    (prefix matching, index keys, equality) operates on the normalized form.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ctrib-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod canonical;
pub mod code;
pub mod digest;
pub mod error;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use code::MerchandiseCode;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CtribError, ValidationError};
pub use identity::{AnnexId, RuleId, SnapshotId};
