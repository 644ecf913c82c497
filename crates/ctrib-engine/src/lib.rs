//! # ctrib-engine — Classification Matching
//!
//! The query side of the stack: an immutable [`Snapshot`] pairs a loaded
//! [`RuleStore`](ctrib_pack::RuleStore) with an
//! [`AnnexIndex`](ctrib_pack::AnnexIndex), and [`Snapshot::classify`]
//! resolves a [`ProductQuery`] to a [`MatchResult`] as a pure function —
//! no I/O, no mutation, no hidden state.
//!
//! ## Resolution mechanisms
//!
//! A rule becomes a candidate through exactly one mechanism:
//!
//! - **annex lookup** — the rule is scoped to an annex and the query code
//!   has a longest-prefix match among that annex's entries;
//! - **direct condition** — the rule names a code prefix in its conditions
//!   (or declares itself a catch-all default).
//!
//! Candidates rank by specificity (matched digit count). A tie at the top
//! is reported as ambiguous rather than silently picking a winner.
//!
//! ## Concurrency
//!
//! `Snapshot` is immutable after construction, so concurrent `classify`
//! calls need no locking. Re-ingestion builds a fresh snapshot and swaps
//! it in through [`SnapshotHandle`]; readers never observe a
//! partially-built snapshot.

pub mod error;
pub mod fallback;
pub mod matcher;
pub mod query;
pub mod snapshot;

pub use error::{EngineError, EngineResult};
pub use fallback::DescriptionHint;
pub use matcher::{Candidate, MatchResult, ResolvedVia};
pub use query::ProductQuery;
pub use snapshot::{Snapshot, SnapshotDiagnostics, SnapshotHandle};
