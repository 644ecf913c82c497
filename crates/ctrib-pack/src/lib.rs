//! # ctrib-pack — Government Table Ingestion
//!
//! Turns raw classification payloads (classTrib rules, annex/NCM tables)
//! into validated, immutable in-memory structures:
//!
//! - [`RuleStore`]: classification rules indexed by rule id.
//! - [`AnnexIndex`]: annex entries indexed by annex id and by
//!   merchandise-code prefix.
//! - [`IngestReport`]: skip-and-report ledger of everything a load
//!   rejected — one malformed record never aborts ingestion of the rest.
//!
//! ## Architecture
//!
//! ```text
//! payload files (JSON)  -->  ctrib-pack (validate/index)  -->  ctrib-engine (match)
//!   classTrib rules            RuleStore + IngestReport         Snapshot
//!   anexos NCM rows            AnnexIndex                       classify()
//! ```
//!
//! The loaders perform no I/O themselves; [`parser`] reads payload files
//! and the [`SourceManifest`] maps named upstream sources to local files.

pub mod annex;
pub mod error;
pub mod parser;
pub mod record;
pub mod report;
pub mod rules;
pub mod source;

pub use annex::{AnnexEntry, AnnexIndex};
pub use error::{PackError, PackResult};
pub use record::{RawAnnexRecord, RawRuleRecord};
pub use report::IngestReport;
pub use rules::{ClassificationRule, RuleStore};
pub use source::SourceManifest;

/// Reserved condition key whose value is matched against the query's
/// merchandise code rather than the query context.
pub const CONDITION_MERCHANDISE_PREFIX: &str = "ncm_prefix";
