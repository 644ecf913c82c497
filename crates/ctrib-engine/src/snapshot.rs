//! Immutable rule/annex snapshot and the handle that swaps it.
//!
//! A snapshot is built once from a loaded rule store and annex index, then
//! only read. Diagnostics are computed at build time — in particular the
//! count of rules whose annex reference does not resolve in the index,
//! which is an expected transient state when the two government tables are
//! fetched on independent schedules.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use ctrib_core::{sha256_digest, CanonicalBytes, ContentDigest, RuleId, SnapshotId};
use ctrib_pack::{AnnexIndex, RuleStore};

use crate::error::EngineResult;

/// Read-only counts for operational verification.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDiagnostics {
    /// Rules in the store.
    pub rule_count: usize,
    /// Annex entries in the index.
    pub annex_entry_count: usize,
    /// Distinct annex groups in the index.
    pub annex_count: usize,
    /// Rules whose annex reference does not resolve in the index.
    pub rules_with_unresolved_annex_count: usize,
    /// The offending rule ids, in id order.
    pub unresolved_rule_ids: Vec<RuleId>,
}

/// An immutable, point-in-time pairing of rules and annex index.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    id: SnapshotId,
    built_at: DateTime<Utc>,
    digest: ContentDigest,
    diagnostics: SnapshotDiagnostics,
    rules: RuleStore,
    annex_index: AnnexIndex,
}

impl Snapshot {
    /// Build a snapshot from loaded data.
    ///
    /// Computes diagnostics and the content fingerprint. Unresolved annex
    /// references are tolerated — logged once here at WARN, counted in the
    /// diagnostics, and treated as non-matching at query time.
    ///
    /// # Errors
    ///
    /// Returns an error only if fingerprinting fails to canonicalize,
    /// which would indicate a defect in the summary construction rather
    /// than bad input data.
    pub fn build(rules: RuleStore, annex_index: AnnexIndex) -> EngineResult<Self> {
        let unresolved_rule_ids: Vec<RuleId> = rules
            .iter()
            .filter(|rule| {
                rule.annex_reference
                    .is_some_and(|annex_id| !annex_index.contains_annex(annex_id))
            })
            .map(|rule| rule.id.clone())
            .collect();

        if !unresolved_rule_ids.is_empty() {
            tracing::warn!(
                count = unresolved_rule_ids.len(),
                "rules reference annexes absent from the annex index; they will not match"
            );
            for id in &unresolved_rule_ids {
                tracing::debug!(rule_id = %id, "unresolved annex reference");
            }
        }

        let diagnostics = SnapshotDiagnostics {
            rule_count: rules.len(),
            annex_entry_count: annex_index.entry_count(),
            annex_count: annex_index.annex_count(),
            rules_with_unresolved_annex_count: unresolved_rule_ids.len(),
            unresolved_rule_ids,
        };

        let digest = fingerprint(&rules, &annex_index)?;

        tracing::debug!(
            rule_count = diagnostics.rule_count,
            annex_entry_count = diagnostics.annex_entry_count,
            digest = %digest,
            "snapshot built"
        );

        Ok(Self {
            id: SnapshotId::new(),
            built_at: Utc::now(),
            digest,
            diagnostics,
            rules,
            annex_index,
        })
    }

    /// Snapshot identifier.
    pub fn id(&self) -> &SnapshotId {
        &self.id
    }

    /// When this snapshot was built.
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Content fingerprint of the loaded data.
    ///
    /// Two snapshots built from the same rule and annex data carry the
    /// same digest regardless of build time or snapshot id.
    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    /// Read-only operational counts.
    pub fn diagnostics(&self) -> &SnapshotDiagnostics {
        &self.diagnostics
    }

    /// The loaded rules.
    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// The loaded annex index.
    pub fn annex_index(&self) -> &AnnexIndex {
        &self.annex_index
    }
}

/// Canonical summary used for the snapshot fingerprint.
///
/// Only load-bearing fields participate: the pass-through bags may carry
/// floats, and build time / snapshot id must not affect the digest.
#[derive(Serialize)]
struct SnapshotSummary<'a> {
    rules: Vec<RuleSummary<'a>>,
    annexes: Vec<(u32, Vec<&'a str>)>,
}

#[derive(Serialize)]
struct RuleSummary<'a> {
    id: &'a str,
    classification_code: &'a str,
    annex_reference: Option<u32>,
    catch_all: bool,
    conditions: &'a std::collections::BTreeMap<String, String>,
    valid_from: Option<chrono::NaiveDate>,
    valid_to: Option<chrono::NaiveDate>,
}

fn fingerprint(rules: &RuleStore, annex_index: &AnnexIndex) -> EngineResult<ContentDigest> {
    let summary = SnapshotSummary {
        rules: rules
            .iter()
            .map(|rule| RuleSummary {
                id: rule.id.as_str(),
                classification_code: &rule.classification_code,
                annex_reference: rule.annex_reference.map(|a| a.value()),
                catch_all: rule.catch_all,
                conditions: &rule.conditions,
                valid_from: rule.valid_from,
                valid_to: rule.valid_to,
            })
            .collect(),
        annexes: annex_index
            .annex_ids()
            .map(|annex_id| (annex_id.value(), annex_index.codes_for(annex_id)))
            .collect(),
    };
    let canonical = CanonicalBytes::new(&summary)?;
    Ok(sha256_digest(&canonical))
}

/// Shared handle that always points at a complete snapshot.
///
/// Rebuilding replaces the inner `Arc` under a write lock; readers either
/// see the old snapshot or the new one, never an intermediate state.
#[derive(Debug)]
pub struct SnapshotHandle {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotHandle {
    /// Create a handle over an initial snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The current snapshot. Cheap; clones an `Arc`.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Atomically replace the current snapshot, returning the previous one.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write();
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_snapshot() -> Snapshot {
        let (rules, _) = RuleStore::from_values(&[
            json!({"id": "R1", "classification_code": "000", "Anexo": 1}),
            json!({"id": "R2", "classification_code": "200", "Anexo": 9}),
            json!({"id": "R3", "classification_code": "550"}),
        ]);
        let (annex_index, _) =
            AnnexIndex::from_values(&[json!({"nroAnexo": 1, "codNcmNbs": "1006.30"})]);
        Snapshot::build(rules, annex_index).unwrap()
    }

    #[test]
    fn diagnostics_count_unresolved_annex_references() {
        let snapshot = sample_snapshot();
        let diag = snapshot.diagnostics();
        assert_eq!(diag.rule_count, 3);
        assert_eq!(diag.annex_entry_count, 1);
        assert_eq!(diag.annex_count, 1);
        assert_eq!(diag.rules_with_unresolved_annex_count, 1);
        assert_eq!(diag.unresolved_rule_ids[0].as_str(), "R2");
    }

    #[test]
    fn digest_is_stable_across_rebuilds() {
        let build = || {
            let (rules, _) = RuleStore::from_values(&[
                json!({"id": "R1", "classification_code": "000", "Anexo": 1}),
            ]);
            let (annex_index, _) =
                AnnexIndex::from_values(&[json!({"nroAnexo": 1, "codNcmNbs": "1006.30"})]);
            Snapshot::build(rules, annex_index).unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn digest_changes_with_rule_data() {
        let (rules_a, _) =
            RuleStore::from_values(&[json!({"id": "R1", "classification_code": "000"})]);
        let (rules_b, _) =
            RuleStore::from_values(&[json!({"id": "R1", "classification_code": "999"})]);
        let a = Snapshot::build(rules_a, AnnexIndex::default()).unwrap();
        let b = Snapshot::build(rules_b, AnnexIndex::default()).unwrap();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn digest_ignores_passthrough_floats() {
        // Extra wire fields may carry floats; the fingerprint must not
        // choke on them or depend on them.
        let (rules, _) = RuleStore::from_values(&[
            json!({"id": "R1", "classification_code": "000", "pAliqEfet": 0.265}),
        ]);
        let snapshot = Snapshot::build(rules, AnnexIndex::default()).unwrap();
        assert_eq!(snapshot.diagnostics().rule_count, 1);
    }

    #[test]
    fn handle_swaps_atomically() {
        let handle = SnapshotHandle::new(sample_snapshot());
        let before = handle.current();

        let (rules, _) =
            RuleStore::from_values(&[json!({"id": "R9", "classification_code": "111"})]);
        let rebuilt = Snapshot::build(rules, AnnexIndex::default()).unwrap();
        let previous = handle.replace(rebuilt);

        assert_eq!(previous.id(), before.id());
        let after = handle.current();
        assert_ne!(after.id(), before.id());
        assert_eq!(after.diagnostics().rule_count, 1);
        // The old snapshot stays usable for readers still holding it.
        assert_eq!(before.diagnostics().rule_count, 3);
    }

    #[test]
    fn empty_snapshot_builds() {
        let snapshot = Snapshot::build(RuleStore::default(), AnnexIndex::default()).unwrap();
        assert_eq!(snapshot.diagnostics().rule_count, 0);
        assert_eq!(snapshot.diagnostics().rules_with_unresolved_annex_count, 0);
    }
}
