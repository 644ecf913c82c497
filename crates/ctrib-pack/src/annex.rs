//! Annex index: merchandise-code lookups over annex tables.
//!
//! An annex groups many NCM/NBS rows under one `annex_id`, and a row may
//! carry a coarser prefix than any real product code. The index answers
//! both directions — "which codes does annex N cover" and "which annexes
//! cover code X" — with a longest-matching-prefix policy over the code
//! hierarchy (2/4/6/8-digit NCM levels, 9-digit NBS).

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

use ctrib_core::{AnnexId, MerchandiseCode};

use crate::error::PackError;
use crate::record::RawAnnexRecord;
use crate::report::IngestReport;

/// One validated annex row.
#[derive(Debug, Clone, Serialize)]
pub struct AnnexEntry {
    /// Annex group number.
    pub annex_id: AnnexId,
    /// Code (or code prefix) this row covers.
    pub merchandise_code: MerchandiseCode,
    /// Unit of measure metadata, uninterpreted.
    pub unit: Option<String>,
    /// Category metadata, uninterpreted.
    pub category: Option<String>,
    /// Unknown wire fields, carried through opaquely.
    pub extra: BTreeMap<String, Value>,
}

/// Lookup structures over one arena of validated annex entries.
///
/// (`annex_id`, `merchandise_code`) pairs are not required to be unique;
/// both maps hold every entry index for a key.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnnexIndex {
    entries: Vec<AnnexEntry>,
    /// annex id → code digits → entry indices under that annex.
    by_annex: BTreeMap<AnnexId, BTreeMap<String, Vec<usize>>>,
    /// code digits → annex ids listing that exact code.
    by_code: BTreeMap<String, BTreeSet<AnnexId>>,
}

impl AnnexIndex {
    /// Build an index from raw payload values, skip-and-report per record.
    pub fn from_values(values: &[Value]) -> (Self, IngestReport) {
        let mut report = IngestReport {
            annex_records: values.len(),
            ..Default::default()
        };
        let mut index = Self::default();

        for (idx, value) in values.iter().enumerate() {
            match decode_entry(value) {
                Ok(entry) => {
                    report.annex_entries_loaded += 1;
                    index.insert(entry);
                }
                Err(detail) => {
                    report.record_annex_error(PackError::MalformedAnnex { index: idx, detail });
                }
            }
        }

        report.log_summary();
        (index, report)
    }

    /// Build an index from already-validated entries (tests, fixtures).
    pub fn from_entries(entries: impl IntoIterator<Item = AnnexEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    fn insert(&mut self, entry: AnnexEntry) {
        let digits = entry.merchandise_code.digits().to_string();
        let idx = self.entries.len();
        self.by_annex
            .entry(entry.annex_id)
            .or_default()
            .entry(digits.clone())
            .or_default()
            .push(idx);
        self.by_code.entry(digits).or_default().insert(entry.annex_id);
        self.entries.push(entry);
    }

    /// Total validated entries in the arena.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of distinct annex groups present.
    pub fn annex_count(&self) -> usize {
        self.by_annex.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry exists under the given annex id.
    pub fn contains_annex(&self, annex_id: AnnexId) -> bool {
        self.by_annex.contains_key(&annex_id)
    }

    /// Annex ids present in the index, ascending.
    pub fn annex_ids(&self) -> impl Iterator<Item = AnnexId> + '_ {
        self.by_annex.keys().copied()
    }

    /// Distinct code digit strings listed under an annex, in code order.
    pub fn codes_for(&self, annex_id: AnnexId) -> Vec<&str> {
        self.by_annex
            .get(&annex_id)
            .map(|codes| codes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Entries listed under an annex, in insertion order.
    pub fn entries_for(&self, annex_id: AnnexId) -> Vec<&AnnexEntry> {
        let mut indices: Vec<usize> = self
            .by_annex
            .get(&annex_id)
            .map(|codes| codes.values().flatten().copied().collect())
            .unwrap_or_default();
        indices.sort_unstable();
        indices.into_iter().map(|i| &self.entries[i]).collect()
    }

    /// Longest stored entry code under `annex_id` that is a digit-prefix of
    /// the query code.
    ///
    /// Probes the query's prefix levels longest-first, so an annex listing
    /// both `"1006"` and `"100630"` resolves `"10063021"` via the 6-digit
    /// entry.
    pub fn longest_prefix_match(
        &self,
        annex_id: AnnexId,
        code: &MerchandiseCode,
    ) -> Option<&str> {
        let codes = self.by_annex.get(&annex_id)?;
        for prefix in code.prefixes() {
            if let Some((stored, _)) = codes.get_key_value(prefix) {
                return Some(stored.as_str());
            }
        }
        None
    }

    /// All annex ids whose entries cover the given code by prefix.
    pub fn annexes_covering(&self, code: &MerchandiseCode) -> BTreeSet<AnnexId> {
        let mut covering = BTreeSet::new();
        for prefix in code.prefixes() {
            if let Some(ids) = self.by_code.get(prefix) {
                covering.extend(ids.iter().copied());
            }
        }
        covering
    }
}

/// Decode and validate one annex payload element.
fn decode_entry(value: &Value) -> Result<AnnexEntry, String> {
    if !value.is_object() {
        return Err("record is not an object".to_string());
    }
    let record: RawAnnexRecord = serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;

    let annex_id = match record.annex_id {
        Some(raw) => AnnexId::new(raw).map_err(|e| e.to_string())?,
        None => return Err("missing annex_id".to_string()),
    };
    let merchandise_code = match record.merchandise_code {
        Some(raw) => MerchandiseCode::new(raw).map_err(|e| e.to_string())?,
        None => return Err("missing merchandise_code".to_string()),
    };

    Ok(AnnexEntry {
        annex_id,
        merchandise_code,
        unit: record.unit,
        category: record.category,
        extra: record.extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn annex(n: i64) -> AnnexId {
        AnnexId::new(n).unwrap()
    }

    fn code(s: &str) -> MerchandiseCode {
        MerchandiseCode::new(s).unwrap()
    }

    fn build(values: Vec<Value>) -> (AnnexIndex, IngestReport) {
        AnnexIndex::from_values(&values)
    }

    #[test]
    fn indexes_by_annex_and_by_code() {
        let (index, report) = build(vec![
            json!({"nroAnexo": 1, "codNcmNbs": "1006.30"}),
            json!({"nroAnexo": 1, "codNcmNbs": "1006.40"}),
            json!({"nroAnexo": 2, "codNcmNbs": "1006.30"}),
        ]);
        assert!(!report.has_errors());
        assert_eq!(index.entry_count(), 3);
        assert_eq!(index.annex_count(), 2);
        assert_eq!(index.codes_for(annex(1)), vec!["100630", "100640"]);

        let covering = index.annexes_covering(&code("1006.30.21"));
        assert!(covering.contains(&annex(1)));
        assert!(covering.contains(&annex(2)));
    }

    #[test]
    fn longest_prefix_wins() {
        let (index, _) = build(vec![
            json!({"nroAnexo": 1, "codNcmNbs": "1006"}),
            json!({"nroAnexo": 1, "codNcmNbs": "1006.30"}),
        ]);
        let matched = index.longest_prefix_match(annex(1), &code("1006.30.21"));
        assert_eq!(matched, Some("100630"));
    }

    #[test]
    fn falls_back_to_shorter_prefix() {
        let (index, _) = build(vec![
            json!({"nroAnexo": 1, "codNcmNbs": "1006"}),
            json!({"nroAnexo": 1, "codNcmNbs": "1006.30"}),
        ]);
        let matched = index.longest_prefix_match(annex(1), &code("1006.40.00"));
        assert_eq!(matched, Some("1006"));
    }

    #[test]
    fn no_match_outside_annex_scope() {
        let (index, _) = build(vec![json!({"nroAnexo": 1, "codNcmNbs": "1006.30"})]);
        assert_eq!(index.longest_prefix_match(annex(1), &code("2202.10.00")), None);
        assert_eq!(index.longest_prefix_match(annex(9), &code("1006.30.21")), None);
    }

    #[test]
    fn duplicate_pairs_are_allowed() {
        let (index, report) = build(vec![
            json!({"nroAnexo": 1, "codNcmNbs": "1006.30", "unidade": "KG"}),
            json!({"nroAnexo": 1, "codNcmNbs": "1006.30", "unidade": "TON"}),
        ]);
        assert!(!report.has_errors());
        assert_eq!(index.entry_count(), 2);
        assert_eq!(index.entries_for(annex(1)).len(), 2);
    }

    #[test]
    fn skips_malformed_records() {
        let (index, report) = build(vec![
            json!({"nroAnexo": 1}),
            json!({"codNcmNbs": "1006.30"}),
            json!({"nroAnexo": 1, "codNcmNbs": "ARROZ"}),
            json!({"nroAnexo": 1, "codNcmNbs": "2202.10.00"}),
        ]);
        assert_eq!(index.entry_count(), 1);
        assert_eq!(report.annex_entries_skipped, 3);
        assert_eq!(report.annex_entries_loaded, 1);
    }

    #[test]
    fn carries_metadata_through() {
        let (index, _) = build(vec![
            json!({"nroAnexo": 1, "codNcmNbs": "1006.30", "unidade": "KG", "categoria": "graos"}),
        ]);
        let entries = index.entries_for(annex(1));
        assert_eq!(entries[0].unit.as_deref(), Some("KG"));
        assert_eq!(entries[0].category.as_deref(), Some("graos"));
    }

    #[test]
    fn exact_code_match_counts_as_prefix() {
        let (index, _) = build(vec![json!({"nroAnexo": 3, "codNcmNbs": "2202.10.00"})]);
        let matched = index.longest_prefix_match(annex(3), &code("2202.10.00"));
        assert_eq!(matched, Some("22021000"));
    }
}
