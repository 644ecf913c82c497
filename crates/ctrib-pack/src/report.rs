//! Ingestion report: what a load kept, skipped, and why.
//!
//! A load never aborts on a single bad record; every rejection lands here
//! instead. The report travels with the loaded store/index so callers can
//! decide whether the skip rate is acceptable before swapping a snapshot in.

use crate::error::PackError;

/// Counters and collected errors from one ingestion pass.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Rule records seen in the payload.
    pub rule_records: usize,
    /// Rule records that validated and were kept.
    pub rules_loaded: usize,
    /// Rule records skipped as malformed.
    pub rules_skipped: usize,
    /// Of the skipped rules, how many were duplicate ids.
    pub duplicate_rule_ids: usize,

    /// Annex records seen in the payload.
    pub annex_records: usize,
    /// Annex entries that validated and were kept.
    pub annex_entries_loaded: usize,
    /// Annex records skipped as malformed.
    pub annex_entries_skipped: usize,

    /// Every rejection, in payload order.
    pub errors: Vec<PackError>,
}

impl IngestReport {
    /// Record a skipped rule record.
    pub fn record_rule_error(&mut self, error: PackError) {
        self.rules_skipped += 1;
        self.errors.push(error);
    }

    /// Record a skipped rule record that duplicated an earlier id.
    pub fn record_duplicate_rule(&mut self, error: PackError) {
        self.duplicate_rule_ids += 1;
        self.record_rule_error(error);
    }

    /// Record a skipped annex record.
    pub fn record_annex_error(&mut self, error: PackError) {
        self.annex_entries_skipped += 1;
        self.errors.push(error);
    }

    /// Whether any record was rejected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Fold another report into this one (rules pass + annex pass).
    pub fn merge(&mut self, other: IngestReport) {
        self.rule_records += other.rule_records;
        self.rules_loaded += other.rules_loaded;
        self.rules_skipped += other.rules_skipped;
        self.duplicate_rule_ids += other.duplicate_rule_ids;
        self.annex_records += other.annex_records;
        self.annex_entries_loaded += other.annex_entries_loaded;
        self.annex_entries_skipped += other.annex_entries_skipped;
        self.errors.extend(other.errors);
    }

    /// Emit a structured summary of the load.
    pub fn log_summary(&self) {
        tracing::debug!(
            rule_records = self.rule_records,
            rules_loaded = self.rules_loaded,
            rules_skipped = self.rules_skipped,
            duplicate_rule_ids = self.duplicate_rule_ids,
            annex_records = self.annex_records,
            annex_entries_loaded = self.annex_entries_loaded,
            annex_entries_skipped = self.annex_entries_skipped,
            "ingestion completed"
        );
        for error in &self.errors {
            tracing::debug!(%error, "record skipped");
        }
    }
}
