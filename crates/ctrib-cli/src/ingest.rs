//! # Ingest Subcommand
//!
//! Loads the rule and annex payloads, builds a snapshot, and reports what
//! the load kept and skipped. A skipped record is a data-quality finding,
//! not a failure: the snapshot still builds from everything that
//! validated.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::{load_snapshot, InputArgs};

/// Arguments for the `ctrib ingest` subcommand.
#[derive(Args, Debug)]
pub struct IngestArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Emit the summary as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable ingest summary.
#[derive(Debug, Serialize)]
struct IngestSummary<'a> {
    label: Option<&'a str>,
    rule_records: usize,
    rules_loaded: usize,
    rules_skipped: usize,
    duplicate_rule_ids: usize,
    annex_records: usize,
    annex_entries_loaded: usize,
    annex_entries_skipped: usize,
    skipped: Vec<String>,
    diagnostics: &'a ctrib_engine::SnapshotDiagnostics,
    digest: String,
}

/// Execute the ingest subcommand.
///
/// Returns exit code: 0 on a clean load, 1 when any record was skipped,
/// 2 on operational error (unreadable files, unparseable payloads).
pub fn run_ingest(args: &IngestArgs) -> Result<u8> {
    let manifest = args.inputs.resolve()?;
    let (snapshot, report) = load_snapshot(&manifest)?;

    if args.json {
        let summary = IngestSummary {
            label: manifest.label.as_deref(),
            rule_records: report.rule_records,
            rules_loaded: report.rules_loaded,
            rules_skipped: report.rules_skipped,
            duplicate_rule_ids: report.duplicate_rule_ids,
            annex_records: report.annex_records,
            annex_entries_loaded: report.annex_entries_loaded,
            annex_entries_skipped: report.annex_entries_skipped,
            skipped: report.errors.iter().map(|e| e.to_string()).collect(),
            diagnostics: snapshot.diagnostics(),
            digest: snapshot.digest().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if let Some(ref label) = manifest.label {
            println!("Source: {label}");
        }
        println!(
            "Rules: {}/{} loaded ({} skipped, {} duplicate ids)",
            report.rules_loaded, report.rule_records, report.rules_skipped, report.duplicate_rule_ids
        );
        println!(
            "Annex entries: {}/{} loaded ({} skipped)",
            report.annex_entries_loaded, report.annex_records, report.annex_entries_skipped
        );
        for error in &report.errors {
            println!("  SKIP: {error}");
        }

        let diag = snapshot.diagnostics();
        println!("Annex groups: {}", diag.annex_count);
        if diag.rules_with_unresolved_annex_count > 0 {
            println!(
                "WARN: {} rule(s) reference annexes absent from the annex index",
                diag.rules_with_unresolved_annex_count
            );
        }
        println!("Snapshot digest: {}", snapshot.digest());
    }

    Ok(if report.has_errors() { 1 } else { 0 })
}
