//! # Verify Subcommand
//!
//! Operational consistency check between the rule table and the annex
//! table: total counts, how many rules are annex-scoped, whether a sample
//! reference resolves, and every unresolved reference. Replaces the ad hoc
//! checks operators used to run by hand against the raw store.

use anyhow::Result;
use clap::Args;

use crate::{load_snapshot, InputArgs};

/// Arguments for the `ctrib verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Execute the verify subcommand.
///
/// Returns exit code: 0 when every annex reference resolves, 1 when any
/// does not, 2 on operational error.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let manifest = args.inputs.resolve()?;
    let (snapshot, report) = load_snapshot(&manifest)?;
    let diag = snapshot.diagnostics();

    println!("--- Checking rule/annex consistency ---");
    println!("Total rules: {}", diag.rule_count);
    println!("Total annex entries: {}", diag.annex_entry_count);
    println!("Annex groups: {}", diag.annex_count);

    let linked: Vec<_> = snapshot
        .rules()
        .iter()
        .filter(|rule| rule.annex_reference.is_some())
        .collect();
    println!("Rules with annex reference: {}", linked.len());

    match linked.first().and_then(|rule| rule.annex_reference.map(|a| (rule, a))) {
        Some((sample, annex_id)) => {
            let codes = snapshot.annex_index().codes_for(annex_id);
            println!("Sample annex id from rule {}: {}", sample.id, annex_id);
            println!("Matching entries for annex {}: {}", annex_id, codes.len());
            if let Some(code) = codes.first() {
                println!("Sample matching code: {code}");
            }
        }
        None => println!("No rules linked to specific annexes (all references absent)."),
    }

    if report.has_errors() {
        println!(
            "Skipped records during load: {}",
            report.rules_skipped + report.annex_entries_skipped
        );
    }

    println!(
        "Unresolved annex references: {}",
        diag.rules_with_unresolved_annex_count
    );
    for (rule_id, annex_id) in snapshot.rules().iter().filter_map(|rule| {
        rule.annex_reference.and_then(|annex_id| {
            (!snapshot.annex_index().contains_annex(annex_id))
                .then(|| (rule.id.clone(), annex_id))
        })
    }) {
        println!("  FAIL: rule {rule_id} -> annex {annex_id}");
    }

    println!("Snapshot digest: {}", snapshot.digest());

    Ok(if diag.rules_with_unresolved_annex_count > 0 {
        1
    } else {
        0
    })
}
