//! # ctrib CLI library
//!
//! Subcommand implementations for the `ctrib` binary, kept in a library so
//! integration tests can drive them without spawning a process.
//!
//! Every subcommand takes the same input selection: either a YAML source
//! manifest or an explicit pair of payload file paths.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use ctrib_engine::Snapshot;
use ctrib_pack::{parser, AnnexIndex, IngestReport, RuleStore, SourceManifest};

pub mod classify;
pub mod ingest;
pub mod verify;

/// Input selection shared by all subcommands.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to a YAML source manifest naming the payload files.
    #[arg(long, conflicts_with_all = ["rules", "annexes"])]
    pub manifest: Option<PathBuf>,

    /// Path to the classification rules payload (JSON).
    #[arg(long, requires = "annexes")]
    pub rules: Option<PathBuf>,

    /// Path to the annex table payload (JSON).
    #[arg(long, requires = "rules")]
    pub annexes: Option<PathBuf>,
}

impl InputArgs {
    /// Resolve the input selection to a concrete manifest.
    pub fn resolve(&self) -> Result<SourceManifest> {
        if let Some(ref path) = self.manifest {
            return SourceManifest::load(path)
                .with_context(|| format!("failed to load source manifest {}", path.display()));
        }
        match (&self.rules, &self.annexes) {
            (Some(rules), Some(annexes)) => Ok(SourceManifest {
                label: None,
                rules: rules.clone(),
                annexes: annexes.clone(),
                as_of: None,
            }),
            _ => bail!("provide either --manifest or both --rules and --annexes"),
        }
    }
}

/// Load both payloads and build a snapshot, returning the ingest report
/// alongside it.
pub fn load_snapshot(manifest: &SourceManifest) -> Result<(Snapshot, IngestReport)> {
    let rule_values = parser::load_payload_values(&manifest.rules)
        .with_context(|| format!("failed to load rules payload {}", manifest.rules.display()))?;
    let annex_values = parser::load_payload_values(&manifest.annexes).with_context(|| {
        format!("failed to load annex payload {}", manifest.annexes.display())
    })?;

    let (rules, mut report) = RuleStore::from_values(&rule_values);
    let (annex_index, annex_report) = AnnexIndex::from_values(&annex_values);
    report.merge(annex_report);

    let snapshot =
        Snapshot::build(rules, annex_index).context("failed to build snapshot")?;
    Ok((snapshot, report))
}

/// Parse a `key=value` argument pair.
pub fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}
