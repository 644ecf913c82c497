//! # Classify Subcommand
//!
//! Resolves one product code against a freshly loaded snapshot and prints
//! the match result as JSON — the same shape an API surface would return.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use ctrib_engine::ProductQuery;

use crate::{load_snapshot, parse_key_val, InputArgs};

/// Arguments for the `ctrib classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// The product's NCM/NBS code to resolve.
    #[arg(long)]
    pub ncm: String,

    /// Free-text product description (fallback signal only).
    #[arg(long)]
    pub description: Option<String>,

    /// Condition context as key=value pairs (repeatable).
    #[arg(long = "context", value_parser = parse_key_val)]
    pub context: Vec<(String, String)>,

    /// Reference date (YYYY-MM-DD) for validity windows. Defaults to the
    /// manifest's as_of date when present.
    #[arg(long)]
    pub as_of: Option<String>,
}

/// Execute the classify subcommand.
///
/// Returns exit code: 0 on a definitive match, 1 when nothing matched or
/// the match was ambiguous, 2 on operational error.
pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    let manifest = args.inputs.resolve()?;
    let (snapshot, _report) = load_snapshot(&manifest)?;

    let as_of = match &args.as_of {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("invalid --as-of date {raw:?} (expected YYYY-MM-DD)"))?,
        ),
        None => manifest.as_of,
    };

    let mut query = ProductQuery::new(&args.ncm);
    if let Some(ref description) = args.description {
        query = query.with_description(description);
    }
    if !args.context.is_empty() {
        let context: BTreeMap<String, String> = args.context.iter().cloned().collect();
        query = query.with_context(context);
    }
    if let Some(date) = as_of {
        query = query.with_as_of(date);
    }

    let result = snapshot
        .classify(&query)
        .with_context(|| format!("failed to classify {:?}", args.ncm))?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(if result.is_definitive() { 0 } else { 1 })
}
