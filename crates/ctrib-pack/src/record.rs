//! Wire-format record types.
//!
//! These mirror the government payload shapes as they arrive, before
//! validation. Field aliases cover the upstream spellings (`cClassTrib`,
//! `Anexo`, `nroAnexo`, `codNcmNbs`, `descricao`) alongside the normalized
//! names, and every record carries a flattened pass-through bag so unknown
//! fields survive a load instead of being silently dropped.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw classification rule record as decoded from a payload.
///
/// `id` is kept as a raw JSON value because upstream tables mix string
/// codes (`"000001"`) with bare integers; the loader coerces it. Optional
/// fields default rather than fail, so shape validation happens in the
/// loader where it can be reported per record.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRuleRecord {
    /// Rule identifier, string or integer on the wire.
    #[serde(default)]
    pub id: Option<Value>,

    /// Tax-treatment code this rule assigns.
    #[serde(default, alias = "cClassTrib", alias = "codigo")]
    pub classification_code: Option<String>,

    /// Annex group this rule is scoped to, when annex-scoped.
    #[serde(default, alias = "Anexo", alias = "anexo")]
    pub annex_reference: Option<i64>,

    /// Applicability conditions, attribute name to expected value.
    #[serde(default)]
    pub conditions: BTreeMap<String, String>,

    /// Whether the rule declares itself a catch-all default.
    #[serde(default, alias = "padrao")]
    pub catch_all: bool,

    /// Free-text description of the rule.
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,

    /// First day the rule applies, inclusive.
    #[serde(default, alias = "date_start", alias = "validFrom")]
    pub valid_from: Option<NaiveDate>,

    /// Last day the rule applies, inclusive.
    #[serde(default, alias = "date_end", alias = "validTo")]
    pub valid_to: Option<NaiveDate>,

    /// Unknown wire fields, preserved opaquely.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A raw annex row as decoded from a payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAnnexRecord {
    /// Annex group number.
    #[serde(default, alias = "nroAnexo")]
    pub annex_id: Option<i64>,

    /// NCM/NBS code this row covers (possibly a coarse prefix).
    #[serde(default, alias = "codNcmNbs", alias = "ncm")]
    pub merchandise_code: Option<String>,

    /// Unit of measure metadata, carried through uninterpreted.
    #[serde(default, alias = "unidade")]
    pub unit: Option<String>,

    /// Category metadata, carried through uninterpreted.
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,

    /// Unknown wire fields, preserved opaquely.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
