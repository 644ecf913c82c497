//! Rule store: validated classification rules indexed by id.
//!
//! The loader accepts the payload exactly as the upstream store hands it
//! over — a JSON array whose elements are either bare rule objects or
//! `{"rule": {...}}` envelopes — validates each record independently, and
//! reports rejects through [`IngestReport`] without aborting the load.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use ctrib_core::{AnnexId, RuleId};

use crate::error::PackError;
use crate::record::RawRuleRecord;
use crate::report::IngestReport;

/// A validated government classification rule.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRule {
    /// Unique rule identifier.
    pub id: RuleId,
    /// Tax-treatment code this rule assigns.
    pub classification_code: String,
    /// Annex group this rule is scoped to, when annex-scoped.
    pub annex_reference: Option<AnnexId>,
    /// Applicability conditions, attribute name to expected value.
    pub conditions: BTreeMap<String, String>,
    /// Whether the rule declares itself a catch-all default.
    pub catch_all: bool,
    /// Free-text description.
    pub description: Option<String>,
    /// First day the rule applies, inclusive.
    pub valid_from: Option<NaiveDate>,
    /// Last day the rule applies, inclusive.
    pub valid_to: Option<NaiveDate>,
    /// Unknown wire fields, carried through opaquely.
    pub extra: BTreeMap<String, Value>,
}

impl ClassificationRule {
    /// Whether the rule applies on the given reference date.
    ///
    /// An absent bound is open; an absent reference date skips the check
    /// entirely (callers without temporal context see every rule).
    pub fn applies_on(&self, as_of: Option<NaiveDate>) -> bool {
        let Some(date) = as_of else { return true };
        if let Some(from) = self.valid_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.valid_to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// Immutable collection of validated rules, indexed by rule id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleStore {
    rules: BTreeMap<RuleId, ClassificationRule>,
}

impl RuleStore {
    /// Load a rule store from raw payload values.
    ///
    /// Each element is validated independently: records missing a usable
    /// `id` or `classification_code`, carrying an out-of-range annex
    /// reference, an inverted validity window, or duplicating an earlier
    /// id are skipped and reported. One bad record never aborts the rest.
    pub fn from_values(values: &[Value]) -> (Self, IngestReport) {
        let mut report = IngestReport {
            rule_records: values.len(),
            ..Default::default()
        };
        let mut rules = BTreeMap::new();

        for (index, value) in values.iter().enumerate() {
            let record = match decode_record(value) {
                Ok(record) => record,
                Err(detail) => {
                    report.record_rule_error(PackError::MalformedRule { index, detail });
                    continue;
                }
            };
            match validate_record(record) {
                Ok(rule) => {
                    if rules.contains_key(&rule.id) {
                        report.record_duplicate_rule(PackError::MalformedRule {
                            index,
                            detail: format!("duplicate rule id {}", rule.id),
                        });
                    } else {
                        report.rules_loaded += 1;
                        rules.insert(rule.id.clone(), rule);
                    }
                }
                Err(detail) => {
                    report.record_rule_error(PackError::MalformedRule { index, detail });
                }
            }
        }

        report.log_summary();
        (Self { rules }, report)
    }

    /// Build a store from already-validated rules (tests, fixtures).
    pub fn from_rules(rules: impl IntoIterator<Item = ClassificationRule>) -> Self {
        Self {
            rules: rules.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    /// Number of rules in the store.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by id.
    pub fn get(&self, id: &RuleId) -> Option<&ClassificationRule> {
        self.rules.get(id)
    }

    /// Iterate rules in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.values()
    }
}

/// Decode one payload element, unwrapping the `{"rule": {...}}` envelope
/// the upstream store uses.
fn decode_record(value: &Value) -> Result<RawRuleRecord, String> {
    let inner = match value.get("rule") {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    };
    if !inner.is_object() {
        return Err("record is not an object".to_string());
    }
    serde_json::from_value(inner.clone()).map_err(|e| e.to_string())
}

/// Validate a decoded record into a [`ClassificationRule`].
fn validate_record(record: RawRuleRecord) -> Result<ClassificationRule, String> {
    let id = match record.id {
        Some(Value::String(s)) => RuleId::new(s).map_err(|e| e.to_string())?,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => RuleId::from_numeric(i),
            None => return Err(format!("id is not an integer or string: {n}")),
        },
        Some(other) => return Err(format!("id has unsupported type: {other}")),
        None => return Err("missing id".to_string()),
    };

    let classification_code = match record.classification_code {
        Some(code) if !code.trim().is_empty() => code.trim().to_string(),
        Some(_) => return Err("classification_code is empty".to_string()),
        None => return Err("missing classification_code".to_string()),
    };

    let annex_reference = match record.annex_reference {
        Some(raw) => Some(AnnexId::new(raw).map_err(|e| e.to_string())?),
        None => None,
    };

    if let (Some(from), Some(to)) = (record.valid_from, record.valid_to) {
        if from > to {
            return Err(format!("validity window inverted: {from} > {to}"));
        }
    }

    Ok(ClassificationRule {
        id,
        classification_code,
        annex_reference,
        conditions: record.conditions,
        catch_all: record.catch_all,
        description: record.description,
        valid_from: record.valid_from,
        valid_to: record.valid_to,
        extra: record.extra,
    })
}
