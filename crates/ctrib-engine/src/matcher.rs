//! Classification matching over a snapshot.
//!
//! `classify` is a pure function of (snapshot, query). Candidate selection
//! runs in three stages: condition filtering, mechanism resolution
//! (annex lookup or direct condition), and specificity ranking. A top-rank
//! tie yields `ambiguous = true` with every tied candidate listed — the
//! engine does not invent a winner where the tables define none.

use serde::{Deserialize, Serialize};

use ctrib_core::{MerchandiseCode, RuleId};
use ctrib_pack::{ClassificationRule, CONDITION_MERCHANDISE_PREFIX};

use crate::error::{EngineError, EngineResult};
use crate::fallback::{self, DescriptionHint};
use crate::query::ProductQuery;
use crate::snapshot::Snapshot;

/// Which mechanism produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedVia {
    /// The rule's conditions named a matching code prefix (or the rule is
    /// a catch-all default).
    DirectCondition,
    /// The rule's annex reference resolved and the annex covers the code.
    AnnexLookup,
    /// No rule matched.
    None,
}

impl std::fmt::Display for ResolvedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectCondition => write!(f, "direct_condition"),
            Self::AnnexLookup => write!(f, "annex_lookup"),
            Self::None => write!(f, "none"),
        }
    }
}

/// A rule that survived all conditions, with its match evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// The surviving rule.
    pub rule_id: RuleId,
    /// Mechanism that qualified it.
    pub resolved_via: ResolvedVia,
    /// Matched digit count; longer is more specific. Catch-all rules
    /// score zero.
    pub specificity: usize,
    /// The digit prefix that matched, when one did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_prefix: Option<String>,
}

/// The matcher's output.
///
/// "No match" and "ambiguous" are result states, distinguishable from each
/// other and from a definitive match without exception handling:
/// `resolved_via == None` means nothing qualified; `ambiguous == true`
/// means several rules tied at the top specificity and `matched_rule_id`
/// is withheld rather than picked arbitrarily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The normalized query code.
    pub merchandise_code: String,
    /// The winning rule, absent when nothing matched or the top rank tied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule_id: Option<RuleId>,
    /// Mechanism of the best-ranked candidate.
    pub resolved_via: ResolvedVia,
    /// Whether the top specificity was shared by several candidates.
    pub ambiguous: bool,
    /// Every surviving candidate, most specific first (diagnostic, not
    /// authoritative).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    /// Description-overlap suggestions, populated only on no-match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description_hints: Vec<DescriptionHint>,
}

impl MatchResult {
    /// Whether exactly one rule won.
    pub fn is_definitive(&self) -> bool {
        self.matched_rule_id.is_some()
    }
}

impl Snapshot {
    /// Resolve a product query against this snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidQuery`] when the merchandise code is
    /// missing or malformed. All other outcomes — including "no rule
    /// matched" — are expressed as [`MatchResult`] states.
    pub fn classify(&self, query: &ProductQuery) -> EngineResult<MatchResult> {
        let code = MerchandiseCode::new(query.merchandise_code.as_str()).map_err(|e| {
            EngineError::InvalidQuery {
                detail: e.to_string(),
            }
        })?;

        let mut candidates = Vec::new();
        for rule in self.rules().iter() {
            if !rule.applies_on(query.as_of) {
                continue;
            }
            if !context_conditions_hold(rule, query) {
                continue;
            }
            if let Some(candidate) = self.qualify(rule, &code) {
                candidates.push(candidate);
            }
        }

        candidates.sort_by(|a, b| {
            b.specificity
                .cmp(&a.specificity)
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });

        let result = if candidates.is_empty() {
            let description_hints = query
                .description
                .as_deref()
                .map(|d| fallback::hints_for(self.rules(), d))
                .unwrap_or_default();
            MatchResult {
                merchandise_code: code.digits().to_string(),
                matched_rule_id: None,
                resolved_via: ResolvedVia::None,
                ambiguous: false,
                candidates,
                description_hints,
            }
        } else {
            let top_specificity = candidates[0].specificity;
            let top_rule_id = candidates[0].rule_id.clone();
            let top_via = candidates[0].resolved_via;
            let tied = candidates
                .iter()
                .filter(|c| c.specificity == top_specificity)
                .count();
            let ambiguous = tied > 1;
            MatchResult {
                merchandise_code: code.digits().to_string(),
                matched_rule_id: (!ambiguous).then_some(top_rule_id),
                resolved_via: top_via,
                ambiguous,
                candidates,
                description_hints: Vec::new(),
            }
        };

        tracing::debug!(
            code = %result.merchandise_code,
            resolved_via = %result.resolved_via,
            ambiguous = result.ambiguous,
            candidates = result.candidates.len(),
            "query classified"
        );
        Ok(result)
    }

    /// Resolve a rule's mechanism against the query code.
    fn qualify(&self, rule: &ClassificationRule, code: &MerchandiseCode) -> Option<Candidate> {
        // An explicit code-prefix condition binds regardless of mechanism.
        let prefix_condition = rule
            .conditions
            .get(CONDITION_MERCHANDISE_PREFIX)
            .map(|raw| MerchandiseCode::normalize_pattern(raw));
        if let Some(ref prefix) = prefix_condition {
            if !code.has_prefix(prefix) {
                return None;
            }
        }

        if let Some(annex_id) = rule.annex_reference {
            if !self.annex_index().contains_annex(annex_id) {
                // Tolerated inconsistency; counted in the snapshot
                // diagnostics at build time.
                tracing::trace!(rule_id = %rule.id, annex = %annex_id, "annex reference unresolved");
                return None;
            }
            let matched = self.annex_index().longest_prefix_match(annex_id, code)?;
            return Some(Candidate {
                rule_id: rule.id.clone(),
                resolved_via: ResolvedVia::AnnexLookup,
                specificity: matched.len(),
                matched_prefix: Some(matched.to_string()),
            });
        }

        if let Some(prefix) = prefix_condition {
            return Some(Candidate {
                rule_id: rule.id.clone(),
                resolved_via: ResolvedVia::DirectCondition,
                specificity: prefix.len(),
                matched_prefix: Some(prefix),
            });
        }

        rule.catch_all.then(|| Candidate {
            rule_id: rule.id.clone(),
            resolved_via: ResolvedVia::DirectCondition,
            specificity: 0,
            matched_prefix: None,
        })
    }
}

/// Whether every context condition on the rule is satisfied by the query.
///
/// Strict: a condition on an attribute the query context does not supply
/// is unsatisfied. The reserved code-prefix key is handled by mechanism
/// resolution, not here. Comparison trims and ignores ASCII case, matching
/// how the upstream tables mix capitalization.
fn context_conditions_hold(rule: &ClassificationRule, query: &ProductQuery) -> bool {
    rule.conditions
        .iter()
        .filter(|(key, _)| key.as_str() != CONDITION_MERCHANDISE_PREFIX)
        .all(|(key, expected)| {
            query
                .context
                .get(key)
                .is_some_and(|actual| actual.trim().eq_ignore_ascii_case(expected.trim()))
        })
}
