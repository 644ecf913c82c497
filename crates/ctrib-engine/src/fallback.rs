//! Description fallback: token-overlap hints against rule descriptions.
//!
//! When no rule matches a product's code, the free-text description can
//! still point an analyst at plausible rules. Hints are deliberately
//! non-authoritative: they never set `matched_rule_id` and are computed
//! only when the candidate list came back empty.

use serde::{Deserialize, Serialize};

use ctrib_core::RuleId;
use ctrib_pack::RuleStore;

/// Minimum overlap score for a hint to be reported.
const MIN_HINT_SCORE: f64 = 0.34;

/// Maximum number of hints reported per query.
const MAX_HINTS: usize = 5;

/// A non-authoritative suggestion derived from description overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionHint {
    /// The suggested rule.
    pub rule_id: RuleId,
    /// Overlap score (0.0 – 1.0).
    pub score: f64,
}

/// Score rules by description overlap, best first.
///
/// Ordering is deterministic: score descending, then rule id.
pub(crate) fn hints_for(rules: &RuleStore, description: &str) -> Vec<DescriptionHint> {
    let mut hints: Vec<DescriptionHint> = rules
        .iter()
        .filter_map(|rule| {
            let target = rule.description.as_deref()?;
            let score = overlap_score(description, target);
            (score >= MIN_HINT_SCORE).then(|| DescriptionHint {
                rule_id: rule.id.clone(),
                score,
            })
        })
        .collect();

    hints.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
    hints.truncate(MAX_HINTS);
    hints
}

/// Normalize a string for matching: lowercase, strip punctuation,
/// collapse whitespace.
fn normalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let cleaned: String = lower
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute an overlap score between two strings (0.0 – 1.0).
///
/// Exact normalized equality scores 1.0, containment of a meaningful
/// substring 0.9, otherwise token-set Jaccard similarity.
fn overlap_score(query: &str, target: &str) -> f64 {
    let q = normalize(query);
    let t = normalize(target);

    if q.is_empty() || t.is_empty() {
        return 0.0;
    }
    if q == t {
        return 1.0;
    }
    if q.len() >= 3 && (t.contains(&q) || q.contains(&t)) {
        return 0.9;
    }

    let q_tokens: std::collections::HashSet<&str> = q.split_whitespace().collect();
    let t_tokens: std::collections::HashSet<&str> = t.split_whitespace().collect();
    let overlap = q_tokens.intersection(&t_tokens).count();
    let total = q_tokens.union(&t_tokens).count();
    if total == 0 {
        0.0
    } else {
        overlap as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctrib_pack::ClassificationRule;
    use std::collections::BTreeMap;

    fn rule(id: &str, description: Option<&str>) -> ClassificationRule {
        ClassificationRule {
            id: RuleId::new(id).unwrap(),
            classification_code: "000".to_string(),
            annex_reference: None,
            conditions: BTreeMap::new(),
            catch_all: false,
            description: description.map(|s| s.to_string()),
            valid_from: None,
            valid_to: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn exact_description_scores_one() {
        assert_eq!(overlap_score("Arroz branco", "arroz branco"), 1.0);
    }

    #[test]
    fn substring_scores_high() {
        let score = overlap_score("arroz", "Arroz em grãos, polido");
        assert_eq!(score, 0.9);
    }

    #[test]
    fn disjoint_descriptions_score_zero() {
        assert_eq!(overlap_score("refrigerante cola", "leite em pó"), 0.0);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(overlap_score("", "arroz"), 0.0);
        assert_eq!(overlap_score("arroz", ""), 0.0);
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("ARROZ, Tipo-1 (5KG)"), "arroz tipo 1 5kg");
    }

    #[test]
    fn hints_skip_rules_without_description() {
        let store = RuleStore::from_rules(vec![
            rule("R1", Some("Arroz beneficiado")),
            rule("R2", None),
        ]);
        let hints = hints_for(&store, "arroz beneficiado");
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].rule_id.as_str(), "R1");
    }

    #[test]
    fn hints_are_score_ordered_then_id_ordered() {
        let store = RuleStore::from_rules(vec![
            rule("R2", Some("feijão preto embalado")),
            rule("R1", Some("feijão preto embalado")),
            rule("R3", Some("feijão")),
        ]);
        let hints = hints_for(&store, "feijão preto embalado");
        assert_eq!(hints[0].rule_id.as_str(), "R1");
        assert_eq!(hints[1].rule_id.as_str(), "R2");
    }

    #[test]
    fn low_overlap_is_filtered_out() {
        let store = RuleStore::from_rules(vec![rule(
            "R1",
            Some("serviço de transporte rodoviário interestadual de cargas"),
        )]);
        let hints = hints_for(&store, "chocolate");
        assert!(hints.is_empty());
    }

    #[test]
    fn hint_count_is_capped() {
        let rules: Vec<ClassificationRule> = (0..10)
            .map(|i| rule(&format!("R{i}"), Some("água mineral natural")))
            .collect();
        let store = RuleStore::from_rules(rules);
        let hints = hints_for(&store, "água mineral natural");
        assert_eq!(hints.len(), 5);
    }
}
