//! Element Coverage Tracker
//!
//! Scores keyword overlap between a turn's text and the case's element
//! list, and marks elements "covered" above a threshold. This is surface
//! pattern matching only — no NLU.
//!
//! Scoring: an element's underscore-delimited name is split into keyword
//! tokens; coverage percentage = matched_tokens / total_tokens * 100; the
//! element is covered when the percentage exceeds the configured threshold
//! (default 50).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{CoverageRecord, Element, ElementStatus, Turn};

/// Default threshold when no config has been initialized
pub const DEFAULT_COVERED_THRESHOLD_PCT: f64 = 50.0;

fn cfg_covered_threshold() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().coverage.covered_threshold_pct
    } else {
        DEFAULT_COVERED_THRESHOLD_PCT
    }
}

/// One element-coverage update produced by a turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementUpdate {
    pub element_name: String,
    pub record: CoverageRecord,
}

/// Score a turn against the case's element list.
///
/// Returns one update per element whose coverage percentage exceeds the
/// threshold. Elements already covered are skipped — coverage transitions
/// are one-directional and the first covering turn keeps the credit.
pub fn analyze_element_coverage(turn: &Turn, case_elements: &[Element]) -> Vec<ElementUpdate> {
    let turn_text = turn.text.to_lowercase();
    let threshold = cfg_covered_threshold();
    let mut updates = Vec::new();

    for element in case_elements {
        if element.status == ElementStatus::Covered {
            continue;
        }

        let keywords: Vec<&str> = element.name.split('_').filter(|k| !k.is_empty()).collect();
        if keywords.is_empty() {
            continue;
        }

        let matched = keywords.iter().filter(|k| turn_text.contains(**k)).count();
        if matched == 0 {
            continue;
        }

        #[allow(clippy::cast_precision_loss)]
        let coverage_percentage = (matched as f64 / keywords.len() as f64) * 100.0;
        if coverage_percentage > threshold {
            debug!(
                element = %element.name,
                score = coverage_percentage,
                turn_id = %turn.id,
                "element covered by turn"
            );
            updates.push(ElementUpdate {
                element_name: element.name.clone(),
                record: CoverageRecord {
                    status: ElementStatus::Covered,
                    score: coverage_percentage,
                    turn_id: turn.id,
                    timestamp: Utc::now(),
                },
            });
        }
    }

    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Speaker, TrialPhase};
    use uuid::Uuid;

    fn make_turn(text: &str) -> Turn {
        Turn {
            id: Uuid::new_v4(),
            case_id: "case-1".to_string(),
            phase: TrialPhase::WitnessExamination,
            speaker: Speaker::Witness,
            witness_id: None,
            count_id: None,
            text: text.to_string(),
            timestamp_ms: 0,
            meta: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_keyword_overlap_covers_element() {
        let turn = make_turn("The defendant took the wallet with clear intent to deprive the owner");
        let elements = vec![Element::new("intent_to_deprive", "Theft")];

        let updates = analyze_element_coverage(&turn, &elements);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].element_name, "intent_to_deprive");
        assert!((updates[0].record.score - 100.0).abs() < f64::EPSILON);
        assert_eq!(updates[0].record.status, ElementStatus::Covered);
    }

    #[test]
    fn test_partial_overlap_below_threshold_is_ignored() {
        // 1 of 4 keywords = 25% — below the 50% threshold
        let turn = make_turn("there was intent");
        let elements = vec![Element::new("intent_to_commit_felony", "Burglary")];

        let updates = analyze_element_coverage(&turn, &elements);
        assert!(updates.is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let turn = make_turn("The BREACH of the contract caused DAMAGES");
        let elements = vec![Element::new("breach", "Negligence")];

        let updates = analyze_element_coverage(&turn, &elements);
        assert_eq!(updates.len(), 1);
    }

    #[test]
    fn test_already_covered_elements_are_skipped() {
        let turn = make_turn("the taking was witnessed");
        let mut element = Element::new("taking", "Theft");
        element.status = ElementStatus::Covered;

        let updates = analyze_element_coverage(&turn, &[element]);
        assert!(updates.is_empty());
    }

    #[test]
    fn test_no_matches_yields_no_updates() {
        let turn = make_turn("counsel approached the bench");
        let elements = vec![
            Element::new("malice_aforethought", "Murder"),
            Element::new("unlawful_killing", "Murder"),
        ];
        assert!(analyze_element_coverage(&turn, &elements).is_empty());
    }
}
