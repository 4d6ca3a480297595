//! Case Intake Normalizer
//!
//! Turns a raw intake submission (free-text summary, case type, exhibit
//! uploads) into a normalized [`Case`]: counts matched from the charge
//! rule tables, flattened element and defense lists, and parties,
//! witnesses, and exhibits extracted with surface heuristics.
//!
//! Name extraction is deliberately shallow (capitalized First Last pairs
//! near role indicators); anything it misses is edited downstream.

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::info;
use uuid::Uuid;

use crate::rules::charges::{compiled_civil, compiled_criminal, CIVIL_CLAIMS, CRIMINAL_CHARGES};
use crate::types::{
    Case, CaseStatus, CaseType, Count, Defense, Element, Exhibit, ExhibitStatus, Party, PartySide,
    Witness, WitnessType,
};

/// Raw intake submission
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IntakeRequest {
    /// Caller-supplied case id; generated when absent
    pub id: Option<String>,
    #[serde(default)]
    pub case_type: CaseType,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub exhibits: Vec<ExhibitInput>,
}

/// One uploaded exhibit, before court codes are assigned
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExhibitInput {
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Free-form kind; defaults to "document"
    pub kind: Option<String>,
}

/// Normalize an intake submission into a structured case.
pub fn normalize_intake(request: &IntakeRequest) -> Case {
    let counts = parse_counts(&request.summary, request.case_type);

    let elements = counts
        .iter()
        .flat_map(|count| {
            count
                .elements
                .iter()
                .map(|name| Element::new(name, &count.label))
        })
        .collect();
    let defenses = counts
        .iter()
        .flat_map(|count| {
            count
                .defenses
                .iter()
                .map(|name| Defense::new(name, &count.label))
        })
        .collect();

    let case = Case {
        id: request
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        case_type: request.case_type,
        summary: request.summary.clone(),
        counts,
        elements,
        defenses,
        parties: parse_parties(&request.summary, request.case_type),
        witnesses: parse_witnesses(&request.summary),
        exhibits: parse_exhibits(&request.exhibits),
        status: CaseStatus::Normalized,
        normalized_at: Some(Utc::now()),
    };

    info!(
        case_id = %case.id,
        case_type = %case.case_type,
        counts = case.counts.len(),
        witnesses = case.witnesses.len(),
        "case normalized"
    );
    case
}

/// Match charge/claim patterns against the summary, in table order.
fn parse_counts(summary: &str, case_type: CaseType) -> Vec<Count> {
    let (rules, regexes, noun) = match case_type {
        CaseType::Criminal => (CRIMINAL_CHARGES, compiled_criminal(), "Charge"),
        CaseType::Civil => (CIVIL_CLAIMS, compiled_civil(), "Claim"),
    };

    rules
        .iter()
        .zip(regexes)
        .filter(|(_, regex)| regex.is_match(summary))
        .map(|(rule, _)| Count {
            label: rule.label.to_string(),
            description: format!("{noun} of {}", rule.label.to_lowercase()),
            burden: rule.burden,
            elements: rule.elements.iter().map(|e| (*e).to_string()).collect(),
            defenses: rule.defenses.iter().map(|d| (*d).to_string()).collect(),
        })
        .collect()
}

fn name_regexes() -> &'static [Regex; 2] {
    static CACHE: OnceLock<[Regex; 2]> = OnceLock::new();
    #[allow(clippy::expect_used)]
    CACHE.get_or_init(|| {
        [
            Regex::new(r"[A-Z][a-z]+ [A-Z]\. [A-Z][a-z]+").expect("name pattern must compile"),
            Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+").expect("name pattern must compile"),
        ]
    })
}

/// Capitalized name pairs in first-appearance order, deduplicated.
fn extract_names(text: &str) -> Vec<String> {
    let mut names: Vec<(usize, String)> = Vec::new();
    for regex in name_regexes() {
        for m in regex.find_iter(text) {
            if !names.iter().any(|(_, n)| n == m.as_str()) {
                names.push((m.start(), m.as_str().to_string()));
            }
        }
    }
    names.sort_by_key(|(start, _)| *start);
    names.into_iter().map(|(_, n)| n).collect()
}

/// First extracted name takes the moving side, second the responding side.
fn parse_parties(summary: &str, case_type: CaseType) -> Vec<Party> {
    let names = extract_names(summary);
    let mut parties = Vec::new();

    let (first_side, first_role, second_side) = match case_type {
        CaseType::Criminal => (PartySide::Prosecution, "prosecutor", PartySide::Defense),
        CaseType::Civil => (PartySide::Plaintiff, "plaintiff", PartySide::Defendant),
    };

    if let Some(name) = names.first() {
        parties.push(Party {
            name: name.clone(),
            side: first_side,
            role: first_role.to_string(),
        });
    }
    if let Some(name) = names.get(1) {
        parties.push(Party {
            name: name.clone(),
            side: second_side,
            role: "defendant".to_string(),
        });
    }
    parties
}

const WITNESS_INDICATORS: &[&str] = &[
    r"witness(?:es)?",
    r"testified",
    r"saw",
    r"observed",
    r"heard",
    r"reported",
];

fn witness_regexes() -> &'static Vec<Regex> {
    static CACHE: OnceLock<Vec<Regex>> = OnceLock::new();
    #[allow(clippy::expect_used)]
    CACHE.get_or_init(|| {
        WITNESS_INDICATORS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")).expect("witness pattern must compile"))
            .collect()
    })
}

/// Names within a 50-character window of a witness indicator word.
fn parse_witnesses(summary: &str) -> Vec<Witness> {
    let mut witnesses: Vec<Witness> = Vec::new();

    for regex in witness_regexes() {
        for m in regex.find_iter(summary) {
            let start = m.start().saturating_sub(50);
            let end = (m.end() + 50).min(summary.len());
            // Snap to char boundaries so slicing cannot split a code point.
            let start = (0..=start).rev().find(|i| summary.is_char_boundary(*i)).unwrap_or(0);
            let end = (end..=summary.len())
                .find(|i| summary.is_char_boundary(*i))
                .unwrap_or(summary.len());

            for name in extract_names(&summary[start..end]) {
                if !witnesses.iter().any(|w| w.name == name) {
                    witnesses.push(Witness {
                        id: name.to_lowercase().replace([' ', '.'], "_"),
                        name,
                        witness_type: WitnessType::Lay,
                        credibility_notes: "Identified from case summary".to_string(),
                    });
                }
            }
        }
    }
    witnesses
}

/// Court code for the i-th exhibit: A..Z, then AA, BB, ...
fn exhibit_code(index: usize) -> String {
    let letter = char::from(b'A' + (index % 26) as u8);
    let repeats = index / 26 + 1;
    format!("Exhibit {}", letter.to_string().repeat(repeats))
}

fn parse_exhibits(inputs: &[ExhibitInput]) -> Vec<Exhibit> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let code = exhibit_code(i);
            Exhibit {
                title: input.title.clone().unwrap_or_else(|| code.clone()),
                code,
                description: input.description.clone(),
                kind: input.kind.clone().unwrap_or_else(|| "document".to_string()),
                status: ExhibitStatus::Pending,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Burden, ElementStatus};

    fn criminal_request(summary: &str) -> IntakeRequest {
        IntakeRequest {
            id: Some("case-1".to_string()),
            case_type: CaseType::Criminal,
            summary: summary.to_string(),
            exhibits: Vec::new(),
        }
    }

    #[test]
    fn test_criminal_counts_from_summary() {
        let case = normalize_intake(&criminal_request(
            "The defendant is accused of theft after goods were stolen, \
             and of assault during the arrest",
        ));

        assert_eq!(case.counts.len(), 2);
        assert_eq!(case.counts[0].label, "Theft");
        assert_eq!(case.counts[0].description, "Charge of theft");
        assert_eq!(case.counts[0].burden, Burden::BeyondReasonableDoubt);
        assert_eq!(case.counts[1].label, "Assault");
        assert_eq!(case.status, CaseStatus::Normalized);
        assert!(case.normalized_at.is_some());
    }

    #[test]
    fn test_elements_flattened_unmet_per_count() {
        let case = normalize_intake(&criminal_request("A clear case of theft"));
        assert_eq!(case.elements.len(), 4);
        for element in &case.elements {
            assert_eq!(element.count_id, "Theft");
            assert_eq!(element.status, ElementStatus::Unmet);
        }
        assert_eq!(case.elements[3].name, "intent_to_deprive");
        assert_eq!(case.elements[3].description, "Element: Intent To Deprive");
        // One Defense record per shared criminal defense
        assert_eq!(case.defenses.len(), 5);
    }

    #[test]
    fn test_civil_claims_and_burden() {
        let request = IntakeRequest {
            case_type: CaseType::Civil,
            summary: "Plaintiff alleges negligence and breach of contract".to_string(),
            ..IntakeRequest::default()
        };
        let case = normalize_intake(&request);

        // Table order, not summary order.
        assert_eq!(case.counts[0].label, "Breach of Contract");
        assert_eq!(case.counts[0].description, "Claim of breach of contract");
        assert_eq!(case.counts[1].label, "Negligence");
        for count in &case.counts {
            assert_eq!(count.burden, Burden::Preponderance);
        }
    }

    #[test]
    fn test_unmatched_summary_yields_no_counts() {
        let case = normalize_intake(&criminal_request("A dispute over a parking space"));
        assert!(case.counts.is_empty());
        assert!(case.elements.is_empty());
    }

    #[test]
    fn test_party_roles_criminal() {
        let case = normalize_intake(&criminal_request(
            "John Smith alleges that Robert Jones committed theft",
        ));
        assert_eq!(case.parties.len(), 2);
        assert_eq!(case.parties[0].name, "John Smith");
        assert_eq!(case.parties[0].side, PartySide::Prosecution);
        assert_eq!(case.parties[1].name, "Robert Jones");
        assert_eq!(case.parties[1].side, PartySide::Defense);
    }

    #[test]
    fn test_party_roles_civil() {
        let request = IntakeRequest {
            case_type: CaseType::Civil,
            summary: "Alice Brown sued Carol White for negligence".to_string(),
            ..IntakeRequest::default()
        };
        let case = normalize_intake(&request);
        assert_eq!(case.parties[0].side, PartySide::Plaintiff);
        assert_eq!(case.parties[1].side, PartySide::Defendant);
    }

    #[test]
    fn test_witness_extraction_near_indicator() {
        let case = normalize_intake(&criminal_request(
            "The theft was observed by Mary Green, who testified at the scene",
        ));
        assert_eq!(case.witnesses.len(), 1);
        assert_eq!(case.witnesses[0].name, "Mary Green");
        assert_eq!(case.witnesses[0].id, "mary_green");
        assert_eq!(case.witnesses[0].witness_type, WitnessType::Lay);
    }

    #[test]
    fn test_witnesses_deduplicated() {
        let case = normalize_intake(&criminal_request(
            "Mary Green saw the theft. Later, Mary Green testified about it.",
        ));
        assert_eq!(case.witnesses.len(), 1);
    }

    #[test]
    fn test_exhibit_codes_assigned_in_order() {
        let request = IntakeRequest {
            case_type: CaseType::Criminal,
            summary: "theft".to_string(),
            exhibits: vec![
                ExhibitInput {
                    title: Some("Security footage".to_string()),
                    kind: Some("video".to_string()),
                    ..ExhibitInput::default()
                },
                ExhibitInput::default(),
            ],
            ..IntakeRequest::default()
        };
        let case = normalize_intake(&request);

        assert_eq!(case.exhibits[0].code, "Exhibit A");
        assert_eq!(case.exhibits[0].title, "Security footage");
        assert_eq!(case.exhibits[0].kind, "video");
        assert_eq!(case.exhibits[0].status, ExhibitStatus::Pending);
        assert_eq!(case.exhibits[1].code, "Exhibit B");
        assert_eq!(case.exhibits[1].title, "Exhibit B");
        assert_eq!(case.exhibits[1].kind, "document");
    }

    #[test]
    fn test_exhibit_codes_wrap_past_z() {
        assert_eq!(exhibit_code(0), "Exhibit A");
        assert_eq!(exhibit_code(25), "Exhibit Z");
        assert_eq!(exhibit_code(26), "Exhibit AA");
    }

    #[test]
    fn test_generated_id_when_absent() {
        let case = normalize_intake(&IntakeRequest {
            summary: "theft".to_string(),
            ..IntakeRequest::default()
        });
        assert!(!case.id.is_empty());
    }
}
