//! Core case types: Case, Count, Element, Party, Witness, Exhibit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Case Type & Burden of Proof
// ============================================================================

/// Whether the case is prosecuted criminally or litigated civilly
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    #[default]
    Criminal,
    Civil,
}

impl CaseType {
    /// Parse from string (for API/config)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "criminal" => Some(CaseType::Criminal),
            "civil" => Some(CaseType::Civil),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseType::Criminal => write!(f, "criminal"),
            CaseType::Civil => write!(f, "civil"),
        }
    }
}

/// Standard of proof attached to a count
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Burden {
    /// Beyond a reasonable doubt (criminal)
    #[default]
    #[serde(rename = "BRD")]
    BeyondReasonableDoubt,
    /// Preponderance of the evidence (civil)
    #[serde(rename = "preponderance")]
    Preponderance,
}

impl std::fmt::Display for Burden {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Burden::BeyondReasonableDoubt => write!(f, "beyond a reasonable doubt"),
            Burden::Preponderance => write!(f, "a preponderance of the evidence"),
        }
    }
}

// ============================================================================
// Counts, Elements, Defenses
// ============================================================================

/// A single charge (criminal) or claim (civil) within a case
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Count {
    /// Short label, e.g. "Theft" or "Negligence". Doubles as count_id.
    pub label: String,
    pub description: String,
    pub burden: Burden,
    /// Element names required to prove this count
    pub elements: Vec<String>,
    /// Defense names available against this count
    pub defenses: Vec<String>,
}

/// Coverage status of a legally required element
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElementStatus {
    /// Not yet established by any turn
    #[default]
    Unmet,
    /// Established by turn testimony (one-directional — never reverts)
    Covered,
}

/// A legally required fact that must be established to prove a count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Underscore-delimited name, e.g. "intent_to_deprive"
    pub name: String,
    /// Label of the owning count
    pub count_id: String,
    pub status: ElementStatus,
    pub description: String,
    /// Keyword-overlap coverage percentage (0-100)
    pub coverage_score: f64,
}

impl Element {
    pub fn new(name: &str, count_id: &str) -> Self {
        Self {
            name: name.to_string(),
            count_id: count_id.to_string(),
            status: ElementStatus::Unmet,
            description: format!("Element: {}", title_case(name)),
            coverage_score: 0.0,
        }
    }
}

/// A defense available against a count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Defense {
    /// Underscore-delimited name, e.g. "self_defense"
    pub name: String,
    /// Label of the owning count
    pub count_id: String,
    pub description: String,
}

impl Defense {
    pub fn new(name: &str, count_id: &str) -> Self {
        Self {
            name: name.to_string(),
            count_id: count_id.to_string(),
            description: format!("Defense: {}", title_case(name)),
        }
    }
}

/// Convert an underscore-delimited name to Title Case for display.
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Parties, Witnesses, Exhibits
// ============================================================================

/// Side of the case a party belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartySide {
    Prosecution,
    Defense,
    Plaintiff,
    Defendant,
}

/// A named party in the case
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Party {
    pub name: String,
    pub side: PartySide,
    pub role: String,
}

/// Lay vs. expert witness — affects speculation objection rulings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WitnessType {
    #[default]
    Lay,
    Expert,
}

/// A witness available for examination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Witness {
    pub id: String,
    pub name: String,
    pub witness_type: WitnessType,
    pub credibility_notes: String,
}

/// Admission lifecycle of an exhibit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExhibitStatus {
    #[default]
    Pending,
    Admitted,
    Excluded,
}

/// Exhibit metadata supplied by the ingestion layer.
///
/// The core only tracks admission by id — storage and rendering of the
/// underlying file are external concerns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exhibit {
    /// Court code, e.g. "Exhibit A"
    pub code: String,
    pub title: String,
    pub description: String,
    /// Free-form kind ("document", "photo", ...)
    pub kind: String,
    pub status: ExhibitStatus,
}

// ============================================================================
// Case
// ============================================================================

/// Lifecycle status of a case
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Draft,
    Normalized,
    InTrial,
    Closed,
}

/// A fully normalized case.
///
/// Immutable once normalized except for `status` — trial progress lives in
/// `TrialState`, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub id: String,
    pub case_type: CaseType,
    /// Raw intake summary the counts/parties were extracted from
    pub summary: String,
    pub counts: Vec<Count>,
    /// Flattened element list across all counts
    pub elements: Vec<Element>,
    /// Flattened defense list across all counts
    pub defenses: Vec<Defense>,
    pub parties: Vec<Party>,
    pub witnesses: Vec<Witness>,
    pub exhibits: Vec<Exhibit>,
    pub status: CaseStatus,
    pub normalized_at: Option<DateTime<Utc>>,
}

impl Case {
    /// Look up a witness by id
    pub fn witness(&self, witness_id: &str) -> Option<&Witness> {
        self.witnesses.iter().find(|w| w.id == witness_id)
    }
}
