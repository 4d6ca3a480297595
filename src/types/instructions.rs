//! Jury instruction types: InstructionSet, VerdictForm

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ordered instruction section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstructionSection {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Sort key; standard sections use fixed slots, deliberation sorts last
    pub order: u32,
}

/// Special finding attached to a count on the verdict form
/// (sentencing enhancements, damages amounts)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpecialFinding {
    pub name: String,
    /// "choice" with options, or "amount" for damages
    pub kind: String,
    pub options: Vec<String>,
    pub required: bool,
}

/// Per-count section of the verdict form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountForm {
    pub count_number: u32,
    pub count_name: String,
    pub elements: Vec<String>,
    pub verdict_options: Vec<String>,
    pub special_findings: Vec<SpecialFinding>,
}

/// Verdict form handed to the jury alongside the instructions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerdictForm {
    pub id: Uuid,
    pub counts: Vec<CountForm>,
    pub total_verdicts: usize,
}

/// Complete generated instruction set for a case.
///
/// Publishing the set opens the deliberation gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstructionSet {
    pub id: Uuid,
    pub case_id: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<InstructionSection>,
    pub verdict_form: VerdictForm,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}
