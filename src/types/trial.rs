//! Trial state types: TrialPhase, Turn, TrialState

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::case::ElementStatus;
use super::rulings::Objection;

// ============================================================================
// Trial Phase
// ============================================================================

/// Ordered phases of a trial.
///
/// Transitions are strictly one-directional along the declared chain —
/// no cycles, no skipping. `allowed_next()` is the single source of truth
/// for the adjacency table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrialPhase {
    #[default]
    Openings,
    WitnessExamination,
    Closings,
    Instructions,
    Deliberation,
    Verdict,
    Sentencing,
    TrialComplete,
}

impl TrialPhase {
    /// The only phase legally reachable from this one, if any.
    pub fn allowed_next(&self) -> Option<TrialPhase> {
        match self {
            TrialPhase::Openings => Some(TrialPhase::WitnessExamination),
            TrialPhase::WitnessExamination => Some(TrialPhase::Closings),
            TrialPhase::Closings => Some(TrialPhase::Instructions),
            TrialPhase::Instructions => Some(TrialPhase::Deliberation),
            TrialPhase::Deliberation => Some(TrialPhase::Verdict),
            TrialPhase::Verdict => Some(TrialPhase::Sentencing),
            TrialPhase::Sentencing => Some(TrialPhase::TrialComplete),
            TrialPhase::TrialComplete => None,
        }
    }

    /// Snake_case identifier as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialPhase::Openings => "openings",
            TrialPhase::WitnessExamination => "witness_examination",
            TrialPhase::Closings => "closings",
            TrialPhase::Instructions => "instructions",
            TrialPhase::Deliberation => "deliberation",
            TrialPhase::Verdict => "verdict",
            TrialPhase::Sentencing => "sentencing",
            TrialPhase::TrialComplete => "trial_complete",
        }
    }

    /// Display name with spaces for courtroom narration
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Parse from wire identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openings" => Some(TrialPhase::Openings),
            "witness_examination" => Some(TrialPhase::WitnessExamination),
            "closings" => Some(TrialPhase::Closings),
            "instructions" => Some(TrialPhase::Instructions),
            "deliberation" => Some(TrialPhase::Deliberation),
            "verdict" => Some(TrialPhase::Verdict),
            "sentencing" => Some(TrialPhase::Sentencing),
            "trial_complete" => Some(TrialPhase::TrialComplete),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Examination Mode & Speaker
// ============================================================================

/// Witness examination mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExaminationMode {
    #[default]
    Direct,
    Cross,
    Redirect,
    Recross,
}

impl ExaminationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExaminationMode::Direct => "direct",
            ExaminationMode::Cross => "cross",
            ExaminationMode::Redirect => "redirect",
            ExaminationMode::Recross => "recross",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Some(ExaminationMode::Direct),
            "cross" => Some(ExaminationMode::Cross),
            "redirect" => Some(ExaminationMode::Redirect),
            "recross" => Some(ExaminationMode::Recross),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExaminationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who spoke a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    #[default]
    Judge,
    Prosecutor,
    DefenseCounsel,
    PlaintiffCounsel,
    Witness,
    Clerk,
}

// ============================================================================
// Turn
// ============================================================================

/// A single transcript entry.
///
/// Immutable once appended — turns are never edited or removed, only
/// appended; the turn log is ordered by `timestamp_ms`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub id: Uuid,
    pub case_id: String,
    pub phase: TrialPhase,
    pub speaker: Speaker,
    pub witness_id: Option<String>,
    pub count_id: Option<String>,
    pub text: String,
    /// Logical monotonic timestamp (milliseconds)
    pub timestamp_ms: i64,
    /// Free-form metadata (transition markers, examination flags, ...)
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new turn; id and timestamps are assigned
/// by the state machine on append.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TurnData {
    pub speaker: Speaker,
    pub witness_id: Option<String>,
    pub count_id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

// ============================================================================
// Trial State
// ============================================================================

/// Trial lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    #[default]
    TrialStarted,
    TrialComplete,
}

/// Per-element coverage record kept in `TrialState::element_coverage`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageRecord {
    pub status: ElementStatus,
    /// Coverage percentage (0-100) from the turn that established it
    pub score: f64,
    /// Turn that established coverage
    pub turn_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Full mutable trial state, owned by the trial director.
///
/// All mutation goes through `director` operations; turn and objection logs
/// are append-only. Operations on the same `TrialState` must be serialized
/// by the caller (single-writer discipline).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialState {
    pub trial_id: Uuid,
    pub case_id: String,
    pub status: TrialStatus,
    pub phase: TrialPhase,
    pub current_witness: Option<String>,
    pub current_examination_mode: Option<ExaminationMode>,
    pub phase_start: DateTime<Utc>,
    pub turns: Vec<Turn>,
    pub objections: Vec<Objection>,
    /// Admitted exhibit codes (set semantics, append-only)
    pub exhibits_admitted: BTreeSet<String>,
    /// Element name → coverage record; upgrades only, never downgrades
    pub element_coverage: BTreeMap<String, CoverageRecord>,
}

impl TrialState {
    /// Create a fresh state in `openings` with empty logs
    pub fn new(case_id: &str) -> Self {
        Self {
            trial_id: Uuid::new_v4(),
            case_id: case_id.to_string(),
            status: TrialStatus::TrialStarted,
            phase: TrialPhase::Openings,
            current_witness: None,
            current_examination_mode: None,
            phase_start: Utc::now(),
            turns: Vec::new(),
            objections: Vec::new(),
            exhibits_admitted: BTreeSet::new(),
            element_coverage: BTreeMap::new(),
        }
    }
}

/// Progress snapshot produced by `director::trial_summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialSummary {
    pub case_id: String,
    pub current_phase: TrialPhase,
    pub total_turns: usize,
    pub total_objections: usize,
    pub witnesses_examined: usize,
    pub exhibits_admitted: usize,
    /// Fraction of case elements covered so far, as a percentage
    pub element_coverage_percentage: f64,
    pub last_activity: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_chain_is_linear_and_terminal() {
        let mut phase = TrialPhase::Openings;
        let mut seen = vec![phase];
        while let Some(next) = phase.allowed_next() {
            assert!(!seen.contains(&next), "phase chain must not cycle");
            seen.push(next);
            phase = next;
        }
        assert_eq!(phase, TrialPhase::TrialComplete);
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_phase_parse_round_trip() {
        for phase in [
            TrialPhase::Openings,
            TrialPhase::WitnessExamination,
            TrialPhase::Closings,
            TrialPhase::Instructions,
            TrialPhase::Deliberation,
            TrialPhase::Verdict,
            TrialPhase::Sentencing,
            TrialPhase::TrialComplete,
        ] {
            assert_eq!(TrialPhase::parse(phase.as_str()), Some(phase));
        }
        assert_eq!(TrialPhase::parse("recess"), None);
    }

    #[test]
    fn test_new_trial_state_starts_in_openings() {
        let state = TrialState::new("case-1");
        assert_eq!(state.phase, TrialPhase::Openings);
        assert_eq!(state.status, TrialStatus::TrialStarted);
        assert!(state.turns.is_empty());
        assert!(state.element_coverage.is_empty());
    }
}
