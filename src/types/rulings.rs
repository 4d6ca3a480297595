//! Ruling record types: objections, motions, and their request shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::case::WitnessType;
use super::trial::{ExaminationMode, TrialPhase};

// ============================================================================
// Trial Context
// ============================================================================

/// Context carried alongside objection requests and suggestions.
///
/// Everything is optional — suggestion scoring and ruling overrides only
/// look at the fields they need.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TrialContext {
    pub case_id: Option<String>,
    pub turn_id: Option<Uuid>,
    pub phase: Option<TrialPhase>,
    pub examination_mode: Option<ExaminationMode>,
    pub witness_type: Option<WitnessType>,
}

// ============================================================================
// Objections
// ============================================================================

/// Judge's ruling on an objection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectionRuling {
    Sustained,
    Overruled,
}

impl std::fmt::Display for ObjectionRuling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectionRuling::Sustained => write!(f, "sustained"),
            ObjectionRuling::Overruled => write!(f, "overruled"),
        }
    }
}

/// Ephemeral suggestion produced per turn by the objection engine.
///
/// Not persisted unless a party actually raises the objection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectionSuggestion {
    pub id: Uuid,
    /// Legal ground, e.g. "Hearsay"
    pub ground: String,
    pub description: String,
    /// Match confidence in [0, 1]
    pub confidence: f64,
    /// The regex pattern that fired
    pub pattern_matched: String,
    /// Rule table key, e.g. "hearsay", "leading"
    pub objection_type: String,
    pub suggested_at: DateTime<Utc>,
}

/// Metadata embedded in an [`Objection`] record
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ObjectionMeta {
    pub context: TrialContext,
    /// Suggestion confidence at the time the objection was raised
    pub confidence: f64,
}

/// An objection raised by a party, with the judge's ruling.
///
/// Created once, immutable — part of the append-only ruling log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Objection {
    pub id: Uuid,
    pub case_id: Option<String>,
    pub turn_id: Option<Uuid>,
    pub ground: String,
    pub objecting_party: String,
    pub ruling: ObjectionRuling,
    pub ruling_text: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
    pub meta: ObjectionMeta,
}

/// Caller-supplied input to `objection::process_objection`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObjectionRequest {
    pub ground: String,
    #[serde(default)]
    pub context: TrialContext,
    #[serde(default)]
    pub turn_text: String,
    /// Defaults to "defense" when omitted
    pub objecting_party: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

/// Aggregate objection statistics for a case
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObjectionStats {
    pub case_id: String,
    pub total_objections: usize,
    pub sustained_count: usize,
    pub overruled_count: usize,
    /// Ground → occurrence count
    pub grounds_breakdown: std::collections::BTreeMap<String, usize>,
    pub most_common_ground: Option<String>,
    pub sustained_rate: f64,
}

// ============================================================================
// Motions
// ============================================================================

/// Recognized pre-trial motion kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    /// Motion in limine (exclude evidence before trial)
    #[default]
    Limine,
    /// Motion to suppress (unlawfully obtained evidence)
    Suppress,
    /// Motion for summary judgment
    SummaryJudgment,
    /// Motion to sever charges
    Sever,
}

impl MotionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionKind::Limine => "limine",
            MotionKind::Suppress => "suppress",
            MotionKind::SummaryJudgment => "summary_judgment",
            MotionKind::Sever => "sever",
        }
    }

    /// Parse from wire identifier. Unknown kinds return `None`; the engine
    /// falls back to the limine rule set (leniency policy, not an error).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "limine" => Some(MotionKind::Limine),
            "suppress" => Some(MotionKind::Suppress),
            "summary_judgment" => Some(MotionKind::SummaryJudgment),
            "sever" => Some(MotionKind::Sever),
            _ => None,
        }
    }

    /// Display name for ruling text, e.g. "Motion to suppress"
    pub fn display_name(&self) -> &'static str {
        match self {
            MotionKind::Limine => "Motion in limine",
            MotionKind::Suppress => "Motion to suppress",
            MotionKind::SummaryJudgment => "Motion for summary judgment",
            MotionKind::Sever => "Motion to sever",
        }
    }
}

impl std::fmt::Display for MotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a motion ruling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MotionStatus {
    Granted,
    Denied,
    GrantedInPart,
}

impl MotionStatus {
    /// Uppercase label used in ruling text
    pub fn ruling_label(&self) -> &'static str {
        match self {
            MotionStatus::Granted => "GRANTED",
            MotionStatus::Denied => "DENIED",
            MotionStatus::GrantedInPart => "GRANTED IN PART",
        }
    }
}

/// Caller-supplied input to `motion::process_motion`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MotionRequest {
    pub id: Option<Uuid>,
    /// Wire kind string; unknown values fall back to the limine rule set
    pub kind: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub filed_by: String,
}

/// A ruled pre-trial motion. Immutable once ruled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Motion {
    pub id: Uuid,
    pub case_id: String,
    pub kind: MotionKind,
    pub arguments: String,
    pub filed_by: String,
    pub status: MotionStatus,
    pub ruling: String,
    pub reasoning: String,
    pub processed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_kind_parse_and_fallback_contract() {
        assert_eq!(MotionKind::parse("suppress"), Some(MotionKind::Suppress));
        assert_eq!(
            MotionKind::parse("Summary_Judgment"),
            Some(MotionKind::SummaryJudgment)
        );
        // Unknown kinds are None — the engine handles the fallback.
        assert_eq!(MotionKind::parse("mistrial"), None);
    }

    #[test]
    fn test_motion_status_serde_snake_case() {
        let s = serde_json::to_string(&MotionStatus::GrantedInPart).unwrap();
        assert_eq!(s, "\"granted_in_part\"");
    }

    #[test]
    fn test_objection_ruling_display() {
        assert_eq!(ObjectionRuling::Sustained.to_string(), "sustained");
        assert_eq!(ObjectionRuling::Overruled.to_string(), "overruled");
    }
}
