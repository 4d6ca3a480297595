//! Jury deliberation types: Juror, DeliberationRound, Verdict

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Jurors
// ============================================================================

/// How a juror weighs evidence during deliberation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliberationStyle {
    Analytical,
    Intuitive,
    Balanced,
}

impl DeliberationStyle {
    pub const ALL: [DeliberationStyle; 3] = [
        DeliberationStyle::Analytical,
        DeliberationStyle::Intuitive,
        DeliberationStyle::Balanced,
    ];
}

/// A juror's vote in a deliberation round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Guilty,
    NotGuilty,
    Undecided,
}

/// A single juror.
///
/// Identity, style, and influence factor are fixed at creation; belief and
/// confidence mutate across rounds. `current_belief` is `None` until the
/// first round draws a starting belief.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Juror {
    pub id: Uuid,
    /// 1..=jury_size, unique and contiguous within a deliberation
    pub juror_number: u32,
    /// Initial belief prior drawn in [0.1, 0.9]
    pub initial_prior: f64,
    /// Current belief in [0, 1]; unset before the first round
    pub current_belief: Option<f64>,
    /// Confidence in [0.3, 0.8] at creation, always within [0, 1]
    pub confidence: f64,
    pub deliberation_style: DeliberationStyle,
    /// Peer influence weight in [0.5, 1.5]
    pub influence_factor: f64,
    /// Vote history, one entry per round
    pub votes: Vec<Vote>,
    pub notes: Vec<String>,
}

// ============================================================================
// Rounds
// ============================================================================

/// Majority side of a round's votes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MajorityVote {
    Guilty,
    NotGuilty,
    Tie,
}

/// Per-juror belief update within a round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JurorUpdate {
    pub juror_id: Uuid,
    pub juror_number: u32,
    pub previous_belief: f64,
    pub new_belief: f64,
    /// Peer influence received this round, in [0, 0.2] per interaction
    pub influence_received: f64,
    pub vote: Vote,
}

/// One deliberation round. Immutable once computed; rounds are appended,
/// never replaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliberationRound {
    /// Monotonically increasing from 1
    pub round_number: u32,
    pub evidence_strength: f64,
    pub juror_updates: Vec<JurorUpdate>,
    /// max(guilty, not_guilty) / total votes
    pub consensus_level: f64,
    pub majority_vote: MajorityVote,
    pub unanimous: bool,
    /// Undecided fraction exceeded the hung-jury threshold
    pub hung_jury: bool,
    pub started_at: DateTime<Utc>,
}

// ============================================================================
// Deliberation State
// ============================================================================

/// Deliberation lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliberationStatus {
    #[default]
    Deliberating,
    /// Terminal — a verdict has been reached or max_rounds exhausted
    Complete,
}

/// Full deliberation state, created once at deliberation start.
///
/// Rounds are appended; the state is terminal once a verdict is reached or
/// `max_rounds` is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationState {
    pub id: Uuid,
    pub case_id: String,
    pub jury_size: u32,
    pub jurors: Vec<Juror>,
    pub rounds: Vec<DeliberationRound>,
    pub current_round: u32,
    /// Consensus level required for a verdict (default 0.8)
    pub consensus_threshold: f64,
    pub unanimity_required: bool,
    /// Hard round cap (default 20)
    pub max_rounds: u32,
    /// Undecided fraction above which a round flags hung jury (default 0.3)
    pub hung_jury_threshold: f64,
    pub status: DeliberationStatus,
    pub started_at: DateTime<Utc>,
}

// ============================================================================
// Convergence
// ============================================================================

/// Direction of the consensus trend over recent rounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceTrend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

/// What the convergence check recommends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceRecommendation {
    ReadyForVerdict,
    ContinueDeliberation,
    ConsiderHungJury,
}

/// Result of `deliberation::check_convergence`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvergenceReport {
    pub converged: bool,
    /// Mean consensus over the analyzed rounds
    pub convergence_level: f64,
    /// last - first consensus over the analyzed window
    pub consensus_trend: f64,
    pub trend: ConvergenceTrend,
    pub recommendation: ConvergenceRecommendation,
    pub rounds_analyzed: usize,
}

// ============================================================================
// Verdict
// ============================================================================

/// Terminal verdict outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Guilty,
    NotGuilty,
    HungJury,
}

/// Final verdict artifact. Once created the deliberation is closed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub id: Uuid,
    pub deliberation_id: Uuid,
    pub verdict: VerdictKind,
    pub guilty_votes: usize,
    pub not_guilty_votes: usize,
    pub total_votes: usize,
    /// 0 on an exact tie
    pub majority_size: usize,
    /// majority_size / total_votes (0 on tie)
    pub confidence: f64,
    pub unanimous: bool,
    pub hung_jury: bool,
    pub rationale: String,
    pub reached_at: DateTime<Utc>,
}

/// Progress snapshot of a deliberation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationSummary {
    pub deliberation_id: Uuid,
    pub case_id: String,
    pub total_rounds: usize,
    pub current_consensus: f64,
    pub majority_vote: Option<MajorityVote>,
    pub unanimous: bool,
    pub hung_jury: bool,
    pub status: DeliberationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Vote::NotGuilty).unwrap(), "\"not_guilty\"");
        assert_eq!(
            serde_json::to_string(&VerdictKind::HungJury).unwrap(),
            "\"hung_jury\""
        );
    }

    #[test]
    fn test_style_all_covers_every_variant() {
        assert_eq!(DeliberationStyle::ALL.len(), 3);
    }
}
