//! Jury Deliberation Engine
//!
//! Simulates jury deliberation as rounds of belief updates. Each round
//! combines evidence strength with pairwise peer influence, derives every
//! juror's vote deterministically from their updated belief, and appends
//! an immutable round record. Convergence checks over the consensus series
//! recommend when to call for a verdict.
//!
//! All randomness (juror priors, starting beliefs) flows through an
//! injected `Rng`; a seeded generator reproduces an entire deliberation.

use chrono::Utc;
use rand::Rng;
use statrs::statistics::Statistics;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{
    ConvergenceRecommendation, ConvergenceReport, ConvergenceTrend, DeliberationRound,
    DeliberationState, DeliberationStatus, DeliberationStyle, DeliberationSummary, Juror,
    JurorUpdate, MajorityVote, Verdict, VerdictKind, Vote,
};

pub const MIN_JURY_SIZE: u32 = 2;
pub const MAX_JURY_SIZE: u32 = 24;

pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.8;
pub const DEFAULT_MAX_ROUNDS: u32 = 20;
pub const DEFAULT_HUNG_JURY_THRESHOLD: f64 = 0.3;
pub const DEFAULT_VOTE_EPSILON: f64 = 0.05;
pub const DEFAULT_EVIDENCE_WEIGHT: f64 = 0.6;
pub const DEFAULT_PEER_WEIGHT: f64 = 0.4;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.9;

/// Consensus delta treated as a real trend rather than noise
const TREND_BAND: f64 = 0.01;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliberationError {
    #[error("invalid deliberation input: {0}")]
    Validation(String),
}

fn cfg_consensus_threshold() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.consensus_threshold
    } else {
        DEFAULT_CONSENSUS_THRESHOLD
    }
}

fn cfg_unanimity_required() -> bool {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.unanimity_required
    } else {
        true
    }
}

fn cfg_max_rounds() -> u32 {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.max_rounds
    } else {
        DEFAULT_MAX_ROUNDS
    }
}

fn cfg_hung_jury_threshold() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.hung_jury_threshold
    } else {
        DEFAULT_HUNG_JURY_THRESHOLD
    }
}

fn cfg_vote_epsilon() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.vote_epsilon
    } else {
        DEFAULT_VOTE_EPSILON
    }
}

fn cfg_evidence_weight() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.evidence_weight
    } else {
        DEFAULT_EVIDENCE_WEIGHT
    }
}

fn cfg_peer_weight() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.peer_weight
    } else {
        DEFAULT_PEER_WEIGHT
    }
}

fn cfg_convergence_threshold() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().deliberation.convergence_threshold
    } else {
        DEFAULT_CONVERGENCE_THRESHOLD
    }
}

// ============================================================================
// Deliberation Lifecycle
// ============================================================================

/// Create a deliberation with `jury_size` jurors.
///
/// Priors are drawn in [0.1, 0.9], confidence in [0.3, 0.8], influence
/// factors in [0.5, 1.5]. Beliefs stay unset until the first round.
pub fn start_deliberation<R: Rng + ?Sized>(
    case_id: &str,
    jury_size: u32,
    rng: &mut R,
) -> Result<DeliberationState, DeliberationError> {
    if !(MIN_JURY_SIZE..=MAX_JURY_SIZE).contains(&jury_size) {
        return Err(DeliberationError::Validation(format!(
            "jury_size must be between {MIN_JURY_SIZE} and {MAX_JURY_SIZE}, got {jury_size}"
        )));
    }

    let jurors = (1..=jury_size)
        .map(|juror_number| Juror {
            id: Uuid::new_v4(),
            juror_number,
            initial_prior: rng.gen_range(0.1..=0.9),
            current_belief: None,
            confidence: rng.gen_range(0.3..=0.8),
            deliberation_style: DeliberationStyle::ALL[rng.gen_range(0..DeliberationStyle::ALL.len())],
            influence_factor: rng.gen_range(0.5..=1.5),
            votes: Vec::new(),
            notes: Vec::new(),
        })
        .collect();

    info!(case_id, jury_size, "deliberation started");

    Ok(DeliberationState {
        id: Uuid::new_v4(),
        case_id: case_id.to_string(),
        jury_size,
        jurors,
        rounds: Vec::new(),
        current_round: 0,
        consensus_threshold: cfg_consensus_threshold(),
        unanimity_required: cfg_unanimity_required(),
        max_rounds: cfg_max_rounds(),
        hung_jury_threshold: cfg_hung_jury_threshold(),
        status: DeliberationStatus::Deliberating,
        started_at: Utc::now(),
    })
}

/// Outcome of one pairwise juror interaction
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionResult {
    /// Juror number of the more influential side
    pub influencer: u32,
    /// Juror number of the side whose belief moved
    pub influenced: u32,
    /// Magnitude of the belief move, capped at 0.2
    pub influence_strength: f64,
    /// Influenced juror's belief after the move, clamped to [0, 1]
    pub new_belief: f64,
}

/// Pairwise interaction: influence = influence_factor * confidence, the
/// higher side influences the lower. The influenced belief moves toward
/// the influencer by min(0.2, |delta| * 0.3).
pub fn simulate_juror_interaction(a: &Juror, b: &Juror, _evidence_strength: f64) -> InteractionResult {
    let a_influence = a.influence_factor * a.confidence;
    let b_influence = b.influence_factor * b.confidence;

    let (influencer, influenced) = if a_influence > b_influence { (a, b) } else { (b, a) };

    let influencer_belief = influencer.current_belief.unwrap_or(0.5);
    let influenced_belief = influenced.current_belief.unwrap_or(0.5);

    let influence_strength = (influencer_belief - influenced_belief).abs() * 0.3;
    let influence_strength = influence_strength.min(0.2);

    let new_belief = if influencer_belief > influenced_belief {
        influenced_belief + influence_strength
    } else {
        influenced_belief - influence_strength
    };

    InteractionResult {
        influencer: influencer.juror_number,
        influenced: influenced.juror_number,
        influence_strength,
        new_belief: new_belief.clamp(0.0, 1.0),
    }
}

/// Deterministic vote from a belief value, with a dead band around 0.5.
/// Boundary beliefs count as decided despite float rounding.
pub fn vote_for_belief(belief: f64) -> Vote {
    let epsilon = cfg_vote_epsilon();
    if belief >= 0.5 + epsilon - 1e-9 {
        Vote::Guilty
    } else if belief <= 0.5 - epsilon + 1e-9 {
        Vote::NotGuilty
    } else {
        Vote::Undecided
    }
}

/// Run one deliberation round and append it to the state.
///
/// Jurors are paired in number order; each juror takes part in at most
/// one interaction per round and only the influenced side receives peer
/// influence. Votes follow beliefs deterministically.
pub fn process_deliberation_round<R: Rng + ?Sized>(
    state: &mut DeliberationState,
    evidence_strength: f64,
    rng: &mut R,
) -> Result<DeliberationRound, DeliberationError> {
    if state.status == DeliberationStatus::Complete {
        return Err(DeliberationError::Validation(
            "deliberation is already complete".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&evidence_strength) {
        return Err(DeliberationError::Validation(format!(
            "evidence_strength must be in [0, 1], got {evidence_strength}"
        )));
    }

    // First round draws a mid-range starting belief for unset jurors.
    for juror in &mut state.jurors {
        if juror.current_belief.is_none() {
            juror.current_belief = Some(rng.gen_range(0.2..=0.8));
        }
    }

    // Pair jurors in number order and collect influence per juror.
    let mut influence_received = vec![0.0_f64; state.jurors.len()];
    for pair in state.jurors.chunks(2) {
        if let [a, b] = pair {
            let interaction = simulate_juror_interaction(a, b, evidence_strength);
            let idx = (interaction.influenced - 1) as usize;
            influence_received[idx] = interaction.influence_strength;
        }
    }

    let evidence_weight = cfg_evidence_weight();
    let peer_weight = cfg_peer_weight();

    let mut juror_updates = Vec::with_capacity(state.jurors.len());
    for (juror, influence) in state.jurors.iter_mut().zip(&influence_received) {
        let previous_belief = juror.current_belief.unwrap_or(0.5);
        let new_belief = (previous_belief
            + evidence_strength * evidence_weight
            + influence * peer_weight)
            .clamp(0.0, 1.0);
        let vote = vote_for_belief(new_belief);

        juror.current_belief = Some(new_belief);
        juror.votes.push(vote);

        juror_updates.push(JurorUpdate {
            juror_id: juror.id,
            juror_number: juror.juror_number,
            previous_belief,
            new_belief,
            influence_received: *influence,
            vote,
        });
    }

    let guilty = juror_updates.iter().filter(|u| u.vote == Vote::Guilty).count();
    let not_guilty = juror_updates
        .iter()
        .filter(|u| u.vote == Vote::NotGuilty)
        .count();
    let undecided = juror_updates.len() - guilty - not_guilty;
    let total = juror_updates.len();

    #[allow(clippy::cast_precision_loss)]
    let consensus_level = guilty.max(not_guilty) as f64 / total as f64;
    let majority_vote = match guilty.cmp(&not_guilty) {
        std::cmp::Ordering::Greater => MajorityVote::Guilty,
        std::cmp::Ordering::Less => MajorityVote::NotGuilty,
        std::cmp::Ordering::Equal => MajorityVote::Tie,
    };
    #[allow(clippy::cast_precision_loss)]
    let hung_jury = undecided as f64 / total as f64 > state.hung_jury_threshold;

    let round = DeliberationRound {
        round_number: state.current_round + 1,
        evidence_strength,
        juror_updates,
        consensus_level,
        majority_vote,
        unanimous: guilty == total || not_guilty == total,
        hung_jury,
        started_at: Utc::now(),
    };

    debug!(
        round = round.round_number,
        consensus = round.consensus_level,
        ?majority_vote,
        "deliberation round processed"
    );

    state.current_round = round.round_number;
    state.rounds.push(round.clone());
    Ok(round)
}

// ============================================================================
// Convergence
// ============================================================================

/// Analyze the consensus series over the last three rounds.
pub fn check_convergence(rounds: &[DeliberationRound], threshold: f64) -> ConvergenceReport {
    if rounds.len() < 2 {
        return ConvergenceReport {
            converged: false,
            convergence_level: 0.0,
            consensus_trend: 0.0,
            trend: ConvergenceTrend::InsufficientData,
            recommendation: ConvergenceRecommendation::ContinueDeliberation,
            rounds_analyzed: rounds.len(),
        };
    }

    let recent = &rounds[rounds.len().saturating_sub(3)..];
    let consensus_levels: Vec<f64> = recent.iter().map(|r| r.consensus_level).collect();

    let convergence_level = consensus_levels.iter().mean();
    let consensus_trend = consensus_levels[consensus_levels.len() - 1] - consensus_levels[0];

    let converged = convergence_level >= threshold;
    let trend = if consensus_trend > TREND_BAND {
        ConvergenceTrend::Increasing
    } else if consensus_trend < -TREND_BAND {
        ConvergenceTrend::Decreasing
    } else {
        ConvergenceTrend::Stable
    };

    let recommendation = if converged {
        ConvergenceRecommendation::ReadyForVerdict
    } else if trend == ConvergenceTrend::Decreasing {
        ConvergenceRecommendation::ConsiderHungJury
    } else {
        ConvergenceRecommendation::ContinueDeliberation
    };

    ConvergenceReport {
        converged,
        convergence_level,
        consensus_trend,
        trend,
        recommendation,
        rounds_analyzed: recent.len(),
    }
}

// ============================================================================
// Verdict
// ============================================================================

/// Tally final votes into a terminal verdict. An exact guilty/not-guilty
/// tie is a hung jury with zero confidence.
pub fn reach_verdict(deliberation_id: Uuid, final_votes: &[Vote]) -> Verdict {
    let guilty_votes = final_votes.iter().filter(|v| **v == Vote::Guilty).count();
    let not_guilty_votes = final_votes.iter().filter(|v| **v == Vote::NotGuilty).count();
    let total_votes = final_votes.len();

    let (verdict, majority_size) = match guilty_votes.cmp(&not_guilty_votes) {
        std::cmp::Ordering::Greater => (VerdictKind::Guilty, guilty_votes),
        std::cmp::Ordering::Less => (VerdictKind::NotGuilty, not_guilty_votes),
        std::cmp::Ordering::Equal => (VerdictKind::HungJury, 0),
    };

    #[allow(clippy::cast_precision_loss)]
    let confidence = if majority_size > 0 && total_votes > 0 {
        majority_size as f64 / total_votes as f64
    } else {
        0.0
    };

    let rationale = verdict_rationale(verdict, guilty_votes, not_guilty_votes, total_votes);

    info!(
        %deliberation_id,
        ?verdict,
        guilty_votes,
        not_guilty_votes,
        "verdict reached"
    );

    Verdict {
        id: Uuid::new_v4(),
        deliberation_id,
        verdict,
        guilty_votes,
        not_guilty_votes,
        total_votes,
        majority_size,
        confidence,
        unanimous: total_votes > 0 && (guilty_votes == total_votes || not_guilty_votes == total_votes),
        hung_jury: verdict == VerdictKind::HungJury,
        rationale,
        reached_at: Utc::now(),
    }
}

/// Fixed rationale templates keyed by (verdict, unanimity), stating the
/// vote split and the standard of proof.
fn verdict_rationale(
    verdict: VerdictKind,
    guilty_votes: usize,
    not_guilty_votes: usize,
    total_votes: usize,
) -> String {
    match verdict {
        VerdictKind::HungJury => {
            let undecided = total_votes - guilty_votes - not_guilty_votes;
            format!(
                "The jury was unable to reach a unanimous verdict. The vote was {guilty_votes} guilty, \
                 {not_guilty_votes} not guilty, with {undecided} undecided jurors. \
                 The jury is deadlocked and cannot reach a decision."
            )
        }
        VerdictKind::Guilty => {
            if guilty_votes == total_votes {
                format!(
                    "The jury unanimously found the defendant guilty on all counts. \
                     All {total_votes} jurors agreed that the prosecution proved its case \
                     beyond a reasonable doubt."
                )
            } else {
                format!(
                    "The jury found the defendant guilty by a vote of {guilty_votes} to {not_guilty_votes}. \
                     The majority of jurors concluded that the prosecution proved its case \
                     beyond a reasonable doubt."
                )
            }
        }
        VerdictKind::NotGuilty => {
            if not_guilty_votes == total_votes {
                format!(
                    "The jury unanimously found the defendant not guilty on all counts. \
                     All {total_votes} jurors agreed that the prosecution failed to prove its case \
                     beyond a reasonable doubt."
                )
            } else {
                format!(
                    "The jury found the defendant not guilty by a vote of {not_guilty_votes} to {guilty_votes}. \
                     The majority of jurors concluded that the prosecution failed to prove its case \
                     beyond a reasonable doubt."
                )
            }
        }
    }
}

/// Drive a deliberation to a verdict.
///
/// Evidence strengths cycle through `evidence_schedule`. After each round
/// (from the second on) the convergence check may recommend a verdict.
/// Hitting `max_rounds` forces a verdict call from the final round's
/// votes, which is a hung jury unless a majority exists.
pub fn run_deliberation<R: Rng + ?Sized>(
    state: &mut DeliberationState,
    evidence_schedule: &[f64],
    rng: &mut R,
) -> Result<Verdict, DeliberationError> {
    if evidence_schedule.is_empty() {
        return Err(DeliberationError::Validation(
            "evidence_schedule must not be empty".to_string(),
        ));
    }

    let threshold = cfg_convergence_threshold();
    let mut last_round = None;

    while state.current_round < state.max_rounds {
        let evidence = evidence_schedule[state.current_round as usize % evidence_schedule.len()];
        let round = process_deliberation_round(state, evidence, rng)?;

        let report = check_convergence(&state.rounds, threshold);
        let done = report.recommendation == ConvergenceRecommendation::ReadyForVerdict
            || (round.unanimous && !state.unanimity_required);
        last_round = Some(round);
        if done {
            break;
        }
    }

    // last_round is always set: max_rounds >= 1 and the loop runs at least once
    let final_votes: Vec<Vote> = last_round
        .map(|r| r.juror_updates.iter().map(|u| u.vote).collect())
        .unwrap_or_default();

    state.status = DeliberationStatus::Complete;
    Ok(reach_verdict(state.id, &final_votes))
}

/// Progress snapshot from the latest round.
pub fn deliberation_summary(state: &DeliberationState) -> DeliberationSummary {
    let last = state.rounds.last();
    DeliberationSummary {
        deliberation_id: state.id,
        case_id: state.case_id.clone(),
        total_rounds: state.rounds.len(),
        current_consensus: last.map_or(0.0, |r| r.consensus_level),
        majority_vote: last.map(|r| r.majority_vote),
        unanimous: last.is_some_and(|r| r.unanimous),
        hung_jury: last.is_some_and(|r| r.hung_jury),
        status: state.status,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn jury(seed: u64, size: u32) -> DeliberationState {
        let mut rng = StdRng::seed_from_u64(seed);
        start_deliberation("case-1", size, &mut rng).unwrap()
    }

    fn round_stub(round_number: u32, consensus_level: f64) -> DeliberationRound {
        DeliberationRound {
            round_number,
            evidence_strength: 0.5,
            juror_updates: Vec::new(),
            consensus_level,
            majority_vote: MajorityVote::Tie,
            unanimous: false,
            hung_jury: false,
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_start_validates_jury_size() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(start_deliberation("c", 1, &mut rng).is_err());
        assert!(start_deliberation("c", 25, &mut rng).is_err());
        assert!(start_deliberation("c", 2, &mut rng).is_ok());
        assert!(start_deliberation("c", 12, &mut rng).is_ok());
    }

    #[test]
    fn test_jurors_numbered_contiguously_with_valid_ranges() {
        let state = jury(42, 12);
        assert_eq!(state.jurors.len(), 12);
        for (i, juror) in state.jurors.iter().enumerate() {
            assert_eq!(juror.juror_number, (i + 1) as u32);
            assert!((0.1..=0.9).contains(&juror.initial_prior));
            assert!((0.3..=0.8).contains(&juror.confidence));
            assert!((0.5..=1.5).contains(&juror.influence_factor));
            assert!(juror.current_belief.is_none());
            assert!(juror.votes.is_empty());
        }
    }

    #[test]
    fn test_round_numbers_monotone_and_appended() {
        let mut state = jury(7, 6);
        let mut rng = StdRng::seed_from_u64(8);
        for expected in 1..=5u32 {
            let round = process_deliberation_round(&mut state, 0.4, &mut rng).unwrap();
            assert_eq!(round.round_number, expected);
        }
        assert_eq!(state.rounds.len(), 5);
        assert_eq!(state.current_round, 5);
    }

    #[test]
    fn test_beliefs_stay_in_unit_interval() {
        let mut state = jury(3, 12);
        let mut rng = StdRng::seed_from_u64(4);
        for evidence in [0.0, 1.0, 0.5, 1.0, 1.0, 0.0, 0.9] {
            let round = process_deliberation_round(&mut state, evidence, &mut rng).unwrap();
            for update in &round.juror_updates {
                assert!((0.0..=1.0).contains(&update.new_belief));
            }
        }
        for juror in &state.jurors {
            assert!((0.0..=1.0).contains(&juror.current_belief.unwrap()));
        }
    }

    #[test]
    fn test_round_rejects_out_of_range_evidence() {
        let mut state = jury(1, 4);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(process_deliberation_round(&mut state, 1.5, &mut rng).is_err());
        assert!(process_deliberation_round(&mut state, -0.1, &mut rng).is_err());
    }

    #[test]
    fn test_strong_evidence_converges_to_unanimous_guilty() {
        let mut state = jury(11, 12);
        let mut rng = StdRng::seed_from_u64(12);
        // Maximum evidence pushes every belief to 1.0 within a few rounds.
        let mut last = None;
        for _ in 0..4 {
            last = Some(process_deliberation_round(&mut state, 1.0, &mut rng).unwrap());
        }
        let last = last.unwrap();
        assert!(last.unanimous);
        assert_eq!(last.majority_vote, MajorityVote::Guilty);
        assert!((last.consensus_level - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounds_reproducible_from_seed() {
        let run = |seed| {
            let mut state = jury(seed, 8);
            let mut rng = StdRng::seed_from_u64(seed + 100);
            let mut rounds = Vec::new();
            for _ in 0..3 {
                rounds.push(process_deliberation_round(&mut state, 0.3, &mut rng).unwrap());
            }
            rounds
        };
        let a = run(21);
        let b = run(21);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.consensus_level, y.consensus_level);
            assert_eq!(x.majority_vote, y.majority_vote);
            for (u, v) in x.juror_updates.iter().zip(&y.juror_updates) {
                assert_eq!(u.new_belief, v.new_belief);
                assert_eq!(u.vote, v.vote);
            }
        }
    }

    #[test]
    fn test_vote_thresholds() {
        assert_eq!(vote_for_belief(0.56), Vote::Guilty);
        assert_eq!(vote_for_belief(0.55), Vote::Guilty);
        assert_eq!(vote_for_belief(0.50), Vote::Undecided);
        assert_eq!(vote_for_belief(0.45), Vote::NotGuilty);
        assert_eq!(vote_for_belief(0.44), Vote::NotGuilty);
    }

    #[test]
    fn test_interaction_higher_influence_wins() {
        let mut state = jury(5, 2);
        state.jurors[0].influence_factor = 1.5;
        state.jurors[0].confidence = 0.8;
        state.jurors[0].current_belief = Some(0.9);
        state.jurors[1].influence_factor = 0.5;
        state.jurors[1].confidence = 0.3;
        state.jurors[1].current_belief = Some(0.3);

        let result = simulate_juror_interaction(&state.jurors[0], &state.jurors[1], 0.5);
        assert_eq!(result.influencer, 1);
        assert_eq!(result.influenced, 2);
        // |0.9 - 0.3| * 0.3 = 0.18, under the 0.2 cap
        assert!((result.influence_strength - 0.18).abs() < 1e-9);
        assert!((result.new_belief - 0.48).abs() < 1e-9);
    }

    #[test]
    fn test_interaction_strength_capped() {
        let mut state = jury(5, 2);
        state.jurors[0].influence_factor = 1.5;
        state.jurors[0].confidence = 0.8;
        state.jurors[0].current_belief = Some(1.0);
        state.jurors[1].influence_factor = 0.5;
        state.jurors[1].confidence = 0.3;
        state.jurors[1].current_belief = Some(0.0);

        let result = simulate_juror_interaction(&state.jurors[0], &state.jurors[1], 0.5);
        assert!((result.influence_strength - 0.2).abs() < f64::EPSILON);
        assert!((result.new_belief - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convergence_insufficient_data() {
        let report = check_convergence(&[], 0.9);
        assert_eq!(report.trend, ConvergenceTrend::InsufficientData);
        assert_eq!(
            report.recommendation,
            ConvergenceRecommendation::ContinueDeliberation
        );

        let report = check_convergence(&[round_stub(1, 0.95)], 0.9);
        assert_eq!(report.trend, ConvergenceTrend::InsufficientData);
    }

    #[test]
    fn test_convergence_high_consensus_ready_for_verdict() {
        let rounds = [round_stub(1, 0.95), round_stub(2, 0.96), round_stub(3, 0.97)];
        let report = check_convergence(&rounds, 0.9);
        assert!(report.converged);
        assert_eq!(report.trend, ConvergenceTrend::Increasing);
        assert_eq!(report.recommendation, ConvergenceRecommendation::ReadyForVerdict);
        assert_eq!(report.rounds_analyzed, 3);
        assert!((report.convergence_level - 0.96).abs() < 1e-9);
    }

    #[test]
    fn test_convergence_decreasing_recommends_hung_jury() {
        let rounds = [round_stub(1, 0.7), round_stub(2, 0.6), round_stub(3, 0.5)];
        let report = check_convergence(&rounds, 0.9);
        assert!(!report.converged);
        assert_eq!(report.trend, ConvergenceTrend::Decreasing);
        assert_eq!(
            report.recommendation,
            ConvergenceRecommendation::ConsiderHungJury
        );
    }

    #[test]
    fn test_convergence_uses_only_last_three_rounds() {
        let rounds = [
            round_stub(1, 0.1),
            round_stub(2, 0.95),
            round_stub(3, 0.95),
            round_stub(4, 0.95),
        ];
        let report = check_convergence(&rounds, 0.9);
        assert!(report.converged);
        assert_eq!(report.rounds_analyzed, 3);
    }

    #[test]
    fn test_verdict_majority_guilty() {
        let mut votes = vec![Vote::Guilty; 9];
        votes.extend([Vote::NotGuilty, Vote::NotGuilty, Vote::Undecided]);
        let verdict = reach_verdict(Uuid::new_v4(), &votes);

        assert_eq!(verdict.verdict, VerdictKind::Guilty);
        assert_eq!(verdict.guilty_votes, 9);
        assert_eq!(verdict.not_guilty_votes, 2);
        assert_eq!(verdict.majority_size, 9);
        assert!((verdict.confidence - 0.75).abs() < f64::EPSILON);
        assert!(!verdict.unanimous);
        assert!(!verdict.hung_jury);
        assert!(verdict.rationale.contains("9 to 2"));
    }

    #[test]
    fn test_verdict_exact_tie_is_hung() {
        let mut votes = vec![Vote::Guilty; 6];
        votes.extend(vec![Vote::NotGuilty; 6]);
        let verdict = reach_verdict(Uuid::new_v4(), &votes);

        assert_eq!(verdict.verdict, VerdictKind::HungJury);
        assert_eq!(verdict.majority_size, 0);
        assert!((verdict.confidence - 0.0).abs() < f64::EPSILON);
        assert!(verdict.hung_jury);
        assert!(verdict.rationale.contains("deadlocked"));
    }

    #[test]
    fn test_verdict_unanimous_rationale() {
        let votes = vec![Vote::NotGuilty; 12];
        let verdict = reach_verdict(Uuid::new_v4(), &votes);
        assert!(verdict.unanimous);
        assert_eq!(verdict.verdict, VerdictKind::NotGuilty);
        assert!(verdict.rationale.contains("unanimously"));
        assert!(verdict.rationale.contains("failed to prove"));
    }

    #[test]
    fn test_run_deliberation_reaches_verdict_and_completes() {
        let mut state = jury(9, 12);
        let mut rng = StdRng::seed_from_u64(10);
        let verdict = run_deliberation(&mut state, &[0.8], &mut rng).unwrap();

        assert_eq!(state.status, DeliberationStatus::Complete);
        assert!(state.current_round <= state.max_rounds);
        assert_eq!(verdict.deliberation_id, state.id);
        assert_eq!(verdict.total_votes, 12);
        // Strong evidence produces a guilty verdict well before max_rounds.
        assert_eq!(verdict.verdict, VerdictKind::Guilty);
    }

    #[test]
    fn test_run_deliberation_bounded_by_max_rounds() {
        let mut state = jury(13, 12);
        state.max_rounds = 3;
        let mut rng = StdRng::seed_from_u64(14);
        // Zero evidence keeps beliefs from converging upward.
        let _ = run_deliberation(&mut state, &[0.0], &mut rng).unwrap();
        assert!(state.current_round <= 3);
        assert_eq!(state.status, DeliberationStatus::Complete);
    }

    #[test]
    fn test_completed_deliberation_rejects_new_rounds() {
        let mut state = jury(2, 4);
        let mut rng = StdRng::seed_from_u64(2);
        let _ = run_deliberation(&mut state, &[0.9], &mut rng).unwrap();
        assert!(process_deliberation_round(&mut state, 0.5, &mut rng).is_err());
    }

    #[test]
    fn test_summary_reflects_latest_round() {
        let mut state = jury(6, 6);
        let mut rng = StdRng::seed_from_u64(6);
        let round = process_deliberation_round(&mut state, 0.7, &mut rng).unwrap();
        let summary = deliberation_summary(&state);

        assert_eq!(summary.total_rounds, 1);
        assert_eq!(summary.current_consensus, round.consensus_level);
        assert_eq!(summary.majority_vote, Some(round.majority_vote));
        assert_eq!(summary.status, DeliberationStatus::Deliberating);
    }
}
