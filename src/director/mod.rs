//! Trial Director — the trial phase state machine
//!
//! Owns trial status, current phase, current witness/examination mode, and
//! the turn log. All `TrialState` mutation flows through the operations in
//! this module:
//!
//! ```text
//! openings → witness_examination → closings → instructions
//!          → deliberation → verdict → sentencing → trial_complete
//! ```
//!
//! Each transition is one-directional with exactly one allowed successor.
//! Every operation that changes courtroom posture appends a judge system
//! turn so the transcript narrates the full procedural history. The element
//! coverage tracker runs on every recorded turn.
//!
//! Operations on the same `TrialState` must be serialized by the caller —
//! turn ordering and monotonic timestamps are invariants this module
//! assumes, not something it enforces across writers.

use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::coverage::{self, ElementUpdate};
use crate::types::{
    Element, ExaminationMode, Objection, Speaker, TrialPhase, TrialState, TrialStatus,
    TrialSummary, Turn, TurnData,
};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum TrialError {
    #[error("Invalid phase transition from {from} to {to}")]
    InvalidTransition { from: TrialPhase, to: TrialPhase },

    #[error("No witness is currently under examination")]
    NoActiveWitness,

    #[error("Validation error: {0}")]
    Validation(String),
}

// ============================================================================
// Trial lifecycle
// ============================================================================

/// Start a trial: create a `TrialState` in `openings` with empty logs.
pub fn start_trial(case_id: &str) -> Result<TrialState, TrialError> {
    if case_id.trim().is_empty() {
        return Err(TrialError::Validation("case_id must not be empty".to_string()));
    }

    let state = TrialState::new(case_id);
    info!(case_id, trial_id = %state.trial_id, "trial started in openings phase");
    Ok(state)
}

/// Advance the trial to `new_phase`.
///
/// Fails with `InvalidTransition` unless `new_phase` is the single allowed
/// successor of the current phase. On success, appends a system turn
/// narrating the transition and resets the phase-start timestamp.
pub fn advance_phase(state: &mut TrialState, new_phase: TrialPhase) -> Result<(), TrialError> {
    if state.phase.allowed_next() != Some(new_phase) {
        return Err(TrialError::InvalidTransition {
            from: state.phase,
            to: new_phase,
        });
    }

    let from = state.phase;
    append_system_turn(
        state,
        new_phase,
        &format!(
            "Court is now proceeding to the {} phase.",
            new_phase.display_name()
        ),
        json!({
            "transition_from": from.as_str(),
            "transition_to": new_phase.as_str(),
        }),
    );

    state.phase = new_phase;
    state.phase_start = Utc::now();
    if new_phase == TrialPhase::TrialComplete {
        state.status = TrialStatus::TrialComplete;
    }

    info!(case_id = %state.case_id, %from, to = %new_phase, "phase advanced");
    Ok(())
}

// ============================================================================
// Witness examination
// ============================================================================

/// Begin examining a witness. Requires phase `witness_examination`.
pub fn start_witness_examination(
    state: &mut TrialState,
    witness_id: &str,
    mode: ExaminationMode,
) -> Result<(), TrialError> {
    if state.phase != TrialPhase::WitnessExamination {
        return Err(TrialError::Validation(format!(
            "witness examination requires phase witness_examination, trial is in {}",
            state.phase
        )));
    }
    if witness_id.trim().is_empty() {
        return Err(TrialError::Validation("witness_id must not be empty".to_string()));
    }

    append_system_turn(
        state,
        TrialPhase::WitnessExamination,
        &format!("Calling {witness_id} for {mode} examination."),
        json!({
            "examination_mode": mode.as_str(),
            "examination_start": true,
            "witness_id": witness_id,
        }),
    );

    state.current_witness = Some(witness_id.to_string());
    state.current_examination_mode = Some(mode);
    info!(case_id = %state.case_id, witness_id, %mode, "witness examination started");
    Ok(())
}

/// Excuse the witness currently under examination.
///
/// Fails with `NoActiveWitness` when no examination is in progress.
pub fn end_witness_examination(state: &mut TrialState) -> Result<(), TrialError> {
    let witness_id = state.current_witness.clone().ok_or(TrialError::NoActiveWitness)?;

    append_system_turn(
        state,
        TrialPhase::WitnessExamination,
        &format!("Witness {witness_id} is excused."),
        json!({
            "examination_end": true,
            "witness_id": witness_id,
        }),
    );

    state.current_witness = None;
    state.current_examination_mode = None;
    info!(case_id = %state.case_id, witness_id, "witness examination ended");
    Ok(())
}

// ============================================================================
// Turns & coverage
// ============================================================================

/// Append a turn to the transcript, then run the element coverage tracker
/// and merge any upgrades into `element_coverage`.
///
/// The turn receives a fresh id and a monotonic millisecond timestamp.
/// Returns the coverage updates the turn produced.
pub fn add_turn(
    state: &mut TrialState,
    data: TurnData,
    case_elements: &[Element],
) -> Result<Vec<ElementUpdate>, TrialError> {
    if data.text.trim().is_empty() {
        return Err(TrialError::Validation("turn text must not be empty".to_string()));
    }

    let turn = Turn {
        id: Uuid::new_v4(),
        case_id: state.case_id.clone(),
        phase: state.phase,
        speaker: data.speaker,
        witness_id: data.witness_id.or_else(|| state.current_witness.clone()),
        count_id: data.count_id,
        text: data.text,
        timestamp_ms: next_timestamp_ms(state),
        meta: data.meta,
        created_at: Utc::now(),
    };

    // Elements already covered in this trial keep their original credit.
    let uncovered: Vec<Element> = case_elements
        .iter()
        .filter(|e| !state.element_coverage.contains_key(&e.name))
        .cloned()
        .collect();

    let updates = coverage::analyze_element_coverage(&turn, &uncovered);
    for update in &updates {
        state
            .element_coverage
            .entry(update.element_name.clone())
            .or_insert_with(|| update.record.clone());
    }

    debug!(
        case_id = %state.case_id,
        turn_id = %turn.id,
        covered = updates.len(),
        "turn recorded"
    );
    state.turns.push(turn);
    Ok(updates)
}

/// Record a ruled objection in the trial's append-only objection log.
pub fn record_objection(state: &mut TrialState, objection: Objection) {
    debug!(case_id = %state.case_id, ground = %objection.ground, ruling = %objection.ruling, "objection recorded");
    state.objections.push(objection);
}

/// Mark an exhibit admitted. Idempotent — the admitted set never shrinks.
pub fn admit_exhibit(state: &mut TrialState, exhibit_code: &str) -> Result<(), TrialError> {
    if exhibit_code.trim().is_empty() {
        return Err(TrialError::Validation("exhibit code must not be empty".to_string()));
    }
    if state.exhibits_admitted.insert(exhibit_code.to_string()) {
        info!(case_id = %state.case_id, exhibit_code, "exhibit admitted");
    }
    Ok(())
}

/// Snapshot trial progress for reporting.
pub fn trial_summary(state: &TrialState, total_elements: usize) -> TrialSummary {
    let witnesses_examined = state
        .turns
        .iter()
        .filter(|t| {
            t.meta
                .get("examination_start")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        })
        .count();

    #[allow(clippy::cast_precision_loss)]
    let element_coverage_percentage = if total_elements == 0 {
        0.0
    } else {
        (state.element_coverage.len() as f64 / total_elements as f64) * 100.0
    };

    TrialSummary {
        case_id: state.case_id.clone(),
        current_phase: state.phase,
        total_turns: state.turns.len(),
        total_objections: state.objections.len(),
        witnesses_examined,
        exhibits_admitted: state.exhibits_admitted.len(),
        element_coverage_percentage,
        last_activity: state.turns.last().map(|t| t.created_at),
    }
}

// ============================================================================
// Internal helpers
// ============================================================================

/// Next logical timestamp: wall clock, clamped so the turn log stays
/// non-decreasing even if the clock steps backwards.
fn next_timestamp_ms(state: &TrialState) -> i64 {
    let now = Utc::now().timestamp_millis();
    match state.turns.last() {
        Some(last) => now.max(last.timestamp_ms),
        None => now,
    }
}

/// Append a judge system turn (transitions, examination markers).
fn append_system_turn(
    state: &mut TrialState,
    phase: TrialPhase,
    text: &str,
    meta: serde_json::Value,
) {
    let turn = Turn {
        id: Uuid::new_v4(),
        case_id: state.case_id.clone(),
        phase,
        speaker: Speaker::Judge,
        witness_id: None,
        count_id: None,
        text: text.to_string(),
        timestamp_ms: next_timestamp_ms(state),
        meta,
        created_at: Utc::now(),
    };
    state.turns.push(turn);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementStatus;

    fn started() -> TrialState {
        start_trial("case-1").unwrap()
    }

    #[test]
    fn test_start_trial_rejects_empty_case_id() {
        assert!(matches!(start_trial("  "), Err(TrialError::Validation(_))));
    }

    #[test]
    fn test_advance_phase_follows_chain() {
        let mut state = started();
        let chain = [
            TrialPhase::WitnessExamination,
            TrialPhase::Closings,
            TrialPhase::Instructions,
            TrialPhase::Deliberation,
            TrialPhase::Verdict,
            TrialPhase::Sentencing,
            TrialPhase::TrialComplete,
        ];
        for phase in chain {
            advance_phase(&mut state, phase).unwrap();
            assert_eq!(state.phase, phase);
        }
        assert_eq!(state.status, TrialStatus::TrialComplete);
        // One narration turn per transition
        assert_eq!(state.turns.len(), chain.len());
    }

    #[test]
    fn test_advance_phase_rejects_skipping() {
        let mut state = started();
        let err = advance_phase(&mut state, TrialPhase::Deliberation).unwrap_err();
        assert!(matches!(
            err,
            TrialError::InvalidTransition {
                from: TrialPhase::Openings,
                to: TrialPhase::Deliberation
            }
        ));
        // Failed transitions leave no trace in the transcript
        assert!(state.turns.is_empty());
    }

    #[test]
    fn test_advance_phase_rejects_backwards() {
        let mut state = started();
        advance_phase(&mut state, TrialPhase::WitnessExamination).unwrap();
        let err = advance_phase(&mut state, TrialPhase::Openings).unwrap_err();
        assert!(matches!(err, TrialError::InvalidTransition { .. }));
    }

    #[test]
    fn test_witness_examination_lifecycle() {
        let mut state = started();
        advance_phase(&mut state, TrialPhase::WitnessExamination).unwrap();

        start_witness_examination(&mut state, "wit-1", ExaminationMode::Direct).unwrap();
        assert_eq!(state.current_witness.as_deref(), Some("wit-1"));
        assert_eq!(state.current_examination_mode, Some(ExaminationMode::Direct));

        end_witness_examination(&mut state).unwrap();
        assert!(state.current_witness.is_none());
        assert!(state.current_examination_mode.is_none());
    }

    #[test]
    fn test_examination_requires_correct_phase() {
        let mut state = started();
        let err =
            start_witness_examination(&mut state, "wit-1", ExaminationMode::Direct).unwrap_err();
        assert!(matches!(err, TrialError::Validation(_)));
    }

    #[test]
    fn test_end_examination_without_witness_fails() {
        let mut state = started();
        advance_phase(&mut state, TrialPhase::WitnessExamination).unwrap();
        assert!(matches!(
            end_witness_examination(&mut state),
            Err(TrialError::NoActiveWitness)
        ));
    }

    #[test]
    fn test_turn_log_is_append_only_and_ordered() {
        let mut state = started();
        for i in 0..20 {
            add_turn(
                &mut state,
                TurnData {
                    speaker: Speaker::Prosecutor,
                    text: format!("statement {i}"),
                    ..Default::default()
                },
                &[],
            )
            .unwrap();
        }
        assert_eq!(state.turns.len(), 20);
        for pair in state.turns.windows(2) {
            assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
        }
    }

    #[test]
    fn test_add_turn_rejects_empty_text() {
        let mut state = started();
        let err = add_turn(
            &mut state,
            TurnData {
                speaker: Speaker::Witness,
                text: "   ".to_string(),
                ..Default::default()
            },
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, TrialError::Validation(_)));
    }

    #[test]
    fn test_turn_updates_element_coverage() {
        let mut state = started();
        let elements = vec![Element::new("taking", "Theft"), Element::new("breach", "Contract")];

        let updates = add_turn(
            &mut state,
            TurnData {
                speaker: Speaker::Witness,
                text: "I saw the taking happen in broad daylight".to_string(),
                ..Default::default()
            },
            &elements,
        )
        .unwrap();

        assert_eq!(updates.len(), 1);
        let record = state.element_coverage.get("taking").unwrap();
        assert_eq!(record.status, ElementStatus::Covered);
        assert!(!state.element_coverage.contains_key("breach"));
    }

    #[test]
    fn test_element_coverage_is_monotone() {
        let mut state = started();
        let elements = vec![Element::new("taking", "Theft")];

        add_turn(
            &mut state,
            TurnData {
                speaker: Speaker::Witness,
                text: "the taking occurred".to_string(),
                ..Default::default()
            },
            &elements,
        )
        .unwrap();
        let first = state.element_coverage.get("taking").unwrap().clone();

        // Subsequent turns never revert or overwrite the covering record.
        for text in ["nothing relevant", "the taking again"] {
            add_turn(
                &mut state,
                TurnData {
                    speaker: Speaker::Witness,
                    text: text.to_string(),
                    ..Default::default()
                },
                &elements,
            )
            .unwrap();
        }
        assert_eq!(state.element_coverage.get("taking").unwrap(), &first);
    }

    #[test]
    fn test_admit_exhibit_is_idempotent() {
        let mut state = started();
        admit_exhibit(&mut state, "Exhibit A").unwrap();
        admit_exhibit(&mut state, "Exhibit A").unwrap();
        assert_eq!(state.exhibits_admitted.len(), 1);
    }

    #[test]
    fn test_trial_summary_counts() {
        let mut state = started();
        advance_phase(&mut state, TrialPhase::WitnessExamination).unwrap();
        start_witness_examination(&mut state, "wit-1", ExaminationMode::Direct).unwrap();
        add_turn(
            &mut state,
            TurnData {
                speaker: Speaker::Witness,
                text: "testimony".to_string(),
                ..Default::default()
            },
            &[],
        )
        .unwrap();
        admit_exhibit(&mut state, "Exhibit A").unwrap();

        let summary = trial_summary(&state, 4);
        assert_eq!(summary.current_phase, TrialPhase::WitnessExamination);
        assert_eq!(summary.witnesses_examined, 1);
        assert_eq!(summary.exhibits_admitted, 1);
        // transition + examination start + testimony
        assert_eq!(summary.total_turns, 3);
        assert!((summary.element_coverage_percentage - 0.0).abs() < f64::EPSILON);
    }
}
