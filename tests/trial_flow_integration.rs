//! Full Trial Flow Integration
//!
//! Drives a seeded criminal case through the complete pipeline using the
//! library API directly: intake, motions, trial phases, examinations with
//! objections, instructions, deliberation, and the verdict. Everything
//! downstream of intake is deterministic for a fixed seed.

use rand::rngs::StdRng;
use rand::SeedableRng;

use gavel::deliberation;
use gavel::director;
use gavel::instructions;
use gavel::intake::{ExhibitInput, IntakeRequest};
use gavel::motion;
use gavel::objection;
use gavel::types::{
    CaseStatus, CaseType, DeliberationStatus, ExaminationMode, MotionRequest, MotionStatus,
    ObjectionRequest, Speaker, TrialContext, TrialPhase, TurnData, VerdictKind,
};

const SUMMARY: &str = "The State brings a charge of theft against the defendant \
John Barrow. The prosecution alleges that John Barrow took a laptop from the \
office of Maria Chen without permission and with intent to deprive her of it. \
The witness Maria Chen will testify about the missing laptop. Officer David \
Reyes testified that the laptop was recovered from the defendant's apartment.";

fn theft_case() -> gavel::Case {
    gavel::normalize_intake(&IntakeRequest {
        id: Some("state-v-barrow".to_string()),
        case_type: CaseType::Criminal,
        summary: SUMMARY.to_string(),
        exhibits: vec![ExhibitInput {
            title: Some("Recovered laptop".to_string()),
            description: "Laptop recovered from the defendant's apartment".to_string(),
            kind: Some("physical".to_string()),
        }],
    })
}

#[test]
fn full_trial_reaches_a_verdict() {
    let mut rng = StdRng::seed_from_u64(42);
    let case = theft_case();

    // Intake produced a structured criminal case
    assert_eq!(case.status, CaseStatus::Normalized);
    assert_eq!(case.counts.len(), 1);
    assert_eq!(case.counts[0].label, "Theft");
    assert!(!case.elements.is_empty());
    assert!(case.witnesses.iter().any(|w| w.id == "maria_chen"));
    assert_eq!(case.exhibits[0].code, "Exhibit A");

    // Pre-trial motions ruled in order
    let motions = motion::batch_process_motions(
        &case.id,
        &[
            MotionRequest {
                id: None,
                kind: "suppress".to_string(),
                arguments: "The laptop was seized in a warrantless search of the \
                            defendant's apartment."
                    .to_string(),
                filed_by: "defense".to_string(),
            },
            MotionRequest {
                id: None,
                kind: "limine".to_string(),
                arguments: "The prior conviction is prejudicial character evidence.".to_string(),
                filed_by: "defense".to_string(),
            },
        ],
    );
    assert_eq!(motions.len(), 2);
    // Warrantless-search argument matches the suppression grant pattern
    assert_eq!(motions[0].status, MotionStatus::Granted);

    // Trial: openings then examinations
    let mut trial = director::start_trial(&case.id).unwrap();
    assert_eq!(trial.phase, TrialPhase::Openings);

    director::add_turn(
        &mut trial,
        TurnData {
            speaker: Speaker::Prosecutor,
            witness_id: None,
            count_id: None,
            text: "The evidence will show the defendant took the laptop without \
                   permission and with intent to deprive its owner."
                .to_string(),
            meta: serde_json::Value::Null,
        },
        &case.elements,
    )
    .unwrap();

    director::advance_phase(&mut trial, TrialPhase::WitnessExamination).unwrap();
    director::start_witness_examination(&mut trial, "maria_chen", ExaminationMode::Direct)
        .unwrap();

    let testimony = "The defendant took the laptop from my office without \
                     permission. He told me he said he was there to fix the \
                     printer, and he said he needed a computer.";
    director::add_turn(
        &mut trial,
        TurnData {
            speaker: Speaker::Witness,
            witness_id: Some("maria_chen".to_string()),
            count_id: Some("Theft".to_string()),
            text: testimony.to_string(),
            meta: serde_json::Value::Null,
        },
        &case.elements,
    )
    .unwrap();

    // Hearsay markers fire twice, so the engine suggests the objection
    let context = TrialContext {
        case_id: Some(case.id.clone()),
        turn_id: trial.turns.last().map(|t| t.id),
        phase: Some(trial.phase),
        examination_mode: trial.current_examination_mode,
        witness_type: None,
    };
    let suggestions = objection::suggest_objection_grounds(testimony, &context);
    assert!(suggestions.iter().any(|s| s.ground == "Hearsay"));

    let ruled = objection::process_objection(
        &ObjectionRequest {
            ground: "Hearsay".to_string(),
            context,
            turn_text: testimony.to_string(),
            objecting_party: Some("defense".to_string()),
            confidence: 0.0,
        },
        &mut rng,
    );
    director::record_objection(&mut trial, ruled);
    assert_eq!(trial.objections.len(), 1);

    director::end_witness_examination(&mut trial).unwrap();
    director::admit_exhibit(&mut trial, "Exhibit A").unwrap();

    director::advance_phase(&mut trial, TrialPhase::Closings).unwrap();
    director::advance_phase(&mut trial, TrialPhase::Instructions).unwrap();

    // Instructions generated and published once
    let mut set = instructions::generate_instructions(&case);
    assert!(set.sections.iter().any(|s| s.title.contains("Count")));
    instructions::publish_instructions(&mut set).unwrap();
    assert!(instructions::publish_instructions(&mut set).is_err());

    // Deliberation to verdict
    director::advance_phase(&mut trial, TrialPhase::Deliberation).unwrap();
    let mut state = deliberation::start_deliberation(&case.id, 12, &mut rng).unwrap();
    let verdict = deliberation::run_deliberation(&mut state, &[0.75, 0.8, 0.85], &mut rng).unwrap();

    assert_eq!(state.status, DeliberationStatus::Complete);
    assert!(!state.rounds.is_empty());
    assert_eq!(verdict.total_votes, 12);
    assert!(matches!(
        verdict.verdict,
        VerdictKind::Guilty | VerdictKind::NotGuilty | VerdictKind::HungJury
    ));
    assert!(!verdict.rationale.is_empty());

    director::advance_phase(&mut trial, TrialPhase::Verdict).unwrap();

    let summary = director::trial_summary(&trial, case.elements.len());
    assert_eq!(summary.total_objections, 1);
    assert_eq!(summary.witnesses_examined, 1);
    assert_eq!(summary.exhibits_admitted, 1);
    assert!(summary.total_turns >= 2);
}

#[test]
fn same_seed_reproduces_the_deliberation() {
    let case = theft_case();

    let run = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = deliberation::start_deliberation(&case.id, 12, &mut rng).unwrap();
        deliberation::run_deliberation(&mut state, &[0.7, 0.8], &mut rng)
            .unwrap()
    };

    let first = run(9);
    let second = run(9);
    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.guilty_votes, second.guilty_votes);
    assert_eq!(first.not_guilty_votes, second.not_guilty_votes);
}
