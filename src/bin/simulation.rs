//! Scripted Trial Simulation
//!
//! Runs a complete criminal trial end to end and prints the transcript:
//! intake normalization, pre-trial motions, witness examinations with
//! objections, jury instructions, deliberation rounds, and the verdict.
//!
//! # Usage
//! ```bash
//! ./simulation --seed 42
//! ./simulation --seed 42 --jury-size 6 --quiet
//! ```

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use gavel::deliberation;
use gavel::director;
use gavel::instructions;
use gavel::intake::{ExhibitInput, IntakeRequest};
use gavel::motion;
use gavel::objection;
use gavel::types::{
    Case, CaseType, ExaminationMode, MotionRequest, ObjectionRequest, Speaker, TrialContext,
    TrialPhase, TrialState, TurnData,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "trial-simulation")]
#[command(about = "Scripted end-to-end trial run for the gavel engine")]
#[command(version)]
struct Args {
    /// Random seed for reproducibility. Omit for entropy seeding.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of jurors empaneled for deliberation
    #[arg(long, default_value = "12", value_parser = clap::value_parser!(u32).range(2..=24))]
    jury_size: u32,

    /// Suppress turn-by-turn transcript (only print rulings and the verdict)
    #[arg(short, long)]
    quiet: bool,
}

// ============================================================================
// Scripted Case Material
// ============================================================================

const CASE_SUMMARY: &str = "The State brings a charge of theft against the defendant \
John Barrow. The prosecution alleges that John Barrow took a laptop from the \
office of Maria Chen without permission and with intent to deprive her of it \
permanently. The witness Maria Chen will testify about the missing laptop. \
Officer David Reyes testified that the laptop was recovered from the \
defendant's apartment. According to the expert Dr. Susan Clarke, fingerprints \
on the laptop match the defendant.";

struct ScriptedTurn {
    speaker: Speaker,
    text: &'static str,
    /// Objection ground raised against this turn, if any
    objection: Option<&'static str>,
}

fn direct_examination_script() -> Vec<ScriptedTurn> {
    vec![
        ScriptedTurn {
            speaker: Speaker::Prosecutor,
            text: "Please describe what you found when you returned to your office.",
            objection: None,
        },
        ScriptedTurn {
            speaker: Speaker::Witness,
            text: "My laptop was gone. The charging cable was still on the desk, \
                   so whoever took it left in a hurry. The defendant took the \
                   laptop without permission and carried it away from my office.",
            objection: None,
        },
        ScriptedTurn {
            speaker: Speaker::Prosecutor,
            text: "Isn't it true that you saw the defendant near your office that \
                   morning, and isn't it true that he was carrying a bag?",
            objection: Some("Leading Question"),
        },
        ScriptedTurn {
            speaker: Speaker::Witness,
            text: "He told me he said he was there to fix the printer. My \
                   coworker said that she heard him say he needed a new computer.",
            objection: Some("Hearsay"),
        },
    ]
}

fn cross_examination_script() -> Vec<ScriptedTurn> {
    vec![
        ScriptedTurn {
            speaker: Speaker::DefenseCounsel,
            text: "Isn't it true that your office door is never locked, and \
                   wouldn't you agree that anyone could have entered?",
            objection: Some("Leading Question"),
        },
        ScriptedTurn {
            speaker: Speaker::Witness,
            text: "I suppose that could be what happened. Maybe someone else \
                   would have known the laptop was there, probably.",
            objection: Some("Speculation"),
        },
    ]
}

// ============================================================================
// Simulation Phases
// ============================================================================

fn run_intake(quiet: bool) -> Case {
    let request = IntakeRequest {
        id: Some("state-v-barrow".to_string()),
        case_type: CaseType::Criminal,
        summary: CASE_SUMMARY.to_string(),
        exhibits: vec![
            ExhibitInput {
                title: Some("Recovered laptop".to_string()),
                description: "Laptop recovered from the defendant's apartment".to_string(),
                kind: Some("physical".to_string()),
            },
            ExhibitInput {
                title: Some("Fingerprint analysis report".to_string()),
                description: "Laboratory comparison of latent prints".to_string(),
                kind: None,
            },
        ],
    };

    let case = gavel::normalize_intake(&request);
    println!("=== INTAKE: {} ({:?}) ===", case.id, case.case_type);
    for count in &case.counts {
        println!(
            "  Count: {} — {} elements, {} defenses",
            count.label,
            count.elements.len(),
            count.defenses.len()
        );
    }
    if !quiet {
        for witness in &case.witnesses {
            println!("  Witness: {} ({:?})", witness.name, witness.witness_type);
        }
        for exhibit in &case.exhibits {
            println!("  {}: {}", exhibit.code, exhibit.title);
        }
    }
    case
}

fn run_motions(case: &Case) {
    println!("\n=== PRE-TRIAL MOTIONS ===");
    let requests = vec![
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
            arguments: "Exclude reference to the defendant's prior conviction \
                        as prejudicial character evidence."
                .to_string(),
            filed_by: "defense".to_string(),
        },
    ];

    for ruled in motion::batch_process_motions(&case.id, &requests) {
        println!("  [{:?}] {}", ruled.status, ruled.ruling);
        println!("         {}", ruled.reasoning);
    }
}

fn run_examination(
    trial: &mut TrialState,
    case: &Case,
    witness_id: &str,
    mode: ExaminationMode,
    script: Vec<ScriptedTurn>,
    rng: &mut StdRng,
    quiet: bool,
) -> anyhow::Result<()> {
    director::start_witness_examination(trial, witness_id, mode)?;
    let witness = case.witness(witness_id);
    println!(
        "\n--- {:?} examination of {} ---",
        mode,
        witness.map_or(witness_id, |w| w.name.as_str())
    );

    for scripted in script {
        let data = TurnData {
            speaker: scripted.speaker,
            witness_id: Some(witness_id.to_string()),
            count_id: case.counts.first().map(|c| c.label.clone()),
            text: scripted.text.to_string(),
            meta: serde_json::Value::Null,
        };
        let updates = director::add_turn(trial, data, &case.elements)?;
        if !quiet {
            println!("  {:?}: {}", scripted.speaker, scripted.text);
            for update in &updates {
                println!(
                    "    [coverage] element '{}' covered at {:.0}%",
                    update.element_name, update.record.score
                );
            }
        }

        let context = TrialContext {
            case_id: Some(case.id.clone()),
            turn_id: trial.turns.last().map(|t| t.id),
            phase: Some(trial.phase),
            examination_mode: trial.current_examination_mode,
            witness_type: witness.map(|w| w.witness_type),
        };

        let suggestions = objection::suggest_objection_grounds(scripted.text, &context);
        if !quiet {
            for s in &suggestions {
                println!("    [suggested] {} ({:.2})", s.ground, s.confidence);
            }
        }

        if let Some(ground) = scripted.objection {
            let request = ObjectionRequest {
                ground: ground.to_string(),
                context: context.clone(),
                turn_text: scripted.text.to_string(),
                objecting_party: Some(
                    match scripted.speaker {
                        Speaker::DefenseCounsel => "prosecution",
                        _ => "defense",
                    }
                    .to_string(),
                ),
                confidence: 0.0,
            };
            let ruled = objection::process_objection(&request, rng);
            println!("  >> {}", ruled.ruling_text);
            director::record_objection(trial, ruled);
        }
    }

    director::end_witness_examination(trial)?;
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    if let Some(seed) = args.seed {
        println!("Seed: {seed}");
    }

    // Intake and motions
    let case = run_intake(args.quiet);
    run_motions(&case);

    // Trial
    println!("\n=== TRIAL ===");
    let mut trial = director::start_trial(&case.id)?;
    let opening = TurnData {
        speaker: Speaker::Prosecutor,
        witness_id: None,
        count_id: None,
        text: "The evidence will show the defendant took the laptop with intent \
               to permanently deprive its owner."
            .to_string(),
        meta: serde_json::Value::Null,
    };
    director::add_turn(&mut trial, opening, &case.elements)?;

    director::advance_phase(&mut trial, TrialPhase::WitnessExamination)?;
    run_examination(
        &mut trial,
        &case,
        "maria_chen",
        ExaminationMode::Direct,
        direct_examination_script(),
        &mut rng,
        args.quiet,
    )?;
    run_examination(
        &mut trial,
        &case,
        "maria_chen",
        ExaminationMode::Cross,
        cross_examination_script(),
        &mut rng,
        args.quiet,
    )?;

    for exhibit in &case.exhibits {
        director::admit_exhibit(&mut trial, &exhibit.code)?;
    }

    director::advance_phase(&mut trial, TrialPhase::Closings)?;
    director::advance_phase(&mut trial, TrialPhase::Instructions)?;

    // Jury instructions
    println!("\n=== JURY INSTRUCTIONS ===");
    let mut set = instructions::generate_instructions(&case);
    instructions::publish_instructions(&mut set)?;
    for section in &set.sections {
        println!("  [{}] {}", section.order, section.title);
    }

    // Deliberation
    director::advance_phase(&mut trial, TrialPhase::Deliberation)?;
    println!("\n=== DELIBERATION ({} jurors) ===", args.jury_size);
    let mut deliberation = deliberation::start_deliberation(&case.id, args.jury_size, &mut rng)?;
    let evidence_schedule = [0.75, 0.8, 0.85];
    let verdict = deliberation::run_deliberation(&mut deliberation, &evidence_schedule, &mut rng)?;

    if !args.quiet {
        for round in &deliberation.rounds {
            println!(
                "  Round {}: consensus {:.2}, majority {:?}{}",
                round.round_number,
                round.consensus_level,
                round.majority_vote,
                if round.hung_jury { " (hung)" } else { "" }
            );
        }
    }

    director::advance_phase(&mut trial, TrialPhase::Verdict)?;
    println!("\n=== VERDICT ===");
    println!(
        "  {:?} — {} guilty / {} not guilty of {} (confidence {:.2})",
        verdict.verdict,
        verdict.guilty_votes,
        verdict.not_guilty_votes,
        verdict.total_votes,
        verdict.confidence
    );
    println!("  {}", verdict.rationale);

    let summary = director::trial_summary(&trial, case.elements.len());
    println!(
        "\n{} turns, {} objections, {} witnesses examined, {:.0}% element coverage",
        summary.total_turns,
        summary.total_objections,
        summary.witnesses_examined,
        summary.element_coverage_percentage
    );

    Ok(())
}
