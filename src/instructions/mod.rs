//! Jury Instruction Engine
//!
//! Generates the ordered instruction sections and verdict form for a
//! normalized case. Section order uses fixed slots: general/burden/evidence
//! at 1-3, counts from 11, elements from 21, expert testimony at 40,
//! credibility at 45, defenses from 50, deliberation last at 999.
//!
//! Publishing the set opens the deliberation gate.

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::types::{
    Case, CaseType, CountForm, InstructionSection, InstructionSet, SpecialFinding, VerdictForm,
    WitnessType,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstructionError {
    #[error("instruction set {0} is already published")]
    AlreadyPublished(Uuid),
}

/// Generate the complete instruction set for a case.
pub fn generate_instructions(case: &Case) -> InstructionSet {
    let mut sections = standard_sections(case.case_type);

    for (index, count) in case.counts.iter().enumerate() {
        let count_number = (index + 1) as u32;
        sections.push(section(
            format!("Count: {}", count.label),
            format!("You must consider Count {count_number}: {}", count.label),
            10 + count_number,
        ));

        for element in case.elements.iter().filter(|e| e.count_id == count.label) {
            sections.push(section(
                format!("Element: {}", element.name),
                element_instruction(&element.name, &element.description, case.case_type),
                20 + count_number,
            ));
        }
    }

    if case
        .witnesses
        .iter()
        .any(|w| w.witness_type == WitnessType::Expert)
    {
        sections.push(expert_section());
    }
    sections.push(credibility_section());

    for (index, defense) in case.defenses.iter().enumerate() {
        sections.push(section(
            format!("Defense: {}", defense.name),
            defense_instruction(&defense.name, &defense.description, case.case_type),
            50 + index as u32,
        ));
    }

    sections.sort_by_key(|s| s.order);

    let set = InstructionSet {
        id: Uuid::new_v4(),
        case_id: case.id.clone(),
        generated_at: Utc::now(),
        sections,
        verdict_form: generate_verdict_form(case),
        published: false,
        published_at: None,
    };

    info!(
        case_id = %case.id,
        sections = set.sections.len(),
        counts = set.verdict_form.counts.len(),
        "jury instructions generated"
    );
    set
}

/// Verdict form with per-count options and special findings.
pub fn generate_verdict_form(case: &Case) -> VerdictForm {
    let counts = case
        .counts
        .iter()
        .enumerate()
        .map(|(index, count)| CountForm {
            count_number: (index + 1) as u32,
            count_name: count.label.clone(),
            elements: count.elements.clone(),
            verdict_options: verdict_options(case.case_type),
            special_findings: special_findings(case.case_type),
        })
        .collect::<Vec<_>>();

    VerdictForm {
        id: Uuid::new_v4(),
        total_verdicts: counts.len(),
        counts,
    }
}

/// Mark the set published, opening the deliberation gate. Publishing twice
/// is an error.
pub fn publish_instructions(set: &mut InstructionSet) -> Result<(), InstructionError> {
    if set.published {
        return Err(InstructionError::AlreadyPublished(set.id));
    }
    set.published = true;
    set.published_at = Some(Utc::now());
    info!(instruction_id = %set.id, case_id = %set.case_id, "instructions published");
    Ok(())
}

fn section(title: String, content: String, order: u32) -> InstructionSection {
    InstructionSection {
        id: Uuid::new_v4(),
        title,
        content,
        order,
    }
}

fn standard_sections(case_type: CaseType) -> Vec<InstructionSection> {
    vec![
        section(
            "General Instructions".to_string(),
            general_instructions(case_type).to_string(),
            1,
        ),
        section(
            "Burden of Proof".to_string(),
            burden_instructions(case_type).to_string(),
            2,
        ),
        section(
            "Evidence".to_string(),
            EVIDENCE_INSTRUCTIONS.to_string(),
            3,
        ),
        section(
            "Deliberation".to_string(),
            DELIBERATION_INSTRUCTIONS.to_string(),
            999,
        ),
    ]
}

fn general_instructions(case_type: CaseType) -> &'static str {
    match case_type {
        CaseType::Criminal => {
            "You have been sworn as jurors in this criminal case. Your duty is to determine \
             the facts and apply the law as I give it to you. You must not be influenced by \
             sympathy, prejudice, or public opinion. You must base your verdict solely on the \
             evidence presented in court and the law as I instruct you."
        }
        CaseType::Civil => {
            "You have been sworn as jurors in this civil case. Your duty is to determine \
             the facts and apply the law as I give it to you. You must not be influenced by \
             sympathy, prejudice, or public opinion. You must base your verdict solely on the \
             evidence presented in court and the law as I instruct you."
        }
    }
}

fn burden_instructions(case_type: CaseType) -> &'static str {
    match case_type {
        CaseType::Criminal => {
            "The defendant is presumed innocent. The prosecution has the burden of proving \
             the defendant guilty beyond a reasonable doubt. This means the prosecution must \
             prove each element of each charge beyond a reasonable doubt. If you have a \
             reasonable doubt about any element, you must find the defendant not guilty of \
             that charge."
        }
        CaseType::Civil => {
            "The plaintiff has the burden of proving their case by a preponderance of the \
             evidence. This means the plaintiff must prove that it is more likely than not \
             that their claims are true. If the plaintiff fails to meet this burden, you \
             must find for the defendant."
        }
    }
}

const EVIDENCE_INSTRUCTIONS: &str =
    "Evidence includes testimony of witnesses, exhibits admitted into evidence, and any \
     stipulations. You must consider all the evidence presented. You may not consider \
     evidence that was excluded or stricken from the record. You may not conduct your own \
     investigation or research outside the courtroom.";

const DELIBERATION_INSTRUCTIONS: &str =
    "You must deliberate together as a jury. Each of you must decide the case for yourself, \
     but you should do so only after discussing the evidence with your fellow jurors. You \
     must not surrender your honest conviction about the weight or effect of evidence solely \
     because of the opinion of your fellow jurors or for the mere purpose of returning a \
     verdict.";

fn element_instruction(name: &str, description: &str, case_type: CaseType) -> String {
    match case_type {
        CaseType::Criminal => format!(
            "The prosecution must prove beyond a reasonable doubt that: {name}. {description} \
             If the prosecution fails to prove this element beyond a reasonable doubt, you \
             must find the defendant not guilty."
        ),
        CaseType::Civil => format!(
            "The plaintiff must prove by a preponderance of the evidence that: {name}. \
             {description} If the plaintiff fails to prove this element, you must find for \
             the defendant on this issue."
        ),
    }
}

fn defense_instruction(name: &str, description: &str, case_type: CaseType) -> String {
    match case_type {
        CaseType::Criminal => format!(
            "The defendant has raised the defense of {name}. {description} If you find that \
             this defense applies, you must find the defendant not guilty."
        ),
        CaseType::Civil => format!(
            "The defendant has raised the defense of {name}. {description} If you find that \
             this defense applies, you must find for the defendant."
        ),
    }
}

fn expert_section() -> InstructionSection {
    section(
        "Expert Testimony".to_string(),
        "You have heard testimony from expert witnesses. Expert testimony is admissible to \
         help you understand technical or specialized subjects. You may accept or reject \
         expert testimony in whole or in part. Consider the expert's qualifications, the \
         basis for their opinions, and whether their testimony is supported by the evidence."
            .to_string(),
        40,
    )
}

fn credibility_section() -> InstructionSection {
    section(
        "Witness Credibility".to_string(),
        "You are the sole judges of the credibility of witnesses and the weight to be given \
         their testimony. In evaluating credibility, consider: the witness's demeanor and \
         manner of testifying; the witness's interest in the outcome of the case; the \
         witness's ability to observe, remember, and communicate; the reasonableness of the \
         testimony in light of all the evidence; and any bias, prejudice, or motive to lie."
            .to_string(),
        45,
    )
}

fn verdict_options(case_type: CaseType) -> Vec<String> {
    match case_type {
        CaseType::Criminal => vec!["Guilty".to_string(), "Not Guilty".to_string()],
        CaseType::Civil => vec!["For Plaintiff".to_string(), "For Defendant".to_string()],
    }
}

fn special_findings(case_type: CaseType) -> Vec<SpecialFinding> {
    match case_type {
        CaseType::Criminal => Vec::new(),
        CaseType::Civil => vec![SpecialFinding {
            name: "Compensatory Damages".to_string(),
            kind: "amount".to_string(),
            options: Vec::new(),
            required: false,
        }],
    }
}
