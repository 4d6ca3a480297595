//! Charge/claim rule table for case intake
//!
//! Maps summary text patterns to criminal charges and civil claims, each
//! carrying its burden of proof, required elements, and available defenses.

use crate::types::Burden;
use regex::Regex;
use std::sync::OnceLock;

/// One charge (criminal) or claim (civil) rule
#[derive(Debug)]
pub struct ChargeRule {
    /// Regex matched case-insensitively against the case summary
    pub pattern: &'static str,
    /// Count label, e.g. "Theft"
    pub label: &'static str,
    pub burden: Burden,
    /// Underscore-delimited element names
    pub elements: &'static [&'static str],
    pub defenses: &'static [&'static str],
}

/// Defenses shared by all criminal charges
const CRIMINAL_DEFENSES: &[&str] = &["alibi", "self_defense", "insanity", "duress", "entrapment"];

/// Defenses shared by all civil claims
const CIVIL_DEFENSES: &[&str] = &[
    "statute_of_limitations",
    "contributory_negligence",
    "assumption_of_risk",
    "immunity",
];

pub static CRIMINAL_CHARGES: &[ChargeRule] = &[
    ChargeRule {
        pattern: r"theft|stole|stolen",
        label: "Theft",
        burden: Burden::BeyondReasonableDoubt,
        elements: &["taking", "property_of_another", "without_consent", "intent_to_deprive"],
        defenses: CRIMINAL_DEFENSES,
    },
    ChargeRule {
        pattern: r"assault|battery|attack",
        label: "Assault",
        burden: Burden::BeyondReasonableDoubt,
        elements: &["intentional_act", "reasonable_apprehension", "imminent_harm"],
        defenses: CRIMINAL_DEFENSES,
    },
    ChargeRule {
        pattern: r"murder|homicide|killed",
        label: "Murder",
        burden: Burden::BeyondReasonableDoubt,
        elements: &["unlawful_killing", "human_being", "malice_aforethought"],
        defenses: CRIMINAL_DEFENSES,
    },
    ChargeRule {
        pattern: r"burglary|breaking|entering",
        label: "Burglary",
        burden: Burden::BeyondReasonableDoubt,
        elements: &["breaking", "entering", "dwelling", "intent_to_commit_felony"],
        defenses: CRIMINAL_DEFENSES,
    },
    ChargeRule {
        pattern: r"fraud|deceit|false",
        label: "Fraud",
        burden: Burden::BeyondReasonableDoubt,
        elements: &[
            "false_representation",
            "material_fact",
            "intent_to_deceive",
            "reliance",
            "damage",
        ],
        defenses: CRIMINAL_DEFENSES,
    },
    ChargeRule {
        pattern: r"drug|narcotic|controlled substance",
        label: "Drug Possession",
        burden: Burden::BeyondReasonableDoubt,
        // No specific element map — generic mens rea / actus reus pair
        elements: &["general_intent", "actus_reus"],
        defenses: CRIMINAL_DEFENSES,
    },
    ChargeRule {
        pattern: r"drunk|DUI|DWI|intoxicated",
        label: "DUI",
        burden: Burden::BeyondReasonableDoubt,
        elements: &["general_intent", "actus_reus"],
        defenses: CRIMINAL_DEFENSES,
    },
];

pub static CIVIL_CLAIMS: &[ChargeRule] = &[
    ChargeRule {
        pattern: r"breach|contract|agreement",
        label: "Breach of Contract",
        burden: Burden::Preponderance,
        elements: &["valid_contract", "breach", "damages"],
        defenses: CIVIL_DEFENSES,
    },
    ChargeRule {
        pattern: r"negligence|careless|fault",
        label: "Negligence",
        burden: Burden::Preponderance,
        elements: &["duty", "breach", "causation", "damages"],
        defenses: CIVIL_DEFENSES,
    },
    ChargeRule {
        pattern: r"defamation|libel|slander",
        label: "Defamation",
        burden: Burden::Preponderance,
        elements: &["false_statement", "publication", "fault", "damages"],
        defenses: CIVIL_DEFENSES,
    },
    ChargeRule {
        pattern: r"trespass|property|land",
        label: "Trespass",
        burden: Burden::Preponderance,
        elements: &["general_elements"],
        defenses: CIVIL_DEFENSES,
    },
    ChargeRule {
        pattern: r"nuisance|annoyance|disturbance",
        label: "Nuisance",
        burden: Burden::Preponderance,
        elements: &["general_elements"],
        defenses: CIVIL_DEFENSES,
    },
];

/// Compiled case-insensitive charge patterns, parallel to the rule slice.
#[allow(clippy::expect_used)]
fn compiled(rules: &'static [ChargeRule], cache: &'static OnceLock<Vec<Regex>>) -> &'static [Regex] {
    cache.get_or_init(|| {
        rules
            .iter()
            .map(|r| {
                Regex::new(&format!("(?i){}", r.pattern))
                    .expect("built-in charge pattern must compile")
            })
            .collect()
    })
}

/// Criminal charge patterns, compiled once.
pub fn compiled_criminal() -> &'static [Regex] {
    static CACHE: OnceLock<Vec<Regex>> = OnceLock::new();
    compiled(CRIMINAL_CHARGES, &CACHE)
}

/// Civil claim patterns, compiled once.
pub fn compiled_civil() -> &'static [Regex] {
    static CACHE: OnceLock<Vec<Regex>> = OnceLock::new();
    compiled(CIVIL_CLAIMS, &CACHE)
}
