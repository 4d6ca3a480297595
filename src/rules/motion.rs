//! Motion outcome rule table
//!
//! Each motion kind carries an ordered pattern list; the motion engine
//! evaluates patterns in declared order and the first match wins. Pattern
//! order is load-bearing — reordering changes rulings.

use crate::types::{MotionKind, MotionStatus};
use regex::Regex;
use std::sync::OnceLock;

/// One outcome pattern: regex → (status, reasoning)
#[derive(Debug)]
pub struct MotionPattern {
    pub pattern: &'static str,
    pub status: MotionStatus,
    pub reasoning: &'static str,
}

/// Rule set for one motion kind
#[derive(Debug)]
pub struct MotionRuleSet {
    pub kind: MotionKind,
    /// Evaluated in declared order; first match determines the ruling
    pub patterns: &'static [MotionPattern],
    pub default_status: MotionStatus,
    pub default_reasoning: &'static str,
}

pub static MOTION_RULE_SETS: &[MotionRuleSet] = &[
    MotionRuleSet {
        kind: MotionKind::Limine,
        patterns: &[
            MotionPattern {
                pattern: r"prejudicial|prejudice|unfair",
                status: MotionStatus::Denied,
                reasoning: "Motion denied. Evidence is relevant and probative value outweighs prejudicial effect.",
            },
            MotionPattern {
                pattern: r"character|prior|bad act",
                status: MotionStatus::Granted,
                reasoning: "Motion granted. Character evidence inadmissible without proper foundation.",
            },
            MotionPattern {
                pattern: r"hearsay|out of court",
                status: MotionStatus::GrantedInPart,
                reasoning: "Motion granted in part. Some statements may be admissible under hearsay exceptions.",
            },
            MotionPattern {
                pattern: r"expert|qualification|credentials",
                status: MotionStatus::Denied,
                reasoning: "Motion denied. Expert appears qualified based on credentials and experience.",
            },
        ],
        default_status: MotionStatus::Denied,
        default_reasoning: "Motion denied. Moving party has not met burden of showing inadmissibility.",
    },
    MotionRuleSet {
        kind: MotionKind::Suppress,
        patterns: &[
            MotionPattern {
                pattern: r"illegal search|warrantless|unreasonable",
                status: MotionStatus::Granted,
                reasoning: "Motion granted. Search conducted without probable cause or valid warrant.",
            },
            MotionPattern {
                pattern: r"consent|voluntary|knowing",
                status: MotionStatus::Denied,
                reasoning: "Motion denied. Defendant voluntarily consented to search.",
            },
            MotionPattern {
                pattern: r"miranda|rights|custodial",
                status: MotionStatus::Granted,
                reasoning: "Motion granted. Defendant was in custody and not properly advised of rights.",
            },
            MotionPattern {
                pattern: r"fruit of poisonous tree|derivative",
                status: MotionStatus::GrantedInPart,
                reasoning: "Motion granted in part. Some evidence excluded as fruit of unlawful search.",
            },
        ],
        default_status: MotionStatus::Denied,
        default_reasoning: "Motion denied. Search was conducted lawfully with proper authorization.",
    },
    MotionRuleSet {
        kind: MotionKind::SummaryJudgment,
        patterns: &[
            MotionPattern {
                pattern: r"no genuine issue|material fact|disputed",
                status: MotionStatus::Granted,
                reasoning: "Motion granted. No genuine issue of material fact exists.",
            },
            MotionPattern {
                pattern: r"reasonable jury|could find|evidence",
                status: MotionStatus::Denied,
                reasoning: "Motion denied. Reasonable jury could find for non-moving party.",
            },
            MotionPattern {
                pattern: r"burden of proof|elements|established",
                status: MotionStatus::Granted,
                reasoning: "Motion granted. Moving party has established all elements as matter of law.",
            },
            MotionPattern {
                pattern: r"credibility|witness|testimony",
                status: MotionStatus::Denied,
                reasoning: "Motion denied. Credibility determinations are for jury to decide.",
            },
        ],
        default_status: MotionStatus::Denied,
        default_reasoning: "Motion denied. Genuine issues of material fact exist requiring trial.",
    },
    MotionRuleSet {
        kind: MotionKind::Sever,
        patterns: &[
            MotionPattern {
                pattern: r"prejudicial|joinder|unfair",
                status: MotionStatus::Granted,
                reasoning: "Motion granted. Severance necessary to avoid prejudice.",
            },
            MotionPattern {
                pattern: r"separate trials|different evidence",
                status: MotionStatus::Granted,
                reasoning: "Motion granted. Separate trials will promote judicial economy and fairness.",
            },
            MotionPattern {
                pattern: r"same transaction|common scheme",
                status: MotionStatus::Denied,
                reasoning: "Motion denied. Charges arise from same transaction or common scheme.",
            },
            MotionPattern {
                pattern: r"witness|testimony|overlap",
                status: MotionStatus::Denied,
                reasoning: "Motion denied. Evidence and witnesses overlap significantly.",
            },
        ],
        default_status: MotionStatus::Denied,
        default_reasoning: "Motion denied. Charges properly joined under rules of criminal procedure.",
    },
];

/// Rule set for a kind. The table covers every `MotionKind` variant.
pub fn rule_set(kind: MotionKind) -> &'static MotionRuleSet {
    MOTION_RULE_SETS
        .iter()
        .find(|rs| rs.kind == kind)
        .unwrap_or(&MOTION_RULE_SETS[0])
}

/// Compiled pattern list for a kind, case-insensitive, built once.
#[allow(clippy::expect_used)]
pub fn compiled_patterns(kind: MotionKind) -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<(MotionKind, Vec<Regex>)>> = OnceLock::new();
    let all = COMPILED.get_or_init(|| {
        MOTION_RULE_SETS
            .iter()
            .map(|rs| {
                let regexes = rs
                    .patterns
                    .iter()
                    .map(|p| {
                        Regex::new(&format!("(?i){}", p.pattern))
                            .expect("built-in motion pattern must compile")
                    })
                    .collect();
                (rs.kind, regexes)
            })
            .collect()
    });
    all.iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, r)| r.as_slice())
        .unwrap_or(&[])
}

/// Ruling text from the (status × kind) lookup, e.g.
/// "Motion to suppress GRANTED IN PART".
pub fn ruling_text(status: MotionStatus, kind: MotionKind) -> String {
    format!("{} {}", kind.display_name(), status.ruling_label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_rule_set() {
        for kind in [
            MotionKind::Limine,
            MotionKind::Suppress,
            MotionKind::SummaryJudgment,
            MotionKind::Sever,
        ] {
            let rs = rule_set(kind);
            assert_eq!(rs.kind, kind);
            assert!(!rs.patterns.is_empty());
            assert_eq!(compiled_patterns(kind).len(), rs.patterns.len());
        }
    }

    #[test]
    fn test_ruling_text_lookup() {
        assert_eq!(
            ruling_text(MotionStatus::Granted, MotionKind::Limine),
            "Motion in limine GRANTED"
        );
        assert_eq!(
            ruling_text(MotionStatus::GrantedInPart, MotionKind::Suppress),
            "Motion to suppress GRANTED IN PART"
        );
        assert_eq!(
            ruling_text(MotionStatus::Denied, MotionKind::SummaryJudgment),
            "Motion for summary judgment DENIED"
        );
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let regexes = compiled_patterns(MotionKind::Suppress);
        assert!(regexes[0].is_match("WARRANTLESS entry into the home"));
    }
}
