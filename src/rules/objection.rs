//! Objection ground rule table
//!
//! Two tables drive the objection engine:
//! - `SUGGESTION_RULES`: pattern sets that flag objectionable turn text
//! - `RULING_RULES`: per-ground base sustain probabilities, named
//!   exceptions, and ruling text templates
//!
//! Explanation strings are keyed by (ground, sustained) and selected after
//! the ruling outcome is known.

use regex::Regex;
use std::sync::OnceLock;

// ============================================================================
// Suggestion Rules
// ============================================================================

/// One suggestion rule: a pattern set that maps turn text to a legal ground
#[derive(Debug)]
pub struct SuggestionRule {
    /// Stable rule key, e.g. "hearsay", "leading"
    pub objection_type: &'static str,
    /// Regex patterns matched against lower-cased turn text
    pub patterns: &'static [&'static str],
    /// Legal ground, e.g. "Hearsay"
    pub ground: &'static str,
    pub description: &'static str,
}

/// Suggestion rules, in declared priority order.
pub static SUGGESTION_RULES: &[SuggestionRule] = &[
    SuggestionRule {
        objection_type: "hearsay",
        patterns: &[
            r"he said",
            r"she said",
            r"they said",
            r"told me",
            r"heard that",
            r"according to",
            r"someone told me",
            r"word on the street",
        ],
        ground: "Hearsay",
        description: "Out-of-court statement offered for truth",
    },
    SuggestionRule {
        objection_type: "leading",
        patterns: &[
            r"isn't it true that",
            r"wouldn't you agree",
            r"don't you think",
            r"you would say",
            r"you must admit",
            r"you have to agree",
        ],
        ground: "Leading Question",
        description: "Question suggests the answer",
    },
    SuggestionRule {
        objection_type: "compound",
        patterns: &[r"\?.*\?.*\?", r"and.*\?", r"but.*\?", r"or.*\?"],
        ground: "Compound Question",
        description: "Multiple questions in one",
    },
    SuggestionRule {
        objection_type: "argumentative",
        patterns: &[
            r"how dare you",
            r"how could you",
            r"why would anyone",
            r"what kind of person",
            r"don't you feel guilty",
        ],
        ground: "Argumentative",
        description: "Question is argumentative or inflammatory",
    },
    SuggestionRule {
        objection_type: "asked_and_answered",
        patterns: &[
            r"we already covered",
            r"you already answered",
            r"we discussed this",
        ],
        ground: "Asked and Answered",
        description: "Question already asked and answered",
    },
    SuggestionRule {
        objection_type: "relevance",
        patterns: &[
            r"what does this have to do",
            r"how is this relevant",
            r"what's the point",
            r"why are we talking about",
        ],
        ground: "Relevance",
        description: "Evidence not relevant to case",
    },
    SuggestionRule {
        objection_type: "speculation",
        patterns: &[
            r"what do you think",
            r"what might have",
            r"what could have",
            r"in your opinion",
            r"what if",
        ],
        ground: "Speculation",
        description: "Witness speculating without foundation",
    },
    SuggestionRule {
        objection_type: "character",
        patterns: &[
            r"what kind of person",
            r"are you a",
            r"do you often",
            r"have you ever",
            r"your reputation",
        ],
        ground: "Character Evidence",
        description: "Character evidence not admissible",
    },
    SuggestionRule {
        objection_type: "privilege",
        patterns: &[
            r"attorney client",
            r"doctor patient",
            r"spousal privilege",
            r"confidential",
            r"privileged",
        ],
        ground: "Privilege",
        description: "Protected by privilege",
    },
    SuggestionRule {
        objection_type: "best_evidence",
        patterns: &[
            r"copy of",
            r"photograph of",
            r"description of",
            r"summary of",
            r"instead of the original",
        ],
        ground: "Best Evidence",
        description: "Original document required",
    },
];

/// A suggestion rule with its patterns compiled
#[derive(Debug)]
pub struct CompiledSuggestionRule {
    pub rule: &'static SuggestionRule,
    pub regexes: Vec<Regex>,
}

static COMPILED_RULES: OnceLock<Vec<CompiledSuggestionRule>> = OnceLock::new();

/// Suggestion rules with compiled regexes, built once per process.
///
/// Patterns are built-in literals; a failure to compile is a table bug
/// caught by `test_all_patterns_compile`.
#[allow(clippy::expect_used)]
pub fn compiled_suggestion_rules() -> &'static [CompiledSuggestionRule] {
    COMPILED_RULES.get_or_init(|| {
        SUGGESTION_RULES
            .iter()
            .map(|rule| CompiledSuggestionRule {
                rule,
                regexes: rule
                    .patterns
                    .iter()
                    .map(|p| Regex::new(p).expect("built-in objection pattern must compile"))
                    .collect(),
            })
            .collect()
    })
}

// ============================================================================
// Ruling Rules
// ============================================================================

/// Per-ground ruling rule: base probability, exceptions, text template.
///
/// Templates may reference `{ground}`, `{result}`, and `{explanation}`.
#[derive(Debug, Clone)]
pub struct RulingRule {
    pub ground: &'static str,
    /// Base probability the objection is sustained, before context overrides
    pub sustained_probability: f64,
    /// Named exceptions recorded for reference (not rule logic)
    pub exceptions: &'static [&'static str],
    pub ruling_template: &'static str,
}

/// Lenient fallback for unknown grounds — a deliberate policy, not an error.
pub static DEFAULT_RULING_RULE: RulingRule = RulingRule {
    ground: "",
    sustained_probability: 0.5,
    exceptions: &[],
    ruling_template: "Objection {result}. The court will consider the arguments.",
};

pub static RULING_RULES: &[RulingRule] = &[
    RulingRule {
        ground: "Hearsay",
        sustained_probability: 0.8,
        exceptions: &[
            "present_sense_impression",
            "excited_utterance",
            "state_of_mind",
        ],
        ruling_template: "Objection sustained. {ground} is inadmissible unless an exception applies.",
    },
    RulingRule {
        ground: "Leading Question",
        sustained_probability: 0.6,
        exceptions: &["cross_examination", "hostile_witness", "preliminary_matters"],
        ruling_template: "Objection {result}. {explanation}",
    },
    RulingRule {
        ground: "Compound Question",
        sustained_probability: 0.9,
        exceptions: &[],
        ruling_template: "Objection sustained. Please ask one question at a time.",
    },
    RulingRule {
        ground: "Argumentative",
        sustained_probability: 0.85,
        exceptions: &[],
        ruling_template: "Objection sustained. The question is argumentative.",
    },
    RulingRule {
        ground: "Asked and Answered",
        sustained_probability: 0.7,
        exceptions: &["clarification_needed"],
        ruling_template: "Objection sustained. The question has been asked and answered.",
    },
    RulingRule {
        ground: "Relevance",
        sustained_probability: 0.75,
        exceptions: &["foundation_being_laid"],
        ruling_template: "Objection sustained. The evidence is not relevant to this case.",
    },
    RulingRule {
        ground: "Speculation",
        sustained_probability: 0.8,
        exceptions: &["expert_witness", "lay_opinion"],
        ruling_template: "Objection sustained. The witness may not speculate.",
    },
    RulingRule {
        ground: "Character Evidence",
        sustained_probability: 0.9,
        exceptions: &["character_in_issue", "impeachment"],
        ruling_template: "Objection sustained. Character evidence is not admissible.",
    },
    RulingRule {
        ground: "Privilege",
        sustained_probability: 0.95,
        exceptions: &["waiver"],
        ruling_template: "Objection sustained. The communication is privileged.",
    },
    RulingRule {
        ground: "Best Evidence",
        sustained_probability: 0.7,
        exceptions: &["original_unavailable", "duplicate_authenticated"],
        ruling_template: "Objection sustained. The original document must be produced.",
    },
];

/// Look up the ruling rule for a ground, falling back to the lenient default.
pub fn ruling_rule(ground: &str) -> &'static RulingRule {
    RULING_RULES
        .iter()
        .find(|r| r.ground == ground)
        .unwrap_or(&DEFAULT_RULING_RULE)
}

// ============================================================================
// Explanations
// ============================================================================

static SUSTAINED_EXPLANATIONS: &[(&str, &str)] = &[
    ("Hearsay", "The statement is hearsay and no exception applies."),
    (
        "Leading Question",
        "Leading questions are not permitted in direct examination.",
    ),
    (
        "Compound Question",
        "The question contains multiple parts and may confuse the witness.",
    ),
    ("Argumentative", "The question is argumentative and inflammatory."),
    (
        "Asked and Answered",
        "This question has already been asked and answered.",
    ),
    (
        "Relevance",
        "The evidence is not relevant to the issues in this case.",
    ),
    (
        "Speculation",
        "The witness lacks personal knowledge to answer this question.",
    ),
    (
        "Character Evidence",
        "Character evidence is generally inadmissible.",
    ),
    ("Privilege", "The communication is protected by privilege."),
    ("Best Evidence", "The original document must be produced."),
];

static OVERRULED_EXPLANATIONS: &[(&str, &str)] = &[
    ("Hearsay", "An exception to the hearsay rule applies."),
    (
        "Leading Question",
        "Leading questions are permitted in cross-examination.",
    ),
    ("Compound Question", "The question is clear and not confusing."),
    (
        "Argumentative",
        "The question is not argumentative in this context.",
    ),
    (
        "Asked and Answered",
        "The question seeks clarification of previous testimony.",
    ),
    (
        "Relevance",
        "The evidence is relevant to the issues in this case.",
    ),
    ("Speculation", "The witness has sufficient knowledge to answer."),
    (
        "Character Evidence",
        "Character evidence is admissible in this context.",
    ),
    (
        "Privilege",
        "The privilege has been waived or does not apply.",
    ),
    (
        "Best Evidence",
        "The duplicate is admissible under the circumstances.",
    ),
];

/// Explanation string keyed by (ground, sustained).
pub fn explanation(ground: &str, sustained: bool) -> &'static str {
    let table = if sustained {
        SUSTAINED_EXPLANATIONS
    } else {
        OVERRULED_EXPLANATIONS
    };
    table
        .iter()
        .find(|(g, _)| *g == ground)
        .map(|(_, e)| *e)
        .unwrap_or("The court finds the objection appropriate.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        let compiled = compiled_suggestion_rules();
        assert_eq!(compiled.len(), SUGGESTION_RULES.len());
        for c in compiled {
            assert_eq!(c.regexes.len(), c.rule.patterns.len());
        }
    }

    #[test]
    fn test_every_suggestion_ground_has_ruling_rule() {
        for rule in SUGGESTION_RULES {
            let ruling = ruling_rule(rule.ground);
            assert_eq!(
                ruling.ground, rule.ground,
                "ground {} fell back to default",
                rule.ground
            );
        }
    }

    #[test]
    fn test_probabilities_are_valid() {
        for rule in RULING_RULES {
            assert!(rule.sustained_probability >= 0.0 && rule.sustained_probability <= 1.0);
        }
    }

    #[test]
    fn test_unknown_ground_falls_back() {
        let rule = ruling_rule("Nonexistent Ground");
        assert_eq!(rule.sustained_probability, 0.5);
        assert_eq!(
            explanation("Nonexistent Ground", true),
            "The court finds the objection appropriate."
        );
    }

    #[test]
    fn test_explanations_cover_every_ground() {
        for rule in SUGGESTION_RULES {
            assert_ne!(
                explanation(rule.ground, true),
                "The court finds the objection appropriate."
            );
            assert_ne!(
                explanation(rule.ground, false),
                "The court finds the objection appropriate."
            );
        }
    }
}
