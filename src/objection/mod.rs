//! Objection Engine
//!
//! Two halves:
//! - `suggest_objection_grounds`: scans turn text against the suggestion
//!   rule table and returns ranked suggestions (deterministic).
//! - `process_objection`: rules on a raised objection. The sustain/overrule
//!   draw uses an injected RNG so callers (and tests) control determinism;
//!   two hard context overrides bypass the draw entirely.
//!
//! Unknown grounds fall back to a lenient default rule rather than failing.

use chrono::Utc;
use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::rules::objection::{compiled_suggestion_rules, explanation, ruling_rule};
use crate::types::{
    ExaminationMode, Objection, ObjectionMeta, ObjectionRequest, ObjectionRuling,
    ObjectionSuggestion, ObjectionStats, TrialContext, TrialPhase, TrialState, WitnessType,
};

// Engine constants (defaults — overridden by gavel.toml)
pub const DEFAULT_CONFIDENCE_PER_MATCH: f64 = 0.3;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;
pub const DEFAULT_CROSS_LEADING_FACTOR: f64 = 0.5;
pub const DEFAULT_DIRECT_LEADING_FACTOR: f64 = 1.2;

fn cfg_confidence_per_match() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().objection.confidence_per_match
    } else {
        DEFAULT_CONFIDENCE_PER_MATCH
    }
}

fn cfg_min_confidence() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().objection.min_confidence
    } else {
        DEFAULT_MIN_CONFIDENCE
    }
}

fn cfg_max_suggestions() -> usize {
    if crate::config::is_initialized() {
        crate::config::get().objection.max_suggestions
    } else {
        DEFAULT_MAX_SUGGESTIONS
    }
}

fn cfg_cross_leading_factor() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().objection.cross_leading_factor
    } else {
        DEFAULT_CROSS_LEADING_FACTOR
    }
}

fn cfg_direct_leading_factor() -> f64 {
    if crate::config::is_initialized() {
        crate::config::get().objection.direct_leading_factor
    } else {
        DEFAULT_DIRECT_LEADING_FACTOR
    }
}

// ============================================================================
// Suggestion
// ============================================================================

/// Scan turn text for objectionable content.
///
/// Each matching pattern yields a candidate with
/// confidence = min(matches * 0.3, 1.0), adjusted for examination context,
/// then filtered (strictly > 0.3), sorted descending, and capped at 3.
/// Deterministic for identical text/context.
pub fn suggest_objection_grounds(turn_text: &str, context: &TrialContext) -> Vec<ObjectionSuggestion> {
    let turn_lower = turn_text.to_lowercase();
    let mut suggestions: Vec<ObjectionSuggestion> = Vec::new();

    for compiled in compiled_suggestion_rules() {
        let rule = compiled.rule;
        for (pattern, regex) in rule.patterns.iter().zip(&compiled.regexes) {
            let matches = regex.find_iter(&turn_lower).count();
            if matches == 0 {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let mut confidence = (matches as f64 * cfg_confidence_per_match()).min(1.0);
            confidence = adjust_for_context(confidence, rule.objection_type, context);

            if confidence > cfg_min_confidence() {
                suggestions.push(ObjectionSuggestion {
                    id: Uuid::new_v4(),
                    ground: rule.ground.to_string(),
                    description: rule.description.to_string(),
                    confidence: (confidence * 100.0).round() / 100.0,
                    pattern_matched: (*pattern).to_string(),
                    objection_type: rule.objection_type.to_string(),
                    suggested_at: Utc::now(),
                });
            }
        }
    }

    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions.truncate(cfg_max_suggestions());

    debug!(
        suggestions = suggestions.len(),
        text_len = turn_text.len(),
        "objection suggestions computed"
    );
    suggestions
}

/// Context adjustment: leading questions are more acceptable in cross, less
/// acceptable in direct. Confidence stays capped at 1.0.
fn adjust_for_context(confidence: f64, objection_type: &str, context: &TrialContext) -> f64 {
    if context.phase != Some(TrialPhase::WitnessExamination) || objection_type != "leading" {
        return confidence;
    }
    match context.examination_mode {
        Some(ExaminationMode::Cross) => confidence * cfg_cross_leading_factor(),
        Some(ExaminationMode::Direct) => (confidence * cfg_direct_leading_factor()).min(1.0),
        _ => confidence,
    }
}

// ============================================================================
// Ruling
// ============================================================================

/// Rule on a raised objection, producing an immutable [`Objection`] record.
///
/// The sustain outcome is drawn from the ground's base probability using
/// the injected RNG, except for two hard overrides that bypass the draw:
/// leading questions in cross-examination are always overruled, and
/// speculation objections against an expert witness are always overruled.
pub fn process_objection<R: Rng + ?Sized>(request: &ObjectionRequest, rng: &mut R) -> Objection {
    let ground = request.ground.as_str();
    let rule = ruling_rule(ground);
    if rule.ground.is_empty() {
        warn!(ground, "unknown objection ground — using default ruling rule");
    }

    let sustained = if let Some(forced) = context_override(ground, &request.context) {
        forced
    } else {
        rng.gen::<f64>() < rule.sustained_probability
    };

    let ruling = if sustained {
        ObjectionRuling::Sustained
    } else {
        ObjectionRuling::Overruled
    };
    let explanation_text = explanation(ground, sustained);
    let ruling_text = rule
        .ruling_template
        .replace("{ground}", ground)
        .replace("{result}", &ruling.to_string())
        .replace("{explanation}", explanation_text);

    debug!(ground, %ruling, "objection ruled");

    Objection {
        id: Uuid::new_v4(),
        case_id: request.context.case_id.clone(),
        turn_id: request.context.turn_id,
        ground: ground.to_string(),
        objecting_party: request
            .objecting_party
            .clone()
            .unwrap_or_else(|| "defense".to_string()),
        ruling,
        ruling_text,
        explanation: explanation_text.to_string(),
        created_at: Utc::now(),
        meta: ObjectionMeta {
            context: request.context.clone(),
            confidence: request.confidence,
        },
    }
}

/// Hard context overrides: `Some(sustained)` bypasses the probabilistic
/// draw entirely.
fn context_override(ground: &str, context: &TrialContext) -> Option<bool> {
    if ground == "Leading Question" && context.examination_mode == Some(ExaminationMode::Cross) {
        // Leading questions are generally allowed in cross.
        return Some(false);
    }
    if ground == "Speculation" && context.witness_type == Some(WitnessType::Expert) {
        // Experts may give opinions.
        return Some(false);
    }
    None
}

// ============================================================================
// Statistics
// ============================================================================

/// Aggregate objection statistics over a trial's ruling log.
pub fn objection_statistics(state: &TrialState) -> ObjectionStats {
    let mut stats = ObjectionStats {
        case_id: state.case_id.clone(),
        total_objections: state.objections.len(),
        ..ObjectionStats::default()
    };

    for objection in &state.objections {
        match objection.ruling {
            ObjectionRuling::Sustained => stats.sustained_count += 1,
            ObjectionRuling::Overruled => stats.overruled_count += 1,
        }
        *stats.grounds_breakdown.entry(objection.ground.clone()).or_insert(0) += 1;
    }

    stats.most_common_ground = stats
        .grounds_breakdown
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(ground, _)| ground.clone());

    #[allow(clippy::cast_precision_loss)]
    if stats.total_objections > 0 {
        stats.sustained_rate = stats.sustained_count as f64 / stats.total_objections as f64;
    }

    stats
}

// ============================================================================
// Tests
// ============================================================================
