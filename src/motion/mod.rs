//! Motion Engine
//!
//! Rules on pre-trial motions by matching the motion's arguments against
//! the kind's ordered pattern list. First match wins; no match falls
//! through to the kind's default outcome. Fully deterministic.
//!
//! Unknown kind strings fall back to the limine rule set with a warning,
//! mirroring the objection engine's leniency toward unknown grounds.

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::rules::motion::{compiled_patterns, rule_set, ruling_text};
use crate::types::{Motion, MotionKind, MotionRequest, MotionStatus};

/// Rule on a single motion. Deterministic: identical arguments always
/// produce the identical ruling.
pub fn process_motion(case_id: &str, request: &MotionRequest) -> Motion {
    let kind = MotionKind::parse(&request.kind).unwrap_or_else(|| {
        warn!(kind = %request.kind, "unknown motion kind — falling back to limine rules");
        MotionKind::Limine
    });

    let rules = rule_set(kind);
    let regexes = compiled_patterns(kind);
    let arguments = request.arguments.as_str();

    let (status, reasoning) = rules
        .patterns
        .iter()
        .zip(regexes)
        .find(|(_, regex)| regex.is_match(arguments))
        .map_or(
            (rules.default_status, rules.default_reasoning),
            |(pattern, _)| (pattern.status, pattern.reasoning),
        );

    debug!(%kind, status = status.ruling_label(), "motion ruled");

    Motion {
        id: request.id.unwrap_or_else(Uuid::new_v4),
        case_id: case_id.to_string(),
        kind,
        arguments: request.arguments.clone(),
        filed_by: request.filed_by.clone(),
        status,
        ruling: ruling_text(status, kind),
        reasoning: reasoning.to_string(),
        processed_at: Utc::now(),
    }
}

/// Rule on a batch of motions in parallel. Output order matches input
/// order; each motion is ruled independently.
pub fn batch_process_motions(case_id: &str, requests: &[MotionRequest]) -> Vec<Motion> {
    requests
        .par_iter()
        .map(|request| process_motion(case_id, request))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(kind: &str, arguments: &str) -> MotionRequest {
        MotionRequest {
            kind: kind.to_string(),
            arguments: arguments.to_string(),
            filed_by: "defense".to_string(),
            ..MotionRequest::default()
        }
    }

    #[test]
    fn test_suppress_warrantless_granted() {
        let motion = process_motion(
            "case-1",
            &request("suppress", "The warrantless search of the vehicle violated the Fourth Amendment"),
        );
        assert_eq!(motion.kind, MotionKind::Suppress);
        assert_eq!(motion.status, MotionStatus::Granted);
        assert_eq!(motion.ruling, "Motion to suppress GRANTED");
        assert!(motion.reasoning.contains("without probable cause"));
    }

    #[test]
    fn test_limine_hearsay_granted_in_part() {
        let motion = process_motion(
            "case-1",
            &request("limine", "The statements are out of court assertions"),
        );
        assert_eq!(motion.status, MotionStatus::GrantedInPart);
        assert_eq!(motion.ruling, "Motion in limine GRANTED IN PART");
    }

    #[test]
    fn test_first_match_wins_over_later_patterns() {
        // Arguments match both "prejudicial" (denied, first) and
        // "character" (granted, second). Declared order decides.
        let motion = process_motion(
            "case-1",
            &request("limine", "The character evidence is prejudicial"),
        );
        assert_eq!(motion.status, MotionStatus::Denied);
    }

    #[test]
    fn test_no_match_uses_kind_default() {
        let motion = process_motion("case-1", &request("sever", "Routine scheduling grounds"));
        assert_eq!(motion.status, MotionStatus::Denied);
        assert_eq!(
            motion.reasoning,
            "Motion denied. Charges properly joined under rules of criminal procedure."
        );
    }

    #[test]
    fn test_unknown_kind_falls_back_to_limine() {
        let motion = process_motion("case-1", &request("mistrial", "Character evidence concerns"));
        assert_eq!(motion.kind, MotionKind::Limine);
        assert_eq!(motion.status, MotionStatus::Granted);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let motion = process_motion(
            "case-1",
            &request("suppress", "MIRANDA warnings were never given"),
        );
        assert_eq!(motion.status, MotionStatus::Granted);
    }

    #[test]
    fn test_ruling_is_deterministic() {
        let req = request("summary_judgment", "No genuine issue of material fact remains");
        let a = process_motion("case-1", &req);
        let b = process_motion("case-1", &req);
        assert_eq!(a.status, b.status);
        assert_eq!(a.ruling, b.ruling);
        assert_eq!(a.reasoning, b.reasoning);
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let requests = vec![
            request("suppress", "warrantless entry"),
            request("limine", "character and prior bad act evidence"),
            request("sever", "the joinder is prejudicial"),
        ];
        let motions = batch_process_motions("case-1", &requests);

        assert_eq!(motions.len(), 3);
        assert_eq!(motions[0].kind, MotionKind::Suppress);
        assert_eq!(motions[1].kind, MotionKind::Limine);
        assert_eq!(motions[2].kind, MotionKind::Sever);
        assert_eq!(motions[2].status, MotionStatus::Granted);
    }

    #[test]
    fn test_caller_supplied_id_is_kept() {
        let id = Uuid::new_v4();
        let mut req = request("limine", "hearsay statements");
        req.id = Some(id);
        let motion = process_motion("case-1", &req);
        assert_eq!(motion.id, id);
    }
}
