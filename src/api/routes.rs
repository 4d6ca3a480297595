//! API route table.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, AppState};

/// Build the API router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // System
        .route("/system/health", get(handlers::system_health))
        // Cases
        .route("/cases", post(handlers::create_case))
        .route("/cases", get(handlers::list_cases))
        .route("/cases/:case_id", get(handlers::get_case))
        // Trial
        .route("/cases/:case_id/trial", post(handlers::start_trial))
        .route("/cases/:case_id/trial", get(handlers::get_trial))
        .route("/cases/:case_id/trial/phase", post(handlers::advance_phase))
        .route("/cases/:case_id/trial/turns", post(handlers::add_turn))
        .route("/cases/:case_id/trial/examination", post(handlers::start_examination))
        .route("/cases/:case_id/trial/examination/end", post(handlers::end_examination))
        .route("/cases/:case_id/trial/exhibits/:exhibit_code/admit", post(handlers::admit_exhibit))
        .route("/cases/:case_id/trial/summary", get(handlers::trial_summary))
        // Objections
        .route("/cases/:case_id/objections/suggest", post(handlers::suggest_objections))
        .route("/cases/:case_id/objections", post(handlers::raise_objection))
        .route("/cases/:case_id/objections/stats", get(handlers::objection_stats))
        // Motions
        .route("/cases/:case_id/motions", post(handlers::file_motion))
        .route("/cases/:case_id/motions", get(handlers::list_motions))
        .route("/cases/:case_id/motions/batch", post(handlers::file_motion_batch))
        // Jury instructions
        .route("/cases/:case_id/instructions", post(handlers::generate_instructions))
        .route("/cases/:case_id/instructions", get(handlers::get_instructions))
        .route("/cases/:case_id/instructions/publish", post(handlers::publish_instructions))
        // Deliberation
        .route("/cases/:case_id/deliberation", post(handlers::start_deliberation))
        .route("/cases/:case_id/deliberation", get(handlers::get_deliberation))
        .route("/cases/:case_id/deliberation/rounds", post(handlers::process_round))
        .route("/cases/:case_id/deliberation/verdict", post(handlers::reach_verdict))
        .route("/cases/:case_id/deliberation/summary", get(handlers::deliberation_summary))
        .route("/cases/:case_id/verdicts", get(handlers::list_verdicts))
        .with_state(state)
}
