//! API route handlers
//!
//! Request handling logic for all trial endpoints: case intake, trial
//! state machine operations, objection suggestion and rulings, motion
//! rulings, jury instructions, and deliberation.
//!
//! Engines are pure; handlers load state from the repository, call the
//! engine, and write the updated state back. Per-case access is serialized
//! behind the state lock, keeping the single-writer invariant the engines
//! assume.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::RetryConfig;
use crate::deliberation::{self, DeliberationError};
use crate::director::{self, TrialError};
use crate::instructions::{self, InstructionError};
use crate::intake::{self, IntakeRequest};
use crate::motion;
use crate::objection;
use crate::storage::{with_retry, Repository, RepositoryError};
use crate::types::{
    DeliberationStatus, ExaminationMode, MotionRequest, ObjectionRequest, TrialContext,
    TrialPhase, TurnData, Vote,
};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (in-memory by default)
    pub repository: Arc<dyn Repository>,
    /// Ruling/deliberation RNG; seeded for reproducible runs
    pub rng: Arc<Mutex<StdRng>>,
    /// Serializes state read-modify-write cycles per process
    pub write_lock: Arc<RwLock<()>>,
}

impl AppState {
    pub fn new(repository: Arc<dyn Repository>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            repository,
            rng: Arc::new(Mutex::new(rng)),
            write_lock: Arc::new(RwLock::new(())),
        }
    }
}

fn retry_policy() -> RetryConfig {
    if crate::config::is_initialized() {
        crate::config::get().retry.clone()
    } else {
        RetryConfig::default()
    }
}

fn repo_error(err: &RepositoryError) -> Response {
    match err {
        RepositoryError::NotFound => ApiErrorResponse::not_found("resource not found"),
        RepositoryError::Conflict(what) => ApiErrorResponse::conflict(what.to_string()),
        RepositoryError::Storage(msg) => ApiErrorResponse::service_unavailable(msg.clone()),
        RepositoryError::Serialization(msg) => ApiErrorResponse::internal(msg.clone()),
    }
}

fn trial_error(err: &TrialError) -> Response {
    ApiErrorResponse::bad_request(err.to_string())
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AdvancePhaseRequest {
    pub phase: String,
}

#[derive(Debug, Deserialize)]
pub struct ExaminationRequest {
    pub witness_id: String,
    pub mode: ExaminationMode,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub text: String,
    #[serde(default)]
    pub context: TrialContext,
}

#[derive(Debug, Deserialize)]
pub struct StartDeliberationRequest {
    pub jury_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RoundRequest {
    pub evidence_strength: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub cases: usize,
}

// ============================================================================
// Health
// ============================================================================

pub async fn system_health(State(state): State<AppState>) -> Response {
    match state.repository.list_cases() {
        Ok(cases) => ApiResponse::ok(HealthResponse {
            status: "ok",
            backend: state.repository.backend_name(),
            cases: cases.len(),
        }),
        Err(err) => repo_error(&err),
    }
}

// ============================================================================
// Cases
// ============================================================================

pub async fn create_case(
    State(state): State<AppState>,
    Json(request): Json<IntakeRequest>,
) -> Response {
    let case = intake::normalize_intake(&request);
    let policy = retry_policy();
    match with_retry(&policy, || state.repository.create_case(&case)).await {
        Ok(()) => ApiResponse::created(case),
        Err(err) => repo_error(&err),
    }
}

pub async fn list_cases(State(state): State<AppState>) -> Response {
    match state.repository.list_cases() {
        Ok(cases) => ApiResponse::ok(cases),
        Err(err) => repo_error(&err),
    }
}

pub async fn get_case(State(state): State<AppState>, Path(case_id): Path<String>) -> Response {
    match state.repository.get_case(&case_id) {
        Ok(Some(case)) => ApiResponse::ok(case),
        Ok(None) => ApiErrorResponse::not_found(format!("case {case_id} not found")),
        Err(err) => repo_error(&err),
    }
}

// ============================================================================
// Trial
// ============================================================================

pub async fn start_trial(State(state): State<AppState>, Path(case_id): Path<String>) -> Response {
    let _guard = state.write_lock.write().await;

    match state.repository.get_case(&case_id) {
        Ok(Some(_)) => {}
        Ok(None) => return ApiErrorResponse::not_found(format!("case {case_id} not found")),
        Err(err) => return repo_error(&err),
    }
    match state.repository.get_trial_state(&case_id) {
        Ok(Some(_)) => {
            return ApiErrorResponse::conflict(format!("trial for case {case_id}"));
        }
        Ok(None) => {}
        Err(err) => return repo_error(&err),
    }

    let trial = match director::start_trial(&case_id) {
        Ok(trial) => trial,
        Err(err) => return trial_error(&err),
    };
    match state.repository.put_trial_state(&trial) {
        Ok(()) => ApiResponse::created(trial),
        Err(err) => repo_error(&err),
    }
}

pub async fn get_trial(State(state): State<AppState>, Path(case_id): Path<String>) -> Response {
    match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => ApiResponse::ok(trial),
        Ok(None) => ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => repo_error(&err),
    }
}

pub async fn advance_phase(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(request): Json<AdvancePhaseRequest>,
) -> Response {
    let Some(phase) = TrialPhase::parse(&request.phase) else {
        return ApiErrorResponse::bad_request(format!("unknown phase {}", request.phase));
    };

    let _guard = state.write_lock.write().await;
    let mut trial = match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => trial,
        Ok(None) => return ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => return repo_error(&err),
    };

    if let Err(err) = director::advance_phase(&mut trial, phase) {
        return trial_error(&err);
    }
    match state.repository.put_trial_state(&trial) {
        Ok(()) => ApiResponse::ok(trial),
        Err(err) => repo_error(&err),
    }
}

pub async fn add_turn(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(data): Json<TurnData>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let case = match state.repository.get_case(&case_id) {
        Ok(Some(case)) => case,
        Ok(None) => return ApiErrorResponse::not_found(format!("case {case_id} not found")),
        Err(err) => return repo_error(&err),
    };
    let mut trial = match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => trial,
        Ok(None) => return ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => return repo_error(&err),
    };

    let updates = match director::add_turn(&mut trial, data, &case.elements) {
        Ok(updates) => updates,
        Err(err) => return trial_error(&err),
    };
    match state.repository.put_trial_state(&trial) {
        Ok(()) => ApiResponse::ok(serde_json::json!({
            "turn": trial.turns.last(),
            "coverage_updates": updates,
        })),
        Err(err) => repo_error(&err),
    }
}

pub async fn start_examination(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(request): Json<ExaminationRequest>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let mut trial = match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => trial,
        Ok(None) => return ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => return repo_error(&err),
    };

    if let Err(err) = director::start_witness_examination(&mut trial, &request.witness_id, request.mode)
    {
        return trial_error(&err);
    }
    match state.repository.put_trial_state(&trial) {
        Ok(()) => ApiResponse::ok(trial),
        Err(err) => repo_error(&err),
    }
}

pub async fn end_examination(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let mut trial = match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => trial,
        Ok(None) => return ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => return repo_error(&err),
    };

    if let Err(err) = director::end_witness_examination(&mut trial) {
        return trial_error(&err);
    }
    match state.repository.put_trial_state(&trial) {
        Ok(()) => ApiResponse::ok(trial),
        Err(err) => repo_error(&err),
    }
}

pub async fn admit_exhibit(
    State(state): State<AppState>,
    Path((case_id, exhibit_code)): Path<(String, String)>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let mut trial = match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => trial,
        Ok(None) => return ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => return repo_error(&err),
    };

    if let Err(err) = director::admit_exhibit(&mut trial, &exhibit_code) {
        return trial_error(&err);
    }
    match state.repository.put_trial_state(&trial) {
        Ok(()) => ApiResponse::ok(trial),
        Err(err) => repo_error(&err),
    }
}

pub async fn trial_summary(State(state): State<AppState>, Path(case_id): Path<String>) -> Response {
    let case = match state.repository.get_case(&case_id) {
        Ok(Some(case)) => case,
        Ok(None) => return ApiErrorResponse::not_found(format!("case {case_id} not found")),
        Err(err) => return repo_error(&err),
    };
    match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => ApiResponse::ok(director::trial_summary(&trial, case.elements.len())),
        Ok(None) => ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => repo_error(&err),
    }
}

// ============================================================================
// Objections
// ============================================================================

pub async fn suggest_objections(
    State(_state): State<AppState>,
    Path(_case_id): Path<String>,
    Json(request): Json<SuggestRequest>,
) -> Response {
    // Suggestions are ephemeral — nothing is persisted unless raised.
    ApiResponse::ok(objection::suggest_objection_grounds(
        &request.text,
        &request.context,
    ))
}

pub async fn raise_objection(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(mut request): Json<ObjectionRequest>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let mut trial = match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => trial,
        Ok(None) => return ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => return repo_error(&err),
    };

    request.context.case_id.get_or_insert_with(|| case_id.clone());
    let objection = {
        let mut rng = state.rng.lock().await;
        objection::process_objection(&request, &mut *rng)
    };
    director::record_objection(&mut trial, objection.clone());

    match state.repository.put_trial_state(&trial) {
        Ok(()) => ApiResponse::created(objection),
        Err(err) => repo_error(&err),
    }
}

pub async fn objection_stats(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    match state.repository.get_trial_state(&case_id) {
        Ok(Some(trial)) => ApiResponse::ok(objection::objection_statistics(&trial)),
        Ok(None) => ApiErrorResponse::not_found(format!("no trial for case {case_id}")),
        Err(err) => repo_error(&err),
    }
}

// ============================================================================
// Motions
// ============================================================================

pub async fn file_motion(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(request): Json<MotionRequest>,
) -> Response {
    let motion = motion::process_motion(&case_id, &request);
    let policy = retry_policy();
    match with_retry(&policy, || state.repository.append_motion(&motion)).await {
        Ok(()) => ApiResponse::created(motion),
        Err(err) => repo_error(&err),
    }
}

pub async fn file_motion_batch(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(requests): Json<Vec<MotionRequest>>,
) -> Response {
    let motions = motion::batch_process_motions(&case_id, &requests);
    for motion in &motions {
        if let Err(err) = state.repository.append_motion(motion) {
            return repo_error(&err);
        }
    }
    ApiResponse::created(motions)
}

pub async fn list_motions(State(state): State<AppState>, Path(case_id): Path<String>) -> Response {
    match state.repository.list_motions(&case_id) {
        Ok(motions) => ApiResponse::ok(motions),
        Err(err) => repo_error(&err),
    }
}

// ============================================================================
// Instructions
// ============================================================================

pub async fn generate_instructions(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    let case = match state.repository.get_case(&case_id) {
        Ok(Some(case)) => case,
        Ok(None) => return ApiErrorResponse::not_found(format!("case {case_id} not found")),
        Err(err) => return repo_error(&err),
    };

    let set = instructions::generate_instructions(&case);
    match state.repository.put_instruction_set(&set) {
        Ok(()) => ApiResponse::created(set),
        Err(err) => repo_error(&err),
    }
}

pub async fn publish_instructions(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let mut set = match state.repository.get_instruction_set(&case_id) {
        Ok(Some(set)) => set,
        Ok(None) => {
            return ApiErrorResponse::not_found(format!("no instructions for case {case_id}"))
        }
        Err(err) => return repo_error(&err),
    };

    match instructions::publish_instructions(&mut set) {
        Ok(()) => {}
        Err(err @ InstructionError::AlreadyPublished(_)) => {
            return ApiErrorResponse::conflict(err.to_string());
        }
    }
    match state.repository.put_instruction_set(&set) {
        Ok(()) => ApiResponse::ok(set),
        Err(err) => repo_error(&err),
    }
}

pub async fn get_instructions(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    match state.repository.get_instruction_set(&case_id) {
        Ok(Some(set)) => ApiResponse::ok(set),
        Ok(None) => ApiErrorResponse::not_found(format!("no instructions for case {case_id}")),
        Err(err) => repo_error(&err),
    }
}

// ============================================================================
// Deliberation
// ============================================================================

/// Deliberation requires published instructions — the deliberation gate.
pub async fn start_deliberation(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(request): Json<StartDeliberationRequest>,
) -> Response {
    let _guard = state.write_lock.write().await;

    match state.repository.get_instruction_set(&case_id) {
        Ok(Some(set)) if set.published => {}
        Ok(_) => {
            return ApiErrorResponse::bad_request(
                "instructions must be published before deliberation begins",
            )
        }
        Err(err) => return repo_error(&err),
    }
    match state.repository.get_deliberation(&case_id) {
        Ok(Some(_)) => {
            return ApiErrorResponse::conflict(format!("deliberation for case {case_id}"))
        }
        Ok(None) => {}
        Err(err) => return repo_error(&err),
    }

    let jury_size = request.jury_size.unwrap_or_else(|| {
        if crate::config::is_initialized() {
            crate::config::get().deliberation.default_jury_size
        } else {
            12
        }
    });

    let deliberation = {
        let mut rng = state.rng.lock().await;
        match deliberation::start_deliberation(&case_id, jury_size, &mut *rng) {
            Ok(deliberation) => deliberation,
            Err(DeliberationError::Validation(msg)) => {
                return ApiErrorResponse::bad_request(msg)
            }
        }
    };
    match state.repository.put_deliberation(&deliberation) {
        Ok(()) => ApiResponse::created(deliberation),
        Err(err) => repo_error(&err),
    }
}

pub async fn get_deliberation(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    match state.repository.get_deliberation(&case_id) {
        Ok(Some(deliberation)) => ApiResponse::ok(deliberation),
        Ok(None) => ApiErrorResponse::not_found(format!("no deliberation for case {case_id}")),
        Err(err) => repo_error(&err),
    }
}

pub async fn process_round(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(request): Json<RoundRequest>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let mut deliberation = match state.repository.get_deliberation(&case_id) {
        Ok(Some(deliberation)) => deliberation,
        Ok(None) => {
            return ApiErrorResponse::not_found(format!("no deliberation for case {case_id}"))
        }
        Err(err) => return repo_error(&err),
    };

    let round = {
        let mut rng = state.rng.lock().await;
        match deliberation::process_deliberation_round(
            &mut deliberation,
            request.evidence_strength,
            &mut *rng,
        ) {
            Ok(round) => round,
            Err(DeliberationError::Validation(msg)) => {
                return ApiErrorResponse::bad_request(msg)
            }
        }
    };
    match state.repository.put_deliberation(&deliberation) {
        Ok(()) => ApiResponse::ok(round),
        Err(err) => repo_error(&err),
    }
}

pub async fn reach_verdict(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    let _guard = state.write_lock.write().await;
    let mut deliberation = match state.repository.get_deliberation(&case_id) {
        Ok(Some(deliberation)) => deliberation,
        Ok(None) => {
            return ApiErrorResponse::not_found(format!("no deliberation for case {case_id}"))
        }
        Err(err) => return repo_error(&err),
    };

    // A verdict closes the deliberation — it cannot be re-derived.
    if deliberation.status == DeliberationStatus::Complete {
        return ApiErrorResponse::conflict(format!("verdict for case {case_id}"));
    }
    let Some(last_round) = deliberation.rounds.last() else {
        return ApiErrorResponse::bad_request("no rounds processed yet");
    };
    let final_votes: Vec<Vote> = last_round.juror_updates.iter().map(|u| u.vote).collect();
    let verdict = deliberation::reach_verdict(deliberation.id, &final_votes);
    deliberation.status = DeliberationStatus::Complete;

    if let Err(err) = state.repository.put_deliberation(&deliberation) {
        return repo_error(&err);
    }
    match state.repository.append_verdict(&case_id, &verdict) {
        Ok(()) => ApiResponse::created(verdict),
        Err(err) => repo_error(&err),
    }
}

pub async fn deliberation_summary(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> Response {
    match state.repository.get_deliberation(&case_id) {
        Ok(Some(deliberation)) => {
            ApiResponse::ok(deliberation::deliberation_summary(&deliberation))
        }
        Ok(None) => ApiErrorResponse::not_found(format!("no deliberation for case {case_id}")),
        Err(err) => repo_error(&err),
    }
}

pub async fn list_verdicts(State(state): State<AppState>, Path(case_id): Path<String>) -> Response {
    match state.repository.list_verdicts(&case_id) {
        Ok(verdicts) => ApiResponse::ok(verdicts),
        Err(err) => repo_error(&err),
    }
}
