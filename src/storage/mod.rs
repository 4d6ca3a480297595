//! Repository trait — pluggable storage backend
//!
//! Abstracts case, trial, and deliberation persistence so backends can be
//! swapped without touching engine or API code:
//! - `InMemoryRepository`: in-memory store for testing and single-node runs
//! - Future: PostgreSQL for multi-node deployments
//!
//! The core engines never call the repository; only the orchestration
//! layer does, retrying retryable failures through [`with_retry`].

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;

use tracing::warn;

use crate::config::RetryConfig;
use crate::types::{Case, DeliberationState, InstructionSet, Motion, TrialState, Verdict};

/// Repository errors. `Storage` failures are transient and retryable;
/// everything else is terminal.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("not found")]
    NotFound,
}

impl RepositoryError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepositoryError::Storage(_))
    }
}

/// Trait for pluggable persistence backends.
///
/// Trial states, deliberations, and instruction sets are keyed by case id
/// (one active trial per case); motions and verdicts are append-only logs
/// per case.
///
/// Implementations must be thread-safe (Send + Sync) for shared access
/// across async tasks.
pub trait Repository: Send + Sync {
    fn create_case(&self, case: &Case) -> Result<(), RepositoryError>;
    fn get_case(&self, id: &str) -> Result<Option<Case>, RepositoryError>;
    fn list_cases(&self) -> Result<Vec<Case>, RepositoryError>;
    fn update_case(&self, case: &Case) -> Result<(), RepositoryError>;
    fn delete_case(&self, id: &str) -> Result<(), RepositoryError>;

    fn put_trial_state(&self, state: &TrialState) -> Result<(), RepositoryError>;
    fn get_trial_state(&self, case_id: &str) -> Result<Option<TrialState>, RepositoryError>;

    fn put_deliberation(&self, state: &DeliberationState) -> Result<(), RepositoryError>;
    fn get_deliberation(&self, case_id: &str)
        -> Result<Option<DeliberationState>, RepositoryError>;

    fn put_instruction_set(&self, set: &InstructionSet) -> Result<(), RepositoryError>;
    fn get_instruction_set(&self, case_id: &str)
        -> Result<Option<InstructionSet>, RepositoryError>;

    fn append_motion(&self, motion: &Motion) -> Result<(), RepositoryError>;
    fn list_motions(&self, case_id: &str) -> Result<Vec<Motion>, RepositoryError>;

    fn append_verdict(&self, case_id: &str, verdict: &Verdict) -> Result<(), RepositoryError>;
    fn list_verdicts(&self, case_id: &str) -> Result<Vec<Verdict>, RepositoryError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// In-memory repository for testing and single-node runs.
///
/// Thread-safe via `RwLock`. Not durable — data lost on restart.
#[derive(Default)]
pub struct InMemoryRepository {
    cases: RwLock<BTreeMap<String, Case>>,
    trial_states: RwLock<BTreeMap<String, TrialState>>,
    deliberations: RwLock<BTreeMap<String, DeliberationState>>,
    instruction_sets: RwLock<BTreeMap<String, InstructionSet>>,
    motions: RwLock<BTreeMap<String, Vec<Motion>>>,
    verdicts: RwLock<BTreeMap<String, Vec<Verdict>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

impl Repository for InMemoryRepository {
    fn create_case(&self, case: &Case) -> Result<(), RepositoryError> {
        let mut store = self.cases.write().map_err(poisoned)?;
        if store.contains_key(&case.id) {
            return Err(RepositoryError::Conflict(format!("case {}", case.id)));
        }
        store.insert(case.id.clone(), case.clone());
        Ok(())
    }

    fn get_case(&self, id: &str) -> Result<Option<Case>, RepositoryError> {
        Ok(self.cases.read().map_err(poisoned)?.get(id).cloned())
    }

    fn list_cases(&self) -> Result<Vec<Case>, RepositoryError> {
        Ok(self.cases.read().map_err(poisoned)?.values().cloned().collect())
    }

    fn update_case(&self, case: &Case) -> Result<(), RepositoryError> {
        let mut store = self.cases.write().map_err(poisoned)?;
        if !store.contains_key(&case.id) {
            return Err(RepositoryError::NotFound);
        }
        store.insert(case.id.clone(), case.clone());
        Ok(())
    }

    fn delete_case(&self, id: &str) -> Result<(), RepositoryError> {
        let mut store = self.cases.write().map_err(poisoned)?;
        store.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn put_trial_state(&self, state: &TrialState) -> Result<(), RepositoryError> {
        self.trial_states
            .write()
            .map_err(poisoned)?
            .insert(state.case_id.clone(), state.clone());
        Ok(())
    }

    fn get_trial_state(&self, case_id: &str) -> Result<Option<TrialState>, RepositoryError> {
        Ok(self.trial_states.read().map_err(poisoned)?.get(case_id).cloned())
    }

    fn put_deliberation(&self, state: &DeliberationState) -> Result<(), RepositoryError> {
        self.deliberations
            .write()
            .map_err(poisoned)?
            .insert(state.case_id.clone(), state.clone());
        Ok(())
    }

    fn get_deliberation(
        &self,
        case_id: &str,
    ) -> Result<Option<DeliberationState>, RepositoryError> {
        Ok(self.deliberations.read().map_err(poisoned)?.get(case_id).cloned())
    }

    fn put_instruction_set(&self, set: &InstructionSet) -> Result<(), RepositoryError> {
        self.instruction_sets
            .write()
            .map_err(poisoned)?
            .insert(set.case_id.clone(), set.clone());
        Ok(())
    }

    fn get_instruction_set(
        &self,
        case_id: &str,
    ) -> Result<Option<InstructionSet>, RepositoryError> {
        Ok(self.instruction_sets.read().map_err(poisoned)?.get(case_id).cloned())
    }

    fn append_motion(&self, motion: &Motion) -> Result<(), RepositoryError> {
        self.motions
            .write()
            .map_err(poisoned)?
            .entry(motion.case_id.clone())
            .or_default()
            .push(motion.clone());
        Ok(())
    }

    fn list_motions(&self, case_id: &str) -> Result<Vec<Motion>, RepositoryError> {
        Ok(self
            .motions
            .read()
            .map_err(poisoned)?
            .get(case_id)
            .cloned()
            .unwrap_or_default())
    }

    fn append_verdict(&self, case_id: &str, verdict: &Verdict) -> Result<(), RepositoryError> {
        self.verdicts
            .write()
            .map_err(poisoned)?
            .entry(case_id.to_string())
            .or_default()
            .push(verdict.clone());
        Ok(())
    }

    fn list_verdicts(&self, case_id: &str) -> Result<Vec<Verdict>, RepositoryError> {
        Ok(self
            .verdicts
            .read()
            .map_err(poisoned)?
            .get(case_id)
            .cloned()
            .unwrap_or_default())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}

/// Retry a repository operation with exponential backoff.
///
/// Non-retryable errors and budget exhaustion return the last error.
pub async fn with_retry<T, F>(
    policy: &RetryConfig,
    mut op: F,
) -> Result<T, RepositoryError>
where
    F: FnMut() -> Result<T, RepositoryError>,
{
    let mut backoff = Duration::from_millis(policy.base_backoff_ms);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                warn!(attempt, %err, "retryable storage failure, backing off");
                tokio::time::sleep(backoff).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
