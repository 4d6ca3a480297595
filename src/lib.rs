//! Gavel: Courtroom Trial Simulation Engine
//!
//! Deterministic-by-seed simulation of an adversarial trial process.
//!
//! ## Architecture
//!
//! - **Intake**: Normalizes raw case descriptions into structured cases
//! - **Director**: Trial phase state machine, turns, and element coverage
//! - **Objection Engine**: Pattern-based suggestions and stochastic rulings
//! - **Motion Engine**: Pre-trial motion rulings from precedent patterns
//! - **Instruction Engine**: Jury instruction and verdict form generation
//! - **Deliberation Engine**: Belief-propagation jury model with convergence
//!   analysis and verdict extraction

pub mod api;
pub mod config;
pub mod coverage;
pub mod deliberation;
pub mod director;
pub mod instructions;
pub mod intake;
pub mod motion;
pub mod objection;
pub mod rules;
pub mod storage;
pub mod types;

// Re-export trial configuration
pub use config::TrialConfig;

// Re-export commonly used types
pub use types::{
    Case, CaseStatus, CaseType, Count, DeliberationState, DeliberationStatus, Element,
    ExaminationMode, InstructionSet, Motion, MotionStatus, Objection, ObjectionRuling,
    TrialPhase, TrialState, Verdict, VerdictKind, Vote, WitnessType,
};

// Re-export engines' primary entry points
pub use deliberation::{run_deliberation, start_deliberation};
pub use director::start_trial;
pub use instructions::generate_instructions;
pub use intake::normalize_intake;
pub use motion::process_motion;
pub use objection::{process_objection, suggest_objection_grounds};

// Re-export storage
pub use storage::{InMemoryRepository, Repository, RepositoryError};
