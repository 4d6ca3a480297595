//! Shared data structures for the trial simulation pipeline
//!
//! This module defines the core records exchanged between engines:
//! - Case intake: Case, Count, Element, Party, Witness, Exhibit
//! - Trial state machine: TrialPhase, Turn, TrialState
//! - Ruling log: ObjectionSuggestion, Objection, Motion
//! - Jury deliberation: Juror, DeliberationRound, Verdict
//! - Instructions: InstructionSet, VerdictForm

mod case;
mod trial;
mod rulings;
mod deliberation;
mod instructions;

pub use case::*;
pub use trial::*;
pub use rulings::*;
pub use deliberation::*;
pub use instructions::*;
