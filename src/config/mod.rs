//! Engine tunables: TOML-backed [`TrialConfig`] behind a global.
//!
//! Every numeric knob the engines use (objection confidence cutoffs,
//! deliberation weights and round caps, coverage thresholds, retry
//! policy) lives here. The file is found via `GAVEL_CONFIG`, then
//! `./gavel.toml`, then built-in defaults.
//!
//! `main` calls `config::init(TrialConfig::load())` once; engines read
//! through `config::get()`. Library consumers that skip `init()` (tests,
//! the simulation binary) get defaults via the engines' `cfg_*`
//! accessors, which check `is_initialized()` first:
//!
//! ```ignore
//! let max_rounds = config::get().deliberation.max_rounds;
//! ```

mod trial_config;

pub use trial_config::*;

use std::sync::OnceLock;

/// Process-wide trial configuration, set once during startup.
static TRIAL_CONFIG: OnceLock<TrialConfig> = OnceLock::new();

/// Install the global configuration. A second call is ignored with a
/// warning, which keeps test processes (where several tests race to
/// initialize) well-defined.
pub fn init(config: TrialConfig) {
    if TRIAL_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// The installed configuration.
///
/// Panics when `init()` was never called — callers that may run without
/// startup wiring should go through `is_initialized()` instead (that is
/// what the engines' `cfg_*` accessors do).
#[allow(clippy::expect_used)]
pub fn get() -> &'static TrialConfig {
    TRIAL_CONFIG
        .get()
        .expect("config::get() called before config::init()")
}

/// Whether `init()` has run in this process.
pub fn is_initialized() -> bool {
    TRIAL_CONFIG.get().is_some()
}
