//! Trial configuration: tunable thresholds for all four engines

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Sections
// ============================================================================

/// Element coverage tracker thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Coverage percentage above which an element flips to `covered`
    pub covered_threshold_pct: f64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            covered_threshold_pct: 50.0,
        }
    }
}

/// Objection suggestion scoring knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectionConfig {
    /// Confidence added per pattern match
    pub confidence_per_match: f64,
    /// Suggestions at or below this confidence are discarded
    pub min_confidence: f64,
    /// Maximum suggestions returned per turn
    pub max_suggestions: usize,
    /// Leading-question confidence multiplier in cross-examination
    pub cross_leading_factor: f64,
    /// Leading-question confidence multiplier in direct examination
    pub direct_leading_factor: f64,
}

impl Default for ObjectionConfig {
    fn default() -> Self {
        Self {
            confidence_per_match: 0.3,
            min_confidence: 0.3,
            max_suggestions: 3,
            cross_leading_factor: 0.5,
            direct_leading_factor: 1.2,
        }
    }
}

/// Jury deliberation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliberationConfig {
    pub default_jury_size: u32,
    /// Consensus level required for a verdict
    pub consensus_threshold: f64,
    pub unanimity_required: bool,
    /// Hard cap on deliberation rounds
    pub max_rounds: u32,
    /// Undecided fraction above which a round flags hung jury
    pub hung_jury_threshold: f64,
    /// Half-width of the undecided belief band around 0.5
    pub vote_epsilon: f64,
    /// Weight of evidence in belief updates
    pub evidence_weight: f64,
    /// Weight of peer influence in belief updates
    pub peer_weight: f64,
    /// Convergence check threshold on mean consensus
    pub convergence_threshold: f64,
}

impl Default for DeliberationConfig {
    fn default() -> Self {
        Self {
            default_jury_size: 12,
            consensus_threshold: 0.8,
            unanimity_required: true,
            max_rounds: 20,
            hung_jury_threshold: 0.3,
            vote_epsilon: 0.05,
            evidence_weight: 0.6,
            peer_weight: 0.4,
            convergence_threshold: 0.9,
        }
    }
}

/// Retry policy for retryable collaborator failures (storage, export)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    /// First backoff delay; doubles per attempt
    pub base_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 250,
        }
    }
}

/// HTTP server binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

// ============================================================================
// TrialConfig
// ============================================================================

/// Top-level configuration, loaded from `gavel.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrialConfig {
    pub coverage: CoverageConfig,
    pub objection: ObjectionConfig,
    pub deliberation: DeliberationConfig,
    pub retry: RetryConfig,
    pub server: ServerConfig,
}

impl TrialConfig {
    /// Load config with fallback chain:
    /// 1. `$GAVEL_CONFIG` environment variable
    /// 2. `./gavel.toml`
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("GAVEL_CONFIG") {
            let p = std::path::PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded trial config from GAVEL_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from GAVEL_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "GAVEL_CONFIG points to non-existent file, falling back");
            }
        }

        let local = std::path::PathBuf::from("gavel.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded trial config from ./gavel.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./gavel.toml, using defaults");
                }
            }
        }

        info!("No gavel.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject structurally invalid configurations at load time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.coverage.covered_threshold_pct) {
            return Err(ConfigError::Invalid(
                "coverage.covered_threshold_pct must be within [0, 100]".to_string(),
            ));
        }
        for (name, v) in [
            ("objection.min_confidence", self.objection.min_confidence),
            ("deliberation.consensus_threshold", self.deliberation.consensus_threshold),
            ("deliberation.hung_jury_threshold", self.deliberation.hung_jury_threshold),
            ("deliberation.convergence_threshold", self.deliberation.convergence_threshold),
            ("deliberation.vote_epsilon", self.deliberation.vote_epsilon),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1]")));
            }
        }
        if self.deliberation.max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "deliberation.max_rounds must be at least 1".to_string(),
            ));
        }
        if self.deliberation.default_jury_size < 2 {
            return Err(ConfigError::Invalid(
                "deliberation.default_jury_size must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrialConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.deliberation.default_jury_size, 12);
        assert_eq!(config.deliberation.max_rounds, 20);
        assert!((config.deliberation.consensus_threshold - 0.8).abs() < f64::EPSILON);
        assert!((config.coverage.covered_threshold_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[deliberation]\nmax_rounds = 10").unwrap();
        let config = TrialConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.deliberation.max_rounds, 10);
        // Untouched sections keep their defaults
        assert_eq!(config.objection.max_suggestions, 3);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[deliberation]\nconsensus_threshold = 1.5").unwrap();
        assert!(TrialConfig::load_from_file(file.path()).is_err());
    }
}
