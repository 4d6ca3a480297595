//! Gavel - Courtroom Trial Simulation Engine
//!
//! HTTP service exposing case intake, trial direction, objection and
//! motion rulings, jury instructions, and deliberation simulation.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (0.0.0.0:8080, entropy-seeded RNG)
//! cargo run --release
//!
//! # Reproducible rulings and deliberations
//! cargo run --release -- --seed 42
//! ```
//!
//! # Environment Variables
//!
//! - `GAVEL_CONFIG`: Path to a gavel.toml config file
//! - `GAVEL_CORS_ORIGINS`: Comma-separated CORS origins for development
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use gavel::api::{create_app, AppState};
use gavel::config;
use gavel::storage::InMemoryRepository;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "gavel")]
#[command(about = "Courtroom trial simulation engine")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, env = "GAVEL_ADDR", default_value = "0.0.0.0:8080")]
    addr: String,

    /// Seed for ruling and deliberation RNG. Omit for entropy seeding.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a gavel.toml config file (overrides GAVEL_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    // Load trial configuration
    let trial_config = match &args.config {
        Some(path) => config::TrialConfig::load_from_file(std::path::Path::new(path))
            .with_context(|| format!("loading config from {path}"))?,
        None => config::TrialConfig::load(),
    };
    info!(
        jury_size = trial_config.deliberation.default_jury_size,
        max_rounds = trial_config.deliberation.max_rounds,
        "Trial configuration loaded"
    );
    config::init(trial_config);

    let repository = Arc::new(InMemoryRepository::default());
    let state = AppState::new(repository, args.seed);
    if let Some(seed) = args.seed {
        info!(seed, "RNG seeded — rulings and deliberations are reproducible");
    }

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("binding to {}", args.addr))?;
    info!(addr = %args.addr, "Gavel API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
