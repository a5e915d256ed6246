//! Headless driver for the Academy simulation.
//!
//! Loads configuration, creates a session, and drives its clock frame by
//! frame the way an interactive front end would, applying a scripted
//! management policy after each processed month. Stops after
//! `world.max_months` months or when the institution becomes insolvent,
//! then prints the final institution snapshot as JSON on stdout.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$ACADEMY_CONFIG` or `academy-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the session (clock, institution, initial staff and members)
//! 4. Run the frame loop
//! 5. Log the outcome and print the snapshot

mod error;
mod policy;

use std::path::PathBuf;
use std::time::Duration;

use academy_core::config::{LoggingConfig, SimulationConfig};
use academy_core::session::Session;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::policy::ScriptedPolicy;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "academy-config.yaml";

/// Application entry point for the engine binary.
///
/// # Errors
///
/// Returns an error if configuration, session creation, or the frame loop
/// fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration (before logging so the level can come from it).
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(source = %config_source, "academy-engine starting");
    info!(
        name = config.institution.name,
        seed = config.world.seed,
        frame_interval_ms = config.world.frame_interval_ms,
        max_months = config.world.max_months,
        speed = config.calendar.initial_speed,
        "Configuration loaded"
    );

    // 3. Create the session.
    let mut session = Session::new(&config)?;

    // 4. Run the frame loop.
    let months = run(&mut session, &config)?;

    // 5. Report.
    let state = session.state();
    info!(
        months,
        status = ?session.status(),
        date = %session.clock().date(),
        balance = state.balance(),
        reputation = state.reputation(),
        members = state.member_count(),
        staff = state.staff_count(),
        average_balance = session.finance().average_balance(academy_core::DEFAULT_AVERAGE_WINDOW),
        "Simulation finished"
    );

    let snapshot = serde_json::to_string_pretty(&session.snapshot())?;
    println!("{snapshot}");
    Ok(())
}

/// Drive the session until the month limit or insolvency. Returns the
/// number of months processed.
fn run(session: &mut Session, config: &SimulationConfig) -> Result<u32, EngineError> {
    let frame = Duration::from_millis(config.world.frame_interval_ms);
    let dt = frame.as_secs_f64();
    let max_months = config.world.max_months;
    let policy = ScriptedPolicy;

    if dt <= 0.0 {
        warn!("frame_interval_ms is zero; nothing to simulate");
        return Ok(0);
    }

    while !session.status().is_terminal()
        && (max_months == 0 || session.months_processed() < max_months)
    {
        if let Some(summary) = session.step(dt)? {
            if !summary.status.is_terminal() {
                policy.on_month(session);
            }
        }
        if config.world.realtime {
            std::thread::sleep(frame);
        }
    }
    Ok(session.months_processed())
}

/// Load configuration from `$ACADEMY_CONFIG`, falling back to
/// `academy-config.yaml`, falling back to built-in defaults.
fn load_config() -> Result<(SimulationConfig, String), EngineError> {
    let path = std::env::var_os("ACADEMY_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        Ok((SimulationConfig::default(), "defaults".to_owned()))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
