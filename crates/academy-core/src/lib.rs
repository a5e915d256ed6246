//! Simulation engine for the Academy institution simulation.
//!
//! This crate owns everything that changes over simulated time: the clock,
//! the institution aggregate, and the engines that transform it every month
//! and every year.
//!
//! # Modules
//!
//! - [`clock`] -- Real-time to simulated-day conversion with month/year rollover
//! - [`config`] -- Typed YAML configuration; every engine constant lives here
//! - [`state`] -- The institution aggregate with memoized derived metrics
//! - [`facility`] -- Facility catalog lookups for the optional facility terms
//! - [`finance`] -- Monthly settlement and the bounded report history
//! - [`progression`] -- Reputation convergence and staff tenure/skill
//! - [`population`] -- Attrition, promotion decay, advancement, admission
//! - [`candidates`] -- Randomized staff candidate generation
//! - [`session`] -- Orchestrator running the fixed-order monthly pipeline
//! - [`error`] -- Rejections for infeasible player actions
//!
//! # Determinism
//!
//! Every random draw goes through an explicit generator passed by the
//! caller. A [`session::Session`] seeds its own generator from
//! `world.seed`, so two sessions with the same configuration produce the
//! same history.

pub mod candidates;
pub mod clock;
pub mod config;
pub mod error;
pub mod facility;
pub mod finance;
pub mod population;
pub mod progression;
pub mod session;
pub mod state;

pub use candidates::CandidateGenerator;
pub use clock::{ClockAdvance, ClockError, SimClock};
pub use config::{ConfigError, SimulationConfig};
pub use error::ActionError;
pub use facility::FacilityCatalog;
pub use finance::{DEFAULT_AVERAGE_WINDOW, FinanceEngine, ReportHistory};
pub use population::{DropoutCurve, PopulationEngine};
pub use progression::ProgressionEngine;
pub use session::{MonthSummary, Session, SessionError};
pub use state::{InstitutionRules, InstitutionState, MonthlyBreakdown};
