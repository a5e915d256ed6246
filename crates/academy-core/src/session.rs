//! Session orchestrator: owns the clock, the institution, and the engines,
//! and runs the monthly pipeline whenever the clock crosses a month.
//!
//! # Pipeline order
//!
//! Within one month boundary, in this exact order:
//!
//! 1. Progression: reputation convergence, then staff tenure and skill.
//! 2. Population (monthly): attrition at the post-progression satisfaction,
//!    then promotion decay.
//! 3. Finance: settlement against the updated member count and metrics.
//! 4. Graduation (graduation month only).
//! 5. Admission (admission month only).
//!
//! Reordering these phases changes simulated outcomes. A frame that crosses
//! several months runs the whole pipeline once per month. After the pipeline,
//! an insolvent institution ends the session; no further months are
//! processed and actions are rejected.

use academy_types::{
    EnrollmentReport, FacilityId, InstitutionSnapshot, MemberId, MonthlyReport, SessionStatus,
    SimDate, StaffId, StaffMember,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::candidates::CandidateGenerator;
use crate::clock::{ClockError, SimClock};
use crate::config::{ConfigError, SimulationConfig};
use crate::error::ActionError;
use crate::finance::FinanceEngine;
use crate::population::PopulationEngine;
use crate::progression::ProgressionEngine;
use crate::state::InstitutionState;

/// Errors that can occur while creating or driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The configuration is invalid.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The clock could not be created or advanced.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Outcome of one run of the monthly pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    /// First day of the month that just began.
    pub date: SimDate,
    /// Reputation after convergence.
    pub reputation: f64,
    /// Staff who gained a point of skill.
    pub skill_ups: u32,
    /// Dropouts, plus graduation and admission counts in designated months.
    pub enrollment: EnrollmentReport,
    /// The settled financial report.
    pub report: MonthlyReport,
    /// Session status after the pipeline.
    pub status: SessionStatus,
}

/// A running simulation of one institution.
#[derive(Debug, Clone)]
pub struct Session {
    clock: SimClock,
    state: InstitutionState,
    finance: FinanceEngine,
    progression: ProgressionEngine,
    population: PopulationEngine,
    generator: CandidateGenerator,
    candidate_count: u32,
    candidates: Vec<StaffMember>,
    rng: StdRng,
    status: SessionStatus,
    months_processed: u32,
    latest_summary: Option<MonthSummary>,
}

impl Session {
    /// Create a session: validate configuration, seed the random source
    /// from `world.seed`, hire the initial staff, seed the initial members,
    /// and draw the first candidate pool.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if the configuration is invalid, or
    /// [`SessionError::Clock`] if the calendar cannot form a clock.
    pub fn new(config: &SimulationConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let clock = SimClock::new(&config.calendar)?;
        let mut rng = StdRng::seed_from_u64(config.world.seed);

        let mut state = InstitutionState::new(config);
        let generator = CandidateGenerator::new(&config.staffing);
        let population = PopulationEngine::new(&config.enrollment, &config.promotions);

        for staff in generator.generate(config.institution.initial_staff, &mut rng) {
            if let Err(err) = state.hire_staff(staff) {
                warn!(error = %err, "Skipping initial staff member");
            }
        }
        let seeded = population.seed_members(&mut state, config.institution.initial_members, &mut rng);

        let candidates = generator.generate(config.staffing.candidate_count, &mut rng);

        info!(
            name = state.name(),
            seed = config.world.seed,
            date = %clock.date(),
            staff = state.staff_count(),
            members = seeded,
            balance = state.balance(),
            "Session initialized"
        );

        Ok(Self {
            clock,
            state,
            finance: FinanceEngine::new(&config.finance),
            progression: ProgressionEngine::new(&config.reputation, &config.staffing),
            population,
            generator,
            candidate_count: config.staffing.candidate_count,
            candidates,
            rng,
            status: SessionStatus::Running,
            months_processed: 0,
            latest_summary: None,
        })
    }

    /// Drive the clock by `dt` real seconds. Runs the monthly pipeline once
    /// for every month boundary crossed, in calendar order, and returns the
    /// summary of the last month processed.
    ///
    /// A session that has ended does not advance. If the institution becomes
    /// insolvent partway through a multi-month frame, the remaining months
    /// are not processed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Clock`] if the calendar overflows.
    pub fn step(&mut self, dt: f64) -> Result<Option<MonthSummary>, SessionError> {
        if self.status.is_terminal() {
            return Ok(None);
        }

        let advance = self.clock.advance(dt)?;
        if advance.months_crossed > 1 {
            debug!(
                months_crossed = advance.months_crossed,
                "Frame spanned several months"
            );
        }

        let mut last = None;
        for date in advance.month_starts {
            let summary = self.run_monthly_pipeline(date);
            self.months_processed = self.months_processed.saturating_add(1);
            self.latest_summary = Some(summary.clone());
            let ended = summary.status.is_terminal();
            last = Some(summary);
            if ended {
                break;
            }
        }
        Ok(last)
    }

    fn run_monthly_pipeline(&mut self, date: SimDate) -> MonthSummary {
        let reputation = self.progression.update_reputation(&mut self.state, 1.0);
        let skill_ups = self.progression.update_staff_monthly(&mut self.state);

        let satisfaction = self.state.satisfaction();
        let mut enrollment =
            self.population
                .process_monthly(&mut self.state, satisfaction, &mut self.rng);

        let report = self.finance.process_month(&mut self.state);

        if self.clock.is_graduation_date(date) {
            let advancement = self
                .population
                .process_annual_advancement(&mut self.state, &mut self.rng);
            enrollment.graduates = advancement.graduates;
            enrollment.advanced = advancement.advanced;
        }
        if self.clock.is_admission_date(date) {
            enrollment.new_members = self
                .population
                .process_annual_admission(&mut self.state, &mut self.rng);
        }

        if self.state.is_insolvent() {
            self.status = SessionStatus::Bankrupt;
            warn!(
                balance = self.state.balance(),
                threshold = self.state.rules().insolvency_threshold,
                month = %date.month_label(),
                "Institution insolvent; session ended"
            );
        }

        info!(
            month = %date.month_label(),
            reputation,
            education = self.state.education_quality(),
            satisfaction = self.state.satisfaction(),
            members = self.state.member_count(),
            staff = self.state.staff_count(),
            dropouts = enrollment.dropouts,
            admitted = enrollment.new_members,
            graduates = enrollment.graduates,
            balance = self.state.balance(),
            "Month processed"
        );

        MonthSummary {
            date,
            reputation,
            skill_ups,
            enrollment,
            report,
            status: self.status,
        }
    }

    fn ensure_running(&self) -> Result<(), ActionError> {
        if self.status.is_terminal() {
            return Err(ActionError::SessionEnded);
        }
        Ok(())
    }

    // -- Actions ----------------------------------------------------------------

    /// Replace the candidate pool with freshly generated candidates.
    pub fn refresh_candidates(&mut self) -> &[StaffMember] {
        self.candidates = self.generator.generate(self.candidate_count, &mut self.rng);
        &self.candidates
    }

    /// Hire the candidate at `index` in the pool, removing it from the pool.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoCandidate`] for an index outside the pool,
    /// or [`ActionError::SessionEnded`] once the session has ended.
    pub fn hire_candidate(&mut self, index: usize) -> Result<StaffId, ActionError> {
        self.ensure_running()?;
        let candidate = self
            .candidates
            .get(index)
            .cloned()
            .ok_or(ActionError::NoCandidate { index })?;
        let id = candidate.id;
        self.state.hire_staff(candidate)?;
        self.candidates.remove(index);
        info!(staff_id = %id, "Candidate hired");
        Ok(id)
    }

    /// Hire an externally constructed staff member.
    ///
    /// # Errors
    ///
    /// See [`InstitutionState::hire_staff`].
    pub fn hire_staff(&mut self, staff: StaffMember) -> Result<(), ActionError> {
        self.ensure_running()?;
        self.state.hire_staff(staff)
    }

    /// Dismiss the staff member with the given ID.
    ///
    /// # Errors
    ///
    /// See [`InstitutionState::fire_staff`].
    pub fn fire_staff(&mut self, id: StaffId) -> Result<StaffMember, ActionError> {
        self.ensure_running()?;
        self.state.fire_staff(id)
    }

    /// Dismiss the most recently hired staff member.
    ///
    /// # Errors
    ///
    /// See [`InstitutionState::fire_latest_staff`].
    pub fn fire_latest_staff(&mut self) -> Result<StaffMember, ActionError> {
        self.ensure_running()?;
        self.state.fire_latest_staff()
    }

    /// Admit a single new grade-1 member outside the annual pass.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::AtCapacity`] once the institution is full.
    pub fn admit_member(&mut self) -> Result<MemberId, ActionError> {
        self.ensure_running()?;
        let member = self.population.new_member(1, &mut self.rng);
        let id = member.id;
        self.state.admit_member(member)?;
        Ok(id)
    }

    /// Remove the member with the given ID.
    ///
    /// # Errors
    ///
    /// See [`InstitutionState::remove_member`].
    pub fn remove_member(&mut self, id: MemberId) -> Result<(), ActionError> {
        self.ensure_running()?;
        self.state.remove_member(id).map(|_| ())
    }

    /// Run a promotion campaign from the catalog.
    ///
    /// # Errors
    ///
    /// See [`PopulationEngine::run_promotion_campaign`].
    pub fn run_promotion_campaign(&mut self, kind: &str) -> Result<(), ActionError> {
        self.ensure_running()?;
        self.population.run_promotion_campaign(&mut self.state, kind)
    }

    /// Build a facility at a grid position.
    ///
    /// # Errors
    ///
    /// See [`InstitutionState::add_facility`].
    pub fn add_facility(&mut self, kind: &str, grid_x: i32, grid_y: i32) -> Result<FacilityId, ActionError> {
        self.ensure_running()?;
        self.state.add_facility(kind, grid_x, grid_y, &mut self.rng)
    }

    /// Set the clock speed in simulated days per real second.
    pub fn set_speed(&mut self, value: f64) {
        self.clock.set_speed(value);
    }

    /// Pause or resume the clock.
    pub const fn toggle_pause(&mut self) {
        self.clock.toggle_pause();
    }

    // -- Queries ----------------------------------------------------------------

    /// The simulation clock.
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The institution.
    pub const fn state(&self) -> &InstitutionState {
        &self.state
    }

    /// The finance engine and its report history.
    pub const fn finance(&self) -> &FinanceEngine {
        &self.finance
    }

    /// The population engine.
    pub const fn population(&self) -> &PopulationEngine {
        &self.population
    }

    /// Current session status.
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Current candidate pool.
    pub fn candidates(&self) -> &[StaffMember] {
        &self.candidates
    }

    /// Most recently settled monthly report.
    pub fn latest_report(&self) -> Option<&MonthlyReport> {
        self.finance.latest()
    }

    /// Monthly pipeline runs completed so far.
    pub const fn months_processed(&self) -> u32 {
        self.months_processed
    }

    /// Summary of the most recent monthly pipeline run.
    pub const fn latest_summary(&self) -> Option<&MonthSummary> {
        self.latest_summary.as_ref()
    }

    /// Applicants the next admission pass would attract.
    pub fn projected_applicants(&self) -> u32 {
        self.population.projected_applicants(&self.state)
    }

    /// Presentation snapshot of the institution.
    pub fn snapshot(&self) -> InstitutionSnapshot {
        self.state.snapshot()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.institution.initial_staff = 3;
        config.institution.initial_members = 40;
        config
    }

    #[test]
    fn new_session_seeds_staff_members_and_candidates() {
        let session = Session::new(&small_config()).unwrap();
        assert_eq!(session.state().staff_count(), 3);
        assert_eq!(session.state().member_count(), 40);
        assert_eq!(session.candidates().len(), 3);
        assert_eq!(session.status(), SessionStatus::Running);
        assert!(session.latest_report().is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.calendar.days_per_month = 0;
        assert!(matches!(
            Session::new(&config),
            Err(SessionError::Config { .. })
        ));
    }

    #[test]
    fn sub_month_steps_do_not_run_pipeline() {
        let mut session = Session::new(&small_config()).unwrap();
        for _ in 0..29 {
            assert!(session.step(1.0).unwrap().is_none());
        }
        let summary = session.step(1.0).unwrap();
        assert!(summary.is_some());
        assert_eq!(session.finance().history().len(), 1);
    }

    #[test]
    fn long_frame_runs_every_crossed_month() {
        let mut config = small_config();
        config.calendar.start_month = 2;
        let mut session = Session::new(&config).unwrap();

        let last = session.step(60.0).unwrap().unwrap();
        assert_eq!(last.date.month, 4);
        assert_eq!(session.months_processed(), 2);
        assert_eq!(session.finance().history().len(), 2);
        // March graduated or advanced every seeded member; April admitted
        // fresh grade-1 members on top.
        let members = session.state().members();
        let freshmen = members.iter().filter(|m| m.grade == 1).count();
        assert!(last.enrollment.new_members > 0);
        assert_eq!(freshmen, usize::try_from(last.enrollment.new_members).unwrap());
        assert!(
            members
                .iter()
                .filter(|m| m.grade >= 2)
                .all(|m| m.months_enrolled == 2)
        );
    }

    #[test]
    fn hire_candidate_moves_it_to_staff() {
        let mut session = Session::new(&small_config()).unwrap();
        let expected = session.candidates()[0].id;
        let id = session.hire_candidate(0).unwrap();
        assert_eq!(id, expected);
        assert_eq!(session.state().staff_count(), 4);
        assert_eq!(session.candidates().len(), 2);
        assert_eq!(
            session.hire_candidate(7),
            Err(ActionError::NoCandidate { index: 7 })
        );
    }

    #[test]
    fn bankrupt_session_stops() {
        let mut config = small_config();
        config.institution.initial_balance = 1;
        let mut session = Session::new(&config).unwrap();
        let summary = session.step(30.0).unwrap().unwrap();
        assert_eq!(summary.status, SessionStatus::Bankrupt);
        assert!(session.status().is_terminal());

        let balance = session.state().balance();
        assert!(session.step(300.0).unwrap().is_none());
        assert_eq!(session.state().balance(), balance);
        assert_eq!(
            session.run_promotion_campaign("poster"),
            Err(ActionError::SessionEnded)
        );
    }
}
