//! Scripted management policy for headless runs.
//!
//! After every processed month the policy looks at the institution and may
//! hire from the candidate pool, run a promotion campaign ahead of the
//! admission month, or build a classroom when the institution is crowded.
//! Every action keeps the balance above a fixed reserve.

use academy_core::session::Session;
use tracing::{debug, info};

/// Balance the policy never spends below.
const RESERVE: i64 = 10_000_000;

/// Facility kind built when the institution is crowded.
const EXPANSION_KIND: &str = "classroom";

/// Tiles between consecutive facilities on the campus grid.
const GRID_STRIDE: usize = 2;

/// Facilities per grid row.
const GRID_ROW_LEN: usize = 8;

/// What the policy did after one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// Candidates hired.
    pub hired: u32,
    /// Promotion campaign run, if any.
    pub campaign: Option<String>,
    /// Whether a facility was built.
    pub built: bool,
}

/// Decides player actions between months.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedPolicy;

impl ScriptedPolicy {
    /// Apply the policy once.
    pub fn on_month(self, session: &mut Session) -> PolicyOutcome {
        let mut outcome = PolicyOutcome {
            hired: Self::hire_while_understaffed(session),
            ..PolicyOutcome::default()
        };
        outcome.campaign = Self::promote_before_admission(session);
        outcome.built = Self::expand_when_crowded(session);

        if outcome != PolicyOutcome::default() {
            info!(
                hired = outcome.hired,
                campaign = outcome.campaign.as_deref().unwrap_or("none"),
                built = outcome.built,
                "Policy acted"
            );
        }
        outcome
    }

    /// Hire the most skilled affordable candidate until staffing recovers
    /// or no candidate keeps the month profitable.
    fn hire_while_understaffed(session: &mut Session) -> u32 {
        let mut hired = 0_u32;
        while session.state().is_understaffed() {
            let margin = session.state().monthly_balance();
            let best = session
                .candidates()
                .iter()
                .enumerate()
                .filter(|(_, c)| c.salary < margin)
                .max_by_key(|(_, c)| c.skill)
                .map(|(i, _)| i);

            let Some(index) = best else {
                break;
            };
            if session.hire_candidate(index).is_err() {
                break;
            }
            hired = hired.saturating_add(1);
            session.refresh_candidates();
        }
        hired
    }

    /// In the month before admissions, run the strongest campaign the
    /// reserve allows.
    fn promote_before_admission(session: &mut Session) -> Option<String> {
        let clock = session.clock();
        let next_month = clock
            .month()
            .checked_rem(clock.months_per_year())
            .unwrap_or(0)
            .saturating_add(1);
        if next_month != clock.admission_month() {
            return None;
        }

        let balance = session.state().balance();
        let kind = session
            .population()
            .promotions()
            .iter()
            .filter(|(_, option)| balance.saturating_sub(option.cost) >= RESERVE)
            .max_by(|(_, a), (_, b)| a.effect.total_cmp(&b.effect))
            .map(|(kind, _)| kind.clone())?;

        match session.run_promotion_campaign(&kind) {
            Ok(()) => Some(kind),
            Err(err) => {
                debug!(error = %err, "Campaign skipped");
                None
            }
        }
    }

    /// Build a classroom once occupancy passes the high density threshold.
    fn expand_when_crowded(session: &mut Session) -> bool {
        let state = session.state();
        if state.density() <= state.rules().metrics.density_high {
            return false;
        }
        let Some(spec) = state.rules().facilities.get(EXPANSION_KIND) else {
            return false;
        };
        if spec.capacity == 0 || state.balance().saturating_sub(spec.cost) < RESERVE {
            return false;
        }

        let built = state.facilities().len();
        let column = built.checked_rem(GRID_ROW_LEN).unwrap_or(0);
        let row = built.checked_div(GRID_ROW_LEN).unwrap_or(0);
        let grid_x = i32::try_from(column.saturating_mul(GRID_STRIDE)).unwrap_or(0);
        let grid_y = i32::try_from(row.saturating_mul(GRID_STRIDE)).unwrap_or(0);

        session.add_facility(EXPANSION_KIND, grid_x, grid_y).is_ok()
    }
}
