//! Reputation convergence and staff progression.
//!
//! Reputation moves a fraction of the way toward a weighted target every
//! month. The fraction is larger when falling than when rising, so a good
//! name is slow to build and quick to lose.
//!
//! Staff accumulate tenure monthly and gain one point of skill per
//! completed growth interval (12 months by default), capped at 100.

use tracing::debug;

use crate::config::{ReputationConfig, StaffingConfig};
use crate::state::{InstitutionState, clamp_percent};

/// Maximum staff skill.
const MAX_SKILL: u32 = 100;

/// Updates reputation and staff tenure once per month.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionEngine {
    reputation: ReputationConfig,
    skill_growth_interval_months: u32,
}

impl ProgressionEngine {
    /// Create an engine from reputation and staffing configuration.
    pub fn new(reputation: &ReputationConfig, staffing: &StaffingConfig) -> Self {
        Self {
            reputation: reputation.clone(),
            skill_growth_interval_months: staffing.skill_growth_interval_months.max(1),
        }
    }

    /// Reputation the institution is converging toward at its current state.
    pub fn target_reputation(&self, state: &InstitutionState) -> f64 {
        let r = &self.reputation;
        state.education_quality() * r.education_weight
            + state.satisfaction() * r.satisfaction_weight
            + state.promotion_effect() * r.promotion_weight
    }

    /// Move reputation toward its target by `dt` months of inertia.
    ///
    /// Returns the new reputation, clamped to `[0, 100]`.
    pub fn update_reputation(&self, state: &mut InstitutionState, dt: f64) -> f64 {
        let current = state.reputation();
        let target = self.target_reputation(state);
        let inertia = if target > current {
            self.reputation.inertia_up
        } else {
            self.reputation.inertia_down
        };

        let updated = clamp_percent(current + (target - current) * inertia * dt);
        state.set_reputation(updated);
        debug!(from = current, to = updated, target, "Reputation updated");
        state.reputation()
    }

    /// Advance every staff member's tenure by one month.
    ///
    /// Returns how many staff gained a point of skill.
    pub fn update_staff_monthly(&self, state: &mut InstitutionState) -> u32 {
        let interval = self.skill_growth_interval_months;
        let mut skill_ups = 0_u32;
        state.update_staff(|staff| {
            staff.tenure_months = staff.tenure_months.saturating_add(1);
            if staff.tenure_months.checked_rem(interval) == Some(0) && staff.skill < MAX_SKILL {
                staff.skill = staff.skill.saturating_add(1).min(MAX_SKILL);
                skill_ups = skill_ups.saturating_add(1);
            }
        });
        if skill_ups > 0 {
            debug!(skill_ups, "Staff skill growth");
        }
        skill_ups
    }
}
