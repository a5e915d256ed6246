//! Enrollment dynamics: attrition, promotion decay, advancement, admission.
//!
//! Monthly, every member either drops out (with a probability that falls as
//! institution satisfaction rises) or carries on, blending their personal
//! satisfaction toward the institution's. The promotion effect then decays.
//!
//! Annually, in the graduation month, members at the final grade graduate,
//! members at the mid grade may leave, and everyone else advances one grade.
//! In the admission month, new grade-1 members are admitted up to capacity.
//!
//! Passes that may remove members go through
//! [`InstitutionState::retain_members`], which visits each member exactly
//! once and removes in the same pass.

use std::collections::BTreeMap;

use academy_types::{AdvancementReport, EnrollmentReport, Member, MemberId};
use rand::Rng;
use tracing::{debug, info};

use crate::candidates::random_inclusive;
use crate::config::{DropoutConfig, EnrollmentConfig, PromotionOption};
use crate::error::ActionError;
use crate::state::{InstitutionState, clamp_percent, to_currency};

// ---------------------------------------------------------------------------
// DropoutCurve
// ---------------------------------------------------------------------------

/// Piecewise-linear map from satisfaction to monthly dropout probability.
#[derive(Debug, Clone, PartialEq)]
pub struct DropoutCurve {
    config: DropoutConfig,
}

impl DropoutCurve {
    /// Create a curve from configured breakpoints and rates.
    pub fn new(config: &DropoutConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Monthly dropout probability at the given satisfaction.
    ///
    /// Flat at `rate_high` from the high breakpoint upward, flat at
    /// `rate_very_low` at or below 0, linear between adjacent breakpoints.
    pub fn rate(&self, satisfaction: f64) -> f64 {
        let c = &self.config;
        let s = if satisfaction.is_nan() {
            0.0
        } else {
            satisfaction.max(0.0)
        };

        let rate = if s >= c.high_breakpoint {
            c.rate_high
        } else if s >= c.mid_breakpoint {
            lerp(c.rate_medium, c.rate_high, c.mid_breakpoint, c.high_breakpoint, s)
        } else if s >= c.low_breakpoint {
            lerp(c.rate_low, c.rate_medium, c.low_breakpoint, c.mid_breakpoint, s)
        } else {
            lerp(c.rate_very_low, c.rate_low, 0.0, c.low_breakpoint, s)
        };
        rate.clamp(0.0, 1.0)
    }
}

/// Interpolate from `from` at `x0` to `to` at `x1`.
fn lerp(from: f64, to: f64, x0: f64, x1: f64, x: f64) -> f64 {
    let span = x1 - x0;
    if span <= 0.0 {
        return to;
    }
    from + (to - from) * (x - x0) / span
}

// ---------------------------------------------------------------------------
// PopulationEngine
// ---------------------------------------------------------------------------

/// Runs monthly and annual enrollment passes and promotion campaigns.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationEngine {
    config: EnrollmentConfig,
    dropout: DropoutCurve,
    promotions: BTreeMap<String, PromotionOption>,
}

impl PopulationEngine {
    /// Create an engine from enrollment configuration and the promotion
    /// campaign catalog.
    pub fn new(config: &EnrollmentConfig, promotions: &BTreeMap<String, PromotionOption>) -> Self {
        Self {
            config: config.clone(),
            dropout: DropoutCurve::new(&config.dropout),
            promotions: promotions.clone(),
        }
    }

    /// The dropout curve in use.
    pub const fn dropout_curve(&self) -> &DropoutCurve {
        &self.dropout
    }

    /// Create a member at the given grade with a random aptitude.
    pub fn new_member(&self, grade: u8, rng: &mut impl Rng) -> Member {
        let aptitude = random_inclusive(rng, self.config.aptitude_min, self.config.aptitude_max);
        Member::new(MemberId::from_rng(rng), grade, aptitude)
    }

    // -- Monthly --------------------------------------------------------------

    /// Remove members who drop out this month and update the rest.
    ///
    /// Every member draws one uniform sample against the dropout rate at
    /// `satisfaction`. Survivors blend their personal satisfaction toward
    /// `satisfaction` and gain a month of enrollment. Returns the number of
    /// dropouts.
    pub fn process_monthly_attrition(
        &self,
        state: &mut InstitutionState,
        satisfaction: f64,
        rng: &mut impl Rng,
    ) -> u32 {
        let rate = self.dropout.rate(satisfaction);
        let keep = self.config.satisfaction_carryover;

        let dropouts = state.retain_members(|m| {
            let sample: f64 = rng.random();
            if sample < rate {
                return false;
            }
            m.individual_satisfaction =
                clamp_percent(m.individual_satisfaction * keep + satisfaction * (1.0 - keep));
            m.months_enrolled = m.months_enrolled.saturating_add(1);
            true
        });

        if dropouts > 0 {
            info!(dropouts, rate, satisfaction, "Members dropped out");
        }
        dropouts
    }

    /// Decay the promotion effect by the configured monthly rate, snapping
    /// to zero below the configured floor.
    pub fn decay_promotion_effect(&self, state: &mut InstitutionState) {
        let current = state.promotion_effect();
        if current <= 0.0 {
            return;
        }
        let mut decayed = current * (1.0 - self.config.promotion_decay_rate);
        if decayed < self.config.promotion_floor {
            decayed = 0.0;
        }
        state.set_promotion_effect(decayed);
    }

    /// Monthly pass: attrition followed by promotion decay.
    pub fn process_monthly(
        &self,
        state: &mut InstitutionState,
        satisfaction: f64,
        rng: &mut impl Rng,
    ) -> EnrollmentReport {
        let dropouts = self.process_monthly_attrition(state, satisfaction, rng);
        self.decay_promotion_effect(state);
        EnrollmentReport {
            dropouts,
            ..EnrollmentReport::default()
        }
    }

    // -- Annual ---------------------------------------------------------------

    /// Graduate, release, or advance every member. Call only in the
    /// graduation month.
    pub fn process_annual_advancement(
        &self,
        state: &mut InstitutionState,
        rng: &mut impl Rng,
    ) -> AdvancementReport {
        let max_grade = self.config.max_grade;
        let mid_grade = self.config.mid_grade;
        let exit_probability = self.config.mid_grade_exit_probability;
        let mut advanced = 0_u32;

        let graduates = state.retain_members(|m| {
            let leaves = if m.grade >= max_grade {
                true
            } else if m.grade == mid_grade {
                rng.random::<f64>() < exit_probability
            } else {
                false
            };
            if !leaves {
                m.grade = m.grade.saturating_add(1).min(max_grade);
                advanced = advanced.saturating_add(1);
            }
            !leaves
        });
        let report = AdvancementReport {
            graduates,
            advanced,
        };

        info!(
            graduates = report.graduates,
            advanced = report.advanced,
            "Annual advancement"
        );
        report
    }

    /// Applicants the next admission pass would attract at the current
    /// reputation and promotion effect, before the capacity limit.
    pub fn projected_applicants(&self, state: &InstitutionState) -> u32 {
        let c = &self.config;
        let base = c.base_applicants + state.reputation() * c.applicants_per_reputation;
        let bonus = base * (state.promotion_effect() / 100.0) * c.promotion_bonus_rate;
        let total = to_currency((base + bonus).floor()).max(0);
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    /// Admit new grade-1 members up to remaining capacity. Call only in the
    /// admission month. Returns the number admitted.
    pub fn process_annual_admission(
        &self,
        state: &mut InstitutionState,
        rng: &mut impl Rng,
    ) -> u32 {
        let applicants = self.projected_applicants(state);
        let seats = state.remaining_capacity();
        let to_admit = applicants.min(seats);

        let mut admitted = 0_u32;
        for _ in 0..to_admit {
            let member = self.new_member(1, rng);
            if state.admit_member(member).is_err() {
                break;
            }
            admitted = admitted.saturating_add(1);
        }

        info!(applicants, seats, admitted, "Annual admission");
        admitted
    }

    /// Seed members at uniformly random grades, up to remaining capacity.
    /// Returns the number seeded.
    pub fn seed_members(&self, state: &mut InstitutionState, count: u32, rng: &mut impl Rng) -> u32 {
        let to_seed = count.min(state.remaining_capacity());
        let max_grade = u32::from(self.config.max_grade.max(1));

        let mut seeded = 0_u32;
        for _ in 0..to_seed {
            let grade = u8::try_from(random_inclusive(rng, 1, max_grade)).unwrap_or(1);
            if state.admit_member(self.new_member(grade, rng)).is_err() {
                break;
            }
            seeded = seeded.saturating_add(1);
        }
        seeded
    }

    // -- Promotion --------------------------------------------------------------

    /// The promotion campaign catalog.
    pub const fn promotions(&self) -> &BTreeMap<String, PromotionOption> {
        &self.promotions
    }

    /// Run a promotion campaign: pay its cost and add its effect (capped
    /// at 100).
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownPromotion`] for a type not in the
    /// catalog, or [`ActionError::Unaffordable`] if the cost is not covered.
    /// The institution is unchanged on error.
    pub fn run_promotion_campaign(
        &self,
        state: &mut InstitutionState,
        kind: &str,
    ) -> Result<(), ActionError> {
        let option = self
            .promotions
            .get(kind)
            .ok_or_else(|| ActionError::UnknownPromotion {
                kind: kind.to_owned(),
            })?;

        state.spend(option.cost)?;
        state.set_promotion_effect(state.promotion_effect() + option.effect);
        debug!(
            kind,
            cost = option.cost,
            effect = state.promotion_effect(),
            "Promotion campaign run"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::SimulationConfig;

    const EPS: f64 = 1e-9;

    fn config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.institution.initial_balance = 1_000_000;
        config.institution.initial_capacity = 1_000;
        config
    }

    fn engine(config: &SimulationConfig) -> PopulationEngine {
        PopulationEngine::new(&config.enrollment, &config.promotions)
    }

    fn fill(state: &mut InstitutionState, engine: &PopulationEngine, grade: u8, n: u32, rng: &mut SmallRng) {
        for _ in 0..n {
            state.admit_member(engine.new_member(grade, rng)).unwrap();
        }
    }

    #[test]
    fn dropout_curve_hits_breakpoints() {
        let curve = DropoutCurve::new(&DropoutConfig::default());
        assert!((curve.rate(100.0) - 0.001).abs() < EPS);
        assert!((curve.rate(80.0) - 0.001).abs() < EPS);
        assert!((curve.rate(50.0) - 0.005).abs() < EPS);
        assert!((curve.rate(20.0) - 0.02).abs() < EPS);
        assert!((curve.rate(0.0) - 0.05).abs() < EPS);
        assert!((curve.rate(-10.0) - 0.05).abs() < EPS);
        // Midway between 50 and 80.
        assert!((curve.rate(65.0) - 0.003).abs() < EPS);
    }

    #[test]
    fn dropout_curve_is_non_increasing() {
        let curve = DropoutCurve::new(&DropoutConfig::default());
        let mut previous = curve.rate(-5.0);
        for step in 0..=1_100 {
            let s = f64::from(step) / 10.0;
            let rate = curve.rate(s);
            assert!(rate <= previous + EPS, "rate rose at satisfaction {s}");
            previous = rate;
        }
    }

    #[test]
    fn attrition_blends_survivor_satisfaction() {
        let cfg = config();
        let mut cfg_no_dropout = cfg.clone();
        cfg_no_dropout.enrollment.dropout.rate_high = 0.0;
        let e = engine(&cfg_no_dropout);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = InstitutionState::new(&cfg);
        fill(&mut state, &e, 1, 10, &mut rng);

        let dropouts = e.process_monthly_attrition(&mut state, 100.0, &mut rng);
        assert_eq!(dropouts, 0);
        for m in state.members() {
            // 50 * 0.8 + 100 * 0.2
            assert!((m.individual_satisfaction - 60.0).abs() < EPS);
            assert_eq!(m.months_enrolled, 1);
        }
    }

    #[test]
    fn low_satisfaction_drives_more_dropouts() {
        let cfg = config();
        let e = engine(&cfg);

        let mut rng = SmallRng::seed_from_u64(7);
        let mut unhappy = InstitutionState::new(&cfg);
        fill(&mut unhappy, &e, 1, 1_000, &mut rng);
        let unhappy_dropouts = e.process_monthly_attrition(&mut unhappy, 0.0, &mut rng);

        let mut rng = SmallRng::seed_from_u64(7);
        let mut happy = InstitutionState::new(&cfg);
        fill(&mut happy, &e, 1, 1_000, &mut rng);
        let happy_dropouts = e.process_monthly_attrition(&mut happy, 90.0, &mut rng);

        assert!(unhappy_dropouts > happy_dropouts);
        assert_eq!(unhappy.member_count(), 1_000 - unhappy_dropouts as usize);
        // Expected 50 at rate 0.05.
        assert!((20..=90).contains(&unhappy_dropouts));
    }

    #[test]
    fn promotion_effect_decays_and_snaps_to_zero() {
        let cfg = config();
        let e = engine(&cfg);
        let mut state = InstitutionState::new(&cfg);

        state.set_promotion_effect(50.0);
        e.decay_promotion_effect(&mut state);
        assert!((state.promotion_effect() - 45.0).abs() < EPS);

        state.set_promotion_effect(0.105);
        e.decay_promotion_effect(&mut state);
        assert!(state.promotion_effect().abs() < f64::EPSILON);
    }

    #[test]
    fn final_grade_always_graduates_and_others_advance() {
        let cfg = config();
        let e = engine(&cfg);
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = InstitutionState::new(&cfg);
        fill(&mut state, &e, 6, 40, &mut rng);
        fill(&mut state, &e, 1, 10, &mut rng);
        fill(&mut state, &e, 5, 10, &mut rng);

        let report = e.process_annual_advancement(&mut state, &mut rng);
        assert_eq!(report.graduates, 40);
        assert_eq!(report.advanced, 20);
        assert_eq!(state.members().iter().filter(|m| m.grade == 2).count(), 10);
        assert_eq!(state.members().iter().filter(|m| m.grade == 6).count(), 10);
    }

    #[test]
    fn mid_grade_exit_rate_matches_configuration() {
        let cfg = config();
        let e = engine(&cfg);
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut state = InstitutionState::new(&cfg);
        fill(&mut state, &e, 3, 1_000, &mut rng);

        let report = e.process_annual_advancement(&mut state, &mut rng);
        assert_eq!(report.graduates + report.advanced, 1_000);
        // Expected 300; binomial sd is about 14.5.
        assert!(
            (240..=360).contains(&report.graduates),
            "graduates {}",
            report.graduates
        );
        assert!(state.members().iter().all(|m| m.grade == 4));
    }

    #[test]
    fn admission_respects_capacity() {
        let mut cfg = config();
        cfg.institution.initial_capacity = 20;
        let e = engine(&cfg);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut state = InstitutionState::new(&cfg);
        fill(&mut state, &e, 2, 15, &mut rng);

        // 30 + 50 applicants, only 5 seats.
        assert_eq!(e.projected_applicants(&state), 80);
        let admitted = e.process_annual_admission(&mut state, &mut rng);
        assert_eq!(admitted, 5);
        assert_eq!(state.member_count(), 20);
        assert_eq!(state.members().iter().filter(|m| m.grade == 1).count(), 5);
    }

    #[test]
    fn admission_counts_promotion_bonus() {
        let cfg = config();
        let e = engine(&cfg);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut state = InstitutionState::new(&cfg);
        state.set_promotion_effect(40.0);

        // base 80; bonus 80 * 0.4 * 0.5 = 16
        assert_eq!(e.projected_applicants(&state), 96);
        let admitted = e.process_annual_admission(&mut state, &mut rng);
        assert_eq!(admitted, 96);
        for m in state.members() {
            assert!((30..=70).contains(&m.aptitude));
        }
    }

    #[test]
    fn unknown_campaign_changes_nothing() {
        let cfg = config();
        let e = engine(&cfg);
        let mut state = InstitutionState::new(&cfg);
        let result = e.run_promotion_campaign(&mut state, "unknown");
        assert!(matches!(result, Err(ActionError::UnknownPromotion { .. })));
        assert!(state.promotion_effect().abs() < f64::EPSILON);
        assert_eq!(state.balance(), 1_000_000);
    }

    #[test]
    fn unaffordable_campaign_changes_nothing() {
        let cfg = config();
        let e = engine(&cfg);
        let mut state = InstitutionState::new(&cfg);
        let result = e.run_promotion_campaign(&mut state, "television");
        assert!(matches!(result, Err(ActionError::Unaffordable { .. })));
        assert!(state.promotion_effect().abs() < f64::EPSILON);
        assert_eq!(state.balance(), 1_000_000);
    }

    #[test]
    fn campaign_effect_is_capped() {
        let mut cfg = config();
        cfg.institution.initial_balance = 100_000_000;
        let e = engine(&cfg);
        let mut state = InstitutionState::new(&cfg);
        for _ in 0..3 {
            e.run_promotion_campaign(&mut state, "television").unwrap();
        }
        assert!((state.promotion_effect() - 100.0).abs() < EPS);
        assert_eq!(state.balance(), 91_000_000);
    }

    #[test]
    fn seeding_is_bounded_by_capacity() {
        let mut cfg = config();
        cfg.institution.initial_capacity = 50;
        let e = engine(&cfg);
        let mut rng = SmallRng::seed_from_u64(8);
        let mut state = InstitutionState::new(&cfg);
        assert_eq!(e.seed_members(&mut state, 80, &mut rng), 50);
        assert!(state.members().iter().all(|m| (1..=6).contains(&m.grade)));
    }
}
