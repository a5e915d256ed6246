//! Configuration loading and typed config structures for the Academy simulation.
//!
//! The canonical configuration lives in `academy-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//!
//! Every engine constant is injected from here; nothing in the engines is
//! hardcoded. Each field has a serde default, so a partial (or empty) YAML
//! document still yields a complete configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible simulation.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `academy-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Session-level settings (name, seed, driver pacing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Calendar and clock settings.
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Starting state of the institution and the insolvency threshold.
    #[serde(default)]
    pub institution: InstitutionConfig,

    /// Monthly income and expense rates.
    #[serde(default)]
    pub finance: FinanceConfig,

    /// Education quality and satisfaction formula constants.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Reputation convergence constants.
    #[serde(default)]
    pub reputation: ReputationConfig,

    /// Attrition, advancement, and admission constants.
    #[serde(default)]
    pub enrollment: EnrollmentConfig,

    /// Staff candidate generation and progression constants.
    #[serde(default)]
    pub staffing: StaffingConfig,

    /// Promotion campaign catalog keyed by campaign type.
    #[serde(default = "default_promotions")]
    pub promotions: BTreeMap<String, PromotionOption>,

    /// Facility catalog keyed by facility kind. Empty disables facility
    /// contributions entirely.
    #[serde(default = "default_facilities")]
    pub facilities: BTreeMap<String, FacilitySpec>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            calendar: CalendarConfig::default(),
            institution: InstitutionConfig::default(),
            finance: FinanceConfig::default(),
            metrics: MetricsConfig::default(),
            reputation: ReputationConfig::default(),
            enrollment: EnrollmentConfig::default(),
            staffing: StaffingConfig::default(),
            promotions: default_promotions(),
            facilities: default_facilities(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `ACADEMY_SEED` environment variable, when set to an integer,
    /// overrides `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.world.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.validate()?;
        self.enrollment.validate()?;
        self.staffing.validate()?;
        if self.finance.report_history_len == 0 {
            return Err(invalid("finance.report_history_len must be at least 1"));
        }
        if self.metrics.density_low > self.metrics.density_high {
            return Err(invalid(
                "metrics.density_low must not exceed metrics.density_high",
            ));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Session-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between driver frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Simulated months the headless driver runs before stopping (0 = until
    /// insolvency).
    #[serde(default = "default_max_months")]
    pub max_months: u32,

    /// Whether the headless driver sleeps between frames.
    #[serde(default)]
    pub realtime: bool,
}

impl WorldConfig {
    /// Override the seed from `ACADEMY_SEED` when it holds a valid integer.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = std::env::var("ACADEMY_SEED")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            self.seed = seed;
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            frame_interval_ms: default_frame_interval_ms(),
            max_months: default_max_months(),
            realtime: false,
        }
    }
}

/// Calendar and clock configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarConfig {
    /// Year the session starts in.
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Month the session starts in (1-based).
    #[serde(default = "default_start_month")]
    pub start_month: u32,

    /// Days in every month.
    #[serde(default = "default_days_per_month")]
    pub days_per_month: u32,

    /// Months in every year.
    #[serde(default = "default_months_per_year")]
    pub months_per_year: u32,

    /// Month in which the annual admission pass runs.
    #[serde(default = "default_admission_month")]
    pub admission_month: u32,

    /// Month in which the annual graduation/advancement pass runs.
    #[serde(default = "default_graduation_month")]
    pub graduation_month: u32,

    /// Simulated days per real second at session start.
    #[serde(default = "default_initial_speed")]
    pub initial_speed: f64,
}

impl CalendarConfig {
    /// Check that the calendar describes a usable clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days_per_month == 0 {
            return Err(invalid("calendar.days_per_month must be at least 1"));
        }
        if self.months_per_year == 0 {
            return Err(invalid("calendar.months_per_year must be at least 1"));
        }
        let month_range = 1..=self.months_per_year;
        if !month_range.contains(&self.start_month) {
            return Err(invalid("calendar.start_month is outside the year"));
        }
        if !month_range.contains(&self.admission_month) {
            return Err(invalid("calendar.admission_month is outside the year"));
        }
        if !month_range.contains(&self.graduation_month) {
            return Err(invalid("calendar.graduation_month is outside the year"));
        }
        if !self.initial_speed.is_finite() || self.initial_speed <= 0.0 {
            return Err(invalid("calendar.initial_speed must be positive"));
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            start_month: default_start_month(),
            days_per_month: default_days_per_month(),
            months_per_year: default_months_per_year(),
            admission_month: default_admission_month(),
            graduation_month: default_graduation_month(),
            initial_speed: default_initial_speed(),
        }
    }
}

/// Starting state of the institution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstitutionConfig {
    /// Institution display name.
    #[serde(default = "default_institution_name")]
    pub name: String,

    /// Opening balance.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: i64,

    /// Opening reputation, `0..=100`.
    #[serde(default = "default_initial_reputation")]
    pub initial_reputation: f64,

    /// Opening member capacity.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: u32,

    /// Staff hired from generated candidates at session start.
    #[serde(default = "default_initial_staff")]
    pub initial_staff: u32,

    /// Members seeded at random grades at session start.
    #[serde(default = "default_initial_members")]
    pub initial_members: u32,

    /// Balance at or below which the institution is insolvent.
    #[serde(default)]
    pub insolvency_threshold: i64,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            name: default_institution_name(),
            initial_balance: default_initial_balance(),
            initial_reputation: default_initial_reputation(),
            initial_capacity: default_initial_capacity(),
            initial_staff: default_initial_staff(),
            initial_members: default_initial_members(),
            insolvency_threshold: 0,
        }
    }
}

/// Monthly income and expense rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinanceConfig {
    /// Monthly tuition per member before the reputation bonus.
    #[serde(default = "default_base_tuition")]
    pub base_tuition: f64,

    /// Fractional tuition bonus at reputation 100.
    #[serde(default = "default_reputation_bonus_rate")]
    pub reputation_bonus_rate: f64,

    /// Monthly subsidy per member at education quality 100.
    #[serde(default = "default_subsidy_per_member")]
    pub subsidy_per_member: f64,

    /// Monthly maintenance per unit of capacity.
    #[serde(default = "default_capacity_maintenance_rate")]
    pub capacity_maintenance_rate: i64,

    /// Monthly material cost per member.
    #[serde(default = "default_material_cost_per_member")]
    pub material_cost_per_member: i64,

    /// Fixed monthly overhead.
    #[serde(default = "default_fixed_monthly_cost")]
    pub fixed_monthly_cost: i64,

    /// Number of settled reports retained (oldest evicted first).
    #[serde(default = "default_report_history_len")]
    pub report_history_len: usize,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            base_tuition: default_base_tuition(),
            reputation_bonus_rate: default_reputation_bonus_rate(),
            subsidy_per_member: default_subsidy_per_member(),
            capacity_maintenance_rate: default_capacity_maintenance_rate(),
            material_cost_per_member: default_material_cost_per_member(),
            fixed_monthly_cost: default_fixed_monthly_cost(),
            report_history_len: default_report_history_len(),
        }
    }
}

/// Constants for the education quality and satisfaction formulas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsConfig {
    /// Education quality reported when there is no staff at all.
    #[serde(default = "default_no_staff_education")]
    pub no_staff_education: f64,

    /// Multiplier applied to the staff-per-member ratio (the optimal number
    /// of members per staff member).
    #[serde(default = "default_optimal_member_ratio")]
    pub optimal_member_ratio: f64,

    /// Upper bound on the scaled staffing ratio.
    #[serde(default = "default_ratio_cap")]
    pub ratio_cap: f64,

    /// Weight of `skill_avg * ratio` in education quality.
    #[serde(default = "default_education_staff_weight")]
    pub education_staff_weight: f64,

    /// Weight of the summed facility education bonus.
    #[serde(default = "default_education_facility_weight")]
    pub education_facility_weight: f64,

    /// Occupancy density up to which satisfaction is unpenalized.
    #[serde(default = "default_density_low")]
    pub density_low: f64,

    /// Occupancy density beyond which the steep penalty applies.
    #[serde(default = "default_density_high")]
    pub density_high: f64,

    /// Slope of the linear decay between the two density thresholds.
    #[serde(default = "default_density_mid_slope")]
    pub density_mid_slope: f64,

    /// Density factor at the high threshold on the steep branch.
    #[serde(default = "default_density_high_base")]
    pub density_high_base: f64,

    /// Slope of the decay beyond the high threshold.
    #[serde(default = "default_density_high_slope")]
    pub density_high_slope: f64,

    /// Smallest density factor on the steep branch.
    #[serde(default = "default_density_floor")]
    pub density_floor: f64,

    /// Weight of education quality in satisfaction.
    #[serde(default = "default_satisfaction_education_weight")]
    pub satisfaction_education_weight: f64,

    /// Weight of the summed facility satisfaction bonus.
    #[serde(default = "default_satisfaction_facility_weight")]
    pub satisfaction_facility_weight: f64,

    /// Constant added to satisfaction after the density factor.
    #[serde(default = "default_satisfaction_base")]
    pub satisfaction_base: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            no_staff_education: default_no_staff_education(),
            optimal_member_ratio: default_optimal_member_ratio(),
            ratio_cap: default_ratio_cap(),
            education_staff_weight: default_education_staff_weight(),
            education_facility_weight: default_education_facility_weight(),
            density_low: default_density_low(),
            density_high: default_density_high(),
            density_mid_slope: default_density_mid_slope(),
            density_high_base: default_density_high_base(),
            density_high_slope: default_density_high_slope(),
            density_floor: default_density_floor(),
            satisfaction_education_weight: default_satisfaction_education_weight(),
            satisfaction_facility_weight: default_satisfaction_facility_weight(),
            satisfaction_base: default_satisfaction_base(),
        }
    }
}

/// Reputation convergence constants.
///
/// The weights need not sum to 1. `inertia_down` is normally larger than
/// `inertia_up`: reputation is lost faster than it is gained.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReputationConfig {
    /// Weight of education quality in the target reputation.
    #[serde(default = "default_reputation_education_weight")]
    pub education_weight: f64,

    /// Weight of satisfaction in the target reputation.
    #[serde(default = "default_reputation_satisfaction_weight")]
    pub satisfaction_weight: f64,

    /// Weight of the promotion effect in the target reputation.
    #[serde(default = "default_reputation_promotion_weight")]
    pub promotion_weight: f64,

    /// Fraction of the gap closed per month when rising.
    #[serde(default = "default_inertia_up")]
    pub inertia_up: f64,

    /// Fraction of the gap closed per month when falling.
    #[serde(default = "default_inertia_down")]
    pub inertia_down: f64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            education_weight: default_reputation_education_weight(),
            satisfaction_weight: default_reputation_satisfaction_weight(),
            promotion_weight: default_reputation_promotion_weight(),
            inertia_up: default_inertia_up(),
            inertia_down: default_inertia_down(),
        }
    }
}

/// Dropout rate breakpoints.
///
/// The monthly dropout probability is `rate_high` at or above
/// `high_breakpoint`, interpolates linearly between adjacent breakpoints,
/// and reaches `rate_very_low` at satisfaction 0 (flat below).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DropoutConfig {
    /// Satisfaction at which `rate_low` applies.
    #[serde(default = "default_dropout_low_breakpoint")]
    pub low_breakpoint: f64,

    /// Satisfaction at which `rate_medium` applies.
    #[serde(default = "default_dropout_mid_breakpoint")]
    pub mid_breakpoint: f64,

    /// Satisfaction at and above which `rate_high` applies.
    #[serde(default = "default_dropout_high_breakpoint")]
    pub high_breakpoint: f64,

    /// Dropout rate at satisfaction 0.
    #[serde(default = "default_dropout_rate_very_low")]
    pub rate_very_low: f64,

    /// Dropout rate at the low breakpoint.
    #[serde(default = "default_dropout_rate_low")]
    pub rate_low: f64,

    /// Dropout rate at the mid breakpoint.
    #[serde(default = "default_dropout_rate_medium")]
    pub rate_medium: f64,

    /// Dropout rate at and above the high breakpoint.
    #[serde(default = "default_dropout_rate_high")]
    pub rate_high: f64,
}

impl Default for DropoutConfig {
    fn default() -> Self {
        Self {
            low_breakpoint: default_dropout_low_breakpoint(),
            mid_breakpoint: default_dropout_mid_breakpoint(),
            high_breakpoint: default_dropout_high_breakpoint(),
            rate_very_low: default_dropout_rate_very_low(),
            rate_low: default_dropout_rate_low(),
            rate_medium: default_dropout_rate_medium(),
            rate_high: default_dropout_rate_high(),
        }
    }
}

/// Attrition, advancement, and admission constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnrollmentConfig {
    /// Dropout probability curve.
    #[serde(default)]
    pub dropout: DropoutConfig,

    /// Share of a member's previous satisfaction kept each month; the rest
    /// comes from the institution's current satisfaction.
    #[serde(default = "default_satisfaction_carryover")]
    pub satisfaction_carryover: f64,

    /// Final grade; members at this grade always graduate.
    #[serde(default = "default_max_grade")]
    pub max_grade: u8,

    /// Grade at which members may leave with `mid_grade_exit_probability`.
    #[serde(default = "default_mid_grade")]
    pub mid_grade: u8,

    /// Probability that a member at `mid_grade` leaves instead of advancing.
    #[serde(default = "default_mid_grade_exit_probability")]
    pub mid_grade_exit_probability: f64,

    /// Applicants at reputation 0.
    #[serde(default = "default_base_applicants")]
    pub base_applicants: f64,

    /// Additional applicants per reputation point.
    #[serde(default = "default_applicants_per_reputation")]
    pub applicants_per_reputation: f64,

    /// Applicant bonus fraction at promotion effect 100.
    #[serde(default = "default_promotion_bonus_rate")]
    pub promotion_bonus_rate: f64,

    /// Fraction of the promotion effect lost every month.
    #[serde(default = "default_promotion_decay_rate")]
    pub promotion_decay_rate: f64,

    /// Promotion effect below which it snaps to zero.
    #[serde(default = "default_promotion_floor")]
    pub promotion_floor: f64,

    /// Smallest aptitude drawn for a new member.
    #[serde(default = "default_aptitude_min")]
    pub aptitude_min: u32,

    /// Largest aptitude drawn for a new member.
    #[serde(default = "default_aptitude_max")]
    pub aptitude_max: u32,
}

impl EnrollmentConfig {
    /// Check grade ordering, probabilities, and the dropout breakpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_grade == 0 {
            return Err(invalid("enrollment.max_grade must be at least 1"));
        }
        if self.mid_grade >= self.max_grade {
            return Err(invalid("enrollment.mid_grade must be below max_grade"));
        }
        if !(0.0..=1.0).contains(&self.mid_grade_exit_probability) {
            return Err(invalid(
                "enrollment.mid_grade_exit_probability must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.satisfaction_carryover) {
            return Err(invalid(
                "enrollment.satisfaction_carryover must be within [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.promotion_decay_rate) {
            return Err(invalid(
                "enrollment.promotion_decay_rate must be within [0, 1]",
            ));
        }
        if self.aptitude_min > self.aptitude_max {
            return Err(invalid("enrollment.aptitude_min exceeds aptitude_max"));
        }
        let d = &self.dropout;
        if !(d.low_breakpoint > 0.0
            && d.low_breakpoint < d.mid_breakpoint
            && d.mid_breakpoint < d.high_breakpoint)
        {
            return Err(invalid(
                "enrollment.dropout breakpoints must satisfy 0 < low < mid < high",
            ));
        }
        Ok(())
    }
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            dropout: DropoutConfig::default(),
            satisfaction_carryover: default_satisfaction_carryover(),
            max_grade: default_max_grade(),
            mid_grade: default_mid_grade(),
            mid_grade_exit_probability: default_mid_grade_exit_probability(),
            base_applicants: default_base_applicants(),
            applicants_per_reputation: default_applicants_per_reputation(),
            promotion_bonus_rate: default_promotion_bonus_rate(),
            promotion_decay_rate: default_promotion_decay_rate(),
            promotion_floor: default_promotion_floor(),
            aptitude_min: default_aptitude_min(),
            aptitude_max: default_aptitude_max(),
        }
    }
}

/// One band of the candidate skill distribution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillTier {
    /// Band label (informational).
    pub name: String,
    /// Probability mass of this band.
    pub probability: f64,
    /// Smallest skill in the band (inclusive).
    pub min: u32,
    /// Largest skill in the band (inclusive).
    pub max: u32,
}

/// Staff candidate generation and progression constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaffingConfig {
    /// Salary at skill 0 before jitter.
    #[serde(default = "default_salary_base")]
    pub salary_base: i64,

    /// Lowest salary ever offered.
    #[serde(default = "default_salary_min")]
    pub salary_min: i64,

    /// Highest salary ever offered; also the salary at skill 100 before jitter.
    #[serde(default = "default_salary_max")]
    pub salary_max: i64,

    /// Uniform salary jitter half-width.
    #[serde(default = "default_salary_jitter")]
    pub salary_jitter: i64,

    /// Skill bands, walked in order against a cumulative probability.
    #[serde(default = "default_skill_tiers")]
    pub skill_tiers: Vec<SkillTier>,

    /// Lower bound of the fallback draw when no band matched.
    #[serde(default = "default_fallback_skill_min")]
    pub fallback_skill_min: u32,

    /// Upper bound of the fallback draw when no band matched.
    #[serde(default = "default_fallback_skill_max")]
    pub fallback_skill_max: u32,

    /// Candidates offered per refresh.
    #[serde(default = "default_candidate_count")]
    pub candidate_count: u32,

    /// Months of tenure per one point of skill growth.
    #[serde(default = "default_skill_growth_interval_months")]
    pub skill_growth_interval_months: u32,
}

impl StaffingConfig {
    /// Check salary bounds and skill ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.salary_min > self.salary_max {
            return Err(invalid("staffing.salary_min exceeds salary_max"));
        }
        if self.salary_jitter < 0 {
            return Err(invalid("staffing.salary_jitter must not be negative"));
        }
        if self.fallback_skill_min > self.fallback_skill_max || self.fallback_skill_max > 100 {
            return Err(invalid("staffing fallback skill range must lie within 0..=100"));
        }
        if self.skill_growth_interval_months == 0 {
            return Err(invalid(
                "staffing.skill_growth_interval_months must be at least 1",
            ));
        }
        for tier in &self.skill_tiers {
            if tier.min > tier.max || tier.max > 100 {
                return Err(ConfigError::Invalid {
                    reason: format!("skill tier {} must lie within 0..=100", tier.name),
                });
            }
            if !(0.0..=1.0).contains(&tier.probability) {
                return Err(ConfigError::Invalid {
                    reason: format!("skill tier {} probability must be within [0, 1]", tier.name),
                });
            }
        }
        Ok(())
    }
}

impl Default for StaffingConfig {
    fn default() -> Self {
        Self {
            salary_base: default_salary_base(),
            salary_min: default_salary_min(),
            salary_max: default_salary_max(),
            salary_jitter: default_salary_jitter(),
            skill_tiers: default_skill_tiers(),
            fallback_skill_min: default_fallback_skill_min(),
            fallback_skill_max: default_fallback_skill_max(),
            candidate_count: default_candidate_count(),
            skill_growth_interval_months: default_skill_growth_interval_months(),
        }
    }
}

/// A promotion campaign in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromotionOption {
    /// One-off cost of running the campaign.
    pub cost: i64,
    /// Promotion effect added (capped at 100).
    pub effect: f64,
}

/// A facility kind in the catalog.
///
/// Every contribution defaults to zero, so each term can be switched off
/// independently.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacilitySpec {
    /// Display name.
    pub name: String,
    /// Construction cost.
    pub cost: i64,
    /// Capacity added on construction.
    #[serde(default)]
    pub capacity: u32,
    /// Education bonus contributed per facility.
    #[serde(default)]
    pub education: f64,
    /// Satisfaction bonus contributed per facility.
    #[serde(default)]
    pub satisfaction: f64,
    /// Monthly maintenance per facility.
    #[serde(default)]
    pub maintenance: i64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_frame_interval_ms() -> u64 {
    100
}

const fn default_max_months() -> u32 {
    36
}

const fn default_start_year() -> i32 {
    2025
}

const fn default_start_month() -> u32 {
    4
}

const fn default_days_per_month() -> u32 {
    30
}

const fn default_months_per_year() -> u32 {
    12
}

const fn default_admission_month() -> u32 {
    4
}

const fn default_graduation_month() -> u32 {
    3
}

const fn default_initial_speed() -> f64 {
    1.0
}

fn default_institution_name() -> String {
    "Seiryo Academy".to_owned()
}

const fn default_initial_balance() -> i64 {
    50_000_000
}

const fn default_initial_reputation() -> f64 {
    50.0
}

const fn default_initial_capacity() -> u32 {
    300
}

const fn default_initial_staff() -> u32 {
    10
}

const fn default_initial_members() -> u32 {
    200
}

const fn default_base_tuition() -> f64 {
    40_000.0
}

const fn default_reputation_bonus_rate() -> f64 {
    0.5
}

const fn default_subsidy_per_member() -> f64 {
    10_000.0
}

const fn default_capacity_maintenance_rate() -> i64 {
    1_000
}

const fn default_material_cost_per_member() -> i64 {
    3_000
}

const fn default_fixed_monthly_cost() -> i64 {
    2_000_000
}

const fn default_report_history_len() -> usize {
    24
}

const fn default_no_staff_education() -> f64 {
    10.0
}

const fn default_optimal_member_ratio() -> f64 {
    20.0
}

const fn default_ratio_cap() -> f64 {
    1.2
}

const fn default_education_staff_weight() -> f64 {
    0.8
}

const fn default_education_facility_weight() -> f64 {
    0.2
}

const fn default_density_low() -> f64 {
    0.7
}

const fn default_density_high() -> f64 {
    0.9
}

const fn default_density_mid_slope() -> f64 {
    1.5
}

const fn default_density_high_base() -> f64 {
    0.7
}

const fn default_density_high_slope() -> f64 {
    2.0
}

const fn default_density_floor() -> f64 {
    0.1
}

const fn default_satisfaction_education_weight() -> f64 {
    0.6
}

const fn default_satisfaction_facility_weight() -> f64 {
    0.2
}

const fn default_satisfaction_base() -> f64 {
    20.0
}

const fn default_reputation_education_weight() -> f64 {
    0.5
}

const fn default_reputation_satisfaction_weight() -> f64 {
    0.3
}

const fn default_reputation_promotion_weight() -> f64 {
    0.2
}

const fn default_inertia_up() -> f64 {
    0.05
}

const fn default_inertia_down() -> f64 {
    0.1
}

const fn default_dropout_low_breakpoint() -> f64 {
    20.0
}

const fn default_dropout_mid_breakpoint() -> f64 {
    50.0
}

const fn default_dropout_high_breakpoint() -> f64 {
    80.0
}

const fn default_dropout_rate_very_low() -> f64 {
    0.05
}

const fn default_dropout_rate_low() -> f64 {
    0.02
}

const fn default_dropout_rate_medium() -> f64 {
    0.005
}

const fn default_dropout_rate_high() -> f64 {
    0.001
}

const fn default_satisfaction_carryover() -> f64 {
    0.8
}

const fn default_max_grade() -> u8 {
    6
}

const fn default_mid_grade() -> u8 {
    3
}

const fn default_mid_grade_exit_probability() -> f64 {
    0.3
}

const fn default_base_applicants() -> f64 {
    30.0
}

const fn default_applicants_per_reputation() -> f64 {
    1.0
}

const fn default_promotion_bonus_rate() -> f64 {
    0.5
}

const fn default_promotion_decay_rate() -> f64 {
    0.1
}

const fn default_promotion_floor() -> f64 {
    0.1
}

const fn default_aptitude_min() -> u32 {
    30
}

const fn default_aptitude_max() -> u32 {
    70
}

const fn default_salary_base() -> i64 {
    250_000
}

const fn default_salary_min() -> i64 {
    250_000
}

const fn default_salary_max() -> i64 {
    600_000
}

const fn default_salary_jitter() -> i64 {
    20_000
}

fn default_skill_tiers() -> Vec<SkillTier> {
    vec![
        SkillTier {
            name: "novice".to_owned(),
            probability: 0.30,
            min: 30,
            max: 49,
        },
        SkillTier {
            name: "competent".to_owned(),
            probability: 0.45,
            min: 50,
            max: 69,
        },
        SkillTier {
            name: "veteran".to_owned(),
            probability: 0.20,
            min: 70,
            max: 89,
        },
        SkillTier {
            name: "master".to_owned(),
            probability: 0.05,
            min: 90,
            max: 100,
        },
    ]
}

const fn default_fallback_skill_min() -> u32 {
    40
}

const fn default_fallback_skill_max() -> u32 {
    60
}

const fn default_candidate_count() -> u32 {
    3
}

const fn default_skill_growth_interval_months() -> u32 {
    12
}

fn default_promotions() -> BTreeMap<String, PromotionOption> {
    let mut m = BTreeMap::new();
    m.insert(
        "poster".to_owned(),
        PromotionOption {
            cost: 100_000,
            effect: 5.0,
        },
    );
    m.insert(
        "website".to_owned(),
        PromotionOption {
            cost: 300_000,
            effect: 10.0,
        },
    );
    m.insert(
        "newspaper".to_owned(),
        PromotionOption {
            cost: 500_000,
            effect: 15.0,
        },
    );
    m.insert(
        "television".to_owned(),
        PromotionOption {
            cost: 3_000_000,
            effect: 40.0,
        },
    );
    m
}

fn default_facilities() -> BTreeMap<String, FacilitySpec> {
    let mut m = BTreeMap::new();
    m.insert(
        "classroom".to_owned(),
        FacilitySpec {
            name: "Classroom".to_owned(),
            cost: 5_000_000,
            capacity: 40,
            education: 2.0,
            satisfaction: 1.0,
            maintenance: 50_000,
        },
    );
    m.insert(
        "science_lab".to_owned(),
        FacilitySpec {
            name: "Science Lab".to_owned(),
            cost: 12_000_000,
            capacity: 0,
            education: 10.0,
            satisfaction: 3.0,
            maintenance: 120_000,
        },
    );
    m.insert(
        "library".to_owned(),
        FacilitySpec {
            name: "Library".to_owned(),
            cost: 10_000_000,
            capacity: 0,
            education: 8.0,
            satisfaction: 5.0,
            maintenance: 100_000,
        },
    );
    m.insert(
        "gym".to_owned(),
        FacilitySpec {
            name: "Gymnasium".to_owned(),
            cost: 20_000_000,
            capacity: 0,
            education: 2.0,
            satisfaction: 12.0,
            maintenance: 200_000,
        },
    );
    m.insert(
        "cafeteria".to_owned(),
        FacilitySpec {
            name: "Cafeteria".to_owned(),
            cost: 8_000_000,
            capacity: 0,
            education: 0.0,
            satisfaction: 10.0,
            maintenance: 150_000,
        },
    );
    m
}

fn default_log_level() -> String {
    "info".to_owned()
}
