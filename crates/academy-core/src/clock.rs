//! Simulation clock for the Academy engine.
//!
//! The clock converts real elapsed seconds into whole simulated days. At
//! speed `1.0` one real second is one simulated day. Fractional progress is
//! kept in an accumulator so that no time is lost between frames.
//!
//! # Design Principles
//!
//! - The calendar date is the single source of truth. Admission and
//!   graduation months are predicates over it, never stored separately.
//! - Integer date arithmetic is checked (no silent overflow).
//! - Pausing freezes accumulation entirely; time passed while paused is
//!   discarded, not banked.

use academy_types::SimDate;
use tracing::warn;

use crate::config::CalendarConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The year counter would overflow.
    #[error("year counter overflow: cannot advance beyond i32::MAX")]
    YearOverflow,

    /// Invalid calendar configuration (e.g. zero days per month).
    #[error("invalid calendar configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Calendar boundaries crossed by one call to [`SimClock::advance`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockAdvance {
    /// At least one month boundary was crossed.
    pub month_changed: bool,
    /// At least one year boundary was crossed.
    pub year_changed: bool,
    /// Whole simulated days consumed.
    pub days_elapsed: u32,
    /// Month boundaries crossed. Normally 0 or 1; larger only when a single
    /// frame covers more than a month of simulated time.
    pub months_crossed: u32,
    /// First day of every month entered, in order.
    pub month_starts: Vec<SimDate>,
}

/// Time-accumulating clock tracking the simulated calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Current simulated date.
    date: SimDate,

    /// Date the session started on, used for elapsed-month queries.
    start: SimDate,

    /// Days in every month.
    days_per_month: u32,

    /// Months in every year.
    months_per_year: u32,

    /// Month in which admissions run.
    admission_month: u32,

    /// Month in which graduation runs.
    graduation_month: u32,

    /// Simulated days per real second.
    speed: f64,

    /// Whether accumulation is frozen.
    paused: bool,

    /// Fractional simulated days not yet applied to the date.
    accumulator: f64,
}

impl SimClock {
    /// Create a clock positioned on day 1 of the configured start month.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the calendar has no days or
    /// months, a designated month lies outside the year, or the initial
    /// speed is not positive.
    pub fn new(config: &CalendarConfig) -> Result<Self, ClockError> {
        config
            .validate()
            .map_err(|err| ClockError::InvalidConfig {
                reason: err.to_string(),
            })?;

        let start = SimDate {
            year: config.start_year,
            month: config.start_month,
            day: 1,
        };

        Ok(Self {
            date: start,
            start,
            days_per_month: config.days_per_month,
            months_per_year: config.months_per_year,
            admission_month: config.admission_month,
            graduation_month: config.graduation_month,
            speed: config.initial_speed,
            paused: false,
            accumulator: 0.0,
        })
    }

    /// Advance by `dt` real seconds, scaled by the current speed.
    ///
    /// Returns which calendar boundaries were crossed. A paused clock
    /// consumes nothing and reports no change. Negative or non-finite `dt`
    /// is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::YearOverflow`] if the year would exceed
    /// `i32::MAX`.
    pub fn advance(&mut self, dt: f64) -> Result<ClockAdvance, ClockError> {
        let mut result = ClockAdvance::default();
        if self.paused {
            return Ok(result);
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Ok(result);
        }

        self.accumulator += dt * self.speed;
        while self.accumulator >= 1.0 {
            self.accumulator -= 1.0;
            self.roll_day(&mut result)?;
        }
        Ok(result)
    }

    fn roll_day(&mut self, result: &mut ClockAdvance) -> Result<(), ClockError> {
        result.days_elapsed = result.days_elapsed.saturating_add(1);
        self.date.day = self.date.day.saturating_add(1);
        if self.date.day <= self.days_per_month {
            return Ok(());
        }

        self.date.day = 1;
        self.date.month = self.date.month.saturating_add(1);
        result.month_changed = true;
        result.months_crossed = result.months_crossed.saturating_add(1);

        if self.date.month > self.months_per_year {
            self.date.month = 1;
            self.date.year = self
                .date
                .year
                .checked_add(1)
                .ok_or(ClockError::YearOverflow)?;
            result.year_changed = true;
        }
        result.month_starts.push(self.date);
        Ok(())
    }

    /// Set the simulated days per real second.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn set_speed(&mut self, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            warn!(speed = value, "Ignoring invalid clock speed");
            return;
        }
        self.speed = value;
    }

    /// Flip between paused and running.
    pub const fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Return the current simulated date.
    pub const fn date(&self) -> SimDate {
        self.date
    }

    /// Return the current year.
    pub const fn year(&self) -> i32 {
        self.date.year
    }

    /// Return the current month (1-based).
    pub const fn month(&self) -> u32 {
        self.date.month
    }

    /// Return the current day of the month (1-based).
    pub const fn day(&self) -> u32 {
        self.date.day
    }

    /// Return the current speed multiplier.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the clock is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Return the configured days per month.
    pub const fn days_per_month(&self) -> u32 {
        self.days_per_month
    }

    /// Return the configured months per year.
    pub const fn months_per_year(&self) -> u32 {
        self.months_per_year
    }

    /// Return the designated admission month.
    pub const fn admission_month(&self) -> u32 {
        self.admission_month
    }

    /// Return the designated graduation month.
    pub const fn graduation_month(&self) -> u32 {
        self.graduation_month
    }

    /// Whether the current month is the designated admission month.
    pub const fn is_admission_month(&self) -> bool {
        self.is_admission_date(self.date)
    }

    /// Whether the current month is the designated graduation month.
    pub const fn is_graduation_month(&self) -> bool {
        self.is_graduation_date(self.date)
    }

    /// Whether `date` falls in the designated admission month.
    pub const fn is_admission_date(&self, date: SimDate) -> bool {
        date.month == self.admission_month
    }

    /// Whether `date` falls in the designated graduation month.
    pub const fn is_graduation_date(&self, date: SimDate) -> bool {
        date.month == self.graduation_month
    }

    /// Whole months elapsed since the session's start month.
    pub fn elapsed_months(&self) -> u64 {
        let years = i64::from(self.date.year).saturating_sub(i64::from(self.start.year));
        let total = years
            .saturating_mul(i64::from(self.months_per_year))
            .saturating_add(i64::from(self.date.month))
            .saturating_sub(i64::from(self.start.month));
        u64::try_from(total).unwrap_or(0)
    }
}
