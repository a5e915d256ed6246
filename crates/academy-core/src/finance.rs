//! Monthly financial settlement and the bounded report history.
//!
//! # Design
//!
//! - **Single computation**: settlement reads the same itemized breakdown
//!   as the state's monthly projections.
//! - **Immutable reports**: a [`MonthlyReport`] is never modified after it
//!   is recorded.
//! - **Bounded**: the history keeps the most recent `report_history_len`
//!   reports and evicts the oldest first.

use std::collections::VecDeque;

use academy_types::MonthlyReport;
use tracing::{info, warn};

use crate::config::FinanceConfig;
use crate::state::{InstitutionState, count_f64};

/// Default window for [`FinanceEngine::average_balance`], in months.
pub const DEFAULT_AVERAGE_WINDOW: usize = 6;

// ---------------------------------------------------------------------------
// ReportHistory
// ---------------------------------------------------------------------------

/// Fixed-capacity FIFO of settled reports, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHistory {
    reports: VecDeque<MonthlyReport>,
    capacity: usize,
}

impl ReportHistory {
    /// Create an empty history retaining at most `capacity` reports.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            reports: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a report, evicting the oldest beyond capacity.
    pub fn push(&mut self, report: MonthlyReport) {
        while self.reports.len() >= self.capacity {
            self.reports.pop_front();
        }
        self.reports.push_back(report);
    }

    /// Number of retained reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no report has been retained.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Maximum number of retained reports.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent report.
    pub fn latest(&self) -> Option<&MonthlyReport> {
        self.reports.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &MonthlyReport> {
        self.reports.iter()
    }
}

// ---------------------------------------------------------------------------
// FinanceEngine
// ---------------------------------------------------------------------------

/// Settles the institution's books once per month.
#[derive(Debug, Clone)]
pub struct FinanceEngine {
    history: ReportHistory,
}

impl FinanceEngine {
    /// Create an engine whose history length comes from configuration.
    pub fn new(config: &FinanceConfig) -> Self {
        Self {
            history: ReportHistory::new(config.report_history_len),
        }
    }

    /// Settle one month: compute income and expense, apply the balance to
    /// the institution, and record the report.
    pub fn process_month(&mut self, state: &mut InstitutionState) -> MonthlyReport {
        let breakdown = state.monthly_breakdown();
        let income = breakdown.income();
        let expense = breakdown.expense();
        let balance = breakdown.balance();

        state.apply_settlement(balance);

        let report = MonthlyReport {
            income,
            expense,
            balance,
            running_total: state.balance(),
            salary_cost: breakdown.salary_cost,
            capacity_maintenance: breakdown.capacity_maintenance,
            facility_maintenance: breakdown.facility_maintenance,
            material_cost: breakdown.material_cost,
            fixed_cost: breakdown.fixed_cost,
            tuition_income: breakdown.tuition_income,
            subsidy_income: breakdown.subsidy_income,
        };

        info!(
            income,
            expense,
            balance,
            running_total = report.running_total,
            "Month settled"
        );
        if balance < 0 {
            warn!(deficit = balance, "Monthly deficit");
        }

        self.history.push(report.clone());
        report
    }

    /// Retained reports, oldest first.
    pub const fn history(&self) -> &ReportHistory {
        &self.history
    }

    /// The most recent settled report.
    pub fn latest(&self) -> Option<&MonthlyReport> {
        self.history.latest()
    }

    /// Mean monthly balance over the most recent `window` reports.
    ///
    /// Uses however many reports are retained if fewer than `window`.
    /// Returns 0 with no reports or a zero window.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_balance(&self, window: usize) -> f64 {
        let recent: Vec<i64> = self.history.iter().rev().take(window).map(|r| r.balance).collect();
        if recent.is_empty() {
            return 0.0;
        }
        let total: f64 = recent.iter().map(|&b| b as f64).sum();
        total / count_f64(recent.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use academy_types::{INITIAL_STAFF_MORALE, Member, MemberId, StaffId, StaffMember, Subject};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::SimulationConfig;

    fn report(balance: i64) -> MonthlyReport {
        MonthlyReport {
            income: balance.max(0),
            expense: (-balance).max(0),
            balance,
            running_total: 0,
            salary_cost: 0,
            capacity_maintenance: 0,
            facility_maintenance: 0,
            material_cost: 0,
            fixed_cost: 0,
            tuition_income: balance.max(0),
            subsidy_income: 0,
        }
    }

    fn populated_state() -> InstitutionState {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut config = SimulationConfig::default();
        config.institution.initial_balance = 10_000_000;
        config.institution.initial_capacity = 200;
        let mut state = InstitutionState::new(&config);
        for _ in 0..4 {
            state
                .hire_staff(StaffMember {
                    id: StaffId::from_rng(&mut rng),
                    name: "Suzuki Hanako".to_owned(),
                    skill: 60,
                    salary: 400_000,
                    subject: Subject::English,
                    tenure_months: 0,
                    morale: INITIAL_STAFF_MORALE,
                })
                .unwrap();
        }
        for _ in 0..100 {
            state
                .admit_member(Member::new(MemberId::from_rng(&mut rng), 1, 50))
                .unwrap();
        }
        state
    }

    #[test]
    fn history_evicts_oldest_first() {
        let mut history = ReportHistory::new(3);
        for b in 1..=5 {
            history.push(report(b));
        }
        assert_eq!(history.len(), 3);
        let balances: Vec<i64> = history.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![3, 4, 5]);
        assert_eq!(history.latest().map(|r| r.balance), Some(5));
    }

    #[test]
    fn zero_capacity_history_keeps_one() {
        let mut history = ReportHistory::new(0);
        history.push(report(1));
        history.push(report(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn settlement_matches_projection_and_applies_balance() {
        let mut state = populated_state();
        let projected = state.monthly_balance();
        let opening = state.balance();

        let mut engine = FinanceEngine::new(&FinanceConfig::default());
        let report = engine.process_month(&mut state);

        assert_eq!(report.balance, report.income - report.expense);
        assert_eq!(report.balance, projected);
        assert_eq!(report.running_total, opening + projected);
        assert_eq!(state.balance(), report.running_total);
        assert_eq!(
            report.income,
            report.tuition_income + report.subsidy_income
        );
        assert_eq!(
            report.expense,
            report.salary_cost
                + report.capacity_maintenance
                + report.facility_maintenance
                + report.material_cost
                + report.fixed_cost
        );
        assert_eq!(report.salary_cost, 1_600_000);
        assert_eq!(engine.latest(), Some(&report));
    }

    #[test]
    fn history_never_exceeds_configured_length() {
        let mut state = populated_state();
        let mut engine = FinanceEngine::new(&FinanceConfig::default());
        for _ in 0..30 {
            engine.process_month(&mut state);
        }
        assert_eq!(engine.history().len(), 24);
    }

    #[test]
    fn average_balance_over_recent_window() {
        let mut engine = FinanceEngine::new(&FinanceConfig::default());
        assert!(engine.average_balance(DEFAULT_AVERAGE_WINDOW).abs() < f64::EPSILON);

        for b in [100, 200, 300, 400] {
            engine.history.push(report(b));
        }
        assert!((engine.average_balance(2) - 350.0).abs() < 1e-9);
        assert!((engine.average_balance(DEFAULT_AVERAGE_WINDOW) - 250.0).abs() < 1e-9);
        assert!(engine.average_balance(0).abs() < f64::EPSILON);
    }
}
