//! Core entity structs and report value objects.
//!
//! Monetary amounts are whole currency units stored as `i64`; a balance may
//! go negative. Percentage-like quantities are `f64` in `[0, 100]`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Subject;
use crate::ids::{FacilityId, MemberId, StaffId};

/// Starting individual satisfaction for a newly created member.
pub const INITIAL_MEMBER_SATISFACTION: f64 = 50.0;

/// Starting morale for a newly generated staff member.
pub const INITIAL_STAFF_MORALE: f64 = 50.0;

// ---------------------------------------------------------------------------
// SimDate
// ---------------------------------------------------------------------------

/// A point on the simulated calendar. Months and days are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimDate {
    /// Calendar year.
    pub year: i32,
    /// Month within the year, `1..=months_per_year`.
    pub month: u32,
    /// Day within the month, `1..=days_per_month`.
    pub day: u32,
}

impl SimDate {
    /// `YYYY-MM` label for the month this date falls in.
    pub fn month_label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl core::fmt::Display for SimDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ---------------------------------------------------------------------------
// StaffMember
// ---------------------------------------------------------------------------

/// An employable staff member. Candidates and hired staff share this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StaffMember {
    /// Unique identifier.
    pub id: StaffId,
    /// Display name (surname followed by given name).
    pub name: String,
    /// Teaching skill, `0..=100`.
    pub skill: u32,
    /// Monthly salary.
    pub salary: i64,
    /// Subject taught.
    pub subject: Subject,
    /// Completed months of service since hiring.
    pub tenure_months: u32,
    /// Morale, `0..=100`. Tracked but not read by any formula.
    pub morale: f64,
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// An enrolled member of the institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Member {
    /// Unique identifier.
    pub id: MemberId,
    /// Current grade, `1..=max_grade`.
    pub grade: u8,
    /// Personal satisfaction, `0..=100`, blended toward the institution's
    /// satisfaction every month.
    pub individual_satisfaction: f64,
    /// Academic aptitude drawn at creation.
    pub aptitude: u32,
    /// Months enrolled.
    pub months_enrolled: u32,
}

impl Member {
    /// Create a freshly enrolled member at the given grade.
    pub const fn new(id: MemberId, grade: u8, aptitude: u32) -> Self {
        Self {
            id,
            grade,
            individual_satisfaction: INITIAL_MEMBER_SATISFACTION,
            aptitude,
            months_enrolled: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Facility
// ---------------------------------------------------------------------------

/// A constructed facility placed on the campus grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Facility {
    /// Unique identifier.
    pub id: FacilityId,
    /// Catalog key (e.g. `"classroom"`).
    pub kind: String,
    /// Grid column of the top-left tile.
    pub grid_x: i32,
    /// Grid row of the top-left tile.
    pub grid_y: i32,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Immutable record of one monthly settlement.
///
/// `balance == income - expense` always holds, and `income`/`expense` are the
/// exact sums of their itemized components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MonthlyReport {
    /// Total income for the month.
    pub income: i64,
    /// Total expense for the month.
    pub expense: i64,
    /// `income - expense`, applied to the running balance.
    pub balance: i64,
    /// Institution balance after settlement.
    pub running_total: i64,

    /// Sum of staff salaries.
    pub salary_cost: i64,
    /// Capacity-proportional maintenance.
    pub capacity_maintenance: i64,
    /// Per-facility maintenance from the facility catalog.
    pub facility_maintenance: i64,
    /// Per-member material cost.
    pub material_cost: i64,
    /// Fixed monthly overhead.
    pub fixed_cost: i64,

    /// Tuition collected.
    pub tuition_income: i64,
    /// Education-scaled subsidy received.
    pub subsidy_income: i64,
}

/// Summary of a monthly enrollment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnrollmentReport {
    /// Members admitted.
    pub new_members: u32,
    /// Members that dropped out.
    pub dropouts: u32,
    /// Members that graduated or left after the mid grade.
    pub graduates: u32,
    /// Members advanced by one grade.
    pub advanced: u32,
}

/// Result of the annual graduation/advancement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AdvancementReport {
    /// Members removed by graduation (final grade or mid-grade exit).
    pub graduates: u32,
    /// Members advanced by one grade.
    pub advanced: u32,
}

// ---------------------------------------------------------------------------
// InstitutionSnapshot
// ---------------------------------------------------------------------------

/// Read-only view of the institution handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InstitutionSnapshot {
    /// Institution name.
    pub name: String,
    /// Current balance.
    pub balance: i64,
    /// Reputation, `0..=100`.
    pub reputation: f64,
    /// Education quality, `0..=100`.
    pub education_quality: f64,
    /// Satisfaction, `0..=100`.
    pub satisfaction: f64,
    /// Promotion effect, `0..=100`.
    pub promotion_effect: f64,
    /// Member capacity.
    pub capacity: u32,
    /// Number of staff.
    pub staff_count: u32,
    /// Number of members.
    pub member_count: u32,
    /// Projected monthly income at the current state.
    pub monthly_income: i64,
    /// Projected monthly expense at the current state.
    pub monthly_expense: i64,
    /// Staff in hiring order.
    pub staff: Vec<StaffMember>,
    /// Members in enrollment order.
    pub members: Vec<Member>,
    /// Facilities in construction order.
    pub facilities: Vec<Facility>,
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn new_member_starts_neutral() {
        let mut rng = SmallRng::seed_from_u64(5);
        let member = Member::new(MemberId::from_rng(&mut rng), 1, 55);
        assert_eq!(member.grade, 1);
        assert_eq!(member.months_enrolled, 0);
        assert!((member.individual_satisfaction - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sim_date_formats() {
        let date = SimDate {
            year: 2025,
            month: 4,
            day: 1,
        };
        assert_eq!(date.to_string(), "2025-04-01");
        assert_eq!(date.month_label(), "2025-04");
    }

    #[test]
    fn sim_dates_order_chronologically() {
        let march = SimDate {
            year: 2026,
            month: 3,
            day: 30,
        };
        let april = SimDate {
            year: 2026,
            month: 4,
            day: 1,
        };
        assert!(march < april);
    }
}
