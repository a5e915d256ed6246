//! The institution aggregate root.
//!
//! [`InstitutionState`] is the single owner of all mutable simulation data:
//! balance, reputation, capacity, promotion effect, staff, members, and
//! facilities. The engines mutate it exclusively through the methods here.
//!
//! # Derived metrics
//!
//! Education quality and satisfaction are expensive enough to be worth
//! memoizing and are read many times per month. Each is computed on first
//! read and cached. Every mutator that touches one of their inputs (staff,
//! members, capacity, facilities, reputation, promotion effect) clears both
//! caches before returning, so a read never observes a stale value.
//!
//! Monthly income and expense projections are *not* cached. They share one
//! itemized computation with the finance engine, so a projection taken just
//! before settlement matches the settled report exactly.

use std::cell::Cell;

use academy_types::{
    Facility, FacilityId, InstitutionSnapshot, Member, MemberId, StaffId, StaffMember,
};
use rand::Rng;
use tracing::debug;

use crate::config::{FinanceConfig, MetricsConfig, SimulationConfig};
use crate::error::ActionError;
use crate::facility::FacilityCatalog;

/// Clamp a percentage-like quantity to `[0, 100]`. `NaN` maps to 0.
pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Convert a collection length to `f64` without a lossy cast.
pub(crate) fn count_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Truncate a fractional monetary amount toward zero.
///
/// This is the only place fractional money becomes whole currency.
/// Non-finite values become 0; out-of-range values saturate.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn to_currency(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Constants the institution's derived values depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionRules {
    /// Education and satisfaction formula constants.
    pub metrics: MetricsConfig,
    /// Income and expense rates.
    pub finance: FinanceConfig,
    /// Facility kinds and their contributions.
    pub facilities: FacilityCatalog,
    /// Balance at or below which the institution is insolvent.
    pub insolvency_threshold: i64,
}

impl InstitutionRules {
    /// Extract the rules from a full simulation configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            metrics: config.metrics.clone(),
            finance: config.finance.clone(),
            facilities: FacilityCatalog::new(config.facilities.clone()),
            insolvency_threshold: config.institution.insolvency_threshold,
        }
    }
}

// ---------------------------------------------------------------------------
// MonthlyBreakdown
// ---------------------------------------------------------------------------

/// Itemized income and expense for one month at the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyBreakdown {
    /// Tuition collected from members.
    pub tuition_income: i64,
    /// Education-scaled subsidy.
    pub subsidy_income: i64,
    /// Sum of staff salaries.
    pub salary_cost: i64,
    /// Capacity-proportional maintenance.
    pub capacity_maintenance: i64,
    /// Per-facility maintenance.
    pub facility_maintenance: i64,
    /// Per-member material cost.
    pub material_cost: i64,
    /// Fixed overhead.
    pub fixed_cost: i64,
}

impl MonthlyBreakdown {
    /// Total income.
    pub const fn income(&self) -> i64 {
        self.tuition_income.saturating_add(self.subsidy_income)
    }

    /// Total expense.
    pub const fn expense(&self) -> i64 {
        self.salary_cost
            .saturating_add(self.capacity_maintenance)
            .saturating_add(self.facility_maintenance)
            .saturating_add(self.material_cost)
            .saturating_add(self.fixed_cost)
    }

    /// Income minus expense.
    pub const fn balance(&self) -> i64 {
        self.income().saturating_sub(self.expense())
    }
}

// ---------------------------------------------------------------------------
// InstitutionState
// ---------------------------------------------------------------------------

/// The institution: single owner of all mutable simulation data.
#[derive(Debug, Clone)]
pub struct InstitutionState {
    name: String,
    balance: i64,
    reputation: f64,
    capacity: u32,
    promotion_effect: f64,

    /// Staff in hiring order.
    staff: Vec<StaffMember>,
    /// Members in enrollment order.
    members: Vec<Member>,
    /// Facilities in construction order.
    facilities: Vec<Facility>,

    rules: InstitutionRules,

    education_cache: Cell<Option<f64>>,
    satisfaction_cache: Cell<Option<f64>>,
}

impl InstitutionState {
    /// Create an institution with no staff, members, or facilities, using
    /// the configured opening balance, reputation, and capacity.
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_rules(
            config.institution.name.clone(),
            config.institution.initial_balance,
            config.institution.initial_reputation,
            config.institution.initial_capacity,
            InstitutionRules::from_config(config),
        )
    }

    /// Create an empty institution from explicit parts.
    pub fn with_rules(
        name: String,
        balance: i64,
        reputation: f64,
        capacity: u32,
        rules: InstitutionRules,
    ) -> Self {
        Self {
            name,
            balance,
            reputation: clamp_percent(reputation),
            capacity,
            promotion_effect: 0.0,
            staff: Vec::new(),
            members: Vec::new(),
            facilities: Vec::new(),
            rules,
            education_cache: Cell::new(None),
            satisfaction_cache: Cell::new(None),
        }
    }

    /// Drop both memoized metrics. The next read recomputes them.
    pub fn invalidate_caches(&self) {
        self.education_cache.set(None);
        self.satisfaction_cache.set(None);
    }

    // -- Accessors ----------------------------------------------------------

    /// Institution name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance. May be negative.
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    /// Current reputation, `0..=100`.
    pub const fn reputation(&self) -> f64 {
        self.reputation
    }

    /// Member capacity.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Current promotion effect, `0..=100`.
    pub const fn promotion_effect(&self) -> f64 {
        self.promotion_effect
    }

    /// Staff in hiring order.
    pub fn staff(&self) -> &[StaffMember] {
        &self.staff
    }

    /// Members in enrollment order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Facilities in construction order.
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// Number of staff.
    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Seats left before capacity is reached.
    pub fn remaining_capacity(&self) -> u32 {
        let enrolled = u32::try_from(self.members.len()).unwrap_or(u32::MAX);
        self.capacity.saturating_sub(enrolled)
    }

    /// The constants this institution is evaluated against.
    pub const fn rules(&self) -> &InstitutionRules {
        &self.rules
    }

    // -- Derived metrics ----------------------------------------------------

    /// Education quality, `0..=100`. Memoized until the next invalidation.
    pub fn education_quality(&self) -> f64 {
        if let Some(cached) = self.education_cache.get() {
            return cached;
        }
        let value = self.compute_education_quality();
        self.education_cache.set(Some(value));
        value
    }

    /// Satisfaction, `0..=100`. Memoized until the next invalidation.
    pub fn satisfaction(&self) -> f64 {
        if let Some(cached) = self.satisfaction_cache.get() {
            return cached;
        }
        let value = self.compute_satisfaction();
        self.satisfaction_cache.set(Some(value));
        value
    }

    fn compute_education_quality(&self) -> f64 {
        let m = &self.rules.metrics;
        if self.staff.is_empty() {
            return clamp_percent(m.no_staff_education);
        }

        let staff_count = count_f64(self.staff.len());
        let skill_total: f64 = self.staff.iter().map(|s| f64::from(s.skill)).sum();
        let skill_avg = skill_total / staff_count;

        let members = count_f64(self.members.len().max(1));
        let ratio = (staff_count / members * m.optimal_member_ratio).min(m.ratio_cap);

        let facility_bonus = self.rules.facilities.education_bonus(&self.facilities);
        clamp_percent(
            skill_avg * ratio * m.education_staff_weight
                + facility_bonus * m.education_facility_weight,
        )
    }

    fn compute_satisfaction(&self) -> f64 {
        let m = &self.rules.metrics;
        let education = self.education_quality();
        let facility_bonus = self.rules.facilities.satisfaction_bonus(&self.facilities);

        let weighted = education * m.satisfaction_education_weight
            + facility_bonus * m.satisfaction_facility_weight;
        clamp_percent(weighted * self.density_factor() + m.satisfaction_base)
    }

    /// Occupancy density, `members / max(capacity, 1)`.
    pub fn density(&self) -> f64 {
        count_f64(self.members.len()) / f64::from(self.capacity.max(1))
    }

    /// Crowding multiplier applied to satisfaction.
    ///
    /// 1.0 up to the low threshold, linear decay up to the high threshold,
    /// then a steeper decay floored at `density_floor`.
    pub fn density_factor(&self) -> f64 {
        let m = &self.rules.metrics;
        let density = self.density();
        if density <= m.density_low {
            1.0
        } else if density <= m.density_high {
            1.0 - (density - m.density_low) * m.density_mid_slope
        } else {
            (m.density_high_base - (density - m.density_high) * m.density_high_slope)
                .max(m.density_floor)
        }
    }

    /// Members per staff member, or `None` with no staff.
    pub fn staff_member_ratio(&self) -> Option<f64> {
        if self.staff.is_empty() {
            return None;
        }
        Some(count_f64(self.members.len()) / count_f64(self.staff.len()))
    }

    /// Whether members per staff exceeds 1.5 times the optimal ratio.
    ///
    /// An institution with members but no staff is understaffed.
    pub fn is_understaffed(&self) -> bool {
        self.staff_member_ratio().map_or(!self.members.is_empty(), |ratio| {
            ratio > self.rules.metrics.optimal_member_ratio * 1.5
        })
    }

    // -- Financial projections ----------------------------------------------

    /// Itemized income and expense if the month were settled now.
    pub fn monthly_breakdown(&self) -> MonthlyBreakdown {
        let f = &self.rules.finance;
        let members = count_f64(self.members.len());
        let member_count = i64::from(u32::try_from(self.members.len()).unwrap_or(u32::MAX));

        let tuition = members * f.base_tuition * (1.0 + f.reputation_bonus_rate * self.reputation / 100.0);
        let subsidy = members * f.subsidy_per_member * self.education_quality() / 100.0;

        MonthlyBreakdown {
            tuition_income: to_currency(tuition),
            subsidy_income: to_currency(subsidy),
            salary_cost: self
                .staff
                .iter()
                .fold(0_i64, |acc, s| acc.saturating_add(s.salary)),
            capacity_maintenance: i64::from(self.capacity).saturating_mul(f.capacity_maintenance_rate),
            facility_maintenance: self.rules.facilities.maintenance(&self.facilities),
            material_cost: member_count.saturating_mul(f.material_cost_per_member),
            fixed_cost: f.fixed_monthly_cost,
        }
    }

    /// Projected monthly income at the current state.
    pub fn monthly_income(&self) -> i64 {
        self.monthly_breakdown().income()
    }

    /// Projected monthly expense at the current state.
    pub fn monthly_expense(&self) -> i64 {
        self.monthly_breakdown().expense()
    }

    /// Projected monthly income minus expense.
    pub fn monthly_balance(&self) -> i64 {
        self.monthly_breakdown().balance()
    }

    // -- Money ----------------------------------------------------------------

    /// Whether the balance covers `amount`.
    pub const fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Deduct `amount` if affordable.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidAmount`] for a negative amount, or
    /// [`ActionError::Unaffordable`] if the balance does not cover it.
    pub fn spend(&mut self, amount: i64) -> Result<(), ActionError> {
        if amount < 0 {
            return Err(ActionError::InvalidAmount { amount });
        }
        if !self.can_afford(amount) {
            return Err(ActionError::Unaffordable {
                cost: amount,
                balance: self.balance,
            });
        }
        self.balance = self.balance.saturating_sub(amount);
        Ok(())
    }

    /// Add `amount` to the balance.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::InvalidAmount`] for a negative amount.
    pub fn receive(&mut self, amount: i64) -> Result<(), ActionError> {
        if amount < 0 {
            return Err(ActionError::InvalidAmount { amount });
        }
        self.balance = self.balance.saturating_add(amount);
        Ok(())
    }

    /// Apply a settled monthly balance. Unlike [`Self::spend`], this may
    /// take the balance below zero.
    pub const fn apply_settlement(&mut self, delta: i64) {
        self.balance = self.balance.saturating_add(delta);
    }

    /// Whether the balance is at or below the insolvency threshold.
    pub const fn is_insolvent(&self) -> bool {
        self.balance <= self.rules.insolvency_threshold
    }

    // -- Scalar mutators ------------------------------------------------------

    /// Set reputation, clamped to `[0, 100]`.
    pub fn set_reputation(&mut self, value: f64) {
        self.reputation = clamp_percent(value);
        self.invalidate_caches();
    }

    /// Set the promotion effect, clamped to `[0, 100]`.
    pub fn set_promotion_effect(&mut self, value: f64) {
        self.promotion_effect = clamp_percent(value);
        self.invalidate_caches();
    }

    // -- Staff ----------------------------------------------------------------

    /// Add a staff member. Hiring carries no upfront cost.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::DuplicateStaff`] if the ID is already employed.
    pub fn hire_staff(&mut self, staff: StaffMember) -> Result<(), ActionError> {
        if self.staff.iter().any(|s| s.id == staff.id) {
            return Err(ActionError::DuplicateStaff { id: staff.id });
        }
        debug!(staff_id = %staff.id, name = %staff.name, skill = staff.skill, "Staff hired");
        self.staff.push(staff);
        self.invalidate_caches();
        Ok(())
    }

    /// Remove the staff member with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownStaff`] if no such staff is employed.
    pub fn fire_staff(&mut self, id: StaffId) -> Result<StaffMember, ActionError> {
        let pos = self
            .staff
            .iter()
            .position(|s| s.id == id)
            .ok_or(ActionError::UnknownStaff { id })?;
        let removed = self.staff.remove(pos);
        debug!(staff_id = %removed.id, "Staff dismissed");
        self.invalidate_caches();
        Ok(removed)
    }

    /// Remove the most recently hired staff member.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoStaff`] if there is no staff.
    pub fn fire_latest_staff(&mut self) -> Result<StaffMember, ActionError> {
        let removed = self.staff.pop().ok_or(ActionError::NoStaff)?;
        debug!(staff_id = %removed.id, "Staff dismissed");
        self.invalidate_caches();
        Ok(removed)
    }

    /// Apply `f` to every staff member, then invalidate the caches.
    pub fn update_staff<F: FnMut(&mut StaffMember)>(&mut self, f: F) {
        self.staff.iter_mut().for_each(f);
        self.invalidate_caches();
    }

    // -- Members --------------------------------------------------------------

    /// Enroll a member.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::AtCapacity`] once the institution is full, or
    /// [`ActionError::DuplicateMember`] if the ID is already enrolled.
    pub fn admit_member(&mut self, member: Member) -> Result<(), ActionError> {
        if self.remaining_capacity() == 0 {
            return Err(ActionError::AtCapacity {
                capacity: self.capacity,
            });
        }
        if self.members.iter().any(|m| m.id == member.id) {
            return Err(ActionError::DuplicateMember { id: member.id });
        }
        self.members.push(member);
        self.invalidate_caches();
        Ok(())
    }

    /// Remove the member with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownMember`] if no such member is enrolled.
    pub fn remove_member(&mut self, id: MemberId) -> Result<Member, ActionError> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(ActionError::UnknownMember { id })?;
        let removed = self.members.remove(pos);
        self.invalidate_caches();
        Ok(removed)
    }

    /// Apply `f` to the member with the given ID, then invalidate the
    /// caches. Returns `false` if no such member is enrolled.
    pub fn update_member<F: FnOnce(&mut Member)>(&mut self, id: MemberId, f: F) -> bool {
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        f(member);
        self.invalidate_caches();
        true
    }

    /// Visit every member once in enrollment order, keeping those for which
    /// `f` returns `true` and removing the rest. `f` may mutate the member
    /// it keeps. Returns the number removed.
    ///
    /// Removal happens in the same pass, so passes that drop members never
    /// observe a collection shrinking under them. The caches are cleared
    /// once at the end.
    pub fn retain_members<F: FnMut(&mut Member) -> bool>(&mut self, f: F) -> u32 {
        let before = self.members.len();
        self.members.retain_mut(f);
        let removed = before.saturating_sub(self.members.len());
        self.invalidate_caches();
        u32::try_from(removed).unwrap_or(u32::MAX)
    }

    // -- Facilities -----------------------------------------------------------

    /// Build a facility of the given kind at a grid position.
    ///
    /// Spends the catalog cost and raises capacity by the kind's capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UnknownFacility`] if the kind is not in the
    /// catalog, or [`ActionError::Unaffordable`] if the cost is not covered.
    pub fn add_facility(
        &mut self,
        kind: &str,
        grid_x: i32,
        grid_y: i32,
        rng: &mut impl Rng,
    ) -> Result<FacilityId, ActionError> {
        let spec = self
            .rules
            .facilities
            .get(kind)
            .ok_or_else(|| ActionError::UnknownFacility {
                kind: kind.to_owned(),
            })?;
        let (cost, added_capacity) = (spec.cost, spec.capacity);

        self.spend(cost)?;

        let id = FacilityId::from_rng(rng);
        self.facilities.push(Facility {
            id,
            kind: kind.to_owned(),
            grid_x,
            grid_y,
        });
        self.capacity = self.capacity.saturating_add(added_capacity);
        self.invalidate_caches();

        debug!(facility_id = %id, kind, grid_x, grid_y, cost, "Facility built");
        Ok(id)
    }

    // -- Snapshot -------------------------------------------------------------

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self) -> InstitutionSnapshot {
        let breakdown = self.monthly_breakdown();
        InstitutionSnapshot {
            name: self.name.clone(),
            balance: self.balance,
            reputation: self.reputation,
            education_quality: self.education_quality(),
            satisfaction: self.satisfaction(),
            promotion_effect: self.promotion_effect,
            capacity: self.capacity,
            staff_count: u32::try_from(self.staff.len()).unwrap_or(u32::MAX),
            member_count: u32::try_from(self.members.len()).unwrap_or(u32::MAX),
            monthly_income: breakdown.income(),
            monthly_expense: breakdown.expense(),
            staff: self.staff.clone(),
            members: self.members.clone(),
            facilities: self.facilities.clone(),
        }
    }
}
