//! Integration tests for full sessions.
//!
//! Each test drives a [`Session`] through whole months with `step(30.0)`
//! (one default-length month per call at speed 1) and checks properties
//! that only hold across the composed pipeline: determinism, bounded
//! metrics, settlement identities, and designated-month passes.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::path::Path;

use academy_core::config::SimulationConfig;
use academy_core::session::{MonthSummary, Session};
use academy_core::ActionError;
use academy_types::{INITIAL_STAFF_MORALE, SessionStatus, StaffId, StaffMember, Subject};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const EPS: f64 = 1e-9;

fn run_months(session: &mut Session, months: usize) -> Vec<MonthSummary> {
    let mut summaries = Vec::with_capacity(months);
    while summaries.len() < months && !session.status().is_terminal() {
        if let Some(summary) = session.step(30.0).unwrap() {
            summaries.push(summary);
        }
    }
    summaries
}

fn in_percent_range(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

#[test]
fn same_seed_produces_identical_history() {
    let config = SimulationConfig::default();
    let mut a = Session::new(&config).unwrap();
    let mut b = Session::new(&config).unwrap();

    let history_a = run_months(&mut a, 14);
    let history_b = run_months(&mut b, 14);

    assert_eq!(history_a, history_b);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn different_seeds_diverge() {
    let mut config = SimulationConfig::default();
    let mut a = Session::new(&config).unwrap();
    config.world.seed = 7;
    let mut b = Session::new(&config).unwrap();

    run_months(&mut a, 3);
    run_months(&mut b, 3);
    assert_ne!(a.snapshot(), b.snapshot());
}

#[test]
fn metrics_stay_in_range_over_long_run() {
    let mut config = SimulationConfig::default();
    config.institution.initial_balance = 500_000_000;
    let mut session = Session::new(&config).unwrap();

    for month in 0..60 {
        if month % 5 == 0 {
            let _ = session.run_promotion_campaign("television");
        }
        if month % 7 == 0 {
            let _ = session.hire_candidate(0);
            session.refresh_candidates();
        }
        if month % 11 == 0 {
            let _ = session.fire_latest_staff();
        }
        let Some(summary) = run_months(&mut session, 1).pop() else {
            break;
        };

        let state = session.state();
        assert!(in_percent_range(state.education_quality()));
        assert!(in_percent_range(state.satisfaction()));
        assert!(in_percent_range(state.reputation()));
        assert!(in_percent_range(state.promotion_effect()));
        assert!(in_percent_range(summary.reputation));
        assert!(state.member_count() <= usize::try_from(state.capacity()).unwrap());
    }
}

#[test]
fn settled_reports_balance_and_history_is_bounded() {
    let mut session = Session::new(&SimulationConfig::default()).unwrap();
    let summaries = run_months(&mut session, 30);

    for summary in &summaries {
        let r = &summary.report;
        assert_eq!(r.balance, r.income - r.expense);
        assert_eq!(r.income, r.tuition_income + r.subsidy_income);
        assert_eq!(
            r.expense,
            r.salary_cost + r.capacity_maintenance + r.facility_maintenance + r.material_cost + r.fixed_cost
        );
    }
    for pair in summaries.windows(2) {
        assert_eq!(
            pair[1].report.running_total,
            pair[0].report.running_total + pair[1].report.balance
        );
    }

    let history = session.finance().history();
    assert!(history.len() <= 24);
    if summaries.len() == 30 {
        assert_eq!(history.len(), 24);
        // Oldest six were evicted.
        let first_kept = history.iter().next().unwrap();
        assert_eq!(first_kept, &summaries[6].report);
    }
    assert_eq!(session.latest_report(), history.latest());
}

#[test]
fn settlement_sees_post_attrition_membership() {
    // Starting in April, the next month (May) has no annual pass, so the
    // member count after the step is exactly what settlement billed.
    let mut session = Session::new(&SimulationConfig::default()).unwrap();
    let summary = run_months(&mut session, 1).pop().unwrap();
    assert_eq!(summary.date.month, 5);

    let members = i64::try_from(session.state().member_count()).unwrap();
    assert_eq!(summary.report.material_cost, members * 3_000);
    assert_eq!(summary.enrollment.new_members, 0);
    assert_eq!(summary.enrollment.graduates, 0);
}

#[test]
fn attrition_blends_toward_post_progression_satisfaction() {
    let mut config = SimulationConfig::default();
    config.institution.initial_staff = 0;
    config.institution.initial_members = 10;
    let mut session = Session::new(&config).unwrap();

    // One month short of a skill point: progression raises skill 50 -> 51
    // before attrition reads satisfaction.
    let mut rng = SmallRng::seed_from_u64(11);
    session
        .hire_staff(StaffMember {
            id: StaffId::from_rng(&mut rng),
            name: "Mori Kenta".to_owned(),
            skill: 50,
            salary: 300_000,
            subject: Subject::Science,
            tenure_months: 11,
            morale: INITIAL_STAFF_MORALE,
        })
        .unwrap();
    let before = session.state().satisfaction();

    let summary = run_months(&mut session, 1).pop().unwrap();
    assert_eq!(summary.skill_ups, 1);
    assert_eq!(session.state().staff()[0].skill, 51);

    // Ten or fewer members keep the staffing ratio at its cap, so dropouts
    // do not move satisfaction after attrition.
    let after = session.state().satisfaction();
    assert!((after - before).abs() > 0.1);

    let blended_after = 50.0 * 0.8 + after * 0.2;
    let blended_before = 50.0 * 0.8 + before * 0.2;
    for member in session.state().members() {
        assert!((member.individual_satisfaction - blended_after).abs() < EPS);
        assert!((member.individual_satisfaction - blended_before).abs() > EPS);
    }
}

#[test]
fn default_config_offers_campaigns_and_facilities() {
    let mut session = Session::new(&SimulationConfig::default()).unwrap();
    let balance = session.state().balance();

    session.run_promotion_campaign("poster").unwrap();
    assert!((session.state().promotion_effect() - 5.0).abs() < EPS);
    session.add_facility("classroom", 0, 0).unwrap();
    assert_eq!(session.state().balance(), balance - 100_000 - 5_000_000);
}

#[test]
fn graduation_then_admission_in_designated_months() {
    let mut config = SimulationConfig::default();
    config.calendar.start_month = 2;
    let mut session = Session::new(&config).unwrap();
    let before: usize = session
        .state()
        .members()
        .iter()
        .filter(|m| m.grade == 6)
        .count();
    assert!(before > 0);

    let march = run_months(&mut session, 1).pop().unwrap();
    assert_eq!(march.date.month, 3);
    assert!(session.clock().is_graduation_month());
    let graduates = usize::try_from(march.enrollment.graduates).unwrap();
    let dropouts = usize::try_from(march.enrollment.dropouts).unwrap();
    assert!(graduates >= before.saturating_sub(dropouts));
    assert!(march.enrollment.advanced > 0);
    assert_eq!(march.enrollment.new_members, 0);
    assert!(session.state().members().iter().all(|m| m.grade >= 2));

    let april = run_months(&mut session, 1).pop().unwrap();
    assert_eq!(april.date.month, 4);
    assert!(april.enrollment.new_members > 0);
    assert_eq!(april.enrollment.graduates, 0);
    let freshmen = session.state().members().iter().filter(|m| m.grade == 1).count();
    assert_eq!(freshmen, usize::try_from(april.enrollment.new_members).unwrap());
}

#[test]
fn admission_never_exceeds_free_seats() {
    let mut config = SimulationConfig::default();
    config.calendar.start_month = 3;
    config.institution.initial_capacity = 210;
    config.institution.initial_members = 200;
    let mut session = Session::new(&config).unwrap();

    let april = run_months(&mut session, 1).pop().unwrap();
    assert_eq!(april.date.month, 4);
    assert!(session.state().member_count() <= 210);
    assert!(april.enrollment.new_members <= 10 + april.enrollment.dropouts);
}

#[test]
fn unknown_campaign_is_a_no_op() {
    let mut session = Session::new(&SimulationConfig::default()).unwrap();
    let balance = session.state().balance();
    let effect = session.state().promotion_effect();

    let result = session.run_promotion_campaign("unknown");
    assert!(matches!(result, Err(ActionError::UnknownPromotion { .. })));
    assert_eq!(session.state().balance(), balance);
    assert!((session.state().promotion_effect() - effect).abs() < EPS);
}

#[test]
fn stubbed_facility_catalog_contributes_nothing() {
    let mut config = SimulationConfig::default();
    config.facilities.clear();
    let mut session = Session::new(&config).unwrap();

    let result = session.add_facility("classroom", 0, 0);
    assert!(matches!(result, Err(ActionError::UnknownFacility { .. })));

    let summary = run_months(&mut session, 1).pop().unwrap();
    assert_eq!(summary.report.facility_maintenance, 0);
}

#[test]
fn facilities_raise_capacity_and_cost_maintenance() {
    let mut session = Session::new(&SimulationConfig::default()).unwrap();
    let capacity = session.state().capacity();
    let balance = session.state().balance();

    session.add_facility("classroom", 0, 0).unwrap();
    session.add_facility("library", 2, 0).unwrap();
    assert_eq!(session.state().capacity(), capacity + 40);
    assert_eq!(session.state().balance(), balance - 15_000_000);

    let summary = run_months(&mut session, 1).pop().unwrap();
    assert_eq!(summary.report.facility_maintenance, 150_000);
}

#[test]
fn paused_session_does_not_settle() {
    let mut session = Session::new(&SimulationConfig::default()).unwrap();
    session.toggle_pause();
    for _ in 0..10 {
        assert!(session.step(30.0).unwrap().is_none());
    }
    assert!(session.latest_report().is_none());

    session.toggle_pause();
    session.set_speed(10.0);
    assert!(session.step(3.0).unwrap().is_some());
}

#[test]
fn running_out_of_money_ends_the_session() {
    let mut config = SimulationConfig::default();
    config.institution.initial_balance = 100_000;
    config.finance.fixed_monthly_cost = 50_000_000;
    let mut session = Session::new(&config).unwrap();

    let summaries = run_months(&mut session, 12);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].status, SessionStatus::Bankrupt);
    assert!(session.state().is_insolvent());
    assert_eq!(session.admit_member(), Err(ActionError::SessionEnded));
}

#[test]
fn project_config_builds_a_session() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("academy-config.yaml");
    let config = SimulationConfig::from_file(&path).unwrap();
    let session = Session::new(&config).unwrap();
    assert_eq!(session.state().staff_count(), 10);
    assert_eq!(session.state().member_count(), 200);
}
