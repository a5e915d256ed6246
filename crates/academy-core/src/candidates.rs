//! Randomized staff candidate generation.
//!
//! Skill is drawn from a tiered distribution: a uniform sample is walked
//! against the tiers' cumulative probability and the first matching tier
//! supplies an inclusive skill range. If the tiers' mass runs out before a
//! match (rounding, or a table that does not sum to 1) a fallback range is
//! used. Salary rises linearly with skill, with uniform jitter, and is
//! clamped to the configured bounds.

use academy_types::{INITIAL_STAFF_MORALE, StaffId, StaffMember, Subject};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::StaffingConfig;
use crate::state::to_currency;

/// Surnames for generated staff.
const SURNAMES: &[&str] = &[
    "Sato", "Suzuki", "Takahashi", "Tanaka", "Ito", "Watanabe", "Yamamoto",
    "Nakamura", "Kobayashi", "Kato", "Yoshida", "Yamada", "Sasaki", "Yamaguchi",
    "Matsumoto", "Inoue", "Kimura", "Hayashi", "Saito", "Shimizu", "Yamazaki",
    "Mori", "Ikeda", "Hashimoto", "Abe", "Ishikawa", "Yamashita", "Nakajima",
    "Ishii", "Ogawa", "Maeda", "Okada", "Hasegawa", "Fujita", "Goto", "Kondo",
    "Murakami", "Endo", "Aoki", "Sakamoto",
];

/// Given names for generated staff.
const GIVEN_NAMES: &[&str] = &[
    "Taro", "Ichiro", "Kenta", "Shota", "Daisuke", "Takuya", "Tatsuya", "Kazuya",
    "Naoki", "Makoto", "Hanako", "Misaki", "Sakura", "Yoko", "Yuko", "Keiko",
    "Mari", "Yumi", "Akemi", "Tomoko",
];

/// Produces unhired staff candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateGenerator {
    config: StaffingConfig,
}

impl CandidateGenerator {
    /// Create a generator from staffing configuration.
    pub fn new(config: &StaffingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate `count` candidates.
    pub fn generate(&self, count: u32, rng: &mut impl Rng) -> Vec<StaffMember> {
        (0..count).map(|_| self.generate_one(rng)).collect()
    }

    /// Generate a single candidate.
    pub fn generate_one(&self, rng: &mut impl Rng) -> StaffMember {
        let skill = self.draw_skill(rng);
        let salary = self.draw_salary(skill, rng);
        let name = draw_name(rng);
        let subject = Subject::ALL.choose(rng).copied().unwrap_or(Subject::Language);

        StaffMember {
            id: StaffId::from_rng(rng),
            name,
            skill,
            salary,
            subject,
            tenure_months: 0,
            morale: INITIAL_STAFF_MORALE,
        }
    }

    /// Draw a skill from the tiered distribution.
    pub fn draw_skill(&self, rng: &mut impl Rng) -> u32 {
        let sample: f64 = rng.random();
        let mut cumulative = 0.0;
        for tier in &self.config.skill_tiers {
            cumulative += tier.probability;
            if sample < cumulative {
                return random_inclusive(rng, tier.min, tier.max);
            }
        }
        random_inclusive(
            rng,
            self.config.fallback_skill_min,
            self.config.fallback_skill_max,
        )
    }

    /// Salary for a candidate of the given skill, jittered and clamped.
    pub fn draw_salary(&self, skill: u32, rng: &mut impl Rng) -> i64 {
        let c = &self.config;
        let jitter = if c.salary_jitter > 0 {
            rng.random_range(c.salary_jitter.saturating_neg()..=c.salary_jitter)
        } else {
            0
        };
        let span = c.salary_max.saturating_sub(c.salary_base);
        #[allow(clippy::cast_precision_loss)]
        let skill_bonus = f64::from(skill) / 100.0 * span as f64;
        let raw = c
            .salary_base
            .saturating_add(to_currency(skill_bonus))
            .saturating_add(jitter);
        raw.clamp(c.salary_min, c.salary_max)
    }
}

/// Uniform integer in `[a, b]`, tolerating reversed bounds.
pub(crate) fn random_inclusive(rng: &mut impl Rng, a: u32, b: u32) -> u32 {
    rng.random_range(a.min(b)..=a.max(b))
}

/// Surname followed by given name, drawn independently.
fn draw_name(rng: &mut impl Rng) -> String {
    let surname = SURNAMES.choose(rng).copied().unwrap_or("Sato");
    let given = GIVEN_NAMES.choose(rng).copied().unwrap_or("Taro");
    format!("{surname} {given}")
}
