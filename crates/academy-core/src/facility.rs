//! Facility catalog lookups.
//!
//! Facilities contribute three optional terms: an education bonus, a
//! satisfaction bonus, and monthly maintenance. Each term is the sum over
//! every built facility of its catalog value. An empty catalog (or a
//! catalog whose values are all zero) switches the terms off without any
//! branching in the metric or finance formulas.

use std::collections::BTreeMap;

use academy_types::Facility;

use crate::config::FacilitySpec;

/// Read-only catalog of buildable facility kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityCatalog {
    specs: BTreeMap<String, FacilitySpec>,
}

impl FacilityCatalog {
    /// Build a catalog from configured specs keyed by kind.
    pub const fn new(specs: BTreeMap<String, FacilitySpec>) -> Self {
        Self { specs }
    }

    /// Look up a facility kind.
    pub fn get(&self, kind: &str) -> Option<&FacilitySpec> {
        self.specs.get(kind)
    }

    /// Whether no facility kinds are configured.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Iterate over `(kind, spec)` pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FacilitySpec)> {
        self.specs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Summed education bonus of the given facilities.
    ///
    /// Facilities whose kind is no longer in the catalog contribute nothing.
    pub fn education_bonus(&self, facilities: &[Facility]) -> f64 {
        facilities
            .iter()
            .filter_map(|f| self.get(&f.kind))
            .map(|spec| spec.education)
            .sum()
    }

    /// Summed satisfaction bonus of the given facilities.
    pub fn satisfaction_bonus(&self, facilities: &[Facility]) -> f64 {
        facilities
            .iter()
            .filter_map(|f| self.get(&f.kind))
            .map(|spec| spec.satisfaction)
            .sum()
    }

    /// Summed monthly maintenance of the given facilities.
    pub fn maintenance(&self, facilities: &[Facility]) -> i64 {
        facilities
            .iter()
            .filter_map(|f| self.get(&f.kind))
            .fold(0_i64, |acc, spec| acc.saturating_add(spec.maintenance))
    }
}

#[cfg(test)]
mod tests {
    use academy_types::FacilityId;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn spec(education: f64, satisfaction: f64, maintenance: i64) -> FacilitySpec {
        FacilitySpec {
            name: "Test".to_owned(),
            cost: 1_000,
            capacity: 0,
            education,
            satisfaction,
            maintenance,
        }
    }

    fn built(rng: &mut SmallRng, kind: &str) -> Facility {
        Facility {
            id: FacilityId::from_rng(rng),
            kind: kind.to_owned(),
            grid_x: 0,
            grid_y: 0,
        }
    }

    #[test]
    fn sums_contributions_per_facility() {
        let mut specs = BTreeMap::new();
        specs.insert("library".to_owned(), spec(8.0, 5.0, 100));
        specs.insert("gym".to_owned(), spec(2.0, 12.0, 200));
        let catalog = FacilityCatalog::new(specs);

        let mut rng = SmallRng::seed_from_u64(42);
        let facilities = vec![
            built(&mut rng, "library"),
            built(&mut rng, "library"),
            built(&mut rng, "gym"),
        ];

        assert!((catalog.education_bonus(&facilities) - 18.0).abs() < 1e-9);
        assert!((catalog.satisfaction_bonus(&facilities) - 22.0).abs() < 1e-9);
        assert_eq!(catalog.maintenance(&facilities), 400);
    }

    #[test]
    fn empty_catalog_contributes_nothing() {
        let catalog = FacilityCatalog::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let facilities = vec![built(&mut rng, "library")];

        assert!(catalog.is_empty());
        assert!(catalog.education_bonus(&facilities).abs() < f64::EPSILON);
        assert!(catalog.satisfaction_bonus(&facilities).abs() < f64::EPSILON);
        assert_eq!(catalog.maintenance(&facilities), 0);
    }
}
