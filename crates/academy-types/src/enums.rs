//! Enumeration types for the Academy simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Subject
// ---------------------------------------------------------------------------

/// The teaching subject a staff member is responsible for.
///
/// Subjects are descriptive only: no formula in the engine reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// National language and literature.
    Language,
    /// Mathematics.
    Mathematics,
    /// English as a foreign language.
    English,
    /// Natural sciences.
    Science,
    /// History, geography and civics.
    SocialStudies,
    /// Physical education.
    PhysicalEducation,
    /// Music.
    Music,
    /// Fine arts.
    Art,
    /// Technology and home economics.
    TechnologyHomeEconomics,
    /// Information technology.
    Information,
}

impl Subject {
    /// Every subject, in catalog order. Candidate generation picks uniformly
    /// from this list.
    pub const ALL: [Self; 10] = [
        Self::Language,
        Self::Mathematics,
        Self::English,
        Self::Science,
        Self::SocialStudies,
        Self::PhysicalEducation,
        Self::Music,
        Self::Art,
        Self::TechnologyHomeEconomics,
        Self::Information,
    ];

    /// Human-readable subject name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Language => "Language",
            Self::Mathematics => "Mathematics",
            Self::English => "English",
            Self::Science => "Science",
            Self::SocialStudies => "Social Studies",
            Self::PhysicalEducation => "Physical Education",
            Self::Music => "Music",
            Self::Art => "Art",
            Self::TechnologyHomeEconomics => "Technology & Home Economics",
            Self::Information => "Information",
        }
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a simulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The clock is being driven and monthly settlement runs normally.
    Running,
    /// The balance fell to or below the insolvency threshold. Terminal.
    Bankrupt,
}

impl SessionStatus {
    /// Whether the session has reached a terminal state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Bankrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_catalog_is_complete_and_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for subject in Subject::ALL {
            assert!(seen.insert(subject));
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn subject_serializes_snake_case() {
        let json = serde_json::to_string(&Subject::SocialStudies).ok();
        assert_eq!(json.as_deref(), Some("\"social_studies\""));
    }

    #[test]
    fn only_bankrupt_is_terminal() {
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Bankrupt.is_terminal());
    }
}
