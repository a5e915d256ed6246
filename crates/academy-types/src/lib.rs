//! Shared type definitions for the Academy institution simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the presentation layer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for staff, members, and facilities
//! - [`enums`] -- Subjects and session status
//! - [`structs`] -- Entities, report value objects, and the institution snapshot

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{SessionStatus, Subject};
pub use ids::{FacilityId, MemberId, StaffId};
pub use structs::{
    AdvancementReport, EnrollmentReport, Facility, INITIAL_MEMBER_SATISFACTION,
    INITIAL_STAFF_MORALE, InstitutionSnapshot, Member, MonthlyReport, SimDate, StaffMember,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for presentation-facing types.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::StaffId::export_all();
        let _ = crate::ids::MemberId::export_all();
        let _ = crate::ids::FacilityId::export_all();

        // Enums
        let _ = crate::enums::Subject::export_all();
        let _ = crate::enums::SessionStatus::export_all();

        // Structs
        let _ = crate::structs::SimDate::export_all();
        let _ = crate::structs::StaffMember::export_all();
        let _ = crate::structs::Member::export_all();
        let _ = crate::structs::Facility::export_all();
        let _ = crate::structs::MonthlyReport::export_all();
        let _ = crate::structs::EnrollmentReport::export_all();
        let _ = crate::structs::AdvancementReport::export_all();
        let _ = crate::structs::InstitutionSnapshot::export_all();
    }
}
