//! Error types for player-facing actions.
//!
//! Every variant describes a rejected action. A rejected action leaves the
//! institution exactly as it was.

use academy_types::{MemberId, StaffId};

/// Errors returned when an action on the institution is infeasible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The balance does not cover the cost.
    #[error("insufficient funds: cost {cost}, balance {balance}")]
    Unaffordable {
        /// Amount required.
        cost: i64,
        /// Balance at the time of the attempt.
        balance: i64,
    },

    /// Amounts moved in or out of the balance must not be negative.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: i64,
    },

    /// Admission would exceed capacity.
    #[error("institution is at capacity ({capacity})")]
    AtCapacity {
        /// Current capacity.
        capacity: u32,
    },

    /// The promotion campaign type is not in the catalog.
    #[error("unknown promotion campaign: {kind}")]
    UnknownPromotion {
        /// The requested campaign type.
        kind: String,
    },

    /// The facility kind is not in the catalog.
    #[error("unknown facility kind: {kind}")]
    UnknownFacility {
        /// The requested facility kind.
        kind: String,
    },

    /// No staff member with this ID is employed.
    #[error("staff member not found: {id}")]
    UnknownStaff {
        /// The requested staff ID.
        id: StaffId,
    },

    /// No member with this ID is enrolled.
    #[error("member not found: {id}")]
    UnknownMember {
        /// The requested member ID.
        id: MemberId,
    },

    /// A staff member with this ID is already employed.
    #[error("staff member already employed: {id}")]
    DuplicateStaff {
        /// The duplicated staff ID.
        id: StaffId,
    },

    /// A member with this ID is already enrolled.
    #[error("member already enrolled: {id}")]
    DuplicateMember {
        /// The duplicated member ID.
        id: MemberId,
    },

    /// There is no staff to remove.
    #[error("no staff employed")]
    NoStaff,

    /// The candidate pool has no entry at this index.
    #[error("no candidate at index {index}")]
    NoCandidate {
        /// The requested pool index.
        index: usize,
    },

    /// The session has ended in insolvency and accepts no further actions.
    #[error("session has ended")]
    SessionEnded,
}
