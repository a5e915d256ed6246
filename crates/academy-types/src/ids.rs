//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity in the simulation has a strongly-typed ID so staff, member
//! and facility identifiers cannot be mixed up at compile time.
//!
//! IDs are random (v4) UUIDs whose bytes come from the caller's random
//! source. A session seeded with a fixed value therefore produces the same
//! identifiers on every run.

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random (v4) identifier from the given random source.
            pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
                let bytes: [u8; 16] = rng.random();
                Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a staff member (hired or candidate).
    StaffId
}

define_id! {
    /// Unique identifier for an enrolled member.
    MemberId
}

define_id! {
    /// Unique identifier for a constructed facility.
    FacilityId
}
