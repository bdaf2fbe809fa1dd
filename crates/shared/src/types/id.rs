//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `MiscFeeId` where a `MonthlyFeeInstanceId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(AcademicYearId, "Unique identifier for an academic year.");
typed_id!(StudentId, "Unique identifier for a student.");
typed_id!(EnrollmentId, "Unique identifier for an enrollment.");
typed_id!(FeeItemId, "Unique identifier for a fee item.");
typed_id!(FeePackageId, "Unique identifier for a fee package.");
typed_id!(
    MonthlyFeeInstanceId,
    "Unique identifier for a generated monthly fee instance."
);
typed_id!(MiscFeeId, "Unique identifier for a generated one-time fee.");
typed_id!(BookInstanceId, "Unique identifier for a book charge.");
typed_id!(PaymentId, "Unique identifier for a payment.");

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
