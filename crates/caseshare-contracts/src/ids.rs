//! Typed identifiers.
//!
//! Every entity the engine reasons about gets its own newtype so a doctor id
//! can never be passed where a case id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new, random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id!(
    /// Identifies one patient case (the unit of sharing).
    CaseId
);

uuid_id!(
    /// Identifies a registered doctor account.
    DoctorId
);

uuid_id!(
    /// Identifies a patient account. Patients own cases.
    PatientId
);

uuid_id!(
    /// Identifies one row of the Grant Log.
    GrantId
);

uuid_id!(
    /// Identifies one write-once Mention Event.
    MentionId
);
