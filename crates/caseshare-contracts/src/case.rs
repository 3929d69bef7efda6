//! Case and doctor records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CaseId, DoctorId, PatientId};

/// Lifecycle status of a case. Status never participates in access decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStatus {
    Active,
    Closed,
    Archived,
}

/// A patient's case as seen by the access engine.
///
/// Only `visible_to_doctors` matters for authorization; the remaining fields
/// are carried for listings and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    /// The patient who owns the case and alone may change its sharing.
    pub patient_id: PatientId,
    /// Public "share with all doctors" flag.
    pub visible_to_doctors: bool,
    pub status: CaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// A fresh, active case owned by `patient_id`.
    pub fn open(patient_id: PatientId, visible_to_doctors: bool) -> Self {
        let now = Utc::now();
        Self {
            id: CaseId::new(),
            patient_id,
            visible_to_doctors,
            status: CaseStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A doctor account known to the engine.
///
/// Only verified doctors may see public cases, receive grants, or act on a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub display_name: String,
    pub verified: bool,
    pub registered_at: DateTime<Utc>,
}
