//! Mention events and per-doctor mention results.
//!
//! A Mention Event is an audit and notification fact ("this doctor was told
//! about this case"). It carries no authorization weight: access always flows
//! through a `Grant`, never through a mention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CaseId, DoctorId, MentionId, PatientId};

/// Write-once record of a patient mentioning doctors on a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEvent {
    pub id: MentionId,
    pub case_id: CaseId,
    /// Doctors addressed by this event. The dispatcher always emits exactly
    /// one doctor per event so recipients cannot learn who else was mentioned.
    pub target_doctor_ids: Vec<DoctorId>,
    pub patient_id: PatientId,
    pub created_at: DateTime<Utc>,
}

impl MentionEvent {
    /// An event addressed to a single doctor.
    pub fn single(case_id: CaseId, doctor_id: DoctorId, patient_id: PatientId) -> Self {
        Self {
            id: MentionId::new(),
            case_id,
            target_doctor_ids: vec![doctor_id],
            patient_id,
            created_at: Utc::now(),
        }
    }

    /// True if `doctor_id` is one of the recipients.
    pub fn addresses(&self, doctor_id: &DoctorId) -> bool {
        self.target_doctor_ids.contains(doctor_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionStatus {
    /// A grant was created (or a revoked one restored) for this doctor.
    Granted,
    /// The doctor already held a live grant; nothing changed.
    AlreadyGranted,
    /// This doctor could not be processed; see `error`.
    Error,
}

/// Outcome of one doctor within a mention batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerDoctorResult {
    pub doctor_id: DoctorId,
    pub status: MentionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The event emitted for this doctor, absent unless `status == Granted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention_id: Option<MentionId>,
}

impl PerDoctorResult {
    pub fn failed(doctor_id: DoctorId, error: impl Into<String>) -> Self {
        Self {
            doctor_id,
            status: MentionStatus::Error,
            error: Some(error.into()),
            mention_id: None,
        }
    }
}

/// Structured result of `mention_doctors`: one entry per requested doctor,
/// in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionReport {
    pub case_id: CaseId,
    pub results: Vec<PerDoctorResult>,
}

impl MentionReport {
    /// Entries that ended in a live grant (new or pre-existing).
    pub fn succeeded(&self) -> impl Iterator<Item = &PerDoctorResult> {
        self.results
            .iter()
            .filter(|r| r.status != MentionStatus::Error)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PerDoctorResult> {
        self.results
            .iter()
            .filter(|r| r.status == MentionStatus::Error)
    }

    /// True when the batch mixes successes with per-item errors.
    pub fn is_partial_failure(&self) -> bool {
        self.succeeded().next().is_some() && self.failures().next().is_some()
    }

    pub fn status_of(&self, doctor_id: &DoctorId) -> Option<MentionStatus> {
        self.results
            .iter()
            .find(|r| &r.doctor_id == doctor_id)
            .map(|r| r.status)
    }
}
