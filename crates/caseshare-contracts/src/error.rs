//! Error types for the caseshare engine.
//!
//! All fallible engine operations return `CaseResult<T>`. Idempotent no-ops
//! (re-granting) and partial mention failures are not errors; they are
//! reported through `GrantStatus` and `MentionReport`.

use thiserror::Error;

use crate::{
    access::Denial,
    ids::{CaseId, DoctorId, MentionId},
};

#[derive(Debug, Error)]
pub enum CaseError {
    /// The case id does not exist. Fatal to the single call.
    #[error("case {case_id} not found")]
    InvalidCaseReference { case_id: CaseId },

    /// The doctor id is not registered or not verified.
    #[error("unknown doctor {doctor_id}: {reason}")]
    UnknownDoctor { doctor_id: DoctorId, reason: String },

    /// The actor has no qualifying access. Display follows the configured
    /// disclosure mode.
    #[error("{0}")]
    PermissionDenied(Denial),

    /// The mention id does not exist.
    #[error("mention {mention_id} not found")]
    UnknownMention { mention_id: MentionId },

    /// The Access Index disagrees with the Grant Log or the Case table.
    #[error("access index inconsistent for case {case_id}: {detail}")]
    ConsistencyViolation { case_id: CaseId, detail: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The audit writer could not persist a record.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// Engine state could not be locked (a writer panicked mid-transaction).
    #[error("engine state unavailable: {reason}")]
    StateUnavailable { reason: String },
}

impl CaseError {
    /// True for errors a caller should render as "not found", whether the
    /// case is missing or hidden by a `NotFound` denial.
    pub fn is_not_found(&self) -> bool {
        match self {
            CaseError::InvalidCaseReference { .. } | CaseError::UnknownMention { .. } => true,
            CaseError::PermissionDenied(denial) => {
                denial.disclosure == crate::access::DenialDisclosure::NotFound
            }
            _ => false,
        }
    }
}

/// Convenience alias used throughout the caseshare crates.
pub type CaseResult<T> = Result<T, CaseError>;
