//! Grant Log rows.
//!
//! A `Grant` is one (case, doctor) authorization edge. It is never physically
//! deleted; revocation flips `revoked` so the history survives for audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CaseId, DoctorId, GrantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: GrantId,
    pub case_id: CaseId,
    pub doctor_id: DoctorId,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
    /// Last time `revoked` flipped in either direction.
    pub updated_at: DateTime<Utc>,
}

impl Grant {
    /// True when this row currently authorizes its doctor.
    pub fn is_live(&self) -> bool {
        !self.revoked
    }
}

/// What a `grant` call did to the Grant Log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    /// A new row was inserted.
    Created,
    /// An existing revoked row was flipped back to live.
    Restored,
    /// A live row already existed; nothing changed.
    AlreadyGranted,
}

/// The row a `grant` call left behind, with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantOutcome {
    pub grant: Grant,
    pub status: GrantStatus,
}
