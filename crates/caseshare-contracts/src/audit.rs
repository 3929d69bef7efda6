//! Audit records.
//!
//! Every state change and every high-stakes decision produces one
//! `AuditRecord`. The audit writer appends it to its ledger; records are
//! never modified afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    access::Actor,
    ids::{CaseId, DoctorId, GrantId, MentionId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AuditKind {
    CaseRegistered,
    VisibilityChanged { visible: bool },
    GrantCreated { grant_id: GrantId, doctor_id: DoctorId },
    GrantRestored { grant_id: GrantId, doctor_id: DoctorId },
    GrantRevoked { grant_id: GrantId, doctor_id: DoctorId },
    MentionEmitted { mention_id: MentionId, doctor_id: DoctorId },
    ViewGranted,
    ViewDenied,
    ExportAuthorized,
    /// One record for a whole multi-case export.
    ExportBatchAuthorized { case_ids: Vec<CaseId> },
    ExportDenied,
    IndexRepaired { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub kind: AuditKind,
    /// The case the record concerns; absent for whole-index repairs.
    pub case_id: Option<CaseId>,
    /// Who triggered it; absent for engine-initiated records.
    pub actor: Option<Actor>,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(kind: AuditKind, case_id: Option<CaseId>, actor: Option<Actor>) -> Self {
        Self {
            kind,
            case_id,
            actor,
            timestamp: Utc::now(),
        }
    }

    /// Whether the record is about the case, either directly or as part of
    /// a batch export.
    pub fn concerns(&self, case_id: &CaseId) -> bool {
        match &self.kind {
            AuditKind::ExportBatchAuthorized { case_ids } => case_ids.contains(case_id),
            _ => self.case_id.as_ref() == Some(case_id),
        }
    }
}
