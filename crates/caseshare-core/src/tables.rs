//! Committed engine state.
//!
//! `Tables` holds the source tables (cases, doctors, grant log, mention log)
//! together with the Access Index derived from them. The engine keeps one
//! `Tables` behind an `RwLock`: every mutation happens under the write guard,
//! so the grant log and the index always change together.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use caseshare_contracts::{
    case::{Case, Doctor},
    error::{CaseError, CaseResult},
    ids::{CaseId, DoctorId, MentionId},
    mention::MentionEvent,
};

use crate::{grant_log::GrantLog, index::AccessIndex};

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) cases: HashMap<CaseId, Case>,
    pub(crate) doctors: HashMap<DoctorId, Doctor>,
    pub(crate) grants: GrantLog,
    pub(crate) index: AccessIndex,
    /// Write-once mention events, in emission order.
    pub(crate) mentions: Vec<MentionEvent>,
    /// Read receipts. Kept apart from the events so the log stays write-once.
    pub(crate) read_mentions: HashSet<MentionId>,
    pub(crate) export_counts: HashMap<CaseId, u64>,
}

impl Tables {
    pub(crate) fn case(&self, case_id: &CaseId) -> CaseResult<&Case> {
        self.cases
            .get(case_id)
            .ok_or(CaseError::InvalidCaseReference { case_id: *case_id })
    }

    /// The doctor, provided it is registered and verified.
    pub(crate) fn verified_doctor(&self, doctor_id: &DoctorId) -> CaseResult<&Doctor> {
        let doctor = self
            .doctors
            .get(doctor_id)
            .ok_or_else(|| CaseError::UnknownDoctor {
                doctor_id: *doctor_id,
                reason: "not registered".to_string(),
            })?;
        if !doctor.verified {
            return Err(CaseError::UnknownDoctor {
                doctor_id: *doctor_id,
                reason: "not verified".to_string(),
            });
        }
        Ok(doctor)
    }

    pub(crate) fn register_case(&mut self, case: Case) {
        self.index
            .register_case(case.id, case.patient_id, case.visible_to_doctors);
        self.cases.insert(case.id, case);
    }

    /// Flip the public flag and its index entry together. Returns true when
    /// the flag actually changed. Grants are never touched.
    pub(crate) fn set_visibility(&mut self, case_id: &CaseId, visible: bool) -> CaseResult<bool> {
        let case = self
            .cases
            .get_mut(case_id)
            .ok_or(CaseError::InvalidCaseReference { case_id: *case_id })?;
        if case.visible_to_doctors == visible {
            return Ok(false);
        }
        case.visible_to_doctors = visible;
        case.updated_at = Utc::now();
        self.index.set_public(*case_id, visible);
        Ok(true)
    }

    /// A fresh index rebuilt from the Case table and the Grant Log.
    pub(crate) fn rebuilt_index(&self) -> AccessIndex {
        AccessIndex::rebuild(self.cases.values(), self.grants.live())
    }

    /// Compare the index entries of one case with the source tables.
    ///
    /// Returns `ConsistencyViolation` describing every mismatch.
    pub(crate) fn verify_case(&self, case_id: &CaseId) -> CaseResult<()> {
        let case = self.case(case_id)?;
        let doctors: HashSet<DoctorId> = self
            .grants
            .for_case(case_id)
            .filter(|g| g.is_live())
            .map(|g| g.doctor_id)
            .collect();

        let found = self
            .index
            .diff_case(case_id, case.visible_to_doctors, &doctors);
        if found.is_empty() {
            return Ok(());
        }
        Err(CaseError::ConsistencyViolation {
            case_id: *case_id,
            detail: found
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        })
    }
}

pub(crate) fn read_state(state: &RwLock<Tables>) -> CaseResult<RwLockReadGuard<'_, Tables>> {
    state.read().map_err(|e| CaseError::StateUnavailable {
        reason: format!("state lock poisoned: {}", e),
    })
}

pub(crate) fn write_state(state: &RwLock<Tables>) -> CaseResult<RwLockWriteGuard<'_, Tables>> {
    state.write().map_err(|e| CaseError::StateUnavailable {
        reason: format!("state lock poisoned: {}", e),
    })
}
