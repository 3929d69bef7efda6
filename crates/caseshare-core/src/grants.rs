//! The Grant Manager: the only writer of the Grant Log.
//!
//! A `GrantManager` borrows the state tables for the duration of one write
//! transaction. Each call updates the Grant Log and the Access Index together.
//!
//! Grants are doctor-scoped rows. They never read or write a case's
//! `visible_to_doctors` flag: sharing with one doctor and sharing with all
//! doctors are separate axes, and no row is ever repurposed across them.

use tracing::{debug, info};

use caseshare_contracts::{
    error::{CaseError, CaseResult},
    grant::{Grant, GrantOutcome, GrantStatus},
    ids::{CaseId, DoctorId},
};

use crate::tables::Tables;

pub struct GrantManager<'t> {
    tables: &'t mut Tables,
}

impl<'t> GrantManager<'t> {
    pub(crate) fn new(tables: &'t mut Tables) -> Self {
        Self { tables }
    }

    /// Ensure a live grant exists for `(case_id, doctor_id)`.
    ///
    /// - No row yet → insert one (`Created`).
    /// - Revoked row → flip it back (`Restored`); no second row is inserted.
    /// - Live row → return it unchanged (`AlreadyGranted`).
    ///
    /// # Errors
    ///
    /// `InvalidCaseReference` for an unknown case, `UnknownDoctor` for an
    /// unregistered or unverified doctor. Nothing is written on error.
    pub fn grant(&mut self, case_id: CaseId, doctor_id: DoctorId) -> CaseResult<GrantOutcome> {
        self.tables.case(&case_id)?;
        self.tables.verified_doctor(&doctor_id)?;

        let existing = self.tables.grants.get(&case_id, &doctor_id).cloned();
        let outcome = match existing {
            Some(grant) if grant.is_live() => {
                debug!(case_id = %case_id, doctor_id = %doctor_id, "grant already live");
                GrantOutcome {
                    grant,
                    status: GrantStatus::AlreadyGranted,
                }
            }
            Some(_) => {
                let grant = self.flip(&case_id, &doctor_id, false)?;
                info!(
                    case_id = %case_id,
                    doctor_id = %doctor_id,
                    grant_id = %grant.id,
                    "revoked grant restored"
                );
                GrantOutcome {
                    grant,
                    status: GrantStatus::Restored,
                }
            }
            None => {
                let grant = self.insert(case_id, doctor_id)?;
                info!(
                    case_id = %case_id,
                    doctor_id = %doctor_id,
                    grant_id = %grant.id,
                    "grant created"
                );
                GrantOutcome {
                    grant,
                    status: GrantStatus::Created,
                }
            }
        };

        if outcome.status != GrantStatus::AlreadyGranted {
            self.tables.index.add_grant(doctor_id, case_id);
        }
        Ok(outcome)
    }

    /// Mark the grant for `(case_id, doctor_id)` revoked.
    ///
    /// Returns the revoked row, or `None` when the doctor held no live grant
    /// (never granted, or already revoked). The case must exist; the doctor
    /// need not still be verified.
    pub fn revoke(&mut self, case_id: CaseId, doctor_id: DoctorId) -> CaseResult<Option<Grant>> {
        self.tables.case(&case_id)?;

        let live = self
            .tables
            .grants
            .get(&case_id, &doctor_id)
            .is_some_and(|g| g.is_live());
        if !live {
            debug!(case_id = %case_id, doctor_id = %doctor_id, "no live grant to revoke");
            return Ok(None);
        }

        let grant = self.flip(&case_id, &doctor_id, true)?;
        self.tables.index.remove_grant(doctor_id, case_id);
        info!(
            case_id = %case_id,
            doctor_id = %doctor_id,
            grant_id = %grant.id,
            "grant revoked"
        );
        Ok(Some(grant))
    }

    fn insert(&mut self, case_id: CaseId, doctor_id: DoctorId) -> CaseResult<Grant> {
        // The pair was checked absent under the same write guard.
        self.tables
            .grants
            .insert(case_id, doctor_id)
            .cloned()
            .ok_or_else(|| unreachable_pair(case_id, doctor_id, "insert"))
    }

    fn flip(&mut self, case_id: &CaseId, doctor_id: &DoctorId, revoked: bool) -> CaseResult<Grant> {
        self.tables
            .grants
            .set_revoked(case_id, doctor_id, revoked)
            .cloned()
            .ok_or_else(|| unreachable_pair(*case_id, *doctor_id, "update"))
    }
}

fn unreachable_pair(case_id: CaseId, doctor_id: DoctorId, op: &str) -> CaseError {
    CaseError::ConsistencyViolation {
        case_id,
        detail: format!("grant log {op} failed for doctor {doctor_id}"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use caseshare_contracts::{
        case::{Case, Doctor},
        ids::PatientId,
    };

    use super::*;

    fn tables_with(case_public: bool) -> (Tables, CaseId, DoctorId) {
        let mut tables = Tables::default();
        let case = Case::open(PatientId::new(), case_public);
        let case_id = case.id;
        tables.register_case(case);
        let doctor_id = DoctorId::new();
        tables.doctors.insert(
            doctor_id,
            Doctor {
                id: doctor_id,
                display_name: "Dr. Test".to_string(),
                verified: true,
                registered_at: Utc::now(),
            },
        );
        (tables, case_id, doctor_id)
    }

    #[test]
    fn grant_then_regrant_is_idempotent() {
        let (mut tables, case_id, doctor_id) = tables_with(false);

        let first = GrantManager::new(&mut tables).grant(case_id, doctor_id).unwrap();
        let second = GrantManager::new(&mut tables).grant(case_id, doctor_id).unwrap();

        assert_eq!(first.status, GrantStatus::Created);
        assert_eq!(second.status, GrantStatus::AlreadyGranted);
        assert_eq!(first.grant.id, second.grant.id);
        assert_eq!(tables.grants.len(), 1);
    }

    #[test]
    fn grant_after_revoke_restores_same_row() {
        let (mut tables, case_id, doctor_id) = tables_with(false);

        let created = GrantManager::new(&mut tables).grant(case_id, doctor_id).unwrap();
        GrantManager::new(&mut tables).revoke(case_id, doctor_id).unwrap();
        assert!(!tables.index.is_accessible(&doctor_id, &case_id));

        let restored = GrantManager::new(&mut tables).grant(case_id, doctor_id).unwrap();
        assert_eq!(restored.status, GrantStatus::Restored);
        assert_eq!(restored.grant.id, created.grant.id);
        assert!(!restored.grant.revoked);
        assert_eq!(tables.grants.len(), 1);
        assert!(tables.index.is_accessible(&doctor_id, &case_id));
    }

    #[test]
    fn revoke_without_grant_returns_none() {
        let (mut tables, case_id, doctor_id) = tables_with(false);
        assert!(GrantManager::new(&mut tables)
            .revoke(case_id, doctor_id)
            .unwrap()
            .is_none());
    }

    /// A grant on a public case is still its own doctor-scoped row and
    /// leaves the visibility flag alone.
    #[test]
    fn grant_never_touches_visibility_flag() {
        let (mut tables, case_id, doctor_id) = tables_with(true);
        GrantManager::new(&mut tables).grant(case_id, doctor_id).unwrap();
        assert!(tables.cases[&case_id].visible_to_doctors);

        tables.set_visibility(&case_id, false).unwrap();
        assert!(tables.index.is_accessible(&doctor_id, &case_id));
        assert!(!tables.index.is_accessible(&DoctorId::new(), &case_id));
    }

    #[test]
    fn grant_rejects_unverified_doctor_without_writing() {
        let (mut tables, case_id, doctor_id) = tables_with(false);
        if let Some(doctor) = tables.doctors.get_mut(&doctor_id) {
            doctor.verified = false;
        }

        let result = GrantManager::new(&mut tables).grant(case_id, doctor_id);
        assert!(matches!(result, Err(CaseError::UnknownDoctor { .. })));
        assert!(tables.grants.is_empty());
    }

    #[test]
    fn grant_rejects_unknown_case() {
        let (mut tables, _, doctor_id) = tables_with(false);
        let result = GrantManager::new(&mut tables).grant(CaseId::new(), doctor_id);
        assert!(matches!(result, Err(CaseError::InvalidCaseReference { .. })));
    }
}
