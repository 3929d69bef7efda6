//! Comment, reply, view and export authorizers.
//!
//! Thin gates consulted by the surrounding application before it persists a
//! comment or reply, renders a case, or produces an export. Each one
//! delegates to `CaseVisibilityPolicy` and turns a negative answer into a
//! `Denial` through `Authorizer::deny`, the single place the configured
//! disclosure mode is applied.

use caseshare_contracts::{
    access::{Action, Actor, Denial, DenialDisclosure},
    error::{CaseError, CaseResult},
    ids::{CaseId, DoctorId, PatientId},
};

use crate::{policy::CaseVisibilityPolicy, tables::Tables};

pub struct Authorizer<'t> {
    tables: &'t Tables,
    disclosure: DenialDisclosure,
}

impl<'t> Authorizer<'t> {
    pub(crate) fn new(tables: &'t Tables, disclosure: DenialDisclosure) -> Self {
        Self { tables, disclosure }
    }

    fn policy(&self) -> CaseVisibilityPolicy<'t> {
        CaseVisibilityPolicy::new(self.tables)
    }

    /// Build the refusal for `actor` attempting `action` on `case_id`.
    pub fn deny(&self, action: Action, case_id: CaseId, actor: Actor) -> CaseError {
        CaseError::PermissionDenied(Denial {
            action,
            case_id,
            actor,
            disclosure: self.disclosure,
        })
    }

    pub fn authorize_view(&self, doctor_id: DoctorId, case_id: CaseId) -> CaseResult<()> {
        self.doctor_gate(Action::View, doctor_id, case_id)
    }

    /// Patients may always comment on their own case; doctors need
    /// `can_comment`.
    pub fn authorize_comment(&self, actor: Actor, case_id: CaseId) -> CaseResult<()> {
        self.thread_gate(Action::Comment, actor, case_id)
    }

    /// Replies follow exactly the comment rule.
    pub fn authorize_reply(&self, actor: Actor, case_id: CaseId) -> CaseResult<()> {
        self.thread_gate(Action::Reply, actor, case_id)
    }

    pub fn authorize_export(&self, doctor_id: DoctorId, case_id: CaseId) -> CaseResult<()> {
        self.doctor_gate(Action::Export, doctor_id, case_id)
    }

    /// Sharing changes (visibility toggle, mention, revoke, grant listing)
    /// are reserved to the owning patient.
    pub fn authorize_owner(&self, patient_id: PatientId, case_id: CaseId) -> CaseResult<()> {
        let case = self.tables.case(&case_id)?;
        if case.patient_id == patient_id {
            Ok(())
        } else {
            Err(self.deny(Action::ManageSharing, case_id, Actor::Patient(patient_id)))
        }
    }

    fn thread_gate(&self, action: Action, actor: Actor, case_id: CaseId) -> CaseResult<()> {
        match actor {
            Actor::Patient(patient_id) => {
                let case = self.tables.case(&case_id)?;
                if case.patient_id == patient_id {
                    Ok(())
                } else {
                    Err(self.deny(action, case_id, actor))
                }
            }
            Actor::Doctor(doctor_id) => self.doctor_gate(action, doctor_id, case_id),
        }
    }

    fn doctor_gate(&self, action: Action, doctor_id: DoctorId, case_id: CaseId) -> CaseResult<()> {
        if self.policy().decide(action, &doctor_id, &case_id)? {
            Ok(())
        } else {
            Err(self.deny(action, case_id, Actor::Doctor(doctor_id)))
        }
    }
}
