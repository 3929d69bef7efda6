//! The Case Visibility Policy.
//!
//! Every doctor-facing access question (view, comment, reply, export) is
//! answered by `CaseVisibilityPolicy::decide`, which is a single membership
//! test against the Access Index:
//!
//! ```text
//! allowed(D, C)  ⇔  C ∈ accessible_cases(D)  =  public_cases() ∪ granted_cases(D)
//! ```
//!
//! There is no per-action rule. `can_view`, `can_comment` and `can_export`
//! all reach `decide`, so they cannot disagree for the same (doctor, case)
//! at the same point in time.

use std::collections::BTreeSet;

use tracing::debug;

use caseshare_contracts::{
    access::{Action, CaseScope},
    error::CaseResult,
    ids::{CaseId, DoctorId},
};

use crate::tables::Tables;

/// Side-effect-free decisions over one committed snapshot of the tables.
pub struct CaseVisibilityPolicy<'t> {
    tables: &'t Tables,
}

impl<'t> CaseVisibilityPolicy<'t> {
    pub(crate) fn new(tables: &'t Tables) -> Self {
        Self { tables }
    }

    pub fn can_view(&self, doctor_id: &DoctorId, case_id: &CaseId) -> CaseResult<bool> {
        self.decide(Action::View, doctor_id, case_id)
    }

    /// Same predicate as `can_view`. The owning patient is authorized
    /// separately by the comment authorizer.
    pub fn can_comment(&self, doctor_id: &DoctorId, case_id: &CaseId) -> CaseResult<bool> {
        self.decide(Action::Comment, doctor_id, case_id)
    }

    /// Is `case_id` a member of `accessible_cases(doctor_id)`?
    pub fn can_export(&self, case_id: &CaseId, doctor_id: &DoctorId) -> CaseResult<bool> {
        self.decide(Action::Export, doctor_id, case_id)
    }

    /// The one access predicate.
    ///
    /// # Errors
    ///
    /// `InvalidCaseReference` for an unknown case; `UnknownDoctor` for an
    /// unregistered or unverified doctor.
    pub fn decide(&self, action: Action, doctor_id: &DoctorId, case_id: &CaseId) -> CaseResult<bool> {
        self.tables.case(case_id)?;
        self.tables.verified_doctor(doctor_id)?;

        let allowed = self.tables.index.is_accessible(doctor_id, case_id);
        debug!(
            action = %action,
            doctor_id = %doctor_id,
            case_id = %case_id,
            allowed,
            "visibility decision"
        );
        Ok(allowed)
    }

    /// `public_cases() ∪ granted_cases(doctor_id)`.
    pub fn accessible_cases(&self, doctor_id: &DoctorId) -> CaseResult<BTreeSet<CaseId>> {
        self.cases_in_scope(doctor_id, CaseScope::All)
    }

    /// A listing subset for dashboards. Export eligibility always uses
    /// `CaseScope::All` through `can_export`, never a narrower scope.
    pub fn cases_in_scope(
        &self,
        doctor_id: &DoctorId,
        scope: CaseScope,
    ) -> CaseResult<BTreeSet<CaseId>> {
        self.tables.verified_doctor(doctor_id)?;
        let index = &self.tables.index;
        Ok(match scope {
            CaseScope::All => index.accessible_cases(doctor_id),
            CaseScope::Mentioned => index.granted_cases(doctor_id),
            CaseScope::Public => index.public_cases(),
        })
    }
}
