//! `CaseAccessEngine`: the collaborator-facing surface of the access engine.
//!
//! The engine owns the committed state (`RwLock<Tables>`) and the trusted
//! collaborators (audit writer, notification sink). Every operation follows
//! the same shape:
//!
//!   lock → validate → decide or mutate (grant log + index together) → unlock → audit / notify
//!
//! Audit and notification never run while the state lock is held.

use std::collections::BTreeSet;
use std::sync::RwLock;

use chrono::Utc;
use tracing::{error, info, warn};

use caseshare_config::EngineConfig;
use caseshare_contracts::{
    access::{Action, Actor, CaseScope, ConsistencyReport, DenialDisclosure, DoctorStats},
    audit::{AuditKind, AuditRecord},
    case::{Case, CaseStatus, Doctor},
    error::{CaseError, CaseResult},
    grant::Grant,
    ids::{CaseId, DoctorId, MentionId, PatientId},
    mention::{MentionEvent, MentionReport},
};

use crate::{
    authorize::Authorizer,
    dispatch::MentionDispatcher,
    grants::GrantManager,
    policy::CaseVisibilityPolicy,
    tables::{read_state, write_state, Tables},
    traits::{AuditWriter, NotificationSink},
};

pub struct CaseAccessEngine {
    pub(crate) state: RwLock<Tables>,
    config: EngineConfig,
    audit: Box<dyn AuditWriter>,
    notifier: Box<dyn NotificationSink>,
}

impl CaseAccessEngine {
    pub fn new(
        config: EngineConfig,
        audit: Box<dyn AuditWriter>,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            state: RwLock::new(Tables::default()),
            config,
            audit,
            notifier,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Registry ─────────────────────────────────────────────────────────────

    /// Register a doctor account. New doctors start unverified.
    pub fn register_doctor(&self, display_name: impl Into<String>) -> CaseResult<DoctorId> {
        let doctor = Doctor {
            id: DoctorId::new(),
            display_name: display_name.into(),
            verified: false,
            registered_at: Utc::now(),
        };
        let doctor_id = doctor.id;
        write_state(&self.state)?.doctors.insert(doctor_id, doctor);
        info!(doctor_id = %doctor_id, "doctor registered");
        Ok(doctor_id)
    }

    /// Approve or withdraw a doctor's verification. Grants are kept either
    /// way; an unverified doctor simply fails every doctor-facing call.
    pub fn set_doctor_verified(&self, doctor_id: DoctorId, verified: bool) -> CaseResult<()> {
        let mut tables = write_state(&self.state)?;
        let doctor = tables
            .doctors
            .get_mut(&doctor_id)
            .ok_or_else(|| CaseError::UnknownDoctor {
                doctor_id,
                reason: "not registered".to_string(),
            })?;
        doctor.verified = verified;
        info!(doctor_id = %doctor_id, verified, "doctor verification changed");
        Ok(())
    }

    /// Register a new case for `patient_id` and return its id.
    pub fn open_case(&self, patient_id: PatientId, visible_to_doctors: bool) -> CaseResult<CaseId> {
        let case = Case::open(patient_id, visible_to_doctors);
        let case_id = case.id;
        write_state(&self.state)?.register_case(case);

        info!(case_id = %case_id, patient_id = %patient_id, visible_to_doctors, "case registered");
        self.record(AuditKind::CaseRegistered, Some(case_id), Some(Actor::Patient(patient_id)));
        Ok(case_id)
    }

    /// A snapshot of the case row.
    pub fn case(&self, case_id: CaseId) -> CaseResult<Case> {
        read_state(&self.state)?.case(&case_id).cloned()
    }

    /// Lifecycle transition. Has no effect on who may access the case.
    pub fn set_case_status(&self, case_id: CaseId, status: CaseStatus) -> CaseResult<()> {
        let mut tables = write_state(&self.state)?;
        let case = tables
            .cases
            .get_mut(&case_id)
            .ok_or(CaseError::InvalidCaseReference { case_id })?;
        case.status = status;
        case.updated_at = Utc::now();
        Ok(())
    }

    // ── Patient-invoked sharing ─────────────────────────────────────────────

    /// Toggle the public "share with all doctors" flag. Owner only.
    ///
    /// Only the flag and its index entry change; explicit grants are left
    /// exactly as they were.
    pub fn set_case_visibility(
        &self,
        patient_id: PatientId,
        case_id: CaseId,
        visible_to_doctors: bool,
    ) -> CaseResult<()> {
        let changed = {
            let mut tables = write_state(&self.state)?;
            self.authorizer(&tables).authorize_owner(patient_id, case_id)?;
            tables.set_visibility(&case_id, visible_to_doctors)?
        };

        if changed {
            info!(case_id = %case_id, visible_to_doctors, "case visibility changed");
            self.record(
                AuditKind::VisibilityChanged { visible: visible_to_doctors },
                Some(case_id),
                Some(Actor::Patient(patient_id)),
            );
        }
        Ok(())
    }

    /// Grant each listed doctor private access to the case. Owner only.
    ///
    /// An unknown case or a non-owner fails the whole call. Per-doctor
    /// problems (unknown or unverified doctor, batch limit) are reported in
    /// the returned `MentionReport` and never block the other doctors.
    pub fn mention_doctors(
        &self,
        patient_id: PatientId,
        case_id: CaseId,
        doctor_ids: &[DoctorId],
    ) -> CaseResult<MentionReport> {
        {
            let tables = read_state(&self.state)?;
            self.authorizer(&tables).authorize_owner(patient_id, case_id)?;
        }
        let dispatcher = MentionDispatcher::new(
            &self.state,
            self.audit.as_ref(),
            self.notifier.as_ref(),
            self.config.mentions.max_batch,
        );
        Ok(dispatcher.mention(case_id, patient_id, doctor_ids))
    }

    /// Revoke one doctor's grant. Owner only.
    ///
    /// Returns false when the doctor held no live grant on the case.
    pub fn revoke_doctor_access(
        &self,
        patient_id: PatientId,
        case_id: CaseId,
        doctor_id: DoctorId,
    ) -> CaseResult<bool> {
        let revoked = {
            let mut tables = write_state(&self.state)?;
            self.authorizer(&tables).authorize_owner(patient_id, case_id)?;
            GrantManager::new(&mut tables).revoke(case_id, doctor_id)?
        };

        match revoked {
            Some(grant) => {
                self.record(
                    AuditKind::GrantRevoked {
                        grant_id: grant.id,
                        doctor_id,
                    },
                    Some(case_id),
                    Some(Actor::Patient(patient_id)),
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Full grant history of a case, revoked rows included. Owner only.
    pub fn list_case_grants(&self, patient_id: PatientId, case_id: CaseId) -> CaseResult<Vec<Grant>> {
        let tables = read_state(&self.state)?;
        self.authorizer(&tables).authorize_owner(patient_id, case_id)?;
        Ok(tables.grants.for_case(&case_id).cloned().collect())
    }

    // ── Doctor-facing decisions ─────────────────────────────────────────────
    //
    // Every per-case decision runs through `with_policy` or `with_authorizer`,
    // which verify and repair the case's index entries first when
    // `verify_index_on_decision` is set.

    pub fn can_view(&self, doctor_id: DoctorId, case_id: CaseId) -> CaseResult<bool> {
        self.with_policy(case_id, |policy| policy.can_view(&doctor_id, &case_id))
    }

    pub fn can_comment(&self, doctor_id: DoctorId, case_id: CaseId) -> CaseResult<bool> {
        self.with_policy(case_id, |policy| policy.can_comment(&doctor_id, &case_id))
    }

    /// Export gate for the report-rendering collaborator.
    pub fn can_export(&self, case_id: CaseId, doctor_id: DoctorId) -> CaseResult<bool> {
        self.with_policy(case_id, |policy| policy.can_export(&case_id, &doctor_id))
    }

    /// Public cases plus cases granted to the doctor. This is the set export
    /// eligibility is measured against.
    pub fn list_accessible_cases(&self, doctor_id: DoctorId) -> CaseResult<BTreeSet<CaseId>> {
        let tables = read_state(&self.state)?;
        CaseVisibilityPolicy::new(&tables).accessible_cases(&doctor_id)
    }

    /// Dashboard listing. `CaseScope::All` equals `list_accessible_cases`.
    pub fn list_cases(&self, doctor_id: DoctorId, scope: CaseScope) -> CaseResult<BTreeSet<CaseId>> {
        let tables = read_state(&self.state)?;
        CaseVisibilityPolicy::new(&tables).cases_in_scope(&doctor_id, scope)
    }

    // ── Authorizers ─────────────────────────────────────────────────────────

    /// Gate for rendering a case to a doctor. Audited when
    /// `audit.record_views` is set.
    pub fn authorize_view(&self, doctor_id: DoctorId, case_id: CaseId) -> CaseResult<()> {
        let result = self.with_authorizer(case_id, |gate| gate.authorize_view(doctor_id, case_id));

        if self.config.audit.record_views {
            let kind = match &result {
                Ok(()) => Some(AuditKind::ViewGranted),
                Err(CaseError::PermissionDenied(_)) => Some(AuditKind::ViewDenied),
                Err(_) => None,
            };
            if let Some(kind) = kind {
                self.record(kind, Some(case_id), Some(Actor::Doctor(doctor_id)));
            }
        }
        if let Err(CaseError::PermissionDenied(_)) = &result {
            warn!(doctor_id = %doctor_id, case_id = %case_id, "view denied");
        }
        result
    }

    pub fn authorize_comment(&self, actor: Actor, case_id: CaseId) -> CaseResult<()> {
        let result = self.with_authorizer(case_id, |gate| gate.authorize_comment(actor, case_id));
        if let Err(CaseError::PermissionDenied(_)) = &result {
            warn!(actor = %actor, case_id = %case_id, "comment denied");
        }
        result
    }

    pub fn authorize_reply(&self, actor: Actor, case_id: CaseId) -> CaseResult<()> {
        let result = self.with_authorizer(case_id, |gate| gate.authorize_reply(actor, case_id));
        if let Err(CaseError::PermissionDenied(_)) = &result {
            warn!(actor = %actor, case_id = %case_id, "reply denied");
        }
        result
    }

    /// Gate for a single-case export. Both outcomes are audited; an allowed
    /// export that cannot be audited is refused with `AuditWriteFailed`.
    pub fn authorize_export(&self, doctor_id: DoctorId, case_id: CaseId) -> CaseResult<()> {
        let result = self.with_authorizer(case_id, |gate| gate.authorize_export(doctor_id, case_id));
        self.note_export_denial(doctor_id, &result);
        result?;

        self.record_strict(AuditRecord::new(
            AuditKind::ExportAuthorized,
            Some(case_id),
            Some(Actor::Doctor(doctor_id)),
        ))
    }

    /// All-or-nothing gate for a multi-case export.
    ///
    /// The cases are checked and counted under one write guard. The whole
    /// batch is then audited as a single `ExportBatchAuthorized` record; if
    /// that write fails the counters are released and `AuditWriteFailed`
    /// is returned.
    pub fn authorize_export_batch(&self, doctor_id: DoctorId, case_ids: &[CaseId]) -> CaseResult<()> {
        for case_id in case_ids {
            self.ensure_case_consistent(*case_id)?;
        }
        let committed = {
            let mut tables = write_state(&self.state)?;
            commit_export_batch(
                &mut tables,
                self.config.access.denial_disclosure,
                doctor_id,
                case_ids,
            )
        };
        self.note_export_denial(doctor_id, &committed);
        committed?;

        let record = AuditRecord::new(
            AuditKind::ExportBatchAuthorized {
                case_ids: case_ids.to_vec(),
            },
            None,
            Some(Actor::Doctor(doctor_id)),
        );
        if let Err(e) = self.record_strict(record) {
            self.release_export_counts(case_ids);
            return Err(e);
        }
        info!(doctor_id = %doctor_id, cases = case_ids.len(), "export authorized");
        Ok(())
    }

    /// How many authorized batch exports have included the case.
    pub fn export_count(&self, case_id: CaseId) -> CaseResult<u64> {
        let tables = read_state(&self.state)?;
        tables.case(&case_id)?;
        Ok(tables.export_counts.get(&case_id).copied().unwrap_or(0))
    }

    fn note_export_denial(&self, doctor_id: DoctorId, result: &CaseResult<()>) {
        if let Err(CaseError::PermissionDenied(denial)) = result {
            warn!(doctor_id = %doctor_id, case_id = %denial.case_id, "export denied");
            self.record(
                AuditKind::ExportDenied,
                Some(denial.case_id),
                Some(Actor::Doctor(doctor_id)),
            );
        }
    }

    fn release_export_counts(&self, case_ids: &[CaseId]) {
        match write_state(&self.state) {
            Ok(mut tables) => {
                for case_id in case_ids {
                    if let Some(count) = tables.export_counts.get_mut(case_id) {
                        *count = count.saturating_sub(1);
                    }
                }
            }
            Err(e) => error!(error = %e, "export counters could not be released"),
        }
    }

    // ── Mention inbox and dashboard ─────────────────────────────────────────

    /// Mention events addressed to the doctor, newest first.
    ///
    /// Being mentioned is not access: opening any of these cases still goes
    /// through `authorize_view`.
    pub fn mentions_for(&self, doctor_id: DoctorId) -> CaseResult<Vec<MentionEvent>> {
        let tables = read_state(&self.state)?;
        tables.verified_doctor(&doctor_id)?;
        Ok(tables
            .mentions
            .iter()
            .rev()
            .filter(|event| event.addresses(&doctor_id))
            .cloned()
            .collect())
    }

    /// Store a read receipt. Returns true if the mention was unread.
    pub fn mark_mention_read(&self, doctor_id: DoctorId, mention_id: MentionId) -> CaseResult<bool> {
        let mut tables = write_state(&self.state)?;
        tables.verified_doctor(&doctor_id)?;

        let event = tables
            .mentions
            .iter()
            .find(|event| event.id == mention_id)
            .ok_or(CaseError::UnknownMention { mention_id })?;
        if !event.addresses(&doctor_id) {
            let case_id = event.case_id;
            return Err(self.authorizer(&tables).deny(
                Action::ReadMention,
                case_id,
                Actor::Doctor(doctor_id),
            ));
        }
        Ok(tables.read_mentions.insert(mention_id))
    }

    pub fn doctor_stats(&self, doctor_id: DoctorId) -> CaseResult<DoctorStats> {
        let tables = read_state(&self.state)?;
        tables.verified_doctor(&doctor_id)?;
        let index = &tables.index;
        let unread_mentions = tables
            .mentions
            .iter()
            .filter(|event| event.addresses(&doctor_id))
            .filter(|event| !tables.read_mentions.contains(&event.id))
            .count();

        Ok(DoctorStats {
            accessible: index.accessible_cases(&doctor_id).len(),
            mentioned: index.granted_cases(&doctor_id).len(),
            public: index.public_cases().len(),
            unread_mentions,
        })
    }

    // ── Index consistency ───────────────────────────────────────────────────

    /// Compare the whole Access Index with a fresh rebuild; repair on drift.
    pub fn check_consistency(&self) -> CaseResult<ConsistencyReport> {
        let discrepancies = {
            let tables = read_state(&self.state)?;
            tables.index.diff(&tables.rebuilt_index())
        };
        if discrepancies.is_empty() {
            return Ok(ConsistencyReport::default());
        }

        let detail = discrepancies
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        error!(
            count = discrepancies.len(),
            detail = %detail,
            "access index disagrees with source tables"
        );
        self.repair(None, detail)?;
        Ok(ConsistencyReport {
            discrepancies,
            repaired: true,
        })
    }

    /// Unconditionally replace the index with a rebuild from the source tables.
    pub fn rebuild_index(&self) -> CaseResult<()> {
        let mut tables = write_state(&self.state)?;
        tables.index = tables.rebuilt_index();
        info!(cases = tables.cases.len(), grants = tables.grants.len(), "access index rebuilt");
        Ok(())
    }

    /// Verify one case's index entries and repair before answering, when
    /// the configuration asks for it.
    fn ensure_case_consistent(&self, case_id: CaseId) -> CaseResult<()> {
        if !self.config.access.verify_index_on_decision {
            return Ok(());
        }
        let verdict = read_state(&self.state)?.verify_case(&case_id);
        match verdict {
            Err(CaseError::ConsistencyViolation { case_id, detail }) => {
                error!(
                    case_id = %case_id,
                    detail = %detail,
                    "access index inconsistent for case; repairing before decision"
                );
                self.repair(Some(case_id), detail)
            }
            other => other,
        }
    }

    fn repair(&self, case_id: Option<CaseId>, detail: String) -> CaseResult<()> {
        self.rebuild_index()?;
        self.record(AuditKind::IndexRepaired { detail }, case_id, None);
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn with_policy<R>(
        &self,
        case_id: CaseId,
        decide: impl FnOnce(&CaseVisibilityPolicy<'_>) -> CaseResult<R>,
    ) -> CaseResult<R> {
        self.ensure_case_consistent(case_id)?;
        let tables = read_state(&self.state)?;
        decide(&CaseVisibilityPolicy::new(&tables))
    }

    fn with_authorizer<R>(
        &self,
        case_id: CaseId,
        gate: impl FnOnce(&Authorizer<'_>) -> CaseResult<R>,
    ) -> CaseResult<R> {
        self.ensure_case_consistent(case_id)?;
        let tables = read_state(&self.state)?;
        gate(&self.authorizer(&tables))
    }

    fn authorizer<'t>(&self, tables: &'t Tables) -> Authorizer<'t> {
        Authorizer::new(tables, self.config.access.denial_disclosure)
    }

    /// Audit a record; failures are logged and otherwise ignored.
    fn record(&self, kind: AuditKind, case_id: Option<CaseId>, actor: Option<Actor>) {
        let record = AuditRecord::new(kind, case_id, actor);
        if let Err(e) = self.audit.write(&record) {
            warn!(error = %e, "audit write failed");
        }
    }

    /// Audit a record; a failure is returned to the caller.
    fn record_strict(&self, record: AuditRecord) -> CaseResult<()> {
        self.audit.write(&record).map_err(|e| {
            error!(kind = ?record.kind, error = %e, "export audit failed; refusing export");
            match e {
                CaseError::AuditWriteFailed { .. } => e,
                other => CaseError::AuditWriteFailed {
                    reason: other.to_string(),
                },
            }
        })
    }
}

/// Check every case of a batch export and count it, under the caller's
/// write guard. Nothing is counted unless every case passes.
pub(crate) fn commit_export_batch(
    tables: &mut Tables,
    disclosure: DenialDisclosure,
    doctor_id: DoctorId,
    case_ids: &[CaseId],
) -> CaseResult<()> {
    {
        let gate = Authorizer::new(tables, disclosure);
        for case_id in case_ids {
            gate.authorize_export(doctor_id, *case_id)?;
        }
    }
    for case_id in case_ids {
        *tables.export_counts.entry(*case_id).or_insert(0) += 1;
    }
    Ok(())
}
