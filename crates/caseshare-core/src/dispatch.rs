//! The Mention Dispatcher.
//!
//! Fans a patient's mention out to individual doctors. The unit of atomicity
//! is one (case, doctor) pair: each doctor gets its own write transaction,
//! and a failure for one doctor is recorded in the report without stopping
//! the others.
//!
//! Per doctor:
//!
//!   validate doctor → GrantManager::grant → [commit] → audit → notify
//!
//! A Mention Event is emitted only when the grant was created or restored,
//! and it names exactly that one doctor. Re-mentioning a doctor who already
//! holds a live grant is a no-op: no new event, no notification.

use std::sync::RwLock;

use tracing::{debug, info, warn};

use caseshare_contracts::{
    access::Actor,
    audit::{AuditKind, AuditRecord},
    error::CaseResult,
    grant::{GrantOutcome, GrantStatus},
    ids::{CaseId, DoctorId, PatientId},
    mention::{MentionEvent, MentionReport, MentionStatus, PerDoctorResult},
};

use crate::{
    grants::GrantManager,
    tables::{write_state, Tables},
    traits::{AuditWriter, NotificationSink},
};

pub struct MentionDispatcher<'e> {
    state: &'e RwLock<Tables>,
    audit: &'e dyn AuditWriter,
    notifier: &'e dyn NotificationSink,
    max_batch: usize,
}

impl<'e> MentionDispatcher<'e> {
    pub(crate) fn new(
        state: &'e RwLock<Tables>,
        audit: &'e dyn AuditWriter,
        notifier: &'e dyn NotificationSink,
        max_batch: usize,
    ) -> Self {
        Self {
            state,
            audit,
            notifier,
            max_batch,
        }
    }

    /// Grant each doctor in `doctor_ids` access to `case_id`, in order.
    ///
    /// The caller has already checked that `patient_id` owns the case.
    /// Returns one `PerDoctorResult` per requested id; ids beyond the
    /// configured batch limit are reported as errors.
    pub fn mention(
        &self,
        case_id: CaseId,
        patient_id: PatientId,
        doctor_ids: &[DoctorId],
    ) -> MentionReport {
        let mut results = Vec::with_capacity(doctor_ids.len());

        for (position, doctor_id) in doctor_ids.iter().copied().enumerate() {
            if position >= self.max_batch {
                warn!(
                    case_id = %case_id,
                    doctor_id = %doctor_id,
                    max_batch = self.max_batch,
                    "mention batch limit exceeded"
                );
                results.push(PerDoctorResult::failed(
                    doctor_id,
                    format!("mention batch limit of {} exceeded", self.max_batch),
                ));
                continue;
            }

            let result = match self.grant_one(case_id, patient_id, doctor_id) {
                Ok((outcome, event)) => self.after_commit(patient_id, outcome, event),
                Err(e) => {
                    warn!(
                        case_id = %case_id,
                        doctor_id = %doctor_id,
                        error = %e,
                        "mention failed for doctor"
                    );
                    PerDoctorResult::failed(doctor_id, e.to_string())
                }
            };
            results.push(result);
        }

        let report = MentionReport { case_id, results };
        if report.is_partial_failure() {
            warn!(
                case_id = %case_id,
                failed = report.failures().count(),
                succeeded = report.succeeded().count(),
                "mention batch partially failed"
            );
        }
        report
    }

    /// One write transaction: validate, grant, and log the event.
    fn grant_one(
        &self,
        case_id: CaseId,
        patient_id: PatientId,
        doctor_id: DoctorId,
    ) -> CaseResult<(GrantOutcome, Option<MentionEvent>)> {
        let mut tables = write_state(self.state)?;
        let outcome = GrantManager::new(&mut tables).grant(case_id, doctor_id)?;
        let event = match outcome.status {
            GrantStatus::Created | GrantStatus::Restored => {
                let event = MentionEvent::single(case_id, doctor_id, patient_id);
                tables.mentions.push(event.clone());
                Some(event)
            }
            GrantStatus::AlreadyGranted => None,
        };
        Ok((outcome, event))
    }

    /// Audit and notify once the transaction is committed and unlocked.
    fn after_commit(
        &self,
        patient_id: PatientId,
        outcome: GrantOutcome,
        event: Option<MentionEvent>,
    ) -> PerDoctorResult {
        let grant = &outcome.grant;
        let actor = Some(Actor::Patient(patient_id));

        let kind = match outcome.status {
            GrantStatus::Created => Some(AuditKind::GrantCreated {
                grant_id: grant.id,
                doctor_id: grant.doctor_id,
            }),
            GrantStatus::Restored => Some(AuditKind::GrantRestored {
                grant_id: grant.id,
                doctor_id: grant.doctor_id,
            }),
            GrantStatus::AlreadyGranted => None,
        };
        if let Some(kind) = kind {
            self.record(AuditRecord::new(kind, Some(grant.case_id), actor));
        }

        let Some(event) = event else {
            debug!(
                case_id = %grant.case_id,
                doctor_id = %grant.doctor_id,
                "doctor already granted; no mention emitted"
            );
            return PerDoctorResult {
                doctor_id: grant.doctor_id,
                status: MentionStatus::AlreadyGranted,
                error: None,
                mention_id: None,
            };
        };

        self.record(AuditRecord::new(
            AuditKind::MentionEmitted {
                mention_id: event.id,
                doctor_id: grant.doctor_id,
            },
            Some(grant.case_id),
            actor,
        ));

        match self.notifier.notify(&event) {
            Ok(()) => info!(
                case_id = %grant.case_id,
                doctor_id = %grant.doctor_id,
                mention_id = %event.id,
                "mention emitted"
            ),
            Err(reason) => warn!(
                case_id = %grant.case_id,
                doctor_id = %grant.doctor_id,
                mention_id = %event.id,
                reason = %reason,
                "mention notification failed; grant stands"
            ),
        }

        PerDoctorResult {
            doctor_id: grant.doctor_id,
            status: MentionStatus::Granted,
            error: None,
            mention_id: Some(event.id),
        }
    }

    fn record(&self, record: AuditRecord) {
        if let Err(e) = self.audit.write(&record) {
            warn!(error = %e, "audit write failed for mention");
        }
    }
}
