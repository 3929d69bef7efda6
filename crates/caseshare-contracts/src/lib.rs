//! # caseshare-contracts
//!
//! Shared types, records, and errors for the caseshare access-control engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate; only data definitions and error types.

pub mod access;
pub mod audit;
pub mod case;
pub mod error;
pub mod grant;
pub mod ids;
pub mod mention;

#[cfg(test)]
mod tests {
    use super::*;
    use access::{Action, Actor, Denial, DenialDisclosure, IndexDiscrepancy};
    use error::CaseError;
    use ids::{CaseId, DoctorId, PatientId};
    use mention::{MentionEvent, MentionReport, MentionStatus, PerDoctorResult};

    fn granted(doctor_id: DoctorId, status: MentionStatus) -> PerDoctorResult {
        PerDoctorResult {
            doctor_id,
            status,
            error: None,
            mention_id: None,
        }
    }

    // ── Identifiers ──────────────────────────────────────────────────────────

    #[test]
    fn case_ids_are_unique() {
        let ids: std::collections::HashSet<CaseId> = (0..100).map(|_| CaseId::new()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── MentionReport ────────────────────────────────────────────────────────

    #[test]
    fn mention_report_detects_partial_failure() {
        let ok = DoctorId::new();
        let bad = DoctorId::new();
        let report = MentionReport {
            case_id: CaseId::new(),
            results: vec![
                granted(ok, MentionStatus::Granted),
                PerDoctorResult::failed(bad, "not registered"),
            ],
        };

        assert!(report.is_partial_failure());
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.status_of(&bad), Some(MentionStatus::Error));
    }

    #[test]
    fn mention_report_all_success_is_not_partial() {
        let report = MentionReport {
            case_id: CaseId::new(),
            results: vec![
                granted(DoctorId::new(), MentionStatus::Granted),
                granted(DoctorId::new(), MentionStatus::AlreadyGranted),
            ],
        };
        assert!(!report.is_partial_failure());
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn mention_status_serializes_snake_case() {
        let json = serde_json::to_string(&MentionStatus::AlreadyGranted).unwrap();
        assert_eq!(json, "\"already_granted\"");
    }

    #[test]
    fn per_doctor_result_omits_empty_error() {
        let value = serde_json::to_value(granted(DoctorId::new(), MentionStatus::Granted)).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["status"], "granted");
    }

    #[test]
    fn single_mention_event_addresses_one_doctor() {
        let doctor = DoctorId::new();
        let event = MentionEvent::single(CaseId::new(), doctor, PatientId::new());
        assert_eq!(event.target_doctor_ids, vec![doctor]);
        assert!(event.addresses(&doctor));
        assert!(!event.addresses(&DoctorId::new()));
    }

    // ── Denial disclosure ────────────────────────────────────────────────────

    #[test]
    fn not_found_denial_reads_like_missing_case() {
        let case_id = CaseId::new();
        let denial = Denial {
            action: Action::Export,
            case_id,
            actor: Actor::Doctor(DoctorId::new()),
            disclosure: DenialDisclosure::NotFound,
        };

        let hidden = CaseError::PermissionDenied(denial).to_string();
        let missing = CaseError::InvalidCaseReference { case_id }.to_string();
        assert_eq!(hidden, missing);
    }

    #[test]
    fn forbidden_denial_names_the_action() {
        let denial = Denial {
            action: Action::Comment,
            case_id: CaseId::new(),
            actor: Actor::Doctor(DoctorId::new()),
            disclosure: DenialDisclosure::Forbidden,
        };
        let err = CaseError::PermissionDenied(denial);
        assert!(err.to_string().contains("comment"));
        assert!(err.to_string().contains("forbidden"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn denial_disclosure_defaults_to_not_found() {
        assert_eq!(DenialDisclosure::default(), DenialDisclosure::NotFound);
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_unknown_doctor_display() {
        let doctor_id = DoctorId::new();
        let err = CaseError::UnknownDoctor {
            doctor_id,
            reason: "not verified".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains(&doctor_id.to_string()));
        assert!(msg.contains("not verified"));
    }

    #[test]
    fn error_consistency_violation_display() {
        let case_id = CaseId::new();
        let err = CaseError::ConsistencyViolation {
            case_id,
            detail: "stale grant entry".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("inconsistent"));
        assert!(msg.contains("stale grant entry"));
    }

    #[test]
    fn discrepancy_display_distinguishes_public_entries() {
        let case_id = CaseId::new();
        let public = IndexDiscrepancy::Missing { doctor_id: None, case_id };
        assert!(public.to_string().contains("public"));

        let grant = IndexDiscrepancy::Stale {
            doctor_id: Some(DoctorId::new()),
            case_id,
        };
        assert!(grant.to_string().starts_with("stale grant"));
    }
}
