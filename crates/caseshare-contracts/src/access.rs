//! Access decision types.
//!
//! The Case Visibility Policy answers every doctor-facing question with one
//! predicate. These types describe what was asked, who asked, and how a
//! negative answer is disclosed to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{CaseId, DoctorId, PatientId};

/// The operation being authorized. Carried for logging and audit only; it
/// never changes the outcome for a doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Comment,
    Reply,
    Export,
    ManageSharing,
    ReadMention,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::View => "view",
            Action::Comment => "comment",
            Action::Reply => "reply",
            Action::Export => "export",
            Action::ManageSharing => "manage_sharing",
            Action::ReadMention => "read_mention",
        };
        f.write_str(name)
    }
}

/// Who is acting on a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "role", content = "id")]
pub enum Actor {
    Patient(PatientId),
    Doctor(DoctorId),
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Patient(id) => write!(f, "patient:{id}"),
            Actor::Doctor(id) => write!(f, "doctor:{id}"),
        }
    }
}

/// How a denial is reported to a caller with no qualifying access.
///
/// `NotFound` hides whether the case exists; `Forbidden` confirms it exists
/// but refuses access. The engine applies one mode to every path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DenialDisclosure {
    #[default]
    NotFound,
    Forbidden,
}

/// A refused request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    pub action: Action,
    pub case_id: CaseId,
    pub actor: Actor,
    pub disclosure: DenialDisclosure,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.disclosure {
            // Must read exactly like `CaseError::InvalidCaseReference`.
            DenialDisclosure::NotFound => write!(f, "case {} not found", self.case_id),
            DenialDisclosure::Forbidden => {
                write!(f, "{} on case {} is forbidden", self.action, self.case_id)
            }
        }
    }
}

/// Which subset of a doctor's accessible cases a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseScope {
    /// Public cases plus cases granted to the doctor.
    #[default]
    All,
    /// Only cases the doctor holds a live grant on.
    Mentioned,
    /// Only cases whose visibility flag is set.
    Public,
}

/// Counters for a doctor's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DoctorStats {
    pub accessible: usize,
    pub mentioned: usize,
    pub public: usize,
    pub unread_mentions: usize,
}

/// One disagreement between the Access Index and its source tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IndexDiscrepancy {
    /// The index lists a case the source tables do not authorize.
    Stale { doctor_id: Option<DoctorId>, case_id: CaseId },
    /// The source tables authorize a case the index does not list.
    Missing { doctor_id: Option<DoctorId>, case_id: CaseId },
}

impl fmt::Display for IndexDiscrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, doctor_id, case_id) = match self {
            IndexDiscrepancy::Stale { doctor_id, case_id } => ("stale", doctor_id, case_id),
            IndexDiscrepancy::Missing { doctor_id, case_id } => ("missing", doctor_id, case_id),
        };
        match doctor_id {
            Some(doctor) => write!(f, "{label} grant entry doctor={doctor} case={case_id}"),
            None => write!(f, "{label} public entry case={case_id}"),
        }
    }
}

/// Result of a full index consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub discrepancies: Vec<IndexDiscrepancy>,
    /// True when the index was rebuilt because of the discrepancies above.
    pub repaired: bool,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}
