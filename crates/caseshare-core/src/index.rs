//! The Access Index: a materialized view of who may see which case.
//!
//! For each doctor the index holds, grouped by owning patient, the cases
//! granted to that doctor; alongside it, the set of public cases. A doctor's
//! accessible set is always `public ∪ granted(doctor)`.
//!
//! The index is never ground truth. `AccessIndex::rebuild` reconstructs it
//! from the Case table and the live rows of the Grant Log, and `diff` /
//! `diff_case` report where a maintained index has drifted from that rebuild.

use std::collections::{BTreeSet, HashMap, HashSet};

use caseshare_contracts::{
    access::IndexDiscrepancy,
    case::Case,
    grant::Grant,
    ids::{CaseId, DoctorId, PatientId},
};

/// One authorization entry: `(None, case)` for a public case,
/// `(Some(doctor), case)` for a grant.
type Entry = (Option<DoctorId>, CaseId);

#[derive(Debug, Clone, Default)]
pub struct AccessIndex {
    owners: HashMap<CaseId, PatientId>,
    public: HashSet<CaseId>,
    granted: HashMap<DoctorId, HashMap<PatientId, HashSet<CaseId>>>,
}

impl AccessIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh index from the source tables.
    ///
    /// Revoked grants and grants on unknown cases contribute nothing.
    pub fn rebuild<'a>(
        cases: impl IntoIterator<Item = &'a Case>,
        grants: impl IntoIterator<Item = &'a Grant>,
    ) -> Self {
        let mut index = Self::new();
        for case in cases {
            index.register_case(case.id, case.patient_id, case.visible_to_doctors);
        }
        for grant in grants.into_iter().filter(|g| g.is_live()) {
            index.add_grant(grant.doctor_id, grant.case_id);
        }
        index
    }

    // ── Maintenance (called inside the state write transaction) ─────────────

    pub(crate) fn register_case(&mut self, case_id: CaseId, patient_id: PatientId, public: bool) {
        self.owners.insert(case_id, patient_id);
        self.set_public(case_id, public);
    }

    pub(crate) fn set_public(&mut self, case_id: CaseId, public: bool) {
        if public {
            self.public.insert(case_id);
        } else {
            self.public.remove(&case_id);
        }
    }

    /// Record a live grant. Returns false if the case is not registered.
    pub(crate) fn add_grant(&mut self, doctor_id: DoctorId, case_id: CaseId) -> bool {
        let Some(patient_id) = self.owners.get(&case_id).copied() else {
            return false;
        };
        self.granted
            .entry(doctor_id)
            .or_default()
            .entry(patient_id)
            .or_default()
            .insert(case_id);
        true
    }

    /// Drop a grant entry, pruning empty groups so a fresh rebuild and a
    /// maintained index hold the same shape.
    pub(crate) fn remove_grant(&mut self, doctor_id: DoctorId, case_id: CaseId) -> bool {
        let Some(patient_id) = self.owners.get(&case_id).copied() else {
            return false;
        };
        let Some(by_patient) = self.granted.get_mut(&doctor_id) else {
            return false;
        };
        let removed = match by_patient.get_mut(&patient_id) {
            Some(cases) => {
                let removed = cases.remove(&case_id);
                if cases.is_empty() {
                    by_patient.remove(&patient_id);
                }
                removed
            }
            None => false,
        };
        if by_patient.is_empty() {
            self.granted.remove(&doctor_id);
        }
        removed
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// O(1) membership test: is `case_id` in `accessible_cases(doctor_id)`?
    pub fn is_accessible(&self, doctor_id: &DoctorId, case_id: &CaseId) -> bool {
        self.is_public(case_id) || self.is_granted(doctor_id, case_id)
    }

    /// True when the doctor holds a live grant on the case.
    pub fn is_granted(&self, doctor_id: &DoctorId, case_id: &CaseId) -> bool {
        let Some(patient_id) = self.owners.get(case_id) else {
            return false;
        };
        self.granted
            .get(doctor_id)
            .and_then(|by_patient| by_patient.get(patient_id))
            .is_some_and(|cases| cases.contains(case_id))
    }

    pub fn is_public(&self, case_id: &CaseId) -> bool {
        self.public.contains(case_id)
    }

    /// `public_cases() ∪ granted_cases(doctor_id)`, deduplicated.
    pub fn accessible_cases(&self, doctor_id: &DoctorId) -> BTreeSet<CaseId> {
        let mut cases = self.public_cases();
        cases.extend(self.granted_cases(doctor_id));
        cases
    }

    pub fn public_cases(&self) -> BTreeSet<CaseId> {
        self.public.iter().copied().collect()
    }

    pub fn granted_cases(&self, doctor_id: &DoctorId) -> BTreeSet<CaseId> {
        self.granted
            .get(doctor_id)
            .into_iter()
            .flat_map(|by_patient| by_patient.values())
            .flatten()
            .copied()
            .collect()
    }

    // ── Consistency ──────────────────────────────────────────────────────────

    fn entries(&self) -> BTreeSet<Entry> {
        let public = self.public.iter().map(|case_id| (None, *case_id));
        let granted = self.granted.iter().flat_map(|(doctor_id, by_patient)| {
            by_patient
                .values()
                .flatten()
                .map(move |case_id| (Some(*doctor_id), *case_id))
        });
        public.chain(granted).collect()
    }

    /// Every entry where this index disagrees with `expected`.
    pub fn diff(&self, expected: &AccessIndex) -> Vec<IndexDiscrepancy> {
        let actual = self.entries();
        let wanted = expected.entries();
        discrepancies(&actual, &wanted)
    }

    /// Disagreements for a single case against the expected public flag and
    /// the doctors holding live grants on it.
    pub fn diff_case(
        &self,
        case_id: &CaseId,
        expected_public: bool,
        expected_doctors: &HashSet<DoctorId>,
    ) -> Vec<IndexDiscrepancy> {
        let mut actual = BTreeSet::new();
        if self.is_public(case_id) {
            actual.insert((None, *case_id));
        }
        for doctor_id in self.granted.keys() {
            if self.is_granted(doctor_id, case_id) {
                actual.insert((Some(*doctor_id), *case_id));
            }
        }

        let mut wanted = BTreeSet::new();
        if expected_public {
            wanted.insert((None, *case_id));
        }
        wanted.extend(expected_doctors.iter().map(|d| (Some(*d), *case_id)));

        discrepancies(&actual, &wanted)
    }
}

fn discrepancies(actual: &BTreeSet<Entry>, wanted: &BTreeSet<Entry>) -> Vec<IndexDiscrepancy> {
    let stale = actual
        .difference(wanted)
        .map(|(doctor_id, case_id)| IndexDiscrepancy::Stale {
            doctor_id: *doctor_id,
            case_id: *case_id,
        });
    let missing = wanted
        .difference(actual)
        .map(|(doctor_id, case_id)| IndexDiscrepancy::Missing {
            doctor_id: *doctor_id,
            case_id: *case_id,
        });
    stale.chain(missing).collect()
}
