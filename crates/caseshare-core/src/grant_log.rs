//! The Grant Log: one row per (case, doctor) pair, ever.
//!
//! This is a leaf data structure. Rows are appended by `GrantManager` and
//! afterwards only their `revoked` flag changes. The pair index enforces the
//! uniqueness constraint: a second row for the same pair cannot be inserted.

use std::collections::HashMap;

use chrono::Utc;

use caseshare_contracts::{
    grant::Grant,
    ids::{CaseId, DoctorId, GrantId},
};

#[derive(Debug, Clone, Default)]
pub struct GrantLog {
    rows: Vec<Grant>,
    by_pair: HashMap<(CaseId, DoctorId), usize>,
    by_case: HashMap<CaseId, Vec<usize>>,
}

impl GrantLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The row for `(case_id, doctor_id)`, revoked or not.
    pub fn get(&self, case_id: &CaseId, doctor_id: &DoctorId) -> Option<&Grant> {
        self.by_pair
            .get(&(*case_id, *doctor_id))
            .map(|&idx| &self.rows[idx])
    }

    /// All rows for one case, in insertion order.
    pub fn for_case<'a>(&'a self, case_id: &CaseId) -> impl Iterator<Item = &'a Grant> + 'a {
        self.by_case
            .get(case_id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.rows[idx])
    }

    /// Every non-revoked row.
    pub fn live(&self) -> impl Iterator<Item = &Grant> {
        self.rows.iter().filter(|g| g.is_live())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a live row for the pair.
    ///
    /// Returns `None` without touching the log if a row for the pair already
    /// exists; callers must flip that row instead.
    pub(crate) fn insert(&mut self, case_id: CaseId, doctor_id: DoctorId) -> Option<&Grant> {
        if self.by_pair.contains_key(&(case_id, doctor_id)) {
            return None;
        }
        let now = Utc::now();
        let idx = self.rows.len();
        self.rows.push(Grant {
            id: GrantId::new(),
            case_id,
            doctor_id,
            created_at: now,
            revoked: false,
            updated_at: now,
        });
        self.by_pair.insert((case_id, doctor_id), idx);
        self.by_case.entry(case_id).or_default().push(idx);
        Some(&self.rows[idx])
    }

    /// Set the `revoked` flag of an existing row. Returns the updated row.
    pub(crate) fn set_revoked(
        &mut self,
        case_id: &CaseId,
        doctor_id: &DoctorId,
        revoked: bool,
    ) -> Option<&Grant> {
        let idx = *self.by_pair.get(&(*case_id, *doctor_id))?;
        let row = &mut self.rows[idx];
        if row.revoked != revoked {
            row.revoked = revoked;
            row.updated_at = Utc::now();
        }
        Some(&self.rows[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_enforces_pair_uniqueness() {
        let mut log = GrantLog::new();
        let case_id = CaseId::new();
        let doctor_id = DoctorId::new();

        let first = log.insert(case_id, doctor_id).map(|g| g.id);
        assert!(first.is_some());
        assert!(log.insert(case_id, doctor_id).is_none());
        assert_eq!(log.len(), 1);
        assert_eq!(log.get(&case_id, &doctor_id).map(|g| g.id), first);
    }

    #[test]
    fn set_revoked_flips_in_place() {
        let mut log = GrantLog::new();
        let case_id = CaseId::new();
        let doctor_id = DoctorId::new();
        let id = log.insert(case_id, doctor_id).map(|g| g.id);

        let revoked = log.set_revoked(&case_id, &doctor_id, true).cloned().unwrap();
        assert!(revoked.revoked);
        assert_eq!(Some(revoked.id), id);
        assert_eq!(log.live().count(), 0);
        assert_eq!(log.len(), 1);

        assert!(log.set_revoked(&case_id, &DoctorId::new(), true).is_none());
    }

    #[test]
    fn for_case_only_returns_that_case() {
        let mut log = GrantLog::new();
        let c1 = CaseId::new();
        let c2 = CaseId::new();
        let d = DoctorId::new();
        log.insert(c1, d);
        log.insert(c2, d);
        log.insert(c1, DoctorId::new());

        assert_eq!(log.for_case(&c1).count(), 2);
        assert!(log.for_case(&c2).all(|g| g.case_id == c2));
        assert_eq!(log.for_case(&CaseId::new()).count(), 0);
    }
}
