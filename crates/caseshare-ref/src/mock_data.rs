//! Fictional people for the reference walkthroughs.
//!
//! Names and specialties are invented. Patients are plain ids; the engine
//! never stores personal details.

use caseshare_contracts::{
    error::CaseResult,
    ids::{DoctorId, PatientId},
};
use caseshare_core::CaseAccessEngine;

/// Verified doctors registered for every scenario, as (name, specialty).
pub const DOCTORS: [(&str, &str); 3] = [
    ("Dr. Amara Lindqvist", "cardiology"),
    ("Dr. Tomasz Okonkwo", "dermatology"),
    ("Dr. Priya Halvorsen", "endocrinology"),
];

/// A doctor account that signed up but was never verified.
pub const PENDING_DOCTOR: &str = "Dr. Felix Marchetti";

/// Short labels for the cases a scenario opens, in opening order.
pub const CASE_TITLES: [&str; 3] = [
    "Recurring chest tightness after exercise",
    "Persistent rash on forearm",
    "Fatigue and elevated fasting glucose",
];

pub struct Roster {
    pub patient: PatientId,
    /// Verified doctors, in `DOCTORS` order.
    pub doctors: Vec<(String, DoctorId)>,
    pub pending: DoctorId,
}

impl Roster {
    pub fn doctor(&self, idx: usize) -> DoctorId {
        self.doctors[idx].1
    }

    pub fn name_of(&self, doctor_id: &DoctorId) -> &str {
        if *doctor_id == self.pending {
            return PENDING_DOCTOR;
        }
        self.doctors
            .iter()
            .find(|(_, id)| id == doctor_id)
            .map(|(name, _)| name.as_str())
            .unwrap_or("unknown doctor")
    }
}

/// Register the fictional doctors (verifying all but the pending one) and
/// pick a fresh patient id.
pub fn register_roster(engine: &CaseAccessEngine) -> CaseResult<Roster> {
    let mut doctors = Vec::with_capacity(DOCTORS.len());
    for (name, specialty) in DOCTORS {
        let id = engine.register_doctor(format!("{name} ({specialty})"))?;
        engine.set_doctor_verified(id, true)?;
        doctors.push((name.to_string(), id));
    }
    let pending = engine.register_doctor(PENDING_DOCTOR)?;

    Ok(Roster {
        patient: PatientId::new(),
        doctors,
        pending,
    })
}
