//! Scenario 3: Revocation and export
//!
//! The endocrinologist is mentioned on three cases. The patient revokes the
//! middle one. A report export naming all three is refused as a whole; an
//! export naming only the two still accessible cases goes through.

use caseshare_contracts::{error::CaseResult, ids::CaseId};

use crate::{mock_data::CASE_TITLES, scenarios::Harness};

pub fn run_scenario() -> CaseResult<()> {
    println!("=== Scenario 3: Revocation and Export ===");
    println!();

    let h = Harness::new()?;
    let patient = h.roster.patient;
    let doctor = h.roster.doctor(2);
    let name = h.roster.name_of(&doctor);

    let mut cases: Vec<CaseId> = Vec::with_capacity(CASE_TITLES.len());
    for _ in CASE_TITLES {
        let case_id = h.engine.open_case(patient, false)?;
        h.engine.mention_doctors(patient, case_id, &[doctor])?;
        cases.push(case_id);
    }
    println!(
        "  {} mentioned on {} cases; accessible: {}",
        name,
        cases.len(),
        h.engine.list_accessible_cases(doctor)?.len()
    );

    let revoked = h.engine.revoke_doctor_access(patient, cases[1], doctor)?;
    println!("  Patient revokes \"{}\": {}", CASE_TITLES[1], revoked);
    for (case_id, title) in cases.iter().zip(CASE_TITLES) {
        let exportable = h.engine.can_export(*case_id, doctor)?;
        println!("    {:<42} export {}", title, if exportable { "ALLOWED" } else { "DENIED" });
    }
    println!();

    match h.engine.authorize_export_batch(doctor, &cases) {
        Ok(()) => println!("  Export of all three cases: AUTHORIZED"),
        Err(e) => println!("  Export of all three cases: REFUSED ({})", e),
    }
    let remaining = [cases[0], cases[2]];
    h.engine.authorize_export_batch(doctor, &remaining)?;
    println!("  Export of the two remaining cases: AUTHORIZED");
    for (case_id, title) in cases.iter().zip(CASE_TITLES) {
        println!("    {:<42} exported {} time(s)", title, h.engine.export_count(*case_id)?);
    }

    println!();
    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_scenario;

    #[test]
    fn revocation_runs() {
        assert!(run_scenario().is_ok());
    }
}
