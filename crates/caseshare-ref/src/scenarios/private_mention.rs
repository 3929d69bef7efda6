//! Scenario 1: Private mention
//!
//! A patient opens a private case and mentions one doctor, a doctor account
//! that was never verified, and a doctor id that does not exist. Only the
//! verified doctor gains access; the other two come back as per-doctor
//! errors without blocking the grant.

use caseshare_contracts::{
    access::Actor,
    error::CaseResult,
    ids::DoctorId,
    mention::MentionStatus,
};

use crate::{mock_data::CASE_TITLES, scenarios::Harness};

pub fn run_scenario() -> CaseResult<()> {
    println!("=== Scenario 1: Private Mention ===");
    println!();

    let h = Harness::new()?;
    let patient = h.roster.patient;
    let cardiologist = h.roster.doctor(0);
    let ghost = DoctorId::new();

    let case_id = h.engine.open_case(patient, false)?;
    println!("  Patient opens a private case.");
    h.print_access(case_id, CASE_TITLES[0])?;
    println!();

    println!("  Patient mentions three doctors:");
    let report = h
        .engine
        .mention_doctors(patient, case_id, &[cardiologist, h.roster.pending, ghost])?;
    for result in &report.results {
        let name = if result.doctor_id == ghost {
            "(nonexistent id)"
        } else {
            h.roster.name_of(&result.doctor_id)
        };
        match result.status {
            MentionStatus::Error => println!(
                "    {:<22} ERROR   {}",
                name,
                result.error.as_deref().unwrap_or("")
            ),
            status => println!("    {:<22} {:?}", name, status),
        }
    }
    println!(
        "  Partial failure: {} ({} granted, {} failed)",
        report.is_partial_failure(),
        report.succeeded().count(),
        report.failures().count()
    );
    println!();

    h.print_access(case_id, CASE_TITLES[0])?;
    println!();

    let inbox = h.engine.mentions_for(cardiologist)?;
    println!(
        "  {} inbox: {} mention(s), {} notification(s) delivered",
        h.roster.name_of(&cardiologist),
        inbox.len(),
        h.outbox.delivered_to(&cardiologist).len()
    );
    for event in &inbox {
        h.engine.mark_mention_read(cardiologist, event.id)?;
    }

    let comment = h.engine.authorize_comment(Actor::Doctor(cardiologist), case_id);
    let outsider = h.engine.authorize_comment(Actor::Doctor(h.roster.doctor(1)), case_id);
    println!(
        "  Comment by {}: {}",
        h.roster.name_of(&cardiologist),
        if comment.is_ok() { "ALLOWED" } else { "DENIED" }
    );
    match outsider {
        Ok(()) => println!("  Comment by {}: ALLOWED", h.roster.name_of(&h.roster.doctor(1))),
        Err(e) => println!("  Comment by {}: DENIED ({})", h.roster.name_of(&h.roster.doctor(1)), e),
    }

    println!();
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_scenario;

    #[test]
    fn private_mention_runs() {
        assert!(run_scenario().is_ok());
    }
}
