//! Reference walkthroughs.
//!
//! Every scenario builds its own `Harness`: a fresh engine wired to an
//! in-memory ledger and outbox, configured from the bundled TOML, with the
//! fictional roster registered.

pub mod audit_trail;
pub mod private_mention;
pub mod public_toggle;
pub mod revocation;

use std::sync::Arc;

use caseshare_audit::InMemoryAuditLedger;
use caseshare_config::EngineConfig;
use caseshare_contracts::{error::CaseResult, ids::CaseId};
use caseshare_core::{CaseAccessEngine, Outbox};

use crate::mock_data::{register_roster, Roster};

/// Engine configuration shared by the walkthroughs.
pub const REFERENCE_CONFIG: &str = include_str!("../../config/caseshare.toml");

pub struct Harness {
    pub engine: CaseAccessEngine,
    pub ledger: Arc<InMemoryAuditLedger>,
    pub outbox: Outbox,
    pub roster: Roster,
}

impl Harness {
    pub fn new() -> CaseResult<Self> {
        Self::with_config(EngineConfig::from_toml_str(REFERENCE_CONFIG)?)
    }

    pub fn with_config(config: EngineConfig) -> CaseResult<Self> {
        let ledger = Arc::new(InMemoryAuditLedger::from_settings(&config.audit));
        let outbox = Outbox::new();
        let engine = CaseAccessEngine::new(
            config,
            Box::new(Arc::clone(&ledger)),
            Box::new(outbox.clone()),
        );
        let roster = register_roster(&engine)?;
        Ok(Self {
            engine,
            ledger,
            outbox,
            roster,
        })
    }

    /// Print one line per verified doctor saying whether they see the case.
    pub fn print_access(&self, case_id: CaseId, title: &str) -> CaseResult<()> {
        println!("  \"{}\"", title);
        for (name, doctor_id) in &self.roster.doctors {
            let visible = self.engine.can_view(*doctor_id, case_id)?;
            println!("    {:<22} {}", name, if visible { "VISIBLE" } else { "hidden" });
        }
        Ok(())
    }
}
