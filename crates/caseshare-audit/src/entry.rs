//! Ledger entry and export types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use caseshare_contracts::{audit::AuditRecord, ids::CaseId};

/// One position in the access ledger's hash chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the ledger, starting at 0.
    pub sequence: u64,
    pub ledger_id: String,
    pub record: AuditRecord,
    /// `this_hash` of the previous entry, or `GENESIS_HASH` at position 0.
    pub prev_hash: String,
    pub this_hash: String,
}

impl AuditEntry {
    /// Sentinel `prev_hash` of the first entry: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    pub fn concerns(&self, case_id: &CaseId) -> bool {
        self.record.concerns(case_id)
    }
}

/// A snapshot of the ledger, as handed to compliance tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub ledger_id: String,
    pub entries: Vec<AuditEntry>,
    pub exported_at: DateTime<Utc>,
    /// `this_hash` of the last entry; empty when the ledger is empty.
    pub terminal_hash: String,
}
