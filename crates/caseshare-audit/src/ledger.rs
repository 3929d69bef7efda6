//! In-memory access ledger.
//!
//! `InMemoryAuditLedger` is the reference `AuditWriter`. Entries live in a
//! `Vec` behind a `Mutex`; the engine writes through an `Arc` while the
//! owner keeps another handle to export or verify the chain.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, error};

use caseshare_config::AuditSettings;
use caseshare_contracts::{
    audit::AuditRecord,
    error::{CaseError, CaseResult},
    ids::CaseId,
};
use caseshare_core::traits::AuditWriter;

use crate::{
    chain::{first_break, hash_record},
    entry::{AuditEntry, AuditLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LedgerState {
    pub(crate) entries: Vec<AuditEntry>,
    pub(crate) next_sequence: u64,
    pub(crate) last_hash: String,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

pub struct InMemoryAuditLedger {
    ledger_id: String,
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl InMemoryAuditLedger {
    pub fn new(ledger_id: impl Into<String>) -> Self {
        Self {
            ledger_id: ledger_id.into(),
            state: Arc::new(Mutex::new(LedgerState {
                entries: Vec::new(),
                next_sequence: 0,
                last_hash: AuditEntry::GENESIS_HASH.to_string(),
            })),
        }
    }

    pub fn from_settings(settings: &AuditSettings) -> Self {
        Self::new(settings.ledger_id.clone())
    }

    pub fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    pub fn len(&self) -> usize {
        self.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every entry, with the current terminal hash.
    pub fn export_log(&self) -> CaseResult<AuditLog> {
        let state = self.lock()?;
        let terminal_hash = state
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        Ok(AuditLog {
            ledger_id: self.ledger_id.clone(),
            entries: state.entries.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        })
    }

    /// Entries that concern one case, in ledger order.
    pub fn records_for_case(&self, case_id: &CaseId) -> CaseResult<Vec<AuditEntry>> {
        let state = self.lock()?;
        Ok(state
            .entries
            .iter()
            .filter(|entry| entry.concerns(case_id))
            .cloned()
            .collect())
    }

    /// False if any entry was altered, removed or reordered in memory.
    pub fn verify_integrity(&self) -> bool {
        let Ok(state) = self.lock() else {
            return false;
        };
        match first_break(&state.entries) {
            None => true,
            Some(sequence) => {
                error!(ledger_id = %self.ledger_id, sequence, "audit chain broken");
                false
            }
        }
    }

    fn lock(&self) -> CaseResult<MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|e| CaseError::AuditWriteFailed {
            reason: format!("audit ledger lock poisoned: {}", e),
        })
    }
}

// ── AuditWriter impl ──────────────────────────────────────────────────────────

impl AuditWriter for InMemoryAuditLedger {
    fn write(&self, record: &AuditRecord) -> CaseResult<()> {
        let mut state = self.lock()?;

        let sequence = state.next_sequence;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_record(&self.ledger_id, sequence, record, &prev_hash)?;

        state.entries.push(AuditEntry {
            sequence,
            ledger_id: self.ledger_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.next_sequence += 1;
        state.last_hash = this_hash;

        debug!(ledger_id = %self.ledger_id, sequence, kind = ?record.kind, "audit entry appended");
        Ok(())
    }
}
