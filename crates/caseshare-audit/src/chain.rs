//! Hash-chain primitives for the access ledger.
//!
//! Hash input layout (bytes, in order):
//!   1. ledger_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the audit record

use sha2::{Digest, Sha256};

use caseshare_contracts::{
    audit::AuditRecord,
    error::{CaseError, CaseResult},
};

use crate::entry::AuditEntry;

/// SHA-256 over one ledger position. Returns lowercase hex.
pub fn hash_record(
    ledger_id: &str,
    sequence: u64,
    record: &AuditRecord,
    prev_hash: &str,
) -> CaseResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| CaseError::AuditWriteFailed {
        reason: format!("audit record not serializable: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(ledger_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Sequence number of the first entry that breaks the chain, if any.
///
/// An entry breaks the chain when its `prev_hash` is not the previous
/// entry's `this_hash` (or `GENESIS_HASH` at position 0), when its sequence
/// is out of place, or when its `this_hash` does not match a recomputation.
pub fn first_break(entries: &[AuditEntry]) -> Option<u64> {
    let mut expected_prev = AuditEntry::GENESIS_HASH;

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return Some(entry.sequence);
        }
        let recomputed = hash_record(&entry.ledger_id, entry.sequence, &entry.record, &entry.prev_hash);
        match recomputed {
            Ok(hash) if hash == entry.this_hash => {}
            _ => return Some(entry.sequence),
        }
        expected_prev = entry.this_hash.as_str();
    }
    None
}

/// True when every entry links to its predecessor and hashes correctly.
/// An empty chain is valid.
pub fn verify_chain(entries: &[AuditEntry]) -> bool {
    first_break(entries).is_none()
}
