//! # caseshare-audit
//!
//! Append-only, SHA-256 hash-chained access ledger for the caseshare engine.
//!
//! Every record the engine writes (case registration, visibility change,
//! grant, revocation, mention, view and export decision, index repair) is
//! wrapped in an `AuditEntry` linked to its predecessor by hash. Altering any
//! entry breaks the chain and `verify_integrity` reports it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use caseshare_audit::InMemoryAuditLedger;
//!
//! let ledger = Arc::new(InMemoryAuditLedger::from_settings(&config.audit));
//! let engine = CaseAccessEngine::new(config, Box::new(Arc::clone(&ledger)), Box::new(outbox));
//! // ...
//! assert!(ledger.verify_integrity());
//! let log = ledger.export_log()?;
//! ```

pub mod chain;
pub mod entry;
pub mod ledger;

pub use chain::{first_break, hash_record, verify_chain};
pub use entry::{AuditEntry, AuditLog};
pub use ledger::InMemoryAuditLedger;

// ── Tests ─────────────────────────────────────────────────────────────────────
