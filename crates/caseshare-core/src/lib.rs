//! # caseshare-core
//!
//! The case-level visibility and access-control engine.
//!
//! This crate provides:
//! - The collaborator traits (`AuditWriter`, `NotificationSink`)
//! - The Grant Log, the Access Index derived from it, and the Grant Manager
//!   that keeps the two in step
//! - The Case Visibility Policy and the authorizers built on it
//! - The Mention Dispatcher
//! - `CaseAccessEngine`, which owns the committed state and wires the
//!   pieces together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caseshare_core::{CaseAccessEngine, Outbox};
//!
//! let engine = CaseAccessEngine::new(config, Box::new(ledger), Box::new(Outbox::new()));
//! let case_id = engine.open_case(patient_id, false)?;
//! let report = engine.mention_doctors(patient_id, case_id, &[doctor_id])?;
//! assert!(engine.can_view(doctor_id, case_id)?);
//! ```

pub mod authorize;
pub mod dispatch;
pub mod engine;
pub mod grant_log;
pub mod grants;
pub mod index;
pub mod notify;
pub mod policy;
pub(crate) mod tables;
pub mod traits;

pub use engine::CaseAccessEngine;
pub use index::AccessIndex;
pub use notify::Outbox;
pub use traits::{AuditWriter, NotificationSink};
