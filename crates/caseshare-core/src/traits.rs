//! Collaborator traits at the engine boundary.
//!
//! - `AuditWriter`: trusted sink recording every state change and export decision
//! - `NotificationSink`: external delivery of mention events (fire-and-forget)
//!
//! The engine calls both only after the state transaction has committed and
//! the state lock has been released.

use std::sync::Arc;

use caseshare_contracts::{audit::AuditRecord, error::CaseResult, mention::MentionEvent};

/// The audit writer: the immutable access record.
///
/// Implementations must treat `write` as append-only. A failed write refuses
/// the export it was recording; for other records the failure is logged.
pub trait AuditWriter: Send + Sync {
    fn write(&self, record: &AuditRecord) -> CaseResult<()>;
}

/// Delivery of mention notifications to doctors.
///
/// Errors are reported back as plain strings and only logged: a notification
/// that fails to go out never undoes or fails the grant it announces.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &MentionEvent) -> Result<(), String>;
}

impl<T: AuditWriter + ?Sized> AuditWriter for Arc<T> {
    fn write(&self, record: &AuditRecord) -> CaseResult<()> {
        (**self).write(record)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, event: &MentionEvent) -> Result<(), String> {
        (**self).notify(event)
    }
}
