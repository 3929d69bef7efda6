//! In-memory notification outbox.
//!
//! `Outbox` is the reference `NotificationSink`: it records every delivered
//! mention event. Clones share the same buffer, so a caller can hand one
//! clone to the engine and keep another to inspect deliveries.

use std::sync::{Arc, Mutex};

use caseshare_contracts::{ids::DoctorId, mention::MentionEvent};

use crate::traits::NotificationSink;

#[derive(Debug, Clone, Default)]
pub struct Outbox {
    delivered: Arc<Mutex<Vec<MentionEvent>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event delivered so far, in delivery order.
    pub fn delivered(&self) -> Vec<MentionEvent> {
        self.delivered
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events addressed to one doctor.
    pub fn delivered_to(&self, doctor_id: &DoctorId) -> Vec<MentionEvent> {
        self.delivered()
            .into_iter()
            .filter(|event| event.addresses(doctor_id))
            .collect()
    }
}

impl NotificationSink for Outbox {
    fn notify(&self, event: &MentionEvent) -> Result<(), String> {
        let mut events = self
            .delivered
            .lock()
            .map_err(|e| format!("outbox lock poisoned: {}", e))?;
        events.push(event.clone());
        Ok(())
    }
}
