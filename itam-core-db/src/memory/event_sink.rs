use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::audit::AuditEvent;
use crate::repository::AuditEventSink;

/// Collects published audit events; can be switched to fail every delivery
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditEventSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryAuditEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuditEventSink for MemoryAuditEventSink {
    async fn publish(
        &self,
        event: &AuditEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("Audit sink unavailable".into());
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}
