use async_trait::async_trait;

use crate::models::audit::AuditEvent;

/// Destination for centralized audit events
///
/// Events are published after the operation's transaction has committed. A failing
/// sink is logged by the caller and never rolls anything back.
#[async_trait]
pub trait AuditEventSink: Send + Sync {
    async fn publish(
        &self,
        event: &AuditEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
