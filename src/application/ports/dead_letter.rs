use async_trait::async_trait;

use super::QueueError;

/// Holding queue for payloads whose processing exhausted its retry budget.
/// The payload must be pushed verbatim so it can be replayed offline
/// without re-serialization.
#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn push(&self, payload: &[u8]) -> Result<(), QueueError>;
}
