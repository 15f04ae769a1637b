use std::time::Duration;

use async_trait::async_trait;

/// Blocking-pop task source. `pop` waits up to `timeout` for a payload;
/// `None` means the wait timed out, which is not an error.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn pop(&self, timeout: Duration) -> Result<Option<Vec<u8>>, QueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}
