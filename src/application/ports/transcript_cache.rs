use std::time::Duration;

use async_trait::async_trait;

/// String-valued cache with per-key TTL. Writes are last-writer-wins; a
/// duplicate transcription on a cross-process race is wasteful but correct.
#[async_trait]
pub trait TranscriptCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("command failed: {0}")]
    CommandFailed(String),
}
