use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::application::ports::{CacheError, TranscriptCache};

/// Redis-backed transcript cache, keyed by content hash with a TTL.
pub struct RedisTranscriptCache {
    conn: ConnectionManager,
}

impl RedisTranscriptCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TranscriptCache for RedisTranscriptCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| CacheError::CommandFailed(e.to_string()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(key, value, ttl.as_secs())
            .await
            .map_err(|e| CacheError::CommandFailed(e.to_string()))?;
        Ok(())
    }
}
