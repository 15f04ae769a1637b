use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::application::ports::{DeadLetterSink, QueueError, TaskQueue};

/// Opens a managed Redis connection shared by the queue and the transcript
/// cache. The manager reconnects on its own; it is opened once at startup.
pub async fn connect(url: &str) -> Result<ConnectionManager, QueueError> {
    let client =
        redis::Client::open(url).map_err(|e| QueueError::ConnectionFailed(e.to_string()))?;
    let manager = ConnectionManager::new(client)
        .await
        .map_err(|e| QueueError::ConnectionFailed(e.to_string()))?;
    tracing::info!("redis connection established");
    Ok(manager)
}

/// List-backed task queue. The producer LPUSHes JSON payloads; the worker
/// BRPOPs with a bounded timeout. Exhausted payloads go verbatim onto a
/// separate dead-letter list for offline replay.
pub struct RedisTaskQueue {
    conn: ConnectionManager,
    queue_key: String,
    dead_letter_key: String,
}

impl RedisTaskQueue {
    pub fn new(conn: ConnectionManager, queue_key: String, dead_letter_key: String) -> Self {
        Self {
            conn,
            queue_key,
            dead_letter_key,
        }
    }
}

#[async_trait]
impl TaskQueue for RedisTaskQueue {
    async fn pop(&self, timeout: Duration) -> Result<Option<Vec<u8>>, QueueError> {
        let mut conn = self.conn.clone();
        let reply: Option<(String, Vec<u8>)> = conn
            .brpop(&self.queue_key, timeout.as_secs_f64())
            .await
            .map_err(|e| QueueError::CommandFailed(e.to_string()))?;
        Ok(reply.map(|(_key, payload)| payload))
    }
}

#[async_trait]
impl DeadLetterSink for RedisTaskQueue {
    async fn push(&self, payload: &[u8]) -> Result<(), QueueError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .lpush(&self.dead_letter_key, payload)
            .await
            .map_err(|e| QueueError::CommandFailed(e.to_string()))?;
        Ok(())
    }
}
