mod redis_cache;
mod redis_queue;

pub use redis_cache::RedisTranscriptCache;
pub use redis_queue::{connect, RedisTaskQueue};
