use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{GradeResult, GradingTask};

/// Persistence for grading outcomes. `save` is an overwrite keyed by
/// submission id, so replaying a task is idempotent.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, task: &GradingTask, result: &GradeResult) -> Result<(), StoreError>;

    async fn mark_failed(&self, submission_id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}
