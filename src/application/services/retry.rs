use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{DeadLetterSink, ResultStore};
use crate::domain::{GradeResult, GradingTask};

use super::orchestrator::{FailureKind, GradingError, GradingOrchestrator};

/// Wraps orchestration with failure classification, exponential backoff and
/// dead-letter routing. A task is attempted at most `max_retries` times;
/// once classified permanent it is never retried.
pub struct RetryExecutor {
    orchestrator: GradingOrchestrator,
    store: Arc<dyn ResultStore>,
    dead_letter: Arc<dyn DeadLetterSink>,
    max_retries: u32,
}

impl RetryExecutor {
    pub fn new(
        orchestrator: GradingOrchestrator,
        store: Arc<dyn ResultStore>,
        dead_letter: Arc<dyn DeadLetterSink>,
        max_retries: u32,
    ) -> Self {
        Self {
            orchestrator,
            store,
            dead_letter,
            max_retries,
        }
    }

    /// Processes one task to completion. Every failure path is fully
    /// handled here; nothing propagates to the consumer loop.
    pub async fn execute(&self, task: &GradingTask, raw: &[u8]) {
        for attempt in 0..self.max_retries {
            match self.attempt(task).await {
                Ok(result) => {
                    tracing::info!(
                        submission_id = %task.submission_id,
                        skill = %task.skill,
                        score = result.overall_score,
                        "graded"
                    );
                    return;
                }
                Err(e) if e.kind() == FailureKind::Permanent => {
                    tracing::error!(
                        submission_id = %task.submission_id,
                        error = %e,
                        "permanent failure"
                    );
                    self.mark_failed(task).await;
                    return;
                }
                Err(e) => {
                    if attempt + 1 == self.max_retries {
                        tracing::error!(
                            submission_id = %task.submission_id,
                            error = %e,
                            "retries exhausted, dead-lettering"
                        );
                        self.mark_failed(task).await;
                        if let Err(dl) = self.dead_letter.push(raw).await {
                            tracing::error!(
                                submission_id = %task.submission_id,
                                error = %dl,
                                "failed to dead-letter payload"
                            );
                        }
                        return;
                    }
                    let backoff = Duration::from_secs(1u64 << attempt);
                    tracing::warn!(
                        submission_id = %task.submission_id,
                        attempt,
                        backoff_secs = backoff.as_secs(),
                        error = %e,
                        "transient failure, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// One grading attempt including persistence. A save failure counts as
    /// a transient attempt failure and goes back through the retry loop.
    async fn attempt(&self, task: &GradingTask) -> Result<GradeResult, GradingError> {
        let result = self.orchestrator.grade(task).await?;
        self.store
            .save(task, &result)
            .await
            .map_err(GradingError::Store)?;
        Ok(result)
    }

    async fn mark_failed(&self, task: &GradingTask) {
        if let Err(e) = self.store.mark_failed(task.submission_id).await {
            tracing::error!(
                submission_id = %task.submission_id,
                error = %e,
                "failed to mark submission failed"
            );
        }
    }
}
