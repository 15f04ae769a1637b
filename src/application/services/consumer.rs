use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::application::ports::TaskQueue;
use crate::domain::GradingTask;

use super::retry::RetryExecutor;

/// Sequential blocking-pop loop: dequeue, process to completion, dequeue
/// next. One attempt in flight per worker process keeps rate-limit
/// pressure on the upstream providers bounded; scale-out is more workers.
pub struct QueueConsumer {
    queue: Arc<dyn TaskQueue>,
    executor: RetryExecutor,
    pop_timeout: Duration,
}

impl QueueConsumer {
    pub fn new(queue: Arc<dyn TaskQueue>, executor: RetryExecutor, pop_timeout: Duration) -> Self {
        Self {
            queue,
            executor,
            pop_timeout,
        }
    }

    /// Runs until shutdown is signalled. Shutdown stops new dequeues but an
    /// in-flight attempt always finishes: the shutdown branch is only
    /// selected while waiting on the pop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("grading worker started");

        loop {
            let popped = tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                popped = self.queue.pop(self.pop_timeout) => popped,
            };

            match popped {
                Ok(Some(raw)) => match serde_json::from_slice::<GradingTask>(&raw) {
                    Ok(task) => self.executor.execute(&task, &raw).await,
                    // Undecodable payloads cannot be correlated to a
                    // submission reliably enough to mark anything failed:
                    // log and drop.
                    Err(e) => {
                        tracing::error!(error = %e, "dropping undecodable task payload");
                    }
                },
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "queue pop failed");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }

        tracing::info!("grading worker stopped");
    }
}
