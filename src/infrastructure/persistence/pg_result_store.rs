use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ResultStore, StoreError};
use crate::domain::{review_route, GradeResult, GradingTask, SubmissionStatus};

/// Writes grading outcomes into Postgres: status/score/band on the
/// submission row plus the full result blob and feedback on the details
/// row, both inside one transaction.
pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    #[instrument(skip(self, result), fields(submission_id = %task.submission_id))]
    async fn save(&self, task: &GradingTask, result: &GradeResult) -> Result<(), StoreError> {
        let (status, priority) = review_route(result.confidence);
        let now = Utc::now();
        let completed_at = matches!(status, SubmissionStatus::Completed).then_some(now);

        let blob = serde_json::to_string(result)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE submissions
            SET status = $1::submission_status, score = $2, band = $3::vstep_band,
                grading_mode = 'auto', review_priority = $4::review_priority,
                completed_at = $5, updated_at = $6
            WHERE id = $7
            "#,
        )
        .bind(status.as_str())
        .bind(result.overall_score)
        .bind(result.band.map(|b| b.as_str()))
        .bind(priority.map(|p| p.as_str()))
        .bind(completed_at)
        .bind(now)
        .bind(task.submission_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE submission_details
            SET result = $1::jsonb, feedback = $2, updated_at = $3
            WHERE submission_id = $4
            "#,
        )
        .bind(&blob)
        .bind(&result.feedback)
        .bind(now)
        .bind(task.submission_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(submission_id = %submission_id))]
    async fn mark_failed(&self, submission_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE submissions
            SET status = 'failed', updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(submission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}
