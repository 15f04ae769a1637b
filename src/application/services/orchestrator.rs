use chrono::Utc;

use crate::application::ports::{AudioFetchError, CacheError, SttError, StoreError};
use crate::domain::{GradeResult, GradingTask, Skill};

use super::rubric_grader::{GraderError, RubricGrader};
use super::transcription::{TranscriptionService, TranscriptionServiceError};

/// Dispatches a task to the writing or speaking path and reduces the rubric
/// grade to a final result. Every error carries its retry classification.
pub struct GradingOrchestrator {
    grader: RubricGrader,
    transcription: TranscriptionService,
}

impl GradingOrchestrator {
    pub fn new(grader: RubricGrader, transcription: TranscriptionService) -> Self {
        Self { grader, transcription }
    }

    pub async fn grade(&self, task: &GradingTask) -> Result<GradeResult, GradingError> {
        match task.skill {
            Skill::Writing => {
                let answer = task
                    .writing_answer()
                    .map_err(|e| GradingError::InvalidAnswer(e.to_string()))?;
                let grade = self
                    .grader
                    .grade_writing(&answer.text, &answer.task_type)
                    .await
                    .map_err(GradingError::Grader)?;
                Ok(GradeResult::from_writing(grade, Utc::now()))
            }
            Skill::Speaking => {
                let answer = task
                    .speaking_answer()
                    .map_err(|e| GradingError::InvalidAnswer(e.to_string()))?;
                let transcript = self.transcription.transcribe(&answer.audio_url).await?;
                let grade = self
                    .grader
                    .grade_speaking(&transcript, answer.part_number)
                    .await
                    .map_err(GradingError::Grader)?;
                Ok(GradeResult::from_speaking(grade, Utc::now()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Structurally invalid input; replay would not help. One attempt,
    /// marked failed, never dead-lettered.
    Permanent,
    /// Everything else: retried with backoff, dead-lettered on exhaustion.
    Transient,
}

#[derive(Debug, thiserror::Error)]
pub enum GradingError {
    #[error("invalid answer payload: {0}")]
    InvalidAnswer(String),
    #[error("audio download rejected with status {0}")]
    AudioRejected(u16),
    #[error("audio download failed: {0}")]
    AudioFetch(String),
    #[error("transcription failed: {0}")]
    Transcription(SttError),
    #[error("transcript cache failed: {0}")]
    Cache(CacheError),
    #[error("grading failed: {0}")]
    Grader(GraderError),
    #[error("result store failed: {0}")]
    Store(StoreError),
}

impl GradingError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GradingError::InvalidAnswer(_) | GradingError::AudioRejected(_) => {
                FailureKind::Permanent
            }
            _ => FailureKind::Transient,
        }
    }
}

impl From<TranscriptionServiceError> for GradingError {
    fn from(e: TranscriptionServiceError) -> Self {
        match e {
            TranscriptionServiceError::Fetch(AudioFetchError::Status { status })
                if (400..500).contains(&status) =>
            {
                GradingError::AudioRejected(status)
            }
            TranscriptionServiceError::Fetch(fetch) => GradingError::AudioFetch(fetch.to_string()),
            TranscriptionServiceError::Cache(cache) => GradingError::Cache(cache),
            TranscriptionServiceError::SpeechToText(stt) => GradingError::Transcription(stt),
        }
    }
}
