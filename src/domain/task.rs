use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// A grading task as dispatched by the producer onto the task queue.
///
/// The `answer` payload stays opaque at decode time: its shape depends on
/// `skill`, and a malformed answer must surface as a permanent grading
/// failure (the submission gets marked failed), not as an undecodable
/// payload that would be dropped without a trace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingTask {
    #[serde(alias = "submission_id")]
    pub submission_id: Uuid,
    #[serde(alias = "question_id")]
    pub question_id: Uuid,
    pub skill: Skill,
    pub answer: serde_json::Value,
    #[serde(alias = "dispatched_at")]
    pub dispatched_at: DateTime<Utc>,
}

impl GradingTask {
    pub fn writing_answer(&self) -> Result<WritingAnswer, AnswerError> {
        serde_json::from_value(self.answer.clone()).map_err(|e| AnswerError(e.to_string()))
    }

    pub fn speaking_answer(&self) -> Result<SpeakingAnswer, AnswerError> {
        serde_json::from_value(self.answer.clone()).map_err(|e| AnswerError(e.to_string()))
    }
}

/// Gradeable skills. Closed set: a payload carrying any other skill fails
/// to decode and is dropped by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Writing,
    Speaking,
}

impl Skill {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Writing => "writing",
            Skill::Speaking => "speaking",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingAnswer {
    pub text: String,
    #[serde(alias = "word_count", default)]
    pub word_count: Option<u32>,
    #[serde(alias = "task_type", default = "default_task_type")]
    pub task_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingAnswer {
    #[serde(alias = "audio_url")]
    pub audio_url: String,
    #[serde(alias = "duration_seconds", default)]
    pub duration_seconds: Option<f64>,
    #[serde(alias = "part_number", default = "default_part_number")]
    pub part_number: u8,
}

fn default_task_type() -> String {
    "TASK_2_ESSAY".to_string()
}

fn default_part_number() -> u8 {
    1
}

#[derive(Debug, thiserror::Error)]
#[error("invalid answer payload: {0}")]
pub struct AnswerError(pub String);
