use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::domain::{SpeakingGrade, WritingGrade};

use super::prompts;

/// Builds the skill-specific rubric prompt, runs one schema-validated
/// completion through the model router, and parses the grade.
pub struct RubricGrader {
    llm: Arc<dyn LlmClient>,
}

impl RubricGrader {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn grade_writing(
        &self,
        text: &str,
        task_type: &str,
    ) -> Result<WritingGrade, GraderError> {
        let prompt = prompts::writing_prompt(text, task_type);
        let raw = self.llm.complete(&prompt).await.map_err(GraderError::Model)?;

        let grade: WritingGrade = serde_json::from_str(raw.trim())
            .map_err(|e| GraderError::InvalidResponse(e.to_string()))?;
        grade.validate().map_err(GraderError::InvalidResponse)?;

        tracing::debug!(
            task_achievement = grade.task_achievement,
            coherence_cohesion = grade.coherence_cohesion,
            lexical_resource = grade.lexical_resource,
            grammatical_range = grade.grammatical_range,
            "writing grade received"
        );
        Ok(grade)
    }

    pub async fn grade_speaking(
        &self,
        transcript: &str,
        part_number: u8,
    ) -> Result<SpeakingGrade, GraderError> {
        let prompt = prompts::speaking_prompt(transcript, part_number);
        let raw = self.llm.complete(&prompt).await.map_err(GraderError::Model)?;

        let grade: SpeakingGrade = serde_json::from_str(raw.trim())
            .map_err(|e| GraderError::InvalidResponse(e.to_string()))?;
        grade.validate().map_err(GraderError::InvalidResponse)?;

        tracing::debug!(
            fluency = grade.fluency,
            pronunciation = grade.pronunciation,
            content = grade.content,
            vocabulary = grade.vocabulary,
            "speaking grade received"
        );
        Ok(grade)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GraderError {
    #[error("model call failed: {0}")]
    Model(LlmClientError),
    #[error("response failed schema validation: {0}")]
    InvalidResponse(String),
}
