use serde::{Deserialize, Serialize};

/// The grading model's self-assessment of its own accuracy. Drives the
/// completed-vs-review routing of the persisted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Writing rubric grade as returned by the model. Field names match the
/// JSON schema embedded in the writing prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct WritingGrade {
    pub task_achievement: f64,
    pub coherence_cohesion: f64,
    pub lexical_resource: f64,
    pub grammatical_range: f64,
    pub feedback: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub grammar_errors: Option<Vec<String>>,
}

impl WritingGrade {
    pub fn criteria(&self) -> [f64; 4] {
        [
            self.task_achievement,
            self.coherence_cohesion,
            self.lexical_resource,
            self.grammatical_range,
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_criteria(&self.criteria())
    }
}

/// Speaking rubric grade as returned by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeakingGrade {
    pub fluency: f64,
    pub pronunciation: f64,
    pub content: f64,
    pub vocabulary: f64,
    pub feedback: String,
    pub confidence: Confidence,
}

impl SpeakingGrade {
    pub fn criteria(&self) -> [f64; 4] {
        [self.fluency, self.pronunciation, self.content, self.vocabulary]
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_criteria(&self.criteria())
    }
}

fn validate_criteria(criteria: &[f64; 4]) -> Result<(), String> {
    for value in criteria {
        if !value.is_finite() || !(0.0..=10.0).contains(value) {
            return Err(format!("criterion score {} out of range [0, 10]", value));
        }
    }
    Ok(())
}
