use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::rubric::{Confidence, SpeakingGrade, WritingGrade};
use super::scoring::{band_for, snap_score};

/// Proficiency band derived from the snapped overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    C1,
    B2,
    B1,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::C1 => "C1",
            Band::B2 => "B2",
            Band::B1 => "B1",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final grading outcome persisted alongside the submission. Serialized
/// camelCase: this struct is the `result` blob the rest of the system reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    pub overall_score: f64,
    pub band: Option<Band>,
    pub criteria_scores: BTreeMap<String, f64>,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar_errors: Option<Vec<String>>,
    pub confidence: Confidence,
    pub graded_at: DateTime<Utc>,
}

/// Stable public criterion names, distinct from the snake_case attributes
/// the model fills in.
const WRITING_CRITERIA: [&str; 4] = [
    "taskAchievement",
    "coherenceCohesion",
    "lexicalResource",
    "grammaticalRange",
];

const SPEAKING_CRITERIA: [&str; 4] = ["fluency", "pronunciation", "content", "vocabulary"];

impl GradeResult {
    pub fn from_writing(grade: WritingGrade, graded_at: DateTime<Utc>) -> Self {
        Self::from_criteria(
            &WRITING_CRITERIA,
            grade.criteria(),
            grade.feedback,
            grade.grammar_errors,
            grade.confidence,
            graded_at,
        )
    }

    pub fn from_speaking(grade: SpeakingGrade, graded_at: DateTime<Utc>) -> Self {
        Self::from_criteria(
            &SPEAKING_CRITERIA,
            grade.criteria(),
            grade.feedback,
            None,
            grade.confidence,
            graded_at,
        )
    }

    fn from_criteria(
        names: &[&str; 4],
        values: [f64; 4],
        feedback: String,
        grammar_errors: Option<Vec<String>>,
        confidence: Confidence,
        graded_at: DateTime<Utc>,
    ) -> Self {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let overall_score = snap_score(mean);

        Self {
            overall_score,
            band: band_for(overall_score),
            criteria_scores: names
                .iter()
                .zip(values)
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            feedback,
            grammar_errors,
            confidence,
            graded_at,
        }
    }
}
