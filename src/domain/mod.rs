mod grade_result;
mod rubric;
mod scoring;
mod status;
mod task;

pub use grade_result::{Band, GradeResult};
pub use rubric::{Confidence, SpeakingGrade, WritingGrade};
pub use scoring::{band_for, snap_score};
pub use status::{review_route, ReviewPriority, SubmissionStatus};
pub use task::{AnswerError, GradingTask, Skill, SpeakingAnswer, WritingAnswer};
