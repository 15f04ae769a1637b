use super::rubric::Confidence;

/// Submission statuses the worker writes. The producer side owns the rest
/// of the status lifecycle (pending, queued, processing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Completed,
    ReviewPending,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::ReviewPending => "review_pending",
            SubmissionStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPriority {
    Medium,
    High,
}

impl ReviewPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewPriority::Medium => "medium",
            ReviewPriority::High => "high",
        }
    }
}

/// Route a graded submission by model confidence: high confidence completes
/// automatically, anything less is queued for human review, with lower
/// confidence given higher review priority.
pub fn review_route(confidence: Confidence) -> (SubmissionStatus, Option<ReviewPriority>) {
    match confidence {
        Confidence::High => (SubmissionStatus::Completed, None),
        Confidence::Medium => (SubmissionStatus::ReviewPending, Some(ReviewPriority::Medium)),
        Confidence::Low => (SubmissionStatus::ReviewPending, Some(ReviewPriority::High)),
    }
}
