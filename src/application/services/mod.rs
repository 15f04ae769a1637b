mod consumer;
mod orchestrator;
pub mod prompts;
mod retry;
mod rubric_grader;
mod transcription;

pub use consumer::QueueConsumer;
pub use orchestrator::{FailureKind, GradingError, GradingOrchestrator};
pub use retry::RetryExecutor;
pub use rubric_grader::{GraderError, RubricGrader};
pub use transcription::{transcript_cache_key, TranscriptionService, TranscriptionServiceError, TRANSCRIPT_TTL};
