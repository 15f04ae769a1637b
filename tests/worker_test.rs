use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use grading_worker::application::ports::{
    AudioFetchError, AudioFetcher, CacheError, DeadLetterSink, LlmClient, LlmClientError,
    QueueError, ResultStore, SpeechToText, SttError, StoreError, TaskQueue, TranscriptCache,
};
use grading_worker::application::services::{
    FailureKind, GradingError, GradingOrchestrator, QueueConsumer, RetryExecutor, RubricGrader,
    TranscriptionService, TranscriptionServiceError,
};
use grading_worker::domain::{GradeResult, GradingTask};

const VALID_WRITING_RESPONSE: &str = r#"{
    "task_achievement": 8.0,
    "coherence_cohesion": 7.0,
    "lexical_resource": 6.5,
    "grammatical_range": 7.5,
    "feedback": "Well structured",
    "confidence": "high"
}"#;

struct ScriptedLlm {
    response: String,
    calls: AtomicU32,
}

impl ScriptedLlm {
    fn new(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: response.to_string(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

struct FailingLlm {
    calls: AtomicU32,
}

impl FailingLlm {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(LlmClientError::RateLimited)
    }
}

struct UnusedFetcher;

#[async_trait::async_trait]
impl AudioFetcher for UnusedFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, AudioFetchError> {
        Err(AudioFetchError::Transport("not wired in this test".to_string()))
    }
}

struct UnusedCache;

#[async_trait::async_trait]
impl TranscriptCache for UnusedCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }
}

struct UnusedStt;

#[async_trait::async_trait]
impl SpeechToText for UnusedStt {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String, SttError> {
        Err(SttError::ApiRequestFailed("not wired in this test".to_string()))
    }
}

#[derive(Default)]
struct RecordingStore {
    saved: Mutex<Vec<(Uuid, f64)>>,
    failed: Mutex<Vec<Uuid>>,
}

#[async_trait::async_trait]
impl ResultStore for RecordingStore {
    async fn save(&self, task: &GradingTask, result: &GradeResult) -> Result<(), StoreError> {
        self.saved
            .lock()
            .unwrap()
            .push((task.submission_id, result.overall_score));
        Ok(())
    }

    async fn mark_failed(&self, submission_id: Uuid) -> Result<(), StoreError> {
        self.failed.lock().unwrap().push(submission_id);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingDlq {
    payloads: Mutex<Vec<Vec<u8>>>,
}

#[async_trait::async_trait]
impl DeadLetterSink for RecordingDlq {
    async fn push(&self, payload: &[u8]) -> Result<(), QueueError> {
        self.payloads.lock().unwrap().push(payload.to_vec());
        Ok(())
    }
}

fn executor(
    llm: Arc<dyn LlmClient>,
    store: Arc<RecordingStore>,
    dead_letter: Arc<RecordingDlq>,
    max_retries: u32,
) -> RetryExecutor {
    let orchestrator = GradingOrchestrator::new(
        RubricGrader::new(llm),
        TranscriptionService::new(Arc::new(UnusedFetcher), Arc::new(UnusedCache), Arc::new(UnusedStt)),
    );
    RetryExecutor::new(orchestrator, store, dead_letter, max_retries)
}

fn writing_task() -> (GradingTask, Vec<u8>) {
    let raw = br#"{
        "submissionId": "5a2f8d7e-1c4b-4f6a-9d3e-8b7c6a5d4e3f",
        "questionId": "0e1d2c3b-4a59-4687-9594-a3b2c1d0e9f8",
        "skill": "writing",
        "answer": {"text": "An essay about city life"},
        "dispatchedAt": "2026-01-01T00:00:00Z"
    }"#
    .to_vec();
    (serde_json::from_slice(&raw).unwrap(), raw)
}

fn speaking_task_without_audio_url() -> (GradingTask, Vec<u8>) {
    let raw = br#"{
        "submissionId": "5a2f8d7e-1c4b-4f6a-9d3e-8b7c6a5d4e3f",
        "questionId": "0e1d2c3b-4a59-4687-9594-a3b2c1d0e9f8",
        "skill": "speaking",
        "answer": {"durationSeconds": 45.0},
        "dispatchedAt": "2026-01-01T00:00:00Z"
    }"#
    .to_vec();
    (serde_json::from_slice(&raw).unwrap(), raw)
}

#[tokio::test]
async fn given_successful_attempt_then_result_is_saved_once() {
    let llm = ScriptedLlm::new(VALID_WRITING_RESPONSE);
    let store = Arc::new(RecordingStore::default());
    let dlq = Arc::new(RecordingDlq::default());
    let executor = executor(llm.clone(), store.clone(), dlq.clone(), 3);
    let (task, raw) = writing_task();

    executor.execute(&task, &raw).await;

    let saved = store.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, task.submission_id);
    // mean of 8.0/7.0/6.5/7.5 is 7.25, snapped half-to-even
    assert_eq!(saved[0].1, 7.0);
    assert!(store.failed.lock().unwrap().is_empty());
    assert!(dlq.payloads.lock().unwrap().is_empty());
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn given_persistent_transient_failure_then_budget_is_spent_and_payload_dead_lettered() {
    let llm = FailingLlm::new();
    let store = Arc::new(RecordingStore::default());
    let dlq = Arc::new(RecordingDlq::default());
    let executor = executor(llm.clone(), store.clone(), dlq.clone(), 3);
    let (task, raw) = writing_task();

    executor.execute(&task, &raw).await;

    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    assert!(store.saved.lock().unwrap().is_empty());
    assert_eq!(store.failed.lock().unwrap().as_slice(), &[task.submission_id]);
    // the original bytes go to the dead-letter queue verbatim
    assert_eq!(dlq.payloads.lock().unwrap().as_slice(), &[raw]);
}

#[tokio::test]
async fn given_permanent_failure_then_single_attempt_and_no_dead_letter() {
    let llm = FailingLlm::new();
    let store = Arc::new(RecordingStore::default());
    let dlq = Arc::new(RecordingDlq::default());
    let executor = executor(llm.clone(), store.clone(), dlq.clone(), 3);
    let (task, raw) = speaking_task_without_audio_url();

    executor.execute(&task, &raw).await;

    // answer extraction rejects before any model call
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.failed.lock().unwrap().as_slice(), &[task.submission_id]);
    assert!(dlq.payloads.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn given_intermittent_failure_then_retry_eventually_succeeds() {
    struct FlakyLlm {
        calls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl LlmClient for FlakyLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(LlmClientError::ApiRequestFailed("status 500".to_string()))
            } else {
                Ok(VALID_WRITING_RESPONSE.to_string())
            }
        }
    }

    let llm = Arc::new(FlakyLlm {
        calls: AtomicU32::new(0),
    });
    let store = Arc::new(RecordingStore::default());
    let dlq = Arc::new(RecordingDlq::default());
    let executor = executor(llm.clone(), store.clone(), dlq.clone(), 3);
    let (task, raw) = writing_task();

    executor.execute(&task, &raw).await;

    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    assert_eq!(store.saved.lock().unwrap().len(), 1);
    assert!(store.failed.lock().unwrap().is_empty());
    assert!(dlq.payloads.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn given_save_failures_then_attempts_are_retried_and_payload_dead_lettered() {
    struct FailingSaveStore {
        save_attempts: AtomicU32,
        failed: Mutex<Vec<Uuid>>,
    }

    #[async_trait::async_trait]
    impl ResultStore for FailingSaveStore {
        async fn save(&self, _task: &GradingTask, _result: &GradeResult) -> Result<(), StoreError> {
            self.save_attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::QueryFailed("connection reset".to_string()))
        }

        async fn mark_failed(&self, submission_id: Uuid) -> Result<(), StoreError> {
            self.failed.lock().unwrap().push(submission_id);
            Ok(())
        }
    }

    let llm = ScriptedLlm::new(VALID_WRITING_RESPONSE);
    let store = Arc::new(FailingSaveStore {
        save_attempts: AtomicU32::new(0),
        failed: Mutex::new(Vec::new()),
    });
    let dlq = Arc::new(RecordingDlq::default());
    let orchestrator = GradingOrchestrator::new(
        RubricGrader::new(llm.clone()),
        TranscriptionService::new(Arc::new(UnusedFetcher), Arc::new(UnusedCache), Arc::new(UnusedStt)),
    );
    let executor = RetryExecutor::new(orchestrator, store.clone(), dlq.clone(), 3);
    let (task, raw) = writing_task();

    executor.execute(&task, &raw).await;

    // each failed save consumes a whole attempt, grading included
    assert_eq!(store.save_attempts.load(Ordering::SeqCst), 3);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    assert_eq!(store.failed.lock().unwrap().as_slice(), &[task.submission_id]);
    assert_eq!(dlq.payloads.lock().unwrap().as_slice(), &[raw]);
}

#[test]
fn given_client_rejected_audio_then_failure_is_permanent() {
    let rejected: GradingError =
        TranscriptionServiceError::Fetch(AudioFetchError::Status { status: 404 }).into();
    assert!(matches!(rejected, GradingError::AudioRejected(404)));
    assert_eq!(rejected.kind(), FailureKind::Permanent);

    // server-side failures stay retryable
    let unavailable: GradingError =
        TranscriptionServiceError::Fetch(AudioFetchError::Status { status: 503 }).into();
    assert!(matches!(unavailable, GradingError::AudioFetch(_)));
    assert_eq!(unavailable.kind(), FailureKind::Transient);

    let timed_out: GradingError =
        TranscriptionServiceError::Fetch(AudioFetchError::Transport("timed out".to_string()))
            .into();
    assert_eq!(timed_out.kind(), FailureKind::Transient);
}

struct ScriptedQueue {
    payloads: Mutex<VecDeque<Vec<u8>>>,
    shutdown: watch::Sender<bool>,
}

#[async_trait::async_trait]
impl TaskQueue for ScriptedQueue {
    async fn pop(&self, _timeout: Duration) -> Result<Option<Vec<u8>>, QueueError> {
        let next = self.payloads.lock().unwrap().pop_front();
        if next.is_none() {
            // script drained: ask the consumer to stop instead of idling
            let _ = self.shutdown.send(true);
        }
        Ok(next)
    }
}

#[tokio::test]
async fn given_scripted_queue_then_valid_tasks_process_and_malformed_are_dropped() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (_, valid) = writing_task();
    let queue = Arc::new(ScriptedQueue {
        payloads: Mutex::new(VecDeque::from([b"{not json".to_vec(), valid])),
        shutdown: shutdown_tx,
    });
    let store = Arc::new(RecordingStore::default());
    let dlq = Arc::new(RecordingDlq::default());
    let executor = executor(
        ScriptedLlm::new(VALID_WRITING_RESPONSE),
        store.clone(),
        dlq.clone(),
        3,
    );
    let consumer = QueueConsumer::new(queue, executor, Duration::from_secs(5));

    consumer.run(shutdown_rx).await;

    // the malformed payload leaves no trace, the valid one is graded
    assert_eq!(store.saved.lock().unwrap().len(), 1);
    assert!(store.failed.lock().unwrap().is_empty());
    assert!(dlq.payloads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn given_shutdown_during_grading_then_in_flight_task_still_completes() {
    // Signals shutdown from inside the model call, while the consumer is
    // deep in an attempt.
    struct SignallingLlm {
        shutdown: watch::Sender<bool>,
    }

    #[async_trait::async_trait]
    impl LlmClient for SignallingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
            let _ = self.shutdown.send(true);
            Ok(VALID_WRITING_RESPONSE.to_string())
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (_, valid) = writing_task();
    let queue = Arc::new(ScriptedQueue {
        payloads: Mutex::new(VecDeque::from([valid])),
        shutdown: shutdown_tx.clone(),
    });
    let store = Arc::new(RecordingStore::default());
    let dlq = Arc::new(RecordingDlq::default());
    let executor = executor(
        Arc::new(SignallingLlm {
            shutdown: shutdown_tx,
        }),
        store.clone(),
        dlq.clone(),
        3,
    );
    let consumer = QueueConsumer::new(queue, executor, Duration::from_secs(5));

    consumer.run(shutdown_rx).await;

    // shutdown arrived mid-attempt; the attempt still ran to completion
    // and its result was persisted before the loop exited
    assert_eq!(store.saved.lock().unwrap().len(), 1);
    assert!(store.failed.lock().unwrap().is_empty());
}
