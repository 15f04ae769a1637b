mod audio_fetcher;
mod dead_letter;
mod llm_client;
mod result_store;
mod speech_to_text;
mod task_queue;
mod transcript_cache;

pub use audio_fetcher::{AudioFetchError, AudioFetcher};
pub use dead_letter::DeadLetterSink;
pub use llm_client::{LlmClient, LlmClientError};
pub use result_store::{ResultStore, StoreError};
pub use speech_to_text::{SpeechToText, SttError};
pub use task_queue::{QueueError, TaskQueue};
pub use transcript_cache::{CacheError, TranscriptCache};
