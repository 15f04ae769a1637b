use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::application::ports::{
    AudioFetchError, AudioFetcher, CacheError, SpeechToText, SttError, TranscriptCache,
};

pub const TRANSCRIPT_TTL: Duration = Duration::from_secs(86_400);

/// Cache key derived from the audio content itself, so the same recording
/// resubmitted under a different URL hits the same entry.
pub fn transcript_cache_key(audio: &[u8]) -> String {
    format!("stt:{}", hex::encode(Sha256::digest(audio)))
}

/// Content-addressed cache over the speech-to-text provider.
pub struct TranscriptionService {
    fetcher: Arc<dyn AudioFetcher>,
    cache: Arc<dyn TranscriptCache>,
    stt: Arc<dyn SpeechToText>,
}

impl TranscriptionService {
    pub fn new(
        fetcher: Arc<dyn AudioFetcher>,
        cache: Arc<dyn TranscriptCache>,
        stt: Arc<dyn SpeechToText>,
    ) -> Self {
        Self { fetcher, cache, stt }
    }

    pub async fn transcribe(&self, audio_url: &str) -> Result<String, TranscriptionServiceError> {
        let audio = self
            .fetcher
            .fetch(audio_url)
            .await
            .map_err(TranscriptionServiceError::Fetch)?;

        let key = transcript_cache_key(&audio);
        if let Some(transcript) = self
            .cache
            .get(&key)
            .await
            .map_err(TranscriptionServiceError::Cache)?
        {
            tracing::debug!(audio_url, "transcript cache hit");
            return Ok(transcript);
        }

        let transcript = self
            .stt
            .transcribe(&audio)
            .await
            .map_err(TranscriptionServiceError::SpeechToText)?;

        self.cache
            .set_with_ttl(&key, &transcript, TRANSCRIPT_TTL)
            .await
            .map_err(TranscriptionServiceError::Cache)?;

        tracing::info!(audio_url, chars = transcript.len(), "transcribed");
        Ok(transcript)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("audio fetch: {0}")]
    Fetch(AudioFetchError),
    #[error("cache: {0}")]
    Cache(CacheError),
    #[error("speech to text: {0}")]
    SpeechToText(SttError),
}
