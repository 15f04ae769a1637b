use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{AudioFetchError, AudioFetcher};

/// Downloads submission audio over HTTP. Non-2xx responses surface the
/// status code so 4xx rejections can be classified as permanent upstream.
pub struct HttpAudioFetcher {
    client: reqwest::Client,
}

impl HttpAudioFetcher {
    pub fn new(timeout: Duration) -> Result<Self, AudioFetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AudioFetchError::Transport(format!("client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AudioFetcher for HttpAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AudioFetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AudioFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioFetchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AudioFetchError::Transport(e.to_string()))?;

        tracing::debug!(url, bytes = bytes.len(), "audio downloaded");
        Ok(bytes.to_vec())
    }
}
