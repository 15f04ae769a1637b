use async_trait::async_trait;

/// Downloads submitted audio. Errors keep the HTTP status visible so the
/// orchestration layer can classify client rejections as permanent.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AudioFetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioFetchError {
    #[error("upstream returned status {status}")]
    Status { status: u16 },
    #[error("transport: {0}")]
    Transport(String),
}

impl AudioFetchError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, AudioFetchError::Status { status } if (400..500).contains(status))
    }
}
