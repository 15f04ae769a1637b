use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{LlmClient, LlmClientError};

/// Primary/fallback routing over a logical model alias. Each deployment
/// gets its own request budget (1 + retries); only when the primary budget
/// is exhausted is the fallback tried with the same prompt.
pub struct ModelRouter {
    primary: Arc<dyn LlmClient>,
    fallback: Option<Arc<dyn LlmClient>>,
    attempts_per_model: u32,
}

impl ModelRouter {
    pub fn new(
        primary: Arc<dyn LlmClient>,
        fallback: Option<Arc<dyn LlmClient>>,
        retries: u32,
    ) -> Self {
        Self {
            primary,
            fallback,
            attempts_per_model: retries + 1,
        }
    }

    async fn try_model(
        &self,
        model: &Arc<dyn LlmClient>,
        prompt: &str,
    ) -> Result<String, LlmClientError> {
        let mut last_error = None;
        for attempt in 0..self.attempts_per_model {
            match model.complete(prompt).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "model request failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| LlmClientError::ApiRequestFailed("no attempts made".to_string())))
    }
}

#[async_trait]
impl LlmClient for ModelRouter {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        match self.try_model(&self.primary, prompt).await {
            Ok(content) => Ok(content),
            Err(primary_error) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        error = %primary_error,
                        "primary model budget exhausted, trying fallback"
                    );
                    self.try_model(fallback, prompt).await
                }
                None => Err(primary_error),
            },
        }
    }
}
