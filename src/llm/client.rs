use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to the text-generation service
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded, retry after {0}s")]
    RateLimitExceeded(u64),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("No API key found, set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LLMError::Timeout
        } else {
            LLMError::NetworkError(err)
        }
    }
}

/// A text-generation service: one system instruction, one user message, one reply
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Send a single prompt and return the raw reply text
    async fn complete(&self, system: &str, user: &str) -> Result<String, LLMError>;

    /// Provider name, for logs
    fn provider(&self) -> &'static str;
}
